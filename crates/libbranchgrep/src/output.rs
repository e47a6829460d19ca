use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

/// Errors produced by [`Output`] implementations when writing to the
/// terminal.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Underlying I/O error while writing to the terminal.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Abstraction over how user-facing messages are produced.
///
/// Implementations can render to a terminal or suppress output entirely.
pub trait Output: Send + Sync {
    /// Print an informational message.
    fn message(&self, msg: &str) -> Result<()>;
    /// Print a success message.
    fn success(&self, msg: &str) -> Result<()>;
    /// Print a warning message.
    fn warn(&self, msg: &str) -> Result<()>;
    /// Print a single match in the literal form `branch:file:line text`.
    fn match_line(&self, branch: &str, file: &str, line: u64, text: &str) -> Result<()>;
    /// Flush any buffered output.
    fn finish(&self) -> Result<()>;
}

/// Output implementation that suppresses all messages. Useful for
/// non-interactive or test environments.
pub struct Quiet;

impl Output for Quiet {
    fn message(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn success(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn warn(&self, _msg: &str) -> Result<()> {
        Ok(())
    }

    fn match_line(&self, _branch: &str, _file: &str, _line: u64, _text: &str) -> Result<()> {
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        Ok(())
    }
}

/// Color-capable terminal renderer.
pub struct Terminal {
    /// Whether ANSI colors are emitted.
    color_choice: ColorChoice,
}

impl Terminal {
    /// Create a new terminal output.
    ///
    /// - `color`: when `true`, always render colored output; when `false`,
    ///   disable ANSI colors.
    pub fn new(color: bool) -> Self {
        let color_choice = if color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self { color_choice }
    }

    /// Write a whole line to stdout in the given color.
    fn write_colored(&self, msg: &str, color: Color) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
        writeln!(stdout, "{msg}")?;
        stdout.reset()?;
        stdout.flush()?;
        Ok(())
    }
}

impl Output for Terminal {
    fn message(&self, msg: &str) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        writeln!(stdout, "{msg}")?;
        stdout.flush()?;
        Ok(())
    }

    fn success(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Green)
    }

    fn warn(&self, msg: &str) -> Result<()> {
        self.write_colored(msg, Color::Yellow)
    }

    fn match_line(&self, branch: &str, file: &str, line: u64, text: &str) -> Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{branch}")?;
        stdout.reset()?;

        write!(stdout, ":{file}")?;

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(stdout, ":{line}")?;
        stdout.reset()?;

        writeln!(stdout, " {text}")?;
        stdout.flush()?;
        Ok(())
    }

    fn finish(&self) -> Result<()> {
        io::stdout().flush().map_err(OutputError::Io)
    }
}
