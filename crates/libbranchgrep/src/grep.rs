use std::io;
use std::path::Path;
use std::process::Command;

/// A single search hit parsed from a `file:line:text` output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// File path relative to the repository root.
    pub file: String,
    /// One-based line number within the file.
    pub line: u64,
    /// Raw matched line text.
    pub text: String,
}

impl Match {
    /// Parse a raw search-tool output line. Returns `None` for lines with
    /// fewer than two `:` separators or a non-positive line number; such
    /// lines are silently dropped by callers.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        let file = parts.next()?;
        let line = parts.next()?;
        let text = parts.next()?;

        let line = line.parse::<u64>().ok().filter(|n| *n > 0)?;

        Some(Self {
            file: file.to_string(),
            line,
            text: text.to_string(),
        })
    }
}

/// Include and exclude glob patterns restricting which files are searched.
#[derive(Debug, Clone, Default)]
pub struct GlobFilters {
    /// Globs a file must match to be searched.
    pub include: Vec<String>,
    /// Globs that exclude a file from the search.
    pub exclude: Vec<String>,
}

impl GlobFilters {
    /// Whether no filters were supplied at all.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// The external tool used for content search, selected by capability.
///
/// Ripgrep supports glob filtering and PCRE2 patterns; POSIX grep supports
/// neither, so glob filters are silently ignored when it is in use. The
/// upfront pattern validation performed by the orchestrator uses the Rust
/// `regex` dialect, which matches neither tool exactly; a pattern can pass
/// validation yet behave differently in the actual search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTool {
    /// `rg`, invoked with `-n -uu --pcre2` plus `--glob` filters.
    Ripgrep,
    /// `grep`, invoked with `-rnE` over the whole tree.
    Grep,
}

impl SearchTool {
    /// Select the best available tool: ripgrep when `rg` is on `PATH`,
    /// otherwise grep.
    pub fn detect() -> Self {
        if which::which("rg").is_ok() {
            Self::Ripgrep
        } else {
            Self::Grep
        }
    }

    /// Name of the executable this tool invokes.
    pub fn program(self) -> &'static str {
        match self {
            Self::Ripgrep => "rg",
            Self::Grep => "grep",
        }
    }

    /// Whether this tool honours include/exclude glob filters.
    pub fn supports_globs(self) -> bool {
        matches!(self, Self::Ripgrep)
    }

    /// Build the argument list for searching `pattern` with the given
    /// filters. Blank glob entries are skipped; grep ignores filters
    /// entirely.
    fn args(self, pattern: &str, filters: &GlobFilters) -> Vec<String> {
        match self {
            Self::Ripgrep => {
                let mut args = vec!["-n".to_string(), "-uu".to_string(), "--pcre2".to_string()];
                for glob in &filters.include {
                    if glob.trim().is_empty() {
                        continue;
                    }
                    args.push("--glob".to_string());
                    args.push(glob.clone());
                }
                for glob in &filters.exclude {
                    if glob.trim().is_empty() {
                        continue;
                    }
                    args.push("--glob".to_string());
                    args.push(format!("!{glob}"));
                }
                args.push(pattern.to_string());
                args
            }
            Self::Grep => vec![
                "-rnE".to_string(),
                pattern.to_string(),
                ".".to_string(),
            ],
        }
    }

    /// Search the working tree rooted at `repo_path` for `pattern`.
    ///
    /// Both tools exit non-zero when nothing matches, so a failed exit with
    /// no captured output is reported as zero matches. Lines that do not
    /// parse as `file:line:text` are dropped. The only error is a spawn
    /// failure of the tool itself.
    pub(crate) fn search(
        self,
        repo_path: &Path,
        pattern: &str,
        filters: &GlobFilters,
    ) -> io::Result<Vec<Match>> {
        let output = Command::new(self.program())
            .current_dir(repo_path)
            .args(self.args(pattern, filters))
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() && stdout.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(stdout.lines().filter_map(Match::parse).collect())
    }
}
