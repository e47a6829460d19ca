#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Command-line interface for searching a regex across Git branches via the
//! libbranchgrep crate.

use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process,
};

use anyhow::Result;
use clap::{ArgGroup, Parser};
use libbranchgrep::{
    BranchSearcher, GlobFilters, Output, Quiet, RunReport, SearchError, SearchRequest,
    StepOutcome, Terminal,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("color_mode")
        .args(["color", "no_color"])
))]
/// Top-level CLI options for branchgrep.
struct Cli {
    /// Path to the git repository
    #[arg(long, value_name = "DIR")]
    repo: PathBuf,

    /// Regular expression to search for
    #[arg(long, value_name = "PATTERN")]
    regex: String,

    /// Comma-separated list of branches to search (default: all remote branches)
    #[arg(long, value_name = "LIST")]
    branches: Option<String>,

    /// Include only files/dirs matching glob (ripgrep only, repeatable)
    #[arg(long = "include-glob", value_name = "GLOB")]
    include_glob: Vec<String>,

    /// Exclude files/dirs matching glob (ripgrep only, repeatable)
    #[arg(long = "exclude-glob", value_name = "GLOB")]
    exclude_glob: Vec<String>,

    /// Enable colored output
    #[arg(long)]
    color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Suppress all output
    #[arg(long)]
    quiet: bool,
}

/// Render the step report: skipped steps as plain messages, failed steps as
/// warnings. Successful steps are not narrated.
fn render_report(output: &dyn Output, report: &RunReport) -> Result<()> {
    for record in report.steps() {
        match &record.outcome {
            StepOutcome::Ok => {}
            StepOutcome::Skipped(reason) => {
                output.message(&format!("Skipped {}: {reason}", record.step))?;
            }
            StepOutcome::Failed(reason) => {
                output.warn(&format!("Step '{}' failed: {reason}", record.step))?;
            }
        }
    }
    Ok(())
}

/// Execute the search using the provided output implementation.
fn run(cli: Cli, output: &dyn Output) -> Result<()> {
    let branches = cli
        .branches
        .as_deref()
        .map(|list| list.split(',').map(str::to_string).collect());

    let request = SearchRequest {
        repo: cli.repo,
        pattern: cli.regex.clone(),
        branches,
        filters: GlobFilters {
            include: cli.include_glob,
            exclude: cli.exclude_glob,
        },
    };
    let filters_given = !request.filters.is_empty();

    let mut searcher = BranchSearcher::new(request)?;

    output.message(&format!("Repository: {}", searcher.repo().display()))?;
    output.message(&format!("Search pattern: {}", cli.regex))?;
    output.message(&format!("Current branch: {}", searcher.original_branch()))?;

    if filters_given && !searcher.tool().supports_globs() {
        output.warn(
            "Warning: include/exclude glob options require 'rg' (ripgrep). \
             Options will be ignored because 'rg' was not found in PATH.",
        )?;
    }

    output.message("Stashing uncommitted changes...")?;
    searcher.stash();

    output.message("Fetching remote branches...")?;
    searcher.fetch();

    let branches = searcher.branches()?;
    output.message(&format!("Searching across {} branches...", branches.len()))?;

    for branch in &branches {
        output.message(&format!("Searching branch: {branch}"))?;
        output.message(&format!("Pulling latest changes for {branch}..."))?;

        let result = searcher.search_branch(branch)?;

        if result.matches.is_empty() {
            output.message(&format!("No matches found in {branch}"))?;
        } else {
            output.success(&format!(
                "Found {} matches in {branch}",
                result.matches.len()
            ))?;
        }

        for hit in &result.matches {
            output.match_line(branch, &hit.file, hit.line, &hit.text)?;
        }
    }

    output.message(&format!(
        "Restoring original branch: {}",
        searcher.original_branch()
    ))?;
    output.message("Restoring stashed changes...")?;
    searcher.finish();

    render_report(output, searcher.report())?;

    output.success("Search completed!")?;
    output.finish()?;
    Ok(())
}

/// CLI entrypoint.
fn main() {
    let cli = Cli::parse();

    // Determine color output preference early for error handling
    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        // Auto-detect based on terminal
        io::stdout().is_terminal()
    };

    let output: Box<dyn Output> = if cli.quiet {
        Box::new(Quiet)
    } else {
        Box::new(Terminal::new(color))
    };

    if let Err(e) = run(cli, output.as_ref()) {
        if let Err(finish_err) = output.finish() {
            eprintln!("Failed to flush output handler: {finish_err:#}");
        }

        eprintln!("Error: {e:#}");

        let exit_code = e
            .downcast_ref::<SearchError>()
            .map_or(1, SearchError::exit_code);
        process::exit(exit_code);
    }
}
