#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Core library for searching a regular expression across the branches of a
//! Git repository.
//!
//! All of the heavy lifting is delegated to external tools: `git` handles
//! branch and stash plumbing, while `ripgrep` (or `grep` as a fallback)
//! performs the actual content search. This crate sequences those
//! invocations, parses their output, and records the outcome of every
//! best-effort step so callers can surface partial failures. The CLI binary
//! in `crates/branchgrep` builds on top of this library.

/// Error types for branch search operations.
mod error;
/// Helper routines for interacting with Git repositories.
mod git;
/// Search tool selection, invocation, and match parsing.
mod grep;
/// Output channel abstractions and implementations.
mod output;
/// Structured per-step outcome reporting.
mod report;
/// High-level orchestration of the branch search sequence.
mod search;

/// Re-export of the error type and result alias.
pub use error::{Result, SearchError};
/// Re-exports for search tool strategy and match values.
pub use grep::{GlobFilters, Match, SearchTool};
/// Re-exports for output abstraction and concrete implementations.
pub use output::{Output, OutputError, Quiet, Terminal};
/// Re-exports for the run report collected during a search.
pub use report::{RunReport, Step, StepOutcome, StepRecord};
/// Re-exports for the orchestrator and its request/result types.
pub use search::{BranchResult, BranchSearcher, SearchRequest};
