use std::path::Path;
use std::process::Command;

use crate::error::{Result, SearchError};

/// Run a git command with the given arguments in the specified directory.
/// Returns trimmed stdout if successful, otherwise returns an error with the
/// full command details.
fn run_git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .map_err(|e| {
            SearchError::GitCommandFailed(format!(
                "failed to execute git {}: {e}",
                args.join(" ")
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SearchError::GitCommandFailed(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Trim whitespace and the `origin/` remote prefix from a branch name.
/// Idempotent on already-normalized names.
pub(crate) fn normalize_branch(name: &str) -> String {
    let trimmed = name.trim();
    trimmed.strip_prefix("origin/").unwrap_or(trimmed).to_string()
}

/// Read the short name of the currently checked-out branch.
pub(crate) fn current_branch(repo_path: &Path) -> Result<String> {
    run_git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Stash uncommitted changes, including untracked files. Returns `true` when
/// a stash entry was actually created, `false` when the tree was clean.
pub(crate) fn stash_push(repo_path: &Path) -> Result<bool> {
    let out = run_git(
        repo_path,
        &["stash", "push", "-u", "-m", "branchgrep-temp-stash"],
    )?;
    Ok(!out.contains("No local changes to save"))
}

/// Restore the most recently stashed changes.
pub(crate) fn stash_pop(repo_path: &Path) -> Result<()> {
    run_git(repo_path, &["stash", "pop"])?;
    Ok(())
}

/// Fetch from all configured remotes.
pub(crate) fn fetch_all(repo_path: &Path) -> Result<()> {
    run_git(repo_path, &["fetch", "--all", "--quiet"])?;
    Ok(())
}

/// Check out the named branch.
pub(crate) fn checkout(repo_path: &Path, branch: &str) -> Result<()> {
    run_git(repo_path, &["checkout", branch])?;
    Ok(())
}

/// Pull the named branch from `origin`.
pub(crate) fn pull_origin(repo_path: &Path, branch: &str) -> Result<()> {
    run_git(repo_path, &["pull", "origin", branch])?;
    Ok(())
}

/// Enumerate remote-tracking branches, returning normalized short names.
/// Symbolic refs such as `HEAD -> origin/main` are excluded.
pub(crate) fn list_remote_branches(repo_path: &Path) -> Result<Vec<String>> {
    let output = run_git(repo_path, &["branch", "-r"])
        .map_err(|e| SearchError::BranchListFailed(e.to_string()))?;

    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains("->"))
        .map(normalize_branch)
        .collect())
}
