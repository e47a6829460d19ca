use std::path::{Path, PathBuf};

use regex::Regex;

use crate::{
    error::{Result, SearchError},
    git,
    grep::{GlobFilters, Match, SearchTool},
    report::{RunReport, Step, StepOutcome},
};

/// Immutable description of a branch search run, constructed once from
/// caller input.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Path to the repository to operate on.
    pub repo: PathBuf,
    /// Regex pattern to search for.
    pub pattern: String,
    /// Explicit branches to visit, in order. `None` means all remote
    /// branches.
    pub branches: Option<Vec<String>>,
    /// Include/exclude glob filters for the search.
    pub filters: GlobFilters,
}

/// Matches found on a single branch. Transient: created per branch during
/// the loop and discarded after being printed.
#[derive(Debug)]
pub struct BranchResult {
    /// The branch that was searched.
    pub branch: String,
    /// Matches in tool output order.
    pub matches: Vec<Match>,
}

/// Sequences the git state transitions and search invocations of a run.
///
/// The repository working tree is deliberately mutated: each searched branch
/// is checked out in place, and the original branch and stash state are
/// restored at the end. Construction performs all fatal validation; no
/// repository mutation happens before [`BranchSearcher::stash`] is called.
/// Best-effort steps record their outcome in the [`RunReport`] instead of
/// failing the run.
#[derive(Debug)]
pub struct BranchSearcher {
    /// Absolute repository path.
    repo: PathBuf,
    /// Validated search pattern.
    pattern: String,
    /// Glob filters forwarded to the search tool.
    filters: GlobFilters,
    /// Explicit branch list, if one was requested.
    branches: Option<Vec<String>>,
    /// Selected search tool.
    tool: SearchTool,
    /// Branch checked out when the run started.
    original_branch: String,
    /// Whether the initial stash push created a stash entry.
    stashed: bool,
    /// Outcomes of every best-effort step so far.
    report: RunReport,
}

impl BranchSearcher {
    /// Validate a request and prepare a searcher.
    ///
    /// Fails with `InvalidPath`, `NotAGitRepo`, `GitCommandFailed` (current
    /// branch lookup), or `InvalidRegex`. The pattern is validated with the
    /// Rust regex engine, whose dialect differs from the dialect of the
    /// search tool invoked later; a pattern can pass here and still behave
    /// differently during the real search.
    pub fn new(request: SearchRequest) -> Result<Self> {
        let repo = request
            .repo
            .canonicalize()
            .map_err(|source| SearchError::InvalidPath {
                path: request.repo.clone(),
                source,
            })?;

        if !repo.join(".git").exists() {
            return Err(SearchError::NotAGitRepo(repo));
        }

        let original_branch = git::current_branch(&repo)?;

        Regex::new(&request.pattern)?;

        Ok(Self {
            repo,
            pattern: request.pattern,
            filters: request.filters,
            branches: request.branches,
            tool: SearchTool::detect(),
            original_branch,
            stashed: false,
            report: RunReport::default(),
        })
    }

    /// The resolved absolute repository path.
    pub fn repo(&self) -> &Path {
        &self.repo
    }

    /// The branch that was checked out when the run started.
    pub fn original_branch(&self) -> &str {
        &self.original_branch
    }

    /// The search tool selected for this run.
    pub fn tool(&self) -> SearchTool {
        self.tool
    }

    /// The best-effort step outcomes recorded so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Best-effort stash of uncommitted changes. Records whether a stash
    /// entry was created; the final pop is skipped when nothing was stashed.
    pub fn stash(&mut self) {
        match git::stash_push(&self.repo) {
            Ok(true) => {
                self.stashed = true;
                self.report.record(Step::StashPush, StepOutcome::Ok);
            }
            Ok(false) => self.report.record(
                Step::StashPush,
                StepOutcome::Skipped("no local changes to stash".to_string()),
            ),
            Err(err) => self
                .report
                .record(Step::StashPush, StepOutcome::Failed(err.to_string())),
        }
    }

    /// Best-effort fetch of all remotes.
    pub fn fetch(&mut self) {
        match git::fetch_all(&self.repo) {
            Ok(()) => self.report.record(Step::Fetch, StepOutcome::Ok),
            Err(err) => self
                .report
                .record(Step::Fetch, StepOutcome::Failed(err.to_string())),
        }
    }

    /// Determine the branches to visit, in order.
    ///
    /// An explicit request list is normalized with empty entries skipped and
    /// is never validated against the repository. Otherwise remote branches
    /// are enumerated; enumeration failure is fatal (`BranchListFailed`).
    pub fn branches(&self) -> Result<Vec<String>> {
        match &self.branches {
            Some(list) => Ok(list
                .iter()
                .map(|name| git::normalize_branch(name))
                .filter(|name| !name.is_empty())
                .collect()),
            None => git::list_remote_branches(&self.repo),
        }
    }

    /// Check out `branch`, pull it from origin, and search the working tree.
    ///
    /// Checkout and pull are best-effort and recorded in the report. A
    /// search-tool exit with no output means zero matches; a spawn failure
    /// is fatal (`SearchFailed`).
    pub fn search_branch(&mut self, branch: &str) -> Result<BranchResult> {
        match git::checkout(&self.repo, branch) {
            Ok(()) => self
                .report
                .record(Step::Checkout(branch.to_string()), StepOutcome::Ok),
            Err(err) => self.report.record(
                Step::Checkout(branch.to_string()),
                StepOutcome::Failed(err.to_string()),
            ),
        }

        match git::pull_origin(&self.repo, branch) {
            Ok(()) => self
                .report
                .record(Step::Pull(branch.to_string()), StepOutcome::Ok),
            Err(err) => self.report.record(
                Step::Pull(branch.to_string()),
                StepOutcome::Failed(err.to_string()),
            ),
        }

        let matches = self
            .tool
            .search(&self.repo, &self.pattern, &self.filters)
            .map_err(|err| SearchError::SearchFailed {
                branch: branch.to_string(),
                message: err.to_string(),
            })?;

        Ok(BranchResult {
            branch: branch.to_string(),
            matches,
        })
    }

    /// Best-effort restore of the original branch and stashed changes.
    pub fn finish(&mut self) {
        let original = self.original_branch.clone();
        match git::checkout(&self.repo, &original) {
            Ok(()) => self
                .report
                .record(Step::RestoreBranch(original), StepOutcome::Ok),
            Err(err) => self
                .report
                .record(Step::RestoreBranch(original), StepOutcome::Failed(err.to_string())),
        }

        if self.stashed {
            match git::stash_pop(&self.repo) {
                Ok(()) => self.report.record(Step::StashPop, StepOutcome::Ok),
                Err(err) => self
                    .report
                    .record(Step::StashPop, StepOutcome::Failed(err.to_string())),
            }
        } else {
            self.report.record(
                Step::StashPop,
                StepOutcome::Skipped("nothing was stashed".to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn git(repo_path: &Path, args: &[&str]) {
        let output = Command::new("git")
            .current_dir(repo_path)
            .args(args)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn setup_test_repo() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        git(&repo_path, &["init", "-b", "main"]);
        git(&repo_path, &["config", "user.email", "test@example.com"]);
        git(&repo_path, &["config", "user.name", "Test User"]);

        fs::write(repo_path.join("README.md"), "# Test Repo").unwrap();
        git(&repo_path, &["add", "README.md"]);
        git(&repo_path, &["commit", "-m", "Initial commit"]);

        (temp_dir, repo_path)
    }

    fn request(repo: &Path, pattern: &str) -> SearchRequest {
        SearchRequest {
            repo: repo.to_path_buf(),
            pattern: pattern.to_string(),
            branches: None,
            filters: GlobFilters::default(),
        }
    }

    #[test]
    fn test_new_rejects_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        let result = BranchSearcher::new(request(&missing, "TODO"));
        assert!(matches!(result, Err(SearchError::InvalidPath { .. })));
    }

    #[test]
    fn test_new_rejects_non_repo() {
        let temp_dir = TempDir::new().unwrap();

        let result = BranchSearcher::new(request(temp_dir.path(), "TODO"));
        assert!(matches!(result, Err(SearchError::NotAGitRepo(_))));
    }

    #[test]
    fn test_new_rejects_invalid_regex_before_any_mutation() {
        let (_temp_dir, repo_path) = setup_test_repo();

        fs::write(repo_path.join("README.md"), "# Dirty").unwrap();

        let result = BranchSearcher::new(request(&repo_path, "("));
        assert!(matches!(result, Err(SearchError::InvalidRegex(_))));

        // The dirty tree was not stashed and the file is untouched.
        let stash_list = Command::new("git")
            .current_dir(&repo_path)
            .args(["stash", "list"])
            .output()
            .unwrap();
        assert!(stash_list.stdout.is_empty());
        assert_eq!(
            fs::read_to_string(repo_path.join("README.md")).unwrap(),
            "# Dirty"
        );
    }

    #[test]
    fn test_new_records_original_branch() {
        let (_temp_dir, repo_path) = setup_test_repo();
        git(&repo_path, &["checkout", "-b", "work"]);

        let searcher = BranchSearcher::new(request(&repo_path, "TODO")).unwrap();
        assert_eq!(searcher.original_branch(), "work");
    }

    #[test]
    fn test_explicit_branches_visited_in_order() {
        let (_temp_dir, repo_path) = setup_test_repo();

        let mut req = request(&repo_path, "TODO");
        req.branches = Some(vec![
            "main".to_string(),
            "dev".to_string(),
            "  ".to_string(),
            "origin/extra".to_string(),
        ]);

        let searcher = BranchSearcher::new(req).unwrap();
        let branches = searcher.branches().unwrap();
        assert_eq!(branches, vec!["main", "dev", "extra"]);
    }

    #[test]
    fn test_stash_skipped_on_clean_tree() {
        let (_temp_dir, repo_path) = setup_test_repo();

        let mut searcher = BranchSearcher::new(request(&repo_path, "TODO")).unwrap();
        searcher.stash();
        searcher.finish();

        let outcomes: Vec<_> = searcher
            .report()
            .steps()
            .iter()
            .filter(|record| {
                matches!(record.step, Step::StashPush | Step::StashPop)
            })
            .map(|record| record.outcome.clone())
            .collect();
        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome, StepOutcome::Skipped(_))));
    }

    #[test]
    fn test_stash_and_restore_dirty_tree() {
        let (_temp_dir, repo_path) = setup_test_repo();
        fs::write(repo_path.join("README.md"), "# Dirty").unwrap();

        let mut searcher = BranchSearcher::new(request(&repo_path, "TODO")).unwrap();
        searcher.stash();
        assert_eq!(
            fs::read_to_string(repo_path.join("README.md")).unwrap(),
            "# Test Repo"
        );

        searcher.finish();
        assert_eq!(
            fs::read_to_string(repo_path.join("README.md")).unwrap(),
            "# Dirty"
        );
        assert!(!searcher.report().has_failures());
    }

    #[test]
    fn test_search_branch_records_failed_checkout() {
        let (_temp_dir, repo_path) = setup_test_repo();
        fs::write(repo_path.join("notes.txt"), "// TODO fix\n").unwrap();
        git(&repo_path, &["add", "notes.txt"]);
        git(&repo_path, &["commit", "-m", "Add notes"]);

        let mut searcher = BranchSearcher::new(request(&repo_path, "TODO")).unwrap();
        let result = searcher.search_branch("no-such-branch").unwrap();

        // Checkout and pull both fail best-effort; the search still runs on
        // the current tree.
        assert!(searcher.report().has_failures());
        assert!(!result.matches.is_empty());
    }

    #[test]
    fn test_search_branch_finds_matches() {
        let (_temp_dir, repo_path) = setup_test_repo();
        fs::write(repo_path.join("notes.txt"), "line\n// TODO fix\n").unwrap();
        git(&repo_path, &["add", "notes.txt"]);
        git(&repo_path, &["commit", "-m", "Add notes"]);
        git(&repo_path, &["branch", "dev"]);

        let mut searcher = BranchSearcher::new(request(&repo_path, "TODO")).unwrap();
        let result = searcher.search_branch("dev").unwrap();

        assert_eq!(result.branch, "dev");
        assert_eq!(result.matches.len(), 1);
        assert!(result.matches[0].file.contains("notes.txt"));
        assert_eq!(result.matches[0].line, 2);
    }
}
