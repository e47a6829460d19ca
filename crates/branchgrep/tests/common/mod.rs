use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Return the path to the compiled `branchgrep` binary for integration tests.
pub fn branchgrep_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_branchgrep"))
}

/// Run a git command inside `repo_path`, ensuring it succeeds.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;

    ensure!(
        output.status.success(),
        "git command failed: git {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(output)
}

/// The `foo.go` content committed on `main`: the TODO marker sits on line 10.
const MAIN_FOO: &str = "package main\n\
    \n\
    import \"fmt\"\n\
    \n\
    func main() {\n\
    \tfmt.Println(\"hello\")\n\
    }\n\
    \n\
    // helpers\n\
    // TODO fix\n";

/// The `foo.go` content committed on `feature-x`: no TODO marker anywhere.
const FEATURE_FOO: &str = "package main\n\
    \n\
    import \"fmt\"\n\
    \n\
    func main() {\n\
    \tfmt.Println(\"hello feature\")\n\
    }\n";

/// Create an origin repository with `main` and `feature-x` branches, then
/// clone it. Returns the temp dir (owning both) and the clone path. `main`
/// carries one TODO match in `foo.go:10`; `feature-x` carries none.
pub fn setup_origin_and_clone() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let origin_path = temp_dir.path().join("origin");
    fs::create_dir_all(&origin_path)?;

    git(&origin_path, &["init", "-b", "main"])?;
    git(&origin_path, &["config", "user.email", "test@example.com"])?;
    git(&origin_path, &["config", "user.name", "Test User"])?;

    fs::write(origin_path.join("foo.go"), MAIN_FOO)?;
    git(&origin_path, &["add", "foo.go"])?;
    git(&origin_path, &["commit", "-m", "Initial commit"])?;

    git(&origin_path, &["checkout", "-b", "feature-x"])?;
    fs::write(origin_path.join("foo.go"), FEATURE_FOO)?;
    git(&origin_path, &["add", "foo.go"])?;
    git(&origin_path, &["commit", "-m", "Rework helpers"])?;
    git(&origin_path, &["checkout", "main"])?;

    let clone_path = temp_dir.path().join("clone");
    git(
        temp_dir.path(),
        &[
            "clone",
            origin_path.to_str().unwrap(),
            clone_path.to_str().unwrap(),
        ],
    )?;
    git(&clone_path, &["config", "user.email", "test@example.com"])?;
    git(&clone_path, &["config", "user.name", "Test User"])?;

    Ok((temp_dir, clone_path))
}

/// Run `branchgrep` against the repository with the provided extra
/// arguments. Color is disabled so assertions can match plain text.
pub fn run_branchgrep(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new(branchgrep_binary());
    cmd.arg("--no-color");
    cmd.arg("--repo");
    cmd.arg(repo_path);
    cmd.args(args);
    cmd.output()
        .with_context(|| format!("failed to run branchgrep {}", args.join(" ")))
}

/// Read the short name of the branch currently checked out in `repo_path`.
pub fn current_branch(repo_path: &Path) -> Result<String> {
    let output = git(repo_path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
