use std::fmt;

/// Identity of a best-effort step in the orchestration sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Stashing uncommitted changes before the branch loop.
    StashPush,
    /// Fetching all remotes before the branch loop.
    Fetch,
    /// Checking out a branch inside the loop.
    Checkout(String),
    /// Pulling a branch from origin inside the loop.
    Pull(String),
    /// Checking out the originally-recorded branch after the loop.
    RestoreBranch(String),
    /// Restoring the stash created at the start of the run.
    StashPop,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StashPush => write!(f, "stash push"),
            Self::Fetch => write!(f, "fetch --all"),
            Self::Checkout(branch) => write!(f, "checkout {branch}"),
            Self::Pull(branch) => write!(f, "pull origin {branch}"),
            Self::RestoreBranch(branch) => write!(f, "restore branch {branch}"),
            Self::StashPop => write!(f, "stash pop"),
        }
    }
}

/// Outcome of a single best-effort step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step completed successfully.
    Ok,
    /// The step was not needed and was skipped.
    Skipped(String),
    /// The step failed; the run continued regardless.
    Failed(String),
}

/// A recorded step together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// Which step this record describes.
    pub step: Step,
    /// What happened when the step ran.
    pub outcome: StepOutcome,
}

/// Ordered record of every best-effort step taken during a run.
///
/// Best-effort failures never abort the run, but they are not discarded
/// either: callers can render this report so a failed checkout or pull is
/// visible in the transcript.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Step records in execution order.
    steps: Vec<StepRecord>,
}

impl RunReport {
    /// Append a step outcome to the report.
    pub(crate) fn record(&mut self, step: Step, outcome: StepOutcome) {
        self.steps.push(StepRecord { step, outcome });
    }

    /// All recorded steps, in execution order.
    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Whether any recorded step failed.
    pub fn has_failures(&self) -> bool {
        self.steps
            .iter()
            .any(|record| matches!(record.outcome, StepOutcome::Failed(_)))
    }
}
