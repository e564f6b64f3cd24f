use thiserror::Error;

use vn_core::VnError;
use vn_exec::ExecError;

/// Why a pursuit ended without reaching its goal.
///
/// `ResetRequested` never surfaces here: the pathfinder restarts the search
/// instead.
#[derive(Debug, Error)]
pub enum PathfinderError {
    #[error("no path to the goal")]
    NoPath,

    #[error("search budget exhausted before reaching the goal")]
    Timeout,

    #[error("goal invalidated by an external event")]
    GoalInvalidated,

    #[error("no goal set")]
    NoGoal,

    #[error("goal not resolved within {0} ticks")]
    TickLimit(u64),

    #[error("execution failed: {0}")]
    Execution(#[from] ExecError),

    #[error(transparent)]
    Config(#[from] VnError),
}

pub type PathfinderResult<T> = Result<T, PathfinderError>;
