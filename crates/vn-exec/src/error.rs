//! Execution failures.
//!
//! | Variant                | Recoverable | Raised when                                   |
//! |------------------------|-------------|-----------------------------------------------|
//! | `AlignmentFailure`     | no          | precondition not met within the align ceiling |
//! | `CancelledInteraction` | yes         | the host cancelled a break or place           |
//! | `MoveTimedOut`         | yes         | perform ceiling reached                       |
//! | `UserAbort`            | no          | `AbortReason::User` unwound                   |
//! | `ResetRequested`       | no          | `AbortReason::Reset` unwound                  |
//! | `RecoveryExhausted`    | no          | more failures than `max_recovery_retries`     |
//! | `ReplanFailed`         | no          | a recovery search ended without a path        |
//! | `MissingExecutor`      | no          | no executor registered for a move kind        |

use thiserror::Error;

use vn_core::BlockPos;
use vn_search::{MoveKind, PathStatus};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExecError {
    #[error("{kind} move at index {index} never aligned")]
    AlignmentFailure { index: usize, kind: MoveKind },

    #[error("interaction at {target} cancelled during move {index}")]
    CancelledInteraction { index: usize, target: BlockPos },

    #[error("move {index} timed out after {ticks} ticks")]
    MoveTimedOut { index: usize, ticks: u32 },

    #[error("execution aborted by user")]
    UserAbort,

    #[error("reset requested")]
    ResetRequested,

    #[error("recovery gave up after {retries} retries")]
    RecoveryExhausted { retries: u32 },

    #[error("recovery search ended with status {status}")]
    ReplanFailed { status: PathStatus },

    #[error("no executor registered for {0} moves")]
    MissingExecutor(MoveKind),
}

impl ExecError {
    /// Failures that are routed into recovery instead of ending execution.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExecError::CancelledInteraction { .. } | ExecError::MoveTimedOut { .. })
    }

    /// Index of the move that failed, for per-move failures.
    pub fn index(&self) -> Option<usize> {
        match self {
            ExecError::AlignmentFailure { index, .. }
            | ExecError::CancelledInteraction { index, .. }
            | ExecError::MoveTimedOut { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type ExecResult<T> = Result<T, ExecError>;
