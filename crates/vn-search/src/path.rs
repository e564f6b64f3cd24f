//! Search results.

use std::fmt;
use std::time::Duration;

use vn_core::ChunkId;

use crate::Move;

/// Outcome of one `compute()` / `advance()` call.
///
/// `Partial` and `PartialSuccess` are deliberately distinct: the first means
/// "call again, the search is not finished", the second means "this sub-path
/// is final, execute it and the producer will start the next leg".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathStatus {
    /// The last move satisfies the goal.
    Success,
    /// Slice budget spent; `moves` lead to the best node found so far and the
    /// search state is retained.
    Partial,
    /// A depth-capped sub-search ended short of the goal.
    PartialSuccess,
    /// Frontier exhausted; `moves` is empty.
    NoPath,
    /// Global iteration or wall-clock budget spent; `moves` lead to the best
    /// node found.
    Timeout,
}

impl PathStatus {
    /// `true` when calling `advance()` again on the same producer does more
    /// work.
    pub fn is_pending(self) -> bool {
        matches!(self, PathStatus::Partial)
    }

    /// `true` when the moves should be executed.
    pub fn is_executable(self) -> bool {
        matches!(self, PathStatus::Success | PathStatus::PartialSuccess)
    }
}

impl fmt::Display for PathStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PathStatus::Success        => "success",
            PathStatus::Partial        => "partial",
            PathStatus::PartialSuccess => "partial_success",
            PathStatus::NoPath         => "no_path",
            PathStatus::Timeout        => "timeout",
        })
    }
}

/// Diagnostics about the search that produced a path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub open_len:       usize,
    pub closed_len:     usize,
    /// Chunks read while expanding, sorted.  The driving loop uses these to
    /// decide whether a newly loaded chunk invalidates the search.
    pub touched_chunks: Vec<ChunkId>,
}

impl SearchStats {
    pub fn touched(&self, chunk: ChunkId) -> bool {
        self.touched_chunks.binary_search(&chunk).is_ok()
    }
}

#[derive(Clone, Debug)]
pub struct Path {
    pub status:          PathStatus,
    /// `g` of the last move, or 0 for an empty path.
    pub cost:            f64,
    /// Wall-clock time spent in the search so far.
    pub calc_time:       Duration,
    pub visited_nodes:   usize,
    pub generated_nodes: usize,
    /// Start node excluded; the first move's entry is the start position.
    pub moves:           Vec<Move>,
    pub stats:           SearchStats,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }
}
