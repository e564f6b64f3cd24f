//! Path optimizer: ordered passes that collapse runs of compatible moves.
//!
//! | Pass                   | Kind       | Merges                                            |
//! |------------------------|------------|---------------------------------------------------|
//! | [`MergeStraightRuns`]  | `Forward`  | collinear level steps, no places, breaks in reach |
//! | [`MergeDiagonalRuns`]  | `Diagonal` | repeated identical diagonal steps                 |
//!
//! Passes are keyed by the move kind they rewrite: at most one per kind,
//! run in registration order, and only over paths that contain that kind.
//! A merged move keeps the window's
//! first entry and last exit, the last `g`, and every break and place
//! intent in order (see [`Move::merge_window`]), so the rewritten path
//! starts and ends where the original did and performs the same
//! interactions.

use tracing::debug;

use vn_core::MovementConfig;
use vn_search::{Move, MoveKind, Path};

/// One rewrite over a whole move sequence.
pub trait OptimizerPass: Send + Sync {
    /// The move kind this pass rewrites.  Registering a second pass for the
    /// same kind replaces the first.
    fn kind(&self) -> MoveKind;

    fn name(&self) -> &'static str;

    /// Return the rewritten sequence.  Must return `moves` unchanged when
    /// nothing matches.
    fn apply(&self, moves: Vec<Move>) -> Vec<Move>;
}

// ── Window merging ────────────────────────────────────────────────────────────

/// Group consecutive moves while `joins(window, next)` holds and merge each
/// group of two or more.
fn merge_runs(moves: Vec<Move>, joins: impl Fn(&[Move], &Move) -> bool) -> Vec<Move> {
    let mut out = Vec::with_capacity(moves.len());
    let mut window: Vec<Move> = Vec::new();
    for mv in moves {
        if !window.is_empty() && !joins(&window, &mv) {
            flush(&mut window, &mut out);
        }
        window.push(mv);
    }
    flush(&mut window, &mut out);
    out
}

fn flush(window: &mut Vec<Move>, out: &mut Vec<Move>) {
    if window.len() > 1 {
        if let Some(merged) = Move::merge_window(window) {
            out.push(merged);
            window.clear();
            return;
        }
    }
    out.append(window);
}

/// `next` continues the window in the same direction and at the same height.
fn continues(window: &[Move], next: &Move, kind: MoveKind) -> bool {
    let (Some(first), Some(last)) = (window.first(), window.last()) else {
        return false;
    };
    first.kind() == kind
        && next.kind() == kind
        && next.entry() == last.exit()
        && next.delta() == first.delta()
        && first.delta().y == 0
}

// ── MergeStraightRuns ─────────────────────────────────────────────────────────

/// Collapse collinear `Forward` steps.  A step that places a block, or whose
/// breaks are out of reach from the run's entry, ends the run.
pub struct MergeStraightRuns {
    reach: f64,
}

impl MergeStraightRuns {
    pub fn new(reach: f64) -> Self {
        Self { reach }
    }
}

impl OptimizerPass for MergeStraightRuns {
    fn kind(&self) -> MoveKind {
        MoveKind::Forward
    }

    fn name(&self) -> &'static str {
        "merge_straight_runs"
    }

    fn apply(&self, moves: Vec<Move>) -> Vec<Move> {
        let reach_sq = self.reach * self.reach;
        let in_reach = |first: &Move, mv: &Move| {
            let origin = first.entry().center();
            mv.breaks().iter().all(|b| {
                let d = b.center() - origin;
                d.dot(d) <= reach_sq
            })
        };
        merge_runs(moves, |window, next| {
            let Some(first) = window.first() else {
                return false;
            };
            continues(window, next, MoveKind::Forward)
                && first.places().is_empty()
                && next.places().is_empty()
                && in_reach(first, first)
                && in_reach(first, next)
        })
    }
}

// ── MergeDiagonalRuns ─────────────────────────────────────────────────────────

/// Collapse repeated identical `Diagonal` steps.
pub struct MergeDiagonalRuns;

impl OptimizerPass for MergeDiagonalRuns {
    fn kind(&self) -> MoveKind {
        MoveKind::Diagonal
    }

    fn name(&self) -> &'static str {
        "merge_diagonal_runs"
    }

    fn apply(&self, moves: Vec<Move>) -> Vec<Move> {
        merge_runs(moves, |window, next| continues(window, next, MoveKind::Diagonal))
    }
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Optimizer {
    passes: Vec<Box<dyn OptimizerPass>>,
}

impl Optimizer {
    /// No passes: `optimize` returns its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight runs, then diagonal runs.
    pub fn standard(movement: &MovementConfig) -> Self {
        Self::new()
            .with_pass(MergeStraightRuns::new(movement.reach))
            .with_pass(MergeDiagonalRuns)
    }

    /// Register `pass` for its move kind.  A new kind runs after those
    /// already registered; a known kind swaps the old pass out in place.
    pub fn with_pass(mut self, pass: impl OptimizerPass + 'static) -> Self {
        let kind = pass.kind();
        match self.passes.iter_mut().find(|p| p.kind() == kind) {
            Some(slot) => {
                debug!(?kind, old = slot.name(), new = pass.name(), "optimizer pass replaced");
                *slot = Box::new(pass);
            }
            None => self.passes.push(Box::new(pass)),
        }
        self
    }

    /// The pass registered for `kind`, if any.
    pub fn pass(&self, kind: MoveKind) -> Option<&dyn OptimizerPass> {
        self.passes.iter().find(|p| p.kind() == kind).map(|p| &**p)
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn optimize(&self, mut moves: Vec<Move>) -> Vec<Move> {
        let before = moves.len();
        for pass in &self.passes {
            let kind = pass.kind();
            if moves.iter().any(|mv| mv.kind() == kind) {
                moves = pass.apply(moves);
            }
        }
        if moves.len() != before {
            debug!(before, after = moves.len(), "path optimized");
        }
        moves
    }

    /// Optimize a path's moves in place of the original sequence.
    pub fn optimize_path(&self, mut path: Path) -> Path {
        path.moves = self.optimize(std::mem::take(&mut path.moves));
        path
    }
}
