//! Level moves: [`ForwardProvider`] and [`DiagonalProvider`].
//!
//! A forward step may break obstructions at feet and head height and place a
//! bridge block under the destination.  Diagonal steps never interact: both
//! flanking columns and the destination must already be open, and the
//! destination must have floor.

use vn_core::{CARDINALS, DIAGONALS};
use vn_search::{Candidate, ExpandContext, Move, MoveKind, MovementProvider};

use crate::{Rules, Terrain};

// ── Forward ───────────────────────────────────────────────────────────────────

pub struct ForwardProvider {
    rules: Rules,
}

impl ForwardProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl MovementProvider for ForwardProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::Forward
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        for dir in CARDINALS {
            let to = p + dir;
            let mut breaks = Vec::new();
            if !t.clear(to, &mut breaks) || !t.clear(to.above(), &mut breaks) {
                continue;
            }
            // Swimming needs no floor.
            let liquid = breaks.is_empty() && t.liquid(to);
            let mut places = Vec::new();
            if !liquid && !t.support(to.below(), p.below(), from.remaining_blocks(), &mut places) {
                continue;
            }
            let Some(cost) = t.price(self.rules.costs.walk, breaks.len(), places.len(), liquid) else {
                continue;
            };
            out.push(
                Candidate::new(MoveKind::Forward, p, to, cost)
                    .with_breaks(breaks)
                    .with_places(places),
            );
        }
    }
}

// ── Diagonal ──────────────────────────────────────────────────────────────────

pub struct DiagonalProvider {
    rules: Rules,
}

impl DiagonalProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl MovementProvider for DiagonalProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::Diagonal
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        let open = |pos: vn_core::BlockPos| t.passable(pos) && t.passable(pos.above());
        for dir in DIAGONALS {
            let to = p + dir;
            let flank_x = p.offset(dir.x, 0, 0);
            let flank_z = p.offset(0, 0, dir.z);
            if !open(flank_x) || !open(flank_z) || !open(to) || !t.standable(to.below()) {
                continue;
            }
            if let Some(cost) = t.price(self.rules.costs.diagonal, 0, 0, false) {
                out.push(Candidate::new(MoveKind::Diagonal, p, to, cost));
            }
        }
    }
}
