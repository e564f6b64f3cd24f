//! Moves that change height: jump up, drop down, pillar and dig down.
//!
//! | Provider              | Destination              | Interactions                       |
//! |-----------------------|--------------------------|------------------------------------|
//! | [`JumpUpProvider`]    | one block up, one across | breaks headroom, places support    |
//! | [`DropDownProvider`]  | 1..=`max_drop` down      | none                               |
//! | [`PillarProvider`]    | straight up one block    | places under self, breaks headroom |
//! | [`DigDownProvider`]   | straight down one block  | breaks the floor                   |

use vn_core::{BlockPos, PlaceIntent, CARDINALS};
use vn_search::{Candidate, ExpandContext, Move, MoveKind, MovementProvider};

use crate::{Rules, Terrain};

// ── JumpUp ────────────────────────────────────────────────────────────────────

pub struct JumpUpProvider {
    rules: Rules,
}

impl JumpUpProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl MovementProvider for JumpUpProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::JumpUp
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        if !t.standable(p.below()) {
            return;
        }
        let mut headroom = Vec::new();
        if !t.clear(p.up(2), &mut headroom) {
            return;
        }
        for dir in CARDINALS {
            let floor = p + dir;
            let to = floor.above();
            let mut breaks = headroom.clone();
            if !t.clear(to, &mut breaks) || !t.clear(to.above(), &mut breaks) {
                continue;
            }
            let mut places = Vec::new();
            if !t.support(floor, p.below(), from.remaining_blocks(), &mut places) {
                continue;
            }
            let base = self.rules.costs.walk + self.rules.costs.jump;
            let Some(cost) = t.price(base, breaks.len(), places.len(), false) else {
                continue;
            };
            out.push(
                Candidate::new(MoveKind::JumpUp, p, to, cost)
                    .with_breaks(breaks)
                    .with_places(places),
            );
        }
    }
}

// ── DropDown ──────────────────────────────────────────────────────────────────

pub struct DropDownProvider {
    rules: Rules,
}

impl DropDownProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    /// Landing feet position when stepping off into `column`, if any.
    fn landing(&self, t: &Terrain<'_>, column: BlockPos) -> Option<(BlockPos, bool)> {
        for n in 1..=self.rules.movement.max_drop {
            let feet = column.down(n);
            if !t.passable(feet) {
                return None;
            }
            if t.liquid(feet) {
                return Some((feet, true));
            }
            if t.standable(feet.below()) {
                return Some((feet, false));
            }
        }
        None
    }
}

impl MovementProvider for DropDownProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::DropDown
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        for dir in CARDINALS {
            let column = p + dir;
            if !t.passable(column) || !t.passable(column.above()) {
                continue;
            }
            let Some((feet, liquid)) = self.landing(&t, column) else {
                continue;
            };
            let depth = (p.y - feet.y) as f64;
            let c = &self.rules.costs;
            if let Some(cost) = t.price(c.walk + c.fall_per_block * depth, 0, 0, liquid) {
                out.push(Candidate::new(MoveKind::DropDown, p, feet, cost));
            }
        }
    }
}

// ── Pillar ────────────────────────────────────────────────────────────────────

pub struct PillarProvider {
    rules: Rules,
}

impl PillarProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl MovementProvider for PillarProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::Pillar
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        let m = &self.rules.movement;
        if !m.allow_pillar || !m.allow_place || from.remaining_blocks() == 0 {
            return;
        }
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        if !t.standable(p.below()) || t.liquid(p) {
            return;
        }
        let mut breaks = Vec::new();
        if !t.clear(p.up(2), &mut breaks) {
            return;
        }
        let place = PlaceIntent { pos: p, against: p.below() };
        if let Some(cost) = t.price(self.rules.costs.jump, breaks.len(), 1, false) {
            out.push(
                Candidate::new(MoveKind::Pillar, p, p.above(), cost)
                    .with_breaks(breaks)
                    .with_places(vec![place]),
            );
        }
    }
}

// ── DigDown ───────────────────────────────────────────────────────────────────

pub struct DigDownProvider {
    rules: Rules,
}

impl DigDownProvider {
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }
}

impl MovementProvider for DigDownProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::DigDown
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        if !self.rules.movement.allow_dig_down {
            return;
        }
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        let floor = p.below();
        if !t.breakable(floor) || !t.standable(p.down(2)) {
            return;
        }
        if let Some(cost) = t.price(self.rules.costs.fall_per_block, 1, 0, false) {
            out.push(Candidate::new(MoveKind::DigDown, p, floor, cost).with_breaks(vec![floor]));
        }
    }
}
