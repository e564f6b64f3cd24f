//! Feasibility and pricing helpers shared by every provider.
//!
//! [`Rules`] is the slice of [`PathConfig`] the providers need; each provider
//! owns a clone.  [`Terrain`] pairs it with the world for one expansion and
//! answers the three questions every primitive asks:
//!
//! | Question                        | Method                     |
//! |---------------------------------|----------------------------|
//! | Can the body occupy this block? | [`Terrain::clear`]         |
//! | Is there (or can there be) floor? | [`Terrain::support`]     |
//! | What does the transition cost?  | [`Terrain::price`]         |
//!
//! `clear` and `support` append the break and place intents they rely on,
//! so a provider builds its candidate's intent lists as a side effect of
//! checking feasibility.

use vn_core::{BlockInfo, BlockPos, CostConfig, MovementConfig, PathConfig, PlaceIntent, World};

/// Movement limits and the cost model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rules {
    pub movement: MovementConfig,
    pub costs:    CostConfig,
}

impl Rules {
    pub fn new(movement: MovementConfig, costs: CostConfig) -> Self {
        Self { movement, costs }
    }

    pub fn from_config(config: &PathConfig) -> Self {
        Self::new(config.movement.clone(), config.costs.clone())
    }
}

// ── Terrain ───────────────────────────────────────────────────────────────────

/// World queries with the movement rules applied.
#[derive(Copy, Clone)]
pub struct Terrain<'a> {
    world: &'a dyn World,
    rules: &'a Rules,
}

impl<'a> Terrain<'a> {
    pub fn new(world: &'a dyn World, rules: &'a Rules) -> Self {
        Self { world, rules }
    }

    #[inline]
    pub fn info(&self, pos: BlockPos) -> BlockInfo {
        self.world.block_info(pos)
    }

    #[inline]
    pub fn passable(&self, pos: BlockPos) -> bool {
        self.info(pos).is_passable()
    }

    #[inline]
    pub fn standable(&self, pos: BlockPos) -> bool {
        self.info(pos).is_standable()
    }

    #[inline]
    pub fn liquid(&self, pos: BlockPos) -> bool {
        let info = self.info(pos);
        info.loaded && info.liquid
    }

    /// The block can be dug out without flooding or touching something
    /// indestructible.
    pub fn breakable(&self, pos: BlockPos) -> bool {
        if !self.rules.movement.allow_break {
            return false;
        }
        let info = self.info(pos);
        if !info.loaded || !info.physical || info.liquid {
            return false;
        }
        if !matches!(self.world.block(pos), Some(block) if block.diggable) {
            return false;
        }
        !self.info(pos.above()).liquid
    }

    /// The body may occupy `pos`, breaking it first if needed.  A required
    /// break is appended to `breaks`.
    pub fn clear(&self, pos: BlockPos, breaks: &mut Vec<BlockPos>) -> bool {
        if self.passable(pos) {
            return true;
        }
        if self.breakable(pos) {
            breaks.push(pos);
            return true;
        }
        false
    }

    /// There is floor at `floor`, or a block can be placed there.
    ///
    /// `stand_on` is the block the agent is standing on; it is preferred as
    /// the face to click when it touches `floor`.  `remaining` is the move's
    /// starting block count, and `places` already holds this move's earlier
    /// intents.
    pub fn support(
        &self,
        floor:     BlockPos,
        stand_on:  BlockPos,
        remaining: u32,
        places:    &mut Vec<PlaceIntent>,
    ) -> bool {
        if self.standable(floor) {
            return true;
        }
        if !self.rules.movement.allow_place || places.len() as u32 >= remaining {
            return false;
        }
        let target = self.info(floor);
        let open = target.is_passable() || (target.loaded && target.safe && target.replaceable);
        if !open || target.liquid {
            return false;
        }
        match self.against(floor, stand_on) {
            Some(against) => {
                places.push(PlaceIntent { pos: floor, against });
                true
            }
            None => false,
        }
    }

    /// A physical neighbour of `pos` to place against.
    pub fn against(&self, pos: BlockPos, preferred: BlockPos) -> Option<BlockPos> {
        let neighbours = [
            pos.below(),
            pos.offset(1, 0, 0),
            pos.offset(-1, 0, 0),
            pos.offset(0, 0, 1),
            pos.offset(0, 0, -1),
        ];
        std::iter::once(preferred)
            .filter(|p| p.manhattan(pos) == 1)
            .chain(neighbours)
            .find(|p| self.info(*p).physical)
    }

    /// Escalated cost of a transition, `None` when it is over the ceiling.
    pub fn price(&self, base: f64, breaks: usize, places: usize, liquid: bool) -> Option<f64> {
        let c = &self.rules.costs;
        let mut raw = base + c.break_cost * breaks as f64 + c.place_cost * places as f64;
        if liquid {
            raw += c.liquid_cost;
        }
        c.escalate(raw)
    }

    pub fn rules(&self) -> &Rules {
        self.rules
    }
}
