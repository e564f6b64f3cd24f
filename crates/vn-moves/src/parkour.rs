//! Gap jumps: [`ParkourProvider`] and its precomputed [`JumpTable`].
//!
//! # Jump table
//!
//! Built once per provider from the configured [`Simulator`].  For every gap
//! width `1..=max_parkour_gap` and landing drop `0..=1` the agent is flown
//! over a synthetic strip of ground with the shared steering policy:
//!
//! ```text
//!   take-off        gap         landing
//!  ▓▓▓▓▓▓▓▓▓▓ · · · · · · · ▓▓▓▓▓▓▓▓▓▓   y = -1          (drop 0)
//!                           ▓▓▓▓▓▓▓▓▓▓   y = -2          (drop 1)
//!  x ≤ 0      1 ..= gap     x ≥ gap + 1
//! ```
//!
//! A jump is feasible when the first grounded tick after take-off is in the
//! landing column at the landing height.  The search then only consults the
//! table; it never simulates during expansion.

use rustc_hash::FxHashMap;
use tracing::debug;

use vn_core::{
    Block, BlockInfo, BlockPos, ControlState, PlayerState, Simulator, World, CARDINALS,
};
use vn_search::{Candidate, ExpandContext, Move, MoveKind, MovementProvider};

use crate::{jump_at_edge, steer, Rules, Terrain};

/// Ticks a simulated jump may take before it counts as a miss.
const MAX_JUMP_TICKS: u32 = 40;

/// Landing drops the table covers.
const MAX_DROP: i32 = 1;

// ── FlatGround ────────────────────────────────────────────────────────────────

/// The synthetic take-off / landing strip.
struct FlatGround {
    gap:  i32,
    drop: i32,
}

impl FlatGround {
    fn solid(&self, pos: BlockPos) -> bool {
        (pos.y == -1 && pos.x <= 0) || (pos.y == -1 - self.drop && pos.x > self.gap)
    }
}

impl World for FlatGround {
    fn block_info(&self, pos: BlockPos) -> BlockInfo {
        if self.solid(pos) { BlockInfo::SOLID } else { BlockInfo::AIR }
    }

    fn block(&self, pos: BlockPos) -> Option<Block> {
        Some(Block { state_id: self.solid(pos) as u32, diggable: false, hardness: -1.0 })
    }
}

// ── JumpTable ─────────────────────────────────────────────────────────────────

/// Feasible `(gap, drop)` pairs and the ticks each jump takes.
#[derive(Clone, Debug, Default)]
pub struct JumpTable {
    landings: FxHashMap<(i32, i32), u32>,
    max_gap:  i32,
}

impl JumpTable {
    /// Simulate every gap up to `max_gap`.  `arrive` is the executors'
    /// arrive distance, so the simulated flight matches the real one.
    pub fn compute(sim: &dyn Simulator, max_gap: i32, arrive: f64) -> Self {
        let mut landings = FxHashMap::default();
        for gap in 1..=max_gap {
            for drop in 0..=MAX_DROP {
                if let Some(ticks) = fly(sim, gap, drop, arrive) {
                    landings.insert((gap, drop), ticks);
                }
            }
        }
        debug!(max_gap, feasible = landings.len(), "jump table computed");
        Self { landings, max_gap }
    }

    #[inline]
    pub fn feasible(&self, gap: i32, drop: i32) -> bool {
        self.landings.contains_key(&(gap, drop))
    }

    /// Ticks from the first steering tick to landing.
    pub fn ticks(&self, gap: i32, drop: i32) -> Option<u32> {
        self.landings.get(&(gap, drop)).copied()
    }

    pub fn max_gap(&self) -> i32 {
        self.max_gap
    }

    pub fn len(&self) -> usize {
        self.landings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landings.is_empty()
    }
}

fn fly(sim: &dyn Simulator, gap: i32, drop: i32, arrive: f64) -> Option<u32> {
    let ground = FlatGround { gap, drop };
    let takeoff = BlockPos::new(0, 0, 0);
    let target = BlockPos::new(gap + 1, -drop, 0).center();
    let mut state = PlayerState::standing_at(takeoff);
    let mut airborne = false;

    for tick in 1..=MAX_JUMP_TICKS {
        let steering = steer(&state, target, arrive, true);
        let jump = jump_at_edge(sim, &ground, &state, &steering, takeoff);
        let controls = ControlState { jump, ..steering.controls };
        state.yaw = steering.yaw;
        state = sim.step(&ground, &state, &controls);
        if !state.on_ground {
            airborne = true;
            continue;
        }
        if airborne {
            let landed = state.block_pos();
            return (landed.x == gap + 1 && landed.y == -drop).then_some(tick);
        }
    }
    None
}

// ── ParkourProvider ───────────────────────────────────────────────────────────

pub struct ParkourProvider {
    rules: Rules,
    table: JumpTable,
}

impl ParkourProvider {
    pub fn new(rules: Rules, table: JumpTable) -> Self {
        Self { rules, table }
    }

    pub fn table(&self) -> &JumpTable {
        &self.table
    }
}

impl MovementProvider for ParkourProvider {
    fn kind(&self) -> MoveKind {
        MoveKind::Parkour
    }

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        if !self.rules.movement.allow_parkour {
            return;
        }
        let t = Terrain::new(ctx.world, &self.rules);
        let p = from.pos();
        if !t.standable(p.below()) || !t.passable(p.up(2)) {
            return;
        }
        let max_gap = self.rules.movement.max_parkour_gap.min(self.table.max_gap());
        let open = |pos: BlockPos| t.passable(pos) && t.passable(pos.above()) && t.passable(pos.up(2));

        for dir in CARDINALS {
            for gap in 1..=max_gap {
                let cell = p.offset(dir.x * gap, 0, dir.z * gap);
                if !open(cell) || t.standable(cell.below()) {
                    break;
                }
                let land = p.offset(dir.x * (gap + 1), 0, dir.z * (gap + 1));
                if !open(land) {
                    continue;
                }
                let landing = if t.standable(land.below()) {
                    Some((land, 0))
                } else if t.passable(land.below()) && t.standable(land.down(2)) {
                    Some((land.below(), 1))
                } else {
                    None
                };
                let Some((to, drop)) = landing else {
                    continue;
                };
                if self.table.feasible(gap, drop) {
                    let c = &self.rules.costs;
                    let base = c.walk * (gap + 1) as f64 + c.jump + c.fall_per_block * drop as f64;
                    if let Some(cost) = t.price(base, 0, 0, false) {
                        out.push(Candidate::new(MoveKind::Parkour, p, to, cost));
                    }
                }
                break;
            }
        }
    }
}
