//! `Sandbox` — an in-memory [`Host`] for tests and demos.
//!
//! The sandbox owns a [`VoxelWorld`], a [`KinematicSimulator`] and the
//! player's state.  The caller drives it one tick at a time:
//!
//! ```rust,ignore
//! loop {
//!     let status = engine.tick(&mut sandbox, &goal);   // decide controls
//!     sandbox.advance();                               // apply physics
//!     if status.is_terminal() { break; }
//! }
//! ```
//!
//! # Interactions
//!
//! Breaks take `1 + ceil(hardness * 4)` ticks, places one tick.  A place is
//! cancelled if the scaffold would overlap the player or no blocks are left.
//! Tests inject failures with [`Sandbox::sabotage`], which cancels the next
//! interaction targeting a position.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use vn_core::{
    Aabb, BlockPos, ControlState, Host, Interaction, InteractionId, InteractionStatus,
    PlayerState, Simulator, Tick, Vec3, World,
};

use crate::{BlockKind, KinematicSimulator, VoxelWorld};

struct Pending {
    interaction: Interaction,
    ticks_left:  u32,
    doomed:      bool,
}

pub struct Sandbox {
    world:        VoxelWorld,
    simulator:    KinematicSimulator,
    player:       PlayerState,
    controls:     ControlState,
    tick:         Tick,
    placeable:    u32,
    scaffold:     BlockKind,
    next_id:      u32,
    active:       BTreeMap<InteractionId, Pending>,
    finished:     FxHashMap<InteractionId, InteractionStatus>,
    sabotaged:    FxHashSet<BlockPos>,
    sabotage_all: bool,
    issued:       Vec<Interaction>,
}

impl Sandbox {
    /// Player standing at rest on the block below `start`.
    pub fn new(world: VoxelWorld, start: BlockPos) -> Self {
        Self {
            world,
            simulator:    KinematicSimulator,
            player:       PlayerState::standing_at(start),
            controls:     ControlState::default(),
            tick:         Tick::ZERO,
            placeable:    0,
            scaffold:     BlockKind::Dirt,
            next_id:      0,
            active:       BTreeMap::new(),
            finished:     FxHashMap::default(),
            sabotaged:    FxHashSet::default(),
            sabotage_all: false,
            issued:       Vec::new(),
        }
    }

    pub fn with_placeable(mut self, blocks: u32) -> Self {
        self.placeable = blocks;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn voxels(&self) -> &VoxelWorld {
        &self.world
    }

    pub fn voxels_mut(&mut self) -> &mut VoxelWorld {
        &mut self.world
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn set_player(&mut self, player: PlayerState) {
        self.player = player;
    }

    /// Every interaction issued so far, in order.
    pub fn issued(&self) -> &[Interaction] {
        &self.issued
    }

    /// Interactions still in flight.
    pub fn active_interactions(&self) -> usize {
        self.active.len()
    }

    // ── Failure injection ─────────────────────────────────────────────────

    /// Cancel the next interaction that targets `pos`.
    pub fn sabotage(&mut self, pos: BlockPos) {
        self.sabotaged.insert(pos);
    }

    /// Cancel every interaction while `on` is set.
    pub fn sabotage_all(&mut self, on: bool) {
        self.sabotage_all = on;
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance one tick: step physics with the held controls, then progress
    /// interactions.
    pub fn advance(&mut self) {
        self.player = self.simulator.step(&self.world, &self.player, &self.controls);
        self.tick.advance();

        let ids: Vec<InteractionId> = self.active.keys().copied().collect();
        for id in ids {
            let Some(pending) = self.active.get_mut(&id) else {
                continue;
            };
            let status = if pending.doomed {
                InteractionStatus::Cancelled
            } else {
                pending.ticks_left = pending.ticks_left.saturating_sub(1);
                if pending.ticks_left > 0 {
                    continue;
                }
                let interaction = pending.interaction;
                self.apply(interaction)
            };
            trace!(%id, ?status, tick = %self.tick, "interaction finished");
            self.active.remove(&id);
            self.finished.insert(id, status);
        }
    }

    /// Advance `n` ticks.
    pub fn run(&mut self, n: u32) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn apply(&mut self, interaction: Interaction) -> InteractionStatus {
        match interaction {
            Interaction::Break(pos) => {
                self.world.set(pos, BlockKind::Air);
                InteractionStatus::Done
            }
            Interaction::Place(intent) => {
                let target = self.world.block_info(intent.pos);
                let origin = Vec3::new(intent.pos.x as f64, intent.pos.y as f64, intent.pos.z as f64);
                let hull = Aabb::FULL.translate(origin);
                let blocked = !(target.is_passable() || target.replaceable)
                    || self.player.aabb().intersects(&hull)
                    || !self.world.block_info(intent.against).physical;
                if self.placeable == 0 || blocked {
                    return InteractionStatus::Cancelled;
                }
                self.world.set(intent.pos, self.scaffold);
                self.placeable -= 1;
                InteractionStatus::Done
            }
        }
    }
}

impl Host for Sandbox {
    fn world(&self) -> &dyn World {
        &self.world
    }

    fn simulator(&self) -> &dyn Simulator {
        &self.simulator
    }

    fn player(&self) -> &PlayerState {
        &self.player
    }

    fn controls(&self) -> &ControlState {
        &self.controls
    }

    fn set_controls(&mut self, controls: ControlState) {
        self.controls = controls;
    }

    fn look(&mut self, yaw: f64, pitch: f64) {
        self.player.yaw = yaw;
        self.player.pitch = pitch;
    }

    fn placeable_blocks(&self) -> u32 {
        self.placeable
    }

    fn begin_interaction(&mut self, interaction: Interaction) -> InteractionId {
        let id = InteractionId(self.next_id);
        self.next_id += 1;
        self.issued.push(interaction);

        let ticks = self.estimate_ticks(&interaction, u32::MAX - 1);
        if ticks == u32::MAX {
            self.finished.insert(id, InteractionStatus::Cancelled);
            return id;
        }
        let doomed = self.sabotage_all || self.sabotaged.remove(&interaction.target());
        self.active.insert(id, Pending { interaction, ticks_left: ticks.max(1), doomed });
        id
    }

    fn poll_interaction(&mut self, id: InteractionId) -> InteractionStatus {
        if self.active.contains_key(&id) {
            return InteractionStatus::Pending;
        }
        self.finished.get(&id).copied().unwrap_or(InteractionStatus::Cancelled)
    }

    fn cancel_interaction(&mut self, id: InteractionId) {
        if self.active.remove(&id).is_some() {
            self.finished.insert(id, InteractionStatus::Cancelled);
        }
    }

    fn estimate_ticks(&self, interaction: &Interaction, budget: u32) -> u32 {
        match interaction {
            Interaction::Break(pos) => match self.world.block(*pos) {
                Some(block) if block.diggable => 1 + (block.hardness.max(0.0) * 4.0).ceil() as u32,
                _ => budget.saturating_add(1),
            },
            Interaction::Place(_) => 1,
        }
    }
}
