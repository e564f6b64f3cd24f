//! Agent kinematic state, control inputs, and the `Simulator` capability.
//!
//! # Heading convention
//!
//! `yaw` is measured in radians in the x/z plane; the facing vector is
//! `(cos yaw, 0, sin yaw)`.  So yaw 0 faces +x and yaw π/2 faces +z.

use crate::{Aabb, BlockPos, Vec3, World};

/// Half the agent's horizontal footprint.
pub const PLAYER_HALF_WIDTH: f64 = 0.3;

/// Agent height in blocks.
pub const PLAYER_HEIGHT: f64 = 1.8;

// ── PlayerState ───────────────────────────────────────────────────────────────

/// Kinematic snapshot of the agent.  `pos` is the feet-level centre.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct PlayerState {
    pub pos:                   Vec3,
    pub vel:                   Vec3,
    pub yaw:                   f64,
    pub pitch:                 f64,
    pub on_ground:             bool,
    pub in_liquid:             bool,
    pub collided_horizontally: bool,
}

impl PlayerState {
    /// At rest on the block below `pos`, centred in its column.
    pub fn standing_at(pos: BlockPos) -> Self {
        Self {
            pos:       pos.center(),
            on_ground: true,
            ..Self::default()
        }
    }

    /// The block occupied by the agent's feet.
    #[inline]
    pub fn block_pos(&self) -> BlockPos {
        self.pos.block()
    }

    /// Grounded or floating — the states in which it is safe to stop.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.on_ground || self.in_liquid
    }

    /// Unit facing vector in the x/z plane.
    #[inline]
    pub fn heading(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// World-space collision box.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            Vec3::new(self.pos.x - PLAYER_HALF_WIDTH, self.pos.y, self.pos.z - PLAYER_HALF_WIDTH),
            Vec3::new(
                self.pos.x + PLAYER_HALF_WIDTH,
                self.pos.y + PLAYER_HEIGHT,
                self.pos.z + PLAYER_HALF_WIDTH,
            ),
        )
    }
}

/// Yaw that faces from `from` towards `to` (ignoring y).
#[inline]
pub fn yaw_towards(from: Vec3, to: Vec3) -> f64 {
    (to.z - from.z).atan2(to.x - from.x)
}

// ── ControlState ──────────────────────────────────────────────────────────────

/// Movement control flags, as a bot client would press them.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct ControlState {
    pub forward: bool,
    pub back:    bool,
    pub left:    bool,
    pub right:   bool,
    pub jump:    bool,
    pub sprint:  bool,
    pub sneak:   bool,
}

impl ControlState {
    /// `true` when no control is engaged.
    #[inline]
    pub fn is_idle(&self) -> bool {
        *self == ControlState::default()
    }

    /// Forward only.
    #[inline]
    pub fn walk() -> Self {
        Self { forward: true, ..Self::default() }
    }
}

// ── Simulator ─────────────────────────────────────────────────────────────────

/// Physics capability: advance a kinematic state by one tick.
///
/// Used by executors to predict whether a move is complete, and by the
/// parkour provider to precompute jump arcs.
pub trait Simulator: Send + Sync {
    /// Return the state one tick after `state` with `controls` held.
    fn step(&self, world: &dyn World, state: &PlayerState, controls: &ControlState) -> PlayerState;

    /// Step `ticks` times with the same controls.
    fn simulate(
        &self,
        world:    &dyn World,
        state:    &PlayerState,
        controls: &ControlState,
        ticks:    u32,
    ) -> PlayerState {
        let mut s = *state;
        for _ in 0..ticks {
            s = self.step(world, &s, controls);
        }
        s
    }
}
