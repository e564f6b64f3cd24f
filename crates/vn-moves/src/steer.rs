//! Steering policy shared by the jump table and the executors.
//!
//! The parkour provider decides feasibility by flying this exact policy
//! through the [`Simulator`], and the executors fly it again for real, so a
//! gap the table accepts is a gap the agent actually clears.

use vn_core::{yaw_towards, BlockPos, ControlState, PlayerState, Simulator, Vec3, World};

/// One tick of steering output.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Steering {
    pub yaw:      f64,
    pub controls: ControlState,
}

/// Face `target` and walk toward it.  Forward is released once the agent
/// is within `arrive` blocks horizontally, so it stops on the spot.
pub fn steer(state: &PlayerState, target: Vec3, arrive: f64, sprint: bool) -> Steering {
    if state.pos.horizontal_distance(target) <= arrive {
        return Steering { yaw: state.yaw, controls: ControlState::default() };
    }
    Steering {
        yaw:      yaw_towards(state.pos, target),
        controls: ControlState { forward: true, sprint, ..ControlState::default() },
    }
}

/// Press jump on the last grounded tick inside the `takeoff` column: the
/// projected next state has left the column or lost the ground.
pub fn jump_at_edge(
    sim:      &dyn Simulator,
    world:    &dyn World,
    state:    &PlayerState,
    steering: &Steering,
    takeoff:  BlockPos,
) -> bool {
    if !state.on_ground || !state.block_pos().same_column(takeoff) {
        return false;
    }
    let probe = PlayerState { yaw: steering.yaw, ..*state };
    let next = sim.step(world, &probe, &steering.controls);
    !next.block_pos().same_column(takeoff) || !next.on_ground
}
