//! `KinematicSimulator` — a small, deterministic player physics model.
//!
//! # Model
//!
//! Each tick:
//!
//! 1. Horizontal velocity is set directly from the pressed controls (no
//!    momentum, full air control): walk 0.2, sprint 0.28, sneak 0.06 blocks
//!    per tick, halved in liquid.
//! 2. `jump` while grounded sets `vel.y = 0.42`; in liquid it swims up.
//! 3. The collision box moves along y, then x, then z.  Each axis is clipped
//!    against every block hull it would enter, the way block games resolve
//!    movement; there is no automatic step-up.
//! 4. Gravity: `vel.y = (vel.y - 0.08) * 0.98` (gentler in liquid).
//!
//! A grounded sprint-jump stays airborne for 12 ticks and rises 1.25 blocks,
//! which is what the parkour jump table and the jump executors rely on.

use vn_core::{Aabb, BlockPos, ControlState, PlayerState, Simulator, Vec3, World};

pub const WALK_SPEED: f64 = 0.2;
pub const SPRINT_SPEED: f64 = 0.28;
pub const SNEAK_SPEED: f64 = 0.06;
pub const JUMP_VELOCITY: f64 = 0.42;
pub const GRAVITY: f64 = 0.08;
pub const DRAG: f64 = 0.98;

const LIQUID_SPEED_FACTOR: f64 = 0.5;
const LIQUID_GRAVITY: f64 = 0.02;
const LIQUID_DRAG: f64 = 0.8;
const SWIM_UP_VELOCITY: f64 = 0.1;
const GROUND_PROBE: f64 = 1e-3;
/// Contacts closer than this count as touching, absorbing float drift from
/// repeated clipping.
const EPSILON: f64 = 1e-7;

#[derive(Copy, Clone, Debug, Default)]
pub struct KinematicSimulator;

impl KinematicSimulator {
    pub fn new() -> Self {
        Self
    }
}

impl Simulator for KinematicSimulator {
    fn step(&self, world: &dyn World, state: &PlayerState, controls: &ControlState) -> PlayerState {
        let mut next = *state;

        // ── Controls → velocity ───────────────────────────────────────────
        let heading = state.heading();
        let right = Vec3::new(-heading.z, 0.0, heading.x);
        let mut input = Vec3::ZERO;
        if controls.forward {
            input = input + heading;
        }
        if controls.back {
            input = input - heading;
        }
        if controls.right {
            input = input + right;
        }
        if controls.left {
            input = input - right;
        }
        let len = input.horizontal_length();
        let mut speed = if controls.sneak {
            SNEAK_SPEED
        } else if controls.sprint && controls.forward {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        };
        if state.in_liquid {
            speed *= LIQUID_SPEED_FACTOR;
        }
        let mut vel = state.vel;
        if len > 1e-9 {
            vel.x = input.x / len * speed;
            vel.z = input.z / len * speed;
        } else {
            vel.x = 0.0;
            vel.z = 0.0;
        }
        if controls.jump {
            if state.in_liquid {
                vel.y = SWIM_UP_VELOCITY;
            } else if state.on_ground {
                vel.y = JUMP_VELOCITY;
            }
        }

        // ── Collision ─────────────────────────────────────────────────────
        let hulls = nearby_hulls(world, state.aabb(), vel);
        let mut bb = state.aabb();

        let dy = clip_axis(&hulls, &bb, Axis::Y, vel.y);
        bb = bb.translate(Vec3::new(0.0, dy, 0.0));
        let dx = clip_axis(&hulls, &bb, Axis::X, vel.x);
        bb = bb.translate(Vec3::new(dx, 0.0, 0.0));
        let dz = clip_axis(&hulls, &bb, Axis::Z, vel.z);
        bb = bb.translate(Vec3::new(0.0, 0.0, dz));

        next.pos = Vec3::new(state.pos.x + dx, state.pos.y + dy, state.pos.z + dz);
        // Grounded: not rising and resting on a hull.
        next.on_ground = vel.y <= 0.0 && clip_axis(&hulls, &bb, Axis::Y, -GROUND_PROBE) > -GROUND_PROBE;
        next.collided_horizontally = dx != vel.x || dz != vel.z;
        if dy != vel.y {
            vel.y = 0.0;
        }
        if dx != vel.x {
            vel.x = 0.0;
        }
        if dz != vel.z {
            vel.z = 0.0;
        }

        // ── Gravity ───────────────────────────────────────────────────────
        let feet = world.block_info(next.pos.block());
        let head = world.block_info(next.pos.block().above());
        next.in_liquid = feet.liquid || head.liquid;
        vel.y = if next.in_liquid {
            (vel.y - LIQUID_GRAVITY) * LIQUID_DRAG
        } else {
            (vel.y - GRAVITY) * DRAG
        };
        next.vel = vel;
        next
    }
}

// ── Collision helpers ─────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
enum Axis {
    X,
    Y,
    Z,
}

#[inline]
fn lo(b: &Aabb, axis: Axis) -> f64 {
    match axis {
        Axis::X => b.min.x,
        Axis::Y => b.min.y,
        Axis::Z => b.min.z,
    }
}

#[inline]
fn hi(b: &Aabb, axis: Axis) -> f64 {
    match axis {
        Axis::X => b.max.x,
        Axis::Y => b.max.y,
        Axis::Z => b.max.z,
    }
}

/// Overlap (beyond `EPSILON`) on the two axes other than `axis`.
fn overlaps_across(a: &Aabb, b: &Aabb, axis: Axis) -> bool {
    let span = |axis| lo(a, axis) < hi(b, axis) - EPSILON && hi(a, axis) > lo(b, axis) + EPSILON;
    match axis {
        Axis::X => span(Axis::Y) && span(Axis::Z),
        Axis::Y => span(Axis::X) && span(Axis::Z),
        Axis::Z => span(Axis::X) && span(Axis::Y),
    }
}

/// Largest movement up to `delta` along `axis` that does not enter a hull.
fn clip_axis(hulls: &[Aabb], bb: &Aabb, axis: Axis, delta: f64) -> f64 {
    let mut d = delta;
    for hull in hulls {
        if !overlaps_across(bb, hull, axis) {
            continue;
        }
        if d > 0.0 && hi(bb, axis) <= lo(hull, axis) + EPSILON {
            d = d.min(lo(hull, axis) - hi(bb, axis));
        } else if d < 0.0 && lo(bb, axis) >= hi(hull, axis) - EPSILON {
            d = d.max(hi(hull, axis) - lo(bb, axis));
        }
    }
    d
}

/// World-space hulls of every physical block the box could touch this tick.
fn nearby_hulls(world: &dyn World, bb: Aabb, vel: Vec3) -> Vec<Aabb> {
    let reach = vel.length() + 1.0;
    let min = Vec3::new(bb.min.x - reach, bb.min.y - reach, bb.min.z - reach);
    let max = Vec3::new(bb.max.x + reach, bb.max.y + reach, bb.max.z + reach);
    let mut hulls = Vec::new();
    for x in min.x.floor() as i32..=max.x.floor() as i32 {
        for y in min.y.floor() as i32..=max.y.floor() as i32 {
            for z in min.z.floor() as i32..=max.z.floor() as i32 {
                let pos = BlockPos::new(x, y, z);
                let info = world.block_info(pos);
                if !info.physical {
                    continue;
                }
                if let Some(hull) = info.bounding_box {
                    hulls.push(hull.translate(Vec3::new(x as f64, y as f64, z as f64)));
                }
            }
        }
    }
    hulls
}
