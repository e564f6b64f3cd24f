//! Seeded obstacle scatter for demo and stress worlds.
//!
//! Uses `SmallRng::seed_from_u64`, so the same seed always produces the same
//! layout on every platform.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use vn_core::BlockPos;

use crate::{BlockKind, VoxelWorld};

/// Options for [`scatter_obstacles`].
#[derive(Clone, Debug)]
pub struct Scatter {
    pub seed:    u64,
    /// Probability that a column receives an obstacle, in `[0, 1]`.
    pub density: f64,
    /// Feet level the obstacles stand on; they occupy `y` and `y + 1`.
    pub y:       i32,
    pub kind:    BlockKind,
    /// Columns that must stay free (start, goal).
    pub keep_clear: Vec<BlockPos>,
}

impl Scatter {
    pub fn new(seed: u64, density: f64) -> Self {
        Self { seed, density, y: 0, kind: BlockKind::Stone, keep_clear: Vec::new() }
    }

    pub fn at_height(mut self, y: i32) -> Self {
        self.y = y;
        self
    }

    pub fn with_kind(mut self, kind: BlockKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn keep_clear(mut self, pos: BlockPos) -> Self {
        self.keep_clear.push(pos);
        self
    }
}

/// Drop two-high obstacles over the world's x/z area.  Returns how many
/// columns were filled.
pub fn scatter_obstacles(world: &mut VoxelWorld, options: &Scatter) -> usize {
    let mut rng = SmallRng::seed_from_u64(options.seed);
    let density = options.density.clamp(0.0, 1.0);
    let (min, max) = world.bounds();
    let mut placed = 0;
    for x in min.x..=max.x {
        for z in min.z..=max.z {
            // Draw for every column so the layout does not depend on
            // `keep_clear`.
            let hit = rng.gen_bool(density);
            let pos = BlockPos::new(x, options.y, z);
            if !hit || options.keep_clear.iter().any(|c| c.x == x && c.z == z) {
                continue;
            }
            world.set(pos, options.kind);
            world.set(pos.above(), options.kind);
            placed += 1;
        }
    }
    placed
}
