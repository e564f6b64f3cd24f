//! CSV world loader.
//!
//! # CSV format
//!
//! One row per non-air block.  Rows may appear in any order; a later row for
//! the same position wins.
//!
//! ```csv
//! x,y,z,block
//! 0,-1,0,stone
//! 1,-1,0,stone
//! 3,0,0,bedrock
//! 4,-1,0,water
//! ```
//!
//! **`block`** is one of `air`, `grass`, `stone`, `dirt`, `bedrock`, `water`,
//! `lava`.  Rows outside the requested bounds are an error rather than being
//! silently dropped.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use vn_core::BlockPos;

use crate::{BlockKind, VoxelWorld, WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct BlockRecord {
    x:     i32,
    y:     i32,
    z:     i32,
    block: BlockKind,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a world loaded over `[min, max]` from a CSV file.
pub fn load_world_csv(path: &Path, min: BlockPos, max: BlockPos) -> WorldResult<VoxelWorld> {
    let file = std::fs::File::open(path).map_err(WorldError::Io)?;
    load_world_reader(file, min, max)
}

/// Like [`load_world_csv`] but accepts any `Read` source.
pub fn load_world_reader<R: Read>(reader: R, min: BlockPos, max: BlockPos) -> WorldResult<VoxelWorld> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut world = VoxelWorld::new(min, max);

    for result in csv_reader.deserialize::<BlockRecord>() {
        let row = result.map_err(|e| WorldError::Parse(e.to_string()))?;
        let pos = BlockPos::new(row.x, row.y, row.z);
        if !world.is_loaded(pos) {
            return Err(WorldError::OutOfBounds(pos));
        }
        world.set(pos, row.block);
    }

    Ok(world)
}
