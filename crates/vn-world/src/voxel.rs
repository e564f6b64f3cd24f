//! `VoxelWorld` — a sparse in-memory block store with loaded bounds.
//!
//! Blocks are kept in an `FxHashMap<BlockPos, BlockKind>`; absent positions
//! inside the bounds are air.  Positions outside the inclusive `[min, max]`
//! box answer [`BlockInfo::UNLOADED`], which mimics a bot whose chunk cache
//! has not received that area yet.  Widening the bounds with
//! [`VoxelWorld::load_area`] is how tests simulate a chunk arriving.

use rustc_hash::FxHashMap;

use vn_core::{Block, BlockInfo, BlockPos, ChunkId, World, CHUNK_SIZE};

use crate::BlockKind;

#[derive(Debug)]
pub struct VoxelWorld {
    blocks: FxHashMap<BlockPos, BlockKind>,
    min:    BlockPos,
    max:    BlockPos,
}

impl VoxelWorld {
    /// Empty (all air) world loaded over the inclusive box `[min, max]`.
    pub fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { blocks: FxHashMap::default(), min, max }
    }

    pub fn bounds(&self) -> (BlockPos, BlockPos) {
        (self.min, self.max)
    }

    #[inline]
    pub fn is_loaded(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// Kind at `pos`; air for unset or unloaded positions.
    pub fn get(&self, pos: BlockPos) -> BlockKind {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    /// Set `pos` to `kind` and return the previous kind.  Positions outside
    /// the bounds are ignored and report air.
    pub fn set(&mut self, pos: BlockPos, kind: BlockKind) -> BlockKind {
        if !self.is_loaded(pos) {
            return BlockKind::Air;
        }
        let previous = if kind == BlockKind::Air {
            self.blocks.remove(&pos)
        } else {
            self.blocks.insert(pos, kind)
        };
        previous.unwrap_or_default()
    }

    /// Fill the inclusive box spanned by `a` and `b`.
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, kind: BlockKind) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for z in a.z.min(b.z)..=a.z.max(b.z) {
                    self.set(BlockPos::new(x, y, z), kind);
                }
            }
        }
    }

    /// Grow the loaded bounds to include `[min, max]`.
    pub fn load_area(&mut self, min: BlockPos, max: BlockPos) {
        self.min = BlockPos::new(self.min.x.min(min.x), self.min.y.min(min.y), self.min.z.min(min.z));
        self.max = BlockPos::new(self.max.x.max(max.x), self.max.y.max(max.y), self.max.z.max(max.z));
    }

    /// Load the full column of `chunk` between the current min and max y.
    pub fn load_chunk(&mut self, chunk: ChunkId) {
        let min = BlockPos::new(chunk.x * CHUNK_SIZE, self.min.y, chunk.z * CHUNK_SIZE);
        let max = BlockPos::new(min.x + CHUNK_SIZE - 1, self.max.y, min.z + CHUNK_SIZE - 1);
        self.load_area(min, max);
    }

    /// Number of non-air blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl World for VoxelWorld {
    fn block_info(&self, pos: BlockPos) -> BlockInfo {
        if !self.is_loaded(pos) {
            return BlockInfo::UNLOADED;
        }
        self.get(pos).info()
    }

    fn block(&self, pos: BlockPos) -> Option<Block> {
        self.is_loaded(pos).then(|| self.get(pos).block())
    }
}

// ── VoxelWorldBuilder ─────────────────────────────────────────────────────────

/// Fluent construction of test and demo worlds.
///
/// ```rust,ignore
/// let world = VoxelWorldBuilder::new(BlockPos::new(-2, -2, -2), BlockPos::new(20, 6, 4))
///     .floor(-1, BlockKind::Stone)
///     .fill(BlockPos::new(5, 0, 0), BlockPos::new(5, 1, 4), BlockKind::Bedrock)
///     .build();
/// ```
pub struct VoxelWorldBuilder {
    world: VoxelWorld,
}

impl VoxelWorldBuilder {
    pub fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { world: VoxelWorld::new(min, max) }
    }

    /// Cover the whole loaded x/z area at height `y`.
    pub fn floor(mut self, y: i32, kind: BlockKind) -> Self {
        let (min, max) = self.world.bounds();
        self.world.fill(BlockPos::new(min.x, y, min.z), BlockPos::new(max.x, y, max.z), kind);
        self
    }

    pub fn fill(mut self, a: BlockPos, b: BlockPos, kind: BlockKind) -> Self {
        self.world.fill(a, b, kind);
        self
    }

    pub fn set(mut self, pos: BlockPos, kind: BlockKind) -> Self {
        self.world.set(pos, kind);
        self
    }

    /// Fill from `a` to one block above `b`.  With `a.y == b.y` this is a
    /// two-high wall the agent cannot step over.
    pub fn wall(mut self, a: BlockPos, b: BlockPos, kind: BlockKind) -> Self {
        self.world.fill(a, b.up(1), kind);
        self
    }

    pub fn build(self) -> VoxelWorld {
        self.world
    }
}
