//! The `World` capability — read-only block queries.
//!
//! The search calls [`World::block_info`] many thousands of times per slice,
//! so implementations should answer from an in-memory cache and must not
//! block or mutate anything.  Blocks outside the loaded area report
//! [`BlockInfo::UNLOADED`], which every movement provider treats as
//! impassable and unsafe.

use crate::{BlockPos, Vec3};

// ── Aabb ──────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit cube occupying block-local `[0, 1)³`.
    pub const FULL: Aabb = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));

    #[inline]
    pub fn translate(self, by: Vec3) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }

    /// Strict overlap test: boxes that merely touch do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

// ── BlockInfo ─────────────────────────────────────────────────────────────────

/// The predicates the search consumes for one block.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BlockInfo {
    /// Has a collision shape (walls, floors).
    pub physical: bool,
    /// Water-like: passable, supports swimming.
    pub liquid: bool,
    /// Can be placed into directly (air, tall grass).
    pub replaceable: bool,
    /// Standing in or next to it is harmless (false for lava, fire, unloaded).
    pub safe: bool,
    /// `false` when the chunk is not available to the world cache.
    pub loaded: bool,
    /// Top of the collision shape in block-local units (0.0 for non-physical).
    pub height: f64,
    /// Block-local collision hull, `None` for non-physical blocks.
    pub bounding_box: Option<Aabb>,
}

impl BlockInfo {
    pub const AIR: BlockInfo = BlockInfo {
        physical:     false,
        liquid:       false,
        replaceable:  true,
        safe:         true,
        loaded:       true,
        height:       0.0,
        bounding_box: None,
    };

    pub const SOLID: BlockInfo = BlockInfo {
        physical:     true,
        liquid:       false,
        replaceable:  false,
        safe:         true,
        loaded:       true,
        height:       1.0,
        bounding_box: Some(Aabb::FULL),
    };

    pub const UNLOADED: BlockInfo = BlockInfo {
        physical:     false,
        liquid:       false,
        replaceable:  false,
        safe:         false,
        loaded:       false,
        height:       0.0,
        bounding_box: None,
    };

    /// The agent's body may occupy this block.
    #[inline]
    pub fn is_passable(&self) -> bool {
        self.loaded && self.safe && !self.physical
    }

    /// The agent may stand on top of this block.
    #[inline]
    pub fn is_standable(&self) -> bool {
        self.loaded && self.safe && self.physical && self.height >= 0.9
    }
}

// ── Block ─────────────────────────────────────────────────────────────────────

/// Identity and dig properties of a block.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Block {
    pub state_id: u32,
    /// `false` for blocks that can never be broken (bedrock, barriers).
    pub diggable: bool,
    /// Relative dig effort; hosts use it to estimate break ticks.
    pub hardness: f32,
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Read-only voxel world capability.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so movement providers can query the
/// same snapshot from Rayon workers when the search runs with the
/// `parallel` feature.
pub trait World: Send + Sync {
    /// Search predicates for `pos`.  Never fails: unknown blocks are
    /// [`BlockInfo::UNLOADED`].
    fn block_info(&self, pos: BlockPos) -> BlockInfo;

    /// Identity of the block at `pos`, `None` if unloaded.
    fn block(&self, pos: BlockPos) -> Option<Block>;

    /// Raw state id of the block at `pos`, `None` if unloaded.
    fn block_state_id(&self, pos: BlockPos) -> Option<u32> {
        self.block(pos).map(|b| b.state_id)
    }
}
