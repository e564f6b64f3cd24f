//! Voxel coordinates, continuous vectors, and chunk identifiers.
//!
//! A `BlockPos` names one voxel.  When it describes where the agent stands,
//! it is the block occupied by the agent's **feet**; the supporting block is
//! `pos.below()` and the head occupies `pos.above()`.
//!
//! `Vec3` is the continuous counterpart used by physics.  The feet-level
//! centre of a block is `BlockPos::center()`: `(x + 0.5, y, z + 0.5)`.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Side length of a chunk column, in blocks.
pub const CHUNK_SIZE: i32 = 16;

// ── BlockPos ──────────────────────────────────────────────────────────────────

/// Integer voxel coordinate.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Horizontal unit steps: +x, -x, +z, -z.
pub const CARDINALS: [BlockPos; 4] = [
    BlockPos { x: 1,  y: 0, z: 0 },
    BlockPos { x: -1, y: 0, z: 0 },
    BlockPos { x: 0,  y: 0, z: 1 },
    BlockPos { x: 0,  y: 0, z: -1 },
];

/// Horizontal diagonal steps.
pub const DIAGONALS: [BlockPos; 4] = [
    BlockPos { x: 1,  y: 0, z: 1 },
    BlockPos { x: 1,  y: 0, z: -1 },
    BlockPos { x: -1, y: 0, z: 1 },
    BlockPos { x: -1, y: 0, z: -1 },
];

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, z: self.z + dz }
    }

    #[inline]
    pub const fn up(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    #[inline]
    pub const fn down(self, n: i32) -> Self {
        self.offset(0, -n, 0)
    }

    /// The block the agent's head occupies when its feet are at `self`.
    #[inline]
    pub const fn above(self) -> Self {
        self.up(1)
    }

    /// The block the agent stands on when its feet are at `self`.
    #[inline]
    pub const fn below(self) -> Self {
        self.down(1)
    }

    /// Feet-level centre of the block.
    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::new(self.x as f64 + 0.5, self.y as f64, self.z as f64 + 0.5)
    }

    /// Chunk column containing this block.
    #[inline]
    pub const fn chunk(self) -> ChunkId {
        ChunkId { x: self.x.div_euclid(CHUNK_SIZE), z: self.z.div_euclid(CHUNK_SIZE) }
    }

    /// Squared Euclidean distance in block units.
    #[inline]
    pub fn distance_sq(self, other: BlockPos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    #[inline]
    pub fn manhattan(self, other: BlockPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// `true` when `self` and `other` share x and z.
    #[inline]
    pub fn same_column(self, other: BlockPos) -> bool {
        self.x == other.x && self.z == other.z
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        self.offset(-rhs.x, -rhs.y, -rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ── Vec3 ──────────────────────────────────────────────────────────────────────

/// Continuous position or velocity in block units.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Length of the x/z projection.
    #[inline]
    pub fn horizontal_length(self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn distance(self, other: Vec3) -> f64 {
        (self - other).length()
    }

    /// Distance ignoring the y axis.
    #[inline]
    pub fn horizontal_distance(self, other: Vec3) -> f64 {
        (self - other).horizontal_length()
    }

    /// Copy with y zeroed.
    #[inline]
    pub fn flat(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// The block containing this point.
    ///
    /// A tiny epsilon is added to y so that feet resting exactly on a block
    /// top (`y = 64.0` after collision clamping) resolve to block 64 even if
    /// float error left them at `63.999_999_9`.
    #[inline]
    pub fn block(self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            (self.y + 1e-6).floor() as i32,
            self.z.floor() as i32,
        )
    }

    /// Quantise each component to `1 / resolution` steps.  Used for
    /// canonical search keys.
    #[inline]
    pub fn quantize(self, resolution: f64) -> [i32; 3] {
        [
            (self.x * resolution).round() as i32,
            (self.y * resolution).round() as i32,
            (self.z * resolution).round() as i32,
        ]
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

// ── ChunkId ───────────────────────────────────────────────────────────────────

/// A 16×16 chunk column.  Searches record the chunks they read so callers can
/// tell whether newly loaded terrain invalidates an in-progress search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ChunkId {
    pub x: i32,
    pub z: i32,
}

impl ChunkId {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk[{}, {}]", self.x, self.z)
    }
}
