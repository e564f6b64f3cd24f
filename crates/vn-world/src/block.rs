//! The reference block palette.
//!
//! | Kind      | physical | liquid | replaceable | safe | diggable |
//! |-----------|----------|--------|-------------|------|----------|
//! | `Air`     | no       | no     | yes         | yes  | —        |
//! | `Grass`   | no       | no     | yes         | yes  | yes      |
//! | `Stone`   | yes      | no     | no          | yes  | yes      |
//! | `Dirt`    | yes      | no     | no          | yes  | yes      |
//! | `Bedrock` | yes      | no     | no          | yes  | no       |
//! | `Water`   | no       | yes    | yes         | yes  | —        |
//! | `Lava`    | no       | yes    | yes         | no   | —        |

use std::fmt;

use serde::Deserialize;

use vn_core::{Aabb, Block, BlockInfo};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    #[default]
    Air,
    Grass,
    Stone,
    Dirt,
    Bedrock,
    Water,
    Lava,
}

impl BlockKind {
    pub fn state_id(self) -> u32 {
        self as u32
    }

    pub fn info(self) -> BlockInfo {
        match self {
            BlockKind::Air => BlockInfo::AIR,
            BlockKind::Grass => BlockInfo { replaceable: true, ..BlockInfo::AIR },
            BlockKind::Stone | BlockKind::Dirt | BlockKind::Bedrock => BlockInfo::SOLID,
            BlockKind::Water => BlockInfo { liquid: true, ..BlockInfo::AIR },
            BlockKind::Lava => BlockInfo { liquid: true, safe: false, ..BlockInfo::AIR },
        }
    }

    pub fn block(self) -> Block {
        let (diggable, hardness) = match self {
            BlockKind::Air | BlockKind::Water | BlockKind::Lava => (false, 0.0),
            BlockKind::Grass => (true, 0.0),
            BlockKind::Stone => (true, 1.5),
            BlockKind::Dirt => (true, 0.5),
            BlockKind::Bedrock => (false, -1.0),
        };
        Block { state_id: self.state_id(), diggable, hardness }
    }

    pub fn is_solid(self) -> bool {
        self.info().physical
    }

    /// Collision hull in block-local space.
    pub fn bounding_box(self) -> Option<Aabb> {
        self.info().bounding_box
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockKind::Air     => "air",
            BlockKind::Grass   => "grass",
            BlockKind::Stone   => "stone",
            BlockKind::Dirt    => "dirt",
            BlockKind::Bedrock => "bedrock",
            BlockKind::Water   => "water",
            BlockKind::Lava    => "lava",
        })
    }
}
