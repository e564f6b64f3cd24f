//! `vn-core` — foundational types for the `voxel_nav` pathfinder.
//!
//! This crate is a dependency of every other `vn-*` crate.  It has no `vn-*`
//! dependencies and only `thiserror`, `serde` and `toml` externally.
//!
//! # What lives here
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`geo`]       | `BlockPos`, `Vec3`, `ChunkId`, direction tables             |
//! | [`ids`]       | `NodeId`, `InteractionId`                                   |
//! | [`time`]      | `Tick`                                                      |
//! | [`world`]     | `World` capability, `BlockInfo`, `Block`, `Aabb`            |
//! | [`physics`]   | `PlayerState`, `ControlState`, `Simulator` capability       |
//! | [`host`]      | `Host` capability, `Interaction`, `PlaceIntent`             |
//! | [`config`]    | `PathConfig` and its sections                               |
//! | [`error`]     | `VnError`, `VnResult`                                       |
//!
//! # Capabilities
//!
//! The world store, the physics simulator and the block interaction layer are
//! external collaborators.  The core only ever talks to them through the
//! [`World`], [`Simulator`] and [`Host`] traits, so a bot framework can plug
//! in its own chunk cache and physics without touching the search.

pub mod config;
pub mod error;
pub mod geo;
pub mod host;
pub mod ids;
pub mod physics;
pub mod time;
pub mod world;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    CostConfig, ExecutionConfig, MovementConfig, PathConfig, ProducerStrategy, SearchConfig,
};
pub use error::{VnError, VnResult};
pub use geo::{BlockPos, ChunkId, Vec3, CARDINALS, CHUNK_SIZE, DIAGONALS};
pub use host::{Host, Interaction, InteractionStatus, PlaceIntent};
pub use ids::{InteractionId, NodeId};
pub use physics::{
    yaw_towards, ControlState, PlayerState, Simulator, PLAYER_HALF_WIDTH, PLAYER_HEIGHT,
};
pub use time::Tick;
pub use world::{Aabb, Block, BlockInfo, World};
