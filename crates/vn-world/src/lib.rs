//! `vn-world` — reference implementations of the external capabilities.
//!
//! Nothing in the search or execution layers depends on this crate; it exists
//! so tests, demos and benchmarks have a concrete world to run against.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`block`]      | `BlockKind` palette                                      |
//! | [`voxel`]      | `VoxelWorld` (`World` impl), `VoxelWorldBuilder`         |
//! | [`kinematics`] | `KinematicSimulator` (`Simulator` impl)                  |
//! | [`sandbox`]    | `Sandbox` (`Host` impl) with failure injection           |
//! | [`loader`]     | `load_world_csv`, `load_world_reader`                    |
//! | [`scatter`]    | `scatter_obstacles`, `Scatter`                           |
//! | [`error`]      | `WorldError`, `WorldResult<T>`                           |

pub mod block;
pub mod error;
pub mod kinematics;
pub mod loader;
pub mod sandbox;
pub mod scatter;
pub mod voxel;


pub use block::BlockKind;
pub use error::{WorldError, WorldResult};
pub use kinematics::KinematicSimulator;
pub use loader::{load_world_csv, load_world_reader};
pub use sandbox::Sandbox;
pub use scatter::{scatter_obstacles, Scatter};
pub use voxel::{VoxelWorld, VoxelWorldBuilder};
