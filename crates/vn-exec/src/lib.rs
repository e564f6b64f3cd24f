//! `vn-exec` — turns a planned path into controls and interactions.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`executor`]  | `MoveExecutor` contract, `ExecContext`, `MoveRun`, `ExecutorSet` |
//! | [`executors`] | walk, jump, pillar and dig executors                             |
//! | [`locator`]   | `EntryLocator` — R-tree over move entries                        |
//! | [`engine`]    | `ExecutionEngine` — phase machine, abort, recovery               |
//! | [`error`]     | `ExecError`, `ExecResult<T>`                                     |
//!
//! # Tick contract
//!
//! The caller owns the tick loop.  Each tick it calls
//! [`ExecutionEngine::tick`] once, then lets the host apply physics and
//! progress interactions.  The engine only reads the [`Host`][vn_core::Host]
//! and writes controls, look direction and interaction requests back to it.
//!
//! Whenever execution ends (completed, failed, aborted or stopped) every
//! in-flight interaction is cancelled and all controls are released.

pub mod engine;
pub mod error;
pub mod executor;
pub mod executors;
pub mod locator;


pub use engine::{AbortReason, ExecStatus, ExecutionEngine, RecoveryRecord};
pub use error::{ExecError, ExecResult};
pub use executor::{ExecContext, ExecutorSet, MoveExecutor, MoveRun, Perform, NEAR_ENTRY};
pub use executors::{DigExecutor, JumpExecutor, PillarExecutor, WalkExecutor};
pub use locator::EntryLocator;
