//! `vn-sim` — the tick-driven pathfinder loop for voxel_nav.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ① Interrupts — stop / goal invalidation: unwind execution, clean the
//!                  goal up, report on_stop / on_failure.
//!   ② Resets     — goal changed, goal updated, chunk loaded, block update
//!                  near the path: unwind execution, then restart the
//!                  search from the agent's block.
//!   ③ Search     — one bounded producer slice.
//!                    Partial             → keep searching next tick
//!                    Success             → optimise, start execution
//!                    PartialSuccess      → optimise, execute, then resume
//!                                          the chained producer
//!                    NoPath / Timeout    → failure
//!   ④ Execute    — one ExecutionEngine tick (align / initialize / perform /
//!                  recover).  ResetRequested loops back to ③.
//! ```
//!
//! Controls are released on every terminal path; the goal's cleanup runs
//! exactly once per goal.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Expands movement providers on Rayon's thread pool.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use vn_core::{BlockPos, PathConfig};
//! use vn_search::GoalBlock;
//! use vn_sim::{NoopObserver, PathfinderBuilder};
//! use vn_world::{KinematicSimulator, Sandbox};
//!
//! let mut pathfinder = PathfinderBuilder::new(PathConfig::load(config_path)?)
//!     .build(&KinematicSimulator)?;
//! pathfinder.set_goal(GoalBlock::new(BlockPos::new(40, 0, 0)));
//! let outcome = pathfinder.run(&mut sandbox, &mut NoopObserver, 5_000, Sandbox::advance)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pathfinder;


pub use builder::PathfinderBuilder;
pub use error::{PathfinderError, PathfinderResult};
pub use observer::{NoopObserver, PathfinderObserver};
pub use pathfinder::{Outcome, Pathfinder, PathfinderState, ResetCause};
