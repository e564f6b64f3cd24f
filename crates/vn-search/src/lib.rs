//! `vn-search` — incremental path search over movement primitives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`frontier`] | `Frontier` — min-heap open set with in-place update          |
//! | [`node`]     | `Move`, `MoveKind`, `NodeKey`, `Candidate`, `MoveArena`      |
//! | [`goal`]     | `Goal` trait, concrete goals, `GoalEvent`                    |
//! | [`provider`] | `MovementProvider` trait, `ProviderRegistry`                 |
//! | [`engine`]   | `AStar`, `SliceBudget`                                       |
//! | [`path`]     | `Path`, `PathStatus`, `SearchStats`                          |
//! | [`producer`] | `PathProducer`, `ContinuousProducer`, `ChainedProducer`      |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Expands providers on Rayon's thread pool.                  |
//!
//! Concrete movement providers live in `vn-moves`; this crate only defines
//! the framework they plug into.

pub mod engine;
pub mod frontier;
pub mod goal;
pub mod node;
pub mod path;
pub mod producer;
pub mod provider;

#[cfg(test)]
mod tests;

pub use engine::{AStar, SliceBudget};
pub use frontier::Frontier;
pub use goal::{
    octile_xz, CleanupFn, Goal, GoalBlock, GoalCompositeAny, GoalEvent, GoalEventKind,
    GoalFollow, GoalGetToBlock, GoalNear, GoalXZ, GoalY,
};
pub use node::{Candidate, Move, MoveArena, MoveKind, NodeKey};
pub use path::{Path, PathStatus, SearchStats};
pub use producer::{ChainedProducer, ContinuousProducer, PathProducer};
pub use provider::{ExpandContext, MovementProvider, ProviderRegistry};
