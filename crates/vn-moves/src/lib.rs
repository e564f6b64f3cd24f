//! `vn-moves` — the concrete motion primitives and path post-processing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`terrain`]   | `Rules`, `Terrain` — shared feasibility and pricing          |
//! | [`walk`]      | `ForwardProvider`, `DiagonalProvider`                        |
//! | [`vertical`]  | jump-up, drop-down, pillar and dig-down providers            |
//! | [`parkour`]   | `ParkourProvider`, `JumpTable`                               |
//! | [`steer`]     | `steer`, `jump_at_edge` — policy shared with the executors   |
//! | [`optimizer`] | `Optimizer`, `OptimizerPass`, merge passes                   |
//! | [`defaults`]  | `default_providers`                                          |
//!
//! # Cost model
//!
//! Every candidate is priced as
//!
//! ```text
//! base + break_cost × breaks + place_cost × places (+ liquid_cost)
//! ```
//!
//! then passed through `CostConfig::escalate`, which inflates costs above
//! the escalation threshold and drops anything over `max_move_cost`.

pub mod defaults;
pub mod optimizer;
pub mod parkour;
pub mod steer;
pub mod terrain;
pub mod vertical;
pub mod walk;

#[cfg(test)]
mod tests;

pub use defaults::default_providers;
pub use optimizer::{MergeDiagonalRuns, MergeStraightRuns, Optimizer, OptimizerPass};
pub use parkour::{JumpTable, ParkourProvider};
pub use steer::{jump_at_edge, steer, Steering};
pub use terrain::{Rules, Terrain};
pub use vertical::{DigDownProvider, DropDownProvider, JumpUpProvider, PillarProvider};
pub use walk::{DiagonalProvider, ForwardProvider};
