//! Pathfinder observer trait for progress reporting.

use vn_core::Tick;
use vn_search::Path;

use crate::{PathfinderError, PathfinderState, ResetCause};

/// Callbacks invoked by [`Pathfinder::tick`][crate::Pathfinder::tick] as a
/// pursuit moves through its lifecycle.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — path logger
///
/// ```rust,ignore
/// struct PathLogger;
///
/// impl PathfinderObserver for PathLogger {
///     fn on_path(&mut self, path: &Path) {
///         println!("{}: {} moves, cost {:.1}", path.status, path.len(), path.cost);
///     }
/// }
/// ```
pub trait PathfinderObserver {
    /// Called for every executable path (`Success` or `PartialSuccess`),
    /// before optimisation.
    fn on_path(&mut self, _path: &Path) {}

    /// Called when a search restarts after a reset trigger has unwound the
    /// current execution.
    fn on_reset(&mut self, _cause: &ResetCause) {}

    /// Called once when the agent stands in a goal position.
    fn on_goal_reached(&mut self) {}

    /// Called once when the pursuit fails.
    fn on_failure(&mut self, _err: &PathfinderError) {}

    /// Called once when a [`stop`][crate::Pathfinder::stop] has unwound.
    fn on_stop(&mut self) {}

    /// Called at the end of every tick.
    fn on_tick_end(&mut self, _tick: Tick, _state: PathfinderState) {}
}

/// A [`PathfinderObserver`] that does nothing.
pub struct NoopObserver;

impl PathfinderObserver for NoopObserver {}
