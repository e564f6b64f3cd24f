//! Fluent builder for constructing a [`Pathfinder`].

use std::sync::Arc;

use vn_core::{PathConfig, Simulator};
use vn_exec::ExecutorSet;
use vn_moves::{default_providers, Optimizer};
use vn_search::ProviderRegistry;

use crate::{Pathfinder, PathfinderResult};

/// Fluent builder for [`Pathfinder`].
///
/// # Required inputs
///
/// - [`PathConfig`] — search budgets, costs, movement and execution tuning
/// - a [`Simulator`] at [`build`][Self::build] time, used by the parkour
///   provider to precompute its jump table
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                  |
/// |-------------------|------------------------------------------|
/// | `.providers(r)`   | `vn_moves::default_providers(config, ..)`|
/// | `.optimizer(o)`   | `Optimizer::standard(&config.movement)`  |
/// | `.executors(e)`   | `ExecutorSet::standard()`                |
///
/// # Example
///
/// ```rust,ignore
/// let mut pathfinder = PathfinderBuilder::new(PathConfig::default())
///     .build(&KinematicSimulator)?;
/// pathfinder.set_goal(GoalBlock::new(BlockPos::new(12, 0, 0)));
/// pathfinder.run(&mut sandbox, &mut NoopObserver, 2_000, Sandbox::advance)?;
/// ```
pub struct PathfinderBuilder {
    config:    PathConfig,
    providers: Option<ProviderRegistry>,
    optimizer: Option<Optimizer>,
    executors: Option<ExecutorSet>,
}

impl PathfinderBuilder {
    pub fn new(config: PathConfig) -> Self {
        Self {
            config,
            providers: None,
            optimizer: None,
            executors: None,
        }
    }

    /// Replace the movement providers searched at every expansion.
    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = Some(providers);
        self
    }

    pub fn optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Replace the executors.  Paths containing a kind with no executor fail
    /// with `MissingExecutor` when that move is reached.
    pub fn executors(mut self, executors: ExecutorSet) -> Self {
        self.executors = Some(executors);
        self
    }

    /// Validate the configuration and assemble the pathfinder.
    pub fn build(self, simulator: &dyn Simulator) -> PathfinderResult<Pathfinder> {
        self.config.validate()?;
        let providers = self
            .providers
            .unwrap_or_else(|| default_providers(&self.config, simulator));
        let optimizer = self
            .optimizer
            .unwrap_or_else(|| Optimizer::standard(&self.config.movement));
        let executors = self.executors.unwrap_or_else(ExecutorSet::standard);
        Ok(Pathfinder::new(
            self.config,
            Arc::new(providers),
            Arc::new(optimizer),
            Arc::new(executors),
        ))
    }
}
