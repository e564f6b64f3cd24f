//! Path producers: who owns the search and when a new one starts.
//!
//! | Producer               | Search instances                                  |
//! |------------------------|---------------------------------------------------|
//! | [`ContinuousProducer`] | one `AStar` for the whole goal                    |
//! | [`ChainedProducer`]    | a fresh depth-capped `AStar` per leg              |
//!
//! Both advance by exactly one slice per [`PathProducer::advance`] call.

use std::sync::Arc;

use tracing::debug;

use vn_core::{SearchConfig, World};

use crate::{AStar, Goal, Move, Path, PathStatus, ProviderRegistry, SliceBudget};

pub trait PathProducer: Send {
    /// Run one search slice toward `goal`.
    fn advance(&mut self, goal: &dyn Goal, world: &dyn World) -> Path;

    /// Root of the search currently in progress.
    fn start(&self) -> &Move;

    /// Root the next search at `root`, where the previous path actually left
    /// the agent.  Single-search producers have no next search.
    fn continue_from(&mut self, _root: Move) {}
}

// ── ContinuousProducer ────────────────────────────────────────────────────────

pub struct ContinuousProducer {
    search:    AStar,
    providers: Arc<ProviderRegistry>,
    budget:    SliceBudget,
}

impl ContinuousProducer {
    pub fn new(start: Move, providers: Arc<ProviderRegistry>, config: &SearchConfig) -> Self {
        Self {
            search: AStar::new(start, config),
            providers,
            budget: SliceBudget::from_config(config),
        }
    }

    pub fn with_budget(mut self, budget: SliceBudget) -> Self {
        self.budget = budget;
        self
    }
}

impl PathProducer for ContinuousProducer {
    fn advance(&mut self, goal: &dyn Goal, world: &dyn World) -> Path {
        self.search.compute(goal, world, &self.providers, self.budget)
    }

    fn start(&self) -> &Move {
        self.search.start()
    }
}

// ── ChainedProducer ───────────────────────────────────────────────────────────

/// Solves long goals as a chain of sub-searches, each capped at
/// `partial_path_length` moves.
///
/// A capped leg is returned as `PartialSuccess`.  The next `advance` starts
/// a new search from that leg's last move, carrying velocity and remaining
/// blocks over, unless [`PathProducer::continue_from`] re-rooted it at a
/// different block.
pub struct ChainedProducer {
    search:    AStar,
    providers: Arc<ProviderRegistry>,
    budget:    SliceBudget,
    config:    SearchConfig,
    depth_cap: u32,
    /// Root of the next leg, set when the current one ends short.
    next_leg:  Option<Move>,
    legs:      usize,
}

impl ChainedProducer {
    pub fn new(start: Move, providers: Arc<ProviderRegistry>, config: &SearchConfig) -> Self {
        let depth_cap = u32::try_from(config.partial_path_length).unwrap_or(u32::MAX);
        Self {
            search: AStar::new(start, config).with_depth_cap(depth_cap),
            providers,
            budget: SliceBudget::from_config(config),
            config: config.clone(),
            depth_cap,
            next_leg: None,
            legs: 1,
        }
    }

    pub fn with_budget(mut self, budget: SliceBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Sub-searches started so far, including the current one.
    pub fn legs(&self) -> usize {
        self.legs
    }
}

impl PathProducer for ChainedProducer {
    fn advance(&mut self, goal: &dyn Goal, world: &dyn World) -> Path {
        if let Some(root) = self.next_leg.take() {
            debug!(leg = self.legs + 1, start = %root.pos(), "starting next search leg");
            self.search = AStar::new(root, &self.config).with_depth_cap(self.depth_cap);
            self.legs += 1;
        }
        let path = self.search.compute(goal, world, &self.providers, self.budget);
        if path.status == PathStatus::PartialSuccess {
            self.next_leg = path.last().map(Move::rebase);
        }
        path
    }

    fn start(&self) -> &Move {
        self.search.start()
    }

    fn continue_from(&mut self, root: Move) {
        let planned = self.next_leg.as_ref().is_some_and(|leg| {
            leg.pos() == root.pos() && leg.remaining_blocks() == root.remaining_blocks()
        });
        if !planned {
            debug!(start = %root.pos(), "leg ended off plan, re-rooting");
            self.next_leg = Some(root);
        }
    }
}
