//! `AStar` — the time-sliced search core.
//!
//! # Slicing
//!
//! One [`AStar::compute`] call is one slice: it pops nodes until the goal is
//! reached, the frontier empties, or the caller's [`SliceBudget`] runs out.
//! All open/closed bookkeeping lives on the struct, so the next call resumes
//! exactly where the previous one stopped.  N calls whose visit budgets sum
//! to B pop the same nodes, in the same order, as one call with budget B.
//!
//! # Termination order
//!
//! Each loop iteration checks, in order:
//!
//! 1. global budgets (`max_iterations`, `timeout`) → `Timeout`;
//! 2. slice budgets (visits, time) → `Partial`, state retained;
//! 3. empty frontier → `NoPath`;
//! 4. `goal.is_end(node)` → `Success`;
//! 5. depth cap reached → `PartialSuccess`.
//!
//! So a node that both satisfies the goal and sits at the depth cap finishes
//! as `Success`.  `Timeout` and `Partial` report the path to the node with the
//! lowest heuristic seen so far (earliest on ties).  Once a terminal status is
//! reached, further calls return the same path again.

use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use vn_core::{ChunkId, NodeId, SearchConfig, World};

use crate::frontier::Frontier;
use crate::{
    Candidate, ExpandContext, Goal, Move, MoveArena, NodeKey, Path, PathStatus,
    ProviderRegistry, SearchStats,
};

// ── SliceBudget ───────────────────────────────────────────────────────────────

/// Work allowance for a single `compute()` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SliceBudget {
    /// Nodes popped before yielding.  Must be at least 1.
    pub max_visits: usize,
    pub max_time:   Option<Duration>,
}

impl SliceBudget {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_visits: config.slice_node_budget,
            max_time:   config.slice_time_budget(),
        }
    }

    /// Visit-only budget, no wall-clock limit.
    pub fn visits(max_visits: usize) -> Self {
        Self { max_visits, max_time: None }
    }

    pub fn unbounded() -> Self {
        Self::visits(usize::MAX)
    }
}

// ── AStar ─────────────────────────────────────────────────────────────────────

enum SearchState {
    Idle,
    Expanding,
    Finished(Path),
}

pub struct AStar {
    start:          Move,
    arena:          MoveArena,
    frontier:       Frontier<NodeKey, NodeId>,
    /// Best `g` recorded per canonical key.
    best_g:         FxHashMap<NodeKey, f64>,
    closed:         FxHashSet<NodeKey>,
    /// Node with the lowest heuristic seen, for partial results.
    best_node:      Option<(NodeId, f64)>,
    visited:        usize,
    generated:      usize,
    touched:        FxHashSet<ChunkId>,
    depth_cap:      Option<u32>,
    max_iterations: usize,
    timeout:        Option<Duration>,
    started_at:     Option<Instant>,
    calc_time:      Duration,
    state:          SearchState,
    /// Reused candidate buffer.
    scratch:        Vec<Candidate>,
}

impl AStar {
    pub fn new(start: Move, config: &SearchConfig) -> Self {
        Self {
            start,
            arena:          MoveArena::new(),
            frontier:       Frontier::new(),
            best_g:         FxHashMap::default(),
            closed:         FxHashSet::default(),
            best_node:      None,
            visited:        0,
            generated:      0,
            touched:        FxHashSet::default(),
            depth_cap:      None,
            max_iterations: config.max_iterations,
            timeout:        config.timeout(),
            started_at:     None,
            calc_time:      Duration::ZERO,
            state:          SearchState::Idle,
            scratch:        Vec::new(),
        }
    }

    /// Finish as `PartialSuccess` at the first popped node `depth` moves from
    /// the root.
    pub fn with_depth_cap(mut self, depth: u32) -> Self {
        self.depth_cap = Some(depth);
        self
    }

    pub fn start(&self) -> &Move {
        &self.start
    }

    pub fn visited_nodes(&self) -> usize {
        self.visited
    }

    pub fn generated_nodes(&self) -> usize {
        self.generated
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SearchState::Finished(_))
    }

    pub fn stats(&self) -> SearchStats {
        let mut touched_chunks: Vec<ChunkId> = self.touched.iter().copied().collect();
        touched_chunks.sort_unstable();
        SearchStats {
            open_len: self.frontier.len(),
            closed_len: self.closed.len(),
            touched_chunks,
        }
    }

    /// Run one slice.
    pub fn compute(
        &mut self,
        goal:      &dyn Goal,
        world:     &dyn World,
        providers: &ProviderRegistry,
        budget:    SliceBudget,
    ) -> Path {
        if let SearchState::Finished(path) = &self.state {
            return path.clone();
        }
        let slice_start = Instant::now();
        if matches!(self.state, SearchState::Idle) {
            self.seed(goal);
            self.started_at = Some(slice_start);
            self.state = SearchState::Expanding;
        }

        let ctx = ExpandContext::new(world);
        let mut slice_visits = 0usize;
        loop {
            if self.visited >= self.max_iterations || self.global_timeout_elapsed() {
                debug!(visited = self.visited, "search timed out");
                let best = self.best_node.map(|(id, _)| id);
                return self.finish(PathStatus::Timeout, best, slice_start);
            }
            let slice_time_spent = budget
                .max_time
                .is_some_and(|limit| slice_visits > 0 && slice_start.elapsed() >= limit);
            if slice_visits >= budget.max_visits || slice_time_spent {
                trace!(
                    slice_visits,
                    visited = self.visited,
                    open = self.frontier.len(),
                    "search slice yielded"
                );
                return self.partial(slice_start);
            }

            let Some(id) = self.frontier.pop_min() else {
                debug!(visited = self.visited, "frontier exhausted");
                return self.finish(PathStatus::NoPath, None, slice_start);
            };
            let mv = &self.arena[id];
            self.closed.insert(mv.key());
            self.visited += 1;
            slice_visits += 1;

            if goal.is_end(mv) {
                debug!(visited = self.visited, cost = mv.g(), "goal reached");
                return self.finish(PathStatus::Success, Some(id), slice_start);
            }
            if self.depth_cap.is_some_and(|cap| mv.depth() >= cap) {
                debug!(visited = self.visited, depth = mv.depth(), "depth cap reached");
                return self.finish(PathStatus::PartialSuccess, Some(id), slice_start);
            }

            self.expand(id, goal, &ctx, providers);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn seed(&mut self, goal: &dyn Goal) {
        let h = goal.heuristic(&self.start);
        let root = self.start.clone().with_heuristic(h);
        let key = root.key();
        self.touched.insert(root.pos().chunk());
        let id = self.arena.push(root);
        self.best_g.insert(key, 0.0);
        self.best_node = Some((id, h));
        self.frontier.insert(key, id, h, h);
    }

    fn expand(
        &mut self,
        id:        NodeId,
        goal:      &dyn Goal,
        ctx:       &ExpandContext<'_>,
        providers: &ProviderRegistry,
    ) {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        providers.expand(ctx, &self.arena[id], &mut scratch);
        self.generated += scratch.len();

        for candidate in scratch.drain(..) {
            self.touched.insert(candidate.pos.chunk());
            let Some(child) = Move::child(id, &self.arena[id], candidate) else {
                continue;
            };
            let key = child.key();
            if self.best_g.get(&key).is_some_and(|&g| child.g() >= g) {
                continue;
            }
            let h = goal.heuristic(&child);
            let g = child.g();
            self.best_g.insert(key, g);
            // Strictly better g reopens a closed key.
            self.closed.remove(&key);
            let child_id = self.arena.push(child.with_heuristic(h));
            if self.best_node.is_none_or(|(_, best_h)| h < best_h) {
                self.best_node = Some((child_id, h));
            }
            self.frontier.insert(key, child_id, g + h, h);
        }
        self.scratch = scratch;
    }

    fn global_timeout_elapsed(&self) -> bool {
        match (self.timeout, self.started_at) {
            (Some(limit), Some(t0)) => t0.elapsed() >= limit,
            _ => false,
        }
    }

    fn build_path(&self, status: PathStatus, end: Option<NodeId>) -> Path {
        let moves = end.map(|id| self.arena.reconstruct(id)).unwrap_or_default();
        Path {
            status,
            cost: moves.last().map_or(0.0, Move::g),
            calc_time: self.calc_time,
            visited_nodes: self.visited,
            generated_nodes: self.generated,
            moves,
            stats: self.stats(),
        }
    }

    fn partial(&mut self, slice_start: Instant) -> Path {
        self.calc_time += slice_start.elapsed();
        self.build_path(PathStatus::Partial, self.best_node.map(|(id, _)| id))
    }

    fn finish(&mut self, status: PathStatus, end: Option<NodeId>, slice_start: Instant) -> Path {
        self.calc_time += slice_start.elapsed();
        let path = self.build_path(status, end);
        self.state = SearchState::Finished(path.clone());
        path
    }
}
