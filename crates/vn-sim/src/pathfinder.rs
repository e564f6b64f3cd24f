//! The `Pathfinder` driving loop.

use std::mem;
use std::sync::Arc;

use tracing::{debug, info, warn};

use vn_core::{BlockPos, ChunkId, Host, PathConfig, ProducerStrategy, Tick};
use vn_exec::{AbortReason, ExecError, ExecStatus, ExecutionEngine, ExecutorSet};
use vn_moves::Optimizer;
use vn_search::{
    ChainedProducer, ContinuousProducer, Goal, GoalEvent, Move, PathProducer, PathStatus,
    ProviderRegistry, SearchStats,
};

use crate::{PathfinderError, PathfinderObserver, PathfinderResult};

// ── Public state ──────────────────────────────────────────────────────────────

/// Coarse view of what the pathfinder is doing this tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathfinderState {
    Idle,
    Searching,
    Executing,
}

/// How a pursuit that did not fail came to an end.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Outcome {
    GoalReached,
    Stopped,
}

/// What forced the current search or execution to start over.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ResetCause {
    /// [`Pathfinder::set_goal`] replaced the goal mid-pursuit.
    GoalChanged,
    /// A dynamic goal moved its target.
    GoalUpdated,
    /// A chunk the search had read was (re)loaded.
    ChunkLoaded(ChunkId),
    /// A block changed next to the remaining path.
    BlockUpdate(BlockPos),
}

/// A request to end the pursuit, honoured once execution has unwound.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Interrupt {
    Stop,
    Invalidated,
}

enum Phase {
    Idle,
    Searching {
        producer: Box<dyn PathProducer>,
    },
    Executing {
        engine:   ExecutionEngine,
        /// The chained producer whose next leg starts where this one ends.
        producer: Option<Box<dyn PathProducer>>,
    },
}

impl Phase {
    fn state(&self) -> PathfinderState {
        match self {
            Phase::Idle              => PathfinderState::Idle,
            Phase::Searching { .. }  => PathfinderState::Searching,
            Phase::Executing { .. }  => PathfinderState::Executing,
        }
    }
}

// ── Pathfinder ────────────────────────────────────────────────────────────────

/// Owns a goal and pursues it one tick at a time.
///
/// Each [`tick`][Self::tick] does exactly one of:
///
/// 1. **Search**: one bounded slice of the active producer.  An executable
///    path is optimised and handed to a fresh [`ExecutionEngine`].
/// 2. **Execute**: one engine tick.  A finished chained leg hands control
///    back to the producer for the next leg.
///
/// External changes arrive through [`on_goal_event`][Self::on_goal_event],
/// [`on_chunk_loaded`][Self::on_chunk_loaded] and
/// [`on_block_update`][Self::on_block_update].  Anything that invalidates
/// the plan sets a reset flag; execution unwinds (interactions cancelled,
/// controls released, agent settled) before the next search starts from the
/// agent's current block.
///
/// The goal's cleanup runs exactly once per goal, whichever way the pursuit
/// ends: reached, failed, stopped, invalidated or replaced.
///
/// Create via [`PathfinderBuilder`][crate::PathfinderBuilder].
pub struct Pathfinder {
    config:    PathConfig,
    providers: Arc<ProviderRegistry>,
    optimizer: Arc<Optimizer>,
    executors: Arc<ExecutorSet>,
    goal:      Option<Box<dyn Goal>>,
    phase:     Phase,
    /// Set by reset triggers; consumed when the next search starts.
    reset:     Option<ResetCause>,
    interrupt: Option<Interrupt>,
    /// Chunks read by the most recent search slice.
    stats:     SearchStats,
    outcome:   Option<PathfinderResult<Outcome>>,
    clock:     Tick,
    resets:    u32,
}

impl Pathfinder {
    pub(crate) fn new(
        config:    PathConfig,
        providers: Arc<ProviderRegistry>,
        optimizer: Arc<Optimizer>,
        executors: Arc<ExecutorSet>,
    ) -> Self {
        Self {
            config,
            providers,
            optimizer,
            executors,
            goal:      None,
            phase:     Phase::Idle,
            reset:     None,
            interrupt: None,
            stats:     SearchStats::default(),
            outcome:   None,
            clock:     Tick::ZERO,
            resets:    0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    pub fn state(&self) -> PathfinderState {
        self.phase.state()
    }

    pub fn goal(&self) -> Option<&dyn Goal> {
        self.goal.as_deref()
    }

    /// The engine executing the current path, if any.
    pub fn engine(&self) -> Option<&ExecutionEngine> {
        match &self.phase {
            Phase::Executing { engine, .. } => Some(engine),
            _ => None,
        }
    }

    /// Searches restarted by reset triggers so far.
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Ticks processed so far.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Take the result of the last finished pursuit.
    pub fn take_outcome(&mut self) -> Option<PathfinderResult<Outcome>> {
        self.outcome.take()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Pursue `goal`, replacing (and cleaning up) any current one.
    ///
    /// A pursuit already under way is reset: execution unwinds and the next
    /// search starts from wherever the agent then stands.
    pub fn set_goal(&mut self, goal: impl Goal + 'static) {
        if let Some(mut old) = self.goal.replace(Box::new(goal)) {
            old.cleanup();
        }
        self.outcome = None;
        self.interrupt = None;
        if !matches!(self.phase, Phase::Idle) {
            self.request_reset(ResetCause::GoalChanged);
        }
    }

    /// Abandon the pursuit.  Takes effect on the next tick; an executing move
    /// unwinds first and [`PathfinderObserver::on_stop`] fires once it has.
    pub fn stop(&mut self) {
        if self.goal.is_some() {
            self.interrupt = Some(Interrupt::Stop);
        }
    }

    /// Forward an external event to a dynamic goal.
    pub fn on_goal_event(&mut self, event: &GoalEvent) {
        let Some(goal) = self.goal.as_mut() else {
            return;
        };
        if !goal.is_dynamic() {
            return;
        }
        if goal.invalidation_events().contains(&event.kind) && goal.invalidated_by(event) {
            debug!(?event, "goal invalidated");
            self.interrupt = Some(Interrupt::Invalidated);
            return;
        }
        if goal.update_events().contains(&event.kind) && goal.update(event) {
            self.request_reset(ResetCause::GoalUpdated);
        }
    }

    /// A chunk was (re)loaded.  A dynamic goal sees the event first;
    /// otherwise this resets only when the current search read the chunk.
    pub fn on_chunk_loaded(&mut self, chunk: ChunkId) {
        self.on_goal_event(&GoalEvent::chunk_loaded(chunk));
        if self.interrupt.is_some() {
            return;
        }
        if !matches!(self.phase, Phase::Idle) && self.stats.touched(chunk) {
            self.request_reset(ResetCause::ChunkLoaded(chunk));
        }
    }

    /// A block changed.  A dynamic goal sees the event first.  While
    /// searching this resets when its chunk was read; while executing, when
    /// it borders a move still to be run.
    pub fn on_block_update(&mut self, pos: BlockPos) {
        self.on_goal_event(&GoalEvent::block_update(pos));
        if self.interrupt.is_some() {
            return;
        }
        let relevant = match &self.phase {
            Phase::Idle => false,
            Phase::Searching { .. } => self.stats.touched(pos.chunk()),
            Phase::Executing { engine, .. } => near_path(engine.remaining(), pos),
        };
        if relevant {
            self.request_reset(ResetCause::BlockUpdate(pos));
        }
    }

    fn request_reset(&mut self, cause: ResetCause) {
        if self.reset.is_some() {
            return;
        }
        debug!(?cause, "reset requested");
        self.reset = Some(cause);
        if let Phase::Executing { engine, .. } = &mut self.phase {
            engine.request_abort(AbortReason::Reset);
        }
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the pursuit by one tick.
    pub fn tick(&mut self, host: &mut dyn Host, observer: &mut dyn PathfinderObserver) -> PathfinderState {
        let phase = mem::replace(&mut self.phase, Phase::Idle);
        self.phase = self.step(phase, host, observer);
        let state = self.phase.state();
        observer.on_tick_end(self.clock, state);
        self.clock.advance();
        state
    }

    /// Tick until the pursuit resolves or `max_ticks` pass, calling `advance`
    /// between ticks to move the host's world forward.
    pub fn run<H, O>(
        &mut self,
        host:      &mut H,
        observer:  &mut O,
        max_ticks: u64,
        mut advance: impl FnMut(&mut H),
    ) -> PathfinderResult<Outcome>
    where
        H: Host,
        O: PathfinderObserver,
    {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        if self.goal.is_none() {
            return Err(PathfinderError::NoGoal);
        }
        for _ in 0..max_ticks {
            self.tick(host, observer);
            if let Some(outcome) = self.outcome.take() {
                return outcome;
            }
            advance(host);
        }
        warn!(max_ticks, "pursuit unresolved at tick limit");
        Err(PathfinderError::TickLimit(max_ticks))
    }

    fn step(&mut self, phase: Phase, host: &mut dyn Host, observer: &mut dyn PathfinderObserver) -> Phase {
        if self.goal.is_none() {
            return Phase::Idle;
        }
        match phase {
            Phase::Idle => {
                if let Some(interrupt) = self.interrupt.take() {
                    return self.interrupted(interrupt, observer);
                }
                // A cause recorded before any search ran is moot.
                self.reset = None;
                let producer = self.producer(host);
                self.search(producer, host, observer)
            }
            Phase::Searching { producer } => {
                if let Some(interrupt) = self.interrupt.take() {
                    return self.interrupted(interrupt, observer);
                }
                let producer = match self.reset.take() {
                    Some(cause) => self.restart(cause, host, observer),
                    None => producer,
                };
                self.search(producer, host, observer)
            }
            Phase::Executing { engine, producer } => self.execute(engine, producer, host, observer),
        }
    }

    fn search(
        &mut self,
        mut producer: Box<dyn PathProducer>,
        host:         &mut dyn Host,
        observer:     &mut dyn PathfinderObserver,
    ) -> Phase {
        let Some(goal) = self.goal.as_deref() else {
            return Phase::Idle;
        };
        let path = producer.advance(goal, host.world());
        self.stats = path.stats.clone();
        match path.status {
            PathStatus::Partial => Phase::Searching { producer },
            PathStatus::Success | PathStatus::PartialSuccess => {
                info!(
                    status = %path.status,
                    moves = path.len(),
                    cost = path.cost,
                    visited = path.visited_nodes,
                    "path found"
                );
                observer.on_path(&path);
                let chained = path.status == PathStatus::PartialSuccess;
                let moves = self.optimizer.optimize(path.moves);
                if moves.is_empty() {
                    if chained {
                        return self.fail(PathfinderError::NoPath, observer);
                    }
                    return self.reached(observer);
                }
                let engine = ExecutionEngine::new(moves, Arc::clone(&self.providers), &self.config)
                    .with_executors(Arc::clone(&self.executors))
                    .with_optimizer(Arc::clone(&self.optimizer));
                Phase::Executing { engine, producer: chained.then_some(producer) }
            }
            PathStatus::NoPath => self.fail(PathfinderError::NoPath, observer),
            PathStatus::Timeout => self.fail(PathfinderError::Timeout, observer),
        }
    }

    fn execute(
        &mut self,
        mut engine: ExecutionEngine,
        producer:   Option<Box<dyn PathProducer>>,
        host:       &mut dyn Host,
        observer:   &mut dyn PathfinderObserver,
    ) -> Phase {
        if self.interrupt.is_some() {
            engine.request_abort(AbortReason::Stop);
        }
        let Some(goal) = self.goal.as_deref() else {
            return Phase::Idle;
        };
        match engine.tick(host, goal) {
            ExecStatus::Running => Phase::Executing { engine, producer },
            ExecStatus::Completed => {
                if let Some(cause) = self.reset.take() {
                    return Phase::Searching { producer: self.restart(cause, host, observer) };
                }
                let Some(mut producer) = producer else {
                    return self.reached(observer);
                };
                // A recovery may have left the agent off the planned leg end,
                // or already on the goal.
                let here = Move::start(host.player().block_pos(), host.placeable_blocks());
                if self.goal.as_deref().is_some_and(|goal| goal.is_end(&here)) {
                    return self.reached(observer);
                }
                debug!(at = %here.pos(), "leg complete, continuing chained search");
                producer.continue_from(here);
                Phase::Searching { producer }
            }
            ExecStatus::Stopped => {
                let interrupt = self.interrupt.take().unwrap_or(Interrupt::Stop);
                self.interrupted(interrupt, observer)
            }
            ExecStatus::Failed(ExecError::ResetRequested) => {
                let cause = self.reset.take().unwrap_or(ResetCause::GoalChanged);
                let producer = self.restart(cause, host, observer);
                Phase::Searching { producer }
            }
            ExecStatus::Failed(err) => self.fail(PathfinderError::Execution(err), observer),
        }
    }

    /// A new producer rooted at the agent's current block.
    fn producer(&self, host: &dyn Host) -> Box<dyn PathProducer> {
        let start = Move::start(host.player().block_pos(), host.placeable_blocks());
        debug!(start = %start.pos(), strategy = ?self.config.search.strategy, "starting search");
        let providers = Arc::clone(&self.providers);
        match self.config.search.strategy {
            ProducerStrategy::Continuous => {
                Box::new(ContinuousProducer::new(start, providers, &self.config.search))
            }
            ProducerStrategy::Chained => {
                Box::new(ChainedProducer::new(start, providers, &self.config.search))
            }
        }
    }

    fn restart(
        &mut self,
        cause:    ResetCause,
        host:     &dyn Host,
        observer: &mut dyn PathfinderObserver,
    ) -> Box<dyn PathProducer> {
        info!(?cause, "search reset");
        self.resets += 1;
        observer.on_reset(&cause);
        self.producer(host)
    }

    // ── Resolution ────────────────────────────────────────────────────────

    fn reached(&mut self, observer: &mut dyn PathfinderObserver) -> Phase {
        info!(tick = %self.clock, "goal reached");
        observer.on_goal_reached();
        self.resolve(Ok(Outcome::GoalReached))
    }

    fn fail(&mut self, err: PathfinderError, observer: &mut dyn PathfinderObserver) -> Phase {
        warn!(tick = %self.clock, error = %err, "pursuit failed");
        observer.on_failure(&err);
        self.resolve(Err(err))
    }

    fn interrupted(&mut self, interrupt: Interrupt, observer: &mut dyn PathfinderObserver) -> Phase {
        match interrupt {
            Interrupt::Stop => {
                info!(tick = %self.clock, "pursuit stopped");
                observer.on_stop();
                self.resolve(Ok(Outcome::Stopped))
            }
            Interrupt::Invalidated => self.fail(PathfinderError::GoalInvalidated, observer),
        }
    }

    fn resolve(&mut self, outcome: PathfinderResult<Outcome>) -> Phase {
        if let Some(mut goal) = self.goal.take() {
            goal.cleanup();
        }
        self.reset = None;
        self.interrupt = None;
        self.outcome = Some(outcome);
        Phase::Idle
    }
}

/// `true` when `pos` lies within one block sideways, one below or two above
/// the span of any move in `moves`, or is one of their interaction targets.
fn near_path(moves: &[Move], pos: BlockPos) -> bool {
    moves.iter().any(|mv| {
        let (a, b) = (mv.entry(), mv.exit());
        let within = |v: i32, lo: i32, hi: i32| (lo..=hi).contains(&v);
        let boxed = within(pos.x, a.x.min(b.x) - 1, a.x.max(b.x) + 1)
            && within(pos.z, a.z.min(b.z) - 1, a.z.max(b.z) + 1)
            && within(pos.y, a.y.min(b.y) - 1, a.y.max(b.y) + 2);
        boxed || mv.breaks().contains(&pos) || mv.places().iter().any(|p| p.pos == pos)
    })
}
