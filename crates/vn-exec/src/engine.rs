//! `ExecutionEngine` — drives a planned path through the executors, one tick
//! at a time, and recovers from recoverable failures.
//!
//! # Phases
//!
//! | Phase          | Leaves when                                  | Next                     |
//! |----------------|----------------------------------------------|--------------------------|
//! | `Aligning`     | executor aligned / ceiling reached           | `Initializing` / failure |
//! | `Initializing` | immediately                                  | `Performing`             |
//! | `Performing`   | move complete / ceiling reached              | `Aligning` / failure     |
//! | `Recovering`   | replan succeeded / failed                    | `Aligning` / failure     |
//! | `Aborting`     | agent settled or abort timeout               | terminal                 |
//!
//! Aligning, initializing and the first perform tick of a move happen in the
//! same tick, as does rolling over into the next move, so a path executes
//! without idle ticks between moves.
//!
//! # Recovery
//!
//! A recoverable failure (cancelled interaction, perform timeout) releases
//! controls and interactions, then asks the [`EntryLocator`] for the move
//! whose entry is nearest the agent:
//!
//! - nearest move at or after the failed one, within
//!   `recovery_max_distance`: replan a short path to that entry and splice
//!   it in front of the rest of the original path;
//! - otherwise (regressed, too far, empty path): replan to the goal.
//!
//! Retries are counted across the whole execution; one more failure than
//! `max_recovery_retries` ends it with `RecoveryExhausted`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use vn_core::{BlockPos, ExecutionConfig, Host, Interaction, PathConfig, SearchConfig};
use vn_moves::Optimizer;
use vn_search::{
    ContinuousProducer, Goal, GoalBlock, Move, PathProducer, PathStatus, ProviderRegistry,
};

use crate::{
    EntryLocator, ExecContext, ExecError, ExecResult, ExecutorSet, MoveExecutor, MoveRun, Perform,
};

/// Phase changes allowed within a single tick.
const MAX_TRANSITIONS_PER_TICK: usize = 8;

/// Perform ticks allowed per block of horizontal travel.
const TICKS_PER_BLOCK: f64 = 10.0;

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ExecStatus {
    Running,
    /// Every move executed.
    Completed,
    /// Unwound after `AbortReason::Stop`.
    Stopped,
    Failed(ExecError),
}

impl ExecStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecStatus::Running)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AbortReason {
    /// Surfaces as `ExecError::UserAbort`.
    User,
    /// Surfaces as `ExecError::ResetRequested`.
    Reset,
    /// Surfaces as `ExecStatus::Stopped`.
    Stop,
}

/// One recovery decision, kept for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct RecoveryRecord {
    pub error:     ExecError,
    pub failed:    usize,
    /// Nearest move entry to the agent when the failure happened.
    pub nearest:   Option<usize>,
    pub distance:  f64,
    /// `Some(k)` when the agent rejoins the original path at move `k`;
    /// `None` for a full replan to the goal.
    pub resume_at: Option<usize>,
}

impl RecoveryRecord {
    pub fn is_full_replan(&self) -> bool {
        self.resume_at.is_none()
    }
}

// ── Internal state ────────────────────────────────────────────────────────────

enum Target {
    Rejoin { resume_at: usize, goal: GoalBlock },
    Goal,
}

struct Recovery {
    target:   Target,
    producer: Option<ContinuousProducer>,
    waited:   u32,
}

enum Phase {
    Aligning { ticks: u32 },
    Initializing,
    Performing { ticks: u32, ceiling: u32 },
    Aborting { reason: AbortReason, ticks: u32 },
    Recovering(Box<Recovery>),
    Finished,
}

enum Step {
    /// Continue with this phase in the same tick.
    Next(Phase),
    /// Stay in this phase until the next tick.
    Wait(Phase),
    Done(ExecStatus),
}

// ── ExecutionEngine ───────────────────────────────────────────────────────────

pub struct ExecutionEngine {
    executors:  Arc<ExecutorSet>,
    providers:  Arc<ProviderRegistry>,
    optimizer:  Arc<Optimizer>,
    config:     ExecutionConfig,
    search:     SearchConfig,
    moves:      Vec<Move>,
    index:      usize,
    locator:    EntryLocator,
    phase:      Phase,
    run:        MoveRun,
    retries:    u32,
    abort:      Option<AbortReason>,
    outcome:    Option<ExecStatus>,
    completed:  Vec<BlockPos>,
    recoveries: Vec<RecoveryRecord>,
}

impl ExecutionEngine {
    /// Execute `moves` with the standard executors and optimizer.
    /// `providers` are used for recovery searches.
    pub fn new(moves: Vec<Move>, providers: Arc<ProviderRegistry>, config: &PathConfig) -> Self {
        let locator = EntryLocator::new(&moves);
        Self {
            executors: Arc::new(ExecutorSet::standard()),
            providers,
            optimizer: Arc::new(Optimizer::standard(&config.movement)),
            config: config.execution.clone(),
            search: config.search.clone(),
            moves,
            index: 0,
            locator,
            phase: Phase::Aligning { ticks: 0 },
            run: MoveRun::new(),
            retries: 0,
            abort: None,
            outcome: None,
            completed: Vec::new(),
            recoveries: Vec::new(),
        }
    }

    pub fn with_executors(mut self, executors: Arc<ExecutorSet>) -> Self {
        self.executors = executors;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Arc<Optimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The path being executed.  Replaced wholesale by a recovery.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Move> {
        self.moves.get(self.index)
    }

    /// Moves not yet completed, starting with the current one.
    pub fn remaining(&self) -> &[Move] {
        self.moves.get(self.index..).unwrap_or_default()
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Exit of every completed move, in completion order.
    pub fn completed(&self) -> &[BlockPos] {
        &self.completed
    }

    pub fn recoveries(&self) -> &[RecoveryRecord] {
        &self.recoveries
    }

    pub fn is_recovering(&self) -> bool {
        matches!(self.phase, Phase::Recovering(_))
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Ask the engine to unwind.  Observed at the start of the next tick.
    pub fn request_abort(&mut self, reason: AbortReason) {
        if self.outcome.is_none() && self.abort.is_none() {
            self.abort = Some(reason);
        }
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance execution by one tick.  Once a terminal status is returned
    /// every later call returns it again.
    pub fn tick(&mut self, host: &mut dyn Host, goal: &dyn Goal) -> ExecStatus {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        if let Some(reason) = self.abort.take() {
            if !matches!(self.phase, Phase::Aborting { .. }) {
                debug!(?reason, index = self.index, "abort requested");
                self.release(host);
                self.phase = Phase::Aborting { reason, ticks: 0 };
            }
        }
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let phase = std::mem::replace(&mut self.phase, Phase::Finished);
            match self.step(host, goal, phase) {
                Ok(Step::Next(phase)) => self.phase = phase,
                Ok(Step::Wait(phase)) => {
                    self.phase = phase;
                    return ExecStatus::Running;
                }
                Ok(Step::Done(status)) => return self.finish(host, status),
                Err(err) => return self.fail(host, err),
            }
        }
        ExecStatus::Running
    }

    fn step(&mut self, host: &mut dyn Host, goal: &dyn Goal, phase: Phase) -> ExecResult<Step> {
        match phase {
            Phase::Aligning { ticks } => self.align(host, ticks),
            Phase::Initializing => self.initialize(host),
            Phase::Performing { ticks, ceiling } => self.perform(host, ticks, ceiling),
            Phase::Aborting { reason, ticks } => Ok(self.unwind(host, reason, ticks)),
            Phase::Recovering(recovery) => self.replan(host, goal, recovery),
            Phase::Finished => Ok(Step::Done(ExecStatus::Completed)),
        }
    }

    fn executor(&self, mv: &Move) -> ExecResult<Arc<dyn MoveExecutor>> {
        self.executors
            .get(mv.kind())
            .cloned()
            .ok_or(ExecError::MissingExecutor(mv.kind()))
    }

    fn align(&mut self, host: &mut dyn Host, ticks: u32) -> ExecResult<Step> {
        let index = self.index;
        let Some(mv) = self.moves.get(index) else {
            return Ok(Step::Done(ExecStatus::Completed));
        };
        if ticks >= self.config.align_tick_ceiling {
            return Err(ExecError::AlignmentFailure { index, kind: mv.kind() });
        }
        let executor = self.executor(mv)?;
        let mut cx = ExecContext {
            host,
            config: &self.config,
            index,
            next: self.moves.get(index + 1),
        };
        if executor.align(&mut cx, mv) {
            Ok(Step::Next(Phase::Initializing))
        } else {
            Ok(Step::Wait(Phase::Aligning { ticks: ticks + 1 }))
        }
    }

    fn initialize(&mut self, host: &mut dyn Host) -> ExecResult<Step> {
        let index = self.index;
        let Some(mv) = self.moves.get(index) else {
            return Ok(Step::Done(ExecStatus::Completed));
        };
        let executor = self.executor(mv)?;
        self.run = MoveRun::new();
        let mut cx = ExecContext {
            host,
            config: &self.config,
            index,
            next: self.moves.get(index + 1),
        };
        executor.initialize(&mut cx, mv, &mut self.run)?;
        let ceiling = perform_ceiling(&*cx.host, &self.config, mv);
        debug!(index, kind = %mv.kind(), exit = %mv.exit(), ceiling, "move started");
        Ok(Step::Next(Phase::Performing { ticks: 0, ceiling }))
    }

    fn perform(&mut self, host: &mut dyn Host, ticks: u32, ceiling: u32) -> ExecResult<Step> {
        let index = self.index;
        if ticks >= ceiling {
            return Err(ExecError::MoveTimedOut { index, ticks });
        }
        let Some(mv) = self.moves.get(index) else {
            return Ok(Step::Done(ExecStatus::Completed));
        };
        let executor = self.executor(mv)?;
        let mut cx = ExecContext {
            host,
            config: &self.config,
            index,
            next: self.moves.get(index + 1),
        };
        match executor.perform(&mut cx, mv, &mut self.run)? {
            Perform::Pending => Ok(Step::Wait(Phase::Performing { ticks: ticks + 1, ceiling })),
            Perform::Complete(n) => {
                let n = n.clamp(1, self.moves.len() - index);
                self.completed.extend(self.moves[index..index + n].iter().map(Move::exit));
                self.index += n;
                self.run = MoveRun::new();
                debug!(index, ticks, "move complete");
                if self.index >= self.moves.len() {
                    return Ok(Step::Done(ExecStatus::Completed));
                }
                Ok(Step::Next(Phase::Aligning { ticks: 0 }))
            }
        }
    }

    fn unwind(&mut self, host: &mut dyn Host, reason: AbortReason, ticks: u32) -> Step {
        host.clear_controls();
        if !host.player().is_settled() && ticks < self.config.abort_timeout_ticks {
            return Step::Wait(Phase::Aborting { reason, ticks: ticks + 1 });
        }
        Step::Done(match reason {
            AbortReason::User => ExecStatus::Failed(ExecError::UserAbort),
            AbortReason::Reset => ExecStatus::Failed(ExecError::ResetRequested),
            AbortReason::Stop => ExecStatus::Stopped,
        })
    }

    // ── Recovery ──────────────────────────────────────────────────────────

    fn fail(&mut self, host: &mut dyn Host, err: ExecError) -> ExecStatus {
        if !err.is_recoverable() {
            warn!(%err, index = self.index, "execution failed");
            return self.finish(host, ExecStatus::Failed(err));
        }
        self.retries += 1;
        if self.retries > self.config.max_recovery_retries {
            let retries = self.config.max_recovery_retries;
            warn!(%err, retries, "recovery exhausted");
            return self.finish(host, ExecStatus::Failed(ExecError::RecoveryExhausted { retries }));
        }
        self.release(host);

        let failed = err.index().unwrap_or(self.index);
        let nearest = self.locator.nearest(host.player().pos);
        let resume_at = match nearest {
            Some((k, distance))
                if k >= failed && distance <= self.config.recovery_max_distance => Some(k),
            _ => None,
        };
        let target = match resume_at.and_then(|k| self.moves.get(k).map(|mv| (k, mv.entry()))) {
            Some((resume_at, entry)) => Target::Rejoin { resume_at, goal: GoalBlock::new(entry) },
            None => Target::Goal,
        };
        info!(
            %err,
            retry = self.retries,
            failed,
            resume_at = ?resume_at,
            "recovering"
        );
        self.recoveries.push(RecoveryRecord {
            error: err,
            failed,
            nearest: nearest.map(|(k, _)| k),
            distance: nearest.map_or(f64::INFINITY, |(_, d)| d),
            resume_at,
        });
        self.phase = Phase::Recovering(Box::new(Recovery { target, producer: None, waited: 0 }));
        ExecStatus::Running
    }

    /// One recovery search slice.  The search starts once the agent has
    /// settled, so its root is where the agent actually stands.
    fn replan(
        &mut self,
        host:         &mut dyn Host,
        goal:         &dyn Goal,
        mut recovery: Box<Recovery>,
    ) -> ExecResult<Step> {
        let state = *host.player();
        if recovery.producer.is_none()
            && !state.is_settled()
            && recovery.waited < self.config.abort_timeout_ticks
        {
            recovery.waited += 1;
            return Ok(Step::Wait(Phase::Recovering(recovery)));
        }

        let Recovery { target, producer, .. } = &mut *recovery;
        let blocks = host.placeable_blocks();
        let producer = producer.get_or_insert_with(|| {
            ContinuousProducer::new(
                Move::start(state.block_pos(), blocks),
                Arc::clone(&self.providers),
                &self.search,
            )
        });
        let path = match target {
            Target::Rejoin { goal: entry, .. } => producer.advance(&*entry, host.world()),
            Target::Goal => producer.advance(goal, host.world()),
        };

        match path.status {
            PathStatus::Success => {
                let replan = self.optimizer.optimize(path.moves);
                let moves = match *target {
                    Target::Rejoin { resume_at, .. } => {
                        let rest = self.moves.split_off(resume_at.min(self.moves.len()));
                        replan.into_iter().chain(rest).collect()
                    }
                    Target::Goal => replan,
                };
                debug!(moves = moves.len(), "recovery path installed");
                self.install(moves);
                Ok(Step::Next(Phase::Aligning { ticks: 0 }))
            }
            PathStatus::Partial => Ok(Step::Wait(Phase::Recovering(recovery))),
            status => Err(ExecError::ReplanFailed { status }),
        }
    }

    fn install(&mut self, moves: Vec<Move>) {
        self.locator = EntryLocator::new(&moves);
        self.moves = moves;
        self.index = 0;
        self.run = MoveRun::new();
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Cancel interactions in flight and release every control.
    fn release(&mut self, host: &mut dyn Host) {
        self.run.cancel_all(host);
        host.clear_controls();
    }

    fn finish(&mut self, host: &mut dyn Host, status: ExecStatus) -> ExecStatus {
        self.release(host);
        self.phase = Phase::Finished;
        info!(?status, completed = self.completed.len(), retries = self.retries, "execution finished");
        self.outcome = Some(status.clone());
        status
    }
}

/// Perform ceiling for `mv`: the configured base, travel time, and the
/// host's estimate for every interaction (each capped at the base).
fn perform_ceiling(host: &dyn Host, config: &ExecutionConfig, mv: &Move) -> u32 {
    let base = config.perform_tick_ceiling;
    let travel = mv.entry().center().horizontal_distance(mv.exit().center()) * TICKS_PER_BLOCK;
    let interactions: u32 = mv
        .breaks()
        .iter()
        .map(|&pos| Interaction::Break(pos))
        .chain(mv.places().iter().map(|&intent| Interaction::Place(intent)))
        .map(|i| host.estimate_ticks(&i, base).min(base))
        .sum();
    base + travel.ceil() as u32 + interactions
}
