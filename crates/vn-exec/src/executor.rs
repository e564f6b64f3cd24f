//! The per-move executor contract and the state every executor shares.
//!
//! An executor drives one [`MoveKind`] through three stages:
//!
//! | Stage        | Called                   | Responsibility                            |
//! |--------------|--------------------------|-------------------------------------------|
//! | `align`      | every tick until `true`  | reach the entry and face the exit         |
//! | `initialize` | once                     | issue interactions, reset per-move state  |
//! | `perform`    | every tick until done    | steer, poll interactions, detect arrival  |
//!
//! Executors are stateless; everything that belongs to the move in flight
//! lives in [`MoveRun`], which the engine owns and discards on completion.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use vn_core::{
    yaw_towards, ControlState, ExecutionConfig, Host, Interaction, InteractionId,
    InteractionStatus, PlayerState,
};
use vn_moves::{steer, Steering};
use vn_search::{Move, MoveKind};

use crate::{DigExecutor, ExecError, ExecResult, JumpExecutor, PillarExecutor, WalkExecutor};

/// How far off its entry block the agent may be and still walk back onto it
/// during alignment.
pub const NEAR_ENTRY: f64 = 1.5;

// ── Contract ──────────────────────────────────────────────────────────────────

/// Result of one `perform` tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Perform {
    Pending,
    /// The current move is done; advance the path index by this many moves.
    Complete(usize),
}

/// Everything an executor may touch during one tick.
pub struct ExecContext<'a> {
    pub host:   &'a mut dyn Host,
    pub config: &'a ExecutionConfig,
    /// Index of the current move in the engine's path.
    pub index:  usize,
    /// The move after the current one, if any.
    pub next:   Option<&'a Move>,
}

pub trait MoveExecutor: Send + Sync {
    /// The move kinds this executor drives.
    fn kinds(&self) -> &'static [MoveKind];

    fn align(&self, cx: &mut ExecContext<'_>, mv: &Move) -> bool;

    fn initialize(&self, cx: &mut ExecContext<'_>, mv: &Move, run: &mut MoveRun) -> ExecResult<()>;

    fn perform(
        &self,
        cx:  &mut ExecContext<'_>,
        mv:  &Move,
        run: &mut MoveRun,
    ) -> ExecResult<Perform>;
}

// ── MoveRun ───────────────────────────────────────────────────────────────────

/// Per-move scratch state: interactions in flight and stage flags.
#[derive(Debug, Default)]
pub struct MoveRun {
    pending: Vec<(InteractionId, Interaction)>,
    issued:  usize,
    /// Set once a deferred place has been issued.
    pub placed: bool,
}

impl MoveRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interactions still in flight.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Interactions issued over the life of this run.
    pub fn issued(&self) -> usize {
        self.issued
    }

    pub fn issue(&mut self, host: &mut dyn Host, interaction: Interaction) {
        let id = host.begin_interaction(interaction);
        trace!(%id, ?interaction, "interaction issued");
        self.pending.push((id, interaction));
        self.issued += 1;
    }

    /// Issue every break of `mv` whose target is still in the way.
    pub fn issue_breaks(&mut self, host: &mut dyn Host, mv: &Move) {
        for &pos in mv.breaks() {
            if host.world().block_info(pos).is_passable() {
                continue;
            }
            self.issue(host, Interaction::Break(pos));
        }
    }

    pub fn issue_places(&mut self, host: &mut dyn Host, mv: &Move) {
        for &intent in mv.places() {
            self.issue(host, Interaction::Place(intent));
        }
    }

    /// Poll everything in flight.  `Ok(true)` once nothing is pending.
    pub fn poll(&mut self, host: &mut dyn Host, index: usize) -> ExecResult<bool> {
        let mut cancelled = None;
        self.pending.retain(|&(id, interaction)| match host.poll_interaction(id) {
            InteractionStatus::Pending => true,
            InteractionStatus::Done => false,
            InteractionStatus::Cancelled => {
                cancelled.get_or_insert(interaction.target());
                false
            }
        });
        match cancelled {
            Some(target) => Err(ExecError::CancelledInteraction { index, target }),
            None => Ok(self.pending.is_empty()),
        }
    }

    /// Cancel everything in flight.
    pub fn cancel_all(&mut self, host: &mut dyn Host) {
        for (id, _) in self.pending.drain(..) {
            host.cancel_interaction(id);
        }
    }
}

// ── Shared behaviour ──────────────────────────────────────────────────────────

/// Apply a steering decision, optionally with jump held.
pub fn apply(host: &mut dyn Host, steering: Steering, jump: bool) {
    let pitch = host.player().pitch;
    host.look(steering.yaw, pitch);
    host.set_controls(ControlState { jump, ..steering.controls });
}

/// Standard alignment: settled on the entry block, facing the exit.
///
/// An agent that is on the entry's level and within [`NEAR_ENTRY`] of it is
/// walked back onto it; anywhere else it waits for the align ceiling.
pub fn align_to_entry(cx: &mut ExecContext<'_>, mv: &Move) -> bool {
    let state = *cx.host.player();
    let entry = mv.entry();
    if state.block_pos() == entry && state.is_settled() {
        cx.host.clear_controls();
        cx.host.look(yaw_towards(state.pos, mv.exit().center()), 0.0);
        return true;
    }
    let target = entry.center();
    if state.block_pos().y == entry.y && state.pos.horizontal_distance(target) <= NEAR_ENTRY {
        apply(cx.host, steer(&state, target, cx.config.arrive_distance, false), false);
    } else {
        cx.host.clear_controls();
    }
    false
}

/// Project one tick with the held controls and decide whether `mv` is done:
/// settled in the exit block, within tolerance of its centre, not pushing
/// into a wall, and not heading away from the next move.
pub fn is_complete(cx: &ExecContext<'_>, mv: &Move) -> bool {
    let host = &*cx.host;
    let state = host.player();
    let controls = host.controls();
    let projected = host.simulator().step(host.world(), state, controls);
    let exit = mv.exit();
    projected.is_settled()
        && projected.block_pos() == exit
        && projected.pos.horizontal_distance(exit.center()) <= cx.config.completion_tolerance
        && !projected.collided_horizontally
        && (!controls.forward || heads_toward(cx.next, state))
}

fn heads_toward(next: Option<&Move>, state: &PlayerState) -> bool {
    let Some(next) = next else {
        return true;
    };
    let to = (next.exit().center() - state.pos).flat();
    to.horizontal_length() < 1e-6 || state.heading().dot(to) > 0.0
}

// ── ExecutorSet ───────────────────────────────────────────────────────────────

/// Executors keyed by the move kind they drive.
#[derive(Clone, Default)]
pub struct ExecutorSet {
    executors: BTreeMap<MoveKind, Arc<dyn MoveExecutor>>,
}

impl ExecutorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One executor for every executable kind.
    pub fn standard() -> Self {
        Self::new()
            .with(WalkExecutor)
            .with(JumpExecutor)
            .with(PillarExecutor)
            .with(DigExecutor)
    }

    /// Register `executor` for each of its kinds, replacing earlier entries.
    pub fn with(mut self, executor: impl MoveExecutor + 'static) -> Self {
        let executor: Arc<dyn MoveExecutor> = Arc::new(executor);
        for &kind in executor.kinds() {
            self.executors.insert(kind, Arc::clone(&executor));
        }
        self
    }

    pub fn get(&self, kind: MoveKind) -> Option<&Arc<dyn MoveExecutor>> {
        self.executors.get(&kind)
    }

    pub fn contains(&self, kind: MoveKind) -> bool {
        self.executors.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = MoveKind> + '_ {
        self.executors.keys().copied()
    }
}
