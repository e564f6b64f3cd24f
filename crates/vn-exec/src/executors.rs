//! The standard executors.
//!
//! | Executor           | Kinds                                 | Interactions                    |
//! |--------------------|---------------------------------------|---------------------------------|
//! | [`WalkExecutor`]   | `Forward`, `Diagonal`, `DropDown`     | all issued up front             |
//! | [`JumpExecutor`]   | `JumpUp`, `Parkour`                   | all issued up front             |
//! | [`PillarExecutor`] | `Pillar`                              | breaks first, place at the apex |
//! | [`DigExecutor`]    | `DigDown`                             | floor broken once centred       |
//!
//! Every executor holds still while interactions are in flight and only
//! starts moving once the way is clear.

use vn_core::ControlState;
use vn_moves::{jump_at_edge, steer};
use vn_search::{Move, MoveKind};

use crate::executor::{align_to_entry, apply, is_complete};
use crate::{ExecContext, ExecResult, MoveExecutor, MoveRun, Perform};

/// Wait for interactions; `false` (and controls released) while any are
/// still pending.
fn interactions_done(cx: &mut ExecContext<'_>, run: &mut MoveRun) -> ExecResult<bool> {
    if run.poll(cx.host, cx.index)? {
        return Ok(true);
    }
    cx.host.clear_controls();
    Ok(false)
}

fn finish(cx: &ExecContext<'_>, mv: &Move) -> Perform {
    if is_complete(cx, mv) { Perform::Complete(1) } else { Perform::Pending }
}

// ── WalkExecutor ──────────────────────────────────────────────────────────────

/// Walk to the exit centre.  Drops fall out of this naturally once the
/// agent's box clears the edge.
pub struct WalkExecutor;

impl MoveExecutor for WalkExecutor {
    fn kinds(&self) -> &'static [MoveKind] {
        &[MoveKind::Forward, MoveKind::Diagonal, MoveKind::DropDown]
    }

    fn align(&self, cx: &mut ExecContext<'_>, mv: &Move) -> bool {
        align_to_entry(cx, mv)
    }

    fn initialize(&self, cx: &mut ExecContext<'_>, mv: &Move, run: &mut MoveRun) -> ExecResult<()> {
        run.issue_breaks(cx.host, mv);
        run.issue_places(cx.host, mv);
        Ok(())
    }

    fn perform(
        &self,
        cx:  &mut ExecContext<'_>,
        mv:  &Move,
        run: &mut MoveRun,
    ) -> ExecResult<Perform> {
        if !interactions_done(cx, run)? {
            return Ok(Perform::Pending);
        }
        let state = *cx.host.player();
        apply(cx.host, steer(&state, mv.exit().center(), cx.config.arrive_distance, false), false);
        Ok(finish(cx, mv))
    }
}

// ── JumpExecutor ──────────────────────────────────────────────────────────────

/// `JumpUp` jumps from the entry block straight away; `Parkour` sprints and
/// jumps on the last grounded tick inside the entry column, exactly as the
/// jump table simulated it.
pub struct JumpExecutor;

impl MoveExecutor for JumpExecutor {
    fn kinds(&self) -> &'static [MoveKind] {
        &[MoveKind::JumpUp, MoveKind::Parkour]
    }

    fn align(&self, cx: &mut ExecContext<'_>, mv: &Move) -> bool {
        align_to_entry(cx, mv)
    }

    fn initialize(&self, cx: &mut ExecContext<'_>, mv: &Move, run: &mut MoveRun) -> ExecResult<()> {
        run.issue_breaks(cx.host, mv);
        run.issue_places(cx.host, mv);
        Ok(())
    }

    fn perform(
        &self,
        cx:  &mut ExecContext<'_>,
        mv:  &Move,
        run: &mut MoveRun,
    ) -> ExecResult<Perform> {
        if !interactions_done(cx, run)? {
            return Ok(Perform::Pending);
        }
        let host = &*cx.host;
        let state = *host.player();
        let parkour = mv.kind() == MoveKind::Parkour;
        let steering = steer(&state, mv.exit().center(), cx.config.arrive_distance, parkour);
        let jump = if parkour {
            jump_at_edge(host.simulator(), host.world(), &state, &steering, mv.entry())
        } else {
            state.on_ground && state.block_pos() == mv.entry()
        };
        apply(cx.host, steering, jump);
        Ok(finish(cx, mv))
    }
}

// ── PillarExecutor ────────────────────────────────────────────────────────────

/// Clear the headroom, jump, and place the scaffold underfoot once the feet
/// are a full block above the entry.
pub struct PillarExecutor;

impl MoveExecutor for PillarExecutor {
    fn kinds(&self) -> &'static [MoveKind] {
        &[MoveKind::Pillar]
    }

    fn align(&self, cx: &mut ExecContext<'_>, mv: &Move) -> bool {
        align_to_entry(cx, mv)
    }

    fn initialize(&self, cx: &mut ExecContext<'_>, mv: &Move, run: &mut MoveRun) -> ExecResult<()> {
        run.issue_breaks(cx.host, mv);
        run.placed = mv.places().is_empty();
        Ok(())
    }

    fn perform(
        &self,
        cx:  &mut ExecContext<'_>,
        mv:  &Move,
        run: &mut MoveRun,
    ) -> ExecResult<Perform> {
        if !interactions_done(cx, run)? {
            return Ok(Perform::Pending);
        }
        if !run.placed {
            let state = *cx.host.player();
            if state.pos.y >= mv.entry().y as f64 + 1.0 {
                run.issue_places(cx.host, mv);
                run.placed = true;
                cx.host.clear_controls();
                return Ok(Perform::Pending);
            }
            let jump = state.on_ground && state.block_pos() == mv.entry();
            cx.host.set_controls(ControlState { jump, ..ControlState::default() });
            return Ok(Perform::Pending);
        }
        cx.host.clear_controls();
        Ok(finish(cx, mv))
    }
}

// ── DigExecutor ───────────────────────────────────────────────────────────────

/// Centre over the floor block, break it and drop into the hole.
pub struct DigExecutor;

impl MoveExecutor for DigExecutor {
    fn kinds(&self) -> &'static [MoveKind] {
        &[MoveKind::DigDown]
    }

    fn align(&self, cx: &mut ExecContext<'_>, mv: &Move) -> bool {
        if !align_to_entry(cx, mv) {
            return false;
        }
        let state = *cx.host.player();
        let centre = mv.entry().center();
        if state.pos.horizontal_distance(centre) <= cx.config.arrive_distance {
            return true;
        }
        apply(cx.host, steer(&state, centre, cx.config.arrive_distance, false), false);
        false
    }

    fn initialize(&self, cx: &mut ExecContext<'_>, mv: &Move, run: &mut MoveRun) -> ExecResult<()> {
        cx.host.clear_controls();
        run.issue_breaks(cx.host, mv);
        Ok(())
    }

    fn perform(
        &self,
        cx:  &mut ExecContext<'_>,
        mv:  &Move,
        run: &mut MoveRun,
    ) -> ExecResult<Perform> {
        if !interactions_done(cx, run)? {
            return Ok(Perform::Pending);
        }
        cx.host.clear_controls();
        Ok(finish(cx, mv))
    }
}
