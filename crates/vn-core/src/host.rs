//! The `Host` capability — the agent's control and interaction interface.
//!
//! Execution never touches a bot client directly.  Each tick the execution
//! engine reads the player state, sets controls and look direction, and
//! issues or polls block interactions through this trait.  Interactions are
//! multi-tick: `begin_interaction` returns immediately and the host reports
//! progress through `poll_interaction`.

use crate::{BlockPos, ControlState, InteractionId, PlayerState, Simulator, World};

/// Place a block at `pos`, clicking the face of `against`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PlaceIntent {
    pub pos:     BlockPos,
    pub against: BlockPos,
}

/// A block interaction requested by a move.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Interaction {
    Break(BlockPos),
    Place(PlaceIntent),
}

impl Interaction {
    /// The block this interaction changes.
    pub fn target(&self) -> BlockPos {
        match self {
            Interaction::Break(pos) => *pos,
            Interaction::Place(intent) => intent.pos,
        }
    }
}

/// Progress of an issued interaction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InteractionStatus {
    Pending,
    Done,
    /// Interrupted by the world or the host (block changed, tool broke,
    /// out of reach).  Execution treats this as recoverable.
    Cancelled,
}

/// Agent control surface consumed by the execution engine.
pub trait Host {
    fn world(&self) -> &dyn World;

    fn simulator(&self) -> &dyn Simulator;

    fn player(&self) -> &PlayerState;

    /// Controls currently held.
    fn controls(&self) -> &ControlState;

    fn set_controls(&mut self, controls: ControlState);

    fn look(&mut self, yaw: f64, pitch: f64);

    /// Blocks in the inventory that may be used for scaffolding.
    fn placeable_blocks(&self) -> u32;

    fn begin_interaction(&mut self, interaction: Interaction) -> InteractionId;

    fn poll_interaction(&mut self, id: InteractionId) -> InteractionStatus;

    /// Abort an in-flight interaction.  Unknown or finished ids are ignored.
    fn cancel_interaction(&mut self, id: InteractionId);

    /// Estimated ticks to perform `interaction`, given at most `budget`
    /// ticks of allowance.  Returns `budget` or more when it will not fit.
    fn estimate_ticks(&self, interaction: &Interaction, budget: u32) -> u32;

    /// Release every control.
    fn clear_controls(&mut self) {
        self.set_controls(ControlState::default());
    }
}
