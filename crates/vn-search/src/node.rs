//! The searchable unit: `Move`, its canonical `NodeKey`, and the `MoveArena`.
//!
//! # Ownership model
//!
//! Moves form a tree through predecessor links.  Instead of reference
//! cycles, every move lives in a [`MoveArena`] and stores its parent's
//! [`NodeId`]; reconstruction walks indices backwards and reverses.  A move
//! is never mutated after it enters the arena — successors are new values.
//!
//! # Invariants
//!
//! For every non-root move:
//!
//! * `g == parent.g + cost` and `cost >= 0`;
//! * `remaining_blocks == parent.remaining_blocks - places.len()`.
//!
//! Both are established by [`Move::child`], the only constructor the search
//! uses for successors.

use std::fmt;

use vn_core::{BlockPos, NodeId, PlaceIntent, Vec3};

/// Velocity quantisation used in [`NodeKey`] (tenths of a block per tick).
const VELOCITY_RESOLUTION: f64 = 10.0;

// ── MoveKind ──────────────────────────────────────────────────────────────────

/// The closed set of motion primitives.  Providers, executors and optimizer
/// passes are all registered against one of these tags.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum MoveKind {
    /// Search root; never executed.
    Start,
    Forward,
    Diagonal,
    JumpUp,
    DropDown,
    Pillar,
    DigDown,
    Parkour,
}

impl MoveKind {
    /// Every executable kind, in registry order.
    pub const ALL: [MoveKind; 7] = [
        MoveKind::Forward,
        MoveKind::Diagonal,
        MoveKind::JumpUp,
        MoveKind::DropDown,
        MoveKind::Pillar,
        MoveKind::DigDown,
        MoveKind::Parkour,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveKind::Start    => "start",
            MoveKind::Forward  => "forward",
            MoveKind::Diagonal => "diagonal",
            MoveKind::JumpUp   => "jump_up",
            MoveKind::DropDown => "drop_down",
            MoveKind::Pillar   => "pillar",
            MoveKind::DigDown  => "dig_down",
            MoveKind::Parkour  => "parkour",
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── NodeKey ───────────────────────────────────────────────────────────────────

/// Canonical identity of a search state for the open and closed sets.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeKey {
    pub pos: BlockPos,
    pub vel: [i32; 3],
}

impl NodeKey {
    pub fn new(pos: BlockPos, vel: Vec3) -> Self {
        Self { pos, vel: vel.quantize(VELOCITY_RESOLUTION) }
    }
}

// ── Candidate ─────────────────────────────────────────────────────────────────

/// A successor proposed by a movement provider.
///
/// Providers only describe the transition; the engine turns it into a
/// [`Move`] so the cost and resource invariants are enforced in one place.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub kind:   MoveKind,
    /// Where execution starts aligning (normally the parent's position).
    pub entry:  BlockPos,
    /// Destination feet position.
    pub pos:    BlockPos,
    pub vel:    Vec3,
    /// Transition cost, already escalated; must be non-negative.
    pub cost:   f64,
    pub breaks: Vec<BlockPos>,
    pub places: Vec<PlaceIntent>,
}

impl Candidate {
    pub fn new(kind: MoveKind, entry: BlockPos, pos: BlockPos, cost: f64) -> Self {
        Self {
            kind,
            entry,
            pos,
            vel: Vec3::ZERO,
            cost,
            breaks: Vec::new(),
            places: Vec::new(),
        }
    }

    pub fn with_breaks(mut self, breaks: Vec<BlockPos>) -> Self {
        self.breaks = breaks;
        self
    }

    pub fn with_places(mut self, places: Vec<PlaceIntent>) -> Self {
        self.places = places;
        self
    }

    pub fn with_velocity(mut self, vel: Vec3) -> Self {
        self.vel = vel;
        self
    }
}

// ── Move ──────────────────────────────────────────────────────────────────────

/// A search node specialised with cost, predecessor link and interactions.
#[derive(Clone, Debug, PartialEq)]
pub struct Move {
    pos:              BlockPos,
    vel:              Vec3,
    remaining_blocks: u32,
    g:                f64,
    h:                f64,
    cost:             f64,
    kind:             MoveKind,
    parent:           Option<NodeId>,
    depth:            u32,
    entry:            BlockPos,
    breaks:           Vec<BlockPos>,
    places:           Vec<PlaceIntent>,
}

impl Move {
    /// A search root at rest at `pos` with `remaining_blocks` to place.
    pub fn start(pos: BlockPos, remaining_blocks: u32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            remaining_blocks,
            g: 0.0,
            h: 0.0,
            cost: 0.0,
            kind: MoveKind::Start,
            parent: None,
            depth: 0,
            entry: pos,
            breaks: Vec::new(),
            places: Vec::new(),
        }
    }

    /// Build the successor of `parent` (stored at `parent_id`) described by
    /// `candidate`.  `h` is filled in later via [`Move::with_heuristic`].
    ///
    /// Returns `None` if the candidate is malformed: negative or non-finite
    /// cost, or more place intents than the parent has blocks.
    pub fn child(parent_id: NodeId, parent: &Move, candidate: Candidate) -> Option<Self> {
        if !(candidate.cost >= 0.0) || !candidate.cost.is_finite() {
            return None;
        }
        let placed = u32::try_from(candidate.places.len()).ok()?;
        let remaining_blocks = parent.remaining_blocks.checked_sub(placed)?;
        Some(Self {
            pos: candidate.pos,
            vel: candidate.vel,
            remaining_blocks,
            g: parent.g + candidate.cost,
            h: 0.0,
            cost: candidate.cost,
            kind: candidate.kind,
            parent: Some(parent_id),
            depth: parent.depth + 1,
            entry: candidate.entry,
            breaks: candidate.breaks,
            places: candidate.places,
        })
    }

    /// A fresh root at this move's exit, carrying velocity and blocks over.
    /// Used when a chained search continues from a sub-path's end.
    pub fn rebase(&self) -> Self {
        Self {
            vel: self.vel,
            ..Self::start(self.pos, self.remaining_blocks)
        }
    }

    /// Collapse a contiguous window of same-kind moves into one.
    ///
    /// The result keeps the first entry, the last exit, velocity, resources
    /// and `g`, sums the transition costs, and concatenates every break and
    /// place intent in order.  Returns `None` for an empty window.
    pub fn merge_window(window: &[Move]) -> Option<Self> {
        let first = window.first()?;
        let last = window.last()?;
        Some(Self {
            pos: last.pos,
            vel: last.vel,
            remaining_blocks: last.remaining_blocks,
            g: last.g,
            h: last.h,
            cost: window.iter().map(|m| m.cost).sum(),
            kind: first.kind,
            parent: first.parent,
            depth: last.depth,
            entry: first.entry,
            breaks: window.iter().flat_map(|m| m.breaks.iter().copied()).collect(),
            places: window.iter().flat_map(|m| m.places.iter().copied()).collect(),
        })
    }

    pub(crate) fn with_heuristic(mut self, h: f64) -> Self {
        self.h = h;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Feet position after the move; identical to [`exit`][Self::exit].
    #[inline]
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Where the move is considered complete.
    #[inline]
    pub fn exit(&self) -> BlockPos {
        self.pos
    }

    /// Where execution begins aligning.
    #[inline]
    pub fn entry(&self) -> BlockPos {
        self.entry
    }

    #[inline]
    pub fn vel(&self) -> Vec3 {
        self.vel
    }

    #[inline]
    pub fn remaining_blocks(&self) -> u32 {
        self.remaining_blocks
    }

    /// Accumulated cost from the search root.
    #[inline]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Heuristic estimate recorded when the move was generated.
    #[inline]
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Cost of the transition from the predecessor.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn breaks(&self) -> &[BlockPos] {
        &self.breaks
    }

    pub fn places(&self) -> &[PlaceIntent] {
        &self.places
    }

    pub fn has_interactions(&self) -> bool {
        !self.breaks.is_empty() || !self.places.is_empty()
    }

    /// Displacement from entry to exit.
    #[inline]
    pub fn delta(&self) -> BlockPos {
        self.pos - self.entry
    }

    #[inline]
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.pos, self.vel)
    }
}

// ── MoveArena ─────────────────────────────────────────────────────────────────

/// Append-only storage for every move a search has accepted.
#[derive(Default)]
pub struct MoveArena {
    moves: Vec<Move>,
}

impl MoveArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `mv` and return its id.
    pub fn push(&mut self, mv: Move) -> NodeId {
        let id = NodeId(self.moves.len() as u32);
        self.moves.push(mv);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Move> {
        self.moves.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves from just after the root to `end`, in execution order.
    ///
    /// The root (the move without a parent) is not included, so the first
    /// returned move's entry is the search's start position.
    pub fn reconstruct(&self, end: NodeId) -> Vec<Move> {
        let mut out = Vec::new();
        let mut cur = self.get(end);
        while let Some(mv) = cur {
            let Some(parent) = mv.parent else {
                break;
            };
            out.push(mv.clone());
            cur = self.get(parent);
        }
        out.reverse();
        out
    }
}

impl std::ops::Index<NodeId> for MoveArena {
    type Output = Move;
    #[inline]
    fn index(&self, id: NodeId) -> &Move {
        &self.moves[id.index()]
    }
}
