//! Goals: acceptance predicate plus heuristic.
//!
//! | Goal                 | Accepts a move whose position…                     |
//! |----------------------|----------------------------------------------------|
//! | [`GoalBlock`]        | equals the target                                  |
//! | [`GoalNear`]         | lies within `range` of the target                  |
//! | [`GoalXZ`]           | is in the target column (any height)               |
//! | [`GoalY`]            | is at the target height                            |
//! | [`GoalGetToBlock`]   | is face-adjacent to the target block               |
//! | [`GoalCompositeAny`] | satisfies any of its children                      |
//! | [`GoalFollow`]       | is within `range` of a moving entity (dynamic)     |
//!
//! # Dynamic goals
//!
//! A dynamic goal never subscribes to anything itself.  The driving loop
//! forwards [`GoalEvent`]s whose kind appears in
//! [`Goal::invalidation_events`] or [`Goal::update_events`] and acts on the
//! answers of [`Goal::invalidated_by`] and [`Goal::update`].  When the
//! pursuit resolves (reached, invalidated or aborted) the loop calls
//! [`Goal::cleanup`] exactly once.

use vn_core::{BlockPos, ChunkId};

use crate::Move;

// ── Events ────────────────────────────────────────────────────────────────────

/// Categories of external change a dynamic goal can watch.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum GoalEventKind {
    BlockUpdate,
    EntityMoved,
    EntityGone,
    ChunkLoaded,
}

/// An external change forwarded by the driving loop.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct GoalEvent {
    pub kind:   GoalEventKind,
    pub entity: Option<u32>,
    pub pos:    Option<BlockPos>,
    pub chunk:  Option<ChunkId>,
}

impl GoalEvent {
    pub fn entity_moved(entity: u32, pos: BlockPos) -> Self {
        Self {
            kind:   GoalEventKind::EntityMoved,
            entity: Some(entity),
            pos:    Some(pos),
            chunk:  None,
        }
    }

    pub fn entity_gone(entity: u32) -> Self {
        Self { kind: GoalEventKind::EntityGone, entity: Some(entity), pos: None, chunk: None }
    }

    pub fn block_update(pos: BlockPos) -> Self {
        Self {
            kind:   GoalEventKind::BlockUpdate,
            entity: None,
            pos:    Some(pos),
            chunk:  Some(pos.chunk()),
        }
    }

    pub fn chunk_loaded(chunk: ChunkId) -> Self {
        Self { kind: GoalEventKind::ChunkLoaded, entity: None, pos: None, chunk: Some(chunk) }
    }
}

// ── Goal trait ────────────────────────────────────────────────────────────────

pub trait Goal: Send {
    fn is_end(&self, mv: &Move) -> bool;

    /// Estimated remaining cost.  Close to the true cost, not necessarily a
    /// strict lower bound.
    fn heuristic(&self, mv: &Move) -> f64;

    fn is_dynamic(&self) -> bool {
        false
    }

    /// Event kinds that should be checked with [`invalidated_by`][Self::invalidated_by].
    fn invalidation_events(&self) -> &[GoalEventKind] {
        &[]
    }

    /// Event kinds that should be fed to [`update`][Self::update].
    fn update_events(&self) -> &[GoalEventKind] {
        &[]
    }

    fn invalidated_by(&self, _event: &GoalEvent) -> bool {
        false
    }

    /// Absorb `event`; returns `true` if the target moved and the current
    /// path should be recomputed.
    fn update(&mut self, _event: &GoalEvent) -> bool {
        false
    }

    fn cleanup(&mut self) {}
}

impl<G: Goal + ?Sized> Goal for Box<G> {
    fn is_end(&self, mv: &Move) -> bool {
        (**self).is_end(mv)
    }
    fn heuristic(&self, mv: &Move) -> f64 {
        (**self).heuristic(mv)
    }
    fn is_dynamic(&self) -> bool {
        (**self).is_dynamic()
    }
    fn invalidation_events(&self) -> &[GoalEventKind] {
        (**self).invalidation_events()
    }
    fn update_events(&self) -> &[GoalEventKind] {
        (**self).update_events()
    }
    fn invalidated_by(&self, event: &GoalEvent) -> bool {
        (**self).invalidated_by(event)
    }
    fn update(&mut self, event: &GoalEvent) -> bool {
        (**self).update(event)
    }
    fn cleanup(&mut self) {
        (**self).cleanup()
    }
}

// ── Heuristic helpers ─────────────────────────────────────────────────────────

/// Octile distance in the x/z plane: diagonal steps cost √2.
#[inline]
pub fn octile_xz(from: BlockPos, to: BlockPos) -> f64 {
    let dx = (to.x - from.x).unsigned_abs() as f64;
    let dz = (to.z - from.z).unsigned_abs() as f64;
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    hi + (std::f64::consts::SQRT_2 - 1.0) * lo
}

#[inline]
fn block_distance(from: BlockPos, to: BlockPos) -> f64 {
    octile_xz(from, to) + (to.y - from.y).unsigned_abs() as f64
}

// ── Static goals ──────────────────────────────────────────────────────────────

/// Stand exactly at `pos`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GoalBlock {
    pub pos: BlockPos,
}

impl GoalBlock {
    pub fn new(pos: BlockPos) -> Self {
        Self { pos }
    }
}

impl Goal for GoalBlock {
    fn is_end(&self, mv: &Move) -> bool {
        mv.pos() == self.pos
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        block_distance(mv.pos(), self.pos)
    }
}

/// Stand within `range` blocks (Euclidean) of `pos`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GoalNear {
    pub pos:   BlockPos,
    pub range: f64,
}

impl GoalNear {
    pub fn new(pos: BlockPos, range: f64) -> Self {
        Self { pos, range }
    }
}

impl Goal for GoalNear {
    fn is_end(&self, mv: &Move) -> bool {
        (mv.pos().distance_sq(self.pos) as f64) <= self.range * self.range
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        (block_distance(mv.pos(), self.pos) - self.range).max(0.0)
    }
}

/// Reach the column `(x, z)` at any height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GoalXZ {
    pub x: i32,
    pub z: i32,
}

impl GoalXZ {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl Goal for GoalXZ {
    fn is_end(&self, mv: &Move) -> bool {
        mv.pos().x == self.x && mv.pos().z == self.z
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        let p = mv.pos();
        octile_xz(p, BlockPos::new(self.x, p.y, self.z))
    }
}

/// Reach height `y` anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GoalY {
    pub y: i32,
}

impl GoalY {
    pub fn new(y: i32) -> Self {
        Self { y }
    }
}

impl Goal for GoalY {
    fn is_end(&self, mv: &Move) -> bool {
        mv.pos().y == self.y
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        (self.y - mv.pos().y).unsigned_abs() as f64
    }
}

/// Stand next to `pos` (sharing a face), e.g. to interact with it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GoalGetToBlock {
    pub pos: BlockPos,
}

impl GoalGetToBlock {
    pub fn new(pos: BlockPos) -> Self {
        Self { pos }
    }
}

impl Goal for GoalGetToBlock {
    fn is_end(&self, mv: &Move) -> bool {
        mv.pos().manhattan(self.pos) == 1
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        (block_distance(mv.pos(), self.pos) - 1.0).max(0.0)
    }
}

/// Accepts a move if any child goal does; the heuristic is the smallest.
#[derive(Default)]
pub struct GoalCompositeAny {
    goals:        Vec<Box<dyn Goal>>,
    invalidation: Vec<GoalEventKind>,
    updates:      Vec<GoalEventKind>,
}

impl GoalCompositeAny {
    pub fn new(goals: Vec<Box<dyn Goal>>) -> Self {
        let mut composite = Self::default();
        for goal in goals {
            composite.push(goal);
        }
        composite
    }

    pub fn push(&mut self, goal: Box<dyn Goal>) {
        for &kind in goal.invalidation_events() {
            if !self.invalidation.contains(&kind) {
                self.invalidation.push(kind);
            }
        }
        for &kind in goal.update_events() {
            if !self.updates.contains(&kind) {
                self.updates.push(kind);
            }
        }
        self.goals.push(goal);
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

impl Goal for GoalCompositeAny {
    fn is_end(&self, mv: &Move) -> bool {
        self.goals.iter().any(|g| g.is_end(mv))
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        self.goals
            .iter()
            .map(|g| g.heuristic(mv))
            .min_by(f64::total_cmp)
            .unwrap_or(0.0)
    }

    fn is_dynamic(&self) -> bool {
        self.goals.iter().any(|g| g.is_dynamic())
    }

    fn invalidation_events(&self) -> &[GoalEventKind] {
        &self.invalidation
    }

    fn update_events(&self) -> &[GoalEventKind] {
        &self.updates
    }

    fn invalidated_by(&self, event: &GoalEvent) -> bool {
        self.goals.iter().any(|g| g.invalidated_by(event))
    }

    fn update(&mut self, event: &GoalEvent) -> bool {
        // Every child sees the event even after one reports a change.
        self.goals.iter_mut().fold(false, |changed, g| g.update(event) | changed)
    }

    fn cleanup(&mut self) {
        for g in &mut self.goals {
            g.cleanup();
        }
    }
}

// ── Dynamic goals ─────────────────────────────────────────────────────────────

/// Callback run once when a dynamic pursuit resolves.
pub type CleanupFn = Box<dyn FnMut() + Send>;

/// Follow a moving entity, staying within `range` blocks of it.
///
/// `EntityMoved` events for the followed entity retarget the goal;
/// `EntityGone` invalidates it.
pub struct GoalFollow {
    entity:     u32,
    target:     BlockPos,
    range:      f64,
    on_cleanup: Option<CleanupFn>,
}

const FOLLOW_INVALIDATION: &[GoalEventKind] = &[GoalEventKind::EntityGone];
const FOLLOW_UPDATE: &[GoalEventKind] = &[GoalEventKind::EntityMoved];

impl GoalFollow {
    pub fn new(entity: u32, target: BlockPos, range: f64) -> Self {
        Self { entity, target, range, on_cleanup: None }
    }

    pub fn with_cleanup(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_cleanup = Some(Box::new(f));
        self
    }

    pub fn target(&self) -> BlockPos {
        self.target
    }

    pub fn entity(&self) -> u32 {
        self.entity
    }
}

impl Goal for GoalFollow {
    fn is_end(&self, mv: &Move) -> bool {
        (mv.pos().distance_sq(self.target) as f64) <= self.range * self.range
    }

    fn heuristic(&self, mv: &Move) -> f64 {
        (block_distance(mv.pos(), self.target) - self.range).max(0.0)
    }

    fn is_dynamic(&self) -> bool {
        true
    }

    fn invalidation_events(&self) -> &[GoalEventKind] {
        FOLLOW_INVALIDATION
    }

    fn update_events(&self) -> &[GoalEventKind] {
        FOLLOW_UPDATE
    }

    fn invalidated_by(&self, event: &GoalEvent) -> bool {
        event.kind == GoalEventKind::EntityGone && event.entity == Some(self.entity)
    }

    fn update(&mut self, event: &GoalEvent) -> bool {
        if event.kind != GoalEventKind::EntityMoved || event.entity != Some(self.entity) {
            return false;
        }
        match event.pos {
            Some(pos) if pos != self.target => {
                self.target = pos;
                true
            }
            _ => false,
        }
    }

    fn cleanup(&mut self) {
        if let Some(mut f) = self.on_cleanup.take() {
            f();
        }
    }
}
