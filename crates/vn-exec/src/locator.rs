//! Spatial index over move entries, used to pick a resume point after a
//! failure.
//!
//! An R-tree (via `rstar`) maps a position to the move whose entry centre is
//! nearest.  Ties resolve to the lowest path index so recovery never skips
//! ahead of an equally good earlier move.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use vn_core::Vec3;
use vn_search::Move;

/// Distances closer than this are treated as equal.
const TIE_EPSILON: f64 = 1e-9;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct EntryPoint {
    point: [f64; 3],
    index: usize,
}

impl RTreeObject for EntryPoint {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for EntryPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── EntryLocator ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct EntryLocator {
    tree: RTree<EntryPoint>,
}

impl EntryLocator {
    /// Index the entry centre of every move in `moves`.
    pub fn new(moves: &[Move]) -> Self {
        let entries = moves
            .iter()
            .enumerate()
            .map(|(index, mv)| {
                let c = mv.entry().center();
                EntryPoint { point: [c.x, c.y, c.z], index }
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Index of the move whose entry is nearest `pos`, with the distance.
    pub fn nearest(&self, pos: Vec3) -> Option<(usize, f64)> {
        let query = [pos.x, pos.y, pos.z];
        let mut hits = self.tree.nearest_neighbor_iter(&query);
        let first = hits.next()?;
        let best_d2 = first.distance_2(&query);
        let mut best = first.index;
        for hit in hits {
            if hit.distance_2(&query) > best_d2 + TIE_EPSILON {
                break;
            }
            best = best.min(hit.index);
        }
        Some((best, best_d2.sqrt()))
    }
}
