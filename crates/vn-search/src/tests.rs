//! Unit tests for vn-search.
//!
//! All tests use a hand-built block set and a single cardinal-walk provider,
//! so they do not depend on the concrete providers in `vn-moves`.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use rustc_hash::FxHashSet;
    use vn_core::{Block, BlockInfo, BlockPos, World, CARDINALS};

    use crate::{Candidate, ExpandContext, Move, MovementProvider, MoveKind, ProviderRegistry};

    /// Solid blocks in a set; everything else is air.
    #[derive(Default)]
    pub struct GridWorld {
        pub solid: FxHashSet<BlockPos>,
    }

    impl GridWorld {
        /// Floor at y = -1 for `x` in `0..=len`, `z` = 0: a one-wide corridor.
        pub fn corridor(len: i32) -> Self {
            let mut w = Self::default();
            for x in 0..=len {
                w.solid.insert(BlockPos::new(x, -1, 0));
            }
            w
        }

        /// Floor at y = -1 over `0..=size` × `0..=size`.
        pub fn square(size: i32) -> Self {
            let mut w = Self::default();
            for x in 0..=size {
                for z in 0..=size {
                    w.solid.insert(BlockPos::new(x, -1, z));
                }
            }
            w
        }
    }

    impl World for GridWorld {
        fn block_info(&self, pos: BlockPos) -> BlockInfo {
            if self.solid.contains(&pos) { BlockInfo::SOLID } else { BlockInfo::AIR }
        }

        fn block(&self, pos: BlockPos) -> Option<Block> {
            self.solid
                .contains(&pos)
                .then_some(Block { state_id: 1, diggable: true, hardness: 1.0 })
        }
    }

    /// Cardinal steps on flat ground, cost 1.
    pub struct Walk;

    impl MovementProvider for Walk {
        fn kind(&self) -> MoveKind {
            MoveKind::Forward
        }

        fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
            for dir in CARDINALS {
                let to = from.pos() + dir;
                let w = ctx.world;
                if w.block_info(to).is_passable()
                    && w.block_info(to.above()).is_passable()
                    && w.block_info(to.below()).is_standable()
                {
                    out.push(Candidate::new(MoveKind::Forward, from.pos(), to, 1.0));
                }
            }
        }
    }

    pub fn walk_registry() -> Arc<ProviderRegistry> {
        Arc::new(ProviderRegistry::new().with(Walk))
    }

    pub fn origin() -> Move {
        Move::start(BlockPos::new(0, 0, 0), 0)
    }
}

// ── Frontier ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod frontier {
    use crate::Frontier;

    #[test]
    fn pops_in_score_order() {
        let mut f: Frontier<u32, &str> = Frontier::new();
        f.insert(1, "c", 3.0, 0.0);
        f.insert(2, "a", 1.0, 0.0);
        f.insert(3, "d", 4.0, 0.0);
        f.insert(4, "b", 2.0, 0.0);
        assert_eq!(f.len(), 4);
        assert_eq!(f.peek_score(), Some(1.0));
        let order: Vec<_> = std::iter::from_fn(|| f.pop_min()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
        assert!(f.is_empty());
    }

    #[test]
    fn update_is_noop_unless_strictly_better() {
        let mut f: Frontier<u32, &str> = Frontier::new();
        f.insert(7, "first", 5.0, 1.0);
        assert!(!f.update(&7, "same", 5.0, 1.0));
        assert!(!f.update(&7, "worse", 6.0, 1.0));
        assert!(!f.update(&99, "missing", 0.0, 0.0));
        assert_eq!(f.peek_score(), Some(5.0));
        assert_eq!(f.pop_min(), Some("first"));
    }

    #[test]
    fn update_lowers_priority_in_place() {
        let mut f: Frontier<u32, &str> = Frontier::new();
        f.insert(1, "a", 2.0, 0.0);
        f.insert(2, "b", 3.0, 0.0);
        f.insert(3, "c", 9.0, 0.0);
        assert!(f.update(&3, "c2", 1.0, 0.0));
        assert_eq!(f.len(), 3);
        assert_eq!(f.pop_min(), Some("c2"));
        assert!(!f.contains(&3));
        assert_eq!(f.pop_min(), Some("a"));
    }

    #[test]
    fn insert_of_queued_key_behaves_as_update() {
        let mut f: Frontier<u32, &str> = Frontier::new();
        f.insert(1, "a", 2.0, 0.0);
        assert!(!f.insert(1, "worse", 3.0, 0.0));
        assert!(f.insert(1, "better", 1.0, 0.0));
        assert_eq!(f.len(), 1);
        assert_eq!(f.pop_min(), Some("better"));
    }

    #[test]
    fn ties_prefer_lower_heuristic_then_insertion_order() {
        let mut f: Frontier<u32, &str> = Frontier::new();
        f.insert(1, "far", 5.0, 4.0);
        f.insert(2, "near-early", 5.0, 1.0);
        f.insert(3, "near-late", 5.0, 1.0);
        assert_eq!(f.pop_min(), Some("near-early"));
        assert_eq!(f.pop_min(), Some("near-late"));
        assert_eq!(f.pop_min(), Some("far"));
    }

    #[test]
    fn many_items_come_out_sorted() {
        let mut f: Frontier<u32, u32> = Frontier::new();
        // A fixed permutation of 0..50.
        for i in 0..50u32 {
            let v = (i * 37) % 50;
            f.insert(v, v, v as f64, 0.0);
        }
        let out: Vec<_> = std::iter::from_fn(|| f.pop_min()).collect();
        assert_eq!(out, (0..50).collect::<Vec<_>>());
    }
}

// ── Move model ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod node {
    use vn_core::{BlockPos, NodeId, PlaceIntent, Vec3};

    use crate::{Candidate, Move, MoveArena, MoveKind};

    fn step(from: &Move, to: BlockPos, cost: f64) -> Candidate {
        Candidate::new(MoveKind::Forward, from.pos(), to, cost)
    }

    #[test]
    fn child_accumulates_cost_and_consumes_blocks() {
        let root = Move::start(BlockPos::new(0, 0, 0), 2);
        let place = PlaceIntent { pos: BlockPos::new(1, -1, 0), against: BlockPos::new(0, -1, 0) };
        let c = step(&root, BlockPos::new(1, 0, 0), 3.0).with_places(vec![place]);
        let child = Move::child(NodeId(0), &root, c).unwrap();
        assert_eq!(child.g(), 3.0);
        assert_eq!(child.cost(), 3.0);
        assert_eq!(child.remaining_blocks(), 1);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent(), Some(NodeId(0)));
        assert_eq!(child.entry(), BlockPos::new(0, 0, 0));
        assert_eq!(child.exit(), BlockPos::new(1, 0, 0));
        assert_eq!(child.delta(), BlockPos::new(1, 0, 0));
        assert!(child.has_interactions());
    }

    #[test]
    fn child_rejects_insufficient_blocks_and_negative_cost() {
        let root = Move::start(BlockPos::new(0, 0, 0), 0);
        let place = PlaceIntent { pos: BlockPos::new(1, -1, 0), against: BlockPos::new(0, -1, 0) };
        let c = step(&root, BlockPos::new(1, 0, 0), 1.0).with_places(vec![place]);
        assert!(Move::child(NodeId(0), &root, c).is_none());
        let c = step(&root, BlockPos::new(1, 0, 0), -1.0);
        assert!(Move::child(NodeId(0), &root, c).is_none());
        let c = step(&root, BlockPos::new(1, 0, 0), f64::NAN);
        assert!(Move::child(NodeId(0), &root, c).is_none());
    }

    #[test]
    fn velocity_is_part_of_the_key() {
        let a = Move::start(BlockPos::new(0, 0, 0), 0);
        let c = Candidate::new(MoveKind::Parkour, a.pos(), a.pos(), 1.0)
            .with_velocity(Vec3::new(0.3, 0.0, 0.0));
        let b = Move::child(NodeId(0), &a, c).unwrap();
        assert_eq!(a.pos(), b.pos());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn reconstruct_excludes_root_and_is_ordered() {
        let mut arena = MoveArena::new();
        let root = Move::start(BlockPos::new(0, 0, 0), 0);
        let mut prev_id = arena.push(root.clone());
        let mut prev = root;
        for x in 1..=3 {
            let next = Move::child(prev_id, &prev, step(&prev, BlockPos::new(x, 0, 0), 1.0)).unwrap();
            prev_id = arena.push(next.clone());
            prev = next;
        }
        let moves = arena.reconstruct(prev_id);
        let xs: Vec<_> = moves.iter().map(|m| m.pos().x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
        assert_eq!(moves[0].entry(), BlockPos::new(0, 0, 0));
        assert!(arena.reconstruct(NodeId(0)).is_empty());
    }

    #[test]
    fn rebase_keeps_position_and_blocks() {
        let root = Move::start(BlockPos::new(0, 0, 0), 5);
        let child = Move::child(NodeId(0), &root, step(&root, BlockPos::new(1, 0, 0), 2.0)).unwrap();
        let next_root = child.rebase();
        assert_eq!(next_root.pos(), BlockPos::new(1, 0, 0));
        assert_eq!(next_root.remaining_blocks(), 5);
        assert_eq!(next_root.g(), 0.0);
        assert_eq!(next_root.kind(), MoveKind::Start);
        assert_eq!(next_root.parent(), None);
    }

    #[test]
    fn merge_window_unions_intents() {
        let root = Move::start(BlockPos::new(0, 0, 0), 0);
        let a = Move::child(
            NodeId(0),
            &root,
            step(&root, BlockPos::new(1, 0, 0), 3.0).with_breaks(vec![BlockPos::new(1, 1, 0)]),
        )
        .unwrap();
        let b = Move::child(
            NodeId(1),
            &a,
            step(&a, BlockPos::new(2, 0, 0), 1.0).with_breaks(vec![BlockPos::new(2, 0, 0)]),
        )
        .unwrap();
        let merged = Move::merge_window(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(merged.entry(), a.entry());
        assert_eq!(merged.exit(), b.exit());
        assert_eq!(merged.g(), b.g());
        assert_eq!(merged.cost(), 4.0);
        assert_eq!(merged.breaks(), &[BlockPos::new(1, 1, 0), BlockPos::new(2, 0, 0)]);
        assert!(Move::merge_window(&[]).is_none());
    }
}

// ── Goals ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod goals {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use vn_core::BlockPos;

    use crate::{
        Goal, GoalBlock, GoalCompositeAny, GoalEvent, GoalEventKind, GoalFollow, GoalGetToBlock,
        GoalNear, GoalXZ, GoalY, Move,
    };

    fn at(x: i32, y: i32, z: i32) -> Move {
        Move::start(BlockPos::new(x, y, z), 0)
    }

    #[test]
    fn block_goal_and_heuristic() {
        let g = GoalBlock::new(BlockPos::new(10, 0, 0));
        assert!(g.is_end(&at(10, 0, 0)));
        assert!(!g.is_end(&at(10, 1, 0)));
        assert_eq!(g.heuristic(&at(0, 0, 0)), 10.0);
        // 3 diagonal + 1 straight + 2 vertical.
        let h = g.heuristic(&at(6, 2, 3));
        assert!((h - (1.0 + 3.0 * std::f64::consts::SQRT_2 + 2.0)).abs() < 1e-9);
        assert!(!g.is_dynamic());
    }

    #[test]
    fn near_xz_y_and_adjacent() {
        let near = GoalNear::new(BlockPos::new(0, 0, 0), 2.0);
        assert!(near.is_end(&at(1, 0, 1)));
        assert!(!near.is_end(&at(2, 0, 1)));

        let xz = GoalXZ::new(3, -4);
        assert!(xz.is_end(&at(3, 70, -4)));
        assert!(!xz.is_end(&at(3, 70, -3)));

        let y = GoalY::new(12);
        assert!(y.is_end(&at(-50, 12, 9)));
        assert_eq!(y.heuristic(&at(0, 2, 0)), 10.0);

        let adj = GoalGetToBlock::new(BlockPos::new(5, 0, 5));
        assert!(adj.is_end(&at(4, 0, 5)));
        assert!(!adj.is_end(&at(5, 0, 5)));
        assert!(!adj.is_end(&at(4, 0, 4)));
    }

    #[test]
    fn composite_takes_any_and_min_heuristic() {
        let g = GoalCompositeAny::new(vec![
            Box::new(GoalBlock::new(BlockPos::new(10, 0, 0))),
            Box::new(GoalBlock::new(BlockPos::new(-3, 0, 0))),
        ]);
        assert!(g.is_end(&at(-3, 0, 0)));
        assert_eq!(g.heuristic(&at(0, 0, 0)), 3.0);
        assert!(!g.is_dynamic());
        assert_eq!(GoalCompositeAny::default().heuristic(&at(0, 0, 0)), 0.0);
    }

    #[test]
    fn follow_retargets_and_invalidates() {
        let mut g = GoalFollow::new(7, BlockPos::new(5, 0, 0), 1.0);
        assert!(g.is_dynamic());
        assert_eq!(g.update_events(), &[GoalEventKind::EntityMoved]);
        assert_eq!(g.invalidation_events(), &[GoalEventKind::EntityGone]);

        assert!(!g.update(&GoalEvent::entity_moved(8, BlockPos::new(9, 0, 0))));
        assert!(g.update(&GoalEvent::entity_moved(7, BlockPos::new(9, 0, 0))));
        assert!(!g.update(&GoalEvent::entity_moved(7, BlockPos::new(9, 0, 0))));
        assert_eq!(g.target(), BlockPos::new(9, 0, 0));
        assert!(g.is_end(&at(8, 0, 0)));

        assert!(!g.invalidated_by(&GoalEvent::entity_gone(8)));
        assert!(g.invalidated_by(&GoalEvent::entity_gone(7)));
    }

    #[test]
    fn follow_cleanup_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let mut g = GoalFollow::new(1, BlockPos::new(0, 0, 0), 2.0)
            .with_cleanup(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        g.cleanup();
        g.cleanup();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn composite_forwards_dynamic_behaviour() {
        let mut g = GoalCompositeAny::new(vec![
            Box::new(GoalBlock::new(BlockPos::new(0, 0, 0))),
            Box::new(GoalFollow::new(3, BlockPos::new(4, 0, 0), 0.0)),
        ]);
        assert!(g.is_dynamic());
        assert_eq!(g.update_events(), &[GoalEventKind::EntityMoved]);
        assert!(g.update(&GoalEvent::entity_moved(3, BlockPos::new(6, 0, 0))));
        assert!(g.is_end(&at(6, 0, 0)));
        assert!(g.invalidated_by(&GoalEvent::entity_gone(3)));
    }
}

// ── Provider registry ─────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use vn_core::BlockPos;

    use super::helpers::{GridWorld, Walk};
    use crate::{Candidate, ExpandContext, Move, MovementProvider, MoveKind, ProviderRegistry};

    struct Fixed(MoveKind, i32);

    impl MovementProvider for Fixed {
        fn kind(&self) -> MoveKind {
            self.0
        }

        fn generate(&self, _ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
            out.push(Candidate::new(self.0, from.pos(), BlockPos::new(self.1, 0, 0), 1.0));
        }
    }

    #[test]
    fn expands_in_kind_order_regardless_of_registration() {
        let reg = ProviderRegistry::new()
            .with(Fixed(MoveKind::Parkour, 3))
            .with(Fixed(MoveKind::Forward, 1))
            .with(Fixed(MoveKind::DropDown, 2));
        let world = GridWorld::default();
        let mut out = Vec::new();
        reg.expand(&ExpandContext::new(&world), &Move::start(BlockPos::new(0, 0, 0), 0), &mut out);
        let xs: Vec<_> = out.iter().map(|c| c.pos.x).collect();
        assert_eq!(xs, vec![1, 2, 3]);
        assert_eq!(
            reg.kinds().collect::<Vec<_>>(),
            vec![MoveKind::Forward, MoveKind::DropDown, MoveKind::Parkour]
        );
    }

    #[test]
    fn register_replaces_same_kind() {
        let mut reg = ProviderRegistry::new().with(Walk);
        reg.register(Box::new(Fixed(MoveKind::Forward, 9)));
        assert_eq!(reg.len(), 1);
        let world = GridWorld::corridor(3);
        let mut out = Vec::new();
        reg.expand(&ExpandContext::new(&world), &Move::start(BlockPos::new(0, 0, 0), 0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos.x, 9);
        assert!(reg.remove(MoveKind::Forward).is_some());
        assert!(reg.is_empty());
    }
}

// ── Search engine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use vn_core::{BlockPos, SearchConfig};

    use super::helpers::{origin, walk_registry, GridWorld};
    use crate::{AStar, Goal, GoalBlock, PathStatus, SliceBudget};

    #[test]
    fn corridor_of_ten() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());

        assert_eq!(path.status, PathStatus::Success);
        assert_eq!(path.len(), 10);
        assert!((path.cost - 10.0).abs() < 1e-9);
        assert_eq!(path.moves[0].entry(), BlockPos::new(0, 0, 0));
        assert!(goal.is_end(path.last().unwrap()));
        assert!(path.visited_nodes >= 11);
        assert!(path.generated_nodes >= path.visited_nodes);
    }

    #[test]
    fn cost_invariants_hold_along_path() {
        let world = GridWorld::square(8);
        let goal = GoalBlock::new(BlockPos::new(6, 0, 7));
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());

        assert_eq!(path.status, PathStatus::Success);
        let mut prev_g = 0.0;
        let mut prev_exit = BlockPos::new(0, 0, 0);
        for mv in &path.moves {
            assert!(mv.cost() >= 0.0);
            assert!((mv.g() - (prev_g + mv.cost())).abs() < 1e-9);
            assert_eq!(mv.entry(), prev_exit);
            prev_g = mv.g();
            prev_exit = mv.exit();
        }
        assert_eq!(path.cost, prev_g);
        assert_eq!(path.len(), 13);
    }

    #[test]
    fn enclosed_goal_is_no_path() {
        let mut world = GridWorld::square(10);
        for p in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            world.solid.insert(BlockPos::new(p.0, 0, p.1));
            world.solid.insert(BlockPos::new(p.0, 1, p.1));
        }
        let goal = GoalBlock::new(BlockPos::new(5, 0, 5));
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());

        assert_eq!(path.status, PathStatus::NoPath);
        assert!(path.is_empty());
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.stats.open_len, 0);
        // Every reachable floor cell except the four walls and the pocket.
        assert_eq!(path.visited_nodes, 121 - 5);
    }

    #[test]
    fn slice_budget_yields_partial_and_resumes() {
        let world = GridWorld::corridor(60);
        let goal = GoalBlock::new(BlockPos::new(50, 0, 0));
        let providers = walk_registry();
        let mut search = AStar::new(origin(), &SearchConfig::default());

        let first = search.compute(&goal, &world, &providers, SliceBudget::visits(5));
        assert_eq!(first.status, PathStatus::Partial);
        assert_eq!(first.visited_nodes, 5);
        assert_eq!(first.last().unwrap().pos(), BlockPos::new(5, 0, 0));
        assert!(!search.is_finished());

        let second = search.compute(&goal, &world, &providers, SliceBudget::visits(5));
        assert_eq!(second.status, PathStatus::Partial);
        assert_eq!(second.visited_nodes, 10);
        assert_eq!(second.last().unwrap().pos(), BlockPos::new(10, 0, 0));

        let done = search.compute(&goal, &world, &providers, SliceBudget::unbounded());
        assert_eq!(done.status, PathStatus::Success);
        assert_eq!(done.len(), 50);
        assert_eq!(done.visited_nodes, 51);
    }

    #[test]
    fn sliced_run_matches_single_run() {
        let world = GridWorld::square(12);
        let goal = GoalBlock::new(BlockPos::new(11, 0, 9));
        let providers = walk_registry();

        let mut sliced = AStar::new(origin(), &SearchConfig::default());
        let mut last = None;
        for _ in 0..10 {
            last = Some(sliced.compute(&goal, &world, &providers, SliceBudget::visits(3)));
        }
        let mut single = AStar::new(origin(), &SearchConfig::default());
        let once = single.compute(&goal, &world, &providers, SliceBudget::visits(30));

        let sliced_path = last.unwrap();
        assert_eq!(sliced_path.status, once.status);
        assert_eq!(sliced_path.visited_nodes, once.visited_nodes);
        assert_eq!(sliced_path.generated_nodes, once.generated_nodes);
        assert_eq!(sliced_path.moves, once.moves);
        assert_eq!(sliced_path.stats, once.stats);

        let a = sliced.compute(&goal, &world, &providers, SliceBudget::unbounded());
        let b = single.compute(&goal, &world, &providers, SliceBudget::unbounded());
        assert_eq!(a.status, PathStatus::Success);
        assert_eq!(a.moves, b.moves);
    }

    #[test]
    fn global_iteration_limit_is_timeout() {
        let world = GridWorld::corridor(60);
        let goal = GoalBlock::new(BlockPos::new(50, 0, 0));
        let config = SearchConfig { max_iterations: 3, ..SearchConfig::default() };
        let mut search = AStar::new(origin(), &config);
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());

        assert_eq!(path.status, PathStatus::Timeout);
        assert_eq!(path.visited_nodes, 3);
        assert_eq!(path.last().unwrap().pos(), BlockPos::new(3, 0, 0));
    }

    #[test]
    fn terminal_result_is_sticky() {
        let world = GridWorld::corridor(5);
        let goal = GoalBlock::new(BlockPos::new(4, 0, 0));
        let providers = walk_registry();
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let a = search.compute(&goal, &world, &providers, SliceBudget::unbounded());
        let b = search.compute(&goal, &world, &providers, SliceBudget::visits(1));
        assert_eq!(a.status, PathStatus::Success);
        assert_eq!(b.status, PathStatus::Success);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.visited_nodes, b.visited_nodes);
    }

    #[test]
    fn depth_cap_gives_partial_success() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let mut search = AStar::new(origin(), &SearchConfig::default()).with_depth_cap(4);
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());
        assert_eq!(path.status, PathStatus::PartialSuccess);
        assert_eq!(path.len(), 4);
        assert_eq!(path.last().unwrap().pos(), BlockPos::new(4, 0, 0));
    }

    #[test]
    fn success_wins_over_depth_cap() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(3, 0, 0));
        let mut search = AStar::new(origin(), &SearchConfig::default()).with_depth_cap(3);
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());
        assert_eq!(path.status, PathStatus::Success);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn start_satisfying_goal_is_empty_success() {
        let world = GridWorld::corridor(2);
        let goal = GoalBlock::new(BlockPos::new(0, 0, 0));
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());
        assert_eq!(path.status, PathStatus::Success);
        assert!(path.is_empty());
        assert_eq!(path.visited_nodes, 1);
    }

    #[test]
    fn touched_chunks_cover_the_search() {
        let mut world = GridWorld::default();
        for x in 0..=20 {
            world.solid.insert(BlockPos::new(x, -1, 0));
        }
        let goal = GoalBlock::new(BlockPos::new(20, 0, 0));
        let mut search = AStar::new(origin(), &SearchConfig::default());
        let path = search.compute(&goal, &world, &walk_registry(), SliceBudget::unbounded());
        assert!(path.stats.touched(BlockPos::new(0, 0, 0).chunk()));
        assert!(path.stats.touched(BlockPos::new(20, 0, 0).chunk()));
        assert!(!path.stats.touched(BlockPos::new(100, 0, 0).chunk()));
    }
}

// ── Producers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod producers {
    use vn_core::{BlockPos, SearchConfig};

    use super::helpers::{origin, walk_registry, GridWorld};
    use crate::{
        ChainedProducer, ContinuousProducer, GoalBlock, Move, PathProducer, PathStatus,
        SliceBudget,
    };

    #[test]
    fn continuous_advances_one_slice_at_a_time() {
        let world = GridWorld::corridor(30);
        let goal = GoalBlock::new(BlockPos::new(25, 0, 0));
        let mut producer = ContinuousProducer::new(origin(), walk_registry(), &SearchConfig::default())
            .with_budget(SliceBudget::visits(10));

        let mut statuses = Vec::new();
        loop {
            let path = producer.advance(&goal, &world);
            statuses.push(path.status);
            if !path.status.is_pending() {
                assert_eq!(path.status, PathStatus::Success);
                assert_eq!(path.len(), 25);
                break;
            }
        }
        assert_eq!(statuses.len(), 3);
        assert_eq!(producer.start().pos(), BlockPos::new(0, 0, 0));
    }

    #[test]
    fn chained_produces_capped_legs() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let config = SearchConfig { partial_path_length: 4, ..SearchConfig::default() };
        let mut producer = ChainedProducer::new(origin(), walk_registry(), &config)
            .with_budget(SliceBudget::unbounded());

        let leg1 = producer.advance(&goal, &world);
        assert_eq!(leg1.status, PathStatus::PartialSuccess);
        assert_eq!(leg1.last().unwrap().pos(), BlockPos::new(4, 0, 0));

        let leg2 = producer.advance(&goal, &world);
        assert_eq!(leg2.status, PathStatus::PartialSuccess);
        assert_eq!(leg2.moves[0].entry(), BlockPos::new(4, 0, 0));
        assert_eq!(leg2.last().unwrap().pos(), BlockPos::new(8, 0, 0));
        assert_eq!(producer.start().pos(), BlockPos::new(4, 0, 0));

        let leg3 = producer.advance(&goal, &world);
        assert_eq!(leg3.status, PathStatus::Success);
        assert_eq!(leg3.len(), 2);
        assert!((leg3.cost - 2.0).abs() < 1e-9);
        assert_eq!(producer.legs(), 3);

        // Finished: the last leg is returned again.
        assert_eq!(producer.advance(&goal, &world).status, PathStatus::Success);
        assert_eq!(producer.legs(), 3);
    }

    #[test]
    fn chained_next_leg_follows_the_agent() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let config = SearchConfig { partial_path_length: 4, ..SearchConfig::default() };
        let mut producer = ChainedProducer::new(origin(), walk_registry(), &config)
            .with_budget(SliceBudget::unbounded());

        let leg1 = producer.advance(&goal, &world);
        assert_eq!(leg1.last().unwrap().pos(), BlockPos::new(4, 0, 0));

        // The agent ended the leg two blocks short.
        producer.continue_from(Move::start(BlockPos::new(2, 0, 0), 0));
        let leg2 = producer.advance(&goal, &world);
        assert_eq!(producer.start().pos(), BlockPos::new(2, 0, 0));
        assert_eq!(leg2.moves[0].entry(), BlockPos::new(2, 0, 0));
        assert_eq!(leg2.last().unwrap().pos(), BlockPos::new(6, 0, 0));

        // Ending where planned keeps the planned root.
        producer.continue_from(Move::start(BlockPos::new(6, 0, 0), 0));
        let leg3 = producer.advance(&goal, &world);
        assert_eq!(leg3.moves[0].entry(), BlockPos::new(6, 0, 0));
        assert_eq!(leg3.status, PathStatus::Success);
        assert_eq!(producer.legs(), 3);
    }

    #[test]
    fn continuous_ignores_a_new_root() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let mut producer = ContinuousProducer::new(origin(), walk_registry(), &SearchConfig::default())
            .with_budget(SliceBudget::unbounded());
        producer.continue_from(Move::start(BlockPos::new(5, 0, 0), 0));
        let path = producer.advance(&goal, &world);
        assert_eq!(path.len(), 10);
        assert_eq!(producer.start().pos(), BlockPos::new(0, 0, 0));
    }

    #[test]
    fn chained_leg_can_span_several_slices() {
        let world = GridWorld::corridor(12);
        let goal = GoalBlock::new(BlockPos::new(10, 0, 0));
        let config = SearchConfig { partial_path_length: 6, ..SearchConfig::default() };
        let mut producer = ChainedProducer::new(origin(), walk_registry(), &config)
            .with_budget(SliceBudget::visits(2));

        let first = producer.advance(&goal, &world);
        assert_eq!(first.status, PathStatus::Partial);
        let mut path = first;
        while path.status.is_pending() {
            path = producer.advance(&goal, &world);
        }
        assert_eq!(path.status, PathStatus::PartialSuccess);
        assert_eq!(path.last().unwrap().pos(), BlockPos::new(6, 0, 0));
        assert_eq!(producer.legs(), 1);
    }
}
