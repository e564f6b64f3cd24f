//! Unit tests for vn-moves.

#[cfg(test)]
mod helpers {
    use vn_core::{BlockPos, PathConfig};
    use vn_search::{Candidate, ExpandContext, Move, MoveArena, MoveKind, MovementProvider};
    use vn_world::{BlockKind, VoxelWorld, VoxelWorldBuilder};

    use crate::Rules;

    pub const MIN: BlockPos = BlockPos::new(-6, -4, -6);
    pub const MAX: BlockPos = BlockPos::new(10, 6, 6);

    /// Stone floor at y = -1 everywhere.
    pub fn flat() -> VoxelWorldBuilder {
        VoxelWorldBuilder::new(MIN, MAX).floor(-1, BlockKind::Stone)
    }

    /// Take-off floor for x <= 0 and landing floor for x >= `land_x` at `land_y`.
    pub fn gap(land_x: i32, land_y: i32) -> VoxelWorld {
        VoxelWorldBuilder::new(MIN, MAX)
            .fill(BlockPos::new(MIN.x, -1, MIN.z), BlockPos::new(0, -1, MAX.z), BlockKind::Stone)
            .fill(BlockPos::new(land_x, land_y, MIN.z), BlockPos::new(MAX.x, land_y, MAX.z), BlockKind::Stone)
            .build()
    }

    pub fn rules() -> Rules {
        Rules::from_config(&PathConfig::default())
    }

    pub fn candidates(
        provider: &dyn MovementProvider,
        world:    &VoxelWorld,
        at:       BlockPos,
        blocks:   u32,
    ) -> Vec<Candidate> {
        let ctx = ExpandContext::new(world);
        let mut out = Vec::new();
        provider.generate(&ctx, &Move::start(at, blocks), &mut out);
        out
    }

    /// `n` moves of `kind` stepping by `dir` from the origin, each passed
    /// through `decorate` with its index.
    pub fn run(
        kind:     MoveKind,
        dir:      BlockPos,
        n:        usize,
        decorate: impl Fn(usize, Candidate) -> Candidate,
    ) -> Vec<Move> {
        let mut arena = MoveArena::new();
        let mut id = arena.push(Move::start(BlockPos::new(0, 0, 0), 10));
        for i in 0..n {
            let parent = arena[id].clone();
            let c = decorate(i, Candidate::new(kind, parent.pos(), parent.pos() + dir, 1.0));
            id = arena.push(Move::child(id, &parent, c).unwrap());
        }
        arena.reconstruct(id)
    }
}

// ── Level moves ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod walk {
    use vn_core::{BlockPos, CostConfig, PlaceIntent};
    use vn_search::MoveKind;
    use vn_world::BlockKind;

    use super::helpers::{candidates, flat, rules};
    use crate::{DiagonalProvider, ForwardProvider, Rules};

    const O: BlockPos = BlockPos::new(0, 0, 0);

    #[test]
    fn forward_on_flat_ground() {
        let world = flat().build();
        let out = candidates(&ForwardProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 4);
        for c in &out {
            assert_eq!(c.kind, MoveKind::Forward);
            assert_eq!(c.entry, O);
            assert_eq!(c.cost, 1.0);
            assert!(c.breaks.is_empty() && c.places.is_empty());
        }
    }

    #[test]
    fn forward_breaks_diggable_and_skips_bedrock() {
        let world = flat()
            .set(BlockPos::new(1, 0, 0), BlockKind::Stone)
            .wall(BlockPos::new(-1, 0, 0), BlockPos::new(-1, 0, 0), BlockKind::Bedrock)
            .build();
        let out = candidates(&ForwardProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 3);
        let east = out.iter().find(|c| c.pos == BlockPos::new(1, 0, 0)).unwrap();
        assert_eq!(east.breaks, vec![BlockPos::new(1, 0, 0)]);
        assert_eq!(east.cost, 3.0);
        assert!(out.iter().all(|c| c.pos.x >= 0));
    }

    #[test]
    fn forward_never_breaks_under_liquid() {
        let world = flat()
            .set(BlockPos::new(1, 1, 0), BlockKind::Stone)
            .set(BlockPos::new(1, 2, 0), BlockKind::Water)
            .build();
        let out = candidates(&ForwardProvider::new(rules()), &world, O, 0);
        assert!(out.iter().all(|c| c.pos != BlockPos::new(1, 0, 0)));
    }

    #[test]
    fn forward_bridges_with_a_block() {
        let world = flat().set(BlockPos::new(1, -1, 0), BlockKind::Air).build();
        let none = candidates(&ForwardProvider::new(rules()), &world, O, 0);
        assert!(none.iter().all(|c| c.pos != BlockPos::new(1, 0, 0)));

        let out = candidates(&ForwardProvider::new(rules()), &world, O, 1);
        let east = out.iter().find(|c| c.pos == BlockPos::new(1, 0, 0)).unwrap();
        assert_eq!(
            east.places,
            vec![PlaceIntent { pos: BlockPos::new(1, -1, 0), against: BlockPos::new(0, -1, 0) }]
        );
        assert_eq!(east.cost, 3.0);
    }

    #[test]
    fn forward_swims_without_floor() {
        let world = flat()
            .fill(BlockPos::new(1, -3, 0), BlockPos::new(1, 0, 0), BlockKind::Water)
            .build();
        let out = candidates(&ForwardProvider::new(rules()), &world, O, 0);
        let east = out.iter().find(|c| c.pos == BlockPos::new(1, 0, 0)).unwrap();
        assert!(east.places.is_empty());
        assert_eq!(east.cost, 2.0);
    }

    #[test]
    fn expensive_candidates_are_dropped() {
        let world = flat().set(BlockPos::new(1, 0, 0), BlockKind::Stone).build();
        let costs = CostConfig { break_cost: 50.0, ..CostConfig::default() };
        let provider = ForwardProvider::new(Rules { costs, ..rules() });
        let out = candidates(&provider, &world, O, 0);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn diagonal_needs_both_flanks() {
        let world = flat().build();
        let out = candidates(&DiagonalProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|c| (c.cost - std::f64::consts::SQRT_2).abs() < 1e-12));

        let blocked = flat().set(BlockPos::new(1, 1, 0), BlockKind::Stone).build();
        let out = candidates(&DiagonalProvider::new(rules()), &blocked, O, 0);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.pos.x == -1));
    }
}

// ── Vertical moves ────────────────────────────────────────────────────────────

#[cfg(test)]
mod vertical {
    use vn_core::{BlockPos, MovementConfig, PlaceIntent};
    use vn_world::{BlockKind, VoxelWorldBuilder};

    use super::helpers::{candidates, flat, gap, rules, MAX, MIN};
    use crate::{DigDownProvider, DropDownProvider, JumpUpProvider, PillarProvider, Rules};

    const O: BlockPos = BlockPos::new(0, 0, 0);

    #[test]
    fn jump_up_onto_a_step() {
        let world = flat().set(BlockPos::new(1, 0, 0), BlockKind::Stone).build();
        let out = candidates(&JumpUpProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(1, 1, 0));
        assert_eq!(out[0].cost, 2.0);
        assert!(out[0].breaks.is_empty() && out[0].places.is_empty());
    }

    #[test]
    fn jump_up_clears_headroom() {
        let world = flat()
            .set(BlockPos::new(1, 0, 0), BlockKind::Stone)
            .set(BlockPos::new(0, 2, 0), BlockKind::Dirt)
            .build();
        let out = candidates(&JumpUpProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].breaks, vec![BlockPos::new(0, 2, 0)]);
        assert_eq!(out[0].cost, 4.0);
    }

    #[test]
    fn jump_up_places_support_when_it_has_blocks() {
        let world = flat().build();
        let out = candidates(&JumpUpProvider::new(rules()), &world, O, 1);
        assert_eq!(out.len(), 4);
        let east = out.iter().find(|c| c.pos == BlockPos::new(1, 1, 0)).unwrap();
        assert_eq!(
            east.places,
            vec![PlaceIntent { pos: BlockPos::new(1, 0, 0), against: BlockPos::new(1, -1, 0) }]
        );
        assert!(candidates(&JumpUpProvider::new(rules()), &world, O, 0).is_empty());
    }

    #[test]
    fn drop_down_finds_the_floor() {
        let world = gap(1, -3);
        let out = candidates(&DropDownProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(1, -2, 0));
        assert_eq!(out[0].cost, 3.0);

        let shallow = Rules {
            movement: MovementConfig { max_drop: 1, ..MovementConfig::default() },
            ..rules()
        };
        assert!(candidates(&DropDownProvider::new(shallow), &world, O, 0).is_empty());
    }

    #[test]
    fn drop_down_into_water() {
        let world = VoxelWorldBuilder::new(MIN, MAX)
            .fill(BlockPos::new(MIN.x, -1, MIN.z), BlockPos::new(0, -1, MAX.z), BlockKind::Stone)
            .fill(BlockPos::new(1, -3, 0), BlockPos::new(1, -1, 0), BlockKind::Water)
            .build();
        let out = candidates(&DropDownProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(1, -1, 0));
        assert_eq!(out[0].cost, 3.0);
    }

    #[test]
    fn pillar_places_under_self() {
        let world = flat().build();
        let out = candidates(&PillarProvider::new(rules()), &world, O, 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(0, 1, 0));
        assert_eq!(out[0].places, vec![PlaceIntent { pos: O, against: BlockPos::new(0, -1, 0) }]);
        assert_eq!(out[0].cost, 3.0);
        assert!(candidates(&PillarProvider::new(rules()), &world, O, 0).is_empty());
    }

    #[test]
    fn dig_down_needs_floor_below() {
        let world = flat().floor(-2, BlockKind::Dirt).build();
        let out = candidates(&DigDownProvider::new(rules()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(0, -1, 0));
        assert_eq!(out[0].breaks, vec![BlockPos::new(0, -1, 0)]);
        assert_eq!(out[0].cost, 3.0);

        let bedrock = VoxelWorldBuilder::new(MIN, MAX)
            .floor(-1, BlockKind::Bedrock)
            .floor(-2, BlockKind::Stone)
            .build();
        assert!(candidates(&DigDownProvider::new(rules()), &bedrock, O, 0).is_empty());
    }
}

// ── Parkour & jump table ──────────────────────────────────────────────────────

#[cfg(test)]
mod parkour {
    use vn_core::{BlockPos, MovementConfig};
    use vn_world::KinematicSimulator;

    use super::helpers::{candidates, gap, rules};
    use crate::{JumpTable, ParkourProvider, Rules};

    const O: BlockPos = BlockPos::new(0, 0, 0);

    fn table() -> JumpTable {
        JumpTable::compute(&KinematicSimulator, 3, 0.15)
    }

    #[test]
    fn table_covers_gaps_up_to_three() {
        let t = table();
        for g in 1..=3 {
            assert!(t.feasible(g, 0), "gap {g} level");
            assert!(t.feasible(g, 1), "gap {g} drop");
        }
        assert_eq!(t.len(), 6);
        assert_eq!(t.ticks(1, 0), Some(13));
    }

    #[test]
    fn four_block_gap_is_out_of_range() {
        let t = JumpTable::compute(&KinematicSimulator, 4, 0.15);
        assert!(!t.feasible(4, 0));
        assert!(!t.feasible(4, 1));
        assert_eq!(t.max_gap(), 4);
    }

    #[test]
    fn level_gap() {
        let world = gap(3, -1);
        let out = candidates(&ParkourProvider::new(rules(), table()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(3, 0, 0));
        assert_eq!(out[0].cost, 4.0);
    }

    #[test]
    fn gap_with_drop() {
        let world = gap(3, -2);
        let out = candidates(&ParkourProvider::new(rules(), table()), &world, O, 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, BlockPos::new(3, -1, 0));
        assert_eq!(out[0].cost, 5.0);
    }

    #[test]
    fn configured_gap_limit() {
        let world = gap(3, -1);
        let narrow = Rules {
            movement: MovementConfig { max_parkour_gap: 1, ..MovementConfig::default() },
            ..rules()
        };
        assert!(candidates(&ParkourProvider::new(narrow, table()), &world, O, 0).is_empty());
    }
}

// ── Steering ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod steering {
    use vn_core::{BlockPos, PlayerState, Vec3};
    use vn_world::KinematicSimulator;

    use super::helpers::gap;
    use crate::{jump_at_edge, steer};

    #[test]
    fn arrive_releases_forward() {
        let s = PlayerState::standing_at(BlockPos::new(0, 0, 0));
        let near = steer(&s, Vec3::new(0.6, 0.0, 0.5), 0.15, false);
        assert!(near.controls.is_idle());
        let far = steer(&s, Vec3::new(0.5, 0.0, 3.5), 0.15, true);
        assert!(far.controls.forward && far.controls.sprint);
        assert!((far.yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn jumps_on_the_last_grounded_tick() {
        let world = gap(3, -1);
        let takeoff = BlockPos::new(0, 0, 0);
        let target = BlockPos::new(3, 0, 0).center();
        let mut s = PlayerState::standing_at(takeoff);
        let sim = KinematicSimulator;

        let first = steer(&s, target, 0.15, true);
        assert!(!jump_at_edge(&sim, &world, &s, &first, takeoff));

        s.pos.x = 0.78;
        let edge = steer(&s, target, 0.15, true);
        assert!(jump_at_edge(&sim, &world, &s, &edge, takeoff));

        s.on_ground = false;
        assert!(!jump_at_edge(&sim, &world, &s, &edge, takeoff));
    }
}

// ── Registry & search ─────────────────────────────────────────────────────────

#[cfg(test)]
mod search {
    use std::sync::Arc;

    use vn_core::{BlockPos, MovementConfig, PathConfig};
    use vn_search::{
        ContinuousProducer, GoalBlock, Move, MoveKind, PathProducer, PathStatus, SliceBudget,
    };
    use vn_world::{BlockKind, KinematicSimulator, VoxelWorld};

    use super::helpers::{flat, gap};
    use crate::default_providers;

    fn solve(world: &VoxelWorld, goal: BlockPos) -> vn_search::Path {
        let config = PathConfig::default();
        let providers = Arc::new(default_providers(&config, &KinematicSimulator));
        let mut producer =
            ContinuousProducer::new(Move::start(BlockPos::new(0, 0, 0), 0), providers, &config.search)
                .with_budget(SliceBudget::unbounded());
        producer.advance(&GoalBlock::new(goal), world)
    }

    #[test]
    fn default_registry_follows_movement_flags() {
        let config = PathConfig::default();
        assert_eq!(default_providers(&config, &KinematicSimulator).len(), 7);

        let mut limited = PathConfig::default();
        limited.movement = MovementConfig {
            allow_parkour: false,
            allow_diagonal: false,
            ..MovementConfig::default()
        };
        let registry = default_providers(&limited, &KinematicSimulator);
        assert_eq!(registry.len(), 5);
        assert!(!registry.contains(MoveKind::Parkour));
        assert!(registry.contains(MoveKind::Pillar));
    }

    #[test]
    fn crosses_a_gap_by_parkour() {
        let world = gap(3, -1);
        let path = solve(&world, BlockPos::new(6, 0, 0));
        assert_eq!(path.status, PathStatus::Success);
        assert!((path.cost - 7.0).abs() < 1e-9);
        assert!(path.moves.iter().any(|m| m.kind() == MoveKind::Parkour));
        assert_eq!(path.last().map(|m| m.pos()), Some(BlockPos::new(6, 0, 0)));
    }

    #[test]
    fn climbs_a_step() {
        let world = flat()
            .fill(BlockPos::new(3, 0, -6), BlockPos::new(10, 0, 6), BlockKind::Stone)
            .build();
        let path = solve(&world, BlockPos::new(5, 1, 0));
        assert_eq!(path.status, PathStatus::Success);
        assert!((path.cost - 6.0).abs() < 1e-9);
        assert_eq!(path.moves.iter().filter(|m| m.kind() == MoveKind::JumpUp).count(), 1);
        assert_eq!(path.moves[0].entry(), BlockPos::new(0, 0, 0));
    }
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod optimizer {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use vn_core::{BlockPos, MovementConfig, PlaceIntent};
    use vn_search::{Move, MoveKind, Path, PathStatus, SearchStats};

    use super::helpers::run;
    use crate::{MergeStraightRuns, Optimizer, OptimizerPass};

    const EAST: BlockPos = BlockPos::new(1, 0, 0);

    fn standard() -> Optimizer {
        Optimizer::standard(&MovementConfig::default())
    }

    #[test]
    fn straight_run_collapses() {
        let moves = run(MoveKind::Forward, EAST, 5, |_, c| c);
        let out = standard().optimize(moves);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entry(), BlockPos::new(0, 0, 0));
        assert_eq!(out[0].exit(), BlockPos::new(5, 0, 0));
        assert_eq!(out[0].cost(), 5.0);
        assert_eq!(out[0].g(), 5.0);
    }

    #[test]
    fn place_intent_splits_the_run() {
        let moves = run(MoveKind::Forward, EAST, 5, |i, c| {
            if i == 2 {
                let floor = c.pos.below();
                c.with_places(vec![PlaceIntent { pos: floor, against: floor.offset(-1, 0, 0) }])
            } else {
                c
            }
        });
        let out = standard().optimize(moves);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].exit(), BlockPos::new(2, 0, 0));
        assert_eq!(out[1].places().len(), 1);
        assert_eq!(out[2].entry(), BlockPos::new(3, 0, 0));
        assert_eq!(out[2].exit(), BlockPos::new(5, 0, 0));
    }

    #[test]
    fn breaks_stay_in_reach() {
        let head_breaks = |_: usize, c: vn_search::Candidate| {
            let head = c.pos.above();
            c.with_breaks(vec![head])
        };
        let short = Optimizer::new().with_pass(MergeStraightRuns::new(2.0));
        assert_eq!(short.optimize(run(MoveKind::Forward, EAST, 5, head_breaks)).len(), 5);

        let out = standard().optimize(run(MoveKind::Forward, EAST, 5, head_breaks));
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].breaks(),
            &[
                BlockPos::new(1, 1, 0),
                BlockPos::new(2, 1, 0),
                BlockPos::new(3, 1, 0),
                BlockPos::new(4, 1, 0)
            ]
        );
        assert_eq!(out[1].breaks(), &[BlockPos::new(5, 1, 0)]);
    }

    #[test]
    fn diagonal_runs_merge_only_in_one_direction() {
        let ne = BlockPos::new(1, 0, 1);
        let out = standard().optimize(run(MoveKind::Diagonal, ne, 3, |_, c| c));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].exit(), BlockPos::new(3, 0, 3));

        let zigzag = run(MoveKind::Diagonal, ne, 2, |i, mut c| {
            if i == 1 {
                c.pos = c.entry + BlockPos::new(1, 0, -1);
            }
            c
        });
        assert_eq!(standard().optimize(zigzag).len(), 2);
    }

    #[test]
    fn mixed_kinds_are_untouched() {
        let mut moves = run(MoveKind::Forward, EAST, 1, |_, c| c);
        moves.extend(run(MoveKind::JumpUp, BlockPos::new(0, 1, 0), 1, |_, c| c));
        let before = moves.clone();
        assert_eq!(standard().optimize(moves), before);
        assert_eq!(Optimizer::new().optimize(before.clone()), before);
    }

    /// Counts how often it runs; never rewrites anything.
    struct CountingPass {
        kind: MoveKind,
        runs: Arc<AtomicUsize>,
    }

    impl OptimizerPass for CountingPass {
        fn kind(&self) -> MoveKind {
            self.kind
        }

        fn name(&self) -> &'static str {
            "counting"
        }

        fn apply(&self, moves: Vec<Move>) -> Vec<Move> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            moves
        }
    }

    #[test]
    fn passes_only_see_paths_with_their_kind() {
        let runs = Arc::new(AtomicUsize::new(0));
        let optimizer = standard()
            .with_pass(CountingPass { kind: MoveKind::Parkour, runs: Arc::clone(&runs) });

        assert_eq!(optimizer.optimize(run(MoveKind::Forward, EAST, 3, |_, c| c)).len(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        optimizer.optimize(run(MoveKind::Parkour, BlockPos::new(3, 0, 0), 2, |_, c| c));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn one_pass_per_kind() {
        let optimizer = standard().with_pass(MergeStraightRuns::new(2.0));
        assert_eq!(optimizer.pass_names(), vec!["merge_straight_runs", "merge_diagonal_runs"]);
        assert_eq!(optimizer.pass(MoveKind::Diagonal).map(|p| p.name()), Some("merge_diagonal_runs"));
        assert!(optimizer.pass(MoveKind::Pillar).is_none());

        // The short-reach replacement is the one that runs.
        let head_breaks = |_: usize, c: vn_search::Candidate| {
            let head = c.pos.above();
            c.with_breaks(vec![head])
        };
        assert_eq!(optimizer.optimize(run(MoveKind::Forward, EAST, 5, head_breaks)).len(), 5);
    }

    #[test]
    fn optimize_path_keeps_status_and_cost() {
        let moves = run(MoveKind::Forward, EAST, 4, |_, c| c);
        let path = Path {
            status:          PathStatus::Success,
            cost:            4.0,
            calc_time:       std::time::Duration::ZERO,
            visited_nodes:   5,
            generated_nodes: 12,
            moves,
            stats:           SearchStats::default(),
        };
        let out = standard().optimize_path(path);
        assert_eq!(out.status, PathStatus::Success);
        assert_eq!(out.cost, 4.0);
        assert_eq!(out.moves.len(), 1);
        assert_eq!(standard().pass_names(), vec!["merge_straight_runs", "merge_diagonal_runs"]);
    }
}
