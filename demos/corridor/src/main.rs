//! `corridor` — one agent crossing a walled, obstacle-strewn stone field.
//!
//! The field is 64 blocks long with a bedrock wall halfway along that has a
//! single gap, and two-high stone obstacles scattered over 12% of the
//! columns.  A CSV world file replaces the generated field when given.
//!
//! Run with:
//!   cargo run -p corridor --release -- [config.toml] [world.csv]
//!
//! Set `RUST_LOG=debug` (or `vn_exec=trace`) for per-move detail.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vn_core::{BlockPos, Host, PathConfig, Tick};
use vn_search::{GoalBlock, Path};
use vn_sim::{PathfinderBuilder, PathfinderError, PathfinderObserver, PathfinderState, ResetCause};
use vn_world::{
    load_world_csv, scatter_obstacles, BlockKind, KinematicSimulator, Sandbox, Scatter,
    VoxelWorld, VoxelWorldBuilder,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64 = 42;
const DENSITY:       f64 = 0.12;
const MAX_TICKS:     u64 = 20_000;
const SCAFFOLD:      u32 = 16;
/// Log a progress line every N ticks.
const LOG_INTERVAL:  u64 = 200;

const WORLD_MIN: BlockPos = BlockPos::new(-2, -4, -10);
const WORLD_MAX: BlockPos = BlockPos::new(64, 8, 10);
const START:     BlockPos = BlockPos::new(0, 0, 0);
const GOAL:      BlockPos = BlockPos::new(60, 0, 0);
const WALL_X:    i32 = 32;
const GAP_Z:     i32 = 7;

// ── World ─────────────────────────────────────────────────────────────────────

fn generated_world() -> VoxelWorld {
    let mut world = VoxelWorldBuilder::new(WORLD_MIN, WORLD_MAX)
        .floor(-1, BlockKind::Stone)
        .wall(
            BlockPos::new(WALL_X, 0, WORLD_MIN.z),
            BlockPos::new(WALL_X, 3, WORLD_MAX.z),
            BlockKind::Bedrock,
        )
        .set(BlockPos::new(WALL_X, 0, GAP_Z), BlockKind::Air)
        .set(BlockPos::new(WALL_X, 1, GAP_Z), BlockKind::Air)
        .build();
    let scatter = Scatter::new(SEED, DENSITY)
        .keep_clear(START)
        .keep_clear(GOAL)
        .keep_clear(BlockPos::new(WALL_X, 0, GAP_Z))
        .keep_clear(BlockPos::new(WALL_X - 1, 0, GAP_Z))
        .keep_clear(BlockPos::new(WALL_X + 1, 0, GAP_Z));
    let placed = scatter_obstacles(&mut world, &scatter);
    info!(placed, "scattered obstacles");
    world
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ProgressLog {
    paths:  usize,
    resets: usize,
}

impl PathfinderObserver for ProgressLog {
    fn on_path(&mut self, path: &Path) {
        self.paths += 1;
        info!(
            status = %path.status,
            moves = path.len(),
            cost = path.cost,
            visited = path.visited_nodes,
            calc_ms = path.calc_time.as_millis() as u64,
            "path"
        );
    }

    fn on_reset(&mut self, cause: &ResetCause) {
        self.resets += 1;
        info!(?cause, "reset");
    }

    fn on_failure(&mut self, err: &PathfinderError) {
        info!(error = %err, "failed");
    }

    fn on_tick_end(&mut self, tick: Tick, state: PathfinderState) {
        if tick.0.is_multiple_of(LOG_INTERVAL) {
            info!(%tick, ?state, "progress");
        }
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let config_path = args.next();
    let world_path = args.next();

    let config = PathConfig::load(config_path.as_ref())
        .with_context(|| format!("loading config {config_path:?}"))?;
    let world = match &world_path {
        Some(path) => load_world_csv(path, WORLD_MIN, WORLD_MAX)
            .with_context(|| format!("loading world {}", path.display()))?,
        None => generated_world(),
    };
    info!(strategy = ?config.search.strategy, blocks = world.len(), "setup");

    let mut sandbox = Sandbox::new(world, START).with_placeable(SCAFFOLD);
    let mut pathfinder = PathfinderBuilder::new(config).build(&KinematicSimulator)?;
    pathfinder.set_goal(GoalBlock::new(GOAL));

    let mut log = ProgressLog::default();
    let started = Instant::now();
    let outcome = pathfinder.run(&mut sandbox, &mut log, MAX_TICKS, Sandbox::advance);
    let elapsed = started.elapsed();

    let player = sandbox.player();
    println!("outcome:      {outcome:?}");
    println!("ticks:        {}", sandbox.tick().0);
    println!("final block:  {}", player.block_pos());
    println!("paths:        {}", log.paths);
    println!("resets:       {}", log.resets);
    println!("interactions: {}", sandbox.issued().len());
    println!("wall time:    {:.1} ms", elapsed.as_secs_f64() * 1000.0);

    outcome?;
    Ok(())
}
