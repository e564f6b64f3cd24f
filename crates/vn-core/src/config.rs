//! Pathfinder configuration.
//!
//! Every section has a `Default` and every field is `#[serde(default)]`, so a
//! TOML file only needs to name what it changes:
//!
//! ```toml
//! [search]
//! slice_node_budget = 200
//! strategy = "chained"
//!
//! [costs]
//! break_cost = 4.0
//!
//! [execution]
//! max_recovery_retries = 5
//! ```
//!
//! Use [`PathConfig::from_toml_file`] for files, [`PathConfig::load`] for an
//! optional path, and [`PathConfig::from_toml_str`] for embedded strings.
//! All of them run [`PathConfig::validate`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{VnError, VnResult};

// ── PathConfig ────────────────────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub search:    SearchConfig,
    pub costs:     CostConfig,
    pub movement:  MovementConfig,
    pub execution: ExecutionConfig,
}

impl PathConfig {
    /// Load and validate a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> VnResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load(path: Option<impl AsRef<Path>>) -> VnResult<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml_str(s: &str) -> VnResult<Self> {
        let config: PathConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the search or execution loop stall.
    pub fn validate(&self) -> VnResult<()> {
        if self.search.slice_node_budget == 0 {
            return Err(VnError::Config("search.slice_node_budget must be > 0".into()));
        }
        if self.search.max_iterations == 0 {
            return Err(VnError::Config("search.max_iterations must be > 0".into()));
        }
        if self.search.partial_path_length == 0 {
            return Err(VnError::Config("search.partial_path_length must be > 0".into()));
        }
        let c = &self.costs;
        for (name, v) in [
            ("walk", c.walk),
            ("diagonal", c.diagonal),
            ("jump", c.jump),
            ("fall_per_block", c.fall_per_block),
            ("break_cost", c.break_cost),
            ("place_cost", c.place_cost),
            ("liquid_cost", c.liquid_cost),
        ] {
            if !(v >= 0.0) {
                return Err(VnError::Config(format!("costs.{name} must be non-negative, got {v}")));
            }
        }
        if c.max_move_cost < c.escalation_threshold {
            return Err(VnError::Config(
                "costs.max_move_cost must be >= costs.escalation_threshold".into(),
            ));
        }
        if self.execution.completion_tolerance <= 0.0 {
            return Err(VnError::Config("execution.completion_tolerance must be > 0".into()));
        }
        if self.execution.align_tick_ceiling == 0 || self.execution.perform_tick_ceiling == 0 {
            return Err(VnError::Config("execution tick ceilings must be > 0".into()));
        }
        Ok(())
    }
}

// ── SearchConfig ──────────────────────────────────────────────────────────────

/// Which `PathProducer` the driving loop instantiates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerStrategy {
    /// One search for the whole distance.
    #[default]
    Continuous,
    /// A chain of sub-searches capped at `partial_path_length` moves.
    Chained,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Nodes popped per `advance()` before yielding back to the tick loop.
    pub slice_node_budget: usize,
    /// Wall-clock allowance per `advance()`, in milliseconds.
    pub slice_time_budget_ms: Option<u64>,
    /// Total nodes popped before the search gives up with `Timeout`.
    pub max_iterations: usize,
    /// Total wall-clock allowance before `Timeout`, in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Move cap for each sub-search of the chained producer.
    pub partial_path_length: usize,
    pub strategy: ProducerStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            slice_node_budget:    500,
            slice_time_budget_ms: Some(40),
            max_iterations:       200_000,
            timeout_ms:           None,
            partial_path_length:  64,
            strategy:             ProducerStrategy::Continuous,
        }
    }
}

impl SearchConfig {
    pub fn slice_time_budget(&self) -> Option<Duration> {
        self.slice_time_budget_ms.map(Duration::from_millis)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// ── CostConfig ────────────────────────────────────────────────────────────────

/// Move cost model.  Units are "cardinal walking steps".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    pub walk:           f64,
    pub diagonal:       f64,
    /// Added on top of the horizontal cost for jumps.
    pub jump:           f64,
    /// Added per block dropped.
    pub fall_per_block: f64,
    pub break_cost:     f64,
    pub place_cost:     f64,
    /// Added when the destination is a liquid.
    pub liquid_cost:    f64,
    /// Costs above this are escalated by `escalation_factor`.
    pub escalation_threshold: f64,
    pub escalation_factor:    f64,
    /// Candidates costing more than this (after escalation) are dropped.
    pub max_move_cost:        f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            walk:                 1.0,
            diagonal:             std::f64::consts::SQRT_2,
            jump:                 1.0,
            fall_per_block:       1.0,
            break_cost:           2.0,
            place_cost:           2.0,
            liquid_cost:          1.0,
            escalation_threshold: 10.0,
            escalation_factor:    2.0,
            max_move_cost:        40.0,
        }
    }
}

impl CostConfig {
    /// Apply the escalation rule; `None` means the candidate must be dropped.
    pub fn escalate(&self, raw: f64) -> Option<f64> {
        let cost = if raw > self.escalation_threshold {
            self.escalation_threshold + (raw - self.escalation_threshold) * self.escalation_factor
        } else {
            raw
        };
        (cost <= self.max_move_cost).then_some(cost)
    }
}

// ── MovementConfig ────────────────────────────────────────────────────────────

/// Which motion primitives are enabled and their physical limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub allow_break:     bool,
    pub allow_place:     bool,
    pub allow_diagonal:  bool,
    pub allow_parkour:   bool,
    pub allow_pillar:    bool,
    pub allow_dig_down:  bool,
    /// Deepest drop a `DropDown` move may take.
    pub max_drop:        i32,
    /// Widest gap (in air blocks) a parkour jump may clear.
    pub max_parkour_gap: i32,
    /// Interaction reach from the feet-level centre, in blocks.
    pub reach:           f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            allow_break:     true,
            allow_place:     true,
            allow_diagonal:  true,
            allow_parkour:   true,
            allow_pillar:    true,
            allow_dig_down:  true,
            max_drop:        3,
            max_parkour_gap: 3,
            reach:           4.5,
        }
    }
}

// ── ExecutionConfig ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Ticks an executor may spend aligning before `AlignmentFailure`.
    pub align_tick_ceiling:    u32,
    /// Base ticks a move may spend performing; interaction estimates are added.
    pub perform_tick_ceiling:  u32,
    /// Ticks to wait for a settled state while aborting.
    pub abort_timeout_ticks:   u32,
    /// Horizontal distance from the exit centre that counts as arrived.
    pub completion_tolerance:  f64,
    /// Executors release forward within this distance of their target.
    pub arrive_distance:       f64,
    /// Recoveries allowed per execution before the failure becomes fatal.
    pub max_recovery_retries:  u32,
    /// Nearest move entries farther than this force a full replan.
    pub recovery_max_distance: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            align_tick_ceiling:    20,
            perform_tick_ceiling:  60,
            abort_timeout_ticks:   40,
            completion_tolerance:  0.35,
            arrive_distance:       0.15,
            max_recovery_retries:  3,
            recovery_max_distance: 4.0,
        }
    }
}
