//! The standard provider set.

use vn_core::{PathConfig, Simulator};
use vn_search::ProviderRegistry;

use crate::{
    DiagonalProvider, DigDownProvider, DropDownProvider, ForwardProvider, JumpTable,
    JumpUpProvider, ParkourProvider, PillarProvider, Rules,
};

/// Every provider the `movement` section enables.
///
/// Forward, jump-up and drop-down are always present.  The parkour jump
/// table is simulated here with `simulator`, once per registry.
pub fn default_providers(config: &PathConfig, simulator: &dyn Simulator) -> ProviderRegistry {
    let rules = Rules::from_config(config);
    let m = &config.movement;

    let mut registry = ProviderRegistry::new()
        .with(ForwardProvider::new(rules.clone()))
        .with(JumpUpProvider::new(rules.clone()))
        .with(DropDownProvider::new(rules.clone()));
    if m.allow_diagonal {
        registry.register(Box::new(DiagonalProvider::new(rules.clone())));
    }
    if m.allow_pillar && m.allow_place {
        registry.register(Box::new(PillarProvider::new(rules.clone())));
    }
    if m.allow_dig_down && m.allow_break {
        registry.register(Box::new(DigDownProvider::new(rules.clone())));
    }
    if m.allow_parkour && m.max_parkour_gap > 0 {
        let table = JumpTable::compute(simulator, m.max_parkour_gap, config.execution.arrive_distance);
        registry.register(Box::new(ParkourProvider::new(rules, table)));
    }
    registry
}
