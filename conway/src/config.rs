// config.rs - Tunable simulation settings, loadable from TOML

use std::time::Duration;

use serde::Deserialize;

use crate::dimensions::Dimensions;
use crate::error::Result;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 150;
pub const DEFAULT_SEED_DENSITY: f64 = 0.3;
pub const DEFAULT_CYCLE_HISTORY: usize = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Delay between the end of one generation and the start of the next.
    pub tick_interval_ms: u64,
    /// Probability that a cell starts alive when seeding randomly.
    pub seed_density: f64,
    pub dimensions: Dimensions,
    /// Stop running once a grid repeats within the last `cycle_history` generations.
    pub stop_on_cycle: bool,
    pub cycle_history: usize,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed_density: DEFAULT_SEED_DENSITY,
            dimensions: Dimensions::default(),
            stop_on_cycle: false,
            cycle_history: DEFAULT_CYCLE_HISTORY,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;

    #[test]
    fn defaults_match_the_classic_game() {
        let config = SimulationConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.seed_density, 0.3);
        assert_eq!(config.dimensions, Dimensions::Square);
        assert!(!config.stop_on_cycle);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(SimulationConfig::from_toml_str("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn toml_overrides_selected_keys() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_interval_ms = 40
            dimensions = "30x50"
            stop_on_cycle = true
            rng_seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_interval(), Duration::from_millis(40));
        assert_eq!(config.dimensions, Dimensions::Wide);
        assert!(config.stop_on_cycle);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.seed_density, DEFAULT_SEED_DENSITY);
        assert_eq!(config.cycle_history, DEFAULT_CYCLE_HISTORY);
    }

    #[test]
    fn bad_toml_is_a_config_error() {
        for text in ["dimensions = \"12x12\"", "tick_interval = 10", "seed_density = \"high\""] {
            assert!(matches!(
                SimulationConfig::from_toml_str(text),
                Err(SimulationError::Config(_))
            ));
        }
    }
}
