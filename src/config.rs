// Configuration module for reading Snake.toml
// Every tunable constant of the planner lives here so it can be retuned without a rebuild.

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub pathfinding: PathfindingConfig,
    pub food: FoodConfig,
    pub grid: GridConfig,
    pub director: DirectorConfig,
    pub debug: DebugConfig,
}

/// Response time budget
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }

    /// Budget for one tick, capped by what the server says is left of it.
    /// A zero `tick_remain_ms` means the server did not report it.
    pub fn budget_for(&self, tick_remain_ms: u64) -> u64 {
        let budget = self.effective_budget_ms();
        if tick_remain_ms == 0 {
            budget
        } else {
            budget.min(tick_remain_ms.saturating_sub(self.network_overhead_ms))
        }
    }
}

/// A* search limits
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingConfig {
    /// Paths of this many steps or more are treated as unreachable
    pub max_path_cost: u32,
}

/// Food scoring and filtering
#[derive(Debug, Deserialize, Clone)]
pub struct FoodConfig {
    pub value_exponent: f64,
    pub top_k: usize,
    pub contest_slack_early: i32,
    pub contest_slack_late: i32,
    pub contest_slack_after_tick: u32,
    /// Point value assigned to golden special food (0 ignores it)
    pub golden_points: i32,
    /// Point value assigned to suspicious special food (0 ignores it)
    pub suspicious_points: i32,
}

impl FoodConfig {
    /// Contest slack in effect at the given tick
    pub fn contest_slack(&self, tick: u32) -> i32 {
        if tick < self.contest_slack_after_tick {
            self.contest_slack_early
        } else {
            self.contest_slack_late
        }
    }
}

/// Local grid predicates
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    /// Cells with fewer open neighbours than this are dead ends
    pub dead_end_min_exits: usize,
}

/// Fallback movement when no food is reachable
#[derive(Debug, Deserialize, Clone)]
pub struct DirectorConfig {
    pub phase_threshold_tick: u32,
    pub spread_radius: i32,
    pub regroup_radius: i32,
    pub momentum_radius: i32,
    /// Fixed seed for the fallback shuffle; entropy when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 250,
                network_overhead_ms: 50,
            },
            pathfinding: PathfindingConfig { max_path_cost: 50 },
            food: FoodConfig {
                value_exponent: 1.2,
                top_k: 15,
                contest_slack_early: 0,
                contest_slack_late: 1,
                contest_slack_after_tick: 500,
                golden_points: 10,
                suspicious_points: 0,
            },
            grid: GridConfig {
                dead_end_min_exits: 2,
            },
            director: DirectorConfig {
                phase_threshold_tick: 500,
                spread_radius: 15,
                regroup_radius: 30,
                momentum_radius: 45,
                rng_seed: None,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake3d_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
