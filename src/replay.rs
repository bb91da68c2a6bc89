// Replay module for analysing logged ticks
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-plan logged snapshots with their recorded seeds
// 3. Compare logged vs replayed moves per snake
// 4. Generate analysis reports

use log::{info, warn};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::TickLogEntry;
use crate::types::{Direction, Vector};
use crate::world::World;

/// Logged vs replayed direction of one snake
#[derive(Debug, Clone, PartialEq)]
pub struct AgentComparison {
    pub id: String,
    pub original: Vector,
    pub replayed: Vector,
}

impl AgentComparison {
    pub fn matches(&self) -> bool {
        self.original == self.replayed
    }
}

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub tick: u32,
    pub agents: Vec<AgentComparison>,
    pub computation_time_us: u128,
}

impl ReplayResult {
    pub fn matches(&self) -> bool {
        self.agents.iter().all(|a| a.matches())
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// One `--validate` expectation: acceptable moves of a snake at a tick.
/// `None` in the list stands for holding position.
pub type ExpectedMove = (u32, String, Vec<Option<Direction>>);

/// Replay engine for analysing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<TickLogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: TickLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-plans a single log entry and compares against the logged moves
    pub fn replay_entry(&self, entry: &TickLogEntry) -> Result<ReplayResult, String> {
        let start_time = Instant::now();

        let world = World::from_snapshot(&entry.snapshot, &self.config.food)
            .map_err(|e| format!("Tick {}: invalid snapshot: {}", entry.tick, e))?;
        let plan = Bot::plan_world(&self.config, &world, entry.seed);
        let replayed = plan.to_response();

        let agents = replayed
            .snakes
            .iter()
            .map(|m| AgentComparison {
                id: m.id.clone(),
                original: entry.moves.direction_for(&m.id).unwrap_or(Vector::ZERO),
                replayed: m.direction,
            })
            .collect();

        let result = ReplayResult {
            tick: entry.tick,
            agents,
            computation_time_us: start_time.elapsed().as_micros(),
        };

        if self.verbose {
            if result.matches() {
                info!(
                    "Tick {}: ✓ MATCH ({} snakes, {}µs)",
                    result.tick,
                    result.agents.len(),
                    result.computation_time_us
                );
            } else {
                for agent in result.agents.iter().filter(|a| !a.matches()) {
                    warn!(
                        "Tick {}: ✗ MISMATCH {} - Original: {}, Replayed: {}",
                        result.tick,
                        agent.id,
                        format_vector(agent.original),
                        format_vector(agent.replayed)
                    );
                }
            }
        }

        Ok(result)
    }

    /// Replays all entries. Ticks are independent, so they run in parallel.
    pub fn replay_all(&self, entries: &[TickLogEntry]) -> Vec<ReplayResult> {
        entries
            .par_iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", entry.tick, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific ticks from a log file
    pub fn replay_ticks(&self, entries: &[TickLogEntry], ticks: &[u32]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for tick in ticks {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log file", tick))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay tick {}: {}", tick, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches()).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Planning Time:   {:.1}µs\n", avg_time);
        }

        let mismatched: Vec<_> = results.iter().filter(|r| !r.matches()).collect();
        if !mismatched.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatched {
                for agent in result.agents.iter().filter(|a| !a.matches()) {
                    println!(
                        "Tick {}: {} {} → {}",
                        result.tick,
                        agent.id,
                        format_vector(agent.original),
                        format_vector(agent.replayed)
                    );
                }
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made in the log
    pub fn validate_expected_moves(
        &self,
        entries: &[TickLogEntry],
        expected_moves: &[ExpectedMove],
    ) -> Result<(), String> {
        for (tick, id, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            let logged = entry
                .moves
                .direction_for(id)
                .ok_or_else(|| format!("Tick {}: snake '{}' has no logged move", tick, id))?;
            let actual = Direction::from_vector(logged);

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Tick {}: expected {} to move one of {:?}, but got {}",
                    tick,
                    id,
                    acceptable.iter().map(|d| move_label(*d)).collect::<Vec<_>>(),
                    move_label(actual)
                ));
            }
        }

        Ok(())
    }
}

/// Parses a move label; `stay` or `0` means holding position
pub fn parse_move(s: &str) -> Result<Option<Direction>, String> {
    match s.trim().to_lowercase().as_str() {
        "stay" | "0" => Ok(None),
        other => Direction::parse(other).map(Some),
    }
}

fn move_label(dir: Option<Direction>) -> &'static str {
    dir.map_or("stay", |d| d.as_str())
}

fn format_vector(v: Vector) -> String {
    match Direction::from_vector(v) {
        Some(dir) => dir.as_str().to_string(),
        None if v.is_zero() => "stay".to_string(),
        None => format!("[{}, {}, {}]", v.x, v.y, v.z),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveResponse, SnakeMove, Snapshot};

    fn entry(tick: u32, direction: Vector) -> TickLogEntry {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "mapSize": [2, 2, 2],
            "snakes": [{"id": "a", "geometry": [[0, 0, 0]], "status": "alive"}],
            "food": [{"c": [1, 0, 0], "points": 10}],
            "turn": tick
        }))
        .unwrap();
        TickLogEntry {
            tick,
            seed: 0,
            snapshot,
            moves: MoveResponse {
                snakes: vec![SnakeMove {
                    id: "a".to_string(),
                    direction,
                }],
            },
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("stay").unwrap(), None);
        assert_eq!(parse_move("0").unwrap(), None);
        assert_eq!(parse_move("-z").unwrap(), Some(Direction::NegZ));
        assert!(parse_move("sideways").is_err());
    }

    #[test]
    fn test_replay_detects_match_and_mismatch() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, Vector::new(1, 0, 0)), entry(2, Vector::new(0, 1, 0))];

        let results = engine.replay_all(&entries);
        assert_eq!(results.len(), 2);
        assert!(results[0].matches());
        assert!(!results[1].matches());

        let stats = engine.generate_stats(&results);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert!((stats.match_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_replay_ticks_missing_tick_errors() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, Vector::new(1, 0, 0))];
        assert!(engine.replay_ticks(&entries, &[1]).is_ok());
        assert!(engine.replay_ticks(&entries, &[9]).is_err());
    }

    #[test]
    fn test_validate_expected_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![entry(1, Vector::new(1, 0, 0)), entry(2, Vector::ZERO)];

        let ok = vec![
            (1, "a".to_string(), vec![Some(Direction::PosX)]),
            (2, "a".to_string(), vec![None, Some(Direction::PosY)]),
        ];
        assert!(engine.validate_expected_moves(&entries, &ok).is_ok());

        let bad = vec![(1, "a".to_string(), vec![Some(Direction::NegX)])];
        let err = engine.validate_expected_moves(&entries, &bad).unwrap_err();
        assert!(err.contains("but got +x"));

        let unknown = vec![(1, "zzz".to_string(), vec![None])];
        assert!(engine.validate_expected_moves(&entries, &unknown).is_err());
    }

    #[test]
    fn test_format_vector() {
        assert_eq!(format_vector(Vector::new(0, 0, -1)), "-z");
        assert_eq!(format_vector(Vector::ZERO), "stay");
        assert_eq!(format_vector(Vector::new(1, 1, 0)), "[1, 1, 0]");
    }
}
