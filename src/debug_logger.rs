// Debug logging module for asynchronous tick logging
//
// Fire-and-forget async logging so file I/O never delays a move response.
// Each tick's snapshot, tick seed and chosen moves are written as one JSONL line,
// which is exactly what the replay tool reads back.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::types::{MoveResponse, Snapshot};

/// A single debug log line
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TickLogEntry {
    pub tick: u32,
    /// Seed of the fallback shuffle used for this tick
    pub seed: u64,
    pub snapshot: Snapshot,
    pub moves: MoveResponse,
    pub timestamp: String,
}

impl TickLogEntry {
    pub fn new(seed: u64, snapshot: Snapshot, moves: MoveResponse) -> Self {
        TickLogEntry {
            tick: snapshot.turn,
            seed,
            snapshot,
            moves,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> so concurrent tasks append whole lines
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a tick asynchronously (fire-and-forget)
    pub fn log_tick(&self, seed: u64, snapshot: Snapshot, moves: MoveResponse) {
        if !self.enabled {
            return;
        }

        let logger = self.clone();
        tokio::spawn(async move {
            logger.record(TickLogEntry::new(seed, snapshot, moves)).await;
        });
    }

    /// Appends one entry and flushes
    pub async fn record(&self, entry: TickLogEntry) {
        let mut file_guard = self.file.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, SnakeMove, Vector};

    fn snapshot(turn: u32) -> Snapshot {
        serde_json::from_value(serde_json::json!({
            "mapSize": [4, 4, 4],
            "snakes": [{"id": "a", "geometry": [[0, 0, 0]], "status": "alive"}],
            "turn": turn
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_disabled_logger_writes_nothing() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        logger.record(TickLogEntry::new(1, snapshot(0), MoveResponse::default())).await;
    }

    #[tokio::test]
    async fn test_entries_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticks.jsonl");
        let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
        assert!(logger.is_enabled());

        let moves = MoveResponse {
            snakes: vec![SnakeMove {
                id: "a".to_string(),
                direction: Vector::new(0, 1, 0),
            }],
        };
        logger.record(TickLogEntry::new(11, snapshot(3), moves.clone())).await;
        logger.record(TickLogEntry::new(12, snapshot(4), moves.clone())).await;

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let entries: Vec<TickLogEntry> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tick, 3);
        assert_eq!(entries[1].seed, 12);
        assert_eq!(entries[1].moves, moves);
        assert_eq!(entries[0].snapshot.map_size, Cell::new(4, 4, 4));
    }

    #[tokio::test]
    async fn test_unwritable_path_disables_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ticks.jsonl");
        let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
        assert!(!logger.is_enabled());
    }
}
