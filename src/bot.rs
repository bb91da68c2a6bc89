// Planner service object
//
// Owns the static configuration, the master rng that hands out per-tick seeds,
// and the debug logger. HTTP handlers, the replay tool and tests all go
// through `Bot::plan_world`, so a logged seed reproduces a tick exactly.

use log::{error, info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::planner::{TickPlan, TickPlanner};
use crate::simple_profiler;
use crate::types::{MoveResponse, Snapshot};
use crate::world::{SnapshotError, World};

/// Snake planner with an endpoint-shaped API
/// Takes static configuration and exposes one method per endpoint
pub struct Bot {
    config: Config,
    rng: Mutex<StdRng>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let rng = match config.director.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Bot {
            config,
            rng: Mutex::new(rng),
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Attaches a tick logger
    pub fn with_debug_logger(mut self, debug_logger: DebugLogger) -> Self {
        self.debug_logger = debug_logger;
        self
    }

    /// Returns planner metadata
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "engine": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "maxPathCost": self.config.pathfinding.max_path_cost,
            "topK": self.config.food.top_k,
        })
    }

    /// Draws the shuffle seed for the next tick
    fn next_seed(&self) -> u64 {
        self.rng.lock().random()
    }

    /// Computes the moves for one tick
    /// Corresponds to POST /move endpoint
    ///
    /// Validates the snapshot, then plans on the blocking pool and waits at most
    /// the tick budget. If planning overruns, every snake stays put this tick.
    ///
    /// # Returns
    /// * `Ok(MoveResponse)` - One direction per controlled snake, in input order
    /// * `Err(SnapshotError)` - The snapshot violates the input contract
    pub async fn get_move(&self, snapshot: &Snapshot) -> Result<MoveResponse, SnapshotError> {
        let start_time = Instant::now();
        let tick = snapshot.turn;

        for message in &snapshot.errors {
            warn!("Tick {}: server reported error: {}", tick, message);
        }

        let world = World::from_snapshot(snapshot, &self.config.food)?;
        let seed = self.next_seed();
        let budget = self.config.timing.budget_for(snapshot.tick_remain_ms);

        info!(
            "Tick {}: planning {} snakes ({} food, {} enemies), budget {}ms",
            tick,
            world.agents.len(),
            world.food.len(),
            world.hostiles.len(),
            budget
        );

        let config = self.config.clone();
        let task_world = world.clone();
        let task = tokio::task::spawn_blocking(move || Bot::plan_world(&config, &task_world, seed));

        let plan = match tokio::time::timeout(Duration::from_millis(budget), task).await {
            Ok(Ok(plan)) => plan,
            Ok(Err(e)) => {
                error!("Tick {}: planning task failed: {}", tick, e);
                TickPlan::all_still(&world)
            }
            Err(_) => {
                warn!(
                    "Tick {}: planning exceeded {}ms budget, holding position",
                    tick, budget
                );
                TickPlan::all_still(&world)
            }
        };

        let response = plan.to_response();
        let moving = plan.agents.iter().filter(|a| a.direction.is_some()).count();
        info!(
            "Tick {}: {} of {} snakes moving (seed: {}, time: {}ms)",
            tick,
            moving,
            plan.agents.len(),
            seed,
            start_time.elapsed().as_millis()
        );

        self.debug_logger
            .log_tick(seed, snapshot.clone(), response.clone());

        Ok(response)
    }

    /// Synchronous planning entry point
    ///
    /// The same `(config, world, seed)` always yields the same plan.
    pub fn plan_world(config: &Config, world: &World, seed: u64) -> TickPlan {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = TickPlanner::new(config).plan(world, &mut rng);
        simple_profiler::merge_thread_local();
        plan
    }
}
