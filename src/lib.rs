// Library exports for the snake3d planner
// The HTTP binary, the replay tool and the integration tests all link against this.

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod director;
pub mod food;
pub mod grid;
pub mod handler;
pub mod pathfinder;
pub mod planner;
pub mod replay;
pub mod simple_profiler;
pub mod types;
pub mod world;
