#[macro_use]
extern crate rocket;

use log::info;
use std::env;

use snake3d_planner::bot::Bot;
use snake3d_planner::config::Config;
use snake3d_planner::debug_logger::DebugLogger;
use snake3d_planner::handler;

#[launch]
async fn rocket() -> _ {
    // Hosting platforms hand us `PORT`; Rocket reads `ROCKET_PORT`.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // Default to 'info' unless RUST_LOG is already set
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting snake3d planner...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let debug_logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let bot = Bot::new(config).with_debug_logger(debug_logger);

    handler::server(bot)
}
