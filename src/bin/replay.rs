// Standalone replay tool for analysing planner debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                        Replay all ticks
//   --ticks <t1,t2>              Replay specific ticks (comma-separated)
//   --validate <tick:id:move>    Validate logged moves
//   --verbose                    Show detailed output for each tick
//   --config <path>              Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;
use std::time::Instant;

use snake3d_planner::config::Config;
use snake3d_planner::replay::{parse_move, ExpectedMove, ReplayEngine};
use snake3d_planner::simple_profiler;

fn print_usage() {
    eprintln!("Snake3D Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                       Replay all ticks in the log");
    eprintln!("  --ticks <T1,T2,...>         Replay specific ticks (comma-separated)");
    eprintln!("  --validate <T:ID:M,...>     Validate logged moves (M is +x,-x,+y,-y,+z,-z or stay)");
    eprintln!("  --verbose                   Show detailed output for each tick");
    eprintln!("  --config <path>             Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                      Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all ticks");
    eprintln!("  replay snake3d_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific ticks");
    eprintln!("  replay snake3d_debug.jsonl --ticks 5,10,15");
    eprintln!();
    eprintln!("  # Validate expected moves (alternatives separated by '|')");
    eprintln!("  replay snake3d_debug.jsonl --validate 5:snake-1:+x,10:snake-2:-z|stay");
}

fn parse_ticks(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<ExpectedMove>, String> {
    s.split(',')
        .map(|triple| {
            let parts: Vec<&str> = triple.trim().split(':').collect();
            if parts.len() != 3 {
                return Err(format!(
                    "Invalid format '{}'. Expected 'tick:snake_id:move'",
                    triple
                ));
            }

            let tick = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", parts[0], e))?;

            let moves = parts[2]
                .split('|')
                .map(parse_move)
                .collect::<Result<Vec<_>, String>>()?;

            Ok((tick, parts[1].to_string(), moves))
        })
        .collect()
}

enum Mode {
    All,
    Ticks(String),
    Validate(String),
}

fn option_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let wants_help = args.iter().any(|a| a == "--help");

    if args.len() < 2 || wants_help {
        print_usage();
        process::exit(if wants_help { 0 } else { 1 });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--ticks" => {
                mode = Some(Mode::Ticks(option_value(&args, i, "--ticks")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(option_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --ticks, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    let started = Instant::now();
    match mode {
        Mode::All => {
            println!("Replaying all {} ticks...\n", entries.len());
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Ticks(arg) => {
            let ticks = match parse_ticks(&arg) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error parsing ticks: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific tick(s)...\n", ticks.len());
            match engine.replay_ticks(&entries, &ticks) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = match parse_expected_moves(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }

    simple_profiler::print_report(started.elapsed().as_millis() as u64);
}
