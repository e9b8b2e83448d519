//! Scene Layout CLI
//!
//! Usage:
//!   scene-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --strategy <NAME>    force, grid, circular or smart (default)
//!   -c, --config <FILE>      Layout configuration (TOML format)
//!   -p, --positions <FILE>   Known positions to start from (JSON)
//!   --pin <ID>               Keep a node where it is (repeatable)
//!   --check                  Only validate the scene
//!   --scene                  Also print the reconstructed scene
//!   -v, --verbose            More logging on stderr (repeatable)
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use serde_json::{json, Value};
use tracing::level_filters::LevelFilter;

use scene_layout::{
    arrange, positions_from_file, validate, ArrangeConfig, ArrangeError, LayoutConfig,
    LayoutStrategy, Positions, ValidationReport,
};

#[derive(Parser)]
#[command(name = "scene-layout")]
#[command(about = "Validate scene graphs and compute node positions")]
struct Cli {
    /// Input scene JSON (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout strategy: force, grid, circular or smart
    #[arg(short, long, default_value_t = LayoutStrategy::Smart)]
    strategy: LayoutStrategy,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Known positions as a JSON object of {id: {x, y}}
    #[arg(short, long)]
    positions: Option<PathBuf>,

    /// Keep this node where it is during force layout
    #[arg(long = "pin", value_name = "ID")]
    pinned: Vec<String>,

    /// Only validate; exit with status 1 if the scene has errors
    #[arg(long)]
    check: bool,

    /// Include the reconstructed scene in the output
    #[arg(long)]
    scene: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading layout config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };

    let overrides = match &cli.positions {
        Some(path) => match positions_from_file(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading positions '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Positions::new(),
    };

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let value: Value = match serde_json::from_str(&source) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: input is not valid JSON: {}", e);
            std::process::exit(1);
        }
    };

    if cli.check {
        let report = validate(&value);
        print_diagnostics(&report);
        print_json(&json!(report));
        if !report.valid {
            std::process::exit(1);
        }
        return;
    }

    let mut config = ArrangeConfig::new()
        .with_layout(layout)
        .with_strategy(cli.strategy)
        .with_overrides(overrides);
    config.pinned = cli.pinned;

    match arrange(&value, &config) {
        Ok(arrangement) => {
            print_diagnostics(&arrangement.report);
            tracing::info!(
                strategy = %cli.strategy,
                nodes = arrangement.positions.len(),
                "layout complete"
            );
            let output = if cli.scene {
                json!({ "positions": arrangement.positions, "scene": arrangement.scene() })
            } else {
                json!(arrangement.positions)
            };
            print_json(&output);
        }
        Err(ArrangeError::Invalid(report)) => {
            print_diagnostics(&report);
            eprintln!("Error: scene has {} error(s)", report.errors().count());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn print_diagnostics(report: &ValidationReport) {
    for diagnostic in &report.diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error writing output: {}", e);
            std::process::exit(1);
        }
    }
}
