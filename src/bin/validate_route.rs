use std::path::PathBuf;

use clap::Parser;

use SailRouting::engine::config::RoutingConfig;
use SailRouting::engine::error::ValidationError;
use SailRouting::engine::validator::RouteValidator;
use SailRouting::parsers::map::GameMap;

/// Replays a route file against a wind map, move by move.
#[derive(Debug, Parser)]
#[command(name = "validate_route")]
struct Args {
    /// Map base name; reads `<MAP>.json` and `<MAP>_meta.json`
    map: PathBuf,

    /// Route file, one move name per line
    #[arg(default_value = "route.txt")]
    route: PathBuf,

    /// Optional JSON routing config used to price the moves
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RoutingConfig::load(path)?,
        None => RoutingConfig::default(),
    };
    let map = GameMap::load(&args.map)?;
    let text = std::fs::read_to_string(&args.route)?;

    println!("Start: {}", map.start);
    println!("Goal: {}", map.finish);

    let validator = RouteValidator::new(&map.field, map.start, map.finish).with_config(&config);
    match validator.validate_text(&text) {
        Ok(report) => {
            let count = report.moves.len();
            for step in &report.moves {
                // First and last five only
                if step.index < 5 || step.index + 5 >= count {
                    println!(
                        "ok move {:>3}: {:<2} at {} -> {} [rel={:5.1}, cost={:.3}]",
                        step.index + 1,
                        step.heading,
                        step.from,
                        step.to,
                        step.relative_angle,
                        step.cost
                    );
                } else if step.index == 5 {
                    println!("   ... (moves 6-{} hidden) ...", count - 5);
                }
            }
            println!("ROUTE VALID: reached goal in {} moves, cost {:.3}", count, report.total_cost);
            Ok(())
        }
        Err(e) => {
            println!("INVALID: {}", e);
            if let Some(index) = e.move_index() {
                println!("  (move {} of the route, blank lines skipped)", index + 1);
            }
            if !e.alternatives().is_empty() {
                println!("  Moves from that cell:");
                for option in e.alternatives() {
                    println!("    {}", option);
                }
            }
            if let ValidationError::GoalNotReached { remaining, .. } = &e {
                println!("  Distance to goal: {} cells", remaining);
            }
            Err(e.into())
        }
    }
}
