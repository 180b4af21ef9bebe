use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use SailRouting::engine::codec::format_route;
use SailRouting::engine::config::{CostSampling, HeuristicKind, RoutingConfig};
use SailRouting::engine::router::RouteSearch;
use SailRouting::engine::validator::RouteValidator;
use SailRouting::parsers::map::GameMap;

/// Finds the fastest route across a wind map and writes it as a route file.
#[derive(Debug, Parser)]
#[command(name = "sail-route")]
struct Args {
    /// Map base name; reads `<MAP>.json` and `<MAP>_meta.json`
    map: PathBuf,

    /// Where to write the route
    #[arg(short, long, default_value = "route.txt")]
    out: PathBuf,

    /// Optional JSON routing config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the iteration cap
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Price moves with the wind speed of the departure cell instead of the arrival cell
    #[arg(long)]
    departure_wind: bool,

    /// Plain uniform-cost search (no heuristic)
    #[arg(long)]
    dijkstra: bool,

    /// Skip replaying the route after writing it
    #[arg(long)]
    no_validate: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    info!("Starting sail-route...");

    let mut config = match &args.config {
        Some(path) => RoutingConfig::load(path)?,
        None => RoutingConfig::default(),
    };
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if args.departure_wind {
        config.cost_sampling = CostSampling::Departure;
    }
    if args.dijkstra {
        config.heuristic = HeuristicKind::Dijkstra;
    }
    config.validate()?;

    let map = GameMap::load(&args.map)?;
    let start_wind = map.field.wind_at(map.start)?;
    let finish_wind = map.field.wind_at(map.finish)?;
    info!("Start wind: dir={}, speed={:.2}", start_wind.direction, start_wind.speed);
    info!("Finish wind: dir={}, speed={:.2}", finish_wind.direction, finish_wind.speed);

    let timer = Instant::now();
    let found = match RouteSearch::new(&map.field, map.start, map.finish)
        .with_config(config.clone())
        .search()
    {
        Ok(found) => found,
        Err(e) => {
            error!("Failed to find a route: {}", e);
            return Err(e.into());
        }
    };
    println!(
        "Route: {} moves, cost {:.3}, {} iterations, {:?}",
        found.route.len(),
        found.total_cost,
        found.iterations,
        timer.elapsed()
    );

    let text = format_route(&found.route);
    std::fs::write(&args.out, &text)?;
    println!("Route saved to {}", args.out.display());

    for (i, heading) in found.route.iter().take(10).enumerate() {
        println!("  {}. {} ({} deg)", i + 1, heading, heading.degrees());
    }
    if found.route.len() > 10 {
        println!("  ... ({} more moves)", found.route.len() - 10);
    }

    if !args.no_validate {
        let report = RouteValidator::new(&map.field, map.start, map.finish)
            .with_config(&config)
            .validate_text(&text)?;
        println!(
            "Route valid: {} moves reach {} (replayed cost {:.3})",
            report.moves.len(),
            report.goal,
            report.total_cost
        );
    }

    Ok(())
}
