use std::collections::{HashSet, VecDeque};

use SailRouting::engine::codec::{decode, encode, format_route, parse_route};
use SailRouting::engine::config::{CostSampling, HeuristicKind, RoutingConfig};
use SailRouting::engine::error::{SearchError, UnreachableReason, ValidationError};
use SailRouting::engine::models::{GridPos, Heading, WindField};
use SailRouting::engine::movement::MovementModel;
use SailRouting::engine::router::{RouteRequest, RouteSearch, route_many};
use SailRouting::engine::validator::RouteValidator;
use SailRouting::parsers::map::GameMap;

/// Direction the wind must blow toward for `heading` to point straight into it.
fn headwind_for(heading: Heading) -> f64 {
    (heading.degrees() + 180.0) % 360.0
}

/// Deterministic, varied field without pulling in an RNG.
fn swirl_field(rows: usize, cols: usize) -> WindField {
    let direction: Vec<Vec<f64>> = (0..rows)
        .map(|r| (0..cols).map(|c| ((r * 37 + c * 53 + r * c * 11) % 360) as f64).collect())
        .collect();
    let speed: Vec<Vec<f64>> = (0..rows)
        .map(|r| (0..cols).map(|c| 2.0 + ((r * 7 + c * 3) % 9) as f64).collect())
        .collect();
    WindField::from_grids(direction, speed).unwrap()
}

/// Whether any sequence of legal moves leads from `start` to `goal`,
/// ignoring cost.
fn legally_reachable(field: &WindField, start: GridPos, goal: GridPos) -> bool {
    let movement = MovementModel::new(field);
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(position) = queue.pop_front() {
        if position == goal {
            return true;
        }
        for heading in movement.legal_headings(position).unwrap() {
            let next = position.step(heading);
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

#[test]
fn test_uniform_southerly_wind_tacks_to_goal() {
    let field = WindField::uniform(5, 5, 180.0, 10.0).unwrap();
    let start = GridPos::new(1, 1);
    let goal = GridPos::new(1, 5);

    let found = RouteSearch::new(&field, start, goal).search().unwrap();
    assert!(!found.route.contains(&Heading::S), "pure south is never useful here: {:?}", found.route);
    assert!(!found.route.contains(&Heading::N), "N is dead upwind: {:?}", found.route);
    assert!(found.route.contains(&Heading::NE) && found.route.contains(&Heading::SE));

    let text = format_route(&found.route);
    let report = RouteValidator::new(&field, start, goal).validate_text(&text).unwrap();
    assert_eq!(report.moves.last().map(|m| m.to), Some(goal));
    assert!((report.total_cost - found.total_cost).abs() < 1e-9);
}

#[test]
fn test_start_equals_goal_round_trip() {
    let field = WindField::uniform(4, 4, 90.0, 3.0).unwrap();
    let pos = GridPos::new(2, 3);
    let found = RouteSearch::new(&field, pos, pos).search().unwrap();
    assert!(found.route.is_empty());
    assert_eq!(format_route(&found.route), "");
    assert!(RouteValidator::new(&field, pos, pos).validate_text("").is_ok());
}

#[test]
fn test_goal_walled_off_by_no_go_zones() {
    let goal = GridPos::new(3, 3);
    let mut field = WindField::uniform(5, 5, 180.0, 10.0).unwrap();
    // Every cell that could step into the goal faces straight into the wind
    // when it tries.
    for heading in Heading::ALL {
        let (dy, dx) = heading.step();
        let origin = GridPos::new(goal.y - dy, goal.x - dx);
        field = field.with_wind(origin, headwind_for(heading), 10.0).unwrap();
    }

    let movement = MovementModel::new(&field);
    for heading in Heading::ALL {
        let (dy, dx) = heading.step();
        let origin = GridPos::new(goal.y - dy, goal.x - dx);
        assert!(!movement.legal_headings(origin).unwrap().contains(&heading));
    }

    let result = RouteSearch::new(&field, GridPos::new(1, 1), goal).search();
    assert!(
        matches!(result, Err(SearchError::Unreachable { reason: UnreachableReason::Exhausted, .. })),
        "got {result:?}"
    );
}

#[test]
fn test_search_results_always_replay() {
    let field = swirl_field(14, 11);
    let starts = [GridPos::new(1, 1), GridPos::new(7, 6), GridPos::new(14, 11)];
    let goals = [GridPos::new(14, 1), GridPos::new(2, 10), GridPos::new(9, 4)];

    for sampling in [CostSampling::Arrival, CostSampling::Departure] {
        for heuristic in [HeuristicKind::ScaledChebyshev, HeuristicKind::Dijkstra] {
            let config = RoutingConfig { cost_sampling: sampling, heuristic, ..RoutingConfig::default() };
            for start in starts {
                for goal in goals {
                    match RouteSearch::new(&field, start, goal).with_config(config.clone()).search() {
                        Ok(found) => {
                            let report = RouteValidator::new(&field, start, goal)
                                .with_config(&config)
                                .validate(&found.route)
                                .unwrap_or_else(|e| panic!("{start} -> {goal} failed replay: {e}"));
                            assert!((report.total_cost - found.total_cost).abs() < 1e-6);
                            assert!(found.total_cost.is_finite() && found.total_cost > 0.0);
                        }
                        Err(SearchError::Unreachable { reason, .. }) => {
                            assert_eq!(reason, UnreachableReason::Exhausted);
                            assert!(
                                !legally_reachable(&field, start, goal),
                                "{start} -> {goal} ({sampling:?}) has a legal route but search gave up"
                            );
                        }
                        Err(e) => panic!("unexpected error {e}"),
                    }
                }
            }
        }
    }
}

#[test]
fn test_every_move_of_a_route_is_legal() {
    let field = swirl_field(10, 10);
    let start = GridPos::new(2, 2);
    let goal = GridPos::new(9, 8);
    let Ok(found) = RouteSearch::new(&field, start, goal).search() else {
        return;
    };

    let movement = MovementModel::new(&field);
    let mut position = start;
    for heading in &found.route {
        assert!(movement.legal_headings(position).unwrap().contains(heading));
        position = position.step(*heading);
    }
    assert_eq!(position, goal);
}

#[test]
fn test_codec_round_trip() {
    let route: Vec<Heading> = (0..40).map(|i| Heading::ALL[(i * 5 + i / 3) % 6]).collect();
    assert_eq!(decode(&encode(&route)).unwrap(), route);
    assert_eq!(parse_route(&format_route(&route)).unwrap(), route);
}

#[test]
fn test_validator_reports_tampered_route() {
    let field = WindField::uniform(5, 5, 180.0, 10.0).unwrap();
    let start = GridPos::new(1, 1);
    let goal = GridPos::new(1, 5);
    let mut route = RouteSearch::new(&field, start, goal).search().unwrap().route;
    route.truncate(3);

    let err = RouteValidator::new(&field, start, goal).validate(&route).unwrap_err();
    assert!(matches!(err, ValidationError::GoalNotReached { remaining: 2, .. }), "got {err:?}");
}

#[test]
fn test_batch_routing_matches_single_searches() {
    let field = swirl_field(12, 12);
    let requests: Vec<RouteRequest> = (1..=6)
        .map(|i| RouteRequest { start: GridPos::new(i, 1), goal: GridPos::new(13 - i, 12) })
        .collect();
    let config = RoutingConfig::default();

    let batch = route_many(&field, &requests, &config);
    for (request, result) in requests.iter().zip(batch) {
        let single = RouteSearch::new(&field, request.start, request.goal).search();
        assert_eq!(result, single);
    }
}

#[test]
fn test_loaded_map_routes_end_to_end() {
    let data = r#"{
        "windDir": [[180, 180, 180, 180, 180],
                    [180, 180, 180, 180, 180],
                    [180, 180, 180, 180, 180],
                    [180, 180, 180, 180, 180],
                    [180, 180, 180, 180, 180]],
        "windSpeed": [[10, 10, 10, 10, 10],
                      [10, 10, 10, 10, 10],
                      [10, 10, 10, 10, 10],
                      [10, 10, 10, 10, 10],
                      [10, 10, 10, 10, 10]]
    }"#;
    let meta = r#"{"startPos": [1, 1], "finishPos": [1, 5], "rows": 5, "cols": 5}"#;
    let map = GameMap::from_json_strs(data, meta).unwrap();

    let found = RouteSearch::new(&map.field, map.start, map.finish).search().unwrap();
    assert_eq!(format_route(&found.route), "SE\nSE\nNE\nNE");
}
