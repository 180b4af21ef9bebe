use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::engine::config::{HeuristicKind, RoutingConfig};
use crate::engine::error::{SearchError, UnreachableReason};
use crate::engine::models::{GridPos, Heading, WindField};
use crate::engine::movement::MovementModel;
use crate::engine::physics::CostModel;

/// Points of interest during a search, delivered to a [`SearchObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    NodeExpanded {
        iteration: usize,
        position: GridPos,
        heading: Option<Heading>,
        cost: f64,
        open_len: usize,
    },
    GoalFound {
        iterations: usize,
        total_cost: f64,
        moves: usize,
    },
    Exhausted {
        iterations: usize,
        reason: UnreachableReason,
    },
}

pub trait SearchObserver {
    fn on_event(&mut self, event: &SearchEvent);
}

impl<F: FnMut(&SearchEvent)> SearchObserver for F {
    fn on_event(&mut self, event: &SearchEvent) {
        self(event)
    }
}

/// Forwards search events to the `log` facade.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    /// Expansions between `debug!` progress lines, 0 to disable.
    pub progress_interval: usize,
}

impl LogObserver {
    pub fn new(progress_interval: usize) -> Self {
        Self { progress_interval }
    }
}

impl SearchObserver for LogObserver {
    fn on_event(&mut self, event: &SearchEvent) {
        match *event {
            SearchEvent::NodeExpanded { iteration, position, cost, open_len, .. } => {
                if self.progress_interval > 0 && iteration % self.progress_interval == 0 {
                    debug!("Iteration {}: pos={}, cost={:.3}, open={}", iteration, position, cost, open_len);
                } else {
                    trace!("Expanding {} at cost {:.3}", position, cost);
                }
            }
            SearchEvent::GoalFound { iterations, total_cost, moves } => {
                info!("Found route of {} moves (cost {:.3}) in {} iterations", moves, total_cost, iterations);
            }
            SearchEvent::Exhausted { iterations, reason } => {
                warn!("No route found: {} after {} iterations", reason, iterations);
            }
        }
    }
}

/// Search state for one cell. Lives in the search's arena; `parent` is an
/// arena index.
#[derive(Debug, Clone, Copy)]
struct Node {
    position: GridPos,
    heading: Option<Heading>,
    cost: f64,
    heuristic: f64,
    parent: Option<usize>,
}

impl Node {
    fn priority(&self) -> f64 {
        self.cost + self.heuristic
    }
}

/// Open-set entry. Lowest priority pops first, earlier insertion wins ties.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    priority: f64,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for BinaryHeap's max-heap
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

#[derive(Debug, Clone, PartialEq)]
pub struct FoundRoute {
    pub route: Vec<Heading>,
    pub total_cost: f64,
    /// Nodes popped from the open set, including the goal.
    pub iterations: usize,
}

/// A* over grid cells from `start` to `goal`.
pub struct RouteSearch<'a> {
    field: &'a WindField,
    start: GridPos,
    goal: GridPos,
    config: RoutingConfig,
    abort: Option<Arc<AtomicBool>>,
}

impl<'a> RouteSearch<'a> {
    pub fn new(field: &'a WindField, start: GridPos, goal: GridPos) -> Self {
        Self {
            field,
            start,
            goal,
            config: RoutingConfig::default(),
            abort: None,
        }
    }

    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }

    /// Flag polled once per iteration; raising it ends the search with
    /// [`UnreachableReason::Aborted`].
    pub fn with_abort(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    /// Runs the search, reporting progress through the `log` facade.
    pub fn search(&self) -> Result<FoundRoute, SearchError> {
        let mut observer = LogObserver::new(self.config.progress_interval);
        self.search_with(&mut observer)
    }

    pub fn search_with(&self, observer: &mut dyn SearchObserver) -> Result<FoundRoute, SearchError> {
        // Both endpoints must be on the field.
        self.field.wind_at(self.start)?;
        self.field.wind_at(self.goal)?;

        info!(
            "Searching route from {} to {} on a {}x{} field",
            self.start,
            self.goal,
            self.field.rows(),
            self.field.cols()
        );

        if self.start == self.goal {
            observer.on_event(&SearchEvent::GoalFound { iterations: 0, total_cost: 0.0, moves: 0 });
            return Ok(FoundRoute { route: Vec::new(), total_cost: 0.0, iterations: 0 });
        }

        let movement = MovementModel::new(self.field);
        let cost_model = CostModel::from_config(&self.config);
        let min_move_cost = cost_model.min_move_cost(self.field.max_speed());

        let mut arena: Vec<Node> = Vec::new();
        let mut open = BinaryHeap::new();
        // Position -> arena index of its live open node. Superseded heap
        // entries no longer match and are skipped when popped.
        let mut open_index: HashMap<GridPos, usize> = HashMap::new();
        let mut closed: HashSet<GridPos> = HashSet::new();
        let mut seq: u64 = 0;
        let mut iterations = 0;

        arena.push(Node {
            position: self.start,
            heading: None,
            cost: 0.0,
            heuristic: self.heuristic(self.start, min_move_cost),
            parent: None,
        });
        open_index.insert(self.start, 0);
        open.push(OpenEntry { priority: arena[0].priority(), seq, node: 0 });
        seq += 1;

        while let Some(entry) = open.pop() {
            if self.abort_requested() {
                return Err(self.unreachable(UnreachableReason::Aborted, iterations, observer));
            }

            let node = arena[entry.node];
            if open_index.get(&node.position) != Some(&entry.node) {
                continue;
            }
            if iterations >= self.config.max_iterations {
                return Err(self.unreachable(UnreachableReason::IterationCap, iterations, observer));
            }
            iterations += 1;

            if node.position == self.goal {
                let route = reconstruct(&arena, entry.node);
                observer.on_event(&SearchEvent::GoalFound {
                    iterations,
                    total_cost: node.cost,
                    moves: route.len(),
                });
                return Ok(FoundRoute { route, total_cost: node.cost, iterations });
            }

            open_index.remove(&node.position);
            closed.insert(node.position);
            observer.on_event(&SearchEvent::NodeExpanded {
                iteration: iterations,
                position: node.position,
                heading: node.heading,
                cost: node.cost,
                open_len: open_index.len(),
            });

            for heading in movement.legal_headings(node.position)? {
                let destination = node.position.step(heading);
                if closed.contains(&destination) {
                    continue;
                }

                let step_cost = cost_model.move_cost(self.field, node.position, node.heading, heading)?;
                if !step_cost.is_finite() {
                    continue;
                }
                let cost = node.cost + step_cost;

                if let Some(&existing) = open_index.get(&destination) {
                    if arena[existing].cost <= cost {
                        continue;
                    }
                }

                let idx = arena.len();
                arena.push(Node {
                    position: destination,
                    heading: Some(heading),
                    cost,
                    heuristic: self.heuristic(destination, min_move_cost),
                    parent: Some(entry.node),
                });
                open_index.insert(destination, idx);
                open.push(OpenEntry { priority: arena[idx].priority(), seq, node: idx });
                seq += 1;
            }
        }

        Err(self.unreachable(UnreachableReason::Exhausted, iterations, observer))
    }

    fn heuristic(&self, position: GridPos, min_move_cost: f64) -> f64 {
        match self.config.heuristic {
            HeuristicKind::ScaledChebyshev => f64::from(position.chebyshev(&self.goal)) * min_move_cost,
            HeuristicKind::Dijkstra => 0.0,
        }
    }

    fn abort_requested(&self) -> bool {
        self.abort.as_ref().is_some_and(|flag| flag.load(AtomicOrdering::Relaxed))
    }

    fn unreachable(
        &self,
        reason: UnreachableReason,
        iterations: usize,
        observer: &mut dyn SearchObserver,
    ) -> SearchError {
        observer.on_event(&SearchEvent::Exhausted { iterations, reason });
        SearchError::Unreachable {
            start: self.start,
            goal: self.goal,
            reason,
            iterations,
        }
    }
}

fn reconstruct(arena: &[Node], goal: usize) -> Vec<Heading> {
    let mut route = Vec::new();
    let mut current = Some(goal);
    while let Some(idx) = current {
        let node = &arena[idx];
        if let Some(heading) = node.heading {
            route.push(heading);
        }
        current = node.parent;
    }
    route.reverse();
    route
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest {
    pub start: GridPos,
    pub goal: GridPos,
}

/// Routes independent start/goal pairs over one field in parallel. Results
/// come back in request order.
pub fn route_many(
    field: &WindField,
    requests: &[RouteRequest],
    config: &RoutingConfig,
) -> Vec<Result<FoundRoute, SearchError>> {
    info!("Routing {} independent requests", requests.len());
    requests
        .par_iter()
        .map(|request| {
            RouteSearch::new(field, request.start, request.goal)
                .with_config(config.clone())
                .search()
        })
        .collect()
}
