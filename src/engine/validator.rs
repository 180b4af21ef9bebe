use log::{debug, info, warn};
use serde::Serialize;

use crate::engine::codec::parse_route;
use crate::engine::config::RoutingConfig;
use crate::engine::error::ValidationError;
use crate::engine::models::{GridPos, Heading, WindField};
use crate::engine::movement::{MoveCheck, MovementModel};
use crate::engine::physics::CostModel;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValidatedMove {
    /// 0-based position in the route
    pub index: usize,
    pub heading: Heading,
    pub from: GridPos,
    pub to: GridPos,
    /// Attack angle at `from`, the angle the no-go rule judged
    pub relative_angle: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub start: GridPos,
    pub goal: GridPos,
    pub moves: Vec<ValidatedMove>,
    pub total_cost: f64,
}

/// Replays a route move by move against the same rules the search uses.
pub struct RouteValidator<'a> {
    field: &'a WindField,
    start: GridPos,
    goal: GridPos,
    cost_model: CostModel,
}

impl<'a> RouteValidator<'a> {
    pub fn new(field: &'a WindField, start: GridPos, goal: GridPos) -> Self {
        Self {
            field,
            start,
            goal,
            cost_model: CostModel::default(),
        }
    }

    /// Prices validated moves with the given config instead of the defaults.
    pub fn with_config(mut self, config: &RoutingConfig) -> Self {
        self.cost_model = CostModel::from_config(config);
        self
    }

    pub fn validate_text(&self, text: &str) -> Result<ValidationReport, ValidationError> {
        let route = parse_route(text)?;
        self.validate(&route)
    }

    pub fn validate(&self, route: &[Heading]) -> Result<ValidationReport, ValidationError> {
        self.field.wind_at(self.start)?;
        self.field.wind_at(self.goal)?;
        info!("Validating {} moves from {} to {}", route.len(), self.start, self.goal);

        let movement = MovementModel::new(self.field);
        let mut position = self.start;
        let mut previous: Option<Heading> = None;
        let mut moves = Vec::with_capacity(route.len());
        let mut total_cost = 0.0;

        for (index, &heading) in route.iter().enumerate() {
            match movement.check_move(position, heading)? {
                MoveCheck::OutOfBounds { destination } => {
                    warn!("Move {} ({}) from {} leaves the field at {}", index, heading, position, destination);
                    return Err(ValidationError::OutOfBounds {
                        index,
                        heading,
                        position,
                        destination,
                        alternatives: movement.move_options(position)?,
                    });
                }
                MoveCheck::NoGoZone { wind_from, relative_angle, .. } => {
                    warn!(
                        "Move {} ({}) from {} is {:.1} deg off the wind from {:.0} deg",
                        index, heading, position, relative_angle, wind_from
                    );
                    return Err(ValidationError::NoGoZoneViolation {
                        index,
                        heading,
                        position,
                        wind_from,
                        relative_angle,
                        alternatives: movement.move_options(position)?,
                    });
                }
                MoveCheck::Legal { destination, relative_angle } => {
                    let cost = self.cost_model.move_cost(self.field, position, previous, heading)?;
                    debug!("Move {}: {} {} -> {} rel={:.1} cost={:.3}", index, heading, position, destination, relative_angle, cost);
                    moves.push(ValidatedMove {
                        index,
                        heading,
                        from: position,
                        to: destination,
                        relative_angle,
                        cost,
                    });
                    total_cost += cost;
                    position = destination;
                    previous = Some(heading);
                }
            }
        }

        if position != self.goal {
            let remaining = position.manhattan(&self.goal);
            warn!("Route ends at {}, {} cells from goal {}", position, remaining, self.goal);
            return Err(ValidationError::GoalNotReached {
                final_position: position,
                goal: self.goal,
                remaining,
            });
        }

        info!("Route valid: reached {} in {} moves", self.goal, moves.len());
        Ok(ValidationReport {
            start: self.start,
            goal: self.goal,
            moves,
            total_cost,
        })
    }
}
