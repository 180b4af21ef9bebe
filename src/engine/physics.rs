use crate::engine::config::{CostSampling, RoutingConfig};
use crate::engine::error::FieldError;
use crate::engine::models::{GridPos, Heading, WindField};

/// Headings closer than this to the wind-from direction cannot be sailed.
pub const NO_GO_ANGLE: f64 = 30.0;

/// Unsigned angle between two compass bearings, folded into [0, 180].
pub fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs().rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Attack angle of a heading against the wind, where `wind_direction` is the
/// bearing the wind blows toward.
pub fn relative_angle(heading_deg: f64, wind_direction: f64) -> f64 {
    let wind_from = (wind_direction + 180.0).rem_euclid(360.0);
    angle_between(heading_deg, wind_from)
}

pub fn in_no_go_zone(relative_angle: f64) -> bool {
    relative_angle < NO_GO_ANGLE
}

/// Simplified polar: fraction of wind speed the boat achieves at a given
/// attack angle.
pub fn speed_factor(relative_angle: f64) -> f64 {
    if relative_angle < NO_GO_ANGLE {
        0.0
    } else if relative_angle < 60.0 {
        1.0
    } else if relative_angle < 90.0 {
        0.95
    } else if relative_angle < 135.0 {
        0.85
    } else {
        0.70
    }
}

/// Time lost changing heading by `delta` degrees between consecutive moves.
pub fn turn_penalty_for_delta(delta: f64) -> f64 {
    if delta <= 0.0 {
        0.0
    } else if delta <= 10.0 {
        0.5
    } else if delta <= 20.0 {
        1.0
    } else if delta <= 30.0 {
        1.5
    } else if delta <= 40.0 {
        2.0
    } else if delta <= 50.0 {
        2.5
    } else if delta < 60.0 {
        3.0
    } else {
        4.0
    }
}

pub fn turn_penalty(previous: Option<Heading>, new: Heading) -> f64 {
    match previous {
        Some(prev) => turn_penalty_for_delta(angle_between(new.degrees(), prev.degrees())),
        None => 0.0,
    }
}

/// Prices single moves in time-to-sail units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    pub base_time: f64,
    pub epsilon: f64,
    pub sampling: CostSampling,
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

impl CostModel {
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self {
            base_time: config.base_time,
            epsilon: config.epsilon,
            sampling: config.cost_sampling,
        }
    }

    pub fn boat_speed(wind_speed: f64, relative_angle: f64) -> f64 {
        wind_speed * speed_factor(relative_angle)
    }

    /// Cost of sailing `new` after `previous`. Infinite inside the no-go zone.
    pub fn edge_cost(&self, previous: Option<Heading>, new: Heading, wind_speed: f64, relative_angle: f64) -> f64 {
        if in_no_go_zone(relative_angle) {
            return f64::INFINITY;
        }
        let boat_speed = Self::boat_speed(wind_speed, relative_angle);
        self.base_time / (boat_speed + self.epsilon) + turn_penalty(previous, new)
    }

    /// Cost of the move from `from` along `heading`.
    ///
    /// The attack angle always comes from the departure cell's wind, the same
    /// angle the no-go rule judges, so every legal move prices finite.
    /// `sampling` only picks which cell's wind speed drives the boat. The
    /// destination must be inside the field when sampling on arrival.
    pub fn move_cost(
        &self,
        field: &WindField,
        from: GridPos,
        previous: Option<Heading>,
        heading: Heading,
    ) -> Result<f64, FieldError> {
        let departure = field.wind_at(from)?;
        let rel = relative_angle(heading.degrees(), departure.direction);
        let wind_speed = match self.sampling {
            CostSampling::Departure => departure.speed,
            CostSampling::Arrival => field.wind_at(from.step(heading))?.speed,
        };
        Ok(self.edge_cost(previous, heading, wind_speed, rel))
    }

    /// Lower bound on any single move in a field whose strongest wind is
    /// `max_wind_speed`: best speed factor, no turn.
    pub fn min_move_cost(&self, max_wind_speed: f64) -> f64 {
        self.base_time / (max_wind_speed * 1.0 + self.epsilon)
    }
}
