//! Move legality. Both the search and the validator go through
//! [`MovementModel::check_move`]; there is no second copy of these rules.

use serde::Serialize;

use crate::engine::error::FieldError;
use crate::engine::models::{GridPos, Heading, WindField};
use crate::engine::physics::{in_no_go_zone, relative_angle};

/// Verdict for one move from one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveCheck {
    Legal {
        destination: GridPos,
        relative_angle: f64,
    },
    OutOfBounds {
        destination: GridPos,
    },
    NoGoZone {
        destination: GridPos,
        wind_from: f64,
        relative_angle: f64,
    },
}

impl MoveCheck {
    pub fn is_legal(&self) -> bool {
        matches!(self, MoveCheck::Legal { .. })
    }

    pub fn destination(&self) -> GridPos {
        match *self {
            MoveCheck::Legal { destination, .. }
            | MoveCheck::OutOfBounds { destination }
            | MoveCheck::NoGoZone { destination, .. } => destination,
        }
    }
}

/// One row of the "what could I have done here" listing attached to
/// validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveOption {
    pub heading: Heading,
    pub destination: GridPos,
    /// Attack angle against the wind at the departure cell.
    pub relative_angle: f64,
    pub in_bounds: bool,
    pub legal: bool,
}

impl std::fmt::Display for MoveOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.legal { "ok " } else { "bad" };
        let bounds = if self.in_bounds { "" } else { " (out of bounds)" };
        write!(
            f,
            "{} {:<2} ({:>3} deg): rel_angle={:5.1}, to {}{}",
            status,
            self.heading.name(),
            self.heading.degrees(),
            self.relative_angle,
            self.destination,
            bounds
        )
    }
}

/// Bounds and no-go rules over a borrowed wind field.
#[derive(Debug, Clone, Copy)]
pub struct MovementModel<'a> {
    field: &'a WindField,
}

impl<'a> MovementModel<'a> {
    pub fn new(field: &'a WindField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &'a WindField {
        self.field
    }

    /// Checks a single move. The wind that decides the no-go zone is the one
    /// at `from`, not at the destination.
    pub fn check_move(&self, from: GridPos, heading: Heading) -> Result<MoveCheck, FieldError> {
        let wind = self.field.wind_at(from)?;
        let destination = from.step(heading);
        if !self.field.contains(destination) {
            return Ok(MoveCheck::OutOfBounds { destination });
        }

        let rel = relative_angle(heading.degrees(), wind.direction);
        if in_no_go_zone(rel) {
            return Ok(MoveCheck::NoGoZone {
                destination,
                wind_from: wind.wind_from(),
                relative_angle: rel,
            });
        }

        Ok(MoveCheck::Legal {
            destination,
            relative_angle: rel,
        })
    }

    /// Headings that can be sailed from `from`, in compass order. Empty at a
    /// dead end.
    pub fn legal_headings(&self, from: GridPos) -> Result<Vec<Heading>, FieldError> {
        let mut legal = Vec::with_capacity(Heading::ALL.len());
        for heading in Heading::ALL {
            if self.check_move(from, heading)?.is_legal() {
                legal.push(heading);
            }
        }
        Ok(legal)
    }

    /// Every heading's verdict at `from`.
    pub fn move_options(&self, from: GridPos) -> Result<Vec<MoveOption>, FieldError> {
        let wind = self.field.wind_at(from)?;
        Heading::ALL
            .into_iter()
            .map(|heading| {
                let check = self.check_move(from, heading)?;
                Ok::<_, FieldError>(MoveOption {
                    heading,
                    destination: check.destination(),
                    relative_angle: relative_angle(heading.degrees(), wind.direction),
                    in_bounds: !matches!(check, MoveCheck::OutOfBounds { .. }),
                    legal: check.is_legal(),
                })
            })
            .collect()
    }
}
