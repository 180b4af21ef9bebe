use thiserror::Error;

use crate::engine::models::{GridPos, Heading};
use crate::engine::movement::MoveOption;

/// Errors raised while building or reading a [`WindField`](crate::engine::models::WindField).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("cell ({y}, {x}) is outside the {rows}x{cols} field")]
    OutOfRange { y: i32, x: i32, rows: usize, cols: usize },

    #[error("wind field must have at least one row and one column")]
    Empty,

    #[error("wind grid shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("invalid {kind} value {value} at storage row {row}, column {col}")]
    InvalidValue {
        kind: &'static str,
        row: usize,
        col: usize,
        value: f64,
    },
}

/// Why a search gave up without reaching the goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnreachableReason {
    /// The open set emptied.
    Exhausted,
    /// The configured iteration cap was hit first.
    IterationCap,
    /// The caller raised the abort flag.
    Aborted,
}

impl std::fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            UnreachableReason::Exhausted => "open set exhausted",
            UnreachableReason::IterationCap => "iteration cap reached",
            UnreachableReason::Aborted => "search aborted",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("goal {goal} is unreachable from {start}: {reason} after {iterations} iterations")]
    Unreachable {
        start: GridPos,
        goal: GridPos,
        reason: UnreachableReason,
        iterations: usize,
    },

    #[error(transparent)]
    OutOfRange(#[from] FieldError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// `index` is the 0-based position of the offending name in the route.
    #[error("unknown move name {name:?} at move {index}")]
    UnknownMoveName { index: usize, name: String },
}

/// First problem found while replaying a route.
///
/// Per-move variants carry the 0-based move index and every heading's verdict
/// at the cell the boat was standing on, so a wind/route mismatch can be read
/// straight off the error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("move {index} ({heading}) from {position} leaves the field at {destination}")]
    OutOfBounds {
        index: usize,
        heading: Heading,
        position: GridPos,
        destination: GridPos,
        alternatives: Vec<MoveOption>,
    },

    #[error(
        "move {index} ({heading}) from {position} sails {relative_angle:.1} deg off a wind from {wind_from:.0} deg, inside the no-go zone"
    )]
    NoGoZoneViolation {
        index: usize,
        heading: Heading,
        position: GridPos,
        wind_from: f64,
        relative_angle: f64,
        alternatives: Vec<MoveOption>,
    },

    #[error("route ends at {final_position}, {remaining} cells short of goal {goal}")]
    GoalNotReached {
        final_position: GridPos,
        goal: GridPos,
        remaining: u32,
    },

    #[error("malformed route: {0}")]
    Malformed(#[from] CodecError),

    #[error(transparent)]
    OutOfRange(#[from] FieldError),
}

impl ValidationError {
    /// 0-based index of the offending move, if the failure is tied to one.
    pub fn move_index(&self) -> Option<usize> {
        match self {
            ValidationError::OutOfBounds { index, .. }
            | ValidationError::NoGoZoneViolation { index, .. } => Some(*index),
            ValidationError::Malformed(CodecError::UnknownMoveName { index, .. }) => Some(*index),
            _ => None,
        }
    }

    /// Recomputed move options at the failing cell, empty for end-of-route errors.
    pub fn alternatives(&self) -> &[MoveOption] {
        match self {
            ValidationError::OutOfBounds { alternatives, .. }
            | ValidationError::NoGoZoneViolation { alternatives, .. } => alternatives,
            _ => &[],
        }
    }
}
