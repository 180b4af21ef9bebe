use serde::{Deserialize, Serialize};

use crate::engine::error::FieldError;

/// A cell of the logical play field, 1-indexed. `y = 1` is the bottom row.
///
/// On disk a position is written as a `[y, x]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPos {
    pub y: i32,
    pub x: i32,
}

impl GridPos {
    pub fn new(y: i32, x: i32) -> Self {
        Self { y, x }
    }

    /// The cell one move away along `heading`. May lie outside the field.
    pub fn step(&self, heading: Heading) -> GridPos {
        let (dy, dx) = heading.step();
        GridPos::new(self.y + dy, self.x + dx)
    }

    pub fn manhattan(&self, other: &GridPos) -> u32 {
        self.y.abs_diff(other.y) + self.x.abs_diff(other.x)
    }

    /// Lower bound on the number of moves between two cells: every heading
    /// changes `y` by one and `x` by at most one.
    pub fn chebyshev(&self, other: &GridPos) -> u32 {
        self.y.abs_diff(other.y).max(self.x.abs_diff(other.x))
    }
}

impl From<[i32; 2]> for GridPos {
    fn from(pair: [i32; 2]) -> Self {
        GridPos::new(pair[0], pair[1])
    }
}

impl From<GridPos> for [i32; 2] {
    fn from(pos: GridPos) -> Self {
        [pos.y, pos.x]
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.y, self.x)
    }
}

/// The six compass headings the vessel may sail. No east or west: every
/// move changes the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heading {
    N,
    NE,
    SE,
    S,
    SW,
    NW,
}

impl Heading {
    pub const ALL: [Heading; 6] = [
        Heading::N,
        Heading::NE,
        Heading::SE,
        Heading::S,
        Heading::SW,
        Heading::NW,
    ];

    /// Compass angle in degrees, 0 = North, clockwise.
    pub fn degrees(self) -> f64 {
        match self {
            Heading::N => 0.0,
            Heading::NE => 60.0,
            Heading::SE => 120.0,
            Heading::S => 180.0,
            Heading::SW => 240.0,
            Heading::NW => 300.0,
        }
    }

    /// Grid step `(dy, dx)`.
    pub fn step(self) -> (i32, i32) {
        match self {
            Heading::N => (-1, 0),
            Heading::NE => (-1, 1),
            Heading::SE => (1, 1),
            Heading::S => (1, 0),
            Heading::SW => (1, -1),
            Heading::NW => (-1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heading::N => "N",
            Heading::NE => "NE",
            Heading::SE => "SE",
            Heading::S => "S",
            Heading::SW => "SW",
            Heading::NW => "NW",
        }
    }

    pub fn from_name(name: &str) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.name() == name)
    }

    pub fn from_degrees(degrees: u16) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.degrees() == f64::from(degrees))
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Wind at a single cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSample {
    /// Compass direction the wind blows toward (degrees)
    pub direction: f64,
    /// Non-negative wind speed, arbitrary unit
    pub speed: f64,
}

impl WindSample {
    /// Direction the wind is coming from, in [0, 360).
    pub fn wind_from(&self) -> f64 {
        (self.direction + 180.0).rem_euclid(360.0)
    }
}

/// Static wind over a `rows x cols` grid.
///
/// Storage is row-major with row 0 at the top of the field, while callers
/// address cells with [`GridPos`] where `y = 1` is the bottom row. The
/// translation happens in [`WindField::storage_index`] and nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct WindField {
    rows: usize,
    cols: usize,
    direction: Vec<f64>,
    speed: Vec<f64>,
}

impl WindField {
    /// Builds a field from two row-major grids (row 0 = top).
    pub fn from_grids(direction: Vec<Vec<f64>>, speed: Vec<Vec<f64>>) -> Result<Self, FieldError> {
        let rows = direction.len();
        let cols = direction.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(FieldError::Empty);
        }
        if speed.len() != rows {
            return Err(FieldError::ShapeMismatch(format!(
                "{} direction rows but {} speed rows",
                rows,
                speed.len()
            )));
        }

        let mut flat_dir = Vec::with_capacity(rows * cols);
        let mut flat_speed = Vec::with_capacity(rows * cols);
        for (row, (dir_row, speed_row)) in direction.iter().zip(&speed).enumerate() {
            if dir_row.len() != cols || speed_row.len() != cols {
                return Err(FieldError::ShapeMismatch(format!(
                    "row {} has {} direction and {} speed columns, expected {}",
                    row,
                    dir_row.len(),
                    speed_row.len(),
                    cols
                )));
            }
            for (col, (&d, &s)) in dir_row.iter().zip(speed_row).enumerate() {
                check_values(row, col, d, s)?;
                flat_dir.push(d);
                flat_speed.push(s);
            }
        }

        Ok(Self {
            rows,
            cols,
            direction: flat_dir,
            speed: flat_speed,
        })
    }

    /// A field with the same wind in every cell.
    pub fn uniform(rows: usize, cols: usize, direction: f64, speed: f64) -> Result<Self, FieldError> {
        if rows == 0 || cols == 0 {
            return Err(FieldError::Empty);
        }
        check_values(0, 0, direction, speed)?;
        Ok(Self {
            rows,
            cols,
            direction: vec![direction; rows * cols],
            speed: vec![speed; rows * cols],
        })
    }

    /// Overrides the wind of one cell while the field is still being built.
    pub fn with_wind(mut self, pos: GridPos, direction: f64, speed: f64) -> Result<Self, FieldError> {
        let idx = self.storage_index(pos).ok_or_else(|| self.out_of_range(pos))?;
        check_values(idx / self.cols, idx % self.cols, direction, speed)?;
        self.direction[idx] = direction;
        self.speed[idx] = speed;
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.y >= 1 && pos.x >= 1 && (pos.y as usize) <= self.rows && (pos.x as usize) <= self.cols
    }

    /// Flat storage index of a logical cell: `row = rows - y`, `col = x - 1`.
    pub fn storage_index(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let row = self.rows - pos.y as usize;
        let col = pos.x as usize - 1;
        Some(row * self.cols + col)
    }

    pub fn wind_at(&self, pos: GridPos) -> Result<WindSample, FieldError> {
        let idx = self.storage_index(pos).ok_or_else(|| self.out_of_range(pos))?;
        Ok(WindSample {
            direction: self.direction[idx],
            speed: self.speed[idx],
        })
    }

    /// Strongest wind anywhere in the field.
    pub fn max_speed(&self) -> f64 {
        self.speed.iter().copied().fold(0.0, f64::max)
    }

    fn out_of_range(&self, pos: GridPos) -> FieldError {
        FieldError::OutOfRange {
            y: pos.y,
            x: pos.x,
            rows: self.rows,
            cols: self.cols,
        }
    }
}

fn check_values(row: usize, col: usize, direction: f64, speed: f64) -> Result<(), FieldError> {
    if !direction.is_finite() {
        return Err(FieldError::InvalidValue { kind: "direction", row, col, value: direction });
    }
    if !speed.is_finite() || speed < 0.0 {
        return Err(FieldError::InvalidValue { kind: "speed", row, col, value: speed });
    }
    Ok(())
}
