use std::fmt;

use crate::geometry::is_point_inside;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collidable rectangle of one piece of falling garbage.
///
/// `row` is fractional while the garbage falls; it is rounded only when
/// drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub row: f64,
    pub column: f64,
    pub rows_size: usize,
    pub columns_size: usize,
}

impl Obstacle {
    pub fn new(id: ObstacleId, row: f64, column: f64, rows_size: usize, columns_size: usize) -> Self {
        Obstacle { id, row, column, rows_size, columns_size }
    }

    pub fn contains_point(&self, row: f64, column: f64) -> bool {
        is_point_inside(
            self.row,
            self.column,
            self.rows_size as f64,
            self.columns_size as f64,
            row,
            column,
        )
    }

    /// Top-left corner of the outline drawn around the obstacle.
    pub fn bounding_box_corner(&self) -> (f64, f64) {
        (self.row - 1.0, self.column - 1.0)
    }

    /// Outline one cell larger than the obstacle on every side.
    pub fn bounding_box_frame(&self) -> String {
        let inner = "-".repeat(self.columns_size);
        let blank = " ".repeat(self.columns_size);
        let mut lines = Vec::with_capacity(self.rows_size + 2);
        lines.push(format!("+{}+", inner));
        for _ in 0..self.rows_size {
            lines.push(format!("|{}|", blank));
        }
        lines.push(format!("+{}+", inner));
        lines.join("\n")
    }
}
