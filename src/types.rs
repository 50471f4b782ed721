#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector2D {
    pub row: f64,
    pub column: f64,
}

impl Vector2D {
    pub fn new(row: f64, column: f64) -> Self {
        Vector2D { row, column }
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.row + other.row, self.column + other.column)
    }

    /// Cell the position falls into when drawn.
    pub fn rounded(&self) -> (i32, i32) {
        (self.row.round() as i32, self.column.round() as i32)
    }
}

/// Player intent read from the keyboard during one poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Controls {
    pub rows_direction: i8,
    pub columns_direction: i8,
    pub fire: bool,
}

/// Text attribute a glyph is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Normal,
    Dim,
    Bold,
}
