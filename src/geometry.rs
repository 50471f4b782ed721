/// Size of a multi-line frame as `(rows, columns)`.
///
/// Columns is the width of the longest line, counted in chars.
pub fn frame_size(frame: &str) -> (usize, usize) {
    let lines: Vec<&str> = frame.lines().collect();
    let rows = lines.len();
    let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    (rows, columns)
}

/// Half-open containment test: the far row and column are outside.
pub fn is_point_inside(
    corner_row: f64,
    corner_column: f64,
    size_rows: f64,
    size_columns: f64,
    point_row: f64,
    point_column: f64,
) -> bool {
    let rows_flag = corner_row <= point_row && point_row < corner_row + size_rows;
    let columns_flag = corner_column <= point_column && point_column < corner_column + size_columns;
    rows_flag && columns_flag
}

/// Clamp a value into `[min, max]`; `max` wins when the range is empty.
pub fn limit(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_uses_longest_line() {
        let frame = "  .  \n /#\\\n|###|\n";
        assert_eq!(frame_size(frame), (3, 5));
    }

    #[test]
    fn frame_size_of_empty_frame() {
        assert_eq!(frame_size(""), (0, 0));
    }

    #[test]
    fn point_inside_is_half_open() {
        assert!(is_point_inside(4.0, 4.0, 3.0, 3.0, 5.0, 5.0));
        assert!(is_point_inside(4.0, 4.0, 3.0, 3.0, 4.0, 4.0));
        assert!(!is_point_inside(4.0, 4.0, 3.0, 3.0, 7.0, 7.0));
        assert!(!is_point_inside(4.0, 4.0, 3.0, 3.0, 6.0, 7.0));
        assert!(is_point_inside(4.0, 4.0, 3.0, 3.0, 6.9, 6.9));
    }
}
