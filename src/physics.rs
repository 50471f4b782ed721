use crate::constants::{SHIP_SPEED_FADING, SHIP_SPEED_LIMIT, SHIP_STOP_THRESHOLD};
use crate::geometry::limit;

fn apply_acceleration(speed: f64, speed_limit: f64, forward: bool) -> f64 {
    let speed_limit = speed_limit.abs();
    let speed_fraction = speed / speed_limit;

    // Standing still gives a sharp kick, already flying fast adds little.
    let delta = speed_fraction.cos() * 0.75;
    let result_speed = if forward { speed + delta } else { speed - delta };
    let result_speed = limit(result_speed, -speed_limit, speed_limit);

    if result_speed.abs() < SHIP_STOP_THRESHOLD {
        0.0
    } else {
        result_speed
    }
}

/// Next ship velocity given the current one and the thrust direction on
/// each axis (`-1`, `0` or `1`; any other value is reduced to its sign).
///
/// Velocity fades every call so the ship coasts to a stop without input.
pub fn update_speed(row_speed: f64, column_speed: f64, rows_direction: i8, columns_direction: i8) -> (f64, f64) {
    let mut row_speed = row_speed * SHIP_SPEED_FADING;
    let mut column_speed = column_speed * SHIP_SPEED_FADING;

    if rows_direction != 0 {
        row_speed = apply_acceleration(row_speed, SHIP_SPEED_LIMIT, rows_direction.signum() > 0);
    }
    if columns_direction != 0 {
        column_speed = apply_acceleration(column_speed, SHIP_SPEED_LIMIT, columns_direction.signum() > 0);
    }

    (row_speed, column_speed)
}
