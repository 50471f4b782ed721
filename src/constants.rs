// --- Timing ---
pub const TIC_TIMEOUT_MS: u64 = 100; // Wall-clock length of one tick
pub const TICKS_PER_YEAR: u32 = 15; // 1.5 seconds per year

// --- Sky ---
pub const STARS_COUNT: usize = 100;
pub const STAR_SYMBOLS: [char; 5] = ['+', '*', '.', ':', '-'];
pub const STAR_MAX_OFFSET_TICKS: u32 = 10;
pub const BLINK_DIM_TICKS: u32 = 20;
pub const BLINK_NORMAL_TICKS: u32 = 3;
pub const BLINK_BOLD_TICKS: u32 = 5;

// --- Ship ---
pub const SHIP_SPEED_LIMIT: f64 = 2.0;
pub const SHIP_SPEED_FADING: f64 = 0.8;
pub const SHIP_STOP_THRESHOLD: f64 = 0.1;
pub const SHIP_TICKS_PER_FRAME: usize = 2; // Input is sampled once per frame change
pub const SHIP_GUN_OFFSET_COLUMNS: f64 = 2.0;

// --- Shots ---
pub const FIRE_ROWS_SPEED: f64 = -0.3;
pub const FIRE_COLUMNS_SPEED: f64 = 0.0;

// --- Garbage ---
pub const GARBAGE_SPEED: f64 = 0.5; // Rows per tick

// --- Years ---
pub const START_YEAR: u32 = 1957;
pub const WEAPONS_UNLOCK_YEAR: u32 = 2020;

/// Garbage spawn delay in ticks, keyed by the first year it applies to.
pub const GARBAGE_DELAY_TABLE: [(u32, u32); 6] = [
    (1961, 20),
    (1969, 14),
    (1981, 10),
    (1995, 8),
    (2010, 6),
    (2020, 2),
];

pub const PHRASES: [(u32, &str); 8] = [
    (1957, "First Sputnik"),
    (1961, "Gagarin flew!"),
    (1969, "Armstrong got on the moon!"),
    (1971, "First orbital space station Salute-1"),
    (1981, "Flight of the Shuttle Columbia"),
    (1998, "ISS start building"),
    (2011, "Messenger launch to Mercury"),
    (2020, "Take the plasma gun! Shoot the garbage!"),
];

// --- Playfield ---
pub const MIN_TERMINAL_COLUMNS: u16 = 30;
pub const MIN_TERMINAL_ROWS: u16 = 12;
pub const HUD_ROW_OFFSET: usize = 2; // HUD line sits this many rows above the bottom edge

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_symbols_include_dash() {
        assert_eq!(STAR_SYMBOLS.iter().collect::<String>(), "+*.:-");
    }
}
