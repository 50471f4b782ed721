use log::info;

use crate::constants::{BLINK_BOLD_TICKS, BLINK_DIM_TICKS, BLINK_NORMAL_TICKS, HUD_ROW_OFFSET, TICKS_PER_YEAR};
use crate::error::Result;
use crate::frames::Frame;
use crate::geometry::frame_size;
use crate::rendering::Canvas;
use crate::scheduler::{Step, Task, TaskContext};
use crate::types::Style;
use crate::world::{World, phrase_for};

const BLINK_PHASES: [(Style, u32); 4] = [
    (Style::Dim, BLINK_DIM_TICKS),
    (Style::Normal, BLINK_NORMAL_TICKS),
    (Style::Bold, BLINK_BOLD_TICKS),
    (Style::Normal, BLINK_NORMAL_TICKS),
];

/// A star cycling dim, normal, bold, normal forever.
pub struct Blink {
    row: i32,
    column: i32,
    symbol: String,
    wait: u32,
    phase: usize,
}

impl Blink {
    pub fn new(row: i32, column: i32, symbol: char, offset_ticks: u32) -> Self {
        Blink { row, column, symbol: symbol.to_string(), wait: offset_ticks, phase: 0 }
    }
}

impl<C: Canvas> Task<World<C>> for Blink {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        if self.wait > 0 {
            self.wait -= 1;
            return Ok(Step::Pending);
        }
        let (style, ticks) = BLINK_PHASES[self.phase];
        cx.world.canvas.draw_glyphs(self.row, self.column, &self.symbol, style);
        self.wait = ticks.saturating_sub(1);
        self.phase = (self.phase + 1) % BLINK_PHASES.len();
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "blink"
    }
}

/// Advances the world clock one year every `TICKS_PER_YEAR` ticks until
/// the game is over.
pub struct YearCounter {
    elapsed: u32,
}

impl YearCounter {
    pub fn new() -> Self {
        YearCounter { elapsed: 0 }
    }
}

impl Default for YearCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Canvas> Task<World<C>> for YearCounter {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        if cx.world.game_over.is_set() {
            return Ok(Step::Pending);
        }
        self.elapsed += 1;
        if self.elapsed >= TICKS_PER_YEAR {
            self.elapsed = 0;
            cx.world.clock.advance();
            let year = cx.world.clock.year();
            if year == cx.world.rules.weapons_unlock_year {
                info!("Weapons unlocked in {}", year);
            }
        }
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "year_counter"
    }
}

/// Bottom line showing the year and what happened in space around then.
#[derive(Default)]
pub struct Hud {
    shown: Option<(i32, String)>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text_for(year: u32) -> String {
        match phrase_for(year) {
            Some(phrase) => format!("Year {}  {}", year, phrase),
            None => format!("Year {}", year),
        }
    }
}

impl<C: Canvas> Task<World<C>> for Hud {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        let (rows, _) = cx.world.canvas.playfield_size();
        let row = rows.saturating_sub(HUD_ROW_OFFSET) as i32;
        let text = Self::text_for(cx.world.clock.year());

        if let Some((shown_row, shown)) = &self.shown {
            if *shown_row == row && *shown == text {
                return Ok(Step::Pending);
            }
            cx.world.canvas.erase_glyphs(*shown_row, 2, shown);
        }
        cx.world.canvas.draw_glyphs(row, 2, &text, Style::Bold);
        self.shown = Some((row, text));
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "hud"
    }
}

/// "Game Over" centered on the playfield, redrawn every tick.
pub struct GameOverBanner {
    frame: Frame,
}

impl GameOverBanner {
    pub fn new(frame: Frame) -> Self {
        GameOverBanner { frame }
    }
}

impl<C: Canvas> Task<World<C>> for GameOverBanner {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        let (rows, columns) = cx.world.canvas.playfield_size();
        let (frame_rows, frame_columns) = frame_size(&self.frame);
        let row = (rows as i32 - frame_rows as i32) / 2;
        let column = (columns as i32 - frame_columns as i32) / 2;
        cx.world.canvas.draw_glyphs(row, column, &self.frame, Style::Bold);
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "game_over"
    }
}

/// Debug overlay outlining every live obstacle.
#[derive(Default)]
pub struct ObstacleOutlines {
    drawn: Vec<(i32, i32, String)>,
}

impl ObstacleOutlines {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Canvas> Task<World<C>> for ObstacleOutlines {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        for (row, column, frame) in self.drawn.drain(..) {
            cx.world.canvas.erase_glyphs(row, column, &frame);
        }

        let mut outlines = Vec::new();
        cx.world.registry.for_each_obstacle(|obstacle| {
            let (row, column) = obstacle.bounding_box_corner();
            outlines.push((row.round() as i32, column.round() as i32, obstacle.bounding_box_frame()));
        });

        for (row, column, frame) in &outlines {
            cx.world.canvas.draw_glyphs(*row, *column, frame, Style::Dim);
        }
        self.drawn = outlines;
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "obstacle_outlines"
    }
}
