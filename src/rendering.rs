use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossterm::event::Event;
use log::{error, info};

use crate::terminal_io::{InputSource, is_quit, read_controls};
use crate::types::{Controls, Style};

// Key events kept for the next `poll_input`; older ones are dropped.
const MAX_PENDING_EVENTS: usize = 64;

/// The only surface tasks draw on and read the keyboard from.
///
/// Drawing never fails: cells outside the playfield are clipped. Spaces in
/// a frame are transparent, so erasing a frame only blanks the cells it
/// actually painted.
pub trait Canvas {
    /// Playfield size as `(rows, columns)`, border included.
    fn playfield_size(&self) -> (usize, usize);

    fn draw_glyphs(&mut self, row: i32, column: i32, frame: &str, style: Style);

    fn erase_glyphs(&mut self, row: i32, column: i32, frame: &str);

    /// Non-blocking; returns default controls when nothing is pending.
    fn poll_input(&mut self) -> Controls;

    fn play_alert(&mut self);

    fn draw_border(&mut self);

    /// Pushes the current frame to the output. Also reports any I/O error
    /// the infallible calls above ran into since the last frame.
    fn present(&mut self) -> io::Result<()>;

    fn quit_requested(&self) -> bool;
}

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.buffer[y as usize][x as usize] = c;
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer.iter().map(|row| row.iter().collect()).collect()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for line in self.lines() {
            info!("{}", line);
        }
        info!("---------------------");
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub style: Style,
}

impl Cell {
    const BLANK: Cell = Cell { symbol: ' ', style: Style::Normal };
    // Never drawn, so the first present repaints everything.
    const UNKNOWN: Cell = Cell { symbol: '\0', style: Style::Normal };
}

// --- GameGrid holding what the next frame shows ---
#[derive(Clone)]
pub struct GameGrid {
    pub grid: Vec<Vec<Cell>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self::filled(width, height, Cell::BLANK)
    }

    fn filled(width: u16, height: u16, cell: Cell) -> Self {
        GameGrid {
            grid: vec![vec![cell; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && y < self.height as i32 && x < self.width as i32 {
            self.grid[y as usize][x as usize] = cell;
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    /// Paints a frame with its top-left corner at `(row, column)`; `None`
    /// blanks the frame's cells instead.
    pub fn draw_frame(&mut self, row: i32, column: i32, frame: &str, style: Option<Style>) {
        for (dy, line) in frame.lines().enumerate() {
            let y = row + dy as i32;
            if y < 0 {
                continue;
            }
            if y >= self.height as i32 {
                break;
            }
            for (dx, symbol) in line.chars().enumerate() {
                let x = column + dx as i32;
                if symbol == ' ' || x < 0 {
                    continue;
                }
                if x >= self.width as i32 {
                    break;
                }
                let cell = match style {
                    Some(style) => Cell { symbol, style },
                    None => Cell::BLANK,
                };
                self.set_cell(x, y, cell);
            }
        }
    }

    pub fn draw_border(&mut self) {
        let (w, h) = (self.width as i32, self.height as i32);
        if w < 2 || h < 2 {
            return;
        }
        let edge = |symbol| Cell { symbol, style: Style::Normal };
        for x in 1..w - 1 {
            self.set_cell(x, 0, edge('-'));
            self.set_cell(x, h - 1, edge('-'));
        }
        for y in 1..h - 1 {
            self.set_cell(0, y, edge('|'));
            self.set_cell(w - 1, y, edge('|'));
        }
        for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
            self.set_cell(x, y, edge('+'));
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.grid.iter().map(|row| row.iter().map(|cell| cell.symbol).collect()).collect()
    }
}

fn attribute(style: Style) -> Attribute {
    match style {
        Style::Normal => Attribute::Reset,
        Style::Dim => Attribute::Dim,
        Style::Bold => Attribute::Bold,
    }
}

/// `Canvas` over a cell grid, presented either to the real terminal or to
/// an in-memory screen buffer with scripted input.
pub struct FrameCanvas {
    grid: GameGrid,
    shown: GameGrid,
    target: OutputTarget,
    input: InputSource,
    pending_events: Vec<Event>,
    tick: u64,
    alert_pending: bool,
    quit: bool,
    deferred_error: Option<io::Error>,
}

impl FrameCanvas {
    pub fn new(width: u16, height: u16, target: OutputTarget, input: InputSource) -> Self {
        FrameCanvas {
            grid: GameGrid::new(width, height),
            shown: GameGrid::filled(width, height, Cell::UNKNOWN),
            target,
            input,
            pending_events: Vec::new(),
            tick: 0,
            alert_pending: false,
            quit: false,
            deferred_error: None,
        }
    }

    /// Canvas on the real terminal, sized to it.
    pub fn terminal() -> io::Result<Self> {
        let (width, height) = terminal::size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
        info!("Terminal size: {}x{}", width, height);
        Ok(Self::new(width, height, OutputTarget::Stdout(io::stdout()), InputSource::Keyboard))
    }

    /// Canvas that renders into a screen buffer and replays scripted input.
    pub fn headless(width: u16, height: u16, input: InputSource) -> Self {
        Self::new(width, height, OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)), input)
    }

    pub fn enter(&mut self) -> io::Result<()> {
        if let OutputTarget::Stdout(s) = &mut self.target {
            terminal::enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;
            execute!(s, EnterAlternateScreen, Hide, Clear(ClearType::All))
                .map_err(|e| { error!("Failed to prepare terminal: {}", e); e })?;
            info!("Raw mode enabled.");
        }
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if let OutputTarget::Stdout(s) = &mut self.target {
            execute!(s, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)?;
            terminal::disable_raw_mode()?;
            info!("Terminal restored.");
        }
        Ok(())
    }

    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    /// Frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.tick
    }

    fn render_stdout(grid: &GameGrid, shown: &mut GameGrid, s: &mut io::Stdout, alert: bool) -> io::Result<()> {
        let mut current_style = None;
        for y in 0..grid.height {
            for x in 0..grid.width {
                let cell = grid.grid[y as usize][x as usize];
                if shown.grid[y as usize][x as usize] == cell {
                    continue;
                }
                if current_style != Some(cell.style) {
                    queue!(s, SetAttribute(Attribute::Reset), SetAttribute(attribute(cell.style)))?;
                    current_style = Some(cell.style);
                }
                queue!(s, MoveTo(x, y), Print(cell.symbol))?;
                shown.grid[y as usize][x as usize] = cell;
            }
        }
        if alert {
            queue!(s, Print('\x07'))?;
        }
        s.flush()
    }
}

impl Canvas for FrameCanvas {
    fn playfield_size(&self) -> (usize, usize) {
        (self.grid.height as usize, self.grid.width as usize)
    }

    fn draw_glyphs(&mut self, row: i32, column: i32, frame: &str, style: Style) {
        self.grid.draw_frame(row, column, frame, Some(style));
    }

    fn erase_glyphs(&mut self, row: i32, column: i32, frame: &str) {
        self.grid.draw_frame(row, column, frame, None);
    }

    fn poll_input(&mut self) -> Controls {
        let mut events = std::mem::take(&mut self.pending_events);
        match self.input.drain(self.tick) {
            Ok(fresh) => events.extend(fresh),
            Err(e) => {
                self.deferred_error.get_or_insert(e);
            }
        }
        read_controls(&events, &mut self.quit)
    }

    fn play_alert(&mut self) {
        self.alert_pending = true;
    }

    fn draw_border(&mut self) {
        self.grid.draw_border();
    }

    fn present(&mut self) -> io::Result<()> {
        if let Some(e) = self.deferred_error.take() {
            return Err(e);
        }

        // Read the keyboard every frame so quitting works with no ship left
        // to poll it.
        let events = self.input.drain(self.tick)?;
        self.quit |= events.iter().any(is_quit);
        self.pending_events.extend(events);
        if self.pending_events.len() > MAX_PENDING_EVENTS {
            let excess = self.pending_events.len() - MAX_PENDING_EVENTS;
            self.pending_events.drain(..excess);
        }
        let alert = std::mem::take(&mut self.alert_pending);
        match &mut self.target {
            OutputTarget::Stdout(s) => Self::render_stdout(&self.grid, &mut self.shown, s, alert)
                .map_err(|e| { error!("Failed to render frame: {}", e); e })?,
            OutputTarget::ScreenBuffer(sb) => {
                for (y, row) in self.grid.grid.iter().enumerate() {
                    for (x, cell) in row.iter().enumerate() {
                        sb.set_char(x as u16, y as u16, cell.symbol);
                    }
                }
                if alert {
                    info!("*beep*");
                }
                sb.print_to_log();
            }
        }
        self.tick += 1;
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_io::SimulatedInput;
    use crossterm::event::KeyCode;

    fn canvas(width: u16, height: u16) -> FrameCanvas {
        FrameCanvas::headless(width, height, InputSource::Simulated(SimulatedInput::default()))
    }

    #[test]
    fn spaces_are_transparent() {
        let mut grid = GameGrid::new(5, 2);
        grid.draw_frame(0, 0, "xxxxx", Some(Style::Normal));
        grid.draw_frame(0, 0, "a b", Some(Style::Bold));
        assert_eq!(grid.lines()[0], "axbxx");
        assert_eq!(grid.get(0, 0).unwrap().style, Style::Bold);
    }

    #[test]
    fn erase_only_blanks_painted_cells() {
        let mut grid = GameGrid::new(5, 1);
        grid.draw_frame(0, 0, "xxxxx", Some(Style::Normal));
        grid.draw_frame(0, 0, "a b", None);
        assert_eq!(grid.lines()[0], " x xx");
    }

    #[test]
    fn out_of_bounds_is_clipped() {
        let mut grid = GameGrid::new(3, 2);
        grid.draw_frame(-1, -1, "abcd\nefgh\nijkl", Some(Style::Normal));
        assert_eq!(grid.lines(), vec!["fgh", "jkl"]);
        grid.draw_frame(5, 5, "zz", Some(Style::Normal));
        grid.draw_frame(1, 2, "zz", Some(Style::Normal));
        assert_eq!(grid.lines(), vec!["fgh", "jkz"]);
    }

    #[test]
    fn border_frames_the_playfield() {
        let mut grid = GameGrid::new(4, 3);
        grid.draw_border();
        assert_eq!(grid.lines(), vec!["+--+", "|  |", "+--+"]);
    }

    #[test]
    fn headless_canvas_reads_scripted_input_per_frame() {
        let input = SimulatedInput::default().press(1, KeyCode::Left).press(1, KeyCode::Char(' '));
        let mut canvas = FrameCanvas::headless(10, 5, InputSource::Simulated(input));
        assert_eq!(canvas.poll_input(), Controls::default());
        canvas.present().unwrap();
        assert_eq!(canvas.poll_input(), Controls { rows_direction: 0, columns_direction: -1, fire: true });
        assert_eq!(canvas.poll_input(), Controls::default());
    }

    #[test]
    fn present_latches_quit_and_keeps_controls_for_next_poll() {
        let input = SimulatedInput::default().press(0, KeyCode::Up).press(0, KeyCode::Char('q'));
        let mut canvas = FrameCanvas::headless(10, 5, InputSource::Simulated(input));
        canvas.present().unwrap();
        assert!(canvas.quit_requested());
        assert_eq!(canvas.poll_input().rows_direction, -1);
        assert_eq!(canvas.poll_input(), Controls::default());
    }

    #[test]
    fn playfield_size_is_rows_then_columns() {
        assert_eq!(canvas(80, 24).playfield_size(), (24, 80));
    }
}
