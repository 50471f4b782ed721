use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::Rng;

use crate::config::Config;
use crate::constants::{MIN_TERMINAL_COLUMNS, MIN_TERMINAL_ROWS, STAR_MAX_OFFSET_TICKS, STAR_SYMBOLS};
use crate::entities::{GarbageSpawner, Spaceship};
use crate::error::{GameError, Result};
use crate::frames::{Frame, FrameSet};
use crate::rendering::Canvas;
use crate::scenery::{Blink, Hud, ObstacleOutlines, YearCounter};
use crate::scheduler::{Scheduler, TickStatus};
use crate::world::{GameState, Rules, World};

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    TickLimit,
    NoTasks,
}

pub struct Game<C: Canvas> {
    scheduler: Scheduler<World<C>>,
    world: World<C>,
    tick_duration: Duration,
    max_ticks: Option<u64>,
    state: GameState,
}

impl<C: Canvas> Game<C> {
    /// A game with no tasks yet; see `seed`.
    pub fn new(canvas: C, config: &Config) -> Result<Self> {
        let (rows, columns) = canvas.playfield_size();
        if rows < MIN_TERMINAL_ROWS as usize || columns < MIN_TERMINAL_COLUMNS as usize {
            return Err(GameError::TerminalTooSmall {
                columns: columns as u16,
                rows: rows as u16,
                min_columns: MIN_TERMINAL_COLUMNS,
                min_rows: MIN_TERMINAL_ROWS,
            });
        }

        Ok(Game {
            scheduler: Scheduler::new(),
            world: World::new(canvas, Rules::default(), config.seed),
            tick_duration: Duration::from_millis(config.tick_ms),
            max_ticks: config.max_ticks,
            state: GameState::Running,
        })
    }

    /// Registers the starting tasks: stars, garbage spawner, ship, year
    /// counter and HUD.
    pub fn seed(&mut self, frames: FrameSet, stars: usize, show_obstacles: bool) {
        let (rows, columns) = self.world.canvas.playfield_size();

        for _ in 0..stars {
            let row = self.world.rng.gen_range(1..=rows - 2) as i32;
            let column = self.world.rng.gen_range(1..=columns - 2) as i32;
            let symbol = STAR_SYMBOLS[self.world.rng.gen_range(0..STAR_SYMBOLS.len())];
            let offset = self.world.rng.gen_range(1..=STAR_MAX_OFFSET_TICKS);
            self.scheduler.register(Blink::new(row, column, symbol, offset));
        }

        let explosion: Rc<[Frame]> = frames.explosion.into();
        self.scheduler.register(GarbageSpawner::new(frames.garbage, explosion.clone()));
        self.scheduler.register(Spaceship::new(
            (rows / 2) as f64,
            (columns / 2) as f64,
            frames.rocket,
            explosion,
            frames.game_over,
        ));
        self.scheduler.register(YearCounter::new());
        self.scheduler.register(Hud::new());
        if show_obstacles {
            self.scheduler.register(ObstacleOutlines::new());
        }

        info!("Seeded {} tasks", self.scheduler.len());
    }

    /// Runs one tick and presents the resulting frame.
    pub fn step(&mut self) -> Result<TickStatus> {
        let status = self.scheduler.run_tick(&mut self.world)?;

        let state = self.world.state();
        if state != self.state {
            info!("Game over in {} after {} ticks", self.world.clock.year(), self.scheduler.tick());
            self.state = state;
        }

        self.world.canvas.draw_border();
        self.world.canvas.present()?;
        Ok(status)
    }

    /// Ticks at a fixed pace until the player quits, the tick limit is hit
    /// or no tasks remain.
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            if self.world.canvas.quit_requested() {
                info!("Quit requested.");
                return Ok(Outcome::Quit);
            }
            if self.max_ticks.is_some_and(|max| self.scheduler.tick() >= max) {
                info!("Tick limit reached.");
                return Ok(Outcome::TickLimit);
            }

            let started = Instant::now();
            if self.step()? == TickStatus::Idle {
                warn!("No tasks left to run.");
                return Ok(Outcome::NoTasks);
            }

            if let Some(remaining) = self.tick_duration.checked_sub(started.elapsed()) {
                thread::sleep(remaining);
            }
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn world(&self) -> &World<C> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<C> {
        &mut self.world
    }

    pub fn scheduler(&self) -> &Scheduler<World<C>> {
        &self.scheduler
    }
}
