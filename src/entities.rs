use std::rc::Rc;

use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::*;
use crate::error::Result;
use crate::frames::Frame;
use crate::geometry::{frame_size, limit};
use crate::physics::update_speed;
use crate::registry::ObstacleGuard;
use crate::rendering::Canvas;
use crate::scenery::GameOverBanner;
use crate::scheduler::{Step, Task, TaskContext};
use crate::types::{Style, Vector2D};
use crate::world::World;

/// Corner position that centers a frame on `(center_row, center_column)`.
fn centered(frame: &str, center_row: f64, center_column: f64) -> (i32, i32) {
    let (rows, columns) = frame_size(frame);
    (
        (center_row - rows as f64 / 2.0).round() as i32,
        (center_column - columns as f64 / 2.0).round() as i32,
    )
}

// --- Spaceship ---
pub struct Spaceship {
    frames: Vec<Frame>,
    explosion: Rc<[Frame]>,
    game_over: Frame,
    position: Vector2D,
    velocity: Vector2D,
    rows_size: usize,
    columns_size: usize,
    steps: usize,
    drawn: Option<(i32, i32, Frame)>,
}

impl Spaceship {
    pub fn new(row: f64, column: f64, frames: Vec<Frame>, explosion: Rc<[Frame]>, game_over: Frame) -> Self {
        let (rows_size, columns_size) = frames
            .iter()
            .map(|frame| frame_size(frame))
            .fold((0, 0), |(r, c), (fr, fc)| (r.max(fr), c.max(fc)));
        Spaceship {
            frames,
            explosion,
            game_over,
            position: Vector2D::new(row, column),
            velocity: Vector2D::default(),
            rows_size,
            columns_size,
            steps: 0,
            drawn: None,
        }
    }

    fn steer<C: Canvas>(&mut self, cx: &mut TaskContext<'_, World<C>>) {
        let world = &mut *cx.world;
        let controls = world.canvas.poll_input();

        let (row_speed, column_speed) = update_speed(
            self.velocity.row,
            self.velocity.column,
            controls.rows_direction,
            controls.columns_direction,
        );
        self.velocity = Vector2D::new(row_speed, column_speed);

        let (rows, columns) = world.canvas.playfield_size();
        let next = self.position.add(self.velocity);
        self.position = Vector2D::new(
            limit(next.row, 1.0, rows as f64 - self.rows_size as f64 - 1.0),
            limit(next.column, 1.0, columns as f64 - self.columns_size as f64 - 1.0),
        );

        if controls.fire && world.rules.weapons_unlocked(world.clock.year()) {
            let gun = (self.position.row, self.position.column + SHIP_GUN_OFFSET_COLUMNS);
            debug!("Shot fired from row {:.1}, column {:.1}", gun.0, gun.1);
            cx.spawn(Fire::new(gun.0, gun.1, FIRE_ROWS_SPEED, FIRE_COLUMNS_SPEED));
        }
    }
}

impl<C: Canvas> Task<World<C>> for Spaceship {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        if let Some((row, column, frame)) = self.drawn.take() {
            cx.world.canvas.erase_glyphs(row, column, &frame);
        }
        if self.frames.is_empty() {
            return Ok(Step::Done);
        }

        if self.steps % SHIP_TICKS_PER_FRAME == 0 {
            self.steer(cx);
        }
        let frame = self.frames[(self.steps / SHIP_TICKS_PER_FRAME) % self.frames.len()].clone();
        self.steps += 1;

        if let Some(hit) = cx.world.registry.first_hit_at(self.position.row, self.position.column) {
            info!("Ship hit obstacle {} in {}. Game over.", hit, cx.world.clock.year());
            cx.world.game_over.set();
            let center_row = self.position.row + self.rows_size as f64 / 2.0;
            let center_column = self.position.column + self.columns_size as f64 / 2.0;
            cx.spawn(Explosion::new(center_row, center_column, self.explosion.clone()));
            cx.spawn(GameOverBanner::new(self.game_over.clone()));
            return Ok(Step::Done);
        }

        let (row, column) = self.position.rounded();
        cx.world.canvas.draw_glyphs(row, column, &frame, Style::Normal);
        self.drawn = Some((row, column, frame));
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "spaceship"
    }
}

// --- Fire ---
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FireState {
    Launch,
    Flash,
    Flying,
}

/// A shot travelling in a straight line until it leaves the playfield or
/// hits garbage.
pub struct Fire {
    position: Vector2D,
    speed: Vector2D,
    state: FireState,
    drawn: Option<(i32, i32)>,
}

impl Fire {
    pub fn new(row: f64, column: f64, rows_speed: f64, columns_speed: f64) -> Self {
        Fire {
            position: Vector2D::new(row, column),
            speed: Vector2D::new(rows_speed, columns_speed),
            state: FireState::Launch,
            drawn: None,
        }
    }

    fn symbol(&self) -> &'static str {
        if self.speed.column != 0.0 { "-" } else { "|" }
    }

    fn in_bounds(&self, rows: usize, columns: usize) -> bool {
        let (max_row, max_column) = (rows as f64 - 1.0, columns as f64 - 1.0);
        0.0 < self.position.row
            && self.position.row < max_row
            && 0.0 < self.position.column
            && self.position.column < max_column
    }
}

impl<C: Canvas> Task<World<C>> for Fire {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        let world = &mut *cx.world;
        let (row, column) = self.position.rounded();

        match self.state {
            FireState::Launch => {
                world.canvas.draw_glyphs(row, column, "*", Style::Normal);
                self.state = FireState::Flash;
                return Ok(Step::Pending);
            }
            FireState::Flash => {
                world.canvas.draw_glyphs(row, column, "O", Style::Normal);
                self.drawn = Some((row, column));
                self.state = FireState::Flying;
                world.canvas.play_alert();
                return Ok(Step::Pending);
            }
            FireState::Flying => {}
        }

        if let Some((row, column)) = self.drawn.take() {
            world.canvas.erase_glyphs(row, column, "O");
            self.position = self.position.add(self.speed);
        }

        let (rows, columns) = world.canvas.playfield_size();
        if !self.in_bounds(rows, columns) {
            return Ok(Step::Done);
        }

        let hits = world.registry.hits_at(self.position.row, self.position.column);
        if !hits.is_empty() {
            for id in hits {
                debug!("Shot hit obstacle {}", id);
                world.registry.mark_collided(id)?;
            }
            return Ok(Step::Done);
        }

        let (row, column) = self.position.rounded();
        world.canvas.draw_glyphs(row, column, self.symbol(), Style::Normal);
        self.drawn = Some((row, column));
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "fire"
    }
}

// --- Garbage ---
/// One piece of garbage falling from the top edge. Registers its obstacle
/// on its first step and owns it for as long as the task lives.
pub struct FlyGarbage {
    frame: Frame,
    explosion: Rc<[Frame]>,
    column: f64,
    row: f64,
    speed: f64,
    obstacle: Option<ObstacleGuard>,
    drawn: Option<i32>,
}

impl FlyGarbage {
    pub fn new(column: f64, frame: Frame, speed: f64, explosion: Rc<[Frame]>) -> Self {
        FlyGarbage { frame, explosion, column, row: 0.0, speed, obstacle: None, drawn: None }
    }
}

impl<C: Canvas> Task<World<C>> for FlyGarbage {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        let column = self.column.round() as i32;
        let registry = &cx.world.registry;
        let obstacle = self.obstacle.get_or_insert_with(|| {
            let (rows_size, columns_size) = frame_size(&self.frame);
            registry.add_obstacle(self.row, self.column, rows_size, columns_size)
        });

        if let Some(row) = self.drawn.take() {
            cx.world.canvas.erase_glyphs(row, column, &self.frame);
            self.row += self.speed;
            obstacle.set_row(self.row)?;
        }

        let (rows, _) = cx.world.canvas.playfield_size();
        if self.row >= rows as f64 {
            return Ok(Step::Done);
        }

        if cx.world.registry.take_collided(obstacle.id()) {
            let (rows_size, columns_size) = frame_size(&self.frame);
            let center_row = self.row + rows_size as f64 / 2.0;
            let center_column = self.column + columns_size as f64 / 2.0;
            debug!("Obstacle {} destroyed", obstacle.id());
            cx.spawn(Explosion::new(center_row, center_column, self.explosion.clone()));
            return Ok(Step::Done);
        }

        let row = self.row.round() as i32;
        cx.world.canvas.draw_glyphs(row, column, &self.frame, Style::Normal);
        self.drawn = Some(row);
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "fly_garbage"
    }
}

/// Drops new garbage at a rate set by the current year.
pub struct GarbageSpawner {
    frames: Vec<Frame>,
    explosion: Rc<[Frame]>,
    wait: u32,
}

impl GarbageSpawner {
    pub fn new(frames: Vec<Frame>, explosion: Rc<[Frame]>) -> Self {
        GarbageSpawner { frames, explosion, wait: 0 }
    }
}

impl<C: Canvas> Task<World<C>> for GarbageSpawner {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        if self.wait > 0 {
            self.wait -= 1;
            return Ok(Step::Pending);
        }

        let world = &mut *cx.world;
        let Some(delay) = world.rules.garbage_delay(world.clock.year()) else {
            return Ok(Step::Pending);
        };
        let Some(frame) = self.frames.choose(&mut world.rng).cloned() else {
            return Ok(Step::Pending);
        };

        let (_, columns) = world.canvas.playfield_size();
        let max_column = columns.saturating_sub(1).max(2);
        let column = world.rng.gen_range(1..max_column) as f64;
        let column = limit(column, 0.0, columns.saturating_sub(1) as f64);

        cx.spawn(FlyGarbage::new(column, frame, GARBAGE_SPEED, self.explosion.clone()));
        self.wait = delay.saturating_sub(1);
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "garbage_spawner"
    }
}

// --- Explosion ---
pub struct Explosion {
    frames: Rc<[Frame]>,
    center_row: f64,
    center_column: f64,
    next_frame: usize,
    drawn: Option<(i32, i32, usize)>,
}

impl Explosion {
    pub fn new(center_row: f64, center_column: f64, frames: Rc<[Frame]>) -> Self {
        Explosion { frames, center_row, center_column, next_frame: 0, drawn: None }
    }
}

impl<C: Canvas> Task<World<C>> for Explosion {
    fn step(&mut self, cx: &mut TaskContext<'_, World<C>>) -> Result<Step> {
        if let Some((row, column, index)) = self.drawn.take() {
            cx.world.canvas.erase_glyphs(row, column, &self.frames[index]);
        }
        if self.next_frame == 0 {
            cx.world.canvas.play_alert();
        }

        let Some(frame) = self.frames.get(self.next_frame) else {
            return Ok(Step::Done);
        };
        let (row, column) = centered(frame, self.center_row, self.center_column);
        cx.world.canvas.draw_glyphs(row, column, frame, Style::Normal);
        self.drawn = Some((row, column, self.next_frame));
        self.next_frame += 1;
        Ok(Step::Pending)
    }

    fn name(&self) -> &'static str {
        "explosion"
    }
}
