use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::constants::{GARBAGE_DELAY_TABLE, PHRASES, START_YEAR, WEAPONS_UNLOCK_YEAR};
use crate::registry::EntityRegistry;
use crate::rendering::Canvas;

/// The in-game year. Only the year counter task advances it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldClock {
    year: u32,
}

impl WorldClock {
    pub fn new(year: u32) -> Self {
        WorldClock { year }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn advance(&mut self) {
        self.year += 1;
    }
}

/// Write-once flag; there is no way to clear it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameOverFlag(bool);

impl GameOverFlag {
    pub fn set(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver,
}

/// Year-driven game rules.
#[derive(Clone, Debug)]
pub struct Rules {
    /// `(first year, delay in ticks)`, sorted by year.
    pub garbage_delays: Vec<(u32, u32)>,
    pub weapons_unlock_year: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            garbage_delays: GARBAGE_DELAY_TABLE.to_vec(),
            weapons_unlock_year: WEAPONS_UNLOCK_YEAR,
        }
    }
}

impl Rules {
    /// Ticks between garbage spawns in `year`, or `None` before the first
    /// threshold. Past the last threshold the last delay applies.
    pub fn garbage_delay(&self, year: u32) -> Option<u32> {
        self.garbage_delays
            .iter()
            .take_while(|(threshold, _)| *threshold <= year)
            .last()
            .map(|(_, delay)| *delay)
    }

    pub fn weapons_unlocked(&self, year: u32) -> bool {
        year >= self.weapons_unlock_year
    }
}

/// Historical note shown next to the year, if any year up to `year` has one.
pub fn phrase_for(year: u32) -> Option<&'static str> {
    PHRASES
        .iter()
        .take_while(|(threshold, _)| *threshold <= year)
        .last()
        .map(|(_, phrase)| *phrase)
}

/// Everything tasks share: the canvas, live obstacles, the clock and the
/// game-over flag.
pub struct World<C: Canvas> {
    pub canvas: C,
    pub registry: EntityRegistry,
    pub clock: WorldClock,
    pub game_over: GameOverFlag,
    pub rules: Rules,
    pub rng: StdRng,
}

impl<C: Canvas> World<C> {
    pub fn new(canvas: C, rules: Rules, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        World {
            canvas,
            registry: EntityRegistry::new(),
            clock: WorldClock::new(START_YEAR),
            game_over: GameOverFlag::default(),
            rules,
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        if self.game_over.is_set() { GameState::GameOver } else { GameState::Running }
    }
}
