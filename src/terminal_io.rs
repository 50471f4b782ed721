use std::collections::HashMap;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::error;

use crate::types::Controls;

// --- SimulatedInput for debugging ---
#[derive(Default)]
pub struct SimulatedInput {
    events: HashMap<u64, Vec<Event>>,
}

impl SimulatedInput {
    /// Queues a key press for the given tick.
    pub fn press(mut self, tick: u64, code: KeyCode) -> Self {
        self.events.entry(tick).or_default().push(Event::Key(code.into()));
        self
    }

    pub fn poll(&self, tick: u64) -> bool {
        self.events.contains_key(&tick)
    }

    pub fn read(&mut self, tick: u64) -> Vec<Event> {
        self.events.remove(&tick).unwrap_or_default()
    }
}

pub enum InputSource {
    Keyboard,
    Simulated(SimulatedInput),
}

impl InputSource {
    /// Every event pending right now, without blocking.
    pub fn drain(&mut self, tick: u64) -> io::Result<Vec<Event>> {
        match self {
            InputSource::Keyboard => {
                let mut events = Vec::new();
                while event::poll(Duration::ZERO).map_err(|e| { error!("Failed to poll event: {}", e); e })? {
                    events.push(event::read().map_err(|e| { error!("Failed to read event: {}", e); e })?);
                }
                Ok(events)
            }
            InputSource::Simulated(sim_input) => {
                if sim_input.poll(tick) {
                    Ok(sim_input.read(tick))
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }
}

pub fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent { code: KeyCode::Char('q') | KeyCode::Esc, kind: KeyEventKind::Press | KeyEventKind::Repeat, .. })
    )
}

/// Folds a batch of key events into one set of controls. The last arrow
/// key per axis wins; `q` and Esc set `quit`.
pub fn read_controls(events: &[Event], quit: &mut bool) -> Controls {
    let mut controls = Controls::default();

    for event in events {
        let Event::Key(KeyEvent { code, kind, .. }) = event else {
            continue;
        };
        if *kind == KeyEventKind::Release {
            continue;
        }
        *quit |= is_quit(event);
        match code {
            KeyCode::Up => controls.rows_direction = -1,
            KeyCode::Down => controls.rows_direction = 1,
            KeyCode::Left => controls.columns_direction = -1,
            KeyCode::Right => controls.columns_direction = 1,
            KeyCode::Char(' ') => controls.fire = true,
            _ => {}
        }
    }

    controls
}
