use std::env;

use crossterm::event::KeyCode;
use log::{error, info};

use space_garbage::config::Config;
use space_garbage::frames::{FrameSet, FrameStore};
use space_garbage::game::Game;
use space_garbage::rendering::FrameCanvas;
use space_garbage::terminal_io::{InputSource, SimulatedInput};
use space_garbage::{GameError, Result};

fn simulated_input() -> SimulatedInput {
    SimulatedInput::default()
        .press(1, KeyCode::Up)
        .press(3, KeyCode::Left)
        .press(5, KeyCode::Left)
        .press(7, KeyCode::Char(' '))
        .press(9, KeyCode::Down)
        .press(11, KeyCode::Right)
        .press(60, KeyCode::Char('q'))
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_args(&args).inspect_err(|e| eprintln!("{}", e))?;

    simple_logging::log_to_file(&config.log_file, config.log_level)?;
    info!("Starting space-garbage with {:?}", config);

    // Missing assets abort before the terminal is touched.
    let frames = FrameSet::load(&FrameStore::from_dir(&config.frames_dir))
        .inspect_err(|e| error!("Failed to load frames: {}", e))?;

    let canvas = if config.debug {
        info!("Debug resolution set to {}x{}", config.debug_width, config.debug_height);
        FrameCanvas::headless(config.debug_width, config.debug_height, InputSource::Simulated(simulated_input()))
    } else {
        FrameCanvas::terminal()?
    };

    let mut game = Game::new(canvas, &config).inspect_err(|e| eprintln!("{}", e))?;
    game.seed(frames, config.stars, config.show_obstacles);

    let outcome = game
        .world_mut()
        .canvas
        .enter()
        .map_err(GameError::from)
        .and_then(|_| game.run());

    // Always try to restore terminal state.
    if let Err(e) = game.world_mut().canvas.exit() {
        error!("Failed to restore terminal: {}", e);
    }

    let outcome = outcome.inspect_err(|e| error!("Game aborted: {}", e))?;
    info!(
        "Finished ({:?}) in {} with {:?} after {} ticks",
        outcome,
        game.world().clock.year(),
        game.state(),
        game.scheduler().tick()
    );
    Ok(())
}
