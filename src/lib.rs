//! Terminal space-garbage game driven by a cooperative tick scheduler.
//!
//! Every moving thing on screen is a [`scheduler::Task`] stepped once per
//! tick. Tasks share a [`world::World`] holding the canvas, the obstacle
//! registry, the year and the game-over flag.

pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod frames;
pub mod game;
pub mod geometry;
pub mod obstacles;
pub mod physics;
pub mod registry;
pub mod rendering;
pub mod scenery;
pub mod scheduler;
pub mod terminal_io;
pub mod types;
pub mod world;

pub use error::{GameError, Result};
