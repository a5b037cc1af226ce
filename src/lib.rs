//! Space Invaders on a character-cell grid.
//!
//! - `entities`: pure game data (player, bullet, formation, session)
//! - `compute`: pure engine functions, session in → session out
//! - `frame`: per-tick driver and the start/play/win/lose state machine
//! - `render` / `input`: adapter traits the frame controller talks to
//! - `display`: crossterm implementation of the render adapter

pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod render;

pub use config::{ConfigError, GameConfig, Preset};
pub use frame::{FrameController, Phase};
