//! Grid Snake - a single-player snake game on a fixed board with obstacles
//!
//! This library provides:
//! - Core game logic (game module): reset, direction intents, the step function
//! - TUI rendering (render module)
//! - Keyboard mapping (input module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
