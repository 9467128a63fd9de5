use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Position;

/// Largest accepted board side; the grid is stored and drawn cell by cell
pub const MAX_BOARD_SIZE: usize = 1024;

/// Configuration for the game
///
/// The board is square and its layout is fixed for the lifetime of a
/// process: every `reset` rebuilds the session from these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of cells along each side of the board
    pub board_size: usize,
    /// Static impassable cells
    pub obstacles: Vec<Position>,
    /// Milliseconds between simulation steps
    pub tick_interval_ms: u64,
    /// Milliseconds per elapsed-time unit
    pub clock_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 20,
            obstacles: vec![
                Position::new(7, 7),
                Position::new(12, 12),
                Position::new(7, 12),
                Position::new(12, 7),
            ],
            tick_interval_ms: 120,
            clock_interval_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom board and obstacle layout
    pub fn new(board_size: usize, obstacles: Vec<Position>) -> Self {
        Self {
            board_size,
            obstacles,
            ..Default::default()
        }
    }

    /// The cell the snake starts on after a reset
    pub fn center(&self) -> Position {
        let mid = (self.board_size / 2) as i32;
        Position::new(mid, mid)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse game config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the layout can host a game
    pub fn validate(&self) -> Result<()> {
        if self.board_size == 0 {
            bail!("board_size must be at least 1");
        }
        if self.board_size > MAX_BOARD_SIZE {
            bail!(
                "board_size {} exceeds the maximum of {}",
                self.board_size,
                MAX_BOARD_SIZE
            );
        }
        let cells = self
            .board_size
            .checked_mul(self.board_size)
            .context("board_size is too large")?;
        if self.tick_interval_ms == 0 || self.clock_interval_ms == 0 {
            bail!("tick and clock intervals must be non-zero");
        }

        let size = self.board_size as i32;
        let center = self.center();
        for obstacle in &self.obstacles {
            if obstacle.x < 0 || obstacle.x >= size || obstacle.y < 0 || obstacle.y >= size {
                bail!(
                    "obstacle ({}, {}) lies outside the {}x{} board",
                    obstacle.x,
                    obstacle.y,
                    self.board_size,
                    self.board_size
                );
            }
            if *obstacle == center {
                bail!("obstacle ({}, {}) covers the start cell", obstacle.x, obstacle.y);
            }
        }

        let mut distinct = self.obstacles.clone();
        distinct.sort_by_key(|p| (p.x, p.y));
        distinct.dedup();
        // Snake head plus at least one cell for the first item
        if distinct.len() + 2 > cells {
            bail!("obstacles leave no free cell for the first item");
        }

        Ok(())
    }
}
