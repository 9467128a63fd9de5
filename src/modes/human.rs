use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive terminal game.
///
/// This task is the single owner of the engine and its state: input, the
/// step ticker and the clock ticker all run on the same `select!` loop, so
/// `set_direction` and `step` never race.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    restart_timers: bool,
}

impl HumanMode {
    pub fn new(mut engine: GameEngine) -> Self {
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            restart_timers: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        if let Err(err) = &result {
            log::error!("Game loop failed: {:#}", err);
        }
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let config = self.engine.config();
        let mut step_timer = interval(Duration::from_millis(config.tick_interval_ms));
        let mut clock_timer = interval(Duration::from_millis(config.clock_interval_ms));
        step_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        clock_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval fires immediately
        step_timer.reset();
        clock_timer.reset();

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = step_timer.tick() => {
                    if self.timers_running() {
                        self.update_game();
                    }
                }

                // Elapsed time, one unit per tick
                _ = clock_timer.tick() => {
                    if self.timers_running() {
                        self.state.tick_clock();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, self.paused);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.restart_timers {
                step_timer.reset();
                clock_timer.reset();
                self.restart_timers = false;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Both tickers count as stopped while paused or after game over
    fn timers_running(&self) -> bool {
        self.state.is_alive && !self.paused
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    if self.timers_running() {
                        self.state.set_direction(direction);
                    }
                }
                KeyAction::Restart => self.reset_game(),
                KeyAction::Pause => self.toggle_pause(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        let result = self.engine.step(&mut self.state);

        // Only the colliding step carries a collision type
        if result.info.collision_type.is_some() {
            self.metrics
                .on_game_over(result.score, result.elapsed_seconds);
        }
    }

    fn toggle_pause(&mut self) {
        if !self.state.is_alive {
            return;
        }
        self.paused = !self.paused;
        if !self.paused {
            self.restart_timers = true;
        }
        log::debug!("Paused: {}", self.paused);
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.paused = false;
        self.restart_timers = true;
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, Position, Snake};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn mode() -> HumanMode {
        HumanMode::new(GameEngine::with_seed(GameConfig::default(), 9))
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.state.is_alive);
        assert_eq!(mode.state.score, 0);
        assert!(!mode.paused);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.score = 10;
        mode.state.elapsed_seconds = 40;
        mode.state.is_alive = false;
        mode.handle_event(key(KeyCode::Char('r')));
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.elapsed_seconds, 0);
        assert!(mode.state.is_alive);
        assert!(mode.restart_timers);
    }

    #[test]
    fn test_turn_key_sets_pending_direction() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.state.pending_direction, Direction::Left);

        // Reverse of the applied direction is dropped
        mode.handle_event(key(KeyCode::Down));
        assert_eq!(mode.state.pending_direction, Direction::Left);
    }

    #[test]
    fn test_pause_blocks_input_and_timers() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Char('p')));
        assert!(mode.paused);
        assert!(!mode.timers_running());

        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.state.pending_direction, Direction::Up);

        mode.handle_event(key(KeyCode::Char('p')));
        assert!(mode.timers_running());
    }

    #[test]
    fn test_game_over_records_metrics() {
        let mut mode = mode();
        mode.state.snake = Snake::new(Position::new(10, 0));
        mode.state.score = 3;
        mode.state.elapsed_seconds = 12;

        mode.update_game();

        assert!(!mode.state.is_alive);
        assert!(!mode.timers_running());
        assert_eq!(mode.metrics.games_played, 1);
        assert_eq!(mode.metrics.high_score, 3);
        assert_eq!(mode.metrics.longest_time, 12);

        // Further ticks are no-ops and do not count a second game
        mode.update_game();
        assert_eq!(mode.metrics.games_played, 1);
    }

    #[test]
    fn test_quit_key() {
        let mut mode = mode();
        mode.handle_event(key(KeyCode::Esc));
        assert!(mode.should_quit);
    }
}
