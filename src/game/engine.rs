use super::{
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate the item this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after the step (final score when terminated)
    pub score: u32,
    /// Elapsed time after the step (final time when terminated)
    pub elapsed_seconds: u64,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn new(state: &GameState, ate_food: bool, collision_type: Option<CollisionType>) -> Self {
        Self {
            terminated: !state.is_alive,
            score: state.score,
            elapsed_seconds: state.elapsed_seconds,
            info: StepInfo {
                ate_food,
                collision_type,
            },
        }
    }
}

/// The game engine that handles all game logic
///
/// Owns the fixed configuration and the random source used for item
/// placement. All session data lives in [`GameState`].
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose item placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = Snake::new(self.config.center());
        let mut state = GameState::new(
            snake,
            None,
            self.config.obstacles.clone(),
            self.config.board_size,
        );
        state.food = self.place_food(&state);

        log::debug!(
            "New game on {}x{} board, item at {:?}",
            state.board_size,
            state.board_size,
            state.food
        );

        state
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState) -> StepResult {
        if !state.is_alive {
            return StepResult::new(state, false, None);
        }

        state.direction = state.pending_direction;

        // Calculate new head position
        let new_head = state.snake.head().moved_in_direction(state.direction);

        // Check for collisions
        if let Some(collision_type) = self.check_collision(state, new_head) {
            state.is_alive = false;

            log::info!(
                "Game over ({:?}) with score {} after {}s",
                collision_type,
                state.score,
                state.elapsed_seconds
            );

            return StepResult::new(state, false, Some(collision_type));
        }

        let ate_food = state.food == Some(new_head);

        // Move snake (grow if ate food)
        state.snake.advance(new_head, ate_food);

        if ate_food {
            state.score += 1;
            state.food = self.place_food(state);
        }

        state.steps += 1;

        StepResult::new(state, ate_food, None)
    }

    /// Check if the new head position causes a collision.
    ///
    /// The self check runs against the pre-move body, so moving onto the
    /// cell the tail is about to leave still counts as a collision.
    fn check_collision(&self, state: &GameState, pos: Position) -> Option<CollisionType> {
        if !state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if state.snake.contains(pos) {
            return Some(CollisionType::SelfCollision);
        }

        if state.is_obstacle(pos) {
            return Some(CollisionType::Obstacle);
        }

        None
    }

    /// Pick a random cell free of snake and obstacles.
    ///
    /// Rejection sampling while at least a quarter of the board is free;
    /// past that, sample straight from the free-cell list. `None` when the
    /// board is full.
    fn place_food(&mut self, state: &GameState) -> Option<Position> {
        let cells = state.board_size * state.board_size;
        // Upper bound: obstacles may repeat, snake never overlaps them
        let occupied = (state.snake.len() + state.obstacles.len()).min(cells);

        if (cells - occupied) * 4 >= cells && occupied < cells {
            return Some(self.sample_free_cell(state));
        }

        let free = state.free_cells();
        match free.choose(&mut self.rng) {
            Some(&pos) => Some(pos),
            None => {
                log::warn!("Board is full, no cell left for the item");
                None
            }
        }
    }

    fn sample_free_cell(&mut self, state: &GameState) -> Position {
        loop {
            let x = self.rng.gen_range(0..state.board_size) as i32;
            let y = self.rng.gen_range(0..state.board_size) as i32;
            let pos = Position::new(x, y);

            if !state.is_occupied(pos) {
                return pos;
            }
        }
    }
}
