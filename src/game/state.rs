use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// Body segments are stored head first and never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// A one-segment snake
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    /// Build a snake from explicit segments, head first.
    /// Returns `None` for an empty body.
    pub fn from_segments(body: Vec<Position>) -> Option<Self> {
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    #[cfg(test)]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Check if any segment, tail included, sits on `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push a new head; drop the tail unless growing
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);

        if !grow {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake hit a static obstacle
    Obstacle,
}

/// Complete game state
///
/// Everything a renderer needs is public for reading. Mutation goes through
/// [`GameState::set_direction`], [`GameState::tick_clock`] and the engine's
/// `reset`/`step`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction applied on the last step
    pub direction: Direction,
    /// Latest accepted intent, consumed at the start of the next step
    pub pending_direction: Direction,
    /// The collectible. `None` only when no free cell is left.
    pub food: Option<Position>,
    pub obstacles: Vec<Position>,
    pub board_size: usize,
    pub score: u32,
    pub elapsed_seconds: u64,
    pub steps: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state heading up
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        obstacles: Vec<Position>,
        board_size: usize,
    ) -> Self {
        Self {
            snake,
            direction: Direction::Up,
            pending_direction: Direction::Up,
            food,
            obstacles,
            board_size,
            score: 0,
            elapsed_seconds: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Same state with a different applied (and pending) direction
    #[cfg(test)]
    pub fn heading(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self.pending_direction = direction;
        self
    }

    /// Record a direction intent for the next step.
    ///
    /// The reversal guard compares against the applied direction, not the
    /// pending one, so two quick opposite taps inside one tick cannot turn
    /// the snake back onto itself. Returns whether the intent was accepted.
    pub fn set_direction(&mut self, intent: Direction) -> bool {
        if self.direction.is_opposite(intent) {
            return false;
        }
        self.pending_direction = intent;
        true
    }

    /// Advance the elapsed-time counter by one unit. Frozen once terminal.
    pub fn tick_clock(&mut self) {
        if self.is_alive {
            self.elapsed_seconds += 1;
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        let size = self.board_size as i32;
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.obstacles.contains(&pos)
    }

    /// Check if a position is taken by the snake or an obstacle
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.snake.contains(pos) || self.is_obstacle(pos)
    }

    /// Every in-bounds cell not covered by the snake or an obstacle
    pub fn free_cells(&self) -> Vec<Position> {
        let size = self.board_size as i32;
        (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .filter(|&pos| !self.is_occupied(pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> GameState {
        GameState::new(
            Snake::new(Position::new(5, 5)),
            Some(Position::new(1, 1)),
            vec![Position::new(2, 2)],
            10,
        )
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(5, 5));
        assert!(Snake::from_segments(Vec::new()).is_none());
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5));

        // Grow
        snake.advance(Position::new(6, 5), true);
        assert_eq!(snake.segments(), &[Position::new(6, 5), Position::new(5, 5)]);

        // Move without growing
        snake.advance(Position::new(7, 5), false);
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(6, 5));
    }

    #[test]
    fn test_snake_contains_tail() {
        let snake = Snake::from_segments(vec![
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(3, 5),
        ])
        .unwrap();
        assert!(snake.contains(Position::new(5, 5)));
        assert!(snake.contains(Position::new(3, 5)));
        assert!(!snake.contains(Position::new(10, 10)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = sample_state();

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(9, 9)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(10, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 10)));
    }

    #[test]
    fn test_set_direction_rejects_reversal() {
        let mut state = sample_state();
        assert!(!state.set_direction(Direction::Down));
        assert_eq!(state.pending_direction, Direction::Up);

        assert!(state.set_direction(Direction::Left));
        assert_eq!(state.pending_direction, Direction::Left);
        // Applied direction is unchanged until a step consumes the intent
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_set_direction_checks_applied_not_pending() {
        let mut state = sample_state();
        // Left is pending, but Down is still the reverse of the applied Up
        assert!(state.set_direction(Direction::Left));
        assert!(!state.set_direction(Direction::Down));
        assert_eq!(state.pending_direction, Direction::Left);

        // Right is the reverse of the pending Left but not of the applied Up
        assert!(state.set_direction(Direction::Right));
        assert_eq!(state.pending_direction, Direction::Right);
    }

    #[test]
    fn test_tick_clock_freezes_when_terminal() {
        let mut state = sample_state();
        state.tick_clock();
        state.tick_clock();
        assert_eq!(state.elapsed_seconds, 2);

        state.is_alive = false;
        state.tick_clock();
        assert_eq!(state.elapsed_seconds, 2);
    }

    #[test]
    fn test_free_cells_excludes_snake_and_obstacles() {
        let state = sample_state();
        let free = state.free_cells();
        assert_eq!(free.len(), 100 - 2);
        assert!(!free.contains(&Position::new(5, 5)));
        assert!(!free.contains(&Position::new(2, 2)));
        // The item does not occupy its cell
        assert!(free.contains(&Position::new(1, 1)));
    }
}
