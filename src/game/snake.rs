use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    engine::{Game, GameRng, TickOutcome},
    frame::{COLOR_GREEN, COLOR_RED, COLOR_WHITE, Canvas},
    state::{Grid, Position, Snake},
};

pub const SNAKE_ACTIONS: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

/// Rewards and starting length for Snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeRules {
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Reward for eating food
    pub food_reward: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,
    /// Penalty for dying
    pub death_penalty: f32,
}

impl Default for SnakeRules {
    fn default() -> Self {
        Self {
            initial_snake_length: 3,
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
        }
    }
}

/// Type of collision that ended the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

pub struct SnakeGame {
    grid: Grid,
    rules: SnakeRules,
    snake: Snake,
    /// `None` once the snake fills the whole grid
    food: Option<Position>,
    ate_food: bool,
    collision: Option<CollisionType>,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rules(config, SnakeRules::default())
    }

    pub fn with_rules(config: &GameConfig, rules: SnakeRules) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(grid.center(), Direction::Right, rules.initial_snake_length);
        Self {
            grid,
            rules,
            snake,
            food: None,
            ate_food: false,
            collision: None,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn collision(&self) -> Option<CollisionType> {
        self.collision
    }

    /// Pick a random cell not covered by the snake
    fn spawn_food(&self, rng: &mut GameRng) -> Option<Position> {
        (0..self.grid.cell_count())
            .map(|i| Position::new((i % self.grid.width) as i32, (i / self.grid.width) as i32))
            .filter(|pos| !self.snake.body.contains(pos))
            .choose(rng)
    }

    fn check_collision(&self) -> Option<CollisionType> {
        let head = self.snake.head();
        if !self.grid.contains(head) {
            return Some(CollisionType::Wall);
        }
        if self.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }
        None
    }
}

impl Game for SnakeGame {
    fn name(&self) -> &'static str {
        "Snake"
    }

    fn action_space(&self) -> &'static [Action] {
        &SNAKE_ACTIONS
    }

    fn start_episode(&mut self, rng: &mut GameRng) {
        self.snake = Snake::new(
            self.grid.center(),
            Direction::Right,
            self.rules.initial_snake_length,
        );
        self.food = self.spawn_food(rng);
        self.ate_food = false;
        self.collision = None;
    }

    fn execute_action(&mut self, action: Action) -> Action {
        // Stay keeps the current heading, reversals are ignored
        let heading = match action.direction() {
            Some(direction) => self.snake.turn(direction),
            None => self.snake.direction,
        };

        let new_head = self.snake.head().moved_in_direction(heading);
        self.ate_food = Some(new_head) == self.food;
        self.snake.move_snake(self.ate_food);

        Action::from(heading)
    }

    fn update_screen_elements(&self, canvas: &mut Canvas) {
        if let Some(food) = self.food {
            canvas.fill_cell(food.x, food.y, COLOR_RED);
        }
        for segment in self.snake.body_segments() {
            canvas.fill_cell(segment.x, segment.y, COLOR_GREEN);
        }
        let head = self.snake.head();
        canvas.fill_cell(head.x, head.y, COLOR_WHITE);
    }

    fn update_game_state(&mut self, rng: &mut GameRng) -> TickOutcome {
        if let Some(collision) = self.check_collision() {
            self.collision = Some(collision);
            return TickOutcome::finished(self.rules.death_penalty, 0);
        }

        let mut reward = self.rules.step_penalty;
        if !self.ate_food {
            return TickOutcome::running(reward);
        }

        reward += self.rules.food_reward;
        self.food = self.spawn_food(rng);
        match self.food {
            Some(_) => TickOutcome::scored(reward, 1),
            // Nothing left to eat
            None => TickOutcome::finished(reward, 1),
        }
    }
}
