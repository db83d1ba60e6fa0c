use rand::Rng;

use super::{
    action::Action,
    config::GameConfig,
    engine::{Game, GameRng, TickOutcome},
    frame::{COLOR_GREEN, COLOR_WHITE, Canvas},
    state::{Grid, Position},
};

pub const CATCH_ACTIONS: [Action; 3] = [Action::Left, Action::Right, Action::Stay];

/// Width of the paddle in cells
pub const PADDLE_WIDTH: usize = 3;

/// A ball falls one row per tick; move the paddle on the bottom row under it.
///
/// Catching the ball scores a point (reward +1). A ball that drops below the
/// bottom row is a miss (reward -1). Either way the episode ends.
pub struct CatchGame {
    grid: Grid,
    paddle_width: usize,
    /// Leftmost paddle column
    paddle_x: i32,
    ball: Position,
    fixed_ball_column: Option<usize>,
    fixed_paddle_column: Option<usize>,
}

impl CatchGame {
    pub fn new(config: &GameConfig) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let paddle_width = PADDLE_WIDTH.min(grid.width).max(1);
        Self {
            grid,
            paddle_width,
            paddle_x: ((grid.width - paddle_width) / 2) as i32,
            ball: Position::new(0, 0),
            fixed_ball_column: None,
            fixed_paddle_column: None,
        }
    }

    /// Always drop the ball down this column instead of a random one
    pub fn with_ball_column(mut self, column: usize) -> Self {
        self.fixed_ball_column = Some(column.min(self.grid.width - 1));
        self
    }

    /// Start every episode with the paddle's left edge on this column
    pub fn with_paddle_column(mut self, column: usize) -> Self {
        self.fixed_paddle_column = Some(column.min(self.grid.width - self.paddle_width));
        self
    }

    pub fn ball(&self) -> Position {
        self.ball
    }

    /// Columns covered by the paddle
    pub fn paddle_columns(&self) -> std::ops::Range<i32> {
        self.paddle_x..self.paddle_x + self.paddle_width as i32
    }

    fn paddle_row(&self) -> i32 {
        self.grid.height as i32 - 1
    }
}

impl Game for CatchGame {
    fn name(&self) -> &'static str {
        "Catch"
    }

    fn action_space(&self) -> &'static [Action] {
        &CATCH_ACTIONS
    }

    fn start_episode(&mut self, rng: &mut GameRng) {
        let column = self
            .fixed_ball_column
            .unwrap_or_else(|| rng.gen_range(0..self.grid.width));
        self.ball = Position::new(column as i32, 0);
        self.paddle_x = self
            .fixed_paddle_column
            .unwrap_or((self.grid.width - self.paddle_width) / 2) as i32;
    }

    fn execute_action(&mut self, action: Action) -> Action {
        let max_x = (self.grid.width - self.paddle_width) as i32;
        let executed = match action {
            Action::Left if self.paddle_x > 0 => {
                self.paddle_x -= 1;
                Action::Left
            }
            Action::Right if self.paddle_x < max_x => {
                self.paddle_x += 1;
                Action::Right
            }
            // Up/Down and moves into a wall do nothing
            _ => Action::Stay,
        };

        self.ball = self.ball.moved_by(0, 1);
        executed
    }

    fn update_screen_elements(&self, canvas: &mut Canvas) {
        for x in self.paddle_columns() {
            canvas.fill_cell(x, self.paddle_row(), COLOR_GREEN);
        }
        canvas.fill_cell(self.ball.x, self.ball.y, COLOR_WHITE);
    }

    fn update_game_state(&mut self, _rng: &mut GameRng) -> TickOutcome {
        if self.ball.y == self.paddle_row() && self.paddle_columns().contains(&self.ball.x) {
            return TickOutcome::finished(1.0, 1);
        }
        if self.ball.y > self.paddle_row() {
            return TickOutcome::finished(-1.0, 0);
        }
        TickOutcome::running(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::GameEngine;
    use crate::game::frame::COLOR_BLACK;
    use rand::SeedableRng;

    fn config() -> GameConfig {
        GameConfig::new("Catch", 10, 10).with_cell_size(1).with_seed(Some(3))
    }

    fn engine_with(game: CatchGame) -> GameEngine {
        GameEngine::new(config(), Box::new(game))
    }

    #[test]
    fn test_missed_ball_ends_on_tick_ten() {
        let game = CatchGame::new(&config())
            .with_ball_column(5)
            .with_paddle_column(0);
        let mut engine = engine_with(game);
        engine.reset();

        for tick in 1..=9 {
            let snapshot = engine.step(Action::Stay).unwrap();
            assert!(!snapshot.game_over, "terminal too early on tick {tick}");
            assert_eq!(snapshot.score, 0);
        }

        let last = engine.step(Action::Stay).unwrap();
        assert!(last.game_over);
        assert_eq!(last.score, 0);
        assert_eq!(last.reward, -1.0);
    }

    #[test]
    fn test_caught_ball_scores() {
        let game = CatchGame::new(&config())
            .with_ball_column(5)
            .with_paddle_column(4);
        let mut engine = engine_with(game);
        engine.reset();

        let mut last = None;
        for _ in 0..9 {
            last = Some(engine.step(Action::Stay).unwrap());
        }
        let last = last.unwrap();

        assert!(last.game_over);
        assert_eq!(last.reward, 1.0);
        assert_eq!(last.score, 1);
    }

    #[test]
    fn test_paddle_chases_ball() {
        let game = CatchGame::new(&config())
            .with_ball_column(9)
            .with_paddle_column(0);
        let mut engine = engine_with(game);
        engine.reset();

        let mut snapshot = engine.step(Action::Right).unwrap();
        while !snapshot.game_over {
            snapshot = engine.step(Action::Right).unwrap();
        }
        assert_eq!(snapshot.score, 1);
    }

    #[test]
    fn test_wall_blocks_paddle() {
        let mut game = CatchGame::new(&config()).with_paddle_column(0);
        let mut rng = GameRng::seed_from_u64(0);
        game.start_episode(&mut rng);

        assert_eq!(game.execute_action(Action::Left), Action::Stay);
        assert_eq!(game.paddle_columns(), 0..3);
        assert_eq!(game.execute_action(Action::Right), Action::Right);
        assert_eq!(game.paddle_columns(), 1..4);
    }

    #[test]
    fn test_vertical_actions_execute_as_stay() {
        let mut game = CatchGame::new(&config());
        let mut rng = GameRng::seed_from_u64(0);
        game.start_episode(&mut rng);

        for action in Action::ALL {
            let executed = game.execute_action(action);
            assert!(CATCH_ACTIONS.contains(&executed));
        }
        assert_eq!(game.execute_action(Action::Up), Action::Stay);
        assert_eq!(game.execute_action(Action::Down), Action::Stay);
    }

    #[test]
    fn test_initial_frame_shows_ball_and_paddle() {
        let game = CatchGame::new(&config())
            .with_ball_column(2)
            .with_paddle_column(6);
        let mut engine = engine_with(game);
        let frame = engine.reset();

        assert_eq!(frame.pixel(0, 2), &COLOR_WHITE);
        for col in 6..9 {
            assert_eq!(frame.pixel(9, col), &COLOR_GREEN);
        }
        assert_eq!(frame.pixel(9, 5), &COLOR_BLACK);
    }

    #[test]
    fn test_seeded_ball_column_is_reproducible() {
        let columns = |seed| {
            let config = config().with_seed(Some(seed));
            let mut engine = GameEngine::new(config.clone(), Box::new(CatchGame::new(&config)));
            (0..5)
                .map(|_| {
                    let frame = engine.reset();
                    (0..10).find(|&c| frame.pixel(0, c) == COLOR_WHITE).unwrap()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(columns(11), columns(11));
    }
}
