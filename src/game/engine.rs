//! The episode state machine shared by every grid game
//!
//! A [`GameEngine`] owns the visual surface, the pacing clock, the seeded RNG
//! and the per-episode bookkeeping (reward, score, terminal flag). The rules of
//! a particular game live behind the [`Game`] trait, which the engine drives
//! in a fixed order on every tick:
//!
//! ```text
//! step(action):
//!   observation = capture()           // what the agent was looking at
//!   fill(background)
//!   env_action = execute_action(action)
//!   update_screen_elements(canvas)
//!   outcome = update_game_state(rng)
//!   present + pace
//!   -> (observation, env_action, outcome.reward, game_over, score)
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::{
    action::Action,
    clock::Pacer,
    config::GameConfig,
    frame::{COLOR_BLACK, Canvas, Frame, Rgb},
};
use crate::error::GameError;

/// RNG handed to games for spawning entities
pub type GameRng = ChaCha8Rng;

/// Result of evaluating one tick of game state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Reward for this tick only
    pub reward: f32,
    /// Points added to the episode score
    pub score_delta: u32,
    /// Whether the episode ended on this tick
    pub game_over: bool,
}

impl TickOutcome {
    pub fn running(reward: f32) -> Self {
        Self {
            reward,
            score_delta: 0,
            game_over: false,
        }
    }

    pub fn scored(reward: f32, points: u32) -> Self {
        Self {
            reward,
            score_delta: points,
            game_over: false,
        }
    }

    pub fn finished(reward: f32, points: u32) -> Self {
        Self {
            reward,
            score_delta: points,
            game_over: true,
        }
    }
}

/// Rules of a concrete grid game
pub trait Game {
    fn name(&self) -> &'static str;

    /// The subset of the vocabulary this game can execute
    fn action_space(&self) -> &'static [Action];

    fn background(&self) -> Rgb {
        COLOR_BLACK
    }

    /// Put the game into its starting layout
    fn start_episode(&mut self, rng: &mut GameRng);

    /// Apply the requested action and move entities.
    ///
    /// Returns the action actually executed, which must be a member of
    /// [`Game::action_space`].
    fn execute_action(&mut self, action: Action) -> Action;

    /// Draw the current state. Must not change game state.
    fn update_screen_elements(&self, canvas: &mut Canvas);

    /// Evaluate collisions, scoring and termination for this tick
    fn update_game_state(&mut self, rng: &mut GameRng) -> TickOutcome;
}

/// Read-only summary handed to the presenter every tick
#[derive(Debug, Clone, Copy)]
pub struct Hud<'a> {
    pub title: &'a str,
    pub tick: u64,
    pub score: u32,
    pub reward: f32,
    pub game_over: bool,
}

/// Where committed frames go (a window, a terminal, nowhere)
pub trait Presenter {
    fn present(&mut self, canvas: &Canvas, hud: &Hud<'_>) -> Result<(), GameError>;

    fn close(&mut self) -> Result<(), GameError> {
        Ok(())
    }
}

/// Presenter that discards frames
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Presenter for Headless {
    fn present(&mut self, _canvas: &Canvas, _hud: &Hud<'_>) -> Result<(), GameError> {
        Ok(())
    }
}

/// Lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Never reset
    Uninitialized,
    Running,
    Terminal,
}

/// What `step()` returns, in the order agents and the data pipeline expect
#[derive(Debug, Clone, PartialEq)]
pub struct StepSnapshot {
    /// Observation captured before the action was applied
    pub frame: Frame,
    /// Action the game actually executed
    pub environment_action: Action,
    pub reward: f32,
    pub game_over: bool,
    /// Cumulative episode score
    pub score: u32,
}

impl From<StepSnapshot> for (Frame, Action, f32, bool, u32) {
    fn from(s: StepSnapshot) -> Self {
        (s.frame, s.environment_action, s.reward, s.game_over, s.score)
    }
}

#[derive(Debug)]
struct Episode {
    canvas: Canvas,
    environment_action: Action,
    reward: f32,
    score: u32,
    game_over: bool,
    ticks: u64,
}

/// Drives a [`Game`] through reset → step → terminal
pub struct GameEngine {
    config: GameConfig,
    game: Box<dyn Game>,
    presenter: Box<dyn Presenter>,
    rng: GameRng,
    pacer: Pacer,
    episode: Option<Episode>,
}

impl GameEngine {
    /// Create an engine with no presenter
    pub fn new(config: GameConfig, game: Box<dyn Game>) -> Self {
        Self::with_presenter(config, game, Box::new(Headless))
    }

    pub fn with_presenter(
        config: GameConfig,
        game: Box<dyn Game>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => GameRng::seed_from_u64(seed),
            None => GameRng::from_entropy(),
        };
        let pacer = Pacer::new(config.fps);

        Self {
            config,
            game,
            presenter,
            rng,
            pacer,
            episode: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.game.name()
    }

    pub fn action_space(&self) -> &'static [Action] {
        self.game.action_space()
    }

    pub fn phase(&self) -> Phase {
        match &self.episode {
            None => Phase::Uninitialized,
            Some(episode) if episode.game_over => Phase::Terminal,
            Some(_) => Phase::Running,
        }
    }

    /// Score of the current episode (0 before the first reset)
    pub fn score(&self) -> u32 {
        self.episode.as_ref().map_or(0, |e| e.score)
    }

    /// Reward of the last tick (0 before the first step)
    pub fn reward(&self) -> f32 {
        self.episode.as_ref().map_or(0.0, |e| e.reward)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase() == Phase::Terminal
    }

    /// Capture the current visual state
    pub fn frame(&self) -> Result<Frame, GameError> {
        self.episode
            .as_ref()
            .map(|e| e.canvas.capture())
            .ok_or(GameError::NotReset)
    }

    /// Start a fresh episode and return its first observation
    pub fn reset(&mut self) -> Frame {
        let mut canvas = Canvas::new(
            self.config.grid_width,
            self.config.grid_height,
            self.config.cell_size,
        );

        self.game.start_episode(&mut self.rng);
        canvas.fill(self.game.background());
        self.game.update_screen_elements(&mut canvas);
        self.pacer.restart();

        let frame = canvas.capture();
        self.episode = Some(Episode {
            canvas,
            environment_action: Action::Stay,
            reward: 0.0,
            score: 0,
            game_over: false,
            ticks: 0,
        });

        debug!(game = self.game.name(), "episode reset");
        frame
    }

    /// Advance the episode by one tick
    ///
    /// Stepping a finished episode changes nothing and returns the terminal
    /// state with a reward of 0.
    pub fn step(&mut self, action: Action) -> Result<StepSnapshot, GameError> {
        let episode = self.episode.as_mut().ok_or(GameError::NotReset)?;

        if episode.game_over {
            return Ok(StepSnapshot {
                frame: episode.canvas.capture(),
                environment_action: episode.environment_action,
                reward: 0.0,
                game_over: true,
                score: episode.score,
            });
        }

        let observation = episode.canvas.capture();

        episode.canvas.fill(self.game.background());
        let environment_action = self.game.execute_action(action);
        debug_assert!(
            self.game.action_space().contains(&environment_action),
            "{} executed {environment_action} outside its action space",
            self.game.name()
        );
        self.game.update_screen_elements(&mut episode.canvas);
        let outcome = self.game.update_game_state(&mut self.rng);

        episode.environment_action = environment_action;
        episode.reward = outcome.reward;
        episode.score += outcome.score_delta;
        episode.game_over = outcome.game_over;
        episode.ticks += 1;

        self.presenter.present(
            &episode.canvas,
            &Hud {
                title: &self.config.title,
                tick: episode.ticks,
                score: episode.score,
                reward: episode.reward,
                game_over: episode.game_over,
            },
        )?;
        self.pacer.tick();

        if episode.game_over {
            debug!(
                game = self.game.name(),
                ticks = episode.ticks,
                score = episode.score,
                "episode finished"
            );
        }

        Ok(StepSnapshot {
            frame: observation,
            environment_action,
            reward: episode.reward,
            game_over: episode.game_over,
            score: episode.score,
        })
    }

    /// Release the presenter (restores the terminal for displays)
    pub fn close(&mut self) -> Result<(), GameError> {
        self.presenter.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::frame::{COLOR_BLACK, COLOR_WHITE};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A marker that walks right one cell per `Right`; reaching the last
    /// column ends the episode.
    struct Walker {
        width: i32,
        x: i32,
    }

    impl Game for Walker {
        fn name(&self) -> &'static str {
            "Walker"
        }

        fn action_space(&self) -> &'static [Action] {
            &[Action::Right, Action::Stay]
        }

        fn start_episode(&mut self, _rng: &mut GameRng) {
            self.x = 0;
        }

        fn execute_action(&mut self, action: Action) -> Action {
            match action {
                Action::Right => {
                    self.x += 1;
                    Action::Right
                }
                _ => Action::Stay,
            }
        }

        fn update_screen_elements(&self, canvas: &mut Canvas) {
            canvas.fill_cell(self.x, 0, COLOR_WHITE);
        }

        fn update_game_state(&mut self, _rng: &mut GameRng) -> TickOutcome {
            if self.x == self.width - 1 {
                TickOutcome::finished(1.0, 1)
            } else {
                TickOutcome::running(0.0)
            }
        }
    }

    struct CountingPresenter(Arc<AtomicUsize>);

    impl Presenter for CountingPresenter {
        fn present(&mut self, _canvas: &Canvas, _hud: &Hud<'_>) -> Result<(), GameError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn walker_engine() -> GameEngine {
        let config = GameConfig::new("Walker", 4, 1).with_cell_size(1).with_seed(Some(7));
        GameEngine::new(config, Box::new(Walker { width: 4, x: 0 }))
    }

    #[test]
    fn test_step_before_reset_fails() {
        let mut engine = walker_engine();
        assert_eq!(engine.phase(), Phase::Uninitialized);
        assert!(matches!(engine.step(Action::Right), Err(GameError::NotReset)));
        assert!(matches!(engine.frame(), Err(GameError::NotReset)));
    }

    #[test]
    fn test_reset_starts_running_episode() {
        let mut engine = walker_engine();
        let frame = engine.reset();

        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.reward(), 0.0);
        assert_eq!(frame.shape(), (1, 4, 3));
        // initial layout is drawn
        assert_eq!(frame.pixel(0, 0), &COLOR_WHITE);
    }

    #[test]
    fn test_step_returns_pre_action_observation() {
        let mut engine = walker_engine();
        let initial = engine.reset();

        let snapshot = engine.step(Action::Right).unwrap();
        assert_eq!(snapshot.frame, initial);
        assert_eq!(snapshot.environment_action, Action::Right);

        let after = engine.frame().unwrap();
        assert_eq!(after.pixel(0, 1), &COLOR_WHITE);
        assert_eq!(after.pixel(0, 0), &COLOR_BLACK);
    }

    #[test]
    fn test_runs_to_terminal() {
        let mut engine = walker_engine();
        engine.reset();

        let first = engine.step(Action::Right).unwrap();
        let second = engine.step(Action::Right).unwrap();
        assert!(!first.game_over && !second.game_over);

        let last = engine.step(Action::Right).unwrap();
        assert!(last.game_over);
        assert_eq!(last.reward, 1.0);
        assert_eq!(last.score, 1);
        assert_eq!(engine.phase(), Phase::Terminal);
    }

    #[test]
    fn test_step_after_terminal_is_noop() {
        let mut engine = walker_engine();
        engine.reset();
        for _ in 0..3 {
            engine.step(Action::Right).unwrap();
        }
        let frame_before = engine.frame().unwrap();

        let snapshot = engine.step(Action::Right).unwrap();
        assert!(snapshot.game_over);
        assert_eq!(snapshot.reward, 0.0);
        assert_eq!(snapshot.score, 1);
        assert_eq!(engine.frame().unwrap(), frame_before);
    }

    #[test]
    fn test_reset_after_terminal_starts_over() {
        let mut engine = walker_engine();
        engine.reset();
        for _ in 0..3 {
            engine.step(Action::Right).unwrap();
        }
        engine.reset();

        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 0);
        assert!(!engine.step(Action::Stay).unwrap().game_over);
    }

    #[test]
    fn test_reset_twice_is_idempotent() {
        let mut engine = walker_engine();
        let a = engine.reset();
        let b = engine.reset();

        assert_eq!(a.shape(), b.shape());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.reward(), 0.0);
        assert!(!engine.is_game_over());
    }

    #[test]
    fn test_presenter_called_once_per_tick() {
        let count = Arc::new(AtomicUsize::new(0));
        let config = GameConfig::new("Walker", 4, 1).with_cell_size(1);
        let mut engine = GameEngine::with_presenter(
            config,
            Box::new(Walker { width: 4, x: 0 }),
            Box::new(CountingPresenter(count.clone())),
        );

        engine.reset();
        engine.step(Action::Stay).unwrap();
        engine.step(Action::Right).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshot_tuple_order() {
        let mut engine = walker_engine();
        engine.reset();
        let (frame, action, reward, game_over, score) = engine.step(Action::Right).unwrap().into();

        assert_eq!(frame.shape(), (1, 4, 3));
        assert_eq!(action, Action::Right);
        assert_eq!(reward, 0.0);
        assert!(!game_over);
        assert_eq!(score, 0);
    }
}
