use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use super::Agent;
use crate::error::GameError;
use crate::game::{Action, Frame};

/// Picks uniformly from the game's action space, ignoring the frame
pub struct RandomAgent {
    actions: &'static [Action],
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(actions: &'static [Action], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { actions, rng }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose_action(&mut self, _frame: &Frame) -> Result<Action, GameError> {
        Ok(self.actions.choose(&mut self.rng).copied().unwrap_or(Action::Stay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catch::CATCH_ACTIONS;
    use std::collections::HashSet;

    fn blank() -> Frame {
        Frame::from_raw(1, 1, 3, vec![0; 3]).unwrap()
    }

    #[test]
    fn test_stays_in_action_space() {
        let mut agent = RandomAgent::new(&CATCH_ACTIONS, Some(5));
        let seen: HashSet<Action> = (0..200)
            .map(|_| agent.choose_action(&blank()).unwrap())
            .collect();

        assert!(seen.iter().all(|a| CATCH_ACTIONS.contains(a)));
        assert_eq!(seen.len(), CATCH_ACTIONS.len());
    }

    #[test]
    fn test_seeded_agents_agree() {
        let mut a = RandomAgent::new(&CATCH_ACTIONS, Some(9));
        let mut b = RandomAgent::new(&CATCH_ACTIONS, Some(9));
        for _ in 0..50 {
            assert_eq!(
                a.choose_action(&blank()).unwrap(),
                b.choose_action(&blank()).unwrap()
            );
        }
    }
}
