use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::action::Action;
use crate::ai::{self, AiMode};
use crate::bot::Bot;
use crate::state::{GameStateView, TurnPhase};

/// Seat driven by the heuristic decision engine.
///
/// Without a fixed mode the bot follows the table's rules and difficulty,
/// exactly as the engine-controlled seats do.
pub struct AiBot {
    mode: Option<AiMode>,
    rng: StdRng,
}

impl AiBot {
    pub fn new(seed: u64) -> Self {
        Self {
            mode: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_mode(mode: AiMode, seed: u64) -> Self {
        Self {
            mode: Some(mode),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn mode_for(&self, state: &GameStateView) -> AiMode {
        self.mode
            .unwrap_or_else(|| AiMode::for_settings(&state.settings))
    }

    fn preferred(&mut self, state: &GameStateView) -> Action {
        match state.phase {
            TurnPhase::AwaitingAction => {
                let mode = self.mode_for(state);
                ai::best_card(state, mode, &mut self.rng)
                    .map_or(Action::Draw, |decision| decision.into_action())
            }
            TurnPhase::DrawnPlayable { hand_index, .. } => {
                let color = state
                    .hand
                    .get(hand_index)
                    .and_then(|card| card.color())
                    .unwrap_or_else(|| ai::best_color(state, &mut self.rng));
                Action::Play {
                    hand_index,
                    color: Some(color),
                }
            }
            TurnPhase::AwaitingChallenge => {
                if ai::need_to_challenge(state) {
                    Action::Challenge
                } else {
                    Action::Accept
                }
            }
            TurnPhase::AwaitingSwapTarget => Action::Swap {
                target: ai::best_swap_target(state),
            },
            TurnPhase::GameOver => Action::Pass,
        }
    }
}

impl Default for AiBot {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Bot for AiBot {
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action {
        assert!(
            !legal_actions.is_empty(),
            "ai bot requires at least one legal action"
        );
        let wanted = self.preferred(state);
        // Colored plays are listed without a color; match them by slot.
        legal_actions
            .iter()
            .find(|action| match (action, &wanted) {
                (
                    Action::Play {
                        hand_index: listed,
                        color: None,
                    },
                    Action::Play { hand_index, .. },
                ) => listed == hand_index,
                _ => *action == &wanted,
            })
            .copied()
            .unwrap_or(legal_actions[0])
    }
}
