use crate::action::Action;
use crate::state::GameStateView;

/// Interface for anything that can occupy a seat: scripted engines, random
/// players, or a person at the terminal.
pub trait Bot {
    /// Pick one of `legal_actions`, which is never empty while the round is
    /// ongoing.
    fn select_action(&mut self, state: &GameStateView, legal_actions: &[Action]) -> Action;
}
