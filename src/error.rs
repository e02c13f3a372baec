use thiserror::Error;

use crate::action::PlayerId;
use crate::state::TurnPhase;

/// Errors that can occur when manipulating the game state.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("seat index {0} is out of range or not seated")]
    InvalidPlayer(PlayerId),
    #[error("not the specified player's turn")]
    NotPlayersTurn,
    #[error("invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("game is already over")]
    GameOver,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

/// Details of invalid user actions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("card at hand index {0} cannot be played now")]
    IllegalCard(usize),
    #[error("a wild card needs a declared color")]
    ColorRequired,
    #[error("action not allowed while {0:?}")]
    UnexpectedAction(TurnPhase),
    #[error("seat {0} cannot be chosen as swap target")]
    SwapTarget(PlayerId),
}
