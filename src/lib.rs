//! Rule engine and heuristic opponents for a four-seat UNO-style card game.

pub mod action;
pub mod ai;
pub mod bot;
pub mod bots;
pub mod card;
pub mod error;
pub mod game;
pub mod legality;
pub mod player;
pub mod state;
pub mod turn;
pub mod visualize;

pub use crate::action::{Action, EAST, HUMAN, NORTH, PlayerId, WEST};
pub use crate::ai::{AiMode, Decision};
pub use crate::bot::Bot;
pub use crate::bots::{AiBot, HumanBot, RandomBot, create_bot_from_spec, label_for_spec};
pub use crate::card::{Card, Color, Rank};
pub use crate::error::{GameError, InvalidAction};
pub use crate::game::{Game, GameBuilder, GameConfig};
pub use crate::legality::LegalityMask;
pub use crate::player::KnownCards;
pub use crate::state::{
    Difficulty, GameSettings, GameStateView, GameStatus, PlayedCard, Rules, SeatPublicState,
    TurnPhase,
};
pub use crate::turn::{Direction, SeatRing};
pub use crate::visualize::{DescribeOptions, VisualOptions, describe_action, render_state};
