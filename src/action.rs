use serde::{Deserialize, Serialize};

use crate::card::Color;

/// Zero-based seat index. Seat 0 is the human seat, seat 2 sits opposite it.
pub type PlayerId = usize;

pub const HUMAN: PlayerId = 0;
pub const WEST: PlayerId = 1;
/// Seat left empty in three-seat games.
pub const NORTH: PlayerId = 2;
pub const EAST: PlayerId = 3;

/// Command available to a seat during its turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Play the card at `hand_index`. Wild cards need the color to follow;
    /// colored cards ignore it.
    Play {
        hand_index: usize,
        color: Option<Color>,
    },
    /// Take a card from the deck, or the whole pending draw-two stack.
    Draw,
    /// Keep a playable card that was just drawn and end the turn.
    Pass,
    /// Dispute the wild draw four that was just played.
    Challenge,
    /// Take the four cards without disputing.
    Accept,
    /// Exchange hands with `target` after playing a seven.
    Swap { target: PlayerId },
}

impl Action {
    /// Hand slot touched by the action, if any.
    pub fn hand_index(&self) -> Option<usize> {
        match self {
            Action::Play { hand_index, .. } => Some(*hand_index),
            _ => None,
        }
    }
}
