use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color, INITIAL_HAND_SIZE, MAX_HAND_SIZE, SEAT_COUNT};
use crate::error::GameError;
use crate::legality::LegalityMask;
use crate::turn::{Direction, SeatRing};

/// Optional rule variants.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rules {
    /// Draw-two penalties compound until a seat cannot answer with another.
    pub stack_draw_two: bool,
    /// Sevens swap hands with a chosen seat, zeros rotate all hands.
    pub seven_zero: bool,
    /// A playable card drawn voluntarily must be played at once.
    pub forced_play: bool,
    /// Seats 0/2 play against seats 1/3.
    pub team: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    #[default]
    Hard,
}

/// Global constants for a running game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSettings {
    pub seat_count: usize,
    pub hand_size: usize,
    pub rules: Rules,
    pub difficulty: Difficulty,
    /// Let the decision engine act for the human seat where the engine would
    /// otherwise wait for input.
    pub autopilot: bool,
}

impl GameSettings {
    pub fn new(seat_count: usize) -> Result<Self, GameError> {
        let settings = Self {
            seat_count,
            hand_size: INITIAL_HAND_SIZE,
            rules: Rules::default(),
            difficulty: Difficulty::default(),
            autopilot: false,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(3..=SEAT_COUNT).contains(&self.seat_count) {
            return Err(GameError::InvalidConfiguration("seat count must be 3 or 4"));
        }
        if self.hand_size == 0 {
            return Err(GameError::InvalidConfiguration("hand size must be positive"));
        }
        if self.hand_size > MAX_HAND_SIZE {
            return Err(GameError::InvalidConfiguration("hand size exceeds the hand cap"));
        }
        if self.rules.team && self.seat_count != SEAT_COUNT {
            return Err(GameError::InvalidConfiguration("team rule needs four seats"));
        }
        Ok(())
    }
}

/// A card on the recent window together with the color that followed it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayedCard {
    pub card: Card,
    pub color: Color,
}

/// Status of the entire game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Finished { winner: PlayerId },
}

/// Current phase of the active turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TurnPhase {
    /// Play a legal card or draw.
    AwaitingAction,
    /// A playable card was just drawn into `hand_index`.
    DrawnPlayable { hand_index: usize, must_play: bool },
    /// A wild draw four was just played against the current seat.
    AwaitingChallenge,
    /// The current seat played a seven and picks whom to swap with.
    AwaitingSwapTarget,
    GameOver,
}

/// Public portion of a seat's state that all opponents may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatPublicState {
    pub id: PlayerId,
    pub hand_size: usize,
    pub strong_color: Option<Color>,
    pub weak_color: Option<Color>,
    pub recent_play: Option<Card>,
    /// Cards of this seat the human seat has seen, in hand order.
    pub open_cards: Vec<Card>,
    pub score: i32,
    pub is_current: bool,
}

/// Game state snapshot tailored for bots and the decision engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameStateView {
    pub settings: GameSettings,
    pub phase: TurnPhase,
    pub status: GameStatus,
    pub self_player: PlayerId,
    pub current_player: PlayerId,
    pub direction: Direction,
    pub deck_count: usize,
    pub used_count: usize,
    pub pending_draw: u32,
    pub legality: LegalityMask,
    /// Oldest first; the last entry is the active card.
    pub recent: Vec<PlayedCard>,
    pub color_plays: [u32; 4],
    pub rank_plays: [u32; 15],
    /// One entry per seated seat, ascending by id.
    pub players: Vec<SeatPublicState>,
    pub hand: Vec<Card>,
}

impl GameStateView {
    pub fn ring(&self) -> SeatRing {
        SeatRing::new(self.settings.seat_count, self.direction)
    }

    pub fn player(&self, seat: PlayerId) -> Option<&SeatPublicState> {
        self.players.iter().find(|player| player.id == seat)
    }

    pub fn hand_size_of(&self, seat: PlayerId) -> usize {
        self.player(seat).map_or(0, |player| player.hand_size)
    }

    pub fn is_legal(&self, card: Card) -> bool {
        self.legality.allows(card)
    }

    pub fn active_card(&self) -> Option<PlayedCard> {
        self.recent.last().copied()
    }

    pub fn last_color(&self) -> Option<Color> {
        self.recent.last().map(|played| played.color)
    }

    pub fn second_last_color(&self) -> Option<Color> {
        self.recent
            .len()
            .checked_sub(2)
            .map(|idx| self.recent[idx].color)
    }

    /// Seats the viewing seat plays against.
    pub fn opponents(&self) -> impl Iterator<Item = &SeatPublicState> + '_ {
        let ring = self.ring();
        let team = self.settings.rules.team;
        self.players.iter().filter(move |player| {
            player.id != self.self_player
                && !(team && ring.are_teammates(player.id, self.self_player))
        })
    }

    pub fn is_opponent(&self, seat: PlayerId) -> bool {
        self.opponents().any(|player| player.id == seat)
    }
}
