use serde::{Deserialize, Serialize};

use crate::card::{CATALOG_SIZE, Card, Color, MAX_HAND_SIZE};

/// Plays of the declared color a seat is assumed to hold after a wild card.
pub const STRONG_COLOR_ESTIMATE: u8 = 2;

/// Identities of a seat's cards that the human seat has seen.
///
/// Tracked per catalog id rather than per hand slot, so sorting or exchanging
/// hands never needs bit shuffling.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnownCards {
    counts: Vec<u8>,
}

impl Default for KnownCards {
    fn default() -> Self {
        Self {
            counts: vec![0; CATALOG_SIZE],
        }
    }
}

impl KnownCards {
    pub fn reveal_all(&mut self, hand: &[Card]) {
        self.counts.fill(0);
        for card in hand {
            self.counts[card.id() as usize] += 1;
        }
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Drop knowledge exceeding the copies of `card` still in `hand`.
    pub fn forget_played(&mut self, card: Card, hand: &[Card]) {
        let remaining = hand.iter().filter(|c| **c == card).count() as u8;
        let slot = &mut self.counts[card.id() as usize];
        *slot = (*slot).min(remaining);
    }

    pub fn count(&self, card: Card) -> u8 {
        self.counts[card.id() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| *c as usize).sum()
    }

    /// Known copies are assigned to the lowest slots holding each id.
    pub fn is_open(&self, hand: &[Card], slot: usize) -> bool {
        let Some(card) = hand.get(slot) else {
            return false;
        };
        let earlier = hand[..slot].iter().filter(|c| *c == card).count();
        earlier < self.count(*card) as usize
    }
}

/// Hand plus the public estimates other seats keep about it.
#[derive(Clone, Debug, Default)]
pub(crate) struct PlayerState {
    pub(crate) hand: Vec<Card>,
    pub(crate) strong_color: Option<Color>,
    pub(crate) strong_count: u8,
    pub(crate) weak_color: Option<Color>,
    pub(crate) recent_play: Option<Card>,
    pub(crate) known: KnownCards,
}

impl PlayerState {
    pub(crate) fn new() -> Self {
        Self {
            hand: Vec::with_capacity(MAX_HAND_SIZE),
            ..Self::default()
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.hand.len() >= MAX_HAND_SIZE
    }

    /// Insert keeping id order; returns the slot the card landed in.
    pub(crate) fn receive(&mut self, card: Card) -> usize {
        let slot = self.hand.partition_point(|held| *held <= card);
        self.hand.insert(slot, card);
        slot
    }

    pub(crate) fn take(&mut self, slot: usize) -> Card {
        let card = self.hand.remove(slot);
        self.known.forget_played(card, &self.hand);
        card
    }

    /// Bookkeeping after a card leaves the hand. `declared` is the color that
    /// follows it.
    pub(crate) fn note_play(&mut self, card: Card, declared: Color) {
        self.recent_play = Some(card);
        if card.is_wild() {
            self.strong_color = Some(declared);
            self.strong_count = STRONG_COLOR_ESTIMATE;
            if self.weak_color == Some(declared) {
                self.weak_color = None;
            }
            return;
        }
        if self.strong_color == card.color() {
            self.strong_count = self.strong_count.saturating_sub(1);
            if self.strong_count == 0 {
                self.strong_color = None;
            }
        }
        if self.weak_color == card.color() {
            self.weak_color = None;
        }
    }

    /// A voluntary draw while `active` was the color to follow.
    pub(crate) fn note_voluntary_draw(&mut self, active: Color) {
        if self.strong_color == Some(active) {
            self.strong_color = None;
            self.strong_count = 0;
        }
        self.weak_color = Some(active);
    }

    /// Move the hand and everything inferred about it to another seat.
    pub(crate) fn take_holdings(&mut self) -> Holdings {
        Holdings {
            hand: std::mem::take(&mut self.hand),
            strong_color: self.strong_color.take(),
            strong_count: std::mem::take(&mut self.strong_count),
            weak_color: self.weak_color.take(),
            known: std::mem::take(&mut self.known),
        }
    }

    pub(crate) fn put_holdings(&mut self, holdings: Holdings) {
        self.hand = holdings.hand;
        self.strong_color = holdings.strong_color;
        self.strong_count = holdings.strong_count;
        self.weak_color = holdings.weak_color;
        self.known = holdings.known;
    }
}

#[derive(Debug, Default)]
pub(crate) struct Holdings {
    pub(crate) hand: Vec<Card>,
    strong_color: Option<Color>,
    strong_count: u8,
    weak_color: Option<Color>,
    pub(crate) known: KnownCards,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_keeps_hand_sorted() {
        let mut player = PlayerState::new();
        assert_eq!(player.receive(Card::number(Color::Blue, 3)), 0);
        assert_eq!(player.receive(Card::wild()), 1);
        assert_eq!(player.receive(Card::number(Color::Red, 9)), 0);
        assert_eq!(player.receive(Card::number(Color::Red, 9)), 1);
        assert!(player.hand.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn strong_color_decays_with_matching_plays() {
        let mut player = PlayerState::new();
        player.weak_color = Some(Color::Green);
        player.note_play(Card::wild(), Color::Green);
        assert_eq!(player.strong_color, Some(Color::Green));
        assert_eq!(player.weak_color, None);
        player.note_play(Card::number(Color::Green, 4), Color::Green);
        assert_eq!(player.strong_color, Some(Color::Green));
        player.note_play(Card::skip(Color::Green), Color::Green);
        assert_eq!(player.strong_color, None);
    }

    #[test]
    fn drawing_on_strong_color_corrects_estimate() {
        let mut player = PlayerState::new();
        player.note_play(Card::wild_draw_four(), Color::Red);
        player.note_voluntary_draw(Color::Red);
        assert_eq!(player.strong_color, None);
        assert_eq!(player.weak_color, Some(Color::Red));
        player.note_play(Card::number(Color::Red, 1), Color::Red);
        assert_eq!(player.weak_color, None);
    }

    #[test]
    fn known_cards_follow_identities() {
        let red_five = Card::number(Color::Red, 5);
        let mut hand = vec![red_five, red_five, Card::skip(Color::Blue)];
        let mut known = KnownCards::default();
        known.reveal_all(&hand[..1]);
        assert!(known.is_open(&hand, 0));
        assert!(!known.is_open(&hand, 1));
        assert!(!known.is_open(&hand, 2));

        known.reveal_all(&hand);
        hand.remove(0);
        known.forget_played(red_five, &hand);
        assert_eq!(known.count(red_five), 1);
        assert_eq!(known.total(), 2);
        assert!(!known.is_open(&hand, 5));
    }
}
