use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four card colors. Wild cards carry no color.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Zero-based position used for bit indexing and per-color counters.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Yellow => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
        };
        f.write_str(name)
    }
}

/// Face of a card: a numeral, one of the colored actions, or a wild kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Numbered card between 0 and 9.
    Number(u8),
    Reverse,
    Skip,
    DrawTwo,
    Wild,
    WildDrawFour,
}

impl Rank {
    /// Ranks that exist in every color, in catalog order.
    pub const COLORED: [Rank; COLORED_RANKS] = [
        Rank::Number(0),
        Rank::Number(1),
        Rank::Number(2),
        Rank::Number(3),
        Rank::Number(4),
        Rank::Number(5),
        Rank::Number(6),
        Rank::Number(7),
        Rank::Number(8),
        Rank::Number(9),
        Rank::Reverse,
        Rank::Skip,
        Rank::DrawTwo,
    ];

    /// Position of the rank in catalog order (0..=14).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Rank::Number(value) => {
                debug_assert!(value <= MAX_NUMBER);
                value as usize
            }
            Rank::Reverse => 10,
            Rank::Skip => 11,
            Rank::DrawTwo => 12,
            Rank::Wild => 13,
            Rank::WildDrawFour => 14,
        }
    }

    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Rank::Wild | Rank::WildDrawFour)
    }

    #[inline]
    pub fn is_action(self) -> bool {
        matches!(self, Rank::Reverse | Rank::Skip | Rank::DrawTwo)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Number(value) => write!(f, "{value}"),
            Rank::Reverse => f.write_str("Reverse"),
            Rank::Skip => f.write_str("Skip"),
            Rank::DrawTwo => f.write_str("+2"),
            Rank::Wild => f.write_str("Wild"),
            Rank::WildDrawFour => f.write_str("Wild +4"),
        }
    }
}

pub const MAX_NUMBER: u8 = 9;
pub const COLORED_RANKS: usize = 13;
/// Number of distinct logical cards; every id fits in a `u64` bitmask.
pub const CATALOG_SIZE: usize = 54;
pub const DECK_SIZE: usize = 108;
pub const WILD_COPIES: usize = 4;
pub const MAX_HAND_SIZE: usize = 14;
pub const INITIAL_HAND_SIZE: usize = 7;
pub const SEAT_COUNT: usize = 4;

const WILD_ID: u8 = 52;
const WILD_DRAW_FOUR_ID: u8 = 53;

/// A single logical card. Colored iff the rank is not a wild kind.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    color: Option<Color>,
    rank: Rank,
}

/// Wire shape of [`Card`], checked before it becomes a card.
#[derive(Deserialize)]
struct RawCard {
    color: Option<Color>,
    rank: Rank,
}

impl TryFrom<RawCard> for Card {
    type Error = &'static str;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        match (raw.color, raw.rank) {
            (None, Rank::Wild) => Ok(Self::wild()),
            (None, Rank::WildDrawFour) => Ok(Self::wild_draw_four()),
            (None, _) => Err("colored rank without a color"),
            (Some(color), rank) => {
                Self::new(color, rank).ok_or("invalid rank for a colored card")
            }
        }
    }
}

impl Card {
    /// Colored card. Returns `None` for wild ranks or numerals above nine.
    pub fn new(color: Color, rank: Rank) -> Option<Self> {
        match rank {
            Rank::Wild | Rank::WildDrawFour => None,
            Rank::Number(value) if value > MAX_NUMBER => None,
            _ => Some(Self {
                color: Some(color),
                rank,
            }),
        }
    }

    pub const fn number(color: Color, value: u8) -> Self {
        assert!(value <= MAX_NUMBER);
        Self {
            color: Some(color),
            rank: Rank::Number(value),
        }
    }

    pub const fn reverse(color: Color) -> Self {
        Self {
            color: Some(color),
            rank: Rank::Reverse,
        }
    }

    pub const fn skip(color: Color) -> Self {
        Self {
            color: Some(color),
            rank: Rank::Skip,
        }
    }

    pub const fn draw_two(color: Color) -> Self {
        Self {
            color: Some(color),
            rank: Rank::DrawTwo,
        }
    }

    pub const fn wild() -> Self {
        Self {
            color: None,
            rank: Rank::Wild,
        }
    }

    pub const fn wild_draw_four() -> Self {
        Self {
            color: None,
            rank: Rank::WildDrawFour,
        }
    }

    #[inline]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[inline]
    pub fn is_wild(&self) -> bool {
        self.color.is_none()
    }

    /// Catalog identity used for sorting and legality bit indexing.
    #[inline]
    pub fn id(&self) -> u8 {
        match (self.color, self.rank) {
            (_, Rank::Wild) => WILD_ID,
            (_, Rank::WildDrawFour) => WILD_DRAW_FOUR_ID,
            (Some(color), rank) => (color.index() * COLORED_RANKS + rank.index()) as u8,
            (None, _) => unreachable!("colored rank without a color"),
        }
    }

    /// Inverse of [`Card::id`].
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            WILD_ID => Some(Self::wild()),
            WILD_DRAW_FOUR_ID => Some(Self::wild_draw_four()),
            _ => {
                let id = id as usize;
                let color = Color::from_index(id / COLORED_RANKS)?;
                Self::new(color, Rank::COLORED[id % COLORED_RANKS])
            }
        }
    }

    /// Points the card is worth when left in a losing hand.
    pub fn score(&self) -> u32 {
        match self.rank {
            Rank::Number(value) => value as u32,
            Rank::Reverse | Rank::Skip | Rank::DrawTwo => 20,
            Rank::Wild | Rank::WildDrawFour => 50,
        }
    }

    /// Physical copies of this card in a full deck.
    pub fn copies(&self) -> usize {
        match self.rank {
            Rank::Number(0) => 1,
            Rank::Wild | Rank::WildDrawFour => WILD_COPIES,
            _ => 2,
        }
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id().cmp(&other.id())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{color} {}", self.rank),
            None => write!(f, "{}", self.rank),
        }
    }
}

/// The 54 distinct cards in id order.
pub fn catalog() -> Vec<Card> {
    (0..CATALOG_SIZE as u8).filter_map(Card::from_id).collect()
}

/// Builds a full 108-card deck in deterministic order (unshuffled).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for card in catalog() {
        deck.extend(std::iter::repeat(card).take(card.copies()));
    }
    deck
}

/// Sum of the card scores in a hand.
pub fn hand_score(hand: &[Card]) -> u32 {
    hand.iter().map(Card::score).sum()
}
