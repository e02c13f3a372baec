//! Playable-card bitmask. Bit `i` is set iff catalog id `i` may be played.
//!
//! The mask is a closed-form projection of the active color, the active rank
//! and the pending draw-two stack; it never looks at a hand.

use serde::{Deserialize, Serialize};

use crate::card::{COLORED_RANKS, Card, Color, Rank};

/// All thirteen ranks of the first color.
const COLOR_BLOCK: u64 = (1 << COLORED_RANKS) - 1;
/// Rank 0 of every color; shift left by a rank index to select that rank.
const RANK_COLUMN: u64 = 1 | 1 << 13 | 1 << 26 | 1 << 39;
/// Wild (52) and wild draw four (53).
const WILD_BITS: u64 = 0b11 << 52;
/// Draw-two ids 12, 25, 38, 51.
const DRAW_TWO_BITS: u64 = RANK_COLUMN << 12;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LegalityMask(u64);

impl LegalityMask {
    /// Mask for the card on top of the recent window.
    ///
    /// `color` is the active color (the declared one for wild cards).
    pub fn compute(color: Color, rank: Rank, pending_draw: u32) -> Self {
        if pending_draw > 0 {
            return Self(DRAW_TWO_BITS);
        }
        let same_color = COLOR_BLOCK << (COLORED_RANKS * color.index());
        if rank.is_wild() {
            Self(same_color | WILD_BITS)
        } else {
            Self(same_color | RANK_COLUMN << rank.index() | WILD_BITS)
        }
    }

    #[inline]
    pub fn allows(self, card: Card) -> bool {
        self.0 >> card.id() & 1 == 1
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn count_ones(self) -> u32 {
        self.0.count_ones()
    }

    pub fn only_draw_two(self) -> bool {
        self.0 == DRAW_TWO_BITS
    }
}
