//! Heuristic decision engine.
//!
//! Every decision reads a single [`GameStateView`] and walks a fixed priority
//! list; there is no search and no sampling of hidden cards. Randomness only
//! breaks color ties and comes from the caller's RNG.

use std::cmp::Reverse;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::{Action, PlayerId};
use crate::card::{Card, Color, MAX_HAND_SIZE, Rank, SEAT_COUNT};
use crate::state::{Difficulty, GameSettings, GameStateView, GameStatus, SeatPublicState};

/// Either seat in a wild draw four challenge holding this many cards has
/// little to lose by challenging.
pub const CHALLENGE_HAND_SIZE: usize = 10;

/// Priority ordering used to pick a card.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum AiMode {
    /// Sheds numerals first and only reacts to the next seat.
    Easy,
    /// Reacts to any opponent one card away from winning.
    Hard,
    /// Hard, plus hand swaps on seven and hand rotation on zero.
    SevenZero,
    /// Hard, plus feeding the teammate sitting opposite.
    Team,
}

impl AiMode {
    pub fn for_settings(settings: &GameSettings) -> Self {
        if settings.rules.seven_zero {
            AiMode::SevenZero
        } else if settings.rules.team {
            AiMode::Team
        } else {
            match settings.difficulty {
                Difficulty::Easy => AiMode::Easy,
                Difficulty::Hard => AiMode::Hard,
            }
        }
    }
}

/// Card to play and the color that should follow it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub hand_index: usize,
    pub color: Color,
}

impl Decision {
    pub fn into_action(self) -> Action {
        Action::Play {
            hand_index: self.hand_index,
            color: Some(self.color),
        }
    }
}

fn color_weight(rank: Rank) -> u32 {
    match rank {
        Rank::Number(0) | Rank::Reverse => 2,
        Rank::Skip | Rank::DrawTwo => 5,
        Rank::Number(_) => 4,
        Rank::Wild | Rank::WildDrawFour => 0,
    }
}

/// Seats other than the viewer, starting with the next one to play.
fn turn_order(view: &GameStateView) -> Vec<PlayerId> {
    let ring = view.ring();
    let mut order = Vec::with_capacity(SEAT_COUNT - 1);
    let mut seat = ring.next_of(view.self_player);
    while seat != view.self_player && order.len() < SEAT_COUNT - 1 {
        order.push(seat);
        seat = ring.next_of(seat);
    }
    order
}

/// Opponents in turn order.
fn opponents_in_turn_order(view: &GameStateView) -> Vec<&SeatPublicState> {
    turn_order(view)
        .into_iter()
        .filter(|seat| view.is_opponent(*seat))
        .filter_map(|seat| view.player(seat))
        .collect()
}

/// Color to declare after a wild card.
pub fn best_color<R: Rng + ?Sized>(view: &GameStateView, rng: &mut R) -> Color {
    debug_assert!(
        matches!(view.status, GameStatus::Ongoing),
        "no decisions once the round is over"
    );
    let mut scores = [0u32; 4];
    for card in &view.hand {
        if let Some(color) = card.color() {
            scores[color.index()] += color_weight(card.rank());
        }
    }
    let top = scores.iter().copied().max().unwrap_or(0);
    let tied: Vec<Color> = Color::ALL
        .into_iter()
        .filter(|color| scores[color.index()] == top)
        .collect();
    let mut choice = match tied.as_slice() {
        [only] => *only,
        _ => break_color_tie(view, &tied, rng),
    };

    let excluded: Vec<Color> = opponents_in_turn_order(view)
        .into_iter()
        .filter(|player| player.hand_size == 1)
        .filter_map(|player| player.strong_color)
        .collect();
    if excluded.contains(&choice) {
        let allowed: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|color| !excluded.contains(color))
            .collect();
        if let Some(color) = allowed.choose(rng) {
            choice = *color;
        }
    }
    choice
}

fn break_color_tie<R: Rng + ?Sized>(view: &GameStateView, tied: &[Color], rng: &mut R) -> Color {
    let mut opponents = opponents_in_turn_order(view);
    opponents.sort_by_key(|player| player.hand_size);
    if let Some(weak) = opponents
        .iter()
        .filter_map(|player| player.weak_color)
        .find(|color| tied.contains(color))
    {
        return weak;
    }
    let most_played = tied
        .iter()
        .map(|color| view.color_plays[color.index()])
        .max()
        .unwrap_or(0);
    let leaders: Vec<Color> = tied
        .iter()
        .copied()
        .filter(|color| view.color_plays[color.index()] == most_played)
        .collect();
    leaders.choose(rng).copied().unwrap_or(Color::Red)
}

/// Legal cards of the viewer's hand sorted into buckets.
struct Options<'a> {
    hand: &'a [Card],
    best: Color,
    rank_plays: &'a [u32; 15],
    draw_two: Vec<usize>,
    skip: Vec<usize>,
    reverse: Vec<usize>,
    wild: Vec<usize>,
    wild_draw_four: Vec<usize>,
    /// Zeros and sevens, kept apart only in seven-zero mode.
    zero: Vec<usize>,
    seven: Vec<usize>,
    numbers: Vec<usize>,
}

impl<'a> Options<'a> {
    fn collect(view: &'a GameStateView, best: Color, split_seven_zero: bool) -> Self {
        let mut options = Options {
            hand: &view.hand,
            best,
            rank_plays: &view.rank_plays,
            draw_two: Vec::new(),
            skip: Vec::new(),
            reverse: Vec::new(),
            wild: Vec::new(),
            wild_draw_four: Vec::new(),
            zero: Vec::new(),
            seven: Vec::new(),
            numbers: Vec::new(),
        };
        for (slot, card) in view.hand.iter().enumerate() {
            if !view.is_legal(*card) {
                continue;
            }
            let bucket = match card.rank() {
                Rank::DrawTwo => &mut options.draw_two,
                Rank::Skip => &mut options.skip,
                Rank::Reverse => &mut options.reverse,
                Rank::Wild => &mut options.wild,
                Rank::WildDrawFour => &mut options.wild_draw_four,
                Rank::Number(0) if split_seven_zero => &mut options.zero,
                Rank::Number(7) if split_seven_zero => &mut options.seven,
                Rank::Number(_) => &mut options.numbers,
            };
            bucket.push(slot);
        }
        options
    }

    /// Best-color cards first, then higher scores, then ranks already seen
    /// more often, then lower slots.
    fn pick(&self, slots: &[usize]) -> Option<usize> {
        slots.iter().copied().max_by_key(|slot| {
            let card = self.hand[*slot];
            let seen = self.rank_plays[card.rank().index()];
            (card.color() == Some(self.best), card.score(), seen, Reverse(*slot))
        })
    }

    fn pick_in(&self, slots: &[usize], color: Color) -> Option<usize> {
        let matching: Vec<usize> = slots
            .iter()
            .copied()
            .filter(|slot| self.hand[*slot].color() == Some(color))
            .collect();
        self.pick(&matching)
    }

    /// Cards that do not leave `avoid` as the color to follow.
    fn pick_avoiding(&self, slots: &[usize], avoid: Option<Color>) -> Option<usize> {
        let Some(avoid) = avoid else {
            return self.pick(slots);
        };
        let other: Vec<usize> = slots
            .iter()
            .copied()
            .filter(|slot| self.hand[*slot].color() != Some(avoid))
            .collect();
        self.pick(&other)
    }

    fn actions(&self) -> Vec<usize> {
        let mut slots = self.draw_two.clone();
        slots.extend(&self.skip);
        slots.extend(&self.reverse);
        slots
    }
}

/// Neighbors of the viewing seat and what is known about them.
struct Table<'a> {
    view: &'a GameStateView,
    next: PlayerId,
    oppo: PlayerId,
    prev: PlayerId,
}

impl<'a> Table<'a> {
    fn read(view: &'a GameStateView) -> Self {
        let ring = view.ring();
        let me = view.self_player;
        Self {
            view,
            next: ring.next_of(me),
            oppo: ring.oppo_of(me),
            prev: ring.prev_of(me),
        }
    }

    fn size(&self, seat: PlayerId) -> usize {
        self.view.hand_size_of(seat)
    }

    fn strong(&self, seat: PlayerId) -> Option<Color> {
        self.view.player(seat).and_then(|player| player.strong_color)
    }

    /// An opponent one card away from winning.
    fn threat(&self, seat: PlayerId) -> bool {
        seat != self.view.self_player && self.size(seat) == 1 && self.view.is_opponent(seat)
    }

    fn own_size(&self) -> usize {
        self.view.hand.len()
    }

    fn smallest_opponent_hand(&self) -> usize {
        self.view
            .opponents()
            .map(|player| player.hand_size)
            .min()
            .unwrap_or(0)
    }
}

/// Card to play, or `None` when the seat should draw instead.
pub fn best_card<R: Rng + ?Sized>(
    view: &GameStateView,
    mode: AiMode,
    rng: &mut R,
) -> Option<Decision> {
    debug_assert!(
        matches!(view.status, GameStatus::Ongoing),
        "no decisions once the round is over"
    );
    if let [card] = view.hand.as_slice() {
        if !view.is_legal(*card) {
            return None;
        }
        let color = card.color().unwrap_or_else(|| best_color(view, rng));
        return Some(Decision {
            hand_index: 0,
            color,
        });
    }

    let best = best_color(view, rng);
    let table = Table::read(view);
    let options = Options::collect(view, best, mode == AiMode::SevenZero);
    let slot = match mode {
        AiMode::Easy => easy(&options, &table),
        AiMode::Hard => hard(&options, &table),
        AiMode::SevenZero => seven_zero(&options, &table),
        AiMode::Team => team(&options, &table),
    }?;
    let card = view.hand[slot];
    let color = match card.color() {
        Some(own) => own,
        None if mode == AiMode::Team
            && !table.threat(table.next)
            && table.size(table.oppo) == 1 =>
        {
            table.strong(table.oppo).unwrap_or(best)
        }
        None => best,
    };
    trace!(?mode, slot, card = %card, %color, "card chosen");
    Some(Decision {
        hand_index: slot,
        color,
    })
}

fn easy(options: &Options<'_>, table: &Table<'_>) -> Option<usize> {
    if table.threat(table.next) {
        if let Some(slot) = options
            .pick(&options.draw_two)
            .or_else(|| options.pick(&options.skip))
        {
            return Some(slot);
        }
    }
    options
        .pick(&options.numbers)
        .or_else(|| options.pick(&options.actions()))
        .or_else(|| options.pick(&options.wild))
        .or_else(|| options.pick(&options.wild_draw_four))
}

fn hard(options: &Options<'_>, table: &Table<'_>) -> Option<usize> {
    if table.threat(table.next) {
        // Make the next seat draw or lose its turn, otherwise move away
        // from the color it is known to hold.
        let strong = table.strong(table.next);
        let reverse = if table.threat(table.prev) {
            None
        } else {
            options.pick(&options.reverse)
        };
        return options
            .pick(&options.draw_two)
            .or_else(|| options.pick(&options.skip))
            .or(reverse)
            .or_else(|| options.pick(&options.wild_draw_four))
            .or_else(|| options.pick(&options.wild))
            .or_else(|| options.pick_avoiding(&options.numbers, strong))
            .or_else(|| options.pick(&options.numbers));
    }
    if table.threat(table.prev) {
        // Reversing would hand the previous seat the turn.
        let strong = table.strong(table.prev);
        return options
            .pick_avoiding(&options.numbers, strong)
            .or_else(|| options.pick_avoiding(&options.skip, strong))
            .or_else(|| options.pick_avoiding(&options.draw_two, strong))
            .or_else(|| options.pick(&options.wild))
            .or_else(|| options.pick(&options.wild_draw_four))
            .or_else(|| options.pick(&options.numbers))
            .or_else(|| options.pick(&options.skip))
            .or_else(|| options.pick(&options.draw_two));
    }
    if table.threat(table.oppo) {
        // Skips and penalties on the next seat bring the opposite seat closer.
        let strong = table.strong(table.oppo);
        return options
            .pick_avoiding(&options.numbers, strong)
            .or_else(|| options.pick(&options.reverse))
            .or_else(|| options.pick(&options.wild))
            .or_else(|| options.pick(&options.numbers))
            .or_else(|| options.pick(&options.wild_draw_four))
            .or_else(|| options.pick(&options.actions()));
    }
    default_order(options, table)
}

fn default_order(options: &Options<'_>, table: &Table<'_>) -> Option<usize> {
    let best = options.best;
    let actions = options.actions();
    let colored = options
        .pick_in(&options.numbers, best)
        .or_else(|| options.pick_in(&actions, best))
        .or_else(|| options.pick(&options.numbers))
        .or_else(|| options.pick(&actions));
    if colored.is_some() {
        return colored;
    }
    if table.own_size() >= MAX_HAND_SIZE {
        options
            .pick(&options.wild_draw_four)
            .or_else(|| options.pick(&options.wild))
    } else {
        options
            .pick(&options.wild)
            .or_else(|| options.pick(&options.wild_draw_four))
    }
}

fn seven_zero(options: &Options<'_>, table: &Table<'_>) -> Option<usize> {
    // Cards left after playing the seven or zero itself.
    let remaining = table.own_size().saturating_sub(1);
    let seven = options.pick(&options.seven);
    let zero = options.pick(&options.zero);
    let opponent_near_win = table.view.opponents().any(|player| player.hand_size == 1);

    // A swap takes the near-winning hand; a rotation hands the next seat ours.
    if opponent_near_win && remaining > 1 {
        if seven.is_some() {
            return seven;
        }
        if table.threat(table.next) && zero.is_some() {
            return zero;
        }
    }
    if remaining > table.smallest_opponent_hand() + 1 && seven.is_some() {
        return seven;
    }
    let receives = table.size(table.prev);
    if remaining > receives + 1 && zero.is_some() {
        return zero;
    }
    hard(options, table)
}

fn team(options: &Options<'_>, table: &Table<'_>) -> Option<usize> {
    let teammate = table.oppo;
    let teammate_close = !table.view.is_opponent(teammate)
        && teammate != table.view.self_player
        && table.size(teammate) == 1;
    if teammate_close && !table.threat(table.next) {
        // Keep the next seat from playing so the teammate moves sooner.
        let helper = table
            .strong(teammate)
            .and_then(|color| options.pick_in(&options.numbers, color));
        if let Some(slot) = options
            .pick(&options.skip)
            .or_else(|| options.pick(&options.draw_two))
            .or_else(|| options.pick(&options.wild_draw_four))
            .or(helper)
            .or_else(|| options.pick(&options.wild))
        {
            return Some(slot);
        }
    }
    hard(options, table)
}

/// Whether the current seat should dispute the wild draw four just played.
pub fn need_to_challenge(view: &GameStateView) -> bool {
    debug_assert!(
        matches!(view.status, GameStatus::Ongoing),
        "no decisions once the round is over"
    );
    let challenged = view.ring().prev_of(view.self_player);
    let own = view.hand.len();
    let theirs = view.hand_size_of(challenged);
    let color_kept = matches!(
        (view.last_color(), view.second_last_color()),
        (Some(now), Some(before)) if now == before
    );
    own == 1 || own >= CHALLENGE_HAND_SIZE || theirs >= CHALLENGE_HAND_SIZE || color_kept
}

/// Seat to exchange hands with after playing a seven.
pub fn best_swap_target(view: &GameStateView) -> PlayerId {
    debug_assert!(
        matches!(view.status, GameStatus::Ongoing),
        "no decisions once the round is over"
    );
    let order = turn_order(view);
    let Some(&next) = order.first() else {
        return view.self_player;
    };
    // Our last card would win for whoever receives it right after us.
    let hands_next_the_win = matches!(view.hand.as_slice(), [last] if view.is_legal(*last));
    let candidates: Vec<&SeatPublicState> = order
        .iter()
        .copied()
        .filter(|seat| !(hands_next_the_win && *seat == next))
        .filter_map(|seat| view.player(seat))
        .collect();

    let active = view.last_color();
    let target = candidates
        .iter()
        .find(|player| player.hand_size == 1 && view.is_opponent(player.id))
        .or_else(|| {
            candidates.iter().find(|player| {
                player.strong_color.is_some()
                    && player.strong_color == active
                    && view.is_opponent(player.id)
            })
        })
        .or_else(|| candidates.first())
        .map_or(next, |player| player.id);
    trace!(target, "swap target chosen");
    target
}
