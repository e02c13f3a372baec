use std::array::from_fn;
use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::action::{Action, HUMAN, PlayerId};
use crate::ai::{self, AiMode, Decision};
use crate::card::{Card, Color, Rank, SEAT_COUNT, full_deck, hand_score};
use crate::error::{GameError, InvalidAction};
use crate::legality::LegalityMask;
use crate::player::PlayerState;
use crate::state::{
    Difficulty, GameSettings, GameStateView, GameStatus, PlayedCard, Rules, SeatPublicState,
    TurnPhase,
};
use crate::turn::{Direction, SeatRing};

const DEFAULT_SEED: u64 = 0x0DEC_AF00_5EED_CAFE;
/// Played cards kept visible before they move to the used pile.
pub const RECENT_WINDOW: usize = 5;
const DRAW_TWO_PENALTY: u32 = 2;
const DRAW_FOUR_PENALTY: u32 = 4;
const FAILED_CHALLENGE_PENALTY: u32 = 6;

/// Configuration required to bootstrap a game instance.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub settings: GameSettings,
    pub seed: u64,
}

impl GameConfig {
    pub fn new(seat_count: usize, seed: u64) -> Result<Self, GameError> {
        Ok(Self {
            settings: GameSettings::new(seat_count)?,
            seed,
        })
    }
}

/// Builder that enables deterministic deck injection for testing.
pub struct GameBuilder {
    config: GameConfig,
    deck: Option<Vec<Card>>,
    first_player: Option<PlayerId>,
}

impl GameBuilder {
    pub fn new(seat_count: usize) -> Result<Self, GameError> {
        Ok(Self {
            config: GameConfig::new(seat_count, DEFAULT_SEED)?,
            deck: None,
            first_player: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Checked again by [`GameBuilder::build`].
    pub fn with_seat_count(mut self, seat_count: usize) -> Self {
        self.config.settings.seat_count = seat_count;
        self
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.config.settings.rules = rules;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.config.settings.difficulty = difficulty;
        self
    }

    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.config.settings.autopilot = autopilot;
        self
    }

    /// Deal order for the first round. The top of the deck is the last
    /// element; each seated seat takes its whole hand in turn, seat 0 first.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Seat that starts the first round instead of a random dealer.
    pub fn with_first_player(mut self, seat: PlayerId) -> Self {
        self.first_player = Some(seat);
        self
    }

    /// Override the number of cards dealt to each seat (7 by default).
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.config.settings.hand_size = hand_size;
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        Game::from_builder(self)
    }
}

/// Core match engine: one table, one seeded RNG, commands run to completion.
pub struct Game {
    settings: GameSettings,
    status: GameStatus,
    phase: TurnPhase,
    ring: SeatRing,
    current_player: PlayerId,
    players: [PlayerState; SEAT_COUNT],
    deck: Vec<Card>,
    used: Vec<Card>,
    recent: VecDeque<PlayedCard>,
    pending_draw: u32,
    legality: LegalityMask,
    color_plays: [u32; 4],
    rank_plays: [u32; 15],
    scores: [i32; SEAT_COUNT],
    injected_deck: Option<Vec<Card>>,
    injected_first: Option<PlayerId>,
    rng: StdRng,
}

impl Game {
    pub fn builder(seat_count: usize) -> Result<GameBuilder, GameError> {
        GameBuilder::new(seat_count)
    }

    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        GameBuilder {
            config,
            deck: None,
            first_player: None,
        }
        .build()
    }

    fn from_builder(builder: GameBuilder) -> Result<Self, GameError> {
        let GameBuilder {
            config,
            deck,
            first_player,
        } = builder;
        config.settings.validate()?;
        let ring = SeatRing::new(config.settings.seat_count, Direction::Clockwise);
        if let Some(seat) = first_player.filter(|seat| !ring.is_seated(*seat)) {
            return Err(GameError::InvalidPlayer(seat));
        }
        let mut game = Game {
            settings: config.settings,
            status: GameStatus::Ongoing,
            phase: TurnPhase::AwaitingAction,
            ring,
            current_player: HUMAN,
            players: from_fn(|_| PlayerState::new()),
            deck: Vec::new(),
            used: Vec::new(),
            recent: VecDeque::with_capacity(RECENT_WINDOW + 1),
            pending_draw: 0,
            legality: LegalityMask::default(),
            color_plays: [0; 4],
            rank_plays: [0; 15],
            scores: [0; SEAT_COUNT],
            injected_deck: deck,
            injected_first: first_player,
            rng: StdRng::seed_from_u64(config.seed),
        };
        game.start()?;
        Ok(game)
    }

    /// Reset the table and deal a new round. Running scores carry over.
    pub fn start(&mut self) -> Result<(), GameError> {
        let mut deck = match self.injected_deck.take() {
            Some(deck) => deck,
            None => {
                let mut deck = full_deck();
                deck.shuffle(&mut self.rng);
                deck
            }
        };
        let ring = SeatRing::new(self.settings.seat_count, Direction::Clockwise);
        let hand_size = self.settings.hand_size;

        let mut players: [PlayerState; SEAT_COUNT] = from_fn(|_| PlayerState::new());
        for seat in ring.seats() {
            for _ in 0..hand_size {
                let card = deck.pop().ok_or(GameError::InvalidConfiguration(
                    "deck exhausted while dealing hands",
                ))?;
                players[seat].receive(card);
            }
        }
        // Wild cards turned up before the first colored one go to the bottom.
        let Some((pos, color)) = deck
            .iter()
            .enumerate()
            .rev()
            .find_map(|(pos, card)| card.color().map(|color| (pos, color)))
        else {
            return Err(GameError::InvalidConfiguration(
                "deck has no colored card left for the start card",
            ));
        };
        let recycled: Vec<Card> = deck.drain(pos + 1..).collect();
        let card = deck.remove(pos);
        deck.splice(0..0, recycled);
        let start = PlayedCard { card, color };

        self.ring = ring;
        self.players = players;
        self.deck = deck;
        self.used.clear();
        self.recent.clear();
        self.recent.push_back(start);
        self.pending_draw = 0;
        self.color_plays = [0; 4];
        self.rank_plays = [0; 15];
        self.status = GameStatus::Ongoing;
        self.phase = TurnPhase::AwaitingAction;
        self.current_player = match self.injected_first.take() {
            Some(seat) => seat,
            None => loop {
                let seat = self.rng.gen_range(0..SEAT_COUNT);
                if self.ring.is_seated(seat) {
                    break seat;
                }
            },
        };
        self.refresh_legality();
        debug!(
            seats = self.settings.seat_count,
            dealer = self.current_player,
            start = %start.card,
            "round started"
        );
        Ok(())
    }

    /// Replace the configuration and restart the round.
    pub fn update_settings(&mut self, settings: GameSettings) -> Result<(), GameError> {
        settings.validate()?;
        self.settings = settings;
        self.start()
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn_phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Finished { winner } => Some(winner),
            GameStatus::Ongoing => None,
        }
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    pub fn next_player(&self) -> PlayerId {
        self.ring.next_of(self.current_player)
    }

    pub fn prev_player(&self) -> PlayerId {
        self.ring.prev_of(self.current_player)
    }

    pub fn oppo_player(&self) -> PlayerId {
        self.ring.oppo_of(self.current_player)
    }

    pub fn ring(&self) -> SeatRing {
        self.ring
    }

    pub fn direction(&self) -> Direction {
        self.ring.direction()
    }

    pub fn is_legal(&self, card: Card) -> bool {
        self.legality.allows(card)
    }

    pub fn legality(&self) -> LegalityMask {
        self.legality
    }

    pub fn legal_count(&self, seat: PlayerId) -> Result<usize, GameError> {
        Ok(self
            .hand(seat)?
            .iter()
            .filter(|card| self.legality.allows(**card))
            .count())
    }

    pub fn pending_draw(&self) -> u32 {
        self.pending_draw
    }

    pub fn active_card(&self) -> Option<PlayedCard> {
        self.recent.back().copied()
    }

    pub fn recent(&self) -> impl Iterator<Item = &PlayedCard> + '_ {
        self.recent.iter()
    }

    pub fn last_color(&self) -> Option<Color> {
        self.recent.back().map(|played| played.color)
    }

    /// Color that was active before the current card.
    pub fn second_last_color(&self) -> Option<Color> {
        self.recent
            .len()
            .checked_sub(2)
            .map(|idx| self.recent[idx].color)
    }

    pub fn deck_count(&self) -> usize {
        self.deck.len()
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    pub fn scores(&self) -> [i32; SEAT_COUNT] {
        self.scores
    }

    pub fn hand(&self, seat: PlayerId) -> Result<&[Card], GameError> {
        self.check_seat(seat)?;
        Ok(&self.players[seat].hand)
    }

    pub fn hand_score(&self, seat: PlayerId) -> Result<u32, GameError> {
        Ok(hand_score(self.hand(seat)?))
    }

    pub fn strong_color(&self, seat: PlayerId) -> Result<Option<Color>, GameError> {
        self.check_seat(seat)?;
        Ok(self.players[seat].strong_color)
    }

    pub fn weak_color(&self, seat: PlayerId) -> Result<Option<Color>, GameError> {
        self.check_seat(seat)?;
        Ok(self.players[seat].weak_color)
    }

    pub fn recent_play(&self, seat: PlayerId) -> Result<Option<Card>, GameError> {
        self.check_seat(seat)?;
        Ok(self.players[seat].recent_play)
    }

    /// Whether the human seat knows the card in `slot` of `seat`'s hand.
    pub fn is_open(&self, seat: PlayerId, slot: usize) -> Result<bool, GameError> {
        self.check_seat(seat)?;
        let player = &self.players[seat];
        if seat == HUMAN {
            return Ok(slot < player.hand.len());
        }
        Ok(player.known.is_open(&player.hand, slot))
    }

    pub fn state_view(&self, perspective: PlayerId) -> Result<GameStateView, GameError> {
        self.check_seat(perspective)?;
        let players = self
            .ring
            .seats()
            .map(|id| {
                let player = &self.players[id];
                SeatPublicState {
                    id,
                    hand_size: player.hand.len(),
                    strong_color: player.strong_color,
                    weak_color: player.weak_color,
                    recent_play: player.recent_play,
                    open_cards: self.open_cards(id),
                    score: self.scores[id],
                    is_current: id == self.current_player,
                }
            })
            .collect();

        Ok(GameStateView {
            settings: self.settings,
            phase: self.phase,
            status: self.status,
            self_player: perspective,
            current_player: self.current_player,
            direction: self.ring.direction(),
            deck_count: self.deck.len(),
            used_count: self.used.len(),
            pending_draw: self.pending_draw,
            legality: self.legality,
            recent: self.recent.iter().copied().collect(),
            color_plays: self.color_plays,
            rank_plays: self.rank_plays,
            players,
            hand: self.players[perspective].hand.clone(),
        })
    }

    fn open_cards(&self, seat: PlayerId) -> Vec<Card> {
        let player = &self.players[seat];
        player
            .hand
            .iter()
            .enumerate()
            .filter(|(slot, _)| seat == HUMAN || player.known.is_open(&player.hand, *slot))
            .map(|(_, card)| *card)
            .collect()
    }

    /// Take one card, or the whole pending draw-two stack, into `seat`'s hand.
    ///
    /// Returns the slot of the last card drawn, `None` when the hand is full
    /// (which also clears a pending stack) or nothing is left to draw.
    pub fn draw(&mut self, seat: PlayerId, forced: bool) -> Result<Option<usize>, GameError> {
        self.check_seat(seat)?;
        self.ensure_ongoing()?;
        let count = if self.pending_draw > 0 {
            std::mem::take(&mut self.pending_draw)
        } else {
            if !forced {
                if let Some(active) = self.last_color() {
                    self.players[seat].note_voluntary_draw(active);
                }
            }
            1
        };
        let slot = self.draw_cards(seat, count);
        self.players[seat].recent_play = None;
        self.refresh_legality();
        debug!(seat, count, ?slot, "cards drawn");
        Ok(slot)
    }

    fn draw_cards(&mut self, seat: PlayerId, count: u32) -> Option<usize> {
        let mut last = None;
        for _ in 0..count {
            if self.players[seat].is_full() {
                debug!(seat, "hand full, draw dropped");
                break;
            }
            let Some(card) = self.take_from_deck() else {
                break;
            };
            last = Some(self.players[seat].receive(card));
        }
        last
    }

    fn penalize(&mut self, seat: PlayerId, count: u32) {
        self.draw_cards(seat, count);
        self.players[seat].recent_play = None;
        self.refresh_legality();
        debug!(seat, count, "penalty drawn");
    }

    fn take_from_deck(&mut self) -> Option<Card> {
        if self.deck.is_empty() {
            if self.used.is_empty() {
                return None;
            }
            self.used.shuffle(&mut self.rng);
            self.deck.append(&mut self.used);
            debug!(cards = self.deck.len(), "used pile reshuffled into deck");
        }
        self.deck.pop()
    }

    /// Play the card in `slot`. `color` is required for wild cards.
    ///
    /// Returns `None` (hand untouched) when the slot is empty or the card is
    /// not legal right now.
    pub fn play(
        &mut self,
        seat: PlayerId,
        slot: usize,
        color: Option<Color>,
    ) -> Result<Option<Card>, GameError> {
        self.check_seat(seat)?;
        self.ensure_ongoing()?;
        let Some(card) = self.players[seat].hand.get(slot).copied() else {
            return Ok(None);
        };
        if !self.legality.allows(card) {
            return Ok(None);
        }
        let declared = match card.color() {
            Some(own) => own,
            None => color.ok_or(InvalidAction::ColorRequired)?,
        };

        let player = &mut self.players[seat];
        player.take(slot);
        player.note_play(card, declared);
        self.recent.push_back(PlayedCard {
            card,
            color: declared,
        });
        if self.recent.len() > RECENT_WINDOW {
            if let Some(old) = self.recent.pop_front() {
                self.used.push(old.card);
            }
        }
        self.color_plays[declared.index()] += 1;
        self.rank_plays[card.rank().index()] += 1;
        if card.rank() == Rank::DrawTwo && self.settings.rules.stack_draw_two {
            self.pending_draw += DRAW_TWO_PENALTY;
        }
        debug!(seat, card = %card, color = %declared, "card played");

        if self.players[seat].hand.is_empty() {
            self.finish_round(seat);
        }
        self.refresh_legality();
        Ok(Some(card))
    }

    /// Dispute the wild draw four played by the seat before `challenger`.
    ///
    /// The challenged hand is revealed. Returns true when it held a card of
    /// the color active before the wild draw four.
    pub fn challenge(&mut self, challenger: PlayerId) -> Result<bool, GameError> {
        self.check_seat(challenger)?;
        self.ensure_ongoing()?;
        let challenged = self.ring.prev_of(challenger);
        let before = self.second_last_color();
        self.reveal(challenged);
        let guilty = before.is_some_and(|color| {
            self.players[challenged]
                .hand
                .iter()
                .any(|card| card.color() == Some(color))
        });
        if guilty {
            self.penalize(challenged, DRAW_FOUR_PENALTY);
        } else {
            self.penalize(challenger, FAILED_CHALLENGE_PENALTY);
        }
        debug!(challenger, challenged, guilty, "challenge resolved");
        Ok(guilty)
    }

    /// Exchange the hands of two seats.
    pub fn swap(&mut self, a: PlayerId, b: PlayerId) -> Result<(), GameError> {
        self.check_seat(a)?;
        self.check_seat(b)?;
        self.ensure_ongoing()?;
        if a == b {
            return Err(InvalidAction::SwapTarget(b).into());
        }
        self.exchange_hands(a, b);
        Ok(())
    }

    fn exchange_hands(&mut self, a: PlayerId, b: PlayerId) {
        let from_a = self.players[a].take_holdings();
        let from_b = self.players[b].take_holdings();
        self.players[a].put_holdings(from_b);
        self.players[b].put_holdings(from_a);
        if a == HUMAN {
            self.reveal(b);
        } else if b == HUMAN {
            self.reveal(a);
        }
        debug!(a, b, "hands swapped");
    }

    /// Pass every hand one seat along the current direction, all at once.
    pub fn cycle(&mut self) -> Result<(), GameError> {
        self.ensure_ongoing()?;
        self.cycle_hands();
        Ok(())
    }

    fn cycle_hands(&mut self) {
        let moves: Vec<_> = self
            .ring
            .seats()
            .map(|seat| (self.ring.next_of(seat), self.players[seat].take_holdings()))
            .collect();
        for (to, holdings) in moves {
            self.players[to].put_holdings(holdings);
        }
        self.reveal(self.ring.next_of(HUMAN));
        debug!(direction = ?self.ring.direction(), "hands cycled");
    }

    /// Advance to the next seat. The only place the current seat changes.
    pub fn switch_turn(&mut self) {
        self.current_player = self.ring.next_of(self.current_player);
    }

    pub fn switch_direction(&mut self) {
        self.ring.set_direction(self.ring.direction().reversed());
    }

    fn reveal(&mut self, seat: PlayerId) {
        let PlayerState { hand, known, .. } = &mut self.players[seat];
        hand.sort();
        known.reveal_all(hand);
    }

    fn finish_round(&mut self, winner: PlayerId) {
        self.status = GameStatus::Finished { winner };
        self.phase = TurnPhase::GameOver;
        self.ring.set_direction(Direction::Stopped);
        let seats: Vec<PlayerId> = self.ring.seats().collect();
        let mut gained = 0;
        for seat in seats {
            self.reveal(seat);
            if seat != winner {
                gained += hand_score(&self.players[seat].hand);
            }
        }
        self.scores[winner] += gained as i32;
        if winner != HUMAN {
            self.scores[HUMAN] -= hand_score(&self.players[HUMAN].hand) as i32;
        }
        info!(winner, gained, "round over");
    }

    fn refresh_legality(&mut self) {
        self.legality = match self.recent.back() {
            Some(active) => {
                LegalityMask::compute(active.color, active.card.rank(), self.pending_draw)
            }
            None => LegalityMask::default(),
        };
        trace!(
            mask = self.legality.bits(),
            pending = self.pending_draw,
            "legality refreshed"
        );
    }

    fn check_seat(&self, seat: PlayerId) -> Result<(), GameError> {
        if self.ring.is_seated(seat) {
            Ok(())
        } else {
            Err(GameError::InvalidPlayer(seat))
        }
    }

    fn ensure_ongoing(&self) -> Result<(), GameError> {
        if self.is_finished() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    pub fn ai_mode(&self) -> AiMode {
        AiMode::for_settings(&self.settings)
    }

    /// Color the current seat should declare, using the match RNG for ties.
    pub fn best_color(&mut self) -> Result<Color, GameError> {
        self.ensure_ongoing()?;
        let view = self.state_view(self.current_player)?;
        Ok(ai::best_color(&view, &mut self.rng))
    }

    /// Card the current seat should play, `None` meaning draw.
    pub fn best_card(&mut self) -> Result<Option<Decision>, GameError> {
        self.ensure_ongoing()?;
        let view = self.state_view(self.current_player)?;
        Ok(ai::best_card(&view, self.ai_mode(), &mut self.rng))
    }

    pub fn need_to_challenge(&self) -> Result<bool, GameError> {
        self.ensure_ongoing()?;
        let view = self.state_view(self.current_player)?;
        Ok(ai::need_to_challenge(&view))
    }

    pub fn best_swap_target(&self) -> Result<PlayerId, GameError> {
        self.ensure_ongoing()?;
        let view = self.state_view(self.current_player)?;
        Ok(ai::best_swap_target(&view))
    }

    pub fn legal_actions(&self, player: PlayerId) -> Result<Vec<Action>, GameError> {
        if self.is_finished() {
            return Ok(Vec::new());
        }
        self.check_seat(player)?;
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }
        let hand = &self.players[player].hand;
        let mut actions = Vec::new();
        match self.phase {
            TurnPhase::AwaitingAction => {
                for (hand_index, card) in hand.iter().enumerate() {
                    if self.legality.allows(*card) {
                        push_plays(&mut actions, hand_index, *card);
                    }
                }
                actions.push(Action::Draw);
            }
            TurnPhase::DrawnPlayable {
                hand_index,
                must_play,
            } => {
                if let Some(card) = hand.get(hand_index) {
                    push_plays(&mut actions, hand_index, *card);
                }
                if !must_play {
                    actions.push(Action::Pass);
                }
            }
            TurnPhase::AwaitingChallenge => {
                actions.push(Action::Challenge);
                actions.push(Action::Accept);
            }
            TurnPhase::AwaitingSwapTarget => {
                actions.extend(
                    self.ring
                        .seats()
                        .filter(|seat| *seat != player)
                        .map(|target| Action::Swap { target }),
                );
            }
            TurnPhase::GameOver => {}
        }
        Ok(actions)
    }

    /// Apply a turn command for the current seat and resolve its effects.
    pub fn apply_action(&mut self, player: PlayerId, action: Action) -> Result<(), GameError> {
        self.ensure_ongoing()?;
        self.check_seat(player)?;
        if player != self.current_player {
            return Err(GameError::NotPlayersTurn);
        }

        match (self.phase, action) {
            (TurnPhase::AwaitingAction, Action::Play { hand_index, color }) => {
                self.play_turn(player, hand_index, color)
            }
            (
                TurnPhase::DrawnPlayable {
                    hand_index: drawn, ..
                },
                Action::Play { hand_index, color },
            ) if hand_index == drawn => self.play_turn(player, hand_index, color),
            (TurnPhase::AwaitingAction, Action::Draw) => self.draw_turn(player),
            (TurnPhase::DrawnPlayable { must_play: false, .. }, Action::Pass) => {
                self.end_turn();
                Ok(())
            }
            (TurnPhase::AwaitingChallenge, Action::Challenge) => {
                if self.challenge(player)? {
                    self.phase = TurnPhase::AwaitingAction;
                } else {
                    self.end_turn();
                }
                Ok(())
            }
            (TurnPhase::AwaitingChallenge, Action::Accept) => {
                self.penalize(player, DRAW_FOUR_PENALTY);
                self.end_turn();
                Ok(())
            }
            (TurnPhase::AwaitingSwapTarget, Action::Swap { target }) => {
                if target == player || !self.ring.is_seated(target) {
                    return Err(InvalidAction::SwapTarget(target).into());
                }
                self.exchange_hands(player, target);
                self.end_turn();
                Ok(())
            }
            (phase, _) => Err(InvalidAction::UnexpectedAction(phase).into()),
        }
    }

    fn play_turn(
        &mut self,
        player: PlayerId,
        hand_index: usize,
        color: Option<Color>,
    ) -> Result<(), GameError> {
        let card = self.players[player]
            .hand
            .get(hand_index)
            .copied()
            .ok_or(InvalidAction::HandIndex(hand_index))?;
        if !self.legality.allows(card) {
            return Err(InvalidAction::IllegalCard(hand_index).into());
        }
        if self.play(player, hand_index, color)?.is_none() {
            return Err(InvalidAction::IllegalCard(hand_index).into());
        }
        if !self.is_finished() {
            self.resolve_effect(card);
        }
        Ok(())
    }

    fn resolve_effect(&mut self, card: Card) {
        let rules = self.settings.rules;
        match card.rank() {
            Rank::Reverse => {
                self.switch_direction();
                self.end_turn();
            }
            Rank::Skip => {
                self.switch_turn();
                self.end_turn();
            }
            Rank::DrawTwo if !rules.stack_draw_two => {
                let victim = self.next_player();
                self.penalize(victim, DRAW_TWO_PENALTY);
                self.switch_turn();
                self.end_turn();
            }
            Rank::WildDrawFour => {
                self.switch_turn();
                self.phase = TurnPhase::AwaitingChallenge;
            }
            Rank::Number(7) if rules.seven_zero => {
                self.phase = TurnPhase::AwaitingSwapTarget;
            }
            Rank::Number(0) if rules.seven_zero => {
                self.cycle_hands();
                self.end_turn();
            }
            _ => self.end_turn(),
        }
    }

    fn draw_turn(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.pending_draw > 0 {
            self.draw(player, true)?;
            self.end_turn();
            return Ok(());
        }
        let drawn = self
            .draw(player, false)?
            .and_then(|slot| self.players[player].hand.get(slot).map(|card| (slot, *card)));
        let Some((slot, card)) = drawn else {
            self.end_turn();
            return Ok(());
        };
        if !self.legality.allows(card) {
            self.end_turn();
            return Ok(());
        }
        let forced_play = self.settings.rules.forced_play;
        if forced_play && (player != HUMAN || self.settings.autopilot) {
            let color = match card.color() {
                Some(own) => own,
                None => {
                    let view = self.state_view(player)?;
                    ai::best_color(&view, &mut self.rng)
                }
            };
            return self.play_turn(player, slot, Some(color));
        }
        self.phase = TurnPhase::DrawnPlayable {
            hand_index: slot,
            must_play: forced_play,
        };
        Ok(())
    }

    fn end_turn(&mut self) {
        self.switch_turn();
        self.phase = TurnPhase::AwaitingAction;
    }
}

fn push_plays(actions: &mut Vec<Action>, hand_index: usize, card: Card) {
    if card.is_wild() {
        actions.extend(Color::ALL.iter().map(|color| Action::Play {
            hand_index,
            color: Some(*color),
        }));
    } else {
        actions.push(Action::Play {
            hand_index,
            color: None,
        });
    }
}
