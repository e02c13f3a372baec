use unobot::card::{self, DECK_SIZE, MAX_HAND_SIZE};
use unobot::{Card, Color, GameBuilder, GameError, GameStatus, PlayerId, Rules};

/// Deck for an injected deal: `hands` go to the seated seats in ascending
/// order, `start` is turned up next and `draws` follow in draw order.
fn build_deck(hands: &[Vec<Card>], start: Card, draws: &[Card]) -> Vec<Card> {
    let mut deck: Vec<Card> = draws.iter().rev().copied().collect();
    deck.push(start);
    for hand in hands.iter().rev() {
        deck.extend(hand.iter().rev());
    }
    deck
}

fn n(color: Color, value: u8) -> Card {
    Card::number(color, value)
}

fn total_cards(game: &unobot::Game) -> Result<usize, GameError> {
    let mut total = game.deck_count() + game.used_count() + game.recent().count();
    for seat in game.ring().seats() {
        total += game.hand(seat)?.len();
    }
    Ok(total)
}

#[test]
fn same_seed_gives_identical_deal() -> Result<(), GameError> {
    let a = GameBuilder::new(4)?.with_seed(42).build()?;
    let b = GameBuilder::new(4)?.with_seed(42).build()?;
    for seat in 0..4 {
        assert_eq!(a.hand(seat)?, b.hand(seat)?);
    }
    assert_eq!(a.active_card(), b.active_card());
    assert_eq!(a.current_player(), b.current_player());
    Ok(())
}

#[test]
fn start_conserves_cards_and_never_turns_up_a_wild() -> Result<(), GameError> {
    for seat_count in [3, 4] {
        for seed in 0..25 {
            let game = GameBuilder::new(seat_count)?.with_seed(seed).build()?;
            assert_eq!(total_cards(&game)?, DECK_SIZE);
            assert_eq!(game.recent().count(), 1);
            let active = game.active_card().expect("start card");
            assert!(!active.card.is_wild());
            assert_eq!(Some(active.color), active.card.color());
            for seat in game.ring().seats() {
                assert_eq!(game.hand(seat)?.len(), 7);
            }
        }
    }
    Ok(())
}

#[test]
fn three_seat_games_leave_north_empty() -> Result<(), GameError> {
    for seed in 0..20 {
        let game = GameBuilder::new(3)?.with_seed(seed).build()?;
        assert_ne!(game.current_player(), 2);
        assert!(matches!(game.hand(2), Err(GameError::InvalidPlayer(2))));
    }
    Ok(())
}

#[test]
fn wilds_above_the_start_card_move_to_the_bottom() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 2)],
        vec![n(Color::Red, 3)],
        vec![n(Color::Red, 4)],
        vec![n(Color::Red, 6)],
    ];
    let mut deck = vec![
        n(Color::Green, 1),
        n(Color::Blue, 3),
        Card::wild(),
        Card::wild_draw_four(),
    ];
    for hand in hands.iter().rev() {
        deck.extend(hand.iter().rev());
    }
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_first_player(0)
        .with_deck(deck)
        .build()?;
    let active = game.active_card().expect("start card");
    assert_eq!(active.card, n(Color::Blue, 3));
    assert_eq!(game.deck_count(), 3);

    let slot = game.draw(0, false)?.expect("card drawn");
    assert_eq!(game.hand(0)?[slot], n(Color::Green, 1));
    Ok(())
}

#[test]
fn deck_without_colored_card_is_rejected() -> Result<(), GameError> {
    let deck = vec![
        Card::wild(),
        n(Color::Red, 1),
        n(Color::Red, 2),
        n(Color::Red, 3),
        n(Color::Red, 4),
    ];
    let result = GameBuilder::new(4)?.with_hand_size(1).with_deck(deck).build();
    assert!(matches!(result, Err(GameError::InvalidConfiguration(_))));
    Ok(())
}

#[test]
fn invalid_settings_are_rejected() -> Result<(), GameError> {
    assert!(matches!(
        GameBuilder::new(5),
        Err(GameError::InvalidConfiguration(_))
    ));
    let team_of_three = GameBuilder::new(3)?
        .with_rules(Rules {
            team: true,
            ..Rules::default()
        })
        .build();
    assert!(matches!(
        team_of_three,
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameBuilder::new(4)?.with_seat_count(2).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameBuilder::new(3)?.with_first_player(2).build(),
        Err(GameError::InvalidPlayer(2))
    ));
    assert!(matches!(
        GameBuilder::new(4)?.with_hand_size(MAX_HAND_SIZE + 1).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    let full_deal = GameBuilder::new(4)?.with_seed(3).with_hand_size(MAX_HAND_SIZE).build()?;
    for seat in full_deal.ring().seats() {
        assert_eq!(full_deal.hand(seat)?.len(), MAX_HAND_SIZE);
    }
    Ok(())
}

#[test]
fn off_color_card_is_refused_without_touching_the_hand() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 5)],
        vec![n(Color::Green, 1)],
        vec![n(Color::Green, 2)],
        vec![n(Color::Green, 3)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_first_player(0)
        .with_deck(build_deck(&hands, n(Color::Blue, 7), &[]))
        .build()?;
    assert!(!game.is_legal(n(Color::Red, 5)));
    assert_eq!(game.play(0, 0, None)?, None);
    assert_eq!(game.play(0, 3, None)?, None);
    assert_eq!(game.hand(0)?, &[n(Color::Red, 5)]);
    assert_eq!(game.legal_count(0)?, 0);
    Ok(())
}

#[test]
fn legality_follows_the_active_card() -> Result<(), GameError> {
    let game = GameBuilder::new(4)?.with_seed(9).build()?;
    let active = game.active_card().expect("start card");
    for card in card::catalog() {
        let expected = card.is_wild()
            || card.color() == Some(active.color)
            || card.rank() == active.card.rank();
        assert_eq!(game.is_legal(card), expected, "{card} on {}", active.card);
    }
    Ok(())
}

#[test]
fn wild_card_needs_a_declared_color() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::wild(), n(Color::Blue, 1)],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Green, 3), n(Color::Green, 4)],
        vec![n(Color::Green, 5), n(Color::Green, 6)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_first_player(0)
        .with_deck(build_deck(&hands, n(Color::Red, 7), &[]))
        .build()?;
    assert!(game.play(0, 1, None).is_err());
    assert_eq!(game.hand(0)?.len(), 2);

    assert_eq!(game.play(0, 1, Some(Color::Yellow))?, Some(Card::wild()));
    assert_eq!(game.last_color(), Some(Color::Yellow));
    assert_eq!(game.second_last_color(), Some(Color::Red));
    assert_eq!(game.strong_color(0)?, Some(Color::Yellow));
    assert_eq!(game.recent_play(0)?, Some(Card::wild()));
    assert!(game.is_legal(n(Color::Yellow, 9)));
    assert!(!game.is_legal(n(Color::Red, 7)));
    Ok(())
}

#[test]
fn stacked_draw_two_is_drawn_in_one_go() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::draw_two(Color::Red), n(Color::Red, 9)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Yellow, 1), n(Color::Yellow, 2)],
    ];
    let draws = [n(Color::Yellow, 5), n(Color::Yellow, 6), n(Color::Yellow, 7)];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_first_player(0)
        .with_rules(Rules {
            stack_draw_two: true,
            ..Rules::default()
        })
        .with_deck(build_deck(&hands, n(Color::Red, 4), &draws))
        .build()?;

    // Red 9 (id 9) sorts ahead of Red +2 (id 12).
    assert_eq!(game.play(0, 1, None)?, Some(Card::draw_two(Color::Red)));
    assert_eq!(game.pending_draw(), 2);
    assert!(game.legality().only_draw_two());
    assert!(!game.is_legal(n(Color::Red, 9)));

    game.draw(1, false)?;
    assert_eq!(game.hand(1)?.len(), 4);
    assert_eq!(game.pending_draw(), 0);
    assert!(game.is_legal(n(Color::Red, 9)));
    assert!(game.is_legal(Card::draw_two(Color::Green)));
    assert!(!game.is_legal(n(Color::Green, 9)));
    // A forced stack draw says nothing about the seat's colors.
    assert_eq!(game.weak_color(1)?, None);
    Ok(())
}

#[test]
fn voluntary_draw_marks_the_weak_color() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Blue, 1)],
        vec![n(Color::Green, 1)],
        vec![n(Color::Green, 2)],
        vec![n(Color::Green, 3)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_first_player(0)
        .with_deck(build_deck(&hands, n(Color::Red, 4), &[n(Color::Yellow, 8)]))
        .build()?;
    assert_eq!(game.draw(0, false)?, Some(1));
    assert_eq!(game.weak_color(0)?, Some(Color::Red));
    assert_eq!(game.recent_play(0)?, None);
    Ok(())
}

#[test]
fn draws_stop_at_the_hand_cap() -> Result<(), GameError> {
    let mut game = GameBuilder::new(4)?
        .with_seed(5)
        .with_hand_size(MAX_HAND_SIZE - 1)
        .build()?;
    let deck_before = game.deck_count();
    assert!(game.draw(0, true)?.is_some());
    assert_eq!(game.hand(0)?.len(), MAX_HAND_SIZE);
    assert_eq!(game.draw(0, true)?, None);
    assert_eq!(game.hand(0)?.len(), MAX_HAND_SIZE);
    assert_eq!(game.deck_count(), deck_before - 1);
    Ok(())
}

#[test]
fn capped_stack_draw_clears_the_penalty() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::draw_two(Color::Red), n(Color::Red, 9)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Yellow, 1), n(Color::Yellow, 2)],
    ];
    let refill = MAX_HAND_SIZE - 2;
    let draws: Vec<Card> = (0..refill as u8).map(|i| n(Color::Yellow, i % 10)).collect();
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_first_player(0)
        .with_rules(Rules {
            stack_draw_two: true,
            ..Rules::default()
        })
        .with_deck(build_deck(&hands, n(Color::Red, 4), &draws))
        .build()?;
    for _ in 0..refill {
        assert!(game.draw(1, true)?.is_some());
    }
    assert_eq!(game.hand(1)?.len(), MAX_HAND_SIZE);

    assert_eq!(game.play(0, 1, None)?, Some(Card::draw_two(Color::Red)));
    assert_eq!(game.pending_draw(), 2);
    let deck_before = game.deck_count();

    assert_eq!(game.draw(1, false)?, None);
    assert_eq!(game.pending_draw(), 0);
    assert!(!game.legality().only_draw_two());
    assert_eq!(game.hand(1)?.len(), MAX_HAND_SIZE);
    assert_eq!(game.deck_count(), deck_before);
    Ok(())
}

#[test]
fn empty_deck_and_used_pile_yield_no_card() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Blue, 1)],
        vec![n(Color::Green, 1)],
        vec![n(Color::Green, 2)],
        vec![n(Color::Green, 3)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_deck(build_deck(&hands, n(Color::Red, 4), &[]))
        .build()?;
    assert_eq!(game.deck_count(), 0);
    assert_eq!(game.draw(0, false)?, None);
    assert_eq!(game.hand(0)?.len(), 1);
    Ok(())
}

#[test]
fn swap_exchanges_hands_and_reveals_them() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 1), n(Color::Red, 2)],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        vec![n(Color::Yellow, 1), n(Color::Yellow, 2)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_deck(build_deck(&hands, n(Color::Red, 4), &[]))
        .build()?;
    assert!(!game.is_open(3, 0)?);
    game.swap(0, 3)?;
    assert_eq!(game.hand(0)?, hands[3].as_slice());
    assert_eq!(game.hand(3)?, hands[0].as_slice());
    assert!(game.is_open(3, 0)? && game.is_open(3, 1)?);
    assert!(!game.is_open(1, 0)?);

    assert!(matches!(
        game.swap(1, 1),
        Err(GameError::InvalidAction(unobot::InvalidAction::SwapTarget(1)))
    ));
    Ok(())
}

fn snapshot(game: &unobot::Game) -> Result<Vec<Vec<Card>>, GameError> {
    (0..4)
        .map(|seat| match game.hand(seat) {
            Ok(hand) => Ok(hand.to_vec()),
            Err(GameError::InvalidPlayer(_)) => Ok(Vec::new()),
            Err(err) => Err(err),
        })
        .collect()
}

#[test]
fn cycle_rotates_every_hand_at_once() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 1)],
        vec![n(Color::Green, 1)],
        vec![n(Color::Blue, 1)],
        vec![n(Color::Yellow, 1)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_deck(build_deck(&hands, n(Color::Red, 4), &[]))
        .build()?;
    game.cycle()?;
    assert_eq!(game.hand(1)?, hands[0].as_slice());
    assert_eq!(game.hand(2)?, hands[1].as_slice());
    assert_eq!(game.hand(3)?, hands[2].as_slice());
    assert_eq!(game.hand(0)?, hands[3].as_slice());
    assert!(game.is_open(1, 0)?);

    game.switch_direction();
    game.cycle()?;
    let back: Vec<Vec<Card>> = snapshot(&game)?;
    assert_eq!(back, hands);
    Ok(())
}

#[test]
fn three_seat_cycle_differs_from_sequential_swaps() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 1), n(Color::Red, 2)],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Yellow, 1), n(Color::Yellow, 2)],
    ];
    let mut game = GameBuilder::new(3)?
        .with_hand_size(2)
        .with_deck(build_deck(&hands, n(Color::Red, 4), &[]))
        .build()?;
    let before = snapshot(&game)?;

    let mut naive = before.clone();
    naive.swap(0, 1);
    naive.swap(1, 2);
    naive.swap(2, 3);

    game.cycle()?;
    let after = snapshot(&game)?;
    assert_eq!(after[1], before[0]);
    assert_eq!(after[3], before[1]);
    assert_eq!(after[0], before[3]);
    assert!(after[2].is_empty());
    assert_ne!(after, naive);
    Ok(())
}

#[test]
fn challenge_reveals_and_penalizes_the_guilty_seat() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 3), Card::wild_draw_four()],
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        vec![n(Color::Yellow, 1), n(Color::Yellow, 2)],
    ];
    let draws: Vec<Card> = (3..9).map(|value| n(Color::Yellow, value)).collect();
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_deck(build_deck(&hands, n(Color::Red, 5), &draws))
        .build()?;
    game.play(0, 1, Some(Color::Green))?;
    assert!(game.challenge(1)?);
    assert_eq!(game.hand(0)?.len(), 5);
    assert_eq!(game.hand(1)?.len(), 2);
    assert!(game.is_open(0, 0)?);
    Ok(())
}

#[test]
fn failed_challenge_costs_the_challenger_six() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Green, 1), n(Color::Green, 2)],
        vec![n(Color::Red, 1), n(Color::Red, 2)],
        vec![n(Color::Blue, 1), n(Color::Blue, 2)],
        vec![n(Color::Blue, 3), Card::wild_draw_four()],
    ];
    let draws: Vec<Card> = (3..9).map(|value| n(Color::Yellow, value)).collect();
    let mut game = GameBuilder::new(4)?
        .with_hand_size(2)
        .with_deck(build_deck(&hands, n(Color::Red, 5), &draws))
        .build()?;
    game.play(3, 1, Some(Color::Green))?;
    assert!(!game.is_open(3, 0)?);
    // Seat 3 sits before the human seat.
    assert!(!game.challenge(0)?);
    assert_eq!(game.hand(0)?.len(), 8);
    assert_eq!(game.hand(3)?.len(), 1);
    assert!(game.is_open(3, 0)?);
    Ok(())
}

#[test]
fn winning_seat_collects_the_other_hands() -> Result<(), GameError> {
    let hands = vec![
        vec![n(Color::Red, 9)],
        vec![Card::draw_two(Color::Blue)],
        vec![Card::wild()],
        vec![n(Color::Green, 4)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_first_player(0)
        .with_deck(build_deck(&hands, n(Color::Red, 5), &[]))
        .build()?;
    game.play(0, 0, None)?;
    assert_eq!(game.status(), GameStatus::Finished { winner: 0 });
    assert_eq!(game.winner(), Some(0));
    assert_eq!(game.scores(), [74, 0, 0, 0]);
    assert_eq!(game.direction(), unobot::Direction::Stopped);
    assert!(game.is_open(2, 0)?);
    assert!(matches!(game.draw(1, false), Err(GameError::GameOver)));
    assert!(matches!(game.best_card(), Err(GameError::GameOver)));
    Ok(())
}

#[test]
fn human_loses_its_own_hand_score() -> Result<(), GameError> {
    let hands = vec![
        vec![Card::wild()],
        vec![n(Color::Red, 9)],
        vec![n(Color::Green, 4)],
        vec![n(Color::Blue, 1)],
    ];
    let mut game = GameBuilder::new(4)?
        .with_hand_size(1)
        .with_first_player(1)
        .with_deck(build_deck(&hands, n(Color::Red, 5), &[]))
        .build()?;
    let winner: PlayerId = 1;
    game.play(winner, 0, None)?;
    assert_eq!(game.scores(), [-50, 55, 0, 0]);
    assert_eq!(game.hand_score(0)?, 50);

    game.start()?;
    assert!(!game.is_finished());
    assert_eq!(game.scores(), [-50, 55, 0, 0]);
    assert_eq!(total_cards(&game)?, DECK_SIZE);
    Ok(())
}

#[test]
fn neighbors_follow_direction() -> Result<(), GameError> {
    let mut game = GameBuilder::new(3)?.with_first_player(3).build()?;
    assert_eq!(game.next_player(), 0);
    assert_eq!(game.prev_player(), 1);
    assert_eq!(game.oppo_player(), 1);
    game.switch_direction();
    assert_eq!(game.next_player(), 1);
    game.switch_turn();
    assert_eq!(game.current_player(), 1);
    Ok(())
}
