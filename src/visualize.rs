use std::fmt::Write;

use crate::action::{Action, HUMAN};
use crate::state::{GameStateView, GameStatus, TurnPhase};
use crate::turn::Direction;

/// Customize state rendering for CLI visualization.
#[derive(Clone, Copy, Debug)]
pub struct VisualOptions {
    /// List the cards of other seats the human seat has seen.
    pub show_open_cards: bool,
    /// Show the whole recent window instead of just the active card.
    pub show_recent: bool,
    /// Mark playable cards in the viewer's hand.
    pub mark_playable: bool,
}

impl Default for VisualOptions {
    fn default() -> Self {
        Self {
            show_open_cards: true,
            show_recent: true,
            mark_playable: true,
        }
    }
}

/// Fine tune textual action descriptions.
#[derive(Clone, Copy, Debug)]
pub struct DescribeOptions {
    pub include_card_details: bool,
    pub include_pending_draw: bool,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            include_card_details: true,
            include_pending_draw: true,
        }
    }
}

pub fn render_state(state: &GameStateView) -> String {
    render_state_with_options(state, VisualOptions::default())
}

pub fn render_state_with_options(state: &GameStateView, options: VisualOptions) -> String {
    let mut out = String::new();
    let status = match state.status {
        GameStatus::Ongoing => String::from("Ongoing"),
        GameStatus::Finished { winner } => format!("Finished (winner: Seat {winner})"),
    };
    let _ = writeln!(out, "Game status: {status}");
    let _ = writeln!(out, "Phase: {:?}", state.phase);
    let direction = match state.direction {
        Direction::Clockwise => "clockwise",
        Direction::CounterClockwise => "counter-clockwise",
        Direction::Stopped => "stopped",
    };
    let _ = writeln!(
        out,
        "Current seat: {}{}  |  Direction: {direction}",
        state.current_player,
        if state.current_player == state.self_player {
            " (You)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        out,
        "Deck: {}  |  Used: {}",
        state.deck_count, state.used_count
    );
    match state.active_card() {
        Some(active) if active.card.is_wild() => {
            let _ = writeln!(out, "Active: {} (declared {})", active.card, active.color);
        }
        Some(active) => {
            let _ = writeln!(out, "Active: {}", active.card);
        }
        None => {
            let _ = writeln!(out, "Active: --");
        }
    }
    if state.pending_draw > 0 {
        let _ = writeln!(out, "Pending draw: +{}", state.pending_draw);
    }
    if options.show_recent && state.recent.len() > 1 {
        let recent = state
            .recent
            .iter()
            .map(|played| played.card.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Recent: {recent}");
    }

    let _ = writeln!(out, "Seats:");
    for player in &state.players {
        let label_you = if player.id == state.self_player {
            " (You)"
        } else {
            ""
        };
        let current_tag = if player.is_current { " <- current" } else { "" };
        let mut notes = Vec::new();
        if let Some(color) = player.strong_color {
            notes.push(format!("strong {color}"));
        }
        if let Some(color) = player.weak_color {
            notes.push(format!("weak {color}"));
        }
        if player.hand_size == 1 {
            notes.push(String::from("UNO"));
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" [{}]", notes.join(", "))
        };
        let _ = writeln!(
            out,
            "  Seat {}{} - {} cards, score {}{}{}",
            player.id, label_you, player.hand_size, player.score, notes, current_tag
        );
        if player.id == state.self_player {
            if state.hand.is_empty() {
                let _ = writeln!(out, "    Hand: (empty)");
            } else {
                let entries = state
                    .hand
                    .iter()
                    .enumerate()
                    .map(|(idx, card)| {
                        let mark = if options.mark_playable && state.is_legal(*card) {
                            "*"
                        } else {
                            ""
                        };
                        format!("{idx}:{card}{mark}")
                    })
                    .collect::<Vec<_>>()
                    .join("  ");
                let _ = writeln!(out, "    Hand: {entries}");
            }
        } else if options.show_open_cards
            && state.self_player == HUMAN
            && !player.open_cards.is_empty()
        {
            let open = player
                .open_cards
                .iter()
                .map(|card| card.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "    Known: {open}");
        }
    }
    out
}

pub fn describe_action(state: &GameStateView, action: &Action) -> String {
    describe_action_with_options(state, action, DescribeOptions::default())
}

pub fn describe_action_with_options(
    state: &GameStateView,
    action: &Action,
    options: DescribeOptions,
) -> String {
    match action {
        Action::Play { hand_index, color } => {
            let card = state.hand.get(*hand_index);
            let card_desc = match card {
                Some(card) if options.include_card_details => format!("hand[{hand_index}] {card}"),
                _ => format!("hand[{hand_index}]"),
            };
            match (card.map(|card| card.is_wild()), color) {
                (Some(true), Some(color)) => format!("Play {card_desc} declaring {color}"),
                _ => format!("Play {card_desc}"),
            }
        }
        Action::Draw => {
            if options.include_pending_draw && state.pending_draw > 0 {
                format!("Draw {} (stacked penalty)", state.pending_draw)
            } else {
                String::from("Draw a card")
            }
        }
        Action::Pass => match state.phase {
            TurnPhase::DrawnPlayable { hand_index, .. } if options.include_card_details => {
                match state.hand.get(hand_index) {
                    Some(card) => format!("Keep {card} and pass"),
                    None => String::from("Pass"),
                }
            }
            _ => String::from("Pass"),
        },
        Action::Challenge => String::from("Challenge the wild +4"),
        Action::Accept => String::from("Accept the wild +4 and draw 4"),
        Action::Swap { target } => {
            let size = state.hand_size_of(*target);
            format!("Swap hands with seat {target} ({size} cards)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Color;
    use crate::game::GameBuilder;

    #[test]
    fn render_and_describe_include_expected_phrases() {
        let game = GameBuilder::new(4)
            .expect("builder")
            .with_seed(3)
            .build()
            .expect("game");
        let view = game.state_view(HUMAN).expect("state view");
        let text = render_state(&view);
        assert!(text.contains("Seat 0 (You)"));
        assert!(text.contains("Hand:"));
        assert!(text.contains("Active:"));

        assert_eq!(describe_action(&view, &Action::Draw), "Draw a card");
        let play = Action::Play {
            hand_index: 0,
            color: Some(Color::Green),
        };
        assert!(describe_action(&view, &play).starts_with("Play hand[0]"));
        let swap = describe_action(&view, &Action::Swap { target: 2 });
        assert!(swap.contains("seat 2 (7 cards)"));
    }

    #[test]
    fn three_seat_tables_omit_north() {
        let game = GameBuilder::new(3).unwrap().build().unwrap();
        let text = render_state(&game.state_view(HUMAN).unwrap());
        assert!(text.contains("Seat 3"));
        assert!(!text.contains("Seat 2 "));
    }
}
