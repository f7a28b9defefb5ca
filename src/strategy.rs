//! Basic-strategy and betting hints. Advisory only: nothing here mutates
//! game state or blocks an action, the strings go straight to the learning
//! panel in the UI.

use crate::deck::{Card, Rank};
use crate::hand::Hand;

/// Simplified basic-strategy hint for the current player hand against the
/// dealer up card.
pub fn strategy_hint(player: &Hand, dealer_up: &Card, can_double: bool, can_split: bool) -> &'static str {
    let dealer = dealer_up.rank.value();

    // Pair advice comes first, but only while splitting is still on the table.
    if can_split && player.cards.len() == 2 {
        let first = player.cards[0].rank;
        if first.is_ace() || matches!(first, Rank::Eight) {
            return "Split these cards";
        }
        if first.value() == 10 {
            return "Never split 10s - Stand";
        }
    }

    // Any un-busted hand holding an ace takes the soft table, even when the
    // ace has been demoted to 1.
    let has_ace = player.cards.iter().any(|card| card.rank.is_ace());
    if has_ace && player.value <= 21 {
        soft_hand_hint(player.value, dealer, can_double)
    } else {
        hard_hand_hint(player.value, dealer, can_double)
    }
}

fn soft_hand_hint(player: u8, dealer: u8, can_double: bool) -> &'static str {
    if player >= 19 {
        return "Stand";
    }
    if player == 18 {
        if dealer <= 6 {
            return if can_double {
                "Double if possible, otherwise Stand"
            } else {
                "Stand"
            };
        }
        if dealer <= 8 {
            return "Stand";
        }
        return "Hit";
    }
    if player >= 15 && dealer <= 6 && can_double {
        return "Double if possible, otherwise Hit";
    }
    "Hit"
}

fn hard_hand_hint(player: u8, dealer: u8, can_double: bool) -> &'static str {
    if player >= 17 {
        return "Stand";
    }
    if player >= 13 && dealer <= 6 {
        return "Stand";
    }
    if player == 12 && (4..=6).contains(&dealer) {
        return "Stand";
    }
    if player == 11 && can_double {
        return "Double if possible, otherwise Hit";
    }
    if player == 10 && dealer <= 9 && can_double {
        return "Double if possible, otherwise Hit";
    }
    if player == 9 && (3..=6).contains(&dealer) && can_double {
        return "Double if possible, otherwise Hit";
    }
    "Hit"
}

/// Scale the bet with the true count: flat at neutral counts, up to 5x base
/// when the shoe is rich in high cards.
pub fn betting_advice(true_count: f64, base_bet: u32) -> String {
    if true_count >= 2.0 {
        let multiplier = (true_count.floor() as u32).min(5);
        format!(
            "Favorable count! Consider betting {}x base bet (${})",
            multiplier,
            base_bet * multiplier
        )
    } else if true_count <= -2.0 {
        "Unfavorable count - consider minimum bet".to_string()
    } else {
        "Neutral count - stick to base betting strategy".to_string()
    }
}
