use serde::{Deserialize, Serialize};

use crate::deck::Card;

/// Hi-Lo point value: 2-6 count +1, 7-9 are neutral, tens/faces/aces -1.
pub fn card_point(card: &Card) -> i32 {
    match card.rank.value() {
        2..=6 => 1,
        7..=9 => 0,
        _ => -1,
    }
}

/// Hi-Lo count over one shoe. The counter is a pure accumulator: it tallies
/// whatever cards it is handed and trusts the caller to pass each revealed
/// card exactly once. It tracks the shoe, not a single round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardCount {
    pub running: i32,
    /// Running count normalized by decks remaining, rounded to one decimal.
    #[serde(rename = "true")]
    pub true_count: f64,
    #[serde(rename = "decksRemaining")]
    pub decks_remaining: f64,
}

impl CardCount {
    /// The zero count for a fresh shoe. Also what the caller resets to when
    /// the shoe is rebuilt or the deck count changes.
    pub fn fresh(num_decks: u8) -> Self {
        CardCount {
            running: 0,
            true_count: 0.0,
            decks_remaining: num_decks as f64,
        }
    }

    /// Fold newly revealed cards into the count. `cards_played` is the total
    /// number of cards revealed since the last shuffle, including the ones
    /// passed here.
    pub fn update(&self, new_cards: &[Card], cards_played: usize, num_decks: u8) -> Self {
        let running = self.running + new_cards.iter().map(card_point).sum::<i32>();

        let total_cards = num_decks as usize * 52;
        let cards_remaining = total_cards.saturating_sub(cards_played);
        let decks_remaining = (cards_remaining as f64 / 52.0).max(0.5);
        let true_count = if decks_remaining > 0.0 {
            running as f64 / decks_remaining
        } else {
            0.0
        };

        CardCount {
            running,
            true_count: round1(true_count),
            decks_remaining: round1(decks_remaining),
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
