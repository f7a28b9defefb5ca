use serde::{Deserialize, Serialize};

use crate::deck::Card;

/// Result of evaluating a set of cards: best attainable total with aces
/// flexed between 11 and 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandValue {
    pub value: u8,
    pub is_blackjack: bool,
    pub is_bust: bool,
}

/// Count every ace as 11 first, then demote aces one at a time while the
/// total is over 21.
pub fn evaluate(cards: &[Card]) -> HandValue {
    let mut value: u8 = 0;
    let mut aces = 0;

    for card in cards {
        if card.rank.is_ace() {
            aces += 1;
        }
        value += card.rank.value();
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    HandValue {
        value,
        is_blackjack: value == 21 && cards.len() == 2,
        is_bust: value > 21,
    }
}

/// True when the hand still counts an ace as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    let mut value: u8 = 0;
    let mut aces = 0;
    for card in cards {
        if card.rank.is_ace() {
            aces += 1;
        }
        value += card.rank.value();
    }
    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    aces > 0 && value <= 21
}

/// A hand plus its derived fields. The derived fields are recomputed from
/// scratch on every mutation rather than patched incrementally, so they can
/// never go stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    pub cards: Vec<Card>,
    pub value: u8,
    pub is_blackjack: bool,
    pub is_bust: bool,
}

impl Hand {
    pub fn new() -> Self {
        Hand::from_cards(Vec::new())
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        let HandValue {
            value,
            is_blackjack,
            is_bust,
        } = evaluate(&cards);
        Hand {
            cards,
            value,
            is_blackjack,
            is_bust,
        }
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
        let eval = evaluate(&self.cards);
        self.value = eval.value;
        self.is_blackjack = eval.is_blackjack;
        self.is_bust = eval.is_bust;
    }

    pub fn is_soft(&self) -> bool {
        is_soft(&self.cards)
    }

    /// First two cards share a rank (split candidate).
    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].rank == self.cards[1].rank
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand::new()
    }
}
