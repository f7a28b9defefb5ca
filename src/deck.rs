use std::collections::VecDeque;
use std::fmt;

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

/// Ranks serialize with the wire names the UI schema uses ("2".."10",
/// "jack", "queen", "king", "ace").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "jack")]
    Jack,
    #[serde(rename = "queen")]
    Queen,
    #[serde(rename = "king")]
    King,
    #[serde(rename = "ace")]
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Face value with the ace counted high; hand evaluation demotes
    /// aces afterwards.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
        }
    }

    pub fn is_ace(&self) -> bool {
        matches!(self, Rank::Ace)
    }

    pub fn short(&self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    /// Stable identity within one shoe ("spades_ace_0"). The UI keys card
    /// animations on it; gameplay logic never reads it.
    pub id: String,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank, copy: u8) -> Self {
        let id = format!("{}_{}_{}", suit_name(suit), rank_name(rank), copy);
        Card { suit, rank, id }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.short(), self.suit.symbol())
    }
}

fn suit_name(suit: Suit) -> &'static str {
    match suit {
        Suit::Hearts => "hearts",
        Suit::Diamonds => "diamonds",
        Suit::Clubs => "clubs",
        Suit::Spades => "spades",
    }
}

fn rank_name(rank: Rank) -> &'static str {
    match rank {
        Rank::Jack => "jack",
        Rank::Queen => "queen",
        Rank::King => "king",
        Rank::Ace => "ace",
        other => other.short(),
    }
}

/// A multi-deck shoe. Cards come off the front; the shoe shrinks by exactly
/// one card per draw and is rebuilt in place on shuffle.
pub struct Deck {
    num_decks: u8,
    cards: VecDeque<Card>,
    rng: SmallRng,
}

impl Deck {
    /// Build a shuffled shoe of `num_decks` full 52-card sets. A fixed seed
    /// makes the ordering reproducible; `None` seeds from entropy.
    pub fn new(num_decks: u8, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut deck = Deck {
            num_decks: num_decks.max(1),
            cards: VecDeque::new(),
            rng,
        };
        deck.shuffle();
        deck
    }

    /// A shoe with a predetermined draw order (first element drawn first).
    /// Used for strategy drills and deterministic tests.
    pub fn fixed(cards: Vec<Card>) -> Self {
        let num_decks = ((cards.len() + 51) / 52).max(1) as u8;
        Deck {
            num_decks,
            cards: cards.into(),
            rng: SmallRng::seed_from_u64(0),
        }
    }

    /// Rebuild the full shoe and Fisher-Yates shuffle it.
    pub fn shuffle(&mut self) {
        let mut cards = Vec::with_capacity(self.num_decks as usize * 52);
        for copy in 0..self.num_decks {
            for suit in Suit::ALL {
                for rank in Rank::ALL {
                    cards.push(Card::new(suit, rank, copy));
                }
            }
        }
        cards.shuffle(&mut self.rng);
        self.cards = cards.into();
    }

    pub fn draw(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::EmptyDeck)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }
}
