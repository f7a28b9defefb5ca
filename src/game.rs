use serde::{Deserialize, Serialize};

use crate::deck::{Card, Deck};
use crate::error::GameError;
use crate::hand::Hand;

pub const MIN_BET: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Betting,
    /// Transient: `deal` passes through it within one call, the round is
    /// never observed resting here.
    Dealing,
    Playing,
    DealerTurn,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Push,
    Blackjack,
}

/// What the settled round contributes to the player's statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub result: RoundOutcome,
    pub winnings: u32,
    pub net_profit: i64,
    pub player_busted: bool,
    pub player_blackjack: bool,
}

/// Snapshot handed to the presentation layer after every transition. The
/// shoe itself stays server side of the wasm boundary; only its size leaks.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot<'a> {
    pub player_hand: &'a Hand,
    pub dealer_hand: &'a Hand,
    pub current_bet: u32,
    pub balance: u32,
    pub game_phase: Phase,
    pub can_double_down: bool,
    pub can_split: bool,
    pub num_decks: u8,
    pub game_result: Option<RoundOutcome>,
    pub cards_remaining: usize,
}

/// One player against the dealer, single active hand. Owns the shoe and both
/// hands; every transition mutates in place and reports the newly revealed
/// cards so an outside counter can observe them.
pub struct Round {
    deck: Deck,
    player: Hand,
    dealer: Hand,
    current_bet: u32,
    balance: u32,
    phase: Phase,
    can_double_down: bool,
    can_split: bool,
    result: Option<RoundOutcome>,
    winnings: u32,
}

impl Round {
    pub fn new(num_decks: u8, balance: u32, seed: Option<u64>) -> Self {
        Round::with_deck(Deck::new(num_decks, seed), balance)
    }

    /// Start from a prepared shoe. This is how drills and tests force a
    /// known card order.
    pub fn with_deck(deck: Deck, balance: u32) -> Self {
        Round {
            deck,
            player: Hand::new(),
            dealer: Hand::new(),
            current_bet: 0,
            balance,
            phase: Phase::Betting,
            can_double_down: false,
            can_split: false,
            result: None,
            winnings: 0,
        }
    }

    /// Reserve the bet for the coming deal. Valid while betting, or on a
    /// finished round, where it also rolls the table over into the next
    /// round (same shoe, previous hands and result cleared).
    pub fn place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        if self.phase != Phase::Betting && self.phase != Phase::Finished {
            return Err(GameError::InvalidPhase {
                action: "placing a bet",
                phase: self.phase,
            });
        }
        if amount < MIN_BET {
            return Err(GameError::BetBelowMinimum { min: MIN_BET });
        }
        if amount > self.balance {
            return Err(GameError::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }

        if self.phase == Phase::Finished {
            self.clear_round();
        }
        self.balance -= amount;
        self.current_bet = amount;
        Ok(())
    }

    /// Deal the opening hands: player, dealer, player, dealer, in that exact
    /// order. Returns all four cards in deal order for the counter.
    pub fn deal(&mut self) -> Result<Vec<Card>, GameError> {
        if self.phase != Phase::Betting {
            return Err(GameError::InvalidPhase {
                action: "dealing",
                phase: self.phase,
            });
        }
        if self.current_bet == 0 {
            return Err(GameError::NoBetPlaced);
        }

        // Draw everything before touching the phase so a short shoe leaves
        // the round in betting, where a shuffle makes the deal retryable.
        let mut revealed = Vec::with_capacity(4);
        let mut player_cards = Vec::with_capacity(2);
        let mut dealer_cards = Vec::with_capacity(2);
        for _ in 0..2 {
            let card = self.deck.draw()?;
            revealed.push(card.clone());
            player_cards.push(card);
            let card = self.deck.draw()?;
            revealed.push(card.clone());
            dealer_cards.push(card);
        }

        self.phase = Phase::Dealing;
        self.player = Hand::from_cards(player_cards);
        self.dealer = Hand::from_cards(dealer_cards);
        self.phase = Phase::Playing;
        self.can_double_down = true;
        self.can_split = self.player.is_pair();
        Ok(revealed)
    }

    /// Draw one card for the player. Taking a third card forfeits double
    /// down and split whether or not the hand busts.
    pub fn hit(&mut self) -> Result<Card, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidPhase {
                action: "hitting",
                phase: self.phase,
            });
        }
        let card = self.deck.draw()?;
        self.player.push(card.clone());
        self.can_double_down = false;
        self.can_split = false;
        if self.player.is_bust {
            self.settle(RoundOutcome::Lose);
        }
        Ok(card)
    }

    /// Freeze the player hand and run the dealer out. Returns the dealer's
    /// newly drawn cards.
    pub fn stand(&mut self) -> Result<Vec<Card>, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidPhase {
                action: "standing",
                phase: self.phase,
            });
        }
        self.phase = Phase::DealerTurn;
        self.dealer_play()
    }

    /// Double the bet, take exactly one card, then either settle the bust or
    /// hand the round to the dealer. The extra bet is debited here, in the
    /// same transition that records it.
    pub fn double_down(&mut self) -> Result<Vec<Card>, GameError> {
        if self.phase != Phase::Playing {
            return Err(GameError::InvalidPhase {
                action: "doubling down",
                phase: self.phase,
            });
        }
        if !self.can_double_down {
            return Err(GameError::DoubleDownUnavailable);
        }
        if self.current_bet > self.balance {
            return Err(GameError::InsufficientFunds {
                needed: self.current_bet,
                available: self.balance,
            });
        }

        // Draw before debiting so an exhausted shoe rejects the whole
        // transition with the bet and balance untouched.
        let card = self.deck.draw()?;
        self.balance -= self.current_bet;
        self.current_bet *= 2;
        self.player.push(card.clone());
        self.can_double_down = false;
        self.can_split = false;

        let mut revealed = vec![card];
        if self.player.is_bust {
            self.settle(RoundOutcome::Lose);
        } else {
            self.phase = Phase::DealerTurn;
            revealed.extend(self.dealer_play()?);
        }
        Ok(revealed)
    }

    /// Split is surfaced to the UI but not implemented; callers get an
    /// explicit signal rather than a silent no-op.
    pub fn split(&mut self) -> Result<(), GameError> {
        Err(GameError::Unsupported { feature: "split" })
    }

    /// Dealer draws to 17 and stands on all 17s, soft included. Re-invoking
    /// on a settled round is an invalid transition, never a redraw.
    pub fn dealer_play(&mut self) -> Result<Vec<Card>, GameError> {
        if self.phase != Phase::DealerTurn {
            return Err(GameError::InvalidPhase {
                action: "dealer play",
                phase: self.phase,
            });
        }

        let mut drawn = Vec::new();
        while self.dealer.value < 17 {
            let card = self.deck.draw()?;
            self.dealer.push(card.clone());
            drawn.push(card);
        }

        // Resolution order matters: bust first, then blackjack comparison,
        // then totals. A busted player never reaches this point.
        let outcome = if self.dealer.is_bust {
            RoundOutcome::Win
        } else if self.player.is_blackjack && !self.dealer.is_blackjack {
            RoundOutcome::Blackjack
        } else if self.dealer.is_blackjack && !self.player.is_blackjack {
            RoundOutcome::Lose
        } else if self.player.value > self.dealer.value {
            RoundOutcome::Win
        } else if self.player.value < self.dealer.value {
            RoundOutcome::Lose
        } else {
            RoundOutcome::Push
        };
        self.settle(outcome);
        Ok(drawn)
    }

    /// Rebuild and reshuffle the shoe in place. The caller is responsible
    /// for resetting its card count alongside this.
    pub fn shuffle(&mut self) {
        self.deck.shuffle();
    }

    fn settle(&mut self, outcome: RoundOutcome) {
        // Blackjack pays 3:2, a win pays even money, a push returns the
        // stake. The bet was debited at placement, so winnings are gross.
        self.winnings = match outcome {
            RoundOutcome::Blackjack => self.current_bet * 5 / 2,
            RoundOutcome::Win => self.current_bet * 2,
            RoundOutcome::Push => self.current_bet,
            RoundOutcome::Lose => 0,
        };
        self.balance += self.winnings;
        self.result = Some(outcome);
        self.phase = Phase::Finished;
    }

    fn clear_round(&mut self) {
        self.player = Hand::new();
        self.dealer = Hand::new();
        self.current_bet = 0;
        self.result = None;
        self.winnings = 0;
        self.can_double_down = false;
        self.can_split = false;
        self.phase = Phase::Betting;
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        let result = self.result?;
        Some(RoundSummary {
            result,
            winnings: self.winnings,
            net_profit: self.winnings as i64 - self.current_bet as i64,
            player_busted: self.player.is_bust,
            player_blackjack: self.player.is_blackjack,
        })
    }

    pub fn snapshot(&self) -> RoundSnapshot<'_> {
        RoundSnapshot {
            player_hand: &self.player,
            dealer_hand: &self.dealer,
            current_bet: self.current_bet,
            balance: self.balance,
            game_phase: self.phase,
            can_double_down: self.can_double_down,
            can_split: self.can_split,
            num_decks: self.deck.num_decks(),
            game_result: self.result,
            cards_remaining: self.deck.remaining(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<RoundOutcome> {
        self.result
    }

    pub fn player(&self) -> &Hand {
        &self.player
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    /// The dealer card the player can see (face up).
    pub fn dealer_up_card(&self) -> Option<&Card> {
        self.dealer.cards.first()
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    pub fn winnings(&self) -> u32 {
        self.winnings
    }

    pub fn can_double_down(&self) -> bool {
        self.can_double_down
    }

    pub fn can_split(&self) -> bool {
        self.can_split
    }

    pub fn num_decks(&self) -> u8 {
        self.deck.num_decks()
    }

    pub fn cards_remaining(&self) -> usize {
        self.deck.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank, 0)
    }

    fn forced_round(ranks: &[Rank], balance: u32) -> Round {
        let cards = ranks.iter().map(|&r| card(r)).collect();
        Round::with_deck(Deck::fixed(cards), balance)
    }

    #[test]
    fn bet_below_minimum_is_rejected() {
        let mut round = Round::new(1, 1000, Some(1));
        assert_eq!(round.place_bet(4), Err(GameError::BetBelowMinimum { min: 5 }));
        assert_eq!(round.balance(), 1000);
    }

    #[test]
    fn bet_above_balance_is_rejected() {
        let mut round = Round::new(1, 100, Some(1));
        assert_eq!(
            round.place_bet(200),
            Err(GameError::InsufficientFunds {
                needed: 200,
                available: 100
            })
        );
        assert_eq!(round.balance(), 100);
    }

    #[test]
    fn placing_a_bet_debits_the_balance() {
        let mut round = Round::new(1, 1000, Some(1));
        round.place_bet(25).unwrap();
        assert_eq!(round.balance(), 975);
        assert_eq!(round.current_bet(), 25);
        assert_eq!(round.phase(), Phase::Betting);
    }

    #[test]
    fn deal_without_a_bet_fails() {
        let mut round = Round::new(1, 1000, Some(1));
        assert_eq!(round.deal(), Err(GameError::NoBetPlaced));
    }

    #[test]
    fn deal_alternates_player_dealer() {
        let mut round = forced_round(&[Rank::Two, Rank::Three, Rank::Four, Rank::Five], 1000);
        round.place_bet(10).unwrap();
        let revealed = round.deal().unwrap();
        assert_eq!(revealed.len(), 4);
        assert_eq!(round.player().cards[0].rank, Rank::Two);
        assert_eq!(round.dealer().cards[0].rank, Rank::Three);
        assert_eq!(round.player().cards[1].rank, Rank::Four);
        assert_eq!(round.dealer().cards[1].rank, Rank::Five);
        assert_eq!(round.phase(), Phase::Playing);
        assert!(round.can_double_down());
        assert!(!round.can_split());
    }

    #[test]
    fn deal_flags_a_pair_as_splittable() {
        let mut round = forced_round(&[Rank::Eight, Rank::Three, Rank::Eight, Rank::Five], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        assert!(round.can_split());
    }

    #[test]
    fn hit_forfeits_double_and_split() {
        let mut round = forced_round(
            &[Rank::Eight, Rank::Ten, Rank::Eight, Rank::Seven, Rank::Two],
            1000,
        );
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        round.hit().unwrap();
        assert_eq!(round.phase(), Phase::Playing);
        assert!(!round.can_double_down());
        assert!(!round.can_split());
    }

    #[test]
    fn busting_loses_immediately() {
        let mut round = forced_round(
            &[Rank::King, Rank::Ten, Rank::Queen, Rank::Seven, Rank::Five],
            1000,
        );
        round.place_bet(50).unwrap();
        round.deal().unwrap();
        round.hit().unwrap();
        assert_eq!(round.phase(), Phase::Finished);
        assert_eq!(round.result(), Some(RoundOutcome::Lose));
        assert_eq!(round.winnings(), 0);
        assert_eq!(round.balance(), 950);
        let summary = round.summary().unwrap();
        assert!(summary.player_busted);
        assert_eq!(summary.net_profit, -50);
    }

    #[test]
    fn dealer_draws_to_seventeen() {
        // Dealer starts on 9 + 2 and pulls a king for 21.
        let mut round = forced_round(
            &[Rank::King, Rank::Nine, Rank::Queen, Rank::Two, Rank::King],
            1000,
        );
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let drawn = round.stand().unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(round.dealer().value, 21);
        assert_eq!(round.result(), Some(RoundOutcome::Lose));
    }

    #[test]
    fn dealer_stands_on_soft_seventeen() {
        // Dealer has A + 6: soft 17, no draw. The shoe holds exactly four
        // cards, so any extra dealer draw would fail loudly.
        let mut round = forced_round(&[Rank::King, Rank::Ace, Rank::Queen, Rank::Six], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let drawn = round.stand().unwrap();
        assert!(drawn.is_empty());
        assert_eq!(round.dealer().value, 17);
        assert_eq!(round.result(), Some(RoundOutcome::Win));
        assert_eq!(round.balance(), 1010);
    }

    #[test]
    fn dealer_bust_pays_even_money() {
        // Dealer: 10 + 6, draws a king and busts.
        let mut round = forced_round(
            &[Rank::Five, Rank::Ten, Rank::Nine, Rank::Six, Rank::King],
            1000,
        );
        round.place_bet(20).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Win));
        assert_eq!(round.winnings(), 40);
        assert_eq!(round.balance(), 1020);
    }

    #[test]
    fn equal_totals_push() {
        let mut round = forced_round(&[Rank::King, Rank::Ten, Rank::Nine, Rank::Nine], 1000);
        round.place_bet(30).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Push));
        // Stake returned.
        assert_eq!(round.balance(), 1000);
        assert_eq!(round.summary().unwrap().net_profit, 0);
    }

    #[test]
    fn dealer_blackjack_beats_twenty() {
        let mut round = forced_round(&[Rank::King, Rank::Ace, Rank::Queen, Rank::King], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Lose));
    }

    #[test]
    fn mutual_blackjack_pushes() {
        let mut round = forced_round(&[Rank::Ace, Rank::King, Rank::King, Rank::Ace], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Push));
        assert_eq!(round.balance(), 1000);
    }

    #[test]
    fn player_blackjack_pays_three_to_two() {
        // The end-to-end flow: two-deck shoe, $25 bet on a $1000 balance.
        let mut round = forced_round(
            &[Rank::Ten, Rank::Nine, Rank::Ace, Rank::Two, Rank::Six],
            1000,
        );
        round.place_bet(25).unwrap();
        assert_eq!(round.balance(), 975);
        round.deal().unwrap();
        assert_eq!(round.player().value, 21);
        assert!(round.player().is_blackjack);
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Blackjack));
        assert_eq!(round.winnings(), 62);
        assert_eq!(round.balance(), 1037);
        assert_eq!(round.summary().unwrap().net_profit, 37);
    }

    #[test]
    fn blackjack_payout_rounds_down() {
        // floor(15 * 2.5) = 37
        let mut round = forced_round(
            &[Rank::Ten, Rank::Nine, Rank::Ace, Rank::Two, Rank::Six],
            1000,
        );
        round.place_bet(15).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.winnings(), 37);
    }

    #[test]
    fn double_down_doubles_bet_and_takes_one_card() {
        // Player 6 + 5 = 11, doubles into a ten for 21; dealer 9 + 8 = 17.
        let mut round = forced_round(
            &[Rank::Six, Rank::Nine, Rank::Five, Rank::Eight, Rank::Ten],
            1000,
        );
        round.place_bet(100).unwrap();
        round.deal().unwrap();
        round.double_down().unwrap();
        assert_eq!(round.current_bet(), 200);
        assert_eq!(round.player().cards.len(), 3);
        assert_eq!(round.result(), Some(RoundOutcome::Win));
        // 1000 - 100 - 100 + 400
        assert_eq!(round.balance(), 1200);
    }

    #[test]
    fn double_down_bust_settles_without_dealer_play() {
        let mut round = forced_round(
            &[Rank::King, Rank::Nine, Rank::Six, Rank::Eight, Rank::Ten],
            1000,
        );
        round.place_bet(100).unwrap();
        round.deal().unwrap();
        round.double_down().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Lose));
        assert_eq!(round.dealer().cards.len(), 2);
        assert_eq!(round.balance(), 800);
    }

    #[test]
    fn double_down_needs_funds_for_the_second_bet() {
        let mut round = forced_round(&[Rank::Six, Rank::Nine, Rank::Five, Rank::Eight], 100);
        round.place_bet(100).unwrap();
        round.deal().unwrap();
        assert_eq!(
            round.double_down(),
            Err(GameError::InsufficientFunds {
                needed: 100,
                available: 0
            })
        );
        assert_eq!(round.current_bet(), 100);
        assert_eq!(round.phase(), Phase::Playing);
    }

    #[test]
    fn double_down_after_hitting_is_rejected() {
        let mut round = forced_round(
            &[Rank::Two, Rank::Nine, Rank::Three, Rank::Eight, Rank::Two, Rank::Ten],
            1000,
        );
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        round.hit().unwrap();
        assert_eq!(round.double_down(), Err(GameError::DoubleDownUnavailable));
    }

    #[test]
    fn double_down_on_an_exhausted_shoe_leaves_the_bet_intact() {
        // Four-card shoe: the deal empties it, so the double-down draw fails.
        let mut round = forced_round(&[Rank::Six, Rank::Nine, Rank::Five, Rank::Eight], 1000);
        round.place_bet(100).unwrap();
        round.deal().unwrap();
        assert_eq!(round.double_down(), Err(GameError::EmptyDeck));
        assert_eq!(round.balance(), 900);
        assert_eq!(round.current_bet(), 100);
        assert_eq!(round.phase(), Phase::Playing);
        // The round is still live: the player can stand once the shoe allows.
        assert!(round.can_double_down());
    }

    #[test]
    fn failed_deal_leaves_the_round_in_betting() {
        let mut round = forced_round(&[Rank::Six, Rank::Nine, Rank::Five], 1000);
        round.place_bet(10).unwrap();
        assert_eq!(round.deal(), Err(GameError::EmptyDeck));
        assert_eq!(round.phase(), Phase::Betting);
        assert_eq!(round.current_bet(), 10);
        assert!(round.player().cards.is_empty());
    }

    #[test]
    fn split_is_an_explicit_unsupported_signal() {
        let mut round = forced_round(&[Rank::Eight, Rank::Three, Rank::Eight, Rank::Five], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        assert_eq!(
            round.split(),
            Err(GameError::Unsupported { feature: "split" })
        );
    }

    #[test]
    fn dealer_play_on_finished_round_is_invalid() {
        let mut round = forced_round(&[Rank::King, Rank::Ten, Rank::Nine, Rank::Nine], 1000);
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        let remaining = round.cards_remaining();
        assert!(matches!(
            round.dealer_play(),
            Err(GameError::InvalidPhase { .. })
        ));
        assert!(matches!(round.stand(), Err(GameError::InvalidPhase { .. })));
        // And crucially, no cards were drawn by the rejected calls.
        assert_eq!(round.cards_remaining(), remaining);
    }

    #[test]
    fn next_bet_rolls_the_round_over_on_the_same_shoe() {
        let mut round = forced_round(
            &[
                Rank::King,
                Rank::Ten,
                Rank::Nine,
                Rank::Nine,
                Rank::Five,
                Rank::Six,
                Rank::Seven,
                Rank::Eight,
            ],
            1000,
        );
        round.place_bet(10).unwrap();
        round.deal().unwrap();
        let _ = round.stand().unwrap();
        assert_eq!(round.result(), Some(RoundOutcome::Push));

        round.place_bet(20).unwrap();
        assert_eq!(round.phase(), Phase::Betting);
        assert_eq!(round.result(), None);
        assert!(round.player().cards.is_empty());
        assert_eq!(round.current_bet(), 20);
        // Shoe carried over: four cards already gone.
        assert_eq!(round.cards_remaining(), 4);
    }

    #[test]
    fn actions_outside_playing_phase_are_rejected() {
        let mut round = Round::new(1, 1000, Some(1));
        assert!(matches!(round.hit(), Err(GameError::InvalidPhase { .. })));
        assert!(matches!(round.stand(), Err(GameError::InvalidPhase { .. })));
        assert!(matches!(
            round.double_down(),
            Err(GameError::InvalidPhase { .. })
        ));
    }
}
