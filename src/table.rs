use crate::counter::CardCount;
use crate::deck::Card;
use crate::error::GameError;
use crate::game::{Round, RoundSnapshot, RoundSummary};
use crate::strategy;

/// One trainer table: a round plus the Hi-Lo count that outlives it. The
/// table forwards every card a transition reveals into the counter exactly
/// once, which keeps `cards_played` equal to the number of cards the counter
/// has seen.
pub struct Table {
    round: Round,
    count: CardCount,
    cards_played: usize,
}

impl Table {
    pub fn new(num_decks: u8, balance: u32, seed: Option<u64>) -> Self {
        Table::from_round(Round::new(num_decks, balance, seed))
    }

    /// Wrap a prepared round (fixed shoe drills, resumed sessions) with a
    /// fresh count.
    pub fn from_round(round: Round) -> Self {
        let count = CardCount::fresh(round.num_decks());
        Table {
            round,
            count,
            cards_played: 0,
        }
    }

    pub fn place_bet(&mut self, amount: u32) -> Result<(), GameError> {
        self.round.place_bet(amount)
    }

    pub fn deal(&mut self) -> Result<(), GameError> {
        let revealed = self.round.deal()?;
        self.observe(&revealed);
        Ok(())
    }

    pub fn hit(&mut self) -> Result<(), GameError> {
        let card = self.round.hit()?;
        self.observe(std::slice::from_ref(&card));
        Ok(())
    }

    pub fn stand(&mut self) -> Result<(), GameError> {
        let revealed = self.round.stand()?;
        self.observe(&revealed);
        Ok(())
    }

    pub fn double_down(&mut self) -> Result<(), GameError> {
        let revealed = self.round.double_down()?;
        self.observe(&revealed);
        Ok(())
    }

    pub fn split(&mut self) -> Result<(), GameError> {
        self.round.split()
    }

    /// Fresh shoe, same deck count, balance carried over. Resets the count.
    pub fn new_game(&mut self) {
        self.round = Round::new(self.round.num_decks(), self.round.balance(), None);
        self.reset_count();
    }

    /// Reshuffle the current shoe mid-session. Resets the count.
    pub fn shuffle(&mut self) {
        self.round.shuffle();
        self.reset_count();
    }

    /// Rebuild the table with a different shoe size; balance carries over.
    pub fn change_deck_count(&mut self, num_decks: u8) {
        self.round = Round::new(num_decks, self.round.balance(), None);
        self.reset_count();
    }

    fn reset_count(&mut self) {
        self.count = CardCount::fresh(self.round.num_decks());
        self.cards_played = 0;
    }

    fn observe(&mut self, cards: &[Card]) {
        self.cards_played += cards.len();
        self.count = self
            .count
            .update(cards, self.cards_played, self.round.num_decks());
    }

    /// Basic-strategy hint for the current decision, or `None` when there is
    /// no decision to make.
    pub fn strategy_hint(&self) -> Option<&'static str> {
        if self.round.player().cards.is_empty() {
            return None;
        }
        let dealer_up = self.round.dealer_up_card()?;
        Some(strategy::strategy_hint(
            self.round.player(),
            dealer_up,
            self.round.can_double_down(),
            self.round.can_split(),
        ))
    }

    pub fn betting_advice(&self, base_bet: u32) -> String {
        strategy::betting_advice(self.count.true_count, base_bet)
    }

    pub fn snapshot(&self) -> RoundSnapshot<'_> {
        self.round.snapshot()
    }

    pub fn summary(&self) -> Option<RoundSummary> {
        self.round.summary()
    }

    pub fn card_count(&self) -> CardCount {
        self.count
    }

    pub fn cards_played(&self) -> usize {
        self.cards_played
    }

    pub fn round(&self) -> &Round {
        &self.round
    }
}
