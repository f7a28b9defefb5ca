use wasm_bindgen::prelude::*;

pub mod counter;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod storage;
pub mod strategy;
pub mod table;

pub use counter::{card_point, CardCount};
pub use deck::{Card, Deck, Rank, Suit};
pub use error::GameError;
pub use game::{Phase, Round, RoundOutcome, RoundSummary, MIN_BET};
pub use hand::{evaluate, Hand, HandValue};
pub use storage::{MemStorage, Storage};
pub use table::Table;

#[cfg(target_arch = "wasm32")]
fn console_log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn console_log(_msg: &str) {}

fn to_js(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The JS-facing trainer session: one table, one Hi-Lo count. Every intent
/// from the UI lands here; snapshots go back out through
/// `serde-wasm-bindgen`.
#[wasm_bindgen]
pub struct Trainer {
    table: Table,
}

#[wasm_bindgen]
impl Trainer {
    #[wasm_bindgen(constructor)]
    pub fn new(num_decks: u8, starting_balance: u32) -> Trainer {
        console_error_panic_hook::set_once();
        Trainer {
            table: Table::new(num_decks, starting_balance, None),
        }
    }

    pub fn place_bet(&mut self, amount: u32) -> Result<(), JsValue> {
        self.table.place_bet(amount).map_err(to_js)
    }

    pub fn deal(&mut self) -> Result<JsValue, JsValue> {
        self.table.deal().map_err(to_js)?;
        self.state()
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        self.table.hit().map_err(to_js)?;
        self.state()
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        self.table.stand().map_err(to_js)?;
        self.state()
    }

    pub fn double_down(&mut self) -> Result<JsValue, JsValue> {
        self.table.double_down().map_err(to_js)?;
        self.state()
    }

    pub fn split(&mut self) -> Result<(), JsValue> {
        self.table.split().map_err(to_js)
    }

    pub fn new_game(&mut self) {
        self.table.new_game();
        console_log("new game: fresh shoe, count reset");
    }

    pub fn shuffle(&mut self) {
        self.table.shuffle();
        console_log("deck shuffled, count reset");
    }

    pub fn change_deck_count(&mut self, num_decks: u8) {
        self.table.change_deck_count(num_decks);
        console_log("deck configuration changed, count reset");
    }

    /// Current round snapshot (hands, bet, balance, phase, result).
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.table.snapshot())
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }

    /// Current Hi-Lo count (running, true, decks remaining).
    pub fn card_count(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.table.card_count())
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }

    /// Stats contribution of the settled round, or `null` while it is live.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.table.summary())
            .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
    }

    pub fn strategy_hint(&self) -> Option<String> {
        self.table.strategy_hint().map(str::to_string)
    }

    pub fn betting_advice(&self, base_bet: u32) -> String {
        self.table.betting_advice(base_bet)
    }

    pub fn cards_played(&self) -> u32 {
        self.table.cards_played() as u32
    }
}
