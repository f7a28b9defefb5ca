use thiserror::Error;

use crate::game::Phase;

/// Everything a round transition can reject with.
///
/// `InvalidPhase`, `DoubleDownUnavailable`, and `NoBetPlaced` are caller
/// logic bugs (broken preconditions); the bet variants are ordinary input
/// rejections. Precondition and input rejections leave the bet, balance,
/// and phase untouched; running the shoe dry mid-draw is only recoverable
/// by reshuffling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("cannot draw from an empty deck")]
    EmptyDeck,
    #[error("{action} is not allowed during the {phase:?} phase")]
    InvalidPhase { action: &'static str, phase: Phase },
    #[error("double down is no longer available")]
    DoubleDownUnavailable,
    #[error("no bet has been placed")]
    NoBetPlaced,
    #[error("minimum bet is ${min}")]
    BetBelowMinimum { min: u32 },
    #[error("insufficient funds: need ${needed}, have ${available}")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("{feature} is not supported yet")]
    Unsupported { feature: &'static str },
}
