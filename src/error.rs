//! Error types for the card interaction engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid state transition: cannot call {op}() while {state}")]
    InvalidStateTransition {
        state: &'static str,
        op: &'static str,
    },

    #[error("card index {index} out of bounds (cardset has {len} cards)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("keyboard input is not available for this cardset")]
    InputUnavailable,

    #[error("unknown card color: {0}")]
    UnknownColor(String),

    #[error("unknown card type: {0}")]
    UnknownCardType(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
