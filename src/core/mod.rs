//! Core card types: colors, points budget, data records

pub mod card;
pub mod color;

pub use card::{Card, CardData, CardId, CardType, CARD_HEIGHT, CARD_WIDTH, POWER_MARKER};
pub use color::{CardColor, ColorsPoints};
