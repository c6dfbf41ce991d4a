//! Card colors and the per-color points budget

use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six card colors of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardColor {
    Red,
    Green,
    Blue,
    Black,
    White,
    Orange,
}

impl CardColor {
    pub const ALL: [CardColor; 6] = [
        CardColor::Red,
        CardColor::Green,
        CardColor::Blue,
        CardColor::Black,
        CardColor::White,
        CardColor::Orange,
    ];
}

impl fmt::Display for CardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardColor::Red => write!(f, "red"),
            CardColor::Green => write!(f, "green"),
            CardColor::Blue => write!(f, "blue"),
            CardColor::Black => write!(f, "black"),
            CardColor::White => write!(f, "white"),
            CardColor::Orange => write!(f, "orange"),
        }
    }
}

impl FromStr for CardColor {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "red" => Ok(CardColor::Red),
            "green" => Ok(CardColor::Green),
            "blue" => Ok(CardColor::Blue),
            "black" => Ok(CardColor::Black),
            "white" => Ok(CardColor::White),
            "orange" => Ok(CardColor::Orange),
            _ => Err(EngineError::UnknownColor(s.to_string())),
        }
    }
}

/// Per-color points budget
///
/// Shared by reference between the rules layer and an active selection
/// session (`Rc<RefCell<ColorsPoints>>`). The budget outlives any single
/// session; only the active session mutates it while selection is running,
/// and all mutation happens synchronously inside input-event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorsPoints {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub black: u16,
    pub white: u16,
    pub orange: u16,
}

impl ColorsPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: CardColor) -> u16 {
        match color {
            CardColor::Red => self.red,
            CardColor::Green => self.green,
            CardColor::Blue => self.blue,
            CardColor::Black => self.black,
            CardColor::White => self.white,
            CardColor::Orange => self.orange,
        }
    }

    pub fn set(&mut self, color: CardColor, value: u16) {
        *self.slot_mut(color) = value;
    }

    /// Refund points of a color (e.g. a card was unselected)
    pub fn credit(&mut self, color: CardColor, amount: u16) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(amount);
    }

    /// Spend points of a color (e.g. a card was selected)
    pub fn debit(&mut self, color: CardColor, amount: u16) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_sub(amount);
    }

    /// A cost is affordable while the color's remaining budget covers it
    pub fn can_afford(&self, color: CardColor, cost: u16) -> bool {
        self.get(color) >= cost
    }

    pub fn total(&self) -> u32 {
        CardColor::ALL
            .iter()
            .map(|&c| u32::from(self.get(c)))
            .sum()
    }

    fn slot_mut(&mut self, color: CardColor) -> &mut u16 {
        match color {
            CardColor::Red => &mut self.red,
            CardColor::Green => &mut self.green,
            CardColor::Blue => &mut self.blue,
            CardColor::Black => &mut self.black,
            CardColor::White => &mut self.white,
            CardColor::Orange => &mut self.orange,
        }
    }
}

impl fmt::Display for ColorsPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "red: {:02}, green: {:02}, blue: {:02}, black: {:02}, white: {:02}, orange: {:02}",
            self.red, self.green, self.blue, self.black, self.white, self.orange
        )
    }
}
