//! Card data records and runtime card instances

use crate::anim::CardState;
use crate::core::CardColor;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card width in scene units
pub const CARD_WIDTH: f32 = 100.0;
/// Card height in scene units
pub const CARD_HEIGHT: f32 = 150.0;

/// Fixed display marker for power cards
pub const POWER_MARKER: &str = "P";

/// Card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Battle,
    Power,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Battle => write!(f, "battle"),
            CardType::Power => write!(f, "power"),
        }
    }
}

impl FromStr for CardType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "battle" => Ok(CardType::Battle),
            "power" => Ok(CardType::Power),
            _ => Err(EngineError::UnknownCardType(s.to_string())),
        }
    }
}

/// Stable identifier for a card within its cardset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The data record a cardset is populated from, as supplied by the
/// rules/data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub color: CardColor,
    pub cost: u16,
    pub attack_points: u8,
    pub health_points: u8,
    pub type_id: CardType,
    /// Art identifier for the rendering layer
    pub image: String,
}

/// A single card's logical state during one screen's lifetime.
///
/// Identity data comes from [`CardData`]; the visual flags and geometry are
/// mutated by the selection protocol, the motion engine and game-rule
/// callers. Exactly one of {Static, Moving} is active at any instant.
#[derive(Debug)]
pub struct Card {
    id: CardId,
    pub color: CardColor,
    pub cost: u16,
    pub card_type: CardType,
    pub attack_points: u8,
    pub health_points: u8,
    pub image: String,

    pub face_up: bool,
    pub enabled: bool,
    pub marked: bool,
    pub highlighted: bool,
    pub selected: bool,

    pub x: f32,
    pub y: f32,
    /// Baseline x the card was placed at; open animations restore it
    pub origin_x: f32,
    pub scale_x: f32,
    pub scale_y: f32,

    display: String,
    pub(crate) state: CardState,
}

impl Card {
    /// Create a card from its data record. Cards start face down, closed
    /// (scale-x 0) and static.
    pub fn from_data(id: CardId, data: &CardData) -> Self {
        let mut card = Card {
            id,
            color: data.color,
            cost: data.cost,
            card_type: data.type_id,
            attack_points: data.attack_points,
            health_points: data.health_points,
            image: data.image.clone(),
            face_up: false,
            enabled: true,
            marked: false,
            highlighted: false,
            selected: false,
            x: 0.0,
            y: 0.0,
            origin_x: 0.0,
            scale_x: 0.0,
            scale_y: 1.0,
            display: String::new(),
            state: CardState::Static,
        };
        card.refresh_display();
        card
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn is_battle_card(&self) -> bool {
        self.card_type == CardType::Battle
    }

    pub fn is_power_card(&self) -> bool {
        self.card_type == CardType::Power
    }

    /// Opened/closed is a property of the card's geometry, tracked
    /// independently of the motion state.
    pub fn is_opened(&self) -> bool {
        self.scale_x > 0.0
    }

    pub fn is_closed(&self) -> bool {
        self.scale_x == 0.0
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn mark(&mut self) {
        self.marked = true;
    }

    pub fn unmark(&mut self) {
        self.marked = false;
    }

    pub fn highlight(&mut self) {
        self.highlighted = true;
    }

    pub fn unhighlight(&mut self) {
        self.highlighted = false;
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Place the card at its baseline position within the set.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.origin_x = x;
    }

    /// Turn the card face up or down, recomputing the display text.
    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
        self.refresh_display();
    }

    /// Current display text: `"AP/HP"` zero-padded to two digits for battle
    /// cards, a fixed marker for power cards, empty while face down.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub(crate) fn refresh_display(&mut self) {
        self.display = if !self.face_up {
            String::new()
        } else {
            match self.card_type {
                CardType::Battle => {
                    format!("{:02}/{:02}", self.attack_points, self.health_points)
                }
                CardType::Power => POWER_MARKER.to_string(),
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle_data() -> CardData {
        CardData {
            color: CardColor::Red,
            cost: 2,
            attack_points: 7,
            health_points: 3,
            type_id: CardType::Battle,
            image: "card-red-7".to_string(),
        }
    }

    #[test]
    fn test_card_starts_face_down_and_closed() {
        let card = Card::from_data(CardId::new(0), &battle_data());
        assert!(!card.face_up);
        assert!(card.is_closed());
        assert!(!card.is_opened());
        assert_eq!(card.display(), "");
    }

    #[test]
    fn test_battle_display_is_zero_padded() {
        let mut card = Card::from_data(CardId::new(0), &battle_data());
        card.set_face_up(true);
        assert_eq!(card.display(), "07/03");

        card.set_face_up(false);
        assert_eq!(card.display(), "");
    }

    #[test]
    fn test_power_display_marker() {
        let data = CardData {
            type_id: CardType::Power,
            ..battle_data()
        };
        let mut card = Card::from_data(CardId::new(0), &data);
        card.set_face_up(true);
        assert_eq!(card.display(), POWER_MARKER);
    }

    #[test]
    fn test_card_type_parsing() {
        assert_eq!("battle".parse::<CardType>().unwrap(), CardType::Battle);
        assert_eq!("Power".parse::<CardType>().unwrap(), CardType::Power);
        assert!(matches!(
            "land".parse::<CardType>(),
            Err(EngineError::UnknownCardType(_))
        ));
    }

    #[test]
    fn test_card_data_json_round_trip() {
        let data = battle_data();
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"battle\""));
        assert!(json.contains("\"red\""));
        let back: CardData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
