//! Animation keyframes and the standard move-sequence builders

use crate::core::{Card, CARD_WIDTH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fired by the animation host at a keyframe's start/complete boundary
pub type MoveCallback = Box<dyn FnMut()>;

/// Start-precondition evaluated against the card when a sequence is about
/// to play; a gated-out keyframe is dropped from the sequence.
pub type StartGate = Box<dyn Fn(&Card) -> bool>;

/// Extra caller-supplied gate ANDed into the open/close builders
pub type ExtraGate = Box<dyn Fn() -> bool>;

/// Easing curve for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
}

/// One animation keyframe: optional target geometry, timing, callbacks and
/// an optional start gate. Immutable once enqueued.
#[derive(Default)]
pub struct Move {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    /// Milliseconds to wait before the keyframe starts
    pub delay: u32,
    /// Milliseconds the keyframe animates for (0 = snap)
    pub duration: u32,
    pub ease: Ease,
    pub on_start: Option<MoveCallback>,
    pub on_complete: Option<MoveCallback>,
    pub can_start: Option<StartGate>,
}

/// An ordered list of keyframes played back-to-back as one chained animation
pub type MoveSequence = Vec<Move>;

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("scale_x", &self.scale_x)
            .field("scale_y", &self.scale_y)
            .field("delay", &self.delay)
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("on_start", &self.on_start.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .field("can_start", &self.can_start.is_some())
            .finish()
    }
}

impl Move {
    /// True when the keyframe may start against the card's current state.
    /// A move with no gate is always eligible.
    pub fn is_eligible(&self, card: &Card) -> bool {
        self.can_start.as_ref().map_or(true, |gate| gate(card))
    }
}

/// Configuration for a from/to positional move
pub struct MoveConfig {
    pub x_from: Option<f32>,
    pub y_from: Option<f32>,
    pub x_to: f32,
    pub y_to: f32,
    pub delay: u32,
    pub duration: u32,
    pub on_start: Option<MoveCallback>,
    pub on_complete: Option<MoveCallback>,
}

impl Default for MoveConfig {
    fn default() -> Self {
        MoveConfig {
            x_from: None,
            y_from: None,
            x_to: 0.0,
            y_to: 0.0,
            delay: 0,
            duration: 300,
            on_start: None,
            on_complete: None,
        }
    }
}

/// Configuration for the open/close scale animations
pub struct OpenCloseConfig {
    pub delay: u32,
    pub duration: u32,
    /// Extra start gate ANDed with the opened/closed check
    pub can_start: Option<ExtraGate>,
    pub on_complete: Option<MoveCallback>,
}

impl Default for OpenCloseConfig {
    fn default() -> Self {
        OpenCloseConfig {
            delay: 0,
            duration: 200,
            can_start: None,
            on_complete: None,
        }
    }
}

/// "Move from A to B": keyframe 0 snaps instantly to the from-position,
/// keyframe 1 animates to the target over the given duration/delay.
pub fn from_to_sequence(config: MoveConfig) -> MoveSequence {
    vec![
        Move {
            x: Some(config.x_from.unwrap_or(0.0)),
            y: Some(config.y_from.unwrap_or(0.0)),
            delay: 0,
            duration: 0,
            ..Move::default()
        },
        Move {
            x: Some(config.x_to),
            y: Some(config.y_to),
            delay: config.delay,
            duration: config.duration,
            on_start: config.on_start,
            on_complete: config.on_complete,
            ..Move::default()
        },
    ]
}

/// "Open": scale-x toward 1 with x restored to the card's baseline, gated
/// on the card currently being closed.
pub fn open_sequence(card: &Card, config: OpenCloseConfig) -> MoveSequence {
    let extra = config.can_start;
    vec![Move {
        x: Some(card.origin_x),
        scale_x: Some(1.0),
        ease: Ease::Linear,
        delay: config.delay,
        duration: config.duration,
        on_complete: config.on_complete,
        can_start: Some(Box::new(move |card: &Card| {
            card.is_closed() && extra.as_ref().map_or(true, |gate| gate())
        })),
        ..Move::default()
    }]
}

/// "Close": scale-x toward 0 with x recentered on the card's midline, gated
/// on the card currently being opened.
pub fn close_sequence(card: &Card, config: OpenCloseConfig) -> MoveSequence {
    let extra = config.can_start;
    vec![Move {
        x: Some(card.x + CARD_WIDTH / 2.0),
        scale_x: Some(0.0),
        ease: Ease::Linear,
        delay: config.delay,
        duration: config.duration,
        on_complete: config.on_complete,
        can_start: Some(Box::new(move |card: &Card| {
            card.is_opened() && extra.as_ref().map_or(true, |gate| gate())
        })),
        ..Move::default()
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardColor, CardData, CardId, CardType};

    fn card() -> Card {
        let data = CardData {
            color: CardColor::Blue,
            cost: 1,
            attack_points: 1,
            health_points: 1,
            type_id: CardType::Battle,
            image: "card-blue-1".to_string(),
        };
        Card::from_data(CardId::new(0), &data)
    }

    #[test]
    fn test_from_to_snaps_then_animates() {
        let seq = from_to_sequence(MoveConfig {
            x_from: Some(40.0),
            y_from: Some(8.0),
            x_to: 40.0,
            y_to: -12.0,
            duration: 10,
            ..MoveConfig::default()
        });
        assert_eq!(seq.len(), 2);
        assert_eq!(seq[0].duration, 0);
        assert_eq!(seq[0].x, Some(40.0));
        assert_eq!(seq[1].y, Some(-12.0));
        assert_eq!(seq[1].duration, 10);
    }

    #[test]
    fn test_open_gated_on_closed() {
        let mut card = card();
        let seq = open_sequence(&card, OpenCloseConfig::default());
        assert!(seq[0].is_eligible(&card)); // freshly created cards are closed

        card.scale_x = 1.0;
        assert!(!seq[0].is_eligible(&card));
    }

    #[test]
    fn test_close_gated_on_opened() {
        let mut card = card();
        let seq = close_sequence(&card, OpenCloseConfig::default());
        assert!(!seq[0].is_eligible(&card));

        card.scale_x = 1.0;
        assert!(seq[0].is_eligible(&card));
    }

    #[test]
    fn test_extra_gate_is_anded_in() {
        let mut card = card();
        card.scale_x = 1.0;
        let seq = close_sequence(
            &card,
            OpenCloseConfig {
                can_start: Some(Box::new(|| false)),
                ..OpenCloseConfig::default()
            },
        );
        assert!(!seq[0].is_eligible(&card));
    }

    #[test]
    fn test_ungated_move_always_eligible() {
        let card = card();
        let m = Move {
            x: Some(10.0),
            ..Move::default()
        };
        assert!(m.is_eligible(&card));
    }
}
