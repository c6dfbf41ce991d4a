//! Per-card motion state machine
//!
//! A card is either `Static` or `Moving`. `Moving` owns a FIFO queue of
//! move-sequences; at most one sequence is in flight at a time and the
//! queue advances on every logical tick. Sequences are queued rather than
//! played immediately so callers can push many of them without blocking
//! ("open every card in a hand with a staggered delay") while the engine
//! self-drains one at a time, preserving per-card ordering.

use crate::anim::host::{AnimationHost, PlaybackHandle};
use crate::anim::moves::{
    close_sequence, from_to_sequence, open_sequence, MoveCallback, MoveConfig, MoveSequence,
    OpenCloseConfig,
};
use crate::core::Card;
use crate::{EngineError, Result};
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt;

/// Which displayed point value an update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardPoints {
    Attack,
    Health,
}

/// A points change applied to a static card's display
pub struct UpdatePoints {
    pub target: CardPoints,
    pub to: u8,
    pub on_complete: Option<MoveCallback>,
}

/// A one-shot flash effect request
#[derive(Debug, Clone, Copy)]
pub struct FlashConfig {
    pub color: u32,
    pub duration: u32,
}

impl Default for FlashConfig {
    fn default() -> Self {
        FlashConfig {
            color: 0xffffff,
            duration: 120,
        }
    }
}

/// Terminal geometry of a filtered sequence, applied to the card model
/// when its playback finishes (the host animates, the model snaps at end).
#[derive(Debug, Clone, Copy, Default)]
struct MoveEnd {
    x: Option<f32>,
    y: Option<f32>,
    scale_x: Option<f32>,
    scale_y: Option<f32>,
}

impl MoveEnd {
    fn of(seq: &MoveSequence) -> Self {
        let mut end = MoveEnd::default();
        for m in seq {
            if m.x.is_some() {
                end.x = m.x;
            }
            if m.y.is_some() {
                end.y = m.y;
            }
            if m.scale_x.is_some() {
                end.scale_x = m.scale_x;
            }
            if m.scale_y.is_some() {
                end.scale_y = m.scale_y;
            }
        }
        end
    }

    fn apply(&self, card: &mut Card) {
        if let Some(x) = self.x {
            card.x = x;
        }
        if let Some(y) = self.y {
            card.y = y;
        }
        if let Some(scale_x) = self.scale_x {
            card.scale_x = scale_x;
        }
        if let Some(scale_y) = self.scale_y {
            card.scale_y = scale_y;
        }
    }
}

struct InFlight {
    handle: PlaybackHandle,
    end: MoveEnd,
}

/// Queue of move-sequences for a card in motion
#[derive(Default)]
pub struct MovingState {
    queue: VecDeque<MoveSequence>,
    in_flight: SmallVec<[InFlight; 1]>,
}

impl MovingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, seq: MoveSequence) {
        self.queue.push_back(seq);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Advance the queue one step. Returns true when fully drained
    /// (nothing queued, nothing in flight) so the card can go static.
    fn tick(&mut self, card: &mut Card, host: &mut dyn AnimationHost) -> bool {
        if self.in_flight.iter().any(|p| host.is_playing(p.handle)) {
            return false;
        }
        for finished in self.in_flight.drain(..) {
            finished.end.apply(card);
        }
        if let Some(seq) = self.queue.pop_front() {
            let seq: MoveSequence = seq.into_iter().filter(|m| m.is_eligible(card)).collect();
            // An all-gated-out sequence is dropped with no visual effect
            if !seq.is_empty() {
                let end = MoveEnd::of(&seq);
                let handle = host.play(card.id(), seq);
                self.in_flight.push(InFlight { handle, end });
            }
        }
        self.queue.is_empty() && self.in_flight.is_empty()
    }
}

/// The card motion state: exactly one variant is active at any instant,
/// and transition is an explicit assignment of the active variant.
#[derive(Default)]
pub enum CardState {
    #[default]
    Static,
    Moving(MovingState),
}

impl fmt::Debug for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardState::Static => f.write_str("Static"),
            CardState::Moving(moving) => f
                .debug_struct("Moving")
                .field("queued", &moving.queued())
                .finish(),
        }
    }
}

impl CardState {
    pub fn name(&self) -> &'static str {
        match self {
            CardState::Static => "static",
            CardState::Moving(_) => "moving",
        }
    }
}

impl Card {
    pub fn is_static(&self) -> bool {
        matches!(self.state, CardState::Static)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, CardState::Moving(_))
    }

    /// Append a move-sequence to the card's queue. A static card enters
    /// the moving state first; the static state holds no queue itself.
    /// Geometric values are not validated.
    pub fn enqueue_moves(&mut self, seq: MoveSequence) {
        match &mut self.state {
            CardState::Moving(moving) => moving.enqueue(seq),
            CardState::Static => {
                let mut moving = MovingState::new();
                moving.enqueue(seq);
                self.state = CardState::Moving(moving);
            }
        }
    }

    /// Explicit transition into the moving state with an empty queue.
    /// A card already mid-motion cannot be asked to re-enter.
    pub fn moving(&mut self) -> Result<()> {
        match self.state {
            CardState::Moving(_) => Err(EngineError::InvalidStateTransition {
                state: self.state.name(),
                op: "moving",
            }),
            CardState::Static => {
                self.state = CardState::Moving(MovingState::new());
                Ok(())
            }
        }
    }

    /// Explicit transition to static; used once the queue drains.
    pub fn finish_motion(&mut self) {
        self.state = CardState::Static;
    }

    /// Advance the motion queue by one logical frame. While a playback is
    /// running this is a no-op; once the queue drains and nothing is in
    /// flight the card transitions back to static.
    pub fn tick(&mut self, host: &mut dyn AnimationHost) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            CardState::Static => CardState::Static,
            CardState::Moving(mut moving) => {
                if moving.tick(self, host) {
                    CardState::Static
                } else {
                    CardState::Moving(moving)
                }
            }
        };
    }

    /// Apply a points change and recompute the display text. Illegal while
    /// the card is mid-motion.
    pub fn updating(&mut self, update: UpdatePoints) -> Result<()> {
        if self.is_moving() {
            return Err(EngineError::InvalidStateTransition {
                state: self.state.name(),
                op: "updating",
            });
        }
        match update.target {
            CardPoints::Attack => self.attack_points = update.to,
            CardPoints::Health => self.health_points = update.to,
        }
        self.refresh_display();
        if let Some(mut cb) = update.on_complete {
            cb();
        }
        Ok(())
    }

    /// Request a one-shot flash effect. Illegal while mid-motion.
    pub fn flash(&mut self, config: FlashConfig, host: &mut dyn AnimationHost) -> Result<()> {
        if self.is_moving() {
            return Err(EngineError::InvalidStateTransition {
                state: self.state.name(),
                op: "flash",
            });
        }
        host.flash(self.id(), config.color, config.duration);
        Ok(())
    }

    /// Queue a from/to positional move.
    pub fn move_from_to(&mut self, config: MoveConfig) {
        let seq = from_to_sequence(config);
        self.enqueue_moves(seq);
    }

    /// Queue an open animation (no-op at play time unless the card is
    /// closed, so callers never need a defensive pre-check).
    pub fn open(&mut self, config: OpenCloseConfig) {
        let seq = open_sequence(self, config);
        self.enqueue_moves(seq);
    }

    /// Queue a close animation, gated on the card being opened.
    pub fn close(&mut self, config: OpenCloseConfig) {
        let seq = close_sequence(self, config);
        self.enqueue_moves(seq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::host::TickHost;
    use crate::anim::moves::Move;
    use crate::core::{CardColor, CardData, CardId, CardType};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn card() -> Card {
        let data = CardData {
            color: CardColor::Green,
            cost: 1,
            attack_points: 2,
            health_points: 4,
            type_id: CardType::Battle,
            image: "card-green-2".to_string(),
        };
        Card::from_data(CardId::new(7), &data)
    }

    fn tagged_move(duration: u32, log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> Move {
        let log = Rc::clone(log);
        Move {
            y: Some(-12.0),
            duration,
            on_start: Some(Box::new(move || log.borrow_mut().push(tag))),
            ..Move::default()
        }
    }

    #[test]
    fn test_enqueue_transitions_static_to_moving() {
        let mut card = card();
        assert!(card.is_static());
        card.enqueue_moves(vec![Move {
            y: Some(5.0),
            duration: 100,
            ..Move::default()
        }]);
        assert!(card.is_moving());
        assert!(!card.is_static());
    }

    #[test]
    fn test_fifo_order_across_sequences() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = TickHost::new();
        let mut card = card();

        card.enqueue_moves(vec![tagged_move(100, &log, "first")]);
        card.enqueue_moves(vec![tagged_move(100, &log, "second")]);

        card.tick(&mut host);
        assert_eq!(*log.borrow(), vec!["first"]);

        // Still in flight: nothing new starts
        host.advance(50);
        card.tick(&mut host);
        assert_eq!(*log.borrow(), vec!["first"]);

        host.advance(50);
        card.tick(&mut host);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_gated_out_sequence_dropped_silently() {
        let completed = Rc::new(RefCell::new(false));
        let completed_clone = Rc::clone(&completed);
        let mut host = TickHost::new();
        let mut card = card(); // closed: a close sequence gates out

        card.close(OpenCloseConfig {
            on_complete: Some(Box::new(move || *completed_clone.borrow_mut() = true)),
            ..OpenCloseConfig::default()
        });
        assert!(card.is_moving());

        card.tick(&mut host);
        assert!(card.is_static());
        assert!(!*completed.borrow());
        assert!(card.is_closed());
    }

    #[test]
    fn test_open_applies_terminal_geometry_and_drains() {
        let mut host = TickHost::new();
        let mut card = card();
        card.set_position(40.0, 0.0);

        card.open(OpenCloseConfig::default());
        card.tick(&mut host);
        assert!(card.is_moving());

        host.run_to_completion();
        card.tick(&mut host);
        assert!(card.is_static());
        assert!(card.is_opened());
        assert_eq!(card.scale_x, 1.0);
        assert_eq!(card.x, 40.0);
    }

    #[test]
    fn test_open_then_close_chains_through_gates() {
        let mut host = TickHost::new();
        let mut card = card();

        card.open(OpenCloseConfig::default());
        card.close(OpenCloseConfig::default());

        card.tick(&mut host); // open starts
        host.run_to_completion();
        card.tick(&mut host); // open retires, close starts (card now opened)
        host.run_to_completion();
        card.tick(&mut host);

        assert!(card.is_static());
        assert!(card.is_closed());
    }

    #[test]
    fn test_reentry_is_a_state_error() {
        let mut card = card();
        card.enqueue_moves(vec![Move {
            x: Some(1.0),
            duration: 50,
            ..Move::default()
        }]);

        assert!(matches!(
            card.moving(),
            Err(EngineError::InvalidStateTransition { op: "moving", .. })
        ));
        assert!(matches!(
            card.updating(UpdatePoints {
                target: CardPoints::Attack,
                to: 9,
                on_complete: None,
            }),
            Err(EngineError::InvalidStateTransition { op: "updating", .. })
        ));
        let mut host = TickHost::new();
        assert!(matches!(
            card.flash(FlashConfig::default(), &mut host),
            Err(EngineError::InvalidStateTransition { op: "flash", .. })
        ));
    }

    #[test]
    fn test_updating_static_card_refreshes_display() {
        let mut card = card();
        card.set_face_up(true);
        assert_eq!(card.display(), "02/04");

        card.updating(UpdatePoints {
            target: CardPoints::Health,
            to: 1,
            on_complete: None,
        })
        .unwrap();
        assert_eq!(card.display(), "02/01");
    }

    #[test]
    fn test_flash_static_card_reaches_host() {
        let mut host = TickHost::new();
        let mut card = card();
        card.flash(FlashConfig::default(), &mut host).unwrap();
        assert_eq!(host.flashes().len(), 1);
    }
}
