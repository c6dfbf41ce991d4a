//! Ordered card collections
//!
//! A cardset owns an ordered list of cards with stable indices for its
//! lifetime, a z-order for rendering, an optional keyboard and the
//! collection-level interaction state. The phase orchestrator creates one
//! per board, hand or field screen and destroys it on teardown.

pub mod select;
pub mod state;


pub use select::{SelectConfig, SelectEvents, SelectState};
pub use state::CardsetState;

use crate::anim::{AnimationHost, MoveCallback, OpenCloseConfig};
use crate::core::{Card, CardData, CardId, CARD_WIDTH};
use crate::input::{InputEvent, Keyboard};
use crate::{EngineError, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Configuration for moving a whole set to a new baseline position
pub struct MoveAllConfig {
    pub x: f32,
    pub y: f32,
    pub delay_step: u32,
    pub duration: u32,
    pub on_all_complete: Option<MoveCallback>,
}

impl Default for MoveAllConfig {
    fn default() -> Self {
        MoveAllConfig {
            x: 0.0,
            y: 0.0,
            delay_step: 100,
            duration: 300,
            on_all_complete: None,
        }
    }
}

pub struct Cardset {
    cards: Vec<Card>,
    /// Render order, back to front. Indices stay stable; only this changes.
    z_order: Vec<usize>,
    keyboard: Option<Keyboard>,
    pub(crate) state: CardsetState,
}

impl Cardset {
    /// Build a set from the provider's data records, placing cards side by
    /// side at the baseline.
    pub fn from_data(records: &[CardData]) -> Self {
        let cards = records
            .iter()
            .enumerate()
            .map(|(i, data)| {
                let mut card = Card::from_data(CardId::new(i as u32), data);
                card.set_position(i as f32 * CARD_WIDTH, 0.0);
                card
            })
            .collect::<Vec<_>>();
        let z_order = (0..cards.len()).collect();
        Cardset {
            cards,
            z_order,
            keyboard: None,
            state: CardsetState::Static,
        }
    }

    pub fn attach_keyboard(&mut self, keyboard: Keyboard) {
        self.keyboard = Some(keyboard);
    }

    pub fn has_keyboard(&self) -> bool {
        self.keyboard.is_some()
    }

    pub fn keyboard_mut(&mut self) -> Option<&mut Keyboard> {
        self.keyboard.as_mut()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.cards.len()
    }

    pub fn card(&self, index: usize) -> Result<&Card> {
        self.cards.get(index).ok_or(EngineError::IndexOutOfBounds {
            index,
            len: self.cards.len(),
        })
    }

    pub fn card_mut(&mut self, index: usize) -> Result<&mut Card> {
        let len = self.cards.len();
        self.cards
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfBounds { index, len })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    /// Cards in the inclusive index range, clamped at the upper end.
    pub fn cards_from_to(&self, from: usize, to: usize) -> &[Card] {
        let to = to.min(self.cards.len().saturating_sub(1));
        if from > to || self.cards.is_empty() {
            return &[];
        }
        &self.cards[from..=to]
    }

    /// Back-to-front render order
    pub fn z_order(&self) -> &[usize] {
        &self.z_order
    }

    /// Move a card to the back of the render order.
    pub fn send_to_back(&mut self, index: usize) {
        if let Some(pos) = self.z_order.iter().position(|&i| i == index) {
            self.z_order.remove(pos);
            self.z_order.insert(0, index);
        }
    }

    /// Move a card to the front of the render order.
    pub fn bring_to_front(&mut self, index: usize) {
        if let Some(pos) = self.z_order.iter().position(|&i| i == index) {
            self.z_order.remove(pos);
            self.z_order.push(index);
        }
    }

    /// Reset every card to the known baseline: unselected (slid back to
    /// the baseline y), unmarked, unhighlighted, enabled, original z-order.
    pub fn reset_cards_state(&mut self) {
        self.z_order = (0..self.cards.len()).collect();
        for card in &mut self.cards {
            card.deselect();
            card.move_from_to(crate::anim::MoveConfig {
                x_from: Some(card.x),
                y_from: Some(card.y),
                x_to: card.x,
                y_to: 0.0,
                duration: 10,
                ..Default::default()
            });
            card.unmark();
            card.unhighlight();
            card.enable();
        }
    }

    /// Advance every card's motion queue and feed pending input to the
    /// interaction state. Called once per logical frame by the host scene.
    pub fn update(&mut self, host: &mut dyn AnimationHost) {
        for card in &mut self.cards {
            card.tick(host);
        }
        let events = match &mut self.keyboard {
            Some(keyboard) => keyboard.drain(),
            None => Vec::new(),
        };
        for event in events {
            self.handle_input(event);
        }
    }

    /// Dispatch one input event to the active interaction state. Events
    /// arriving while static are discarded.
    pub fn handle_input(&mut self, event: InputEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            CardsetState::Static => CardsetState::Static,
            CardsetState::Select(mut select) => {
                if select.handle_input(self, event) {
                    CardsetState::Static
                } else {
                    CardsetState::Select(select)
                }
            }
        };
    }

    /// Begin a selection session. Fails when the cardset has no keyboard
    /// to receive input from.
    pub fn enter_select_mode(&mut self, config: SelectConfig) -> Result<()> {
        if self.keyboard.is_none() {
            return Err(EngineError::InputUnavailable);
        }
        let mut select = SelectState::new(config);
        select.enable(self);
        self.state = CardsetState::Select(select);
        Ok(())
    }

    pub fn is_select_mode(&self) -> bool {
        matches!(self.state, CardsetState::Select(_))
    }

    /// Ordered list of indexes selected so far in the active session.
    pub fn select_indexes(&self) -> Result<Vec<usize>> {
        match &self.state {
            CardsetState::Select(select) => Ok(select.select_indexes()),
            CardsetState::Static => Err(EngineError::InvalidStateTransition {
                state: self.state.name(),
                op: "select_indexes",
            }),
        }
    }

    /// Session filter: exclude all battle cards from being picked.
    pub fn disable_battle_cards(&mut self) -> Result<()> {
        self.with_select("disable_battle_cards", |select, set| {
            select.disable_battle_cards(set)
        })
    }

    /// Session filter: exclude all power cards from being picked.
    pub fn disable_power_cards(&mut self) -> Result<()> {
        self.with_select("disable_power_cards", |select, set| {
            select.disable_power_cards(set)
        })
    }

    /// Roll back the most recent pick, refunding its cost; used by rule
    /// logic outside the input-driven flow.
    pub fn remove_select_last_index(&mut self) -> Result<()> {
        self.with_select("remove_select_last_index", |select, set| {
            select.remove_select_last_index(set)
        })
    }

    fn with_select<R>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut SelectState, &mut Cardset) -> R,
    ) -> Result<R> {
        let state = std::mem::take(&mut self.state);
        match state {
            CardsetState::Select(mut select) => {
                let out = f(&mut select, self);
                self.state = CardsetState::Select(select);
                Ok(out)
            }
            CardsetState::Static => Err(EngineError::InvalidStateTransition {
                state: "static",
                op,
            }),
        }
    }

    /// Open every card with a fixed per-card delay increment; the callback
    /// fires once the last card's chain completes. Every card must currently
    /// be closed: a card whose open is gated out never counts down, and the
    /// callback is lost with it.
    pub fn open_all(&mut self, delay_step: u32, on_all_complete: Option<MoveCallback>) {
        let pending = match Self::all_complete_counter(self.cards.len(), on_all_complete) {
            Some(pending) => pending,
            None => return,
        };
        for (i, card) in self.cards.iter_mut().enumerate() {
            card.open(OpenCloseConfig {
                delay: i as u32 * delay_step,
                on_complete: Some(Self::count_down(&pending)),
                ..Default::default()
            });
        }
    }

    /// Close every card with a staggered delay, mirroring [`open_all`];
    /// the same precondition applies, with every card currently opened.
    pub fn close_all(&mut self, delay_step: u32, on_all_complete: Option<MoveCallback>) {
        let pending = match Self::all_complete_counter(self.cards.len(), on_all_complete) {
            Some(pending) => pending,
            None => return,
        };
        for (i, card) in self.cards.iter_mut().enumerate() {
            card.close(OpenCloseConfig {
                delay: i as u32 * delay_step,
                on_complete: Some(Self::count_down(&pending)),
                ..Default::default()
            });
        }
    }

    /// Slide the whole set to a new baseline with a staggered delay.
    pub fn move_all_from_to(&mut self, config: MoveAllConfig) {
        let pending = match Self::all_complete_counter(self.cards.len(), config.on_all_complete) {
            Some(pending) => pending,
            None => return,
        };
        for (i, card) in self.cards.iter_mut().enumerate() {
            let target_x = config.x + i as f32 * CARD_WIDTH;
            card.move_from_to(crate::anim::MoveConfig {
                x_from: Some(card.x),
                y_from: Some(card.y),
                x_to: target_x,
                y_to: config.y,
                delay: i as u32 * config.delay_step,
                duration: config.duration,
                on_complete: Some(Self::count_down(&pending)),
                ..Default::default()
            });
            card.origin_x = target_x;
        }
    }

    fn all_complete_counter(
        total: usize,
        on_all_complete: Option<MoveCallback>,
    ) -> Option<Rc<RefCell<(usize, Option<MoveCallback>)>>> {
        if total == 0 {
            if let Some(mut cb) = on_all_complete {
                cb();
            }
            return None;
        }
        Some(Rc::new(RefCell::new((total, on_all_complete))))
    }

    fn count_down(pending: &Rc<RefCell<(usize, Option<MoveCallback>)>>) -> MoveCallback {
        let pending = Rc::clone(pending);
        Box::new(move || {
            let mut p = pending.borrow_mut();
            p.0 -= 1;
            if p.0 == 0 {
                if let Some(cb) = p.1.as_mut() {
                    cb();
                }
            }
        })
    }
}
