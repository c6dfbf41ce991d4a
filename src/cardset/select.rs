//! Constrained multi-select protocol over a cardset
//!
//! A session turns discrete input events into a validated selection:
//! cursor navigation with clamping, confirm to select/unselect under a
//! shared per-color budget and an optional selection-count limit, cancel
//! to commit a partial pick or abort. Disabled-index bookkeeping covers
//! both cards that were selected (cannot be re-entered without unselecting
//! first) and cards ruled out for the session (unaffordable or excluded
//! by type).

use crate::anim::MoveConfig;
use crate::cardset::Cardset;
use crate::core::ColorsPoints;
use crate::input::InputEvent;
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

/// Vertical offset of the card under the cursor
const CURSOR_RAISE_Y: f32 = -12.0;
/// Duration of the cursor slide animations
const CURSOR_SLIDE_MS: u32 = 10;

/// Event callbacks into the rules layer
#[derive(Default)]
pub struct SelectEvents {
    pub on_change_index: Option<Box<dyn FnMut(usize)>>,
    pub on_marked: Option<Box<dyn FnMut(usize)>>,
    pub on_completed: Option<Box<dyn FnMut(&[usize])>>,
    pub on_leave: Option<Box<dyn FnMut()>>,
}

/// Configuration for one selection session
#[derive(Default)]
pub struct SelectConfig {
    pub events: SelectEvents,
    /// Shared budget, debited on select and credited back on unselect.
    /// The budget outlives the session; the session is its only writer
    /// while active.
    pub colors_points: Option<Rc<RefCell<ColorsPoints>>>,
    /// Maximum number of picks; 0 means unlimited
    pub select_limit: usize,
    pub start_index: usize,
}

/// One activation of select mode, from creation to the terminal
/// `on_completed`/`on_leave`.
pub struct SelectState {
    index: usize,
    select_limit: usize,
    events: SelectEvents,
    colors_points: Option<Rc<RefCell<ColorsPoints>>>,
    /// Ordered picks; doubles as the undo stack
    select_stack: Vec<usize>,
    disabled: FxHashSet<usize>,
}

impl SelectState {
    pub fn new(config: SelectConfig) -> Self {
        SelectState {
            index: config.start_index,
            select_limit: config.select_limit,
            events: config.events,
            colors_points: config.colors_points,
            select_stack: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Bring the set to the session baseline and raise the starting cursor
    /// card. Cards already unaffordable under the budget are disabled up
    /// front.
    pub(crate) fn enable(&mut self, set: &mut Cardset) {
        set.reset_cards_state();
        self.update_cards_state(set);
        // An out-of-range start index lands on the last card; navigation
        // must never index past the set.
        self.index = self.index.min(set.len().saturating_sub(1));
        self.update_cursor(set, self.index);
    }

    /// Ordered list of indexes selected so far
    pub fn select_indexes(&self) -> Vec<usize> {
        self.select_stack.clone()
    }

    /// Session filter: disable every battle card for the session.
    pub(crate) fn disable_battle_cards(&mut self, set: &mut Cardset) {
        for i in 0..set.len() {
            if set.cards()[i].is_battle_card() {
                set.cards_mut()[i].disable();
                self.disabled.insert(i);
            }
        }
    }

    /// Session filter: disable every power card for the session.
    pub(crate) fn disable_power_cards(&mut self, set: &mut Cardset) {
        for i in 0..set.len() {
            if set.cards()[i].is_power_card() {
                set.cards_mut()[i].disable();
                self.disabled.insert(i);
            }
        }
    }

    /// Undo primitive: pop the most recent pick, unmark it, refund its
    /// cost and make it selectable again.
    pub(crate) fn remove_select_last_index(&mut self, set: &mut Cardset) {
        let Some(last) = self.select_stack.pop() else {
            return;
        };
        Self::unmark_card(set, last);
        self.credit_points(set, last);
        self.disabled.remove(&last);
    }

    /// Dispatch one input event. Returns true when the session reached its
    /// terminal state and the set should go static.
    pub(crate) fn handle_input(&mut self, set: &mut Cardset, event: InputEvent) -> bool {
        match event {
            InputEvent::CursorForward => {
                self.on_cursor_move(set, 1);
                false
            }
            InputEvent::CursorBack => {
                self.on_cursor_move(set, -1);
                false
            }
            InputEvent::Confirm => self.on_confirm(set),
            InputEvent::Cancel => self.on_cancel(set),
        }
    }

    fn on_cursor_move(&mut self, set: &mut Cardset, delta: i64) {
        let new_index = self.index as i64 + delta;
        if new_index < 0 {
            return; // clamped, silently: holding a direction must be safe
        }
        self.update_cursor(set, new_index as usize);
    }

    fn update_cursor(&mut self, set: &mut Cardset, new_index: usize) {
        if !set.is_valid_index(new_index) {
            return;
        }
        let last = self.index;
        Self::send_cards_to_back(set, last);
        Self::deselect_card(set, last);
        self.index = new_index.min(set.len() - 1);
        Self::select_card(set, self.index);
        if let Some(cb) = self.events.on_change_index.as_mut() {
            cb(self.index);
        }
    }

    fn on_confirm(&mut self, set: &mut Cardset) -> bool {
        let index = self.index;
        if !self.is_available(set, index) {
            return false;
        }
        if self.is_selected(index) {
            // Unselect: pop the pick, refund its cost, make it selectable
            self.select_stack.retain(|&i| i != index);
            self.disabled.remove(&index);
            self.credit_points(set, index);
            Self::unmark_card(set, index);
        } else {
            self.select_stack.push(index);
            self.disabled.insert(index);
            self.debit_points(set, index);
            // A limit of exactly 1 terminates immediately, so the mark is
            // never shown for it
            if self.select_limit != 1 {
                Self::mark_card(set, index);
            }
            if let Some(cb) = self.events.on_marked.as_mut() {
                cb(index);
            }
        }
        if self.is_limit_reached() || self.is_select_all(set) || self.is_no_more_points(set) {
            self.finish(set);
            let indexes = self.select_stack.clone();
            if let Some(cb) = self.events.on_completed.as_mut() {
                cb(&indexes);
            }
            return true;
        }
        false
    }

    fn on_cancel(&mut self, set: &mut Cardset) -> bool {
        self.finish(set);
        if !self.select_stack.is_empty() {
            // Cancel commits the partial selection
            let indexes = self.select_stack.clone();
            if let Some(cb) = self.events.on_completed.as_mut() {
                cb(&indexes);
            }
        } else if let Some(cb) = self.events.on_leave.as_mut() {
            cb();
        }
        true
    }

    /// Disable cards the budget can no longer cover and restore the marks
    /// of already-selected indexes.
    fn update_cards_state(&mut self, set: &mut Cardset) {
        for i in 0..set.len() {
            if self.card_unaffordable(set, i) {
                self.disabled.insert(i);
            }
            if self.disabled.contains(&i) {
                set.cards_mut()[i].disable();
            }
            if self.select_stack.contains(&i) {
                Self::mark_card(set, i);
            }
        }
    }

    fn is_available(&self, set: &Cardset, index: usize) -> bool {
        if !set.is_valid_index(index) {
            return false;
        }
        !self.disabled.contains(&index) || self.is_selected(index)
    }

    fn is_selected(&self, index: usize) -> bool {
        self.select_stack.contains(&index)
    }

    fn is_limit_reached(&self) -> bool {
        self.select_limit > 0 && self.select_stack.len() >= self.select_limit
    }

    /// Every card that is not otherwise disabled has been selected.
    fn is_select_all(&self, set: &Cardset) -> bool {
        let disabled_only = self.disabled.len() - self.select_stack.len();
        self.select_stack.len() == set.len() - disabled_only
    }

    /// Literal "some" rule: the session ends as soon as any remaining
    /// unselected card becomes unaffordable, even if others are pickable.
    fn is_no_more_points(&self, set: &Cardset) -> bool {
        if self.colors_points.is_none() {
            return false;
        }
        (0..set.len())
            .filter(|i| !self.select_stack.contains(i))
            .any(|i| self.card_unaffordable(set, i))
    }

    fn card_unaffordable(&self, set: &Cardset, index: usize) -> bool {
        let Some(points) = &self.colors_points else {
            return false;
        };
        let card = &set.cards()[index];
        !points.borrow().can_afford(card.color, card.cost)
    }

    fn credit_points(&mut self, set: &Cardset, index: usize) {
        if let Some(points) = &self.colors_points {
            let card = &set.cards()[index];
            points.borrow_mut().credit(card.color, card.cost);
        }
    }

    fn debit_points(&mut self, set: &Cardset, index: usize) {
        if let Some(points) = &self.colors_points {
            let card = &set.cards()[index];
            points.borrow_mut().debit(card.color, card.cost);
        }
    }

    /// Detach from input and restore the set baseline; the terminal
    /// callbacks fire after this.
    fn finish(&mut self, set: &mut Cardset) {
        if let Some(keyboard) = set.keyboard_mut() {
            keyboard.clear();
        }
        set.reset_cards_state();
    }

    fn send_cards_to_back(set: &mut Cardset, index: usize) {
        for i in (0..=index.min(set.len().saturating_sub(1))).rev() {
            set.send_to_back(i);
        }
    }

    fn select_card(set: &mut Cardset, index: usize) {
        let card = &mut set.cards_mut()[index];
        card.select();
        let (x, y) = (card.x, card.y);
        card.move_from_to(MoveConfig {
            x_from: Some(x),
            y_from: Some(y),
            x_to: x,
            y_to: CURSOR_RAISE_Y,
            duration: CURSOR_SLIDE_MS,
            ..Default::default()
        });
    }

    fn deselect_card(set: &mut Cardset, index: usize) {
        let card = &mut set.cards_mut()[index];
        card.deselect();
        let (x, y) = (card.x, card.y);
        card.move_from_to(MoveConfig {
            x_from: Some(x),
            y_from: Some(y),
            x_to: x,
            y_to: 0.0,
            duration: CURSOR_SLIDE_MS,
            ..Default::default()
        });
    }

    fn mark_card(set: &mut Cardset, index: usize) {
        let card = &mut set.cards_mut()[index];
        card.mark();
        card.disable();
    }

    fn unmark_card(set: &mut Cardset, index: usize) {
        let card = &mut set.cards_mut()[index];
        card.unmark();
        card.enable();
    }
}
