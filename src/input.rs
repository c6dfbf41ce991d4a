//! Discrete input events and the keyboard queue
//!
//! The engine consumes four logical events; how they map to physical keys
//! is the host scene's concern. The scene pushes events into a [`Keyboard`]
//! and the owning cardset drains them once per update. A selection session
//! attaches to the queue when it starts and detaches deterministically when
//! it ends; events arriving outside a session are discarded.

use std::collections::VecDeque;

/// The four logical input events of the selection protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    CursorForward,
    CursorBack,
    Confirm,
    Cancel,
}

/// FIFO queue of pending input events
#[derive(Debug, Default)]
pub struct Keyboard {
    queue: VecDeque<InputEvent>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.queue.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_push_order() {
        let mut keyboard = Keyboard::new();
        keyboard.push(InputEvent::CursorForward);
        keyboard.push(InputEvent::Confirm);
        keyboard.push(InputEvent::Cancel);

        assert_eq!(
            keyboard.drain(),
            vec![
                InputEvent::CursorForward,
                InputEvent::Confirm,
                InputEvent::Cancel
            ]
        );
        assert!(keyboard.is_empty());
    }
}
