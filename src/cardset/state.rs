//! Cardset interaction state
//!
//! The set is either static (input has no effect) or running a selection
//! session. As with the card motion state, the active variant is swapped
//! by explicit assignment; entering static from select is the normal
//! terminal transition after a session completes or is abandoned.

use crate::cardset::select::SelectState;

#[derive(Default)]
pub enum CardsetState {
    #[default]
    Static,
    Select(SelectState),
}

impl CardsetState {
    pub fn name(&self) -> &'static str {
        match self {
            CardsetState::Static => "static",
            CardsetState::Select(_) => "select",
        }
    }
}
