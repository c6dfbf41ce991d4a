//! Card motion engine: keyframes, the moving-state queue and the host boundary

pub mod host;
pub mod motion;
pub mod moves;

pub use host::{AnimationHost, PlaybackHandle, TickHost};
pub use motion::{CardPoints, CardState, FlashConfig, MovingState, UpdatePoints};
pub use moves::{
    close_sequence, from_to_sequence, open_sequence, Ease, ExtraGate, Move, MoveCallback,
    MoveConfig, MoveSequence, OpenCloseConfig, StartGate,
};
