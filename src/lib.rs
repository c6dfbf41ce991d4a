//! Card interaction and animation state engine
//!
//! The interaction layer of a turn-based card battle game: a per-card
//! motion state machine that queues and gates keyframe animations, and a
//! per-cardset selection state machine that turns discrete input events
//! into a budget-constrained multi-select protocol. Rendering, data
//! fetching and phase orchestration live behind trait/data boundaries.

pub mod anim;
pub mod cardset;
pub mod core;
pub mod error;
pub mod input;
pub mod logger;

pub use error::{EngineError, Result};
