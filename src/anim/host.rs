//! The rendering/animation host boundary
//!
//! The engine never plays animations itself: it hands a filtered
//! [`MoveSequence`] to an [`AnimationHost`] and polls the returned handle.
//! The host owns playback timing and fires each keyframe's start/complete
//! callbacks at its position in the chain.
//!
//! [`TickHost`] is the headless implementation shipped with the crate,
//! driven by explicit `advance(ms)` calls. The CLI demo and the test suite
//! run on it; a real renderer implements the same trait.

use crate::anim::{Move, MoveCallback, MoveSequence};
use crate::core::CardId;

/// Opaque handle to one chained playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(u64);

impl PlaybackHandle {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A host capable of playing a chained keyframe sequence for a card and
/// reporting completion.
pub trait AnimationHost {
    /// Begin playing a sequence as a single chained animation.
    fn play(&mut self, card: CardId, seq: MoveSequence) -> PlaybackHandle;

    /// True while the given playback is still running.
    fn is_playing(&self, handle: PlaybackHandle) -> bool;

    /// One-shot flash effect on a card (color as 0xRRGGBB).
    fn flash(&mut self, card: CardId, color: u32, duration: u32);
}

struct PendingMove {
    delay: u64,
    duration: u64,
    started: bool,
    on_start: Option<MoveCallback>,
    on_complete: Option<MoveCallback>,
}

impl From<Move> for PendingMove {
    fn from(m: Move) -> Self {
        PendingMove {
            delay: u64::from(m.delay),
            duration: u64::from(m.duration),
            started: false,
            on_start: m.on_start,
            on_complete: m.on_complete,
        }
    }
}

struct Playback {
    handle: PlaybackHandle,
    moves: Vec<PendingMove>,
    idx: usize,
    /// Absolute time the current keyframe's delay started counting from
    cursor: u64,
}

impl Playback {
    fn run_until(&mut self, now: u64) {
        while self.idx < self.moves.len() {
            let m = &mut self.moves[self.idx];
            let start_at = self.cursor + m.delay;
            let end_at = start_at + m.duration;
            if now >= start_at && !m.started {
                m.started = true;
                if let Some(mut cb) = m.on_start.take() {
                    cb();
                }
            }
            if now >= end_at {
                if let Some(mut cb) = m.on_complete.take() {
                    cb();
                }
                self.cursor = end_at;
                self.idx += 1;
            } else {
                break;
            }
        }
    }

    fn done(&self) -> bool {
        self.idx >= self.moves.len()
    }

    fn remaining(&self, now: u64) -> u64 {
        let end_of_chain = self.cursor
            + self.moves[self.idx..]
                .iter()
                .map(|m| m.delay + m.duration)
                .sum::<u64>();
        end_of_chain.saturating_sub(now)
    }
}

/// Headless animation host driven by a logical clock
#[derive(Default)]
pub struct TickHost {
    now: u64,
    next_handle: u64,
    active: Vec<Playback>,
    flashes: Vec<(CardId, u32, u32)>,
}

impl TickHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance the clock, firing any keyframe boundaries crossed and
    /// retiring finished playbacks.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
        let now = self.now;
        for playback in &mut self.active {
            playback.run_until(now);
        }
        self.active.retain(|p| !p.done());
    }

    /// Run every active playback to its end.
    pub fn run_to_completion(&mut self) {
        while let Some(ms) = self
            .active
            .iter()
            .map(|p| p.remaining(self.now))
            .max()
        {
            self.advance(ms.max(1));
        }
    }

    /// Flash effects requested so far (card, color, duration)
    pub fn flashes(&self) -> &[(CardId, u32, u32)] {
        &self.flashes
    }
}

impl AnimationHost for TickHost {
    fn play(&mut self, _card: CardId, seq: MoveSequence) -> PlaybackHandle {
        let handle = PlaybackHandle(self.next_handle);
        self.next_handle += 1;
        let mut playback = Playback {
            handle,
            moves: seq.into_iter().map(PendingMove::from).collect(),
            idx: 0,
            cursor: self.now,
        };
        // Zero-length keyframes (snap moves) complete without a clock step
        playback.run_until(self.now);
        if !playback.done() {
            self.active.push(playback);
        }
        handle
    }

    fn is_playing(&self, handle: PlaybackHandle) -> bool {
        self.active.iter().any(|p| p.handle == handle)
    }

    fn flash(&mut self, card: CardId, color: u32, duration: u32) {
        self.flashes.push((card, color, duration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::Move;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn keyframe(delay: u32, duration: u32, log: &Rc<RefCell<Vec<String>>>, tag: &str) -> Move {
        let start_log = Rc::clone(log);
        let complete_log = Rc::clone(log);
        let start_tag = format!("start:{tag}");
        let complete_tag = format!("complete:{tag}");
        Move {
            delay,
            duration,
            on_start: Some(Box::new(move || start_log.borrow_mut().push(start_tag.clone()))),
            on_complete: Some(Box::new(move || {
                complete_log.borrow_mut().push(complete_tag.clone())
            })),
            ..Move::default()
        }
    }

    #[test]
    fn test_chain_fires_callbacks_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = TickHost::new();
        let seq = vec![keyframe(0, 100, &log, "a"), keyframe(50, 100, &log, "b")];
        let handle = host.play(CardId::new(0), seq);

        assert!(host.is_playing(handle));
        assert_eq!(*log.borrow(), vec!["start:a".to_string()]);

        host.advance(100);
        assert_eq!(log.borrow().len(), 2); // a completed, b still in delay
        assert!(host.is_playing(handle));

        host.advance(150);
        assert!(!host.is_playing(handle));
        assert_eq!(
            *log.borrow(),
            vec!["start:a", "complete:a", "start:b", "complete:b"]
        );
    }

    #[test]
    fn test_snap_sequence_completes_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = TickHost::new();
        let handle = host.play(CardId::new(0), vec![keyframe(0, 0, &log, "snap")]);
        assert!(!host.is_playing(handle));
        assert_eq!(*log.borrow(), vec!["start:snap", "complete:snap"]);
    }

    #[test]
    fn test_run_to_completion() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut host = TickHost::new();
        host.play(CardId::new(0), vec![keyframe(400, 200, &log, "slow")]);
        host.play(CardId::new(1), vec![keyframe(0, 100, &log, "fast")]);
        host.run_to_completion();
        assert_eq!(log.borrow().len(), 4);
        assert!(host.now() >= 600);
    }

    #[test]
    fn test_flash_recorded() {
        let mut host = TickHost::new();
        host.flash(CardId::new(3), 0xffffff, 120);
        assert_eq!(host.flashes(), &[(CardId::new(3), 0xffffff, 120)]);
    }
}
