//! End-to-end determinism tests
//!
//! Runs the same scripted selection session twice through the headless
//! tick host and compares the captured event transcripts. Every part of
//! the pipeline is deterministic, so the transcripts must match exactly.

use similar_asserts::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

use cardplay::anim::TickHost;
use cardplay::cardset::{Cardset, SelectConfig, SelectEvents};
use cardplay::core::{CardColor, CardData, CardType, ColorsPoints};
use cardplay::input::{InputEvent, Keyboard};
use cardplay::logger::{EventLogger, OutputMode, VerbosityLevel};

fn hand() -> Vec<CardData> {
    let colors = [
        CardColor::Red,
        CardColor::Blue,
        CardColor::Green,
        CardColor::Black,
    ];
    colors
        .iter()
        .enumerate()
        .map(|(i, &color)| CardData {
            color,
            cost: (i as u16 % 3) + 1,
            attack_points: i as u8,
            health_points: (i as u8) + 1,
            type_id: if i == 3 { CardType::Power } else { CardType::Battle },
            image: format!("card-{i}"),
        })
        .collect()
}

/// Run one scripted session and return the transcript lines.
fn run_session(script: &[InputEvent]) -> Vec<String> {
    let mut logger = EventLogger::with_verbosity(VerbosityLevel::Verbose);
    logger.set_output_mode(OutputMode::Memory);
    let logger = Rc::new(logger);

    let budget = Rc::new(RefCell::new({
        let mut points = ColorsPoints::new();
        points.set(CardColor::Red, 4);
        points.set(CardColor::Blue, 4);
        points.set(CardColor::Green, 4);
        points.set(CardColor::Black, 4);
        points
    }));

    let mut host = TickHost::new();
    let mut set = Cardset::from_data(&hand());
    set.attach_keyboard(Keyboard::new());
    for card in set.cards_mut() {
        card.set_face_up(true);
    }

    let events = SelectEvents {
        on_change_index: Some(Box::new({
            let logger = Rc::clone(&logger);
            move |i| logger.input(format!("cursor {i}"))
        })),
        on_marked: Some(Box::new({
            let logger = Rc::clone(&logger);
            move |i| logger.selection(format!("picked {i}"))
        })),
        on_completed: Some(Box::new({
            let logger = Rc::clone(&logger);
            move |indexes| logger.selection(format!("completed {indexes:?}"))
        })),
        on_leave: Some(Box::new({
            let logger = Rc::clone(&logger);
            move || logger.selection("abandoned")
        })),
    };

    set.enter_select_mode(SelectConfig {
        events,
        colors_points: Some(Rc::clone(&budget)),
        select_limit: 0,
        start_index: 0,
    })
    .expect("keyboard is attached");

    for &event in script {
        logger.input(format!("{event:?}"));
        set.keyboard_mut().unwrap().push(event);
        set.update(&mut host);
    }
    for _ in 0..64 {
        host.run_to_completion();
        set.update(&mut host);
        if set.cards().iter().all(|c| c.is_static()) {
            break;
        }
    }
    logger.minimal(format!("budget {}", budget.borrow()));
    logger.minimal(format!("t={}", host.now()));

    let transcript = logger
        .entries()
        .iter()
        .map(|entry| match &entry.category {
            Some(category) => format!("[{category}] {}", entry.message),
            None => entry.message.clone(),
        })
        .collect();
    transcript
}

#[test]
fn scripted_session_is_deterministic() {
    let script = [
        InputEvent::Confirm,
        InputEvent::CursorForward,
        InputEvent::CursorForward,
        InputEvent::Confirm,
        InputEvent::Cancel,
    ];
    let run1 = run_session(&script);
    let run2 = run_session(&script);

    assert!(!run1.is_empty(), "session produced no transcript");
    assert_eq!(run1, run2);
}

#[test]
fn abandoned_session_is_deterministic() {
    let script = [InputEvent::CursorForward, InputEvent::Cancel];
    let run1 = run_session(&script);
    let run2 = run_session(&script);

    assert!(run1.iter().any(|line| line.contains("abandoned")));
    assert_eq!(run1, run2);
}
