use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typist::app::{Action, App, AppState};
use typist::passage::PassageLibrary;
use typist::personal_best::{FileStore, MemoryStore, Outcome};
use typist::runtime::{AppEvent, ChannelEventSource, FixedTicker, Runner};
use typist::settings::{Difficulty, Mode};
use typist::timer::ManualClock;
use typist::typing_test::{TestStatus, TypingTest};

fn typing_test(text: &str, mode: Mode, clock: &ManualClock) -> TypingTest<ManualClock> {
    let library = PassageLibrary::single(text).unwrap();
    TypingTest::with_clock(Box::new(library), Difficulty::Easy, mode, clock.clone()).unwrap()
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Drives a passage attempt through Runner/ChannelEventSource without a TTY
#[test]
fn headless_passage_flow_completes() {
    let clock = ManualClock::new();
    let mut test = typing_test("cat", Mode::Passage, &clock);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    for c in "cat".chars() {
        tx.send(key(c)).unwrap();
    }
    drop(tx);

    while let Some(event) = runner.next_event(test.is_running()) {
        match event {
            AppEvent::Tick => {
                clock.advance(Duration::from_secs(1));
                test.on_tick();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    test.type_char(c);
                }
            }
        }
        if test.is_finished() {
            break;
        }
    }

    assert_eq!(test.status(), TestStatus::Finished);
    let result = test.result().unwrap();
    assert_eq!(result.correct_chars, 3);
    assert_eq!(result.incorrect_chars, 0);
    assert_eq!(result.accuracy, 100);
}

#[test]
fn headless_timed_attempt_finishes_by_time() {
    let clock = ManualClock::new();
    let mut test = typing_test("the quick brown fox", Mode::Timed, &clock);
    test.type_char('t');

    let (_tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );

    for _ in 0..200u32 {
        if let Some(AppEvent::Tick) = runner.next_event(test.is_running()) {
            clock.advance(Duration::from_secs(1));
            test.on_tick();
        }
        if test.is_finished() {
            break;
        }
    }

    assert!(test.is_finished(), "timed attempt should end at the limit");
    assert_eq!(test.result().unwrap().time_elapsed, 60);
    assert_eq!(test.timer().formatted(), "0:00");
}

// Keys and ticks interleave; the limit passes between two keystrokes
#[test]
fn headless_keys_after_time_limit_are_not_counted() {
    let clock = ManualClock::new();
    let mut app = App::new(
        typing_test("the quick brown fox", Mode::Timed, &clock),
        MemoryStore::new(),
    );
    app.state = AppState::Typing;

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    for c in "th".chars() {
        tx.send(key(c)).unwrap();
    }
    // stands in for the clock running out while the typist keeps going
    tx.send(AppEvent::Resize).unwrap();
    for c in "e qu".chars() {
        tx.send(key(c)).unwrap();
    }
    drop(tx);

    while let Some(event) = runner.next_event(app.needs_ticks()) {
        match event {
            AppEvent::Tick => {
                clock.advance(Duration::from_millis(100));
                app.on_tick();
            }
            AppEvent::Resize => clock.advance(Duration::from_secs(61)),
            AppEvent::Key(key) => {
                app.on_key(key);
            }
        }
    }

    assert_eq!(app.state, AppState::Results);
    assert_eq!(app.test.input(), "th");
    let result = app.report().unwrap().result;
    assert_eq!(result.correct_chars, 2);
    assert_eq!(result.time_elapsed, 60);
}

#[test]
fn headless_corrected_error_is_remembered() {
    let clock = ManualClock::new();
    let mut test = typing_test("cat", Mode::Timed, &clock);

    for c in "cbt".chars() {
        test.type_char(c);
    }
    assert_eq!(test.live_stats().accuracy, 67);

    test.handle_input("ca");
    assert!(test.errors().contains(1));
    assert_eq!(test.errors().len(), 1);
    assert!(test.is_running());
}

#[test]
fn headless_results_then_go_again() {
    let clock = ManualClock::new();
    let mut app = App::new(typing_test("hi", Mode::Passage, &clock), MemoryStore::new());

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        ChannelEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
    );
    // overlay, the passage, then go again and quit
    for event in [key(' '), key('h'), key('i')] {
        tx.send(event).unwrap();
    }
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
        .unwrap();
    tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();

    let mut seen_results = None;
    while let Some(event) = runner.next_event(app.needs_ticks()) {
        let action = match event {
            AppEvent::Tick => {
                app.on_tick();
                Action::Continue
            }
            AppEvent::Resize => Action::Continue,
            AppEvent::Key(key) => app.on_key(key),
        };
        if app.state == AppState::Results {
            seen_results = app.report().map(|r| r.decision.outcome);
        }
        if action == Action::Quit {
            break;
        }
    }

    assert_eq!(seen_results, Some(Outcome::Baseline));
    assert_eq!(app.state, AppState::Typing);
    assert_eq!(app.test.status(), TestStatus::Idle);
    assert!(app.best().is_some());
}

#[test]
fn headless_personal_best_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let clock = ManualClock::new();
    let mut app = App::new(
        typing_test("go", Mode::Passage, &clock),
        FileStore::with_path(&path),
    );
    app.state = AppState::Typing;
    app.test.type_char('g');
    clock.advance(Duration::from_secs(3));
    app.on_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));
    let wpm = app.report().unwrap().result.wpm;
    assert_eq!(wpm, 20);

    let reopened = App::new(
        typing_test("go", Mode::Passage, &ManualClock::new()),
        FileStore::with_path(&path),
    );
    assert_eq!(
        reopened.best().map(|b| (b.wpm, b.accuracy)),
        Some((20, 100))
    );
}
