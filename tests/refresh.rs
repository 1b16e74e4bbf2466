mod common;

use common::Rig;
use embedded_graphics::pixelcolor::BinaryColor;
use inkpage::apps::Screen;
use inkpage::board::sim::SimBoard;
use inkpage::board::{Action, ActionEvent};
use inkpage::drivers::RenderMode;

const DOWN: ActionEvent = ActionEvent::Click(Action::Down);
const SELECT: ActionEvent = ActionEvent::Click(Action::Select);

fn clock_face() -> Rig {
    let mut board = SimBoard::new();
    board.clock.set_time(12, 0);
    let mut rig = Rig::with_board(board);
    rig.press_n(DOWN, 3);
    rig.press(SELECT);
    assert_eq!(rig.engine.current_screen(), Screen::Clock);
    assert_eq!(rig.display.last().map(|f| f.mode), Some(RenderMode::Fast));
    rig
}

#[test]
fn first_frame_is_full() {
    let rig = Rig::new();
    assert_eq!(rig.display.modes(), vec![RenderMode::Full]);
}

#[test]
fn screen_changes_are_fast_and_cursor_moves_partial() {
    let mut rig = Rig::new();
    rig.press(DOWN);
    assert_eq!(rig.display.last().map(|f| f.mode), Some(RenderMode::Partial));
    rig.press(SELECT);
    assert_eq!(rig.display.last().map(|f| f.mode), Some(RenderMode::Fast));
}

#[test]
fn idle_ticks_present_nothing() {
    let mut rig = Rig::new();
    let frames = rig.display.frames.len();
    for _ in 0..5 {
        assert!(!rig.advance(100));
    }
    assert_eq!(rig.display.frames.len(), frames);
}

#[test]
fn eleventh_partial_is_preceded_by_a_wipe() {
    let mut rig = clock_face();

    // minute changes redraw the face without any input
    for minute in 1..=10 {
        rig.board.clock.set_time(12, minute);
        assert!(rig.advance(1_000));
        assert_eq!(rig.display.last().map(|f| f.mode), Some(RenderMode::Partial));
    }
    assert_eq!(rig.engine.refresh_state().partial_count, 10);
    assert_eq!(rig.display.wipes(), 0);

    let before = rig.display.frames.len();
    rig.board.clock.set_time(12, 11);
    assert!(rig.advance(1_000));

    let added = &rig.display.frames[before..];
    assert_eq!(added.len(), 3);
    assert_eq!(added[0].mode, RenderMode::Full);
    assert_eq!(added[0].cleared, Some(BinaryColor::On));
    assert_eq!(added[1].mode, RenderMode::Full);
    assert_eq!(added[1].cleared, Some(BinaryColor::Off));
    assert_eq!(added[2].mode, RenderMode::Partial);
    assert_eq!(rig.engine.refresh_state().partial_count, 0);
}

#[test]
fn input_resets_the_partial_count() {
    let mut rig = clock_face();
    for minute in 1..=9 {
        rig.board.clock.set_time(12, minute);
        rig.advance(1_000);
    }
    assert_eq!(rig.engine.refresh_state().partial_count, 9);

    // toggling 12/24 h is input plus a partial redraw
    rig.press(DOWN);
    assert_eq!(rig.engine.refresh_state().partial_count, 1);
    assert_eq!(rig.display.wipes(), 0);
}

#[test]
fn wake_from_hibernation_forces_full() {
    let mut rig = Rig::new();
    rig.engine.hibernate(&mut rig.display);
    assert!(rig.engine.is_hibernating());
    assert!(rig.display.asleep);

    // nothing to draw: the panel stays asleep
    rig.advance(500);
    assert!(rig.display.asleep);
    assert_eq!(rig.display.wakes, 0);

    let frames = rig.display.frames.len();
    rig.press(DOWN);
    assert!(!rig.engine.is_hibernating());
    assert_eq!(rig.display.wakes, 1);
    assert_eq!(rig.display.frames.len(), frames + 1);
    assert_eq!(rig.display.last().map(|f| f.mode), Some(RenderMode::Full));
}

#[test]
fn sleep_is_due_after_the_configured_idle_time() {
    let mut rig = Rig::new();
    let last_input = rig.now;
    assert!(!rig.engine.sleep_due(last_input + 9 * 60_000));
    assert!(rig.engine.sleep_due(last_input + 10 * 60_000));

    rig.press(DOWN);
    assert!(!rig.engine.sleep_due(last_input + 10 * 60_000));
}

#[test]
fn status_bar_refreshes_each_minute() {
    let mut board = SimBoard::new();
    board.clock.set_time(9, 5);
    let mut rig = Rig::with_board(board);
    assert!(rig.engine.status_text().starts_with("9:05"));

    rig.board.clock.set_time(9, 6);
    rig.board.radio.connected = Some(String::from("home"));
    assert!(!rig.advance(30_000));
    assert!(rig.advance(30_000));
    assert!(rig.engine.status_text().starts_with("9:06"));
    assert!(rig.engine.status_text().contains("W  "));
}
