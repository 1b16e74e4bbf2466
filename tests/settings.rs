mod common;

use common::Rig;
use inkpage::apps::Screen;
use inkpage::apps::settings::{SETTINGS_PATH, SystemSettings};
use inkpage::board::button::Gesture;
use inkpage::board::sim::SimBoard;
use inkpage::board::{Action, ActionEvent, ButtonProfile, GestureEvent, HwButton};
use inkpage::book::FontTier;

const UP: ActionEvent = ActionEvent::Click(Action::Up);
const DOWN: ActionEvent = ActionEvent::Click(Action::Down);
const SELECT: ActionEvent = ActionEvent::Click(Action::Select);

fn settings_screen(board: SimBoard) -> Rig {
    let mut rig = Rig::with_board(board);
    // the menu wraps, so one UP reaches the last item
    rig.press(UP);
    rig.press(SELECT);
    assert_eq!(rig.engine.current_screen(), Screen::Settings);
    rig
}

#[test]
fn boot_applies_the_stored_record() {
    let mut board = SimBoard::new();
    board.config.insert(
        SETTINGS_PATH,
        b"# inkpage settings\nsleep_timeout=30\nghost_clear=5\nbook_font=2\nbutton_map=1\n",
    );
    let rig = Rig::with_board(board);

    let s = rig.engine.system_settings();
    assert_eq!(s.sleep_timeout_min, 30);
    assert_eq!(s.profile(), ButtonProfile::Swapped);
    assert_eq!(rig.engine.refresh_threshold(), 5);
    assert_eq!(
        rig.engine.library().session().font_tier(),
        FontTier::Large
    );
    assert!(!rig.engine.sleep_due(rig.now + 29 * 60_000));
    assert!(rig.engine.sleep_due(rig.now + 30 * 60_000));
}

#[test]
fn missing_record_means_defaults() {
    let rig = Rig::new();
    assert_eq!(*rig.engine.system_settings(), SystemSettings::defaults());
    assert_eq!(rig.engine.refresh_threshold(), 10);
}

#[test]
fn changes_apply_at_once_and_save_on_the_next_tick() {
    let mut rig = settings_screen(SimBoard::new());

    rig.press(DOWN);
    rig.press(SELECT);
    assert_eq!(rig.engine.system_settings().ghost_clear_every, 15);
    assert_eq!(rig.engine.refresh_threshold(), 15);
    assert_eq!(rig.board.config.writes(), 0);

    rig.advance(20);
    assert_eq!(rig.board.config.writes(), 1);
    let stored = rig.board.config.get(SETTINGS_PATH).unwrap_or_default();
    assert_eq!(SystemSettings::parse(stored).ghost_clear_every, 15);

    // nothing new to write
    rig.advance(20);
    assert_eq!(rig.board.config.writes(), 1);
}

#[test]
fn swapped_layout_takes_effect_for_raw_keys() {
    let mut rig = settings_screen(SimBoard::new());
    rig.press_n(DOWN, 3);
    rig.press(SELECT);
    assert_eq!(rig.engine.system_settings().profile(), ButtonProfile::Swapped);

    rig.press(ActionEvent::LongPress(Action::Select));
    assert_eq!(rig.engine.home().selected(), Screen::Settings);

    // key 1 now moves up
    rig.engine
        .push_gesture(GestureEvent::new(HwButton::Key1, Gesture::Click));
    rig.advance(20);
    assert_eq!(rig.engine.home().selected(), Screen::Clock);
}

#[test]
fn book_font_setting_reaches_the_reader() {
    let mut rig = settings_screen(SimBoard::new());
    rig.press_n(DOWN, 2);
    rig.press(SELECT);
    assert_eq!(rig.engine.system_settings().book_font_tier(), FontTier::Large);
    assert_eq!(
        rig.engine.library().session().font_tier(),
        FontTier::Large
    );
}

#[test]
fn failed_save_shows_a_notice() {
    let mut board = SimBoard::new();
    board.config.fail_writes = true;
    let mut rig = settings_screen(board);

    rig.press(SELECT);
    rig.advance(20);
    assert_eq!(rig.board.config.writes(), 0);
    assert_eq!(rig.engine.context().notice(), Some("Save failed"));
    // the value still applies for this session
    assert_eq!(rig.engine.system_settings().sleep_timeout_min, 15);
}

#[test]
fn reading_menu_font_survives_other_setting_changes() {
    let mut board = SimBoard::new();
    board
        .storage
        .add_file("/books/fox.txt", common::prose(1_500).as_bytes());
    let mut rig = Rig::with_board(board);

    // library -> open -> menu -> Increase Font
    rig.press_n(SELECT, 4);
    assert_eq!(
        rig.engine.library().session().font_tier(),
        FontTier::Large
    );
    assert_eq!(rig.engine.system_settings().book_font_tier(), FontTier::Medium);

    rig.press(ActionEvent::LongPress(Action::Select));
    rig.press(UP);
    rig.press(SELECT);
    assert_eq!(rig.engine.current_screen(), Screen::Settings);

    // Sleep After
    rig.press(SELECT);
    rig.advance(20);
    assert_eq!(rig.engine.system_settings().sleep_timeout_min, 15);
    assert_eq!(
        rig.engine.library().session().font_tier(),
        FontTier::Large
    );
}
