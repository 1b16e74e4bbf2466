mod common;

use common::Rig;
use inkpage::apps::{
    ClockMode, FilesMode, LibraryMode, NetworkMode, Screen, SubMode,
};
use inkpage::board::sim::SimBoard;
use inkpage::board::{Action, ActionEvent, GestureEvent, HwButton};
use inkpage::board::button::Gesture;

const UP: ActionEvent = ActionEvent::Click(Action::Up);
const DOWN: ActionEvent = ActionEvent::Click(Action::Down);
const SELECT: ActionEvent = ActionEvent::Click(Action::Select);
const HOME: ActionEvent = ActionEvent::LongPress(Action::Select);

#[test]
fn boots_into_main_menu() {
    let rig = Rig::new();
    assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
    assert_eq!(rig.engine.history(), &[Screen::MainMenu]);
    assert_eq!(rig.engine.sub_mode(), SubMode::MainMenu);
    assert_eq!(rig.display.frames.len(), 1);
}

#[test]
fn main_menu_items_land_in_default_sub_modes() {
    let expected = [
        (Screen::Library, SubMode::Library(LibraryMode::List)),
        (Screen::Files, SubMode::Files(FilesMode::List)),
        (Screen::Network, SubMode::Network(NetworkMode::Overview)),
        (Screen::Clock, SubMode::Clock(ClockMode::Face)),
        (Screen::Settings, SubMode::Settings),
    ];

    for (i, (screen, sub_mode)) in expected.into_iter().enumerate() {
        let mut rig = Rig::new();
        rig.press_n(DOWN, i);
        rig.press(SELECT);

        assert_eq!(rig.engine.current_screen(), screen, "item {i}");
        assert_eq!(rig.engine.sub_mode(), sub_mode, "item {i}");
        assert_eq!(rig.engine.history(), &[Screen::MainMenu, screen]);

        rig.press(HOME);
        assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
        assert_eq!(rig.engine.history(), &[Screen::MainMenu]);
    }
}

#[test]
fn main_menu_cursor_wraps() {
    let mut rig = Rig::new();
    rig.press(UP);
    assert_eq!(rig.engine.home().selected(), Screen::Settings);
    rig.press(DOWN);
    assert_eq!(rig.engine.home().selected(), Screen::Library);
}

#[test]
fn up_at_top_of_a_screen_goes_back() {
    let mut rig = Rig::new();
    rig.press_n(DOWN, 4);
    rig.press(SELECT);
    assert_eq!(rig.engine.current_screen(), Screen::Settings);

    rig.press(UP);
    assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
    // the menu keeps its place
    assert_eq!(rig.engine.home().selected(), Screen::Settings);
}

#[test]
fn long_press_up_and_down_do_nothing() {
    let mut rig = Rig::new();
    rig.press(DOWN);
    rig.press(SELECT);
    let before = rig.engine.sub_mode();

    rig.press(ActionEvent::LongPress(Action::Up));
    rig.press(ActionEvent::LongPress(Action::Down));
    assert_eq!(rig.engine.current_screen(), Screen::Files);
    assert_eq!(rig.engine.sub_mode(), before);

    // long-press SELECT on the main menu itself is a no-op
    rig.press(HOME);
    rig.press(HOME);
    assert_eq!(rig.engine.history(), &[Screen::MainMenu]);
}

#[test]
fn double_click_down_jumps_with_wrap() {
    let mut board = SimBoard::new();
    for i in 0..12 {
        board.storage.add_file(&format!("/f{:02}.txt", i), b"x");
    }
    let mut rig = Rig::with_board(board);
    rig.press(DOWN);
    rig.press(SELECT);
    assert_eq!(rig.engine.files().entries().len(), 12);

    rig.press_n(DOWN, 10);
    assert_eq!(rig.engine.files().selected(), 10);

    rig.press(ActionEvent::DoubleClick(Action::Down));
    assert_eq!(rig.engine.files().selected(), 3);

    rig.press(ActionEvent::DoubleClick(Action::Up));
    assert_eq!(rig.engine.files().selected(), 10);
}

#[test]
fn files_open_pushes_library_and_back_returns_to_files() {
    let mut board = SimBoard::new();
    board
        .storage
        .add_file("/books/fox.txt", common::prose(1_500).as_bytes());
    let mut rig = Rig::with_board(board);

    rig.press(DOWN);
    rig.press(SELECT);
    assert_eq!(rig.engine.files().path(), "/");

    // enter /books, then the file menu on fox.txt
    rig.press(SELECT);
    assert_eq!(rig.engine.files().path(), "/books");
    rig.press(SELECT);
    assert_eq!(rig.engine.sub_mode(), SubMode::Files(FilesMode::ContextMenu));

    rig.press(SELECT);
    assert_eq!(
        rig.engine.history(),
        &[Screen::MainMenu, Screen::Files, Screen::Library]
    );
    assert_eq!(rig.engine.sub_mode(), SubMode::Library(LibraryMode::Reading));
    assert!(rig.engine.library().session().is_open());
    assert_eq!(rig.engine.context().message(), "");

    // reading menu -> Close Book, then back out of the list
    rig.press(SELECT);
    rig.press_n(DOWN, 3);
    rig.press(SELECT);
    assert_eq!(rig.engine.sub_mode(), SubMode::Library(LibraryMode::List));

    rig.press(UP);
    assert_eq!(rig.engine.current_screen(), Screen::Files);
    assert_eq!(rig.engine.sub_mode(), SubMode::Files(FilesMode::List));
    assert_eq!(rig.engine.files().path(), "/books");
}

#[test]
fn files_open_hands_over_long_paths_whole() {
    let dir = format!("/{}", "d".repeat(100));
    let path = format!("{}/{}.txt", dir, "b".repeat(40));
    assert!(path.len() > 128);

    let mut board = SimBoard::new();
    board
        .storage
        .add_file(&path, common::prose(1_500).as_bytes());
    let mut rig = Rig::with_board(board);

    rig.press(DOWN);
    rig.press(SELECT);
    rig.press(SELECT);
    assert_eq!(rig.engine.files().path(), dir);

    // file menu -> Open
    rig.press(SELECT);
    rig.press(SELECT);
    assert_eq!(rig.engine.current_screen(), Screen::Library);
    assert_eq!(rig.engine.sub_mode(), SubMode::Library(LibraryMode::Reading));
    assert_eq!(rig.engine.context().notice(), None);
    assert!(rig.engine.library().session().is_open());
}

#[test]
fn long_press_select_dismisses_reading_menu() {
    let mut board = SimBoard::new();
    board
        .storage
        .add_file("/books/fox.txt", common::prose(1_500).as_bytes());
    let mut rig = Rig::with_board(board);

    rig.press(SELECT);
    rig.press(SELECT);
    rig.press(SELECT);
    assert_eq!(
        rig.engine.sub_mode(),
        SubMode::Library(LibraryMode::ContextMenu)
    );

    rig.press(HOME);
    assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
    assert_eq!(rig.engine.history(), &[Screen::MainMenu]);
    assert!(!rig.engine.library().session().is_open());
}

#[test]
fn storage_not_ready_shows_error_state() {
    let mut board = SimBoard::new();
    board.storage.set_ready(false);
    let mut rig = Rig::with_board(board);

    rig.press(SELECT);
    assert_eq!(rig.engine.sub_mode(), SubMode::Library(LibraryMode::Error));

    // only back is accepted
    rig.press(DOWN);
    rig.press(SELECT);
    assert_eq!(rig.engine.sub_mode(), SubMode::Library(LibraryMode::Error));
    rig.press(UP);
    assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
}

#[test]
fn raw_gestures_follow_the_button_profile() {
    let mut rig = Rig::new();
    // default profile: key 1 is DOWN
    rig.engine
        .push_gesture(GestureEvent::new(HwButton::Key1, Gesture::Click));
    rig.advance(20);
    assert_eq!(rig.engine.home().selected(), Screen::Files);

    rig.engine
        .push_gesture(GestureEvent::new(HwButton::Key2, Gesture::Click));
    rig.advance(20);
    assert_eq!(rig.engine.current_screen(), Screen::Files);

    rig.engine
        .push_gesture(GestureEvent::new(HwButton::Key2, Gesture::LongPressStart));
    rig.advance(20);
    assert_eq!(rig.engine.current_screen(), Screen::MainMenu);
}
