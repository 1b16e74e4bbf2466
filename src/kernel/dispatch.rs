// Routing of logical button events before they reach a screen.
//
// Long-press SELECT is the global escape to the main menu. Other
// long presses carry no meaning. Everything else goes to the screen.

use log::debug;

use crate::apps::Screen;
use crate::board::action::{Action, ActionEvent};
use crate::board::button::Gesture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unwind to the main menu, dismissing any open dialog.
    Home,
    /// Hand to the current screen.
    Screen(Action, Gesture),
    Ignore,
}

pub fn route(current: Screen, event: ActionEvent) -> Route {
    match event {
        ActionEvent::LongPress(Action::Select) if current != Screen::MainMenu => Route::Home,
        ActionEvent::LongPress(action) => {
            debug!("dispatch: long press {:?} ignored on {:?}", action, current);
            Route::Ignore
        }
        ActionEvent::Click(action) => Route::Screen(action, Gesture::Click),
        ActionEvent::DoubleClick(action) => Route::Screen(action, Gesture::DoubleClick),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_select_goes_home_from_any_screen() {
        for screen in [Screen::Library, Screen::Files, Screen::Network, Screen::Clock, Screen::Settings] {
            assert_eq!(route(screen, ActionEvent::LongPress(Action::Select)), Route::Home);
        }
        assert_eq!(
            route(Screen::MainMenu, ActionEvent::LongPress(Action::Select)),
            Route::Ignore
        );
    }

    #[test]
    fn long_up_and_down_are_ignored() {
        assert_eq!(route(Screen::Library, ActionEvent::LongPress(Action::Up)), Route::Ignore);
        assert_eq!(route(Screen::Files, ActionEvent::LongPress(Action::Down)), Route::Ignore);
    }

    #[test]
    fn clicks_reach_the_screen() {
        assert_eq!(
            route(Screen::Files, ActionEvent::DoubleClick(Action::Down)),
            Route::Screen(Action::Down, Gesture::DoubleClick)
        );
        assert_eq!(
            route(Screen::MainMenu, ActionEvent::Click(Action::Select)),
            Route::Screen(Action::Select, Gesture::Click)
        );
    }
}
