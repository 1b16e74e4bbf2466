// Semantic actions decoupled from physical keys.
//
// Apps see Up/Down/Select only. The ButtonMapper applies the profile
// stored in SystemSettings::button_map so the column can be flipped
// for left-hand use.

use super::button::{Gesture, GestureEvent, HwButton};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Back, previous item, previous page.
    Up,
    /// Next item, next page.
    Down,
    /// Open, confirm, menu.
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    Click(Action),
    DoubleClick(Action),
    LongPress(Action),
}

impl ActionEvent {
    pub fn action(self) -> Action {
        match self {
            Self::Click(a) | Self::DoubleClick(a) | Self::LongPress(a) => a,
        }
    }

    pub fn gesture(self) -> Gesture {
        match self {
            Self::Click(_) => Gesture::Click,
            Self::DoubleClick(_) => Gesture::DoubleClick,
            Self::LongPress(_) => Gesture::LongPressStart,
        }
    }

    pub fn is_double(self) -> bool {
        matches!(self, Self::DoubleClick(_))
    }
}

/// Key layout profiles, persisted as `SystemSettings::button_map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonProfile {
    /// Key1 = Down, Key2 = Select, Key3 = Up
    #[default]
    Default = 0,
    /// Key1 = Up, Key2 = Select, Key3 = Down
    Swapped = 1,
}

impl ButtonProfile {
    pub const fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Swapped,
            _ => Self::Default,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Swapped => "Swapped",
        }
    }
}

pub struct ButtonMapper {
    profile: ButtonProfile,
}

impl Default for ButtonMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonMapper {
    pub const fn new() -> Self {
        Self {
            profile: ButtonProfile::Default,
        }
    }

    pub fn set_profile(&mut self, profile: ButtonProfile) {
        self.profile = profile;
    }

    pub fn profile(&self) -> ButtonProfile {
        self.profile
    }

    fn map_button(&self, button: HwButton) -> Action {
        match (self.profile, button) {
            (_, HwButton::Key2) => Action::Select,
            (ButtonProfile::Default, HwButton::Key1) => Action::Down,
            (ButtonProfile::Default, HwButton::Key3) => Action::Up,
            (ButtonProfile::Swapped, HwButton::Key1) => Action::Up,
            (ButtonProfile::Swapped, HwButton::Key3) => Action::Down,
        }
    }

    pub fn map_event(&self, event: GestureEvent) -> ActionEvent {
        let action = self.map_button(event.button);
        match event.gesture {
            Gesture::Click => ActionEvent::Click(action),
            Gesture::DoubleClick => ActionEvent::DoubleClick(action),
            Gesture::LongPressStart => ActionEvent::LongPress(action),
        }
    }
}
