//! Physical keys and the gestures detected on them.
//!
//! The device has three keys in a column on the right edge. Which key
//! means up or down is decided by `action::ButtonMapper`.

/// Physical keys, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwButton {
    Key1,
    Key2,
    Key3,
}

impl HwButton {
    pub const fn name(self) -> &'static str {
        match self {
            HwButton::Key1 => "Key 1",
            HwButton::Key2 => "Key 2",
            HwButton::Key3 => "Key 3",
        }
    }
}

impl core::fmt::Display for HwButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    DoubleClick,
    LongPressStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub button: HwButton,
    pub gesture: Gesture,
}

impl GestureEvent {
    pub const fn new(button: HwButton, gesture: Gesture) -> Self {
        Self { button, gesture }
    }
}
