//! Board abstraction.
//!
//! A board bundles the collaborators the core talks to: content
//! storage, radio, clock, config persistence and system services. The
//! engine borrows them all at once through [`Services`] for the
//! duration of one event. Device crates implement [`Board`] over their
//! HAL; [`sim::SimBoard`] is the in-memory stand-in used by tests.

pub mod action;
pub mod button;
pub mod sim;

pub use action::{Action, ActionEvent, ButtonMapper, ButtonProfile};
pub use button::{Gesture, GestureEvent, HwButton};

use crate::drivers::clock::Clock;
use crate::drivers::config::ConfigStore;
use crate::drivers::radio::Radio;
use crate::drivers::storage::ContentSource;
use crate::drivers::system::System;

/// Logical panel size in pixels (portrait).
pub const SCREEN_W: u16 = 240;
pub const SCREEN_H: u16 = 416;

pub trait Board {
    type Storage: ContentSource;
    type Radio: Radio;
    type Clock: Clock;
    type Config: ConfigStore;
    type System: System;

    fn services(&mut self) -> Services<'_, Self>;
}

/// Borrowed collaborators for one event or job.
pub struct Services<'a, B: Board + ?Sized> {
    pub storage: &'a mut B::Storage,
    pub radio: &'a mut B::Radio,
    pub clock: &'a mut B::Clock,
    pub config: &'a mut B::Config,
    pub system: &'a mut B::System,
}
