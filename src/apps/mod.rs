// App trait, navigation history, list cursors and the per-event
// context screens write their requests into.

pub mod clock;
pub mod files;
pub mod home;
pub mod library;
pub mod network;
pub mod settings;

use alloc::string::String;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::{String as FixedString, Vec as FixedVec};
use log::warn;

use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::drivers::display::RenderMode;
use crate::ui::hints::ButtonHints;
use crate::ui::{wrap_next, wrap_prev};

pub use clock::ClockMode;
pub use files::FilesMode;
pub use library::LibraryMode;
pub use network::NetworkMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Library,
    Files,
    Network,
    Clock,
    Settings,
}

impl Screen {
    pub const fn name(self) -> &'static str {
        match self {
            Screen::MainMenu => "Main Menu",
            Screen::Library => "Library",
            Screen::Files => "Files",
            Screen::Network => "Network",
            Screen::Clock => "Clock",
            Screen::Settings => "Settings",
        }
    }
}

/// Current screen together with its sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMode {
    MainMenu,
    Library(LibraryMode),
    Files(FilesMode),
    Network(NetworkMode),
    Clock(ClockMode),
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Push(Screen),
    Pop,
    Home,
}

/// Redraw request, strongest wins when several are made in one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    None,
    Partial,
    Fast,
    Full,
}

impl Redraw {
    pub const fn mode(self) -> Option<RenderMode> {
        match self {
            Redraw::None => None,
            Redraw::Partial => Some(RenderMode::Partial),
            Redraw::Fast => Some(RenderMode::Fast),
            Redraw::Full => Some(RenderMode::Full),
        }
    }
}

const NOTICE_CAP: usize = 48;
/// How long a transient notice stays up without input.
pub const NOTICE_MS: u64 = 3_000;

pub struct AppContext {
    message: String,
    redraw: Redraw,
    now_ms: u64,
    notice: FixedString<NOTICE_CAP>,
    notice_until_ms: u64,
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext {
    pub const fn new() -> Self {
        Self {
            message: String::new(),
            redraw: Redraw::None,
            now_ms: 0,
            notice: FixedString::new(),
            notice_until_ms: 0,
        }
    }

    /// Hand a path to the next screen.
    pub fn set_message(&mut self, text: &str) {
        self.message.clear();
        self.message.push_str(text);
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consume the handed-over path, leaving the message empty.
    pub fn take_message(&mut self) -> String {
        core::mem::take(&mut self.message)
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub fn request(&mut self, redraw: Redraw) {
        self.redraw = self.redraw.max(redraw);
    }

    pub fn request_partial(&mut self) {
        self.request(Redraw::Partial);
    }

    pub fn request_fast(&mut self) {
        self.request(Redraw::Fast);
    }

    pub fn request_full(&mut self) {
        self.request(Redraw::Full);
    }

    pub fn has_redraw(&self) -> bool {
        self.redraw != Redraw::None
    }

    pub fn take_redraw(&mut self) -> Redraw {
        core::mem::replace(&mut self.redraw, Redraw::None)
    }

    /// Show a short message over the current screen for NOTICE_MS.
    pub fn show_notice(&mut self, text: &str) {
        self.notice.clear();
        for c in text.chars() {
            if self.notice.push(c).is_err() {
                break;
            }
        }
        self.notice_until_ms = self.now_ms + NOTICE_MS;
        self.request_partial();
    }

    pub fn notice(&self) -> Option<&str> {
        (!self.notice.is_empty()).then_some(self.notice.as_str())
    }

    pub fn dismiss_notice(&mut self) {
        if !self.notice.is_empty() {
            self.notice.clear();
            self.request_partial();
        }
    }

    /// Drop the notice once its time is up.
    pub fn expire_notice(&mut self) {
        if !self.notice.is_empty() && self.now_ms >= self.notice_until_ms {
            self.dismiss_notice();
        }
    }
}

/// Items skipped by a double-click in a list.
pub const JUMP_SIZE: usize = 5;

/// Selection within a list of `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListCursor {
    index: usize,
    len: usize,
}

impl ListCursor {
    pub const fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn at_top(&self) -> bool {
        self.index == 0
    }

    /// Resize, keeping the index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn next(&mut self) -> bool {
        let old = self.index;
        self.index = wrap_next(self.index, self.len);
        old != self.index
    }

    pub fn prev(&mut self) -> bool {
        let old = self.index;
        self.index = wrap_prev(self.index, self.len);
        old != self.index
    }

    /// Skip `n` items forward with wrap; lists no longer than `n`
    /// step by one instead.
    pub fn jump_forward(&mut self, n: usize) -> bool {
        if self.len <= n {
            return self.next();
        }
        let old = self.index;
        self.index = (self.index + n) % self.len;
        old != self.index
    }

    pub fn jump_back(&mut self, n: usize) -> bool {
        if self.len <= n {
            return self.prev();
        }
        let old = self.index;
        self.index = (self.index + self.len - n) % self.len;
        old != self.index
    }

    /// DOWN in a list: click steps, double-click jumps.
    pub fn down(&mut self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::DoubleClick => self.jump_forward(JUMP_SIZE),
            _ => self.next(),
        }
    }

    /// Rows to show so the selection stays visible.
    pub fn window(&self, rows: usize) -> core::ops::Range<usize> {
        let start = if rows > 0 && self.index >= rows {
            self.index + 1 - rows
        } else {
            0
        };
        start..(start + rows).min(self.len)
    }
}

/// What UP does in a list sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUp {
    Moved,
    /// UP click on the first item: the screen's back action.
    Back,
}

/// UP in a list: click moves up until the top, where it means back;
/// double-click jumps back with wrap.
pub fn list_up(cursor: &mut ListCursor, gesture: Gesture) -> ListUp {
    match gesture {
        Gesture::DoubleClick if !cursor.is_empty() => {
            cursor.jump_back(JUMP_SIZE);
            ListUp::Moved
        }
        _ if cursor.at_top() => ListUp::Back,
        _ => {
            cursor.prev();
            ListUp::Moved
        }
    }
}

pub trait App {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>);

    /// Leaving the stack; cancel anything in flight.
    fn on_exit<B: Board>(&mut self, _svc: &mut Services<'_, B>) {}

    /// Another screen was pushed on top; state is kept.
    fn on_suspend<B: Board>(&mut self, _svc: &mut Services<'_, B>) {}

    fn on_resume<B: Board>(&mut self, ctx: &mut AppContext, _svc: &mut Services<'_, B>) {
        ctx.request_fast();
    }

    fn handle_up<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition;

    fn handle_down<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition;

    fn handle_select<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition;

    /// Once per loop iteration while current, for time-based redraws.
    fn on_tick<B: Board>(&mut self, _ctx: &mut AppContext, _svc: &mut Services<'_, B>) {}

    fn needs_work(&self) -> bool {
        false
    }

    fn on_work<B: Board>(&mut self, _ctx: &mut AppContext, _svc: &mut Services<'_, B>) {}

    fn sub_mode(&self) -> SubMode;

    fn hints(&self) -> ButtonHints;

    /// Paint the content area between the status bar and the hints.
    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error>;
}

pub const MAX_HISTORY: usize = 4;

#[derive(Debug, Clone)]
pub struct NavEvent {
    pub from: Screen,
    pub to: Screen,
    /// `from` stays on the stack under `to`.
    pub suspend: bool,
    /// `to` was already on the stack.
    pub resume: bool,
    /// Screens that left the stack, top first.
    pub exited: FixedVec<Screen, MAX_HISTORY>,
}

pub struct NavigationContext {
    stack: FixedVec<Screen, MAX_HISTORY>,
    pub ctx: AppContext,
}

impl Default for NavigationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationContext {
    pub fn new() -> Self {
        let mut stack = FixedVec::new();
        let _ = stack.push(Screen::MainMenu);
        Self {
            stack,
            ctx: AppContext::new(),
        }
    }

    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::MainMenu)
    }

    pub fn history(&self) -> &[Screen] {
        &self.stack
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn apply(&mut self, transition: Transition) -> Option<NavEvent> {
        let old = self.current();
        let mut exited = FixedVec::new();

        let (suspend, resume) = match transition {
            Transition::None => return None,

            Transition::Push(screen) => {
                if screen == old {
                    return None;
                }
                if let Err(screen) = self.stack.push(screen) {
                    warn!(
                        "nav history full (depth {}), Push({:?}) degraded to replace",
                        self.stack.len(),
                        screen
                    );
                    let _ = exited.push(old);
                    if let Some(top) = self.stack.last_mut() {
                        *top = screen;
                    }
                    (false, false)
                } else {
                    (true, false)
                }
            }

            Transition::Pop => {
                if self.stack.len() <= 1 {
                    return None;
                }
                if let Some(top) = self.stack.pop() {
                    let _ = exited.push(top);
                }
                (false, true)
            }

            Transition::Home => {
                while self.stack.len() > 1 {
                    if let Some(top) = self.stack.pop() {
                        let _ = exited.push(top);
                    }
                }
                (false, true)
            }
        };

        let new = self.current();
        (new != old).then_some(NavEvent {
            from: old,
            to: new,
            suspend,
            resume,
            exited,
        })
    }
}
