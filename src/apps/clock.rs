// Clock face with 12/24 h toggle and network time sync.

use core::fmt::Write as _;

use embedded_graphics::mono_font::ascii::FONT_10X20;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{info, warn};

use crate::apps::{App, AppContext, SubMode, Transition};
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::drivers::clock::{Clock, SyncError, WallTime};
use crate::kernel::task::{Deadline, TaskPoll};
use crate::ui::{Alignment, BODY_FONT, ButtonHints, CONTENT_REGION, Label, StackFmt, TITLE_FONT};

pub const SYNC_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMode {
    Face,
    Syncing,
}

pub struct ClockApp {
    mode: ClockMode,
    h24: bool,
    time: Option<WallTime>,
    sync: Option<Deadline>,
}

impl Default for ClockApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockApp {
    pub const fn new() -> Self {
        Self {
            mode: ClockMode::Face,
            h24: false,
            time: None,
            sync: None,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    /// 24-hour display, shared with the status bar.
    pub fn h24(&self) -> bool {
        self.h24
    }

    fn cancel<C: Clock>(&mut self, clock: &mut C) {
        if self.sync.take().is_some() {
            clock.cancel_sync();
            info!("clock: sync cancelled");
        }
        self.mode = ClockMode::Face;
    }

    fn sync_failed(ctx: &mut AppContext, err: SyncError) {
        let mut msg = StackFmt::<48>::new();
        let _ = write!(msg, "Sync failed: {}", err);
        ctx.show_notice(msg.as_str());
    }
}

impl App for ClockApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.mode = ClockMode::Face;
        self.sync = None;
        self.time = svc.clock.now();
        ctx.request_fast();
    }

    fn on_exit<B: Board>(&mut self, svc: &mut Services<'_, B>) {
        self.cancel(svc.clock);
    }

    fn handle_up<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        match self.mode {
            ClockMode::Face => Transition::Pop,
            ClockMode::Syncing => {
                self.cancel(svc.clock);
                ctx.request_partial();
                Transition::None
            }
        }
    }

    fn handle_down<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        if self.mode == ClockMode::Face {
            self.h24 = !self.h24;
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_select<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        if self.mode == ClockMode::Syncing {
            return Transition::None;
        }
        match svc.clock.start_sync() {
            Ok(()) => {
                info!("clock: sync started");
                self.sync = Some(Deadline::start(ctx.now_ms(), SYNC_TIMEOUT_MS));
                self.mode = ClockMode::Syncing;
                ctx.request_partial();
            }
            Err(e) => {
                warn!("clock: sync not started: {}", e);
                Self::sync_failed(ctx, e);
            }
        }
        Transition::None
    }

    // redraw when the displayed minute changes
    fn on_tick<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let now = svc.clock.now();
        let minute = |t: Option<WallTime>| t.map(|t| (t.hour, t.minute));
        if minute(now) != minute(self.time) {
            ctx.request_partial();
        }
        self.time = now;
    }

    fn needs_work(&self) -> bool {
        self.sync.is_some()
    }

    fn on_work<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let Some(deadline) = self.sync else {
            return;
        };
        match deadline.check(ctx.now_ms(), svc.clock.poll_sync()) {
            TaskPoll::Pending => return,
            TaskPoll::Done(Ok(())) => {
                info!("clock: synced");
                self.time = svc.clock.now();
                ctx.show_notice("Time synced");
            }
            TaskPoll::Done(Err(e)) => {
                warn!("clock: sync failed: {}", e);
                Self::sync_failed(ctx, e);
            }
            TaskPoll::TimedOut => {
                warn!("clock: sync timed out after {} ms", SYNC_TIMEOUT_MS);
                svc.clock.cancel_sync();
                ctx.show_notice("Sync timed out");
            }
        }
        self.sync = None;
        self.mode = ClockMode::Face;
        ctx.request_partial();
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::Clock(self.mode)
    }

    fn hints(&self) -> ButtonHints {
        match self.mode {
            ClockMode::Face => {
                let fmt = if self.h24 { "12h" } else { "24h" };
                ButtonHints::new("Back", "Sync", fmt)
            }
            ClockMode::Syncing => ButtonHints::new("Cancel", "", ""),
        }
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        let area = CONTENT_REGION.inset(8);
        Label::new(area.row(0, 24), "Clock", &TITLE_FONT).draw(display)?;

        let mut buf = StackFmt::<24>::new();
        match self.time {
            Some(t) => {
                let _ = t.write_hm(&mut buf, self.h24);
                Label::new(area.row(120, 28), buf.as_str(), &FONT_10X20)
                    .alignment(Alignment::Center)
                    .draw(display)?;
                buf.clear();
                let _ = t.write_date(&mut buf);
                Label::new(area.row(152, 20), buf.as_str(), &BODY_FONT)
                    .alignment(Alignment::Center)
                    .draw(display)?;
            }
            None => {
                Label::new(area.row(120, 28), "--:--", &FONT_10X20)
                    .alignment(Alignment::Center)
                    .draw(display)?;
                Label::new(area.row(152, 20), "Clock not set", &BODY_FONT)
                    .alignment(Alignment::Center)
                    .draw(display)?;
            }
        }

        if self.mode == ClockMode::Syncing {
            Label::new(area.row(200, 20), "Syncing...", &BODY_FONT)
                .alignment(Alignment::Center)
                .draw(display)?;
        }
        Ok(())
    }
}
