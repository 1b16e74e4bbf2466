// Engine: the one owner of navigation, screens, refresh policy and jobs
//
// Screens are plain fields dispatched through with_app! (no dyn). One
// call to `tick` runs a loop iteration: time-based triggers, queued
// jobs in priority order, then at most one frame. Collaborators are
// borrowed from the board per call and never held.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{debug, info, warn};

use super::activity::ActivityTracker;
use super::dispatch::{Route, route};
use super::scheduler::{Job, Scheduler};
use crate::apps::clock::ClockApp;
use crate::apps::files::FilesApp;
use crate::apps::home::HomeApp;
use crate::apps::library::LibraryApp;
use crate::apps::network::NetworkApp;
use crate::apps::settings::{SettingsApp, SystemSettings};
use crate::apps::{App, AppContext, NavigationContext, Screen, SubMode, Transition};
use crate::board::action::{Action, ActionEvent, ButtonMapper};
use crate::board::button::GestureEvent;
use crate::board::{Board, Services};
use crate::book::FontTier;
use crate::drivers::clock::Clock;
use crate::drivers::display::{self, Display, RenderMode};
use crate::drivers::input::{ButtonLevels, GestureDetector};
use crate::drivers::radio::Radio;
use crate::drivers::refresh::{RefreshPolicy, RefreshState};
use crate::drivers::system::System;
use crate::ui::{
    Alignment, BODY_FONT, HINT_TOP, Label, Region, SCREEN_W, StatusBar, SystemStatus,
};

/// Status bar refresh period.
pub const STATUS_INTERVAL_MS: u64 = 60_000;

const NOTICE_H: u16 = 24;

macro_rules! with_app {
    (ref $engine:ident, $screen:expr, |$app:ident| $body:expr) => {
        match $screen {
            Screen::MainMenu => {
                let $app = &$engine.home;
                $body
            }
            Screen::Library => {
                let $app = &$engine.library;
                $body
            }
            Screen::Files => {
                let $app = &$engine.files;
                $body
            }
            Screen::Network => {
                let $app = &$engine.network;
                $body
            }
            Screen::Clock => {
                let $app = &$engine.clock;
                $body
            }
            Screen::Settings => {
                let $app = &$engine.settings;
                $body
            }
        }
    };
    ($engine:ident, $screen:expr, |$app:ident| $body:expr) => {
        match $screen {
            Screen::MainMenu => {
                let $app = &mut $engine.home;
                $body
            }
            Screen::Library => {
                let $app = &mut $engine.library;
                $body
            }
            Screen::Files => {
                let $app = &mut $engine.files;
                $body
            }
            Screen::Network => {
                let $app = &mut $engine.network;
                $body
            }
            Screen::Clock => {
                let $app = &mut $engine.clock;
                $body
            }
            Screen::Settings => {
                let $app = &mut $engine.settings;
                $body
            }
        }
    };
}

pub struct Engine {
    nav: NavigationContext,
    home: HomeApp,
    library: LibraryApp,
    files: FilesApp,
    network: NetworkApp,
    clock: ClockApp,
    settings: SettingsApp,
    refresh: RefreshPolicy,
    activity: ActivityTracker,
    scheduler: Scheduler,
    mapper: ButtonMapper,
    detector: GestureDetector,
    status: StatusBar,
    last_status_ms: u64,
    // book font last taken from settings; the reading menu may differ
    applied_font: Option<FontTier>,
    hibernating: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            nav: NavigationContext::new(),
            home: HomeApp::new(),
            library: LibraryApp::new(),
            files: FilesApp::new(),
            network: NetworkApp::new(),
            clock: ClockApp::new(),
            settings: SettingsApp::new(),
            refresh: RefreshPolicy::default(),
            activity: ActivityTracker::new(),
            scheduler: Scheduler::new(),
            mapper: ButtonMapper::new(),
            detector: GestureDetector::new(),
            status: StatusBar::new(),
            last_status_ms: 0,
            applied_font: None,
            hibernating: false,
        }
    }

    /// Load settings, enter the main menu and schedule the first
    /// (full) frame.
    pub fn boot<B: Board>(&mut self, board: &mut B, now_ms: u64) {
        let mut svc = board.services();
        self.settings.load(svc.config);
        self.apply_settings(&mut svc);

        self.nav.ctx.set_now(now_ms);
        self.activity.on_input(now_ms);
        self.home.on_enter(&mut self.nav.ctx, &mut svc);
        self.update_status(&mut svc, now_ms);
        self.nav.ctx.request_full();
        info!("engine: booted into {}", self.nav.current().name());
    }

    /// Sample the keys once and queue any gesture they complete.
    pub fn poll_buttons<L: ButtonLevels>(&mut self, levels: &mut L, now_ms: u64) {
        if let Some(gesture) = self.detector.poll(levels, now_ms) {
            self.push_gesture(gesture);
        }
    }

    pub fn push_gesture(&mut self, gesture: GestureEvent) {
        let event = self.mapper.map_event(gesture);
        self.push_event(event);
    }

    pub fn push_event(&mut self, event: ActionEvent) {
        if let Err(e) = self.scheduler.push(Job::Input(event)) {
            warn!("engine: input dropped: {}", e);
        }
    }

    /// One loop iteration. Returns whether a frame was presented.
    pub fn tick<B, D>(
        &mut self,
        board: &mut B,
        display: &mut D,
        now_ms: u64,
    ) -> Result<bool, D::Error>
    where
        B: Board,
        D: Display,
    {
        self.nav.ctx.set_now(now_ms);

        if !self.hibernating && now_ms.saturating_sub(self.last_status_ms) >= STATUS_INTERVAL_MS {
            self.schedule(Job::StatusTick);
        }
        if self.settings.save_pending() {
            self.schedule(Job::SaveSettings);
        }

        {
            let mut svc = board.services();
            let current = self.nav.current();
            with_app!(self, current, |app| app.on_tick(&mut self.nav.ctx, &mut svc));
            if with_app!(ref self, current, |app| app.needs_work()) {
                self.schedule(Job::PollBackground);
            }
        }
        self.nav.ctx.expire_notice();

        while let Some(job) = self.scheduler.pop() {
            self.run_job(job, board, now_ms);
        }

        self.render(display, now_ms)
    }

    fn schedule(&mut self, job: Job) {
        if let Err(e) = self.scheduler.push_unique(job) {
            warn!("engine: {}", e);
        }
    }

    fn run_job<B: Board>(&mut self, job: Job, board: &mut B, now_ms: u64) {
        match job {
            Job::Input(event) => self.handle_event(event, board, now_ms),
            Job::PollBackground => {
                let mut svc = board.services();
                let current = self.nav.current();
                with_app!(self, current, |app| app.on_work(&mut self.nav.ctx, &mut svc));
            }
            Job::StatusTick => {
                let mut svc = board.services();
                self.update_status(&mut svc, now_ms);
            }
            Job::SaveSettings => {
                let svc = board.services();
                self.settings.save(svc.config, &mut self.nav.ctx);
            }
        }
    }

    /// Route one logical button event through the current screen.
    pub fn handle_event<B: Board>(&mut self, event: ActionEvent, board: &mut B, now_ms: u64) {
        self.activity.on_input(now_ms);
        self.refresh.on_input();
        self.nav.ctx.set_now(now_ms);
        self.nav.ctx.dismiss_notice();

        let mut svc = board.services();
        let current = self.nav.current();
        let transition = match route(current, event) {
            Route::Home => Transition::Home,
            Route::Ignore => Transition::None,
            Route::Screen(action, gesture) => {
                let ctx = &mut self.nav.ctx;
                with_app!(self, current, |app| match action {
                    Action::Up => app.handle_up(gesture, ctx, &mut svc),
                    Action::Down => app.handle_down(gesture, ctx, &mut svc),
                    Action::Select => app.handle_select(gesture, ctx, &mut svc),
                })
            }
        };

        if transition == Transition::None {
            debug!("engine: {:?} on {:?} handled in place", event, current);
        }
        self.navigate(transition, &mut svc);

        if self.settings.take_changed() {
            self.apply_settings(&mut svc);
        }
    }

    fn navigate<B: Board>(&mut self, transition: Transition, svc: &mut Services<'_, B>) {
        let Some(nav) = self.nav.apply(transition) else {
            return;
        };
        info!("nav: {} -> {}", nav.from.name(), nav.to.name());

        for &screen in nav.exited.iter() {
            with_app!(self, screen, |app| app.on_exit(svc));
        }
        if nav.suspend {
            with_app!(self, nav.from, |app| app.on_suspend(svc));
        }
        let ctx = &mut self.nav.ctx;
        if nav.resume {
            with_app!(self, nav.to, |app| app.on_resume(ctx, svc));
        } else {
            with_app!(self, nav.to, |app| app.on_enter(ctx, svc));
        }
        ctx.request_fast();
    }

    fn apply_settings<B: Board>(&mut self, svc: &mut Services<'_, B>) {
        let s: SystemSettings = *self.settings.system_settings();
        self.refresh.set_threshold(u32::from(s.ghost_clear_every));
        self.activity.set_sleep_timeout_min(s.sleep_timeout_min);
        self.mapper.set_profile(s.profile());
        if self.applied_font != Some(s.book_font_tier()) {
            self.applied_font = Some(s.book_font_tier());
            self.library.set_font_tier(s.book_font_tier(), svc.system);
        }
        info!(
            "engine: settings applied (sleep {} min, ghost clear {}, font {}, buttons {})",
            s.sleep_timeout_min,
            s.ghost_clear_every,
            s.book_font_tier().label(),
            s.profile().name()
        );
    }

    fn update_status<B: Board>(&mut self, svc: &mut Services<'_, B>, now_ms: u64) {
        self.last_status_ms = now_ms;
        let snapshot = SystemStatus {
            time: svc.clock.now(),
            h24: self.clock.h24(),
            battery: svc.system.battery(),
            wifi: svc.radio.connected_ssid().is_some(),
        };
        if self.status.update(&snapshot) {
            self.nav.ctx.request_partial();
        }
    }

    /// Paint and present a frame if anything asked for one.
    pub fn render<D: Display>(&mut self, display: &mut D, now_ms: u64) -> Result<bool, D::Error> {
        let redraw = self.nav.ctx.take_redraw();
        if redraw.mode().is_some() {
            self.refresh.mark_dirty();
        }
        if self.hibernating && self.refresh.is_dirty() {
            self.wake(display);
        }

        let hint = redraw.mode().unwrap_or(RenderMode::Partial);
        let Some(decision) = self.refresh.next_frame(hint, now_ms) else {
            return Ok(false);
        };
        if decision.wipe {
            display::wipe(display)?;
        }

        let current = self.nav.current();
        display.begin_frame();
        display.clear(BinaryColor::Off)?;
        self.status.draw(display, current.name())?;
        with_app!(ref self, current, |app| app.draw(display)?);
        let hints = with_app!(ref self, current, |app| app.hints());
        hints.draw(display)?;
        if let Some(text) = self.nav.ctx.notice() {
            draw_notice(display, text)?;
        }
        display.end_frame();
        display.present(decision.mode);
        Ok(true)
    }

    /// Put the panel to sleep; the next frame wakes it with a full refresh.
    pub fn hibernate<D: Display>(&mut self, display: &mut D) {
        if !self.hibernating {
            display.hibernate();
            self.hibernating = true;
            info!("engine: display hibernating");
        }
    }

    pub fn wake<D: Display>(&mut self, display: &mut D) {
        if self.hibernating {
            display.wake();
            self.hibernating = false;
            self.refresh.on_wake();
            info!("engine: display awake");
        }
    }

    pub fn is_hibernating(&self) -> bool {
        self.hibernating
    }

    pub fn sleep_due(&self, now_ms: u64) -> bool {
        self.activity.sleep_due(now_ms)
    }

    pub fn poll_interval_ms(&self, now_ms: u64) -> u32 {
        self.activity.poll_interval_ms(now_ms)
    }

    pub fn current_screen(&self) -> Screen {
        self.nav.current()
    }

    pub fn history(&self) -> &[Screen] {
        self.nav.history()
    }

    pub fn sub_mode(&self) -> SubMode {
        let current = self.nav.current();
        with_app!(ref self, current, |app| app.sub_mode())
    }

    pub fn context(&self) -> &AppContext {
        &self.nav.ctx
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    pub fn refresh_threshold(&self) -> u32 {
        self.refresh.threshold()
    }

    pub fn system_settings(&self) -> &SystemSettings {
        self.settings.system_settings()
    }

    pub fn status_text(&self) -> &str {
        self.status.text()
    }

    pub fn pending_jobs(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn home(&self) -> &HomeApp {
        &self.home
    }

    pub fn library(&self) -> &LibraryApp {
        &self.library
    }

    pub fn files(&self) -> &FilesApp {
        &self.files
    }

    pub fn network(&self) -> &NetworkApp {
        &self.network
    }
}

// inverted strip just above the hint bar
fn draw_notice<D>(display: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let r = Region::new(8, HINT_TOP - NOTICE_H - 6, SCREEN_W - 16, NOTICE_H);
    Label::new(r, text, &BODY_FONT)
        .alignment(Alignment::Center)
        .inverted(true)
        .draw(display)
}
