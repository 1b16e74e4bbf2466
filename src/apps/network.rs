// Network screen: saved networks, scanning, and the configuration hotspot
//
// Association and credentials live in the radio collaborator. A scan
// runs as a background task polled from the main loop and gives up
// after SCAN_TIMEOUT_MS. Secured networks are joined through the
// hotspot portal, not from here.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{info, warn};

use crate::apps::{App, AppContext, ListCursor, ListUp, SubMode, Transition, list_up};
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::drivers::radio::{Radio, RadioError, ScanResult, Security};
use crate::kernel::task::{Deadline, TaskPoll};
use crate::ui::{
    BODY_FONT, ButtonHints, CONTENT_REGION, Label, Region, SMALL_FONT, StackFmt, TITLE_FONT,
    draw_list,
};

pub const SCAN_TIMEOUT_MS: u64 = 10_000;

const OVERVIEW_ACTIONS: [&str; 3] = ["Scan Networks", "Saved Networks", "Start Hotspot"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    Overview,
    ScanResults,
    SavedList,
    AccessPointActive,
    Error,
}

pub struct NetworkApp {
    mode: NetworkMode,
    // cached from the radio so drawing needs no services
    saved: Vec<String>,
    connected: Option<String>,
    results: Vec<ScanResult>,
    overview: ListCursor,
    scan_cursor: ListCursor,
    saved_cursor: ListCursor,
    scan: Option<Deadline>,
    error: Option<RadioError>,
}

impl Default for NetworkApp {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkApp {
    pub fn new() -> Self {
        Self {
            mode: NetworkMode::Overview,
            saved: Vec::new(),
            connected: None,
            results: Vec::new(),
            overview: ListCursor::new(OVERVIEW_ACTIONS.len()),
            scan_cursor: ListCursor::new(0),
            saved_cursor: ListCursor::new(0),
            scan: None,
            error: None,
        }
    }

    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    pub fn saved(&self) -> &[String] {
        &self.saved
    }

    fn sync_from<R: Radio>(&mut self, radio: &R) {
        self.saved = radio
            .saved_networks()
            .iter()
            .map(|n| n.ssid.clone())
            .collect();
        self.connected = radio.connected_ssid().map(String::from);
        self.overview.set_len(self.saved.len() + OVERVIEW_ACTIONS.len());
        self.saved_cursor.set_len(self.saved.len());
    }

    fn report(ctx: &mut AppContext, err: RadioError) {
        let mut msg = StackFmt::<48>::new();
        let _ = write!(msg, "Failed: {}", err);
        ctx.show_notice(msg.as_str());
    }

    fn connect<R: Radio>(&mut self, ssid: &str, ctx: &mut AppContext, radio: &mut R) {
        match radio.connect(ssid) {
            Ok(()) => {
                info!("network: connected to {}", ssid);
                ctx.show_notice("Connected");
            }
            Err(e) => {
                warn!("network: connect {} failed: {}", ssid, e);
                Self::report(ctx, e);
            }
        }
        self.sync_from(radio);
    }

    fn start_scan<R: Radio>(&mut self, ctx: &mut AppContext, radio: &mut R) {
        if let Err(e) = radio.start_scan() {
            warn!("network: scan failed to start: {}", e);
            Self::report(ctx, e);
            return;
        }
        info!("network: scanning");
        self.results.clear();
        self.scan_cursor.set_len(0);
        self.scan = Some(Deadline::start(ctx.now_ms(), SCAN_TIMEOUT_MS));
        self.mode = NetworkMode::ScanResults;
        ctx.request_fast();
    }

    fn stop_scan<R: Radio>(&mut self, radio: &mut R) {
        if self.scan.take().is_some() {
            radio.cancel_scan();
        }
    }

    fn select_overview<R: Radio>(&mut self, ctx: &mut AppContext, radio: &mut R) {
        let i = self.overview.index();
        if let Some(ssid) = self.saved.get(i).cloned() {
            self.connect(&ssid, ctx, radio);
            return;
        }
        match i - self.saved.len() {
            0 => self.start_scan(ctx, radio),
            1 => {
                self.saved_cursor.select(0);
                self.mode = NetworkMode::SavedList;
                ctx.request_fast();
            }
            _ => match radio.start_access_point() {
                Ok(()) => {
                    info!("network: hotspot started");
                    self.mode = NetworkMode::AccessPointActive;
                    ctx.request_fast();
                }
                Err(e) => {
                    warn!("network: hotspot failed: {}", e);
                    Self::report(ctx, e);
                }
            },
        }
    }

    fn to_overview(&mut self, ctx: &mut AppContext) {
        self.mode = NetworkMode::Overview;
        ctx.request_fast();
    }

    fn overview_label(&self, i: usize, buf: &mut StackFmt<96>) {
        match self.saved.get(i) {
            Some(ssid) if self.connected.as_deref() == Some(ssid.as_str()) => {
                let _ = write!(buf, "{} (connected)", ssid);
            }
            Some(ssid) => {
                let _ = buf.write_str(ssid);
            }
            None => {
                let action = OVERVIEW_ACTIONS.get(i - self.saved.len()).copied();
                let _ = buf.write_str(action.unwrap_or(""));
            }
        }
    }

    fn draw_body<D>(&self, display: &mut D, rows: Region) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        match self.mode {
            NetworkMode::Overview => draw_list(display, rows, &self.overview, &BODY_FONT, |i, buf| {
                self.overview_label(i, buf)
            }),
            NetworkMode::ScanResults if self.scan.is_some() => {
                Label::new(rows.row(0, 20), "Scanning...", &BODY_FONT).draw(display)
            }
            NetworkMode::ScanResults if self.results.is_empty() => {
                Label::new(rows.row(0, 20), "No networks found", &BODY_FONT).draw(display)
            }
            NetworkMode::ScanResults => {
                draw_list(display, rows, &self.scan_cursor, &BODY_FONT, |i, buf| {
                    if let Some(r) = self.results.get(i) {
                        let lock = match r.security {
                            Security::Open => "",
                            Security::Secured => " *",
                        };
                        let _ = write!(buf, "{}{}  {} dBm", r.ssid, lock, r.rssi);
                    }
                })
            }
            NetworkMode::SavedList if self.saved.is_empty() => {
                Label::new(rows.row(0, 20), "No saved networks", &BODY_FONT).draw(display)
            }
            NetworkMode::SavedList => {
                draw_list(display, rows, &self.saved_cursor, &BODY_FONT, |i, buf| {
                    if let Some(ssid) = self.saved.get(i) {
                        let _ = write!(buf, "{}. {}", i + 1, ssid);
                    }
                })
            }
            NetworkMode::AccessPointActive => {
                Label::new(rows.row(0, 20), "Hotspot running", &BODY_FONT).draw(display)?;
                Label::new(rows.row(24, 16), "Join it to add networks", &SMALL_FONT)
                    .draw(display)
            }
            NetworkMode::Error => {
                let mut msg = StackFmt::<48>::new();
                let _ = write!(msg, "{}", self.error.unwrap_or(RadioError::Unavailable));
                Label::new(rows.row(0, 20), msg.as_str(), &BODY_FONT).draw(display)?;
                Label::new(rows.row(24, 20), "Press Back to return", &BODY_FONT).draw(display)
            }
        }
    }
}

impl App for NetworkApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.scan = None;
        self.results.clear();
        self.overview.select(0);
        if svc.radio.is_available() {
            self.error = None;
            self.mode = NetworkMode::Overview;
            self.sync_from(&*svc.radio);
        } else {
            warn!("network: radio unavailable");
            self.error = Some(RadioError::Unavailable);
            self.mode = NetworkMode::Error;
        }
        ctx.request_fast();
    }

    fn on_exit<B: Board>(&mut self, svc: &mut Services<'_, B>) {
        self.stop_scan(svc.radio);
        if self.mode == NetworkMode::AccessPointActive {
            svc.radio.stop_access_point();
        }
        self.mode = NetworkMode::Overview;
    }

    fn handle_up<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        let back = match self.mode {
            NetworkMode::Overview => list_up(&mut self.overview, gesture),
            NetworkMode::ScanResults => list_up(&mut self.scan_cursor, gesture),
            NetworkMode::SavedList => list_up(&mut self.saved_cursor, gesture),
            NetworkMode::AccessPointActive => {
                svc.radio.stop_access_point();
                info!("network: hotspot stopped");
                self.to_overview(ctx);
                return Transition::None;
            }
            NetworkMode::Error => return Transition::Pop,
        };
        match (back, self.mode) {
            (ListUp::Moved, _) => ctx.request_partial(),
            (ListUp::Back, NetworkMode::Overview) => return Transition::Pop,
            (ListUp::Back, _) => {
                self.stop_scan(svc.radio);
                self.to_overview(ctx);
            }
        }
        Transition::None
    }

    fn handle_down<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        let moved = match self.mode {
            NetworkMode::Overview => self.overview.down(gesture),
            NetworkMode::ScanResults => self.scan_cursor.down(gesture),
            NetworkMode::SavedList => self.saved_cursor.down(gesture),
            NetworkMode::AccessPointActive | NetworkMode::Error => false,
        };
        if moved {
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
        match self.mode {
            NetworkMode::Overview => self.select_overview(ctx, svc.radio),
            NetworkMode::ScanResults => {
                let Some(result) = self.results.get(self.scan_cursor.index()).cloned() else {
                    return Transition::None;
                };
                match result.security {
                    Security::Open => self.connect(&result.ssid, ctx, svc.radio),
                    Security::Secured => ctx.show_notice("Secured: add it via the hotspot"),
                }
            }
            NetworkMode::SavedList => {
                let i = self.saved_cursor.index();
                if i >= self.saved.len() {
                    return Transition::None;
                }
                match svc.radio.raise_priority(i) {
                    Ok(()) => {
                        info!("network: raised priority of {}", self.saved[i]);
                        self.sync_from(&*svc.radio);
                        self.saved_cursor.select(0);
                        ctx.show_notice("Moved to top");
                    }
                    Err(e) => {
                        warn!("network: priority change failed: {}", e);
                        Self::report(ctx, e);
                    }
                }
            }
            NetworkMode::AccessPointActive => {
                svc.radio.stop_access_point();
                info!("network: hotspot stopped");
                self.to_overview(ctx);
            }
            NetworkMode::Error => {}
        }
        Transition::None
    }

    fn needs_work(&self) -> bool {
        self.scan.is_some()
    }

    fn on_work<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let Some(deadline) = self.scan else {
            return;
        };
        match deadline.check(ctx.now_ms(), svc.radio.poll_scan()) {
            TaskPoll::Pending => return,
            TaskPoll::Done(Ok(mut found)) => {
                found.sort_by(|a, b| b.rssi.cmp(&a.rssi));
                info!("network: scan found {} networks", found.len());
                self.scan_cursor = ListCursor::new(found.len());
                self.results = found;
            }
            TaskPoll::Done(Err(e)) => {
                warn!("network: scan failed: {}", e);
                Self::report(ctx, e);
            }
            TaskPoll::TimedOut => {
                warn!("network: scan timed out after {} ms", SCAN_TIMEOUT_MS);
                svc.radio.cancel_scan();
                ctx.show_notice("Scan timed out");
            }
        }
        self.scan = None;
        ctx.request_partial();
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::Network(self.mode)
    }

    fn hints(&self) -> ButtonHints {
        match self.mode {
            NetworkMode::Overview if self.overview.at_top() => {
                ButtonHints::new("Back", "Select", "Down")
            }
            NetworkMode::Overview => ButtonHints::new("Up", "Select", "Down"),
            NetworkMode::ScanResults => ButtonHints::new("Up", "Join", "Down"),
            NetworkMode::SavedList => ButtonHints::new("Up", "To Top", "Down"),
            NetworkMode::AccessPointActive => ButtonHints::new("Stop", "Stop", ""),
            NetworkMode::Error => ButtonHints::new("Back", "", ""),
        }
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        let area = CONTENT_REGION.inset(4);
        let title = match self.mode {
            NetworkMode::ScanResults => "Scan Results",
            NetworkMode::SavedList => "Saved Networks",
            NetworkMode::AccessPointActive => "Hotspot",
            _ => "Network",
        };
        Label::new(area.row(0, 24), title, &TITLE_FONT).draw(display)?;

        let mut status = StackFmt::<48>::new();
        match self.connected.as_deref() {
            Some(ssid) => {
                let _ = write!(status, "Connected: {}", ssid);
            }
            None => {
                let _ = status.write_str("Not connected");
            }
        }
        Label::new(area.row(24, 14), status.as_str(), &SMALL_FONT).draw(display)?;

        let rows = Region::new(area.x, area.y + 42, area.w, area.h - 42);
        self.draw_body(display, rows)
    }
}
