// System settings with persistent storage.
// Text key=value record at /settings/settings.txt, loaded once at boot.

use core::fmt::Write as _;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{error, info, warn};

use crate::apps::{App, AppContext, ListCursor, ListUp, SubMode, Transition, list_up};
use crate::board::action::ButtonProfile;
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::book::FontTier;
use crate::drivers::config::{ConfigError, ConfigStore};
use crate::drivers::refresh::DEFAULT_GHOST_CLEAR_EVERY;
use crate::ui::{
    Alignment, BODY_FONT, ButtonHints, CONTENT_REGION, Label, ROW_H, Region, StackFmt, TITLE_FONT,
};

pub const SETTINGS_PATH: &str = "/settings/settings.txt";

const SLEEP_STEPS: [u16; 7] = [0, 5, 10, 15, 30, 60, 120];
const GHOST_STEPS: [u8; 6] = [5, 10, 15, 20, 30, 50];

const NUM_ITEMS: usize = 4;
const LABEL_W: u16 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemSettings {
    /// Minutes idle before sleep; 0 = never.
    pub sleep_timeout_min: u16,
    /// Partial refreshes before a forced wipe.
    pub ghost_clear_every: u8,
    /// 0 = Small, 1 = Medium, 2 = Large
    pub book_font: u8,
    pub button_profile: u8,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl SystemSettings {
    pub const fn defaults() -> Self {
        Self {
            sleep_timeout_min: 10,
            ghost_clear_every: DEFAULT_GHOST_CLEAR_EVERY as u8,
            book_font: 1,
            button_profile: 0,
        }
    }

    pub fn sanitize(&mut self) {
        self.sleep_timeout_min = self.sleep_timeout_min.min(120);
        self.ghost_clear_every = self.ghost_clear_every.clamp(1, 50);
        self.book_font = self.book_font.min(2);
        self.button_profile = self.button_profile.min(1);
    }

    pub fn book_font_tier(&self) -> FontTier {
        FontTier::from_index(self.book_font)
    }

    pub fn profile(&self) -> ButtonProfile {
        ButtonProfile::from_u8(self.button_profile)
    }

    /// Parse the text record over defaults. Unknown keys and bad
    /// values are skipped; the result is sanitized.
    pub fn parse(data: &[u8]) -> Self {
        let mut s = Self::defaults();
        for line in data.split(|&b| b == b'\n') {
            let line = trim(line);
            if line.is_empty() || line[0] == b'#' {
                continue;
            }
            if let Some(eq) = line.iter().position(|&b| b == b'=') {
                s.apply(trim(&line[..eq]), trim(&line[eq + 1..]));
            }
        }
        s.sanitize();
        s
    }

    fn apply(&mut self, key: &[u8], val: &[u8]) {
        let Some(v) = parse_u16(val) else {
            return;
        };
        match key {
            b"sleep_timeout" => self.sleep_timeout_min = v,
            b"ghost_clear" => self.ghost_clear_every = v.min(u8::MAX as u16) as u8,
            b"book_font" => self.book_font = v.min(u8::MAX as u16) as u8,
            b"button_map" => self.button_profile = v.min(u8::MAX as u16) as u8,
            _ => {}
        }
    }

    pub fn write_to(&self, w: &mut impl core::fmt::Write) -> core::fmt::Result {
        w.write_str("# inkpage settings\n")?;
        writeln!(w, "sleep_timeout={}", self.sleep_timeout_min)?;
        writeln!(w, "ghost_clear={}", self.ghost_clear_every)?;
        writeln!(w, "book_font={}", self.book_font)?;
        writeln!(w, "button_map={}", self.button_profile)
    }
}

fn trim(s: &[u8]) -> &[u8] {
    let mut start = 0;
    let mut end = s.len();
    while start < end && matches!(s[start], b' ' | b'\t' | b'\r') {
        start += 1;
    }
    while end > start && matches!(s[end - 1], b' ' | b'\t' | b'\r') {
        end -= 1;
    }
    &s[start..end]
}

fn parse_u16(s: &[u8]) -> Option<u16> {
    if s.is_empty() {
        return None;
    }
    let mut val: u16 = 0;
    for &b in s {
        if !b.is_ascii_digit() {
            return None;
        }
        val = val.checked_mul(10)?.checked_add((b - b'0') as u16)?;
    }
    Some(val)
}

// next value in `steps` after `current`, wrapping to the first
fn cycle<T: Copy + PartialOrd>(steps: &[T], current: T) -> T {
    steps
        .iter()
        .copied()
        .find(|&s| s > current)
        .unwrap_or(steps[0])
}

pub struct SettingsApp {
    settings: SystemSettings,
    cursor: ListCursor,
    save_pending: bool,
    changed: bool,
}

impl Default for SettingsApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsApp {
    pub const fn new() -> Self {
        Self {
            settings: SystemSettings::defaults(),
            cursor: ListCursor::new(NUM_ITEMS),
            save_pending: false,
            changed: false,
        }
    }

    pub fn system_settings(&self) -> &SystemSettings {
        &self.settings
    }

    pub fn save_pending(&self) -> bool {
        self.save_pending
    }

    /// True once after a value was changed by the user.
    pub fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    /// Read the record at boot; a missing or unreadable one means defaults.
    pub fn load<C: ConfigStore>(&mut self, config: &mut C) {
        self.settings = match config.load(SETTINGS_PATH) {
            Ok(data) => {
                info!("settings: loaded from {}", SETTINGS_PATH);
                SystemSettings::parse(&data)
            }
            Err(ConfigError::NotFound) => {
                info!("settings: no record, using defaults");
                SystemSettings::defaults()
            }
            Err(e) => {
                warn!("settings: load failed ({}), using defaults", e);
                SystemSettings::defaults()
            }
        };
    }

    /// Write a pending change. On failure the notice is shown and the
    /// save stays pending until the next change.
    pub fn save<C: ConfigStore>(&mut self, config: &mut C, ctx: &mut AppContext) -> bool {
        if !self.save_pending {
            return true;
        }
        self.save_pending = false;

        let mut buf = StackFmt::<160>::new();
        let _ = self.settings.write_to(&mut buf);
        match config.store(SETTINGS_PATH, buf.as_str().as_bytes()) {
            Ok(()) => {
                info!("settings: saved to {}", SETTINGS_PATH);
                true
            }
            Err(e) => {
                error!("settings: save failed: {}", e);
                ctx.show_notice("Save failed");
                false
            }
        }
    }

    fn item_label(i: usize) -> &'static str {
        match i {
            0 => "Sleep After",
            1 => "Ghost Clear",
            2 => "Book Font",
            3 => "Buttons",
            _ => "",
        }
    }

    fn format_value(&self, i: usize, buf: &mut StackFmt<24>) {
        buf.clear();
        let _ = match i {
            0 if self.settings.sleep_timeout_min == 0 => write!(buf, "Never"),
            0 => write!(buf, "{} min", self.settings.sleep_timeout_min),
            1 => write!(buf, "Every {}", self.settings.ghost_clear_every),
            2 => write!(buf, "{}", self.settings.book_font_tier().label()),
            3 => write!(buf, "{}", self.settings.profile().name()),
            _ => Ok(()),
        };
    }

    fn cycle_selected(&mut self) {
        let s = &mut self.settings;
        match self.cursor.index() {
            0 => s.sleep_timeout_min = cycle(&SLEEP_STEPS, s.sleep_timeout_min),
            1 => s.ghost_clear_every = cycle(&GHOST_STEPS, s.ghost_clear_every),
            2 => s.book_font = (s.book_font + 1) % 3,
            3 => s.button_profile = (s.button_profile + 1) % 2,
            _ => return,
        }
        self.save_pending = true;
        self.changed = true;
    }
}

impl App for SettingsApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, _svc: &mut Services<'_, B>) {
        self.cursor.select(0);
        ctx.request_fast();
    }

    fn handle_up<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        match list_up(&mut self.cursor, gesture) {
            ListUp::Back => Transition::Pop,
            ListUp::Moved => {
                ctx.request_partial();
                Transition::None
            }
        }
    }

    fn handle_down<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        if self.cursor.down(gesture) {
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_select<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        self.cycle_selected();
        ctx.request_partial();
        Transition::None
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::Settings
    }

    fn hints(&self) -> ButtonHints {
        let up = if self.cursor.at_top() { "Back" } else { "Up" };
        ButtonHints::new(up, "Change", "Down")
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        let area = CONTENT_REGION.inset(8);
        Label::new(area.row(0, 24), "Settings", &TITLE_FONT).draw(display)?;

        let mut val = StackFmt::<24>::new();
        for i in 0..NUM_ITEMS {
            let selected = i == self.cursor.index();
            let row = area.row(32 + i as u16 * (ROW_H + 4), ROW_H);
            let label = Region::new(row.x, row.y, LABEL_W, row.h);
            let value = Region::new(row.x + LABEL_W, row.y, row.w - LABEL_W, row.h);

            Label::new(label, Self::item_label(i), &BODY_FONT)
                .inverted(selected)
                .draw(display)?;
            self.format_value(i, &mut val);
            Label::new(value, val.as_str(), &BODY_FONT)
                .alignment(Alignment::CenterRight)
                .inverted(selected)
                .draw(display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::sim::{MemConfig, SimBoard};

    #[test]
    fn parse_ignores_unknown_and_sanitizes() {
        let s = SystemSettings::parse(
            b"# comment\nsleep_timeout = 500\r\nghost_clear=0\nbook_font=2\nwifi_ssid=home\nbutton_map=x\n",
        );
        assert_eq!(s.sleep_timeout_min, 120);
        assert_eq!(s.ghost_clear_every, 1);
        assert_eq!(s.book_font, 2);
        assert_eq!(s.button_profile, 0);
    }

    #[test]
    fn written_record_parses_back() {
        let s = SystemSettings {
            sleep_timeout_min: 30,
            ghost_clear_every: 20,
            book_font: 0,
            button_profile: 1,
        };
        let mut buf = StackFmt::<160>::new();
        s.write_to(&mut buf).unwrap();
        assert!(buf.as_str().starts_with("# inkpage settings\n"));
        assert_eq!(SystemSettings::parse(buf.as_str().as_bytes()), s);
    }

    #[test]
    fn cycle_wraps_to_first_step() {
        assert_eq!(cycle(&SLEEP_STEPS, 10), 15);
        assert_eq!(cycle(&SLEEP_STEPS, 120), 0);
        assert_eq!(cycle(&GHOST_STEPS, 7), 10);
        assert_eq!(cycle(&GHOST_STEPS, 50), 5);
    }

    #[test]
    fn select_cycles_and_saves() {
        let mut board = SimBoard::new();
        let mut svc = board.services();
        let mut ctx = AppContext::new();
        let mut app = SettingsApp::new();
        app.load(svc.config);
        assert_eq!(*app.system_settings(), SystemSettings::defaults());

        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.system_settings().ghost_clear_every, 15);
        assert!(app.save_pending());
        assert!(app.take_changed());
        assert!(!app.take_changed());

        assert!(app.save(svc.config, &mut ctx));
        assert!(!app.save_pending());
        let stored = svc.config.get(SETTINGS_PATH).unwrap();
        assert_eq!(SystemSettings::parse(stored).ghost_clear_every, 15);
    }

    #[test]
    fn failed_save_shows_notice() {
        let mut config = MemConfig::new();
        config.fail_writes = true;
        let mut ctx = AppContext::new();
        let mut app = SettingsApp::new();
        app.cursor.select(2);
        app.cycle_selected();
        assert!(!app.save(&mut config, &mut ctx));
        assert_eq!(ctx.notice(), Some("Save failed"));
    }
}
