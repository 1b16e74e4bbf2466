// Debounced gesture detection for the three front keys
//
// One key at a time, sampled by the main loop. A release starts the
// double-click window; the click is only reported once the window
// closes without a second press. Holding past LONG_PRESS_MS reports
// LongPressStart once and swallows the release.
//
// 50ms debounce, 400ms double-click window, 800ms long press.

use embedded_hal::digital::InputPin;

use crate::board::button::{Gesture, GestureEvent, HwButton};

pub const DEBOUNCE_MS: u64 = 50;
pub const DOUBLE_CLICK_MS: u64 = 400;
pub const LONG_PRESS_MS: u64 = 800;

/// Raw key levels, already resolved to at most one pressed key.
pub trait ButtonLevels {
    fn read(&mut self) -> Option<HwButton>;
}

/// Three active-low GPIO inputs.
pub struct PinButtons<K1, K2, K3> {
    key1: K1,
    key2: K2,
    key3: K3,
}

impl<K1, K2, K3> PinButtons<K1, K2, K3> {
    pub const fn new(key1: K1, key2: K2, key3: K3) -> Self {
        Self { key1, key2, key3 }
    }
}

impl<K1: InputPin, K2: InputPin, K3: InputPin> ButtonLevels for PinButtons<K1, K2, K3> {
    fn read(&mut self) -> Option<HwButton> {
        // a pin that fails to read counts as released
        if self.key1.is_low().unwrap_or(false) {
            Some(HwButton::Key1)
        } else if self.key2.is_low().unwrap_or(false) {
            Some(HwButton::Key2)
        } else if self.key3.is_low().unwrap_or(false) {
            Some(HwButton::Key3)
        } else {
            None
        }
    }
}

struct EventQueue {
    buf: [Option<GestureEvent>; 2],
}

impl EventQueue {
    const fn new() -> Self {
        Self { buf: [None; 2] }
    }

    fn push(&mut self, ev: GestureEvent) {
        if let Some(slot) = self.buf.iter_mut().find(|s| s.is_none()) {
            *slot = Some(ev);
        }
    }

    fn pop(&mut self) -> Option<GestureEvent> {
        self.buf.iter_mut().find_map(|s| s.take())
    }
}

#[derive(Clone, Copy)]
struct PendingClick {
    button: HwButton,
    released_at: u64,
}

pub struct GestureDetector {
    stable: Option<HwButton>,
    candidate: Option<HwButton>,
    candidate_since: u64,
    press_since: u64,
    long_press_fired: bool,
    second_press: bool,
    pending: Option<PendingClick>,
    queue: EventQueue,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureDetector {
    pub const fn new() -> Self {
        Self {
            stable: None,
            candidate: None,
            candidate_since: 0,
            press_since: 0,
            long_press_fired: false,
            second_press: false,
            pending: None,
            queue: EventQueue::new(),
        }
    }

    pub fn poll<L: ButtonLevels>(&mut self, levels: &mut L, now_ms: u64) -> Option<GestureEvent> {
        let raw = levels.read();
        self.update(raw, now_ms)
    }

    /// Feed one raw sample.
    pub fn update(&mut self, raw: Option<HwButton>, now_ms: u64) -> Option<GestureEvent> {
        if let Some(ev) = self.queue.pop() {
            return Some(ev);
        }

        if raw != self.candidate {
            self.candidate = raw;
            self.candidate_since = now_ms;
        }

        let debounced = if now_ms.saturating_sub(self.candidate_since) >= DEBOUNCE_MS {
            self.candidate
        } else {
            self.stable
        };

        if debounced != self.stable {
            if let Some(old) = self.stable {
                self.on_release(old, now_ms);
            }
            if let Some(new) = debounced {
                self.on_press(new, now_ms);
            }
            self.stable = debounced;
            return self.queue.pop();
        }

        match self.stable {
            Some(button) => {
                let held = now_ms.saturating_sub(self.press_since);
                if !self.long_press_fired && held >= LONG_PRESS_MS {
                    self.long_press_fired = true;
                    self.pending = None;
                    self.second_press = false;
                    return Some(GestureEvent::new(button, Gesture::LongPressStart));
                }
            }
            None => {
                if let Some(p) = self.pending
                    && now_ms.saturating_sub(p.released_at) >= DOUBLE_CLICK_MS
                {
                    self.pending = None;
                    return Some(GestureEvent::new(p.button, Gesture::Click));
                }
            }
        }

        None
    }

    pub fn is_idle(&self) -> bool {
        self.stable.is_none() && self.candidate.is_none() && self.pending.is_none()
    }

    fn on_press(&mut self, button: HwButton, now_ms: u64) {
        if let Some(p) = self.pending
            && p.button != button
        {
            self.queue.push(GestureEvent::new(p.button, Gesture::Click));
            self.pending = None;
        }
        self.second_press = self.pending.is_some();
        self.press_since = now_ms;
        self.long_press_fired = false;
    }

    fn on_release(&mut self, button: HwButton, now_ms: u64) {
        if self.long_press_fired {
            return;
        }
        if self.second_press {
            self.second_press = false;
            self.pending = None;
            self.queue.push(GestureEvent::new(button, Gesture::DoubleClick));
        } else {
            self.pending = Some(PendingClick {
                button,
                released_at: now_ms,
            });
        }
    }
}
