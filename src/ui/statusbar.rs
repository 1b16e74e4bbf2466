// Status bar: screen title on the left, clock, radio and battery on the
// right, drawn inverted across the top edge.

use core::fmt::Write;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::label::{Label, advance};
use super::stack_fmt::StackFmt;
use super::widget::{Alignment, Region};
use super::{BAR_REGION, SMALL_FONT};
use crate::drivers::clock::WallTime;
use crate::drivers::system::BatteryStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemStatus {
    pub time: Option<WallTime>,
    pub h24: bool,
    pub battery: BatteryStatus,
    pub wifi: bool,
}

pub struct StatusBar {
    status: SystemStatus,
    right: StackFmt<32>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    pub const fn new() -> Self {
        Self {
            status: SystemStatus {
                time: None,
                h24: false,
                battery: BatteryStatus {
                    millivolts: 0,
                    percent: 0,
                    charging: false,
                },
                wifi: false,
            },
            right: StackFmt::new(),
        }
    }

    pub fn status(&self) -> &SystemStatus {
        &self.status
    }

    /// Store a new snapshot; true when the visible text changed.
    pub fn update(&mut self, s: &SystemStatus) -> bool {
        let mut right = StackFmt::<32>::new();
        if let Some(t) = s.time {
            let _ = t.write_hm(&mut right, s.h24);
            let _ = right.write_str("  ");
        }
        if s.wifi {
            let _ = right.write_str("W  ");
        }
        let _ = write!(right, "{}%", s.battery.percent);
        if s.battery.charging {
            let _ = right.write_char('+');
        }

        self.status = *s;
        if right.as_str() == self.right.as_str() {
            return false;
        }
        self.right = right;
        true
    }

    pub fn text(&self) -> &str {
        self.right.as_str()
    }

    pub fn draw<D>(&self, display: &mut D, title: &str) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let bar = BAR_REGION;
        let right_w = (self.right.as_str().chars().count() as u32 * advance(&SMALL_FONT)) as u16;
        let right_w = right_w.min(bar.w / 2) + 4;
        let left = Region::new(bar.x, bar.y, bar.w - right_w, bar.h);
        let right = Region::new(bar.x + bar.w - right_w, bar.y, right_w, bar.h);

        Label::new(left.inset_x(2), title, &SMALL_FONT)
            .inverted(true)
            .draw(display)?;
        Label::new(right, self.right.as_str(), &SMALL_FONT)
            .alignment(Alignment::CenterRight)
            .inverted(true)
            .draw(display)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_reports_visible_change() {
        let mut bar = StatusBar::new();
        let mut s = SystemStatus {
            time: Some(WallTime {
                hour: 9,
                minute: 5,
                ..WallTime::default()
            }),
            h24: true,
            battery: BatteryStatus {
                millivolts: 3900,
                percent: 80,
                charging: false,
            },
            wifi: true,
        };
        assert!(bar.update(&s));
        assert_eq!(bar.text(), "09:05  W  80%");
        assert!(!bar.update(&s));

        s.battery.millivolts = 3890;
        assert!(!bar.update(&s));

        s.time = None;
        s.wifi = false;
        assert!(bar.update(&s));
        assert_eq!(bar.text(), "80%");
    }
}
