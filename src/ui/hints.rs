// Button hint bar along the bottom edge.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};

use super::label::Label;
use super::widget::{Alignment, Region};
use super::{HINT_REGION, SMALL_FONT};

/// What each key does on the current screen; empty means nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonHints {
    pub up: &'static str,
    pub select: &'static str,
    pub down: &'static str,
}

impl ButtonHints {
    pub const fn new(up: &'static str, select: &'static str, down: &'static str) -> Self {
        Self { up, select, down }
    }

    pub fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let r = HINT_REGION;
        Line::new(
            Point::new(r.x as i32, r.y as i32),
            Point::new((r.x + r.w - 1) as i32, r.y as i32),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)?;

        let third = r.w / 3;
        let slots = [
            (self.up, Alignment::CenterLeft),
            (self.select, Alignment::Center),
            (self.down, Alignment::CenterRight),
        ];
        for (i, (text, align)) in slots.into_iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let slot = Region::new(r.x + i as u16 * third, r.y + 1, third, r.h - 1).inset_x(2);
            Label::new(slot, text, &SMALL_FONT)
                .alignment(align)
                .draw(display)?;
        }
        Ok(())
    }
}
