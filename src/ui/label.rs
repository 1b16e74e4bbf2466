// Single-line text label with optional inverted highlight.
// Text wider than the region is cut and marked with "..".

use core::fmt::Write as _;

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::PrimitiveStyle,
    text::{Baseline, Text},
};

use super::stack_fmt::StackFmt;
use super::widget::{Alignment, Region};

pub struct Label<'a> {
    region: Region,
    text: &'a str,
    font: &'static MonoFont<'static>,
    alignment: Alignment,
    inverted: bool,
}

impl<'a> Label<'a> {
    pub fn new(region: Region, text: &'a str, font: &'static MonoFont<'static>) -> Self {
        Self {
            region,
            text,
            font,
            alignment: Alignment::CenterLeft,
            inverted: false,
        }
    }

    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub const fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let (bg, fg) = if self.inverted {
            (BinaryColor::On, BinaryColor::Off)
        } else {
            (BinaryColor::Off, BinaryColor::On)
        };

        self.region
            .to_rect()
            .into_styled(PrimitiveStyle::with_fill(bg))
            .draw(display)?;

        let mut fitted = StackFmt::<128>::new();
        let text = fit(self.text, max_chars(self.font, self.region.w), &mut fitted);

        let size = Size::new(
            text.chars().count() as u32 * advance(self.font),
            self.font.character_size.height,
        );
        let pos = self.alignment.position(self.region, size);
        let style = MonoTextStyle::new(self.font, fg);
        Text::with_baseline(text, pos, style, Baseline::Top).draw(display)?;
        Ok(())
    }
}

pub fn advance(font: &MonoFont<'_>) -> u32 {
    font.character_size.width + font.character_spacing
}

pub fn max_chars(font: &MonoFont<'_>, width: u16) -> usize {
    (u32::from(width) / advance(font).max(1)) as usize
}

// `text` if it fits in `max` chars, else a cut copy ending in ".."
fn fit<'t, const N: usize>(text: &'t str, max: usize, buf: &'t mut StackFmt<N>) -> &'t str {
    if text.chars().count() <= max {
        return text;
    }
    let keep = max.saturating_sub(2);
    let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    let _ = write!(buf, "{}..", &text[..cut]);
    buf.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_is_cut() {
        let mut buf = StackFmt::<32>::new();
        assert_eq!(fit("short", 10, &mut buf), "short");
        assert_eq!(fit("a much longer title", 8, &mut buf), "a much..");
    }
}
