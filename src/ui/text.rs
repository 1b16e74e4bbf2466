// Word wrap for page text and multi-line messages.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use super::label::max_chars;
use super::widget::Region;

/// Lines of at most `cols` chars. Breaks at spaces where possible,
/// splits longer words, and honours '\n'.
pub struct WrapLines<'a> {
    rest: &'a str,
    cols: usize,
    done: bool,
}

pub fn wrap_lines(text: &str, cols: usize) -> WrapLines<'_> {
    WrapLines {
        rest: text,
        cols: cols.max(1),
        done: text.is_empty(),
    }
}

impl<'a> Iterator for WrapLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.done {
            return None;
        }

        let rest: &'a str = self.rest;
        let para_end = rest.find('\n').unwrap_or(rest.len());
        let para = &rest[..para_end];

        let Some((fit_end, ch)) = para.char_indices().nth(self.cols) else {
            // whole paragraph fits
            if para_end == rest.len() {
                self.done = true;
            } else {
                self.rest = &rest[para_end + 1..];
            }
            return Some(para.trim_end());
        };

        // a space right after the last fitting char still counts
        let window = &para[..fit_end + ch.len_utf8()];
        let (line, next) = match window.rfind(' ') {
            Some(space) if space > 0 => (&para[..space], space + 1),
            _ => (&para[..fit_end], fit_end),
        };
        self.rest = rest[next..].trim_start_matches(' ');
        Some(line.trim_end())
    }
}

/// Draw wrapped text top-down, stopping at the bottom of `region`.
/// Returns the number of lines drawn.
pub fn draw_wrapped<D>(
    display: &mut D,
    text: &str,
    region: Region,
    font: &'static MonoFont<'static>,
    line_height: u16,
) -> Result<usize, D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let cols = max_chars(font, region.w);
    let rows = usize::from(region.h / line_height.max(1));

    let mut drawn = 0;
    for line in wrap_lines(text, cols).take(rows) {
        let y = region.y + drawn as u16 * line_height;
        if !line.is_empty() {
            let pos = Point::new(region.x as i32, y as i32);
            Text::with_baseline(line, pos, style, Baseline::Top).draw(display)?;
        }
        drawn += 1;
    }
    Ok(drawn)
}
