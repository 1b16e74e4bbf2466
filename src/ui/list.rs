// Scrolling list rows with the selected row inverted.

use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use super::label::Label;
use super::stack_fmt::StackFmt;
use super::widget::Region;
use crate::apps::ListCursor;

pub const ROW_H: u16 = 20;

pub fn visible_rows(region: Region) -> usize {
    usize::from(region.h / ROW_H)
}

/// Draw the rows of `cursor` that fit in `region`; `label` formats row `i`.
pub fn draw_list<D, F>(
    display: &mut D,
    region: Region,
    cursor: &ListCursor,
    font: &'static MonoFont<'static>,
    mut label: F,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
    F: FnMut(usize, &mut StackFmt<96>),
{
    let rows = visible_rows(region);
    let mut buf = StackFmt::<96>::new();

    for (row, i) in cursor.window(rows).enumerate() {
        buf.clear();
        label(i, &mut buf);
        let r = Region::new(region.x, region.y + row as u16 * ROW_H, region.w, ROW_H);
        Label::new(r.inset_x(4), buf.as_str(), font)
            .inverted(i == cursor.index())
            .draw(display)?;
    }
    Ok(())
}
