// Context menu overlay
//
// A bordered box over the middle of the content area. UP moves up and
// reports when it is already on the first option so the owner can
// close the menu; DOWN cycles.

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::PrimitiveStyle};
use heapless::Vec as FixedVec;

use super::label::Label;
use super::widget::{Alignment, Region};
use super::{BODY_FONT, CONTENT_REGION, TITLE_FONT};
use crate::apps::ListCursor;

pub const MAX_MENU_ITEMS: usize = 6;

const MENU_W: u16 = 200;
const ITEM_H: u16 = 22;
const TITLE_H: u16 = 24;
const BORDER: u16 = 2;
const PAD: u16 = 6;

pub trait MenuItem: Copy {
    fn label(self) -> &'static str;
}

pub struct ContextMenu<T: MenuItem> {
    title: &'static str,
    items: FixedVec<T, MAX_MENU_ITEMS>,
    cursor: ListCursor,
}

impl<T: MenuItem> Default for ContextMenu<T> {
    fn default() -> Self {
        Self::new("", &[])
    }
}

impl<T: MenuItem> ContextMenu<T> {
    /// Options past MAX_MENU_ITEMS are dropped.
    pub fn new(title: &'static str, options: &[T]) -> Self {
        let mut items = FixedVec::new();
        for &o in options.iter().take(MAX_MENU_ITEMS) {
            let _ = items.push(o);
        }
        let cursor = ListCursor::new(items.len());
        Self {
            title,
            items,
            cursor,
        }
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    pub fn selected(&self) -> Option<T> {
        self.items.get(self.cursor.index()).copied()
    }

    pub fn down(&mut self) -> bool {
        self.cursor.next()
    }

    /// False when already on the first option.
    pub fn up(&mut self) -> bool {
        if self.cursor.at_top() {
            return false;
        }
        self.cursor.prev()
    }

    fn region(&self) -> Region {
        let h = BORDER * 2 + PAD * 2 + TITLE_H + ITEM_H * self.items.len() as u16;
        let x = CONTENT_REGION.x + (CONTENT_REGION.w - MENU_W) / 2;
        let y = CONTENT_REGION.y + CONTENT_REGION.h.saturating_sub(h) / 2;
        Region::new(x, y, MENU_W, h)
    }

    pub fn draw<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let outer = self.region();
        outer
            .to_rect()
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(display)?;
        outer
            .to_rect()
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, BORDER as u32))
            .draw(display)?;

        let inner = outer.inset(BORDER + PAD);
        Label::new(inner.row(0, TITLE_H), self.title, &TITLE_FONT)
            .alignment(Alignment::Center)
            .draw(display)?;

        for (i, item) in self.items.iter().enumerate() {
            let r = inner.row(TITLE_H + i as u16 * ITEM_H, ITEM_H);
            Label::new(r, item.label(), &BODY_FONT)
                .alignment(Alignment::Center)
                .inverted(i == self.cursor.index())
                .draw(display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Opt {
        A,
        B,
        C,
    }

    impl MenuItem for Opt {
        fn label(self) -> &'static str {
            match self {
                Opt::A => "A",
                Opt::B => "B",
                Opt::C => "C",
            }
        }
    }

    #[test]
    fn up_reports_top_and_down_cycles() {
        let mut m = ContextMenu::new("Menu", &[Opt::A, Opt::B, Opt::C]);
        assert!(!m.up());
        m.down();
        m.down();
        assert_eq!(m.selected(), Some(Opt::C));
        m.down();
        assert_eq!(m.selected(), Some(Opt::A));
        m.down();
        assert!(m.up());
        assert_eq!(m.selected(), Some(Opt::A));
    }
}
