// Region geometry, alignment, and wrap-around index helpers.

use embedded_graphics::{prelude::*, primitives::Rectangle};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl Region {
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    pub fn to_rect(self) -> Rectangle {
        Rectangle::new(self.top_left(), Size::new(self.w as u32, self.h as u32))
    }

    pub fn top_left(self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    pub const fn bottom(self) -> u16 {
        self.y + self.h
    }

    /// Shrink by `px` on every side.
    pub const fn inset(self, px: u16) -> Self {
        let w = self.w.saturating_sub(px * 2);
        let h = self.h.saturating_sub(px * 2);
        Self::new(self.x + px, self.y + px, w, h)
    }

    /// Shrink horizontally by `px` on each side.
    pub const fn inset_x(self, px: u16) -> Self {
        Self::new(self.x + px, self.y, self.w.saturating_sub(px * 2), self.h)
    }

    /// Horizontal band `h` tall starting `dy` below the top.
    pub const fn row(self, dy: u16, h: u16) -> Self {
        Self::new(self.x, self.y + dy, self.w, h)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Alignment {
    #[default]
    CenterLeft,
    Center,
    CenterRight,
}

impl Alignment {
    /// Top-left corner for content of `size` inside `region`.
    pub fn position(self, region: Region, size: Size) -> Point {
        let cw = size.width as i32;
        let ch = size.height as i32;
        let rx = region.x as i32;
        let ry = region.y as i32;
        let rw = region.w as i32;
        let rh = region.h as i32;
        let y = ry + (rh - ch) / 2;

        match self {
            Alignment::CenterLeft => Point::new(rx, y),
            Alignment::Center => Point::new(rx + (rw - cw) / 2, y),
            Alignment::CenterRight => Point::new(rx + rw - cw, y),
        }
    }
}

// advance index by one, wrapping past count-1 back to 0
#[inline]
pub fn wrap_next(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    if current + 1 >= count { 0 } else { current + 1 }
}

// retreat index by one, wrapping past 0 to count-1
#[inline]
pub fn wrap_prev(current: usize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    if current == 0 { count - 1 } else { current - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_helpers() {
        assert_eq!(wrap_next(4, 5), 0);
        assert_eq!(wrap_prev(0, 5), 4);
        assert_eq!(wrap_next(0, 0), 0);
        assert_eq!(wrap_prev(0, 1), 0);
    }

    #[test]
    fn alignment_positions() {
        let r = Region::new(10, 20, 100, 20);
        let s = Size::new(40, 10);
        assert_eq!(Alignment::CenterLeft.position(r, s), Point::new(10, 25));
        assert_eq!(Alignment::Center.position(r, s), Point::new(40, 25));
        assert_eq!(Alignment::CenterRight.position(r, s), Point::new(70, 25));
    }
}
