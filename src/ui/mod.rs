// Widget toolkit for the 1-bit panel: labels, lists, the context menu
// overlay, wrapped text, and the status and hint bars.

pub mod hints;
pub mod label;
pub mod list;
pub mod menu;
pub mod stack_fmt;
pub mod statusbar;
pub mod text;
mod widget;

use embedded_graphics::mono_font::{MonoFont, ascii, iso_8859_1};

pub use hints::ButtonHints;
pub use label::Label;
pub use list::{ROW_H, draw_list, visible_rows};
pub use menu::{ContextMenu, MenuItem};
pub use stack_fmt::StackFmt;
pub use statusbar::{StatusBar, SystemStatus};
pub use text::{draw_wrapped, wrap_lines};
pub use widget::{Alignment, Region, wrap_next, wrap_prev};

use crate::book::{FontTier, Viewport};
pub use crate::board::{SCREEN_H, SCREEN_W};

pub const BAR_HEIGHT: u16 = 20;
pub const CONTENT_TOP: u16 = BAR_HEIGHT;
pub const HINT_H: u16 = 18;
pub const HINT_TOP: u16 = SCREEN_H - HINT_H;

pub const BAR_REGION: Region = Region::new(0, 0, SCREEN_W, BAR_HEIGHT);
pub const CONTENT_REGION: Region = Region::new(0, CONTENT_TOP, SCREEN_W, HINT_TOP - CONTENT_TOP);
pub const HINT_REGION: Region = Region::new(0, HINT_TOP, SCREEN_W, HINT_H);

pub const TITLE_FONT: MonoFont<'static> = ascii::FONT_8X13_BOLD;
pub const BODY_FONT: MonoFont<'static> = ascii::FONT_6X13;
pub const SMALL_FONT: MonoFont<'static> = ascii::FONT_6X10;

/// Book header line (title and page position) above the page text.
pub const READER_HEADER_H: u16 = 18;

/// Text area the paginator fills: content region minus the header.
pub const READER_VIEWPORT: Viewport = Viewport {
    width: SCREEN_W,
    height: HINT_TOP - CONTENT_TOP - READER_HEADER_H,
};

/// Glyphs for a reading tier; advance matches `FontTier::char_width`.
pub fn reader_font(tier: FontTier) -> &'static MonoFont<'static> {
    match tier {
        FontTier::Small => &iso_8859_1::FONT_6X13,
        FontTier::Medium => &iso_8859_1::FONT_8X13,
        FontTier::Large => &iso_8859_1::FONT_10X20,
    }
}
