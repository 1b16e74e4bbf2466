// Main menu, the root of the navigation stack
//
// A fixed column of buttons, one per feature screen. UP and DOWN move
// a cyclic cursor; SELECT pushes the highlighted screen.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;

use crate::apps::{App, AppContext, ListCursor, Screen, SubMode, Transition};
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::ui::{Alignment, ButtonHints, CONTENT_TOP, Label, Region, SCREEN_W, TITLE_FONT};

pub const MENU_ITEMS: [Screen; 5] = [
    Screen::Library,
    Screen::Files,
    Screen::Network,
    Screen::Clock,
    Screen::Settings,
];

const ITEM_W: u16 = 180;
const ITEM_H: u16 = 40;
const ITEM_GAP: u16 = 12;
const ITEM_STRIDE: u16 = ITEM_H + ITEM_GAP;
const ITEM_X: u16 = (SCREEN_W - ITEM_W) / 2;
const ITEMS_TOP: u16 = CONTENT_TOP + 40;

fn item_region(i: usize) -> Region {
    Region::new(ITEM_X, ITEMS_TOP + i as u16 * ITEM_STRIDE, ITEM_W, ITEM_H)
}

pub struct HomeApp {
    cursor: ListCursor,
}

impl Default for HomeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeApp {
    pub const fn new() -> Self {
        Self {
            cursor: ListCursor::new(MENU_ITEMS.len()),
        }
    }

    pub fn selected(&self) -> Screen {
        MENU_ITEMS[self.cursor.index()]
    }

    /// Highlight a menu entry directly.
    pub fn select(&mut self, screen: Screen) {
        if let Some(i) = MENU_ITEMS.iter().position(|&s| s == screen) {
            self.cursor.select(i);
        }
    }
}

impl App for HomeApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, _svc: &mut Services<'_, B>) {
        ctx.request_fast();
    }

    // double-click is a single step here; the menu is short
    fn handle_up<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        if self.cursor.prev() {
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_down<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        if self.cursor.next() {
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_select<B: Board>(
        &mut self,
        _gesture: Gesture,
        _ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        Transition::Push(self.selected())
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::MainMenu
    }

    fn hints(&self) -> ButtonHints {
        ButtonHints::new("Up", "Open", "Down")
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        let title = Region::new(0, CONTENT_TOP + 8, SCREEN_W, 24);
        Label::new(title, "inkpage", &TITLE_FONT)
            .alignment(Alignment::Center)
            .draw(display)?;

        for (i, screen) in MENU_ITEMS.iter().enumerate() {
            let r = item_region(i);
            let selected = i == self.cursor.index();
            Label::new(r, screen.name(), &TITLE_FONT)
                .alignment(Alignment::Center)
                .inverted(selected)
                .draw(display)?;
            if !selected {
                r.to_rect()
                    .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                    .draw(display)?;
            }
        }
        Ok(())
    }
}
