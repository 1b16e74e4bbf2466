// Library: book list, the reader, and the reading menu
//
// The list shows readable files under /books. Opening a book hands it
// to the BookSession, which owns the only resident content buffer;
// leaving the screen closes it. Files can push this screen with a
// path in the context message to open a book straight into Reading.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::{info, warn};

use crate::apps::{App, AppContext, ListCursor, ListUp, SubMode, Transition, list_up};
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::book::{BookSession, DocFormat, FontTier, LoadError};
use crate::drivers::storage::{self, ContentSource, StorageError};
use crate::drivers::system::System;
use crate::ui::{
    Alignment, BODY_FONT, ButtonHints, CONTENT_REGION, CONTENT_TOP, ContextMenu, Label,
    MenuItem, READER_HEADER_H, READER_VIEWPORT, Region, SCREEN_W, SMALL_FONT, StackFmt,
    TITLE_FONT, draw_list, draw_wrapped, reader_font,
};

pub const BOOKS_DIR: &str = "/books";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryMode {
    List,
    Reading,
    ContextMenu,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOption {
    IncreaseFont,
    DecreaseFont,
    ReturnToReading,
    CloseBook,
}

impl MenuItem for ReadingOption {
    fn label(self) -> &'static str {
        match self {
            ReadingOption::IncreaseFont => "Increase Font",
            ReadingOption::DecreaseFont => "Decrease Font",
            ReadingOption::ReturnToReading => "Return to Reading",
            ReadingOption::CloseBook => "Close Book",
        }
    }
}

const READING_MENU: [ReadingOption; 4] = [
    ReadingOption::IncreaseFont,
    ReadingOption::DecreaseFont,
    ReadingOption::ReturnToReading,
    ReadingOption::CloseBook,
];

pub struct LibraryApp {
    mode: LibraryMode,
    books: Vec<String>,
    cursor: ListCursor,
    session: BookSession,
    menu: ContextMenu<ReadingOption>,
    error: Option<StorageError>,
}

impl Default for LibraryApp {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryApp {
    pub fn new() -> Self {
        Self {
            mode: LibraryMode::List,
            books: Vec::new(),
            cursor: ListCursor::new(0),
            session: BookSession::new(READER_VIEWPORT),
            menu: ContextMenu::default(),
            error: None,
        }
    }

    pub fn mode(&self) -> LibraryMode {
        self.mode
    }

    pub fn session(&self) -> &BookSession {
        &self.session
    }

    pub fn books(&self) -> &[String] {
        &self.books
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    /// Font tier used for the next open, and applied to an open book.
    pub fn set_font_tier<Y: System>(&mut self, tier: FontTier, system: &mut Y) {
        self.session.set_font_tier(tier, system);
    }

    fn refresh_list<B: Board>(&mut self, svc: &mut Services<'_, B>) {
        self.error = None;
        self.books = match svc.storage.list_dir(BOOKS_DIR) {
            Ok(entries) => entries
                .into_iter()
                .filter(|e| !e.is_dir && DocFormat::from_path(&e.name).is_readable())
                .map(|e| e.name)
                .collect(),
            Err(StorageError::NotFound) => Vec::new(),
            Err(e) => {
                warn!("library: cannot list {}: {}", BOOKS_DIR, e);
                self.error = Some(e);
                self.mode = LibraryMode::Error;
                Vec::new()
            }
        };
        self.cursor.set_len(self.books.len());
    }

    fn open<B: Board>(&mut self, path: &str, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        match self.session.open(path, svc.storage, svc.system) {
            Ok(_) => {
                self.mode = LibraryMode::Reading;
                ctx.request_full();
            }
            Err(LoadError::NotReady) => {
                warn!("library: storage not ready opening {}", path);
                self.error = Some(StorageError::NotReady);
                self.mode = LibraryMode::Error;
                ctx.request_fast();
            }
            Err(e) => {
                warn!("library: cannot open {}: {}", path, e);
                self.mode = LibraryMode::List;
                ctx.show_notice(e.summary());
            }
        }
    }

    fn close_book(&mut self, ctx: &mut AppContext) {
        self.session.close();
        self.mode = LibraryMode::List;
        ctx.request_fast();
    }

    fn activate<B: Board>(
        &mut self,
        option: ReadingOption,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) {
        match option {
            ReadingOption::IncreaseFont | ReadingOption::DecreaseFont => {
                let changed = if option == ReadingOption::IncreaseFont {
                    self.session.increase_font(svc.system)
                } else {
                    self.session.decrease_font(svc.system)
                };
                self.mode = LibraryMode::Reading;
                if changed {
                    ctx.request_full();
                } else {
                    ctx.request_partial();
                }
            }
            ReadingOption::ReturnToReading => {
                self.mode = LibraryMode::Reading;
                ctx.request_partial();
            }
            ReadingOption::CloseBook => self.close_book(ctx),
        }
    }

    fn draw_reading<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let settings = self.session.settings();
        let margin = settings.margin;
        let header = Region::new(margin, CONTENT_TOP, SCREEN_W - margin * 2, READER_HEADER_H);

        let mut pos = StackFmt::<16>::new();
        if let Some(c) = self.session.cursor() {
            let _ = write!(pos, "{}/{}", c.current() + 1, c.total());
        }
        let title = self.session.document().map_or("", |d| d.title.as_str());
        let pos_w = pos.as_str().len() as u16 * 6 + 4;
        Label::new(
            Region::new(header.x, header.y, header.w - pos_w, header.h),
            title,
            &SMALL_FONT,
        )
        .draw(display)?;
        Label::new(
            Region::new(header.x + header.w - pos_w, header.y, pos_w, header.h),
            pos.as_str(),
            &SMALL_FONT,
        )
        .alignment(Alignment::CenterRight)
        .draw(display)?;

        let body = Region::new(
            margin,
            header.bottom(),
            READER_VIEWPORT.width - margin * 2,
            READER_VIEWPORT.height,
        );
        let text = self.session.current_page_text().unwrap_or("");
        draw_wrapped(
            display,
            text,
            body,
            reader_font(settings.font_tier),
            settings.line_height,
        )?;
        Ok(())
    }

    fn draw_list<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let area = CONTENT_REGION.inset(4);
        Label::new(area.row(0, 24), "Library", &TITLE_FONT).draw(display)?;
        let rows = Region::new(area.x, area.y + 28, area.w, area.h - 28);

        if self.books.is_empty() {
            Label::new(rows.row(0, 20), "No books in /books", &BODY_FONT).draw(display)?;
            return Ok(());
        }
        draw_list(display, rows, &self.cursor, &BODY_FONT, |i, buf| {
            if let Some(name) = self.books.get(i) {
                let _ = buf.write_str(storage::file_stem(name));
            }
        })
    }
}

impl App for LibraryApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.mode = LibraryMode::List;
        self.cursor.select(0);
        self.refresh_list(svc);

        let path = ctx.take_message();
        if !path.is_empty() && self.mode != LibraryMode::Error {
            info!("library: opening {} from files", path);
            if let Some(i) = self.books.iter().position(|b| storage::join(BOOKS_DIR, b) == path) {
                self.cursor.select(i);
            }
            self.open(&path, ctx, svc);
        }
        ctx.request_fast();
    }

    fn on_exit<B: Board>(&mut self, _svc: &mut Services<'_, B>) {
        self.session.close();
        self.mode = LibraryMode::List;
    }

    fn handle_up<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        match self.mode {
            LibraryMode::List => match list_up(&mut self.cursor, gesture) {
                ListUp::Back => return Transition::Pop,
                ListUp::Moved => ctx.request_partial(),
            },
            LibraryMode::Reading => {
                if self.session.previous_page() {
                    ctx.request_partial();
                }
            }
            LibraryMode::ContextMenu => {
                if !self.menu.up() {
                    self.mode = LibraryMode::Reading;
                }
                ctx.request_partial();
            }
            LibraryMode::Error => return Transition::Pop,
        }
        Transition::None
    }

    fn handle_down<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        _svc: &mut Services<'_, B>,
    ) -> Transition {
        let moved = match self.mode {
            LibraryMode::List => self.cursor.down(gesture),
            LibraryMode::Reading => self.session.next_page(),
            LibraryMode::ContextMenu => self.menu.down(),
            LibraryMode::Error => false,
        };
        if moved {
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_select<B: Board>(
        &mut self,
        _gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        match self.mode {
            LibraryMode::List => {
                if let Some(name) = self.books.get(self.cursor.index()) {
                    let path = storage::join(BOOKS_DIR, name);
                    self.open(&path, ctx, svc);
                }
            }
            LibraryMode::Reading => {
                self.menu = ContextMenu::new("Reading", &READING_MENU);
                self.mode = LibraryMode::ContextMenu;
                ctx.request_partial();
            }
            LibraryMode::ContextMenu => {
                if let Some(option) = self.menu.selected() {
                    self.activate(option, ctx, svc);
                }
            }
            LibraryMode::Error => {}
        }
        Transition::None
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::Library(self.mode)
    }

    fn hints(&self) -> ButtonHints {
        match self.mode {
            LibraryMode::List if self.cursor.at_top() => ButtonHints::new("Back", "Open", "Down"),
            LibraryMode::List => ButtonHints::new("Up", "Open", "Down"),
            LibraryMode::Reading => ButtonHints::new("Prev", "Menu", "Next"),
            LibraryMode::ContextMenu => ButtonHints::new("Up", "Select", "Down"),
            LibraryMode::Error => ButtonHints::new("Back", "", ""),
        }
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self.mode {
            LibraryMode::List => self.draw_list(display),
            LibraryMode::Reading => self.draw_reading(display),
            LibraryMode::ContextMenu => {
                self.draw_reading(display)?;
                self.menu.draw(display)
            }
            LibraryMode::Error => {
                let area = CONTENT_REGION.inset(8);
                Label::new(area.row(0, 24), "Library", &TITLE_FONT).draw(display)?;
                let mut msg = StackFmt::<48>::new();
                let _ = write!(msg, "{}", self.error.unwrap_or(StorageError::NotReady));
                Label::new(area.row(32, 20), msg.as_str(), &BODY_FONT).draw(display)?;
                Label::new(area.row(52, 20), "Press Back to return", &BODY_FONT).draw(display)
            }
        }
    }
}
