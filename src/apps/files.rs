// File browser
//
// Directory listing starting at the root, directories first. SELECT
// enters a directory; on a file, or in an empty directory, it opens a
// context menu instead. Double-click SELECT on a directory opens its
// folder menu. UP at the top of a listing climbs to the parent and
// leaves the screen from the root.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use heapless::Vec as FixedVec;
use log::{info, warn};

use crate::apps::{App, AppContext, ListCursor, ListUp, Screen, SubMode, Transition, list_up};
use crate::board::button::Gesture;
use crate::board::{Board, Services};
use crate::book::DocFormat;
use crate::drivers::storage::{self, ContentSource, DirEntry, StorageError};
use crate::ui::{
    BODY_FONT, ButtonHints, CONTENT_REGION, ContextMenu, Label, MenuItem, Region, SMALL_FONT,
    StackFmt, TITLE_FONT, draw_list,
};

const ROOT: &str = "/";
// selection remembered per parent level
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilesMode {
    List,
    ContextMenu,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOption {
    OpenFolder,
    DeleteFolder,
    Open,
    DeleteFile,
    Refresh,
    GoToRoot,
    BackToMainMenu,
    Cancel,
}

impl MenuItem for FileOption {
    fn label(self) -> &'static str {
        match self {
            FileOption::OpenFolder => "Open Folder",
            FileOption::DeleteFolder => "Delete Folder",
            FileOption::Open => "Open",
            FileOption::DeleteFile => "Delete File",
            FileOption::Refresh => "Refresh",
            FileOption::GoToRoot => "Go to Root",
            FileOption::BackToMainMenu => "Back to Main Menu",
            FileOption::Cancel => "Cancel",
        }
    }
}

pub struct FilesApp {
    mode: FilesMode,
    path: String,
    entries: Vec<DirEntry>,
    cursor: ListCursor,
    parents: FixedVec<usize, MAX_DEPTH>,
    menu: ContextMenu<FileOption>,
    error: Option<StorageError>,
}

impl Default for FilesApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FilesApp {
    pub fn new() -> Self {
        Self {
            mode: FilesMode::List,
            path: String::from(ROOT),
            entries: Vec::new(),
            cursor: ListCursor::new(0),
            parents: FixedVec::new(),
            menu: ContextMenu::default(),
            error: None,
        }
    }

    pub fn mode(&self) -> FilesMode {
        self.mode
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    pub fn menu_items(&self) -> &[FileOption] {
        self.menu.items()
    }

    fn at_root(&self) -> bool {
        self.path == ROOT
    }

    fn selected_entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.cursor.index())
    }

    fn load<B: Board>(&mut self, svc: &mut Services<'_, B>, select: usize) {
        match svc.storage.list_dir(&self.path) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
                self.mode = FilesMode::List;
            }
            Err(e) => {
                warn!("files: cannot list {}: {}", self.path, e);
                self.entries.clear();
                self.error = Some(e);
                self.mode = FilesMode::Error;
            }
        }
        self.cursor.set_len(self.entries.len());
        self.cursor.select(0);
        self.cursor.select(select);
    }

    fn enter_dir<B: Board>(&mut self, name: &str, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let child = storage::join(&self.path, name);
        if self.parents.push(self.cursor.index()).is_err() {
            warn!("files: depth limit at {}", child);
            return;
        }
        self.path = child;
        self.load(svc, 0);
        ctx.request_fast();
    }

    fn leave_dir<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.path = String::from(storage::parent(&self.path));
        let select = self.parents.pop().unwrap_or(0);
        self.load(svc, select);
        ctx.request_fast();
    }

    fn go_root<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.path = String::from(ROOT);
        self.parents.clear();
        self.load(svc, 0);
        ctx.request_fast();
    }

    fn open_menu(&mut self, folder: bool) {
        self.menu = match self.selected_entry() {
            None => ContextMenu::new(
                "Files Menu",
                &[
                    FileOption::Refresh,
                    FileOption::GoToRoot,
                    FileOption::BackToMainMenu,
                    FileOption::Cancel,
                ],
            ),
            Some(_) if folder => ContextMenu::new(
                "Folder Options",
                &[
                    FileOption::OpenFolder,
                    FileOption::DeleteFolder,
                    FileOption::Cancel,
                ],
            ),
            Some(e) if DocFormat::from_path(&e.name).is_readable() => ContextMenu::new(
                "File Options",
                &[FileOption::Open, FileOption::DeleteFile, FileOption::Cancel],
            ),
            Some(_) => ContextMenu::new(
                "File Options",
                &[FileOption::DeleteFile, FileOption::Cancel],
            ),
        };
        self.mode = FilesMode::ContextMenu;
    }

    fn delete_selected<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let target = storage::join(&self.path, &entry.name);
        let index = self.cursor.index();
        match svc.storage.remove(&target) {
            Ok(()) => info!("files: deleted {}", target),
            Err(e) => {
                warn!("files: delete {} failed: {}", target, e);
                ctx.show_notice("Delete failed");
            }
        }
        self.load(svc, index);
    }

    fn activate<B: Board>(
        &mut self,
        option: FileOption,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        self.mode = FilesMode::List;
        ctx.request_partial();
        match option {
            FileOption::OpenFolder => {
                if let Some(name) = self.selected_entry().map(|e| e.name.clone()) {
                    self.enter_dir(&name, ctx, svc);
                }
            }
            FileOption::DeleteFolder | FileOption::DeleteFile => self.delete_selected(ctx, svc),
            FileOption::Open => {
                if let Some(entry) = self.selected_entry() {
                    let target = storage::join(&self.path, &entry.name);
                    ctx.set_message(&target);
                    return Transition::Push(Screen::Library);
                }
            }
            FileOption::Refresh => {
                let index = self.cursor.index();
                self.load(svc, index);
            }
            FileOption::GoToRoot => self.go_root(ctx, svc),
            FileOption::BackToMainMenu => return Transition::Home,
            FileOption::Cancel => {}
        }
        Transition::None
    }

    fn draw_listing<D>(&self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let area = CONTENT_REGION.inset(4);
        Label::new(area.row(0, 24), "Files", &TITLE_FONT).draw(display)?;
        Label::new(area.row(24, 14), &self.path, &SMALL_FONT).draw(display)?;
        let rows = Region::new(area.x, area.y + 42, area.w, area.h - 42);

        if self.entries.is_empty() {
            return Label::new(rows.row(0, 20), "Empty folder", &BODY_FONT).draw(display);
        }
        draw_list(display, rows, &self.cursor, &BODY_FONT, |i, buf| {
            if let Some(e) = self.entries.get(i) {
                if e.is_dir {
                    let _ = write!(buf, "{}/", e.name);
                } else {
                    let _ = write!(buf, "{}  {}", e.name, KiB(e.size));
                }
            }
        })
    }
}

// file size for listings
struct KiB(u32);

impl core::fmt::Display for KiB {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.0 < 1024 {
            write!(f, "{}B", self.0)
        } else {
            write!(f, "{}K", self.0.div_ceil(1024))
        }
    }
}

impl App for FilesApp {
    fn on_enter<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        self.path = String::from(ROOT);
        self.parents.clear();
        self.load(svc, 0);
        ctx.request_fast();
    }

    fn on_resume<B: Board>(&mut self, ctx: &mut AppContext, svc: &mut Services<'_, B>) {
        let index = self.cursor.index();
        self.load(svc, index);
        ctx.request_fast();
    }

    fn handle_up<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        match self.mode {
            FilesMode::List => match list_up(&mut self.cursor, gesture) {
                ListUp::Moved => ctx.request_partial(),
                ListUp::Back if self.at_root() => return Transition::Pop,
                ListUp::Back => self.leave_dir(ctx, svc),
            },
            FilesMode::ContextMenu => {
                if !self.menu.up() {
                    self.mode = FilesMode::List;
                }
                ctx.request_partial();
            }
            FilesMode::Error => return Transition::Pop,
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
            FilesMode::List => self.cursor.down(gesture),
            FilesMode::ContextMenu => self.menu.down(),
            FilesMode::Error => false,
        };
        if moved {
            ctx.request_partial();
        }
        Transition::None
    }

    fn handle_select<B: Board>(
        &mut self,
        gesture: Gesture,
        ctx: &mut AppContext,
        svc: &mut Services<'_, B>,
    ) -> Transition {
        match self.mode {
            FilesMode::List => match self.selected_entry() {
                Some(e) if e.is_dir && gesture != Gesture::DoubleClick => {
                    let name = e.name.clone();
                    self.enter_dir(&name, ctx, svc);
                }
                Some(e) => {
                    let folder = e.is_dir;
                    self.open_menu(folder);
                    ctx.request_partial();
                }
                None => {
                    self.open_menu(false);
                    ctx.request_partial();
                }
            },
            FilesMode::ContextMenu => {
                if let Some(option) = self.menu.selected() {
                    return self.activate(option, ctx, svc);
                }
            }
            FilesMode::Error => {}
        }
        Transition::None
    }

    fn sub_mode(&self) -> SubMode {
        SubMode::Files(self.mode)
    }

    fn hints(&self) -> ButtonHints {
        match self.mode {
            FilesMode::List if self.cursor.at_top() && self.at_root() => {
                ButtonHints::new("Back", "Select", "Down")
            }
            FilesMode::List if self.cursor.at_top() => ButtonHints::new("Parent", "Select", "Down"),
            FilesMode::List => ButtonHints::new("Up", "Select", "Down"),
            FilesMode::ContextMenu => ButtonHints::new("Up", "Select", "Down"),
            FilesMode::Error => ButtonHints::new("Back", "", ""),
        }
    }

    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        match self.mode {
            FilesMode::List => self.draw_listing(display),
            FilesMode::ContextMenu => {
                self.draw_listing(display)?;
                self.menu.draw(display)
            }
            FilesMode::Error => {
                let area = CONTENT_REGION.inset(8);
                Label::new(area.row(0, 24), "Files", &TITLE_FONT).draw(display)?;
                let mut msg = StackFmt::<48>::new();
                let _ = write!(msg, "{}", self.error.unwrap_or(StorageError::NotReady));
                Label::new(area.row(32, 20), msg.as_str(), &BODY_FONT).draw(display)?;
                Label::new(area.row(52, 20), "Press Back to return", &BODY_FONT).draw(display)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::sim::SimBoard;
    use crate::drivers::storage::ContentSource;

    fn board() -> SimBoard {
        let mut b = SimBoard::new();
        b.storage.add_file("/books/a.txt", b"hello");
        b.storage.add_file("/books/b.bin", &[0; 4]);
        b.storage.add_file("/readme.txt", b"top");
        b.storage.add_dir("/empty");
        b
    }

    fn enter(app: &mut FilesApp, b: &mut SimBoard, ctx: &mut AppContext) {
        let mut svc = b.services();
        app.on_enter(ctx, &mut svc);
    }

    #[test]
    fn walks_into_and_out_of_directories() {
        let mut b = board();
        let mut ctx = AppContext::new();
        let mut app = FilesApp::new();
        enter(&mut app, &mut b, &mut ctx);
        let mut svc = b.services();

        let names: Vec<&str> = app.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["books", "empty", "readme.txt"]);

        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.path(), "/books");
        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_up(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.path(), "/books");

        assert_eq!(app.handle_up(Gesture::Click, &mut ctx, &mut svc), Transition::None);
        assert_eq!(app.path(), "/");
        assert_eq!(app.selected(), 0);
        assert_eq!(app.handle_up(Gesture::Click, &mut ctx, &mut svc), Transition::Pop);
    }

    #[test]
    fn file_menu_offers_open_for_readable_files() {
        let mut b = board();
        let mut ctx = AppContext::new();
        let mut app = FilesApp::new();
        enter(&mut app, &mut b, &mut ctx);
        let mut svc = b.services();
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);

        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.mode(), FilesMode::ContextMenu);
        assert_eq!(app.menu_items(), [FileOption::DeleteFile, FileOption::Cancel]);
        app.handle_up(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.mode(), FilesMode::List);

        app.handle_up(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.menu_items()[0], FileOption::Open);
        let t = app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(t, Transition::Push(Screen::Library));
        assert_eq!(ctx.message(), "/books/a.txt");
    }

    #[test]
    fn empty_folder_menu_and_go_to_root() {
        let mut b = board();
        let mut ctx = AppContext::new();
        let mut app = FilesApp::new();
        enter(&mut app, &mut b, &mut ctx);
        let mut svc = b.services();

        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.path(), "/empty");
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(
            app.menu_items(),
            [
                FileOption::Refresh,
                FileOption::GoToRoot,
                FileOption::BackToMainMenu,
                FileOption::Cancel
            ]
        );
        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        assert_eq!(app.path(), "/");
        assert_eq!(app.mode(), FilesMode::List);
    }

    #[test]
    fn folder_menu_deletes_recursively() {
        let mut b = board();
        let mut ctx = AppContext::new();
        let mut app = FilesApp::new();
        enter(&mut app, &mut b, &mut ctx);
        let mut svc = b.services();

        app.handle_select(Gesture::DoubleClick, &mut ctx, &mut svc);
        assert_eq!(
            app.menu_items(),
            [FileOption::OpenFolder, FileOption::DeleteFolder, FileOption::Cancel]
        );
        app.handle_down(Gesture::Click, &mut ctx, &mut svc);
        app.handle_select(Gesture::Click, &mut ctx, &mut svc);
        let names: Vec<&str> = app.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["empty", "readme.txt"]);
        drop(svc);
        assert!(!b.storage.exists("/books/a.txt").unwrap());
    }

    #[test]
    fn storage_error_accepts_only_back() {
        let mut b = board();
        b.storage.set_ready(false);
        let mut ctx = AppContext::new();
        let mut app = FilesApp::new();
        enter(&mut app, &mut b, &mut ctx);
        let mut svc = b.services();
        assert_eq!(app.mode(), FilesMode::Error);
        assert_eq!(app.handle_select(Gesture::Click, &mut ctx, &mut svc), Transition::None);
        assert_eq!(app.mode(), FilesMode::Error);
        assert_eq!(app.handle_up(Gesture::Click, &mut ctx, &mut svc), Transition::Pop);
    }
}
