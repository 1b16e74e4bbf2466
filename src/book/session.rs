// The single open book: content buffer, page list and cursor.
//
// Opening reads the document in small chunks so the suspension hook
// runs regularly, checks heap headroom before allocating, and
// paginates the decoded text up front. Only one document is resident;
// opening another closes the first.

use alloc::string::String;
use alloc::vec::Vec;

use heapless::Vec as FixedVec;
use log::{info, warn};

use super::paginate::{Page, paginate};
use super::{
    CONTENT_CAP, DocFormat, Document, FontTier, LoadError, Notice, PageCursor, TextSettings,
    Viewport,
};
use crate::drivers::storage::{self, ContentSource};
use crate::drivers::system::System;
use crate::formats::markup;

/// Heap that must stay free beyond the book's own buffers.
pub const MEMORY_FLOOR: usize = 30_000;
/// Raw bytes, decoded text and stripped text can coexist during open.
/// Applied to the size capped at CONTENT_CAP, which bounds those buffers.
const BUFFER_FACTOR: usize = 3;

pub const CHUNK_SIZE: usize = 128;
/// Bytes read between suspension points.
pub const SUSPEND_EVERY: usize = 512;

struct OpenBook {
    document: Document,
    content: String,
    pages: Vec<Page>,
    cursor: PageCursor,
    notices: FixedVec<Notice, 2>,
}

pub struct BookSession {
    book: Option<OpenBook>,
    settings: TextSettings,
    viewport: Viewport,
}

impl BookSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            book: None,
            settings: TextSettings::default(),
            viewport,
        }
    }

    pub fn open<S, Y>(
        &mut self,
        path: &str,
        source: &mut S,
        system: &mut Y,
    ) -> Result<Document, LoadError>
    where
        S: ContentSource,
        Y: System,
    {
        self.close();

        if !source.exists(path)? {
            return Err(LoadError::NotFound);
        }
        let format = DocFormat::from_path(path);
        if !format.is_readable() {
            return Err(LoadError::UnsupportedFormat);
        }

        let size = source.size(path)?;
        let budget = (size as usize).min(CONTENT_CAP);
        let needed = MEMORY_FLOOR + BUFFER_FACTOR * budget;
        let available = system.free_heap();
        if available < needed {
            warn!(
                "book: {} needs {} bytes of heap, {} free",
                path, needed, available
            );
            return Err(LoadError::InsufficientMemory { needed, available });
        }

        let raw = read_capped(path, budget, source, system)?;
        let mut notices = FixedVec::new();
        if size as usize > CONTENT_CAP {
            warn!("book: {} truncated to {} bytes", path, CONTENT_CAP);
            let _ = notices.push(Notice::ContentTruncated);
        }

        let text = decode_text(raw);
        let content = match format {
            DocFormat::MarkupLite => markup::strip_markup(&text),
            _ => text,
        };
        if content.trim().is_empty() {
            return Err(LoadError::Empty);
        }

        let result = paginate(&content, &self.settings, self.viewport, || system.suspend());
        if result.ceiling_reached {
            warn!("book: {} stopped at {} pages", path, result.pages.len());
            let _ = notices.push(Notice::PageCountCeilingReached);
        }

        let document = Document {
            id: String::from(path),
            title: String::from(storage::file_stem(path)),
            byte_length: size,
            format,
        };
        info!(
            "book: opened {} ({} bytes, {} pages, {:?})",
            document.title,
            size,
            result.pages.len(),
            self.settings.font_tier
        );

        self.book = Some(OpenBook {
            document: document.clone(),
            cursor: PageCursor::new(result.pages.len()),
            pages: result.pages,
            content,
            notices,
        });
        Ok(document)
    }

    pub fn close(&mut self) {
        if let Some(book) = self.book.take() {
            info!("book: closed {}", book.document.title);
        }
    }

    pub fn is_open(&self) -> bool {
        self.book.is_some()
    }

    pub fn document(&self) -> Option<&Document> {
        self.book.as_ref().map(|b| &b.document)
    }

    pub fn settings(&self) -> &TextSettings {
        &self.settings
    }

    pub fn font_tier(&self) -> FontTier {
        self.settings.font_tier
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn notices(&self) -> &[Notice] {
        self.book
            .as_ref()
            .map(|b| b.notices.as_slice())
            .unwrap_or_default()
    }

    pub fn pages(&self) -> &[Page] {
        self.book
            .as_ref()
            .map(|b| b.pages.as_slice())
            .unwrap_or_default()
    }

    pub fn content(&self) -> Option<&str> {
        self.book.as_ref().map(|b| b.content.as_str())
    }

    pub fn cursor(&self) -> Option<PageCursor> {
        self.book.as_ref().map(|b| b.cursor)
    }

    pub fn current_page_text(&self) -> Option<&str> {
        let book = self.book.as_ref()?;
        let page = book.pages.get(book.cursor.current())?;
        Some(page.text(&book.content))
    }

    pub fn next_page(&mut self) -> bool {
        self.book.as_mut().is_some_and(|b| b.cursor.next())
    }

    pub fn previous_page(&mut self) -> bool {
        self.book.as_mut().is_some_and(|b| b.cursor.previous())
    }

    pub fn goto_page(&mut self, index: usize) -> bool {
        self.book.as_mut().is_some_and(|b| b.cursor.goto(index))
    }

    /// Change the font tier, re-paginating an open book. The cursor
    /// lands on the page holding the text that was at the top of the
    /// screen. Returns false when the tier is unchanged.
    pub fn set_font_tier<Y: System>(&mut self, tier: FontTier, system: &mut Y) -> bool {
        if tier == self.settings.font_tier {
            return false;
        }
        self.settings = self.settings.with_tier(tier);

        let settings = self.settings;
        let viewport = self.viewport;
        if let Some(book) = self.book.as_mut() {
            let anchor = book
                .pages
                .get(book.cursor.current())
                .map_or(0, |p| p.start);

            let result = paginate(&book.content, &settings, viewport, || system.suspend());
            book.notices.retain(|n| *n != Notice::PageCountCeilingReached);
            if result.ceiling_reached {
                warn!("book: {} stopped at {} pages", book.document.title, result.pages.len());
                let _ = book.notices.push(Notice::PageCountCeilingReached);
            }

            let index = result
                .pages
                .partition_point(|p| p.start <= anchor)
                .saturating_sub(1);
            book.pages = result.pages;
            book.cursor = PageCursor::new(book.pages.len());
            book.cursor.goto(index);
            info!(
                "book: font {:?}, {} pages, at page {}",
                tier,
                book.pages.len(),
                index + 1
            );
        }
        true
    }

    pub fn increase_font<Y: System>(&mut self, system: &mut Y) -> bool {
        match self.settings.font_tier.larger() {
            Some(tier) => self.set_font_tier(tier, system),
            None => false,
        }
    }

    pub fn decrease_font<Y: System>(&mut self, system: &mut Y) -> bool {
        match self.settings.font_tier.smaller() {
            Some(tier) => self.set_font_tier(tier, system),
            None => false,
        }
    }
}

fn read_capped<S, Y>(
    path: &str,
    budget: usize,
    source: &mut S,
    system: &mut Y,
) -> Result<Vec<u8>, LoadError>
where
    S: ContentSource,
    Y: System,
{
    let mut raw = Vec::new();
    raw.try_reserve_exact(budget)
        .map_err(|_| LoadError::InsufficientMemory {
            needed: budget,
            available: system.free_heap(),
        })?;

    let mut chunk = [0u8; CHUNK_SIZE];
    let mut since_suspend = 0;
    while raw.len() < budget {
        let want = (budget - raw.len()).min(CHUNK_SIZE);
        let n = source.read_chunk(path, raw.len() as u32, &mut chunk[..want])?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);
        since_suspend += n;
        if since_suspend >= SUSPEND_EVERY {
            system.suspend();
            since_suspend = 0;
        }
    }
    Ok(raw)
}

// lossy UTF-8; a sequence cut short at the end is dropped
fn decode_text(mut raw: Vec<u8>) -> String {
    if let Err(e) = core::str::from_utf8(&raw)
        && e.error_len().is_none()
    {
        raw.truncate(e.valid_up_to());
    }
    match String::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::sim::{MemStorage, SimSystem};

    const VIEW: Viewport = Viewport {
        width: 240,
        height: 720,
    };

    fn prose(chars: usize) -> String {
        "The quick brown fox jumps over the lazy dog. "
            .chars()
            .cycle()
            .take(chars)
            .collect()
    }

    fn fixture() -> (MemStorage, SimSystem) {
        let mut storage = MemStorage::new();
        storage.add_file("/books/fox.txt", prose(3000).as_bytes());
        storage.add_file("/books/page.html", b"<p>Hello <b>there</b></p>");
        storage.add_file("/books/blank.txt", b"   \n ");
        storage.add_file("/books/image.png", b"\x89PNG");
        (storage, SimSystem::new(1_000_000))
    }

    #[test]
    fn open_paginates_and_resets_cursor() {
        let (mut storage, mut system) = fixture();
        let mut session = BookSession::new(VIEW);
        let doc = session.open("/books/fox.txt", &mut storage, &mut system).unwrap();
        assert_eq!(doc.title, "fox");
        assert_eq!(doc.format, DocFormat::PlainText);
        assert_eq!(session.pages().len(), 5);
        assert_eq!(session.cursor(), Some(PageCursor::new(5)));
        assert!(session.notices().is_empty());
        // 3000 bytes at one suspension per 512 plus none from 5 pages
        assert_eq!(system.suspend_count(), 5);
    }

    #[test]
    fn markup_is_stripped_before_paging() {
        let (mut storage, mut system) = fixture();
        let mut session = BookSession::new(VIEW);
        session.open("/books/page.html", &mut storage, &mut system).unwrap();
        assert_eq!(session.current_page_text(), Some("Hello there"));
    }

    #[test]
    fn low_memory_leaves_session_closed() {
        let (mut storage, _) = fixture();
        let mut system = SimSystem::new(MEMORY_FLOOR + 2 * 3000);
        let mut session = BookSession::new(VIEW);
        let err = session.open("/books/fox.txt", &mut storage, &mut system).unwrap_err();
        assert_eq!(
            err,
            LoadError::InsufficientMemory {
                needed: MEMORY_FLOOR + 9000,
                available: MEMORY_FLOOR + 6000,
            }
        );
        assert!(!session.is_open());
        assert_eq!(storage.reads(), 0);
    }

    #[test]
    fn open_errors() {
        let (mut storage, mut system) = fixture();
        let mut session = BookSession::new(VIEW);
        assert_eq!(
            session.open("/books/missing.txt", &mut storage, &mut system),
            Err(LoadError::NotFound)
        );
        assert_eq!(
            session.open("/books/image.png", &mut storage, &mut system),
            Err(LoadError::UnsupportedFormat)
        );
        assert_eq!(
            session.open("/books/blank.txt", &mut storage, &mut system),
            Err(LoadError::Empty)
        );
        storage.set_ready(false);
        assert_eq!(
            session.open("/books/fox.txt", &mut storage, &mut system),
            Err(LoadError::NotReady)
        );
    }

    #[test]
    fn oversized_file_is_truncated() {
        let mut storage = MemStorage::new();
        let mut body = prose(CONTENT_CAP - 1);
        body.push('\u{e9}');
        body.push_str(&prose(1000));
        storage.add_file("/books/big.txt", body.as_bytes());
        // enough for the capped buffers, not for the whole file
        let mut system = SimSystem::new(MEMORY_FLOOR + BUFFER_FACTOR * CONTENT_CAP);
        let mut session = BookSession::new(VIEW);

        session.open("/books/big.txt", &mut storage, &mut system).unwrap();
        assert_eq!(session.notices(), [Notice::ContentTruncated]);
        // the two-byte char straddling the cap is dropped
        assert_eq!(session.content().map(str::len), Some(CONTENT_CAP - 1));
    }

    #[test]
    fn opening_again_replaces_the_book() {
        let (mut storage, mut system) = fixture();
        let mut session = BookSession::new(VIEW);
        session.open("/books/fox.txt", &mut storage, &mut system).unwrap();
        session.next_page();
        session.open("/books/page.html", &mut storage, &mut system).unwrap();
        assert_eq!(session.document().map(|d| d.title.as_str()), Some("page"));
        assert_eq!(session.cursor().map(|c| c.current()), Some(0));
    }

    #[test]
    fn font_change_keeps_reading_position() {
        let mut storage = MemStorage::new();
        storage.add_file("/books/long.txt", prose(20_000).as_bytes());
        let mut system = SimSystem::new(1_000_000);
        let mut session = BookSession::new(VIEW);
        session.open("/books/long.txt", &mut storage, &mut system).unwrap();

        session.goto_page(10);
        let anchor = session.pages()[10].start;
        assert!(session.increase_font(&mut system));
        assert_eq!(session.font_tier(), FontTier::Large);

        let cursor = session.cursor().unwrap();
        let page = session.pages()[cursor.current()];
        let next_start = session
            .pages()
            .get(cursor.current() + 1)
            .map_or(usize::MAX, |p| p.start);
        assert!(page.start <= anchor && anchor < next_start);
    }

    #[test]
    fn font_tier_without_book_only_changes_settings() {
        let mut system = SimSystem::new(0);
        let mut session = BookSession::new(VIEW);
        assert!(session.decrease_font(&mut system));
        assert!(!session.decrease_font(&mut system));
        assert_eq!(session.settings().line_height, 14);
    }

    #[test]
    fn page_turns_stay_in_bounds() {
        let (mut storage, mut system) = fixture();
        let mut session = BookSession::new(VIEW);
        assert!(!session.next_page());
        session.open("/books/fox.txt", &mut storage, &mut system).unwrap();
        assert!(!session.previous_page());
        for _ in 0..4 {
            assert!(session.next_page());
        }
        assert!(!session.next_page());
        assert_eq!(session.cursor().unwrap().current(), 4);
    }
}
