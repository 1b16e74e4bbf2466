// Reflow text into display-sized pages
//
// A page holds at most `chars_per_page` characters, which is the raw
// line/column capacity scaled by 3/5 to absorb word wrap. Each page is
// cut at the last whitespace or sentence end found within the final
// 30% of its budget, or hard-cut when none exists. A page that would
// still wrap to more than `lines_per_page` lines is cut after its last
// fitting line instead. Leading whitespace is skipped and trailing
// whitespace trimmed, so the gap between two pages is whitespace only.

use alloc::vec::Vec;

use super::{TextSettings, Viewport};
use crate::ui::wrap_lines;

/// Safety ceiling on pages per document.
pub const MAX_PAGES: usize = 500;

const SHRINK_NUM: usize = 3;
const SHRINK_DEN: usize = 5;
const BACKOFF_PERCENT: usize = 30;
// pages built between suspension points
const PAGES_PER_SUSPEND: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetrics {
    pub chars_per_line: usize,
    pub lines_per_page: usize,
    pub chars_per_page: usize,
}

impl PageMetrics {
    pub fn new(settings: &TextSettings, viewport: Viewport) -> Self {
        let usable_width = viewport.width.saturating_sub(settings.margin.saturating_mul(2));
        let char_width = settings.char_width().max(1);
        let line_height = settings.line_height.max(1);

        let chars_per_line = usize::from(usable_width / char_width).max(1);
        let lines_per_page = usize::from(viewport.height / line_height).max(1);
        let chars_per_page = (chars_per_line * lines_per_page * SHRINK_NUM / SHRINK_DEN).max(1);

        Self {
            chars_per_line,
            lines_per_page,
            chars_per_page,
        }
    }

    fn backoff(&self) -> usize {
        (self.chars_per_page * BACKOFF_PERCENT / 100).max(1)
    }
}

/// Byte range `[start, end)` of trimmed page text within the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: usize,
    pub end: usize,
}

impl Page {
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        content.get(self.start..self.end).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Resumable paginator, one page per `next()`.
pub struct PageBuilder<'a> {
    content: &'a str,
    metrics: PageMetrics,
    pos: usize,
    emitted: usize,
    ceiling_reached: bool,
}

impl<'a> PageBuilder<'a> {
    pub fn new(content: &'a str, metrics: PageMetrics) -> Self {
        Self {
            content,
            metrics,
            pos: 0,
            emitted: 0,
            ceiling_reached: false,
        }
    }

    pub fn metrics(&self) -> PageMetrics {
        self.metrics
    }

    /// Content remained when MAX_PAGES was hit.
    pub fn ceiling_reached(&self) -> bool {
        self.ceiling_reached
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.content[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    // byte offset after `n` chars from `from`, clamped to the end
    fn advance_chars(&self, from: usize, n: usize) -> usize {
        self.content[from..]
            .char_indices()
            .nth(n)
            .map_or(self.content.len(), |(i, _)| from + i)
    }

    fn find_break(&self, start: usize, limit: usize) -> usize {
        if self.content[limit..].starts_with(char::is_whitespace) {
            return limit;
        }
        let window = self.content[start..limit]
            .char_indices()
            .rev()
            .take(self.metrics.backoff());
        for (i, c) in window {
            let at = start + i;
            if matches!(c, '.' | '!' | '?') {
                return at + c.len_utf8();
            }
            if c.is_whitespace() && at > start {
                return at;
            }
        }
        limit
    }

    // end of the last line that fits when `start..cut` wraps past the page
    fn line_limit(&self, start: usize, cut: usize) -> Option<usize> {
        let text = &self.content[start..cut];
        let mut lines = wrap_lines(text, self.metrics.chars_per_line);
        let last = lines.nth(self.metrics.lines_per_page - 1)?;
        lines.next()?;
        // wrapped lines borrow from `text`
        let offset = last.as_ptr() as usize - text.as_ptr() as usize;
        Some(start + offset + last.len())
    }
}

impl Iterator for PageBuilder<'_> {
    type Item = Page;

    fn next(&mut self) -> Option<Page> {
        self.skip_whitespace();
        if self.pos >= self.content.len() {
            return None;
        }
        if self.emitted >= MAX_PAGES {
            self.ceiling_reached = true;
            return None;
        }

        let start = self.pos;
        let limit = self.advance_chars(start, self.metrics.chars_per_page);
        let cut = if limit >= self.content.len() {
            self.content.len()
        } else {
            self.find_break(start, limit)
        };
        let cut = self.line_limit(start, cut).unwrap_or(cut);

        let end = start + self.content[start..cut].trim_end().len();
        self.pos = cut;
        self.emitted += 1;
        // start sits on a non-whitespace char, so the first line and
        // therefore the cut end past it
        Some(Page { start, end })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<Page>,
    pub ceiling_reached: bool,
}

/// Paginate the whole content, calling `suspend` every few pages.
pub fn paginate(
    content: &str,
    settings: &TextSettings,
    viewport: Viewport,
    mut suspend: impl FnMut(),
) -> Pagination {
    let mut builder = PageBuilder::new(content, PageMetrics::new(settings, viewport));
    let mut pages = Vec::new();

    while let Some(page) = builder.next() {
        pages.push(page);
        if pages.len() % PAGES_PER_SUSPEND == 0 {
            suspend();
        }
    }

    Pagination {
        pages,
        ceiling_reached: builder.ceiling_reached(),
    }
}
