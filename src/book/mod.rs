// Book model: document metadata, text settings, and the errors and
// notices produced while loading.

pub mod cursor;
pub mod paginate;
pub mod session;

use alloc::string::String;
use core::fmt;

use crate::drivers::storage::{self, StorageError};

pub use cursor::PageCursor;
pub use paginate::{MAX_PAGES, Page, PageBuilder, PageMetrics, Pagination, paginate};
pub use session::BookSession;

/// Bytes of a document kept in memory; the rest is dropped.
pub const CONTENT_CAP: usize = 200_000;

pub const DEFAULT_MARGIN: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    PlainText,
    MarkupLite,
    Unknown,
}

impl DocFormat {
    pub fn from_path(path: &str) -> Self {
        let Some(ext) = storage::extension(path) else {
            return DocFormat::Unknown;
        };
        if ext.eq_ignore_ascii_case("txt") {
            DocFormat::PlainText
        } else if ["htm", "html", "xhtml", "xml"]
            .iter()
            .any(|e| ext.eq_ignore_ascii_case(e))
        {
            DocFormat::MarkupLite
        } else {
            DocFormat::Unknown
        }
    }

    pub const fn is_readable(self) -> bool {
        !matches!(self, DocFormat::Unknown)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Absolute path on the content source.
    pub id: String,
    pub title: String,
    pub byte_length: u32,
    pub format: DocFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontTier {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontTier {
    pub const ALL: [FontTier; 3] = [FontTier::Small, FontTier::Medium, FontTier::Large];

    pub const fn from_index(i: u8) -> Self {
        match i {
            0 => FontTier::Small,
            2 => FontTier::Large,
            _ => FontTier::Medium,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Glyph advance in pixels.
    pub const fn char_width(self) -> u16 {
        match self {
            FontTier::Small => 6,
            FontTier::Medium => 8,
            FontTier::Large => 10,
        }
    }

    pub const fn line_height(self) -> u16 {
        match self {
            FontTier::Small => 14,
            FontTier::Medium => 18,
            FontTier::Large => 24,
        }
    }

    pub const fn larger(self) -> Option<Self> {
        match self {
            FontTier::Small => Some(FontTier::Medium),
            FontTier::Medium => Some(FontTier::Large),
            FontTier::Large => None,
        }
    }

    pub const fn smaller(self) -> Option<Self> {
        match self {
            FontTier::Small => None,
            FontTier::Medium => Some(FontTier::Small),
            FontTier::Large => Some(FontTier::Medium),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FontTier::Small => "Small",
            FontTier::Medium => "Medium",
            FontTier::Large => "Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSettings {
    pub font_tier: FontTier,
    pub line_height: u16,
    pub margin: u16,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self::new(FontTier::default())
    }
}

impl TextSettings {
    pub const fn new(font_tier: FontTier) -> Self {
        Self {
            font_tier,
            line_height: font_tier.line_height(),
            margin: DEFAULT_MARGIN,
        }
    }

    pub const fn with_tier(self, font_tier: FontTier) -> Self {
        Self {
            font_tier,
            line_height: font_tier.line_height(),
            margin: self.margin,
        }
    }

    pub const fn char_width(&self) -> u16 {
        self.font_tier.char_width()
    }
}

/// Pixel area available for page text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    NotFound,
    NotReady,
    Io,
    InsufficientMemory { needed: usize, available: usize },
    UnsupportedFormat,
    Empty,
}

impl From<StorageError> for LoadError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotReady => LoadError::NotReady,
            StorageError::NotFound => LoadError::NotFound,
            StorageError::Io => LoadError::Io,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound => write!(f, "file not found"),
            LoadError::NotReady => write!(f, "storage not ready"),
            LoadError::Io => write!(f, "read error"),
            LoadError::InsufficientMemory { needed, available } => {
                write!(f, "not enough memory ({} of {} bytes)", available, needed)
            }
            LoadError::UnsupportedFormat => write!(f, "unsupported format"),
            LoadError::Empty => write!(f, "document is empty"),
        }
    }
}

impl LoadError {
    /// Short text for on-screen notices.
    pub const fn summary(&self) -> &'static str {
        match self {
            LoadError::NotFound => "File not found",
            LoadError::NotReady => "Storage not ready",
            LoadError::Io => "Read error",
            LoadError::InsufficientMemory { .. } => "Not enough memory",
            LoadError::UnsupportedFormat => "Unsupported format",
            LoadError::Empty => "Book is empty",
        }
    }
}

/// Non-fatal conditions recorded while opening a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ContentTruncated,
    PageCountCeilingReached,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ContentTruncated => write!(f, "content truncated at {} bytes", CONTENT_CAP),
            Notice::PageCountCeilingReached => write!(f, "page limit of {} reached", MAX_PAGES),
        }
    }
}
