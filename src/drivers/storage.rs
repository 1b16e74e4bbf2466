// Content source boundary: document bytes and directory listings.
// Paths are absolute and '/'-separated. The medium may be powered down
// and answer NotReady to any call.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    NotReady,
    NotFound,
    Io,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotReady => write!(f, "storage not ready"),
            StorageError::NotFound => write!(f, "not found"),
            StorageError::Io => write!(f, "storage i/o error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u32,
}

impl DirEntry {
    pub fn file(name: &str, size: u32) -> Self {
        Self {
            name: String::from(name),
            is_dir: false,
            size,
        }
    }

    pub fn dir(name: &str) -> Self {
        Self {
            name: String::from(name),
            is_dir: true,
            size: 0,
        }
    }
}

pub trait ContentSource {
    fn exists(&mut self, path: &str) -> Result<bool, StorageError>;

    fn size(&mut self, path: &str) -> Result<u32, StorageError>;

    /// Read up to `buf.len()` bytes at `offset`. Returns 0 at end of file.
    fn read_chunk(&mut self, path: &str, offset: u32, buf: &mut [u8])
    -> Result<usize, StorageError>;

    /// Entries of a directory, directories first, each group sorted by name.
    fn list_dir(&mut self, path: &str) -> Result<Vec<DirEntry>, StorageError>;

    fn remove(&mut self, path: &str) -> Result<(), StorageError>;
}

// join a directory and an entry name into an absolute path
pub fn join(dir: &str, name: &str) -> String {
    let mut out = String::with_capacity(dir.len() + name.len() + 1);
    out.push_str(dir.trim_end_matches('/'));
    out.push('/');
    out.push_str(name.trim_start_matches('/'));
    out
}

// parent directory; the root is its own parent
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &trimmed[..i],
    }
}

pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

// file name without its last extension
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(i) => &name[..i],
    }
}

pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(i) => Some(&name[i + 1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_root_and_slashes() {
        assert_eq!(join("/", "books"), "/books");
        assert_eq!(join("/books/", "a.txt"), "/books/a.txt");
    }

    #[test]
    fn parent_of_nested_and_root() {
        assert_eq!(parent("/books/sci/a.txt"), "/books/sci");
        assert_eq!(parent("/books"), "/");
        assert_eq!(parent("/"), "/");
    }

    #[test]
    fn stem_and_extension() {
        assert_eq!(file_stem("/books/Moby Dick.txt"), "Moby Dick");
        assert_eq!(extension("/books/page.XHTML"), Some("XHTML"));
        assert_eq!(extension("/books/.hidden"), None);
        assert_eq!(file_stem("/books/README"), "README");
    }
}
