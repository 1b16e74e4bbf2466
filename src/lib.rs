// reading core for a three-button e-ink handheld
//
// Pagination, screen navigation and refresh policy. Hardware lives
// behind the collaborator traits in `drivers`; `board::sim` backs them
// in memory for host tests.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod apps;
pub mod board;
pub mod book;
pub mod drivers;
pub mod formats;
pub mod kernel;
pub mod ui;

pub use kernel::engine::Engine;
