// Wireless collaborator: station scan/connect and the hotspot used by
// the configuration portal. Association itself is external.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::task::Poll;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    Unavailable,
    NotFound,
    Rejected,
    PersistFailed,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::Unavailable => write!(f, "radio unavailable"),
            RadioError::NotFound => write!(f, "network not found"),
            RadioError::Rejected => write!(f, "connection rejected"),
            RadioError::PersistFailed => write!(f, "could not save networks"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    Open,
    Secured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub ssid: String,
    pub rssi: i8,
    pub security: Security,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedNetwork {
    pub ssid: String,
    pub priority: u8,
}

pub trait Radio {
    fn is_available(&self) -> bool;

    fn connected_ssid(&self) -> Option<&str>;

    /// Saved networks, highest priority first.
    fn saved_networks(&self) -> &[SavedNetwork];

    fn start_scan(&mut self) -> Result<(), RadioError>;

    fn poll_scan(&mut self) -> Poll<Result<Vec<ScanResult>, RadioError>>;

    fn cancel_scan(&mut self);

    fn connect(&mut self, ssid: &str) -> Result<(), RadioError>;

    /// Move a saved network to the top of the list and persist it.
    fn raise_priority(&mut self, index: usize) -> Result<(), RadioError>;

    fn start_access_point(&mut self) -> Result<(), RadioError>;

    fn stop_access_point(&mut self);
}
