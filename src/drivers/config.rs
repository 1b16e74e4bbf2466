// Persistence boundary for small text records (settings).

use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NotFound,
    NotReady,
    Io,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound => write!(f, "record not found"),
            ConfigError::NotReady => write!(f, "config store not ready"),
            ConfigError::Io => write!(f, "config write failed"),
        }
    }
}

pub trait ConfigStore {
    fn load(&mut self, path: &str) -> Result<Vec<u8>, ConfigError>;

    fn store(&mut self, path: &str, data: &[u8]) -> Result<(), ConfigError>;
}
