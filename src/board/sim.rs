//! In-memory board.
//!
//! Every collaborator is a plain struct with knobs for the failure
//! modes the core has to survive: storage that is not ready, a radio
//! that never finishes scanning, a config store that rejects writes.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;
use core::task::Poll;

use super::{Board, Services};
use crate::drivers::clock::{Clock, SyncError, WallTime};
use crate::drivers::config::{ConfigError, ConfigStore};
use crate::drivers::radio::{Radio, RadioError, SavedNetwork, ScanResult};
use crate::drivers::storage::{self, ContentSource, DirEntry, StorageError};
use crate::drivers::system::{BatteryStatus, System};

pub struct MemStorage {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    ready: bool,
    reads: usize,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStorage {
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(String::from("/"));
        Self {
            files: BTreeMap::new(),
            dirs,
            ready: true,
            reads: 0,
        }
    }

    /// Add a file, creating its parent directories.
    pub fn add_file(&mut self, path: &str, data: &[u8]) {
        self.add_dir(storage::parent(path));
        self.files.insert(String::from(path), data.to_vec());
    }

    pub fn add_dir(&mut self, path: &str) {
        let mut dir = path;
        while dir != "/" {
            self.dirs.insert(String::from(dir));
            dir = storage::parent(dir);
        }
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Number of read_chunk calls served.
    pub fn reads(&self) -> usize {
        self.reads
    }

    fn check_ready(&self) -> Result<(), StorageError> {
        if self.ready {
            Ok(())
        } else {
            Err(StorageError::NotReady)
        }
    }
}

impl ContentSource for MemStorage {
    fn exists(&mut self, path: &str) -> Result<bool, StorageError> {
        self.check_ready()?;
        Ok(self.files.contains_key(path) || self.dirs.contains(path))
    }

    fn size(&mut self, path: &str) -> Result<u32, StorageError> {
        self.check_ready()?;
        self.files
            .get(path)
            .map(|f| f.len() as u32)
            .ok_or(StorageError::NotFound)
    }

    fn read_chunk(
        &mut self,
        path: &str,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        self.check_ready()?;
        let data = self.files.get(path).ok_or(StorageError::NotFound)?;
        self.reads += 1;
        let start = (offset as usize).min(data.len());
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);
        Ok(n)
    }

    fn list_dir(&mut self, path: &str) -> Result<Vec<DirEntry>, StorageError> {
        self.check_ready()?;
        if !self.dirs.contains(path) {
            return Err(StorageError::NotFound);
        }
        let mut entries: Vec<DirEntry> = self
            .dirs
            .iter()
            .filter(|d| d.as_str() != "/" && storage::parent(d) == path)
            .map(|d| DirEntry::dir(storage::file_name(d)))
            .collect();
        entries.extend(
            self.files
                .iter()
                .filter(|(f, _)| storage::parent(f) == path)
                .map(|(f, data)| DirEntry::file(storage::file_name(f), data.len() as u32)),
        );
        Ok(entries)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        self.check_ready()?;
        if self.files.remove(path).is_some() {
            return Ok(());
        }
        if path == "/" || !self.dirs.remove(path) {
            return Err(StorageError::NotFound);
        }
        let prefix = storage::join(path, "");
        self.dirs.retain(|d| !d.starts_with(&prefix));
        self.files.retain(|f, _| !f.starts_with(&prefix));
        Ok(())
    }
}

pub struct SimRadio {
    pub available: bool,
    pub connected: Option<String>,
    pub saved: Vec<SavedNetwork>,
    pub visible: Vec<ScanResult>,
    /// Polls before a scan completes; None never completes.
    pub scan_polls: Option<u32>,
    pub persist_fails: bool,
    pub access_point: bool,
    scan_remaining: Option<u32>,
    scanning: bool,
}

impl Default for SimRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRadio {
    pub fn new() -> Self {
        Self {
            available: true,
            connected: None,
            saved: Vec::new(),
            visible: Vec::new(),
            scan_polls: Some(1),
            persist_fails: false,
            access_point: false,
            scan_remaining: None,
            scanning: false,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    fn check_available(&self) -> Result<(), RadioError> {
        if self.available {
            Ok(())
        } else {
            Err(RadioError::Unavailable)
        }
    }
}

impl Radio for SimRadio {
    fn is_available(&self) -> bool {
        self.available
    }

    fn connected_ssid(&self) -> Option<&str> {
        self.connected.as_deref()
    }

    fn saved_networks(&self) -> &[SavedNetwork] {
        &self.saved
    }

    fn start_scan(&mut self) -> Result<(), RadioError> {
        self.check_available()?;
        self.scanning = true;
        self.scan_remaining = self.scan_polls;
        Ok(())
    }

    fn poll_scan(&mut self) -> Poll<Result<Vec<ScanResult>, RadioError>> {
        if !self.scanning {
            return Poll::Ready(Err(RadioError::Unavailable));
        }
        match self.scan_remaining {
            Some(0) => {
                self.scanning = false;
                Poll::Ready(Ok(self.visible.clone()))
            }
            Some(n) => {
                self.scan_remaining = Some(n - 1);
                Poll::Pending
            }
            None => Poll::Pending,
        }
    }

    fn cancel_scan(&mut self) {
        self.scanning = false;
    }

    fn connect(&mut self, ssid: &str) -> Result<(), RadioError> {
        self.check_available()?;
        let known = self.saved.iter().any(|n| n.ssid == ssid)
            || self.visible.iter().any(|n| n.ssid == ssid);
        if !known {
            return Err(RadioError::NotFound);
        }
        self.connected = Some(String::from(ssid));
        Ok(())
    }

    fn raise_priority(&mut self, index: usize) -> Result<(), RadioError> {
        if index >= self.saved.len() {
            return Err(RadioError::NotFound);
        }
        if self.persist_fails {
            return Err(RadioError::PersistFailed);
        }
        let network = self.saved.remove(index);
        self.saved.insert(0, network);
        let count = self.saved.len();
        for (i, n) in self.saved.iter_mut().enumerate() {
            n.priority = (count - i) as u8;
        }
        Ok(())
    }

    fn start_access_point(&mut self) -> Result<(), RadioError> {
        self.check_available()?;
        self.access_point = true;
        Ok(())
    }

    fn stop_access_point(&mut self) {
        self.access_point = false;
    }
}

pub struct SimClock {
    pub time: Option<WallTime>,
    /// Outcome once `sync_polls` polls have passed; None never finishes.
    pub sync_result: Option<Result<(), SyncError>>,
    pub sync_polls: u32,
    syncing: bool,
    remaining: u32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            time: None,
            sync_result: Some(Ok(())),
            sync_polls: 1,
            syncing: false,
            remaining: 0,
        }
    }

    pub fn set_time(&mut self, hour: u8, minute: u8) {
        self.time = Some(WallTime {
            year: 2024,
            month: 1,
            day: 1,
            hour,
            minute,
            second: 0,
        });
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing
    }
}

impl Clock for SimClock {
    fn now(&self) -> Option<WallTime> {
        self.time
    }

    fn start_sync(&mut self) -> Result<(), SyncError> {
        self.syncing = true;
        self.remaining = self.sync_polls;
        Ok(())
    }

    fn poll_sync(&mut self) -> Poll<Result<(), SyncError>> {
        if !self.syncing {
            return Poll::Ready(Err(SyncError::Failed));
        }
        if self.remaining > 0 {
            self.remaining -= 1;
            return Poll::Pending;
        }
        match self.sync_result {
            Some(result) => {
                self.syncing = false;
                if result.is_ok() && self.time.is_none() {
                    self.set_time(12, 0);
                }
                Poll::Ready(result)
            }
            None => Poll::Pending,
        }
    }

    fn cancel_sync(&mut self) {
        self.syncing = false;
    }
}

pub struct MemConfig {
    records: BTreeMap<String, Vec<u8>>,
    pub ready: bool,
    pub fail_writes: bool,
    writes: usize,
}

impl Default for MemConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MemConfig {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            ready: true,
            fail_writes: false,
            writes: 0,
        }
    }

    pub fn insert(&mut self, path: &str, data: &[u8]) {
        self.records.insert(String::from(path), data.to_vec());
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.records.get(path).map(Vec::as_slice)
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemConfig {
    fn load(&mut self, path: &str) -> Result<Vec<u8>, ConfigError> {
        if !self.ready {
            return Err(ConfigError::NotReady);
        }
        self.records.get(path).cloned().ok_or(ConfigError::NotFound)
    }

    fn store(&mut self, path: &str, data: &[u8]) -> Result<(), ConfigError> {
        if !self.ready {
            return Err(ConfigError::NotReady);
        }
        if self.fail_writes {
            return Err(ConfigError::Io);
        }
        self.writes += 1;
        self.insert(path, data);
        Ok(())
    }
}

pub struct SimSystem {
    pub free_heap: usize,
    pub battery: BatteryStatus,
    suspends: usize,
}

impl SimSystem {
    pub fn new(free_heap: usize) -> Self {
        Self {
            free_heap,
            battery: BatteryStatus {
                millivolts: 3_900,
                percent: 80,
                charging: false,
            },
            suspends: 0,
        }
    }

    pub fn suspend_count(&self) -> usize {
        self.suspends
    }
}

impl System for SimSystem {
    fn free_heap(&self) -> usize {
        self.free_heap
    }

    fn battery(&self) -> BatteryStatus {
        self.battery
    }

    fn suspend(&mut self) {
        self.suspends += 1;
    }
}

pub struct SimBoard {
    pub storage: MemStorage,
    pub radio: SimRadio,
    pub clock: SimClock,
    pub config: MemConfig,
    pub system: SimSystem,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Empty storage, idle radio, unset clock, 256 KiB free heap.
    pub fn new() -> Self {
        Self {
            storage: MemStorage::new(),
            radio: SimRadio::new(),
            clock: SimClock::new(),
            config: MemConfig::new(),
            system: SimSystem::new(256 * 1024),
        }
    }
}

impl Board for SimBoard {
    type Storage = MemStorage;
    type Radio = SimRadio;
    type Clock = SimClock;
    type Config = MemConfig;
    type System = SimSystem;

    fn services(&mut self) -> Services<'_, Self> {
        Services {
            storage: &mut self.storage,
            radio: &mut self.radio,
            clock: &mut self.clock,
            config: &mut self.config,
            system: &mut self.system,
        }
    }
}
