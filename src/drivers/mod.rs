// Collaborator boundaries and the device-independent pieces that sit
// directly on top of them.
//
// Board crates implement the traits here; `board::sim` implements them
// in memory.

pub mod clock;
pub mod config;
pub mod display;
pub mod input;
pub mod radio;
pub mod refresh;
pub mod storage;
pub mod system;

pub use clock::{Clock, SyncError, WallTime};
pub use config::{ConfigError, ConfigStore};
pub use display::{Display, RenderMode};
pub use radio::{Radio, RadioError, SavedNetwork, ScanResult, Security};
pub use refresh::{RefreshDecision, RefreshPolicy, RefreshState};
pub use storage::{ContentSource, DirEntry, StorageError};
pub use system::{BatteryStatus, System};
