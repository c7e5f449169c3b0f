//! Adapters for the platform traits (`KeyValueStorage`, `History`, `SaveSink`,
//! `Notifier`).
//!
//! `memory` works everywhere and backs the tests. `file`, `disk` and `console`
//! are native-only and back the operator binary. `browser` wraps the DOM APIs
//! and only exists on `wasm32`.

pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub mod console;
#[cfg(not(target_arch = "wasm32"))]
pub mod disk;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use memory::{MemoryHistory, MemorySink, MemoryStorage, RecordingNotifier};

#[cfg(not(target_arch = "wasm32"))]
pub use console::StderrNotifier;
#[cfg(not(target_arch = "wasm32"))]
pub use disk::DiskSink;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use browser::{AlertNotifier, BrowserHistory, BrowserSink, BrowserStorage};
