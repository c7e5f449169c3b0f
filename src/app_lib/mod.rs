//! Shared utilities for API access, configuration, errors, storage and
//! in-flight request bookkeeping.
//!
//! Centralizing these helpers keeps network behavior consistent across the
//! login, report and password flows. They never persist secrets on their own:
//! callers hand in bearer tokens and passwords as `SecretString` and the helpers
//! only attach them to outgoing requests.

pub mod api;
pub mod config;
pub mod errors;
pub mod inflight;
pub mod json;
pub mod notify;
pub mod storage;

pub use api::ApiClient;
pub use config::AppConfig;
pub use errors::{AppError, FieldError, SaveError, StorageError, ValidationError};
pub use inflight::{BusyFlag, BusyGuard, RequestGeneration, Ticket};
pub use notify::Notifier;
pub use storage::KeyValueStorage;
