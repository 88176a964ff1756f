//! # cantine Config
//!
//! Configuration and host-owned persisted state:
//!
//! - [`Config`]: TOML schema for the portal, login, booking and cache
//!   settings, all fields defaulted so an empty file is valid.
//! - [`ConfigLoader`]: file/string loading with `${VAR}` environment
//!   expansion and tilde path expansion.
//! - [`CredentialStore`] / [`ClearMarkerStore`]: the two key/value records
//!   the host persists (one credential set, one last-clear timestamp), each
//!   with an in-memory and a JSON-file implementation.

mod error;
mod loader;
mod schema;
mod store;

pub use error::{ConfigError, StoreError};
pub use loader::ConfigLoader;
pub use schema::*;
pub use store::{
    ClearMarkerStore, CredentialStore, FileClearMarkerStore, FileCredentialStore,
    MemoryClearMarkerStore, MemoryCredentialStore,
};
