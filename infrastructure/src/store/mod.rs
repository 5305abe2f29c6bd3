//! Persistence for the last session configuration.

mod file_store;

pub use file_store::FileSessionConfigStore;
