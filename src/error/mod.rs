//! Error management system
//!
//! Provides error types for the FTP server modules.

pub mod types;

pub use types::{HostPortError, StorageError, TransferError};
