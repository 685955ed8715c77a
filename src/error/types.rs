//! Error types
//!
//! Defines domain-specific error types for each module of the FTP server.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors produced while parsing the RFC 959 `h1,h2,h3,h4,p1,p2` notation.
#[derive(Debug)]
pub enum HostPortError {
    FieldCount(usize),
    InvalidField(String),
}

impl fmt::Display for HostPortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostPortError::FieldCount(n) => write!(f, "expected 6 fields, got {n}"),
            HostPortError::InvalidField(s) => write!(f, "invalid field: {s:?}"),
        }
    }
}

impl std::error::Error for HostPortError {}

/// Data channel errors
#[derive(Debug)]
pub enum TransferError {
    NotArmed,
    Bind(io::Error),
    Accept(io::Error),
    Dial(SocketAddr, io::Error),
    Timeout,
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::NotArmed => write!(f, "no data channel armed"),
            TransferError::Bind(e) => write!(f, "failed to bind passive listener: {e}"),
            TransferError::Accept(e) => write!(f, "failed to accept data connection: {e}"),
            TransferError::Dial(addr, e) => write!(f, "failed to connect to {addr}: {e}"),
            TransferError::Timeout => write!(f, "timed out waiting for data connection"),
        }
    }
}

impl std::error::Error for TransferError {}

/// Filesystem adapter errors
#[derive(Debug)]
pub enum StorageError {
    NotFound(String),
    NotADirectory(String),
    Io(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(p) => write!(f, "not found: {p}"),
            StorageError::NotADirectory(p) => write!(f, "not a directory: {p}"),
            StorageError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::Io(error)
    }
}
