//! Transfer module
//!
//! Data channel management for active (PORT) and passive (PASV) transfers.

pub mod channel;

pub use channel::{DataChannel, DataPlan};
