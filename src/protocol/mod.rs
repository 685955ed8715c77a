//! FTP protocol implementation
//!
//! Handles command parsing, reply formatting, and the RFC 959 address
//! notation shared by PORT and PASV.

pub mod command;
pub mod host_port;
pub mod reply;

pub use command::{parse_command, Command};
pub use reply::{format_reply, ReplyWriter};
