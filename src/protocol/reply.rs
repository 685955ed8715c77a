//! FTP reply handling
//!
//! Formats numeric replies and writes them onto the control connection with
//! CRLF framing.

use log::info;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;

/// Format an FTP reply line.
///
/// `code` must be a three-digit code in `[100,599]` and `text` must not
/// contain CR or LF; both are programming errors on our side, not client
/// input, so they are enforced with debug assertions.
pub fn format_reply(code: u16, text: &str) -> String {
    debug_assert!((100..=599).contains(&code), "reply code out of range: {code}");
    debug_assert!(
        !text.contains('\r') && !text.contains('\n'),
        "reply text contains line break"
    );
    format!("{} {}\r\n", code, text)
}

/// Writes replies to the control connection.
///
/// The session processes one command at a time, so replies are never
/// interleaved. A failed write is fatal to the session.
pub struct ReplyWriter {
    writer: OwnedWriteHalf,
}

impl ReplyWriter {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self { writer }
    }

    /// Sends one reply line and flushes it.
    pub async fn send(&mut self, code: u16, text: &str) -> std::io::Result<()> {
        let line = format_reply(code, text);
        info!("reply: {}", line.trim_end());
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await
    }
}
