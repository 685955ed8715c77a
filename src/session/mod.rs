//! Session state machine
//!
//! One `Session` per accepted control connection. The session owns both
//! halves of the control stream, the working directory, the transfer type
//! flag, and the data channel plan, and processes commands strictly one at
//! a time until QUIT or EOF.

mod handlers;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::protocol::{parse_command, ReplyWriter};
use crate::transfer::DataChannel;

/// Transfer type tracked by TYPE.
///
/// Only the flag is tracked; payloads are copied byte-exact in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    #[default]
    Ascii,
    Image,
}

impl TransferType {
    /// Maps a TYPE argument to a transfer type; `None` for unsupported
    /// values. Exactly `A`, `A N`, `I` and `L 8` are accepted.
    pub fn from_type_arg(arg: &str) -> Option<Self> {
        match arg {
            "A" | "A N" => Some(TransferType::Ascii),
            "I" | "L 8" => Some(TransferType::Image),
            _ => None,
        }
    }
}

pub struct Session {
    reader: BufReader<OwnedReadHalf>,
    reply: ReplyWriter,
    pwd: PathBuf,
    transfer_type: TransferType,
    data: DataChannel,
    local_ip: Ipv4Addr,
    peer: SocketAddr,
    alive: bool,
    max_command_length: usize,
}

impl Session {
    /// Sets up a session over an accepted control connection.
    ///
    /// `initial_dir` is the server's startup directory and becomes the
    /// session working directory.
    pub fn new(
        stream: TcpStream,
        initial_dir: PathBuf,
        config: &ServerConfig,
    ) -> std::io::Result<Self> {
        let peer = stream.peer_addr()?;
        let local_ip = match stream.local_addr()?.ip() {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(_) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "control connection is not IPv4",
                ));
            }
        };
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            reply: ReplyWriter::new(write_half),
            pwd: initial_dir,
            transfer_type: TransferType::default(),
            data: DataChannel::new(config.data_timeout()),
            local_ip,
            peer,
            alive: true,
            max_command_length: config.max_command_length,
        })
    }

    /// Runs the session to completion, consuming it.
    ///
    /// A control-connection failure terminates only this session; the 421
    /// farewell is best effort since the stream is usually already gone.
    pub async fn run(mut self) {
        if let Err(e) = self.serve().await {
            warn!("session for {} failed: {e}", self.peer);
            let _ = self
                .reply
                .send(421, "Service not available, closing control connection")
                .await;
        }
        self.data.discard();
        info!("session closed for {}", self.peer);
    }

    async fn serve(&mut self) -> std::io::Result<()> {
        self.reply.send(220, "Service ready").await?;

        let mut line = String::new();
        while self.alive {
            line.clear();
            let n = self.reader.read_line(&mut line).await?;
            if n == 0 {
                info!("connection closed by {}", self.peer);
                break;
            }
            if line.len() > self.max_command_length {
                warn!(
                    "oversized command line ({} bytes) from {}",
                    line.len(),
                    self.peer
                );
                self.reply.send(500, "Command line too long").await?;
                continue;
            }

            let Some(command) = parse_command(&line) else {
                continue;
            };
            info!("command from {}: {:?}", self.peer, command);
            self.dispatch(command).await?;
        }
        Ok(())
    }
}
