//! Command handlers
//!
//! One handler per supported verb plus the shared transfer sequence. Every
//! handler translates its own failures into the numeric reply and returns
//! `Err` only for control-connection I/O, which ends the session.

use log::{info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::StorageError;
use crate::protocol::{host_port, Command};
use crate::storage;

use super::{Session, TransferType};

impl Session {
    pub(super) async fn dispatch(&mut self, command: Command) -> std::io::Result<()> {
        match command {
            Command::User(name) => self.handle_user(&name).await,
            Command::Quit => self.handle_quit().await,
            Command::Noop => self.reply.send(200, "Okay").await,
            Command::Type(arg) => self.handle_type(&arg).await,
            Command::Mode(arg) => self.handle_mode(&arg).await,
            Command::Stru(arg) => self.handle_stru(&arg).await,
            Command::Port(arg) => self.handle_port(&arg).await,
            Command::Pasv => self.handle_pasv().await,
            Command::Pwd => self.handle_pwd().await,
            Command::Cwd(path) => self.handle_cwd(&path).await,
            Command::Retr(path) => self.handle_retr(&path).await,
            Command::Stor(path) => self.handle_stor(&path).await,
            Command::List(path) => self.handle_list(path.as_deref()).await,
            Command::BadUsage(usage) => self.reply.send(501, usage).await,
            Command::Unknown => self.reply.send(502, "command not support").await,
        }
    }

    /// Any user is accepted; there is no authentication.
    async fn handle_user(&mut self, _name: &str) -> std::io::Result<()> {
        self.reply.send(230, "User logged in, proceed.").await
    }

    async fn handle_quit(&mut self) -> std::io::Result<()> {
        self.alive = false;
        self.reply.send(221, "Bye").await
    }

    async fn handle_type(&mut self, arg: &str) -> std::io::Result<()> {
        match TransferType::from_type_arg(arg) {
            Some(transfer_type) => {
                self.transfer_type = transfer_type;
                info!(
                    "transfer type for {} is now {:?}",
                    self.peer, self.transfer_type
                );
                self.reply.send(200, "TYPE success").await
            }
            None => self.reply.send(502, "only support A or I").await,
        }
    }

    async fn handle_mode(&mut self, arg: &str) -> std::io::Result<()> {
        match arg {
            "S" => self.reply.send(200, "MODE STREAM SET").await,
            _ => self.reply.send(502, "only support STREAM MODE").await,
        }
    }

    async fn handle_stru(&mut self, arg: &str) -> std::io::Result<()> {
        match arg {
            "F" => self.reply.send(200, "STRU file set").await,
            _ => self.reply.send(502, "only support STRU FILE").await,
        }
    }

    async fn handle_port(&mut self, arg: &str) -> std::io::Result<()> {
        match host_port::decode(arg) {
            Ok(peer) => {
                self.data.arm_active(peer);
                self.reply.send(200, "PORT success").await
            }
            Err(e) => {
                warn!("bad PORT argument from {}: {e}", self.peer);
                self.reply.send(501, "Can't parse address.").await
            }
        }
    }

    async fn handle_pasv(&mut self) -> std::io::Result<()> {
        match self.data.arm_passive(self.local_ip).await {
            Ok(addr) => {
                let encoded = host_port::encode(addr);
                self.reply
                    .send(227, &format!("Entering Passive Mode {encoded}"))
                    .await
            }
            Err(e) => {
                warn!("PASV setup failed for {}: {e}", self.peer);
                self.reply.send(425, "Can't open data connection.").await
            }
        }
    }

    async fn handle_pwd(&mut self) -> std::io::Result<()> {
        let text = format!("\"{}\" is current directory", self.pwd.display());
        self.reply.send(257, &text).await
    }

    async fn handle_cwd(&mut self, path: &str) -> std::io::Result<()> {
        let target = storage::resolve(&self.pwd, path);
        match storage::stat_dir(&target) {
            Ok(()) => {
                self.pwd = target;
                let text = format!("directory changed to \"{}\"", self.pwd.display());
                self.reply.send(250, &text).await
            }
            Err(StorageError::NotFound(_)) => self.reply.send(550, "File Not found").await,
            Err(_) => self.reply.send(550, "File Not accessable").await,
        }
    }

    async fn handle_retr(&mut self, path: &str) -> std::io::Result<()> {
        let path = storage::resolve(&self.pwd, path);
        let mut file = match storage::open_read(&path).await {
            Ok(file) => file,
            Err(StorageError::NotFound(_)) => {
                return self.reply.send(450, "File not found.").await;
            }
            Err(e) => {
                warn!("RETR {} failed to open: {e}", path.display());
                return self.reply.send(450, "open file error").await;
            }
        };

        let Some(mut stream) = self.open_data_connection().await? else {
            return Ok(());
        };
        match tokio::io::copy(&mut file, &mut stream).await {
            Ok(bytes) => {
                let _ = stream.shutdown().await;
                drop(stream);
                info!("sent {} ({bytes} bytes) to {}", path.display(), self.peer);
                self.reply.send(226, "file transfer").await
            }
            Err(e) => {
                drop(stream);
                warn!("RETR {} aborted: {e}", path.display());
                self.reply.send(450, "File transfer error").await
            }
        }
    }

    async fn handle_stor(&mut self, path: &str) -> std::io::Result<()> {
        let path = storage::resolve(&self.pwd, path);
        let mut file = match storage::open_write(&path).await {
            Ok(file) => file,
            Err(e) => {
                warn!("STOR {} failed to create: {e}", path.display());
                return self.reply.send(450, "open file error").await;
            }
        };

        let Some(mut stream) = self.open_data_connection().await? else {
            return Ok(());
        };
        let received = tokio::io::copy(&mut stream, &mut file).await;
        drop(stream);
        match received {
            Ok(bytes) => {
                if let Err(e) = file.flush().await {
                    warn!("STOR {} failed to flush: {e}", path.display());
                    return self.reply.send(450, "File transfer error").await;
                }
                info!(
                    "stored {} ({bytes} bytes) from {}",
                    path.display(),
                    self.peer
                );
                self.reply.send(226, "file transfer").await
            }
            Err(e) => {
                warn!("STOR {} aborted: {e}", path.display());
                self.reply.send(450, "File transfer error").await
            }
        }
    }

    async fn handle_list(&mut self, path: Option<&str>) -> std::io::Result<()> {
        let target = match path {
            Some(arg) => storage::resolve(&self.pwd, arg),
            None => self.pwd.clone(),
        };
        let lines = match storage::list_directory(&target) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("LIST {} failed: {e}", target.display());
                return self.reply.send(450, "file system error").await;
            }
        };

        let Some(mut stream) = self.open_data_connection().await? else {
            return Ok(());
        };
        let mut payload = String::new();
        for line in &lines {
            payload.push_str(line);
            payload.push_str("\r\n");
        }
        match stream.write_all(payload.as_bytes()).await {
            Ok(()) => {
                let _ = stream.shutdown().await;
                drop(stream);
                self.reply.send(226, "Transfer completed").await
            }
            Err(e) => {
                drop(stream);
                warn!("LIST {} aborted: {e}", target.display());
                self.reply.send(450, "File transfer error").await
            }
        }
    }

    /// Shared transfer preamble: the 150 goes out before the data stream is
    /// opened (clients often start connecting only on seeing it), the 125
    /// after. Returns `None` when the data channel could not be opened, in
    /// which case the 425 has already been sent.
    async fn open_data_connection(&mut self) -> std::io::Result<Option<TcpStream>> {
        self.reply
            .send(150, "File status okay; about to open data connection")
            .await?;
        match self.data.open_transfer().await {
            Ok(stream) => {
                self.reply
                    .send(125, "Data connection already open; transfer starting")
                    .await?;
                Ok(Some(stream))
            }
            Err(e) => {
                warn!("data connection for {} failed: {e}", self.peer);
                self.reply.send(425, "Can't open data connection").await?;
                Ok(None)
            }
        }
    }
}
