//! Acceptor loop
//!
//! Binds the control listener and spawns one independent session task per
//! accepted connection.

use log::{error, info};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::session::Session;

pub struct Server {
    listener: TcpListener,
    initial_dir: PathBuf,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the control listener and resolves the initial directory.
    ///
    /// Failure here is fatal to the process; everything after this point is
    /// session-local.
    pub async fn bind(config: ServerConfig) -> std::io::Result<Self> {
        let socket = config.control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("failed to bind control listener on {socket}: {e}");
            e
        })?;
        let initial_dir = config.initial_dir()?;
        info!(
            "listening on {} (initial directory {})",
            listener.local_addr()?,
            initial_dir.display()
        );
        Ok(Self {
            listener,
            initial_dir,
            config: Arc::new(config),
        })
    }

    /// The address the control listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever. A failed accept is logged and does not
    /// stop the server.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("new connection from {addr}");
                    let initial_dir = self.initial_dir.clone();
                    let config = Arc::clone(&self.config);
                    tokio::spawn(async move {
                        match Session::new(stream, initial_dir, &config) {
                            Ok(session) => session.run().await,
                            Err(e) => error!("failed to set up session for {addr}: {e}"),
                        }
                    });
                }
                Err(e) => error!("error accepting connection: {e}"),
            }
        }
    }
}
