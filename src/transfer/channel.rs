//! Data channel management
//!
//! Owns the per-session transfer plan: the peer address recorded by PORT or
//! the listener bound by PASV. A plan is good for exactly one transfer;
//! opening the transfer consumes it, so the next data command has to re-arm.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use crate::error::TransferError;

/// How the next transfer's data connection will be established.
#[derive(Debug, Default)]
pub enum DataPlan {
    /// Nothing armed; a transfer command is refused with 425.
    #[default]
    None,
    /// PORT was received: dial the client at this address.
    Active(SocketAddr),
    /// PASV was received: accept one inbound connection on this listener.
    Passive(TcpListener),
}

/// One-shot factory for data connections.
pub struct DataChannel {
    plan: DataPlan,
    timeout: Duration,
}

impl DataChannel {
    pub fn new(timeout: Duration) -> Self {
        Self {
            plan: DataPlan::None,
            timeout,
        }
    }

    /// Records the peer address from a PORT command, releasing any armed
    /// passive listener.
    pub fn arm_active(&mut self, peer: SocketAddrV4) {
        if matches!(self.plan, DataPlan::Passive(_)) {
            info!("dropping armed passive listener in favor of PORT {peer}");
        }
        self.plan = DataPlan::Active(SocketAddr::V4(peer));
    }

    /// Binds a fresh listener on an ephemeral port of `local_ip` (the local
    /// address of the control connection, so the client gets a reachable
    /// endpoint) and arms the passive plan. Returns the bound address.
    pub async fn arm_passive(&mut self, local_ip: Ipv4Addr) -> Result<SocketAddrV4, TransferError> {
        let listener = TcpListener::bind((local_ip, 0))
            .await
            .map_err(TransferError::Bind)?;
        let port = listener.local_addr().map_err(TransferError::Bind)?.port();
        self.plan = DataPlan::Passive(listener);
        Ok(SocketAddrV4::new(local_ip, port))
    }

    /// Produces the data stream for one transfer.
    ///
    /// Consumes the plan regardless of outcome: a passive listener is closed
    /// here, and a failed attempt leaves the channel unarmed.
    pub async fn open_transfer(&mut self) -> Result<TcpStream, TransferError> {
        match std::mem::take(&mut self.plan) {
            DataPlan::None => Err(TransferError::NotArmed),
            DataPlan::Active(peer) => match timeout(self.timeout, TcpStream::connect(peer)).await {
                Ok(Ok(stream)) => Ok(stream),
                Ok(Err(e)) => Err(TransferError::Dial(peer, e)),
                Err(_) => Err(TransferError::Timeout),
            },
            DataPlan::Passive(listener) => match timeout(self.timeout, listener.accept()).await {
                Ok(Ok((stream, peer))) => {
                    info!("data connection accepted from {peer}");
                    Ok(stream)
                }
                Ok(Err(e)) => Err(TransferError::Accept(e)),
                Err(_) => Err(TransferError::Timeout),
            },
        }
    }

    /// Releases any held resources without opening a transfer.
    pub fn discard(&mut self) {
        if !matches!(self.plan, DataPlan::None) {
            warn!("discarding unused data channel plan");
        }
        self.plan = DataPlan::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> DataChannel {
        DataChannel::new(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_unarmed_channel_refuses_transfer() {
        let mut chan = channel();
        assert!(matches!(
            chan.open_transfer().await,
            Err(TransferError::NotArmed)
        ));
    }

    #[tokio::test]
    async fn test_passive_accepts_one_connection() {
        let mut chan = channel();
        let addr = chan.arm_passive(Ipv4Addr::LOCALHOST).await.unwrap();

        let client = tokio::spawn(async move { TcpStream::connect(addr).await });
        let stream = chan.open_transfer().await.unwrap();
        assert!(client.await.unwrap().is_ok());
        drop(stream);

        // Plan is consumed; the listener is gone and the port rebindable.
        assert!(matches!(
            chan.open_transfer().await,
            Err(TransferError::NotArmed)
        ));
        assert!(TcpListener::bind(addr).await.is_ok());
    }

    #[tokio::test]
    async fn test_active_dials_peer() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = match listener.local_addr().unwrap() {
            SocketAddr::V4(a) => a,
            _ => unreachable!(),
        };

        let mut chan = channel();
        chan.arm_active(addr);
        let (stream, accepted) = tokio::join!(chan.open_transfer(), listener.accept());
        assert!(stream.is_ok());
        assert!(accepted.is_ok());

        assert!(matches!(
            chan.open_transfer().await,
            Err(TransferError::NotArmed)
        ));
    }

    #[tokio::test]
    async fn test_rearming_replaces_passive_listener() {
        let mut chan = channel();
        let first = chan.arm_passive(Ipv4Addr::LOCALHOST).await.unwrap();
        chan.arm_active(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 1));

        // The first listener was dropped when the plan was replaced.
        assert!(TcpListener::bind(first).await.is_ok());
    }

    #[tokio::test]
    async fn test_discard_releases_listener() {
        let mut chan = channel();
        let addr = chan.arm_passive(Ipv4Addr::LOCALHOST).await.unwrap();
        chan.discard();
        assert!(TcpListener::bind(addr).await.is_ok());
    }

    #[tokio::test]
    async fn test_active_dial_failure_clears_plan() {
        let mut chan = channel();
        // Grab a port that is certainly closed by binding and dropping it.
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = match listener.local_addr().unwrap() {
            SocketAddr::V4(a) => a,
            _ => unreachable!(),
        };
        drop(listener);

        chan.arm_active(addr);
        assert!(chan.open_transfer().await.is_err());
        assert!(matches!(
            chan.open_transfer().await,
            Err(TransferError::NotArmed)
        ));
    }
}
