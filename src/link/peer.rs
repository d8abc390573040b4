//! UDP peer link to the remote sensor boards.
//!
//! The link plays the main-controller role: it pulls measurement snapshots from
//! the fixed peer on demand and accepts asynchronous pushes of legacy board
//! triplets from any board. With a snapshot source attached it can also play the
//! measurement-board role and answer requests, which is how a second hub (or the
//! `respond` subcommand) stands in for the real hardware.

use crate::error::{HubError, Result};
use crate::link::codec::{self, Frame};
use crate::link::config::LinkConfig;
use crate::vitals::data::RemoteSnapshot;
use crate::vitals::store::SampleStore;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info, warn};

/// Produces the snapshot an incoming request is answered with.
pub type SnapshotSource = Arc<dyn Fn() -> RemoteSnapshot + Send + Sync>;

const RECV_BUF_LEN: usize = 512;
const RESPONSE_POLL_MS: u64 = 20;

/// The peer data exchange endpoint.
#[derive(Clone)]
pub struct PeerLink {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    store: SampleStore,
    responder: Option<SnapshotSource>,
    response_wait: Duration,
}

impl PeerLink {
    /// Bind the local link socket and register the fixed peer.
    ///
    /// A bind failure is returned to the caller rather than halting, so a
    /// supervising layer can decide retry policy.
    pub async fn bind(config: &LinkConfig, store: SampleStore) -> Result<Self> {
        let bind_addr = config.bind_address()?;
        let peer = config.peer_address()?;

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| HubError::link_error(format!("Failed to bind link socket: {}", e)))?;

        Ok(Self {
            socket: Arc::new(socket),
            peer,
            store,
            responder: None,
            response_wait: Duration::from_millis(config.response_wait_ms),
        })
    }

    /// Attach a snapshot source so incoming requests are answered.
    pub fn with_responder(mut self, source: SnapshotSource) -> Self {
        self.responder = Some(source);
        self
    }

    /// The address the link socket actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// The fixed peer this link requests snapshots from.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Send a snapshot request to the peer and return immediately.
    ///
    /// The response, if any, arrives through the receive task. Send failures are
    /// logged and surfaced; there is no retry.
    pub async fn request_snapshot(&self) -> Result<()> {
        match self
            .socket
            .send_to(&codec::encode_legacy_request(), self.peer)
            .await
        {
            Ok(_) => {
                debug!("Snapshot request sent to {}", self.peer);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to send snapshot request to {}: {}", self.peer, e);
                Err(e.into())
            }
        }
    }

    /// Request a snapshot and wait (bounded) until the store's remote slot
    /// refreshes. Times out with a recoverable error; prior data stays in place.
    pub async fn await_snapshot(&self) -> Result<()> {
        let before = self.store.remote_revision().await;
        self.request_snapshot().await?;

        let refreshed = async {
            loop {
                if self.store.remote_revision().await != before {
                    return;
                }
                time::sleep(Duration::from_millis(RESPONSE_POLL_MS)).await;
            }
        };

        time::timeout(self.response_wait, refreshed)
            .await
            .map_err(|_| {
                HubError::timeout(format!(
                    "no snapshot response from {} within {}ms",
                    self.peer,
                    self.response_wait.as_millis()
                ))
            })
    }

    /// Spawn the receive task: decode every datagram and dispatch it into the
    /// store or the responder. Bad datagrams are logged and dropped; the task
    /// runs for the life of the process.
    pub fn spawn_receiver(&self) -> JoinHandle<()> {
        let socket = Arc::clone(&self.socket);
        let store = self.store.clone();
        let responder = self.responder.clone();

        tokio::spawn(async move {
            let mut buf = [0u8; RECV_BUF_LEN];
            loop {
                let (len, sender) = match socket.recv_from(&mut buf).await {
                    Ok(received) => received,
                    Err(e) => {
                        error!("Link receive failed: {}", e);
                        continue;
                    }
                };

                match codec::decode(&buf[..len]) {
                    Ok(Frame::Sample(sample)) => {
                        debug!("Board sample from {}: {:?}", sender, sample.board);
                        store.apply_board_sample(sample).await;
                    }
                    Ok(Frame::Snapshot(snapshot)) => {
                        debug!(
                            "Measurement snapshot from {}: {:.1} kg / {:.1} cm",
                            sender, snapshot.weight_kg, snapshot.height_cm
                        );
                        store.apply_remote_snapshot(snapshot).await;
                    }
                    Ok(Frame::Request) => match &responder {
                        Some(source) => {
                            let reply = codec::encode(&Frame::Snapshot(source()));
                            if let Err(e) = socket.send_to(&reply, sender).await {
                                warn!("Failed to answer snapshot request from {}: {}", sender, e);
                            }
                        }
                        None => debug!("Ignoring snapshot request from {}", sender),
                    },
                    Err(e) => {
                        warn!("Dropping undecodable datagram from {}: {}", sender, e);
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for PeerLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerLink")
            .field("peer", &self.peer)
            .field("responder", &self.responder.is_some())
            .field("response_wait", &self.response_wait)
            .finish()
    }
}

/// Bind the link, start its receive task and log the endpoints.
pub async fn start_link(config: &LinkConfig, store: SampleStore) -> Result<PeerLink> {
    let link = PeerLink::bind(config, store).await?;
    info!("Peer link listening on {}", link.local_addr()?);
    info!("Fixed peer: {}", link.peer_addr());
    let _receiver = link.spawn_receiver();
    Ok(link)
}
