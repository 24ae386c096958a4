//! Datagram link trait and error types.
//!
//! The link is best effort: datagrams may be lost, duplicated or reordered,
//! and nothing is acknowledged. Both sessions are written so that any such
//! datagram either takes effect once or not at all.

use core::future::Future;
use heapless::Vec;
use invisyrinth_proto::{Payload, PeerAddress};

/// Error type for link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Radio/communication I/O error; the datagram is gone.
    SendFailed,
    /// Destination was never registered.
    UnknownPeer,
    /// Payload exceeds [`invisyrinth_proto::MAX_PAYLOAD_LEN`].
    PayloadTooLong,
    /// No room left to register another peer.
    PeerTableFull,
}

/// Outcome of registering a peer. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerRegistration {
    Added,
    AlreadyKnown,
}

/// A received datagram and the address it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub peer: PeerAddress,
    pub payload: Payload,
}

impl Datagram {
    /// Copy `payload` into a datagram.
    pub fn new(peer: PeerAddress, payload: &[u8]) -> Result<Self, LinkError> {
        let payload = Vec::from_slice(payload).map_err(|_| LinkError::PayloadTooLong)?;
        Ok(Self { peer, payload })
    }
}

/// Peer-addressed, unordered, unacknowledged datagram transport.
///
/// This trait abstracts the wireless medium so sessions can run over
/// ESP-NOW, a serial packet radio, or an in-memory queue in tests.
pub trait Link {
    /// Send one datagram. A failure is final; nothing is retried.
    fn send(&mut self, peer: PeerAddress, payload: &[u8]) -> Result<(), LinkError>;

    /// Take the next queued datagram without waiting.
    fn try_recv(&mut self) -> Option<Datagram>;

    /// Wait for the next datagram.
    fn recv(&mut self) -> impl Future<Output = Datagram>;

    /// Make `peer` a valid destination. Registering twice is not an error.
    fn register_peer(&mut self, peer: PeerAddress) -> Result<PeerRegistration, LinkError>;
}

/// Fixed-capacity set of registered peers.
#[derive(Debug, Clone, Default)]
pub struct PeerTable<const N: usize> {
    peers: Vec<PeerAddress, N>,
}

impl<const N: usize> PeerTable<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { peers: Vec::new() }
    }

    /// Idempotent insert.
    pub fn register(&mut self, peer: PeerAddress) -> Result<PeerRegistration, LinkError> {
        if self.contains(&peer) {
            return Ok(PeerRegistration::AlreadyKnown);
        }
        self.peers
            .push(peer)
            .map_err(|_| LinkError::PeerTableFull)?;
        Ok(PeerRegistration::Added)
    }

    #[must_use]
    pub fn contains(&self, peer: &PeerAddress) -> bool {
        self.peers.contains(peer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

/// Register a peer and log the outcome; used by both sessions at startup.
pub(crate) fn register_logged<L: Link>(link: &mut L, peer: PeerAddress, role: &str) {
    match link.register_peer(peer) {
        Ok(PeerRegistration::Added) => info!("{} peer added: {}", role, peer),
        Ok(PeerRegistration::AlreadyKnown) => info!("{} peer already registered: {}", role, peer),
        Err(e) => error!("{} peer registration failed: {:?}", role, e),
    }
}
