//! Serial packet radio link.
//!
//! The RP2040 has no radio of its own; a radio module (an ESP32 running an
//! ESP-NOW bridge, for example) hangs off UART0 and exchanges one text line
//! per datagram:
//!
//! ```text
//! <src-hex12>><dst-hex12>:<payload>\n
//! ```
//!
//! See [`invisyrinth_proto::frame`] for the line format.
//!
//! Receiving is split off into [`RadioReceiver`], which runs in its own
//! task and hands complete datagrams to the [`RadioLink`] over an
//! [`Inbox`] channel. Sending writes the frame straight to the UART.

use crate::config::{INBOX_DEPTH, MAX_PEERS};
use defmt::{debug, warn};
use embassy_rp::uart::{Async, Error as UartError, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use heapless::Vec;
use invisyrinth_core::{Datagram, Link, LinkError, PeerAddress, PeerRegistration, PeerTable};
use invisyrinth_proto::frame::{encode_frame, parse_frame, MAX_FRAME_LEN};
use invisyrinth_proto::ParseError;

/// Datagrams waiting for the session.
pub type Inbox = Channel<CriticalSectionRawMutex, Datagram, INBOX_DEPTH>;

/// Error type for the receive side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum RadioError {
    /// UART framing/parity/break error.
    Uart,
    /// Line longer than [`MAX_FRAME_LEN`]; the rest of it was discarded.
    Overflow,
    /// Line did not parse as a frame.
    Frame(ParseError),
}

/// Convert UART errors to [`RadioError`].
#[inline]
fn uart_error_to_radio_error(e: UartError) -> RadioError {
    match e {
        UartError::Overrun => RadioError::Overflow,
        _ => RadioError::Uart,
    }
}

/// [`Link`] over a serial packet radio.
pub struct RadioLink<'d> {
    tx: UartTx<'d, Async>,
    local: PeerAddress,
    peers: PeerTable<MAX_PEERS>,
    inbox: Receiver<'d, CriticalSectionRawMutex, Datagram, INBOX_DEPTH>,
    frame: [u8; MAX_FRAME_LEN],
}

impl<'d> RadioLink<'d> {
    /// Create a link that sends as `local` and receives from `inbox`.
    #[must_use]
    pub fn new(
        tx: UartTx<'d, Async>,
        local: PeerAddress,
        inbox: Receiver<'d, CriticalSectionRawMutex, Datagram, INBOX_DEPTH>,
    ) -> Self {
        Self {
            tx,
            local,
            peers: PeerTable::new(),
            inbox,
            frame: [0; MAX_FRAME_LEN],
        }
    }
}

impl Link for RadioLink<'_> {
    fn send(&mut self, peer: PeerAddress, payload: &[u8]) -> Result<(), LinkError> {
        if !self.peers.contains(&peer) {
            return Err(LinkError::UnknownPeer);
        }

        let len = encode_frame(self.local, peer, payload, &mut self.frame)
            .map_err(|_| LinkError::PayloadTooLong)?;

        // At most a few milliseconds at the radio baud rate.
        self.tx
            .blocking_write(&self.frame[..len])
            .map_err(|_| LinkError::SendFailed)
    }

    fn try_recv(&mut self) -> Option<Datagram> {
        self.inbox.try_receive().ok()
    }

    async fn recv(&mut self) -> Datagram {
        self.inbox.receive().await
    }

    fn register_peer(&mut self, peer: PeerAddress) -> Result<PeerRegistration, LinkError> {
        self.peers.register(peer)
    }
}

/// Receive half: reads frame lines from the UART.
pub struct RadioReceiver<'d> {
    rx: UartRx<'d, Async>,
    local: PeerAddress,
    buffer: Vec<u8, MAX_FRAME_LEN>,
}

impl<'d> RadioReceiver<'d> {
    /// Create a receiver accepting frames for `local` and broadcast.
    #[must_use]
    pub fn new(rx: UartRx<'d, Async>, local: PeerAddress) -> Self {
        Self {
            rx,
            local,
            buffer: Vec::new(),
        }
    }

    /// Forward every datagram addressed to this node into `inbox`.
    ///
    /// A full inbox drops the datagram, like a congested radio would.
    pub async fn run(
        &mut self,
        inbox: Sender<'d, CriticalSectionRawMutex, Datagram, INBOX_DEPTH>,
    ) -> ! {
        loop {
            match self.receive().await {
                Ok(Some(datagram)) => {
                    if inbox.try_send(datagram).is_err() {
                        warn!("Inbox full, datagram dropped");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Radio receive error: {:?}", e),
            }
        }
    }

    /// Read one frame line. `Ok(None)` if it was addressed to another node.
    pub async fn receive(&mut self) -> Result<Option<Datagram>, RadioError> {
        self.read_line().await?;

        let frame = parse_frame(&self.buffer).map_err(RadioError::Frame)?;
        if !frame.is_for(self.local) {
            debug!("Ignoring frame for {}", frame.dst);
            return Ok(None);
        }

        // parse_frame already enforces the payload limit.
        Datagram::new(frame.src, frame.payload)
            .map(Some)
            .map_err(|_| RadioError::Frame(ParseError::TooLong))
    }

    /// Read bytes until a newline is found or buffer is full.
    ///
    /// If a line exceeds the buffer capacity, the rest of the line is
    /// discarded to prevent cascading parse errors on subsequent reads.
    async fn read_line(&mut self) -> Result<(), RadioError> {
        self.buffer.clear();
        let mut byte = [0u8; 1];

        loop {
            self.rx
                .read(&mut byte)
                .await
                .map_err(uart_error_to_radio_error)?;

            if byte[0] == b'\n' {
                return Ok(());
            }

            if self.buffer.push(byte[0]).is_err() {
                loop {
                    self.rx
                        .read(&mut byte)
                        .await
                        .map_err(uart_error_to_radio_error)?;
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                return Err(RadioError::Overflow);
            }
        }
    }
}
