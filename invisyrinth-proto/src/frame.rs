//! Line framing for serial packet radios.
//!
//! Boards without a native radio talk to a radio module over UART. Each
//! datagram travels as one text line carrying both addresses:
//!
//! ```text
//! <src-hex12>><dst-hex12>:<payload>\n
//! ```
//!
//! Addresses are 12 lowercase hex digits (uppercase is accepted when
//! parsing). The payload runs to the end of the line, so it must not contain
//! a newline; every Invisyrinth payload is single-line ASCII.
//!
//! # Example
//!
//! ```
//! use invisyrinth_proto::frame::{encode_frame, parse_frame, MAX_FRAME_LEN};
//! use invisyrinth_proto::PeerAddress;
//!
//! let src = PeerAddress::new([0x74, 0x4d, 0xbd, 0xa1, 0x0a, 0xbc]);
//! let dst = PeerAddress::new([0xec, 0xda, 0x3b, 0x55, 0x13, 0xb4]);
//!
//! let mut buf = [0u8; MAX_FRAME_LEN];
//! let len = encode_frame(src, dst, b"0,1", &mut buf).unwrap();
//! assert_eq!(&buf[..len], b"744dbda10abc>ecda3b5513b4:0,1\n");
//!
//! let frame = parse_frame(&buf[..len]).unwrap();
//! assert_eq!(frame.src, src);
//! assert_eq!(frame.dst, dst);
//! assert_eq!(frame.payload, b"0,1");
//! ```

use crate::parser::{strip_line_ending, ParseError};
use crate::serialize::SerializeError;
use crate::types::{PeerAddress, MAX_PAYLOAD_LEN};

const ADDRESS_HEX_LEN: usize = 12;
const ADDRESS_SEPARATOR: u8 = b'>';
const PAYLOAD_SEPARATOR: u8 = b':';

/// Bytes before the payload: two addresses and two separators.
pub const FRAME_HEADER_LEN: usize = 2 * ADDRESS_HEX_LEN + 2;

/// Longest frame line, including the trailing newline.
pub const MAX_FRAME_LEN: usize = FRAME_HEADER_LEN + MAX_PAYLOAD_LEN + 1;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A parsed frame borrowing its payload from the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub src: PeerAddress,
    pub dst: PeerAddress,
    pub payload: &'a [u8],
}

impl Frame<'_> {
    /// Whether a node at `local` should accept this frame.
    #[must_use]
    pub fn is_for(&self, local: PeerAddress) -> bool {
        self.dst == local || self.dst == PeerAddress::BROADCAST
    }
}

/// Parse one received line (trailing CR/LF optional).
///
/// # Errors
///
/// - [`ParseError::Empty`] for a blank line
/// - [`ParseError::TooLong`] if the payload exceeds [`MAX_PAYLOAD_LEN`]
/// - [`ParseError::Format`] for a bad header
pub fn parse_frame(line: &[u8]) -> Result<Frame<'_>, ParseError> {
    let line = strip_line_ending(line);
    if line.is_empty() {
        return Err(ParseError::Empty);
    }
    if line.len() < FRAME_HEADER_LEN {
        return Err(ParseError::Format);
    }

    let (header, payload) = line.split_at(FRAME_HEADER_LEN);
    if header[ADDRESS_HEX_LEN] != ADDRESS_SEPARATOR || header[FRAME_HEADER_LEN - 1] != PAYLOAD_SEPARATOR
    {
        return Err(ParseError::Format);
    }
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ParseError::TooLong);
    }

    let src = parse_address(&header[..ADDRESS_HEX_LEN])?;
    let dst = parse_address(&header[ADDRESS_HEX_LEN + 1..FRAME_HEADER_LEN - 1])?;

    Ok(Frame { src, dst, payload })
}

/// Encode a frame line, newline included, into `buf`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`SerializeError::BufferTooSmall`] if the frame does not fit or
/// the payload exceeds [`MAX_PAYLOAD_LEN`].
pub fn encode_frame(
    src: PeerAddress,
    dst: PeerAddress,
    payload: &[u8],
    buf: &mut [u8],
) -> Result<usize, SerializeError> {
    let len = FRAME_HEADER_LEN + payload.len() + 1;
    if payload.len() > MAX_PAYLOAD_LEN || buf.len() < len {
        return Err(SerializeError::BufferTooSmall);
    }

    write_address(src, &mut buf[..ADDRESS_HEX_LEN]);
    buf[ADDRESS_HEX_LEN] = ADDRESS_SEPARATOR;
    write_address(dst, &mut buf[ADDRESS_HEX_LEN + 1..FRAME_HEADER_LEN - 1]);
    buf[FRAME_HEADER_LEN - 1] = PAYLOAD_SEPARATOR;
    buf[FRAME_HEADER_LEN..len - 1].copy_from_slice(payload);
    buf[len - 1] = b'\n';

    Ok(len)
}

fn parse_address(hex: &[u8]) -> Result<PeerAddress, ParseError> {
    let mut octets = [0u8; 6];
    for (octet, pair) in octets.iter_mut().zip(hex.chunks_exact(2)) {
        *octet = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
    }
    Ok(PeerAddress::new(octets))
}

#[inline]
fn hex_value(digit: u8) -> Result<u8, ParseError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(ParseError::Format),
    }
}

fn write_address(address: PeerAddress, out: &mut [u8]) {
    for (pair, octet) in out.chunks_exact_mut(2).zip(address.octets()) {
        pair[0] = HEX_DIGITS[usize::from(octet >> 4)];
        pair[1] = HEX_DIGITS[usize::from(octet & 0x0F)];
    }
}
