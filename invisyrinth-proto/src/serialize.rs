//! Protocol serialization for commands and statuses.
//!
//! # Example
//!
//! ```
//! use invisyrinth_proto::{Command, MoveVector, Serialize};
//!
//! let mut buf = [0u8; 8];
//! let len = Command::Step(MoveVector::UP).serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"-1,0");
//! ```

use crate::types::{Command, MoveVector, Status, MAX_PAYLOAD_LEN};
use heapless::Vec;

/// Datagram payload buffer.
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized message.
    BufferTooSmall,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// Bounds-checked cursor over an output buffer.
struct SerializeBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SerializeBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write(&mut self, byte: u8) -> Result<(), SerializeError> {
        let slot = self
            .buf
            .get_mut(self.pos)
            .ok_or(SerializeError::BufferTooSmall)?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) -> Result<(), SerializeError> {
        for &b in bytes {
            self.write(b)?;
        }
        Ok(())
    }

    /// Vector components are always in `-1..=1`.
    #[inline]
    fn write_component(&mut self, value: i8) -> Result<(), SerializeError> {
        if value < 0 {
            self.write(b'-')?;
        }
        self.write(b'0' + value.unsigned_abs())
    }

    fn write_vector(&mut self, vector: MoveVector) -> Result<(), SerializeError> {
        self.write_component(vector.dr())?;
        self.write(b',')?;
        self.write_component(vector.dc())
    }

    #[inline]
    fn finish(self) -> usize {
        self.pos
    }
}

/// Serialization into the wire text format.
pub trait Serialize {
    /// Serialize to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError>;

    /// Serialize into a datagram payload.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the message exceeds the payload limit.
    fn to_payload(&self) -> Result<Payload, SerializeError> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let len = self.serialize(&mut buf)?;
        Vec::from_slice(&buf[..len]).map_err(|_| SerializeError::BufferTooSmall)
    }
}

impl Serialize for Command {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);
        match self {
            Command::Step(vector) => sb.write_vector(*vector)?,
            Command::Reset => sb.write_slice(b"reset")?,
        }
        Ok(sb.finish())
    }
}

impl Serialize for Status {
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut sb = SerializeBuf::new(buf);
        match self {
            Status::Ok => sb.write_slice(b"ok")?,
            Status::Wall(vector) => {
                sb.write_slice(b"wall,")?;
                sb.write_vector(*vector)?;
            }
            Status::Goal => sb.write_slice(b"goal")?,
            Status::ResetOk => sb.write_slice(b"reset_ok")?,
            Status::Unknown(text) => sb.write_slice(text.as_bytes())?,
        }
        Ok(sb.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized<T: Serialize>(msg: &T) -> Payload {
        msg.to_payload().unwrap()
    }

    #[test]
    fn test_serialize_steps() {
        assert_eq!(serialized(&Command::Step(MoveVector::UP)).as_slice(), b"-1,0");
        assert_eq!(serialized(&Command::Step(MoveVector::DOWN)).as_slice(), b"1,0");
        assert_eq!(serialized(&Command::Step(MoveVector::LEFT)).as_slice(), b"0,-1");
        assert_eq!(serialized(&Command::Step(MoveVector::RIGHT)).as_slice(), b"0,1");
    }

    #[test]
    fn test_serialize_reset() {
        assert_eq!(serialized(&Command::Reset).as_slice(), b"reset");
    }

    #[test]
    fn test_serialize_statuses() {
        assert_eq!(serialized(&Status::Ok).as_slice(), b"ok");
        assert_eq!(serialized(&Status::Goal).as_slice(), b"goal");
        assert_eq!(serialized(&Status::ResetOk).as_slice(), b"reset_ok");
        assert_eq!(serialized(&Status::Wall(MoveVector::LEFT)).as_slice(), b"wall,0,-1");
        assert_eq!(serialized(&Status::unknown("huh")).as_slice(), b"huh");
    }

    #[test]
    fn test_serialize_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert_eq!(
            Status::ResetOk.serialize(&mut buf),
            Err(SerializeError::BufferTooSmall)
        );
        assert_eq!(
            Command::Step(MoveVector::UP).serialize(&mut buf),
            Err(SerializeError::BufferTooSmall)
        );
    }

    #[test]
    fn test_wall_status_parses_back() {
        let payload = serialized(&Status::Wall(MoveVector::DOWN));
        assert_eq!(
            crate::parse_status(&payload),
            Ok(Status::Wall(MoveVector::DOWN))
        );
    }
}
