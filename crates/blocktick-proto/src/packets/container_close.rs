//! ContainerClose (0x2F) — both directions.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::wire::{ProtoDecode, ProtoEncode};

#[derive(Debug, Clone)]
pub struct ContainerClose {
    pub window_id: u8,
    /// Whether the server initiated the close.
    pub server_initiated: bool,
}

impl ProtoEncode for ContainerClose {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.window_id);
        buf.put_u8(self.server_initiated as u8);
    }
}

impl ProtoDecode for ContainerClose {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        if buf.remaining() < 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 2,
                remaining: buf.remaining(),
            });
        }
        Ok(Self {
            window_id: buf.get_u8(),
            server_initiated: buf.get_u8() != 0,
        })
    }
}
