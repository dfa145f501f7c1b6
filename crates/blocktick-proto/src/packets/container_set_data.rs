//! ContainerSetData (0x33) — Server → Client.
//!
//! Updates a single numeric property of an open container. Drives the furnace
//! UI arrows (cook progress, fuel burn).

use bytes::BufMut;

use crate::wire::{ProtoEncode, VarInt};

/// Furnace cook progress property.
pub const PROPERTY_FURNACE_TICK_COUNT: i32 = 0;
/// Remaining fuel burn time property.
pub const PROPERTY_FURNACE_LIT_TIME: i32 = 1;
/// Nominal duration of the current fuel charge.
pub const PROPERTY_FURNACE_LIT_DURATION: i32 = 2;

#[derive(Debug, Clone)]
pub struct ContainerSetData {
    pub window_id: u8,
    pub property: i32,
    pub value: i32,
}

impl ProtoEncode for ContainerSetData {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.window_id);
        VarInt(self.property).proto_encode(buf);
        VarInt(self.value).proto_encode(buf);
    }
}
