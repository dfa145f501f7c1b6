//! InventorySlot (0x32) — Server → Client.
//!
//! Replaces a single slot of a container window.

use bytes::BufMut;

use crate::item_stack::ItemStack;
use crate::wire::{ProtoEncode, VarUInt32};

#[derive(Debug, Clone)]
pub struct InventorySlot {
    pub window_id: u32,
    pub slot: u32,
    pub item: ItemStack,
}

impl ProtoEncode for InventorySlot {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarUInt32(self.window_id).proto_encode(buf);
        VarUInt32(self.slot).proto_encode(buf);
        self.item.proto_encode(buf);
    }
}
