//! InventoryContent (0x31) — Server → Client.
//!
//! Replaces the full contents of a container window.

use bytes::BufMut;

use crate::item_stack::ItemStack;
use crate::wire::{ProtoEncode, VarUInt32};

#[derive(Debug, Clone)]
pub struct InventoryContent {
    pub window_id: u32,
    pub items: Vec<ItemStack>,
}

impl ProtoEncode for InventoryContent {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarUInt32(self.window_id).proto_encode(buf);
        VarUInt32(self.items.len() as u32).proto_encode(buf);
        for item in &self.items {
            item.proto_encode(buf);
        }
    }
}
