//! AddItemEntity (0x0F) — Server → Client.
//!
//! Spawns a loose item entity (a dropped stack) with an initial motion vector.

use bytes::BufMut;

use crate::item_stack::ItemStack;
use crate::types::Vec3;
use crate::wire::{ProtoEncode, VarLong, VarUInt32, VarUInt64};

#[derive(Debug, Clone)]
pub struct AddItemEntity {
    pub entity_unique_id: i64,
    pub entity_runtime_id: u64,
    pub item: ItemStack,
    pub position: Vec3,
    pub motion: Vec3,
    pub from_fishing: bool,
}

impl ProtoEncode for AddItemEntity {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarLong(self.entity_unique_id).proto_encode(buf);
        VarUInt64(self.entity_runtime_id).proto_encode(buf);
        self.item.proto_encode(buf);
        self.position.proto_encode(buf);
        self.motion.proto_encode(buf);
        VarUInt32(0).proto_encode(buf); // metadata (none)
        buf.put_u8(self.from_fishing as u8);
    }
}
