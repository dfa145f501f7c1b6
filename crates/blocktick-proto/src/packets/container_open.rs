//! ContainerOpen (0x2E) — Server → Client.
//!
//! Opens a container window (furnace, hopper, ...) on the client.

use bytes::BufMut;

use crate::types::BlockPos;
use crate::wire::{ProtoEncode, VarLong};

#[derive(Debug, Clone)]
pub struct ContainerOpen {
    /// Window ID for this container session.
    pub window_id: u8,
    /// Container type (2 = furnace, 8 = hopper, 27 = blast furnace, 28 = smoker).
    pub container_type: u8,
    /// Position of the container block.
    pub position: BlockPos,
    /// Entity unique ID (-1 for block containers).
    pub entity_unique_id: i64,
}

impl ContainerOpen {
    /// Open a block container at `position`.
    pub fn block(window_id: u8, container_type: u8, position: BlockPos) -> Self {
        Self {
            window_id,
            container_type,
            position,
            entity_unique_id: -1,
        }
    }
}

impl ProtoEncode for ContainerOpen {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.window_id);
        buf.put_u8(self.container_type);
        self.position.proto_encode(buf);
        VarLong(self.entity_unique_id).proto_encode(buf);
    }
}
