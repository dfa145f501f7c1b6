//! Outgoing packet queue: the bridge from simulation hooks to the host's
//! network layer.
//!
//! Hooks never talk to sessions directly; they queue payloads here, addressed
//! to one viewer or to everyone near the block, and the host drains the queue
//! after each tick.

use blocktick_proto::packets::{
    ContainerClose, ContainerOpen, ContainerSetData, InventoryContent, InventorySlot, UpdateBlock,
};

use crate::block::ActorId;

/// A queued client-bound payload.
#[derive(Debug, Clone)]
pub enum ClientBound {
    ContainerOpen(ContainerOpen),
    ContainerClose(ContainerClose),
    ContainerSetData(ContainerSetData),
    InventorySlot(InventorySlot),
    InventoryContent(InventoryContent),
    UpdateBlock(UpdateBlock),
}

macro_rules! from_packet {
    ($variant:ident, $packet:ty) => {
        impl From<$packet> for ClientBound {
            fn from(p: $packet) -> Self {
                ClientBound::$variant(p)
            }
        }
    };
}

from_packet!(ContainerOpen, ContainerOpen);
from_packet!(ContainerClose, ContainerClose);
from_packet!(ContainerSetData, ContainerSetData);
from_packet!(InventorySlot, InventorySlot);
from_packet!(InventoryContent, InventoryContent);
from_packet!(UpdateBlock, UpdateBlock);

/// Packets queued during simulation, drained by the host each tick.
#[derive(Debug, Default)]
pub struct Outbox {
    directed: Vec<(ActorId, ClientBound)>,
    broadcast: Vec<ClientBound>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet for a single viewer.
    pub fn send_to(&mut self, actor: ActorId, packet: impl Into<ClientBound>) {
        self.directed.push((actor, packet.into()));
    }

    /// Queue a packet for every client near the block.
    pub fn broadcast(&mut self, packet: impl Into<ClientBound>) {
        self.broadcast.push(packet.into());
    }

    pub fn drain_directed(&mut self) -> Vec<(ActorId, ClientBound)> {
        std::mem::take(&mut self.directed)
    }

    pub fn drain_broadcast(&mut self) -> Vec<ClientBound> {
        std::mem::take(&mut self.broadcast)
    }

    pub fn is_empty(&self) -> bool {
        self.directed.is_empty() && self.broadcast.is_empty()
    }

    /// Directed packets queued so far (without draining).
    pub fn directed(&self) -> &[(ActorId, ClientBound)] {
        &self.directed
    }

    /// Broadcast packets queued so far (without draining).
    pub fn broadcasts(&self) -> &[ClientBound] {
        &self.broadcast
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocktick_proto::BlockPos;

    #[test]
    fn queue_and_drain() {
        let mut out = Outbox::new();
        assert!(out.is_empty());

        out.send_to(
            7,
            ContainerSetData {
                window_id: 1,
                property: 0,
                value: 50,
            },
        );
        out.broadcast(UpdateBlock::new(BlockPos::new(0, 64, 0), 42));
        assert!(!out.is_empty());
        assert_eq!(out.directed().len(), 1);
        assert_eq!(out.broadcasts().len(), 1);

        let directed = out.drain_directed();
        assert_eq!(directed.len(), 1);
        assert_eq!(directed[0].0, 7);
        assert!(matches!(directed[0].1, ClientBound::ContainerSetData(_)));

        let broadcast = out.drain_broadcast();
        assert!(matches!(broadcast[0], ClientBound::UpdateBlock(_)));
        assert!(out.is_empty());
    }
}
