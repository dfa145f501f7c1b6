//! Narrow interfaces onto the hosting world.
//!
//! The simulation consumes these; it never owns chunks, entities, or the
//! block palette.

use blocktick_proto::{BlockPos, ItemStack, Vec3};

use crate::block::ActorId;
use crate::container::Container;

/// A dropped item stack living in the world.
#[derive(Debug, Clone)]
pub struct LooseItem {
    pub position: Vec3,
    pub stack: ItemStack,
}

/// View of the hosting dimension consumed by block simulations.
///
/// Implemented by the host server (and by the test world double). All calls
/// are synchronous and local; nothing here blocks.
pub trait WorldAccess {
    /// Runtime permutation id of the block at `pos`, or `None` if unloaded.
    fn block_at(&self, pos: BlockPos) -> Option<u32>;

    /// Swap the block at `pos` to a new permutation.
    fn set_block(&mut self, pos: BlockPos, runtime_id: u32);

    /// Resolve the permutation of `identifier` carrying the same remaining
    /// state bits as the `like` permutation (furnace → lit furnace keeps its
    /// facing, for example).
    fn resolve_permutation(&self, identifier: &str, like: u32) -> Option<u32>;

    /// Run `f` against an inventory exposed by a host-owned block at `pos`
    /// (a chest, say). Returns `None` when the block has no inventory.
    fn with_external_inventory(
        &mut self,
        pos: BlockPos,
        f: &mut dyn FnMut(&mut Container) -> bool,
    ) -> Option<bool>;

    /// Ids of loose item entities within `radius` of `center`.
    fn loose_items_near(&self, center: Vec3, radius: f32) -> Vec<u64>;

    /// Access a loose item entity by id.
    fn loose_item(&mut self, id: u64) -> Option<&mut LooseItem>;

    /// Remove a fully-absorbed loose item entity.
    fn despawn_loose_item(&mut self, id: u64);

    /// Spawn a dropped stack with an initial motion vector; returns its id.
    fn spawn_loose_item(&mut self, stack: ItemStack, position: Vec3, motion: Vec3) -> u64;

    /// Actors currently present in the dimension.
    fn players(&self) -> Vec<ActorId>;
}
