//! Test doubles shared by the crate's unit tests.

use std::collections::{BTreeMap, HashMap};

use blocktick_proto::{BlockPos, ItemStack, Vec3};

use crate::block::ActorId;
use crate::container::Container;
use crate::world::{LooseItem, WorldAccess};

/// In-memory world: a block map, a fixed identifier → permutation palette,
/// host-owned inventories, and loose item entities.
pub(crate) struct TestWorld {
    pub blocks: HashMap<BlockPos, u32>,
    pub palette: HashMap<String, u32>,
    pub external: HashMap<BlockPos, Container>,
    pub items: BTreeMap<u64, LooseItem>,
    pub players: Vec<ActorId>,
    pub despawned: Vec<u64>,
    pub spawned_motions: Vec<Vec3>,
    next_item_id: u64,
}

impl TestWorld {
    pub fn new() -> Self {
        let palette = [
            ("minecraft:furnace", 100),
            ("minecraft:lit_furnace", 101),
            ("minecraft:blast_furnace", 102),
            ("minecraft:lit_blast_furnace", 103),
            ("minecraft:smoker", 104),
            ("minecraft:lit_smoker", 105),
            ("minecraft:hopper", 110),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            blocks: HashMap::new(),
            palette,
            external: HashMap::new(),
            items: BTreeMap::new(),
            players: Vec::new(),
            despawned: Vec::new(),
            spawned_motions: Vec::new(),
            next_item_id: 1,
        }
    }

    /// Place a block of `identifier` at `pos` using the palette id.
    pub fn put_block(&mut self, pos: BlockPos, identifier: &str) {
        let rid = self.palette[identifier];
        self.blocks.insert(pos, rid);
    }

    pub fn add_loose_item(&mut self, position: Vec3, stack: ItemStack) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.insert(id, LooseItem { position, stack });
        id
    }
}

impl WorldAccess for TestWorld {
    fn block_at(&self, pos: BlockPos) -> Option<u32> {
        self.blocks.get(&pos).copied()
    }

    fn set_block(&mut self, pos: BlockPos, runtime_id: u32) {
        self.blocks.insert(pos, runtime_id);
    }

    fn resolve_permutation(&self, identifier: &str, _like: u32) -> Option<u32> {
        self.palette.get(identifier).copied()
    }

    fn with_external_inventory(
        &mut self,
        pos: BlockPos,
        f: &mut dyn FnMut(&mut Container) -> bool,
    ) -> Option<bool> {
        self.external.get_mut(&pos).map(f)
    }

    fn loose_items_near(&self, center: Vec3, radius: f32) -> Vec<u64> {
        self.items
            .iter()
            .filter(|(_, item)| item.position.distance(&center) <= radius)
            .map(|(&id, _)| id)
            .collect()
    }

    fn loose_item(&mut self, id: u64) -> Option<&mut LooseItem> {
        self.items.get_mut(&id)
    }

    fn despawn_loose_item(&mut self, id: u64) {
        self.items.remove(&id);
        self.despawned.push(id);
    }

    fn spawn_loose_item(&mut self, stack: ItemStack, position: Vec3, motion: Vec3) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.insert(id, LooseItem { position, stack });
        self.spawned_motions.push(motion);
        id
    }

    fn players(&self) -> Vec<ActorId> {
        self.players.clone()
    }
}
