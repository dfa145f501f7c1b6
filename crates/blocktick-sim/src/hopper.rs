//! Hopper transfer engine.
//!
//! Each tick a hopper attempts one push into the inventory it faces, then one
//! pull from the space above it (a block inventory, or loose item entities).
//! Each direction moves at most one unit per tick against block inventories;
//! a successful transfer re-arms the cooldown.

use blocktick_nbt::NbtTag;
use blocktick_proto::packets::{ContainerOpen, InventoryContent, InventorySlot};
use blocktick_proto::Vec3;

use crate::block::{
    BlockRef, BlockStore, CardinalDirection, DestroyContext, Facing, InteractContext,
    PlacementContext,
};
use crate::container::Container;
use crate::lifecycle::{drop_contents, BlockBehavior, TickContext};
use crate::outbox::Outbox;
use crate::world::WorldAccess;

/// Ticks between transfer attempts after a successful move.
pub const MAX_TRANSFER_COOLDOWN: i16 = 8;

/// Bedrock container type id for hoppers.
const CONTAINER_TYPE_HOPPER: u8 = 8;

/// Number of general-purpose slots.
const HOPPER_SLOTS: usize = 5;

/// Storage entry names owned by this family.
const PERSISTED_ENTRIES: [&str; 2] = ["Items", "TransferCooldown"];

pub struct HopperBehavior {
    container: Container,
    transfer_cooldown: i16,
    dirty: bool,
}

impl Default for HopperBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl HopperBehavior {
    pub fn new() -> Self {
        Self {
            container: Container::new(CONTAINER_TYPE_HOPPER, HOPPER_SLOTS),
            transfer_cooldown: 0,
            dirty: false,
        }
    }

    pub fn transfer_cooldown(&self) -> i16 {
        self.transfer_cooldown
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    fn persist_if_dirty(&mut self, store: &mut BlockStore) {
        if !self.dirty {
            return;
        }
        store.set("Items", self.container.to_items_tag());
        store.set("TransferCooldown", NbtTag::Short(self.transfer_cooldown));
        self.dirty = false;
    }

    /// Push one unit into the inventory the hopper faces.
    fn push_item(&mut self, block: &mut BlockRef<'_>, ctx: &mut TickContext<'_>) -> bool {
        let target_pos = block.facing.apply(block.position);
        let container = &mut self.container;
        let moved = ctx
            .with_inventory_at(target_pos, |target| transfer_one(container, target))
            .unwrap_or(false);
        if moved {
            self.dirty = true;
        }
        moved
    }

    /// Pull one unit from the block inventory above, or absorb a loose item
    /// entity occupying the space above.
    fn pull_item(&mut self, block: &mut BlockRef<'_>, ctx: &mut TickContext<'_>) -> bool {
        let above = block.position.offset(0, 1, 0);

        let container = &mut self.container;
        if let Some(moved) = ctx.with_inventory_at(above, |source| transfer_one(source, container))
        {
            if moved {
                self.dirty = true;
                return true;
            }
            // The inventory had nothing to give; loose items sharing the
            // space are still fair game.
        }

        let anchor = Vec3::new(above.x as f32, above.y as f32, above.z as f32);
        for id in ctx.world.loose_items_near(anchor, 1.0) {
            let Some((position, stack)) = ctx
                .world
                .loose_item(id)
                .map(|e| (e.position, e.stack.clone()))
            else {
                continue;
            };
            if position.floor() != above {
                continue;
            }

            let mut remaining = stack.count;

            // Top up existing stacks first.
            for i in 0..self.container.size() {
                if remaining == 0 {
                    break;
                }
                let Some(slot) = self.container.item_mut(i) else {
                    continue;
                };
                if slot.can_absorb(&stack) {
                    let moved = slot.space_left().min(remaining);
                    slot.increment(moved);
                    remaining -= moved;
                }
            }

            // Then place leftovers into empty slots.
            for i in 0..self.container.size() {
                if remaining == 0 {
                    break;
                }
                if self.container.item(i).is_some_and(|s| s.is_empty()) {
                    let placed_count = stack.max_stack.min(remaining);
                    let mut placed = stack.clone();
                    placed.set_count(placed_count);
                    self.container.set_item(i, placed);
                    remaining -= placed_count;
                }
            }

            let absorbed = stack.count - remaining;
            if absorbed == 0 {
                continue;
            }

            // Despawn only when everything was stored.
            if remaining == 0 {
                ctx.world.despawn_loose_item(id);
            } else if let Some(entity) = ctx.world.loose_item(id) {
                entity.stack.set_count(remaining);
            }
            self.dirty = true;
            return true;
        }

        false
    }
}

/// Move one unit from the first transferable slot of `source` into `target`:
/// top up a same-item stack below its maximum, else fill the first empty
/// slot. Slots scan in ascending order, first fit wins.
fn transfer_one(source: &mut Container, target: &mut Container) -> bool {
    for i in 0..source.size() {
        let item = match source.item(i) {
            Some(s) if !s.is_empty() => s.clone(),
            _ => continue,
        };

        for j in 0..target.size() {
            let Some(existing) = target.item(j) else {
                continue;
            };
            if existing.can_absorb(&item) {
                if let Some(slot) = target.item_mut(j) {
                    slot.increment(1);
                }
                source.remove_item(i, 1);
                return true;
            }
            if existing.is_empty() {
                let mut moved = item.clone();
                moved.set_count(1);
                target.set_item(j, moved);
                source.remove_item(i, 1);
                return true;
            }
        }
    }
    false
}

impl BlockBehavior for HopperBehavior {
    fn on_attach(&mut self, block: &mut BlockRef<'_>) {
        self.transfer_cooldown = block.store.get_short("TransferCooldown").unwrap_or(0);

        if let Some(items) = block.store.get("Items").cloned() {
            self.container.load_items_tag(&items);
        } else {
            block.store.set("Items", NbtTag::List(Vec::new()));
        }
    }

    fn on_place(&mut self, block: &mut BlockRef<'_>, ctx: &PlacementContext) {
        if ctx.actor.is_none() {
            return;
        }
        let pitch = ctx.pitch.ceil();
        *block.facing = if pitch >= 80.0 || pitch <= -70.0 {
            Facing::Down
        } else {
            match ctx.cardinal {
                CardinalDirection::North => Facing::North,
                CardinalDirection::South => Facing::South,
                CardinalDirection::East => Facing::East,
                CardinalDirection::West => Facing::West,
            }
        };
    }

    fn on_interact(
        &mut self,
        block: &mut BlockRef<'_>,
        ctx: &InteractContext,
        out: &mut Outbox,
    ) -> bool {
        if ctx.cancelled || ctx.placing_block {
            return false;
        }
        let Some(actor) = ctx.actor else {
            return false;
        };
        if ctx.sneaking {
            return false;
        }

        self.persist_if_dirty(block.store);
        let window_id = self.container.open_for(actor);
        out.send_to(
            actor,
            ContainerOpen::block(window_id, CONTAINER_TYPE_HOPPER, block.position),
        );
        out.send_to(
            actor,
            InventoryContent {
                window_id: window_id as u32,
                items: self.container.stacks().to_vec(),
            },
        );
        true
    }

    fn on_tick(&mut self, block: &mut BlockRef<'_>, ctx: &mut TickContext<'_>) {
        // Visual slot sync: refresh the first occupied slot for viewers, one
        // per tick.
        if let Some(slot) = self.container.first_occupied() {
            let item = self.container.item(slot).cloned().unwrap_or_default();
            for (actor, window_id) in self.container.viewers() {
                ctx.out.send_to(
                    actor,
                    InventorySlot {
                        window_id: window_id as u32,
                        slot: slot as u32,
                        item: item.clone(),
                    },
                );
            }
            self.dirty = true;
            self.persist_if_dirty(block.store);
        }

        if self.transfer_cooldown > 0 {
            self.transfer_cooldown -= 1;
            self.dirty = true;
            self.persist_if_dirty(block.store);
            return;
        }

        let mut did_transfer = false;

        if self.container.empty_slot_count() != 0 {
            did_transfer = self.push_item(block, ctx);
        }

        if !self.container.is_full() && self.pull_item(block, ctx) {
            did_transfer = true;
        }

        if did_transfer {
            self.transfer_cooldown = MAX_TRANSFER_COOLDOWN;
            self.dirty = true;
        }

        self.persist_if_dirty(block.store);
    }

    fn on_destroy(
        &mut self,
        block: &mut BlockRef<'_>,
        ctx: &DestroyContext,
        world: &mut dyn WorldAccess,
    ) {
        if ctx.cancelled || ctx.actor.is_none() {
            return;
        }
        drop_contents(&mut self.container, block.position, world);
        for name in PERSISTED_ENTRIES {
            block.store.delete(name);
        }
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        Some(&mut self.container)
    }
}
