//! Smelting state machine shared by furnace, blast furnace, and smoker.
//!
//! One instance owns the cook/burn timers for one placed station. The tick
//! hook advances the timers, swaps the lit/unlit block variant, and places
//! output; every mutation is batched behind the dirty flag and flushed before
//! the hook returns.

use blocktick_nbt::NbtTag;
use blocktick_proto::packets::container_set_data::{
    PROPERTY_FURNACE_LIT_DURATION, PROPERTY_FURNACE_LIT_TIME, PROPERTY_FURNACE_TICK_COUNT,
};
use blocktick_proto::packets::{ContainerOpen, ContainerSetData, InventoryContent, UpdateBlock};
use blocktick_proto::{BlockPos, ItemStack};

use crate::block::{BlockRef, BlockStore, DestroyContext, InteractContext};
use crate::container::Container;
use crate::lifecycle::{drop_contents, BlockBehavior, TickContext};
use crate::outbox::Outbox;
use crate::smelting::{self, FurnaceKind};
use crate::world::WorldAccess;

/// Input slot index.
const SLOT_INPUT: usize = 0;
/// Fuel slot index.
const SLOT_FUEL: usize = 1;
/// Output slot index.
const SLOT_OUTPUT: usize = 2;

/// Storage entry names owned by this family.
const PERSISTED_ENTRIES: [&str; 5] = ["Items", "CookTime", "BurnDuration", "BurnTime", "StoredXp"];

/// Cook progress gained per burning tick.
const COOK_RATE: i16 = 2;

pub struct FurnaceBehavior {
    kind: FurnaceKind,
    /// How many smeltable-table entries lookups may consider (0 = all).
    scan_limit: usize,
    container: Container,
    cook_time: i16,
    burn_time: i16,
    burn_duration: i16,
    stored_xp: f32,
    dirty: bool,
}

impl FurnaceBehavior {
    pub fn new(kind: FurnaceKind, scan_limit: usize) -> Self {
        Self {
            kind,
            scan_limit,
            container: Container::new(kind.container_type(), 3),
            cook_time: 0,
            burn_time: 0,
            burn_duration: 0,
            stored_xp: 0.0,
            dirty: false,
        }
    }

    pub fn kind(&self) -> FurnaceKind {
        self.kind
    }

    pub fn cook_time(&self) -> i16 {
        self.cook_time
    }

    pub fn burn_time(&self) -> i16 {
        self.burn_time
    }

    pub fn burn_duration(&self) -> i16 {
        self.burn_duration
    }

    pub fn stored_xp(&self) -> f32 {
        self.stored_xp
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Write timers and container contents through the storage adapter, but
    /// only when something actually changed since the last flush.
    fn persist_if_dirty(&mut self, store: &mut BlockStore) {
        if !self.dirty {
            return;
        }
        store.set("Items", self.container.to_items_tag());
        store.set("CookTime", NbtTag::Short(self.cook_time));
        store.set("BurnDuration", NbtTag::Short(self.burn_duration));
        store.set("BurnTime", NbtTag::Short(self.burn_time));
        store.set("StoredXp", NbtTag::Float(self.stored_xp));
        self.dirty = false;
    }

    /// Send the three timer values to every viewer.
    fn send_ui(&self, out: &mut Outbox) {
        for (actor, window_id) in self.container.viewers() {
            out.send_to(
                actor,
                ContainerSetData {
                    window_id,
                    property: PROPERTY_FURNACE_TICK_COUNT,
                    value: self.cook_time as i32,
                },
            );
            out.send_to(
                actor,
                ContainerSetData {
                    window_id,
                    property: PROPERTY_FURNACE_LIT_TIME,
                    value: self.burn_time as i32,
                },
            );
            out.send_to(
                actor,
                ContainerSetData {
                    window_id,
                    property: PROPERTY_FURNACE_LIT_DURATION,
                    value: self.burn_duration as i32,
                },
            );
        }
    }

    /// Swap to the lit or unlit block variant, keeping the other state bits,
    /// and announce the change to the whole area.
    fn set_lit(&self, lit: bool, pos: BlockPos, ctx: &mut TickContext<'_>) {
        let identifier = if lit {
            self.kind.lit_identifier()
        } else {
            self.kind.identifier()
        };
        let Some(current) = ctx.world.block_at(pos) else {
            return;
        };
        let Some(target) = ctx.world.resolve_permutation(identifier, current) else {
            return;
        };
        if target == current {
            return;
        }
        ctx.world.set_block(pos, target);
        ctx.out.broadcast(UpdateBlock::new(pos, target));
    }

    /// Decrement the fuel charge. Returns the lit state to force: `Some(true)`
    /// while the charge still burns, `Some(false)` the moment it runs out
    /// (which also zeroes the nominal duration and costs one tick of cook
    /// progress), `None` when there was no charge at all.
    fn step_burn(&mut self) -> Option<bool> {
        if self.burn_time > 0 {
            self.burn_time -= 1;
            self.dirty = true;
            Some(true)
        } else if self.burn_duration != 0 {
            self.burn_duration = 0;
            self.cook_time = (self.cook_time - 1).max(0);
            self.dirty = true;
            Some(false)
        } else {
            None
        }
    }
}

impl BlockBehavior for FurnaceBehavior {
    fn on_attach(&mut self, block: &mut BlockRef<'_>) {
        self.cook_time = block.store.get_short("CookTime").unwrap_or(0);
        self.burn_duration = block.store.get_short("BurnDuration").unwrap_or(0);
        self.burn_time = block.store.get_short("BurnTime").unwrap_or(0);
        self.stored_xp = block.store.get_float("StoredXp").unwrap_or(0.0);

        if let Some(items) = block.store.get("Items").cloned() {
            self.container.load_items_tag(&items);
        } else {
            block.store.set("Items", NbtTag::List(Vec::new()));
        }
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
            ContainerOpen::block(window_id, self.kind.container_type(), block.position),
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
        if self.burn_time < 0 {
            self.burn_time = 0;
        }

        let tables = smelting::tables();
        let input = self.container.item(SLOT_INPUT).cloned().unwrap_or_default();
        let fuel = self.container.item(SLOT_FUEL).cloned().unwrap_or_default();

        let smeltable = if input.is_empty() {
            None
        } else {
            tables.find_smeltable(&input.identifier, self.kind, self.scan_limit)
        };

        // No input or nothing to smelt it into: lose progress, keep decaying
        // any remaining fuel charge.
        let Some(smeltable) = smeltable else {
            if self.cook_time != 0 {
                self.cook_time = 0;
                self.dirty = true;
            }
            self.set_lit(false, block.position, ctx);
            if let Some(forced) = self.step_burn() {
                self.set_lit(forced, block.position, ctx);
            }
            self.persist_if_dirty(block.store);
            self.send_ui(ctx.out);
            return;
        };

        // Start a new fuel charge.
        let fuel_entry = if fuel.is_empty() {
            None
        } else {
            tables.fuel(&fuel.identifier)
        };
        if let Some(entry) = fuel_entry {
            if self.burn_time <= 0 {
                self.burn_time = entry.burn_ticks as i16;
                self.burn_duration = entry.burn_ticks as i16;
                self.dirty = true;

                self.container.remove_item(SLOT_FUEL, 1);
                if let Some(byproduct) = entry.byproduct {
                    self.container.set_item(SLOT_FUEL, ItemStack::new(byproduct, 1));
                }
            }
        }

        let burning = self.burn_time > 0;
        self.set_lit(burning, block.position, ctx);

        if burning {
            self.cook_time += COOK_RATE;
            self.dirty = true;
        }

        if let Some(forced) = self.step_burn() {
            self.set_lit(forced, block.position, ctx);
        }

        if self.cook_time >= self.kind.cook_threshold() {
            self.cook_time = 0;
            self.dirty = true;

            let output = self
                .container
                .item(SLOT_OUTPUT)
                .cloned()
                .unwrap_or_default();
            let can_place = output.is_empty()
                || (output.identifier == smeltable.output && output.count < output.max_stack);

            // A blocked output holds the input back; only progress is lost.
            if can_place {
                self.container.remove_item(SLOT_INPUT, 1);
                if output.is_empty() {
                    self.container
                        .set_item(SLOT_OUTPUT, ItemStack::new(smeltable.output, 1));
                } else if let Some(slot) = self.container.item_mut(SLOT_OUTPUT) {
                    slot.increment(1);
                }
                self.stored_xp += smeltable.xp;
            }
        }

        self.persist_if_dirty(block.store);
        self.send_ui(ctx.out);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::block::Facing;
    use crate::config::SimConfig;
    use crate::lifecycle::Simulator;
    use crate::outbox::ClientBound;
    use crate::testutil::TestWorld;

    const POS: BlockPos = BlockPos { x: 0, y: 64, z: 0 };

    struct Rig {
        furnace: FurnaceBehavior,
        facing: Facing,
        store: BlockStore,
        world: TestWorld,
        out: Outbox,
    }

    impl Rig {
        fn new(kind: FurnaceKind) -> Self {
            let mut world = TestWorld::new();
            world.put_block(POS, kind.identifier());
            Self {
                furnace: FurnaceBehavior::new(kind, 0),
                facing: Facing::Down,
                store: BlockStore::new(),
                world,
                out: Outbox::new(),
            }
        }

        fn tick(&mut self) {
            let mut siblings = BTreeMap::new();
            let mut ctx =
                TickContext::for_tests(&mut self.world, &mut self.out, 0, &mut siblings);
            let mut block = BlockRef {
                position: POS,
                facing: &mut self.facing,
                store: &mut self.store,
            };
            self.furnace.on_tick(&mut block, &mut ctx);
        }

        fn set_input(&mut self, stack: ItemStack) {
            self.furnace.container.set_item(SLOT_INPUT, stack);
        }

        fn set_fuel(&mut self, stack: ItemStack) {
            self.furnace.container.set_item(SLOT_FUEL, stack);
        }
    }

    #[test]
    fn idle_tick_writes_no_entries() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.tick();
        assert!(!rig.store.has("CookTime"));
        assert!(!rig.store.has("BurnTime"));
        assert!(rig.out.is_empty());
    }

    #[test]
    fn no_recipe_resets_cook_time_and_unlights() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.world.put_block(POS, "minecraft:lit_furnace");
        rig.furnace.cook_time = 50;
        rig.set_input(ItemStack::new("minecraft:bedrock", 1)); // nothing smelts this

        rig.tick();

        assert_eq!(rig.furnace.cook_time(), 0);
        assert_eq!(rig.world.block_at(POS), Some(100)); // back to unlit furnace
        assert!(rig
            .out
            .broadcasts()
            .iter()
            .any(|p| matches!(p, ClientBound::UpdateBlock(u) if u.runtime_id == 100)));
        assert_eq!(rig.store.get_short("CookTime"), Some(0));
    }

    #[test]
    fn ignition_starts_charge_and_consumes_fuel() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 1));
        rig.set_fuel(ItemStack::new("minecraft:coal", 2));

        rig.tick();

        // charge started at 1600, the burn-decay step already took one tick
        assert_eq!(rig.furnace.burn_duration(), 1600);
        assert_eq!(rig.furnace.burn_time(), 1599);
        assert_eq!(rig.furnace.cook_time(), 2);
        assert_eq!(rig.furnace.container.item(SLOT_FUEL).unwrap().count, 1);
        assert_eq!(rig.world.block_at(POS), Some(101)); // lit variant
    }

    #[test]
    fn lava_bucket_charge_leaves_empty_bucket() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 1));
        rig.set_fuel(ItemStack::new("minecraft:lava_bucket", 1));

        rig.tick();

        assert_eq!(rig.furnace.burn_duration(), 20000);
        let fuel = rig.furnace.container.item(SLOT_FUEL).unwrap();
        assert_eq!(fuel.identifier, "minecraft:bucket");
        assert_eq!(fuel.count, 1);
    }

    #[test]
    fn burn_time_is_clamped_non_negative() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.furnace.burn_time = -7;
        rig.tick();
        assert!(rig.furnace.burn_time() >= 0);
    }

    #[test]
    fn cook_completion_places_output_and_consumes_input() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 2));
        rig.furnace.cook_time = 198;
        rig.furnace.burn_time = 100;
        rig.furnace.burn_duration = 100;

        rig.tick();

        assert_eq!(rig.furnace.cook_time(), 0);
        assert_eq!(rig.furnace.container.item(SLOT_INPUT).unwrap().count, 1);
        let output = rig.furnace.container.item(SLOT_OUTPUT).unwrap();
        assert_eq!(output.identifier, "minecraft:iron_ingot");
        assert_eq!(output.count, 1);
        assert!((rig.furnace.stored_xp() - 0.7).abs() < 0.01);
    }

    #[test]
    fn cook_completion_increments_existing_output() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 1));
        rig.furnace
            .container
            .set_item(SLOT_OUTPUT, ItemStack::new("minecraft:iron_ingot", 3));
        rig.furnace.cook_time = 198;
        rig.furnace.burn_time = 100;
        rig.furnace.burn_duration = 100;

        rig.tick();

        assert_eq!(rig.furnace.container.item(SLOT_OUTPUT).unwrap().count, 4);
        assert!(rig.furnace.container.item(SLOT_INPUT).unwrap().is_empty());
    }

    #[test]
    fn blocked_output_loses_progress_but_keeps_input() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 2));
        rig.furnace
            .container
            .set_item(SLOT_OUTPUT, ItemStack::new("minecraft:stone", 1));
        rig.furnace.cook_time = 198;
        rig.furnace.burn_time = 100;
        rig.furnace.burn_duration = 100;

        rig.tick();

        assert_eq!(rig.furnace.cook_time(), 0);
        assert_eq!(rig.furnace.container.item(SLOT_INPUT).unwrap().count, 2);
        assert_eq!(rig.furnace.container.item(SLOT_OUTPUT).unwrap().count, 1);
        assert_eq!(rig.furnace.stored_xp(), 0.0);
    }

    #[test]
    fn fuel_exhaustion_zeroes_duration_and_penalizes_progress() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 1));
        rig.furnace.cook_time = 10;
        rig.furnace.burn_time = 1;
        rig.furnace.burn_duration = 500;

        rig.tick(); // burns the last tick of the charge
        assert_eq!(rig.furnace.burn_time(), 0);
        assert_eq!(rig.furnace.cook_time(), 12);

        rig.tick(); // charge gone: duration zeroed, progress penalized
        assert_eq!(rig.furnace.burn_duration(), 0);
        assert_eq!(rig.furnace.cook_time(), 11);
        assert_eq!(rig.world.block_at(POS), Some(100)); // unlit
    }

    #[test]
    fn scan_limit_blocks_late_table_entries() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.furnace.scan_limit = 21; // food entries sit past the cap
        rig.set_input(ItemStack::new("minecraft:beef", 1));
        rig.set_fuel(ItemStack::new("minecraft:coal", 1));

        rig.tick();

        // treated as "nothing to smelt": no ignition, fuel untouched
        assert_eq!(rig.furnace.burn_time(), 0);
        assert_eq!(rig.furnace.container.item(SLOT_FUEL).unwrap().count, 1);
    }

    #[test]
    fn ui_values_go_to_every_viewer() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        rig.set_input(ItemStack::new("minecraft:iron_ore", 1));
        rig.set_fuel(ItemStack::new("minecraft:coal", 1));
        rig.furnace.container.open_for(9);

        rig.tick();

        let directed = rig.out.drain_directed();
        let props: Vec<i32> = directed
            .iter()
            .filter_map(|(actor, p)| match p {
                ClientBound::ContainerSetData(d) if *actor == 9 => Some(d.property),
                _ => None,
            })
            .collect();
        assert_eq!(
            props,
            vec![
                PROPERTY_FURNACE_TICK_COUNT,
                PROPERTY_FURNACE_LIT_TIME,
                PROPERTY_FURNACE_LIT_DURATION
            ]
        );
    }

    #[test]
    fn interact_registers_viewer_and_opens_ui() {
        let mut rig = Rig::new(FurnaceKind::BlastFurnace);
        let mut block = BlockRef {
            position: POS,
            facing: &mut rig.facing,
            store: &mut rig.store,
        };

        let handled = rig
            .furnace
            .on_interact(&mut block, &InteractContext::open(5), &mut rig.out);
        assert!(handled);
        assert!(rig.furnace.container.has_viewers());

        let directed = rig.out.drain_directed();
        assert!(directed
            .iter()
            .any(|(a, p)| *a == 5 && matches!(p, ClientBound::ContainerOpen(o) if o.container_type == 27)));
        assert!(directed
            .iter()
            .any(|(a, p)| *a == 5 && matches!(p, ClientBound::InventoryContent(_))));
    }

    #[test]
    fn sneaking_or_cancelled_interactions_are_ignored() {
        let mut rig = Rig::new(FurnaceKind::Furnace);
        let mut block = BlockRef {
            position: POS,
            facing: &mut rig.facing,
            store: &mut rig.store,
        };

        let mut sneaking = InteractContext::open(5);
        sneaking.sneaking = true;
        assert!(!rig.furnace.on_interact(&mut block, &sneaking, &mut rig.out));

        let mut cancelled = InteractContext::open(5);
        cancelled.cancelled = true;
        assert!(!rig.furnace.on_interact(&mut block, &cancelled, &mut rig.out));

        let no_actor = InteractContext {
            actor: None,
            cancelled: false,
            placing_block: false,
            sneaking: false,
        };
        assert!(!rig.furnace.on_interact(&mut block, &no_actor, &mut rig.out));

        assert!(rig.out.is_empty());
        assert!(!rig.furnace.container.has_viewers());
    }

    #[test]
    fn attach_restores_timers_and_skips_corrupt_items() {
        use blocktick_nbt::NbtCompound;

        let mut good = NbtCompound::new();
        good.insert("Name".into(), NbtTag::String("minecraft:iron_ore".into()));
        good.insert("Count".into(), NbtTag::Byte(4));
        good.insert("Slot".into(), NbtTag::Int(0));

        let mut bad = NbtCompound::new();
        bad.insert("Name".into(), NbtTag::String("minecraft:coal".into()));
        bad.insert("Count".into(), NbtTag::Byte(1));
        bad.insert("Slot".into(), NbtTag::Int(12)); // out of range for 3 slots

        let mut store = BlockStore::new();
        store.set("CookTime", NbtTag::Short(77));
        store.set("BurnTime", NbtTag::Short(40));
        store.set("BurnDuration", NbtTag::Short(80));
        store.set(
            "Items",
            NbtTag::List(vec![NbtTag::Compound(good), NbtTag::Compound(bad)]),
        );

        let mut furnace = FurnaceBehavior::new(FurnaceKind::Furnace, 0);
        let mut facing = Facing::Down;
        let mut block = BlockRef {
            position: POS,
            facing: &mut facing,
            store: &mut store,
        };
        furnace.on_attach(&mut block);

        assert_eq!(furnace.cook_time(), 77);
        assert_eq!(furnace.burn_time(), 40);
        assert_eq!(furnace.burn_duration(), 80);
        assert_eq!(furnace.container.item(SLOT_INPUT).unwrap().count, 4);
        assert!(furnace.container.item(SLOT_FUEL).unwrap().is_empty());
        assert!(furnace.container.item(SLOT_OUTPUT).unwrap().is_empty());
    }

    #[test]
    fn destroy_drops_occupied_slots_and_clears_entries() {
        let mut rig = Rig::new(FurnaceKind::Smoker);
        rig.set_input(ItemStack::new("minecraft:beef", 2));
        rig.set_fuel(ItemStack::new("minecraft:coal", 1));
        rig.furnace.dirty = true;
        rig.furnace.persist_if_dirty(&mut rig.store);
        assert!(rig.store.has("CookTime"));

        let mut block = BlockRef {
            position: POS,
            facing: &mut rig.facing,
            store: &mut rig.store,
        };
        rig.furnace
            .on_destroy(&mut block, &DestroyContext::broken_by(1), &mut rig.world);

        assert_eq!(rig.world.items.len(), 2);
        assert!(rig.store.is_empty());
        assert_eq!(rig.furnace.container.empty_slot_count(), 3);
    }

    #[test]
    fn furnace_smelts_end_to_end() {
        let mut sim = Simulator::new(&SimConfig::default());
        let mut world = TestWorld::new();
        world.put_block(POS, "minecraft:furnace");
        sim.attach(POS, "minecraft:furnace", BlockStore::new());
        {
            let container = sim.container_at(POS).unwrap();
            container.set_item(SLOT_INPUT, ItemStack::new("minecraft:iron_ore", 1));
            container.set_item(SLOT_FUEL, ItemStack::new("minecraft:coal", 1));
        }

        let mut out = Outbox::new();
        for tick in 0..120 {
            sim.tick(&mut world, &mut out, tick);
        }

        let container = sim.container_at(POS).unwrap();
        assert!(container.item(SLOT_INPUT).unwrap().is_empty());
        assert!(container.item(SLOT_FUEL).unwrap().is_empty());
        let output = container.item(SLOT_OUTPUT).unwrap();
        assert_eq!(output.identifier, "minecraft:iron_ingot");
        assert_eq!(output.count, 1);

        // progress is back at zero once the smelt completed
        let store = sim.store_at(POS).unwrap();
        assert_eq!(store.get_short("CookTime"), Some(0));
        // still burning the rest of the coal charge
        assert_eq!(world.block_at(POS), Some(101));
    }
}

