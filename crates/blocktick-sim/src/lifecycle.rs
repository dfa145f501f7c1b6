//! The container-block lifecycle contract and its tick driver.
//!
//! Every supported block family implements [`BlockBehavior`]; the
//! [`Simulator`] binds behaviors to placed blocks by registered type and
//! drives them one hook at a time. Hooks run to completion on the world's
//! single tick thread, so no locking is involved anywhere below.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use blocktick_proto::{BlockPos, Vec3};

use crate::block::{BlockRef, BlockStore, DestroyContext, Facing, InteractContext, PlacementContext};
use crate::config::SimConfig;
use crate::container::Container;
use crate::furnace::FurnaceBehavior;
use crate::hopper::HopperBehavior;
use crate::outbox::Outbox;
use crate::resync::ResyncBehavior;
use crate::smelting::FurnaceKind;
use crate::world::WorldAccess;

/// The uniform hook surface every simulated block family implements.
pub trait BlockBehavior {
    /// Bound to a placed block (on load or placement): restore persisted
    /// timers and container contents.
    fn on_attach(&mut self, block: &mut BlockRef<'_>);

    /// Derive initial state from placement. Most families need nothing here.
    fn on_place(&mut self, block: &mut BlockRef<'_>, ctx: &PlacementContext) {
        let _ = (block, ctx);
    }

    /// A player interacted with the block. Returns whether it was handled.
    fn on_interact(
        &mut self,
        block: &mut BlockRef<'_>,
        ctx: &InteractContext,
        out: &mut Outbox,
    ) -> bool;

    /// One world tick.
    fn on_tick(&mut self, block: &mut BlockRef<'_>, ctx: &mut TickContext<'_>);

    /// The block is being removed: eject contents, delete persisted entries.
    fn on_destroy(
        &mut self,
        block: &mut BlockRef<'_>,
        ctx: &DestroyContext,
        world: &mut dyn WorldAccess,
    );

    /// The behavior's container, if it owns one. Transfers reach sibling
    /// blocks through this.
    fn container_mut(&mut self) -> Option<&mut Container> {
        None
    }
}

/// One simulated block: its facing, storage entries, and bound behaviors.
pub(crate) struct Instance {
    facing: Facing,
    store: BlockStore,
    behaviors: Vec<Box<dyn BlockBehavior>>,
}

/// Everything a tick hook may touch besides its own block.
pub struct TickContext<'a> {
    pub world: &'a mut dyn WorldAccess,
    pub out: &'a mut Outbox,
    /// Current world tick number.
    pub tick: u64,
    /// Sibling instances (the ticking block itself is withheld).
    siblings: &'a mut BTreeMap<BlockPos, Instance>,
}

impl<'a> TickContext<'a> {
    /// Context over an explicit sibling map; unit tests tick one behavior in
    /// isolation with an empty map.
    #[cfg(test)]
    pub(crate) fn for_tests(
        world: &'a mut dyn WorldAccess,
        out: &'a mut Outbox,
        tick: u64,
        siblings: &'a mut BTreeMap<BlockPos, Instance>,
    ) -> Self {
        Self {
            world,
            out,
            tick,
            siblings,
        }
    }

    /// Run `f` against the container of the block at `pos`, whether it is a
    /// simulated sibling or an inventory the host exposes. `None` when there
    /// is no inventory there.
    pub fn with_inventory_at(
        &mut self,
        pos: BlockPos,
        mut f: impl FnMut(&mut Container) -> bool,
    ) -> Option<bool> {
        if let Some(instance) = self.siblings.get_mut(&pos) {
            let container = instance
                .behaviors
                .iter_mut()
                .find_map(|b| b.container_mut())?;
            return Some(f(container));
        }
        self.world.with_external_inventory(pos, &mut f)
    }
}

/// Registered behavior factory: which block identifiers it binds to and how
/// to build a fresh behavior for one block.
struct Registration {
    types: Vec<String>,
    factory: Box<dyn Fn() -> Box<dyn BlockBehavior>>,
}

/// Creates behaviors for registered block types and drives their lifecycle.
///
/// Instances are kept in a position-ordered map so tick order is
/// deterministic across runs.
pub struct Simulator {
    registrations: Vec<Registration>,
    instances: BTreeMap<BlockPos, Instance>,
}

impl Simulator {
    /// A simulator with the standard families registered, honoring the
    /// per-family enable switches in `config`.
    pub fn new(config: &SimConfig) -> Self {
        let mut sim = Self {
            registrations: Vec::new(),
            instances: BTreeMap::new(),
        };

        let scan_limit = config.recipe_scan_limit;
        let kinds = [
            (config.enable_furnace, FurnaceKind::Furnace),
            (config.enable_blast_furnace, FurnaceKind::BlastFurnace),
            (config.enable_smoker, FurnaceKind::Smoker),
        ];

        let mut resync_types = Vec::new();
        for (enabled, kind) in kinds {
            if !enabled {
                continue;
            }
            sim.register(&[kind.identifier(), kind.lit_identifier()], move || {
                Box::new(FurnaceBehavior::new(kind, scan_limit))
            });
            resync_types.push(kind.identifier());
            resync_types.push(kind.lit_identifier());
        }

        if config.enable_hopper {
            sim.register(&["minecraft:hopper"], || Box::new(HopperBehavior::new()));
            resync_types.push("minecraft:hopper");
        }

        if config.enable_block_resync && !resync_types.is_empty() {
            sim.register(&resync_types, || Box::new(ResyncBehavior::new()));
        }

        sim
    }

    /// Register a behavior factory for a set of block identifiers. A block
    /// matching several registrations gets every matching behavior.
    pub fn register(
        &mut self,
        types: &[&str],
        factory: impl Fn() -> Box<dyn BlockBehavior> + 'static,
    ) {
        self.registrations.push(Registration {
            types: types.iter().map(|s| s.to_string()).collect(),
            factory: Box::new(factory),
        });
    }

    /// Bind behaviors to the block at `pos` and restore persisted state.
    /// Returns `false` when no registration matches `identifier`.
    pub fn attach(&mut self, pos: BlockPos, identifier: &str, store: BlockStore) -> bool {
        let behaviors: Vec<Box<dyn BlockBehavior>> = self
            .registrations
            .iter()
            .filter(|r| r.types.iter().any(|t| t == identifier))
            .map(|r| (r.factory)())
            .collect();

        if behaviors.is_empty() {
            debug!(identifier, "no behavior registered for block type");
            return false;
        }

        let mut instance = Instance {
            facing: Facing::default(),
            store,
            behaviors,
        };
        {
            let mut block = BlockRef {
                position: pos,
                facing: &mut instance.facing,
                store: &mut instance.store,
            };
            for behavior in &mut instance.behaviors {
                behavior.on_attach(&mut block);
            }
        }
        self.instances.insert(pos, instance);
        true
    }

    /// Attach a freshly placed block and run its placement hook.
    pub fn place(
        &mut self,
        pos: BlockPos,
        identifier: &str,
        store: BlockStore,
        ctx: &PlacementContext,
    ) -> bool {
        if !self.attach(pos, identifier, store) {
            return false;
        }
        let Some(instance) = self.instances.get_mut(&pos) else {
            return false;
        };
        let mut block = BlockRef {
            position: pos,
            facing: &mut instance.facing,
            store: &mut instance.store,
        };
        for behavior in &mut instance.behaviors {
            behavior.on_place(&mut block, ctx);
        }
        true
    }

    /// Dispatch an interaction to the block at `pos`.
    pub fn interact(&mut self, pos: BlockPos, ctx: &InteractContext, out: &mut Outbox) -> bool {
        let Some(instance) = self.instances.get_mut(&pos) else {
            return false;
        };
        let mut block = BlockRef {
            position: pos,
            facing: &mut instance.facing,
            store: &mut instance.store,
        };
        let mut handled = false;
        for behavior in &mut instance.behaviors {
            handled |= behavior.on_interact(&mut block, ctx, out);
        }
        handled
    }

    /// Remove the block at `pos`, running destroy hooks (drops and entry
    /// deletion are guarded inside the behaviors). Returns the final store so
    /// the host can reconcile the storage engine. A cancelled destroy leaves
    /// the instance in place.
    pub fn destroy(
        &mut self,
        pos: BlockPos,
        ctx: &DestroyContext,
        world: &mut dyn WorldAccess,
    ) -> Option<BlockStore> {
        if ctx.cancelled {
            return None;
        }
        let mut instance = self.instances.remove(&pos)?;
        {
            let mut block = BlockRef {
                position: pos,
                facing: &mut instance.facing,
                store: &mut instance.store,
            };
            for behavior in &mut instance.behaviors {
                behavior.on_destroy(&mut block, ctx, world);
            }
        }
        Some(instance.store)
    }

    /// Run one world tick over every instance, in position order.
    pub fn tick(&mut self, world: &mut dyn WorldAccess, out: &mut Outbox, tick: u64) {
        let positions: Vec<BlockPos> = self.instances.keys().copied().collect();
        for pos in positions {
            // Withhold the instance so its hooks can reach sibling containers
            // without aliasing.
            let Some(mut instance) = self.instances.remove(&pos) else {
                continue;
            };
            {
                let mut ctx = TickContext {
                    world: &mut *world,
                    out: &mut *out,
                    tick,
                    siblings: &mut self.instances,
                };
                let mut block = BlockRef {
                    position: pos,
                    facing: &mut instance.facing,
                    store: &mut instance.store,
                };
                for behavior in &mut instance.behaviors {
                    behavior.on_tick(&mut block, &mut ctx);
                }
            }
            self.instances.insert(pos, instance);
        }
    }

    /// Whether a block at `pos` is simulated.
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.instances.contains_key(&pos)
    }

    /// Number of simulated blocks.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Storage entries of the block at `pos` (host persistence, tests).
    pub fn store_at(&self, pos: BlockPos) -> Option<&BlockStore> {
        self.instances.get(&pos).map(|i| &i.store)
    }

    /// Facing of the block at `pos`.
    pub fn facing_at(&self, pos: BlockPos) -> Option<Facing> {
        self.instances.get(&pos).map(|i| i.facing)
    }

    /// The container of the block at `pos`, if any behavior owns one. The
    /// host routes player slot edits through this.
    pub fn container_at(&mut self, pos: BlockPos) -> Option<&mut Container> {
        self.instances
            .get_mut(&pos)?
            .behaviors
            .iter_mut()
            .find_map(|b| b.container_mut())
    }
}

/// Eject every occupied slot of `container` as a loose item at the block
/// center, with a small randomized scatter motion.
pub(crate) fn drop_contents(container: &mut Container, pos: BlockPos, world: &mut dyn WorldAccess) {
    let center = pos.center();
    let mut rng = rand::thread_rng();
    for slot in 0..container.size() {
        let Some(stack) = container.item(slot) else {
            continue;
        };
        if stack.is_empty() {
            continue;
        }
        let stack = stack.clone();
        let motion = Vec3::new(
            rng.gen_range(-0.3..0.3),
            rng.gen_range(0.0..0.35),
            rng.gen_range(-0.3..0.3),
        );
        world.spawn_loose_item(stack, center, motion);
    }
    container.clear();
}
