//! Periodic block resync.
//!
//! Container blocks sometimes render stale on clients that joined after the
//! chunk was sent. Every 20th tick this behavior re-sends the block's current
//! permutation (preceded by an air update to force a redraw) to any player it
//! has not reached yet.

use std::collections::HashSet;

use blocktick_proto::packets::UpdateBlock;

use crate::block::{ActorId, BlockRef, DestroyContext, InteractContext};
use crate::lifecycle::{BlockBehavior, TickContext};
use crate::outbox::Outbox;
use crate::world::WorldAccess;

/// Ticks between resync sweeps.
pub const RESYNC_INTERVAL: u64 = 20;

#[derive(Default)]
pub struct ResyncBehavior {
    sent_to: HashSet<ActorId>,
}

impl ResyncBehavior {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockBehavior for ResyncBehavior {
    fn on_attach(&mut self, _block: &mut BlockRef<'_>) {}

    fn on_interact(
        &mut self,
        _block: &mut BlockRef<'_>,
        _ctx: &InteractContext,
        _out: &mut Outbox,
    ) -> bool {
        false
    }

    fn on_tick(&mut self, block: &mut BlockRef<'_>, ctx: &mut TickContext<'_>) {
        if ctx.tick % RESYNC_INTERVAL != 0 {
            return;
        }
        let Some(runtime_id) = ctx.world.block_at(block.position) else {
            return;
        };

        let players = ctx.world.players();
        for &player in &players {
            if self.sent_to.contains(&player) {
                continue;
            }
            let air = UpdateBlock {
                position: block.position,
                runtime_id: 0,
                flags: 0,
                layer: 0,
            };
            let current = UpdateBlock {
                position: block.position,
                runtime_id,
                flags: 0,
                layer: 0,
            };
            ctx.out.send_to(player, air);
            ctx.out.send_to(player, current);
            self.sent_to.insert(player);
        }

        // Forget players that left so a rejoin gets resynced again.
        self.sent_to.retain(|p| players.contains(p));
    }

    fn on_destroy(
        &mut self,
        _block: &mut BlockRef<'_>,
        _ctx: &DestroyContext,
        _world: &mut dyn WorldAccess,
    ) {
    }
}
