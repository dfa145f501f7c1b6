//! Tick-driven simulation of stateful container blocks: fuel-burning smelting
//! stations (furnace, blast furnace, smoker) and item-routing hoppers.
//!
//! Each placed block of a supported type becomes an instance with a slotted
//! container and family-specific timers. The host world drives the uniform
//! lifecycle contract (attach, interact, tick, destroy); state changes are
//! persisted through a dirty-flag discipline and broadcast to viewing clients
//! via the [`outbox::Outbox`].

pub mod block;
pub mod config;
pub mod container;
pub mod furnace;
pub mod hopper;
pub mod lifecycle;
pub mod outbox;
pub mod resync;
pub mod smelting;
pub mod world;

#[cfg(test)]
pub(crate) mod testutil;

pub use block::{ActorId, BlockStore, Facing};
pub use config::SimConfig;
pub use container::Container;
pub use lifecycle::{BlockBehavior, Simulator, TickContext};
pub use outbox::{ClientBound, Outbox};
pub use world::{LooseItem, WorldAccess};
