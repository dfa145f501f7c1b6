//! Wire primitives, base types, and the client-bound packets the container
//! simulation emits.
//!
//! Transport, sessions, and batching belong to the host server; this crate
//! only defines payload encodings.

pub mod error;
pub mod item_stack;
pub mod packets;
pub mod types;
pub mod wire;

pub use error::ProtoError;
pub use item_stack::ItemStack;
pub use types::{BlockPos, Vec3};
