//! Typed tag values and the little-endian NBT codec used for block storage.
//!
//! Block storage entries are named tags; whole compounds round-trip through
//! the standard little-endian on-disk NBT layout.

pub mod error;
pub mod io;
pub mod tag;

pub use error::NbtError;
pub use io::{read_compound_le, write_compound_le};
pub use tag::{NbtCompound, NbtTag};
