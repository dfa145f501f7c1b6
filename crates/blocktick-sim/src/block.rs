//! Block-side collaborator surface: facing direction, typed storage entries,
//! and the event contexts delivered to lifecycle hooks.

use std::collections::HashMap;

use blocktick_nbt::{read_compound_le, write_compound_le, NbtCompound, NbtError, NbtTag};
use blocktick_proto::BlockPos;

/// Stable identity of a player or other actor, assigned by the host.
pub type ActorId = u64;

/// Facing direction stored in a block's state. Hoppers output toward it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Down,
    Up,
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Unit offset toward the faced neighbor.
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Facing::Down => (0, -1, 0),
            Facing::Up => (0, 1, 0),
            Facing::North => (0, 0, -1),
            Facing::South => (0, 0, 1),
            Facing::East => (1, 0, 0),
            Facing::West => (-1, 0, 0),
        }
    }

    /// The neighbor position this facing points at.
    pub fn apply(&self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }
}

/// Horizontal direction an actor is looking toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

/// Per-block named typed storage entries.
///
/// This is the in-memory face of the host's key-value block-storage engine:
/// behaviors read and write named tags here, and the host moves whole stores
/// to and from disk. Writes are batched behind each behavior's dirty flag, so
/// a tick that touches no state performs no entry writes.
#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    entries: HashMap<String, NbtTag>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        self.entries.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, tag: NbtTag) {
        self.entries.insert(name.into(), tag);
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn delete(&mut self, name: &str) {
        self.entries.remove(name);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_short(&self, name: &str) -> Option<i16> {
        self.get(name).and_then(|t| t.as_short())
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|t| t.as_float())
    }

    /// Serialize every entry as one little-endian NBT compound.
    pub fn encode(&self) -> Vec<u8> {
        let compound: NbtCompound = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let mut buf = Vec::new();
        write_compound_le(&mut buf, &compound);
        buf
    }

    /// Restore a store from little-endian NBT bytes.
    pub fn decode(data: &[u8]) -> Result<Self, NbtError> {
        let compound = read_compound_le(&mut &data[..])?;
        Ok(Self {
            entries: compound.into_iter().collect(),
        })
    }
}

/// Mutable view of a placed block, handed to every lifecycle hook.
pub struct BlockRef<'a> {
    pub position: BlockPos,
    pub facing: &'a mut Facing,
    pub store: &'a mut BlockStore,
}

/// Delivered to `on_place`: who placed the block and how they were looking.
#[derive(Debug, Clone)]
pub struct PlacementContext {
    pub actor: Option<ActorId>,
    /// Look pitch in degrees; up is negative, down is positive.
    pub pitch: f32,
    pub cardinal: CardinalDirection,
}

/// Delivered to `on_interact`.
#[derive(Debug, Clone)]
pub struct InteractContext {
    pub actor: Option<ActorId>,
    /// The interaction was cancelled upstream (plugin, protection, ...).
    pub cancelled: bool,
    /// The click is placing a block against this one, not opening it.
    pub placing_block: bool,
    pub sneaking: bool,
}

impl InteractContext {
    /// A plain open interaction by `actor`.
    pub fn open(actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            cancelled: false,
            placing_block: false,
            sneaking: false,
        }
    }
}

/// Delivered to `on_destroy`.
#[derive(Debug, Clone)]
pub struct DestroyContext {
    pub actor: Option<ActorId>,
    pub cancelled: bool,
}

impl DestroyContext {
    /// A block broken by `actor`.
    pub fn broken_by(actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_offsets() {
        assert_eq!(Facing::Down.offset(), (0, -1, 0));
        assert_eq!(Facing::North.offset(), (0, 0, -1));
        assert_eq!(Facing::South.offset(), (0, 0, 1));
        assert_eq!(Facing::East.offset(), (1, 0, 0));
        assert_eq!(Facing::West.offset(), (-1, 0, 0));
    }

    #[test]
    fn facing_apply() {
        let pos = BlockPos::new(5, 64, 5);
        assert_eq!(Facing::Down.apply(pos), BlockPos::new(5, 63, 5));
        assert_eq!(Facing::East.apply(pos), BlockPos::new(6, 64, 5));
    }

    #[test]
    fn store_typed_entries() {
        let mut store = BlockStore::new();
        store.set("CookTime", NbtTag::Short(120));
        store.set("StoredXp", NbtTag::Float(1.5));

        assert!(store.has("CookTime"));
        assert_eq!(store.get_short("CookTime"), Some(120));
        assert_eq!(store.get_float("StoredXp"), Some(1.5));
        // type-mismatched reads yield nothing
        assert_eq!(store.get_short("StoredXp"), None);

        store.delete("CookTime");
        assert!(!store.has("CookTime"));
        assert_eq!(store.get_short("CookTime"), None);
    }

    #[test]
    fn store_encode_decode() {
        let mut store = BlockStore::new();
        store.set("TransferCooldown", NbtTag::Short(8));
        store.set("Items", NbtTag::List(Vec::new()));

        let bytes = store.encode();
        let back = BlockStore::decode(&bytes).unwrap();
        assert_eq!(back.get_short("TransferCooldown"), Some(8));
        assert!(back.has("Items"));
        assert_eq!(back.len(), 2);
    }
}
