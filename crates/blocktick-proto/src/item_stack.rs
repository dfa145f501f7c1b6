//! ItemStack value type and its slot-descriptor encoding.
//!
//! Stacks are identified by namespaced item identifier. An empty identifier
//! (or zero count) marks an empty slot.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;
use crate::wire::{read_string, write_string, ProtoDecode, ProtoEncode, VarUInt32};

/// Default maximum stack size when the item type does not override it.
pub const DEFAULT_MAX_STACK: u16 = 64;

/// A single item stack in a container slot or on the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStack {
    /// Namespaced item identifier (e.g. `minecraft:coal`). Empty = empty slot.
    pub identifier: String,
    /// Number of items in this stack.
    pub count: u16,
    /// Maximum size a stack of this item type may reach.
    pub max_stack: u16,
    /// Damage/variant auxiliary value.
    pub aux: u16,
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl ItemStack {
    /// An empty slot.
    pub fn empty() -> Self {
        Self {
            identifier: String::new(),
            count: 0,
            max_stack: DEFAULT_MAX_STACK,
            aux: 0,
        }
    }

    /// A simple stack with the default maximum size.
    pub fn new(identifier: impl Into<String>, count: u16) -> Self {
        Self {
            identifier: identifier.into(),
            count,
            max_stack: DEFAULT_MAX_STACK,
            aux: 0,
        }
    }

    /// Override the maximum stack size (buckets, tools, eggs...).
    pub fn with_max_stack(mut self, max_stack: u16) -> Self {
        self.max_stack = max_stack;
        self
    }

    /// Whether this slot is empty.
    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() || self.count == 0
    }

    /// Room left before the stack reaches its maximum size.
    pub fn space_left(&self) -> u16 {
        self.max_stack.saturating_sub(self.count)
    }

    /// Whether `other` is the same item type and this stack still has room.
    pub fn can_absorb(&self, other: &ItemStack) -> bool {
        !self.is_empty()
            && self.identifier == other.identifier
            && self.aux == other.aux
            && self.count < self.max_stack
    }

    /// Grow the stack, capped at the maximum size.
    pub fn increment(&mut self, amount: u16) {
        self.count = (self.count + amount).min(self.max_stack);
    }

    /// Shrink the stack; reaching zero empties the slot.
    pub fn decrement(&mut self, amount: u16) {
        self.count = self.count.saturating_sub(amount);
        if self.count == 0 {
            *self = ItemStack::empty();
        }
    }

    /// Set an exact count; zero empties the slot.
    pub fn set_count(&mut self, count: u16) {
        if count == 0 {
            *self = ItemStack::empty();
        } else {
            self.count = count.min(self.max_stack);
        }
    }
}

/// Slot-descriptor wire format:
///
/// ```text
/// string(identifier)  — empty string = empty slot, return early
/// u16_le(count)
/// VarUInt32(aux)
/// ```
impl ProtoEncode for ItemStack {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        if self.is_empty() {
            write_string(buf, "");
            return;
        }
        write_string(buf, &self.identifier);
        buf.put_u16_le(self.count);
        VarUInt32(self.aux as u32).proto_encode(buf);
    }
}

impl ProtoDecode for ItemStack {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let identifier = read_string(buf)?;
        if identifier.is_empty() {
            return Ok(Self::empty());
        }
        if buf.remaining() < 2 {
            return Err(ProtoError::BufferTooShort {
                needed: 2,
                remaining: buf.remaining(),
            });
        }
        let count = buf.get_u16_le();
        let aux = VarUInt32::proto_decode(buf)?.0 as u16;
        Ok(Self {
            identifier,
            count,
            max_stack: DEFAULT_MAX_STACK,
            aux,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn empty_checks() {
        assert!(ItemStack::empty().is_empty());
        assert!(ItemStack::new("", 10).is_empty());
        assert!(ItemStack::new("minecraft:coal", 0).is_empty());
        assert!(!ItemStack::new("minecraft:coal", 1).is_empty());
    }

    #[test]
    fn decrement_to_zero_empties_slot() {
        let mut stack = ItemStack::new("minecraft:coal", 2);
        stack.decrement(1);
        assert_eq!(stack.count, 1);
        stack.decrement(1);
        assert!(stack.is_empty());
        assert!(stack.identifier.is_empty());
    }

    #[test]
    fn increment_caps_at_max() {
        let mut stack = ItemStack::new("minecraft:cobblestone", 63);
        stack.increment(5);
        assert_eq!(stack.count, 64);
    }

    #[test]
    fn space_left_respects_override() {
        let stack = ItemStack::new("minecraft:egg", 10).with_max_stack(16);
        assert_eq!(stack.space_left(), 6);
    }

    #[test]
    fn can_absorb_same_item_with_room() {
        let target = ItemStack::new("minecraft:iron_ingot", 12);
        assert!(target.can_absorb(&ItemStack::new("minecraft:iron_ingot", 1)));
        assert!(!target.can_absorb(&ItemStack::new("minecraft:gold_ingot", 1)));

        let full = ItemStack::new("minecraft:iron_ingot", 64);
        assert!(!full.can_absorb(&ItemStack::new("minecraft:iron_ingot", 1)));
    }

    #[test]
    fn wire_roundtrip() {
        let stack = ItemStack::new("minecraft:baked_potato", 17);
        let mut buf = BytesMut::new();
        stack.proto_encode(&mut buf);
        let decoded = ItemStack::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded.identifier, "minecraft:baked_potato");
        assert_eq!(decoded.count, 17);
        assert_eq!(decoded.aux, 0);
    }

    #[test]
    fn empty_wire_roundtrip() {
        let mut buf = BytesMut::new();
        ItemStack::empty().proto_encode(&mut buf);
        assert_eq!(buf.len(), 1); // just the zero-length string
        let decoded = ItemStack::proto_decode(&mut buf.freeze()).unwrap();
        assert!(decoded.is_empty());
    }
}
