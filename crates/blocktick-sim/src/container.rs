//! Fixed-capacity slotted container with a viewer registry.
//!
//! Slot semantics (which index means "input", "fuel", ...) belong to the
//! owning block family and are never reinterpreted here.

use std::collections::HashMap;

use tracing::debug;

use blocktick_nbt::{NbtCompound, NbtTag};
use blocktick_proto::ItemStack;

use crate::block::ActorId;

/// A block-owned inventory: a fixed array of stacks plus the set of actors
/// currently viewing it, each under an opaque window id.
#[derive(Debug, Clone)]
pub struct Container {
    container_type: u8,
    slots: Vec<ItemStack>,
    viewers: HashMap<ActorId, u8>,
    next_window_id: u8,
}

impl Container {
    /// A container with `size` empty slots. Capacity never changes.
    pub fn new(container_type: u8, size: usize) -> Self {
        Self {
            container_type,
            slots: (0..size).map(|_| ItemStack::empty()).collect(),
            viewers: HashMap::new(),
            next_window_id: 1,
        }
    }

    pub fn container_type(&self) -> u8 {
        self.container_type
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)
    }

    pub fn item_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot)
    }

    /// Replace the stack in `slot`. Out-of-range slots are ignored.
    pub fn set_item(&mut self, slot: usize, stack: ItemStack) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = stack;
        }
    }

    /// Remove up to `amount` items from `slot`.
    pub fn remove_item(&mut self, slot: usize, amount: u16) {
        if let Some(s) = self.slots.get_mut(slot) {
            s.decrement(amount);
        }
    }

    /// All slots in index order.
    pub fn stacks(&self) -> &[ItemStack] {
        &self.slots
    }

    /// Lowest index holding a non-empty stack.
    pub fn first_occupied(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_empty())
    }

    pub fn empty_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_slot_count() == 0
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = ItemStack::empty();
        }
    }

    // ── viewers ────────────────────────────────────────────────────────────

    /// Register `actor` as a viewer and return the window id for the session.
    /// Re-opening returns the existing id.
    pub fn open_for(&mut self, actor: ActorId) -> u8 {
        if let Some(&id) = self.viewers.get(&actor) {
            return id;
        }
        let id = self.next_window_id;
        self.next_window_id = if self.next_window_id >= 250 {
            1
        } else {
            self.next_window_id + 1
        };
        self.viewers.insert(actor, id);
        id
    }

    /// Remove `actor`'s viewer session, returning its window id.
    pub fn close_for(&mut self, actor: ActorId) -> Option<u8> {
        self.viewers.remove(&actor)
    }

    pub fn has_viewers(&self) -> bool {
        !self.viewers.is_empty()
    }

    /// Current viewers as `(actor, window id)` pairs.
    pub fn viewers(&self) -> impl Iterator<Item = (ActorId, u8)> + '_ {
        self.viewers.iter().map(|(&a, &w)| (a, w))
    }

    // ── persistence ────────────────────────────────────────────────────────

    /// Serialize occupied slots as an `Items` list, each compound tagged with
    /// its slot index.
    pub fn to_items_tag(&self) -> NbtTag {
        let items = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(slot, stack)| NbtTag::Compound(stack_to_storage(stack, slot)))
            .collect();
        NbtTag::List(items)
    }

    /// Restore slots from a persisted `Items` list.
    ///
    /// Individually corrupt entries are skipped; every valid entry still
    /// loads into its recorded slot.
    pub fn load_items_tag(&mut self, tag: &NbtTag) {
        let Some(entries) = tag.as_list() else {
            debug!("Items entry is not a list, ignoring");
            return;
        };
        for entry in entries {
            let Some(compound) = entry.as_compound() else {
                debug!("skipping non-compound item record");
                continue;
            };
            match stack_from_storage(compound, self.size()) {
                Some((slot, stack)) => self.slots[slot] = stack,
                None => debug!("skipping corrupt item record"),
            }
        }
    }
}

/// Serialize one stack for the `Items` list.
fn stack_to_storage(stack: &ItemStack, slot: usize) -> NbtCompound {
    let mut c = NbtCompound::new();
    c.insert("Name".to_string(), NbtTag::String(stack.identifier.clone()));
    c.insert("Count".to_string(), NbtTag::Byte(stack.count as i8));
    c.insert("MaxStack".to_string(), NbtTag::Short(stack.max_stack as i16));
    c.insert("Aux".to_string(), NbtTag::Short(stack.aux as i16));
    c.insert("Slot".to_string(), NbtTag::Int(slot as i32));
    c
}

/// Parse one stack record. `None` if the record is corrupt or its slot index
/// is out of range for a container of `size` slots.
fn stack_from_storage(c: &NbtCompound, size: usize) -> Option<(usize, ItemStack)> {
    let name = c.get("Name").and_then(|t| t.as_string())?;
    if name.is_empty() {
        return None;
    }
    let count = c.get("Count").and_then(|t| t.as_byte())?;
    if count <= 0 {
        return None;
    }
    let slot = c.get("Slot").and_then(|t| t.as_int())?;
    if slot < 0 || slot as usize >= size {
        return None;
    }

    let max_stack = c
        .get("MaxStack")
        .and_then(|t| t.as_short())
        .unwrap_or(blocktick_proto::item_stack::DEFAULT_MAX_STACK as i16);
    let aux = c.get("Aux").and_then(|t| t.as_short()).unwrap_or(0);

    let mut stack = ItemStack::new(name, count as u16).with_max_stack(max_stack.max(1) as u16);
    stack.aux = aux as u16;
    Some((slot as usize, stack))
}
