//! A single append-only byte-addressed memory space (spec §6's "a heap"),
//! holding the target program's static fields, interned string literals,
//! class dispatch-vector tables, and every `__malloc`-ed object, all in one
//! address space so `Mem(Binop(Add, ..))` offset arithmetic behaves
//! identically whether the base came from a `new` expression or a static
//! field's label. Grounded on `raya-core::gc::heap`'s bump-allocator shape,
//! simplified to match spec §5's "the target program's runtime `__malloc`
//! never frees" — there is no collector here, only a watermark that only
//! grows.
//!
//! Method labels share this same address space too, each given a distinct,
//! never-dereferenced address so a dispatch-vector slot (an ordinary heap
//! word) can hold a method's "address" and `CallIndirect`-style dynamic
//! dispatch resolves back to the label through [`Memory::label_at`].

use crate::error::{InterpError, InterpResult};
use joos_compiler::ir::Label;
use rustc_hash::FxHashMap;

pub struct Memory {
    bytes: Vec<u8>,
    label_addr: FxHashMap<Label, i32>,
    addr_label: FxHashMap<i32, Label>,
    next_code_addr: i32,
}

/// Real data addresses start at 4 (address 0 is reserved so a `null`
/// reference, always `0`, never aliases a live object). Code addresses
/// live in a disjoint range far above any data the interpreter will ever
/// allocate, so the two kinds of address can never collide.
const CODE_BASE: i32 = 0x4000_0000;

impl Memory {
    pub fn new() -> Self {
        Memory { bytes: vec![0u8; 4], label_addr: FxHashMap::default(), addr_label: FxHashMap::default(), next_code_addr: CODE_BASE }
    }

    /// Appends `size` zeroed bytes and returns the address of the first one
    /// — `__malloc`'s own semantics (spec §6).
    pub fn malloc(&mut self, size: i32) -> i32 {
        let addr = self.bytes.len() as i32;
        self.bytes.resize(self.bytes.len() + size.max(0) as usize, 0);
        addr
    }

    pub fn load_word(&self, addr: i32) -> InterpResult<i32> {
        let i = addr as usize;
        let slice = self.bytes.get(i..i + 4).ok_or(InterpError::OutOfBounds(addr))?;
        Ok(i32::from_le_bytes(slice.try_into().unwrap()))
    }

    pub fn store_word(&mut self, addr: i32, value: i32) -> InterpResult<()> {
        let i = addr as usize;
        let slot = self.bytes.get_mut(i..i + 4).ok_or(InterpError::OutOfBounds(addr))?;
        slot.copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Appends `data` and returns the address of its first byte, used for
    /// string-literal interning (length-prefixed, spec §4.6's array
    /// convention reused for strings in this interpreter).
    pub fn append_bytes(&mut self, data: &[u8]) -> i32 {
        let addr = self.bytes.len() as i32;
        self.bytes.extend_from_slice(data);
        addr
    }

    pub fn read_bytes(&self, addr: i32, len: i32) -> InterpResult<&[u8]> {
        let i = addr as usize;
        self.bytes.get(i..i + len.max(0) as usize).ok_or(InterpError::OutOfBounds(addr))
    }

    /// Binds `label` to a real data address (a static field slot, a class's
    /// dispatch-vector table, or an interned string).
    pub fn bind_data_label(&mut self, label: Label, addr: i32) {
        self.label_addr.insert(label, addr);
    }

    /// Allocates this method label its own opaque code address, if it
    /// doesn't have one yet, and returns it.
    pub fn code_addr_for(&mut self, label: &Label) -> i32 {
        if let Some(&addr) = self.label_addr.get(label) {
            return addr;
        }
        let addr = self.next_code_addr;
        self.next_code_addr += 4;
        self.label_addr.insert(label.clone(), addr);
        self.addr_label.insert(addr, label.clone());
        addr
    }

    pub fn addr_of(&self, label: &Label) -> Option<i32> {
        self.label_addr.get(label).copied()
    }

    /// Resolves a dynamically-dispatched call target's numeric value back
    /// to the label it names.
    pub fn label_at(&self, addr: i32) -> InterpResult<Label> {
        self.addr_label.get(&addr).cloned().ok_or(InterpError::OutOfBounds(addr))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}
