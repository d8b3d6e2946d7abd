//! Native call targets (spec §6's external runtime ABI), implemented
//! in-process instead of linked in from hand-written assembly stubs.
//!
//! String values here use the same length-prefixed layout
//! [`crate::memory::Memory`] gives interned literals: the address a native
//! hands back always points at the first data byte, with the byte count in
//! the word immediately before it. `NATIVEjava.lang.String.fromLiteral`
//! hands that representation straight through unchanged — it exists at all
//! only because the real runtime's string literals and heap-allocated
//! strings are constructed by different code paths that happen to agree on
//! a representation here.

use crate::error::{InterpError, InterpResult};
use crate::Interpreter;
use joos_compiler::ir::Label;

pub(crate) fn dispatch(interp: &mut Interpreter<'_>, label: &Label, args: &[i32]) -> InterpResult<Option<i32>> {
    let result = match label.0.as_str() {
        "__malloc" => interp.memory.malloc(args[0]),
        "__exception" => return Err(InterpError::Trapped),
        "__debexit" => return Err(InterpError::Exited(args[0])),
        "NATIVEjava.io.OutputStream.nativeWrite" => {
            interp.output.push(args[0] as u8);
            0
        }
        "NATIVEjava.lang.String.fromLiteral" => args[0],
        "NATIVEjava.lang.String.valueOf" => alloc_string(interp, args[0].to_string().as_bytes())?,
        "NATIVEjava.lang.String.concat" => {
            let mut bytes = read_string(interp, args[0])?.to_vec();
            bytes.extend_from_slice(read_string(interp, args[1])?);
            alloc_string(interp, &bytes)?
        }
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn read_string<'a>(interp: &'a Interpreter<'_>, addr: i32) -> InterpResult<&'a [u8]> {
    let len = interp.memory.load_word(addr - 4)?;
    interp.memory.read_bytes(addr, len)
}

fn alloc_string(interp: &mut Interpreter<'_>, bytes: &[u8]) -> InterpResult<i32> {
    let len_addr = interp.memory.malloc(4);
    interp.memory.store_word(len_addr, bytes.len() as i32)?;
    let data_addr = interp.memory.append_bytes(bytes);
    debug_assert_eq!(data_addr, len_addr + 4);
    Ok(data_addr)
}
