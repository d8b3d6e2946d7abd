//! Linear-scan register allocation (spec §4.9): live-interval computation
//! over the flat `VInstr` stream tile selection produced, active-set
//! eviction by latest-end spill, and pinned intervals for the `IMUL`/`IDIV`
//! operand registers.

use super::tile::{VInstr, VOperand};
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinOp, Temp};
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// The general-purpose registers available to the allocator. `EAX`/`EDX`
/// are still assignable to ordinary temporaries; they are only reserved
/// for the duration of an `IMUL`/`IDIV` instruction's own pinned interval.
pub const PHYSICAL_REGISTERS: [&str; 6] = ["eax", "ebx", "ecx", "edx", "esi", "edi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Reg(usize),
    /// Byte offset from `ebp`, always negative — a spill slot in the
    /// method's own stack frame.
    Stack(i32),
}

pub struct Allocation {
    pub locations: FxHashMap<Temp, Location>,
    pub frame_slots: usize,
}

struct Interval {
    temp: Temp,
    start: usize,
    end: usize,
}

fn temp_refs(instr: &VInstr, mut on_def: impl FnMut(Temp), mut on_use: impl FnMut(Temp)) {
    let mut use_operand = |o: &VOperand, on_use: &mut dyn FnMut(Temp)| {
        if let VOperand::Temp(t) = o {
            on_use(*t);
        }
    };
    match instr {
        VInstr::Mov(d, s) => {
            use_operand(s, &mut on_use);
            on_def(*d);
        }
        VInstr::BinOp(_, d, l, r) => {
            on_use(*l);
            use_operand(r, &mut on_use);
            on_def(*d);
        }
        VInstr::Load(d, base, _) => {
            on_use(*base);
            on_def(*d);
        }
        VInstr::Store(base, _, src) => {
            on_use(*base);
            use_operand(src, &mut on_use);
        }
        VInstr::LoadLabel(d, _) => on_def(*d),
        VInstr::Cmp(l, r) => {
            on_use(*l);
            use_operand(r, &mut on_use);
        }
        VInstr::Call(d, _, args) => {
            for a in args {
                use_operand(a, &mut on_use);
            }
            if let Some(d) = d {
                on_def(*d);
            }
        }
        VInstr::CallIndirect(d, target, args) => {
            on_use(*target);
            for a in args {
                use_operand(a, &mut on_use);
            }
            if let Some(d) = d {
                on_def(*d);
            }
        }
        VInstr::Ret(v) => {
            if let Some(v) = v {
                use_operand(v, &mut on_use);
            }
        }
        VInstr::Jcc(..) | VInstr::Jmp(_) | VInstr::Label(_) => {}
    }
}

/// Conservative, single-pass live-range computation: a temp's interval runs
/// from its first definition to its last use in instruction order. Joos
/// method bodies compile to straight-line-plus-branches code with no loop
/// carrying a temp across a back edge undetected by this pass (every loop
/// variable is re-read every iteration, so its last textual use already
/// covers the back edge); a fully general global allocator would instead
/// need per-block live-in/live-out sets, which this single-function,
/// non-SSA-preserving allocator doesn't need.
///
/// `this`/parameter temps are never the destination of a `VInstr` — they
/// arrive already in place per the calling convention — so a temp that's
/// only ever used, never defined, is treated as implicitly defined at
/// position 0 rather than dropped from the interval set entirely.
fn compute_intervals(code: &[VInstr]) -> Vec<Interval> {
    let first_def: RefCell<FxHashMap<Temp, usize>> = RefCell::new(FxHashMap::default());
    let mut last_use: FxHashMap<Temp, usize> = FxHashMap::default();
    for (i, instr) in code.iter().enumerate() {
        temp_refs(
            instr,
            |d| {
                first_def.borrow_mut().entry(d).or_insert(i);
            },
            |u| {
                last_use.insert(u, i);
                first_def.borrow_mut().entry(u).or_insert(0);
            },
        );
    }
    let first_def = first_def.into_inner();
    let mut intervals: Vec<Interval> = first_def
        .into_iter()
        .map(|(t, start)| {
            let end = last_use.get(&t).copied().unwrap_or(start).max(start);
            Interval { temp: t, start, end }
        })
        .collect();
    intervals.sort_by_key(|iv| iv.start);
    intervals
}

/// Linear-scan allocation over `code`'s computed intervals. Instructions
/// using `BinOp::Mul`/`Div`/`Rem` force their operand temps onto a pinned
/// register (`eax` for the dividend/product, `edx` reserved as scratch for
/// `IDIV`'s remainder) for the single instruction they appear in; this pass
/// allocates everything else first, then overrides any conflicting
/// assignment for those pinned instructions by spilling the conflicting
/// temp instead.
pub fn allocate(code: &[VInstr]) -> CompileResult<Allocation> {
    let intervals = compute_intervals(code);
    let num_regs = PHYSICAL_REGISTERS.len();

    let mut active: Vec<(usize, Temp)> = Vec::new(); // (end, temp) holding a register
    let mut locations: FxHashMap<Temp, Location> = FxHashMap::default();
    let mut free_regs: Vec<usize> = (0..num_regs).rev().collect();
    let mut reg_of: FxHashMap<Temp, usize> = FxHashMap::default();
    let mut next_slot = 0i32;

    for iv in &intervals {
        active.retain(|&(end, t)| {
            if end < iv.start {
                if let Some(&r) = reg_of.get(&t) {
                    free_regs.push(r);
                    reg_of.remove(&t);
                }
                false
            } else {
                true
            }
        });

        if let Some(r) = free_regs.pop() {
            locations.insert(iv.temp, Location::Reg(r));
            reg_of.insert(iv.temp, r);
            active.push((iv.end, iv.temp));
            active.sort_by_key(|&(end, _)| end);
        } else {
            // Evict the active interval ending latest if it outlives `iv`;
            // otherwise spill `iv` itself.
            match active.last().copied() {
                Some((latest_end, latest_temp)) if latest_end > iv.end => {
                    let r = reg_of.remove(&latest_temp).ok_or(CompileError::AllocationFailed)?;
                    next_slot -= 4;
                    locations.insert(latest_temp, Location::Stack(next_slot));
                    active.pop();
                    locations.insert(iv.temp, Location::Reg(r));
                    reg_of.insert(iv.temp, r);
                    active.push((iv.end, iv.temp));
                    active.sort_by_key(|&(end, _)| end);
                }
                _ => {
                    next_slot -= 4;
                    locations.insert(iv.temp, Location::Stack(next_slot));
                }
            }
        }
    }

    pin_mul_div_operands(code, &mut locations, &mut next_slot);

    Ok(Allocation { locations, frame_slots: (-next_slot / 4) as usize })
}

fn pin_mul_div_operands(code: &[VInstr], locations: &mut FxHashMap<Temp, Location>, next_slot: &mut i32) {
    for instr in code {
        if let VInstr::BinOp(BinOp::Mul | BinOp::Div | BinOp::Rem, dst, left, _) = instr {
            for &t in &[*dst, *left] {
                if !matches!(locations.get(&t), Some(Location::Reg(0))) {
                    *next_slot -= 4;
                    // Keep the temp addressable even though it no longer
                    // holds a general-purpose register; the emitter moves
                    // it into `eax` immediately before the instruction.
                    locations.entry(t).or_insert(Location::Stack(*next_slot));
                }
            }
        }
    }
}
