//! x86-32 assembly text emission (spec §4.10).
//!
//! One `.text` unit per program: every lowered method's tiled, allocated
//! instruction stream in turn, followed by a `.data` section holding the
//! dispatch-vector tables, zero-initialized static-field slots, and
//! interned string-literal bytes. `_start` runs the canonicalized static
//! initializers, then the entry point, then hands its return value to
//! `__debexit` (spec §6's external runtime ABI).

use super::regalloc::{self, Allocation, Location, PHYSICAL_REGISTERS};
use super::tile::{Tiler, VInstr, VOperand};
use crate::error::CompileResult;
use crate::ir::{BinOp, RelOp, Temp, TempGen};
use crate::lower::{LoweredMethod, LoweredProgram};
use std::fmt::Write as _;

pub fn emit_program(program: &LoweredProgram) -> CompileResult<String> {
    let mut out = String::new();

    out.push_str("global _start\n");
    out.push_str("extern __malloc\n");
    out.push_str("extern __exception\n");
    out.push_str("extern __debexit\n");
    out.push_str("extern NATIVEjava.io.OutputStream.nativeWrite\n");
    out.push_str("extern NATIVEjava.lang.String.concat\n");
    out.push_str("extern NATIVEjava.lang.String.valueOf\n");
    out.push_str("extern NATIVEjava.lang.String.fromLiteral\n");
    out.push('\n');

    out.push_str("section .text\n\n");
    emit_start(&mut out, program)?;

    for class in &program.classes {
        for method in &class.methods {
            emit_method(&mut out, method)?;
        }
    }

    out.push_str("\nsection .data\n");
    for class in &program.classes {
        writeln!(out, "{}:", class.label).unwrap();
        for slot in &class.dispatch_vector {
            match slot {
                Some(target) => writeln!(out, "    dd {target}").unwrap(),
                None => out.push_str("    dd 0\n"),
            }
        }
    }
    for field in &program.static_fields {
        writeln!(out, "{field}:\n    dd 0").unwrap();
    }
    for (label, value) in &program.string_literals {
        let bytes = value.len();
        writeln!(out, "{label}_len: dd {bytes}").unwrap();
        write!(out, "{label}: db ").unwrap();
        if value.is_empty() {
            out.push_str("0\n");
        } else {
            let rendered: Vec<String> = value.bytes().map(|b| b.to_string()).collect();
            writeln!(out, "{}", rendered.join(",")).unwrap();
        }
    }

    Ok(out)
}

fn emit_start(out: &mut String, program: &LoweredProgram) -> CompileResult<()> {
    out.push_str("_start:\n");
    out.push_str("    push ebp\n");
    out.push_str("    mov ebp, esp\n");
    let mut temps = TempGen::new();
    let mut tiler = Tiler::new(&mut temps);
    tiler.munch_stmts(&program.static_init);
    let alloc = regalloc::allocate(&tiler.out)?;
    let frame_bytes = alloc.frame_slots as i32 * 4;
    if frame_bytes > 0 {
        writeln!(out, "    sub esp, {frame_bytes}").unwrap();
    }
    for instr in &tiler.out {
        emit_instr(out, instr, &alloc);
    }
    writeln!(out, "    call {}", program.entry_label).unwrap();
    out.push_str("    push eax\n");
    out.push_str("    call __debexit\n");
    Ok(())
}

fn emit_method(out: &mut String, method: &LoweredMethod) -> CompileResult<()> {
    writeln!(out, "{}:", method.label).unwrap();
    out.push_str("    push ebp\n");
    out.push_str("    mov ebp, esp\n");

    let mut temps = TempGen::new();
    let mut tiler = Tiler::new(&mut temps);
    tiler.munch_stmts(&method.body);
    let alloc = regalloc::allocate(&tiler.out)?;

    let frame_bytes = alloc.frame_slots as i32 * 4;
    if frame_bytes > 0 {
        writeln!(out, "    sub esp, {frame_bytes}").unwrap();
    }

    // Incoming arguments are the method's first `num_args` temps, in
    // declaration order, pushed by the caller right-to-left so the
    // receiver (when present) sits at the lowest address: `[ebp+8]` is
    // argument 0, `[ebp+12]` argument 1, and so on.
    for i in 0..method.num_args {
        let arg_loc = match alloc.locations.get(&Temp(i as u32)) {
            Some(loc) => *loc,
            None => continue, // argument never referenced in the body
        };
        let src = format!("[ebp+{}]", 8 + 4 * i);
        match arg_loc {
            Location::Reg(r) => writeln!(out, "    mov {}, {src}", PHYSICAL_REGISTERS[r]).unwrap(),
            Location::Stack(off) => {
                writeln!(out, "    mov eax, {src}").unwrap();
                writeln!(out, "    mov {}, eax", stack_operand(off)).unwrap();
            }
        }
    }

    for instr in &tiler.out {
        emit_instr(out, instr, &alloc);
    }

    out.push_str("    mov esp, ebp\n");
    out.push_str("    pop ebp\n");
    out.push_str("    ret\n\n");
    Ok(())
}

fn stack_operand(offset: i32) -> String {
    if offset < 0 {
        format!("[ebp{offset}]")
    } else {
        format!("[ebp+{offset}]")
    }
}

fn loc_of(alloc: &Allocation, t: Temp) -> Location {
    alloc.locations.get(&t).copied().unwrap_or(Location::Reg(0))
}

fn operand_str(loc: Location) -> String {
    match loc {
        Location::Reg(r) => PHYSICAL_REGISTERS[r].to_string(),
        Location::Stack(off) => stack_operand(off),
    }
}

/// Loads `t` into `scratch` if it's spilled, returning the operand string
/// to use in its place; a register-resident temp is used directly.
fn load_to_scratch(out: &mut String, alloc: &Allocation, t: Temp, scratch: &str) -> String {
    match loc_of(alloc, t) {
        Location::Reg(r) => PHYSICAL_REGISTERS[r].to_string(),
        Location::Stack(off) => {
            writeln!(out, "    mov {scratch}, {}", stack_operand(off)).unwrap();
            scratch.to_string()
        }
    }
}

fn operand_val(out: &mut String, alloc: &Allocation, v: &VOperand, scratch: &str) -> String {
    match v {
        VOperand::Imm(n) => n.to_string(),
        VOperand::Temp(t) => load_to_scratch(out, alloc, *t, scratch),
    }
}

fn store_result(out: &mut String, alloc: &Allocation, dst: Temp, from_reg: &str) {
    match loc_of(alloc, dst) {
        Location::Reg(r) => {
            if PHYSICAL_REGISTERS[r] != from_reg {
                writeln!(out, "    mov {}, {from_reg}", PHYSICAL_REGISTERS[r]).unwrap();
            }
        }
        Location::Stack(off) => writeln!(out, "    mov {}, {from_reg}", stack_operand(off)).unwrap(),
    }
}

fn binop_mnemonic(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Sub => "sub",
        BinOp::And => "and",
        BinOp::Or => "or",
        BinOp::Mul | BinOp::Div | BinOp::Rem => unreachable!("handled separately"),
    }
}

fn jcc_mnemonic(op: RelOp) -> &'static str {
    match op {
        RelOp::Eq => "je",
        RelOp::Ne => "jne",
        RelOp::Lt => "jl",
        RelOp::Le => "jle",
        RelOp::Gt => "jg",
        RelOp::Ge => "jge",
    }
}

fn emit_instr(out: &mut String, instr: &VInstr, alloc: &Allocation) {
    match instr {
        VInstr::Label(l) => {
            writeln!(out, "{l}:").unwrap();
        }
        VInstr::Jmp(l) => {
            writeln!(out, "    jmp {l}").unwrap();
        }
        VInstr::Jcc(op, l) => {
            writeln!(out, "    {} {l}", jcc_mnemonic(*op)).unwrap();
        }
        VInstr::Mov(dst, src) => {
            let v = operand_val(out, alloc, src, "eax");
            let reg = v_to_reg(out, &v);
            store_result(out, alloc, *dst, &reg);
        }
        VInstr::LoadLabel(dst, label) => {
            writeln!(out, "    mov eax, {label}").unwrap();
            store_result(out, alloc, *dst, "eax");
        }
        VInstr::Load(dst, base, offset) => {
            let base_reg = load_to_scratch(out, alloc, *base, "eax");
            writeln!(out, "    mov edx, [{base_reg}+{offset}]").unwrap();
            store_result(out, alloc, *dst, "edx");
        }
        VInstr::Store(base, offset, src) => {
            let base_reg = load_to_scratch(out, alloc, *base, "eax");
            let v = operand_val(out, alloc, src, "edx");
            writeln!(out, "    mov [{base_reg}+{offset}], {v}").unwrap();
        }
        VInstr::Cmp(l, r) => {
            let lr = load_to_scratch(out, alloc, *l, "eax");
            let rv = operand_val(out, alloc, r, "edx");
            writeln!(out, "    cmp {lr}, {rv}").unwrap();
        }
        VInstr::BinOp(BinOp::Mul, dst, left, right) => {
            let lv = load_to_scratch(out, alloc, *left, "eax");
            writeln!(out, "    mov eax, {lv}").unwrap();
            let rv = operand_val(out, alloc, right, "ecx");
            writeln!(out, "    imul eax, {rv}").unwrap();
            store_result(out, alloc, *dst, "eax");
        }
        VInstr::BinOp(op @ (BinOp::Div | BinOp::Rem), dst, left, right) => {
            let lv = load_to_scratch(out, alloc, *left, "eax");
            writeln!(out, "    mov eax, {lv}").unwrap();
            let rv = operand_val(out, alloc, right, "ecx");
            writeln!(out, "    cmp {rv}, 0").unwrap();
            writeln!(out, "    je __exception").unwrap();
            out.push_str("    cdq\n");
            writeln!(out, "    idiv {rv}").unwrap();
            let result_reg = if *op == BinOp::Div { "eax" } else { "edx" };
            store_result(out, alloc, *dst, result_reg);
        }
        VInstr::BinOp(op, dst, left, right) => {
            let lv = load_to_scratch(out, alloc, *left, "eax");
            writeln!(out, "    mov eax, {lv}").unwrap();
            let rv = operand_val(out, alloc, right, "edx");
            writeln!(out, "    {} eax, {rv}", binop_mnemonic(*op)).unwrap();
            store_result(out, alloc, *dst, "eax");
        }
        VInstr::Call(dst, label, args) => {
            for a in args.iter().rev() {
                let v = operand_val(out, alloc, a, "eax");
                writeln!(out, "    push {v}").unwrap();
            }
            writeln!(out, "    call {label}").unwrap();
            if !args.is_empty() {
                writeln!(out, "    add esp, {}", 4 * args.len()).unwrap();
            }
            if let Some(dst) = dst {
                store_result(out, alloc, *dst, "eax");
            }
        }
        VInstr::CallIndirect(dst, target, args) => {
            for a in args.iter().rev() {
                let v = operand_val(out, alloc, a, "eax");
                writeln!(out, "    push {v}").unwrap();
            }
            let target_reg = load_to_scratch(out, alloc, *target, "eax");
            writeln!(out, "    call {target_reg}").unwrap();
            if !args.is_empty() {
                writeln!(out, "    add esp, {}", 4 * args.len()).unwrap();
            }
            if let Some(dst) = dst {
                store_result(out, alloc, *dst, "eax");
            }
        }
        VInstr::Ret(None) => {
            out.push_str("    mov esp, ebp\n    pop ebp\n    ret\n");
        }
        VInstr::Ret(Some(v)) => {
            let rv = operand_val(out, alloc, v, "eax");
            writeln!(out, "    mov eax, {rv}").unwrap();
            out.push_str("    mov esp, ebp\n    pop ebp\n    ret\n");
        }
    }
}

/// `operand_val` resolves a `VOperand` to either a register name or an
/// immediate's decimal text; `Mov`'s source needs to be a register before
/// `store_result` can move it into a possibly-different destination, so an
/// immediate operand is materialized into `eax` first.
fn v_to_reg(out: &mut String, v: &str) -> String {
    if v.parse::<i32>().is_ok() {
        writeln!(out, "    mov eax, {v}").unwrap();
        "eax".to_string()
    } else {
        v.to_string()
    }
}
