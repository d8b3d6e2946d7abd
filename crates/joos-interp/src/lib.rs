//! Reference interpreter for canonicalized Joos tree IR.
//!
//! Walks `joos_compiler::LoweredProgram` directly — no tiling, no register
//! allocation, no assembly — against a single [`memory::Memory`] that models
//! spec §6's runtime ABI in-process instead of linking against hand-written
//! `__malloc`/`__exception`/`__debexit` assembly stubs. Exists purely as a
//! fast, single-binary way for tests to assert on a program's observable
//! behavior (its exit code, its writes to standard output) without an
//! assembler or a 32-bit execution environment on hand.
//!
//! Grounded on `raya-core::vm::interpreter`'s dispatch-loop/frame shape:
//! a frame is a temporary-to-value map plus an explicit program counter
//! indexed into the method's already-flat statement list, one `call_label`
//! per call (native handler or recurse into a new frame), matching spec
//! §6's "an instruction pointer indexed by pre-numbered TIR nodes."

pub mod error;
mod memory;
mod natives;

use error::{InterpError, InterpResult};
use joos_compiler::ir::{BinOp, Expr, Label, RelOp, Stmt};
use joos_compiler::lower::{LoweredMethod, LoweredProgram};
use memory::Memory;
use rustc_hash::FxHashMap;

/// A method activation: its temporaries, bound at call entry and mutated by
/// every `Move` the body executes.
struct Frame {
    temps: FxHashMap<u32, i32>,
}

impl Frame {
    fn new() -> Self {
        Frame { temps: FxHashMap::default() }
    }

    fn get(&self, id: u32) -> InterpResult<i32> {
        self.temps.get(&id).copied().ok_or(InterpError::UnboundTemp)
    }

    fn set(&mut self, id: u32, value: i32) {
        self.temps.insert(id, value);
    }
}

pub struct Interpreter<'p> {
    memory: Memory,
    methods: FxHashMap<Label, &'p LoweredMethod>,
    /// Everything written via `NATIVEjava.io.OutputStream.nativeWrite`, one
    /// byte per call — `run_program`'s caller gets this back instead of it
    /// going to the process's real stdout, so tests can assert on it.
    output: Vec<u8>,
}

impl<'p> Interpreter<'p> {
    fn new() -> Self {
        Interpreter { memory: Memory::new(), methods: FxHashMap::default(), output: Vec::new() }
    }

    /// Lays out every class's dispatch-vector table, every static field
    /// slot, and every interned string literal in [`Memory`] before any
    /// code runs — the interpreter's analogue of `codegen::asm`'s `.data`
    /// section.
    fn init_memory(&mut self, program: &'p LoweredProgram) {
        for class in &program.classes {
            for method in &class.methods {
                self.methods.insert(method.label.clone(), method);
            }
            let table_addr = self.memory.malloc(4 * class.dispatch_vector.len() as i32);
            for (i, slot) in class.dispatch_vector.iter().enumerate() {
                let value = match slot {
                    Some(target) => self.memory.code_addr_for(target),
                    None => 0,
                };
                self.memory.store_word(table_addr + 4 * i as i32, value).expect("just-allocated slot");
            }
            self.memory.bind_data_label(class.label.clone(), table_addr);
        }
        for field in &program.static_fields {
            let addr = self.memory.malloc(4);
            self.memory.bind_data_label(field.clone(), addr);
        }
        for (label, value) in &program.string_literals {
            let len_addr = self.memory.malloc(4);
            self.memory.store_word(len_addr, value.len() as i32).expect("just-allocated slot");
            let data_addr = self.memory.append_bytes(value.as_bytes());
            debug_assert_eq!(data_addr, len_addr + 4, "length word and data must be contiguous for fromLiteral's -4 convention");
            self.memory.bind_data_label(label.clone(), data_addr);
        }
    }

    fn call_label(&mut self, label: &Label, args: &[i32]) -> InterpResult<i32> {
        if let Some(result) = natives::dispatch(self, label, args)? {
            return Ok(result);
        }
        let method = *self.methods.get(label).ok_or_else(|| InterpError::UnknownLabel(label.clone()))?;
        self.exec_method(method, args)
    }

    fn exec_method(&mut self, method: &LoweredMethod, args: &[i32]) -> InterpResult<i32> {
        let mut frame = Frame::new();
        for (i, &value) in args.iter().enumerate() {
            frame.set(i as u32, value);
        }
        self.exec_body(&method.body, &mut frame)
    }

    /// Runs a flat, already-canonicalized statement list with an explicit
    /// program counter, resolving `Jump`/`CJump` targets through a
    /// label-to-index map built once per call.
    fn exec_body(&mut self, body: &[Stmt], frame: &mut Frame) -> InterpResult<i32> {
        let mut labels = FxHashMap::default();
        for (i, stmt) in body.iter().enumerate() {
            if let Stmt::Label(l) = stmt {
                labels.insert(l.clone(), i);
            }
        }
        let target = |labels: &FxHashMap<Label, usize>, l: &Label| -> InterpResult<usize> {
            labels.get(l).copied().ok_or_else(|| InterpError::UnknownLabel(l.clone()))
        };

        let mut pc = 0usize;
        loop {
            let Some(stmt) = body.get(pc) else {
                return Ok(0);
            };
            match stmt {
                Stmt::Move(dst, src) => {
                    let value = self.eval(src, frame)?;
                    self.store(dst, value, frame)?;
                    pc += 1;
                }
                Stmt::Exp(e) => {
                    self.eval(e, frame)?;
                    pc += 1;
                }
                Stmt::Jump(l) => pc = target(&labels, l)?,
                Stmt::CJump(op, l, r, t, f) => {
                    let lv = self.eval(l, frame)?;
                    let rv = self.eval(r, frame)?;
                    pc = if rel_holds(*op, lv, rv) { target(&labels, t)? } else { target(&labels, f)? };
                }
                Stmt::Label(_) => pc += 1,
                Stmt::Return(value) => {
                    return match value {
                        Some(e) => self.eval(e, frame),
                        None => Ok(0),
                    };
                }
                Stmt::Seq(_) => unreachable!("canon.rs flattens every Seq before lowering hands a body to this crate"),
            }
        }
    }

    fn store(&mut self, dst: &Expr, value: i32, frame: &mut Frame) -> InterpResult<()> {
        match dst {
            Expr::Temp(t) => {
                frame.set(t.0, value);
                Ok(())
            }
            Expr::Mem(addr) => {
                let a = self.eval(addr, frame)?;
                self.memory.store_word(a, value)
            }
            _ => unreachable!("name resolution only ever produces Temp/Mem assignment targets"),
        }
    }

    fn eval(&mut self, expr: &Expr, frame: &mut Frame) -> InterpResult<i32> {
        match expr {
            Expr::Const(n) => Ok(*n),
            Expr::Temp(t) => frame.get(t.0),
            Expr::Mem(addr) => {
                let a = self.eval(addr, frame)?;
                self.memory.load_word(a)
            }
            Expr::Binop(op, l, r) => {
                let lv = self.eval(l, frame)?;
                let rv = self.eval(r, frame)?;
                eval_binop(*op, lv, rv)
            }
            Expr::Name(label) => self.memory.addr_of(label).ok_or_else(|| InterpError::UnknownLabel(label.clone())),
            Expr::Call(target, args) => {
                let mut values = Vec::with_capacity(args.len());
                for a in args {
                    values.push(self.eval(a, frame)?);
                }
                match target.as_ref() {
                    Expr::Name(label) => self.call_label(label, &values),
                    other => {
                        let addr = self.eval(other, frame)?;
                        let label = self.memory.label_at(addr)?;
                        self.call_label(&label, &values)
                    }
                }
            }
            Expr::Eseq(..) => unreachable!("canon.rs removes every Eseq before lowering hands a body to this crate"),
        }
    }
}

fn rel_holds(op: RelOp, l: i32, r: i32) -> bool {
    match op {
        RelOp::Eq => l == r,
        RelOp::Ne => l != r,
        RelOp::Lt => l < r,
        RelOp::Le => l <= r,
        RelOp::Gt => l > r,
        RelOp::Ge => l >= r,
    }
}

fn eval_binop(op: BinOp, l: i32, r: i32) -> InterpResult<i32> {
    Ok(match op {
        BinOp::Add => l.wrapping_add(r),
        BinOp::Sub => l.wrapping_sub(r),
        BinOp::Mul => l.wrapping_mul(r),
        BinOp::Div => {
            if r == 0 {
                return Err(InterpError::Trapped);
            }
            l.wrapping_div(r)
        }
        BinOp::Rem => {
            if r == 0 {
                return Err(InterpError::Trapped);
            }
            l.wrapping_rem(r)
        }
        BinOp::And => l & r,
        BinOp::Or => l | r,
    })
}

/// What a run produced: the exit code `_start` would have handed
/// `__debexit` (the entry point's own return value, since `codegen::asm`'s
/// `_start` never does anything to it but push it and call `__debexit`),
/// and every byte the program wrote through
/// `NATIVEjava.io.OutputStream.nativeWrite`.
pub struct RunOutcome {
    pub exit_code: i32,
    pub output: Vec<u8>,
}

/// Runs `program` to completion the way `codegen::asm`'s `_start` does:
/// the canonicalized static initializers, then the selected entry point,
/// whose return value becomes the exit code. An uncaught `__exception`
/// trap reports spec §7's status 13; an explicit `__debexit(code)` anywhere
/// in the call tree short-circuits straight to `code`.
pub fn run_program(program: &LoweredProgram) -> InterpResult<RunOutcome> {
    let mut interp = Interpreter::new();
    interp.init_memory(program);
    let mut frame = Frame::new();
    if let Err(e) = interp.exec_body(&program.static_init, &mut frame) {
        return match e {
            InterpError::Exited(code) => Ok(RunOutcome { exit_code: code, output: interp.output }),
            InterpError::Trapped => Ok(RunOutcome { exit_code: 13, output: interp.output }),
            e => Err(e),
        };
    }
    let exit_code = match interp.call_label(&program.entry_label, &[]) {
        Ok(value) => value,
        Err(InterpError::Exited(code)) => code,
        Err(InterpError::Trapped) => 13,
        Err(e) => return Err(e),
    };
    Ok(RunOutcome { exit_code, output: interp.output })
}
