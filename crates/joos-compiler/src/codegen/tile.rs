//! Maximal-munch tile selection (spec §4.8): a bottom-up tree cover,
//! expressed as a direct recursive walk rather than a tabulated DP — the
//! canonicalized TIR this module runs over is tree-shaped (no DAG sharing
//! survives canonicalization, since every `Eseq` was flattened into its own
//! statement), so there is no sub-result to memoize and a plain recursive
//! "munch the biggest tile that matches, recurse on its children" walk is
//! already the whole algorithm.
//!
//! Produces virtual x86 instructions over `Temp`s (`VInstr`/`VOperand`
//! below); `codegen::regalloc` assigns each `Temp` a physical register or a
//! stack slot afterward.

use crate::ir::{BinOp, Expr, Label, RelOp, Stmt, Temp, TempGen};

#[derive(Debug, Clone)]
pub enum VOperand {
    Temp(Temp),
    Imm(i32),
}

#[derive(Debug, Clone)]
pub enum VInstr {
    /// `dst := src`.
    Mov(Temp, VOperand),
    /// `dst := left op right`, `left`/`dst` may be the same temp (x86's
    /// destructive two-operand form is chosen at emission time).
    BinOp(BinOp, Temp, Temp, VOperand),
    /// `dst := [base + offset]`.
    Load(Temp, Temp, i32),
    /// `[base + offset] := src`.
    Store(Temp, i32, VOperand),
    /// `dst := &label`.
    LoadLabel(Temp, Label),
    Cmp(Temp, VOperand),
    Jcc(RelOp, Label),
    Jmp(Label),
    Label(Label),
    /// Direct call to a known label; `dst` is `None` for a `void` result.
    Call(Option<Temp>, Label, Vec<VOperand>),
    /// Call through a computed address (virtual dispatch).
    CallIndirect(Option<Temp>, Temp, Vec<VOperand>),
    Ret(Option<VOperand>),
}

pub struct Tiler<'a> {
    temps: &'a mut TempGen,
    pub out: Vec<VInstr>,
}

impl<'a> Tiler<'a> {
    pub fn new(temps: &'a mut TempGen) -> Self {
        Tiler { temps, out: Vec::new() }
    }

    fn fresh(&mut self) -> Temp {
        self.temps.fresh()
    }

    pub fn munch_stmts(&mut self, stmts: &[Stmt]) {
        for s in stmts {
            self.munch_stmt(s);
        }
    }

    fn munch_stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Seq(stmts) => self.munch_stmts(stmts),
            Stmt::Label(l) => self.out.push(VInstr::Label(l.clone())),
            Stmt::Jump(l) => self.out.push(VInstr::Jmp(l.clone())),
            Stmt::Return(None) => self.out.push(VInstr::Ret(None)),
            Stmt::Return(Some(e)) => {
                let v = self.munch_operand(e);
                self.out.push(VInstr::Ret(Some(v)));
            }
            Stmt::Exp(e) => {
                self.munch_expr(e);
            }
            Stmt::Move(dst, src) => self.munch_move(dst, src),
            Stmt::CJump(op, l, r, t, f) => {
                let lt = self.munch_expr(l);
                let rv = self.munch_operand(r);
                self.out.push(VInstr::Cmp(lt, rv));
                self.out.push(VInstr::Jcc(*op, t.clone()));
                self.out.push(VInstr::Jmp(f.clone()));
            }
        }
    }

    fn munch_move(&mut self, dst: &Expr, src: &Expr) {
        match dst {
            Expr::Temp(t) => {
                let v = self.munch_operand(src);
                self.out.push(VInstr::Mov(*t, v));
            }
            Expr::Mem(addr) => {
                let base = self.munch_expr(addr);
                let v = self.munch_operand(src);
                self.out.push(VInstr::Store(base, 0, v));
            }
            _ => unreachable!("canonicalized TIR only assigns to Temp or Mem"),
        }
    }

    /// Munches `e` as a value operand, reusing an immediate tile directly
    /// instead of forcing it through a temporary first.
    fn munch_operand(&mut self, e: &Expr) -> VOperand {
        if let Expr::Const(n) = e {
            return VOperand::Imm(*n);
        }
        VOperand::Temp(self.munch_expr(e))
    }

    fn munch_expr(&mut self, e: &Expr) -> Temp {
        match e {
            Expr::Const(n) => {
                let t = self.fresh();
                self.out.push(VInstr::Mov(t, VOperand::Imm(*n)));
                t
            }
            Expr::Temp(t) => *t,
            Expr::Name(label) => {
                let t = self.fresh();
                self.out.push(VInstr::LoadLabel(t, label.clone()));
                t
            }
            Expr::Mem(addr) => {
                // `addr + const` tiles directly into a single `Load` with a
                // folded displacement, the classic `[base+off]` tile.
                if let Expr::Binop(BinOp::Add, l, r) = addr.as_ref() {
                    if let Expr::Const(n) = r.as_ref() {
                        let base = self.munch_expr(l);
                        let t = self.fresh();
                        self.out.push(VInstr::Load(t, base, *n));
                        return t;
                    }
                }
                let base = self.munch_expr(addr);
                let t = self.fresh();
                self.out.push(VInstr::Load(t, base, 0));
                t
            }
            Expr::Binop(op, l, r) => {
                let lt = self.munch_expr(l);
                let rv = self.munch_operand(r);
                let dst = self.fresh();
                self.out.push(VInstr::BinOp(*op, dst, lt, rv));
                dst
            }
            Expr::Call(target, args) => {
                let arg_vals: Vec<VOperand> = args.iter().map(|a| self.munch_operand(a)).collect();
                let dst = self.fresh();
                match target.as_ref() {
                    Expr::Name(label) => {
                        self.out.push(VInstr::Call(Some(dst), label.clone(), arg_vals));
                    }
                    _ => {
                        let target_t = self.munch_expr(target);
                        self.out.push(VInstr::CallIndirect(Some(dst), target_t, arg_vals));
                    }
                }
                dst
            }
            Expr::Eseq(..) => unreachable!("canon::canonicalize removes every Eseq before tiling"),
        }
    }
}
