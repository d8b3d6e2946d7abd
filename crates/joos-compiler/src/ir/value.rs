//! Tree-IR value types: temporaries and labels (spec §4.6).
//!
//! Replaces the teacher's SSA-register `RegisterId`/`Register`/`IrValue`
//! (built for a CFG-of-basic-blocks IR) with the abstract, untyped
//! temporaries a tree IR needs: a `Temp` names a storage location, nothing
//! more — types were already checked by `joos-checker` and every value is
//! one machine word (`int`/`char`/`boolean`/`byte`/`short`, or a
//! reference/array pointer, all 32 bits), so unlike the teacher's
//! `Register` there is no type tag to carry alongside it.

use std::fmt;

/// An abstract storage location, assigned a machine register or a stack
/// slot by `codegen::regalloc` (spec §4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub u32);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Allocates fresh temporaries during lowering; one instance per method
/// body, mirroring the teacher's per-function `RegisterId` counter.
#[derive(Debug, Default)]
pub struct TempGen(u32);

impl TempGen {
    pub fn new() -> Self {
        TempGen(0)
    }

    pub fn fresh(&mut self) -> Temp {
        let t = Temp(self.0);
        self.0 += 1;
        t
    }
}

/// A textual assembly label: a mangled method/static-method/class/field
/// label (`mangle::LabelTable`) or a fresh branch target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label(pub String);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates fresh, program-unique branch-target labels (`.L0_hint`, ...).
#[derive(Debug, Default)]
pub struct LabelGen(u32);

impl LabelGen {
    pub fn new() -> Self {
        LabelGen(0)
    }

    pub fn fresh(&mut self, hint: &str) -> Label {
        let n = self.0;
        self.0 += 1;
        Label(format!(".L{n}_{hint}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temps_are_fresh() {
        let mut g = TempGen::new();
        assert_ne!(g.fresh(), g.fresh());
    }

    #[test]
    fn labels_carry_a_hint() {
        let mut g = LabelGen::new();
        assert_eq!(g.fresh("else").0, ".L0_else");
    }
}
