//! Tree IR (spec §4.6/§4.7): the intermediate language AST lowering
//! produces and canonicalization flattens before tile selection.

pub mod instr;
pub mod pretty;
pub mod value;

pub use instr::{BinOp, Expr, RelOp, Stmt};
pub use pretty::PrettyPrint;
pub use value::{Label, LabelGen, Temp, TempGen};
