//! Static-semantics pipeline for Joos source programs: weeder, type linker,
//! hierarchy checker, name/expression resolver, and per-method CFG analysis
//! (spec §2's "static-semantics pipeline over an AST").
//!
//! Each pass runs to completion over the whole program before the next
//! starts and hands control forward only if it recorded zero user errors
//! (spec §7: "hard across passes — a pass that recorded any user error does
//! not hand control to the next"). [`check`] is the single entry point every
//! later phase (`joos-compiler`, `joos-cli`) drives the pipeline through.

#![warn(missing_docs)]

pub mod cfg;
pub mod decl;
pub mod diagnostic;
pub mod error;
pub mod hierarchy;
pub mod linker;
pub mod resolve;
pub mod trie;
pub mod weeder;

pub use decl::{ClassInfo, Decl, DeclTable, FieldInfo, InterfaceInfo, MethodInfo, WellKnown};
pub use error::{CfgError, DeadAssignment, HierarchyError, LinkError, ResolveError, WeedError};
pub use linker::{Program, UnitInfo};
pub use resolve::{find_entry_point, NameKind, Resolutions};

use joos_parser::ast::{CompilationUnit, NodeId, TypeDecl};
use joos_types::DeclId;

/// Which pass aborted the pipeline (spec §7's "phase").
#[derive(Debug)]
pub enum CheckErrors {
    /// Modifier-combination legality (spec §4's weeder, run pre-link).
    Weed(Vec<WeedError>),
    /// Type linking (spec §4.2).
    Link(Vec<LinkError>),
    /// Hierarchy checking (spec §4.3).
    Hierarchy(Vec<HierarchyError>),
    /// Name disambiguation and expression resolution (spec §4.4), including
    /// a failed entry-point search.
    Resolve(Vec<ResolveError>),
    /// Reachability analysis (spec §4.5).
    Cfg(Vec<CfgError>),
}

/// A fully checked program, ready for `joos-compiler`'s TIR builder.
pub struct CheckedProgram {
    /// The linked declaration table, package trie, and per-unit import
    /// contexts (spec §4.1/§4.2).
    pub program: Program,
    /// Per-expression resolved types and name classifications (spec §4.4).
    pub resolutions: Resolutions,
    /// The class declaring the program's unique `public static int test()`
    /// entry point.
    pub entry_point: DeclId,
    /// Dead-assignment findings (spec §7's only warning kind) — never
    /// affects the exit code.
    pub warnings: Vec<DeadAssignment>,
}

/// Runs every static-semantics pass over `units` in spec §2's pipeline
/// order, stopping at the first pass that records a user error.
pub fn check(units: &[CompilationUnit]) -> Result<CheckedProgram, CheckErrors> {
    let weed_errors: Vec<WeedError> = units.iter().flat_map(weeder::weed_unit).collect();
    if !weed_errors.is_empty() {
        return Err(CheckErrors::Weed(weed_errors));
    }

    let program = linker::link(units).map_err(CheckErrors::Link)?;

    let hierarchy_errors = hierarchy::check(&program);
    if !hierarchy_errors.is_empty() {
        return Err(CheckErrors::Hierarchy(hierarchy_errors));
    }

    let (resolutions, resolve_errors) = resolve::resolve_program(&program, units);
    if !resolve_errors.is_empty() {
        return Err(CheckErrors::Resolve(resolve_errors));
    }
    let entry_point = resolve::find_entry_point(&program).map_err(|e| CheckErrors::Resolve(vec![e]))?;

    let mut cfg_errors = Vec::new();
    let mut warnings = Vec::new();
    for unit in units {
        let TypeDecl::Class(class_ast) = &unit.type_decl else { continue };
        let Some(class_id) = program.decls.id_of_node(class_ast.id) else { continue };
        for method_ast in class_ast.constructors.iter().chain(class_ast.methods.iter()) {
            let Some(body) = &method_ast.body else { continue };
            let Some(info) = method_info_by_node(&program.decls, class_id, method_ast.id) else { continue };
            let (mut errs, mut dead) = cfg::check_method(info, body);
            cfg_errors.append(&mut errs);
            warnings.append(&mut dead);
        }
    }
    if !cfg_errors.is_empty() {
        return Err(CheckErrors::Cfg(cfg_errors));
    }

    Ok(CheckedProgram { program, resolutions, entry_point, warnings })
}

fn method_info_by_node<'a>(decls: &'a DeclTable, class: DeclId, node: NodeId) -> Option<&'a MethodInfo> {
    match decls.get(class) {
        Decl::Class(c) => c.constructors.iter().chain(c.methods.iter()).find(|m| m.node == node),
        Decl::Interface(i) => i.methods.iter().find(|m| m.node == node),
    }
}
