//! Hierarchy checker (spec §4.3): acyclicity, method-set construction, and
//! override rules. Also the concrete [`Hierarchy`] implementation
//! `joos-types`'s assignability/cast predicates run against.

use crate::decl::{Decl, DeclTable};
use crate::error::HierarchyError;
use crate::linker::Program;
use joos_types::{DeclId, Hierarchy, Signature};
use rustc_hash::{FxHashMap, FxHashSet};

impl Hierarchy for DeclTable {
    fn is_interface(&self, id: DeclId) -> bool {
        self.get(id).is_interface()
    }
    fn is_final_class(&self, id: DeclId) -> bool {
        matches!(self.get(id), Decl::Class(c) if c.modifiers.final_)
    }
    fn super_class(&self, id: DeclId) -> Option<DeclId> {
        match self.get(id) {
            Decl::Class(c) => c.super_class,
            Decl::Interface(_) => None,
        }
    }
    fn super_interfaces(&self, id: DeclId) -> Vec<DeclId> {
        match self.get(id) {
            Decl::Class(c) => c.interfaces.clone(),
            Decl::Interface(i) => i.extends.clone(),
        }
    }
    fn object_id(&self) -> DeclId {
        self.well_known().object
    }
    fn cloneable_id(&self) -> DeclId {
        self.well_known().cloneable
    }
    fn serializable_id(&self) -> DeclId {
        self.well_known().serializable
    }
}

/// Direct parents for method-set purposes: superclass/superinterfaces, plus
/// `java.lang.Object` for interfaces, which have no superclass slot of their
/// own but still implicitly expose Object's public methods (spec §4.3 "an
/// interface's implicit members").
fn parents_including_object(decls: &DeclTable, id: DeclId) -> Vec<DeclId> {
    let mut parents = decls.super_interfaces(id);
    if let Some(sup) = decls.super_class(id) {
        parents.push(sup);
    } else if decls.is_interface(id) {
        parents.push(decls.well_known().object);
    }
    parents
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Checks every class/interface in `program`, returning accumulated errors.
/// Short-circuits the later per-method checks (method-set construction,
/// overrides) for a declaration if its own extension/acyclicity checks
/// already failed, since inherited-member bookkeeping on an invalid graph
/// has no well-defined answer.
pub fn check(program: &Program) -> Vec<HierarchyError> {
    let mut errors = Vec::new();
    check_proper_extension(&program.decls, &mut errors);
    let cyclic = check_acyclicity(&program.decls, &mut errors);
    check_local_duplicates(&program.decls, &mut errors);

    for id in program.decls.ids() {
        if cyclic.contains(&id) {
            continue;
        }
        check_method_sets(&program.decls, id, &mut errors);
    }
    errors
}

fn check_proper_extension(decls: &DeclTable, errors: &mut Vec<HierarchyError>) {
    for id in decls.ids() {
        match decls.get(id) {
            Decl::Class(c) => {
                if let Some(sup) = c.super_class {
                    if sup != id && decls.is_final_class(sup) {
                        errors.push(HierarchyError::ExtendsFinalClass {
                            class: c.simple_name.clone(),
                            parent: decls.get(sup).simple_name().to_string(),
                            span: c.span,
                        });
                    }
                }
                let mut seen = FxHashSet::default();
                for iface in &c.interfaces {
                    if !seen.insert(*iface) {
                        errors.push(HierarchyError::DuplicateInterface {
                            name: decls.get(*iface).simple_name().to_string(),
                            span: c.span,
                        });
                    }
                }
            }
            Decl::Interface(i) => {
                let mut seen = FxHashSet::default();
                for ext in &i.extends {
                    if !seen.insert(*ext) {
                        errors.push(HierarchyError::DuplicateInterface {
                            name: decls.get(*ext).simple_name().to_string(),
                            span: i.span,
                        });
                    }
                }
            }
        }
    }
}

/// DFS with three-color marking. Returns the set of declarations involved in
/// a detected cycle, so later passes can skip them.
fn check_acyclicity(decls: &DeclTable, errors: &mut Vec<HierarchyError>) -> FxHashSet<DeclId> {
    let mut color: FxHashMap<DeclId, Color> = FxHashMap::default();
    let mut cyclic = FxHashSet::default();

    fn visit(
        decls: &DeclTable,
        id: DeclId,
        color: &mut FxHashMap<DeclId, Color>,
        cyclic: &mut FxHashSet<DeclId>,
        errors: &mut Vec<HierarchyError>,
    ) {
        match color.get(&id) {
            Some(Color::Black) => return,
            Some(Color::Gray) => {
                cyclic.insert(id);
                errors.push(HierarchyError::CyclicInheritance {
                    name: decls.get(id).simple_name().to_string(),
                    span: decls.get(id).span(),
                });
                return;
            }
            _ => {}
        }
        color.insert(id, Color::Gray);
        let mut parents: Vec<DeclId> = decls.super_interfaces(id);
        if let Some(sup) = decls.super_class(id) {
            if sup != id {
                parents.push(sup);
            }
        }
        for parent in parents {
            visit(decls, parent, color, cyclic, errors);
            if cyclic.contains(&parent) {
                cyclic.insert(id);
            }
        }
        color.insert(id, Color::Black);
    }

    for id in decls.ids() {
        visit(decls, id, &mut color, &mut cyclic, errors);
    }
    cyclic
}

fn check_local_duplicates(decls: &DeclTable, errors: &mut Vec<HierarchyError>) {
    for id in decls.ids() {
        let decl = decls.get(id);
        let mut seen_methods = FxHashSet::default();
        for m in decl.methods() {
            if !seen_methods.insert(m.signature()) {
                errors.push(HierarchyError::DuplicateSignature {
                    signature: m.signature().to_string(),
                    owner: decl.simple_name().to_string(),
                    span: m.span,
                });
            }
        }
        if let Decl::Class(c) = decl {
            let mut seen_ctors = FxHashSet::default();
            for ctor in &c.constructors {
                let fingerprint: Vec<_> = ctor.params.iter().map(|p| p.ty.clone()).collect();
                if !seen_ctors.insert(fingerprint) {
                    errors.push(HierarchyError::DuplicateConstructor {
                        signature: ctor.signature().to_string(),
                        owner: c.simple_name.clone(),
                        span: ctor.span,
                    });
                }
            }
        }
    }
}

/// Per-declaration method set: every signature reachable through inheritance,
/// classified as abstract or concrete, plus override-rule checks against the
/// direct superclass/superinterfaces.
struct MethodSet {
    abstract_methods: FxHashMap<Signature, DeclId>,
    concrete_methods: FxHashMap<Signature, DeclId>,
}

fn collect_method_set(decls: &DeclTable, id: DeclId, errors: &mut Vec<HierarchyError>) -> MethodSet {
    let mut abstract_methods = FxHashMap::default();
    let mut concrete_methods = FxHashMap::default();

    for parent in parents_including_object(decls, id) {
        let parent_set = collect_method_set(decls, parent, errors);
        for (sig, owner) in parent_set.abstract_methods {
            abstract_methods.entry(sig).or_insert(owner);
        }
        for (sig, owner) in parent_set.concrete_methods {
            concrete_methods.entry(sig).or_insert(owner);
        }
    }

    for m in decls.get(id).methods() {
        let sig = m.signature();
        if m.has_body {
            // A concrete method declared here satisfies any inherited
            // abstract entry with the same signature.
            abstract_methods.remove(&sig);
            concrete_methods.insert(sig, id);
        } else {
            abstract_methods.insert(sig, id);
        }
    }

    MethodSet { abstract_methods, concrete_methods }
}

fn check_method_sets(decls: &DeclTable, id: DeclId, errors: &mut Vec<HierarchyError>) {
    let parents = parents_including_object(decls, id);
    let inherited_sets: Vec<MethodSet> = parents.iter().map(|p| collect_method_set(decls, *p, errors)).collect();

    let mut inherited_abstract: FxHashMap<Signature, DeclId> = FxHashMap::default();
    let mut inherited_concrete: FxHashMap<Signature, DeclId> = FxHashMap::default();
    for set in &inherited_sets {
        for (sig, owner) in &set.abstract_methods {
            inherited_abstract.entry(sig.clone()).or_insert(*owner);
        }
        for (sig, owner) in &set.concrete_methods {
            inherited_concrete.entry(sig.clone()).or_insert(*owner);
        }
    }

    let decl = decls.get(id);
    let mut implements_covered: FxHashSet<Signature> = FxHashSet::default();

    for m in decl.methods() {
        let sig = m.signature();
        let span = m.span;

        if let Some(parent_owner) = inherited_concrete.get(&sig).or_else(|| inherited_abstract.get(&sig)) {
            let parent_method = decls
                .get(*parent_owner)
                .methods()
                .iter()
                .find(|pm| pm.signature() == sig);
            if let Some(parent_method) = parent_method {
                if parent_method.modifiers.is_static != m.modifiers.is_static {
                    if m.modifiers.is_static {
                        errors.push(HierarchyError::StaticOverridesInstance { signature: sig.to_string(), span });
                    } else {
                        errors.push(HierarchyError::InstanceOverridesStatic { signature: sig.to_string(), span });
                    }
                }
                if parent_method.return_type != m.return_type {
                    errors.push(HierarchyError::IncompatibleReturnType { signature: sig.to_string(), span });
                }
                if parent_method.modifiers.public && m.modifiers.protected {
                    errors.push(HierarchyError::ReducedVisibility { signature: sig.to_string(), span });
                }
                if parent_method.modifiers.final_ {
                    errors.push(HierarchyError::OverridesFinal { signature: sig.to_string(), span });
                }
            }
        }

        if m.has_body || m.is_constructor {
            implements_covered.insert(sig);
        } else if let Decl::Class(c) = decl {
            if !c.modifiers.abstract_ {
                errors.push(HierarchyError::AbstractMethodInConcreteClass {
                    class: c.simple_name.clone(),
                    signature: sig.to_string(),
                    span,
                });
            }
        }
    }

    if let Decl::Class(c) = decl {
        if !c.modifiers.abstract_ {
            for (sig, owner) in &inherited_abstract {
                if !implements_covered.contains(sig) && !inherited_concrete.contains_key(sig) {
                    let span = decls
                        .get(*owner)
                        .methods()
                        .iter()
                        .find(|pm| pm.signature() == *sig)
                        .map(|pm| pm.span)
                        .unwrap_or_else(|| c.span);
                    errors.push(HierarchyError::MissingImplementation {
                        class: c.simple_name.clone(),
                        signature: sig.to_string(),
                        span,
                    });
                }
            }
        }
    }
}
