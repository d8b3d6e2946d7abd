//! Package trie and per-compilation-unit import context (spec §4.1).

use crate::error::LinkError;
use joos_parser::{FileId, Span};
use joos_types::DeclId;
use rustc_hash::FxHashMap;

#[derive(Debug)]
enum Node {
    Package(FxHashMap<String, Node>),
    Decl(DeclId),
}

/// Result of looking a dotted path up in the trie.
pub enum Lookup {
    Package,
    Decl(DeclId),
    NotFound,
}

/// Canonical-name → declaration trie, read-only once built (spec §3).
#[derive(Debug)]
pub struct PackageTrie {
    root: Node,
}

impl Default for PackageTrie {
    fn default() -> Self {
        PackageTrie { root: Node::Package(FxHashMap::default()) }
    }
}

impl PackageTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `path` (e.g. `["java", "lang", "Object"]`) as a leaf
    /// declaration. Errors if the last component collides with an existing
    /// subpackage, or an intermediate component collides with an existing
    /// leaf declaration.
    pub fn insert(&mut self, path: &[String], decl: DeclId, span: Span) -> Result<(), LinkError> {
        let mut cursor = &mut self.root;
        for (i, component) in path.iter().enumerate() {
            let is_last = i == path.len() - 1;
            let Node::Package(children) = cursor else {
                return Err(LinkError::PackageDeclCollision { name: component.clone(), span });
            };
            if is_last {
                if let Some(Node::Package(_)) = children.get(component) {
                    return Err(LinkError::PackageDeclCollision { name: component.clone(), span });
                }
                children.insert(component.clone(), Node::Decl(decl));
                return Ok(());
            }
            cursor = children
                .entry(component.clone())
                .or_insert_with(|| Node::Package(FxHashMap::default()));
        }
        Ok(())
    }

    pub fn lookup(&self, path: &[String]) -> Lookup {
        let mut cursor = &self.root;
        for component in path {
            let Node::Package(children) = cursor else {
                return Lookup::NotFound;
            };
            match children.get(component) {
                Some(next) => cursor = next,
                None => return Lookup::NotFound,
            }
        }
        match cursor {
            Node::Package(_) => Lookup::Package,
            Node::Decl(id) => Lookup::Decl(*id),
        }
    }

    /// Direct children of the package named by `path` (used by on-demand
    /// imports), as `(simple_name, DeclId)` pairs. Subpackage children are
    /// skipped: on-demand imports only ever bind declarations.
    pub fn children_decls(&self, path: &[String]) -> Vec<(String, DeclId)> {
        let mut cursor = &self.root;
        for component in path {
            let Node::Package(children) = cursor else { return Vec::new() };
            match children.get(component) {
                Some(next) => cursor = next,
                None => return Vec::new(),
            }
        }
        match cursor {
            Node::Package(children) => children
                .iter()
                .filter_map(|(name, node)| match node {
                    Node::Decl(id) => Some((name.clone(), *id)),
                    Node::Package(_) => None,
                })
                .collect(),
            Node::Decl(_) => Vec::new(),
        }
    }
}

/// A name binding in a compilation unit's import context. `Ambiguous`
/// matches spec §4.1: recorded but only an error if queried.
#[derive(Debug, Clone, Copy)]
pub enum Binding {
    Decl(DeclId),
    Package,
    Ambiguous,
}

/// Per-compilation-unit name → {decl, package, ambiguous} map (spec §4.1).
#[derive(Debug, Default)]
pub struct ImportContext {
    direct: FxHashMap<String, Binding>,
    on_demand: FxHashMap<String, Binding>,
}

impl ImportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a same-package type or the unit's own top-level type (step 1).
    /// Importing the unit's own type is idempotent, so this never errors.
    pub fn bind_direct(&mut self, name: &str, decl: DeclId) {
        self.direct.insert(name.to_string(), Binding::Decl(decl));
    }

    /// Binds a single-type import (step 2). A collision with a *different*
    /// declaration already bound is an error; binding the same declaration
    /// twice (including the unit's own type) is fine.
    pub fn bind_single_import(&mut self, name: &str, decl: DeclId, span: Span) -> Result<(), LinkError> {
        match self.direct.get(name) {
            Some(Binding::Decl(existing)) if *existing != decl => {
                Err(LinkError::ImportCollision { name: name.to_string(), span })
            }
            _ => {
                self.direct.insert(name.to_string(), Binding::Decl(decl));
                Ok(())
            }
        }
    }

    /// Binds an on-demand import's children (step 3): a simple name present
    /// in exactly one on-demand package is bound; a second distinct
    /// candidate marks it ambiguous.
    pub fn bind_on_demand(&mut self, children: &[(String, DeclId)]) {
        for (name, decl) in children {
            match self.on_demand.get(name) {
                None => {
                    self.on_demand.insert(name.clone(), Binding::Decl(*decl));
                }
                Some(Binding::Decl(existing)) if *existing != *decl => {
                    self.on_demand.insert(name.clone(), Binding::Ambiguous);
                }
                _ => {}
            }
        }
    }

    /// Resolves `name`: direct layer first, then on-demand.
    pub fn resolve(&self, name: &str) -> Option<Binding> {
        self.direct.get(name).or_else(|| self.on_demand.get(name)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trie_insert_and_lookup() {
        let mut trie = PackageTrie::new();
        let span = Span::synthetic(FileId(0));
        trie.insert(&["java".into(), "lang".into(), "Object".into()], DeclId(0), span).unwrap();
        assert!(matches!(trie.lookup(&["java".into(), "lang".into()]), Lookup::Package));
        assert!(matches!(
            trie.lookup(&["java".into(), "lang".into(), "Object".into()]),
            Lookup::Decl(id) if id == DeclId(0)
        ));
        assert!(matches!(trie.lookup(&["nope".into()]), Lookup::NotFound));
    }

    #[test]
    fn trie_rejects_package_decl_collision() {
        let mut trie = PackageTrie::new();
        let span = Span::synthetic(FileId(0));
        trie.insert(&["a".into(), "B".into()], DeclId(0), span).unwrap();
        let err = trie.insert(&["a".into(), "B".into(), "C".into()], DeclId(1), span);
        assert!(err.is_err());
    }

    #[test]
    fn import_context_flags_distinct_single_import_collision() {
        let mut ctx = ImportContext::new();
        let span = Span::synthetic(FileId(0));
        ctx.bind_single_import("List", DeclId(0), span).unwrap();
        let err = ctx.bind_single_import("List", DeclId(1), span);
        assert!(err.is_err());
    }

    #[test]
    fn on_demand_collision_is_ambiguous_not_an_error() {
        let mut ctx = ImportContext::new();
        ctx.bind_on_demand(&[("Pair".to_string(), DeclId(0))]);
        ctx.bind_on_demand(&[("Pair".to_string(), DeclId(1))]);
        assert!(matches!(ctx.resolve("Pair"), Some(Binding::Ambiguous)));
    }

    #[test]
    fn direct_layer_shadows_on_demand_layer() {
        let mut ctx = ImportContext::new();
        ctx.bind_direct("Pair", DeclId(0));
        ctx.bind_on_demand(&[("Pair".to_string(), DeclId(1))]);
        assert!(matches!(ctx.resolve("Pair"), Some(Binding::Decl(id)) if id == DeclId(0)));
    }
}
