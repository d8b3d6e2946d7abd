//! Object layout and dispatch-vector construction (spec §4.6).
//!
//! An instance of class `C` occupies `4 * (m + 1)` bytes: word 0 is the
//! dispatch-vector pointer, words `1..=m` are fields `f0..f_{m-1}` in
//! inherited-then-local declaration order. The dispatch vector itself is
//! built once per program by coloring a global interference graph over
//! concrete instance methods, grounded directly on spec §4.6's description
//! of the algorithm (a compact/selector-coloring dispatch table, the
//! technique the teacher's `raya_compiler` had no direct equivalent for —
//! this module has no teacher counterpart and is grounded on the spec text
//! itself plus `joos_types::Hierarchy`'s override/assignability shape).

use joos_checker::{Decl, DeclTable, FieldInfo, MethodInfo};
use joos_parser::ast::NodeId;
use joos_types::{DeclId, Signature};
use rustc_hash::{FxHashMap, FxHashSet};

/// Word offset of an array's length slot and its first element, extending
/// spec §4.6's class-instance layout (dispatch pointer, then fields) to
/// arrays uniformly: word 0 is still a dispatch-vector pointer (arrays have
/// no virtual methods, so it is never actually indexed through, only
/// present so array and object pointers share one shape), word 1 is the
/// length, and elements start at word 2.
pub const ARRAY_LENGTH_OFFSET: i32 = 4;
pub const ARRAY_ELEMENTS_OFFSET: i32 = 8;

/// A class's flattened field layout: index `i` sits at word `4 * (i + 1)`.
#[derive(Debug, Clone)]
pub struct ClassLayout {
    pub fields: Vec<FieldInfo>,
}

impl ClassLayout {
    pub fn size_words(&self) -> usize {
        self.fields.len() + 1
    }

    pub fn size_bytes(&self) -> usize {
        self.size_words() * 4
    }

    pub fn field_offset(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Inherited-then-local field order for `id` (spec §4.6 "f0...f_{m-1} =
/// inherited (superclass order) ++ local (source order)").
pub fn build_layout(decls: &DeclTable, id: DeclId) -> ClassLayout {
    let Decl::Class(c) = decls.get(id) else {
        return ClassLayout { fields: Vec::new() };
    };
    let mut fields = match c.super_class {
        Some(sup) => build_layout(decls, sup).fields,
        None => Vec::new(),
    };
    fields.extend(c.fields.iter().cloned());
    ClassLayout { fields }
}

/// Union-find over method declaration ids, merging an overriding method with
/// the declaration it overrides so they are forced to the same color.
#[derive(Debug, Default)]
struct UnionFind {
    parent: FxHashMap<NodeId, NodeId>,
}

impl UnionFind {
    fn find(&mut self, x: NodeId) -> NodeId {
        let p = *self.parent.entry(x).or_insert(x);
        if p == x {
            x
        } else {
            let root = self.find(p);
            self.parent.insert(x, root);
            root
        }
    }

    fn union(&mut self, a: NodeId, b: NodeId) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent.insert(ra, rb);
        }
    }
}

fn is_concrete_instance_method(m: &MethodInfo) -> bool {
    m.has_body && !m.modifiers.is_static && !m.is_constructor
}

/// The program-wide dispatch-vector coloring: every concrete instance
/// method's final color, plus the total vector length every class's
/// dispatch vector is padded to.
pub struct DispatchVectors {
    colors: FxHashMap<NodeId, u32>,
    per_class: FxHashMap<DeclId, FxHashMap<Signature, NodeId>>,
    pub num_colors: u32,
}

impl DispatchVectors {
    pub fn color_of(&self, node: NodeId) -> Option<u32> {
        self.colors.get(&node).copied()
    }

    /// `class`'s dispatch vector, one slot per color, `None` where the class
    /// has no method using that color.
    pub fn slots(&self, class: DeclId) -> Vec<Option<NodeId>> {
        let mut slots = vec![None; self.num_colors as usize];
        if let Some(set) = self.per_class.get(&class) {
            for &node in set.values() {
                if let Some(color) = self.colors.get(&node) {
                    slots[*color as usize] = Some(node);
                }
            }
        }
        slots
    }
}

fn class_instance_method_set(
    decls: &DeclTable,
    id: DeclId,
    uf: &mut UnionFind,
    cache: &mut FxHashMap<DeclId, FxHashMap<Signature, NodeId>>,
) -> FxHashMap<Signature, NodeId> {
    if let Some(set) = cache.get(&id) {
        return set.clone();
    }
    let Decl::Class(c) = decls.get(id) else {
        return FxHashMap::default();
    };
    let mut set = match c.super_class {
        Some(sup) => class_instance_method_set(decls, sup, uf, cache),
        None => FxHashMap::default(),
    };
    for m in &c.methods {
        if is_concrete_instance_method(m) {
            let sig = m.signature();
            if let Some(&inherited) = set.get(&sig) {
                uf.union(m.node, inherited);
            }
            set.insert(sig, m.node);
        }
    }
    cache.insert(id, set.clone());
    set
}

/// Builds the global dispatch-vector coloring and writes each concrete
/// method's assigned color back into `decls` (`MethodInfo.color`).
pub fn build_dispatch_vectors(decls: &mut DeclTable) -> DispatchVectors {
    let mut uf = UnionFind::default();
    let mut per_class = FxHashMap::default();

    let class_ids: Vec<DeclId> = decls.ids().filter(|&id| matches!(decls.get(id), Decl::Class(_))).collect();
    for &id in &class_ids {
        class_instance_method_set(decls, id, &mut uf, &mut per_class);
    }

    // Interference: any two distinct representatives that co-occur in one
    // class's own resolved method set need distinct colors.
    let mut adj: FxHashMap<NodeId, FxHashSet<NodeId>> = FxHashMap::default();
    for set in per_class.values() {
        let reps: FxHashSet<NodeId> = set.values().map(|&n| uf.find(n)).collect();
        let reps: Vec<NodeId> = reps.into_iter().collect();
        for &r in &reps {
            adj.entry(r).or_default();
        }
        for i in 0..reps.len() {
            for j in (i + 1)..reps.len() {
                adj.entry(reps[i]).or_default().insert(reps[j]);
                adj.entry(reps[j]).or_default().insert(reps[i]);
            }
        }
    }

    // Greedy coloring, highest-degree vertex first.
    let mut order: Vec<NodeId> = adj.keys().copied().collect();
    order.sort_by_key(|n| std::cmp::Reverse(adj[n].len()));
    let mut rep_colors: FxHashMap<NodeId, u32> = FxHashMap::default();
    for n in order {
        let used: FxHashSet<u32> = adj[&n].iter().filter_map(|nb| rep_colors.get(nb).copied()).collect();
        let mut color = 0;
        while used.contains(&color) {
            color += 1;
        }
        rep_colors.insert(n, color);
    }
    let num_colors = rep_colors.values().copied().max().map_or(0, |m| m + 1);

    // Expand representative colors to every concrete method node and write
    // them back into the declaration table.
    let mut colors: FxHashMap<NodeId, u32> = FxHashMap::default();
    for &id in &class_ids {
        let Decl::Class(c) = decls.get(id) else { continue };
        let updates: Vec<(usize, u32)> = c
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| is_concrete_instance_method(m))
            .filter_map(|(i, m)| rep_colors.get(&uf.find(m.node)).map(|&color| (i, color)))
            .collect();
        if let Decl::Class(c) = decls.get_mut(id) {
            for &(i, color) in &updates {
                c.methods[i].color = Some(color);
                colors.insert(c.methods[i].node, color);
            }
        }
    }

    DispatchVectors { colors, per_class, num_colors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joos_checker::linker::link;
    use joos_parser::{parse_file, FileId};

    fn program(src: &str) -> joos_checker::Program {
        let units = vec![parse_file(FileId(0), src).expect("parse")];
        link(&units).expect("link")
    }

    #[test]
    fn overriding_methods_share_a_color() {
        let mut p = program(
            "public class A { public A() {} public int m() { return 0; } }\n",
        );
        let dv = build_dispatch_vectors(&mut p.decls);
        assert_eq!(dv.num_colors, 1);
    }

    #[test]
    fn sibling_methods_on_one_class_get_distinct_colors() {
        let mut p = program(
            "public class A { public A() {} public int m() { return 0; } public int n() { return 0; } }\n",
        );
        let dv = build_dispatch_vectors(&mut p.decls);
        assert_eq!(dv.num_colors, 2);
    }

    #[test]
    fn layout_flattens_inherited_then_local_fields() {
        let units = vec![
            parse_file(FileId(0), "public class A { public A() {} public int x; }").unwrap(),
            parse_file(FileId(1), "public class B extends A { public B() {} public int y; }").unwrap(),
        ];
        let p = link(&units).expect("link");
        let b_id = p.units[1].top_level;
        let layout = build_layout(&p.decls, b_id);
        assert_eq!(layout.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(layout.size_words(), 3);
    }
}
