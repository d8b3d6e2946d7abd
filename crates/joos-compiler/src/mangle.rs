//! Assembly label mangling (spec §6 "name mangling").
//!
//! Every label is `_##_<CATEGORY>_ID_<n>_#<fully-qualified-name>`, assigned
//! by a monotonic per-category counter and memoized per declaration so two
//! lookups of the same declaration return the same label. Methods and
//! static methods share one counter and memoization map, as do fields and
//! static fields; locals, parameters, and classes each get their own.
//! Grounded on the teacher's C++ predecessor's `CodeGenLabels` class
//! (`codeGenLables.hpp`), which this module is a direct, idiomatic port of.

use joos_parser::ast::NodeId;
use rustc_hash::FxHashMap;

const GLOBAL_PREFIX: &str = "_##";
/// Abstract argument temporaries `_ARG0`, `_ARG1`, ... (spec §6 "calling
/// convention"); `_ARGn` names the receiver when present.
pub const ARG_PREFIX: &str = "_ARG";
/// The abstract return-value temporary every method writes before returning.
pub const RETURN_TEMP: &str = "_RET";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Category {
    Class,
    MethodOrStatic,
    FieldOrStatic,
    Local,
    Parameter,
}

/// Per-category counters and memoization maps, mirroring the teacher's
/// `method_id_counter_`/`method_labels_` pairing.
#[derive(Debug, Default)]
pub struct LabelTable {
    counters: FxHashMap<Category, u32>,
    labels: FxHashMap<(Category, NodeId), String>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable::default()
    }

    fn unique(&mut self, category: Category, node: NodeId, prefix: &str, actual_name: &str) -> String {
        if let Some(existing) = self.labels.get(&(category, node)) {
            return existing.clone();
        }
        let counter = self.counters.entry(category).or_insert(0);
        let id = *counter;
        *counter += 1;
        let label = format!("{GLOBAL_PREFIX}{prefix}_ID_{id}_#{actual_name}");
        self.labels.insert((category, node), label.clone());
        label
    }

    pub fn class_label(&mut self, node: NodeId, fully_qualified_name: &str) -> String {
        self.unique(Category::Class, node, "_CLASS", fully_qualified_name)
    }

    /// `fully_qualified_name` should include the owning class, e.g.
    /// `pkg.C.m(int)`, so overloads and same-named methods across classes get
    /// distinct (if cosmetic) labels.
    pub fn method_label(&mut self, node: NodeId, fully_qualified_name: &str, is_static: bool, native: bool) -> String {
        if native {
            return format!("NATIVE{fully_qualified_name}");
        }
        let prefix = if is_static { "_STATIC_METHOD" } else { "_METHOD" };
        self.unique(Category::MethodOrStatic, node, prefix, fully_qualified_name)
    }

    pub fn field_label(&mut self, node: NodeId, fully_qualified_name: &str, is_static: bool) -> String {
        let prefix = if is_static { "_STATIC_FIELD" } else { "_FIELD" };
        self.unique(Category::FieldOrStatic, node, prefix, fully_qualified_name)
    }

    pub fn local_label(&mut self, node: NodeId, name: &str) -> String {
        self.unique(Category::Local, node, "_LOCAL_VARIABLE", name)
    }

    pub fn parameter_label(&mut self, node: NodeId, name: &str) -> String {
        self.unique(Category::Parameter, node, "_PARAMETER", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookup_is_memoized() {
        let mut t = LabelTable::new();
        let a = t.method_label(NodeId(1), "C.m()", false, false);
        let b = t.method_label(NodeId(1), "C.m()", false, false);
        assert_eq!(a, b);
    }

    #[test]
    fn methods_and_static_methods_share_one_counter() {
        let mut t = LabelTable::new();
        let m = t.method_label(NodeId(1), "C.m()", false, false);
        let s = t.method_label(NodeId(2), "C.s()", true, false);
        assert!(m.contains("_ID_0_"));
        assert!(s.contains("_ID_1_"));
    }

    #[test]
    fn native_methods_bypass_the_counter() {
        let mut t = LabelTable::new();
        let n = t.method_label(NodeId(1), "java.io.OutputStream.nativeWrite", false, true);
        assert_eq!(n, "NATIVEjava.io.OutputStream.nativeWrite");
    }

    #[test]
    fn fields_and_static_fields_share_one_counter() {
        let mut t = LabelTable::new();
        let f = t.field_label(NodeId(1), "C.x", false);
        let s = t.field_label(NodeId(2), "C.y", true);
        assert!(f.contains("_ID_0_"));
        assert!(s.contains("_ID_1_"));
    }
}
