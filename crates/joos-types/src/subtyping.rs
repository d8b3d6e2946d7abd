//! Assignability and cast-validity predicates.
//!
//! Both predicates need to walk a class/interface hierarchy that this crate
//! does not own, so they take a `&dyn Hierarchy` rather than reaching into a
//! concrete declaration table the way the teacher's `SubtypingContext` reached
//! into its own `TypeContext` arena.

use crate::ty::{Primitive, Type};
use crate::DeclId;

/// Everything the assignability/cast predicates need to know about a
/// resolved class/interface hierarchy. `joos-checker` implements this over
/// its own declaration table once type linking and hierarchy checking have
/// run.
pub trait Hierarchy {
    fn is_interface(&self, id: DeclId) -> bool;
    fn is_final_class(&self, id: DeclId) -> bool;
    /// The immediate superclass, if any (absent only for `java.lang.Object`
    /// itself, or for an interface, which has no superclass).
    fn super_class(&self, id: DeclId) -> Option<DeclId>;
    /// Interfaces `id` directly implements (classes) or extends
    /// (interfaces).
    fn super_interfaces(&self, id: DeclId) -> Vec<DeclId>;

    fn object_id(&self) -> DeclId;
    fn cloneable_id(&self) -> DeclId;
    fn serializable_id(&self) -> DeclId;

    /// True iff `id` is `java.lang.Object`, `Cloneable`, or `Serializable` —
    /// the three reference types every array is assignable to.
    fn is_array_supertype(&self, id: DeclId) -> bool {
        id == self.object_id() || id == self.cloneable_id() || id == self.serializable_id()
    }

    /// `descendant` is `ancestor`, or transitively extends/implements it.
    fn extends_or_implements(&self, descendant: DeclId, ancestor: DeclId) -> bool {
        if descendant == ancestor {
            return true;
        }
        if let Some(sup) = self.super_class(descendant) {
            if self.extends_or_implements(sup, ancestor) {
                return true;
            }
        }
        self.super_interfaces(descendant)
            .into_iter()
            .any(|i| self.extends_or_implements(i, ancestor))
    }
}

/// Spec: `isAssignableTo(L, R)` — can a value of static type `R` be stored
/// where a value of static type `L` is expected.
pub fn is_assignable_to(l: &Type, r: &Type, h: &dyn Hierarchy) -> bool {
    if l == r {
        return true;
    }

    match (l, r) {
        // null assignable to any reference or array type.
        (Type::Reference(_) | Type::Array(_) | Type::String, Type::Null) => true,

        // primitive widening: byte < short < int, char < int; byte/char incomparable.
        (Type::Primitive(lp), Type::Primitive(rp)) => rp.widens_to(*lp),

        // class/class: R transitively extends L.
        (Type::Reference(l_id), Type::Reference(r_id)) => {
            if h.is_interface(*l_id) {
                h.extends_or_implements(*r_id, *l_id)
            } else if h.is_interface(*r_id) {
                // L is a class, R is an interface: only matches if L is Object.
                *l_id == h.object_id()
            } else {
                h.extends_or_implements(*r_id, *l_id)
            }
        }

        // Object/Cloneable/Serializable accept any array.
        (Type::Reference(l_id), Type::Array(_)) => h.is_array_supertype(*l_id),

        // array to array: reference element types are covariant, primitive
        // element types are invariant.
        (Type::Array(l_elem), Type::Array(r_elem)) => match (l_elem.as_ref(), r_elem.as_ref()) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            _ => is_assignable_to(l_elem, r_elem, h),
        },

        _ => false,
    }
}

/// Spec: `isValidCast(from, to)`.
pub fn is_valid_cast(from: &Type, to: &Type, h: &dyn Hierarchy) -> bool {
    if from == to {
        return true;
    }

    match (from, to) {
        // any pair of primitive numerics (booleans excluded: Joos has no
        // boolean<->numeric casts).
        (Type::Primitive(a), Type::Primitive(b)) => {
            !matches!(a, Primitive::Boolean) && !matches!(b, Primitive::Boolean)
        }

        // either side assignable to the other.
        _ if is_assignable_to(from, to, h) || is_assignable_to(to, from, h) => true,

        // downcast between related class types, class<->non-final-interface,
        // interface<->interface.
        (Type::Reference(from_id), Type::Reference(to_id)) => {
            let from_iface = h.is_interface(*from_id);
            let to_iface = h.is_interface(*to_id);
            match (from_iface, to_iface) {
                (false, false) => {
                    h.extends_or_implements(*from_id, *to_id) || h.extends_or_implements(*to_id, *from_id)
                }
                (false, true) => !h.is_final_class(*from_id),
                (true, false) => !h.is_final_class(*to_id),
                (true, true) => true,
            }
        }

        // array to array with castable elements.
        (Type::Array(from_elem), Type::Array(to_elem)) => {
            is_valid_cast(from_elem, to_elem, h)
        }

        // array to Object/Cloneable/Serializable (and the reverse: downcast).
        (Type::Array(_), Type::Reference(to_id)) => h.is_array_supertype(*to_id),
        (Type::Reference(from_id), Type::Array(_)) => h.is_array_supertype(*from_id),

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// A tiny in-memory hierarchy for exercising the predicates without
    /// pulling in `joos-checker`.
    struct FakeHierarchy {
        object: DeclId,
        cloneable: DeclId,
        serializable: DeclId,
        superclass: HashMap<DeclId, DeclId>,
        interfaces: HashMap<DeclId, Vec<DeclId>>,
        is_interface: HashMap<DeclId, bool>,
        is_final: HashMap<DeclId, bool>,
    }

    impl Hierarchy for FakeHierarchy {
        fn is_interface(&self, id: DeclId) -> bool {
            *self.is_interface.get(&id).unwrap_or(&false)
        }
        fn is_final_class(&self, id: DeclId) -> bool {
            *self.is_final.get(&id).unwrap_or(&false)
        }
        fn super_class(&self, id: DeclId) -> Option<DeclId> {
            self.superclass.get(&id).copied()
        }
        fn super_interfaces(&self, id: DeclId) -> Vec<DeclId> {
            self.interfaces.get(&id).cloned().unwrap_or_default()
        }
        fn object_id(&self) -> DeclId {
            self.object
        }
        fn cloneable_id(&self) -> DeclId {
            self.cloneable
        }
        fn serializable_id(&self) -> DeclId {
            self.serializable
        }
    }

    /// Object(0) <- Animal(1) <- Dog(2); Dog(2) implements Named(3).
    fn fixture() -> FakeHierarchy {
        let object = DeclId(0);
        let animal = DeclId(1);
        let dog = DeclId(2);
        let named = DeclId(3);
        let mut superclass = HashMap::new();
        superclass.insert(animal, object);
        superclass.insert(dog, animal);
        let mut interfaces = HashMap::new();
        interfaces.insert(dog, vec![named]);
        let mut is_interface = HashMap::new();
        is_interface.insert(named, true);
        FakeHierarchy {
            object,
            cloneable: DeclId(10),
            serializable: DeclId(11),
            superclass,
            interfaces,
            is_interface,
            is_final: HashMap::new(),
        }
    }

    #[test]
    fn null_is_assignable_to_any_reference() {
        let h = fixture();
        assert!(is_assignable_to(&Type::Reference(DeclId(2)), &Type::Null, &h));
        assert!(is_assignable_to(
            &Type::Array(Box::new(Type::Primitive(Primitive::Int))),
            &Type::Null,
            &h
        ));
    }

    #[test]
    fn widening_is_assignable_not_narrowing() {
        let h = fixture();
        assert!(is_assignable_to(
            &Type::Primitive(Primitive::Int),
            &Type::Primitive(Primitive::Byte),
            &h
        ));
        assert!(!is_assignable_to(
            &Type::Primitive(Primitive::Byte),
            &Type::Primitive(Primitive::Int),
            &h
        ));
        assert!(!is_assignable_to(
            &Type::Primitive(Primitive::Byte),
            &Type::Primitive(Primitive::Char),
            &h
        ));
    }

    #[test]
    fn subclass_assignable_to_superclass() {
        let h = fixture();
        assert!(is_assignable_to(&Type::Reference(DeclId(1)), &Type::Reference(DeclId(2)), &h));
        assert!(!is_assignable_to(&Type::Reference(DeclId(2)), &Type::Reference(DeclId(1)), &h));
    }

    #[test]
    fn class_implementing_interface_assignable_to_it() {
        let h = fixture();
        assert!(is_assignable_to(&Type::Reference(DeclId(3)), &Type::Reference(DeclId(2)), &h));
    }

    #[test]
    fn any_array_assignable_to_object() {
        let h = fixture();
        assert!(is_assignable_to(
            &Type::Reference(DeclId(0)),
            &Type::Array(Box::new(Type::Reference(DeclId(2)))),
            &h
        ));
    }

    #[test]
    fn primitive_array_elements_are_invariant() {
        let h = fixture();
        let int_arr = Type::Array(Box::new(Type::Primitive(Primitive::Int)));
        let byte_arr = Type::Array(Box::new(Type::Primitive(Primitive::Byte)));
        assert!(!is_assignable_to(&int_arr, &byte_arr, &h));
    }

    #[test]
    fn reference_array_elements_are_covariant() {
        let h = fixture();
        let animal_arr = Type::Array(Box::new(Type::Reference(DeclId(1))));
        let dog_arr = Type::Array(Box::new(Type::Reference(DeclId(2))));
        assert!(is_assignable_to(&animal_arr, &dog_arr, &h));
    }

    #[test]
    fn downcast_between_related_classes_is_valid() {
        let h = fixture();
        assert!(is_valid_cast(&Type::Reference(DeclId(1)), &Type::Reference(DeclId(2)), &h));
    }

    #[test]
    fn non_final_class_to_unrelated_interface_cast_is_valid() {
        let h = fixture();
        assert!(is_valid_cast(&Type::Reference(DeclId(1)), &Type::Reference(DeclId(3)), &h));
    }

    #[test]
    fn numeric_primitive_casts_are_valid_both_ways() {
        let h = fixture();
        assert!(is_valid_cast(
            &Type::Primitive(Primitive::Int),
            &Type::Primitive(Primitive::Byte),
            &h
        ));
        assert!(is_valid_cast(
            &Type::Primitive(Primitive::Byte),
            &Type::Primitive(Primitive::Char),
            &h
        ));
    }
}
