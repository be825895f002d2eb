//! Conversion relations between types
//!
//! `is_compatible` decides which conversions the checker may insert on its
//! own; `is_castable_to` is the wider set a source-level cast may request.
//! Every compatible pair is also castable.

use super::Type;

impl Type {
    /// Whether a value of this type may be implicitly converted to `other`
    pub fn is_compatible(&self, other: &Type) -> bool {
        match self {
            Type::Void => other.is_void(),
            Type::Integer(int) => match other {
                Type::Integer(target) => int.size <= target.size,
                _ => false,
            },
            Type::Pointer(base) => match other {
                Type::Pointer(target) => {
                    base.is_void() || target.is_void() || base.is_compatible(target)
                }
                _ => false,
            },
            Type::Array { element, .. } => match other.base_type() {
                Some(target) => {
                    target.is_void()
                        || (element.is_compatible(target) && same_width(element, target))
                }
                None => false,
            },
            Type::Function(_) | Type::Struct(_) | Type::Union(_) => self == other,
        }
    }

    /// Whether a value of this type may be converted to `target` by an
    /// explicit cast
    pub fn is_castable_to(&self, target: &Type) -> bool {
        if target.is_void() {
            return true;
        }
        match self {
            Type::Void => false,
            Type::Integer(_) | Type::Pointer(_) => target.is_scalar(),
            Type::Array { .. } => target.is_dereferable(),
            Type::Function(_) | Type::Struct(_) | Type::Union(_) => self == target,
        }
    }
}

/// Whether two element types occupy the same storage. Compatible
/// pointers, functions and aggregates already have equal sizes.
fn same_width(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Integer(x), Type::Integer(y)) => x.size == y.size,
        (
            Type::Array { element: x, length: m },
            Type::Array { element: y, length: n },
        ) => m == n && same_width(x, y),
        (Type::Array { .. }, _) | (_, Type::Array { .. }) => false,
        _ => true,
    }
}
