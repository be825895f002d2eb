//! Type table: canonical type construction and struct/union declarations
//!
//! Integer widths come from the target data model. Struct and union types
//! are references into the table, so recursive declarations such as
//! `struct node { struct node *next; }` stay finite.

use super::{ComposedRef, DeclId, FunctionType, IntegerKind, IntegerType, Type};
use cbc_common::CompilerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Target data model deciding integer widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataModel {
    /// int, long and pointers are 32 bits
    Ilp32,
    /// int is 32 bits; long and pointers are 64 bits
    #[default]
    Lp64,
}

/// Named member of a struct or union
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub member_type: Type,
}

impl Member {
    pub fn new(name: &str, member_type: Type) -> Self {
        Self {
            name: name.to_string(),
            member_type,
        }
    }
}

/// Struct or union declaration, members in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedDecl {
    pub id: DeclId,
    pub name: String,
    #[serde(default)]
    pub is_union: bool,
    pub members: Vec<Member>,
}

impl ComposedDecl {
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.member(name).is_some()
    }

    /// The type naming this declaration
    pub fn as_type(&self) -> Type {
        let decl = ComposedRef {
            id: self.id,
            name: self.name.clone(),
        };
        if self.is_union {
            Type::Union(decl)
        } else {
            Type::Struct(decl)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeTable {
    model: DataModel,
    composed: HashMap<DeclId, ComposedDecl>,
    next_id: DeclId,
}

impl TypeTable {
    pub fn new(model: DataModel) -> Self {
        Self {
            model,
            composed: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn ilp32() -> Self {
        Self::new(DataModel::Ilp32)
    }

    pub fn lp64() -> Self {
        Self::new(DataModel::Lp64)
    }

    pub fn model(&self) -> DataModel {
        self.model
    }

    fn integer_size(&self, kind: IntegerKind) -> u8 {
        match (kind, self.model) {
            (IntegerKind::Char, _) => 1,
            (IntegerKind::Short, _) => 2,
            (IntegerKind::Int, _) => 4,
            (IntegerKind::Long, DataModel::Ilp32) => 4,
            (IntegerKind::Long, DataModel::Lp64) => 8,
        }
    }

    pub fn integer(&self, kind: IntegerKind, signed: bool) -> Type {
        Type::Integer(IntegerType::new(kind, signed, self.integer_size(kind)))
    }

    pub fn void(&self) -> Type {
        Type::Void
    }

    pub fn char(&self) -> Type {
        self.integer(IntegerKind::Char, true)
    }

    pub fn unsigned_char(&self) -> Type {
        self.integer(IntegerKind::Char, false)
    }

    pub fn short(&self) -> Type {
        self.integer(IntegerKind::Short, true)
    }

    pub fn unsigned_short(&self) -> Type {
        self.integer(IntegerKind::Short, false)
    }

    pub fn int(&self) -> Type {
        self.integer(IntegerKind::Int, true)
    }

    pub fn unsigned_int(&self) -> Type {
        self.integer(IntegerKind::Int, false)
    }

    pub fn long(&self) -> Type {
        self.integer(IntegerKind::Long, true)
    }

    pub fn unsigned_long(&self) -> Type {
        self.integer(IntegerKind::Long, false)
    }

    /// Pointer to `base`. Structurally equal bases give equal pointer types.
    pub fn pointer_to(&self, base: &Type) -> Type {
        Type::Pointer(Box::new(base.clone()))
    }

    pub fn array_of(&self, element: Type, length: Option<u64>) -> Type {
        Type::Array {
            element: Box::new(element),
            length,
        }
    }

    pub fn function(&self, return_type: Type, params: Vec<Type>, variadic: bool) -> Type {
        Type::Function(FunctionType {
            return_type: Box::new(return_type),
            params,
            variadic,
        })
    }

    /// Declare a new struct; each call yields a distinct type
    pub fn define_struct(&mut self, name: &str, members: Vec<Member>) -> Type {
        self.define_composed(name, false, members)
    }

    /// Declare a new union; each call yields a distinct type
    pub fn define_union(&mut self, name: &str, members: Vec<Member>) -> Type {
        self.define_composed(name, true, members)
    }

    fn define_composed(&mut self, name: &str, is_union: bool, members: Vec<Member>) -> Type {
        let decl = ComposedDecl {
            id: self.next_id,
            name: name.to_string(),
            is_union,
            members,
        };
        self.next_id = self.next_id.saturating_add(1);
        let ty = decl.as_type();
        self.composed.insert(decl.id, decl);
        ty
    }

    /// Register declarations produced by an earlier phase, keeping their ids.
    /// Member integer widths are taken from this table's data model.
    pub fn register(&mut self, decls: &[ComposedDecl]) -> Result<(), CompilerError> {
        for decl in decls {
            if self.composed.contains_key(&decl.id) {
                return Err(CompilerError::invalid_input(format!(
                    "duplicate type definition id {} ({})",
                    decl.id, decl.name
                )));
            }
            let next_id = decl.id.checked_add(1).ok_or_else(|| {
                CompilerError::invalid_input(format!(
                    "type definition id {} out of range ({})",
                    decl.id, decl.name
                ))
            })?;
            self.next_id = self.next_id.max(next_id);

            let mut decl = decl.clone();
            for member in &mut decl.members {
                self.normalize(&mut member.member_type);
            }
            self.composed.insert(decl.id, decl);
        }
        Ok(())
    }

    /// Rewrite every integer width inside `ty` to the one its kind has
    /// under this table's data model
    pub fn normalize(&self, ty: &mut Type) {
        match ty {
            Type::Integer(int) => int.size = self.integer_size(int.kind),
            Type::Pointer(base) => self.normalize(base),
            Type::Array { element, .. } => self.normalize(element),
            Type::Function(func) => {
                self.normalize(&mut func.return_type);
                for param in &mut func.params {
                    self.normalize(param);
                }
            }
            Type::Void | Type::Struct(_) | Type::Union(_) => {}
        }
    }

    /// Declaration behind a struct or union type
    pub fn lookup(&self, ty: &Type) -> Option<&ComposedDecl> {
        ty.composed().and_then(|decl| self.composed.get(&decl.id))
    }

    /// Type of `member` in a struct or union; `None` when absent or when
    /// `ty` is not a struct or union
    pub fn member_type(&self, ty: &Type, member: &str) -> Option<&Type> {
        self.lookup(ty)
            .and_then(|decl| decl.member(member))
            .map(|m| &m.member_type)
    }
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new(DataModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_model_widths() {
        let lp64 = TypeTable::lp64();
        let ilp32 = TypeTable::ilp32();

        assert_eq!(lp64.long().integer().map(|i| i.size), Some(8));
        assert_eq!(ilp32.long().integer().map(|i| i.size), Some(4));
        assert_eq!(lp64.int().integer().map(|i| i.size), Some(4));
        assert_eq!(lp64.model(), DataModel::Lp64);
    }

    #[test]
    fn test_pointer_to_is_canonical() {
        let types = TypeTable::lp64();
        let a = types.pointer_to(&types.pointer_to(&types.char()));
        let b = types.pointer_to(&types.pointer_to(&types.char()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_member_lookup() {
        let mut types = TypeTable::lp64();
        let point = types.define_struct(
            "point",
            vec![Member::new("x", types.int()), Member::new("y", types.long())],
        );

        assert_eq!(types.member_type(&point, "y"), Some(&types.long()));
        assert_eq!(types.member_type(&point, "z"), None);
        assert_eq!(types.member_type(&types.int(), "x"), None);
        let names: Vec<_> = types
            .lookup(&point)
            .map(|d| d.members.iter().map(|m| m.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_recursive_struct() {
        let mut types = TypeTable::lp64();
        let node_ref = ComposedDecl {
            id: 7,
            name: "node".to_string(),
            is_union: false,
            members: vec![],
        }
        .as_type();
        let decl = ComposedDecl {
            id: 7,
            name: "node".to_string(),
            is_union: false,
            members: vec![
                Member::new("value", types.int()),
                Member::new("next", types.pointer_to(&node_ref)),
            ],
        };
        types.register(&[decl]).expect("registration should succeed");

        let next = types.member_type(&node_ref, "next").cloned();
        assert_eq!(next, Some(types.pointer_to(&node_ref)));

        // Fresh declarations never collide with registered ids
        let other = types.define_struct("other", vec![]);
        assert_eq!(other.composed().map(|d| d.id), Some(8));
    }

    #[test]
    fn test_normalize_follows_data_model() {
        let lp64 = TypeTable::lp64();
        let ilp32 = TypeTable::ilp32();
        let mut ty = lp64.function(
            lp64.long(),
            vec![lp64.pointer_to(&lp64.unsigned_long()), lp64.array_of(lp64.long(), Some(2))],
            false,
        );

        ilp32.normalize(&mut ty);
        assert_eq!(
            ty,
            ilp32.function(
                ilp32.long(),
                vec![ilp32.pointer_to(&ilp32.unsigned_long()), ilp32.array_of(ilp32.long(), Some(2))],
                false,
            )
        );

        lp64.normalize(&mut ty);
        assert_eq!(ty.function_type().map(|f| f.return_type.as_ref().clone()), Some(lp64.long()));
    }

    #[test]
    fn test_registered_members_use_data_model_widths() {
        let mut types = TypeTable::ilp32();
        let decl = ComposedDecl {
            id: 3,
            name: "s".to_string(),
            is_union: false,
            members: vec![Member::new("n", TypeTable::lp64().long())],
        };
        let s = decl.as_type();
        types.register(&[decl]).expect("registration should succeed");

        assert_eq!(types.member_type(&s, "n"), Some(&types.long()));
    }

    #[test]
    fn test_largest_id_is_rejected() {
        let mut types = TypeTable::lp64();
        let decl = ComposedDecl {
            id: DeclId::MAX,
            name: "s".to_string(),
            is_union: false,
            members: vec![],
        };
        let err = types.register(&[decl]).unwrap_err();
        assert!(matches!(err, CompilerError::InvalidInput { .. }));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut types = TypeTable::lp64();
        let decl = ComposedDecl {
            id: 0,
            name: "s".to_string(),
            is_union: false,
            members: vec![],
        };
        assert!(types.register(&[decl.clone()]).is_ok());
        assert!(types.register(&[decl]).is_err());
    }
}
