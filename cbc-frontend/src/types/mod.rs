//! Type system definitions for Cflat
//!
//! Types are immutable values. They are built by a `TypeTable`, compared
//! structurally (struct and union types compare by declaration identity)
//! and queried through the capability predicates below.

mod compat;
mod table;

pub use table::{ComposedDecl, DataModel, Member, TypeTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The named integer ranks of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegerKind {
    Char,
    Short,
    Int,
    Long,
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegerKind::Char => "char",
            IntegerKind::Short => "short",
            IntegerKind::Int => "int",
            IntegerKind::Long => "long",
        };
        write!(f, "{name}")
    }
}

/// An integer type with its width (in bytes) fixed by the target data model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntegerType {
    pub kind: IntegerKind,
    pub signed: bool,
    pub size: u8,
}

impl IntegerType {
    pub fn new(kind: IntegerKind, signed: bool, size: u8) -> Self {
        Self { kind, signed, size }
    }
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.signed {
            write!(f, "unsigned ")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// Identity of a struct or union declaration
pub type DeclId = u32;

/// Reference to a struct/union declaration held by the `TypeTable`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComposedRef {
    pub id: DeclId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub return_type: Box<Type>,
    pub params: Vec<Type>,
    #[serde(default)]
    pub variadic: bool,
}

impl FunctionType {
    /// Whether a call with `argc` arguments satisfies this prototype
    pub fn accepts_argc(&self, argc: usize) -> bool {
        if self.variadic {
            argc >= self.params.len()
        } else {
            argc == self.params.len()
        }
    }
}

/// Cflat type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Void,

    Integer(IntegerType),

    Pointer(Box<Type>),

    /// Array with optional length; only arrays with a length are allocated
    Array {
        element: Box<Type>,
        #[serde(default)]
        length: Option<u64>,
    },

    Function(FunctionType),

    Struct(ComposedRef),

    Union(ComposedRef),
}

impl Type {
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_allocated_array(&self) -> bool {
        matches!(self, Type::Array { length: Some(_), .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(_))
    }

    /// Struct or union: supports named member lookup
    pub fn is_complex(&self) -> bool {
        matches!(self, Type::Struct(_) | Type::Union(_))
    }

    /// Integer or pointer: usable wherever a single branchable value is needed
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Integer(_) | Type::Pointer(_))
    }

    /// Pointer or array: valid base of indexing and dereference
    pub fn is_dereferable(&self) -> bool {
        matches!(self, Type::Pointer(_) | Type::Array { .. })
    }

    pub fn is_callable(&self) -> bool {
        self.function_type().is_some()
    }

    /// Pointee of a pointer, element of an array
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Type::Pointer(base) => Some(base),
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// Prototype of a function or of a pointer to function
    pub fn function_type(&self) -> Option<&FunctionType> {
        match self {
            Type::Function(func) => Some(func),
            Type::Pointer(base) => match base.as_ref() {
                Type::Function(func) => Some(func),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn composed(&self) -> Option<&ComposedRef> {
        match self {
            Type::Struct(decl) | Type::Union(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn integer(&self) -> Option<&IntegerType> {
        match self {
            Type::Integer(int) => Some(int),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Integer(int) => write!(f, "{int}"),
            Type::Pointer(base) => write!(f, "{base}*"),
            Type::Array { element, length: Some(n) } => write!(f, "{element}[{n}]"),
            Type::Array { element, length: None } => write!(f, "{element}[]"),
            Type::Function(func) => {
                write!(f, "{}(", func.return_type)?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                if func.variadic {
                    if !func.params.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
            Type::Struct(decl) => write!(f, "struct {}", decl.name),
            Type::Union(decl) => write!(f, "union {}", decl.name),
        }
    }
}
