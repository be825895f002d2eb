//! Declaration nodes: variables, functions and the whole program

use super::expressions::Expr;
use super::statements::Block;
use crate::types::{ComposedDecl, Type};
use cbc_common::SourceSpan;
use serde::{Deserialize, Serialize};

/// Storage assigned to a variable by the layout phase. The checker never
/// reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageSlot {
    Global { symbol: String },
    Frame { offset: i64 },
}

/// A variable definition, at top level or local to a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinedVariable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: Type,
    #[serde(default)]
    pub initializer: Option<Expr>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_toplevel: bool,
    #[serde(default)]
    pub storage: Option<StorageSlot>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl DefinedVariable {
    pub fn new(name: &str, var_type: Type, initializer: Option<Expr>) -> Self {
        Self {
            name: name.to_string(),
            var_type,
            initializer,
            is_private: false,
            is_toplevel: false,
            storage: None,
            span: SourceSpan::default(),
        }
    }

    /// Mark as a top-level (file scope) definition
    pub fn toplevel(mut self, is_private: bool) -> Self {
        self.is_toplevel = true;
        self.is_private = is_private;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: Type,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Parameter {
    pub fn new(name: &str, param_type: Type) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            span: SourceSpan::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinedFunction {
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    pub return_type: Type,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub variadic: bool,
    pub body: Block,
    #[serde(default)]
    pub span: SourceSpan,
}

impl DefinedFunction {
    pub fn new(name: &str, return_type: Type, params: Vec<Parameter>, body: Block) -> Self {
        Self {
            name: name.to_string(),
            is_private: false,
            return_type,
            params,
            variadic: false,
            body,
            span: SourceSpan::default(),
        }
    }
}

/// A scope-resolved program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    /// Struct and union declarations referenced by the program's types
    #[serde(default)]
    pub types: Vec<ComposedDecl>,
    #[serde(default)]
    pub variables: Vec<DefinedVariable>,
    #[serde(default)]
    pub functions: Vec<DefinedFunction>,
}
