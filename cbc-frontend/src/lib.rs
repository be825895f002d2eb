//! Cflat Compiler - Frontend
//!
//! This crate provides the semantic-analysis components of the Cflat
//! compiler:
//! - Types: type descriptors, the type table and conversion rules
//! - AST: scope-resolved declarations, statements and expressions
//! - Semantic analysis: type checking and implicit cast insertion

pub mod ast;
pub mod semantic;
pub mod types;

pub use ast::{
    AssignOp, Ast, BinaryOp, Block, Case, DefinedFunction, DefinedVariable, Expr, ExprKind,
    IncDecOp, Parameter, Stmt, StmtKind, UnaryOp,
};
pub use semantic::{SemanticError, SemanticWarning, TypeChecker};
pub use types::{DataModel, Type, TypeTable};

use cbc_common::{CompilerError, ErrorReporter};
use log::debug;

/// High-level frontend interface
pub struct Frontend;

impl Frontend {
    /// Load a scope-resolved AST from its JSON form
    pub fn parse_ast(json: &str) -> Result<Ast, CompilerError> {
        serde_json::from_str(json)
            .map_err(|e| CompilerError::invalid_input(format!("malformed AST: {e}")))
    }

    /// Serialize a (checked) AST to pretty JSON
    pub fn to_json(ast: &Ast) -> Result<String, CompilerError> {
        serde_json::to_string_pretty(ast).map_err(|e| CompilerError::internal(e.to_string()))
    }

    /// Type table for `model` holding the AST's struct and union declarations
    pub fn type_table(ast: &Ast, model: DataModel) -> Result<TypeTable, CompilerError> {
        let mut types = TypeTable::new(model);
        types.register(&ast.types)?;
        Ok(types)
    }

    /// Type check `ast` in place. Integer widths written in the tree are
    /// first rewritten for `model`. On success every expression carries a
    /// type and every implicit conversion is an explicit cast node.
    pub fn analyze(
        ast: &mut Ast,
        model: DataModel,
        reporter: &mut ErrorReporter,
    ) -> Result<(), CompilerError> {
        let types = Self::type_table(ast, model)?;
        ast.for_each_type_mut(&mut |ty: &mut Type| types.normalize(ty));
        debug!(
            "checking {} function(s), {} global(s) for {:?}",
            ast.functions.len(),
            ast.variables.len(),
            types.model()
        );
        TypeChecker::check(ast, &types, reporter)?;

        if !ast.is_fully_typed() {
            return Err(CompilerError::internal("checked tree has untyped expressions"));
        }
        Ok(())
    }

    /// Parse, then analyze
    pub fn analyze_json(
        json: &str,
        model: DataModel,
        reporter: &mut ErrorReporter,
    ) -> Result<Ast, CompilerError> {
        let mut ast = Self::parse_ast(json)?;
        Self::analyze(&mut ast, model, reporter)?;
        Ok(ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_parse_simple_function() {
        let json = r#"{
            "functions": [{
                "name": "main",
                "return_type": {"integer": {"kind": "int", "signed": true, "size": 4}},
                "body": {
                    "stmts": [{"kind": {"return": {"kind": {"int_literal": {
                        "value": 42,
                        "literal_type": {"integer": {"kind": "int", "signed": true, "size": 4}}
                    }}}}}]
                }
            }]
        }"#;

        let ast = Frontend::parse_ast(json).unwrap();
        assert_eq!(ast.functions.len(), 1);
        assert_eq!(ast.functions[0].name, "main");
        assert_eq!(ast.functions[0].return_type, TypeTable::lp64().int());
    }

    #[test]
    fn test_frontend_rejects_malformed_json() {
        let err = Frontend::parse_ast("{\"functions\": 3}").unwrap_err();
        assert!(matches!(err, CompilerError::InvalidInput { .. }));
    }

    #[test]
    fn test_frontend_analyze_round_trip() {
        let types = TypeTable::lp64();
        let mut ast = Ast {
            functions: vec![DefinedFunction::new(
                "f",
                types.long(),
                vec![Parameter::new("x", types.int())],
                Block::new(vec![], vec![Stmt::ret(Some(Expr::variable("x", types.int())))]),
            )],
            ..Ast::default()
        };
        let mut reporter = ErrorReporter::new();
        Frontend::analyze(&mut ast, DataModel::Lp64, &mut reporter).unwrap();

        let json = Frontend::to_json(&ast).unwrap();
        let reloaded = Frontend::parse_ast(&json).unwrap();
        assert_eq!(reloaded, ast);
        assert!(json.contains("\"implicit\": true"));
    }

    #[test]
    fn test_frontend_widths_follow_the_target() {
        let lp64 = TypeTable::lp64();
        let ilp32 = TypeTable::ilp32();
        let program = |types: &TypeTable| Ast {
            functions: vec![DefinedFunction::new(
                "f",
                types.int(),
                vec![Parameter::new("l", types.long())],
                Block::new(
                    vec![DefinedVariable::new("y", types.int(), Some(Expr::variable("l", types.long())))],
                    vec![Stmt::ret(Some(Expr::variable("y", types.int())))],
                ),
            )],
            ..Ast::default()
        };

        // Widths written for lp64, checked for ilp32: long fits in int
        let mut ast = program(&lp64);
        let mut reporter = ErrorReporter::new();
        Frontend::analyze(&mut ast, DataModel::Ilp32, &mut reporter).unwrap();
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(ast.functions[0].params[0].param_type, ilp32.long());

        // Widths written for ilp32, checked for lp64: long narrows to int
        let mut ast = program(&ilp32);
        let mut reporter = ErrorReporter::new();
        Frontend::analyze(&mut ast, DataModel::Lp64, &mut reporter).unwrap();
        assert_eq!(reporter.warning_messages(), vec!["implicit cast from long to int"]);
    }

    #[test]
    fn test_frontend_sizeof_matches_declared_long() {
        let ilp32 = TypeTable::ilp32();
        let mut ast = Ast {
            functions: vec![DefinedFunction::new(
                "f",
                ilp32.unsigned_long(),
                vec![],
                Block::new(vec![], vec![Stmt::ret(Some(Expr::sizeof_type(ilp32.void())))]),
            )],
            ..Ast::default()
        };

        let mut reporter = ErrorReporter::new();
        Frontend::analyze(&mut ast, DataModel::Lp64, &mut reporter).unwrap();
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn test_frontend_rejects_out_of_range_declaration_id() {
        let json = r#"{"types": [{"id": 4294967295, "name": "s", "members": []}]}"#;
        let mut reporter = ErrorReporter::new();
        let err = Frontend::analyze_json(json, DataModel::Lp64, &mut reporter).unwrap_err();
        assert!(matches!(err, CompilerError::InvalidInput { .. }));
    }

    #[test]
    fn test_frontend_rejects_duplicate_declarations() {
        let mut types = TypeTable::lp64();
        let s = types.define_struct("s", vec![]);
        let decl = types.lookup(&s).cloned().unwrap();
        let mut ast = Ast {
            types: vec![decl.clone(), decl],
            ..Ast::default()
        };

        let mut reporter = ErrorReporter::new();
        let err = Frontend::analyze(&mut ast, DataModel::Lp64, &mut reporter).unwrap_err();
        assert!(matches!(err, CompilerError::InvalidInput { .. }));
    }
}
