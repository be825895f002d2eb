//! Semantic Analysis for Cflat
//!
//! Type checks a scope-resolved AST in one depth-first walk. Every
//! expression receives its resolved type and every implicit conversion is
//! made explicit by wrapping the converted operand in a cast node.
//! Violations are recorded in the `ErrorReporter` and the walk continues;
//! the pass fails as a whole if at least one error was recorded.

pub mod errors;
mod expressions;
mod statements;

pub use errors::{SemanticError, SemanticWarning};

use crate::ast::{Ast, DefinedFunction, Expr};
use crate::types::{Type, TypeTable};
use cbc_common::{CompilerError, ErrorReporter, HasSpan, SourceSpan};
use log::{debug, info};

/// Type checker context for a single pass
pub struct TypeChecker<'a> {
    types: &'a TypeTable,
    reporter: &'a mut ErrorReporter,
    /// Declared return type of the function being checked
    return_type: Type,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a TypeTable, reporter: &'a mut ErrorReporter) -> Self {
        Self {
            types,
            reporter,
            return_type: Type::Void,
        }
    }

    /// Check `ast` in place. Fails iff at least one error was recorded;
    /// warnings never fail the pass.
    pub fn check(
        ast: &mut Ast,
        types: &TypeTable,
        reporter: &mut ErrorReporter,
    ) -> Result<(), CompilerError> {
        let errors_before = reporter.error_count();
        let warnings_before = reporter.warning_count();

        TypeChecker::new(types, reporter).check_program(ast);

        let errors = reporter.error_count() - errors_before;
        let warnings = reporter.warning_count() - warnings_before;
        info!("type check finished: {errors} error(s), {warnings} warning(s)");

        if reporter.error_occurred() {
            return Err(CompilerError::SemanticFailed { errors, warnings });
        }
        Ok(())
    }

    /// Walk every top-level variable, then every function
    pub fn check_program(&mut self, ast: &mut Ast) {
        for var in &mut ast.variables {
            self.check_variable(var);
        }
        for func in &mut ast.functions {
            self.check_function(func);
        }
    }

    fn check_function(&mut self, func: &mut DefinedFunction) {
        debug!("checking function {}", func.name);
        self.check_return_type(func);
        self.check_param_types(func);
        self.return_type = func.return_type.clone();
        self.check_block(&mut func.body);
        self.return_type = Type::Void;
    }

    fn check_return_type(&mut self, func: &DefinedFunction) {
        let error = match &func.return_type {
            Type::Array { .. } => SemanticError::ReturnsArray(func.name.clone()),
            Type::Struct(_) => SemanticError::ReturnsStruct(func.name.clone()),
            Type::Union(_) => SemanticError::ReturnsUnion(func.name.clone()),
            _ => return,
        };
        self.error(&func.span, error);
    }

    fn check_param_types(&mut self, func: &DefinedFunction) {
        for param in &func.params {
            if is_invalid_lhs_type(&param.param_type) {
                self.error(
                    &param.span,
                    SemanticError::InvalidParameterType(param.param_type.clone()),
                );
            }
        }
    }

    // Utilities shared by the statement and expression rules

    fn error(&mut self, span: &SourceSpan, error: SemanticError) {
        self.reporter.error_at(span, error.to_string());
    }

    fn warn(&mut self, span: &SourceSpan, warning: SemanticWarning) {
        self.reporter.warn_at(span, warning.to_string());
    }

    /// Wrap `expr` in an implicit cast to `target`
    fn insert_cast(&mut self, expr: &mut Expr, target: &Type) {
        debug!("inserting cast from {} to {}", expr.ty(), target);
        expr.wrap_in_cast(target);
    }

    fn must_be_integer(&mut self, expr: &Expr) -> bool {
        if expr.ty().is_integer() {
            return true;
        }
        self.error(expr.span(), SemanticError::NotInteger(expr.ty().clone()));
        false
    }

    fn must_be_scalar(&mut self, expr: &Expr) -> bool {
        if expr.ty().is_scalar() {
            return true;
        }
        self.error(expr.span(), SemanticError::NotScalar(expr.ty().clone()));
        false
    }
}

/// Types that may not be assigned, passed or returned by value
fn is_invalid_lhs_type(ty: &Type) -> bool {
    ty.is_struct() || ty.is_union() || ty.is_allocated_array()
}
