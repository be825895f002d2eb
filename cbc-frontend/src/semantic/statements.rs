//! Statement and declaration rules
//!
//! Statements are walked in post-order: subexpressions and nested
//! statements are resolved first, then the statement's own rule fires.

use super::{is_invalid_lhs_type, SemanticError, TypeChecker};
use crate::ast::{Block, DefinedVariable, Expr, Stmt, StmtKind};
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(super) fn check_block(&mut self, block: &mut Block) {
        for var in &mut block.variables {
            self.check_variable(var);
        }
        for stmt in &mut block.stmts {
            self.check_stmt(stmt);
        }
    }

    /// An initialized variable is checked like an assignment to it
    pub(super) fn check_variable(&mut self, var: &mut DefinedVariable) {
        let Some(init) = var.initializer.as_mut() else {
            return;
        };
        self.resolve(init);
        if is_invalid_lhs_type(&var.var_type) {
            self.error(
                &var.span,
                SemanticError::InvalidVariableType(var.var_type.clone()),
            );
            return;
        }
        self.coerce_assignment(init, &var.var_type, &var.span);
    }

    fn check_stmt(&mut self, stmt: &mut Stmt) {
        let span = stmt.span.clone();
        match &mut stmt.kind {
            StmtKind::Block(block) => self.check_block(block),

            StmtKind::Expression(expr) => self.resolve(expr),

            StmtKind::If { cond, then_stmt, else_stmt } => {
                self.resolve(cond);
                self.check_stmt(then_stmt);
                if let Some(else_stmt) = else_stmt {
                    self.check_stmt(else_stmt);
                }
                self.check_cond(cond);
            }

            StmtKind::While { cond, body } => {
                self.resolve(cond);
                self.check_stmt(body);
                self.check_cond(cond);
            }

            StmtKind::DoWhile { body, cond } => {
                self.check_stmt(body);
                self.resolve(cond);
                self.check_cond(cond);
            }

            StmtKind::For { init, cond, incr, body } => {
                for expr in [init.as_mut(), cond.as_mut(), incr.as_mut()].into_iter().flatten() {
                    self.resolve(expr);
                }
                self.check_stmt(body);
                if let Some(cond) = cond {
                    self.check_cond(cond);
                }
            }

            StmtKind::Switch { cond, cases } => {
                self.resolve(cond);
                for case in cases.iter_mut() {
                    for value in &mut case.values {
                        self.resolve(value);
                    }
                    self.check_block(&mut case.body);
                }
                self.must_be_scalar(cond);
            }

            StmtKind::Return(expr) => self.check_return(expr.as_mut(), &span),

            StmtKind::Label { stmt, .. } => self.check_stmt(stmt),

            StmtKind::Break | StmtKind::Continue | StmtKind::Goto(_) | StmtKind::Empty => {}
        }
    }

    /// Branch conditions must be integers or pointers
    pub(super) fn check_cond(&mut self, cond: &Expr) {
        self.must_be_scalar(cond);
    }

    fn check_return(&mut self, expr: Option<&mut Expr>, span: &SourceSpan) {
        let return_type = self.return_type.clone();
        match expr {
            Some(expr) => {
                self.resolve(expr);
                if return_type.is_void() {
                    self.error(span, SemanticError::ReturnValueFromVoid);
                    return;
                }
                let ty = expr.ty().clone();
                if ty == return_type {
                    return;
                }
                if ty.is_compatible(&return_type) {
                    self.insert_cast(expr, &return_type);
                } else {
                    self.error(span, SemanticError::IncompatibleReturn(ty));
                }
            }
            None if !return_type.is_void() => {
                self.error(span, SemanticError::MissingReturnValue);
            }
            None => {}
        }
    }
}
