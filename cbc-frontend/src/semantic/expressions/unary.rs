//! Unary expression operations and type checking

use crate::ast::{Expr, UnaryOp};
use crate::semantic::{SemanticError, TypeChecker};
use crate::types::Type;
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(super) fn check_unary(&mut self, op: UnaryOp, operand: &mut Expr) -> Type {
        self.resolve(operand);
        match op {
            UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => {
                if self.must_be_integer(operand) {
                    operand.ty().clone()
                } else {
                    Type::Void
                }
            }
            UnaryOp::LogicalNot => {
                if self.must_be_scalar(operand) {
                    self.types.int()
                } else {
                    Type::Void
                }
            }
        }
    }

    /// Integers and pointers can be incremented and decremented
    pub(super) fn check_inc_dec(&mut self, operand: &mut Expr) -> Type {
        self.resolve(operand);
        if self.must_be_scalar(operand) {
            operand.ty().clone()
        } else {
            Type::Void
        }
    }

    /// The result is a pointer to the operand's type even when the operand
    /// cannot have its address taken
    pub(super) fn check_address_of(&mut self, operand: &mut Expr, span: &SourceSpan) -> Type {
        self.resolve(operand);
        let ty = self.types.pointer_to(operand.ty());
        if !operand.is_assignable() {
            self.error(span, SemanticError::NotAddressable);
        }
        ty
    }

    pub(super) fn check_dereference(&mut self, operand: &mut Expr, span: &SourceSpan) -> Type {
        self.resolve(operand);
        match operand.ty().base_type() {
            Some(base) => base.clone(),
            None => {
                let error = SemanticError::NotDereferable(operand.ty().clone());
                self.error(span, error);
                Type::Void
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, Block, DefinedFunction, Expr, IncDecOp, Stmt, StmtKind, UnaryOp};
    use crate::semantic::TypeChecker;
    use crate::types::TypeTable;
    use cbc_common::ErrorReporter;

    fn check_expr(types: &TypeTable, expr: Expr) -> (Expr, ErrorReporter) {
        let mut ast = Ast {
            functions: vec![DefinedFunction::new(
                "f",
                types.void(),
                vec![],
                Block::new(vec![], vec![Stmt::expr(expr)]),
            )],
            ..Ast::default()
        };
        let mut reporter = ErrorReporter::new();
        let _ = TypeChecker::check(&mut ast, types, &mut reporter);
        match ast.functions.remove(0).body.stmts.remove(0).kind {
            StmtKind::Expression(expr) => (expr, reporter),
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_operators() {
        let types = TypeTable::lp64();
        let int_ptr = types.pointer_to(&types.int());

        let (expr, reporter) = check_expr(&types, Expr::unary(UnaryOp::Minus, Expr::variable("c", types.char())));
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(expr.ty(), &types.char());

        let (expr, reporter) = check_expr(&types, Expr::unary(UnaryOp::LogicalNot, Expr::variable("p", int_ptr.clone())));
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(expr.ty(), &types.int());

        let (_, reporter) = check_expr(&types, Expr::unary(UnaryOp::BitNot, Expr::variable("p", int_ptr)));
        assert_eq!(reporter.error_messages(), vec!["non-integer argument for unary op: int*"]);
    }

    #[test]
    fn test_inc_dec_requires_scalar() {
        let types = TypeTable::lp64();
        let int_ptr = types.pointer_to(&types.int());

        let (expr, reporter) = check_expr(
            &types,
            Expr::inc_dec(IncDecOp::PostIncrement, Expr::variable("p", int_ptr.clone())),
        );
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(expr.ty(), &int_ptr);

        let (_, reporter) = check_expr(
            &types,
            Expr::inc_dec(
                IncDecOp::PreDecrement,
                Expr::variable("a", types.array_of(types.int(), Some(3))),
            ),
        );
        assert_eq!(reporter.error_messages(), vec!["non-integer argument for unary op: int[3]"]);
    }

    #[test]
    fn test_address_of() {
        let types = TypeTable::lp64();
        let (expr, reporter) = check_expr(&types, Expr::address_of(Expr::variable("x", types.long())));
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(expr.ty(), &types.pointer_to(&types.long()));

        let (expr, reporter) = check_expr(&types, Expr::address_of(Expr::int(1, types.int())));
        assert_eq!(reporter.error_messages(), vec!["invalid LHS expression for &"]);
        assert_eq!(expr.ty(), &types.pointer_to(&types.int()));
    }

    #[test]
    fn test_dereference() {
        let types = TypeTable::lp64();
        let (expr, reporter) = check_expr(
            &types,
            Expr::dereference(Expr::variable("p", types.pointer_to(&types.short()))),
        );
        assert!(reporter.diagnostics().is_empty());
        assert_eq!(expr.ty(), &types.short());

        let (expr, reporter) = check_expr(&types, Expr::dereference(Expr::variable("x", types.int())));
        assert_eq!(reporter.error_messages(), vec!["dereferencing non-pointer expression: int"]);
        assert_eq!(expr.ty(), &types.void());
    }
}
