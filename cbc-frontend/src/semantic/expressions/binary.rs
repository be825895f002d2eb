//! Binary, assignment and conditional expressions

use crate::ast::{AssignOp, BinaryOp, Expr, OperatorClass};
use crate::semantic::{is_invalid_lhs_type, SemanticError, SemanticWarning, TypeChecker};
use crate::types::Type;
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    pub(super) fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &mut Expr,
        right: &mut Expr,
        span: &SourceSpan,
    ) -> Type {
        self.resolve(left);
        self.resolve(right);
        match op.class() {
            OperatorClass::Additive => self.expect_integer_or_pointer_offset(left, right, span),
            OperatorClass::Multiplicative => self.expect_same_integer(left, right, span),
            OperatorClass::Shift => {
                // Both operands are always checked so both get reported
                let ok = self.must_be_integer(left) & self.must_be_integer(right);
                if ok {
                    left.ty().clone()
                } else {
                    Type::Void
                }
            }
            OperatorClass::Comparison => {
                let ok = self.must_be_scalar(left) & self.must_be_scalar(right);
                if ok && self.unify(left, right, span) {
                    self.types.int()
                } else {
                    Type::Void
                }
            }
        }
    }

    /// `+` and `-` accept integer op integer, pointer op integer and
    /// integer op pointer. Arrays are not pointers here.
    fn expect_integer_or_pointer_offset(
        &mut self,
        left: &mut Expr,
        right: &mut Expr,
        span: &SourceSpan,
    ) -> Type {
        if left.ty().is_pointer() {
            return if self.must_be_integer(right) { left.ty().clone() } else { Type::Void };
        }
        if right.ty().is_pointer() {
            return if self.must_be_integer(left) { right.ty().clone() } else { Type::Void };
        }
        self.expect_same_integer(left, right, span)
    }

    fn expect_same_integer(&mut self, left: &mut Expr, right: &mut Expr, span: &SourceSpan) -> Type {
        let ok = self.must_be_integer(left) & self.must_be_integer(right);
        if ok && self.unify(left, right, span) {
            left.ty().clone()
        } else {
            Type::Void
        }
    }

    /// Give both operands one type: cast the right operand to the left's
    /// type when compatible, otherwise the left to the right's
    fn unify(&mut self, left: &mut Expr, right: &mut Expr, span: &SourceSpan) -> bool {
        let l = left.ty().clone();
        let r = right.ty().clone();
        if l == r {
            true
        } else if r.is_compatible(&l) {
            self.insert_cast(right, &l);
            true
        } else if l.is_compatible(&r) {
            self.insert_cast(left, &r);
            true
        } else {
            self.error(span, SemanticError::IncompatibleTypes(l, r));
            false
        }
    }

    /// Shared by `=`, the compound assignments and variable initializers
    pub(super) fn check_assign(
        &mut self,
        op: AssignOp,
        lhs: &mut Expr,
        rhs: &mut Expr,
        span: &SourceSpan,
    ) -> Type {
        self.resolve(lhs);
        self.resolve(rhs);
        if !lhs.is_assignable() {
            self.error(span, SemanticError::InvalidLhsExpression);
            return Type::Void;
        }
        let target = lhs.ty().clone();
        if is_invalid_lhs_type(&target) {
            self.error(span, SemanticError::InvalidLhsType);
            return Type::Void;
        }
        // p += n and p -= n move the pointer; n stays an integer
        if matches!(op, AssignOp::AddAssign | AssignOp::SubAssign) && target.is_pointer() {
            return if self.must_be_integer(rhs) { target } else { Type::Void };
        }
        if self.coerce_assignment(rhs, &target, span) {
            target
        } else {
            Type::Void
        }
    }

    /// Convert an assigned value to `target`. Anything castable is
    /// converted; conversions that are not compatible also warn.
    pub(in crate::semantic) fn coerce_assignment(
        &mut self,
        rhs: &mut Expr,
        target: &Type,
        span: &SourceSpan,
    ) -> bool {
        let from = rhs.ty().clone();
        if &from == target {
            return true;
        }
        if !from.is_castable_to(target) {
            self.error(span, SemanticError::IncompatibleTypes(target.clone(), from));
            return false;
        }
        if !from.is_compatible(target) {
            let warning = SemanticWarning::ImplicitCast {
                from,
                to: target.clone(),
            };
            self.warn(span, warning);
        }
        self.insert_cast(rhs, target);
        true
    }

    /// `cond ? then_expr : else_expr`. When the branch types differ the
    /// then-branch is cast first if that direction is compatible.
    pub(super) fn check_conditional(
        &mut self,
        cond: &mut Expr,
        then_expr: &mut Expr,
        else_expr: &mut Expr,
        span: &SourceSpan,
    ) -> Type {
        self.resolve(cond);
        self.resolve(then_expr);
        self.resolve(else_expr);
        self.check_cond(cond);

        let t = then_expr.ty().clone();
        let e = else_expr.ty().clone();
        if t == e {
            t
        } else if t.is_compatible(&e) {
            self.insert_cast(then_expr, &e);
            e
        } else if e.is_compatible(&t) {
            self.insert_cast(else_expr, &t);
            t
        } else {
            self.error(span, SemanticError::IncompatibleTypes(e, t));
            Type::Void
        }
    }
}
