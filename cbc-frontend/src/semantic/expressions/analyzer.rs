//! Main expression analyzer that resolves every expression kind

use crate::ast::{Expr, ExprKind};
use crate::semantic::{SemanticError, SemanticWarning, TypeChecker};
use crate::types::{FunctionType, Type};
use cbc_common::SourceSpan;

impl TypeChecker<'_> {
    /// Resolve the type of `expr` and its subtrees, applying the rule of
    /// each node after its operands. Nodes on an error path get `void`.
    pub(in crate::semantic) fn resolve(&mut self, expr: &mut Expr) {
        let span = expr.span.clone();
        let ty = match &mut expr.kind {
            ExprKind::IntLiteral { literal_type, .. } => literal_type.clone(),

            ExprKind::StringLiteral(_) => self.types.pointer_to(&self.types.char()),

            ExprKind::Variable { entity_type, .. } => entity_type.clone(),

            ExprKind::Unary { op, operand } => self.check_unary(*op, operand),

            ExprKind::IncDec { operand, .. } => self.check_inc_dec(operand),

            ExprKind::AddressOf(operand) => self.check_address_of(operand, &span),

            ExprKind::Dereference(operand) => self.check_dereference(operand, &span),

            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right, &span),

            ExprKind::Assign { op, lhs, rhs } => self.check_assign(*op, lhs, rhs, &span),

            ExprKind::Conditional { cond, then_expr, else_expr } => {
                self.check_conditional(cond, then_expr, else_expr, &span)
            }

            ExprKind::Call { callee, args } => self.check_call(callee, args, &span),

            ExprKind::Index { base, index } => self.check_index(base, index, &span),

            ExprKind::Member { base, member } => {
                self.resolve(base);
                let base_type = base.ty().clone();
                self.check_member_ref(&base_type, member, &span)
            }

            ExprKind::PtrMember { base, member } => {
                self.resolve(base);
                match base.ty() {
                    Type::Pointer(pointee) => {
                        let pointee = pointee.as_ref().clone();
                        self.check_member_ref(&pointee, member, &span)
                    }
                    other => {
                        let error = SemanticError::NotDereferable(other.clone());
                        self.error(&span, error);
                        Type::Void
                    }
                }
            }

            ExprKind::Cast { target, operand, implicit } => {
                self.check_cast(target, operand, *implicit, &span)
            }

            ExprKind::SizeofType(_) => self.types.unsigned_long(),

            ExprKind::SizeofExpr(operand) => {
                self.resolve(operand);
                self.types.unsigned_long()
            }
        };
        expr.ty = Some(ty);
    }

    /// For `callee(args)`: the callee must be callable, the argument count
    /// must fit the prototype, and each mandatory argument must convert to
    /// its parameter type. Extra variadic arguments are left as they are.
    fn check_call(&mut self, callee: &mut Expr, args: &mut [Expr], span: &SourceSpan) -> Type {
        self.resolve(callee);
        let Some(func) = callee.ty().function_type().cloned() else {
            self.error(span, SemanticError::NotCallable);
            self.resolve_all(args);
            return Type::Void;
        };
        if !func.accepts_argc(args.len()) {
            self.error(span, SemanticError::WrongArgumentCount(args.len()));
            self.resolve_all(args);
            return Type::Void;
        }

        let FunctionType { return_type, params, .. } = func;
        let (mandatory, extra) = args.split_at_mut(params.len());
        for (arg, param) in mandatory.iter_mut().zip(&params) {
            self.resolve(arg);
            self.check_arg_type(arg, param);
        }
        self.resolve_all(extra);
        *return_type
    }

    fn check_arg_type(&mut self, arg: &mut Expr, param: &Type) {
        let ty = arg.ty().clone();
        if ty.is_complex() {
            self.error(&arg.span, SemanticError::InvalidArgumentType(ty));
            return;
        }
        if &ty == param {
            return;
        }
        if ty.is_compatible(param) {
            self.insert_cast(arg, param);
        } else {
            self.error(&arg.span, SemanticError::IncompatibleTypes(ty, param.clone()));
        }
    }

    fn resolve_all(&mut self, exprs: &mut [Expr]) {
        for expr in exprs {
            self.resolve(expr);
        }
    }

    /// `base[index]`: base must be an array or pointer, index an integer
    fn check_index(&mut self, base: &mut Expr, index: &mut Expr, span: &SourceSpan) -> Type {
        self.resolve(base);
        let Some(element) = base.ty().base_type().cloned() else {
            self.error(span, SemanticError::NotIndexable(base.ty().clone()));
            self.resolve(index);
            return Type::Void;
        };
        self.resolve(index);
        if self.must_be_integer(index) {
            element
        } else {
            Type::Void
        }
    }

    fn check_member_ref(&mut self, ty: &Type, member: &str, span: &SourceSpan) -> Type {
        if !ty.is_complex() {
            self.error(span, SemanticError::NotComposed(ty.clone()));
            return Type::Void;
        }
        match self.types.member_type(ty, member) {
            Some(member_type) => member_type.clone(),
            None => {
                let error = SemanticError::NoSuchMember(ty.clone(), member.to_string());
                self.error(span, error);
                Type::Void
            }
        }
    }

    /// Casts that are legal but change representation are reported unless
    /// the checker inserted them itself
    fn check_cast(
        &mut self,
        target: &Type,
        operand: &mut Expr,
        implicit: bool,
        span: &SourceSpan,
    ) -> Type {
        self.resolve(operand);
        let from = operand.ty().clone();
        if !from.is_castable_to(target) {
            self.error(span, SemanticError::IncompatibleTypes(from, target.clone()));
            return Type::Void;
        }
        if !implicit && !from.is_compatible(target) {
            let warning = SemanticWarning::IncompatibleCast {
                from,
                to: target.clone(),
            };
            self.warn(span, warning);
        }
        target.clone()
    }
}
