//! Expression AST nodes for Cflat
//!
//! Every expression owns its operands. The type checker fills in `ty` and
//! may wrap an operand in a cast node through [`Expr::wrap_in_cast`].

use super::ops::{AssignOp, BinaryOp, IncDecOp, UnaryOp};
use crate::types::Type;
use cbc_common::{HasSpan, SourceSpan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub span: SourceSpan,
    /// Resolved type, filled during type checking
    #[serde(default)]
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    IntLiteral {
        value: i64,
        literal_type: Type,
    },

    StringLiteral(String),

    /// Reference to a declared variable, parameter or function. The
    /// declaration's type has been attached by scope resolution.
    Variable {
        name: String,
        entity_type: Type,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    IncDec {
        op: IncDecOp,
        operand: Box<Expr>,
    },

    /// `&operand`
    AddressOf(Box<Expr>),

    /// `*operand`
    Dereference(Box<Expr>),

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `cond ? then_expr : else_expr`
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },

    /// `base[index]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// `base.member`
    Member {
        base: Box<Expr>,
        member: String,
    },

    /// `base->member`
    PtrMember {
        base: Box<Expr>,
        member: String,
    },

    /// Conversion to `target`; `implicit` marks casts inserted by the checker
    Cast {
        target: Type,
        operand: Box<Expr>,
        #[serde(default)]
        implicit: bool,
    },

    SizeofType(Type),

    SizeofExpr(Box<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: SourceSpan::default(),
            ty: None,
        }
    }

    pub fn int(value: i64, literal_type: Type) -> Self {
        Self::new(ExprKind::IntLiteral { value, literal_type })
    }

    pub fn string(value: &str) -> Self {
        Self::new(ExprKind::StringLiteral(value.to_string()))
    }

    pub fn variable(name: &str, entity_type: Type) -> Self {
        Self::new(ExprKind::Variable {
            name: name.to_string(),
            entity_type,
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn inc_dec(op: IncDecOp, operand: Expr) -> Self {
        Self::new(ExprKind::IncDec {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn address_of(operand: Expr) -> Self {
        Self::new(ExprKind::AddressOf(Box::new(operand)))
    }

    pub fn dereference(operand: Expr) -> Self {
        Self::new(ExprKind::Dereference(Box::new(operand)))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn assign(op: AssignOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Assign {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn conditional(cond: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Self::new(ExprKind::Conditional {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn index(base: Expr, index: Expr) -> Self {
        Self::new(ExprKind::Index {
            base: Box::new(base),
            index: Box::new(index),
        })
    }

    pub fn member(base: Expr, member: &str) -> Self {
        Self::new(ExprKind::Member {
            base: Box::new(base),
            member: member.to_string(),
        })
    }

    pub fn ptr_member(base: Expr, member: &str) -> Self {
        Self::new(ExprKind::PtrMember {
            base: Box::new(base),
            member: member.to_string(),
        })
    }

    /// Source-level cast `(target)operand`
    pub fn cast(target: Type, operand: Expr) -> Self {
        Self::new(ExprKind::Cast {
            target,
            operand: Box::new(operand),
            implicit: false,
        })
    }

    /// Checker-inserted conversion; already typed as `target`
    pub fn implicit_cast(target: Type, operand: Expr) -> Self {
        let span = operand.span.clone();
        Self {
            ty: Some(target.clone()),
            kind: ExprKind::Cast {
                target,
                operand: Box::new(operand),
                implicit: true,
            },
            span,
        }
    }

    pub fn sizeof_type(ty: Type) -> Self {
        Self::new(ExprKind::SizeofType(ty))
    }

    pub fn sizeof_expr(operand: Expr) -> Self {
        Self::new(ExprKind::SizeofExpr(Box::new(operand)))
    }

    /// Replace this node in place with `f(self)`
    pub fn replace_with(&mut self, f: impl FnOnce(Expr) -> Expr) {
        let placeholder = Expr::new(ExprKind::SizeofType(Type::Void));
        let old = std::mem::replace(self, placeholder);
        *self = f(old);
    }

    /// Wrap this node in an implicit cast to `target`
    pub fn wrap_in_cast(&mut self, target: &Type) {
        self.replace_with(|inner| Expr::implicit_cast(target.clone(), inner));
    }

    /// Resolved type, `void` when not yet resolved
    pub fn ty(&self) -> &Type {
        static VOID: Type = Type::Void;
        self.ty.as_ref().unwrap_or(&VOID)
    }

    /// Whether this expression denotes a storage location
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Variable { .. }
                | ExprKind::Index { .. }
                | ExprKind::Member { .. }
                | ExprKind::PtrMember { .. }
                | ExprKind::Dereference(_)
        )
    }

    /// Whether this expression may appear on the left of `=` or under `&`.
    /// Arrays and functions are lvalues that cannot be stored to.
    pub fn is_assignable(&self) -> bool {
        self.is_lvalue() && !self.ty().is_array() && !self.ty().is_function()
    }

    pub fn is_implicit_cast(&self) -> bool {
        matches!(self.kind, ExprKind::Cast { implicit: true, .. })
    }

    /// Direct operand subtrees in evaluation order
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::IntLiteral { .. }
            | ExprKind::StringLiteral(_)
            | ExprKind::Variable { .. }
            | ExprKind::SizeofType(_) => Vec::new(),
            ExprKind::Unary { operand, .. }
            | ExprKind::IncDec { operand, .. }
            | ExprKind::AddressOf(operand)
            | ExprKind::Dereference(operand)
            | ExprKind::Cast { operand, .. }
            | ExprKind::SizeofExpr(operand) => vec![&**operand],
            ExprKind::Binary { left, right, .. } => vec![&**left, &**right],
            ExprKind::Assign { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                vec![&**cond, &**then_expr, &**else_expr]
            }
            ExprKind::Call { callee, args } => {
                let mut children: Vec<&Expr> = vec![&**callee];
                children.extend(args.iter());
                children
            }
            ExprKind::Index { base, index } => vec![&**base, &**index],
            ExprKind::Member { base, .. } | ExprKind::PtrMember { base, .. } => vec![&**base],
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match &mut self.kind {
            ExprKind::IntLiteral { .. }
            | ExprKind::StringLiteral(_)
            | ExprKind::Variable { .. }
            | ExprKind::SizeofType(_) => Vec::new(),
            ExprKind::Unary { operand, .. }
            | ExprKind::IncDec { operand, .. }
            | ExprKind::AddressOf(operand)
            | ExprKind::Dereference(operand)
            | ExprKind::Cast { operand, .. }
            | ExprKind::SizeofExpr(operand) => vec![&mut **operand],
            ExprKind::Binary { left, right, .. } => vec![&mut **left, &mut **right],
            ExprKind::Assign { lhs, rhs, .. } => vec![&mut **lhs, &mut **rhs],
            ExprKind::Conditional { cond, then_expr, else_expr } => {
                vec![&mut **cond, &mut **then_expr, &mut **else_expr]
            }
            ExprKind::Call { callee, args } => {
                let mut children: Vec<&mut Expr> = vec![&mut **callee];
                children.extend(args.iter_mut());
                children
            }
            ExprKind::Index { base, index } => vec![&mut **base, &mut **index],
            ExprKind::Member { base, .. } | ExprKind::PtrMember { base, .. } => {
                vec![&mut **base]
            }
        }
    }

    /// Whether this node and every subtree below it carry a resolved type
    pub fn is_fully_typed(&self) -> bool {
        self.ty.is_some() && self.children().into_iter().all(Expr::is_fully_typed)
    }
}

impl HasSpan for Expr {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}
