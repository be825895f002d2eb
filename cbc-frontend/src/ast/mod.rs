//! Abstract Syntax Tree definitions for Cflat
//!
//! The tree arrives scope-resolved from earlier phases, is annotated and
//! rewritten in place by the type checker, and is read-only afterwards.

pub mod declarations;
pub mod expressions;
pub mod ops;
pub mod statements;

pub use declarations::{Ast, DefinedFunction, DefinedVariable, Parameter, StorageSlot};
pub use expressions::{Expr, ExprKind};
pub use ops::{AssignOp, BinaryOp, IncDecOp, OperatorClass, UnaryOp};
pub use statements::{Block, Case, Stmt, StmtKind};

use crate::types::Type;

impl Ast {
    /// Every expression reachable from a declaration or function body
    pub fn expressions(&self) -> Vec<&Expr> {
        let mut roots = Vec::new();
        for var in &self.variables {
            roots.extend(var.initializer.iter());
        }
        for func in &self.functions {
            collect_block(&func.body, &mut roots);
        }
        let mut all = Vec::new();
        let mut pending = roots;
        while let Some(expr) = pending.pop() {
            all.push(expr);
            pending.extend(expr.children());
        }
        all
    }

    /// Whether every reachable expression has a resolved type
    pub fn is_fully_typed(&self) -> bool {
        self.expressions().iter().all(|e| e.ty.is_some())
    }

    /// Visit every type written in the tree: declarations, members,
    /// signatures, and the types carried by expression nodes
    pub fn for_each_type_mut<F: FnMut(&mut Type)>(&mut self, f: &mut F) {
        for decl in &mut self.types {
            for member in &mut decl.members {
                f(&mut member.member_type);
            }
        }
        for var in &mut self.variables {
            visit_variable(var, f);
        }
        for func in &mut self.functions {
            f(&mut func.return_type);
            for param in &mut func.params {
                f(&mut param.param_type);
            }
            visit_block(&mut func.body, f);
        }
    }
}

fn visit_variable<F: FnMut(&mut Type)>(var: &mut DefinedVariable, f: &mut F) {
    f(&mut var.var_type);
    if let Some(init) = &mut var.initializer {
        visit_expr(init, f);
    }
}

fn visit_block<F: FnMut(&mut Type)>(block: &mut Block, f: &mut F) {
    for var in &mut block.variables {
        visit_variable(var, f);
    }
    for stmt in &mut block.stmts {
        visit_stmt(stmt, f);
    }
}

fn visit_stmt<F: FnMut(&mut Type)>(stmt: &mut Stmt, f: &mut F) {
    match &mut stmt.kind {
        StmtKind::Block(block) => visit_block(block, f),
        StmtKind::Expression(expr) => visit_expr(expr, f),
        StmtKind::If { cond, then_stmt, else_stmt } => {
            visit_expr(cond, f);
            visit_stmt(then_stmt, f);
            if let Some(else_stmt) = else_stmt {
                visit_stmt(else_stmt, f);
            }
        }
        StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
            visit_expr(cond, f);
            visit_stmt(body, f);
        }
        StmtKind::For { init, cond, incr, body } => {
            for expr in [init, cond, incr].into_iter().flatten() {
                visit_expr(expr, f);
            }
            visit_stmt(body, f);
        }
        StmtKind::Switch { cond, cases } => {
            visit_expr(cond, f);
            for case in cases {
                for value in &mut case.values {
                    visit_expr(value, f);
                }
                visit_block(&mut case.body, f);
            }
        }
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                visit_expr(expr, f);
            }
        }
        StmtKind::Label { stmt, .. } => visit_stmt(stmt, f),
        StmtKind::Break | StmtKind::Continue | StmtKind::Goto(_) | StmtKind::Empty => {}
    }
}

fn visit_expr<F: FnMut(&mut Type)>(expr: &mut Expr, f: &mut F) {
    if let Some(ty) = &mut expr.ty {
        f(ty);
    }
    match &mut expr.kind {
        ExprKind::IntLiteral { literal_type, .. } => f(literal_type),
        ExprKind::Variable { entity_type, .. } => f(entity_type),
        ExprKind::Cast { target, .. } => f(target),
        ExprKind::SizeofType(ty) => f(ty),
        _ => {}
    }
    for child in expr.children_mut() {
        visit_expr(child, f);
    }
}

fn collect_block<'a>(block: &'a Block, out: &mut Vec<&'a Expr>) {
    for var in &block.variables {
        out.extend(var.initializer.iter());
    }
    for stmt in &block.stmts {
        collect_stmt(stmt, out);
    }
}

fn collect_stmt<'a>(stmt: &'a Stmt, out: &mut Vec<&'a Expr>) {
    match &stmt.kind {
        StmtKind::Block(block) => collect_block(block, out),
        StmtKind::Expression(expr) => out.push(expr),
        StmtKind::If { cond, then_stmt, else_stmt } => {
            out.push(cond);
            collect_stmt(then_stmt, out);
            if let Some(else_stmt) = else_stmt {
                collect_stmt(else_stmt, out);
            }
        }
        StmtKind::While { cond, body } | StmtKind::DoWhile { body, cond } => {
            out.push(cond);
            collect_stmt(body, out);
        }
        StmtKind::For { init, cond, incr, body } => {
            out.extend(init.iter());
            out.extend(cond.iter());
            out.extend(incr.iter());
            collect_stmt(body, out);
        }
        StmtKind::Switch { cond, cases } => {
            out.push(cond);
            for case in cases {
                out.extend(case.values.iter());
                collect_block(&case.body, out);
            }
        }
        StmtKind::Return(expr) => out.extend(expr.iter()),
        StmtKind::Label { stmt, .. } => collect_stmt(stmt, out),
        StmtKind::Break | StmtKind::Continue | StmtKind::Goto(_) | StmtKind::Empty => {}
    }
}
