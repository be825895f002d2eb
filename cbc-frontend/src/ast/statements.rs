//! Statement AST nodes for Cflat

use super::declarations::DefinedVariable;
use super::expressions::Expr;
use cbc_common::{HasSpan, SourceSpan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    Block(Block),

    Expression(Expr),

    If {
        cond: Expr,
        then_stmt: Box<Stmt>,
        #[serde(default)]
        else_stmt: Option<Box<Stmt>>,
    },

    While {
        cond: Expr,
        body: Box<Stmt>,
    },

    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },

    For {
        #[serde(default)]
        init: Option<Expr>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        incr: Option<Expr>,
        body: Box<Stmt>,
    },

    Switch {
        cond: Expr,
        cases: Vec<Case>,
    },

    Return(Option<Expr>),

    Break,

    Continue,

    Goto(String),

    Label {
        name: String,
        stmt: Box<Stmt>,
    },

    Empty,
}

/// Compound statement with its block-local variable definitions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub variables: Vec<DefinedVariable>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(variables: Vec<DefinedVariable>, stmts: Vec<Stmt>) -> Self {
        Self { variables, stmts }
    }
}

/// One `case`/`default` arm; `default` has no values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    #[serde(default)]
    pub values: Vec<Expr>,
    pub body: Block,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            kind,
            span: SourceSpan::default(),
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expression(expr))
    }

    pub fn ret(expr: Option<Expr>) -> Self {
        Self::new(StmtKind::Return(expr))
    }

    pub fn if_else(cond: Expr, then_stmt: Stmt, else_stmt: Option<Stmt>) -> Self {
        Self::new(StmtKind::If {
            cond,
            then_stmt: Box::new(then_stmt),
            else_stmt: else_stmt.map(Box::new),
        })
    }

    pub fn while_loop(cond: Expr, body: Stmt) -> Self {
        Self::new(StmtKind::While {
            cond,
            body: Box::new(body),
        })
    }
}

impl HasSpan for Stmt {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}
