use std::fmt::{self, Display};

use crate::Position;

use super::ast::{Identifier, NodeId};

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub position: Position,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Identifier(Identifier),
    IntLit(i64),
    /// Kept as written, quotes and escapes included.
    StrLit(String),
    BoolLit(bool),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call(CallExpr),
    Assign {
        target: Box<Expr>,
        source: Box<Expr>,
    },
}

/// Call Expression
/// A call of a named function with its actuals in source order.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Identifier,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    Deref,
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Negate => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Deref => write!(f, "*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
}

/// The family of rules an operator is checked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Arithmetic,
    Logical,
    Equality,
    Relational,
}

impl BinaryOp {
    pub fn class(&self) -> OperatorClass {
        match self {
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide => {
                OperatorClass::Arithmetic
            }
            BinaryOp::And | BinaryOp::Or => OperatorClass::Logical,
            BinaryOp::Equals | BinaryOp::NotEquals => OperatorClass::Equality,
            BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessEquals
            | BinaryOp::GreaterEquals => OperatorClass::Relational,
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => " and ",
            BinaryOp::Or => " or ",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
        };
        write!(f, "{}", op)
    }
}
