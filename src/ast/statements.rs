use crate::Position;

use super::{
    ast::{Identifier, NodeId},
    expressions::Expr,
    types::TypeNode,
};

/// Variable Declaration
/// A global or block-local `type name;`.
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub position: Position,
    pub type_node: TypeNode,
    pub name: Identifier,
}

/// Formal Declaration
/// One `type name` entry of a function's parameter list.
#[derive(Debug, Clone)]
pub struct FormalDecl {
    pub id: NodeId,
    pub position: Position,
    pub type_node: TypeNode,
    pub name: Identifier,
}

/// Function Declaration
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub id: NodeId,
    pub position: Position,
    pub return_type: TypeNode,
    pub name: Identifier,
    pub formals: Vec<FormalDecl>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub position: Position,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    VarDecl(VarDecl),
    /// Holds an assignment expression.
    Assign(Expr),
    PostInc(Expr),
    PostDec(Expr),
    Read(Expr),
    Write(Expr),
    If {
        condition: Expr,
        body: Vec<Stmt>,
    },
    IfElse {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    /// Holds a call expression.
    Call(Expr),
    Return(Option<Expr>),
}
