use crate::{
    ast::{
        ast::{Decl, Identifier},
        expressions::{Expr, ExprKind},
        statements::{FnDecl, FormalDecl, Stmt, StmtKind, VarDecl},
        types::TypeNode,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let handler = parser
        .exprs()
        .stmt
        .get(&parser.current_token_kind())
        .copied();
    if let Some(handler) = handler {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

/// Assignments, calls, `++` and `--` are the only expressions that may
/// stand alone as statements.
fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    let kind = match parser.current_token_kind() {
        TokenKind::PlusPlus => {
            parser.advance();
            StmtKind::PostInc(expr)
        }
        TokenKind::MinusMinus => {
            parser.advance();
            StmtKind::PostDec(expr)
        }
        _ if matches!(expr.kind, ExprKind::Assign { .. }) => StmtKind::Assign(expr),
        _ if matches!(expr.kind, ExprKind::Call(_)) => StmtKind::Call(expr),
        _ => return Err(parser.unexpected("expected an assignment, call, `++` or `--`")),
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind,
    })
}

fn parse_declared_name(parser: &mut Parser) -> Result<Identifier, Error> {
    let error = parser.unexpected("expected identifier after type");
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Identifier::new(
        parser.advance_id(),
        token.span.start,
        token.value,
    ))
}

/// Parses the remainder of `type name ;` once the type and name are known.
fn finish_var_decl(
    parser: &mut Parser,
    type_node: TypeNode,
    name: Identifier,
) -> Result<VarDecl, Error> {
    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDecl {
        id: parser.advance_id(),
        position: name.position,
        type_node,
        name,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.get_position();
    let type_node = parse_type(parser, BindingPower::Default)?;
    let name = parse_declared_name(parser)?;
    let decl = finish_var_decl(parser, type_node, name)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind: StmtKind::VarDecl(decl),
    })
}

/// Parses `{ stmt* }`.
pub fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut body = vec![];
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(body)
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::If)?.span.start;
    let condition = parse_condition(parser)?;
    let then_body = parse_block(parser)?;

    let kind = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        let else_body = parse_block(parser)?;
        StmtKind::IfElse {
            condition,
            then_body,
            else_body,
        }
    } else {
        StmtKind::If {
            condition,
            body: then_body,
        }
    };

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::While)?.span.start;
    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind: StmtKind::While { condition, body },
    })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::Return)?.span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind: StmtKind::Return(value),
    })
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::ReadOp)?.span.start;
    let operand = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind: StmtKind::Read(operand),
    })
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.expect(TokenKind::WriteOp)?.span.start;
    let operand = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt {
        id: parser.advance_id(),
        position,
        kind: StmtKind::Write(operand),
    })
}

fn parse_formals(parser: &mut Parser) -> Result<Vec<FormalDecl>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut formals = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let type_node = parse_type(parser, BindingPower::Default)?;
            let name = parse_declared_name(parser)?;
            formals.push(FormalDecl {
                id: parser.advance_id(),
                position: name.position,
                type_node,
                name,
            });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(formals)
}

/// Parses a global declaration: `type name ;` or a function definition.
pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    let type_node = parse_type(parser, BindingPower::Default)?;
    let name = parse_declared_name(parser)?;

    if parser.current_token_kind() != TokenKind::OpenParen {
        return Ok(Decl::Var(finish_var_decl(parser, type_node, name)?));
    }

    let formals = parse_formals(parser)?;
    let body = parse_block(parser)?;

    Ok(Decl::Fn(FnDecl {
        id: parser.advance_id(),
        position: name.position,
        return_type: type_node,
        name,
        formals,
        body,
    }))
}
