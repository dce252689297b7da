use crate::{
    ast::{
        ast::Identifier,
        expressions::{BinaryOp, CallExpr, Expr, ExprKind, UnaryOp},
    },
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Parses an expression whose operators all bind tighter than `bp`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    let token_kind = parser.current_token_kind();
    let nud = match parser.exprs().nud.get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected("expected an expression")),
    };

    let mut left = nud(parser)?;

    // Keep folding infix operators into `left` while they outrank `bp`
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .exprs()
            .bp
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.exprs().led.get(&token_kind) {
            Some(handler) => *handler,
            None => {
                return Err(Error::new(
                    ErrorKind::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    let kind = match token.kind {
        TokenKind::Number => match token.value.parse() {
            Ok(value) => ExprKind::IntLit(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorKind::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Identifier => ExprKind::Identifier(Identifier::new(
            parser.advance_id(),
            token.span.start,
            token.value,
        )),
        TokenKind::String => ExprKind::StrLit(token.value),
        TokenKind::True => ExprKind::BoolLit(true),
        TokenKind::False => ExprKind::BoolLit(false),
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr {
        id: parser.advance_id(),
        position: token.span.start,
        kind,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Times,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        _ => return None,
    };
    Some(op)
}

/// Left associative: the right operand binds tighter than the operator.
pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let op = binary_op(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorKind::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start,
        )
    })?;

    let right = parse_expr(parser, bp)?;

    Ok(Expr {
        id: parser.advance_id(),
        position: left.position,
        kind: ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let op = match operator_token.kind {
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Not => UnaryOp::Not,
        TokenKind::Star => UnaryOp::Deref,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken {
                    token: operator_token.value,
                },
                operator_token.span.start,
            ))
        }
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr {
        id: parser.advance_id(),
        position: operator_token.span.start,
        kind: ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
    })
}

/// Right associative: `a = b = c` assigns `c` to `b` first.
pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.expect(TokenKind::Assignment)?;
    let source = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr {
        id: parser.advance_id(),
        position: left.position,
        kind: ExprKind::Assign {
            target: Box::new(left),
            source: Box::new(source),
        },
    })
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let callee = match left.kind {
        ExprKind::Identifier(identifier) => identifier,
        _ => return Err(parser.unexpected("only named functions can be called")),
    };

    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            args.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr {
        id: parser.advance_id(),
        position: left.position,
        kind: ExprKind::Call(CallExpr { callee, args }),
    })
}
