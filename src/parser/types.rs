//! Type annotation parsing.
//!
//! An annotation is a base keyword (`int`, `bool`, `void`) followed by
//! any number of `@`, each adding one level of indirection. Like
//! expressions, annotations are parsed with NUD/LED handlers and binding
//! powers: the keyword is the NUD and `@` is a postfix LED.

use std::collections::HashMap;

use crate::{
    ast::types::TypeNode,
    errors::errors::{Error, ErrorKind},
    lexer::tokens::TokenKind,
    types::types::BaseType,
};

use super::{lookups::BindingPower, parser::Parser};

pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;
pub type TypeLEDHandler = fn(&mut Parser, TypeNode, BindingPower) -> Result<TypeNode, Error>;
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_base_type);
    parser.type_nud(TokenKind::Bool, parse_base_type);
    parser.type_nud(TokenKind::Void, parse_base_type);
    parser.type_led(TokenKind::At, BindingPower::Call, parse_pointer_type);
}

pub fn parse_base_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token = parser.advance();
    let base = match token.kind {
        TokenKind::Int => BaseType::Int,
        TokenKind::Bool => BaseType::Bool,
        TokenKind::Void => BaseType::Void,
        _ => {
            return Err(Error::new(
                ErrorKind::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(TypeNode {
        id: parser.advance_id(),
        position: token.span.start,
        base,
        depth: 0,
    })
}

pub fn parse_pointer_type(
    parser: &mut Parser,
    left: TypeNode,
    _bp: BindingPower,
) -> Result<TypeNode, Error> {
    parser.expect(TokenKind::At)?;

    Ok(TypeNode {
        depth: left.depth + 1,
        ..left
    })
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeNode, Error> {
    let token_kind = parser.current_token_kind();
    let nud = match parser.type_tables().nud.get(&token_kind) {
        Some(handler) => *handler,
        None => return Err(parser.unexpected("expected a type (`int`, `bool` or `void`)")),
    };

    let mut left = nud(parser)?;

    // Each trailing `@` wraps what has been parsed so far
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .type_tables()
            .bp
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let led = match parser.type_tables().led.get(&token_kind) {
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
