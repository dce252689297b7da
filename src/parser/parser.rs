//! The `Parser` cursor and the `parse` entry point.
//!
//! Expressions are parsed Pratt style: each token kind maps to a prefix
//! (NUD) or infix (LED) handler plus a binding power. Statements dispatch
//! on their first token through a third table, and type annotations get a
//! small NUD/LED table set of their own.

use tracing::debug;

use crate::{
    ast::ast::{NodeId, Program},
    errors::errors::{Error, ErrorKind},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_decl,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// Expression and statement dispatch, keyed by the token that starts or
/// continues a construct.
#[derive(Default)]
pub struct ExprTables {
    pub stmt: StmtLookup,
    pub nud: NUDLookup,
    pub led: LEDLookup,
    pub bp: BPLookup,
}

/// Dispatch for type annotations.
#[derive(Default)]
pub struct TypeTables {
    pub nud: TypeNUDLookup,
    pub led: TypeLEDLookup,
    pub bp: TypeBPLookup,
}

/// Cursor over a token stream plus the dispatch tables and the node id
/// counter.
pub struct Parser {
    /// Always terminated by `EOF`.
    tokens: Vec<Token>,
    pos: usize,
    exprs: ExprTables,
    types: TypeTables,
    next_id: usize,
}

impl Parser {
    /// Appends an `EOF` token when the stream lacks one, so the cursor
    /// always has something to look at.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or(Position::new(1, 1));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: end, end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            exprs: ExprTables::default(),
            types: TypeTables::default(),
            next_id: 0,
        }
    }

    /// Past the end this keeps returning the trailing `EOF`.
    pub fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Moves past the current token and hands it back.
    pub fn advance(&mut self) -> Token {
        let consumed = self.current_token().clone();
        self.pos += 1;
        consumed
    }

    /// Consumes a token of kind `kind`, failing with `error` (or a plain
    /// `UnexpectedToken`) when the current token differs.
    pub fn expect_error(&mut self, kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        if self.current_token_kind() == kind {
            return Ok(self.advance());
        }

        Err(error.unwrap_or_else(|| {
            let found = self.current_token();
            Error::new(
                ErrorKind::UnexpectedToken {
                    token: found.value.clone(),
                },
                found.span.start,
            )
        }))
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(kind, None)
    }

    /// An `UnexpectedTokenDetailed` error at the current token.
    pub fn unexpected(&self, message: &str) -> Error {
        let found = self.current_token();
        Error::new(
            ErrorKind::UnexpectedTokenDetailed {
                token: found.value.clone(),
                message: String::from(message),
            },
            found.span.start,
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn exprs(&self) -> &ExprTables {
        &self.exprs
    }

    pub fn type_tables(&self) -> &TypeTables {
        &self.types
    }

    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: LEDHandler) {
        self.exprs.bp.insert(kind, binding_power);
        self.exprs.led.insert(kind, handler);
    }

    /// Tokens that are both prefix and infix operators (`-`, `*`) keep the
    /// binding power their LED registered.
    pub fn nud(&mut self, kind: TokenKind, handler: NUDHandler) {
        self.exprs.bp.entry(kind).or_insert(BindingPower::Primary);
        self.exprs.nud.insert(kind, handler);
    }

    pub fn stmt(&mut self, kind: TokenKind, handler: StmtHandler) {
        self.exprs.stmt.insert(kind, handler);
    }

    pub fn type_led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: TypeLEDHandler) {
        self.types.bp.insert(kind, binding_power);
        self.types.led.insert(kind, handler);
    }

    pub fn type_nud(&mut self, kind: TokenKind, handler: TypeNUDHandler) {
        self.types.bp.insert(kind, BindingPower::Primary);
        self.types.nud.insert(kind, handler);
    }

    /// Hands out the next unused node id.
    pub fn advance_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn node_count(&self) -> usize {
        self.next_id
    }

    /// Start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }
}

/// Parses a token stream into a program. The first syntax error aborts
/// parsing and is returned.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let id = parser.advance_id();
    let position = parser.get_position();

    let mut decls = vec![];
    while parser.has_tokens() {
        decls.push(parse_decl(&mut parser)?);
    }

    debug!(decls = decls.len(), nodes = parser.node_count(), "parsed program");
    Ok(Program {
        id,
        position,
        decls,
    })
}
