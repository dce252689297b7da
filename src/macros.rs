//! Token construction shorthands for the lexer's pattern table.

/// Builds a `Token` from a kind, its text and its span.
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// A pattern handler for operators and punctuation whose text never varies.
///
/// ```ignore
/// handler: MK_DEFAULT_HANDLER!(TokenKind::At, "@")
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _matched: &str| {
            let start = lexer.position();
            lexer.advance_n($value);
            let end = lexer.position();
            lexer.push(MK_TOKEN!($kind, String::from($value), Span { start, end }));
        }
    };
}
