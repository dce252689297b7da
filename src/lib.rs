//! Front end for lake: lexing, parsing, name analysis and type checking.

#![allow(clippy::module_inception)]

use std::fmt::{self, Display, Write};

use crate::{
    ast::ast::Program,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorTip, InternalError},
    },
    name_analysis::name_analysis::{resolve_program, NameAnalyzer},
    type_checker::{
        type_checker::{type_check_program, TypeChecker},
        type_map::TypeMap,
    },
    types::type_table::TypeTable,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod name_analysis;
pub mod parser;
pub mod symbol_table;
pub mod type_checker;
pub mod types;
pub mod unparse;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Everything the semantic passes produced for one program.
#[derive(Debug)]
pub struct SemanticAnalysis {
    /// Name analysis reported nothing.
    pub resolved: bool,
    /// Type checking ran and reported nothing.
    pub well_typed: bool,
    pub diagnostics: Diagnostics,
    pub types: TypeTable,
    /// Present only when type checking ran.
    pub type_map: Option<TypeMap>,
    pub scopes_entered: usize,
    pub scopes_left: usize,
}

impl SemanticAnalysis {
    /// True when the program passed both passes.
    pub fn succeeded(&self) -> bool {
        self.resolved && self.well_typed && !self.diagnostics.has_errors()
    }
}

/// Runs name analysis and, if it succeeds, type checking.
///
/// Identifiers in `program` are bound to their symbols as a side effect, so
/// the tree can be unparsed with type annotations afterwards.
pub fn analyze(program: &Program) -> Result<SemanticAnalysis, InternalError> {
    let mut types = TypeTable::new();
    let mut diagnostics = Diagnostics::new();

    let mut analyzer = NameAnalyzer::new(&mut types, &mut diagnostics);
    let resolved = resolve_program(&mut analyzer, program)?;
    let scopes_entered = analyzer.symbols.scopes_entered();
    let scopes_left = analyzer.symbols.scopes_left();

    let mut well_typed = false;
    let mut type_map = None;
    if resolved {
        let mut checker = TypeChecker::new(&mut types, &mut diagnostics);
        well_typed = type_check_program(&mut checker, program)?;
        type_map = Some(checker.type_map);
    }

    Ok(SemanticAnalysis {
        resolved,
        well_typed,
        diagnostics,
        types,
        type_map,
        scopes_entered,
        scopes_left,
    })
}

/// Renders an error with the offending source line and a caret under the
/// reported column.
pub fn render_error(error: &Error, source: &str, file_name: &str) -> String {
    /*
        Error: UndeclaredIdentifier
        -> test.lake
           |
        20 |     x = y;
           | --------^
    */

    let position = error.get_position();
    let line_text = source
        .lines()
        .nth(position.line.saturating_sub(1))
        .unwrap_or("");

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    if let ErrorTip::None = error.get_tip() {
        let _ = writeln!(out, "Error: {}", error.get_error_name());
    } else {
        let _ = writeln!(out, "Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    let _ = writeln!(out, "-> {}", file_name);
    let _ = writeln!(out, "{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    let _ = writeln!(out, "{} | {}", line_string, line_text_removed.trim_end());

    let arrows = position.column.saturating_sub(removed_whitespace).max(1);
    let _ = writeln!(out, "{:>padding$} {:->arrows$}", "|", "^");

    out
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.len() - string.trim_start_matches(' ').len();
    (&string[start..], start)
}
