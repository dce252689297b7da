/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the tree the parser builds
///
/// Submodules:
/// - ast: Node ids, the program root, declarations and identifiers
/// - expressions: Expression nodes and operators
/// - statements: Statement and declaration nodes
/// - types: Syntactic type annotations
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
