use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A user-facing fault in the analyzed program, tied to a source position.
///
/// Displays as `line,column: message`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{position}: {kind}")]
pub struct Error {
    kind: ErrorKind,
    position: Position,
}

impl Error {
    pub fn new(kind: ErrorKind, position: Position) -> Self {
        Error { kind, position }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn get_position(&self) -> Position {
        self.position
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            ErrorKind::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorKind::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorKind::NumberParseError { .. } => "NumberParseError",
            ErrorKind::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorKind::MultiplyDeclared { .. } => "MultiplyDeclared",
            ErrorKind::InvalidPointerType => "InvalidPointerType",
            ErrorKind::NonFunctionDeclaredVoid => "NonFunctionDeclaredVoid",
            ErrorKind::BadMathOperand => "BadMathOperand",
            ErrorKind::BadMathOperator => "BadMathOperator",
            ErrorKind::BadLogicOperand => "BadLogicOperand",
            ErrorKind::BadRelationalOperand => "BadRelationalOperand",
            ErrorKind::BadEqualityOperand => "BadEqualityOperand",
            ErrorKind::BadEqualityOperation => "BadEqualityOperation",
            ErrorKind::BadAssignmentOperand => "BadAssignmentOperand",
            ErrorKind::BadAssignmentOperation => "BadAssignmentOperation",
            ErrorKind::BadDeref => "BadDeref",
            ErrorKind::ReadFunction => "ReadFunction",
            ErrorKind::ReadPointer => "ReadPointer",
            ErrorKind::WriteVoid => "WriteVoid",
            ErrorKind::WriteFunction => "WriteFunction",
            ErrorKind::WritePointer => "WritePointer",
            ErrorKind::BadIfCondition => "BadIfCondition",
            ErrorKind::BadWhileCondition => "BadWhileCondition",
            ErrorKind::CallNonFunction => "CallNonFunction",
            ErrorKind::WrongArgCount { .. } => "WrongArgCount",
            ErrorKind::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorKind::MissingReturnValue => "MissingReturnValue",
            ErrorKind::ReturnValueInVoid => "ReturnValueInVoid",
            ErrorKind::BadReturnValue { .. } => "BadReturnValue",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            ErrorKind::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot appear here; check the previous statement for a missing `;`",
                token
            )),
            ErrorKind::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("found `{}`: {}", token, message))
            }
            ErrorKind::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in a 64-bit integer",
                token
            )),
            ErrorKind::UndeclaredIdentifier { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in any enclosing scope", name))
            }
            ErrorKind::MultiplyDeclared { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorKind::InvalidPointerType => {
                ErrorTip::Suggestion(String::from("`void` cannot be pointed to"))
            }
            ErrorKind::NonFunctionDeclaredVoid => {
                ErrorTip::Suggestion(String::from("only functions may be declared `void`"))
            }
            ErrorKind::BadMathOperator => ErrorTip::Suggestion(String::from(
                "arithmetic between two pointers is not allowed",
            )),
            ErrorKind::WrongArgCount { expected, received } => ErrorTip::Suggestion(format!(
                "the function takes {} argument(s) but {} were supplied",
                expected, received
            )),
            ErrorKind::ArgumentTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "the formal is `{}` but the actual is `{}`",
                    expected, received
                ))
            }
            ErrorKind::BadReturnValue { expected, received } => ErrorTip::Suggestion(format!(
                "the function returns `{}` but the value is `{}`",
                expected, received
            )),
            ErrorKind::ReadPointer | ErrorKind::WritePointer => {
                ErrorTip::Suggestion(String::from("dereference the pointer first"))
            }
            _ => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// Every fault the front end reports to the user.
///
/// Syntax faults abort parsing. Resolution and type faults are collected in
/// a `Diagnostics` sink and the passes keep going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    #[error("Undeclared identifier")]
    UndeclaredIdentifier { name: String },
    #[error("Multiply declared identifier")]
    MultiplyDeclared { name: String },
    #[error("Invalid pointer type")]
    InvalidPointerType,
    #[error("Non-function declared void")]
    NonFunctionDeclaredVoid,

    #[error("Arithmetic operator applied to invalid operand")]
    BadMathOperand,
    #[error("Arithmetic operator applied to incompatible operands")]
    BadMathOperator,
    #[error("Logical operator applied to non-bool operand")]
    BadLogicOperand,
    #[error("Relational operator applied to non-numeric operand")]
    BadRelationalOperand,
    #[error("Invalid equality operand")]
    BadEqualityOperand,
    #[error("Invalid equality operation")]
    BadEqualityOperation,
    #[error("Invalid assignment operand")]
    BadAssignmentOperand,
    #[error("Invalid assignment operation")]
    BadAssignmentOperation,
    #[error("Invalid operand for deref")]
    BadDeref,
    #[error("Attempt to read a function")]
    ReadFunction,
    #[error("Attempt to read a raw pointer")]
    ReadPointer,
    #[error("Attempt to write void")]
    WriteVoid,
    #[error("Attempt to write a function")]
    WriteFunction,
    #[error("Attempt to write a raw pointer")]
    WritePointer,
    #[error("Non-bool expression used as an if condition")]
    BadIfCondition,
    #[error("Non-bool expression used as a while condition")]
    BadWhileCondition,
    #[error("Attempt to call a non-function")]
    CallNonFunction,
    #[error("Function call with wrong number of args")]
    WrongArgCount { expected: usize, received: usize },
    #[error("Type of actual does not match type of formal")]
    ArgumentTypeMismatch { expected: String, received: String },
    #[error("Missing return value")]
    MissingReturnValue,
    #[error("Return with a value in void function")]
    ReturnValueInVoid,
    #[error("Bad return value")]
    BadReturnValue { expected: String, received: String },
}

/// A broken precondition inside the analyzer itself.
///
/// These are never reported as diagnostics; they abort the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("no scope is open")]
    EmptyScopeChain,
    #[error("scope #{serial} is no longer open")]
    ScopeNotOpen { serial: usize },
    #[error("identifier {name:?} reached type checking without a symbol")]
    UnresolvedIdentifier { name: String },
    #[error("identifier {name:?} already has a symbol attached")]
    SymbolAlreadyAttached { name: String },
    #[error("node {node} has no recorded type")]
    NodeNotTyped { node: usize },
    #[error("{name:?} is not bound to a function type")]
    NotAFunction { name: String },
}
