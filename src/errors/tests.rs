//! Error kinds, their tips, and the diagnostics collector.

use pretty_assertions::assert_eq;

use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorKind, ErrorTip, InternalError};
use crate::Position;

#[test]
fn test_new_error_keeps_kind_and_position() {
    let error = Error::new(
        ErrorKind::UnrecognisedToken {
            token: "$".to_string(),
        },
        Position::new(1, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position(), Position::new(1, 10));
}

#[test]
fn test_error_display_format() {
    let error = Error::new(
        ErrorKind::UndeclaredIdentifier {
            name: "y".to_string(),
        },
        Position::new(4, 7),
    );

    assert_eq!(error.to_string(), "4,7: Undeclared identifier");
}

#[test]
fn test_type_error_messages() {
    let cases = [
        (ErrorKind::BadMathOperand, "Arithmetic operator applied to invalid operand"),
        (ErrorKind::BadMathOperator, "Arithmetic operator applied to incompatible operands"),
        (ErrorKind::BadLogicOperand, "Logical operator applied to non-bool operand"),
        (ErrorKind::BadEqualityOperation, "Invalid equality operation"),
        (ErrorKind::BadAssignmentOperation, "Invalid assignment operation"),
        (ErrorKind::WritePointer, "Attempt to write a raw pointer"),
        (ErrorKind::BadWhileCondition, "Non-bool expression used as a while condition"),
        (ErrorKind::MissingReturnValue, "Missing return value"),
        (ErrorKind::ReturnValueInVoid, "Return with a value in void function"),
    ];

    for (kind, message) in cases {
        assert_eq!(kind.to_string(), message);
    }
}

#[test]
fn test_wrong_arg_count_keeps_fixed_message() {
    let error = Error::new(
        ErrorKind::WrongArgCount {
            expected: 2,
            received: 3,
        },
        Position::new(2, 1),
    );

    assert_eq!(error.to_string(), "2,1: Function call with wrong number of args");
    assert_eq!(error.get_tip().to_string(), "the function takes 2 argument(s) but 3 were supplied");
}

#[test]
fn test_semantic_errors_without_tip() {
    let error = Error::new(
        ErrorKind::UnrecognisedToken {
            token: "$".to_string(),
        },
        Position::new(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_unexpected_token_suggests_fix() {
    let error = Error::new(
        ErrorKind::UnexpectedToken {
            token: "}".to_string(),
        },
        Position::new(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_tip_renders_as_plain_text() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostics_keep_report_order() {
    let mut diagnostics = Diagnostics::new();
    assert!(!diagnostics.has_errors());

    diagnostics.report(ErrorKind::WriteVoid, Position::new(3, 4));
    diagnostics.report(ErrorKind::BadIfCondition, Position::new(1, 5));

    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics.messages(),
        vec![
            "3,4: Attempt to write void".to_string(),
            "1,5: Non-bool expression used as an if condition".to_string(),
        ]
    );
    assert_eq!(
        diagnostics.to_string(),
        "3,4: Attempt to write void\n1,5: Non-bool expression used as an if condition\n"
    );
}

#[test]
fn test_internal_error_display() {
    let error = InternalError::UnresolvedIdentifier {
        name: "x".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "identifier \"x\" reached type checking without a symbol"
    );
}
