use tracing::{debug, instrument};

use crate::{
    ast::{
        ast::{Decl, Identifier, NodeId, Program},
        expressions::{BinaryOp, CallExpr, Expr, ExprKind, OperatorClass, UnaryOp},
        statements::{FnDecl, Stmt, StmtKind},
        types::TypeNode,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{ErrorKind, InternalError},
    },
    types::{type_table::TypeTable, types::Type},
    Position,
};

use super::type_map::TypeMap;

/// State threaded through the type-checking pass.
///
/// A node whose child already has the error type gets the error type too,
/// without a diagnostic of its own. Only nodes whose children are all
/// well typed report their own faults.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub types: &'a mut TypeTable,
    pub diagnostics: &'a mut Diagnostics,
    pub type_map: TypeMap,
    has_error: bool,
}

impl<'a> TypeChecker<'a> {
    pub fn new(types: &'a mut TypeTable, diagnostics: &'a mut Diagnostics) -> Self {
        TypeChecker {
            types,
            diagnostics,
            type_map: TypeMap::new(),
            has_error: false,
        }
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Reports a fault and hands back the error type for the offending node.
    fn report(&mut self, kind: ErrorKind, position: Position) -> Type {
        self.has_error = true;
        self.diagnostics.report(kind, position);
        self.types.produce_error()
    }

    fn record(&mut self, node: NodeId, ty: Type) -> Type {
        self.type_map.record(node, ty.clone());
        ty
    }

    fn void_or_error(&mut self, failed: bool) -> Type {
        if failed {
            self.types.produce_error()
        } else {
            self.types.void()
        }
    }
}

/// Checks every declaration of a program and returns whether it is well typed.
#[instrument(skip_all, fields(decls = program.decls.len()))]
pub fn type_check_program(
    checker: &mut TypeChecker,
    program: &Program,
) -> Result<bool, InternalError> {
    let mut failed = false;
    for decl in &program.decls {
        failed |= type_check_decl(checker, decl)?.is_error();
    }

    let ty = checker.void_or_error(failed);
    checker.record(program.id, ty);

    let well_typed = !checker.has_error();
    debug!(well_typed, "type checking finished");
    Ok(well_typed)
}

pub fn type_check_decl(checker: &mut TypeChecker, decl: &Decl) -> Result<Type, InternalError> {
    match decl {
        Decl::Var(var) => type_check_data_decl(checker, var.id, &var.type_node, &var.name),
        Decl::Fn(function) => type_check_fn_decl(checker, function),
    }
}

/// Variables and formals are typed by their annotation. Name analysis has
/// already rejected every annotation that could fail here.
fn type_check_data_decl(
    checker: &mut TypeChecker,
    id: NodeId,
    type_node: &TypeNode,
    name: &Identifier,
) -> Result<Type, InternalError> {
    let ty = checker.types.from_annotation(type_node);
    checker.record(type_node.id, ty.clone());

    let symbol_type = name.resolved_symbol()?.data_type().clone();
    checker.record(name.id, symbol_type);

    Ok(checker.record(id, ty))
}

fn type_check_fn_decl(checker: &mut TypeChecker, function: &FnDecl) -> Result<Type, InternalError> {
    let symbol = function.name.resolved_symbol()?;
    let fn_type = symbol.data_type().clone();
    let return_type = fn_type
        .as_function()
        .ok_or_else(|| InternalError::NotAFunction {
            name: function.name.name.clone(),
        })?
        .return_type()
        .clone();

    checker.record(function.name.id, fn_type.clone());
    checker.record(function.return_type.id, return_type.clone());

    let mut failed = false;
    for formal in &function.formals {
        failed |= type_check_data_decl(checker, formal.id, &formal.type_node, &formal.name)?
            .is_error();
    }
    failed |= type_check_stmts(checker, &function.body, &return_type)?;

    debug!(function = %function.name.name, ty = %fn_type, failed, "checked function");

    let ty = if failed {
        checker.types.produce_error()
    } else {
        fn_type
    };
    Ok(checker.record(function.id, ty))
}

/// Returns true if any statement failed to type check.
fn type_check_stmts(
    checker: &mut TypeChecker,
    stmts: &[Stmt],
    return_type: &Type,
) -> Result<bool, InternalError> {
    let mut failed = false;
    for stmt in stmts {
        failed |= type_check_stmt(checker, stmt, return_type)?.is_error();
    }
    Ok(failed)
}

/// Statements have type `void` when well typed and the error type otherwise.
/// `return_type` is the declared return type of the enclosing function.
pub fn type_check_stmt(
    checker: &mut TypeChecker,
    stmt: &Stmt,
    return_type: &Type,
) -> Result<Type, InternalError> {
    let failed = match &stmt.kind {
        StmtKind::VarDecl(var) => {
            type_check_data_decl(checker, var.id, &var.type_node, &var.name)?.is_error()
        }
        StmtKind::Assign(expr) | StmtKind::Call(expr) => {
            type_check_expr(checker, expr)?.is_error()
        }
        StmtKind::PostInc(expr) | StmtKind::PostDec(expr) => {
            let ty = type_check_expr(checker, expr)?;
            if ty.is_error() {
                true
            } else if !ty.is_int() {
                checker.report(ErrorKind::BadMathOperand, expr.position);
                true
            } else {
                false
            }
        }
        StmtKind::Read(expr) => {
            let ty = type_check_expr(checker, expr)?;
            let fault = if ty.is_function() {
                Some(ErrorKind::ReadFunction)
            } else if ty.is_pointer() {
                Some(ErrorKind::ReadPointer)
            } else {
                None
            };
            report_fault(checker, ty.is_error(), fault, expr.position)
        }
        StmtKind::Write(expr) => {
            let ty = type_check_expr(checker, expr)?;
            let fault = if ty.is_void() {
                Some(ErrorKind::WriteVoid)
            } else if ty.is_function() {
                Some(ErrorKind::WriteFunction)
            } else if ty.is_pointer() {
                Some(ErrorKind::WritePointer)
            } else {
                None
            };
            report_fault(checker, ty.is_error(), fault, expr.position)
        }
        StmtKind::If { condition, body } => {
            let condition = type_check_condition(checker, condition, ErrorKind::BadIfCondition)?;
            let body = type_check_stmts(checker, body, return_type)?;
            condition || body
        }
        StmtKind::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            let condition = type_check_condition(checker, condition, ErrorKind::BadIfCondition)?;
            let then_body = type_check_stmts(checker, then_body, return_type)?;
            let else_body = type_check_stmts(checker, else_body, return_type)?;
            condition || then_body || else_body
        }
        StmtKind::While { condition, body } => {
            let condition =
                type_check_condition(checker, condition, ErrorKind::BadWhileCondition)?;
            let body = type_check_stmts(checker, body, return_type)?;
            condition || body
        }
        StmtKind::Return(None) => {
            if return_type.is_void() {
                false
            } else {
                checker.report(ErrorKind::MissingReturnValue, stmt.position);
                true
            }
        }
        StmtKind::Return(Some(expr)) => type_check_return(checker, expr, return_type)?,
    };

    let ty = checker.void_or_error(failed);
    Ok(checker.record(stmt.id, ty))
}

/// Returns true if the statement failed, reporting `fault` unless the
/// operand already had the error type.
fn report_fault(
    checker: &mut TypeChecker,
    operand_failed: bool,
    fault: Option<ErrorKind>,
    position: Position,
) -> bool {
    if operand_failed {
        return true;
    }
    match fault {
        Some(kind) => {
            checker.report(kind, position);
            true
        }
        None => false,
    }
}

/// Returns true if the condition is not a well-typed `bool`. Only a
/// non-error, non-bool condition is reported.
fn type_check_condition(
    checker: &mut TypeChecker,
    condition: &Expr,
    kind: ErrorKind,
) -> Result<bool, InternalError> {
    let ty = type_check_expr(checker, condition)?;
    if ty.is_error() {
        return Ok(true);
    }
    if !ty.is_bool() {
        checker.report(kind, condition.position);
        return Ok(true);
    }
    Ok(false)
}

fn type_check_return(
    checker: &mut TypeChecker,
    expr: &Expr,
    return_type: &Type,
) -> Result<bool, InternalError> {
    let ty = type_check_expr(checker, expr)?;
    if ty.is_error() {
        return Ok(true);
    }

    if return_type.is_void() {
        checker.report(ErrorKind::ReturnValueInVoid, expr.position);
        return Ok(true);
    }
    if ty.is_void() {
        checker.report(ErrorKind::MissingReturnValue, expr.position);
        return Ok(true);
    }
    if &ty != return_type {
        checker.report(
            ErrorKind::BadReturnValue {
                expected: return_type.to_string(),
                received: ty.to_string(),
            },
            expr.position,
        );
        return Ok(true);
    }
    Ok(false)
}

pub fn type_check_expr(checker: &mut TypeChecker, expr: &Expr) -> Result<Type, InternalError> {
    let ty = match &expr.kind {
        ExprKind::Identifier(identifier) => type_check_identifier(checker, identifier)?,
        ExprKind::IntLit(_) => checker.types.int(),
        ExprKind::StrLit(_) => checker.types.string(),
        ExprKind::BoolLit(_) => checker.types.bool(),
        ExprKind::Unary { op, operand } => type_check_unary(checker, *op, operand)?,
        ExprKind::Binary { op, left, right } => {
            type_check_binary(checker, expr.position, *op, left, right)?
        }
        ExprKind::Assign { target, source } => {
            type_check_assign(checker, expr.position, target, source)?
        }
        ExprKind::Call(call) => type_check_call(checker, call)?,
    };

    Ok(checker.record(expr.id, ty))
}

fn type_check_identifier(
    checker: &mut TypeChecker,
    identifier: &Identifier,
) -> Result<Type, InternalError> {
    let ty = identifier.resolved_symbol()?.data_type().clone();
    Ok(checker.record(identifier.id, ty))
}

fn type_check_unary(
    checker: &mut TypeChecker,
    op: UnaryOp,
    operand: &Expr,
) -> Result<Type, InternalError> {
    let ty = type_check_expr(checker, operand)?;
    if ty.is_error() {
        return Ok(ty);
    }

    let result = match op {
        UnaryOp::Negate if ty.is_int() => ty,
        UnaryOp::Negate => checker.report(ErrorKind::BadMathOperand, operand.position),
        UnaryOp::Not if ty.is_bool() => ty,
        UnaryOp::Not => checker.report(ErrorKind::BadLogicOperand, operand.position),
        UnaryOp::Deref => match checker.types.produce_dereferenced(&ty) {
            Some(dereferenced) => dereferenced,
            None => checker.report(ErrorKind::BadDeref, operand.position),
        },
    };
    Ok(result)
}

fn type_check_binary(
    checker: &mut TypeChecker,
    position: Position,
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<Type, InternalError> {
    let left_type = type_check_expr(checker, left)?;
    let right_type = type_check_expr(checker, right)?;
    if left_type.is_error() || right_type.is_error() {
        return Ok(checker.types.produce_error());
    }

    let result = match op.class() {
        OperatorClass::Arithmetic => {
            if left_type.is_pointer() && right_type.is_pointer() {
                return Ok(checker.report(ErrorKind::BadMathOperator, position));
            }
            let int = checker.types.int();
            check_operands(
                checker,
                [(left, &left_type), (right, &right_type)],
                |ty| ty.is_int(),
                ErrorKind::BadMathOperand,
                int,
            )
        }
        OperatorClass::Logical => {
            let bool_type = checker.types.bool();
            check_operands(
                checker,
                [(left, &left_type), (right, &right_type)],
                |ty| ty.is_bool(),
                ErrorKind::BadLogicOperand,
                bool_type,
            )
        }
        OperatorClass::Relational => {
            let bool_type = checker.types.bool();
            check_operands(
                checker,
                [(left, &left_type), (right, &right_type)],
                |ty| ty.is_int(),
                ErrorKind::BadRelationalOperand,
                bool_type,
            )
        }
        OperatorClass::Equality => {
            let bool_type = checker.types.bool();
            let operands = check_operands(
                checker,
                [(left, &left_type), (right, &right_type)],
                |ty| !ty.is_function() && ty.as_tuple().is_none(),
                ErrorKind::BadEqualityOperand,
                bool_type,
            );
            if operands.is_error() {
                operands
            } else if left_type != right_type {
                checker.report(ErrorKind::BadEqualityOperation, position)
            } else {
                operands
            }
        }
    };
    Ok(result)
}

/// Reports `kind` at every operand whose type fails `accepts`, left to
/// right. Yields `result` when every operand is accepted.
fn check_operands(
    checker: &mut TypeChecker,
    operands: [(&Expr, &Type); 2],
    accepts: impl Fn(&Type) -> bool,
    kind: ErrorKind,
    result: Type,
) -> Type {
    let mut failed = false;
    for (operand, ty) in operands {
        if !accepts(ty) {
            checker.report(kind.clone(), operand.position);
            failed = true;
        }
    }

    if failed {
        checker.types.produce_error()
    } else {
        result
    }
}

fn type_check_assign(
    checker: &mut TypeChecker,
    position: Position,
    target: &Expr,
    source: &Expr,
) -> Result<Type, InternalError> {
    let target_type = type_check_expr(checker, target)?;
    let source_type = type_check_expr(checker, source)?;
    if target_type.is_error() || source_type.is_error() {
        return Ok(checker.types.produce_error());
    }

    let mut failed = false;
    for (side, ty) in [(target, &target_type), (source, &source_type)] {
        if ty.is_function() {
            checker.report(ErrorKind::BadAssignmentOperand, side.position);
            failed = true;
        }
    }
    if failed {
        return Ok(checker.types.produce_error());
    }

    if target_type != source_type {
        return Ok(checker.report(ErrorKind::BadAssignmentOperation, position));
    }
    Ok(target_type)
}

/// Arguments are checked first, left to right. Then the callee must be a
/// function taking exactly as many formals, and the first argument whose
/// type differs from its formal is reported.
fn type_check_call(checker: &mut TypeChecker, call: &CallExpr) -> Result<Type, InternalError> {
    let callee_type = type_check_identifier(checker, &call.callee)?;

    let mut arg_types = Vec::with_capacity(call.args.len());
    for arg in &call.args {
        arg_types.push(type_check_expr(checker, arg)?);
    }
    if arg_types.iter().any(Type::is_error) {
        return Ok(checker.types.produce_error());
    }

    let Some(function) = callee_type.as_function() else {
        return Ok(checker.report(ErrorKind::CallNonFunction, call.callee.position));
    };

    let formals = function.formal_types();
    if formals.len() != arg_types.len() {
        return Ok(checker.report(
            ErrorKind::WrongArgCount {
                expected: formals.len(),
                received: arg_types.len(),
            },
            call.callee.position,
        ));
    }

    let mismatch = call
        .args
        .iter()
        .zip(arg_types.iter().zip(formals))
        .find(|(_, (actual, formal))| actual != formal);
    if let Some((arg, (actual, formal))) = mismatch {
        let kind = ErrorKind::ArgumentTypeMismatch {
            expected: formal.to_string(),
            received: actual.to_string(),
        };
        let position = arg.position;
        return Ok(checker.report(kind, position));
    }

    Ok(function.return_type().clone())
}
