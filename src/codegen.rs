//! Minimal body emitter. The full expression code generator is an external
//! collaborator of this crate; the slice implemented here covers what class
//! lowering itself needs to fill method chunks: constants, local loads,
//! `this`, property reads, simple arithmetic, casts and returns. Everything
//! else lowers to a `null` placeholder the real generator replaces.

use crate::ast::{BinaryOperator, Expression, Statement};
use crate::bytecode::{Chunk, OpCode, Value};
use crate::lowering::fold_constant;

pub fn emit_statements(chunk: &mut Chunk, locals: &[String], statements: &[Statement]) {
    for statement in statements {
        emit_statement(chunk, locals, statement);
    }
}

pub fn emit_statement(chunk: &mut Chunk, locals: &[String], statement: &Statement) {
    match statement {
        Statement::Block(block) => emit_statements(chunk, locals, &block.statements),
        Statement::Expression(stmt) => {
            emit_expression(chunk, locals, &stmt.expression);
            chunk.emit(OpCode::Pop);
        }
        Statement::Echo(echo) => {
            for value in &echo.values {
                emit_expression(chunk, locals, value);
                chunk.emit(OpCode::Pop);
            }
        }
        Statement::Return(ret) => {
            if ret.values.is_empty() {
                chunk.emit(OpCode::ReturnNull);
            } else {
                for value in &ret.values {
                    emit_expression(chunk, locals, value);
                }
                chunk.emit(OpCode::Return);
            }
        }
        // control flow is the external generator's concern
        _ => {}
    }
}

pub fn emit_expression(chunk: &mut Chunk, locals: &[String], expr: &Expression) {
    if let Some(value) = fold_constant(expr) {
        let index = chunk.make_constant(value);
        chunk.emit_u16(OpCode::Constant, index);
        return;
    }

    match expr {
        Expression::This(_) => chunk.emit_u16(OpCode::LoadLocal, 0),
        Expression::Variable(variable) => {
            match locals.iter().position(|l| *l == variable.name) {
                Some(slot) => chunk.emit_u16(OpCode::LoadLocal, slot as u16),
                None => emit_null(chunk),
            }
        }
        Expression::PropertyAccess(access) => {
            emit_expression(chunk, locals, &access.object);
            let name = chunk.make_constant(Value::Str(access.property.clone()));
            chunk.emit_u16(OpCode::GetProperty, name);
        }
        Expression::Binary(binary) => {
            let op = match binary.operator {
                BinaryOperator::Add => Some(OpCode::Add),
                BinaryOperator::Subtract => Some(OpCode::Subtract),
                BinaryOperator::Multiply => Some(OpCode::Multiply),
                BinaryOperator::Divide => Some(OpCode::Divide),
                BinaryOperator::Modulo => Some(OpCode::Modulo),
                _ => None,
            };
            match op {
                Some(op) => {
                    emit_expression(chunk, locals, &binary.left);
                    emit_expression(chunk, locals, &binary.right);
                    chunk.emit(op);
                }
                None => emit_null(chunk),
            }
        }
        Expression::Cast(cast) => {
            emit_expression(chunk, locals, &cast.expr);
            let ty = crate::typechecker::Type::from(&cast.ty);
            let name = chunk.make_constant(Value::Str(ty.to_string()));
            chunk.emit_u16(OpCode::CheckType, name);
        }
        _ => emit_null(chunk),
    }
}

fn emit_null(chunk: &mut Chunk) {
    let index = chunk.make_constant(Value::Null);
    chunk.emit_u16(OpCode::Constant, index);
}
