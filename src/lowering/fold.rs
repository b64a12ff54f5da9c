use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::bytecode::Value;

/// Fold a constant initialiser to a runtime value. Handles literals, unary
/// minus over numeric literals and `+ - * / %` over int and float with
/// promotion; `+` over two strings concatenates. Anything else is not a
/// compile-time constant.
///
/// Division or modulo by zero folds to `null` rather than trapping.
pub fn fold_constant(expr: &Expression) -> Option<Value> {
    match expr {
        Expression::Int(literal) => Some(Value::Int(literal.value)),
        Expression::Float(literal) => Some(Value::Float(literal.value)),
        Expression::String(literal) => Some(Value::Str(literal.value.clone())),
        Expression::Bool(literal) => Some(Value::Bool(literal.value)),
        Expression::Null(_) => Some(Value::Null),
        Expression::Unary(unary) => match unary.operator {
            UnaryOperator::Negate => match fold_constant(&unary.operand)? {
                Value::Int(v) => Some(Value::Int(-v)),
                Value::Float(v) => Some(Value::Float(-v)),
                _ => None,
            },
            UnaryOperator::Plus => {
                let value = fold_constant(&unary.operand)?;
                matches!(value, Value::Int(_) | Value::Float(_)).then_some(value)
            }
            _ => None,
        },
        Expression::Binary(binary) => {
            let left = fold_constant(&binary.left)?;
            let right = fold_constant(&binary.right)?;
            fold_binary(&left, binary.operator, &right)
        }
        _ => None,
    }
}

fn fold_binary(left: &Value, operator: BinaryOperator, right: &Value) -> Option<Value> {
    if let (Value::Str(a), BinaryOperator::Add, Value::Str(b)) = (left, operator, right) {
        return Some(Value::Str(format!("{a}{b}")));
    }

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => fold_int(*a, operator, *b),
        (Value::Float(a), Value::Float(b)) => fold_float(*a, operator, *b),
        // int promotes to float when the sides are mixed
        (Value::Int(a), Value::Float(b)) => fold_float(*a as f64, operator, *b),
        (Value::Float(a), Value::Int(b)) => fold_float(*a, operator, *b as f64),
        _ => None,
    }
}

fn fold_int(a: i64, operator: BinaryOperator, b: i64) -> Option<Value> {
    Some(match operator {
        BinaryOperator::Add => Value::Int(a.wrapping_add(b)),
        BinaryOperator::Subtract => Value::Int(a.wrapping_sub(b)),
        BinaryOperator::Multiply => Value::Int(a.wrapping_mul(b)),
        BinaryOperator::Divide => {
            if b == 0 {
                Value::Null
            } else {
                Value::Int(a.wrapping_div(b))
            }
        }
        BinaryOperator::Modulo => {
            if b == 0 {
                Value::Null
            } else {
                Value::Int(a.wrapping_rem(b))
            }
        }
        _ => return None,
    })
}

fn fold_float(a: f64, operator: BinaryOperator, b: f64) -> Option<Value> {
    Some(match operator {
        BinaryOperator::Add => Value::Float(a + b),
        BinaryOperator::Subtract => Value::Float(a - b),
        BinaryOperator::Multiply => Value::Float(a * b),
        BinaryOperator::Divide => {
            if b == 0.0 {
                Value::Null
            } else {
                Value::Float(a / b)
            }
        }
        BinaryOperator::Modulo => {
            if b == 0.0 {
                Value::Null
            } else {
                Value::Float(a % b)
            }
        }
        _ => return None,
    })
}
