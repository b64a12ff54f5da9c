//! Bytecode object model produced by class lowering. The virtual machine
//! executing these chunks lives outside this crate; only the shapes and the
//! emit operations the lowerer needs are defined here.

mod class;

pub use self::class::*;

use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum OpCode {
    Constant = 0,
    LoadLocal = 1,
    Pop = 2,
    Return = 3,
    ReturnNull = 4,
    CheckType = 5,
    GetProperty = 6,
    Add = 7,
    Subtract = 8,
    Multiply = 9,
    Divide = 10,
    Modulo = 11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Protected => f.write_str("protected"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// Executable unit: raw opcode stream plus its constant pool.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chunk {
    code: Vec<u8>,
    constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Chunk {
        Chunk::default()
    }

    pub fn emit(&mut self, op: OpCode) {
        self.code.push(op as u8);
    }

    pub fn emit_u16(&mut self, op: OpCode, arg: u16) {
        self.code.push(op as u8);
        self.code.extend_from_slice(&arg.to_be_bytes());
    }

    pub fn make_constant(&mut self, value: Value) -> u16 {
        if let Some(existing) = self.constants.iter().position(|c| *c == value) {
            return existing as u16;
        }
        self.constants.push(value);
        (self.constants.len() - 1) as u16
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn constants(&self) -> &[Value] {
        &self.constants
    }

    /// Opcode byte of the last instruction, accounting for the u16 operand
    /// of the argument-carrying instructions.
    pub fn last_op(&self) -> Option<OpCode> {
        let mut i = 0;
        let mut last = None;
        while i < self.code.len() {
            let op = match self.code[i] {
                0 => OpCode::Constant,
                1 => OpCode::LoadLocal,
                2 => OpCode::Pop,
                3 => OpCode::Return,
                4 => OpCode::ReturnNull,
                5 => OpCode::CheckType,
                6 => OpCode::GetProperty,
                7 => OpCode::Add,
                8 => OpCode::Subtract,
                9 => OpCode::Multiply,
                10 => OpCode::Divide,
                11 => OpCode::Modulo,
                _ => return None,
            };
            last = Some(op);
            i += match op {
                OpCode::Constant
                | OpCode::LoadLocal
                | OpCode::CheckType
                | OpCode::GetProperty => 3,
                _ => 1,
            };
        }
        last
    }
}

/// Everything lowering a file produces: classes, enums and free functions.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Program {
    pub classes: BTreeMap<String, CompiledClass>,
    pub enums: BTreeMap<String, CompiledEnum>,
    pub functions: BTreeMap<String, CompiledMethod>,
}
