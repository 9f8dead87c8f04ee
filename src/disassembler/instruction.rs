//! Decoded instruction records and operand classification.

use crate::disassembler::Opcode;

/// Size in bytes of one entry in a `switch` jump table, and of its leading entry count.
pub const SWITCH_ENTRY_SIZE: usize = 4;

/// Classifies the inline operand data that follows an opcode in the instruction stream.
///
/// Only the size of an operand matters for decoding opcodes: the decoder skips operand bytes
/// to stay aligned on instruction boundaries and never interprets their value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OperandType {
    /// No operand
    None,
    /// Signed 8-bit immediate or short branch offset
    Int8,
    /// Unsigned 8-bit argument/local index or alignment
    UInt8,
    /// Unsigned 16-bit argument/local index
    UInt16,
    /// Signed 32-bit immediate or long branch offset
    Int32,
    /// Signed 64-bit immediate
    Int64,
    /// 32-bit floating point immediate
    Float32,
    /// 64-bit floating point immediate
    Float64,
    /// 32-bit metadata token
    Token,
    /// Jump table: a 4-byte entry count N followed by N 4-byte branch offsets
    Switch,
}

impl OperandType {
    /// Returns the number of operand bytes for fixed-size operands.
    ///
    /// Returns `None` for [`OperandType::Switch`], whose size depends on the entry count
    /// stored in the instruction stream.
    #[must_use]
    pub const fn fixed_size(self) -> Option<usize> {
        match self {
            OperandType::None => Some(0),
            OperandType::Int8 | OperandType::UInt8 => Some(1),
            OperandType::UInt16 => Some(2),
            OperandType::Int32 | OperandType::Float32 | OperandType::Token => Some(4),
            OperandType::Int64 | OperandType::Float64 => Some(8),
            OperandType::Switch => None,
        }
    }
}

/// One decoded instruction: where it starts, how many bytes it occupies, and its opcode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Instruction {
    /// Offset of the first opcode byte, relative to the start of the body
    pub offset: usize,
    /// Encoded size including the opcode bytes and all operand bytes
    pub size: usize,
    /// The decoded opcode
    pub opcode: Opcode,
}

impl Instruction {
    /// Offset of the next instruction in the stream.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.offset + self.size
    }
}
