//! CIL (Common Intermediate Language) opcode decoding.
//!
//! This module turns a method's raw instruction stream into the sequence of opcodes it is made
//! of. It knows every instruction defined by ECMA-335, how each one is encoded and how many
//! operand bytes follow it, which is all that is needed to walk a stream instruction by
//! instruction.
//!
//! # Key Types
//! - [`Opcode`] - A CIL instruction identifier
//! - [`OperandType`] - The kind and size of the inline operand that follows an opcode
//! - [`Instruction`] - One decoded instruction with its offset and size
//!
//! # Main Functions
//! - [`decode_opcodes`] - Lazily decode the opcodes of a body
//! - [`decode_instructions`] - Lazily decode the instructions of a body
//! - [`decode_stream`] - Strictly decode a full body
//!
//! # Example
//! ```rust
//! use opscope::disassembler::{decode_opcodes, Opcode};
//!
//! let bytecode = &[0x00, 0x2A]; // nop, ret
//! assert_eq!(decode_opcodes(bytecode).collect::<Vec<_>>(), [Opcode::Nop, Opcode::Ret]);
//! ```

mod decoder;
mod instruction;
mod instructions;

pub use decoder::{
    decode_instruction, decode_instructions, decode_opcodes, decode_stream, Instructions, Opcodes,
};
pub use instruction::{Instruction, OperandType, SWITCH_ENTRY_SIZE};
pub use instructions::{Opcode, OpcodeEncoding, EXTENDED_PREFIX};
