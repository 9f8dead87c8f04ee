//! CIL opcode decoding.
//!
//! This module walks a method's raw instruction stream and recovers the opcode of every
//! instruction. Operand values are never interpreted: the decoder only needs the size of each
//! operand to skip it and land on the next instruction boundary.
//!
//! Two flavours are provided:
//!
//! - The lazy iterators [`decode_opcodes`] and [`decode_instructions`] stop quietly at the
//!   first byte they cannot make sense of. A truncated tail or an undefined encoding ends the
//!   sequence, everything decoded up to that point is still produced.
//! - The strict [`decode_stream`] / [`decode_instruction`] pair reports the same conditions as
//!   [`crate::Error::OutOfBounds`] and [`crate::Error::Malformed`].
//!
//! # Example: Decoding Opcodes
//!
//! ```rust
//! use opscope::disassembler::{decode_opcodes, Opcode};
//!
//! // ldarg.0, ldfld <token>, ceq, ret
//! let body = [0x02, 0x7B, 0x01, 0x00, 0x00, 0x04, 0xFE, 0x01, 0x2A];
//! let opcodes: Vec<Opcode> = decode_opcodes(&body).collect();
//!
//! assert_eq!(opcodes, [Opcode::Ldarg0, Opcode::Ldfld, Opcode::Ceq, Opcode::Ret]);
//! ```
//!
//! # Example: Strict Decoding
//!
//! ```rust
//! use opscope::disassembler::decode_stream;
//!
//! // call with only two of its four token bytes
//! let body = [0x00, 0x28, 0x01, 0x00];
//! assert!(decode_stream(&body).is_err());
//! ```

use std::iter::FusedIterator;

use crate::{
    disassembler::{Instruction, Opcode, OperandType, EXTENDED_PREFIX, SWITCH_ENTRY_SIZE},
    file::parser::Parser,
    Error::OutOfBounds,
    Result,
};

/// Reads the opcode at the parser position, consuming one or two bytes.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the stream ends inside the opcode and
/// [`crate::Error::Malformed`] if the bytes are not a defined CIL opcode.
fn read_opcode(parser: &mut Parser) -> Result<Opcode> {
    let first_byte = parser.read_le::<u8>()?;

    if first_byte == EXTENDED_PREFIX {
        let second_byte = parser.read_le::<u8>()?;
        return Opcode::from_extended_byte(second_byte)
            .ok_or_else(|| malformed_error!("Invalid opcode: FE {:02X}", second_byte));
    }

    Opcode::from_byte(first_byte)
        .ok_or_else(|| malformed_error!("Invalid opcode: {:02X}", first_byte))
}

/// Skips the inline operand of an instruction with the given operand type.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if the operand extends past the end of the stream.
fn skip_operand(parser: &mut Parser, operand_type: OperandType) -> Result<()> {
    match operand_type.fixed_size() {
        Some(size) => parser.advance_by(size),
        None => {
            let entries = parser.read_le::<u32>()? as usize;
            let table_size = entries.checked_mul(SWITCH_ENTRY_SIZE).ok_or(OutOfBounds)?;
            parser.advance_by(table_size)
        }
    }
}

/// Decodes a single CIL instruction from the current parser position.
///
/// The parser is advanced past the opcode and its operand.
///
/// # Errors
///
/// Returns an error if:
/// - The opcode or its operand is truncated ([`crate::Error::OutOfBounds`])
/// - The bytes at the parser position are not a defined opcode ([`crate::Error::Malformed`])
///
/// # Examples
///
/// ```rust
/// use opscope::{disassembler::{decode_instruction, Opcode}, Parser};
///
/// // ldstr <token>
/// let bytecode = [0x72, 0x01, 0x00, 0x00, 0x70];
/// let mut parser = Parser::new(&bytecode);
///
/// let instruction = decode_instruction(&mut parser)?;
/// assert_eq!(instruction.opcode, Opcode::Ldstr);
/// assert_eq!(instruction.size, 5);
/// # Ok::<(), opscope::Error>(())
/// ```
pub fn decode_instruction(parser: &mut Parser) -> Result<Instruction> {
    let offset = parser.pos();
    let opcode = read_opcode(parser)?;
    skip_operand(parser, opcode.operand_type())?;

    Ok(Instruction {
        offset,
        size: parser.pos() - offset,
        opcode,
    })
}

/// Decodes a complete instruction stream, failing on the first problem.
///
/// # Errors
///
/// Returns an error if any instruction is truncated or undefined, see [`decode_instruction`].
pub fn decode_stream(body: &[u8]) -> Result<Vec<Instruction>> {
    let mut parser = Parser::new(body);
    let mut instructions = Vec::new();

    while parser.has_more_data() {
        instructions.push(decode_instruction(&mut parser)?);
    }

    Ok(instructions)
}

/// Lazily decodes the instructions of a method body.
///
/// A fresh iterator over the same body always produces the same sequence.
#[must_use]
pub fn decode_instructions(body: &[u8]) -> Instructions<'_> {
    Instructions {
        parser: Parser::new(body),
        finished: false,
    }
}

/// Lazily decodes the opcodes of a method body.
///
/// This is [`decode_instructions`] without the offsets, the form the signature matcher
/// consumes.
#[must_use]
pub fn decode_opcodes(body: &[u8]) -> Opcodes<'_> {
    Opcodes {
        inner: decode_instructions(body),
    }
}

/// Iterator over the [`Instruction`]s of a body, see [`decode_instructions`].
#[derive(Clone)]
pub struct Instructions<'a> {
    parser: Parser<'a>,
    finished: bool,
}

impl Iterator for Instructions<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        if self.finished || !self.parser.has_more_data() {
            self.finished = true;
            return None;
        }

        let offset = self.parser.pos();
        let opcode = match read_opcode(&mut self.parser) {
            Ok(opcode) => opcode,
            Err(OutOfBounds) => {
                log::trace!("Opcode truncated at offset {offset:#x}, stopping");
                self.finished = true;
                return None;
            }
            Err(error) => {
                log::warn!("Undecodable instruction at offset {offset:#x}: {error}");
                self.finished = true;
                return None;
            }
        };

        // The opcode is complete, so it is produced even if its operand is cut short
        if skip_operand(&mut self.parser, opcode.operand_type()).is_err() {
            log::trace!("Operand of {opcode} at offset {offset:#x} truncated, stopping");
            self.finished = true;
            return Some(Instruction {
                offset,
                size: self.parser.len() - offset,
                opcode,
            });
        }

        Some(Instruction {
            offset,
            size: self.parser.pos() - offset,
            opcode,
        })
    }
}

impl FusedIterator for Instructions<'_> {}

/// Iterator over the [`Opcode`]s of a body, see [`decode_opcodes`].
#[derive(Clone)]
pub struct Opcodes<'a> {
    inner: Instructions<'a>,
}

impl Iterator for Opcodes<'_> {
    type Item = Opcode;

    fn next(&mut self) -> Option<Opcode> {
        self.inner.next().map(|instruction| instruction.opcode)
    }
}

impl FusedIterator for Opcodes<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn opcodes(body: &[u8]) -> Vec<Opcode> {
        decode_opcodes(body).collect()
    }

    #[test]
    fn single_byte_sequence() {
        // nop, ldarg.0, ldarg.1, add, ret
        let body = [0x00, 0x02, 0x03, 0x58, 0x2A];

        assert_eq!(
            opcodes(&body),
            [Opcode::Nop, Opcode::Ldarg0, Opcode::Ldarg1, Opcode::Add, Opcode::Ret]
        );
    }

    #[test]
    fn two_byte_opcode_is_one_instruction() {
        // ceq
        assert_eq!(opcodes(&[0xFE, 0x01]), [Opcode::Ceq]);

        // ldarg 0x0001, ret
        let instructions: Vec<_> = decode_instructions(&[0xFE, 0x09, 0x01, 0x00, 0x2A]).collect();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].opcode, Opcode::Ldarg);
        assert_eq!(instructions[0].size, 4);
        assert_eq!(instructions[1].offset, 4);
    }

    #[test]
    fn operands_are_skipped() {
        let body = [
            0x1F, 0x10, // ldc.i4.s 16
            0x20, 0x00, 0x01, 0x00, 0x00, // ldc.i4 256
            0x21, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // ldc.i8 1
            0x23, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F, // ldc.r8 1.0
            0x28, 0x2A, 0x00, 0x00, 0x0A, // call 0x0A00002A (operand holds a ret byte)
            0x2A, // ret
        ];

        assert_eq!(
            opcodes(&body),
            [
                Opcode::LdcI4S,
                Opcode::LdcI4,
                Opcode::LdcI8,
                Opcode::LdcR8,
                Opcode::Call,
                Opcode::Ret
            ]
        );
    }

    #[test]
    fn switch_table_is_skipped() {
        let body = [
            0x45, 0x02, 0x00, 0x00, 0x00, // switch, 2 targets
            0x0A, 0x00, 0x00, 0x00, // target 1
            0x2A, 0x00, 0x00, 0x00, // target 2
            0x26, // pop
        ];

        let instructions: Vec<_> = decode_instructions(&body).collect();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].opcode, Opcode::Switch);
        assert_eq!(instructions[0].size, 13);
        assert_eq!(instructions[1].opcode, Opcode::Pop);
    }

    #[test]
    fn truncated_operand_ends_sequence() {
        // nop, call with a 2 byte token
        let body = [0x00, 0x28, 0x01, 0x00];

        let instructions: Vec<_> = decode_instructions(&body).collect();
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[1].opcode, Opcode::Call);
        assert_eq!(instructions[1].next_offset(), body.len());
    }

    #[test]
    fn truncated_switch_ends_sequence() {
        // switch claiming 0x10000000 targets
        let body = [0x45, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x2A];
        assert_eq!(opcodes(&body), [Opcode::Switch]);

        // switch without a complete count
        let body = [0x00, 0x45, 0x01, 0x00];
        assert_eq!(opcodes(&body), [Opcode::Nop, Opcode::Switch]);
    }

    #[test]
    fn dangling_prefix_is_dropped() {
        assert_eq!(opcodes(&[0x2A, 0xFE]), [Opcode::Ret]);
    }

    #[test]
    fn undefined_opcode_ends_sequence() {
        assert_eq!(opcodes(&[0x00, 0x24, 0x2A]), [Opcode::Nop]);
        assert_eq!(opcodes(&[0x00, 0xFE, 0x08, 0x2A]), [Opcode::Nop]);
    }

    #[test]
    fn empty_body() {
        assert!(opcodes(&[]).is_empty());
        assert!(decode_stream(&[]).unwrap().is_empty());
    }

    #[test]
    fn decoding_is_restartable() {
        let body = [0x02, 0x7B, 0x01, 0x00, 0x00, 0x04, 0x2A];
        let first = opcodes(&body);
        let second = opcodes(&body);
        assert_eq!(first, second);

        let mut iter = decode_opcodes(&body);
        let cloned = iter.clone();
        iter.next();
        assert_eq!(cloned.count(), 3);
    }

    #[test]
    fn iterator_is_fused() {
        let mut iter = decode_opcodes(&[0x00, 0x24]);
        assert_eq!(iter.next(), Some(Opcode::Nop));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn strict_decoding() {
        let body = [0x00, 0x72, 0x01, 0x00, 0x00, 0x70, 0x2A];
        let instructions = decode_stream(&body).unwrap();
        assert_eq!(instructions.len(), 3);
        assert_eq!(instructions[2].offset, 6);

        assert!(matches!(decode_stream(&[0x00, 0x28, 0x01]), Err(Error::OutOfBounds)));
        assert!(matches!(decode_stream(&[0x2A, 0xFE]), Err(Error::OutOfBounds)));
        assert!(matches!(decode_stream(&[0xA6]), Err(Error::Malformed { .. })));
    }

    #[test]
    fn decode_instruction_two_byte() {
        // constrained. <token>
        let mut parser = Parser::new(&[0xFE, 0x16, 0x01, 0x00, 0x00, 0x1B]);

        let result = decode_instruction(&mut parser).unwrap();

        assert_eq!(result.opcode, Opcode::Constrained);
        assert_eq!(result.size, 6);
        assert!(!parser.has_more_data());
    }
}
