//! Integration tests for the instruction decoder and method header handling.

use opscope::{
    disassembler::{decode_instruction, OpcodeEncoding},
    metadata::method::MethodBody,
    prelude::*,
    Parser,
};
use strum::IntoEnumIterator;

fn opcodes(body: &[u8]) -> Vec<Opcode> {
    decode_opcodes(body).collect()
}

#[test]
fn single_byte_opcodes_decode_one_to_one() {
    let simple: Vec<Opcode> = Opcode::iter()
        .filter(|op| op.operand_type() == OperandType::None)
        .filter(|op| matches!(op.encoding(), OpcodeEncoding::Single(_)))
        .collect();
    let body: Vec<u8> = simple.iter().flat_map(|op| op.encoding().bytes()).collect();

    assert_eq!(body.len(), simple.len());
    assert_eq!(opcodes(&body), simple);
}

#[test]
fn every_opcode_survives_a_walk() {
    for opcode in Opcode::iter() {
        let mut body = opcode.encoding().bytes();
        let operand = opcode.operand_type().fixed_size().unwrap_or(4);
        body.resize(body.len() + operand, 0);
        body.push(0x2A);

        assert_eq!(opcodes(&body), [opcode, Opcode::Ret], "{opcode}");
        assert_eq!(decode_stream(&body).unwrap().len(), 2, "{opcode}");
    }
}

#[test]
fn two_byte_opcodes_are_one_opcode() {
    // ldarg.0, ldarg.1, cgt.un, ret
    assert_eq!(
        opcodes(&[0x02, 0x03, 0xFE, 0x03, 0x2A]),
        [Opcode::Ldarg0, Opcode::Ldarg1, Opcode::CgtUn, Opcode::Ret]
    );
}

#[test]
fn truncation_never_reads_past_the_end() {
    // ldarg.0, ldc.i8 with 3 of 8 operand bytes
    let body = [0x02, 0x21, 0x01, 0x02, 0x03];
    for end in 0..=body.len() {
        let instructions: Vec<Instruction> = decode_instructions(&body[..end]).collect();
        assert!(instructions.iter().all(|i| i.next_offset() <= end));
    }

    assert_eq!(opcodes(&body), [Opcode::Ldarg0, Opcode::LdcI8]);
    assert!(decode_stream(&body).is_err());
}

#[test]
fn step_through_with_parser() {
    // ldarg.0, switch (1 target), ret
    let body = [0x02, 0x45, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A];
    let mut parser = Parser::new(&body);

    let mut offsets = Vec::new();
    while parser.has_more_data() {
        let instruction = decode_instruction(&mut parser).unwrap();
        offsets.push((instruction.offset, instruction.opcode));
    }

    assert_eq!(
        offsets,
        [(0, Opcode::Ldarg0), (1, Opcode::Switch), (10, Opcode::Ret)]
    );
}

#[test]
fn fat_header_method_is_searchable() {
    let mut blob = vec![
        0x13, 0x30, // fat, init locals, header of 3 dwords
        0x02, 0x00, // max stack
        0x08, 0x00, 0x00, 0x00, // code size
        0x01, 0x00, 0x00, 0x11, // local var sig
    ];
    // ldarg.0, ldfld, stloc.0, ret
    blob.extend([0x02, 0x7B, 0x01, 0x00, 0x00, 0x04, 0x0A, 0x2A]);
    // exception section that is not code
    blob.extend([0x01, 0x0C, 0x00, 0x00]);

    let header = MethodBody::from(&blob).unwrap();
    assert!(header.is_fat);
    assert!(header.is_init_local);
    assert_eq!(header.code(&blob).len(), 8);

    let module = ModuleIndex::builder("m")
        .add_type(
            TypeBuilder::new("n", "T")
                .method_with_header("Get", 0x0006, &blob)
                .unwrap(),
        )
        .build();

    let found = find_method(
        module.candidates(),
        &[Opcode::Ldfld, Opcode::Stloc0, Opcode::Ret],
    );
    assert_eq!(found.map(|m| m.name.as_str()), Some("Get"));
}
