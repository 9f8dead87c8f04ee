//! Shared fixtures for unit tests.

use crate::{
    disassembler::{Opcode, OperandType, SWITCH_ENTRY_SIZE},
    metadata::{
        method::{MethodAccessFlags, MethodModifiers},
        token::Token,
    },
    module::{MemberIdentity, MemberKind},
};

/// Encodes `opcodes` into an instruction stream with zeroed operands.
///
/// `switch` gets an empty jump table.
pub fn assemble(opcodes: &[Opcode]) -> Vec<u8> {
    let mut body = Vec::new();
    for opcode in opcodes {
        body.extend(opcode.encoding().bytes());
        let operand_size = match opcode.operand_type() {
            OperandType::Switch => SWITCH_ENTRY_SIZE,
            other => other.fixed_size().unwrap_or(0),
        };
        body.resize(body.len() + operand_size, 0);
    }
    body
}

/// A public instance member of `test.Fixture`
pub fn identity(name: &str, kind: MemberKind) -> MemberIdentity {
    MemberIdentity {
        type_token: Token::type_def(2),
        type_name: "test.Fixture".to_string(),
        token: Token::method_def(1),
        name: name.to_string(),
        kind,
        flags_access: MethodAccessFlags::PUBLIC,
        flags_modifiers: MethodModifiers::HIDE_BY_SIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disassembler::decode_opcodes;

    #[test]
    fn assemble_roundtrip() {
        let opcodes = [
            Opcode::Ldarg0,
            Opcode::Ldfld,
            Opcode::Switch,
            Opcode::Ceq,
            Opcode::LdcI8,
            Opcode::Ret,
        ];
        let body = assemble(&opcodes);

        assert_eq!(body.len(), 1 + 5 + 5 + 2 + 9 + 1);
        assert_eq!(decode_opcodes(&body).collect::<Vec<_>>(), opcodes);
    }
}
