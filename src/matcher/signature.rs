use std::{fmt, str::FromStr, sync::Arc};

use crate::{disassembler::Opcode, Error, Result};

/// An ordered, non-empty sequence of opcodes that identifies a method by its code.
///
/// Signatures are immutable and cheap to clone.
///
/// # Examples
///
/// ```rust
/// use opscope::{disassembler::Opcode, matcher::Signature};
///
/// let parsed = Signature::parse("ldarg.0, ldfld, brtrue.s")?;
/// let built = Signature::new(&[Opcode::Ldarg0, Opcode::Ldfld, Opcode::BrtrueS])?;
///
/// assert_eq!(parsed, built);
/// assert_eq!(parsed.to_string(), "ldarg.0 ldfld brtrue.s");
/// # Ok::<(), opscope::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    opcodes: Arc<[Opcode]>,
}

impl Signature {
    /// Creates a signature from a sequence of opcodes.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] if `opcodes` is empty.
    pub fn new(opcodes: &[Opcode]) -> Result<Self> {
        if opcodes.is_empty() {
            return Err(Error::Empty);
        }

        Ok(Signature {
            opcodes: Arc::from(opcodes),
        })
    }

    /// Parses a signature from mnemonics separated by whitespace and/or commas.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMnemonic`] for a name that is not a CIL opcode and
    /// [`Error::Empty`] if `text` contains no mnemonic at all.
    pub fn parse(text: &str) -> Result<Self> {
        let opcodes = text
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<Opcode>()
                    .map_err(|_| Error::InvalidMnemonic(token.to_string()))
            })
            .collect::<Result<Vec<Opcode>>>()?;

        Signature::new(&opcodes)
    }

    /// The opcodes of this signature
    #[must_use]
    pub fn as_slice(&self) -> &[Opcode] {
        &self.opcodes
    }

    /// Number of opcodes, never 0
    #[must_use]
    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    /// Always `false`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}

impl AsRef<[Opcode]> for Signature {
    fn as_ref(&self) -> &[Opcode] {
        &self.opcodes
    }
}

impl TryFrom<&[Opcode]> for Signature {
    type Error = Error;

    fn try_from(opcodes: &[Opcode]) -> Result<Self> {
        Signature::new(opcodes)
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Signature::parse(text)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, opcode) in self.opcodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(opcode.mnemonic())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(Signature::new(&[]), Err(Error::Empty)));
        assert!(matches!(Signature::parse(""), Err(Error::Empty)));
        assert!(matches!(Signature::parse(" , \n"), Err(Error::Empty)));
    }

    #[test]
    fn parse_separators() {
        let signature: Signature = "neg stloc.0,ldarg.0 ,\tisinst".parse().unwrap();
        assert_eq!(
            signature.as_slice(),
            [Opcode::Neg, Opcode::Stloc0, Opcode::Ldarg0, Opcode::Isinst]
        );
        assert_eq!(signature.len(), 4);
        assert!(!signature.is_empty());
    }

    #[test]
    fn parse_extended_and_prefixes() {
        let signature = Signature::parse("constrained. callvirt ceq").unwrap();
        assert_eq!(
            signature.as_slice(),
            [Opcode::Constrained, Opcode::Callvirt, Opcode::Ceq]
        );
        assert_eq!(signature.to_string(), "constrained. callvirt ceq");
    }

    #[test]
    fn parse_unknown_mnemonic() {
        match Signature::parse("ldarg.0 ldarg.9") {
            Err(Error::InvalidMnemonic(name)) => assert_eq!(name, "ldarg.9"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn debug_format() {
        let signature = Signature::new(&[Opcode::Ldnull, Opcode::Ret]).unwrap();
        assert_eq!(format!("{signature:?}"), "Signature(ldnull ret)");
    }
}
