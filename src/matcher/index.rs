use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    disassembler::{decode_opcodes, Opcode},
    module::{Candidate, ModuleIndex},
};

/// The decoded opcodes of every member of a module.
///
/// Entry `i` belongs to the `i`-th candidate of [`ModuleIndex::candidates`] and is `None` for
/// members without a body. Bodies are decoded in parallel.
#[derive(Debug)]
pub struct OpcodeIndex {
    entries: Vec<Option<Arc<[Opcode]>>>,
}

impl OpcodeIndex {
    /// Decodes every body of `module`.
    ///
    /// Usually reached through [`ModuleIndex::opcode_index`], which caches the result.
    #[must_use]
    pub fn build(module: &ModuleIndex) -> Self {
        let candidates: Vec<Candidate<'_>> = module.candidates().collect();

        let entries = candidates
            .par_iter()
            .map(|candidate| {
                candidate
                    .body
                    .map(|body| decode_opcodes(body).collect::<Arc<[Opcode]>>())
            })
            .collect();

        OpcodeIndex { entries }
    }

    /// Opcodes of the candidate at `position`, `None` if it has no body or does not exist
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&[Opcode]> {
        self.entries.get(position)?.as_deref()
    }

    /// Number of entries, equal to the module's member count
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for a module without members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::TypeBuilder;

    #[test]
    fn entries_follow_candidates() {
        let module = ModuleIndex::builder("m")
            .add_type(
                TypeBuilder::new("n", "A")
                    .method("First", 0x0006, [0x02, 0x2A])
                    .abstract_method("Second", 0x0006),
            )
            .add_type(TypeBuilder::new("n", "B").constructor(0x0006, [0xFE, 0x01, 0x2A]))
            .build();

        let index = OpcodeIndex::build(&module);

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(0), Some(&[Opcode::Ldarg0, Opcode::Ret][..]));
        assert_eq!(index.get(1), None);
        assert_eq!(index.get(2), Some(&[Opcode::Ceq, Opcode::Ret][..]));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn empty_module() {
        let index = OpcodeIndex::build(&ModuleIndex::builder("m").build());
        assert!(index.is_empty());
    }
}
