//! Finding a member of a module by the opcodes of its body.
//!
//! A [`Signature`] is an ordered list of opcodes. A member matches when its decoded body
//! contains the signature as a contiguous run. Members are scanned in the order their
//! module enumerates them and the first match wins; later matches are never looked at.
//!
//! # Key Types
//! - [`Signature`] - The opcode pattern to search for
//! - [`SignatureMatcher`] - Searches one [`crate::module::ModuleIndex`], implements [`Resolver`]
//! - [`MatchConfig`] / [`MatchStrategy`] - How the search is performed
//!
//! # Main Functions
//! - [`find_method`] / [`find_constructor`] - Search any sequence of candidates
//! - [`contains_run`] - Search a single decoded body
//!
//! # Example
//!
//! ```rust
//! use opscope::{
//!     disassembler::Opcode,
//!     matcher::find_method,
//!     module::{ModuleIndex, TypeBuilder},
//! };
//!
//! let module = ModuleIndex::builder("osu!")
//!     .add_type(
//!         TypeBuilder::new("osu", "Player")
//!             .method("Load", 0x0006, [0x02, 0x2A])
//!             .method("Skip", 0x0006, [0x02, 0x17, 0x2A]),
//!     )
//!     .build();
//!
//! let found = find_method(module.candidates(), &[Opcode::Ldarg0, Opcode::LdcI41]);
//! assert_eq!(found.map(|m| m.name.as_str()), Some("Skip"));
//! ```

mod config;
mod index;
mod resolver;
mod search;
mod signature;

pub use config::{MatchConfig, MatchStrategy};
pub use index::OpcodeIndex;
pub use resolver::{Resolver, SignatureMatcher};
pub use search::{contains_overlapping, contains_run};
pub use signature::Signature;

use crate::{
    disassembler::{decode_opcodes, Opcode},
    module::{Candidate, MemberIdentity, MemberKind},
};

/// Returns the first method among `candidates` whose body contains `signature`.
///
/// Constructors and members without a body are skipped. An empty signature returns `None`
/// without looking at any candidate.
pub fn find_method<'a, I>(candidates: I, signature: &[Opcode]) -> Option<&'a MemberIdentity>
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    find_member(
        candidates,
        signature,
        MemberKind::Method,
        MatchStrategy::default(),
    )
}

/// Returns the first constructor among `candidates` whose body contains `signature`.
///
/// Same rules as [`find_method`], with methods skipped instead.
pub fn find_constructor<'a, I>(candidates: I, signature: &[Opcode]) -> Option<&'a MemberIdentity>
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    find_member(
        candidates,
        signature,
        MemberKind::Constructor,
        MatchStrategy::default(),
    )
}

/// Returns the first member of `kind` whose body contains `signature` under `strategy`.
pub fn find_member<'a, I>(
    candidates: I,
    signature: &[Opcode],
    kind: MemberKind,
    strategy: MatchStrategy,
) -> Option<&'a MemberIdentity>
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    if signature.is_empty() {
        return None;
    }

    candidates
        .into_iter()
        .find(|candidate| is_match(candidate, signature, kind, strategy))
        .map(|candidate| candidate.identity)
}

/// Returns every member of `kind` whose body contains `signature`, in enumeration order.
pub fn find_all_members<'a, I>(
    candidates: I,
    signature: &[Opcode],
    kind: MemberKind,
    strategy: MatchStrategy,
) -> Vec<&'a MemberIdentity>
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    if signature.is_empty() {
        return Vec::new();
    }

    candidates
        .into_iter()
        .filter(|candidate| is_match(candidate, signature, kind, strategy))
        .map(|candidate| candidate.identity)
        .collect()
}

fn is_match(
    candidate: &Candidate<'_>,
    signature: &[Opcode],
    kind: MemberKind,
    strategy: MatchStrategy,
) -> bool {
    if candidate.kind() != kind {
        return false;
    }

    match candidate.body {
        Some(body) => strategy.contains(decode_opcodes(body), signature),
        None => false,
    }
}
