//! # opscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the opscope library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all opscope operations
pub use crate::Error;

/// The result type used throughout opscope
pub use crate::Result;

// ================================================================================================
// Decoding
// ================================================================================================

/// CIL instruction identifiers and decoded instructions
pub use crate::disassembler::{Instruction, Opcode, OperandType};

/// Decoding entry points
pub use crate::disassembler::{decode_instructions, decode_opcodes, decode_stream};

/// Metadata token type identifying types and members
pub use crate::metadata::token::Token;

// ================================================================================================
// Modules and Matching
// ================================================================================================

/// Module snapshots and their construction
pub use crate::module::{ModuleIndex, ModuleIndexBuilder, TypeBuilder};

/// Members as found by a search
pub use crate::module::{Candidate, MemberIdentity, MemberKind};

/// Locating the target module
pub use crate::module::{InMemoryHost, ModuleHost, ModuleLocator};

/// Signatures and searching
pub use crate::matcher::{
    find_constructor, find_method, MatchConfig, MatchStrategy, Resolver, Signature,
    SignatureMatcher,
};

/// Named signatures
pub use crate::registry::{LazySignature, ResolutionState, SignatureRegistry};
