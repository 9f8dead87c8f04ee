// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # opscope
//!
//! Locate methods inside a .NET module by the shape of their CIL bytecode.
//!
//! Obfuscators and rebuilds rename methods freely, but the sequence of instructions a method
//! is compiled to tends to survive. `opscope` lets you describe a method by a short run of
//! opcodes, a *signature*, and finds the method or constructor whose body contains that run.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use opscope::prelude::*;
//!
//! // A module snapshot, normally produced by whatever hosts the target process
//! let module = ModuleIndex::builder("osu!")
//!     .add_type(
//!         TypeBuilder::new("osu.GameModes.Play", "Player")
//!             .method("a", 0x0006, [0x02, 0x2A])
//!             .method("b", 0x0001, [0x65, 0x0A, 0x02, 0x75, 0x01, 0x00, 0x00, 0x02, 0x2A]),
//!     )
//!     .build();
//!
//! let registry = SignatureRegistry::builder()
//!     .method("Player#AllowDoubleSkip.get", Signature::parse("neg stloc.0 ldarg.0 isinst")?)
//!     .build()?;
//!
//! let matcher = SignatureMatcher::new(Arc::new(module));
//! let method = registry.require("Player#AllowDoubleSkip.get", &matcher)?;
//! assert_eq!(method.name, "b");
//! # Ok::<(), opscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`disassembler`] - CIL opcode table and the decoder that walks a method body
//! - [`metadata`] - Tokens, member flags and method header parsing
//! - [`module`] - The searchable snapshot of a module and how to locate it
//! - [`matcher`] - Signatures and the search itself
//! - [`registry`] - Named signatures, resolved at most once
//! - [`Error`] and [`Result`] - Error handling

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use opscope::prelude::*;
///
/// let signature = Signature::new(&[Opcode::Ldarg0, Opcode::Ret])?;
/// assert_eq!(signature.len(), 2);
/// # Ok::<(), opscope::Error>(())
/// ```
pub mod prelude;

/// CIL opcodes and the instruction decoder, based on ECMA-335 Partition III.
pub mod disassembler;

/// ECMA-335 metadata: tokens, member attributes and method headers.
pub mod metadata;

/// Module snapshots, member identities and module resolution.
pub mod module;

/// Opcode signatures and the search for them.
pub mod matcher;

/// Labelled signatures with compute-once resolution.
pub mod registry;

/// `opscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `opscope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use opscope::{module::{InMemoryHost, ModuleLocator}, Error};
///
/// match ModuleLocator::new("osu!").module(&InMemoryHost::new()) {
///     Ok(module) => println!("Found {}", module.name()),
///     Err(Error::ModuleNotFound { name }) => println!("{name} is not loaded"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Bounds-checked little-endian reader over a byte slice.
///
/// Used with [`disassembler::decode_instruction`] to step through a method body.
pub use file::parser::Parser;
