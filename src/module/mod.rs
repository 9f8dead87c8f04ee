//! The module side of a signature search: what can be searched, and where it comes from.
//!
//! # Key Types
//! - [`ModuleIndex`] - Immutable snapshot of a module's types and members
//! - [`Candidate`] - One member as seen by the matcher, identity plus optional body
//! - [`MemberIdentity`] - The result of a successful resolution
//! - [`ModuleLocator`] - Finds the target module by name, once
//! - [`ModuleHost`] - Enumerates the modules loaded in a process

mod index;
mod locator;
mod member;

pub use index::{ModuleIndex, ModuleIndexBuilder, TypeBuilder, TypeDescriptor};
pub use locator::{InMemoryHost, ModuleHost, ModuleLocator};
pub use member::{
    Candidate, MemberDescriptor, MemberIdentity, MemberKind, CONSTRUCTOR_NAME,
    STATIC_CONSTRUCTOR_NAME,
};
