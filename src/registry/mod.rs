//! A catalog of named signatures with compute-once resolution.
//!
//! Calling code refers to the members it needs by label (`"Player#AllowDoubleSkip.get"`)
//! rather than by name, since names do not survive obfuscation. The registry maps each label
//! to a [`LazySignature`] that searches the module the first time it is asked for and keeps
//! the result for every later request.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use opscope::{
//!     matcher::{Signature, SignatureMatcher},
//!     module::{ModuleIndex, TypeBuilder},
//!     registry::SignatureRegistry,
//! };
//!
//! let module = ModuleIndex::builder("osu!")
//!     .add_type(
//!         TypeBuilder::new("osu.GameModes.Play", "Player")
//!             .constructor(0x1886, [0x02, 0x16, 0x7D, 0x01, 0x00, 0x00, 0x04, 0x2A])
//!             .method("OnLoadComplete", 0x0004, [0x02, 0x17, 0x6F, 0x02, 0x00, 0x00, 0x06, 0x2A]),
//!     )
//!     .build();
//! let matcher = SignatureMatcher::new(Arc::new(module));
//!
//! let registry = SignatureRegistry::builder()
//!     .constructor("Player#.ctor", Signature::parse("ldarg.0 ldc.i4.0 stfld")?)
//!     .method("Player#OnLoadComplete", Signature::parse("ldc.i4.1 callvirt")?)
//!     .build()?;
//!
//! let ctor = registry.require("Player#.ctor", &matcher)?;
//! assert_eq!(ctor.name, ".ctor");
//! assert_eq!(registry.resolve_all(&matcher), 2);
//! # Ok::<(), opscope::Error>(())
//! ```

mod lazy;

pub use lazy::{LazySignature, ResolutionState};

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use rayon::prelude::*;

use crate::{
    matcher::{Resolver, Signature},
    module::{MemberIdentity, MemberKind},
    Error, Result,
};

/// Label to [`LazySignature`] catalog, safe to share between threads.
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    entries: DashMap<String, Arc<LazySignature>>,
}

impl SignatureRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a registry
    #[must_use]
    pub fn builder() -> SignatureRegistryBuilder {
        SignatureRegistryBuilder::default()
    }

    /// Adds an entry.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateLabel`] if the label is already taken.
    pub fn register(&self, entry: LazySignature) -> Result<Arc<LazySignature>> {
        match self.entries.entry(entry.label().to_string()) {
            Entry::Occupied(occupied) => Err(Error::DuplicateLabel(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                let entry = Arc::new(entry);
                vacant.insert(Arc::clone(&entry));
                Ok(entry)
            }
        }
    }

    /// Returns the entry registered under `label`.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] for an unknown label.
    pub fn get(&self, label: &str) -> Result<Arc<LazySignature>> {
        self.entries
            .get(label)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::LabelNotFound(label.to_string()))
    }

    /// `true` if `label` is registered
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Number of registered entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All labels, sorted
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        labels.sort();
        labels
    }

    /// Resolves the member behind `label`, searching only if this label was never resolved.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] for an unknown label.
    pub fn resolve<R: Resolver + ?Sized>(
        &self,
        label: &str,
        resolver: &R,
    ) -> Result<Option<MemberIdentity>> {
        Ok(self.get(label)?.resolve(resolver).cloned())
    }

    /// Resolves the member behind `label` and fails if there is none.
    ///
    /// # Errors
    /// Returns [`Error::LabelNotFound`] for an unknown label and [`Error::SignatureNotFound`]
    /// if the signature matches no member.
    pub fn require<R: Resolver + ?Sized>(
        &self,
        label: &str,
        resolver: &R,
    ) -> Result<MemberIdentity> {
        self.get(label)?.require(resolver).cloned()
    }

    /// Resolves every entry, in parallel, and returns how many matched a member.
    ///
    /// Entries that were resolved before are not searched again.
    pub fn resolve_all<R: Resolver + ?Sized>(&self, resolver: &R) -> usize {
        let entries: Vec<Arc<LazySignature>> = self
            .entries
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        entries
            .par_iter()
            .filter(|entry| entry.resolve(resolver).is_some())
            .count()
    }

    /// Labels whose signatures were searched for and matched nothing, sorted
    #[must_use]
    pub fn absent(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.value().state() == ResolutionState::Absent)
            .map(|e| e.key().clone())
            .collect();
        labels.sort();
        labels
    }
}

/// Collects entries for a [`SignatureRegistry`].
#[derive(Default)]
pub struct SignatureRegistryBuilder {
    entries: Vec<LazySignature>,
}

impl SignatureRegistryBuilder {
    /// Adds a method signature
    #[must_use]
    pub fn method(mut self, label: impl Into<String>, signature: Signature) -> Self {
        self.entries.push(LazySignature::new(label, signature, MemberKind::Method));
        self
    }

    /// Adds a constructor signature
    #[must_use]
    pub fn constructor(mut self, label: impl Into<String>, signature: Signature) -> Self {
        self.entries
            .push(LazySignature::new(label, signature, MemberKind::Constructor));
        self
    }

    /// Creates the registry.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateLabel`] if two entries share a label.
    pub fn build(self) -> Result<SignatureRegistry> {
        let registry = SignatureRegistry::new();
        for entry in self.entries {
            registry.register(entry)?;
        }
        Ok(registry)
    }
}
