use std::sync::OnceLock;

use crate::{
    matcher::{Resolver, Signature},
    module::{MemberIdentity, MemberKind},
    Error, Result,
};

/// Where a [`LazySignature`] stands.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResolutionState {
    /// Nobody asked for this signature yet
    Unresolved,
    /// The signature matched a member
    Resolved,
    /// The signature was searched for and matched nothing
    Absent,
}

/// A labelled signature that is searched for at most once.
///
/// The first [`LazySignature::resolve`] runs the search, every later call returns the stored
/// outcome, including a "not found" outcome. Concurrent first calls block on each other, so
/// the search still runs once.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use opscope::{
///     matcher::{Signature, SignatureMatcher},
///     module::{ModuleIndex, TypeBuilder},
///     registry::{LazySignature, ResolutionState},
/// };
///
/// let module = ModuleIndex::builder("osu!")
///     .add_type(
///         TypeBuilder::new("osu", "Audio")
///             .method("Play", 0x0006, [0x02, 0x6F, 0x01, 0x00, 0x00, 0x06, 0x2A]),
///     )
///     .build();
/// let matcher = SignatureMatcher::new(Arc::new(module));
///
/// let play = LazySignature::method("Audio#Play", Signature::parse("ldarg.0 callvirt ret")?);
/// assert_eq!(play.state(), ResolutionState::Unresolved);
///
/// assert_eq!(play.require(&matcher)?.name, "Play");
/// assert_eq!(play.state(), ResolutionState::Resolved);
/// # Ok::<(), opscope::Error>(())
/// ```
#[derive(Debug)]
pub struct LazySignature {
    label: String,
    signature: Signature,
    kind: MemberKind,
    resolution: OnceLock<Option<MemberIdentity>>,
}

impl LazySignature {
    /// Creates an unresolved entry
    #[must_use]
    pub fn new(label: impl Into<String>, signature: Signature, kind: MemberKind) -> Self {
        LazySignature {
            label: label.into(),
            signature,
            kind,
            resolution: OnceLock::new(),
        }
    }

    /// Creates an unresolved entry searching for a method
    #[must_use]
    pub fn method(label: impl Into<String>, signature: Signature) -> Self {
        Self::new(label, signature, MemberKind::Method)
    }

    /// Creates an unresolved entry searching for a constructor
    #[must_use]
    pub fn constructor(label: impl Into<String>, signature: Signature) -> Self {
        Self::new(label, signature, MemberKind::Constructor)
    }

    /// The human readable label, e.g. `Player#AllowDoubleSkip.get`
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The signature searched for
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The kind of member searched for
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The current state, never triggers a search
    #[must_use]
    pub fn state(&self) -> ResolutionState {
        match self.resolution.get() {
            None => ResolutionState::Unresolved,
            Some(Some(_)) => ResolutionState::Resolved,
            Some(None) => ResolutionState::Absent,
        }
    }

    /// The stored outcome, `None` while unresolved
    #[must_use]
    pub fn cached(&self) -> Option<Option<&MemberIdentity>> {
        self.resolution.get().map(Option::as_ref)
    }

    /// Returns the member this signature identifies, searching with `resolver` on first use.
    pub fn resolve<R: Resolver + ?Sized>(&self, resolver: &R) -> Option<&MemberIdentity> {
        self.resolution
            .get_or_init(|| {
                let result = resolver.resolve(&self.signature, self.kind);
                match &result {
                    Some(identity) => {
                        log::debug!("Signature '{}' resolved to {}", self.label, identity);
                    }
                    None => {
                        log::debug!(
                            "Signature '{}' matched no {} ({})",
                            self.label,
                            self.kind,
                            self.signature
                        );
                    }
                }
                result
            })
            .as_ref()
    }

    /// Like [`LazySignature::resolve`], but a missing member is an error.
    ///
    /// # Errors
    /// Returns [`Error::SignatureNotFound`] if the signature matches no member.
    pub fn require<R: Resolver + ?Sized>(&self, resolver: &R) -> Result<&MemberIdentity> {
        self.resolve(resolver).ok_or_else(|| Error::SignatureNotFound {
            label: self.label.clone(),
            kind: self.kind,
        })
    }
}
