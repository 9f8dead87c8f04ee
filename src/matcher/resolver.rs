use std::sync::Arc;

use crate::{
    matcher::{find_all_members, find_member, MatchConfig, Signature},
    module::{MemberIdentity, MemberKind, ModuleIndex},
};

/// Resolves a signature to the member it identifies.
///
/// This is the seam between the [`crate::registry`] and whatever performs the actual search.
/// [`SignatureMatcher`] is the implementation backed by a [`ModuleIndex`].
pub trait Resolver: Send + Sync {
    /// Returns the first member of `kind` whose code contains `signature`, or `None`.
    fn resolve(&self, signature: &Signature, kind: MemberKind) -> Option<MemberIdentity>;
}

/// Searches one module snapshot for signatures.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use opscope::{
///     matcher::{Resolver, Signature, SignatureMatcher},
///     module::{MemberKind, ModuleIndex, TypeBuilder},
/// };
///
/// let module = ModuleIndex::builder("osu!")
///     .add_type(
///         TypeBuilder::new("osu", "Ruleset")
///             .method("IsSpinning", 0x0006, [0x02, 0x16, 0xFE, 0x01, 0x2A]),
///     )
///     .build();
///
/// let matcher = SignatureMatcher::new(Arc::new(module));
/// let signature = Signature::parse("ldarg.0 ldc.i4.0 ceq")?;
///
/// let member = matcher.resolve(&signature, MemberKind::Method).unwrap();
/// assert_eq!(member.name, "IsSpinning");
/// # Ok::<(), opscope::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct SignatureMatcher {
    module: Arc<ModuleIndex>,
    config: MatchConfig,
}

impl SignatureMatcher {
    /// Creates a matcher with the default [`MatchConfig`]
    #[must_use]
    pub fn new(module: Arc<ModuleIndex>) -> Self {
        Self::with_config(module, MatchConfig::default())
    }

    /// Creates a matcher with an explicit configuration
    #[must_use]
    pub fn with_config(module: Arc<ModuleIndex>, config: MatchConfig) -> Self {
        SignatureMatcher { module, config }
    }

    /// The module this matcher searches
    #[must_use]
    pub fn module(&self) -> &Arc<ModuleIndex> {
        &self.module
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The first member of `kind` containing `signature`.
    #[must_use]
    pub fn find(&self, signature: &Signature, kind: MemberKind) -> Option<&MemberIdentity> {
        if self.config.use_index {
            return self
                .indexed(signature, kind)
                .map(|(_, identity)| identity)
                .next();
        }

        find_member(
            self.module.candidates(),
            signature.as_slice(),
            kind,
            self.config.strategy,
        )
    }

    /// Every member of `kind` containing `signature`, in enumeration order.
    ///
    /// A signature that should identify a single member but returns several here needs more
    /// opcodes.
    #[must_use]
    pub fn find_all(&self, signature: &Signature, kind: MemberKind) -> Vec<&MemberIdentity> {
        if self.config.use_index {
            return self
                .indexed(signature, kind)
                .map(|(_, identity)| identity)
                .collect();
        }

        find_all_members(
            self.module.candidates(),
            signature.as_slice(),
            kind,
            self.config.strategy,
        )
    }

    fn indexed(
        &self,
        signature: &Signature,
        kind: MemberKind,
    ) -> impl Iterator<Item = (usize, &MemberIdentity)> + '_ {
        let index = self.module.opcode_index();
        let strategy = self.config.strategy;
        let signature = signature.clone();

        self.module
            .candidates()
            .enumerate()
            .filter(move |(_, candidate)| candidate.kind() == kind)
            .filter_map(move |(position, candidate)| {
                let opcodes = index.get(position)?;
                strategy
                    .contains(opcodes.iter().copied(), signature.as_slice())
                    .then_some((position, candidate.identity))
            })
    }
}

impl Resolver for SignatureMatcher {
    fn resolve(&self, signature: &Signature, kind: MemberKind) -> Option<MemberIdentity> {
        self.find(signature, kind).cloned()
    }
}
