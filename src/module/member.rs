//! Member identities and the candidates handed to the signature matcher.

use std::{fmt, sync::Arc};

use strum::Display;

use crate::metadata::{
    method::{MethodAccessFlags, MethodModifiers},
    token::Token,
};

/// Name of an instance constructor
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name of a static (type) constructor
pub const STATIC_CONSTRUCTOR_NAME: &str = ".cctor";

/// What kind of member a signature is searched for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum MemberKind {
    /// A regular method, static or instance
    #[strum(serialize = "method")]
    Method,
    /// An instance or static constructor
    #[strum(serialize = "constructor")]
    Constructor,
}

/// Identifies one method or constructor of a module.
///
/// This is what a successful signature resolution produces: enough information to find the
/// member again (tokens) and to report it to a human (names).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MemberIdentity {
    /// Token of the declaring type
    pub type_token: Token,
    /// Full name of the declaring type, `Namespace.Name`
    pub type_name: String,
    /// Token of the member
    pub token: Token,
    /// Name of the member
    pub name: String,
    /// Method or constructor
    pub kind: MemberKind,
    /// Visibility of the member
    pub flags_access: MethodAccessFlags,
    /// Static, virtual, abstract, ...
    pub flags_modifiers: MethodModifiers,
}

impl MemberIdentity {
    /// `true` if the member is defined on the type rather than per instance
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// `true` if the member is publicly accessible
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags_access.is_public()
    }

    /// The member name qualified with its declaring type, e.g. `osu.GameModes.Play.Player::Update`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.type_name, self.name)
    }
}

impl fmt::Display for MemberIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} ({})", self.type_name, self.name, self.token)
    }
}

/// A member as stored in a [`crate::module::ModuleIndex`]: its identity plus its instruction
/// stream, if it has one.
#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    /// Who this member is
    pub identity: MemberIdentity,
    /// The raw instruction stream, without method header. `None` for members without a body
    /// (abstract, extern, runtime implemented)
    pub body: Option<Arc<[u8]>>,
}

impl MemberDescriptor {
    /// Borrows this member as a search [`Candidate`]
    #[must_use]
    pub fn candidate(&self) -> Candidate<'_> {
        Candidate {
            identity: &self.identity,
            body: self.body.as_deref(),
        }
    }
}

/// One method or constructor considered during a scan.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    /// Identity of the member
    pub identity: &'a MemberIdentity,
    /// Instruction stream, `None` if the member has no body
    pub body: Option<&'a [u8]>,
}

impl Candidate<'_> {
    /// The kind of member this candidate is
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.identity.kind
    }
}
