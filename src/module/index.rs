//! The in-memory snapshot of a module that signatures are resolved against.
//!
//! A [`ModuleIndex`] holds every type of a module in declaration order, each type holding its
//! methods and constructors in declaration order. It is built once, with [`ModuleIndexBuilder`]
//! and [`TypeBuilder`], and never changes afterwards, so it can be shared freely between
//! threads.
//!
//! # Examples
//!
//! ```rust
//! use opscope::module::{MemberKind, ModuleIndex, TypeBuilder};
//!
//! let module = ModuleIndex::builder("osu!")
//!     .add_type(
//!         TypeBuilder::new("osu.GameModes.Play", "Player")
//!             .constructor(0x1886, [0x02, 0x28, 0x01, 0x00, 0x00, 0x0A, 0x2A])
//!             .method("Update", 0x0086, [0x00, 0x2A]),
//!     )
//!     .build();
//!
//! let kinds: Vec<MemberKind> = module.candidates().map(|c| c.kind()).collect();
//! assert_eq!(kinds, [MemberKind::Constructor, MemberKind::Method]);
//! ```

use std::sync::{Arc, OnceLock};

use crate::{
    matcher::OpcodeIndex,
    metadata::{
        method::{MethodAccessFlags, MethodBody, MethodModifiers},
        token::Token,
    },
    module::{
        Candidate, MemberDescriptor, MemberIdentity, MemberKind, CONSTRUCTOR_NAME,
        STATIC_CONSTRUCTOR_NAME,
    },
    Result,
};

/// First `TypeDef` row handed out, row 1 belongs to the `<Module>` pseudo type
const FIRST_TYPE_ROW: u32 = 2;

/// A type of a module together with its members.
#[derive(Clone, Debug)]
pub struct TypeDescriptor {
    /// `TypeDef` token of this type
    pub token: Token,
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Name of the type
    pub name: String,
    /// Methods and constructors in declaration order
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    /// `Namespace.Name`, or just `Name` in the global namespace
    #[must_use]
    pub fn full_name(&self) -> String {
        full_type_name(&self.namespace, &self.name)
    }
}

fn full_type_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// An immutable snapshot of one loaded module.
#[derive(Debug)]
pub struct ModuleIndex {
    name: String,
    types: Vec<TypeDescriptor>,
    opcodes: OnceLock<OpcodeIndex>,
}

impl ModuleIndex {
    /// Starts building a module with the given name
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ModuleIndexBuilder {
        ModuleIndexBuilder::new(name)
    }

    /// The module name, e.g. `osu!`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All types, in declaration order
    #[must_use]
    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    /// Total number of methods and constructors
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.types.iter().map(|t| t.members.len()).sum()
    }

    /// Enumerates every method and constructor of the module.
    ///
    /// The order is stable: types in declaration order, then the members of each type in
    /// declaration order. Members of every visibility, static or not, are included.
    pub fn candidates(&self) -> impl Iterator<Item = Candidate<'_>> + Clone + '_ {
        self.types
            .iter()
            .flat_map(|t| t.members.iter().map(MemberDescriptor::candidate))
    }

    /// The decoded opcodes of every member, built on first use.
    ///
    /// Entries line up with [`ModuleIndex::candidates`].
    pub fn opcode_index(&self) -> &OpcodeIndex {
        self.opcodes.get_or_init(|| OpcodeIndex::build(self))
    }

    /// `true` once [`ModuleIndex::opcode_index`] has been built
    #[must_use]
    pub fn has_opcode_index(&self) -> bool {
        self.opcodes.get().is_some()
    }
}

struct PendingMember {
    name: String,
    kind: MemberKind,
    flags: u32,
    body: Option<Arc<[u8]>>,
}

/// Collects the members of one type, see [`ModuleIndexBuilder::add_type`].
///
/// `flags` arguments are raw ECMA-335 `MethodAttributes` values.
pub struct TypeBuilder {
    namespace: String,
    name: String,
    members: Vec<PendingMember>,
}

impl TypeBuilder {
    /// Starts a type declaration
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeBuilder {
            namespace: namespace.into(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    fn push(
        mut self,
        name: String,
        kind: MemberKind,
        flags: u32,
        body: Option<Arc<[u8]>>,
    ) -> Self {
        self.members.push(PendingMember {
            name,
            kind,
            flags,
            body,
        });
        self
    }

    /// Adds a method with the given instruction stream (no method header)
    #[must_use]
    pub fn method(self, name: impl Into<String>, flags: u32, body: impl Into<Arc<[u8]>>) -> Self {
        self.push(name.into(), MemberKind::Method, flags, Some(body.into()))
    }

    /// Adds a method without a body
    ///
    /// The `abstract` modifier is added to `flags`.
    #[must_use]
    pub fn abstract_method(self, name: impl Into<String>, flags: u32) -> Self {
        let flags = flags | MethodModifiers::ABSTRACT.bits();
        self.push(name.into(), MemberKind::Method, flags, None)
    }

    /// Adds a method whose body starts with a tiny or fat method header.
    ///
    /// Only the instruction stream is kept, extra data sections are dropped.
    ///
    /// # Errors
    /// Returns an error if the method header can not be parsed, see [`MethodBody::from`].
    pub fn method_with_header(
        self,
        name: impl Into<String>,
        flags: u32,
        data: &[u8],
    ) -> Result<Self> {
        let header = MethodBody::from(data)?;
        let code: Arc<[u8]> = Arc::from(header.code(data));
        Ok(self.push(name.into(), MemberKind::Method, flags, Some(code)))
    }

    /// Adds a constructor.
    ///
    /// With the `static` modifier in `flags` this is the type initializer (`.cctor`),
    /// otherwise an instance constructor (`.ctor`). The special name flags are always set.
    #[must_use]
    pub fn constructor(self, flags: u32, body: impl Into<Arc<[u8]>>) -> Self {
        let flags = flags
            | MethodModifiers::SPECIAL_NAME.bits()
            | MethodModifiers::RTSPECIAL_NAME.bits();
        let name = if flags & MethodModifiers::STATIC.bits() != 0 {
            STATIC_CONSTRUCTOR_NAME
        } else {
            CONSTRUCTOR_NAME
        };
        self.push(
            name.to_string(),
            MemberKind::Constructor,
            flags,
            Some(body.into()),
        )
    }
}

/// Builds a [`ModuleIndex`].
///
/// Tokens are assigned in declaration order, the way a compiler lays out the `TypeDef` and
/// `MethodDef` tables.
pub struct ModuleIndexBuilder {
    name: String,
    types: Vec<TypeDescriptor>,
    next_method_row: u32,
}

impl ModuleIndexBuilder {
    /// Starts an empty module with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ModuleIndexBuilder {
            name: name.into(),
            types: Vec::new(),
            next_method_row: 1,
        }
    }

    /// Appends a type and its members
    #[must_use]
    pub fn add_type(mut self, builder: TypeBuilder) -> Self {
        let row = FIRST_TYPE_ROW + self.types.len() as u32;
        let type_token = Token::type_def(row);
        let type_name = full_type_name(&builder.namespace, &builder.name);

        let mut members = Vec::with_capacity(builder.members.len());
        for member in builder.members {
            let token = Token::method_def(self.next_method_row);
            self.next_method_row += 1;

            members.push(MemberDescriptor {
                identity: MemberIdentity {
                    type_token,
                    type_name: type_name.clone(),
                    token,
                    name: member.name,
                    kind: member.kind,
                    flags_access: MethodAccessFlags::from_method_flags(member.flags),
                    flags_modifiers: MethodModifiers::from_method_flags(member.flags),
                },
                body: member.body,
            });
        }

        self.types.push(TypeDescriptor {
            token: type_token,
            namespace: builder.namespace,
            name: builder.name,
            members,
        });
        self
    }

    /// Finishes the module
    #[must_use]
    pub fn build(self) -> ModuleIndex {
        ModuleIndex {
            name: self.name,
            types: self.types,
            opcodes: OnceLock::new(),
        }
    }
}
