//! Named declarations as delivered by the front-end.

use serde::{Deserialize, Serialize};

use crate::types::{CType, FnProto};

/// Identity token issued by the front-end for a declaration node.
///
/// Stable across repeated encounters of the same node within one run. It
/// says nothing about the node's address and is not comparable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub u64);

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a record is a struct or a union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordTag {
    Struct,
    Union,
}

impl RecordTag {
    /// C keyword for the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Union => "union",
        }
    }
}

impl std::fmt::Display for RecordTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One enumerator of an enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    /// Enumerator tag.
    pub name: String,
    /// Integer value after the front-end applied implicit numbering.
    pub value: i64,
}

impl Enumerator {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One field of a record declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type, qualifiers stripped.
    #[serde(rename = "type")]
    pub ty: CType,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: CType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Kind-specific payload of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclKind {
    /// `enum E { ... }`.
    Enum {
        #[serde(default)]
        enumerators: Vec<Enumerator>,
    },
    /// `struct S { ... }` or `union U { ... }`.
    Record {
        tag: RecordTag,
        /// `None` for a forward declaration without a field list.
        #[serde(default)]
        fields: Option<Vec<Field>>,
        /// Unnamed struct/union member of an enclosing record.
        #[serde(default)]
        anonymous_member: bool,
    },
    /// `typedef T name;`.
    Typedef { underlying: CType },
    /// Function declaration.
    Function {
        /// `None` for K&R-style declarations without a prototype.
        #[serde(default)]
        prototype: Option<FnProto>,
    },
    /// Any other named declaration (fields, variables, enumerator constants).
    Other,
}

/// A named declaration in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Identity token.
    pub id: DeclId,
    /// Qualified name, or a display name such as `(anonymous struct at a.h:3:1)`.
    pub name: String,
    /// Source location as `file:line:column`.
    #[serde(default)]
    pub location: String,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: DeclKind,
}

impl Declaration {
    pub fn new(id: u64, name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            id: DeclId(id),
            name: name.into(),
            location: String::new(),
            kind,
        }
    }

    /// Set the source location.
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// A complete struct with the given fields.
    pub fn structure(id: u64, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(
            id,
            name,
            DeclKind::Record {
                tag: RecordTag::Struct,
                fields: Some(fields),
                anonymous_member: false,
            },
        )
    }

    /// A complete union with the given fields.
    pub fn union(id: u64, name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::new(
            id,
            name,
            DeclKind::Record {
                tag: RecordTag::Union,
                fields: Some(fields),
                anonymous_member: false,
            },
        )
    }

    /// A forward-declared struct without a field list.
    pub fn forward_struct(id: u64, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            DeclKind::Record {
                tag: RecordTag::Struct,
                fields: None,
                anonymous_member: false,
            },
        )
    }

    pub fn enumeration(id: u64, name: impl Into<String>, enumerators: Vec<Enumerator>) -> Self {
        Self::new(id, name, DeclKind::Enum { enumerators })
    }

    pub fn typedef(id: u64, name: impl Into<String>, underlying: CType) -> Self {
        Self::new(id, name, DeclKind::Typedef { underlying })
    }

    /// A function with a full prototype.
    pub fn function(id: u64, name: impl Into<String>, ret: CType, params: Vec<CType>) -> Self {
        Self::new(
            id,
            name,
            DeclKind::Function {
                prototype: Some(FnProto::new(ret, params)),
            },
        )
    }

    /// Whether the front-end reported this as an anonymous aggregate.
    pub fn is_anonymous(&self) -> bool {
        is_anonymous_name(&self.name)
    }

    /// Short kind label used in generated comments and logs.
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            DeclKind::Enum { .. } => "enum",
            DeclKind::Record { tag, .. } => tag.as_str(),
            DeclKind::Typedef { .. } => "typedef",
            DeclKind::Function { .. } => "function",
            DeclKind::Other => "other",
        }
    }
}

/// Whether a qualified or display name denotes an anonymous aggregate.
pub fn is_anonymous_name(name: &str) -> bool {
    name.contains("(anonymous") || name.contains("(unnamed")
}
