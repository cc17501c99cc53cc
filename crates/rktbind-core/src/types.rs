//! C type descriptions.
//!
//! A [`CType`] is what the front-end reports for a field, parameter,
//! return value, or typedef target. It is a closed set of shapes so the
//! type mapper can match on it exhaustively. Qualifiers are already
//! stripped by the front-end.

use serde::{Deserialize, Serialize};

use crate::decl::{DeclId, RecordTag};

/// A C type as reported by the declaration front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CType {
    /// Pointer to another type (function pointers use [`CType::FunctionPointer`]).
    Pointer(Box<CType>),
    /// Fixed-size array.
    Array(ArrayType),
    /// Reference to an enum by name.
    Enum(TagRef),
    /// Reference to a struct by name.
    Struct(TagRef),
    /// Reference to a union by name.
    Union(TagRef),
    /// Pointer to a function with a full prototype.
    FunctionPointer(FnProto),
    /// Primitive or typedef name, spelled as in C (`"unsigned int"`, `"size_t"`).
    Named(String),
}

/// A fixed-size array type.
///
/// Sizes are in bits, as the front-end's layout engine reports them. The
/// element count is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayType {
    /// Element type.
    pub element: Box<CType>,
    /// Width of the whole array.
    pub total_bits: u64,
    /// Width of a single element.
    pub element_bits: u64,
}

impl ArrayType {
    /// Number of elements, or 0 when the widths do not describe a real array
    /// (flexible array members, zero-width elements).
    pub fn count(&self) -> u64 {
        self.total_bits.checked_div(self.element_bits).unwrap_or(0)
    }
}

/// A by-name reference to an enum, struct, or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    /// Qualified name, or the front-end's display name for anonymous aggregates.
    pub name: String,
    /// Identity token of the referenced declaration, when the front-end knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl: Option<DeclId>,
}

impl TagRef {
    /// Reference a tag type by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decl: None,
        }
    }

    /// Reference a tag type by name and identity token.
    pub fn with_decl(name: impl Into<String>, decl: DeclId) -> Self {
        Self {
            name: name.into(),
            decl: Some(decl),
        }
    }
}

/// A function prototype: return type plus parameter types in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FnProto {
    /// Return type.
    pub ret: Box<CType>,
    /// Parameter types.
    #[serde(default)]
    pub params: Vec<CType>,
}

impl FnProto {
    pub fn new(ret: CType, params: Vec<CType>) -> Self {
        Self {
            ret: Box::new(ret),
            params,
        }
    }
}

impl CType {
    /// A primitive or typedef name.
    pub fn named(name: impl Into<String>) -> Self {
        CType::Named(name.into())
    }

    /// Pointer to `pointee`.
    pub fn pointer(pointee: CType) -> Self {
        CType::Pointer(Box::new(pointee))
    }

    /// Array of `element` with the given widths in bits.
    pub fn array(element: CType, total_bits: u64, element_bits: u64) -> Self {
        CType::Array(ArrayType {
            element: Box::new(element),
            total_bits,
            element_bits,
        })
    }

    /// Reference to a struct or union by name.
    pub fn record(tag: RecordTag, name: impl Into<String>) -> Self {
        match tag {
            RecordTag::Struct => CType::Struct(TagRef::named(name)),
            RecordTag::Union => CType::Union(TagRef::named(name)),
        }
    }

    /// Reference to an enum by name.
    pub fn enumeration(name: impl Into<String>) -> Self {
        CType::Enum(TagRef::named(name))
    }

    /// Function pointer with the given prototype.
    pub fn function_pointer(ret: CType, params: Vec<CType>) -> Self {
        CType::FunctionPointer(FnProto::new(ret, params))
    }

    /// Whether this is a struct or union reference.
    pub fn is_record(&self) -> bool {
        matches!(self, CType::Struct(_) | CType::Union(_))
    }

    /// Whether this is the plain `char` primitive.
    pub fn is_char(&self) -> bool {
        matches!(self, CType::Named(name) if name == "char")
    }
}

impl std::fmt::Display for CType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CType::Pointer(inner) => write!(f, "{inner}*"),
            CType::Array(array) => write!(f, "{}[{}]", array.element, array.count()),
            CType::Enum(tag) => write!(f, "enum {}", tag.name),
            CType::Struct(tag) => write!(f, "struct {}", tag.name),
            CType::Union(tag) => write!(f, "union {}", tag.name),
            CType::FunctionPointer(proto) => {
                write!(f, "{} (*)(", proto.ret)?;
                for (i, param) in proto.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
            CType::Named(name) => write!(f, "{name}"),
        }
    }
}
