//! C type to binding-type expression mapping.
//!
//! [`map_type`] turns a [`CType`] into an `ffi/unsafe` type expression and
//! records every user-defined name the expression refers to. The `owner`
//! is the translated name of the definition being built; references to it
//! are never recorded, so a record may point at itself without depending
//! on itself.

use std::collections::BTreeSet;

use rktbind_core::decl::is_anonymous_name;
use rktbind_core::{CType, FnProto, TagRef};

use crate::naming::AnonymousRegistry;

/// Prefix that turns a C name into a binding-dialect name.
pub const NAME_PREFIX: &str = "_";

/// Binding alias of C `void`; also the sentinel dependency of opaque placeholders.
pub const VOID_ALIAS: &str = "_void";

/// Untyped opaque pointer.
pub const OPAQUE_POINTER: &str = "_pointer";

/// Marshalled C string.
pub const STRING_TYPE: &str = "_string";

/// Inline marker placed in front of a fragment that could not be mapped.
///
/// It comments out the rest of the line, so the generated module fails to
/// load where the problem is.
pub const ERROR_MARKER: &str = ";; error: ";

/// Result of mapping one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped {
    /// `false` when `text` is only a best-effort rendering.
    pub ok: bool,
    /// Binding-dialect type expression.
    pub text: String,
}

impl Mapped {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
        }
    }

    /// `text`, prefixed with [`ERROR_MARKER`] when mapping failed.
    pub fn marked(&self) -> String {
        if self.ok {
            self.text.clone()
        } else {
            format!("{ERROR_MARKER}{}", self.text)
        }
    }
}

/// Binding alias for a builtin C scalar spelling.
pub fn builtin_alias(c_name: &str) -> Option<&'static str> {
    let alias = match c_name {
        "_Bool" | "bool" => "_bool",
        "char" => "_byte",
        "signed char" | "int8_t" => "_int8",
        "unsigned char" | "uint8_t" => "_uint8",
        "short" | "int16_t" => "_int16",
        "unsigned short" | "uint16_t" => "_uint16",
        "int" | "int32_t" => "_int32",
        "unsigned int" | "uint32_t" => "_uint32",
        "long" => "_long",
        "unsigned long" => "_ulong",
        "long long" | "int64_t" => "_int64",
        "unsigned long long" | "uint64_t" => "_uint64",
        "float" => "_float",
        "double" => "_double",
        "void" => VOID_ALIAS,
        _ => return None,
    };
    Some(alias)
}

/// Translated name of a C name: the dialect prefix in front of it.
pub fn translate(c_name: &str) -> String {
    format!("{NAME_PREFIX}{c_name}")
}

/// Translated name of an enum, struct, or union reference.
///
/// Anonymous aggregates resolve through the registry when the reference
/// carries the aggregate's identity token.
pub fn translate_tag(tag: &TagRef, anon: &mut AnonymousRegistry) -> String {
    match tag.decl {
        Some(id) if is_anonymous_name(&tag.name) => translate(anon.name_for(id)),
        _ => translate(&tag.name),
    }
}

/// Map `ty` to a binding type expression, adding referenced names to `deps`.
///
/// Never fails outright: an unmappable type yields `ok == false` together
/// with the best text available so generation can continue.
pub fn map_type(
    ty: &CType,
    deps: &mut BTreeSet<String>,
    owner: &str,
    anon: &mut AnonymousRegistry,
) -> Mapped {
    match ty {
        CType::Pointer(pointee) => map_pointer(pointee, deps, owner, anon),
        CType::FunctionPointer(proto) => Mapped::ok(fn_signature(proto, deps, owner, anon)),
        CType::Array(array) => {
            let element = map_type(&array.element, deps, owner, anon);
            let count = array.count();
            Mapped {
                ok: element.ok && count > 0,
                text: format!("(_array/vector {} {count})", element.text),
            }
        }
        CType::Enum(tag) | CType::Struct(tag) | CType::Union(tag) => {
            let name = translate_tag(tag, anon);
            depend_on(deps, &name, owner);
            Mapped::ok(name)
        }
        CType::Named(name) => match builtin_alias(name) {
            Some(alias) => Mapped::ok(alias),
            None => {
                let name = translate(name);
                depend_on(deps, &name, owner);
                Mapped::ok(name)
            }
        },
    }
}

/// Render a prototype as `(_fun <params> -> <ret>)`.
///
/// Parameters that fail to map are marked inline; the signature is still
/// produced.
pub fn fn_signature(
    proto: &FnProto,
    deps: &mut BTreeSet<String>,
    owner: &str,
    anon: &mut AnonymousRegistry,
) -> String {
    let ret = map_type(&proto.ret, deps, owner, anon);
    let mut text = String::new();
    if !ret.ok {
        text.push_str(ERROR_MARKER);
    }
    text.push_str("(_fun ");
    for param in &proto.params {
        let mapped = map_type(param, deps, owner, anon);
        text.push_str(&mapped.marked());
        text.push(' ');
    }
    text.push_str("-> ");
    text.push_str(&ret.text);
    text.push(')');
    text
}

fn map_pointer(
    pointee: &CType,
    deps: &mut BTreeSet<String>,
    owner: &str,
    anon: &mut AnonymousRegistry,
) -> Mapped {
    let inner = map_type(pointee, deps, owner, anon);
    let text = if inner.text == VOID_ALIAS || inner.text == owner {
        OPAQUE_POINTER.to_string()
    } else if pointee.is_record() {
        format!("(_or-null {}-pointer)", inner.text)
    } else if pointee.is_char() {
        STRING_TYPE.to_string()
    } else {
        format!("(_cpointer {})", inner.text)
    };
    Mapped { ok: inner.ok, text }
}

fn depend_on(deps: &mut BTreeSet<String>, name: &str, owner: &str) {
    if name != owner {
        deps.insert(name.to_string());
    }
}
