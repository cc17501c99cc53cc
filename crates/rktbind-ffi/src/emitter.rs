//! Per-declaration definition text.
//!
//! Each declaration kind becomes one or two `ffi/unsafe` forms:
//!
//! - enum → `_enum` table plus a `-domain` tag list
//! - struct → `define-cstruct` plus an `alloc-` helper
//! - union → `_union`
//! - incomplete record → `_void` placeholder plus a `_pointer` alias
//! - typedef → alias, or a `_fun` type for function pointers
//! - function → `_fun` type
//!
//! Deferrable results go to the resolver as a [`Definition`]; duplicates
//! and unsupported declarations are written immediately as comments.

use std::collections::BTreeSet;

use rktbind_core::{CType, DeclKind, Declaration, Enumerator, Field, FnProto, RecordTag};
use tracing::debug;

use crate::mapper::{self, ERROR_MARKER};
use crate::naming::AnonymousRegistry;
use crate::resolver::{Definition, DependencyResolver, SENTINEL};

/// What to do with one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// Register with the resolver.
    Deferred(Definition),
    /// Name already defined; write the comment now, register nothing.
    Duplicate(String),
    /// Declaration cannot be bound; write the comment now, register nothing.
    Unsupported(String),
    /// Location matched an exclusion pattern.
    Excluded,
    /// Declaration kind produces no binding.
    Ignored,
}

/// Builds definition text for declarations.
#[derive(Debug, Default)]
pub struct DeclarationEmitter {
    exclude: Vec<String>,
    print_source_path: bool,
    anon: AnonymousRegistry,
}

impl DeclarationEmitter {
    pub fn new(exclude: Vec<String>, print_source_path: bool) -> Self {
        Self {
            exclude,
            print_source_path,
            anon: AnonymousRegistry::new(),
        }
    }

    /// Synthetic names assigned so far.
    pub fn anonymous(&self) -> &AnonymousRegistry {
        &self.anon
    }

    /// Build the emission for `decl`. `resolver` answers duplicate checks.
    pub fn emit(&mut self, decl: &Declaration, resolver: &DependencyResolver) -> Emission {
        if self
            .exclude
            .iter()
            .any(|pattern| decl.location.contains(pattern.as_str()))
        {
            return Emission::Excluded;
        }
        let location = strip_column(&decl.location);

        let c_name = if decl.is_anonymous() {
            self.anon.name_for(decl.id).to_string()
        } else {
            decl.name.clone()
        };
        let name = mapper::translate(&c_name);

        let mut text = format!(";; {} {name}\n", decl.kind_label());
        if self.print_source_path {
            text.push_str(&format!(";; {location}\n"));
        }

        if !matches!(decl.kind, DeclKind::Other) && resolver.is_predefined(&name) {
            return duplicate(text, &name);
        }

        match &decl.kind {
            DeclKind::Enum { enumerators } => {
                if resolver.is_defined(&name) {
                    return duplicate(text, &name);
                }
                write_enum(&mut text, &name, enumerators);
                Emission::Deferred(Definition::new(name, text, BTreeSet::new()))
            }
            DeclKind::Record {
                tag,
                fields,
                anonymous_member,
            } => {
                let Some(fields) = fields else {
                    text.push_str(";; incomplete definition\n");
                    text.push_str(&format!(
                        "(define {name} {SENTINEL})\n(define {name}-pointer _pointer)"
                    ));
                    let deps = BTreeSet::from([SENTINEL.to_string()]);
                    return Emission::Deferred(Definition::new(name, text, deps));
                };
                if *anonymous_member {
                    debug!(name = %name, tag = %tag, "anonymous member record");
                    text.push_str(";; do not support anonymous struct or union");
                    return Emission::Unsupported(text);
                }
                // not duplicate-checked: a later definition competes with the earlier one
                let mut deps = BTreeSet::new();
                match tag {
                    RecordTag::Struct => {
                        self.write_struct(&mut text, &name, &c_name, fields, &mut deps)
                    }
                    RecordTag::Union => self.write_union(&mut text, &name, fields, &mut deps),
                }
                Emission::Deferred(Definition::new(name, text, deps))
            }
            DeclKind::Typedef { underlying } => {
                if resolver.is_defined(&name) {
                    return duplicate(text, &name);
                }
                let mut deps = BTreeSet::new();
                if let CType::FunctionPointer(proto) = underlying {
                    self.write_signature(&mut text, &name, proto, &mut deps);
                } else {
                    let mapped = mapper::map_type(underlying, &mut deps, "", &mut self.anon);
                    if !mapped.ok {
                        text.push_str(ERROR_MARKER);
                    }
                    text.push_str(&format!("(define {name} {})", mapped.text));
                }
                Emission::Deferred(Definition::new(name, text, deps))
            }
            DeclKind::Function { prototype } => {
                if resolver.is_defined(&name) {
                    return duplicate(text, &name);
                }
                let Some(proto) = prototype else {
                    text.push_str(";; function without prototype");
                    return Emission::Unsupported(text);
                };
                let mut deps = BTreeSet::new();
                self.write_signature(&mut text, &name, proto, &mut deps);
                Emission::Deferred(Definition::new(name, text, deps))
            }
            DeclKind::Other => Emission::Ignored,
        }
    }

    fn write_struct(
        &mut self,
        text: &mut String,
        name: &str,
        c_name: &str,
        fields: &[Field],
        deps: &mut BTreeSet<String>,
    ) {
        text.push_str(&format!("(define-cstruct {name}\n\t("));
        for (i, field) in fields.iter().enumerate() {
            let mapped = mapper::map_type(&field.ty, deps, name, &mut self.anon);
            if i > 0 {
                text.push_str("\n\t ");
            }
            if !mapped.ok {
                text.push_str(ERROR_MARKER);
            }
            text.push_str(&format!("[{} {}]", field.name, mapped.text));
        }
        text.push_str("\n))");
        text.push_str(&format!(
            "\n(define (alloc-{c_name})\n\t(cast (malloc 'raw (ctype-sizeof {name}))"
        ));
        text.push_str(&format!("\n\t      _pointer\n\t      {name}-pointer))"));
    }

    fn write_union(
        &mut self,
        text: &mut String,
        name: &str,
        fields: &[Field],
        deps: &mut BTreeSet<String>,
    ) {
        text.push_str(&format!("(define {name}\n\t(_union "));
        for (i, field) in fields.iter().enumerate() {
            let mapped = mapper::map_type(&field.ty, deps, name, &mut self.anon);
            if i > 0 {
                text.push_str("\n\t\t");
            }
            text.push_str(&mapped.marked());
        }
        text.push_str("\n))");
    }

    fn write_signature(
        &mut self,
        text: &mut String,
        name: &str,
        proto: &FnProto,
        deps: &mut BTreeSet<String>,
    ) {
        let signature = mapper::fn_signature(proto, deps, "", &mut self.anon);
        text.push_str(&format!("(define {name}\n\t{signature})"));
    }
}

fn duplicate(mut text: String, name: &str) -> Emission {
    debug!(name, "skipping duplicate definition");
    text.push_str(&format!(";; {name} already defined"));
    Emission::Duplicate(text)
}

fn write_enum(text: &mut String, name: &str, enumerators: &[Enumerator]) {
    text.push_str(&format!("(define {name}\n\t(_enum '("));
    for (i, e) in enumerators.iter().enumerate() {
        if i > 0 {
            text.push_str("\n\t\t");
        }
        text.push_str(&format!("{} = {}", e.name, e.value));
    }
    text.push_str("\n)))\n\n");

    text.push_str(&format!("(define {name}-domain\n\t'("));
    for (i, e) in enumerators.iter().enumerate() {
        if i > 0 {
            text.push_str("\n\t\t");
        }
        text.push_str(&e.name);
    }
    text.push_str("\n))");
}

/// Drop the trailing `:column` from a `file:line:column` location.
pub fn strip_column(location: &str) -> &str {
    let Some((head, column)) = location.rsplit_once(':') else {
        return location;
    };
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    match head.rsplit_once(':') {
        Some((_, line)) if numeric(line) && numeric(column) => head,
        _ => location,
    }
}
