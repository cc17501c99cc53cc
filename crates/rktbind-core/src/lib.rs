//! C declaration model for the rktbind binding generator.
//!
//! The generator never parses C itself. A front-end walks a translation
//! unit and hands over an already-materialized sequence of declarations
//! in traversal order; this crate defines that sequence.
//!
//! ## Modules
//!
//! - [`types`] - C type descriptions (`CType`) referenced by declarations
//! - [`decl`] - Declarations, their kinds, and identity tokens
//! - [`unit`] - Loading a declaration sequence from JSON

pub mod decl;
pub mod error;
pub mod types;
pub mod unit;

pub use decl::{DeclId, DeclKind, Declaration, Enumerator, Field, RecordTag};
pub use error::DeclError;
pub use types::{ArrayType, CType, FnProto, TagRef};
pub use unit::DeclarationUnit;
