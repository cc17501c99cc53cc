//! Racket FFI binding generation from C declarations.
//!
//! Consumes declarations in traversal order and writes an `ffi/unsafe`
//! binding module in which every definition appears after everything it
//! references.
//!
//! ## Modules
//!
//! - [`mapper`] - C type to binding-type expression mapping
//! - [`emitter`] - Per-declaration definition text
//! - [`resolver`] - Dependency-ordered emission, deferral, and finalization
//! - [`naming`] - Synthetic names for anonymous aggregates
//! - [`sink`] - Append-only output buffer
//! - [`config`] - Generation options and `rktbind.toml` loading
//! - [`generator`] - Two-phase `feed` / `finalize` driver

pub mod config;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod resolver;
pub mod sink;

// Re-export key types for convenience
pub use config::{GenConfig, DEFAULT_PREAMBLE, MODULE_LANG};
pub use emitter::{DeclarationEmitter, Emission};
pub use error::BindError;
pub use generator::{generate, GeneratedModule, GenerationReport, Generator};
pub use mapper::{map_type, Mapped};
pub use naming::AnonymousRegistry;
pub use resolver::{Definition, DependencyResolver, Finalization, Unresolved};
pub use sink::Sink;
