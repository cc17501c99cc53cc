//! Two-phase generation driver.
//!
//! [`Generator::feed`] is called once per declaration in traversal order;
//! [`Generator::finalize`] is called once after the last one. The preamble
//! is written when the generator is created.

use rktbind_core::Declaration;
use tracing::{debug, info};

use crate::config::GenConfig;
use crate::emitter::{DeclarationEmitter, Emission};
use crate::resolver::{DependencyResolver, Unresolved};
use crate::sink::Sink;

/// Counters and leftovers of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Declarations fed.
    pub declarations: usize,
    /// Definitions written, including postponed placeholders.
    pub emitted: usize,
    /// Placeholders written by the forced rule.
    pub postponed: Vec<String>,
    /// Declarations skipped as already defined, including predefined names.
    pub duplicates: usize,
    /// Declarations written only as an explanatory comment.
    pub unsupported: usize,
    /// Declarations skipped by an exclusion pattern.
    pub excluded: usize,
    /// Definitions never written.
    pub unresolved: Vec<Unresolved>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl std::fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} declarations, {} definitions ({} postponed), {} duplicates, ",
            self.declarations,
            self.emitted,
            self.postponed.len(),
            self.duplicates
        )?;
        write!(
            f,
            "{} unsupported, {} excluded, {} unresolved",
            self.unsupported,
            self.excluded,
            self.unresolved.len()
        )
    }
}

/// A finished binding module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Module text.
    pub text: String,
    /// What happened while producing it.
    pub report: GenerationReport,
}

/// Owns all state of one generation run.
#[derive(Debug)]
pub struct Generator {
    emitter: DeclarationEmitter,
    resolver: DependencyResolver,
    sink: Sink,
    report: GenerationReport,
}

impl Generator {
    /// Start a run, writing `preamble` first.
    pub fn new(config: &GenConfig, preamble: &str) -> Self {
        let mut sink = Sink::new();
        sink.write_raw(preamble);
        sink.write_raw("\n");
        Self {
            emitter: DeclarationEmitter::new(config.exclude.clone(), config.print_source_path),
            resolver: DependencyResolver::new(config.predefined.iter().cloned()),
            sink,
            report: GenerationReport::default(),
        }
    }

    /// Process one declaration.
    ///
    /// Pending definitions are rescanned first, so anything unblocked by the
    /// previous declaration is written before this one.
    pub fn feed(&mut self, decl: &Declaration) {
        self.report.declarations += 1;
        self.resolver.rescan(&mut self.sink);

        match self.emitter.emit(decl, &self.resolver) {
            Emission::Deferred(def) => {
                self.resolver.register(def, &mut self.sink);
            }
            Emission::Duplicate(text) => {
                self.report.duplicates += 1;
                self.sink.write_block(&text);
            }
            Emission::Unsupported(text) => {
                debug!(name = %decl.name, kind = decl.kind_label(), "unsupported declaration");
                self.report.unsupported += 1;
                self.sink.write_block(&text);
            }
            Emission::Excluded => {
                self.report.excluded += 1;
            }
            Emission::Ignored => {}
        }
    }

    /// Text written so far.
    pub fn output(&self) -> &str {
        self.sink.as_str()
    }

    /// The resolver, for inspecting pending and ready names mid-run.
    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Force what can be forced, report the rest, and return the module.
    pub fn finalize(mut self) -> GeneratedModule {
        let finalization = self.resolver.finalize(&mut self.sink);
        let mut report = self.report;
        report.emitted = self.resolver.emitted();
        report.postponed = finalization.postponed;
        report.unresolved = finalization.unresolved;
        info!(
            declarations = report.declarations,
            emitted = report.emitted,
            unresolved = report.unresolved.len(),
            anonymous = self.emitter.anonymous().len(),
            "binding generation finished"
        );
        GeneratedModule {
            text: self.sink.into_string(),
            report,
        }
    }
}

/// Run a whole generation over `declarations`.
pub fn generate<'a, I>(declarations: I, config: &GenConfig, preamble: &str) -> GeneratedModule
where
    I: IntoIterator<Item = &'a Declaration>,
{
    let mut generator = Generator::new(config, preamble);
    for decl in declarations {
        generator.feed(decl);
    }
    generator.finalize()
}
