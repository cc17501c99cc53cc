//! Dependency-ordered emission.
//!
//! Every translated name is either ready (its text is in the output) or
//! pending (waiting for dependencies). A definition is written only once
//! all of its dependencies are ready or predefined, so the output never
//! refers forward.
//!
//! [`DependencyResolver::rescan`] makes a single pass over the pending
//! entries; a chain unblocked in one pass may need several passes to
//! drain. [`DependencyResolver::finalize`] drains completely, then forces
//! opaque placeholders whose only missing dependency is [`SENTINEL`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::mapper::VOID_ALIAS;
use crate::sink::Sink;

/// Dependency of an opaque placeholder for an incomplete record.
///
/// Never defined by the module itself, so a placeholder stays pending
/// until finalization forces it.
pub const SENTINEL: &str = VOID_ALIAS;

/// A translated definition waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    /// Translated name.
    pub name: String,
    /// Complete definition text.
    pub text: String,
    /// Names the text refers to.
    pub dependencies: BTreeSet<String>,
}

impl Definition {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        dependencies: BTreeSet<String>,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            dependencies,
        }
    }
}

/// A name left pending after finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Translated name.
    pub name: String,
    /// Dependencies that never became ready.
    pub missing: Vec<String>,
}

/// Outcome of [`DependencyResolver::finalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finalization {
    /// Placeholders written by the forced rule, in order.
    pub postponed: Vec<String>,
    /// Names never written.
    pub unresolved: Vec<Unresolved>,
}

#[derive(Debug)]
struct PendingEntry {
    text: String,
    dependencies: BTreeSet<String>,
    outstanding: BTreeSet<String>,
}

/// Tracks ready and pending names and writes definitions as they resolve.
#[derive(Debug)]
pub struct DependencyResolver {
    ready: BTreeSet<String>,
    predefined: BTreeSet<String>,
    pending: BTreeMap<String, PendingEntry>,
    emitted: usize,
}

impl DependencyResolver {
    /// Create a resolver that treats `predefined` names as always satisfied.
    pub fn new<I, S>(predefined: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ready: BTreeSet::new(),
            predefined: predefined.into_iter().map(Into::into).collect(),
            pending: BTreeMap::new(),
            emitted: 0,
        }
    }

    /// Whether a definition was ever registered under `name`.
    pub fn is_defined(&self, name: &str) -> bool {
        self.ready.contains(name) || self.pending.contains_key(name)
    }

    /// Whether `name` is bound outside the generated definitions.
    pub fn is_predefined(&self, name: &str) -> bool {
        self.predefined.contains(name)
    }

    /// Whether `name` has been written.
    pub fn is_ready(&self, name: &str) -> bool {
        self.ready.contains(name)
    }

    /// Whether `name` is waiting for dependencies.
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    /// Missing dependencies of a pending name, as of the last rescan.
    pub fn outstanding(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.pending.get(name).map(|entry| &entry.outstanding)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of definitions written so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Register a definition; returns `true` if it was written immediately.
    ///
    /// A name registered again replaces its earlier definition and is no
    /// longer ready until the replacement is written.
    pub fn register(&mut self, def: Definition, out: &mut Sink) -> bool {
        self.ready.remove(&def.name);
        if def.dependencies.is_empty() {
            self.pending.remove(&def.name);
            self.write(def.name, &def.text, out);
            return true;
        }
        debug!(name = %def.name, deps = ?def.dependencies, "deferring definition");
        self.pending.insert(
            def.name,
            PendingEntry {
                text: def.text,
                outstanding: def.dependencies.clone(),
                dependencies: def.dependencies,
            },
        );
        false
    }

    /// One pass over the pending entries, writing those whose dependencies
    /// are now all ready or predefined. Returns how many were written.
    pub fn rescan(&mut self, out: &mut Sink) -> usize {
        let names: Vec<String> = self.pending.keys().cloned().collect();
        let mut flushed = 0;
        for name in names {
            let Some(entry) = self.pending.get_mut(&name) else {
                continue;
            };
            entry.outstanding = entry
                .dependencies
                .iter()
                .filter(|dep| !self.ready.contains(*dep) && !self.predefined.contains(*dep))
                .cloned()
                .collect();
            if !entry.outstanding.is_empty() {
                continue;
            }
            if let Some(entry) = self.pending.remove(&name) {
                trace!(name = %name, "dependencies satisfied");
                self.write(name, &entry.text, out);
                flushed += 1;
            }
        }
        flushed
    }

    /// Drain the pending set, force sentinel-only placeholders, and report
    /// whatever is left.
    ///
    /// Each forced placeholder leaves the pending set, so this runs at most
    /// once per pending entry. Remaining entries are reported as comments,
    /// never written as definitions.
    pub fn finalize(&mut self, out: &mut Sink) -> Finalization {
        let mut result = Finalization::default();
        loop {
            while self.rescan(out) > 0 {}

            let forced = self
                .pending
                .iter()
                .find(|(_, entry)| is_sentinel_only(&entry.outstanding))
                .map(|(name, _)| name.clone());
            let Some(name) = forced else {
                break;
            };
            if let Some(entry) = self.pending.remove(&name) {
                warn!(name = %name, "emitting opaque placeholder for incomplete type");
                out.write_raw(";; postponed\n");
                self.write(name.clone(), &entry.text, out);
                result.postponed.push(name);
            }
        }

        for (name, entry) in std::mem::take(&mut self.pending) {
            let missing: Vec<String> = entry.outstanding.into_iter().collect();
            warn!(name = %name, missing = ?missing, "definition left unresolved");
            let mut diagnostic = format!(";; pending:   {name}\n;; missing ->");
            for dep in &missing {
                diagnostic.push(' ');
                diagnostic.push_str(dep);
            }
            diagnostic.push_str("\n\n\n");
            out.write_raw(&diagnostic);
            result.unresolved.push(Unresolved { name, missing });
        }
        result
    }

    fn write(&mut self, name: String, text: &str, out: &mut Sink) {
        out.write_block(text);
        self.ready.insert(name);
        self.emitted += 1;
    }
}

fn is_sentinel_only(outstanding: &BTreeSet<String>) -> bool {
    outstanding.len() == 1 && outstanding.contains(SENTINEL)
}
