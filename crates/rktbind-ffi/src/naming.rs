//! Synthetic names for anonymous aggregates.

use std::collections::HashMap;

use rktbind_core::DeclId;

/// Maps identity tokens of anonymous aggregates to synthetic names.
///
/// Names are `anon_1`, `anon_2`, ... in first-encounter order. Entries are
/// never removed, so one token maps to one name for the whole run.
#[derive(Debug, Default)]
pub struct AnonymousRegistry {
    names: HashMap<DeclId, String>,
    count: u32,
}

impl AnonymousRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The synthetic name for `id`, assigning the next one on first encounter.
    pub fn name_for(&mut self, id: DeclId) -> &str {
        let count = &mut self.count;
        self.names.entry(id).or_insert_with(|| {
            *count += 1;
            format!("anon_{count}")
        })
    }

    /// The synthetic name for `id` if one was already assigned.
    pub fn get(&self, id: DeclId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// Number of names assigned so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
