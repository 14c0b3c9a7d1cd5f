//! Registry of named volume fields.
use std::collections::HashMap;
use std::sync::Arc;

use crate::field::VolumeField;

/// Stores fields by unique string identifiers; bake targets refer to fields by name.
#[non_exhaustive]
pub struct FieldRegistry {
    fields: HashMap<String, Arc<dyn VolumeField>>,
}

impl FieldRegistry {
    /// Creates a new, empty [`FieldRegistry`].
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Registers a field under `id`, replacing any previous entry.
    pub fn register<F>(&mut self, id: impl Into<String>, field: F)
    where
        F: VolumeField + 'static,
    {
        self.fields.insert(id.into(), Arc::new(field));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn VolumeField>> {
        self.fields.get(id).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}
