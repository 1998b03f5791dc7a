use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::component::{Component, ParseError, Placement};
use super::validations::{validate_layout, ValidationError};

/// Error collecting multiple issues found when reading a component store.
///
/// This allows batch error reporting - all errors are collected and reported
/// together rather than failing on the first error.
#[derive(Debug, Default)]
pub struct StoreReadError {
    pub io_errors: Vec<(PathBuf, std::io::Error)>,
    pub parse_errors: Vec<(PathBuf, ParseError)>,
    pub validation_errors: Vec<ValidationError>,
}

impl StoreReadError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.io_errors.is_empty() && self.parse_errors.is_empty() && self.validation_errors.is_empty()
    }

    pub fn add_io_error(&mut self, path: PathBuf, error: std::io::Error) {
        self.io_errors.push((path, error));
    }

    pub fn add_parse_error(&mut self, path: PathBuf, error: ParseError) {
        self.parse_errors.push((path, error));
    }

    pub fn add_validation_error(&mut self, error: ValidationError) {
        self.validation_errors.push(error);
    }

    pub fn error_count(&self) -> usize {
        self.io_errors.len() + self.parse_errors.len() + self.validation_errors.len()
    }
}

impl std::fmt::Display for StoreReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.error_count();
        writeln!(f, "Found {} error(s) while reading components:", count)?;

        for (path, error) in &self.io_errors {
            writeln!(f, "  IO error in {}: {}", path.display(), error)?;
        }

        for (path, error) in &self.parse_errors {
            writeln!(f, "  Parse error in {}: {}", path.display(), error)?;
        }

        for error in &self.validation_errors {
            writeln!(f, "  Validation error: {}", error)?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreReadError {}

/// The stored components keyed by id.
///
/// Tracks which components have been modified ("dirty") since the last save.
#[derive(Debug, Clone, Default)]
pub struct ComponentStore {
    components: HashMap<String, Component>,
    dirty: HashSet<String>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    /// Insert a component, marking it as dirty.
    pub fn insert(&mut self, component: Component) {
        self.dirty.insert(component.id.clone());
        self.components.insert(component.id.clone(), component);
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.get(id).is_some_and(|c| !c.is_deleted())
    }

    /// Overwrite the placement fields of a component, marking it dirty.
    ///
    /// Returns false if no live component has that id.
    pub fn apply_placement(&mut self, placement: &Placement) -> bool {
        match self.components.get_mut(&placement.id) {
            Some(component) if !component.is_deleted() => {
                component.apply_placement(placement);
                self.dirty.insert(placement.id.clone());
                true
            }
            _ => false,
        }
    }

    /// Mark a component as deleted (soft-delete).
    ///
    /// The component stays in the store flagged as deleted until the next
    /// save removes its file. Returns true if the component existed.
    pub fn remove(&mut self, id: &str) -> bool {
        if let Some(component) = self.components.get_mut(id) {
            component.deleted = true;
            self.dirty.insert(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Live components sorted by position, then slot, then id.
    pub fn snapshot(&self) -> Vec<Component> {
        let mut components: Vec<Component> = self
            .components
            .values()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        components.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.pane_position.cmp(&b.pane_position))
                .then_with(|| a.id.cmp(&b.id))
        });
        components
    }

    // ---- Dirty tracking methods ----

    /// Check if a specific component is dirty.
    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    /// Check if any components are dirty.
    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get all dirty components.
    pub fn dirty_components(&self) -> Vec<&Component> {
        self.dirty
            .iter()
            .filter_map(|id| self.components.get(id))
            .collect()
    }

    /// Clear all dirty flags and purge deleted components.
    ///
    /// Call this after saving to disk.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
        self.components.retain(|_, component| !component.deleted);
    }
}

impl PartialEq for ComponentStore {
    fn eq(&self, other: &Self) -> bool {
        // Only compare components, not dirty state
        self.components == other.components
    }
}

/// Build a store from parsed components and check every layout invariant.
///
/// The returned store has no dirty entries.
pub fn form_store(components: Vec<Component>) -> Result<ComponentStore, ValidationError> {
    let mut store = ComponentStore::new();
    for component in components {
        if store.get(&component.id).is_some() {
            return Err(ValidationError::DuplicateComponentId(component.id));
        }
        store.insert(component);
    }

    validate_layout(&store)?;
    store.dirty.clear();
    Ok(store)
}
