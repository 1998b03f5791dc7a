//! Core data model for the form layout.
//!
//! This module contains:
//! - `Component` - One form element and its placement
//! - `PaneIndex` - Panes derived from a component snapshot
//! - `plan` - The pure drag-and-drop reorder planner
//! - Pane group operations (empty panes, insertion, removal)
//! - `FormContext` - Main interface over a form directory
//! - `Transaction` - Atomic batch operations with validation

mod component;
mod layout;
mod panes;
mod planner;
mod settings;
mod store;
mod transaction;
pub(crate) mod validations;
mod view;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

// Re-export public types
pub use component::{is_valid_id, parse, Component, ComponentKind, ParseError, Placement};
pub use layout::{LayoutError, Pane, PaneIndex, PaneState, PANE_CAPACITY};
pub use panes::{create_empty_pane, new_component, next_position, remove_component, remove_placeholder};
pub use planner::{plan, plan_move, Move, MoveKind, Plan, Slot, SlotIndex};
pub use settings::{FormConfig, SettingsError};
pub use store::{form_store, ComponentStore, StoreReadError};
pub use transaction::{Op, Transaction};
pub use validations::{validate_layout, ValidationError};
pub use view::{LayoutView, ValidationView};

/// Name of the settings file inside a form directory.
pub const CONFIG_FILE: &str = "config.yml";

/// Internal state protected by RwLock.
struct ContextInner {
    store: ComponentStore,
    version: u64,
}

/// Central application context holding the components and configuration.
///
/// FormContext is the main entry point for all layout operations. It manages:
/// - The component store
/// - The path to the form directory and its settings
/// - Thread-safe access via RwLock
///
/// All mutations go through transactions which validate before committing.
pub struct FormContext {
    inner: RwLock<ContextInner>,
    form_dir: PathBuf,
    config: FormConfig,
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext")
            .field("form_dir", &self.form_dir)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when opening a form directory.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{0}")]
    Store(#[from] StoreReadError),

    #[error("invalid {CONFIG_FILE}: {0}")]
    Settings(#[from] SettingsError),
}

impl FormContext {
    /// Create a new FormContext with no components.
    pub fn new(form_dir: PathBuf, config: FormConfig) -> Self {
        Self {
            inner: RwLock::new(ContextInner {
                store: ComponentStore::new(),
                version: 0,
            }),
            form_dir,
            config,
        }
    }

    /// Load a FormContext from a form directory.
    ///
    /// Reads all .md files from the directory, parses them, and validates
    /// the resulting layout. Uses batch error collection - all errors are
    /// gathered and returned together rather than failing on the first error.
    pub fn load(form_dir: PathBuf) -> Result<Self, LoadError> {
        let config = FormConfig::load(&form_dir.join(CONFIG_FILE))?;

        let mut errors = StoreReadError::new();
        let mut components = Vec::new();

        let entries = match std::fs::read_dir(&form_dir) {
            Ok(entries) => entries,
            Err(e) => {
                errors.add_io_error(form_dir.clone(), e);
                return Err(errors.into());
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        for path in paths {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    errors.add_io_error(path, e);
                    continue;
                }
            };

            match parse(&content) {
                Ok(parsed) => {
                    let file_stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
                    if parsed.id == file_stem {
                        components.push(parsed);
                    } else {
                        errors.add_parse_error(path, ParseError::IdMismatch { id: parsed.id, file_stem });
                    }
                }
                Err(e) => errors.add_parse_error(path, e),
            }
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        match form_store(components) {
            Ok(store) => {
                debug!(dir = %form_dir.display(), components = store.len(), "loaded form");
                Ok(Self {
                    inner: RwLock::new(ContextInner { store, version: 0 }),
                    form_dir,
                    config,
                })
            }
            Err(e) => {
                errors.add_validation_error(e);
                Err(errors.into())
            }
        }
    }

    /// Begin a new transaction against the current version.
    pub fn begin(&self) -> Transaction {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Transaction::new(inner.version)
    }

    /// Commit a transaction, validating and applying changes atomically.
    ///
    /// If validation fails, no changes are applied and an error is returned.
    /// On success, changes are persisted to disk.
    pub fn commit(&self, txn: Transaction) -> Result<(), TransactionError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if inner.version != txn.base_version() {
            return Err(TransactionError::Conflict {
                expected: txn.base_version(),
                actual: inner.version,
            });
        }

        check_targets(&inner.store, txn.ops())?;

        let view = ValidationView::new(&inner.store, txn.ops());
        validate_layout(&view)?;

        let op_count = txn.ops().len();
        for op in txn.into_ops() {
            match op {
                Op::Insert(component) => inner.store.insert(component),
                Op::Update(placement) => {
                    inner.store.apply_placement(&placement);
                }
                Op::Delete(id) => {
                    inner.store.remove(&id);
                }
            }
        }

        inner.version += 1;

        let written = self.save_inner(&mut inner.store)?;
        info!(version = inner.version, ops = op_count, files = written, "committed transaction");

        Ok(())
    }

    /// Get read-only access to the current store.
    ///
    /// Returns a guard that holds a read lock. The store cannot be
    /// modified while this guard exists.
    pub fn store(&self) -> impl std::ops::Deref<Target = ComponentStore> + '_ {
        struct StoreGuard<'a>(std::sync::RwLockReadGuard<'a, ContextInner>);
        impl std::ops::Deref for StoreGuard<'_> {
            type Target = ComponentStore;
            fn deref(&self) -> &Self::Target {
                &self.0.store
            }
        }
        StoreGuard(self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn form_dir(&self) -> &PathBuf {
        &self.form_dir
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    // ---- Persistence operations ----

    /// All live components sorted by position, slot and id.
    pub fn list_all(&self) -> Vec<Component> {
        self.store().snapshot()
    }

    /// Create a component in a new pane at the end of the form.
    pub fn insert(
        &self,
        name: &str,
        kind: ComponentKind,
        content: Option<String>,
    ) -> Result<Component, TransactionError> {
        let (mut txn, before) = self.begin_with_snapshot();
        let component = new_component(&before, name, kind, content, &self.config)?;
        txn.insert(component.clone());
        self.commit(txn)?;
        Ok(component)
    }

    /// Overwrite the placement fields of several components at once.
    ///
    /// Either every update is applied or none is.
    pub fn apply_bulk(&self, updates: Vec<Placement>) -> Result<(), TransactionError> {
        let mut txn = self.begin();
        for placement in updates {
            txn.update(placement);
        }
        self.commit(txn)
    }

    /// Delete a single component file without touching its pane mates.
    pub fn remove(&self, id: &str) -> Result<(), TransactionError> {
        let mut txn = self.begin();
        txn.delete(id);
        self.commit(txn)
    }

    // ---- Request operations ----

    /// Plan a move against the current layout and persist the result.
    pub fn move_component(&self, mv: &Move) -> Result<MoveKind, TransactionError> {
        let (mut txn, before) = self.begin_with_snapshot();
        let planned = plan_move(&before, mv)?;

        txn.record_changes(&before, &planned.components);
        if !txn.is_empty() {
            self.commit(txn)?;
        }
        Ok(planned.kind)
    }

    /// Add an empty group at the end of the form.
    pub fn create_empty_pane(&self) -> Result<Component, TransactionError> {
        let (mut txn, before) = self.begin_with_snapshot();
        let placeholder = create_empty_pane(&before, &self.config)?;
        txn.insert(placeholder.clone());
        self.commit(txn)?;
        Ok(placeholder)
    }

    /// Delete a component and compact the pane it leaves.
    pub fn delete_component(&self, id: &str) -> Result<(), TransactionError> {
        let (mut txn, before) = self.begin_with_snapshot();
        let after = remove_component(&before, id)?;
        txn.record_changes(&before, &after);
        self.commit(txn)
    }

    /// Remove the placeholder of an empty group.
    pub fn discard_placeholder(&self, id: &str) -> Result<(), TransactionError> {
        let (mut txn, before) = self.begin_with_snapshot();
        let after = remove_placeholder(&before, id)?;
        txn.record_changes(&before, &after);
        self.commit(txn)
    }

    /// A transaction and the snapshot it is based on, read under one lock.
    fn begin_with_snapshot(&self) -> (Transaction, Vec<Component>) {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        (Transaction::new(inner.version), inner.store.snapshot())
    }

    /// Save dirty components to disk.
    fn save_inner(&self, store: &mut ComponentStore) -> Result<usize, std::io::Error> {
        let dirty: Vec<Component> = store.dirty_components().into_iter().cloned().collect();
        let count = dirty.len();

        for component in dirty {
            if !is_valid_id(&component.id) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("refusing to write component with invalid id '{}'", component.id),
                ));
            }
            let path = self.form_dir.join(format!("{}.md", component.id));
            if component.is_deleted() {
                if let Err(e) = std::fs::remove_file(&path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        return Err(e);
                    }
                }
            } else {
                std::fs::write(&path, component.to_markdown())?;
            }
        }

        store.clear_dirty();
        Ok(count)
    }
}

/// Reject updates and deletes naming components that do not exist, and
/// inserts reusing a live id.
fn check_targets(store: &ComponentStore, ops: &[Op]) -> Result<(), TransactionError> {
    let mut live: HashSet<&str> = store
        .values()
        .filter(|c| !c.is_deleted())
        .map(|c| c.id.as_str())
        .collect();

    for op in ops {
        match op {
            Op::Insert(component) => {
                if !live.insert(component.id.as_str()) {
                    return Err(ValidationError::DuplicateComponentId(component.id.clone()).into());
                }
            }
            Op::Update(placement) => {
                if !live.contains(placement.id.as_str()) {
                    return Err(TransactionError::UnknownComponent(placement.id.clone()));
                }
            }
            Op::Delete(id) => {
                if !live.remove(id.as_str()) {
                    return Err(TransactionError::UnknownComponent(id.clone()));
                }
            }
        }
    }

    Ok(())
}

/// Errors that can occur during transaction commit.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("concurrent modification: expected version {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("component '{0}' not found")]
    UnknownComponent(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
