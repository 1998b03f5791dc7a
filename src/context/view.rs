use std::collections::{HashMap, HashSet};

use super::component::Component;
use super::store::ComponentStore;
use super::transaction::Op;

/// Trait for types that provide a view of the component set.
///
/// This allows validation logic to work with the stored set, a plain slice
/// snapshot, and a ValidationView that shows proposed changes.
pub trait LayoutView {
    /// Get a component by ID.
    fn get(&self, id: &str) -> Option<&Component>;

    /// Check if a component exists.
    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over all live components.
    fn values(&self) -> Box<dyn Iterator<Item = &Component> + '_>;

    /// Get the number of components.
    fn len(&self) -> usize {
        self.values().count()
    }

    /// Check if the view is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LayoutView for ComponentStore {
    fn get(&self, id: &str) -> Option<&Component> {
        ComponentStore::get(self, id).filter(|c| !c.is_deleted())
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Component> + '_> {
        Box::new(ComponentStore::values(self).filter(|c| !c.is_deleted()))
    }
}

impl LayoutView for [Component] {
    fn get(&self, id: &str) -> Option<&Component> {
        self.iter().find(|c| c.id == id && !c.is_deleted())
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Component> + '_> {
        Box::new(self.iter().filter(|c| !c.is_deleted()))
    }
}

/// A view of the stored components with a transaction's operations overlaid.
///
/// This allows validation to see what the layout would look like after
/// applying a transaction, without actually modifying the store. Ops naming
/// unknown components are skipped here; commit rejects them separately.
pub struct ValidationView<'a> {
    base: &'a ComponentStore,
    overlay: HashMap<String, Component>,
    deletes: HashSet<&'a str>,
}

impl<'a> ValidationView<'a> {
    /// Create a new validation view by overlaying operations on the base store.
    pub fn new(base: &'a ComponentStore, ops: &'a [Op]) -> Self {
        let mut overlay: HashMap<String, Component> = HashMap::new();
        let mut deletes: HashSet<&'a str> = HashSet::new();

        for op in ops {
            match op {
                Op::Insert(component) => {
                    deletes.remove(component.id.as_str());
                    overlay.insert(component.id.clone(), component.clone());
                }
                Op::Update(placement) => {
                    if deletes.contains(placement.id.as_str()) {
                        continue;
                    }
                    let current = overlay
                        .get(&placement.id)
                        .cloned()
                        .or_else(|| LayoutView::get(base, &placement.id).cloned());
                    if let Some(mut component) = current {
                        component.apply_placement(placement);
                        overlay.insert(component.id.clone(), component);
                    }
                }
                Op::Delete(id) => {
                    overlay.remove(id);
                    deletes.insert(id.as_str());
                }
            }
        }

        Self {
            base,
            overlay,
            deletes,
        }
    }
}

impl LayoutView for ValidationView<'_> {
    fn get(&self, id: &str) -> Option<&Component> {
        // Explicitly deleted in this transaction
        if self.deletes.contains(id) {
            return None;
        }
        if let Some(component) = self.overlay.get(id) {
            return Some(component);
        }
        LayoutView::get(self.base, id)
    }

    fn values(&self) -> Box<dyn Iterator<Item = &Component> + '_> {
        let base_iter = ComponentStore::values(self.base).filter(|c| {
            !c.is_deleted()
                && !self.deletes.contains(c.id.as_str())
                && !self.overlay.contains_key(&c.id)
        });

        Box::new(base_iter.chain(self.overlay.values()))
    }
}
