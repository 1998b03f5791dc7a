use std::collections::HashMap;

use super::component::{Component, Placement};

/// An operation to be applied to the component store.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Insert a new component.
    Insert(Component),
    /// Overwrite the placement fields of an existing component.
    Update(Placement),
    /// Delete a component by ID.
    Delete(String),
}

/// A transaction accumulating operations to be applied atomically.
///
/// Operations are validated together when the transaction is committed.
/// If validation fails, no changes are applied.
#[derive(Debug)]
pub struct Transaction {
    base_version: u64,
    ops: Vec<Op>,
}

impl Transaction {
    /// Create a new transaction with the given base version.
    pub(super) fn new(base_version: u64) -> Self {
        Self {
            base_version,
            ops: Vec::new(),
        }
    }

    /// Get the base version this transaction was created from.
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    /// Get the operations in this transaction.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Consume the transaction and return the operations.
    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Add an insert operation.
    pub fn insert(&mut self, component: Component) {
        self.ops.push(Op::Insert(component));
    }

    /// Add a placement update operation.
    pub fn update(&mut self, placement: Placement) {
        self.ops.push(Op::Update(placement));
    }

    /// Add a delete operation.
    pub fn delete(&mut self, id: impl Into<String>) {
        self.ops.push(Op::Delete(id.into()));
    }

    /// Add the ops that turn the `before` snapshot into `after`.
    ///
    /// Components whose placement changed become updates, components missing
    /// from `after` become deletes, and components only in `after` become
    /// inserts. Unchanged components produce nothing.
    pub fn record_changes(&mut self, before: &[Component], after: &[Component]) {
        let previous: HashMap<&str, &Component> =
            before.iter().map(|c| (c.id.as_str(), c)).collect();
        let next: HashMap<&str, &Component> = after.iter().map(|c| (c.id.as_str(), c)).collect();

        for component in before {
            if !next.contains_key(component.id.as_str()) {
                self.delete(component.id.as_str());
            }
        }

        for component in after {
            match previous.get(component.id.as_str()) {
                Some(old) if old.placement() == component.placement() => {}
                Some(_) => self.update(component.placement()),
                None => self.insert(component.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::layout::tests::{make_component, make_placeholder};

    #[test]
    fn test_record_changes_unchanged_is_empty() {
        let components = vec![make_component("a", "p1", 0, 0)];
        let mut txn = Transaction::new(0);
        txn.record_changes(&components, &components);
        assert!(txn.is_empty());
    }

    #[test]
    fn test_record_changes_update_and_delete() {
        let before = vec![
            make_component("a", "p1", 0, 0),
            make_component("b", "p2", 0, 1),
            make_placeholder("ph", "p3", 2),
        ];
        let mut moved = make_component("a", "p3", 0, 2);
        moved.name = "A".to_string();
        let after = vec![moved, make_component("b", "p2", 0, 1)];

        let mut txn = Transaction::new(3);
        txn.record_changes(&before, &after);

        assert_eq!(txn.base_version(), 3);
        assert_eq!(
            txn.ops(),
            &[
                Op::Delete("ph".to_string()),
                Op::Update(Placement {
                    id: "a".to_string(),
                    position: 2,
                    pane_id: Some("p3".to_string()),
                    pane_position: 0,
                }),
            ]
        );
    }

    #[test]
    fn test_record_changes_insert() {
        let before = vec![];
        let after = vec![make_placeholder("ph", "p1", 0)];
        let mut txn = Transaction::new(0);
        txn.record_changes(&before, &after);
        assert!(matches!(txn.into_ops().as_slice(), [Op::Insert(c)] if c.id == "ph"));
    }
}
