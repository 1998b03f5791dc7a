use std::collections::HashSet;

use thiserror::Error;

use super::component::is_valid_id;
use super::layout::{PaneIndex, PANE_CAPACITY};
use super::view::LayoutView;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("pane '{pane_id}' has more than one component in slot {slot}")]
    DuplicateSlot { pane_id: String, slot: usize },
    #[error("pane '{pane_id}' holds {count} components (a pane holds at most two)")]
    PaneOverCapacity { pane_id: String, count: usize },
    #[error("more than one empty group exists: {}", .pane_ids.join(", "))]
    MultipleEmptyPanes { pane_ids: Vec<String> },
    #[error("pane '{pane_id}' has non-contiguous slots {slots:?}")]
    SlotGap { pane_id: String, slots: Vec<usize> },
    #[error("placeholder '{placeholder_id}' shares pane '{pane_id}' with real components")]
    PlaceholderInFilledPane {
        pane_id: String,
        placeholder_id: String,
    },
    #[error("placeholder '{0}' does not belong to any pane")]
    PlaceholderWithoutPane(String),
    #[error("duplicate component id '{0}'")]
    DuplicateComponentId(String),
    #[error("invalid component id '{0}'")]
    InvalidComponentId(String),
    #[error("component '{component_id}' names an invalid pane id '{pane_id}'")]
    InvalidPaneId { component_id: String, pane_id: String },
}

/// Validates a LayoutView (ComponentStore, ValidationView, or a slice).
///
/// Checks that:
/// - No two real components share a slot within a pane
/// - No pane holds more than two real components
/// - At most one pane is empty (placeholder only)
/// - Real slots in each pane run 0..k without gaps
/// - Placeholders never share a pane with real components
/// - Every placeholder belongs to a pane
/// - Component and pane ids are well formed
///
/// Global positions are not checked: they only order panes and may repeat
/// or skip values.
pub fn validate_layout<V: LayoutView + ?Sized>(view: &V) -> Result<(), ValidationError> {
    for component in view.values() {
        if !is_valid_id(&component.id) {
            return Err(ValidationError::InvalidComponentId(component.id.clone()));
        }
        if let Some(pane_id) = component.pane_id.as_deref().filter(|p| !is_valid_id(p)) {
            return Err(ValidationError::InvalidPaneId {
                component_id: component.id.clone(),
                pane_id: pane_id.to_string(),
            });
        }
    }

    let index = PaneIndex::new(view.values());

    if let Some(loose) = index.unplaced().iter().find(|c| c.is_placeholder()) {
        return Err(ValidationError::PlaceholderWithoutPane(loose.id.clone()));
    }

    for pane in index.ordered() {
        let slots = pane.slots();

        let mut seen = HashSet::new();
        for &slot in &slots {
            if !seen.insert(slot) {
                return Err(ValidationError::DuplicateSlot {
                    pane_id: pane.id.to_string(),
                    slot,
                });
            }
        }

        if pane.members.len() > PANE_CAPACITY {
            return Err(ValidationError::PaneOverCapacity {
                pane_id: pane.id.to_string(),
                count: pane.members.len(),
            });
        }

        // Members are sorted by slot, so contiguity means slot i sits at index i.
        if slots.iter().enumerate().any(|(i, &slot)| slot != i) {
            return Err(ValidationError::SlotGap {
                pane_id: pane.id.to_string(),
                slots,
            });
        }

        if !pane.is_empty() {
            if let Some(placeholder) = pane.placeholders.first() {
                return Err(ValidationError::PlaceholderInFilledPane {
                    pane_id: pane.id.to_string(),
                    placeholder_id: placeholder.id.clone(),
                });
            }
        }
    }

    let empty: Vec<String> = index.empty_panes().map(|p| p.id.to_string()).collect();
    if empty.len() > 1 {
        return Err(ValidationError::MultipleEmptyPanes { pane_ids: empty });
    }

    Ok(())
}
