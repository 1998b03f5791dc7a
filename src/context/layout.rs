//! Read-side pane derivations over a component collection.
//!
//! Panes are never stored. A pane is the group of components sharing a
//! `pane_id`, and [`PaneIndex`] is rebuilt from a snapshot whenever it is
//! needed. The planner, the pane group manager, the invariant checks and the
//! renderers all group through this one index so they always agree.

use std::collections::BTreeMap;

use thiserror::Error;

use super::component::Component;

/// Most real (non-placeholder) components a pane can hold.
pub const PANE_CAPACITY: usize = 2;

/// Errors raised by layout operations (planning moves, managing panes).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("component '{0}' not found")]
    ComponentNotFound(String),
    #[error("an empty group already exists (pane '{pane_id}')")]
    DuplicateEmptyPane { pane_id: String },
    #[error("pane '{pane_id}' is full ({occupants} components)")]
    PaneCapacityExceeded { pane_id: String, occupants: usize },
    #[error("slot {slot} is not a valid drop target (expected 0, 1 or end)")]
    InvalidMoveTarget { slot: usize },
    #[error("invalid pane id '{0}'")]
    InvalidPaneId(String),
    #[error("component '{0}' is not a placeholder")]
    NotAPlaceholder(String),
    #[error("failed to generate a unique id after {attempts} attempts")]
    IdGenerationFailed { attempts: u32 },
}

/// Fill state of a pane.
///
/// A pane only moves between states through planner and pane group
/// operations; nothing else touches placement fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneState {
    /// No real members, kept alive by a placeholder.
    EmptyWithPlaceholder,
    /// One real member.
    PartiallyFilled,
    /// Two (or, in a broken layout, more) real members.
    Full,
}

/// A derived pane: its real members in slot order plus any placeholders.
#[derive(Debug, Clone)]
pub struct Pane<'a> {
    pub id: &'a str,
    pub members: Vec<&'a Component>,
    pub placeholders: Vec<&'a Component>,
}

impl<'a> Pane<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            id,
            members: Vec::new(),
            placeholders: Vec::new(),
        }
    }

    pub fn state(&self) -> PaneState {
        match self.members.len() {
            0 => PaneState::EmptyWithPlaceholder,
            1 => PaneState::PartiallyFilled,
            _ => PaneState::Full,
        }
    }

    /// True for a pane holding only placeholders.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= PANE_CAPACITY
    }

    /// Minimum `position` among the real members.
    ///
    /// This decides where the pane sits relative to other panes. Empty panes
    /// have no order key and are displayed after every filled pane.
    pub fn order_key(&self) -> Option<i64> {
        self.members.iter().map(|c| c.position).min()
    }

    /// Position to hand a component that joins this pane without moving it
    /// in display order: the order key, or the placeholder's position for an
    /// empty pane.
    pub fn anchor_position(&self) -> Option<i64> {
        self.order_key()
            .or_else(|| self.placeholders.iter().map(|c| c.position).min())
    }

    /// Visual index of a real member.
    pub fn index_of(&self, component_id: &str) -> Option<usize> {
        self.members.iter().position(|c| c.id == component_id)
    }

    /// Slot numbers of the real members, in slot order.
    pub fn slots(&self) -> Vec<usize> {
        self.members.iter().map(|c| c.pane_position).collect()
    }
}

/// Index from pane id to pane, rebuilt from a component snapshot.
#[derive(Debug, Clone, Default)]
pub struct PaneIndex<'a> {
    panes: BTreeMap<&'a str, Pane<'a>>,
    unplaced: Vec<&'a Component>,
}

impl<'a> PaneIndex<'a> {
    pub fn new<I>(components: I) -> Self
    where
        I: IntoIterator<Item = &'a Component>,
    {
        let mut panes: BTreeMap<&'a str, Pane<'a>> = BTreeMap::new();
        let mut unplaced = Vec::new();

        for component in components {
            if component.is_deleted() {
                continue;
            }
            let Some(pane_id) = component.pane_id.as_deref() else {
                unplaced.push(component);
                continue;
            };
            let pane = panes.entry(pane_id).or_insert_with(|| Pane::new(pane_id));
            if component.is_placeholder() {
                pane.placeholders.push(component);
            } else {
                pane.members.push(component);
            }
        }

        for pane in panes.values_mut() {
            pane.members.sort_by(|a, b| slot_order(a, b));
            pane.placeholders.sort_by(|a, b| a.id.cmp(&b.id));
        }
        unplaced.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));

        Self { panes, unplaced }
    }

    pub fn pane(&self, pane_id: &str) -> Option<&Pane<'a>> {
        self.panes.get(pane_id)
    }

    /// Real members of a pane in slot order. Empty for unknown panes.
    pub fn members(&self, pane_id: &str) -> &[&'a Component] {
        self.panes
            .get(pane_id)
            .map(|p| p.members.as_slice())
            .unwrap_or(&[])
    }

    /// All pane ids, sorted lexically.
    pub fn pane_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.panes.keys().copied()
    }

    /// Panes in display order.
    ///
    /// Filled panes are ordered by their order key (ties by pane id); empty
    /// panes follow, ordered by the placeholder's position.
    pub fn ordered(&self) -> Vec<&Pane<'a>> {
        let mut panes: Vec<&Pane<'a>> = self.panes.values().collect();
        panes.sort_by(|a, b| {
            let key_a = (a.order_key().is_none(), a.anchor_position());
            let key_b = (b.order_key().is_none(), b.anchor_position());
            key_a.cmp(&key_b).then_with(|| a.id.cmp(b.id))
        });
        panes
    }

    /// Panes holding only placeholders.
    pub fn empty_panes(&self) -> impl Iterator<Item = &Pane<'a>> + '_ {
        self.panes.values().filter(|p| p.is_empty())
    }

    /// Components with no pane, in `position` order.
    pub fn unplaced(&self) -> &[&'a Component] {
        &self.unplaced
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }
}

/// Place the listed components into `pane_id`, numbering their slots 0..k in
/// list order.
pub(crate) fn assign_slots(components: &mut [Component], pane_id: &str, order: &[&str]) {
    for (slot, id) in order.iter().enumerate() {
        if let Some(component) = components.iter_mut().find(|c| c.id == *id) {
            component.pane_id = Some(pane_id.to_string());
            component.pane_position = slot;
        }
    }
}

/// Keep a pane's order key when a member carrying it leaves.
///
/// If `departing` was below every remaining member's position, the remaining
/// member with the lowest position takes it over.
pub(crate) fn hand_off_order_key(components: &mut [Component], remaining: &[&str], departing: i64) {
    let heir = components
        .iter_mut()
        .filter(|c| remaining.contains(&c.id.as_str()))
        .min_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));

    if let Some(heir) = heir {
        if heir.position > departing {
            heir.position = departing;
        }
    }
}

/// Ordering of members inside a pane: slot, then global position, then id.
fn slot_order(a: &Component, b: &Component) -> std::cmp::Ordering {
    a.pane_position
        .cmp(&b.pane_position)
        .then_with(|| a.position.cmp(&b.position))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::component::ComponentKind;

    pub(crate) fn make_component(id: &str, pane: &str, slot: usize, position: i64) -> Component {
        Component {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: ComponentKind::Text,
            content: None,
            position,
            pane_id: Some(pane.to_string()),
            pane_position: slot,
            deleted: false,
        }
    }

    pub(crate) fn make_placeholder(id: &str, pane: &str, position: i64) -> Component {
        Component {
            kind: ComponentKind::Placeholder,
            name: "Empty Group Placeholder".to_string(),
            ..make_component(id, pane, 0, position)
        }
    }

    #[test]
    fn test_members_sorted_by_slot() {
        let components = vec![
            make_component("b", "p1", 1, 0),
            make_component("a", "p1", 0, 1),
        ];
        let index = PaneIndex::new(&components);
        let ids: Vec<&str> = index.members("p1").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(index.members("missing").is_empty());
    }

    #[test]
    fn test_pane_states() {
        let components = vec![
            make_component("a", "full", 0, 0),
            make_component("b", "full", 1, 1),
            make_component("c", "half", 0, 2),
            make_placeholder("ph", "empty", 3),
        ];
        let index = PaneIndex::new(&components);
        assert_eq!(index.pane("full").map(Pane::state), Some(PaneState::Full));
        assert_eq!(index.pane("half").map(Pane::state), Some(PaneState::PartiallyFilled));
        assert_eq!(
            index.pane("empty").map(Pane::state),
            Some(PaneState::EmptyWithPlaceholder)
        );
        assert!(index.pane("full").is_some_and(Pane::is_full));
        assert!(index.pane("empty").is_some_and(Pane::is_empty));
        assert_eq!(index.empty_panes().count(), 1);
    }

    #[test]
    fn test_display_order_by_min_position() {
        let components = vec![
            make_component("late", "p2", 0, 9),
            make_component("early", "p2", 1, 1),
            make_component("mid", "p1", 0, 4),
            make_placeholder("ph", "p0", 0),
        ];
        let index = PaneIndex::new(&components);
        let order: Vec<&str> = index.ordered().iter().map(|p| p.id).collect();
        assert_eq!(order, vec!["p2", "p1", "p0"]);
    }

    #[test]
    fn test_display_order_ties_broken_by_pane_id() {
        let components = vec![
            make_component("x", "pb", 0, 3),
            make_component("y", "pa", 0, 3),
        ];
        let index = PaneIndex::new(&components);
        let order: Vec<&str> = index.ordered().iter().map(|p| p.id).collect();
        assert_eq!(order, vec!["pa", "pb"]);
    }

    #[test]
    fn test_unplaced_and_deleted_components() {
        let mut loose = make_component("loose", "p1", 0, 2);
        loose.pane_id = None;
        let mut gone = make_component("gone", "p1", 1, 3);
        gone.deleted = true;
        let components = vec![make_component("a", "p1", 0, 1), loose, gone];

        let index = PaneIndex::new(&components);
        assert_eq!(index.unplaced().len(), 1);
        assert_eq!(index.unplaced()[0].id, "loose");
        assert_eq!(index.members("p1").len(), 1);
        assert_eq!(index.pane_ids().collect::<Vec<_>>(), vec!["p1"]);
    }

    #[test]
    fn test_anchor_position_uses_placeholder_for_empty_pane() {
        let components = vec![make_placeholder("ph", "p1", 7)];
        let index = PaneIndex::new(&components);
        let pane = index.pane("p1").unwrap();
        assert_eq!(pane.order_key(), None);
        assert_eq!(pane.anchor_position(), Some(7));
    }
}
