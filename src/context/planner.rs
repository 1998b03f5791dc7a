//! Reorder planner: turns a drag-and-drop move into a new component set.
//!
//! Planning is pure. The input snapshot is never mutated; the result is a
//! complete replacement set or an error, never something in between.

use std::fmt;

use tracing::{debug, warn};

use super::component::{is_valid_id, Component};
use super::layout::{assign_slots, hand_off_order_key, LayoutError, Pane, PaneIndex, PANE_CAPACITY};
use super::panes::next_position;

/// Target index inside a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotIndex {
    At(usize),
    /// After the last occupant.
    End,
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotIndex::At(i) => write!(f, "{}", i),
            SlotIndex::End => f.write_str("end"),
        }
    }
}

/// A pane and an index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub pane_id: String,
    pub index: SlotIndex,
}

impl Slot {
    pub fn new(pane_id: impl Into<String>, index: SlotIndex) -> Self {
        Self {
            pane_id: pane_id.into(),
            index,
        }
    }
}

/// A request to relocate one component.
///
/// `from` is where the caller believes the component is (None for an
/// unplaced component). The stored placement always wins; a disagreeing
/// `from` is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub component_id: String,
    pub from: Option<Slot>,
    pub to: Slot,
}

impl Move {
    /// Build a move whose source is read from the snapshot.
    pub fn locate(components: &[Component], component_id: &str, to: Slot) -> Result<Self, LayoutError> {
        let component = find_live(components, component_id)?;
        let index = PaneIndex::new(components);
        let from = component.pane_id.as_deref().map(|pane_id| {
            let visual = index
                .pane(pane_id)
                .and_then(|p| p.index_of(component_id))
                .unwrap_or(component.pane_position);
            Slot::new(pane_id, SlotIndex::At(visual))
        });

        Ok(Self {
            component_id: component_id.to_string(),
            from,
            to,
        })
    }
}

/// What a planned move did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveKind {
    /// Nothing changed.
    NoOp,
    /// Reordered inside one pane.
    Reordered,
    /// Exchanged places with the occupant of a full pane.
    Swapped { displaced: String },
    /// Joined a pane with room, dropping its placeholder if it had one.
    Inserted { removed_placeholder: Option<String> },
}

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub components: Vec<Component>,
    pub kind: MoveKind,
}

impl Plan {
    fn unchanged(components: &[Component]) -> Self {
        Self {
            components: components.to_vec(),
            kind: MoveKind::NoOp,
        }
    }
}

/// Compute the component set after `mv`.
///
/// The output differs from the input only in `position`, `pane_id` and
/// `pane_position`, plus the removal of a destination placeholder.
pub fn plan(components: &[Component], mv: &Move) -> Result<Vec<Component>, LayoutError> {
    plan_move(components, mv).map(|p| p.components)
}

/// Like [`plan`], also reporting which kind of move happened.
pub fn plan_move(components: &[Component], mv: &Move) -> Result<Plan, LayoutError> {
    let moved = find_live(components, &mv.component_id)?;

    check_index(mv.to.index)?;
    if !is_valid_id(&mv.to.pane_id) {
        return Err(LayoutError::InvalidPaneId(mv.to.pane_id.clone()));
    }
    if let Some(from) = &mv.from {
        check_index(from.index)?;
    }

    if moved.is_placeholder() {
        debug!(component = %moved.id, "placeholders are not draggable; ignoring move");
        return Ok(Plan::unchanged(components));
    }

    let index = PaneIndex::new(components);
    let source_pane = moved.pane_id.as_deref().and_then(|id| index.pane(id));
    let source_index = source_pane
        .and_then(|p| p.index_of(&moved.id))
        .unwrap_or(moved.pane_position);

    if let Some(from) = &mv.from {
        let stored = moved.pane_id.as_deref();
        if stored != Some(from.pane_id.as_str()) || from.index != SlotIndex::At(source_index) {
            warn!(
                component = %moved.id,
                claimed_pane = %from.pane_id,
                claimed_slot = %from.index,
                stored_pane = stored.unwrap_or("-"),
                stored_slot = source_index,
                "move source disagrees with stored placement; using stored placement"
            );
        }
    }

    let plan = match source_pane {
        Some(pane) if pane.id == mv.to.pane_id => reorder_within(components, pane, moved, source_index, mv.to.index),
        _ => {
            let destination = index.pane(&mv.to.pane_id);
            let occupants = index.members(&mv.to.pane_id);
            if occupants.len() >= PANE_CAPACITY {
                swap_into_full(components, &mv.to, occupants, moved)?
            } else {
                insert_into_open(components, source_pane, destination, &mv.to, moved)
            }
        }
    };

    debug!(component = %moved.id, to_pane = %mv.to.pane_id, kind = ?plan.kind, "planned move");
    Ok(plan)
}

fn find_live<'a>(components: &'a [Component], id: &str) -> Result<&'a Component, LayoutError> {
    components
        .iter()
        .find(|c| c.id == id && !c.is_deleted())
        .ok_or_else(|| LayoutError::ComponentNotFound(id.to_string()))
}

fn check_index(index: SlotIndex) -> Result<(), LayoutError> {
    match index {
        SlotIndex::At(slot) if slot >= PANE_CAPACITY => Err(LayoutError::InvalidMoveTarget { slot }),
        _ => Ok(()),
    }
}

/// Remove the component from its slot and reinsert it at `to`, renumbering
/// the pane. Global positions are left alone.
fn reorder_within(
    components: &[Component],
    pane: &Pane<'_>,
    moved: &Component,
    from: usize,
    to: SlotIndex,
) -> Plan {
    let last = pane.members.len().saturating_sub(1);
    let target = match to {
        SlotIndex::At(i) => i.min(last),
        SlotIndex::End => last,
    };

    let mut order: Vec<&str> = pane.members.iter().map(|c| c.id.as_str()).collect();
    if target == from || from >= order.len() {
        return Plan::unchanged(components);
    }

    let id = order.remove(from);
    order.insert(target, id);
    debug!(component = %moved.id, pane = %pane.id, from, to = target, "reordering within pane");

    let mut out = components.to_vec();
    assign_slots(&mut out, pane.id, &order);
    Plan {
        components: out,
        kind: MoveKind::Reordered,
    }
}

/// Exchange the moved component with the occupant of the destination slot.
///
/// Each side takes the other's pane, slot and position, so both panes keep
/// their place in display order.
fn swap_into_full(
    components: &[Component],
    to: &Slot,
    occupants: &[&Component],
    moved: &Component,
) -> Result<Plan, LayoutError> {
    let capacity_error = || LayoutError::PaneCapacityExceeded {
        pane_id: to.pane_id.clone(),
        occupants: occupants.len(),
    };

    if occupants.len() > PANE_CAPACITY {
        return Err(capacity_error());
    }
    let displaced = match to.index {
        SlotIndex::At(i) => occupants.get(i).copied(),
        SlotIndex::End => None,
    }
    .ok_or_else(capacity_error)?;

    let moved_placement = moved.placement();
    let displaced_placement = displaced.placement();

    let mut out = components.to_vec();
    for component in out.iter_mut() {
        if component.id == moved.id {
            component.position = displaced_placement.position;
            component.pane_id = displaced_placement.pane_id.clone();
            component.pane_position = displaced_placement.pane_position;
        } else if component.id == displaced.id {
            component.position = moved_placement.position;
            component.pane_id = moved_placement.pane_id.clone();
            component.pane_position = moved_placement.pane_position;
        }
    }

    Ok(Plan {
        components: out,
        kind: MoveKind::Swapped {
            displaced: displaced.id.clone(),
        },
    })
}

/// Insert the moved component into a pane with room.
///
/// The destination's placeholder is dropped, later occupants shift right and
/// the source pane closes the gap. The moved component adopts the
/// destination's order key (a new pane goes last), and the source pane keeps
/// its own.
fn insert_into_open(
    components: &[Component],
    source: Option<&Pane<'_>>,
    destination: Option<&Pane<'_>>,
    to: &Slot,
    moved: &Component,
) -> Plan {
    let occupants: Vec<&str> = destination
        .map(|p| p.members.iter().map(|c| c.id.as_str()).collect())
        .unwrap_or_default();
    let insert_at = match to.index {
        SlotIndex::At(i) => i.min(occupants.len()),
        SlotIndex::End => occupants.len(),
    };

    let mut dest_order = occupants;
    dest_order.insert(insert_at, moved.id.as_str());

    let removed: Vec<&str> = destination
        .map(|p| p.placeholders.iter().map(|c| c.id.as_str()).collect())
        .unwrap_or_default();

    let mut out = components.to_vec();

    if let Some(source) = source {
        let remaining: Vec<&str> = source
            .members
            .iter()
            .filter(|c| c.id != moved.id)
            .map(|c| c.id.as_str())
            .collect();
        assign_slots(&mut out, source.id, &remaining);
        hand_off_order_key(&mut out, &remaining, moved.position);
    }

    // A pane that does not exist yet is opened at the end of the form.
    let anchor = match destination {
        Some(pane) => pane.anchor_position(),
        None => Some(next_position(components)),
    };
    if let Some(anchor) = anchor {
        if let Some(component) = out.iter_mut().find(|c| c.id == moved.id) {
            component.position = anchor;
        }
    }
    assign_slots(&mut out, &to.pane_id, &dest_order);
    out.retain(|c| !removed.contains(&c.id.as_str()));

    debug!(
        component = %moved.id,
        pane = %to.pane_id,
        slot = insert_at,
        removed_placeholders = removed.len(),
        "inserting into pane"
    );

    Plan {
        components: out,
        kind: MoveKind::Inserted {
            removed_placeholder: removed.first().map(|id| id.to_string()),
        },
    }
}
