//! Pane group operations: creating empty panes and new components, and
//! removing components or placeholders while keeping the layout valid.

use tracing::debug;

use super::component::{Component, ComponentKind};
use super::layout::{assign_slots, hand_off_order_key, LayoutError, PaneIndex};
use super::settings::FormConfig;

const MAX_ID_ATTEMPTS: u32 = 100;

/// Position one past the highest existing position, or 0 for an empty set.
pub fn next_position(components: &[Component]) -> i64 {
    components
        .iter()
        .filter(|c| !c.is_deleted())
        .map(|c| c.position)
        .max()
        .map_or(0, |max| max + 1)
}

/// Create the placeholder of a new empty pane.
///
/// Fails with [`LayoutError::DuplicateEmptyPane`] when an empty pane already
/// exists. The input is not modified; the caller persists the returned
/// placeholder.
pub fn create_empty_pane(components: &[Component], config: &FormConfig) -> Result<Component, LayoutError> {
    let index = PaneIndex::new(components);
    if let Some(existing) = index.empty_panes().next() {
        return Err(LayoutError::DuplicateEmptyPane {
            pane_id: existing.id.to_string(),
        });
    }

    let placeholder = Component {
        id: fresh_id(components, || Some(format!("placeholder-{}", new_ulid())))?,
        name: config.placeholder_name.clone(),
        kind: ComponentKind::Placeholder,
        content: None,
        position: next_position(components),
        pane_id: Some(fresh_pane_id(&index, &config.pane_prefix)?),
        pane_position: 0,
        deleted: false,
    };
    debug!(id = %placeholder.id, pane = ?placeholder.pane_id, "created empty pane");
    Ok(placeholder)
}

/// Create a component in a brand-new pane at the end of the form.
///
/// Placeholders are only ever made by [`create_empty_pane`], so asking for
/// the placeholder kind goes through it.
pub fn new_component(
    components: &[Component],
    name: &str,
    kind: ComponentKind,
    content: Option<String>,
    config: &FormConfig,
) -> Result<Component, LayoutError> {
    if kind == ComponentKind::Placeholder {
        return create_empty_pane(components, config);
    }

    let index = PaneIndex::new(components);
    let prefix = kind.id_prefix();
    let component = Component {
        id: fresh_id(components, || {
            petname::petname(2, "-").map(|words| format!("{}-{}", prefix, words))
        })?,
        name: name.trim().to_string(),
        kind,
        content: content.filter(|c| !c.trim().is_empty()),
        position: next_position(components),
        pane_id: Some(fresh_pane_id(&index, &config.pane_prefix)?),
        pane_position: 0,
        deleted: false,
    };
    debug!(id = %component.id, kind = %component.kind, "created component");
    Ok(component)
}

/// Remove a component and close the gap it leaves in its pane.
///
/// A pane emptied this way simply stops existing; no placeholder is created.
pub fn remove_component(components: &[Component], id: &str) -> Result<Vec<Component>, LayoutError> {
    let target = find_live(components, id)?;
    let index = PaneIndex::new(components);

    let mut out: Vec<Component> = components.iter().filter(|c| c.id != id).cloned().collect();

    if let (Some(pane_id), false) = (target.pane_id.as_deref(), target.is_placeholder()) {
        let remaining: Vec<&str> = index
            .members(pane_id)
            .iter()
            .filter(|c| c.id != id)
            .map(|c| c.id.as_str())
            .collect();
        assign_slots(&mut out, pane_id, &remaining);
        hand_off_order_key(&mut out, &remaining, target.position);
        debug!(id, pane = pane_id, remaining = remaining.len(), "removed component");
    }

    Ok(out)
}

/// Remove a placeholder, discarding its empty pane.
pub fn remove_placeholder(components: &[Component], id: &str) -> Result<Vec<Component>, LayoutError> {
    let target = find_live(components, id)?;
    if !target.is_placeholder() {
        return Err(LayoutError::NotAPlaceholder(id.to_string()));
    }
    Ok(components.iter().filter(|c| c.id != id).cloned().collect())
}

fn find_live<'a>(components: &'a [Component], id: &str) -> Result<&'a Component, LayoutError> {
    components
        .iter()
        .find(|c| c.id == id && !c.is_deleted())
        .ok_or_else(|| LayoutError::ComponentNotFound(id.to_string()))
}

fn new_ulid() -> String {
    ulid::Ulid::new().to_string().to_lowercase()
}

fn fresh_pane_id(index: &PaneIndex<'_>, prefix: &str) -> Result<String, LayoutError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = format!("{}-{}", prefix, new_ulid());
        if index.pane(&candidate).is_none() {
            return Ok(candidate);
        }
    }

    Err(LayoutError::IdGenerationFailed {
        attempts: MAX_ID_ATTEMPTS,
    })
}

fn fresh_id<F>(components: &[Component], mut generate: F) -> Result<String, LayoutError>
where
    F: FnMut() -> Option<String>,
{
    for _ in 0..MAX_ID_ATTEMPTS {
        let Some(candidate) = generate() else {
            continue;
        };
        if components.iter().all(|c| c.id != candidate) {
            return Ok(candidate);
        }
    }

    Err(LayoutError::IdGenerationFailed {
        attempts: MAX_ID_ATTEMPTS,
    })
}
