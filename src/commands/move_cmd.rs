//! Move command - drag a component onto a pane slot.

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, TransactionResultExt};
use crate::{FormContext, Move, MoveKind, Slot, SlotIndex};

/// Parse a drop target index: a slot number or `end`.
pub fn parse_slot_index(s: &str) -> Result<SlotIndex, String> {
    if s.eq_ignore_ascii_case("end") {
        return Ok(SlotIndex::End);
    }
    s.parse::<usize>()
        .map(SlotIndex::At)
        .map_err(|_| format!("invalid slot '{}', must be a slot number or 'end'", s))
}

/// Move `id` to a slot of `pane_id`. A pane id not yet in use starts a new pane.
pub fn move_component(ctx: &FormContext, id: &str, pane_id: &str, index: SlotIndex) -> Result<(), AppError> {
    let form_dir = super::form_dir(ctx);
    let mv = Move::locate(&ctx.list_all(), id, Slot::new(pane_id, index)).map_err(|source| AppError::Layout {
        form_dir: form_dir.clone(),
        source,
    })?;

    let kind = ctx.move_component(&mv).with_form_dir(&form_dir)?;

    match kind {
        MoveKind::NoOp => println!("{} {}", "unchanged:".bright_black(), id.cyan()),
        MoveKind::Reordered => println!("{} {} within {}", "reordered:".green(), id.cyan(), pane_id),
        MoveKind::Swapped { displaced } => println!(
            "{} {} with {}",
            "swapped:".green(),
            id.cyan(),
            displaced.cyan()
        ),
        MoveKind::Inserted { removed_placeholder } => {
            println!("{} {} into {}", "moved:".green(), id.cyan(), pane_id);
            if let Some(placeholder) = removed_placeholder {
                println!("  filled empty group ({} removed)", placeholder.bright_black());
            }
        }
    }

    Ok(())
}
