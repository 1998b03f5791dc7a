//! Discard command - remove the placeholder of an empty group.

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, TransactionResultExt};
use crate::FormContext;

/// Discard an empty group. Accepts the placeholder id or its pane id.
pub fn discard(ctx: &FormContext, id: &str) -> Result<(), AppError> {
    let placeholder_id = ctx
        .list_all()
        .into_iter()
        .find(|c| c.is_placeholder() && c.in_pane(id))
        .map(|c| c.id)
        .unwrap_or_else(|| id.to_string());

    ctx.discard_placeholder(&placeholder_id)
        .with_form_dir(&super::form_dir(ctx))?;

    println!("{} {}", "discarded:".red(), placeholder_id.bright_black());

    Ok(())
}
