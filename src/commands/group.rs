//! Group command - add an empty group at the end of the form.

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, TransactionResultExt};
use crate::FormContext;

pub fn group(ctx: &FormContext) -> Result<(), AppError> {
    let placeholder = ctx.create_empty_pane().with_form_dir(&super::form_dir(ctx))?;

    let pane_id = placeholder.pane_id.as_deref().unwrap_or_default();
    println!("{} {}", "created empty group:".green(), pane_id.bold());
    println!(
        "  Drop a component into it: {}",
        format!("formpane move <id> {}", pane_id).cyan()
    );

    Ok(())
}
