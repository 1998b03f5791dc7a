//! Delete command - deletes a component and compacts its pane.

use std::io::Write;

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, IoResultExt, TransactionResultExt};
use crate::{FormContext, LayoutError, PaneIndex};

/// Delete a component, asking for confirmation unless `force` is set.
pub fn delete(ctx: &FormContext, id: &str, force: bool) -> Result<(), AppError> {
    let form_dir = super::form_dir(ctx);
    let components = ctx.list_all();

    let Some(component) = components.iter().find(|c| c.id == id) else {
        return Err(AppError::Layout {
            form_dir,
            source: LayoutError::ComponentNotFound(id.to_string()),
        });
    };

    let mate = component.pane_id.as_deref().and_then(|pane_id| {
        PaneIndex::new(&components)
            .members(pane_id)
            .iter()
            .find(|c| c.id != id)
            .map(|c| c.id.clone())
    });

    if !force {
        println!("{} {}", "Deleting component:".bold(), id.bright_yellow());
        match &mate {
            Some(mate) => println!("  {} will take the whole pane", mate.cyan()),
            None => println!("  Its pane will be removed."),
        }

        println!();
        print!("Continue? [y/N] ");
        std::io::stdout().flush().with_context("failed to flush stdout")?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .with_context("failed to read input")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    ctx.delete_component(id).with_form_dir(&form_dir)?;

    if let Some(mate) = &mate {
        println!("  updated: {}", mate.cyan());
    }
    println!("{} {}", "deleted:".red(), id.bright_yellow());

    Ok(())
}
