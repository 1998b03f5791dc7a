//! Check command - validates the layout, or a component file against it.

use std::path::Path;

use crate::error_fmt::{AppError, IoResultExt, ParseResultExt};
use crate::{parse, validate_layout, FormContext, PaneIndex};

/// Validate the stored layout.
///
/// With `file`, parse that component file and check the layout as it would
/// be with the file saved into the form.
pub fn check(ctx: &FormContext, file: Option<&Path>) -> Result<(), AppError> {
    let mut components = ctx.list_all();

    match file {
        Some(path) => {
            let path_str = path.display().to_string();
            let content = std::fs::read_to_string(path).with_context(&format!("failed to read {}", path_str))?;
            let candidate = parse(&content).with_path(&path_str)?;
            let id = candidate.id.clone();

            components.retain(|c| c.id != id);
            components.push(candidate);
            validate_layout(components.as_slice()).map_err(|source| AppError::Validation {
                form_dir: super::form_dir(ctx),
                source,
            })?;
            println!("ok: component '{}' is valid", id);
        }
        None => {
            if components.is_empty() {
                println!("No components found");
                return Ok(());
            }
            validate_layout(components.as_slice()).map_err(|source| AppError::Validation {
                form_dir: super::form_dir(ctx),
                source,
            })?;
            println!(
                "ok: {} components in {} panes validated",
                components.len(),
                PaneIndex::new(&components).len()
            );
        }
    }

    Ok(())
}
