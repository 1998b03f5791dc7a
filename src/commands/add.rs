//! Add command - create a component in a new pane at the end of the form.

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, TransactionResultExt};
use crate::{ComponentKind, FormContext};

pub fn add(ctx: &FormContext, kind: &str, name: &str, content: Option<String>) -> Result<(), AppError> {
    let kind = ComponentKind::parse(kind);
    let component = ctx.insert(name, kind, content).with_form_dir(&super::form_dir(ctx))?;

    println!("{} {}", "added:".green(), component.id.cyan().bold());
    if let Some(pane_id) = &component.pane_id {
        println!("  pane: {}", pane_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormConfig;
    use tempfile::TempDir;

    #[test]
    fn test_add_persists_component() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = FormContext::new(temp_dir.path().to_path_buf(), FormConfig::default());

        add(&ctx, "Short Text", "Nickname", None).unwrap();

        let components = ctx.list_all();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind, ComponentKind::ShortText);
        assert!(components[0].id.starts_with("short_text-"));
    }

    #[test]
    fn test_add_placeholder_kind_respects_single_empty_group() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = FormContext::new(temp_dir.path().to_path_buf(), FormConfig::default());

        add(&ctx, "placeholder", "ignored", None).unwrap();
        let err = add(&ctx, "placeholder", "ignored", None).unwrap_err();
        assert!(matches!(err, AppError::Layout { .. }));
    }
}
