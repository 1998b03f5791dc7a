//! Preview command - renders the form as text or HTML.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::error_fmt::{AppError, IoResultExt};
use crate::render;
use crate::FormContext;

/// Print a text preview, or write an HTML preview to `html`.
pub fn preview(ctx: &FormContext, html: Option<&Path>) -> Result<(), AppError> {
    let components = ctx.list_all();
    let title = &ctx.config().title;

    match html {
        Some(path) => {
            let markup = render::render_preview_html(&components, title)?;
            std::fs::write(path, markup).with_context(&format!("failed to write {}", path.display()))?;
            println!("{} {}", "wrote:".green(), path.display().to_string().cyan());
        }
        None => print!("{}", render::render_preview(&components, title)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKind, FormConfig};
    use tempfile::TempDir;

    #[test]
    fn test_preview_writes_html() {
        let temp_dir = TempDir::new().unwrap();
        let config = FormConfig {
            title: "Signup".to_string(),
            ..Default::default()
        };
        let ctx = FormContext::new(temp_dir.path().to_path_buf(), config);
        ctx.insert("Send", ComponentKind::Button, None).unwrap();

        let out = temp_dir.path().join("preview.html");
        preview(&ctx, Some(&out)).unwrap();

        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("<title>Signup</title>"));
        assert!(html.contains(r#"data-kind="button""#));
    }
}
