//! Init command - create a form directory with a default config.

use std::path::Path;

use owo_colors::OwoColorize;

use crate::context::CONFIG_FILE;
use crate::error_fmt::{AppError, IoResultExt};
use crate::FormConfig;

/// Create the form directory and its `config.yml`.
///
/// An existing config is left untouched.
pub fn init(form_dir: &Path) -> Result<(), AppError> {
    let dir_display = form_dir.display().to_string();
    std::fs::create_dir_all(form_dir).with_context(&format!("failed to create {}", dir_display))?;

    let config_path = form_dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "  {} {} already exists",
            "✓".green(),
            config_path.display().to_string().cyan()
        );
    } else {
        std::fs::write(&config_path, FormConfig::default().to_yaml())
            .with_context(&format!("failed to write {}", config_path.display()))?;
        println!(
            "  {} Created {}",
            "✓".green(),
            config_path.display().to_string().cyan()
        );
    }

    println!();
    println!("{}", "Form initialized successfully!".green().bold());
    println!();
    println!("Get started:");
    println!("  {} - Add a component", "formpane add <type> <name>".cyan());
    println!("  {} - Show the layout", "formpane list".cyan());
    println!("  {} - Preview the form", "formpane preview".cyan());

    Ok(())
}
