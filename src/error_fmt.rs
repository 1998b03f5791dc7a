use std::fmt;
use std::io;

use owo_colors::OwoColorize;

use crate::context::{LoadError, SettingsError, StoreReadError};
use crate::{LayoutError, ParseError, TransactionError, ValidationError};

/// Application error with context for actionable error messages.
#[derive(Debug)]
pub enum AppError {
    /// Form directory not found
    DirNotFound(String),
    /// IO error with context
    Io { context: String, source: io::Error },
    /// Parse error with file path context
    Parse { file_path: String, source: ParseError },
    /// Stored layout would break an invariant
    Validation { form_dir: String, source: ValidationError },
    /// A layout request was refused
    Layout { form_dir: String, source: LayoutError },
    /// Someone else committed first
    Conflict { expected: u64, actual: u64 },
    /// Load error (components or config)
    Load(LoadError),
    /// Preview template failed to render
    Preview(minijinja::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DirNotFound(dir) => write!(f, "{}", format_dir_not_found(dir)),
            AppError::Io { context, source } => {
                write!(f, "{}", format_cli_error(&format!("{}: {}", context, source)))
            }
            AppError::Parse { file_path, source } => {
                write!(f, "{}", format_parse_error(source, file_path))
            }
            AppError::Validation { form_dir, source } => {
                write!(f, "{}", format_validation_error(source, form_dir))
            }
            AppError::Layout { form_dir, source } => {
                write!(f, "{}", format_layout_error(source, form_dir))
            }
            AppError::Conflict { expected, actual } => {
                write!(f, "{}", format_conflict(*expected, *actual))
            }
            AppError::Load(e) => write!(f, "{}", format_load_error(e)),
            AppError::Preview(e) => {
                write!(f, "{}", format_cli_error(&format!("failed to render preview: {}", e)))
            }
        }
    }
}

impl std::error::Error for AppError {}

/// Extension trait to add file path context to parse results.
pub trait ParseResultExt<T> {
    fn with_path(self, path: &str) -> Result<T, AppError>;
}

impl<T> ParseResultExt<T> for Result<T, ParseError> {
    fn with_path(self, path: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Parse {
            file_path: path.to_string(),
            source: e,
        })
    }
}

/// Extension trait to add form directory context to commit results.
pub trait TransactionResultExt<T> {
    fn with_form_dir(self, form_dir: &str) -> Result<T, AppError>;
}

impl<T> TransactionResultExt<T> for Result<T, TransactionError> {
    fn with_form_dir(self, form_dir: &str) -> Result<T, AppError> {
        self.map_err(|e| match e {
            TransactionError::Conflict { expected, actual } => AppError::Conflict { expected, actual },
            TransactionError::UnknownComponent(id) => AppError::Layout {
                form_dir: form_dir.to_string(),
                source: LayoutError::ComponentNotFound(id),
            },
            TransactionError::Validation(source) => AppError::Validation {
                form_dir: form_dir.to_string(),
                source,
            },
            TransactionError::Layout(source) => AppError::Layout {
                form_dir: form_dir.to_string(),
                source,
            },
            TransactionError::Io(source) => AppError::Io {
                context: "failed to write component files".to_string(),
                source,
            },
        })
    }
}

/// Extension trait to add context to IO results.
pub trait IoResultExt<T> {
    fn with_context(self, context: &str) -> Result<T, AppError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn with_context(self, context: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Io {
            context: context.to_string(),
            source: e,
        })
    }
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Load(e)
    }
}

impl From<minijinja::Error> for AppError {
    fn from(e: minijinja::Error) -> Self {
        AppError::Preview(e)
    }
}

// ============================================================================
// Formatting functions (internal implementation)
// ============================================================================

fn format_parse_error(error: &ParseError, file_path: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        ParseError::MissingFrontmatter => {
            out.push_str(&format!(
                "missing frontmatter delimiters in {}\n",
                file_path.cyan()
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "Component files require YAML frontmatter between --- delimiters.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!("    Add frontmatter to the top of {}:\n", file_path.cyan()));
            out.push('\n');
            out.push_str(&format!("      {}\n", "---".dimmed()));
            out.push_str(&format!("      {}\n", "id: text-calm-heron".dimmed()));
            out.push_str(&format!("      {}\n", "name: Introduction".dimmed()));
            out.push_str(&format!("      {}\n", "type: text".dimmed()));
            out.push_str(&format!("      {}\n", "---".dimmed()));
        }
        ParseError::InvalidYaml(yaml_err) => {
            out.push_str(&format!("invalid YAML in {}\n", file_path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", yaml_err.to_string().dimmed()));
        }
        ParseError::EmptyId => {
            out.push_str(&format!("empty component id in {}\n", file_path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Set {} to the file name without .md\n",
                "id".cyan()
            ));
        }
        ParseError::EmptyName(id) => {
            out.push_str(&format!("component '{}' has an empty name\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Add a {} field to {}\n",
                "name".cyan(),
                file_path.cyan()
            ));
        }
        ParseError::InvalidId(id) => {
            out.push_str(&format!("invalid component id '{}' in {}\n", id.yellow(), file_path.cyan()));
            out.push('\n');
            out.push_str(&format!("  {}\n", ID_RULE.dimmed()));
        }
        ParseError::IdMismatch { id, file_stem } => {
            out.push_str(&format!(
                "component id '{}' does not match file {}\n",
                id.yellow(),
                file_path.cyan()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Set {} to '{}' or rename the file to {}.md\n",
                "id".cyan(),
                file_stem,
                id
            ));
        }
    }

    out
}

fn format_validation_error(error: &ValidationError, form_dir: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        ValidationError::DuplicateSlot { pane_id, slot } => {
            out.push_str(&format!(
                "pane '{}' has two components in slot {}\n",
                pane_id.yellow(),
                slot
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", "Each slot of a pane holds exactly one component.".dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Set {} to 0 and 1 on the two files in {}/ with {}\n",
                "pane_position".cyan(),
                form_dir.cyan(),
                format!("pane_id: {}", pane_id).cyan()
            ));
        }
        ValidationError::PaneOverCapacity { pane_id, count } => {
            out.push_str(&format!(
                "pane '{}' holds {} components\n",
                pane_id.yellow(),
                count
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", "A pane holds at most two components.".dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Move the extra components out: {}\n",
                "formpane move <id> <pane>".cyan()
            ));
        }
        ValidationError::MultipleEmptyPanes { pane_ids } => {
            out.push_str("only one empty group is allowed at a time\n");
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                format!("Empty groups: {}", pane_ids.join(", ")).dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Discard all but one placeholder: {}\n",
                "formpane discard <placeholder-id>".cyan()
            ));
        }
        ValidationError::SlotGap { pane_id, slots } => {
            out.push_str(&format!(
                "pane '{}' has slots {:?} instead of 0..{}\n",
                pane_id.yellow(),
                slots,
                slots.len()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Renumber {} of the files in {}/ starting at 0\n",
                "pane_position".cyan(),
                form_dir.cyan()
            ));
        }
        ValidationError::PlaceholderInFilledPane { pane_id, placeholder_id } => {
            out.push_str(&format!(
                "placeholder '{}' shares pane '{}' with components\n",
                placeholder_id.yellow(),
                pane_id.yellow()
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", "Placeholders only mark empty groups.".dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Delete {}/{}.md\n",
                form_dir.cyan(),
                placeholder_id.cyan()
            ));
        }
        ValidationError::PlaceholderWithoutPane(id) => {
            out.push_str(&format!("placeholder '{}' has no pane_id\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!("    Delete {}/{}.md\n", form_dir.cyan(), id.cyan()));
        }
        ValidationError::DuplicateComponentId(id) => {
            out.push_str(&format!("duplicate component id '{}'\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Find the duplicates: {}\n",
                format!("grep -l 'id: {}' {}/*.md", id, form_dir).cyan()
            ));
        }
        ValidationError::InvalidComponentId(id) => {
            out.push_str(&format!("invalid component id '{}'\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}\n", ID_RULE.dimmed()));
        }
        ValidationError::InvalidPaneId { component_id, pane_id } => {
            out.push_str(&format!(
                "component '{}' names an invalid pane id '{}'\n",
                component_id.yellow(),
                pane_id.yellow()
            ));
            out.push('\n');
            out.push_str(&format!("  {}\n", ID_RULE.dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Fix {} in {}/{}.md\n",
                "pane_id".cyan(),
                form_dir.cyan(),
                component_id.cyan()
            ));
        }
    }

    out
}

const ID_RULE: &str = "Ids use letters, digits, '-', '_' and '.', and cannot start with '.'.";

fn format_layout_error(error: &LayoutError, form_dir: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        LayoutError::ComponentNotFound(id) => {
            out.push_str(&format!("component '{}' not found\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                format!("No component with id '{}' exists in {}/", id, form_dir).dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str("    1. Check the spelling of the component id\n");
            out.push_str(&format!("    2. List components: {}\n", "formpane list".cyan()));
        }
        LayoutError::DuplicateEmptyPane { pane_id } => {
            out.push_str("only one empty group is allowed at a time\n");
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                format!("Pane '{}' is already empty.", pane_id).dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Drop a component into it: {}\n",
                format!("formpane move <id> {}", pane_id).cyan()
            ));
            out.push_str(&format!(
                "    2. Or discard it: {}\n",
                "formpane discard <placeholder-id>".cyan()
            ));
        }
        LayoutError::PaneCapacityExceeded { pane_id, occupants } => {
            out.push_str(&format!(
                "pane '{}' is full ({} components)\n",
                pane_id.yellow(),
                occupants
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Drop onto slot 0 or 1 to swap: {}\n",
                format!("formpane move <id> {} 0", pane_id).cyan()
            ));
            out.push_str(&format!(
                "    2. Or make room with a new group: {}\n",
                "formpane group".cyan()
            ));
        }
        LayoutError::InvalidMoveTarget { slot } => {
            out.push_str(&format!("slot {} is not a valid drop target\n", slot));
            out.push('\n');
            out.push_str(&format!("  {}\n", "Use 0, 1 or end.".dimmed()));
        }
        LayoutError::InvalidPaneId(pane_id) => {
            out.push_str(&format!("invalid pane id '{}'\n", pane_id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}\n", ID_RULE.dimmed()));
        }
        LayoutError::NotAPlaceholder(id) => {
            out.push_str(&format!("component '{}' is not a placeholder\n", id.yellow()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    Delete it instead: {}\n",
                format!("formpane delete {}", id).cyan()
            ));
        }
        LayoutError::IdGenerationFailed { attempts } => {
            out.push_str(&format!(
                "failed to generate a unique id after {} attempts\n",
                attempts
            ));
        }
    }

    out
}

fn format_cli_error(message: &str) -> String {
    format!("{}: {}\n", "error".red().bold(), message)
}

fn format_conflict(expected: u64, actual: u64) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str("the form changed while this change was being prepared\n");
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        format!("Expected version {}, found {}.", expected, actual).dimmed()
    ));
    out.push_str("  Run the command again.\n");

    out
}

fn format_dir_not_found(dir: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str(&format!("form directory not found: {}\n", dir.yellow()));
    out.push('\n');
    out.push_str(&format!("  {}\n", "The specified form directory does not exist.".dimmed()));
    out.push('\n');
    out.push_str(&format!("  {}:\n", "To fix this".bold()));
    out.push_str(&format!(
        "    1. Create it: {}\n",
        format!("formpane --dir {} init", dir).cyan()
    ));
    out.push_str(&format!(
        "    2. Use a different directory: {}\n",
        "formpane --dir /path/to/form list".cyan()
    ));

    out
}

fn format_load_error(error: &LoadError) -> String {
    match error {
        LoadError::Store(e) => format_store_read_error(e),
        LoadError::Settings(e) => format_settings_error(e),
    }
}

fn format_store_read_error(error: &StoreReadError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str("failed to load form\n");

    for (path, io_err) in &error.io_errors {
        out.push_str(&format!(
            "  {} {}: {}\n",
            "•".red(),
            path.display().to_string().cyan(),
            io_err
        ));
    }

    for (path, parse_err) in &error.parse_errors {
        out.push_str(&format!(
            "  {} {}: {}\n",
            "•".red(),
            path.display().to_string().cyan(),
            parse_err
        ));
    }

    for val_err in &error.validation_errors {
        out.push_str(&format!("  {} {}\n", "•".red(), val_err));
    }

    out
}

fn format_settings_error(error: &SettingsError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str("failed to load config.yml\n");
    out.push_str(&format!("  {} {}\n", "•".red(), error));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strip_ansi(s: &str) -> String {
        let re = regex::Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        re.replace_all(s, "").to_string()
    }

    #[test]
    fn test_format_missing_frontmatter() {
        let err = AppError::Parse {
            file_path: ".form/text-calm-heron.md".to_string(),
            source: ParseError::MissingFrontmatter,
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("missing frontmatter"));
        assert!(stripped.contains(".form/text-calm-heron.md"));
        assert!(stripped.contains("To fix this"));
        assert!(stripped.contains("type: text"));
    }

    #[test]
    fn test_format_duplicate_empty_pane() {
        let err = AppError::Layout {
            form_dir: ".form".to_string(),
            source: LayoutError::DuplicateEmptyPane {
                pane_id: "pane-01".to_string(),
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("only one empty group is allowed at a time"));
        assert!(stripped.contains("formpane move <id> pane-01"));
        assert!(stripped.contains("formpane discard"));
    }

    #[test]
    fn test_format_pane_full() {
        let err = AppError::Layout {
            form_dir: ".form".to_string(),
            source: LayoutError::PaneCapacityExceeded {
                pane_id: "pane-01".to_string(),
                occupants: 2,
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("pane 'pane-01' is full (2 components)"));
        assert!(stripped.contains("formpane group"));
    }

    #[test]
    fn test_format_invalid_pane_id() {
        let err = AppError::Layout {
            form_dir: ".form".to_string(),
            source: LayoutError::InvalidPaneId("a: b".to_string()),
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("invalid pane id 'a: b'"));
        assert!(stripped.contains("cannot start with '.'"));
    }

    #[test]
    fn test_format_id_mismatch() {
        let err = AppError::Parse {
            file_path: ".form/other.md".to_string(),
            source: ParseError::IdMismatch {
                id: "text-a".to_string(),
                file_stem: "other".to_string(),
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("component id 'text-a' does not match file .form/other.md"));
        assert!(stripped.contains("rename the file to text-a.md"));
    }

    #[test]
    fn test_format_multiple_empty_panes() {
        let err = AppError::Validation {
            form_dir: ".form".to_string(),
            source: ValidationError::MultipleEmptyPanes {
                pane_ids: vec!["p1".to_string(), "p2".to_string()],
            },
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("only one empty group"));
        assert!(stripped.contains("p1, p2"));
    }

    #[test]
    fn test_format_duplicate_component_id() {
        let err = AppError::Validation {
            form_dir: ".form".to_string(),
            source: ValidationError::DuplicateComponentId("text-a".to_string()),
        };
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("duplicate component id"));
        assert!(stripped.contains("grep -l 'id: text-a' .form/*.md"));
    }

    #[test]
    fn test_format_dir_not_found() {
        let err = AppError::DirNotFound("/nonexistent/path".to_string());
        let stripped = strip_ansi(&err.to_string());

        assert!(stripped.contains("error:"));
        assert!(stripped.contains("/nonexistent/path"));
        assert!(stripped.contains("does not exist"));
        assert!(stripped.contains("formpane --dir /nonexistent/path init"));
    }

    #[test]
    fn test_format_load_error_lists_every_problem() {
        let mut errors = StoreReadError::new();
        errors.add_parse_error(PathBuf::from(".form/a.md"), ParseError::EmptyId);
        errors.add_validation_error(ValidationError::PlaceholderWithoutPane("ph".to_string()));

        let stripped = strip_ansi(&AppError::Load(LoadError::Store(errors)).to_string());
        let bullets = regex::Regex::new(r"(?m)^  • ").unwrap();
        assert_eq!(bullets.find_iter(&stripped).count(), 2);
        assert!(stripped.contains(".form/a.md"));
    }

    #[test]
    fn test_extension_trait_parse() {
        let result: Result<(), ParseError> = Err(ParseError::MissingFrontmatter);
        let err = result.with_path("test.md").unwrap_err();
        assert!(matches!(err, AppError::Parse { file_path, .. } if file_path == "test.md"));
    }

    #[test]
    fn test_extension_trait_transaction() {
        let result: Result<(), TransactionError> = Err(TransactionError::UnknownComponent("x".to_string()));
        let err = result.with_form_dir(".form").unwrap_err();
        assert!(matches!(
            err,
            AppError::Layout { source: LayoutError::ComponentNotFound(id), .. } if id == "x"
        ));

        let result: Result<(), TransactionError> = Err(TransactionError::Conflict { expected: 1, actual: 2 });
        let err = result.with_form_dir(".form").unwrap_err();
        assert!(matches!(err, AppError::Conflict { expected: 1, actual: 2 }));
    }
}
