use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Kind of a component, drawn from an open-ended catalog.
///
/// Kind names are normalised before matching: "Short Text", "short text" and
/// "short_text" all name [`ComponentKind::ShortText`]. Anything outside the
/// catalog is kept verbatim (normalised) in [`ComponentKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Button,
    Input,
    Text,
    Header,
    Image,
    Card,
    Navigation,
    Modal,
    Table,
    Footer,
    Mcq,
    Identity,
    Dropdown,
    Disclaimer,
    Graphic,
    ShortText,
    /// Sentinel marking an intentionally empty pane.
    Placeholder,
    Other(String),
}

impl ComponentKind {
    /// Kinds offered when adding a component. Placeholders are never added directly.
    pub const CATALOG: [ComponentKind; 16] = [
        ComponentKind::Button,
        ComponentKind::Input,
        ComponentKind::Text,
        ComponentKind::Header,
        ComponentKind::Image,
        ComponentKind::Card,
        ComponentKind::Navigation,
        ComponentKind::Modal,
        ComponentKind::Table,
        ComponentKind::Footer,
        ComponentKind::Mcq,
        ComponentKind::Identity,
        ComponentKind::Dropdown,
        ComponentKind::Disclaimer,
        ComponentKind::Graphic,
        ComponentKind::ShortText,
    ];

    /// Parse a kind name, normalising case and spaces.
    ///
    /// ```
    /// use formpane::ComponentKind;
    ///
    /// assert_eq!(ComponentKind::parse("Short Text"), ComponentKind::ShortText);
    /// assert_eq!(ComponentKind::parse("MCQ"), ComponentKind::Mcq);
    /// assert_eq!(
    ///     ComponentKind::parse("Signature Pad"),
    ///     ComponentKind::Other("signature_pad".to_string())
    /// );
    /// ```
    pub fn parse(name: &str) -> Self {
        let normalised = name.trim().to_lowercase().replace(' ', "_");
        match normalised.as_str() {
            "button" => ComponentKind::Button,
            "input" => ComponentKind::Input,
            "text" => ComponentKind::Text,
            "header" => ComponentKind::Header,
            "image" => ComponentKind::Image,
            "card" => ComponentKind::Card,
            "navigation" => ComponentKind::Navigation,
            "modal" => ComponentKind::Modal,
            "table" => ComponentKind::Table,
            "footer" => ComponentKind::Footer,
            "mcq" => ComponentKind::Mcq,
            "identity" => ComponentKind::Identity,
            "dropdown" => ComponentKind::Dropdown,
            "disclaimer" => ComponentKind::Disclaimer,
            "graphic" => ComponentKind::Graphic,
            "short_text" => ComponentKind::ShortText,
            "placeholder" => ComponentKind::Placeholder,
            _ => ComponentKind::Other(normalised),
        }
    }

    /// Stored name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Button => "button",
            ComponentKind::Input => "input",
            ComponentKind::Text => "text",
            ComponentKind::Header => "header",
            ComponentKind::Image => "image",
            ComponentKind::Card => "card",
            ComponentKind::Navigation => "navigation",
            ComponentKind::Modal => "modal",
            ComponentKind::Table => "table",
            ComponentKind::Footer => "footer",
            ComponentKind::Mcq => "mcq",
            ComponentKind::Identity => "identity",
            ComponentKind::Dropdown => "dropdown",
            ComponentKind::Disclaimer => "disclaimer",
            ComponentKind::Graphic => "graphic",
            ComponentKind::ShortText => "short_text",
            ComponentKind::Placeholder => "placeholder",
            ComponentKind::Other(name) => name,
        }
    }

    /// Prefix of generated component ids: the kind name reduced to
    /// `[a-z0-9_]`, or "component" when nothing is left.
    pub fn id_prefix(&self) -> String {
        let prefix: String = self
            .as_str()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        if prefix.is_empty() {
            "component".to_string()
        } else {
            prefix
        }
    }
}

/// Returns true if `value` can name a component or pane.
///
/// Ids are ASCII letters, digits, `-`, `_` and `.`, and never start with a
/// dot, so a component id is always a single file name inside the form
/// directory.
pub fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('.')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        if name.trim().is_empty() {
            return Err(serde::de::Error::custom("component type cannot be empty"));
        }
        Ok(ComponentKind::parse(&name))
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("missing frontmatter delimiters")]
    MissingFrontmatter,
    #[error("invalid yaml: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
    #[error("component id cannot be empty")]
    EmptyId,
    #[error("component '{0}' has an empty name")]
    EmptyName(String),
    #[error("invalid component id '{0}'")]
    InvalidId(String),
    #[error("component id '{id}' does not match its file name '{file_stem}'")]
    IdMismatch { id: String, file_stem: String },
}

/// A placeable unit of the form.
///
/// `position` orders panes relative to one another; `pane_id` and
/// `pane_position` place the component in a slot of a pane.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Component {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Markdown body of the component file.
    #[serde(skip)]
    pub content: Option<String>,
    #[serde(default)]
    pub position: i64,
    /// None means the component is not placed in any pane.
    #[serde(default)]
    pub pane_id: Option<String>,
    #[serde(default)]
    pub pane_position: usize,
    /// Internal flag for soft-deletion. Not persisted.
    #[serde(skip)]
    pub deleted: bool,
}

impl Component {
    /// Returns true if this component is an empty-pane sentinel
    pub fn is_placeholder(&self) -> bool {
        self.kind == ComponentKind::Placeholder
    }

    /// Returns true if this component belongs to a pane
    pub fn is_placed(&self) -> bool {
        self.pane_id.is_some()
    }

    /// Returns true if this component is marked for deletion
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn in_pane(&self, pane_id: &str) -> bool {
        self.pane_id.as_deref() == Some(pane_id)
    }

    /// The placement fields of this component.
    pub fn placement(&self) -> Placement {
        Placement {
            id: self.id.clone(),
            position: self.position,
            pane_id: self.pane_id.clone(),
            pane_position: self.pane_position,
        }
    }

    /// Overwrite the placement fields, leaving identity and content untouched.
    pub fn apply_placement(&mut self, placement: &Placement) {
        self.position = placement.position;
        self.pane_id = placement.pane_id.clone();
        self.pane_position = placement.pane_position;
    }

    /// Serialize this component to markdown format.
    ///
    /// Produces the frontmatter YAML block followed by the content.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("---\n");
        out.push_str(&format!("id: {}\n", yaml_scalar(&self.id)));
        out.push_str(&format!("name: {}\n", yaml_scalar(&self.name)));
        out.push_str(&format!("type: {}\n", yaml_scalar(self.kind.as_str())));
        out.push_str(&format!("position: {}\n", self.position));
        if let Some(pane_id) = &self.pane_id {
            out.push_str(&format!("pane_id: {}\n", yaml_scalar(pane_id)));
        }
        out.push_str(&format!("pane_position: {}\n", self.pane_position));
        out.push_str("---\n\n");

        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(content);
            out.push('\n');
        }

        out
    }
}

/// The four fields a bulk update may overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: String,
    pub position: i64,
    pub pane_id: Option<String>,
    pub pane_position: usize,
}

/// Quote a string for YAML when writing it bare would change its meaning.
fn yaml_scalar(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || matches!(value, "~" | "null" | "Null" | "NULL")
        || value != value.trim()
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.starts_with(['-', '?', '!', '&', '*', '[', ']', '{', '}', '|', '>', '\'', '"', '%', '@', '`', '#', ','])
        || serde_yaml::from_str::<String>(value).ok().as_deref() != Some(value);

    if needs_quotes {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

/// Parses a component markdown file, extracting frontmatter and content.
///
/// # Examples
///
/// ```
/// use formpane::{parse, ComponentKind};
///
/// let content = r#"---
/// id: button-brave-otter
/// name: Submit
/// type: button
/// position: 3
/// pane_id: pane-01hzy
/// pane_position: 1
/// ---
///
/// Send the form.
/// "#;
///
/// let component = parse(content).unwrap();
/// assert_eq!(component.id, "button-brave-otter");
/// assert_eq!(component.kind, ComponentKind::Button);
/// assert_eq!(component.pane_id.as_deref(), Some("pane-01hzy"));
/// assert_eq!(component.pane_position, 1);
/// assert_eq!(component.content.as_deref(), Some("Send the form."));
/// ```
///
/// Missing frontmatter returns an error:
/// ```
/// use formpane::{parse, ParseError};
///
/// let result = parse("No frontmatter here");
/// assert!(matches!(result, Err(ParseError::MissingFrontmatter)));
/// ```
pub fn parse(content: &str) -> Result<Component, ParseError> {
    let Some(start) = content.find("---") else {
        return Err(ParseError::MissingFrontmatter);
    };
    let after_first = start + 3;
    let Some(end) = content[after_first..].find("\n---") else {
        return Err(ParseError::MissingFrontmatter);
    };
    let yaml = &content[after_first..after_first + end];
    let body = content[after_first + end + 4..].trim();

    let mut component: Component = serde_yaml::from_str(yaml)?;
    component.content = (!body.is_empty()).then(|| body.to_string());

    if component.id.trim().is_empty() {
        return Err(ParseError::EmptyId);
    }
    if !is_valid_id(&component.id) {
        return Err(ParseError::InvalidId(component.id));
    }
    if component.name.trim().is_empty() {
        return Err(ParseError::EmptyName(component.id));
    }

    Ok(component)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_component(id: &str, kind: ComponentKind) -> Component {
        Component {
            id: id.to_string(),
            name: format!("{} name", id),
            kind,
            content: None,
            position: 0,
            pane_id: Some("pane-a".to_string()),
            pane_position: 0,
            deleted: false,
        }
    }

    #[test]
    fn test_parse_valid_component() {
        let content = r#"---
id: header-calm-lake
name: Welcome
type: header
position: 0
pane_id: pane-1
pane_position: 0
---

Fill in the details below.
"#;
        let component = parse(content).unwrap();
        assert_eq!(component.id, "header-calm-lake");
        assert_eq!(component.name, "Welcome");
        assert_eq!(component.kind, ComponentKind::Header);
        assert_eq!(component.position, 0);
        assert_eq!(component.pane_id.as_deref(), Some("pane-1"));
        assert_eq!(component.content.as_deref(), Some("Fill in the details below."));
    }

    #[test]
    fn test_parse_unplaced_defaults() {
        let content = "---\nid: loose\nname: Loose\ntype: text\n---\n";
        let component = parse(content).unwrap();
        assert!(!component.is_placed());
        assert_eq!(component.position, 0);
        assert_eq!(component.pane_position, 0);
        assert!(component.content.is_none());
    }

    #[test]
    fn test_parse_kind_normalised() {
        let content = "---\nid: st\nname: Notes\ntype: Short Text\n---\n";
        let component = parse(content).unwrap();
        assert_eq!(component.kind, ComponentKind::ShortText);
    }

    #[test]
    fn test_parse_unknown_kind_kept() {
        let content = "---\nid: sig\nname: Sign here\ntype: signature\n---\n";
        let component = parse(content).unwrap();
        assert_eq!(component.kind, ComponentKind::Other("signature".to_string()));
    }

    #[test]
    fn test_parse_placeholder() {
        let content = "---\nid: placeholder-1\nname: Empty Group Placeholder\ntype: placeholder\nposition: 4\npane_id: pane-9\n---\n";
        let component = parse(content).unwrap();
        assert!(component.is_placeholder());
    }

    #[test]
    fn test_parse_missing_closing_delimiter() {
        let content = "---\nid: test\nNo closing delimiter";
        assert!(matches!(parse(content), Err(ParseError::MissingFrontmatter)));
    }

    #[test]
    fn test_parse_missing_name() {
        let content = "---\nid: nameless\ntype: button\n---\n";
        assert!(matches!(parse(content), Err(ParseError::InvalidYaml(_))));
    }

    #[test]
    fn test_parse_empty_name() {
        let content = "---\nid: blank\nname: \"  \"\ntype: button\n---\n";
        assert!(matches!(
            parse(content),
            Err(ParseError::EmptyName(id)) if id == "blank"
        ));
    }

    #[test]
    fn test_parse_empty_id() {
        let content = "---\nid: \"\"\nname: Something\ntype: button\n---\n";
        assert!(matches!(parse(content), Err(ParseError::EmptyId)));
    }

    #[test]
    fn test_parse_empty_type() {
        let content = "---\nid: x\nname: Something\ntype: \"\"\n---\n";
        assert!(matches!(parse(content), Err(ParseError::InvalidYaml(_))));
    }

    #[test]
    fn test_to_markdown_roundtrip_full() {
        let component = Component {
            id: "card-quick-fox".to_string(),
            name: "Plan: Premium".to_string(),
            kind: ComponentKind::Card,
            content: Some("Includes **everything**.\n\n- support\n- updates".to_string()),
            position: 7,
            pane_id: Some("pane-01j0abc".to_string()),
            pane_position: 1,
            deleted: false,
        };
        let parsed = parse(&component.to_markdown()).unwrap();
        assert_eq!(parsed, component);
    }

    #[test]
    fn test_to_markdown_unplaced_roundtrip() {
        let mut component = make_component("text-1", ComponentKind::Text);
        component.pane_id = None;
        let parsed = parse(&component.to_markdown()).unwrap();
        assert_eq!(parsed.pane_id, None);
        assert!(parsed.content.is_none());
    }

    #[test]
    fn test_to_markdown_quotes_awkward_names() {
        for name in ["yes", "- dash", "42", "# hash", "trailing: ", "\"quoted\""] {
            let mut component = make_component("c", ComponentKind::Text);
            component.name = name.to_string();
            let parsed = parse(&component.to_markdown()).unwrap();
            assert_eq!(parsed.name, name);
        }
    }

    #[test]
    fn test_to_markdown_quotes_awkward_pane_ids_and_kinds() {
        for pane_id in ["null", "~", "yes", "123", "true", "a: b", "#x", "- x"] {
            let mut component = make_component("c", ComponentKind::Text);
            component.pane_id = Some(pane_id.to_string());
            let parsed = parse(&component.to_markdown()).unwrap();
            assert_eq!(parsed.pane_id.as_deref(), Some(pane_id));
        }

        for kind in ["#x", "../x", "a:b", "null", "123", "*ref"] {
            let component = make_component("c", ComponentKind::Other(kind.to_string()));
            let parsed = parse(&component.to_markdown()).unwrap();
            assert_eq!(parsed.kind, ComponentKind::Other(kind.to_string()));
        }
    }

    #[test]
    fn test_to_markdown_quotes_numeric_id() {
        let component = make_component("123", ComponentKind::Text);
        let parsed = parse(&component.to_markdown()).unwrap();
        assert_eq!(parsed.id, "123");
    }

    #[test]
    fn test_parse_rejects_path_like_id() {
        for id in ["../x", "a/b", ".hidden"] {
            let content = format!("---\nid: \"{}\"\nname: X\ntype: text\n---\n", id);
            assert!(matches!(parse(&content), Err(ParseError::InvalidId(bad)) if bad == id));
        }
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("button-brave-otter"));
        assert!(is_valid_id("pane-01j0abc"));
        assert!(is_valid_id("short_text-a.b"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("../escaped"));
        assert!(!is_valid_id("a: b"));
        assert!(!is_valid_id("with space"));
        assert!(!is_valid_id("a\\b"));
    }

    #[test]
    fn test_id_prefix_keeps_safe_characters() {
        assert_eq!(ComponentKind::ShortText.id_prefix(), "short_text");
        assert_eq!(ComponentKind::parse("../escaped").id_prefix(), "escaped");
        assert_eq!(ComponentKind::parse("Sign: Here").id_prefix(), "sign_here");
        assert_eq!(ComponentKind::Other("///".to_string()).id_prefix(), "component");
    }

    #[test]
    fn test_apply_placement_keeps_identity() {
        let mut component = make_component("input-1", ComponentKind::Input);
        component.content = Some("Your email".to_string());
        component.apply_placement(&Placement {
            id: "input-1".to_string(),
            position: 12,
            pane_id: Some("pane-b".to_string()),
            pane_position: 1,
        });
        assert_eq!(component.position, 12);
        assert!(component.in_pane("pane-b"));
        assert_eq!(component.pane_position, 1);
        assert_eq!(component.name, "input-1 name");
        assert_eq!(component.content.as_deref(), Some("Your email"));
    }

    #[test]
    fn test_kind_display_roundtrip() {
        for kind in ComponentKind::CATALOG {
            assert_eq!(ComponentKind::parse(kind.as_str()), kind);
        }
        assert_eq!(ComponentKind::parse("placeholder"), ComponentKind::Placeholder);
    }
}
