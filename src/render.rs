use minijinja::{context, Environment};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::context::{Component, ComponentKind, Pane, PaneIndex, PANE_CAPACITY};

pub const MAX_NAME_LEN: usize = 40;

/// Width of the text preview, in columns.
pub const PREVIEW_WIDTH: usize = 72;

/// Terminal listing of every pane in display order.
///
/// Each filled pane shows both of its slots, empty groups show their
/// placeholder, and components without a pane are listed last.
pub fn render_layout(components: &[Component]) -> String {
    let index = PaneIndex::new(components);
    let mut output = String::new();

    for pane in index.ordered() {
        output.push_str(&render_pane(pane));
    }

    if !index.unplaced().is_empty() {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!("{}\n", "unplaced".bright_black().bold()));
        for component in index.unplaced() {
            output.push_str(&format!("  {}\n", format_component_line(component)));
        }
    }

    output
}

fn render_pane(pane: &Pane<'_>) -> String {
    let mut out = String::new();

    if pane.is_empty() {
        out.push_str(&format!(
            "{} {} {}\n",
            "◌".bright_black(),
            pane.id.bright_black().bold(),
            "(empty group)".bright_black()
        ));
        for placeholder in &pane.placeholders {
            out.push_str(&format!("    {}\n", placeholder.id.bright_black()));
        }
        return out;
    }

    let marker = if pane.is_full() {
        "◉".bright_green().to_string()
    } else {
        "◐".yellow().to_string()
    };
    out.push_str(&format!("{} {}\n", marker, pane.id.bold()));

    for slot in 0..PANE_CAPACITY.max(pane.members.len()) {
        match pane.members.get(slot) {
            Some(component) => {
                out.push_str(&format!(
                    "  {} {}\n",
                    format!("{} │", slot).bright_black(),
                    format_component_line(component)
                ));
            }
            None => {
                out.push_str(&format!("  {} {}\n", format!("{} │", slot).bright_black(), "·".bright_black()));
            }
        }
    }

    out
}

/// One-line summary of a component: id, name and kind.
pub fn format_component_line(component: &Component) -> String {
    let id_display = if component.is_placeholder() {
        component.id.bright_black().bold().to_string()
    } else {
        component.id.cyan().bold().to_string()
    };

    format!(
        "{} {} {}",
        id_display,
        truncate_name(&component.name),
        format!("[{}]", component.kind).bright_black()
    )
}

pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_NAME_LEN {
        name.to_string()
    } else {
        let cut: String = name.chars().take(MAX_NAME_LEN - 1).collect();
        format!("{}…", cut)
    }
}

/// Plain-text preview of the form.
///
/// A pane with one component spans the full width; a pane with two puts
/// them side by side. Empty groups are not shown.
pub fn render_preview(components: &[Component], title: &str) -> String {
    let index = PaneIndex::new(components);
    let filled: Vec<&Pane<'_>> = index.ordered().into_iter().filter(|p| !p.is_empty()).collect();

    let mut out = String::new();
    out.push_str(&format!("{}\n", title));
    out.push_str(&format!("{}\n", "═".repeat(PREVIEW_WIDTH)));

    if filled.is_empty() {
        out.push_str("No components yet\n");
        return out;
    }

    for pane in filled {
        match pane.members.as_slice() {
            [only] => {
                for line in text_fragment(only) {
                    out.push_str(&format!("{}\n", line));
                }
            }
            [left, right, ..] => {
                let column = (PREVIEW_WIDTH - 3) / 2;
                let left_lines = text_fragment(left);
                let right_lines = text_fragment(right);
                let rows = left_lines.len().max(right_lines.len());
                for row in 0..rows {
                    let l = left_lines.get(row).map(String::as_str).unwrap_or("");
                    let r = right_lines.get(row).map(String::as_str).unwrap_or("");
                    let line = format!("{} │ {}", pad(l, column), r);
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
            }
            [] => {}
        }
        out.push_str(&format!("{}\n", "─".repeat(PREVIEW_WIDTH)));
    }

    out
}

/// Text rendering of a single component, one entry per line.
fn text_fragment(component: &Component) -> Vec<String> {
    let content = component.content.as_deref();
    let label = content.unwrap_or(&component.name);

    match component.kind {
        ComponentKind::Button => vec![format!("[ {} ]", label)],
        ComponentKind::Input => vec![format!("{} ________", label)],
        ComponentKind::Header => vec![label.to_uppercase()],
        ComponentKind::Image => vec![format!("[image: {}]", component.name)],
        ComponentKind::Graphic => vec![format!("[graphic: {}]", component.name)],
        ComponentKind::Navigation => vec![format!("≡ {} | Home | About | Contact", component.name)],
        ComponentKind::Footer => vec![format!("— {} —", label)],
        ComponentKind::Mcq => vec![
            component.name.clone(),
            "( ) Option 1".to_string(),
            "( ) Option 2".to_string(),
            "( ) Option 3".to_string(),
        ],
        ComponentKind::Dropdown => vec![component.name.clone(), "[ Select an option ▾ ]".to_string()],
        ComponentKind::Identity => vec![
            component.name.clone(),
            "First Name ____  Last Name ____".to_string(),
            "Email ________".to_string(),
            "Phone # ________".to_string(),
        ],
        ComponentKind::ShortText => vec![
            component.name.clone(),
            format!("{} ________", content.unwrap_or("Enter text")),
        ],
        ComponentKind::Disclaimer => vec![format!(
            "! {}",
            content.unwrap_or("This is a disclaimer component")
        )],
        _ => {
            let mut lines = vec![component.name.clone()];
            if let Some(body) = content {
                lines.extend(body.lines().map(str::to_string));
            }
            lines
        }
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().take(width).collect()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

#[derive(Serialize)]
struct PaneView<'a> {
    id: &'a str,
    components: Vec<ComponentView<'a>>,
}

#[derive(Serialize)]
struct ComponentView<'a> {
    id: &'a str,
    name: &'a str,
    kind: &'a str,
    content: Option<&'a str>,
}

impl<'a> From<&'a Component> for ComponentView<'a> {
    fn from(component: &'a Component) -> Self {
        Self {
            id: &component.id,
            name: &component.name,
            kind: component.kind.as_str(),
            content: component.content.as_deref(),
        }
    }
}

const FORM_TEMPLATE: &str = include_str!("templates/form.html");

/// HTML preview of the form, one markup fragment per component kind.
pub fn render_preview_html(components: &[Component], title: &str) -> Result<String, minijinja::Error> {
    let index = PaneIndex::new(components);
    let panes: Vec<PaneView<'_>> = index
        .ordered()
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| PaneView {
            id: p.id,
            components: p.members.iter().map(|c| ComponentView::from(*c)).collect(),
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("form.html", FORM_TEMPLATE)?;
    env.get_template("form.html")?
        .render(context! { title => title, panes => panes })
}
