//! Show command - displays details for a single component.

use owo_colors::OwoColorize;

use crate::error_fmt::AppError;
use crate::{Component, FormContext, LayoutError, PaneIndex};

pub fn show(ctx: &FormContext, id: &str) -> Result<(), AppError> {
    let components = ctx.list_all();
    let component = components
        .iter()
        .find(|c| c.id == id)
        .ok_or_else(|| AppError::Layout {
            form_dir: super::form_dir(ctx),
            source: LayoutError::ComponentNotFound(id.to_string()),
        })?;

    print_component_details(component, &components);

    Ok(())
}

fn print_component_details(component: &Component, components: &[Component]) {
    const LABEL_WIDTH: usize = 10;

    println!("{:LABEL_WIDTH$} {}", "Id".bold(), component.id.cyan().bold());
    println!("{:LABEL_WIDTH$} {}", "Name".bold(), component.name);
    println!(
        "{:LABEL_WIDTH$} {}",
        "Type".bold(),
        format!("[{}]", component.kind).bright_black()
    );
    println!("{:LABEL_WIDTH$} {}", "Position".bold(), component.position);

    match component.pane_id.as_deref() {
        Some(pane_id) => {
            let index = PaneIndex::new(components);
            let mate = index
                .members(pane_id)
                .iter()
                .find(|c| c.id != component.id)
                .map(|c| c.id.as_str());

            println!(
                "{:LABEL_WIDTH$} {} (slot {})",
                "Pane".bold(),
                pane_id,
                component.pane_position
            );
            if let Some(mate) = mate {
                println!("{:LABEL_WIDTH$} {}", "Beside".bold(), mate.cyan());
            }
        }
        None => println!("{:LABEL_WIDTH$} {}", "Pane".bold(), "none".bright_black()),
    }

    if let Some(content) = component.content.as_deref() {
        println!();
        let mut skin = termimad::MadSkin::default();
        for header in skin.headers.iter_mut() {
            header.align = termimad::Alignment::Left;
        }
        skin.print_text(content);
    }
}
