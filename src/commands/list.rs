//! List command - displays all panes in display order.

use crate::render;
use crate::FormContext;

pub fn list(ctx: &FormContext) {
    let components = ctx.list_all();

    if components.is_empty() {
        println!("No components found");
        return;
    }

    print!("{}", render::render_layout(&components));
}
