//! CLI command implementations.
//!
//! Each command is implemented in its own submodule and uses FormContext
//! for all layout operations.

mod add;
mod check;
mod delete;
mod discard;
mod group;
mod init;
mod list;
mod move_cmd;
mod preview;
mod show;

pub use add::add;
pub use check::check;
pub use delete::delete;
pub use discard::discard;
pub use group::group;
pub use init::init;
pub use list::list;
pub use move_cmd::{move_component, parse_slot_index};
pub use preview::preview;
pub use show::show;

use crate::FormContext;

/// The form directory as shown in error messages.
fn form_dir(ctx: &FormContext) -> String {
    ctx.form_dir().display().to_string()
}
