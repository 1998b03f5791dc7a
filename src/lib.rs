pub mod commands;
pub mod context;
pub mod error_fmt;
pub mod render;

// Re-export commonly used types from context module for convenience
pub use context::{
    parse, Component, ComponentKind, ComponentStore, FormConfig, FormContext, LayoutError, LoadError, Move,
    MoveKind, Op, Pane, PaneIndex, PaneState, ParseError, Placement, Plan, SettingsError, Slot, SlotIndex,
    Transaction, TransactionError, ValidationError, PANE_CAPACITY,
};

// Re-export the pure layout functions
pub use context::{create_empty_pane, new_component, plan, plan_move, remove_component, remove_placeholder};

// Re-export validation function for binary
pub use context::validate_layout;

/// Form directory used when `--dir` is not given.
pub const DEFAULT_FORM_DIR: &str = ".form";
