use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formpane::commands;
use formpane::error_fmt::AppError;
use formpane::{FormContext, SlotIndex, DEFAULT_FORM_DIR};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "FORMPANE_LOG";

#[derive(Parser)]
#[command(name = "formpane")]
#[command(about = "Build forms from components arranged in two-slot panes")]
struct Cli {
    /// Form directory (defaults to .form)
    #[arg(long, short, global = true, default_value = DEFAULT_FORM_DIR)]
    dir: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the form directory and its config
    Init,
    /// Add a component in a new pane at the end of the form
    Add {
        /// Component type (button, input, text, header, short_text, ...)
        r#type: String,
        /// Display name
        name: String,
        /// Content (markdown body)
        #[arg(long, short)]
        content: Option<String>,
    },
    /// List panes in display order
    List,
    /// Show details for a single component
    Show { id: String },
    /// Move a component onto a pane slot
    Move {
        id: String,
        /// Destination pane id
        pane: String,
        /// Destination slot (0, 1 or end)
        #[arg(default_value = "end", value_parser = commands::parse_slot_index)]
        slot: SlotIndex,
    },
    /// Add an empty group at the end of the form
    Group,
    /// Discard an empty group by placeholder or pane id
    Discard { id: String },
    /// Delete a component
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Validate the layout, or a component file against it
    Check {
        /// Component file to check before saving it into the form
        file: Option<PathBuf>,
    },
    /// Preview the form
    Preview {
        /// Write an HTML preview to this path instead of printing text
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let form_dir = PathBuf::from(shellexpand::tilde(&cli.dir).as_ref());

    if let Commands::Init = cli.command {
        return commands::init(&form_dir);
    }

    let ctx = open(&form_dir)?;

    match cli.command {
        Commands::Init => Ok(()),
        Commands::Add { r#type, name, content } => commands::add(&ctx, &r#type, &name, content),
        Commands::List => {
            commands::list(&ctx);
            Ok(())
        }
        Commands::Show { id } => commands::show(&ctx, &id),
        Commands::Move { id, pane, slot } => commands::move_component(&ctx, &id, &pane, slot),
        Commands::Group => commands::group(&ctx),
        Commands::Discard { id } => commands::discard(&ctx, &id),
        Commands::Delete { id, force } => commands::delete(&ctx, &id, force),
        Commands::Check { file } => commands::check(&ctx, file.as_deref()),
        Commands::Preview { html } => commands::preview(&ctx, html.as_deref()),
    }
}

fn open(form_dir: &Path) -> Result<FormContext, AppError> {
    if !form_dir.is_dir() {
        return Err(AppError::DirNotFound(form_dir.display().to_string()));
    }
    Ok(FormContext::load(form_dir.to_path_buf())?)
}
