mod commands;
mod log_writer;
mod reporter;
mod services;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use winpick_core::Config;

#[derive(Parser)]
#[command(name = "winpick")]
#[command(about = "winpick - Pick, switch to and close X11 windows from the keyboard", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the window list as the picker would show it
    List {
        /// Only windows of this class
        #[arg(long)]
        class: Option<String>,
        /// Print the raw window snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Append the class column
        #[arg(long)]
        detail: bool,
    },
    /// Open the interactive window picker
    ///
    /// Switching in another window (C-o) moves the window to the current
    /// desktop. Switching in another frame (C-f) leaves the window on its
    /// own desktop and moves the view there.
    Pick {
        /// Only windows of this class
        #[arg(long)]
        class: Option<String>,
        /// Start without the class column
        #[arg(long)]
        no_detail: bool,
    },
    /// Focus a window of CLASS, or launch its program
    Switch {
        /// Window class, matched case-insensitively
        class: String,
        /// Command line to launch when no window exists
        #[arg(long)]
        program: Option<String>,
        /// Bring the window next to the current one instead of replacing it
        #[arg(long)]
        other_window: bool,
    },
    /// Switch to the configured web browser
    Browser {
        #[arg(long)]
        other_window: bool,
    },
    /// Show whether a picker session is active
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, path = %Config::config_path().display(), "failed to load config, using defaults");
        Config::default()
    });
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::List {
            class,
            json,
            detail,
        } => commands::list(&config, class.as_deref(), json, detail),
        Commands::Pick { class, no_detail } => commands::pick(&config, class.as_deref(), no_detail),
        Commands::Switch {
            class,
            program,
            other_window,
        } => commands::switch(&config, class, program, other_window),
        Commands::Browser { other_window } => commands::browser(&config, other_window),
        Commands::Status { json } => commands::status(json),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose { "winpick=debug" } else { "winpick=warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(log_writer::global().clone())
        .init();

    Ok(())
}
