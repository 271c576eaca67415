//! chatscroll - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// chatscroll - scroll a long chat conversation in the terminal
#[derive(Parser, Debug)]
#[command(name = "chatscroll")]
#[command(version)]
#[command(about = "Virtualized chat message list with follow-latest scrolling")]
pub struct Args {
    /// Number of generated messages in the first conversation
    #[arg(short, long, default_value_t = 200)]
    pub messages: usize,

    /// Rows materialized beyond the viewport on each side
    #[arg(long)]
    pub overscan: Option<usize>,

    /// Lay out every message instead of only the visible window
    #[arg(long)]
    pub no_virtualize: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Styles read NO_COLOR when the renderer is built
    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = chatscroll::config::load_config_with_precedence(args.config.clone())?;
        let merged = chatscroll::config::merge_config(config_file);
        let with_env = chatscroll::config::apply_env_overrides(merged);
        let virtualize_override = args.no_virtualize.then_some(false);
        chatscroll::config::apply_cli_overrides(with_env, args.overscan, virtualize_override)
    };

    chatscroll::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        messages = args.messages,
        "Configuration loaded and resolved"
    );

    chatscroll::view::run_app(&config, args.messages)?;

    Ok(())
}
