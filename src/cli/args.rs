//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Content collections and asset propagation
#[derive(Parser)]
#[command(
    name = "contentkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track content collections and propagate their assets",
    long_about = "Track content collections, generate their type manifest, and propagate \
                  entry stylesheets and scripts to the pages that render them.",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = "Examples:\n  contentkit init\n  contentkit sync\n  contentkit watch --debounce-ms 100\n  contentkit propagate dist/bundle.json --pages dist/page-assets.json"
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log progress at info level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .contentkit directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Scan content once and write the manifest
    #[command(about = "Scan the content directory and generate the type manifest")]
    Sync {
        /// Content root (overrides config)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch content and regenerate on change
    #[command(
        about = "Scan, then keep the manifest up to date until interrupted",
        after_help = "Stop with Ctrl-C. Pending changes are flushed before exit."
    )]
    Watch {
        /// Content root (overrides config)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Debounce window in milliseconds (overrides config)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Substitute asset placeholders in a finished bundle
    #[command(
        about = "Rewrite asset placeholders in bundle output",
        long_about = "Walk the bundle's module graph back to top-level pages, collect the \
                      stylesheets and scripts recorded for them, and substitute the link and \
                      script placeholders in server chunks."
    )]
    Propagate {
        /// Bundle description (JSON)
        #[arg(value_name = "BUNDLE")]
        bundle: PathBuf,

        /// Page asset map (JSON)
        #[arg(long, value_name = "FILE")]
        pages: PathBuf,

        /// Where to write the rewritten bundle (defaults to BUNDLE)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Base path for asset URLs (overrides config)
        #[arg(long)]
        base: Option<String>,

        /// Asset URL prefix, wins over base (overrides config)
        #[arg(long)]
        assets_prefix: Option<String>,

        /// Report leftover placeholders instead of failing
        #[arg(long)]
        allow_leftover: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .contentkit/settings.toml")]
    Config,
}
