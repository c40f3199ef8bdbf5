use clap::Parser;

use contentkit::cli::commands::{init, propagate, sync, watch};
use contentkit::cli::{Cli, Commands, load_settings};
use contentkit::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Init runs before any settings exist
    if let Commands::Init { force } = cli.command {
        return init::run_init(force);
    }

    let mut settings = load_settings(cli.config.as_deref())?;
    logging::init_with_config(&settings.logging, cli.verbose);

    match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&settings),
        Commands::Sync { root, json } => {
            if let Some(root) = root {
                settings.content.root = std::path::absolute(root)?;
            }
            sync::run_sync(&settings, json).await
        }
        Commands::Watch { root, debounce_ms } => {
            if let Some(root) = root {
                settings.content.root = std::path::absolute(root)?;
            }
            if let Some(ms) = debounce_ms {
                settings.content.debounce_ms = ms;
            }
            watch::run_watch(&settings).await
        }
        Commands::Propagate {
            bundle,
            pages,
            out,
            base,
            assets_prefix,
            allow_leftover,
        } => propagate::run_propagate(
            &settings,
            propagate::PropagateArgs {
                bundle,
                pages,
                out,
                base,
                assets_prefix,
                allow_leftover,
            },
        ),
    }
}
