//! Propagate command: substitute asset placeholders in bundle output.

use std::path::PathBuf;

use crate::config::Settings;
use crate::propagation::{
    AssetUrls, BundleOutput, ImportedByPageEntry, PageAssetMap, ensure_no_leftovers,
    find_leftovers, propagate_assets,
};

pub struct PropagateArgs {
    pub bundle: PathBuf,
    pub pages: PathBuf,
    pub out: Option<PathBuf>,
    pub base: Option<String>,
    pub assets_prefix: Option<String>,
    pub allow_leftover: bool,
}

pub fn run_propagate(settings: &Settings, args: PropagateArgs) -> anyhow::Result<()> {
    let mut bundle = BundleOutput::load(&args.bundle)?;
    let pages = PageAssetMap::load(&args.pages)?;

    let mut build = settings.build.clone();
    if let Some(base) = args.base {
        build.base = base;
    }
    if args.assets_prefix.is_some() {
        build.assets_prefix = args.assets_prefix;
    }

    let urls = AssetUrls::from_config(&build);
    let top_level = ImportedByPageEntry::new(build.page_importer_prefix.clone());

    let mutations = propagate_assets(&bundle, &pages, top_level, &urls)?;
    let rewritten = mutations.len();
    bundle.apply(mutations)?;

    let out = args.out.unwrap_or(args.bundle);
    bundle.save(&out)?;
    println!("Rewrote {rewritten} chunk(s) -> {}", out.display());

    if args.allow_leftover {
        for leftover in find_leftovers(&bundle.server) {
            let tokens: Vec<_> = leftover.placeholders.iter().map(|p| p.token()).collect();
            eprintln!(
                "warning: {} still contains {}",
                leftover.file_name,
                tokens.join(", ")
            );
        }
        return Ok(());
    }

    ensure_no_leftovers(&bundle.server)?;
    Ok(())
}
