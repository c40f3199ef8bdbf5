//! Propagation wrapper modules.
//!
//! A content module requested with the `?propagatedAssets` flag resolves to
//! a small wrapper that lazily imports the real module and carries the
//! asset lists for whichever page ends up rendering it. In build mode those
//! lists are placeholder tokens filled in by [`super::propagate_assets`];
//! in dev mode the transform inlines them directly.

use serde::Serialize;

use super::error::PropagationResult;
use super::placeholder::{AssetUrls, Placeholder, ScriptDescriptor, StyleDescriptor};

/// Query flag marking a propagation request.
pub const PROPAGATED_ASSET_FLAG: &str = "propagatedAssets";

/// Which pipeline the wrapper is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperMode {
    Dev,
    Build,
}

/// Whether a module id carries the propagation flag in its query.
pub fn has_propagation_flag(id: &str) -> bool {
    let Some((_, query)) = id.split_once('?') else {
        return false;
    };
    query.split('&').any(is_flag_param)
}

/// Module id with the propagation flag removed from its query.
pub fn strip_propagation_flag(id: &str) -> String {
    let Some((path, query)) = id.split_once('?') else {
        return id.to_string();
    };
    let rest: Vec<&str> = query
        .split('&')
        .filter(|param| !param.is_empty() && !is_flag_param(param))
        .collect();
    if rest.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", rest.join("&"))
    }
}

fn is_flag_param(param: &str) -> bool {
    param == PROPAGATED_ASSET_FLAG
        || param
            .strip_prefix(PROPAGATED_ASSET_FLAG)
            .is_some_and(|rest| rest.starts_with('='))
}

/// Render the wrapper for a flagged module id.
///
/// Build mode has no inline styles; every stylesheet is emitted as a link.
pub fn render_wrapper(id: &str, mode: WrapperMode) -> PropagationResult<String> {
    let target = serde_json::to_string(&strip_propagation_flag(id))?;
    let styles = match mode {
        WrapperMode::Dev => Placeholder::Styles.literal(),
        WrapperMode::Build => "[]".to_string(),
    };

    Ok(format!(
        "async function getMod() {{\n\
         \treturn import({target});\n\
         }}\n\
         const collectedLinks = {links};\n\
         const collectedStyles = {styles};\n\
         const collectedScripts = {scripts};\n\
         const defaultMod = {{ __propagation: true, getMod, collectedLinks, collectedStyles, collectedScripts }};\n\
         export default defaultMod;\n",
        links = Placeholder::Links.literal(),
        scripts = Placeholder::Scripts.literal(),
    ))
}

/// Assets known to the dev server for one flagged module.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DevAssets {
    pub links: Vec<String>,
    pub styles: Vec<StyleDescriptor>,
    /// Script URLs, before base prefixing.
    pub scripts: Vec<String>,
}

/// Dev-mode transform: replace all three tokens with the resolved lists.
/// Empty lists are still substituted, so no token survives into the
/// build-time pass.
pub fn transform_dev(
    code: &str,
    assets: &DevAssets,
    urls: &AssetUrls,
) -> PropagationResult<String> {
    let links: Vec<String> = assets.links.iter().map(|l| urls.prepend(l)).collect();
    let scripts: Vec<ScriptDescriptor> = assets
        .scripts
        .iter()
        .map(|s| ScriptDescriptor::module(urls.prepend(s)))
        .collect();

    let code = Placeholder::Links.replace(code, &serde_json::to_string(&links)?);
    let code = Placeholder::Styles.replace(&code, &serde_json::to_string(&assets.styles)?);
    let code = Placeholder::Scripts.replace(&code, &serde_json::to_string(&scripts)?);
    Ok(code)
}
