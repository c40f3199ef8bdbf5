//! Reserved placeholder tokens and the values that replace them.
//!
//! Tokens are embedded in generated module code as JSON string literals,
//! e.g. `const collectedLinks = "@@CONTENTKIT-LINKS@@";`, and replaced by a
//! JSON array exactly once: either by the dev transform or by the build
//! substitution.

use std::fmt;

use serde::Serialize;

use crate::config::BuildConfig;

use super::bundle::OutputChunk;
use super::error::{PropagationError, PropagationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Inline style descriptors (dev only).
    Styles,
    /// Stylesheet link URLs.
    Links,
    /// Hoisted script descriptors.
    Scripts,
}

impl Placeholder {
    pub const ALL: [Placeholder; 3] = [
        Placeholder::Styles,
        Placeholder::Links,
        Placeholder::Scripts,
    ];

    /// Tokens substituted at build time.
    pub const BUILD: [Placeholder; 2] = [Placeholder::Links, Placeholder::Scripts];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Styles => "@@CONTENTKIT-STYLES@@",
            Placeholder::Links => "@@CONTENTKIT-LINKS@@",
            Placeholder::Scripts => "@@CONTENTKIT-SCRIPTS@@",
        }
    }

    /// The token as it appears in code: a quoted JS string.
    pub fn literal(self) -> String {
        format!("\"{}\"", self.token())
    }

    pub fn is_in(self, code: &str) -> bool {
        code.contains(self.token())
    }

    /// Replace the first occurrence of the quoted token with `json`.
    pub fn replace(self, code: &str, json: &str) -> String {
        code.replacen(&self.literal(), json, 1)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Turns site-relative asset paths into final URLs.
///
/// An assets prefix (typically a CDN origin) wins over the base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    base: String,
    assets_prefix: Option<String>,
}

impl AssetUrls {
    pub fn new(base: impl Into<String>, assets_prefix: Option<String>) -> Self {
        Self {
            base: base.into(),
            assets_prefix: assets_prefix.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_config(build: &BuildConfig) -> Self {
        Self::new(build.base.clone(), build.assets_prefix.clone())
    }

    pub fn prepend(&self, href: &str) -> String {
        match &self.assets_prefix {
            Some(prefix) => join_paths(prefix, href),
            None => prepend_forward_slash(&join_paths(&self.base, href)),
        }
    }
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new("/", None)
    }
}

fn join_paths(left: &str, right: &str) -> String {
    let left = left.trim_end_matches('/');
    let right = right.trim_start_matches('/');
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (false, true) => left.to_string(),
        (false, false) => format!("{left}/{right}"),
    }
}

fn prepend_forward_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptProps {
    pub src: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `{ props: { src, type: "module" }, children: "" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptDescriptor {
    pub props: ScriptProps,
    pub children: String,
}

impl ScriptDescriptor {
    pub fn module(src: impl Into<String>) -> Self {
        Self {
            props: ScriptProps {
                src: src.into(),
                kind: "module".to_string(),
            },
            children: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleProps {
    #[serde(rename = "type")]
    pub kind: String,
    /// Source module, so dev tooling can hot-swap the style.
    #[serde(rename = "data-dev-id", skip_serializing_if = "Option::is_none")]
    pub dev_id: Option<String>,
}

/// Inline `<style>` descriptor used in dev mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDescriptor {
    pub props: StyleProps,
    pub children: String,
}

impl StyleDescriptor {
    pub fn css(content: impl Into<String>, dev_id: Option<String>) -> Self {
        Self {
            props: StyleProps {
                kind: "text/css".to_string(),
                dev_id,
            },
            children: content.into(),
        }
    }
}

/// A chunk that still carries tokens after propagation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leftover {
    pub file_name: String,
    pub placeholders: Vec<Placeholder>,
}

pub fn find_leftovers(chunks: &[OutputChunk]) -> Vec<Leftover> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let placeholders: Vec<_> = Placeholder::ALL
                .into_iter()
                .filter(|p| p.is_in(&chunk.code))
                .collect();
            (!placeholders.is_empty()).then(|| Leftover {
                file_name: chunk.file_name.clone(),
                placeholders,
            })
        })
        .collect()
}

/// Fail when any chunk still carries a placeholder. Leftovers mean a
/// propagation omission, never "no assets".
pub fn ensure_no_leftovers(chunks: &[OutputChunk]) -> PropagationResult<()> {
    let leftovers = find_leftovers(chunks);
    if leftovers.is_empty() {
        return Ok(());
    }
    Err(PropagationError::Leftover {
        chunks: leftovers.into_iter().map(|l| l.file_name).collect(),
    })
}
