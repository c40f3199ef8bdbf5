//! Description of a finished bundle, as handed over by the bundler's
//! post-build hook.
//!
//! ```json
//! {
//!   "server": [{ "fileName": "pages/index.mjs", "code": "...", "moduleIds": ["src/pages/index.page"] }],
//!   "client": [{ "fileName": "assets/hoisted.js", "moduleIds": ["src/pages/index.page?script"] }],
//!   "modules": [{ "id": "src/components/Card.ts", "importers": ["src/pages/index.page"] }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{PropagationError, PropagationResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    #[default]
    Chunk,
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputChunk {
    pub file_name: String,
    #[serde(default)]
    pub kind: ChunkKind,
    #[serde(default)]
    pub code: String,
    /// Modules bundled into this chunk.
    #[serde(default)]
    pub module_ids: Vec<String>,
}

impl OutputChunk {
    pub fn new(file_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            kind: ChunkKind::Chunk,
            code: code.into(),
            module_ids: Vec::new(),
        }
    }

    pub fn with_modules<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn contains_module(&self, id: &str) -> bool {
        self.module_ids.iter().any(|m| m == id)
    }
}

/// Per-module metadata the bundler exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: String,
    #[serde(default)]
    pub importers: Vec<String>,
    #[serde(default)]
    pub dynamic_importers: Vec<String>,
}

/// Replacement code for one server chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMutation {
    pub file_name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOutput {
    #[serde(default)]
    pub server: Vec<OutputChunk>,
    #[serde(default)]
    pub client: Vec<OutputChunk>,
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,
}

impl BundleOutput {
    pub fn load(path: &Path) -> PropagationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PropagationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| PropagationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> PropagationResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| PropagationError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply code replacements to server chunks. The bundle is left
    /// untouched if any mutation names an unknown chunk.
    pub fn apply(&mut self, mutations: Vec<ChunkMutation>) -> PropagationResult<()> {
        let mut targets = Vec::with_capacity(mutations.len());
        for mutation in &mutations {
            let index = self
                .server
                .iter()
                .position(|c| c.file_name == mutation.file_name)
                .ok_or_else(|| PropagationError::UnknownChunk {
                    file_name: mutation.file_name.clone(),
                })?;
            targets.push(index);
        }

        for (index, mutation) in targets.into_iter().zip(mutations) {
            self.server[index].code = mutation.code;
        }
        Ok(())
    }
}
