//! Frontmatter extraction for content entries.
//!
//! The tracker only needs the optional `slug` override; everything else is
//! kept as loosely-typed fields for callers that want it.

use std::path::Path;

use serde_json::{Map, Value};

use super::error::{ContentError, ContentResult};

/// Parsed frontmatter fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub fields: Map<String, Value>,
}

impl Frontmatter {
    /// The slug override, if the frontmatter carries a string `slug`.
    pub fn slug(&self) -> Option<&str> {
        self.fields.get("slug").and_then(Value::as_str)
    }
}

/// Extracts frontmatter from raw entry text.
pub trait FrontmatterReader: Send + Sync {
    fn read(&self, raw: &str, path: &Path) -> ContentResult<Frontmatter>;
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    /// YAML delimited by `---`.
    Yaml,
    /// TOML delimited by `+++`.
    Toml,
}

impl Delimiter {
    fn token(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Default reader: YAML (`---`) or TOML (`+++`) fenced block at the top of
/// the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFrontmatter;

impl FrontmatterReader for YamlFrontmatter {
    fn read(&self, raw: &str, path: &Path) -> ContentResult<Frontmatter> {
        let Some((delimiter, block)) = split(raw) else {
            return Ok(Frontmatter::default());
        };

        if block.trim().is_empty() {
            return Ok(Frontmatter::default());
        }

        let value: Value = match delimiter {
            Delimiter::Yaml => serde_yaml::from_str(block).map_err(|e| frontmatter_error(path, e))?,
            Delimiter::Toml => toml::from_str(block).map_err(|e| frontmatter_error(path, e))?,
        };

        match value {
            Value::Object(fields) => Ok(Frontmatter { fields }),
            Value::Null => Ok(Frontmatter::default()),
            other => Err(ContentError::Frontmatter {
                path: path.to_path_buf(),
                reason: format!("expected a mapping, found {other}"),
            }),
        }
    }
}

fn frontmatter_error(path: &Path, e: impl std::fmt::Display) -> ContentError {
    ContentError::Frontmatter {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Find the fenced block. The opening fence must be the first line; the
/// closing fence must sit on its own line.
fn split(raw: &str) -> Option<(Delimiter, &str)> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let first_line = raw.lines().next()?.trim_end();

    let delimiter = match first_line {
        "---" => Delimiter::Yaml,
        "+++" => Delimiter::Toml,
        _ => return None,
    };

    let body_start = raw.find('\n')? + 1;
    let rest = &raw[body_start..];

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter.token() {
            return Some((delimiter, &rest[..offset]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(raw: &str) -> ContentResult<Frontmatter> {
        YamlFrontmatter.read(raw, Path::new("/c/blog/post.md"))
    }

    #[test]
    fn test_yaml_slug() {
        let fm = read("---\ntitle: Hello\nslug: custom\n---\n\nBody text").unwrap();
        assert_eq!(fm.slug(), Some("custom"));
        assert_eq!(fm.fields.get("title"), Some(&Value::from("Hello")));
    }

    #[test]
    fn test_toml_slug() {
        let fm = read("+++\nslug = \"from-toml\"\n+++\nBody").unwrap();
        assert_eq!(fm.slug(), Some("from-toml"));
    }

    #[test]
    fn test_non_string_slug_is_not_an_override() {
        let fm = read("---\nslug: 42\n---\n").unwrap();
        assert_eq!(fm.slug(), None);
    }

    #[test]
    fn test_missing_frontmatter() {
        assert_eq!(read("# Just a heading\n").unwrap(), Frontmatter::default());
        assert_eq!(read("---\nunterminated: true\n").unwrap(), Frontmatter::default());
        assert_eq!(read("---\n---\nbody").unwrap(), Frontmatter::default());
    }

    #[test]
    fn test_dashes_inside_body_are_not_a_fence() {
        let fm = read("---\nslug: a---b\n---\n---\n").unwrap();
        assert_eq!(fm.slug(), Some("a---b"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let err = read("---\nslug: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, ContentError::Frontmatter { .. }));
        assert!(!err.is_recoverable());
    }
}
