//! Entry ids and slugs.
//!
//! Ids are derived from the path relative to the collection directory and
//! always use `/` separators. Content slugs come from the frontmatter
//! override when present, otherwise from the id.

use std::path::{Component, Path};

/// Id of a content entry: relative path including the extension.
///
/// `blog/2024/Hello World.md` inside `blog` -> `2024/Hello World.md`
pub fn content_entry_id(relative: &Path) -> String {
    join_segments(relative)
}

/// Id of a data entry: relative path without the extension.
///
/// `authors/ben.json` inside `authors` -> `ben`
pub fn data_entry_id(relative: &Path) -> String {
    join_segments(&relative.with_extension(""))
}

/// Slug for a content entry.
pub fn resolve_slug(id: &str, frontmatter_slug: Option<&str>) -> String {
    match frontmatter_slug {
        Some(slug) => slug.to_string(),
        None => default_slug(id),
    }
}

/// Derive a slug from a content entry id.
///
/// Each segment is slugified, a trailing `/index` is dropped.
pub fn default_slug(id: &str) -> String {
    let without_ext = match id.rfind('.') {
        Some(dot) if !id[dot..].contains('/') => &id[..dot],
        _ => id,
    };

    let slug = without_ext
        .split('/')
        .map(slugify)
        .collect::<Vec<_>>()
        .join("/");

    match slug.strip_suffix("/index") {
        Some(stripped) => stripped.to_string(),
        None => slug,
    }
}

/// Slugify a single path segment: lowercase, whitespace becomes `-`,
/// punctuation other than `-` and `_` is dropped.
pub fn slugify(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

fn join_segments(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_ids() {
        assert_eq!(content_entry_id(Path::new("post1.md")), "post1.md");
        assert_eq!(
            content_entry_id(Path::new("2024/Hello World.md")),
            "2024/Hello World.md"
        );
        assert_eq!(data_entry_id(Path::new("ben.json")), "ben");
        assert_eq!(data_entry_id(Path::new("team/ben.yaml")), "team/ben");
    }

    #[test]
    fn test_default_slug() {
        assert_eq!(default_slug("post1.md"), "post1");
        assert_eq!(default_slug("2024/Hello World.md"), "2024/hello-world");
        assert_eq!(default_slug("guides/index.md"), "guides");
        assert_eq!(default_slug("index.md"), "index");
        assert_eq!(default_slug("What's New?.mdx"), "whats-new");
    }

    #[test]
    fn test_frontmatter_override_wins() {
        assert_eq!(resolve_slug("post1.md", Some("custom")), "custom");
        assert_eq!(resolve_slug("post1.md", None), "post1");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Café Notes"), "café-notes");
        assert_eq!(slugify("snake_case-ok"), "snake_case-ok");
    }
}
