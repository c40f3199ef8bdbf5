//! Generated type manifest.
//!
//! The manifest is a TypeScript declaration file built from a fixed template
//! with four literal slots. Collections and entries are emitted in
//! lexicographic order, so an unchanged map always renders the same bytes.

use std::path::{Component, Path, PathBuf};

use super::ContentLayout;
use super::collection::{Collection, CollectionMap, EntryKind, EntryMeta};
use super::config_state::ConfigStatus;
use super::error::{ContentError, ContentResult};
use super::loader::ContentDefinition;

const CONTENT_DIR_SLOT: &str = "@@CONTENT_DIR@@";
const ENTRY_GLOB_SLOT: &str = "@@ENTRY_GLOB@@";
const CONTENT_ENTRY_MAP_SLOT: &str = "@@CONTENT_ENTRY_MAP@@";
const DATA_ENTRY_MAP_SLOT: &str = "@@DATA_ENTRY_MAP@@";
const CONFIG_TYPE_SLOT: &str = "@@CONTENT_CONFIG_TYPE@@";

const TEMPLATE: &str = r#"// Generated by contentkit. Do not edit.
declare module 'contentkit:content' {
	type Flatten<T> = T extends { [K: string]: infer U } ? U : never;

	export type CollectionKey = keyof AnyEntryMap;
	export type CollectionEntry<C extends CollectionKey> = Flatten<AnyEntryMap[C]>;

	export type ContentCollectionKey = keyof ContentEntryMap;
	export type DataCollectionKey = keyof DataEntryMap;

	export const contentDir: "@@CONTENT_DIR@@";
	export const entryGlob: @@ENTRY_GLOB@@;

	type AnyEntryMap = ContentEntryMap & DataEntryMap;

	type InferEntrySchema<C extends keyof AnyEntryMap> = import('contentkit:schema').Infer<
		ContentConfig['collections'][C]
	>;

	type ContentEntryMap = {
@@CONTENT_ENTRY_MAP@@
	};

	type DataEntryMap = {
@@DATA_ENTRY_MAP@@
	};

	type ContentConfig = @@CONTENT_CONFIG_TYPE@@;
}
"#;

/// Renders and writes the manifest file.
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    path: PathBuf,
    content_dir: String,
    entry_glob: String,
    config_import: String,
}

impl ManifestWriter {
    /// `config_import` overrides the module specifier used for the config
    /// type; by default it is the config file relative to the manifest.
    pub fn new(layout: &ContentLayout, path: PathBuf, config_import: Option<String>) -> Self {
        let manifest_dir = path.parent().unwrap_or(Path::new("."));
        let content_dir = to_slash(&relative_path(manifest_dir, layout.root()));
        let config_import = config_import
            .unwrap_or_else(|| to_slash(&relative_path(manifest_dir, layout.config_path())));

        Self {
            path,
            content_dir,
            entry_glob: entry_glob(layout),
            config_import,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the manifest for the given state.
    pub fn render(&self, map: &CollectionMap, config: &ConfigStatus) -> String {
        let definition = config.definition();

        let mut content_map = String::new();
        let mut data_map = String::new();

        for (name, collection) in map.iter() {
            let kind = resolved_kind(collection, name, definition);
            let schema = schema_ref(name, definition);
            let target = match kind {
                EntryKind::Content => &mut content_map,
                EntryKind::Data => &mut data_map,
            };
            render_collection(target, name, collection, &schema);
        }

        let config_type = match definition {
            Some(_) => format!("typeof import({})", quote(&self.config_import)),
            None => "never".to_string(),
        };

        fill_slots(
            TEMPLATE,
            &[
                (CONTENT_DIR_SLOT, escape_inner(&self.content_dir).as_str()),
                (ENTRY_GLOB_SLOT, self.entry_glob.as_str()),
                (CONTENT_ENTRY_MAP_SLOT, content_map.trim_end_matches('\n')),
                (DATA_ENTRY_MAP_SLOT, data_map.trim_end_matches('\n')),
                (CONFIG_TYPE_SLOT, config_type.as_str()),
            ],
        )
    }

    /// Render and write the whole file, creating the directory if needed.
    pub fn write(&self, map: &CollectionMap, config: &ConfigStatus) -> ContentResult<&Path> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ContentError::ManifestWrite {
                path: self.path.clone(),
                source,
            })?;
        }

        std::fs::write(&self.path, self.render(map, config)).map_err(|source| {
            ContentError::ManifestWrite {
                path: self.path.clone(),
                source,
            }
        })?;

        crate::debug_event!("manifest", "written", "{}", self.path.display());
        Ok(&self.path)
    }
}

/// Substitute every slot in one pass over the template. Values are never
/// rescanned, so user text that looks like a slot is emitted as is.
fn fill_slots(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((at, slot, value)) = slots
        .iter()
        .filter_map(|&(slot, value)| rest.find(slot).map(|at| (at, slot, value)))
        .min_by_key(|&(at, ..)| at)
    {
        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + slot.len()..];
    }

    out.push_str(rest);
    out
}

/// An entry-less collection takes the kind the config declares for it,
/// falling back to content.
fn resolved_kind(
    collection: &Collection,
    name: &str,
    definition: Option<&ContentDefinition>,
) -> EntryKind {
    collection
        .kind()
        .or_else(|| definition.and_then(|d| d.collection(name)).and_then(|c| c.kind))
        .unwrap_or(EntryKind::Content)
}

fn schema_ref(name: &str, definition: Option<&ContentDefinition>) -> String {
    if definition.is_some_and(|d| d.validates(name)) {
        format!("InferEntrySchema<{}>", quote(name))
    } else {
        "any".to_string()
    }
}

fn render_collection(out: &mut String, name: &str, collection: &Collection, schema: &str) {
    let key = quote(name);
    out.push_str(&format!("\t\t{key}: {{\n"));
    for (id, meta) in collection.entries() {
        let id_lit = quote(id);
        match meta {
            EntryMeta::Content { slug } => {
                let ext = Path::new(id)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("md");
                out.push_str(&format!(
                    "\t\t\t{id_lit}: {{\n\t\t\t\tid: {id_lit};\n\t\t\t\tslug: {};\n\t\t\t\tbody: string;\n\t\t\t\tcollection: {key};\n\t\t\t\tdata: {schema};\n\t\t\t}} & {{ render(): Render[{}] }};\n",
                    quote(slug),
                    quote(&format!(".{ext}")),
                ));
            }
            EntryMeta::Data => {
                out.push_str(&format!(
                    "\t\t\t{id_lit}: {{\n\t\t\t\tid: {id_lit};\n\t\t\t\tcollection: {key};\n\t\t\t\tdata: {schema};\n\t\t\t}};\n"
                ));
            }
        }
    }
    out.push_str("\t\t};\n");
}

fn entry_glob(layout: &ContentLayout) -> String {
    let pattern = |exts: Vec<&str>| match exts.as_slice() {
        [] => String::new(),
        [one] => format!("**/*.{one}"),
        many => format!("**/*.{{{}}}", many.join(",")),
    };
    let globs: Vec<String> = [
        pattern(layout.content_extensions().collect()),
        pattern(layout.data_extensions().collect()),
    ]
    .into_iter()
    .filter(|g| !g.is_empty())
    .collect();

    serde_json::to_string(&globs).unwrap_or_else(|_| "[]".to_string())
}

/// JSON string literal, which is also a valid TypeScript string literal.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

/// Escape for use inside an existing pair of quotes.
fn escape_inner(s: &str) -> String {
    let quoted = quote(s);
    quoted[1..quoted.len() - 1].to_string()
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

/// Path of `to` relative to directory `from`. Both are expected to be
/// absolute; if they share no root, `to` is returned unchanged.
fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return to.to_path_buf();
    }

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for part in &to_parts[common..] {
        rel.push(part.as_os_str());
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::CollectionDefinition;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn layout() -> ContentLayout {
        ContentLayout::new("/site/src/content", "config.toml", ["md", "mdx"], ["json"])
    }

    fn writer() -> ManifestWriter {
        ManifestWriter::new(&layout(), PathBuf::from("/site/.contentkit/types.d.ts"), None)
    }

    fn sample_map() -> CollectionMap {
        let mut map = CollectionMap::new();
        map.add_collection("blog");
        map.add_collection("authors");
        map.insert_entry(
            "blog",
            "b.md",
            EntryMeta::Content {
                slug: "b".to_string(),
            },
            Path::new("/c/blog/b.md"),
        )
        .unwrap();
        map.insert_entry(
            "blog",
            "a.md",
            EntryMeta::Content {
                slug: "custom".to_string(),
            },
            Path::new("/c/blog/a.md"),
        )
        .unwrap();
        map.insert_entry("authors", "ben", EntryMeta::Data, Path::new("/c/authors/ben.json"))
            .unwrap();
        map
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            relative_path(Path::new("/site/.contentkit"), Path::new("/site/src/content")),
            PathBuf::from("../src/content")
        );
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c.toml")),
            PathBuf::from("c.toml")
        );
    }

    #[test]
    fn test_slot_lookalikes_in_entries_are_left_alone() {
        let mut map = CollectionMap::new();
        map.add_collection("blog");
        map.insert_entry(
            "blog",
            "a.md",
            EntryMeta::Content {
                slug: CONFIG_TYPE_SLOT.to_string(),
            },
            Path::new("/c/blog/a.md"),
        )
        .unwrap();
        map.insert_entry(
            "blog",
            "@@DATA_ENTRY_MAP@@.md",
            EntryMeta::Content {
                slug: "b".to_string(),
            },
            Path::new("/c/blog/@@DATA_ENTRY_MAP@@.md"),
        )
        .unwrap();

        let out = writer().render(&map, &ConfigStatus::DoesNotExist);

        assert!(out.contains(r#"slug: "@@CONTENT_CONFIG_TYPE@@";"#));
        assert!(out.contains(r#""@@DATA_ENTRY_MAP@@.md": {"#));
        assert!(out.contains("type ContentConfig = never;"));
        assert_eq!(out.matches("type ContentConfig").count(), 1);
    }

    #[test]
    fn test_render_fills_every_slot() {
        let out = writer().render(&sample_map(), &ConfigStatus::DoesNotExist);

        assert!(!out.contains("@@"));
        assert!(out.contains(r#"contentDir: "../src/content""#));
        assert!(out.contains(r#"entryGlob: ["**/*.{md,mdx}","**/*.json"]"#));
        assert!(out.contains("type ContentConfig = never;"));
    }

    #[test]
    fn test_entries_sorted_and_typed() {
        let out = writer().render(&sample_map(), &ConfigStatus::DoesNotExist);

        let a = out.find(r#""a.md": {"#).unwrap();
        let b = out.find(r#""b.md": {"#).unwrap();
        assert!(a < b);
        assert!(out.contains(r#"slug: "custom";"#));
        assert!(out.contains(r#"render(): Render[".md"]"#));
        assert!(out.contains("data: any;"));

        let content_section = out.find("type ContentEntryMap").unwrap();
        let data_section = out.find("type DataEntryMap").unwrap();
        let authors = out.find(r#""authors": {"#).unwrap();
        assert!(authors > data_section);
        assert!(out.find(r#""blog": {"#).unwrap() > content_section);
    }

    #[test]
    fn test_schema_reference_with_validating_config() {
        let mut def = ContentDefinition::default();
        let mut schema = toml::Table::new();
        schema.insert("title".to_string(), toml::Value::from("string"));
        def.collections.insert(
            "blog".to_string(),
            CollectionDefinition {
                kind: None,
                schema: Some(schema),
            },
        );
        let status = ConfigStatus::Loaded(Arc::new(def));

        let out = writer().render(&sample_map(), &status);
        assert!(out.contains(r#"data: InferEntrySchema<"blog">;"#));
        // authors has no schema
        assert!(out.contains("data: any;"));
        assert!(
            out.contains(r#"type ContentConfig = typeof import("../src/content/config.toml");"#)
        );
    }

    #[test]
    fn test_empty_collection_uses_declared_kind() {
        let mut map = CollectionMap::new();
        map.add_collection("people");

        let mut def = ContentDefinition::default();
        def.collections.insert(
            "people".to_string(),
            CollectionDefinition {
                kind: Some(EntryKind::Data),
                schema: None,
            },
        );

        let out = writer().render(&map, &ConfigStatus::Loaded(Arc::new(def)));
        let data_section = out.find("type DataEntryMap").unwrap();
        assert!(out.find(r#""people": {"#).unwrap() > data_section);
    }

    #[test]
    fn test_write_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("types.d.ts");
        let writer = ManifestWriter::new(&layout(), path.clone(), None);
        let map = sample_map();

        writer.write(&map, &ConfigStatus::DoesNotExist).unwrap();
        let first = std::fs::read(&path).unwrap();
        writer.write(&map, &ConfigStatus::DoesNotExist).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }
}
