use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn contentkit(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_contentkit"))
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run contentkit")
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = contentkit(temp_dir.path(), &["init"]);
    assert!(output.status.success());

    let config_path = temp_dir.path().join(".contentkit/settings.toml");
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[content]"));
    assert!(content.contains("[build]"));

    // A second init without --force refuses to overwrite
    let output = contentkit(temp_dir.path(), &["init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--force"));

    let output = contentkit(temp_dir.path(), &["init", "--force"]);
    assert!(output.status.success());
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir.path().join(".contentkit/settings.toml"),
        r#"
version = 2
[content]
debounce_ms = 250
"#,
    );

    let output = contentkit(temp_dir.path(), &["config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 2"));
    assert!(stdout.contains("debounce_ms = 250"));
    // Untouched values keep their defaults
    assert!(stdout.contains("file_name = \"content-types.d.ts\""));
}

#[test]
fn test_sync_writes_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    assert!(contentkit(root, &["init"]).status.success());

    write(&root.join("src/content/blog/first-post.md"), "# Hello\n");
    write(
        &root.join("src/content/blog/second.md"),
        "---\nslug: custom-slug\n---\nBody\n",
    );
    write(&root.join("src/content/authors/ben.json"), "{}");
    write(&root.join("src/content/blog/_draft.md"), "# Draft\n");

    let output = contentkit(root, &["sync"]);
    assert!(output.status.success(), "{output:?}");

    let manifest =
        std::fs::read_to_string(root.join(".contentkit/content-types.d.ts")).unwrap();
    assert!(manifest.contains("\"blog\": {"));
    assert!(manifest.contains("\"first-post.md\": {"));
    assert!(manifest.contains("slug: \"first-post\";"));
    assert!(manifest.contains("slug: \"custom-slug\";"));
    assert!(manifest.contains("\"authors\": {"));
    assert!(manifest.contains("\"ben\": {"));
    assert!(!manifest.contains("_draft"));
    // No config file, so the config type is never
    assert!(manifest.contains("type ContentConfig = never;"));
}

#[test]
fn test_sync_json_reports_unsupported_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    assert!(contentkit(root, &["init"]).status.success());

    write(&root.join("src/content/blog/post.md"), "# Post\n");
    write(&root.join("src/content/blog/notes.txt"), "scratch");

    let output = contentkit(root, &["sync", "--json"]);
    assert!(output.status.success(), "{output:?}");

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let warnings = report["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("notes.txt"));
    assert_eq!(report["regenerated"], true);
}

#[test]
fn test_sync_without_content_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    assert!(contentkit(root, &["init"]).status.success());

    let output = contentkit(root, &["sync"]);
    assert!(output.status.success());
    assert!(!root.join(".contentkit/content-types.d.ts").exists());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No content directory"));
}

const BUNDLE: &str = r#"{
  "server": [
    {
      "fileName": "chunks/post.mjs",
      "code": "const collectedLinks = \"@@CONTENTKIT-LINKS@@\";\nconst collectedScripts = \"@@CONTENTKIT-SCRIPTS@@\";",
      "moduleIds": ["src/content/post.md"]
    }
  ],
  "client": [],
  "modules": [
    { "id": "src/pages/index.page", "importers": ["\u0000page:src/pages/index.page"] },
    { "id": "src/content/post.md", "importers": ["src/pages/index.page"] }
  ]
}"#;

const PAGES: &str = r#"{
  "src/pages/index.page": {
    "src/content/post.md": { "styles": ["/assets/post.css"] }
  }
}"#;

fn propagate(root: &Path, extra: &[&str]) -> Output {
    let mut args = vec![
        "propagate",
        "bundle.json",
        "--pages",
        "pages.json",
        "--out",
        "out.json",
    ];
    args.extend_from_slice(extra);
    contentkit(root, &args)
}

#[test]
fn test_propagate_fails_on_leftover_placeholders() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("bundle.json"), BUNDLE);
    write(&root.join("pages.json"), PAGES);

    let output = propagate(root, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("chunks/post.mjs"));
}

#[test]
fn test_propagate_allow_leftover() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("bundle.json"), BUNDLE);
    write(&root.join("pages.json"), PAGES);

    let output = propagate(root, &["--allow-leftover"]);
    assert!(output.status.success(), "{output:?}");

    let out: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(root.join("out.json")).unwrap()).unwrap();
    let code = out["server"][0]["code"].as_str().unwrap();
    assert!(code.starts_with(r#"const collectedLinks = ["/assets/post.css"];"#));
    assert!(code.contains("@@CONTENTKIT-SCRIPTS@@"));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("still contains @@CONTENTKIT-SCRIPTS@@"));
}

#[test]
fn test_propagate_with_assets_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(&root.join("bundle.json"), BUNDLE);
    write(&root.join("pages.json"), PAGES);

    let output = propagate(
        root,
        &["--assets-prefix", "https://cdn.example.com", "--allow-leftover"],
    );
    assert!(output.status.success(), "{output:?}");

    let out = std::fs::read_to_string(root.join("out.json")).unwrap();
    assert!(out.contains("https://cdn.example.com/assets/post.css"));
}
