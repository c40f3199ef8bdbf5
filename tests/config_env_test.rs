use contentkit::Settings;
use std::env;
use tempfile::TempDir;

#[test]
fn test_env_override_with_nested_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[content]
debounce_ms = 100

[build]
base = "/docs/"
"#,
    )
    .unwrap();

    unsafe {
        // Double underscore separates nested levels
        env::set_var("CK_CONTENT__DEBOUNCE_MS", "75");
        env::set_var("CK_BUILD__ASSETS_PREFIX", "https://cdn.example.com");
    }

    let settings = Settings::load_from(&path).unwrap();

    unsafe {
        env::remove_var("CK_CONTENT__DEBOUNCE_MS");
        env::remove_var("CK_BUILD__ASSETS_PREFIX");
    }

    // Environment wins over the file
    assert_eq!(settings.content.debounce_ms, 75);
    assert_eq!(
        settings.build.assets_prefix.as_deref(),
        Some("https://cdn.example.com")
    );
    // File wins over defaults
    assert_eq!(settings.build.base, "/docs/");
    assert_eq!(settings.manifest.file_name, "content-types.d.ts");
}
