//! Configuration loading and validation tests using explicit file paths.

use std::io::Write;

use semrel::config::{load_config, Config};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_config_from_explicit_path() {
    let file = write_config(
        r#"
        [project]
        name = "myapp"

        [[branches]]
        pattern = "main"
        channel = "stable"

        [[targets]]
        os = "linux"
        arch = "x86_64"
        ext = "tar.gz"
        command = "make dist"
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.project.name, "myapp");
    assert_eq!(config.branches.len(), 1);
    assert_eq!(config.targets[0].command.as_deref(), Some("make dist"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_config_missing_explicit_path_fails() {
    let result = load_config(Some("/nonexistent/semrel.toml"));
    assert!(result.is_err());
}

#[test]
fn test_load_config_malformed_toml_fails() {
    let file = write_config("[project\nname = broken");
    let result = load_config(Some(file.path().to_str().unwrap()));
    assert!(result.is_err());
}

#[test]
fn test_partial_config_fills_defaults() {
    // Only the project table set; branch rules and commit settings default
    let file = write_config(
        r#"
        [project]
        name = "partial"
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.project.name, "partial");
    assert_eq!(config.branches.len(), 4);
    assert_eq!(config.branches[0].pattern, "main");
    assert!(config.targets.is_empty());
    assert!(config
        .conventional_commits
        .breaking_change_indicators
        .contains(&"BREAKING CHANGE:".to_string()));
    assert!(config.hooks.pre_dispatch.is_none());
}

#[test]
fn test_custom_breaking_indicators_drive_classification() {
    use semrel::engine::{CommitImpact, ConventionalEngine, PolicyEngine};

    let file = write_config(
        r#"
        [conventional_commits]
        breaking_change_indicators = ["MAJOR:"]
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    let engine = ConventionalEngine::new(config.conventional_commits);

    assert_eq!(
        engine.classify("fix: rename\n\nMAJOR: field renamed"),
        CommitImpact::Breaking
    );
    assert_eq!(
        engine.classify("fix: rename\n\nBREAKING CHANGE: ignored now"),
        CommitImpact::Fix
    );
}

#[test]
fn test_hooks_config_parses() {
    let file = write_config(
        r#"
        [hooks]
        pre_dispatch = "scripts/check.sh"
        post_publish = "scripts/notify.sh"
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.hooks.pre_dispatch.as_deref(), Some("scripts/check.sh"));
    assert!(config.hooks.pre_publish.is_none());
    assert_eq!(config.hooks.post_publish.as_deref(), Some("scripts/notify.sh"));
}

#[test]
fn test_validation_failures_surface_through_loaded_config() {
    let file = write_config(
        r#"
        [[branches]]
        pattern = "main"
        channel = "nightly"
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("channel") || err.to_string().contains("nightly"));
}

#[test]
fn test_custom_tag_pattern_roundtrip() {
    let file = write_config(
        r#"
        [[branches]]
        pattern = "release/*"
        channel = "rc"
        tag_pattern = "app-v{version}"
        "#,
    );

    let config = load_config(Some(file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.branches[0].tag_pattern, "app-v{version}");
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_config_is_serializable() {
    let config = Config::default();
    let serialized = toml::to_string(&config).unwrap();
    let reparsed: Config = toml::from_str(&serialized).unwrap();
    assert_eq!(reparsed.branches.len(), config.branches.len());
}
