//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Removes the variable on creation and on drop so tests never see each other's values.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

#[test]
fn default_config_path_points_into_endless_list_dir() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("endless-list") && path_str.ends_with("config.toml"),
        "unexpected default config path: {path_str}"
    );
}

#[test]
fn default_log_path_ends_with_log_file_name() {
    assert!(default_log_path().to_string_lossy().ends_with("endless-demo.log"));
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    assert_eq!(load_config_file("/nonexistent/path/to/config.toml"), Ok(None));
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = write_temp(
        "endless_test_config.toml",
        r#"
threshold = 3
page_size = 20
total_pages = 4
load_delay_ms = 250
layout = "staggered"
tracks = 2
bidirectional = true
placeholder = false
log_level = "debug"
"#,
    );

    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(config.threshold, Some(3));
    assert_eq!(config.page_size, Some(20));
    assert_eq!(config.total_pages, Some(4));
    assert_eq!(config.load_delay_ms, Some(250));
    assert_eq!(config.layout, Some(LayoutKind::Staggered));
    assert_eq!(config.tracks, Some(2));
    assert_eq!(config.bidirectional, Some(true));
    assert_eq!(config.placeholder, Some(false));
    assert_eq!(config.log_level.as_deref(), Some("debug"));

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = write_temp("endless_test_invalid.toml", "threshold = = 3");

    let result = load_config_file(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));

    fs::remove_file(path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"dark\"");
    assert!(result.is_err(), "unknown keys must be rejected");
}

#[test]
fn config_file_rejects_unknown_layout() {
    let result: Result<ConfigFile, _> = toml::from_str("layout = \"grid\"");
    assert!(result.is_err());
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_keeps_defaults_for_missing_fields() {
    let file = ConfigFile {
        page_size: Some(3),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(file));
    let defaults = ResolvedConfig::default();
    assert_eq!(resolved.page_size, 3);
    assert_eq!(resolved.threshold, defaults.threshold);
    assert_eq!(resolved.layout, defaults.layout);
    assert_eq!(resolved.log_file_path, defaults.log_file_path);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.threshold, 1);
    assert_eq!(config.page_size, 8);
    assert_eq!(config.total_pages, 10);
    assert_eq!(config.load_delay_ms, 1000);
    assert_eq!(config.layout, LayoutKind::Linear);
    assert_eq!(config.tracks, 3);
    assert!(!config.bidirectional);
    assert!(config.placeholder);
    assert_eq!(config.log_level, "info");
}

mod validate {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ResolvedConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        for threshold in [0, -1] {
            let config = ResolvedConfig {
                threshold,
                ..ResolvedConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue { field: "threshold", .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_sizes() {
        let zero_page = ResolvedConfig {
            page_size: 0,
            ..ResolvedConfig::default()
        };
        let zero_tracks = ResolvedConfig {
            tracks: 0,
            ..ResolvedConfig::default()
        };
        assert!(matches!(
            zero_page.validate(),
            Err(ConfigError::InvalidValue { field: "page_size", .. })
        ));
        assert!(matches!(
            zero_tracks.validate(),
            Err(ConfigError::InvalidValue { field: "tracks", .. })
        ));
    }
}

#[test]
fn layout_kind_parses_case_insensitively() {
    assert_eq!("Staggered".parse::<LayoutKind>(), Ok(LayoutKind::Staggered));
    assert_eq!(" linear ".parse::<LayoutKind>(), Ok(LayoutKind::Linear));
    assert!("grid".parse::<LayoutKind>().is_err());
    assert_eq!(LayoutKind::Staggered.to_string(), "staggered");
}

#[test]
#[serial(endless_env)]
fn apply_env_overrides_reads_threshold_and_layout() {
    let _threshold = EnvGuard::new(THRESHOLD_ENV);
    let _layout = EnvGuard::new(LAYOUT_ENV);
    env::set_var(THRESHOLD_ENV, "4");
    env::set_var(LAYOUT_ENV, "staggered");

    let result = apply_env_overrides(ResolvedConfig::default()).unwrap();
    assert_eq!(result.threshold, 4);
    assert_eq!(result.layout, LayoutKind::Staggered);
    assert_eq!(result.page_size, ResolvedConfig::default().page_size);
}

#[test]
#[serial(endless_env)]
fn apply_env_overrides_no_change_when_unset() {
    let _threshold = EnvGuard::new(THRESHOLD_ENV);
    let _layout = EnvGuard::new(LAYOUT_ENV);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), Ok(base));
}

#[test]
#[serial(endless_env)]
fn apply_env_overrides_rejects_garbage_threshold() {
    let _threshold = EnvGuard::new(THRESHOLD_ENV);
    env::set_var(THRESHOLD_ENV, "soon");

    assert!(matches!(
        apply_env_overrides(ResolvedConfig::default()),
        Err(ConfigError::InvalidValue { field: "threshold", .. })
    ));
}

#[test]
#[serial(endless_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let explicit = write_temp("endless_explicit.toml", "threshold = 7");
    let from_env = write_temp("endless_env.toml", "threshold = 9");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(config.threshold, Some(7));

    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(endless_config)]
fn load_config_with_precedence_uses_env_var_without_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let from_env = write_temp("endless_env_only.toml", "tracks = 5");
    env::set_var(CONFIG_ENV, &from_env);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.tracks, Some(5));

    fs::remove_file(from_env).ok();
}

#[test]
fn apply_cli_overrides_replaces_only_given_fields() {
    let base = ResolvedConfig::default();
    let result = apply_cli_overrides(
        base.clone(),
        CliOverrides {
            threshold: Some(2),
            layout: Some(LayoutKind::Staggered),
            placeholder: Some(false),
            ..CliOverrides::default()
        },
    );

    assert_eq!(result.threshold, 2);
    assert_eq!(result.layout, LayoutKind::Staggered);
    assert!(!result.placeholder);
    assert_eq!(result.page_size, base.page_size);
    assert_eq!(result.tracks, base.tracks);
}

#[test]
#[serial(endless_env)]
fn precedence_chain_cli_beats_env_beats_file() {
    let _threshold = EnvGuard::new(THRESHOLD_ENV);
    env::set_var(THRESHOLD_ENV, "5");
    let file = ConfigFile {
        threshold: Some(3),
        page_size: Some(12),
        ..ConfigFile::default()
    };

    let merged = merge_config(Some(file));
    let with_env = apply_env_overrides(merged).unwrap();
    assert_eq!(with_env.threshold, 5);
    assert_eq!(with_env.page_size, 12);

    let resolved = apply_cli_overrides(
        with_env,
        CliOverrides {
            threshold: Some(6),
            ..CliOverrides::default()
        },
    );
    assert_eq!(resolved.threshold, 6);
    assert_eq!(resolved.page_size, 12);
}
