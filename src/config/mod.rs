pub mod schema;

pub use schema::RelayConfig;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// File name looked up inside the home directory.
pub const CONFIG_FILE: &str = "toolrelay.toml";

/// Default toolrelay home directory (~/.toolrelay).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".toolrelay"))
        .unwrap_or_else(|| PathBuf::from(".toolrelay"))
}

/// Expand a user-supplied path that may start with `~`.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// The `--config` argument if given, otherwise `~/.toolrelay/toolrelay.toml`.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(expand_path)
        .unwrap_or_else(|| default_home_dir().join(CONFIG_FILE))
}

/// Load and validate config from the given path, or return defaults when
/// the file does not exist.
pub fn load_config(path: &Path) -> Result<RelayConfig> {
    if !path.exists() {
        return Ok(RelayConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: RelayConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse toolrelay config (TOML) {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Save config to the given path (TOML format).
pub fn save_config(config: &RelayConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Write a default config, refusing to clobber an existing one unless forced.
pub fn init_config(path: &Path, force: bool) -> Result<RelayConfig> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    let config = RelayConfig::default();
    save_config(&config, path)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use std::time::Duration;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, RelayConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "transcript_api_url = \"https://transcripts.example\"\n\n[retry]\nmax_attempts = 5\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.transcript_api_url, "https://transcripts.example");
        assert_eq!(cfg.retry.max_attempts, 5);
        assert_eq!(cfg.retry.delay(), Duration::from_millis(1000));
        assert_eq!(cfg.request_timeout_secs, 30);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let cfg = RelayConfig {
            transcript_api_key: "secret".into(),
            retry: RetryPolicy::new(1, Duration::from_millis(250)),
            ..RelayConfig::default()
        };

        save_config(&cfg, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "retry = 3").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse toolrelay config"));
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        std::fs::write(&path, "transcript_api_url = \"ftp://files.example\"\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid config in"));
        assert!(format!("{:#}", err).contains("must be an http(s) URL"));

        std::fs::write(&path, "request_timeout_secs = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("request_timeout_secs must be at least 1"));
    }

    #[test]
    fn save_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let path = blocker.join("sub").join(CONFIG_FILE);
        let err = save_config(&RelayConfig::default(), &path).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to create config directory"));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let err = init_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("use --force"));
        assert_eq!(load_config(&path).unwrap().log_level, "debug");

        init_config(&path, true).unwrap();
        assert_eq!(load_config(&path).unwrap(), RelayConfig::default());
    }

    #[test]
    fn explicit_config_path_wins() {
        assert_eq!(
            config_path(Some("/etc/toolrelay/custom.toml")),
            PathBuf::from("/etc/toolrelay/custom.toml")
        );
        assert!(config_path(None).ends_with(Path::new(".toolrelay").join(CONFIG_FILE)));
    }

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(expand_path("/abs/x.toml"), PathBuf::from("/abs/x.toml"));
    }
}
