//! examkit configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "EXAMKIT_DATA_DIR";

/// Top-level examkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamkitConfig {
    /// Directory holding the key-value store files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Time limit for exam files that do not set one.
    #[serde(default = "default_time_limit")]
    pub default_time_limit_minutes: u32,
    /// Countdown refresh interval during `take`.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Print per-question review after submitting.
    #[serde(default = "default_true")]
    pub show_review: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./examkit-data")
}
fn default_time_limit() -> u32 {
    30
}
fn default_tick_interval() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for ExamkitConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_time_limit_minutes: default_time_limit(),
            tick_interval_ms: default_tick_interval(),
            show_review: true,
        }
    }
}

impl ExamkitConfig {
    /// Apply a `data_dir` override and expand `${VAR}` references.
    fn finish(mut self, data_dir_override: Option<String>) -> Self {
        if let Some(dir) = data_dir_override.filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        let raw = self.data_dir.to_string_lossy().into_owned();
        if raw.contains("${") {
            self.data_dir = PathBuf::from(resolve_env_vars(&raw));
        }
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to nothing. Substituted values are not expanded
/// again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut from = 0;
    while let Some(offset) = result[from..].find("${") {
        let start = from + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        from = start + value.len();
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examkit.toml` in the current directory
/// 2. `~/.config/examkit/config.toml`
pub fn load_config() -> Result<ExamkitConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamkitConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("examkit.toml");
            if local.exists() {
                Some(local)
            } else {
                global_config_dir()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|p| p.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ExamkitConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ExamkitConfig::default(),
    };

    Ok(config.finish(std::env::var(DATA_DIR_ENV).ok()))
}

fn global_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examkit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMKIT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMKIT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMKIT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_EXAMKIT_UNSET_VAR}/x"), "/x");
        assert_eq!(resolve_env_vars("broken ${"), "broken ${");
        std::env::remove_var("_EXAMKIT_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        std::env::set_var("_EXAMKIT_SELF_REF", "${_EXAMKIT_SELF_REF}");
        assert_eq!(resolve_env_vars("${_EXAMKIT_SELF_REF}"), "${_EXAMKIT_SELF_REF}");
        assert_eq!(
            resolve_env_vars("${_EXAMKIT_SELF_REF}/${_EXAMKIT_UNSET_VAR}x"),
            "${_EXAMKIT_SELF_REF}/x"
        );
        std::env::remove_var("_EXAMKIT_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = ExamkitConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./examkit-data"));
        assert_eq!(config.default_time_limit_minutes, 30);
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.show_review);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: ExamkitConfig = toml::from_str("tick_interval_ms = 250").unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.default_time_limit_minutes, 30);
    }

    #[test]
    fn override_replaces_data_dir() {
        let config = ExamkitConfig::default().finish(Some("/tmp/elsewhere".into()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/elsewhere"));

        let unchanged = ExamkitConfig::default().finish(Some(String::new()));
        assert_eq!(unchanged.data_dir, PathBuf::from("./examkit-data"));
    }

    #[test]
    fn data_dir_expands_env_vars() {
        std::env::set_var("_EXAMKIT_TEST_ROOT", "/srv");
        let config = ExamkitConfig {
            data_dir: PathBuf::from("${_EXAMKIT_TEST_ROOT}/exams"),
            ..Default::default()
        }
        .finish(None);
        assert_eq!(config.data_dir, PathBuf::from("/srv/exams"));
        std::env::remove_var("_EXAMKIT_TEST_ROOT");
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "data_dir = \"/data\"\nshow_review = false\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert!(!config.show_review);
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/examkit.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
