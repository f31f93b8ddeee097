//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; `arfa-core` only sees the values it is handed
//! (a pages root, a guard policy, a project name).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `ARFA_*` environment variables, `__` between sections
//!    (`ARFA_ROUTER__GUARD_POLICY=enforce`)
//! 3. TOML file: `--config FILE`, else [`AppConfig::config_path`]
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use arfa_core::application::GuardPolicy;
use arfa_core::domain::{DEFAULT_PAGES_ROOT, DEFAULT_PROJECT_NAME};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

const ENV_PREFIX: &str = "ARFA";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for `arfa new`.
    pub project: ProjectConfig,
    /// Route table settings for `arfa routes`.
    pub router: RouterConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name used when `arfa new` gets none.
    pub default_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefix the scanned module keys are registered under.
    pub pages_root: String,
    pub guard_policy: GuardPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            default_name: DEFAULT_PROJECT_NAME.into(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            pages_root: DEFAULT_PAGES_ROOT.into(),
            guard_policy: GuardPolicy::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file, then `ARFA_*`.
    ///
    /// `config_file` is the path passed via `--config`. It must exist; the
    /// default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);
        Self::load_from(&path, config_file.is_some(), Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        debug!(path = %path.display(), required, "loading configuration");

        let defaults = Config::try_from(&Self::default())
            .context("failed to serialize default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs`, falling back to `.arfa.toml` in the
    /// current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "arfa", "arfa")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".arfa.toml"))
    }

    /// Value at a dotted key such as `router.guard_policy`.
    ///
    /// Strings come back unquoted; tables and other values as TOML.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut value = toml::Value::try_from(self).ok()?;
        for part in key.split('.') {
            value = value.as_table()?.get(part)?.clone();
        }
        Some(match value {
            toml::Value::String(s) => s,
            toml::Value::Table(table) => toml::to_string_pretty(&table).ok()?,
            other => other.to_string(),
        })
    }

    /// The whole configuration as TOML.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()))
    }

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.project.default_name, "my-arfa-app");
        assert_eq!(cfg.router.pages_root, "./pages");
        assert_eq!(cfg.router.guard_policy, GuardPolicy::PassThrough);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&temp.path().join("config.toml"), false, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load_from(&temp.path().join("nope.toml"), true, no_env()).is_err());
    }

    #[test]
    fn file_overrides_defaults_per_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arfa.toml");
        fs::write(&path, "[router]\nguard_policy = \"enforce\"\n").unwrap();

        let cfg = AppConfig::load_from(&path, true, no_env()).unwrap();
        assert_eq!(cfg.router.guard_policy, GuardPolicy::Enforce);
        assert_eq!(cfg.router.pages_root, "./pages");
    }

    #[test]
    fn environment_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arfa.toml");
        fs::write(&path, "[project]\ndefault_name = \"from-file\"\n").unwrap();

        let vars: config::Map<String, String> = [(
            "ARFA_PROJECT__DEFAULT_NAME".to_owned(),
            "from-env".to_owned(),
        )]
        .into_iter()
        .collect();
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));
        let cfg = AppConfig::load_from(&path, true, env).unwrap();
        assert_eq!(cfg.project.default_name, "from-env");
    }

    #[test]
    fn invalid_value_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("arfa.toml");
        fs::write(&path, "[router]\nguard_policy = \"sometimes\"\n").unwrap();
        assert!(AppConfig::load_from(&path, true, no_env()).is_err());
    }

    #[test]
    fn get_walks_dotted_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("router.guard_policy").as_deref(), Some("pass-through"));
        assert_eq!(cfg.get("output.no_color").as_deref(), Some("false"));
        assert!(cfg.get("router").unwrap().contains("pages_root"));
        assert_eq!(cfg.get("router.nope"), None);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
