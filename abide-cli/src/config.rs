use abide_core::ai::DEFAULT_MODEL;
use abide_core::backup::ImportPolicy;
use abide_core::scripture::{DEFAULT_FHL_URL, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// AI generation settings
#[derive(Debug, Clone, Serialize)]
pub struct AiConfig {
    /// Gemini API key; AI features are unavailable without one
    #[serde(serialize_with = "mask_secret")]
    pub api_key: ConfigValue<Option<String>>,
    pub model: ConfigValue<String>,
}

/// Scripture lookup settings
#[derive(Debug, Clone, Serialize)]
pub struct ScriptureConfig {
    /// FHL Bible version code
    pub version: ConfigValue<String>,
    pub base_url: ConfigValue<String>,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding one JSON file per store key
    pub data_dir: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub ai: AiConfig,
    pub scripture: ScriptureConfig,
    /// How imported backups are merged
    pub import: ImportPolicy,
}

/// Internal structs for deserializing the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    ai: AiFile,
    scripture: ScriptureFile,
    import: Option<ImportPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AiFile {
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ScriptureFile {
    version: Option<String>,
    base_url: Option<String>,
}

fn mask_secret<S: serde::Serializer>(
    value: &ConfigValue<Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let masked = ConfigValue::new(
        value.value.as_ref().map(|_| "********".to_string()),
        value.source.clone(),
    );
    masked.serialize(serializer)
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut api_key = ConfigValue::new(None, ConfigSource::Default);
        let mut model = ConfigValue::new(DEFAULT_MODEL.to_string(), ConfigSource::Default);
        let mut version = ConfigValue::new(DEFAULT_VERSION.to_string(), ConfigSource::Default);
        let mut base_url = ConfigValue::new(DEFAULT_FHL_URL.to_string(), ConfigSource::Default);
        let mut import = ImportPolicy::default();
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(key) = file_config.ai.api_key {
                api_key = ConfigValue::new(Some(key), ConfigSource::File);
            }
            if let Some(m) = file_config.ai.model {
                model = ConfigValue::new(m, ConfigSource::File);
            }
            if let Some(v) = file_config.scripture.version {
                version = ConfigValue::new(v, ConfigSource::File);
            }
            if let Some(url) = file_config.scripture.base_url {
                base_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(policy) = file_config.import {
                import = policy;
            }
        }

        // Apply environment variable overrides
        if let Ok(dir) = std::env::var("ABIDE_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                api_key = ConfigValue::new(Some(key), ConfigSource::Environment);
            }
        }
        if let Ok(m) = std::env::var("GEMINI_MODEL") {
            model = ConfigValue::new(m, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            config_file,
            ai: AiConfig { api_key, model },
            scripture: ScriptureConfig { version, base_url },
            import,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/abide/
    /// - macOS: ~/Library/Application Support/abide/
    /// - Windows: %APPDATA%/abide/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("abide")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/abide/
    /// - macOS: ~/Library/Application Support/abide/
    /// - Windows: %APPDATA%/abide/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("abide")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use abide_core::backup::{GracePolicy, MergePolicy};
    use abide_core::StoreKey;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.data_dir.value.ends_with("abide"));
        assert_eq!(config.ai.model.value, "gemini-2.5-flash");
        assert_eq!(config.ai.model.source, ConfigSource::Default);
        assert_eq!(config.scripture.version.value, "nstrunv");
        assert_eq!(config.import, ImportPolicy::default());
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /custom/abide").unwrap();
        writeln!(file, "ai:").unwrap();
        writeln!(file, "  model: gemini-2.0-pro").unwrap();
        writeln!(file, "scripture:").unwrap();
        writeln!(file, "  version: unv").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/custom/abide"));
        assert_eq!(config.data_dir.source, ConfigSource::File);
        assert_eq!(config.ai.model.value, "gemini-2.0-pro");
        assert_eq!(config.ai.model.source, ConfigSource::File);
        assert_eq!(config.scripture.version.value, "unv");
        assert_eq!(config.scripture.base_url.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_config_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "data_dir: journal\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("journal"));
    }

    #[test]
    fn test_import_policy_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "import:").unwrap();
        writeln!(file, "  grace_points: overwrite").unwrap();
        writeln!(file, "  overrides:").unwrap();
        writeln!(file, "    prayerItems: last_writer_wins").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.import.grace_points, GracePolicy::Overwrite);
        assert_eq!(
            config.import.for_key(StoreKey::PrayerItems),
            MergePolicy::LastWriterWins
        );
        assert_eq!(
            config.import.for_key(StoreKey::JournalEntries),
            MergePolicy::AppendOnly
        );
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: /from/file").unwrap();

        std::env::set_var("ABIDE_DATA_DIR", "/from/env");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir.value, PathBuf::from("/from/env"));
        assert_eq!(config.data_dir.source, ConfigSource::Environment);

        std::env::remove_var("ABIDE_DATA_DIR");
    }

    #[test]
    fn test_api_key_is_masked_when_serialized() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "ai:\n  api_key: secret-value\n").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-value"));
        assert!(json.contains("********"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
