use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Minimum user-message length (in characters) before the pipeline spends
    /// an extraction call. A cost heuristic, not a correctness gate.
    pub extraction_min_chars: usize,
}

#[derive(Clone, Debug)]
pub struct AdminConfig {
    /// Gate for the developer-mode toggle. Compared as plaintext and wrapped
    /// in `SecretString` only to keep it out of Debug output; this is not a
    /// security boundary.
    pub password: SecretString,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub storage_url: Option<String>,
    pub log_level: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub admin_password: Option<String>,
    pub extraction_min_chars: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                url: "sqlite://dokkan.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-3-flash-preview".to_string(),
                temperature: 0.8,
                timeout_secs: 30,
            },
            chat: ChatConfig { extraction_min_chars: 10 },
            admin: AdminConfig { password: String::from("admin").into() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Precedence: programmatic overrides > environment > config file >
    /// defaults. Validation runs last and fails fast.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("dokkan.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(storage) = patch.storage {
            if let Some(url) = storage.url {
                self.storage.url = url;
            }
            if let Some(max_connections) = storage.max_connections {
                self.storage.max_connections = max_connections;
            }
            if let Some(timeout_secs) = storage.timeout_secs {
                self.storage.timeout_secs = timeout_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(api_key_value) = llm.api_key {
                self.llm.api_key = Some(api_key_value.into());
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = base_url;
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(temperature) = llm.temperature {
                self.llm.temperature = temperature;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
        }

        if let Some(chat) = patch.chat {
            if let Some(extraction_min_chars) = chat.extraction_min_chars {
                self.chat.extraction_min_chars = extraction_min_chars;
            }
        }

        if let Some(admin) = patch.admin {
            if let Some(password_value) = admin.password {
                self.admin.password = password_value.into();
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("DOKKAN_STORAGE_URL") {
            self.storage.url = value;
        }
        if let Some(value) = read_env("DOKKAN_STORAGE_MAX_CONNECTIONS") {
            self.storage.max_connections = parse_u32("DOKKAN_STORAGE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("DOKKAN_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_u64("DOKKAN_STORAGE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DOKKAN_LLM_API_KEY") {
            self.llm.api_key = Some(value.into());
        }
        if let Some(value) = read_env("DOKKAN_LLM_BASE_URL") {
            self.llm.base_url = value;
        }
        if let Some(value) = read_env("DOKKAN_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("DOKKAN_LLM_TEMPERATURE") {
            self.llm.temperature = parse_f32("DOKKAN_LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = read_env("DOKKAN_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("DOKKAN_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("DOKKAN_CHAT_EXTRACTION_MIN_CHARS") {
            self.chat.extraction_min_chars =
                parse_usize("DOKKAN_CHAT_EXTRACTION_MIN_CHARS", &value)?;
        }

        if let Some(value) = read_env("DOKKAN_ADMIN_PASSWORD") {
            self.admin.password = value.into();
        }

        let log_level = read_env("DOKKAN_LOGGING_LEVEL").or_else(|| read_env("DOKKAN_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("DOKKAN_LOGGING_FORMAT").or_else(|| read_env("DOKKAN_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(storage_url) = overrides.storage_url {
            self.storage.url = storage_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(llm_api_key.into());
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(admin_password) = overrides.admin_password {
            self.admin.password = admin_password.into();
        }
        if let Some(extraction_min_chars) = overrides.extraction_min_chars {
            self.chat.extraction_min_chars = extraction_min_chars;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_storage(&self.storage)?;
        validate_llm(&self.llm)?;
        validate_chat(&self.chat)?;
        validate_admin(&self.admin)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("dokkan.toml"), PathBuf::from("config/dokkan.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_storage(storage: &StorageConfig) -> Result<(), ConfigError> {
    let url = storage.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "storage.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if storage.max_connections == 0 {
        return Err(ConfigError::Validation(
            "storage.max_connections must be greater than zero".to_string(),
        ));
    }

    if storage.timeout_secs == 0 || storage.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "storage.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if !llm.base_url.starts_with("http://") && !llm.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "llm.base_url must start with http:// or https://".to_string(),
        ));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Validation("llm.model must not be empty".to_string()));
    }

    if !(0.0..=2.0).contains(&llm.temperature) {
        return Err(ConfigError::Validation(
            "llm.temperature must be in range 0.0..=2.0".to_string(),
        ));
    }

    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    // llm.api_key stays optional here: only the chat path needs it, and
    // `doctor` reports its absence as a readiness failure instead.
    Ok(())
}

fn validate_chat(chat: &ChatConfig) -> Result<(), ConfigError> {
    if chat.extraction_min_chars == 0 || chat.extraction_min_chars > 500 {
        return Err(ConfigError::Validation(
            "chat.extraction_min_chars must be in range 1..=500".to_string(),
        ));
    }

    Ok(())
}

fn validate_admin(admin: &AdminConfig) -> Result<(), ConfigError> {
    if admin.password.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation("admin.password must not be empty".to_string()));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    value.parse::<f32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    llm: Option<LlmPatch>,
    chat: Option<ChatPatch>,
    admin: Option<AdminPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StoragePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatPatch {
    extraction_min_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct AdminPatch {
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_validate_without_any_input() {
        let _guard = env_lock().lock().expect("env lock");
        clear_vars(&["DOKKAN_STORAGE_URL", "DOKKAN_LLM_API_KEY", "DOKKAN_LOG_LEVEL"]);

        let config = AppConfig::load(LoadOptions::default()).expect("defaults should load");
        assert_eq!(config.storage.url, "sqlite://dokkan.db");
        assert_eq!(config.chat.extraction_min_chars, 10);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn file_load_supports_env_interpolation() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("TEST_DOKKAN_API_KEY", "key-from-env");

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string()).expect("tempdir");
        let path = dir.path().join("dokkan.toml");
        fs::write(
            &path,
            r#"
[llm]
api_key = "${TEST_DOKKAN_API_KEY}"
"#,
        )
        .expect("write config file");

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .expect("config load");

        let api_key = config.llm.api_key.expect("api key set");
        assert_eq!(api_key.expose_secret(), "key-from-env");

        clear_vars(&["TEST_DOKKAN_API_KEY"]);
    }

    #[test]
    fn precedence_is_overrides_then_env_then_file() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DOKKAN_STORAGE_URL", "sqlite://from-env.db");

        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("dokkan.toml");
        fs::write(
            &path,
            r#"
[storage]
url = "sqlite://from-file.db"

[logging]
level = "warn"
"#,
        )
        .expect("write config file");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                log_level: Some("debug".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config load");

        assert_eq!(config.storage.url, "sqlite://from-env.db", "env beats file");
        assert_eq!(config.logging.level, "debug", "override beats file");

        clear_vars(&["DOKKAN_STORAGE_URL"]);
    }

    #[test]
    fn logging_env_aliases_are_supported() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DOKKAN_LOG_LEVEL", "warn");
        env::set_var("DOKKAN_LOG_FORMAT", "pretty");

        let config = AppConfig::load(LoadOptions::default()).expect("config load");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);

        clear_vars(&["DOKKAN_LOG_LEVEL", "DOKKAN_LOG_FORMAT"]);
    }

    #[test]
    fn non_sqlite_storage_url_fails_validation() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DOKKAN_STORAGE_URL", "postgres://nope");

        let error = AppConfig::load(LoadOptions::default()).expect_err("should fail");
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("storage.url")
        ));

        clear_vars(&["DOKKAN_STORAGE_URL"]);
    }

    #[test]
    fn extraction_threshold_is_tunable_but_bounded() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DOKKAN_CHAT_EXTRACTION_MIN_CHARS", "25");

        let config = AppConfig::load(LoadOptions::default()).expect("config load");
        assert_eq!(config.chat.extraction_min_chars, 25);

        env::set_var("DOKKAN_CHAT_EXTRACTION_MIN_CHARS", "0");
        let error = AppConfig::load(LoadOptions::default()).expect_err("zero threshold rejected");
        assert!(matches!(error, ConfigError::Validation(_)));

        clear_vars(&["DOKKAN_CHAT_EXTRACTION_MIN_CHARS"]);
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() {
        let _guard = env_lock().lock().expect("env lock");
        env::set_var("DOKKAN_LLM_API_KEY", "super-secret-key");
        env::set_var("DOKKAN_ADMIN_PASSWORD", "super-secret-password");

        let config = AppConfig::load(LoadOptions::default()).expect("config load");
        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("super-secret-password"));

        clear_vars(&["DOKKAN_LLM_API_KEY", "DOKKAN_ADMIN_PASSWORD"]);
    }
}
