use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dokkan_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line("storage.url", &config.storage.url, source("storage.url", "DOKKAN_STORAGE_URL")));
    lines.push(render_line(
        "storage.max_connections",
        &config.storage.max_connections.to_string(),
        source("storage.max_connections", "DOKKAN_STORAGE_MAX_CONNECTIONS"),
    ));
    lines.push(render_line(
        "storage.timeout_secs",
        &config.storage.timeout_secs.to_string(),
        source("storage.timeout_secs", "DOKKAN_STORAGE_TIMEOUT_SECS"),
    ));

    let api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line("llm.api_key", api_key, source("llm.api_key", "DOKKAN_LLM_API_KEY")));
    lines.push(render_line("llm.base_url", &config.llm.base_url, source("llm.base_url", "DOKKAN_LLM_BASE_URL")));
    lines.push(render_line("llm.model", &config.llm.model, source("llm.model", "DOKKAN_LLM_MODEL")));
    lines.push(render_line(
        "llm.temperature",
        &config.llm.temperature.to_string(),
        source("llm.temperature", "DOKKAN_LLM_TEMPERATURE"),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", "DOKKAN_LLM_TIMEOUT_SECS"),
    ));

    lines.push(render_line(
        "chat.extraction_min_chars",
        &config.chat.extraction_min_chars.to_string(),
        source("chat.extraction_min_chars", "DOKKAN_CHAT_EXTRACTION_MIN_CHARS"),
    ));

    lines.push(render_line(
        "admin.password",
        "<redacted>",
        source("admin.password", "DOKKAN_ADMIN_PASSWORD"),
    ));

    lines.push(render_line("logging.level", &config.logging.level, source("logging.level", "DOKKAN_LOGGING_LEVEL")));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "DOKKAN_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("dokkan.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/dokkan.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: &str,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if env::var_os(env_key).is_some() {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
