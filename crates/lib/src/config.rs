//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.intake/config.json`), a `.env` file in the
//! working directory, and the environment. [`resolve_settings`] turns it into the immutable
//! [`Settings`] the answer service and CRM client are built from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Channel settings (Telegram).
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// CRM webhook for lead creation.
    #[serde(default)]
    pub crm: CrmConfig,

    /// Language model used to answer free-text questions.
    #[serde(default)]
    pub model: ModelConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for the HTTP server (default 15151).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1").
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    15151
}

fn default_gateway_bind() -> String {
    "127.0.0.1".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Per-channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(default)]
    pub telegram: TelegramChannelConfig,
}

/// Telegram channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramChannelConfig {
    /// Bot token from BotFather. Overridden by TELEGRAM_TOKEN env when set.
    pub bot_token: Option<String>,
    /// When set, use webhook mode: Telegram POSTs updates to this URL.
    /// If unset, long-poll getUpdates is used.
    pub webhook_url: Option<String>,
    /// Optional secret for webhook verification (X-Telegram-Bot-Api-Secret-Token).
    /// Used only when webhook_url is set.
    pub webhook_secret: Option<String>,
    /// Bot API base URL (default https://api.telegram.org).
    pub api_base: Option<String>,
}

/// CRM (Bitrix24 inbound webhook) config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmConfig {
    /// Webhook base URL, e.g. `https://example.bitrix24.ru/rest/1/abc123/`.
    /// Overridden by BITRIX24_WEBHOOK env.
    pub webhook_url: Option<String>,
}

/// Language-model config (Gemini generateContent API).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// API key. Overridden by GEMINI_API_KEY env.
    /// When absent, answers fall back to a fixed sentence.
    pub api_key: Option<String>,
    /// Model id (default "gemini-2.5-flash").
    pub model: Option<String>,
    /// API base URL (default https://generativelanguage.googleapis.com/v1beta).
    pub base_url: Option<String>,
    /// Replaces the built-in system instruction.
    pub system_instruction: Option<String>,
}

/// Startup failures for required credentials.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("telegram bot token not configured (set TELEGRAM_TOKEN or channels.telegram.botToken)")]
    MissingBotToken,
    #[error("crm webhook not configured (set BITRIX24_WEBHOOK or crm.webhookUrl)")]
    MissingCrmWebhook,
}

/// Validated, read-only settings shared by the answer service and the CRM client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub crm_webhook: String,
    pub model: ModelSettings,
}

#[derive(Debug, Clone, Default)]
pub struct ModelSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub system_instruction: Option<String>,
}

/// Trimmed, non-empty value of an env var.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| non_empty(&s))
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

fn config_value(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty)
}

/// Resolve the Telegram bot token: env TELEGRAM_TOKEN overrides config.
pub fn resolve_telegram_token(config: &Config) -> Option<String> {
    env_value("TELEGRAM_TOKEN").or_else(|| config_value(&config.channels.telegram.bot_token))
}

/// Resolve the CRM webhook base: env BITRIX24_WEBHOOK overrides config.
pub fn resolve_crm_webhook(config: &Config) -> Option<String> {
    env_value("BITRIX24_WEBHOOK").or_else(|| config_value(&config.crm.webhook_url))
}

/// Resolve the model API key: env GEMINI_API_KEY overrides config.
pub fn resolve_model_api_key(config: &Config) -> Option<String> {
    env_value("GEMINI_API_KEY").or_else(|| config_value(&config.model.api_key))
}

/// Build [`Settings`] from config and environment. Bot token and CRM webhook are required.
pub fn resolve_settings(config: &Config) -> Result<Settings, ConfigError> {
    let bot_token = resolve_telegram_token(config).ok_or(ConfigError::MissingBotToken)?;
    let crm_webhook = resolve_crm_webhook(config).ok_or(ConfigError::MissingCrmWebhook)?;
    let api_key = resolve_model_api_key(config);
    if api_key.is_none() {
        log::warn!("model api key not configured; answers will use the fixed fallback");
    }
    Ok(Settings {
        bot_token,
        crm_webhook,
        model: ModelSettings {
            api_key,
            model: config_value(&config.model.model),
            base_url: config_value(&config.model.base_url),
            system_instruction: config_value(&config.model.system_instruction),
        },
    })
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("INTAKE_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".intake").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load `.env` from the working directory (if any), then the config file (or INTAKE_CONFIG_PATH).
/// Missing file => default config. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    match dotenvy::dotenv() {
        Ok(p) => log::info!("loaded environment from {}", p.display()),
        Err(e) if e.not_found() => log::debug!("no .env file found"),
        Err(e) => return Err(e).context("loading .env file"),
    }
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
