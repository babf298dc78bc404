use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Args;

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_WEBHOOK_PATH: &str = "/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Model flags shared by `serve` and `evaluate`.
#[derive(Args, Clone)]
pub struct ModelArgs {
    /// Google Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Base URL of the Generative Language API
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_GEMINI_API_BASE)]
    pub gemini_api_base: String,

    /// Timeout for every outbound HTTP call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}

/// Flags for the webhook server.
#[derive(Args, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// GitHub token used for comments and labels
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Base64-encoded GitHub token, used when GITHUB_TOKEN is unset
    #[arg(long, env = "GITHUB_TOKEN_BASE64", hide_env_values = true)]
    pub github_token_base64: Option<String>,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_GITHUB_API_BASE)]
    pub github_api_base: String,

    /// Shared secret for `x-hub-signature-256`
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Base64-encoded webhook secret, used when WEBHOOK_SECRET is unset
    #[arg(long, env = "WEBHOOK_SECRET_BASE64", hide_env_values = true)]
    pub webhook_secret_base64: Option<String>,

    /// Login whose comments count as the bot's own
    #[arg(long, env = "BOT_LOGIN")]
    pub bot_login: Option<String>,

    /// Address the server listens on
    #[arg(long, env = "BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Path GitHub posts deliveries to
    #[arg(long, env = "WEBHOOK_PATH", default_value = DEFAULT_WEBHOOK_PATH)]
    pub webhook_path: String,
}

/// Resolved model settings.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

/// Everything `serve` needs, resolved once before binding.
#[derive(Clone)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub github_token: String,
    pub github_api_base: String,
    pub webhook_secret: String,
    pub bot_login: Option<String>,
    pub bind: String,
    pub webhook_path: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the plain value, falling back to decoding the base64 variant.
pub fn resolve_secret(
    name: &'static str,
    plain: Option<String>,
    encoded: Option<String>,
) -> Result<String, ConfigError> {
    if let Some(value) = non_empty(plain) {
        return Ok(value);
    }
    let Some(encoded) = non_empty(encoded) else {
        return Err(ConfigError::Missing(name));
    };
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|source| ConfigError::InvalidBase64 { name, source })?;
    let decoded = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8 { name })?;
    non_empty(Some(decoded)).ok_or(ConfigError::Missing(name))
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

impl ModelArgs {
    pub fn into_config(self) -> Result<ModelConfig, ConfigError> {
        let api_key = non_empty(self.gemini_api_key).ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        Ok(ModelConfig {
            api_key,
            model: self.gemini_model,
            api_base: self.gemini_api_base.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        })
    }
}

impl ServeArgs {
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let github_token = resolve_secret("GITHUB_TOKEN", self.github_token, self.github_token_base64)?;
        let webhook_secret = resolve_secret(
            "WEBHOOK_SECRET",
            self.webhook_secret,
            self.webhook_secret_base64,
        )?;
        Ok(AppConfig {
            model: self.model.into_config()?,
            github_token,
            github_api_base: self.github_api_base.trim_end_matches('/').to_string(),
            webhook_secret,
            bot_login: non_empty(self.bot_login),
            bind: self.bind,
            webhook_path: normalize_path(&self.webhook_path),
        })
    }
}
