//! Environment-driven configuration.
//!
//! Everything externally supplied lives here: provider keys and endpoints,
//! the rig address, the global cooldown, and the canned replies used when
//! both providers are down. `.env` files are honored via dotenvy before
//! `from_env` runs (see `main.rs`).

use crate::{gemini, ollama};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COOLDOWN_MS: u64 = 35_000;
pub const DEFAULT_RIG_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub rig_base_url: String,
    pub rig_timeout: Duration,
    pub cooldown: Duration,
    pub catalog_path: Option<PathBuf>,
    pub canned: CannedReplies,
}

/// Offline replies for the end of the fallback chain. Menu and ingredient
/// answers are derived from the catalog at reply time; these are the fixed
/// strings.
#[derive(Debug, Clone)]
pub struct CannedReplies {
    pub greeting_es: String,
    pub greeting_en: String,
    pub default_es: String,
    pub default_en: String,
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self {
            greeting_es: "¡Hola! 🍹 ¿Qué coctel te preparo hoy?".to_string(),
            greeting_en: "Hello! 🍹 Which cocktail can I make you today?".to_string(),
            default_es: "Puedo prepararte un coctel del menú. ¿Cuál te apetece?".to_string(),
            default_en: "I can prepare a cocktail from the menu. Which one would you like?"
                .to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gemini_api_key: None,
            gemini_base_url: gemini::DEFAULT_BASE_URL.to_string(),
            gemini_model: gemini::DEFAULT_MODEL.to_string(),
            ollama_url: ollama::DEFAULT_URL.to_string(),
            ollama_model: ollama::DEFAULT_MODEL.to_string(),
            rig_base_url: "http://127.0.0.1:5000".to_string(),
            rig_timeout: Duration::from_secs(DEFAULT_RIG_TIMEOUT_SECS),
            cooldown: Duration::from_millis(DEFAULT_COOLDOWN_MS),
            catalog_path: None,
            canned: CannedReplies::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let rig_host = env::var("RIG_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let rig_port = parse_env("RIG_PORT").unwrap_or(5000u16);

        Self {
            port: parse_env("PORT").unwrap_or(DEFAULT_PORT),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            rig_base_url: format!("http://{rig_host}:{rig_port}"),
            rig_timeout: Duration::from_secs(
                parse_env("RIG_TIMEOUT_SECS").unwrap_or(DEFAULT_RIG_TIMEOUT_SECS),
            ),
            cooldown: Duration::from_millis(
                parse_env("CHAT_COOLDOWN_MS").unwrap_or(DEFAULT_COOLDOWN_MS),
            ),
            catalog_path: env::var("CANTINERO_CATALOG").ok().map(PathBuf::from),
            canned: CannedReplies::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
