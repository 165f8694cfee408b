//! Reply generation behind the global cooldown gate.
//!
//! Gemini is tried first, then the local Ollama instance, and finally a
//! keyword-triggered canned reply. Each step runs only when the previous
//! one failed or produced no usable text. Provider failures are never
//! surfaced to the caller.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::ChatError;
use crate::language::Language;
use crate::{gemini, ollama, prompt, ConversationMessage};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const MAX_REPLY_CHARS: usize = 500;

/// Global throttle on provider calls: one process-wide timestamp of the
/// last accepted request, lock-guarded so concurrent turns cannot race
/// past the gate. Deliberately not per-user.
#[derive(Debug)]
pub struct Cooldown {
    period: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accept the request (stamping now) or report the remaining whole
    /// seconds to wait.
    pub fn acquire(&self) -> Result<(), u64> {
        self.acquire_at(Instant::now())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn acquire_at(&self, now: Instant) -> Result<(), u64> {
        let mut last = self.lock();
        if let Some(stamp) = *last {
            let elapsed = now.saturating_duration_since(stamp);
            if elapsed < self.period {
                return Err((self.period - elapsed).as_secs());
            }
        }
        *last = Some(now);
        Ok(())
    }
}

/// Run the full chain for one turn. `Err` only for the cooldown gate and a
/// missing API key; everything else degrades to canned text.
pub async fn generate(
    http: &reqwest::Client,
    config: &Config,
    catalog: &Catalog,
    cooldown: &Cooldown,
    message: &str,
    history: &[ConversationMessage],
    language: Language,
) -> Result<String, ChatError> {
    if let Err(wait_secs) = cooldown.acquire() {
        info!(wait_secs, "rejecting chat turn inside cooldown window");
        return Err(ChatError::RateLimited { wait_secs });
    }

    let api_key = config
        .gemini_api_key
        .as_deref()
        .ok_or(ChatError::ConfigMissing)?;

    let is_first_turn = history.is_empty();
    let system_prompt = prompt::system_prompt(catalog, language, is_first_turn);

    match gemini::generate_content(
        http,
        &config.gemini_base_url,
        api_key,
        &config.gemini_model,
        &system_prompt,
        history,
        message,
    )
    .await
    {
        Ok(text) if !text.is_empty() => return Ok(truncate(&text)),
        Ok(_) => warn!("Gemini returned empty text, falling back"),
        Err(e) => warn!("primary provider failed, falling back: {e:#}"),
    }

    let transcript = prompt::flatten_transcript(&system_prompt, history, message);
    match ollama::generate(http, &config.ollama_url, &config.ollama_model, &transcript).await {
        Ok(text) if !text.is_empty() => return Ok(truncate(&text)),
        Ok(_) => warn!("Ollama returned empty text, falling back"),
        Err(e) => warn!("secondary provider failed, falling back: {e:#}"),
    }

    info!("both providers failed, serving canned reply");
    Ok(canned_reply(config, catalog, message, language, is_first_turn))
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_REPLY_CHARS).collect()
}

const GREETING_KEYWORDS: &[&str] = &["hola", "buenas", "hello", "hi ", "hey"];
const MENU_KEYWORDS: &[&str] = &["menu", "menú", "carta", "cocteles", "cócteles", "cocktails", "drinks"];
const INGREDIENT_KEYWORDS: &[&str] = &["ingrediente", "ingredient", "tienes", "do you have"];

/// Keyword-triggered offline reply: greeting, menu, ingredients, default.
pub fn canned_reply(
    config: &Config,
    catalog: &Catalog,
    message: &str,
    language: Language,
    is_first_turn: bool,
) -> String {
    let lower = message.to_lowercase();

    if is_first_turn || GREETING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return match language {
            Language::Es => config.canned.greeting_es.clone(),
            Language::En => config.canned.greeting_en.clone(),
        };
    }

    if MENU_KEYWORDS.iter().any(|k| lower.contains(k)) {
        let names = catalog
            .recipes()
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return match language {
            Language::Es => format!("Estos son los cocteles del menú: {names}. ¿Cuál te preparo? 🍹"),
            Language::En => format!("These are the cocktails on the menu: {names}. Which one can I make you? 🍹"),
        };
    }

    if INGREDIENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        let ingredients = catalog
            .pumps()
            .iter()
            .map(|p| p.ingredient.replace('_', " "))
            .collect::<Vec<_>>()
            .join(", ");
        return match language {
            Language::Es => format!("Tengo estos ingredientes: {ingredients}."),
            Language::En => format!("I have these ingredients: {ingredients}."),
        };
    }

    match language {
        Language::Es => config.canned.default_es.clone(),
        Language::En => config.canned.default_en.clone(),
    }
}
