//! Per-turn sequencing: detect the language, match intent, and generate
//! the reply. An accepted confirmation skips the reply chain and instead
//! builds the pump schedule and calls the rig.
//!
//! The conversing/preparing/ready state machine lives in the caller's UI.
//! The server is stateless and reports `shouldPrepare` instead of
//! tracking order state.

use crate::catalog::Recipe;
use crate::dispense::{self, DispenseError};
use crate::error::ChatError;
use crate::intent::{self, CocktailMatch};
use crate::language::{self, Language};
use crate::responder;
use crate::server::AppState;
use crate::ConversationMessage;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationMessage>,
    #[serde(default)]
    pub previous_language: Option<Language>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub text: String,
    pub language: Language,
    pub should_prepare: bool,
    pub show_confirm_button: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cocktail_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Recipe>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raspberry_response: Option<serde_json::Value>,
}

impl ChatResponse {
    fn conversational(text: String, language: Language) -> Self {
        Self {
            text,
            language,
            should_prepare: false,
            show_confirm_button: false,
            cocktail_id: None,
            recipe: None,
            raspberry_response: None,
        }
    }
}

pub async fn handle_turn(state: &AppState, request: ChatRequest) -> Result<ChatResponse, ChatError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ChatError::MissingMessage);
    }

    let previous = request.previous_language.unwrap_or_default();
    let language = language::detect(message, previous);
    let matched = intent::match_intent(message, language, &state.catalog);

    // Confirmation turns never touch a provider, so a confirm arriving
    // right after the proposing turn is not rate-limited.
    if let Some(CocktailMatch::Confirmation { recipe_id }) = &matched {
        return confirm_order(state, recipe_id, language).await;
    }

    let text = responder::generate(
        &state.http,
        &state.config,
        &state.catalog,
        &state.cooldown,
        message,
        &request.conversation_history,
        language,
    )
    .await?;

    let mut response = ChatResponse::conversational(text, language);
    if let Some(recipe_id) = matched.as_ref().and_then(CocktailMatch::recipe_id) {
        if let Some(recipe) = state.catalog.recipe(recipe_id) {
            response.show_confirm_button = true;
            response.cocktail_id = Some(recipe.id.clone());
            response.recipe = Some(recipe.clone());
        }
    }
    Ok(response)
}

async fn confirm_order(
    state: &AppState,
    recipe_id: &str,
    language: Language,
) -> Result<ChatResponse, ChatError> {
    let recipe = state
        .catalog
        .recipe(recipe_id)
        .ok_or_else(|| anyhow::anyhow!("confirmed order for unknown recipe '{recipe_id}'"))?;

    let payload = match dispense::build(recipe, &state.catalog) {
        Ok(payload) => payload,
        Err(DispenseError::UnconfiguredIngredient { ingredient }) => {
            warn!(recipe = %recipe.id, %ingredient, "rejecting order with unconfigured ingredient");
            return Ok(ChatResponse::conversational(
                unavailable_text(language, &recipe.name),
                language,
            ));
        }
    };

    info!(recipe = %recipe.id, total_ml = payload.total_ml, "order confirmed, dispatching to rig");
    let raspberry_response = match state.rig.send(&payload).await {
        Ok(value) => value,
        Err(e) => {
            error!("rig call failed: {e}");
            json!({ "error": true, "message": e.to_string() })
        }
    };

    Ok(ChatResponse {
        text: preparing_text(language),
        language,
        should_prepare: true,
        show_confirm_button: false,
        cocktail_id: Some(recipe.id.clone()),
        recipe: Some(recipe.clone()),
        raspberry_response: Some(raspberry_response),
    })
}

fn preparing_text(language: Language) -> String {
    match language {
        Language::Es => "¡Perfecto! Preparando tu coctel... 🍹".to_string(),
        Language::En => "Perfect! Preparing your cocktail... 🍹".to_string(),
    }
}

fn unavailable_text(language: Language, recipe_name: &str) -> String {
    match language {
        Language::Es => format!(
            "Lo siento, ahora mismo no puedo preparar {recipe_name}. ¿Te ofrezco otro coctel del menú?"
        ),
        Language::En => format!(
            "Sorry, I can't prepare {recipe_name} right now. Can I offer you another cocktail from the menu?"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_accepts_camel_case() {
        let raw = json!({
            "message": "Quiero un mojito",
            "conversationHistory": [
                { "role": "user", "content": "hola" },
                { "role": "assistant", "content": "¡Hola!" }
            ],
            "previousLanguage": "es"
        });
        let request: ChatRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(request.message, "Quiero un mojito");
        assert_eq!(request.conversation_history.len(), 2);
        assert_eq!(request.previous_language, Some(Language::Es));
    }

    #[test]
    fn history_and_language_are_optional() {
        let request: ChatRequest = serde_json::from_value(json!({ "message": "hola" })).unwrap();
        assert!(request.conversation_history.is_empty());
        assert!(request.previous_language.is_none());
    }

    #[test]
    fn response_omits_absent_fields() {
        let response =
            ChatResponse::conversational("¿Qué te preparo?".to_string(), Language::Es);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["shouldPrepare"], false);
        assert_eq!(json["showConfirmButton"], false);
        assert!(json.get("cocktailId").is_none());
        assert!(json.get("raspberryResponse").is_none());
    }
}
