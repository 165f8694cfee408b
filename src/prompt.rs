//! System-instruction assembly for the language-model providers.
//!
//! The instruction embeds the live catalog (ingredients with their emotes,
//! recipes with readable ingredient lists) plus the fixed behavioral rules:
//! 500-character cap, greeting only on the first turn, at most one emoji,
//! no internal pump/GPIO talk, and the mandatory confirmation question
//! before an order is accepted.

use crate::catalog::Catalog;
use crate::language::Language;
use crate::{ConversationMessage, Role};

pub fn emote_for(ingredient: &str) -> &'static str {
    match ingredient {
        "ron" => "🥃",
        "vodka" => "🧊",
        "tequila" => "🌵",
        "jugo_lima" => "🍋",
        "triple_sec" => "🍊",
        "soda" => "💧",
        _ => "🥤",
    }
}

/// `jugo_lima` -> `jugo lima`; the model must never echo internal names.
fn readable(name: &str) -> String {
    name.replace('_', " ")
}

fn ingredient_lines(catalog: &Catalog) -> String {
    catalog
        .pumps()
        .iter()
        .map(|p| format!("{} {}", emote_for(&p.ingredient), readable(&p.ingredient)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn recipe_lines(catalog: &Catalog) -> String {
    catalog
        .recipes()
        .iter()
        .map(|r| {
            let ingredients = r
                .ingredients
                .iter()
                .map(|i| format!("{} {}", emote_for(&i.name), readable(&i.name)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("🍹 **{}** → {}", r.name, ingredients)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn system_prompt(catalog: &Catalog, language: Language, is_first_turn: bool) -> String {
    let ingredients = ingredient_lines(catalog);
    let recipes = recipe_lines(catalog);

    match language {
        Language::Es => {
            let greeting_rule = if is_first_turn {
                "Saluda calurosamente al usuario, es su PRIMER mensaje"
            } else {
                "NO saludes, continúa la conversación de forma natural"
            };
            format!(
                "Eres un barman profesional amable y cordial que prepara cócteles \
                 con un sistema de bombas automáticas.\n\n\
                 **INGREDIENTES DISPONIBLES:**\n{ingredients}\n\n\
                 **CÓCTELES DISPONIBLES:**\n{recipes}\n\n\
                 **REGLAS:**\n\
                 1. Responde SIEMPRE en máximo 500 caracteres\n\
                 2. {greeting_rule}\n\
                 3. Usa como máximo un emoji por respuesta\n\
                 4. Nunca menciones bombas, pines ni nombres internos; usa \
                 nombres legibles (🍋 lima, no jugo_lima)\n\
                 5. Si el usuario elige un cóctel disponible, lista sus \
                 ingredientes y termina EXACTAMENTE con: ¿Confirmas tu pedido?\n\
                 6. Si el cóctel no está disponible, sugiere alternativas del menú\n\
                 7. Mantén un tono profesional pero muy cordial"
            )
        }
        Language::En => {
            let greeting_rule = if is_first_turn {
                "Greet the user warmly, this is their FIRST message"
            } else {
                "Do NOT greet, continue the conversation naturally"
            };
            format!(
                "You are a friendly, professional bartender preparing cocktails \
                 with an automated pump system.\n\n\
                 **AVAILABLE INGREDIENTS:**\n{ingredients}\n\n\
                 **AVAILABLE COCKTAILS:**\n{recipes}\n\n\
                 **RULES:**\n\
                 1. ALWAYS answer in at most 500 characters\n\
                 2. {greeting_rule}\n\
                 3. Use at most one emoji per reply\n\
                 4. Never mention pumps, pins or internal names; use readable \
                 names (🍋 lime, not jugo_lima)\n\
                 5. If the user picks an available cocktail, list its \
                 ingredients and end EXACTLY with: Do you confirm your order?\n\
                 6. If the cocktail is unavailable, suggest alternatives from the menu\n\
                 7. Keep a professional but very warm tone"
            )
        }
    }
}

/// Flatten system instruction plus history into one prompt for providers
/// that take a single string (the local Ollama fallback).
pub fn flatten_transcript(
    system_prompt: &str,
    history: &[ConversationMessage],
    message: &str,
) -> String {
    let mut prompt = String::from(system_prompt);
    prompt.push_str("\n\n");
    for turn in history {
        let speaker = match turn.role {
            Role::User => "User",
            Role::Assistant => "Bartender",
        };
        prompt.push_str(&format!("{speaker}: {}\n", turn.content));
    }
    prompt.push_str(&format!("User: {message}\nBartender:"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn prompt_embeds_catalog() {
        let catalog = Catalog::builtin();
        let prompt = system_prompt(&catalog, Language::Es, true);
        assert!(prompt.contains("🥃 ron"));
        assert!(prompt.contains("🍋 jugo lima"));
        assert!(prompt.contains("**Mojito**"));
        assert!(prompt.contains("**Ron Collins**"));
        // Internal names never appear in readable lists.
        assert!(!prompt.contains("→ jugo_lima"));
    }

    #[test]
    fn greeting_rule_depends_on_first_turn() {
        let catalog = Catalog::builtin();
        let first = system_prompt(&catalog, Language::Es, true);
        let later = system_prompt(&catalog, Language::Es, false);
        assert!(first.contains("PRIMER mensaje"));
        assert!(later.contains("NO saludes"));
    }

    #[test]
    fn prompt_language_follows_detector() {
        let catalog = Catalog::builtin();
        let en = system_prompt(&catalog, Language::En, true);
        assert!(en.contains("Do you confirm your order?"));
        let es = system_prompt(&catalog, Language::Es, true);
        assert!(es.contains("¿Confirmas tu pedido?"));
    }

    #[test]
    fn transcript_interleaves_roles() {
        let history = vec![
            ConversationMessage::user("hola"),
            ConversationMessage::assistant("¡Hola! ¿Qué te preparo?"),
        ];
        let flat = flatten_transcript("SYSTEM", &history, "un mojito");
        assert!(flat.starts_with("SYSTEM"));
        assert!(flat.contains("User: hola\n"));
        assert!(flat.contains("Bartender: ¡Hola!"));
        assert!(flat.ends_with("User: un mojito\nBartender:"));
    }
}
