//! Spanish/English detection over a single chat message.
//!
//! Diacritics and inverted punctuation are a hard Spanish signal; otherwise
//! two lists of words that exist in only one of the languages are scored and
//! the higher total wins. Ties (including no hits at all) keep the previous
//! turn's language, so the detector is sticky rather than jumpy.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

lazy_static! {
    static ref SPANISH_WORDS: HashMap<&'static str, u32> = [
        ("quiero", 3),
        ("dame", 3),
        ("hazme", 3),
        ("quisiera", 3),
        ("ponme", 3),
        ("prepara", 2),
        ("hola", 2),
        ("buenas", 2),
        ("gracias", 2),
        ("por", 2),
        ("favor", 2),
        ("trago", 2),
        ("bebida", 2),
        ("coctel", 2),
        ("tienes", 2),
        ("puedes", 2),
        ("otra", 2),
        ("otro", 2),
    ]
    .into_iter()
    .collect();
    static ref ENGLISH_WORDS: HashMap<&'static str, u32> = [
        ("want", 3),
        ("give", 3),
        ("make", 2),
        ("hello", 2),
        ("hi", 2),
        ("hey", 2),
        ("thanks", 2),
        ("thank", 2),
        ("please", 2),
        ("drink", 2),
        ("cocktail", 2),
        ("would", 2),
        ("like", 2),
        ("have", 2),
        ("the", 2),
        ("another", 2),
    ]
    .into_iter()
    .collect();
}

fn is_spanish_marker(c: char) -> bool {
    matches!(
        c,
        'á' | 'é' | 'í' | 'ó' | 'ú' | 'ü' | 'ñ' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'Ü' | 'Ñ' | '¿' | '¡'
    )
}

/// Classify `text` as Spanish or English, falling back to `previous` when
/// the evidence is inconclusive. Pure function, no side effects.
pub fn detect(text: &str, previous: Language) -> Language {
    if text.chars().any(is_spanish_marker) {
        return Language::Es;
    }

    let lower = text.to_lowercase();
    let mut spanish = 0u32;
    let mut english = 0u32;
    for token in lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
    {
        if let Some(weight) = SPANISH_WORDS.get(token) {
            spanish += weight;
        }
        if let Some(weight) = ENGLISH_WORDS.get(token) {
            english += weight;
        }
    }

    if spanish > english {
        Language::Es
    } else if english > spanish {
        Language::En
    } else {
        previous
    }
}
