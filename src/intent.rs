//! Cocktail intent matching.
//!
//! Matching tries the structured confirmation token first, then an exact
//! name substring, then a typo-tolerant word comparison, and finally a
//! generic ordering keyword. The fuzzy comparator counts same-index
//! character substitutions plus a length penalty. It is not an edit
//! distance and stays compatible with earlier releases of the rig.

use crate::catalog::Catalog;
use crate::language::Language;
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CocktailMatch {
    /// The user approved a previously proposed order.
    Confirmation { recipe_id: String },
    /// The message names a catalog recipe verbatim.
    Name { recipe_id: String },
    /// The message contains a near-miss of a recipe-name word.
    Fuzzy { recipe_id: String },
    /// Ordering intent without a recognizable recipe.
    Intent,
}

impl CocktailMatch {
    pub fn recipe_id(&self) -> Option<&str> {
        match self {
            CocktailMatch::Confirmation { recipe_id }
            | CocktailMatch::Name { recipe_id }
            | CocktailMatch::Fuzzy { recipe_id } => Some(recipe_id),
            CocktailMatch::Intent => None,
        }
    }
}

lazy_static! {
    static ref CONFIRM_TOKEN: Regex = Regex::new(r"^CONFIRM_ORDER_([A-Za-z0-9_]+)$")
        .expect("confirmation token pattern is valid");
}

const CONFIRM_PHRASES: &[&str] = &["confirmar pedido", "confirmo el pedido", "confirm order", "confirm my order"];

const ORDER_KEYWORDS_ES: &[&str] = &["quiero", "dame", "prepara", "hazme", "quisiera", "me gustaría", "ponme"];
const ORDER_KEYWORDS_EN: &[&str] = &["want", "give me", "make me", "i'd like", "i would like", "can i get", "serve me"];

/// Decide what, if anything, the message asks for.
///
/// Returns `None` when the message neither names a recipe nor carries
/// ordering intent; the caller falls through to plain conversation.
pub fn match_intent(text: &str, language: Language, catalog: &Catalog) -> Option<CocktailMatch> {
    let trimmed = text.trim();

    // Structured confirmation token: all-or-nothing, an unknown id is not
    // re-interpreted as a fresh request.
    if let Some(captures) = CONFIRM_TOKEN.captures(trimmed) {
        let id = captures[1].to_lowercase();
        return catalog
            .recipe(&id)
            .map(|recipe| CocktailMatch::Confirmation {
                recipe_id: recipe.id.clone(),
            });
    }

    let lower = trimmed.to_lowercase();

    // Natural-language confirmation referencing a recipe by name.
    if CONFIRM_PHRASES.iter().any(|p| lower.contains(p)) {
        return find_named_recipe(&lower, catalog).map(|recipe_id| CocktailMatch::Confirmation { recipe_id });
    }

    if let Some(recipe_id) = find_named_recipe(&lower, catalog) {
        return Some(CocktailMatch::Name { recipe_id });
    }

    if let Some(recipe_id) = find_fuzzy_recipe(&lower, catalog) {
        return Some(CocktailMatch::Fuzzy { recipe_id });
    }

    let keywords = match language {
        Language::Es => ORDER_KEYWORDS_ES,
        Language::En => ORDER_KEYWORDS_EN,
    };
    if keywords.iter().any(|k| lower.contains(k)) {
        return Some(CocktailMatch::Intent);
    }

    None
}

fn find_named_recipe(lower: &str, catalog: &Catalog) -> Option<String> {
    catalog
        .recipes()
        .iter()
        .find(|r| lower.contains(&r.name.to_lowercase()) || lower.contains(&r.id))
        .map(|r| r.id.clone())
}

fn find_fuzzy_recipe(lower: &str, catalog: &Catalog) -> Option<String> {
    let input_words: Vec<String> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(normalize)
        .collect();

    for recipe in catalog.recipes() {
        for name_word in recipe.name.split_whitespace() {
            let name_word = normalize(name_word);
            if name_word.chars().count() < 4 {
                continue;
            }
            for input_word in &input_words {
                if words_close(&name_word, input_word) {
                    return Some(recipe.id.clone());
                }
            }
        }
    }
    None
}

/// Lowercase, strip diacritics, drop whitespace.
fn normalize(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(strip_diacritic)
        .collect()
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}

/// Positional difference count: same-index substitutions over the shorter
/// word plus the length difference. "mohito" vs "mojito" scores 1.
fn words_close(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    // Containment only counts for words long enough to name a recipe on
    // their own; "i" sits inside "mojito" but carries no signal.
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if short.chars().count() >= 4 && long.contains(short) {
        return true;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut diff = a.len().abs_diff(b.len());
    for i in 0..a.len().min(b.len()) {
        if a[i] != b[i] {
            diff += 1;
        }
    }
    diff <= 2
}
