//! Static pump and recipe catalog.
//!
//! Pumps map one ingredient each to a GPIO pin and a flow rate; recipes map
//! a display name to ordered ingredient volumes. Both are loaded once at
//! startup and read-only afterwards. Recipe iteration order is declaration
//! order, which gives earlier recipes priority in fuzzy matching.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// A single dispensing channel on the rig.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    pub id: u8,
    pub ingredient: String,
    pub gpio_pin: u8,
    pub flow_rate_ml_per_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub ml: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
}

/// Deserialization goes through [`Catalog::from_json_file`] so the
/// invariants are always checked.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pumps: Vec<Pump>,
    recipes: Vec<Recipe>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("ingredient '{0}' is mapped to more than one pump")]
    DuplicatePumpIngredient(String),
    #[error("duplicate recipe id '{0}'")]
    DuplicateRecipeId(String),
}

impl Catalog {
    /// Build a catalog, enforcing the one-pump-per-ingredient invariant.
    /// Recipes that reference an unconfigured ingredient load with a
    /// warning; ordering one is rejected at dispense time.
    pub fn new(pumps: Vec<Pump>, recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        for (i, pump) in pumps.iter().enumerate() {
            if pumps[..i].iter().any(|p| p.ingredient == pump.ingredient) {
                return Err(CatalogError::DuplicatePumpIngredient(pump.ingredient.clone()));
            }
        }
        for (i, recipe) in recipes.iter().enumerate() {
            if recipes[..i].iter().any(|r| r.id == recipe.id) {
                return Err(CatalogError::DuplicateRecipeId(recipe.id.clone()));
            }
            for ingredient in &recipe.ingredients {
                if !pumps.iter().any(|p| p.ingredient == ingredient.name) {
                    warn!(
                        recipe = %recipe.id,
                        ingredient = %ingredient.name,
                        "recipe references an ingredient with no pump; it cannot be fulfilled"
                    );
                }
            }
        }
        Ok(Self { pumps, recipes })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        Self::new(file.pumps, file.recipes)
    }

    /// The catalog the rig ships with: six pumps at 10 ml/s and eight
    /// soda/lime-based cocktails.
    pub fn builtin() -> Self {
        Self {
            pumps: builtin_pumps(),
            recipes: builtin_recipes(),
        }
    }

    pub fn pumps(&self) -> &[Pump] {
        &self.pumps
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn pump_for(&self, ingredient: &str) -> Option<&Pump> {
        self.pumps.iter().find(|p| p.ingredient == ingredient)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    pumps: Vec<Pump>,
    recipes: Vec<Recipe>,
}

fn builtin_pumps() -> Vec<Pump> {
    let table: [(u8, &str, u8); 6] = [
        (1, "ron", 17),
        (2, "vodka", 27),
        (3, "tequila", 22),
        (4, "jugo_lima", 23),
        (5, "triple_sec", 24),
        (6, "soda", 25),
    ];
    table
        .into_iter()
        .map(|(id, ingredient, gpio_pin)| Pump {
            id,
            ingredient: ingredient.to_string(),
            gpio_pin,
            flow_rate_ml_per_sec: 10.0,
        })
        .collect()
}

fn builtin_recipes() -> Vec<Recipe> {
    fn recipe(id: &str, name: &str, description: &str, ingredients: &[(&str, f64)]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            ingredients: ingredients
                .iter()
                .map(|(n, ml)| Ingredient {
                    name: n.to_string(),
                    ml: *ml,
                })
                .collect(),
        }
    }

    vec![
        recipe(
            "mojito",
            "Mojito",
            "Ron blanco, lima, menta y soda",
            &[("ron", 50.0), ("jugo_lima", 30.0), ("soda", 100.0)],
        ),
        recipe(
            "margarita",
            "Margarita",
            "Tequila, triple sec y lima",
            &[("tequila", 50.0), ("triple_sec", 25.0), ("jugo_lima", 25.0)],
        ),
        recipe(
            "vodka_soda",
            "Vodka Soda",
            "Vodka con soda y un toque de lima",
            &[("vodka", 50.0), ("soda", 120.0), ("jugo_lima", 15.0)],
        ),
        recipe(
            "cuba_libre",
            "Cuba Libre",
            "Ron, lima y soda",
            &[("ron", 60.0), ("jugo_lima", 20.0), ("soda", 120.0)],
        ),
        recipe(
            "paloma",
            "Paloma",
            "Tequila, lima y soda",
            &[("tequila", 60.0), ("jugo_lima", 30.0), ("soda", 110.0)],
        ),
        recipe(
            "vodka_citrus",
            "Vodka Citrus",
            "Vodka, triple sec, lima y soda",
            &[
                ("vodka", 45.0),
                ("triple_sec", 15.0),
                ("jugo_lima", 20.0),
                ("soda", 100.0),
            ],
        ),
        recipe(
            "tequila_sunrise",
            "Tequila Sunrise",
            "Tequila, lima y soda",
            &[("tequila", 50.0), ("jugo_lima", 40.0), ("soda", 90.0)],
        ),
        recipe(
            "ron_collins",
            "Ron Collins",
            "Ron, lima y soda",
            &[("ron", 50.0), ("jugo_lima", 35.0), ("soda", 115.0)],
        ),
    ]
}
