//! Conversion of a confirmed recipe into the rig's pump schedule.
//!
//! The wire contract is the full duration schedule (snake_case, the rig
//! firmware is Python): per pump the GPIO pin, ingredient, volume and run
//! time, plus the total volume and an epoch-millisecond timestamp.

use crate::catalog::{Catalog, Recipe};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PumpAction {
    pub gpio_pin: u8,
    pub ingredient: String,
    pub ml: f64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispensePayload {
    pub recipe_id: String,
    pub recipe_name: String,
    /// Keyed `pump_<id>`, matching the rig's configuration file.
    pub pumps: BTreeMap<String, PumpAction>,
    pub total_ml: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispenseError {
    /// The recipe references an ingredient no pump carries. The order is
    /// rejected rather than silently pouring an incomplete drink.
    #[error("ingredient '{ingredient}' has no configured pump")]
    UnconfiguredIngredient { ingredient: String },
}

pub fn build(recipe: &Recipe, catalog: &Catalog) -> Result<DispensePayload, DispenseError> {
    let mut pumps = BTreeMap::new();
    let mut total_ml = 0.0;

    for ingredient in &recipe.ingredients {
        let pump = catalog
            .pump_for(&ingredient.name)
            .ok_or_else(|| DispenseError::UnconfiguredIngredient {
                ingredient: ingredient.name.clone(),
            })?;
        let duration_ms = (ingredient.ml / pump.flow_rate_ml_per_sec * 1000.0).round() as u64;
        pumps.insert(
            format!("pump_{}", pump.id),
            PumpAction {
                gpio_pin: pump.gpio_pin,
                ingredient: ingredient.name.clone(),
                ml: ingredient.ml,
                duration_ms,
            },
        );
        total_ml += ingredient.ml;
    }

    Ok(DispensePayload {
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        pumps,
        total_ml,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Ingredient};

    #[test]
    fn mojito_schedule_has_three_pumps_totalling_180ml() {
        let catalog = Catalog::builtin();
        let recipe = catalog.recipe("mojito").unwrap();
        let payload = build(recipe, &catalog).unwrap();

        assert_eq!(payload.recipe_id, "mojito");
        assert_eq!(payload.recipe_name, "Mojito");
        assert_eq!(payload.pumps.len(), 3);
        assert_eq!(payload.total_ml, 180.0);

        // 10 ml/s pumps: duration_ms = ml * 100.
        let ron = &payload.pumps["pump_1"];
        assert_eq!((ron.gpio_pin, ron.duration_ms), (17, 5000));
        let lima = &payload.pumps["pump_4"];
        assert_eq!((lima.gpio_pin, lima.duration_ms), (23, 3000));
        let soda = &payload.pumps["pump_6"];
        assert_eq!((soda.gpio_pin, soda.duration_ms), (25, 10000));
    }

    #[test]
    fn duration_is_rounded_not_truncated() {
        let pumps = vec![crate::catalog::Pump {
            id: 1,
            ingredient: "ron".to_string(),
            gpio_pin: 17,
            flow_rate_ml_per_sec: 3.7,
        }];
        let recipe = Recipe {
            id: "shot".to_string(),
            name: "Shot".to_string(),
            description: String::new(),
            ingredients: vec![Ingredient {
                name: "ron".to_string(),
                ml: 40.0,
            }],
        };
        let catalog = Catalog::new(pumps, vec![recipe.clone()]).unwrap();
        let payload = build(&recipe, &catalog).unwrap();
        // 40 / 3.7 * 1000 = 10810.81..., rounds to 10811.
        assert_eq!(payload.pumps["pump_1"].duration_ms, 10811);
    }

    #[test]
    fn unconfigured_ingredient_fails_the_build() {
        let catalog = Catalog::builtin();
        let recipe = Recipe {
            id: "pina_colada".to_string(),
            name: "Piña Colada".to_string(),
            description: String::new(),
            ingredients: vec![
                Ingredient {
                    name: "ron".to_string(),
                    ml: 50.0,
                },
                Ingredient {
                    name: "crema_coco".to_string(),
                    ml: 30.0,
                },
            ],
        };
        let err = build(&recipe, &catalog).unwrap_err();
        assert_eq!(
            err,
            DispenseError::UnconfiguredIngredient {
                ingredient: "crema_coco".to_string()
            }
        );
    }

    #[test]
    fn payload_serializes_snake_case() {
        let catalog = Catalog::builtin();
        let payload = build(catalog.recipe("margarita").unwrap(), &catalog).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["recipe_id"], "margarita");
        assert_eq!(json["total_ml"], 100.0);
        assert_eq!(json["pumps"]["pump_3"]["gpio_pin"], 22);
        assert_eq!(json["pumps"]["pump_3"]["duration_ms"], 5000);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }
}
