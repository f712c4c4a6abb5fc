//! Level-up cost formulas: given a level transition, produce a table of
//! scoped resource costs (`"player.<id>"` / `"character.<id>"`).

use std::collections::BTreeMap;

use serde_json::Value;

use super::{AlgorithmError, parse_scoped_key};
use crate::config::AlgorithmSpec;

const KNOWN_IDS: &[&str] = &["flat", "free", "linear_cost", "mixed_linear_cost"];

pub fn is_known(algorithm_id: &str) -> bool {
    KNOWN_IDS.contains(&algorithm_id)
}

/// Cost of reaching `target_level` from scratch, per `linear_cost`'s formula:
/// zero below level 2, `base + perLevel*(target-2)` from there.
fn cost_at_target(base: f64, per_level: f64, target_level: u32) -> i64 {
    if target_level < 2 {
        return 0;
    }
    (base + per_level * ((target_level - 2) as f64)).floor() as i64
}

fn number_field(object: &Value, key: &str) -> Option<f64> {
    object.get(key).and_then(|v| v.as_f64())
}

/// Total cost of raising a level from `current_level` by `levels` steps,
/// keyed by the scoped resource the cost is drawn from — the sum of
/// `cost_at_target` over every target level `current_level+1 ..=
/// current_level+levels`.
pub fn total_cost(
    spec: &AlgorithmSpec,
    current_level: u32,
    levels: u32,
) -> Result<BTreeMap<String, i64>, AlgorithmError> {
    let mut total = BTreeMap::new();
    if levels == 0 {
        return Ok(total);
    }
    let targets = (current_level + 1)..=(current_level + levels);

    match spec.algorithm_id.as_str() {
        "flat" | "free" => {}
        "linear_cost" => {
            let resource_id = spec
                .params
                .get("resourceId")
                .and_then(Value::as_str)
                .ok_or_else(|| AlgorithmError::MissingParam {
                    algorithm_id: "linear_cost".to_string(),
                    param: "resourceId",
                })?;
            parse_scoped_key(resource_id)?;
            let base = number_field(&spec.params, "base").ok_or_else(|| {
                AlgorithmError::MissingParam {
                    algorithm_id: "linear_cost".to_string(),
                    param: "base",
                }
            })?;
            let per_level = number_field(&spec.params, "perLevel").unwrap_or(0.0);

            let sum: i64 = targets.map(|target| cost_at_target(base, per_level, target)).sum();
            *total.entry(resource_id.to_string()).or_insert(0) += sum;
        }
        "mixed_linear_cost" => {
            let costs = spec
                .params
                .get("costs")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            for entry in costs {
                let scope = entry
                    .get("scope")
                    .and_then(Value::as_str)
                    .ok_or_else(|| AlgorithmError::MissingParam {
                        algorithm_id: "mixed_linear_cost".to_string(),
                        param: "scope",
                    })?;
                if scope != "player" && scope != "character" {
                    return Err(AlgorithmError::InvalidCostResourceKey(scope.to_string()));
                }
                let resource_id = entry
                    .get("resourceId")
                    .and_then(Value::as_str)
                    .ok_or_else(|| AlgorithmError::MissingParam {
                        algorithm_id: "mixed_linear_cost".to_string(),
                        param: "resourceId",
                    })?;
                let base = number_field(&entry, "base").ok_or_else(|| {
                    AlgorithmError::MissingParam {
                        algorithm_id: "mixed_linear_cost".to_string(),
                        param: "base",
                    }
                })?;
                let per_level = number_field(&entry, "perLevel").unwrap_or(0.0);

                let key = format!("{scope}.{resource_id}");
                let sum: i64 = targets
                    .clone()
                    .map(|target| cost_at_target(base, per_level, target))
                    .sum();
                *total.entry(key).or_insert(0) += sum;
            }
        }
        other => return Err(AlgorithmError::UnknownAlgorithm(other.to_string())),
    }

    Ok(total)
}
