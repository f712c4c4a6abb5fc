//! Base-stat-to-leveled-stat growth formulas.

use std::collections::BTreeMap;

use super::{AlgorithmError, param_f64};
use crate::config::AlgorithmSpec;

const KNOWN_IDS: &[&str] = &["flat", "linear", "exponential"];

pub fn is_known(algorithm_id: &str) -> bool {
    KNOWN_IDS.contains(&algorithm_id)
}

fn additive_for(params: &serde_json::Value, stat_id: &str) -> f64 {
    params
        .get("additivePerLevel")
        .and_then(|v| v.get(stat_id))
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Applies `spec` to a single stat's base value at `level`, producing the
/// leveled value consumed by the stats projection pipeline.
///
/// `level` below 1 is treated as 1 — a character can never regress past its
/// base stats.
pub fn apply(
    spec: &AlgorithmSpec,
    stat_id: &str,
    base: i64,
    level: u32,
) -> Result<i64, AlgorithmError> {
    let level = level.max(1);
    let steps = (level - 1) as f64;

    match spec.algorithm_id.as_str() {
        "flat" => Ok(base),
        "linear" => {
            let multiplier = param_f64(&spec.params, "linear", "perLevelMultiplier")?;
            let additive = additive_for(&spec.params, stat_id);
            let value = (base as f64) * (1.0 + multiplier * steps) + additive * steps;
            Ok(value.floor() as i64)
        }
        "exponential" => {
            let exponent = param_f64(&spec.params, "exponential", "exponent")?;
            let value = (base as f64) * exponent.powf(steps);
            Ok(value.floor() as i64)
        }
        other => Err(AlgorithmError::UnknownAlgorithm(other.to_string())),
    }
}

/// Applies `spec` across every stat in `base_stats`, as the stats pipeline's
/// per-stage growth calls do.
pub fn apply_all(
    spec: &AlgorithmSpec,
    base_stats: &BTreeMap<String, i64>,
    level: u32,
) -> Result<BTreeMap<String, i64>, AlgorithmError> {
    base_stats
        .iter()
        .map(|(stat_id, base)| apply(spec, stat_id, *base, level).map(|v| (stat_id.clone(), v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ignores_level() {
        let spec = AlgorithmSpec::new("flat");
        assert_eq!(apply(&spec, "strength", 10, 1).unwrap(), 10);
        assert_eq!(apply(&spec, "strength", 10, 50).unwrap(), 10);
    }

    #[test]
    fn linear_applies_multiplier_and_per_stat_additive() {
        let spec = AlgorithmSpec::with_params(
            "linear",
            serde_json::json!({ "perLevelMultiplier": 0.1, "additivePerLevel": { "hp": 1.0 } }),
        );
        // S2: base hp=20, level=3 -> steps=2: 20*(1+0.1*2) + 1*2 = 24 + 2 = 26
        assert_eq!(apply(&spec, "hp", 20, 3).unwrap(), 26);
        // strength has no additivePerLevel entry -> 0
        // base strength=5, level=3 -> 5*1.2 = 6
        assert_eq!(apply(&spec, "strength", 5, 3).unwrap(), 6);
    }

    #[test]
    fn linear_treats_level_below_one_as_one() {
        let spec = AlgorithmSpec::with_params(
            "linear",
            serde_json::json!({ "perLevelMultiplier": 0.5 }),
        );
        assert_eq!(
            apply(&spec, "strength", 10, 0).unwrap(),
            apply(&spec, "strength", 10, 1).unwrap()
        );
    }

    #[test]
    fn linear_missing_multiplier_is_invalid_config_reference() {
        let spec = AlgorithmSpec::new("linear");
        assert!(matches!(
            apply(&spec, "strength", 10, 2),
            Err(AlgorithmError::MissingParam { .. })
        ));
    }

    #[test]
    fn exponential_floors_result() {
        let spec =
            AlgorithmSpec::with_params("exponential", serde_json::json!({ "exponent": 1.2 }));
        // base=10, level=3 -> 10*1.2^2 = 14.4 -> floor 14
        assert_eq!(apply(&spec, "strength", 10, 3).unwrap(), 14);
    }

    #[test]
    fn unknown_algorithm_id_is_rejected() {
        let spec = AlgorithmSpec::new("quadratic");
        assert!(matches!(
            apply(&spec, "strength", 10, 2),
            Err(AlgorithmError::UnknownAlgorithm(_))
        ));
    }
}
