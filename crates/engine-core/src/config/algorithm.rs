use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Selects a named algorithm from the registry and carries its
/// loosely-typed parameters, parsed lazily by the algorithm implementation
/// that consumes them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmSpec {
    pub algorithm_id: String,
    #[serde(default = "default_params")]
    pub params: Value,
}

fn default_params() -> Value {
    Value::Object(serde_json::Map::new())
}

impl AlgorithmSpec {
    pub fn new(algorithm_id: impl Into<String>) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            params: default_params(),
        }
    }

    pub fn with_params(algorithm_id: impl Into<String>, params: Value) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
            params,
        }
    }
}
