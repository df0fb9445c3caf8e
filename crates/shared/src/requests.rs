//! Request bodies for the backend's POST endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Simulated minutes per real second; the backend contract fixes it at 60
pub const TIME_COMPRESSION: u32 = 60;

/// Number of paintable moments requested by extraction and export
pub const PAINTABLE_TOP_N: u32 = 5;

/// Interaction density tunable.
///
/// The accepted values are defined by the backend; the client forwards the
/// string it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionDensity(pub String);

impl InteractionDensity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InteractionDensity {
    fn default() -> Self {
        Self("moderate".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// 0.0 - 1.0
    pub autonomy_level: f64,
    /// 0.0 - 1.0
    pub randomness: f64,
    pub interaction_density: InteractionDensity,
    pub time_compression: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            autonomy_level: 0.75,
            randomness: 0.25,
            interaction_density: InteractionDensity::default(),
            time_compression: TIME_COMPRESSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedScenarioRequest {
    /// character id -> location id
    pub placements: BTreeMap<String, String>,
    pub config: ScenarioConfig,
    pub use_llm: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSimulationRequest {
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSessionRequest {
    pub name: String,
}

/// Body shared by moment extraction and training-set export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintableRequest {
    pub top_n: u32,
    pub use_llm: bool,
}

impl PaintableRequest {
    pub fn new(use_llm: bool) -> Self {
        Self {
            top_n: PAINTABLE_TOP_N,
            use_llm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seed_request_matches_wire_shape() {
        let mut placements = BTreeMap::new();
        placements.insert("char_a".to_string(), "loc_x".to_string());
        let request = SeedScenarioRequest {
            placements,
            config: ScenarioConfig {
                autonomy_level: 0.5,
                randomness: 0.1,
                interaction_density: InteractionDensity::new("sparse"),
                time_compression: TIME_COMPRESSION,
            },
            use_llm: true,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "placements": {"char_a": "loc_x"},
                "config": {
                    "autonomy_level": 0.5,
                    "randomness": 0.1,
                    "interaction_density": "sparse",
                    "time_compression": 60
                },
                "use_llm": true
            })
        );
    }

    #[test]
    fn paintable_request_uses_fixed_top_n() {
        assert_eq!(
            serde_json::to_value(PaintableRequest::new(false)).unwrap(),
            json!({"top_n": 5, "use_llm": false})
        );
    }
}
