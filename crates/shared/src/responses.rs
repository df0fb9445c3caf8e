//! Response types returned by the backend
//!
//! Most endpoints wrap their payload in a status envelope: `status` is
//! `"success"` or anything else, in which case `message` explains why.
//! The typed payloads below are deserialized from the same JSON object once
//! the envelope has been checked.
//!
//! The status endpoint is the exception: it is not enveloped and uses the
//! `"no_simulation"` sentinel for an unseeded backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{Interaction, Location, PaintableMoment, QualityAnalysis};

/// Envelope status value for a successful call
pub const SUCCESS: &str = "success";

/// Status sentinel for a backend that has never been seeded
pub const NO_SIMULATION: &str = "no_simulation";

// =============================================================================
// Envelope
// =============================================================================

/// The envelope fields common to every enveloped response
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }
}

// =============================================================================
// Simulation Status
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterState {
    #[serde(default)]
    pub emotional_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: String,
    #[serde(default)]
    pub interactions_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_time: Option<String>,
    /// character id -> runtime state
    #[serde(default)]
    pub characters: BTreeMap<String, CharacterState>,
}

/// Result of `GET /api/simulation/status`
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationStatus {
    /// The backend has not been seeded yet
    NoSimulation,
    Snapshot(StatusSnapshot),
}

impl<'de> Deserialize<'de> for SimulationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let snapshot = StatusSnapshot::deserialize(deserializer)?;
        if snapshot.status == NO_SIMULATION {
            Ok(SimulationStatus::NoSimulation)
        } else {
            Ok(SimulationStatus::Snapshot(snapshot))
        }
    }
}

// =============================================================================
// Enveloped payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunResponse {
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub interactions_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub report: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentsResponse {
    #[serde(default)]
    pub moments: Vec<PaintableMoment>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityResponse {
    #[serde(default)]
    pub analysis: QualityAnalysis,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoraExportResponse {
    /// Opaque training dataset; written to disk as-is
    #[serde(default)]
    pub dataset: serde_json::Value,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapViewResponse {
    #[serde(default)]
    pub locations: Vec<Location>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_sentinel_parses_as_no_simulation() {
        let status: SimulationStatus =
            serde_json::from_value(json!({"status": "no_simulation"})).unwrap();
        assert_eq!(status, SimulationStatus::NoSimulation);
    }

    #[test]
    fn status_snapshot_keeps_character_states() {
        let status: SimulationStatus = serde_json::from_value(json!({
            "status": "paused",
            "current_time": "2024-05-01T18:00:00",
            "interactions_count": 12,
            "characters": {
                "char_a": {"location": "loc_x", "emotional_state": "wary", "intensity": 0.4},
                "char_b": {"location": null, "emotional_state": "calm"}
            }
        }))
        .unwrap();

        let SimulationStatus::Snapshot(snapshot) = status else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.status, "paused");
        assert_eq!(snapshot.interactions_count, 12);
        assert_eq!(snapshot.characters["char_a"].location.as_deref(), Some("loc_x"));
        assert_eq!(snapshot.characters["char_b"].location, None);
    }

    #[test]
    fn envelope_reports_failure_message() {
        let envelope: ResponseStatus = serde_json::from_value(json!({
            "status": "error",
            "message": "No simulation initialized"
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert_eq!(envelope.message.as_deref(), Some("No simulation initialized"));
    }
}
