//! Entities as the backend transmits them.
//!
//! The client treats all of these as read-only value objects. Field aliases
//! absorb the naming differences between the list endpoints and the map
//! endpoint (`current_location` vs `location`, `current_time` vs `time_of_day`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Characters and Locations
// =============================================================================

/// Animal companion as reported by the backend.
///
/// The list endpoint sends `{species, name}`; the map endpoint may send a
/// bare label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnimalCompanion {
    Detailed {
        species: String,
        #[serde(default)]
        name: String,
    },
    Label(String),
}

impl AnimalCompanion {
    /// Human-readable companion label
    pub fn label(&self) -> String {
        match self {
            AnimalCompanion::Detailed { species, name } if name.is_empty() => species.clone(),
            AnimalCompanion::Detailed { species, name } => format!("{name} ({species})"),
            AnimalCompanion::Label(label) => label.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AnimalCompanion::Detailed { species, name } => species.is_empty() && name.is_empty(),
            AnimalCompanion::Label(label) => label.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    /// Stable key; characters nested in map locations may omit it
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal: Option<AnimalCompanion>,
    #[serde(default)]
    pub emotional_state: String,
    /// Location id, or empty / absent when not placed
    #[serde(default, alias = "current_location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

impl Character {
    /// Location id, treating an empty string as "not placed"
    pub fn location_id(&self) -> Option<&str> {
        self.location.as_deref().filter(|id| !id.is_empty())
    }

    /// Companion label when the character has a non-empty companion
    pub fn animal_label(&self) -> Option<String> {
        self.animal
            .as_ref()
            .filter(|animal| !animal.is_empty())
            .map(AnimalCompanion::label)
    }

    /// First whitespace-separated word of the name
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "current_time")]
    pub time_of_day: String,
    #[serde(default, alias = "current_weather")]
    pub weather: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
    /// Characters currently present (denormalized copy, refreshed each poll)
    #[serde(default)]
    pub characters: Vec<Character>,
}

// =============================================================================
// Field notes
// =============================================================================

/// Emotional quality of a moment.
///
/// Values are defined by the backend; the client only displays them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionalTemperature(pub String);

impl EmotionalTemperature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw value with its first character upper-cased
    pub fn display_label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Styling class; unknown or missing temperatures fall back to `uncertain`
    pub fn class_name(&self) -> &str {
        if self.0.is_empty() {
            "uncertain"
        } else {
            &self.0
        }
    }
}

impl From<&str> for EmotionalTemperature {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One recorded simulated event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interaction {
    pub timestamp: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub action_description: String,
    #[serde(default)]
    pub material_details: String,
    #[serde(default)]
    pub emotional_temperature: EmotionalTemperature,
    /// Flagged by the backend as emergent behavior
    #[serde(default)]
    pub is_unexpected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,
    #[serde(default)]
    pub characters_present: Vec<String>,
    #[serde(default)]
    pub animals_present: Vec<String>,
    #[serde(default)]
    pub weather: String,
    #[serde(default)]
    pub cinematic_report: String,
    #[serde(default)]
    pub environmental_context: String,
    #[serde(default)]
    pub pattern_tags: Vec<String>,
}

// =============================================================================
// Paintable moments and quality analysis
// =============================================================================

/// Backend-curated interaction enriched with composition and prompt text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintableMoment {
    pub timestamp: String,
    pub location: String,
    pub composition: String,
    pub color_notes: String,
    pub gesture_notes: String,
    pub painting_prompt: String,
    pub image_gen_prompt: String,
    pub why_paintable: String,
    pub original_field_note: String,
}

/// Suggestion severity. Only `high` is distinguished; every other value
/// is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    High,
    Other(String),
}

impl Severity {
    pub fn is_high(&self) -> bool {
        matches!(self, Severity::High)
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Other(String::new())
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        if value == "high" {
            Severity::High
        } else {
            Severity::Other(value)
        }
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        match value {
            Severity::High => "high".to_string(),
            Severity::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualityAnalysis {
    #[serde(default)]
    pub suggestions: Vec<QualitySuggestion>,
    #[serde(default)]
    pub overused_words: BTreeMap<String, u64>,
    #[serde(default)]
    pub word_frequency: BTreeMap<String, u64>,
    #[serde(default)]
    pub total_interactions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn character_accepts_list_endpoint_shape() {
        let character: Character = serde_json::from_value(json!({
            "id": "char_mara",
            "name": "Mara Okonkwo",
            "archetype": "wanderer",
            "current_location": "loc_bonfire",
            "emotional_state": "restless",
            "animal": {"species": "heron", "name": "Ash"}
        }))
        .unwrap();

        assert_eq!(character.location_id(), Some("loc_bonfire"));
        assert_eq!(character.animal_label().as_deref(), Some("Ash (heron)"));
        assert_eq!(character.first_name(), "Mara");
    }

    #[test]
    fn map_character_may_omit_id_and_use_bare_animal_label() {
        let character: Character = serde_json::from_value(json!({
            "name": "Tomas",
            "emotional_state": "Calm",
            "animal": "",
            "location": ""
        }))
        .unwrap();

        assert!(character.id.is_empty());
        assert_eq!(character.location_id(), None);
        assert_eq!(character.animal_label(), None);
    }

    #[test]
    fn location_accepts_current_time_aliases() {
        let location: Location = serde_json::from_value(json!({
            "id": "loc_canyon",
            "name": "Canyon",
            "current_time": "dusk",
            "current_weather": "dry wind"
        }))
        .unwrap();

        assert_eq!(location.time_of_day, "dusk");
        assert_eq!(location.weather, "dry wind");
        assert!(location.characters.is_empty());
    }

    #[test]
    fn temperature_label_capitalizes_first_letter_only() {
        assert_eq!(EmotionalTemperature::from("tense").display_label(), "Tense");
        assert_eq!(
            EmotionalTemperature::from("ruptured calm").display_label(),
            "Ruptured calm"
        );
        assert_eq!(EmotionalTemperature::default().display_label(), "");
        assert_eq!(EmotionalTemperature::default().class_name(), "uncertain");
    }

    #[test]
    fn severity_distinguishes_only_high() {
        let suggestion: QualitySuggestion = serde_json::from_value(json!({
            "type": "repetitive_locations",
            "severity": "medium",
            "message": "Same locations repeated: Canyon",
            "detail": "Consider moving characters to varied locations."
        }))
        .unwrap();

        assert_eq!(suggestion.severity, Severity::Other("medium".to_string()));
        assert!(!suggestion.severity.is_high());
        assert!(Severity::from("high".to_string()).is_high());
        assert_eq!(suggestion.action, None);
    }
}
