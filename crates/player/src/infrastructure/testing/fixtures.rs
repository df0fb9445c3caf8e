//! Simple test fixtures used across unit tests.

use autoworld_shared::{Character, EmotionalTemperature, Interaction, Location, PaintableMoment};
use serde_json::{json, Value};

pub fn character(id: &str, name: &str) -> Character {
    Character {
        id: id.to_string(),
        name: name.to_string(),
        emotional_state: "calm".to_string(),
        ..Character::default()
    }
}

pub fn location(id: &str, name: &str) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        time_of_day: "dusk".to_string(),
        weather: "clear".to_string(),
        ..Location::default()
    }
}

/// A map-view location with the given characters standing in it
pub fn populated_location(id: &str, name: &str, characters: &[(&str, &str)]) -> Location {
    Location {
        characters: characters
            .iter()
            .map(|(char_id, char_name)| character(char_id, char_name))
            .collect(),
        ..location(id, name)
    }
}

pub fn interaction(location_name: &str, temperature: &str, unexpected: bool) -> Interaction {
    Interaction {
        timestamp: "2024-05-01T18:05:00".to_string(),
        location_name: location_name.to_string(),
        time_of_day: "dusk".to_string(),
        action_description: "Mara sets down the lantern".to_string(),
        material_details: "Rust on the handle".to_string(),
        emotional_temperature: EmotionalTemperature::from(temperature),
        is_unexpected: unexpected,
        ..Interaction::default()
    }
}

pub fn moment(location: &str) -> PaintableMoment {
    PaintableMoment {
        timestamp: "2024-05-01T18:05:00".to_string(),
        location: location.to_string(),
        composition: "Low horizon".to_string(),
        color_notes: "Ochre".to_string(),
        gesture_notes: "Open palm".to_string(),
        painting_prompt: "Paint the pause".to_string(),
        image_gen_prompt: "oil sketch, dusk".to_string(),
        why_paintable: "Stillness".to_string(),
        original_field_note: "She waited".to_string(),
    }
}

pub fn success(extra: Value) -> Value {
    let mut body = json!({"status": "success"});
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    body
}

pub fn rejected(message: &str) -> Value {
    json!({"status": "error", "message": message})
}
