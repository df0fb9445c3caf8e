//! In-memory view state owned by the controller.

use std::collections::BTreeMap;

use autoworld_shared::{Character, Location, PaintableMoment};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),
    #[error("Location {0} is not one of the offered locations")]
    UnknownLocation(String),
}

/// Placement controls: one selector per character, each offering
/// "not placed" plus every known location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementForm {
    offered: Vec<String>,
    /// (character id, chosen location id) in character order
    selections: Vec<(String, Option<String>)>,
}

impl PlacementForm {
    pub fn build(characters: &[Character], locations: &[Location]) -> Self {
        Self {
            offered: locations.iter().map(|location| location.id.clone()).collect(),
            selections: characters
                .iter()
                .map(|character| (character.id.clone(), None))
                .collect(),
        }
    }

    /// Set one selector; `None` means "not placed"
    pub fn select(
        &mut self,
        character_id: &str,
        location_id: Option<&str>,
    ) -> Result<(), PlacementError> {
        if let Some(location_id) = location_id {
            if !self.offered.iter().any(|offered| offered == location_id) {
                return Err(PlacementError::UnknownLocation(location_id.to_string()));
            }
        }

        let (_, selection) = self
            .selections
            .iter_mut()
            .find(|(id, _)| id == character_id)
            .ok_or_else(|| PlacementError::UnknownCharacter(character_id.to_string()))?;
        *selection = location_id.map(str::to_string);
        Ok(())
    }

    /// Placed characters only: character id -> location id
    pub fn collect(&self) -> BTreeMap<String, String> {
        self.selections
            .iter()
            .filter_map(|(character_id, location_id)| {
                location_id
                    .as_ref()
                    .map(|location_id| (character_id.clone(), location_id.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Reference data from bootstrap; the only source of id -> name lookups
    pub characters: Vec<Character>,
    pub locations: Vec<Location>,
    pub placements: PlacementForm,
    pub current_location_index: usize,
    pub auto_scroll_enabled: bool,
    /// Latest map poll result
    pub map_locations: Vec<Location>,
    /// Character shown in the detail overlay
    pub overlay: Option<Character>,
    /// Moments from the last successful extraction, for download
    pub last_moments: Vec<PaintableMoment>,
}

impl ViewState {
    /// Replace reference data and rebuild the placement form
    pub fn load_reference(&mut self, characters: Vec<Character>, locations: Vec<Location>) {
        self.placements = PlacementForm::build(&characters, &locations);
        self.characters = characters;
        self.locations = locations;
    }

    /// Replace map data, keeping the active stage in range
    pub fn load_map(&mut self, locations: Vec<Location>) {
        self.map_locations = locations;
        let last = self.map_locations.len().saturating_sub(1);
        self.current_location_index = self.current_location_index.min(last);
    }

    /// Drop everything derived from a simulation run
    pub fn clear_derived(&mut self) {
        self.last_moments.clear();
        self.overlay = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{character, location};

    fn form() -> PlacementForm {
        PlacementForm::build(
            &[character("char_a", "Mara"), character("char_b", "Tomas")],
            &[location("loc_x", "Bonfire"), location("loc_y", "Canyon")],
        )
    }

    #[test]
    fn collect_returns_only_placed_characters() {
        let mut form = form();
        assert!(form.collect().is_empty());

        form.select("char_b", Some("loc_y")).unwrap();
        let placements = form.collect();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements["char_b"], "loc_y");

        form.select("char_b", None).unwrap();
        assert!(form.collect().is_empty());
    }

    #[test]
    fn select_rejects_unoffered_ids() {
        let mut form = form();
        assert_eq!(
            form.select("char_a", Some("loc_gone")),
            Err(PlacementError::UnknownLocation("loc_gone".to_string()))
        );
        assert_eq!(
            form.select("char_q", Some("loc_x")),
            Err(PlacementError::UnknownCharacter("char_q".to_string()))
        );
    }

    #[test]
    fn load_map_clamps_active_stage() {
        let mut state = ViewState {
            current_location_index: 4,
            ..ViewState::default()
        };
        state.load_map(vec![location("a", "A"), location("b", "B")]);
        assert_eq!(state.current_location_index, 1);

        state.load_map(Vec::new());
        assert_eq!(state.current_location_index, 0);
    }
}
