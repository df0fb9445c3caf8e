//! View models
//!
//! Pure builders turning backend data into render instructions. Nothing here
//! performs I/O; skins consume the resulting values and draw them however
//! they like. Every id shown to the user is resolved through the character
//! and location tables passed in, degrading to a placeholder when missing.

use std::collections::BTreeMap;

use autoworld_shared::{
    Character, Interaction, Location, PaintableMoment, QualityAnalysis, SimulationStatus,
};

use super::format::clock_label;

pub const NO_INTERACTIONS: &str = "No interactions generated.";
pub const NOT_INITIALIZED: &str = "No simulation initialized. Seed a scenario to begin.";
pub const NO_MOMENTS: &str = "No paintable moments found.";
pub const QUALITY_ALL_CLEAR: &str = "No major issues detected. Good variety!";

pub const FIELD_NOTES_PLACEHOLDER: &str =
    "Field notes will appear here after running the simulation...";
pub const REPORT_PLACEHOLDER: &str = "Pattern analysis will appear here...";
pub const MOMENTS_PLACEHOLDER: &str = "Painting prompts will appear here...";

pub const NOT_PLACED: &str = "-- Not placed --";
pub const UNKNOWN: &str = "Unknown";
pub const UNSET: &str = "None";

pub const RUN_LABEL: &str = "Run Simulation";
pub const RUNNING_LABEL: &str = "Running...";

/// Horizontal figure positions on a stage, cycled per character
pub const FIGURE_SLOTS: [u16; 4] = [100, 200, 300, 380];

const DEFAULT_NEON: char = '◆';

// =============================================================================
// Updates and notices
// =============================================================================

/// One render instruction published by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    Placements(PlacementPanelView),
    Status(StatusView),
    FieldNotes(FieldNotesView),
    Report(ReportView),
    Moments(MomentsView),
    Diorama(DioramaView),
    /// `None` closes the overlay
    Overlay(Option<CharacterDetailView>),
    RunTrigger(RunTriggerView),
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing message (alert in the panel skin, toast in the studio)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTriggerView {
    pub enabled: bool,
    pub label: &'static str,
}

pub fn run_trigger(enabled: bool) -> RunTriggerView {
    RunTriggerView {
        enabled,
        label: if enabled { RUN_LABEL } else { RUNNING_LABEL },
    }
}

// =============================================================================
// Placement panel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOptionView {
    /// `None` is the "not placed" choice
    pub location_id: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRowView {
    pub character_id: String,
    pub label: String,
    pub options: Vec<PlacementOptionView>,
    /// Index into `options`
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlacementPanelView {
    pub rows: Vec<PlacementRowView>,
}

/// One selector per character: "not placed" followed by every location.
pub fn placement_panel(
    characters: &[Character],
    locations: &[Location],
    selections: &BTreeMap<String, String>,
) -> PlacementPanelView {
    let rows = characters
        .iter()
        .map(|character| {
            let options: Vec<PlacementOptionView> = std::iter::once(PlacementOptionView {
                location_id: None,
                label: NOT_PLACED.to_string(),
            })
            .chain(locations.iter().map(|location| PlacementOptionView {
                location_id: Some(location.id.clone()),
                label: location.name.clone(),
            }))
            .collect();

            let selected = selections
                .get(&character.id)
                .and_then(|chosen| {
                    options
                        .iter()
                        .position(|option| option.location_id.as_deref() == Some(chosen))
                })
                .unwrap_or(0);

            PlacementRowView {
                character_id: character.id.clone(),
                label: character.name.clone(),
                options,
                selected,
            }
        })
        .collect();

    PlacementPanelView { rows }
}

// =============================================================================
// Field notes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNoteView {
    pub time: String,
    pub location_name: String,
    pub time_of_day: String,
    pub emergent: bool,
    pub action: String,
    pub material: String,
    /// Temperature with its first letter capitalised
    pub temperature: String,
    /// Styling class for the temperature line
    pub temperature_class: String,
}

impl FieldNoteView {
    /// `[time - location - time_of_day]`
    pub fn header(&self) -> String {
        format!(
            "[{} - {} - {}]",
            self.time, self.location_name, self.time_of_day
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNotesView {
    Placeholder(String),
    Notes(Vec<FieldNoteView>),
}

/// Field notes in server order; an empty list gets the empty-state message.
pub fn field_notes_view(interactions: &[Interaction]) -> FieldNotesView {
    if interactions.is_empty() {
        return FieldNotesView::Placeholder(NO_INTERACTIONS.to_string());
    }

    FieldNotesView::Notes(
        interactions
            .iter()
            .map(|interaction| FieldNoteView {
                time: clock_label(&interaction.timestamp),
                location_name: interaction.location_name.clone(),
                time_of_day: interaction.time_of_day.clone(),
                emergent: interaction.is_unexpected,
                action: interaction.action_description.clone(),
                material: interaction.material_details.clone(),
                temperature: interaction.emotional_temperature.display_label(),
                temperature_class: interaction.emotional_temperature.class_name().to_string(),
            })
            .collect(),
    )
}

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStateLine {
    pub name: String,
    pub emotional_state: String,
    pub location: String,
    pub intensity: Option<f64>,
}

impl CharacterStateLine {
    pub fn text(&self) -> String {
        format!("{}: {} at {}", self.name, self.emotional_state, self.location)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusView {
    NotInitialized(String),
    Snapshot {
        status: String,
        interactions_count: u64,
        current_time: Option<String>,
        characters: Vec<CharacterStateLine>,
    },
}

/// Status panel content.
///
/// The `no_simulation` sentinel short-circuits before any id is looked up.
pub fn status_view(
    status: &SimulationStatus,
    characters: &[Character],
    locations: &[Location],
) -> StatusView {
    let snapshot = match status {
        SimulationStatus::NoSimulation => {
            return StatusView::NotInitialized(NOT_INITIALIZED.to_string())
        }
        SimulationStatus::Snapshot(snapshot) => snapshot,
    };

    let lines = snapshot
        .characters
        .iter()
        .map(|(id, state)| CharacterStateLine {
            name: characters
                .iter()
                .find(|character| &character.id == id)
                .map(|character| character.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            emotional_state: state.emotional_state.clone(),
            location: match state.location.as_deref().filter(|id| !id.is_empty()) {
                None => UNSET.to_string(),
                Some(location_id) => location_name(locations, location_id)
                    .unwrap_or(UNKNOWN)
                    .to_string(),
            },
            intensity: state.intensity,
        })
        .collect();

    StatusView::Snapshot {
        status: snapshot.status.clone(),
        interactions_count: snapshot.interactions_count,
        current_time: snapshot.current_time.as_deref().map(clock_label),
        characters: lines,
    }
}

fn location_name<'a>(locations: &'a [Location], id: &str) -> Option<&'a str> {
    locations
        .iter()
        .find(|location| location.id == id)
        .map(|location| location.name.as_str())
}

// =============================================================================
// Report and quality analysis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    /// Suggestion type, upper-cased
    pub title: String,
    pub high: bool,
    pub message: String,
    pub detail: String,
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCountView {
    pub word: String,
    pub count: u64,
}

impl WordCountView {
    pub fn text(&self) -> String {
        format!("{}: used {} times", self.word, self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityView {
    pub suggestions: Vec<SuggestionView>,
    /// Shown instead of an empty suggestion list
    pub all_clear: Option<String>,
    pub overused_words: Vec<WordCountView>,
}

pub fn quality_view(analysis: &QualityAnalysis) -> QualityView {
    QualityView {
        suggestions: analysis
            .suggestions
            .iter()
            .map(|suggestion| SuggestionView {
                title: suggestion.kind.to_uppercase(),
                high: suggestion.severity.is_high(),
                message: suggestion.message.clone(),
                detail: suggestion.detail.clone(),
                action: suggestion.action.clone().filter(|action| !action.is_empty()),
            })
            .collect(),
        all_clear: analysis
            .suggestions
            .is_empty()
            .then(|| QUALITY_ALL_CLEAR.to_string()),
        overused_words: analysis
            .overused_words
            .iter()
            .map(|(word, count)| WordCountView {
                word: word.clone(),
                count: *count,
            })
            .collect(),
    }
}

/// The shared report container: emergence report or quality analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportView {
    Placeholder(String),
    /// Preformatted text, shown as-is
    Report(String),
    Quality(QualityView),
}

// =============================================================================
// Paintable moments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentView {
    /// 1-based position
    pub number: usize,
    pub time: String,
    pub location: String,
    pub composition: String,
    pub color: String,
    pub gesture: String,
    pub painting_prompt: String,
    pub image_prompt: String,
    pub why_paintable: String,
}

impl MomentView {
    /// `Moment n [time] - location`
    pub fn header(&self) -> String {
        format!("Moment {} [{}] - {}", self.number, self.time, self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MomentsView {
    Placeholder(String),
    Moments(Vec<MomentView>),
}

pub fn moments_view(moments: &[PaintableMoment]) -> MomentsView {
    if moments.is_empty() {
        return MomentsView::Placeholder(NO_MOMENTS.to_string());
    }

    MomentsView::Moments(
        moments
            .iter()
            .enumerate()
            .map(|(index, moment)| MomentView {
                number: index + 1,
                time: clock_label(&moment.timestamp),
                location: moment.location.clone(),
                composition: moment.composition.clone(),
                color: moment.color_notes.clone(),
                gesture: moment.gesture_notes.clone(),
                painting_prompt: moment.painting_prompt.clone(),
                image_prompt: moment.image_gen_prompt.clone(),
                why_paintable: moment.why_paintable.clone(),
            })
            .collect(),
    )
}

// =============================================================================
// Diorama
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureView {
    /// First name only
    pub label: String,
    pub full_name: String,
    pub emotional_state: String,
    /// Lower-cased emotional state, used for styling
    pub emotion: String,
    /// Horizontal position on the stage
    pub slot: u16,
    pub animal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageView {
    pub location_id: String,
    pub name: String,
    /// `time_of_day · weather`
    pub meta: String,
    pub neon: char,
    pub figures: Vec<FigureView>,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DioramaView {
    pub stages: Vec<StageView>,
    pub active_index: usize,
    pub auto_scroll: bool,
    pub clock: String,
}

/// Neon sign glyph for a location id
pub fn neon_glyph(location_id: &str) -> char {
    match location_id {
        "loc_courtyard" => '◆',
        "loc_bonfire" => '◈',
        "loc_patterned" => '◉',
        "loc_parade" => '◊',
        "loc_stable" => '⬡',
        "loc_desert" => '✦',
        "loc_rooftop" => '▲',
        "loc_crossroads" => '✕',
        "loc_water" => '≋',
        "loc_canyon" => '◢',
        "loc_workshop" => '⚙',
        "loc_burial" => '✝',
        _ => DEFAULT_NEON,
    }
}

fn figure_view(character: &Character, index: usize) -> FigureView {
    FigureView {
        label: character.first_name().to_string(),
        full_name: character.name.clone(),
        emotional_state: character.emotional_state.clone(),
        emotion: character.emotional_state.to_lowercase(),
        slot: FIGURE_SLOTS[index % FIGURE_SLOTS.len()],
        animal: character.animal_label(),
    }
}

/// One stage per location, in map order
pub fn diorama_view(
    locations: &[Location],
    active_index: usize,
    auto_scroll: bool,
    clock: String,
) -> DioramaView {
    let stages = locations
        .iter()
        .enumerate()
        .map(|(index, location)| StageView {
            location_id: location.id.clone(),
            name: location.name.clone(),
            meta: format!("{} · {}", location.time_of_day, location.weather),
            neon: neon_glyph(&location.id),
            figures: location
                .characters
                .iter()
                .enumerate()
                .map(|(slot, character)| figure_view(character, slot))
                .collect(),
            active: index == active_index,
        })
        .collect();

    DioramaView {
        stages,
        active_index,
        auto_scroll,
        clock,
    }
}

/// First location holding the most characters; `None` when every stage is empty
pub fn follow_target(locations: &[Location]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, location) in locations.iter().enumerate() {
        let count = location.characters.len();
        if count > best.map_or(0, |(_, most)| most) {
            best = Some((index, count));
        }
    }
    best.map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageDirection {
    Prev,
    Next,
}

/// Move one stage, clamped to `0..len`
pub fn step_stage(current: usize, len: usize, direction: StageDirection) -> usize {
    match direction {
        StageDirection::Prev => current.saturating_sub(1),
        StageDirection::Next => (current + 1).min(len.saturating_sub(1)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetailView {
    pub name: String,
    pub emotional_state: String,
    pub animal: String,
    pub location: String,
}

/// Overlay content for a character standing on a stage
pub fn character_detail(character: &Character, locations: &[Location]) -> CharacterDetailView {
    CharacterDetailView {
        name: character.name.clone(),
        emotional_state: character.emotional_state.clone(),
        animal: character
            .animal_label()
            .unwrap_or_else(|| UNSET.to_string()),
        location: character
            .location_id()
            .and_then(|id| location_name(locations, id))
            .unwrap_or(UNKNOWN)
            .to_string(),
    }
}

// =============================================================================
// Downloads
// =============================================================================

const RULE_WIDTH: usize = 60;

/// Plain-text rendering of paintable moments for download
pub fn moments_file(moments: &[PaintableMoment], generated_at: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut content = format!("PAINTABLE MOMENTS - {generated_at}\n\n{rule}\n\n");

    for (index, moment) in moments.iter().enumerate() {
        let sections = [
            ("COMPOSITION", &moment.composition),
            ("COLOR", &moment.color_notes),
            ("KEY GESTURE", &moment.gesture_notes),
            ("FOR YOU (PAINTER)", &moment.painting_prompt),
            ("FOR IMAGE GENERATION", &moment.image_gen_prompt),
            ("WHY PAINTABLE", &moment.why_paintable),
            ("ORIGINAL FIELD NOTE", &moment.original_field_note),
        ];

        content.push_str(&format!(
            "MOMENT {} [{}] - {}\n\n",
            index + 1,
            clock_label(&moment.timestamp),
            moment.location
        ));
        for (title, body) in sections {
            content.push_str(&format!("{title}:\n{body}\n\n"));
        }
        content.push_str(&rule);
        content.push_str("\n\n");
    }

    content
}

/// Training dataset pretty-printed with two-space indentation
pub fn dataset_file(dataset: &serde_json::Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dataset)
}
