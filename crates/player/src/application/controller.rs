//! UI Controller
//!
//! Owns the view state and turns user actions into backend calls, and
//! backend answers into `ViewUpdate`s on the view bus. Every operation
//! returns an `ActionOutcome`; none of them retries.
//!
//! Lifecycle: `create` -> operations (and pollers) -> `teardown`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;

use autoworld_shared::{Character, ScenarioConfig, SeedScenarioRequest, TIME_COMPRESSION};

use crate::application::poller::{spawn_poller, PollHandle};
use crate::application::{Api, RunControl, ServiceError, ViewBus, ViewState};
use crate::presentation::format::{
    clock_label_at, datetime_label_at, default_session_name, download_filename, StampSequence,
};
use crate::presentation::view_models::{
    character_detail, dataset_file, diorama_view, field_notes_view, follow_target, moments_file,
    moments_view, placement_panel, quality_view, status_view, step_stage, DioramaView,
    FieldNotesView, MomentsView, ReportView, FIELD_NOTES_PLACEHOLDER, MOMENTS_PLACEHOLDER,
    REPORT_PLACEHOLDER,
};
use crate::presentation::{Notice, StageDirection, ViewUpdate};
use crate::state::Platform;

const CHECK_LOG: &str = "Check the log for details.";
const RUN_FIRST: &str = "Make sure a simulation has been run.";

/// How a user action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Refused locally; nothing was sent
    Refused,
    /// The user backed out of a dialog
    Cancelled,
    /// The backend answered with a non-success status
    Rejected,
    /// Transport or local I/O failure
    Failed,
}

impl ActionOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, ActionOutcome::Rejected | ActionOutcome::Failed)
    }
}

#[derive(Clone)]
pub struct UiController {
    api: Api,
    platform: Platform,
    state: Arc<RwLock<ViewState>>,
    run_control: RunControl,
    bus: ViewBus,
    pollers: Arc<Mutex<Vec<PollHandle>>>,
    stamps: Arc<StampSequence>,
}

impl UiController {
    /// Create a controller and the receiving end of its view bus
    pub fn create(api: Api, platform: Platform) -> (Self, UnboundedReceiver<ViewUpdate>) {
        let (bus, receiver) = ViewBus::channel();
        let controller = Self {
            api,
            platform,
            state: Arc::new(RwLock::new(ViewState::default())),
            run_control: RunControl::new(bus.clone()),
            bus,
            pollers: Arc::new(Mutex::new(Vec::new())),
            stamps: Arc::new(StampSequence::default()),
        };
        (controller, receiver)
    }

    /// Copy of the current view state
    pub async fn view_state(&self) -> ViewState {
        self.state.read().await.clone()
    }

    pub fn is_run_enabled(&self) -> bool {
        self.run_control.is_enabled()
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    /// Load characters and locations, build the placement panel, show status.
    ///
    /// A failed fetch leaves that list empty; the panel degrades instead of
    /// failing the whole bootstrap.
    pub async fn bootstrap(&self) -> ActionOutcome {
        let characters = match self.api.characters().await {
            Ok(characters) => {
                tracing::info!(count = characters.len(), "Loaded characters");
                characters
            }
            Err(e) => {
                tracing::error!("Error loading characters: {}", e);
                Vec::new()
            }
        };
        let locations = match self.api.locations().await {
            Ok(locations) => {
                tracing::info!(count = locations.len(), "Loaded locations");
                locations
            }
            Err(e) => {
                tracing::error!("Error loading locations: {}", e);
                Vec::new()
            }
        };

        {
            let mut state = self.state.write().await;
            state.load_reference(characters, locations);
            self.publish_placements(&state);
        }

        self.refresh_status().await;
        ActionOutcome::Completed
    }

    pub async fn select_placement(
        &self,
        character_id: &str,
        location_id: Option<&str>,
    ) -> ActionOutcome {
        let mut state = self.state.write().await;
        match state.placements.select(character_id, location_id) {
            Ok(()) => {
                self.publish_placements(&state);
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::warn!("Placement refused: {}", e);
                self.bus.notify(Notice::error(e.to_string()));
                ActionOutcome::Refused
            }
        }
    }

    fn publish_placements(&self, state: &ViewState) {
        self.bus.publish(ViewUpdate::Placements(placement_panel(
            &state.characters,
            &state.locations,
            &state.placements.collect(),
        )));
    }

    // -------------------------------------------------------------------------
    // Simulation
    // -------------------------------------------------------------------------

    /// Seed from the current placements. Refuses without a request when
    /// nobody is placed. `time_compression` is always the fixed constant.
    pub async fn seed_scenario(&self, config: ScenarioConfig, use_llm: bool) -> ActionOutcome {
        let placements = self.state.read().await.placements.collect();
        if placements.is_empty() {
            self.bus.notify(Notice::error(
                "Please place at least one character before seeding.",
            ));
            return ActionOutcome::Refused;
        }

        let request = SeedScenarioRequest {
            placements,
            config: ScenarioConfig {
                time_compression: TIME_COMPRESSION,
                ..config
            },
            use_llm,
        };

        match self.api.seed_scenario(&request).await {
            Ok(response) => {
                self.refresh_status().await;
                self.bus.notify(Notice::info(response.message));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "seeding scenario", CHECK_LOG),
        }
    }

    /// Run for `duration_minutes`. The trigger is disabled for the duration
    /// of the call and re-enabled however it ends.
    pub async fn run_simulation(&self, duration_minutes: u32) -> ActionOutcome {
        let Some(_run) = self.run_control.begin() else {
            self.bus
                .notify(Notice::error("A simulation run is already in progress."));
            return ActionOutcome::Refused;
        };

        match self.api.run_simulation(duration_minutes).await {
            Ok(response) => {
                self.bus
                    .publish(ViewUpdate::FieldNotes(field_notes_view(&response.interactions)));
                self.refresh_status().await;
                self.bus.notify(Notice::info(format!(
                    "Simulation complete. {} interactions generated.",
                    response.interactions_count
                )));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "running simulation", CHECK_LOG),
        }
    }

    /// Fetch and render status. Failures are logged only.
    pub async fn refresh_status(&self) -> ActionOutcome {
        match self.api.status().await {
            Ok(status) => {
                let state = self.state.read().await;
                self.bus.publish(ViewUpdate::Status(status_view(
                    &status,
                    &state.characters,
                    &state.locations,
                )));
                ActionOutcome::Completed
            }
            Err(e) => {
                tracing::error!("Error updating status: {}", e);
                ActionOutcome::Failed
            }
        }
    }

    pub async fn load_emergence_report(&self) -> ActionOutcome {
        match self.api.emergence_report().await {
            Ok(response) => {
                self.bus
                    .publish(ViewUpdate::Report(ReportView::Report(response.report)));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "loading emergence report", RUN_FIRST),
        }
    }

    /// Most recent `count` field notes
    pub async fn load_recent(&self, count: u32) -> ActionOutcome {
        match self.api.recent_interactions(count).await {
            Ok(notes) => {
                self.bus
                    .publish(ViewUpdate::FieldNotes(field_notes_view(&notes)));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "loading field notes", CHECK_LOG),
        }
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Ask for a name (default `session_{millis}`) and save under it
    pub async fn save_session(&self) -> ActionOutcome {
        let default_name = default_session_name(self.platform.now_millis());
        let Some(name) = self
            .platform
            .prompt("Enter session name:", &default_name)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
        else {
            tracing::debug!("Session save cancelled");
            return ActionOutcome::Cancelled;
        };

        match self.api.save_session(&name).await {
            Ok(response) => {
                if let Some(path) = &response.filepath {
                    tracing::info!("Session saved to {}", path);
                }
                self.bus.notify(Notice::info(response.message));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "saving session", CHECK_LOG),
        }
    }

    /// Confirm, reset the backend, put every derived panel back to its placeholder
    pub async fn reset(&self) -> ActionOutcome {
        if !self
            .platform
            .confirm("Reset simulation? This will clear all current data.")
        {
            return ActionOutcome::Cancelled;
        }

        match self.api.reset().await {
            Ok(_) => {
                self.state.write().await.clear_derived();
                self.bus.publish(ViewUpdate::FieldNotes(FieldNotesView::Placeholder(
                    FIELD_NOTES_PLACEHOLDER.to_string(),
                )));
                self.bus.publish(ViewUpdate::Report(ReportView::Placeholder(
                    REPORT_PLACEHOLDER.to_string(),
                )));
                self.bus.publish(ViewUpdate::Moments(MomentsView::Placeholder(
                    MOMENTS_PLACEHOLDER.to_string(),
                )));
                self.bus.publish(ViewUpdate::Overlay(None));
                self.refresh_status().await;
                self.bus.notify(Notice::info("Simulation reset successfully."));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "resetting simulation", CHECK_LOG),
        }
    }

    // -------------------------------------------------------------------------
    // Paintable moments, quality, export
    // -------------------------------------------------------------------------

    /// Extract the top moments; optionally follow up with quality analysis
    pub async fn extract_paintable_moments(
        &self,
        use_llm: bool,
        with_quality: bool,
    ) -> ActionOutcome {
        match self.api.extract_paintable(use_llm).await {
            Ok(response) => {
                self.bus
                    .publish(ViewUpdate::Moments(moments_view(&response.moments)));
                self.bus.notify(Notice::info(format!(
                    "Extracted {} moments",
                    response.count
                )));
                self.state.write().await.last_moments = response.moments;

                if with_quality {
                    self.analyze_quality().await;
                }
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "extracting moments", RUN_FIRST),
        }
    }

    pub async fn analyze_quality(&self) -> ActionOutcome {
        match self.api.analyze_quality().await {
            Ok(response) => {
                self.bus.publish(ViewUpdate::Report(ReportView::Quality(
                    quality_view(&response.analysis),
                )));
                ActionOutcome::Completed
            }
            Err(e) => self.fail(&e, "analyzing quality", CHECK_LOG),
        }
    }

    /// Export the training dataset and save it as one timestamped JSON file
    pub async fn export_dataset(&self, use_llm: bool) -> ActionOutcome {
        let response = match self.api.export_lora(use_llm).await {
            Ok(response) => response,
            Err(e) => return self.fail(&e, "exporting dataset", RUN_FIRST),
        };

        let contents = match dataset_file(&response.dataset) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!("Failed to format dataset: {}", e);
                self.bus
                    .notify(Notice::error(format!("Error exporting dataset. {CHECK_LOG}")));
                return ActionOutcome::Failed;
            }
        };

        match self.deliver("lora-dataset", "json", &contents) {
            Some(path) => {
                self.bus.notify(Notice::info(format!(
                    "Exported {} moments for Lora to {}",
                    response.count,
                    path.display()
                )));
                ActionOutcome::Completed
            }
            None => ActionOutcome::Failed,
        }
    }

    /// Save the last extracted moments as a text file
    pub async fn download_moments(&self) -> ActionOutcome {
        let moments = self.state.read().await.last_moments.clone();
        if moments.is_empty() {
            self.bus.notify(Notice::error(
                "No paintable moments to download. Extract moments first.",
            ));
            return ActionOutcome::Refused;
        }

        let contents = moments_file(&moments, &datetime_label_at(self.platform.now_millis()));
        match self.deliver("paintable-moments", "txt", &contents) {
            Some(path) => {
                self.bus.notify(Notice::info(format!(
                    "Saved {} paintable moments to {}",
                    moments.len(),
                    path.display()
                )));
                ActionOutcome::Completed
            }
            None => ActionOutcome::Failed,
        }
    }

    fn deliver(&self, prefix: &str, extension: &str, contents: &str) -> Option<PathBuf> {
        let stamp = self.stamps.next(self.platform.now_millis());
        let filename = download_filename(prefix, stamp, extension);
        match self.platform.save_download(&filename, contents) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("Download failed: {}", e);
                self.bus.notify(Notice::error(format!("Error saving {filename}: {e}")));
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Diorama
    // -------------------------------------------------------------------------

    /// Poll the map once and re-render the stages. Failures are logged only.
    pub async fn refresh_map(&self) -> ActionOutcome {
        let response = match self.api.map_view().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Error loading map data: {}", e);
                return ActionOutcome::Failed;
            }
        };

        let mut state = self.state.write().await;
        state.load_map(response.locations);
        if state.auto_scroll_enabled {
            if let Some(target) = follow_target(&state.map_locations) {
                state.current_location_index = target;
            }
        }
        self.publish_diorama(&state);
        self.refresh_overlay(&mut state);
        ActionOutcome::Completed
    }

    /// Re-resolve the open overlay against fresh map data; a character that
    /// left the map closes it
    fn refresh_overlay(&self, state: &mut ViewState) {
        let Some(open) = state.overlay.take() else {
            return;
        };
        let current = state
            .map_locations
            .iter()
            .flat_map(|location| location.characters.iter())
            .find(|character| same_character(character, &open))
            .cloned();

        match current {
            Some(character) => {
                let detail = character_detail(&character, &state.map_locations);
                state.overlay = Some(character);
                self.bus.publish(ViewUpdate::Overlay(Some(detail)));
            }
            None => self.bus.publish(ViewUpdate::Overlay(None)),
        }
    }

    pub async fn navigate(&self, direction: StageDirection) -> ActionOutcome {
        let mut state = self.state.write().await;
        if state.map_locations.is_empty() {
            return ActionOutcome::Refused;
        }
        state.current_location_index = step_stage(
            state.current_location_index,
            state.map_locations.len(),
            direction,
        );
        self.publish_diorama(&state);
        ActionOutcome::Completed
    }

    /// Open the detail overlay for the `figure`-th character on the active stage
    pub async fn open_character(&self, figure: usize) -> ActionOutcome {
        let mut state = self.state.write().await;
        let Some(character) = state
            .map_locations
            .get(state.current_location_index)
            .and_then(|location| location.characters.get(figure))
            .cloned()
        else {
            return ActionOutcome::Refused;
        };

        let detail = character_detail(&character, &state.map_locations);
        state.overlay = Some(character);
        self.bus.publish(ViewUpdate::Overlay(Some(detail)));
        ActionOutcome::Completed
    }

    pub async fn close_overlay(&self) -> ActionOutcome {
        self.state.write().await.overlay = None;
        self.bus.publish(ViewUpdate::Overlay(None));
        ActionOutcome::Completed
    }

    /// Toggle following the busiest stage; enabling jumps there immediately
    pub async fn set_auto_scroll(&self, enabled: bool) -> ActionOutcome {
        let mut state = self.state.write().await;
        state.auto_scroll_enabled = enabled;
        if enabled {
            if let Some(target) = follow_target(&state.map_locations) {
                state.current_location_index = target;
            }
        }
        self.publish_diorama(&state);
        ActionOutcome::Completed
    }

    fn publish_diorama(&self, state: &ViewState) {
        self.bus.publish(ViewUpdate::Diorama(self.diorama(state)));
    }

    fn diorama(&self, state: &ViewState) -> DioramaView {
        diorama_view(
            &state.map_locations,
            state.current_location_index,
            state.auto_scroll_enabled,
            clock_label_at(self.platform.now_millis()),
        )
    }

    // -------------------------------------------------------------------------
    // Polling
    // -------------------------------------------------------------------------

    pub fn start_map_polling(&self, period: Duration) -> ActionOutcome {
        let controller = self.clone();
        self.register(spawn_poller("map", period, move || {
            let controller = controller.clone();
            async move {
                controller.refresh_map().await;
            }
        }));
        ActionOutcome::Completed
    }

    pub fn start_status_polling(&self, period: Duration) -> ActionOutcome {
        let controller = self.clone();
        self.register(spawn_poller("status", period, move || {
            let controller = controller.clone();
            async move {
                controller.refresh_status().await;
            }
        }));
        ActionOutcome::Completed
    }

    fn register(&self, handle: PollHandle) {
        self.pollers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }

    /// Number of pollers currently registered
    pub fn active_pollers(&self) -> usize {
        self.pollers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Cancel every poller. In-flight requests are not awaited.
    pub fn teardown(&self) {
        let handles: Vec<PollHandle> = self
            .pollers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for handle in &handles {
            tracing::debug!(poller = handle.name(), "Tearing down poller");
            handle.stop();
        }
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    fn fail(&self, err: &ServiceError, action: &str, hint: &str) -> ActionOutcome {
        match err {
            ServiceError::Rejected { .. } => tracing::warn!("Backend refused {}: {}", action, err),
            ServiceError::Transport(_) => tracing::error!("Error {}: {}", action, err),
        }
        self.bus.notify(Notice::error(err.user_message(action, hint)));

        if err.is_rejected() {
            ActionOutcome::Rejected
        } else {
            ActionOutcome::Failed
        }
    }
}

/// Map characters may omit ids; fall back to the name then
fn same_character(a: &Character, b: &Character) -> bool {
    if a.id.is_empty() || b.id.is_empty() {
        a.name == b.name
    } else {
        a.id == b.id
    }
}
