//! Autoworld Shared - Wire-format types for the simulation backend
//!
//! This crate contains every type that crosses the HTTP boundary between a
//! front-end and the simulation backend:
//! - Entities as transmitted (characters, locations, field notes, moments)
//! - Request bodies for the POST endpoints
//! - Response envelopes and the status sentinel
//! - Endpoint paths
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Opaque vocabularies** - backend-defined strings (densities, temperatures,
//!    severities) stay strings; the client never invents values

pub mod entities;
pub mod requests;
pub mod responses;
pub mod routes;

// =============================================================================
// Entities
// =============================================================================
pub use entities::{
    AnimalCompanion, Character, EmotionalTemperature, Interaction, Location, PaintableMoment,
    QualityAnalysis, QualitySuggestion, Severity,
};

// =============================================================================
// Requests
// =============================================================================
pub use requests::{
    InteractionDensity, PaintableRequest, RunSimulationRequest, SaveSessionRequest,
    ScenarioConfig, SeedScenarioRequest, PAINTABLE_TOP_N, TIME_COMPRESSION,
};

// =============================================================================
// Responses
// =============================================================================
pub use responses::{
    CharacterState, LoraExportResponse, MapViewResponse, MomentsResponse, QualityResponse,
    ReportResponse, ResetResponse, ResponseStatus, RunResponse, SaveResponse, SeedResponse,
    SimulationStatus, StatusSnapshot, NO_SIMULATION, SUCCESS,
};
