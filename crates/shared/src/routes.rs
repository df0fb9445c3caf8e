//! Endpoint paths exposed by the simulation backend.

pub const CHARACTERS: &str = "/api/characters";
pub const LOCATIONS: &str = "/api/locations";
pub const SCENARIO_SEED: &str = "/api/scenario/seed";
pub const SIMULATION_RUN: &str = "/api/simulation/run";
pub const SIMULATION_STATUS: &str = "/api/simulation/status";
pub const EMERGENCE_REPORT: &str = "/api/emergence/report";
pub const SESSION_SAVE: &str = "/api/session/save";
pub const RESET: &str = "/api/reset";
pub const PAINTABLE_EXTRACT: &str = "/api/paintable/extract";
pub const QUALITY_ANALYZE: &str = "/api/quality/analyze";
pub const PAINTABLE_EXPORT_LORA: &str = "/api/paintable/export-lora";
pub const MAP_VIEW: &str = "/api/map/view";
pub const INTERACTIONS_RECENT: &str = "/api/interactions/recent";

/// Path for the most recent `count` field notes.
pub fn recent_interactions(count: u32) -> String {
    format!("{INTERACTIONS_RECENT}?count={count}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_interactions_carries_count_query() {
        assert_eq!(recent_interactions(10), "/api/interactions/recent?count=10");
    }
}
