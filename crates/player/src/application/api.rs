//! Contract client
//!
//! One typed function per backend endpoint. Envelope checking and
//! deserialization happen here and nowhere else; callers see either the
//! payload or a `ServiceError`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use autoworld_shared::{
    routes, Character, Interaction, Location, LoraExportResponse, MapViewResponse,
    MomentsResponse, PaintableRequest, QualityResponse, ReportResponse, ResetResponse,
    ResponseStatus, RunResponse, RunSimulationRequest, SaveResponse, SaveSessionRequest,
    SeedResponse, SeedScenarioRequest, SimulationStatus,
};

use crate::application::ServiceError;
use crate::ports::outbound::{ApiError, RawApiPort};

#[derive(Clone)]
pub struct Api {
    port: Arc<dyn RawApiPort>,
}

impl Api {
    pub fn new(port: Arc<dyn RawApiPort>) -> Self {
        Self { port }
    }

    /// All characters (bare array)
    pub async fn characters(&self) -> Result<Vec<Character>, ServiceError> {
        bare(self.port.get_json(routes::CHARACTERS).await?)
    }

    /// All locations (bare array)
    pub async fn locations(&self) -> Result<Vec<Location>, ServiceError> {
        bare(self.port.get_json(routes::LOCATIONS).await?)
    }

    pub async fn seed_scenario(
        &self,
        request: &SeedScenarioRequest,
    ) -> Result<SeedResponse, ServiceError> {
        let body = to_body(request)?;
        enveloped(self.port.post_json(routes::SCENARIO_SEED, &body).await?)
    }

    pub async fn run_simulation(&self, duration_minutes: u32) -> Result<RunResponse, ServiceError> {
        let body = to_body(&RunSimulationRequest { duration_minutes })?;
        enveloped(self.port.post_json(routes::SIMULATION_RUN, &body).await?)
    }

    /// Simulation status; not enveloped, `no_simulation` is a valid answer
    pub async fn status(&self) -> Result<SimulationStatus, ServiceError> {
        bare(self.port.get_json(routes::SIMULATION_STATUS).await?)
    }

    pub async fn emergence_report(&self) -> Result<ReportResponse, ServiceError> {
        enveloped(self.port.get_json(routes::EMERGENCE_REPORT).await?)
    }

    pub async fn save_session(&self, name: &str) -> Result<SaveResponse, ServiceError> {
        let body = to_body(&SaveSessionRequest {
            name: name.to_string(),
        })?;
        enveloped(self.port.post_json(routes::SESSION_SAVE, &body).await?)
    }

    pub async fn reset(&self) -> Result<ResetResponse, ServiceError> {
        enveloped(self.port.post_empty(routes::RESET).await?)
    }

    pub async fn extract_paintable(&self, use_llm: bool) -> Result<MomentsResponse, ServiceError> {
        let body = to_body(&PaintableRequest::new(use_llm))?;
        enveloped(self.port.post_json(routes::PAINTABLE_EXTRACT, &body).await?)
    }

    pub async fn analyze_quality(&self) -> Result<QualityResponse, ServiceError> {
        enveloped(self.port.get_json(routes::QUALITY_ANALYZE).await?)
    }

    pub async fn export_lora(&self, use_llm: bool) -> Result<LoraExportResponse, ServiceError> {
        let body = to_body(&PaintableRequest::new(use_llm))?;
        enveloped(self.port.post_json(routes::PAINTABLE_EXPORT_LORA, &body).await?)
    }

    pub async fn map_view(&self) -> Result<MapViewResponse, ServiceError> {
        enveloped(self.port.get_json(routes::MAP_VIEW).await?)
    }

    /// Most recent field notes (bare array)
    pub async fn recent_interactions(&self, count: u32) -> Result<Vec<Interaction>, ServiceError> {
        bare(
            self.port
                .get_json(&routes::recent_interactions(count))
                .await?,
        )
    }
}

fn to_body<T: serde::Serialize>(request: &T) -> Result<Value, ServiceError> {
    serde_json::to_value(request).map_err(|e| ApiError::Serialize(e.to_string()).into())
}

fn bare<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string()).into())
}

fn enveloped<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    if !value.is_object() {
        return Err(ApiError::InvalidBody("expected a JSON object".to_string()).into());
    }

    let envelope = ResponseStatus::deserialize(&value)
        .map_err(|e| ServiceError::from(ApiError::InvalidBody(e.to_string())))?;
    if !envelope.is_success() {
        tracing::warn!(status = %envelope.status, "Backend rejected request");
        return Err(ServiceError::rejected(envelope.message));
    }

    bare(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{rejected, success};
    use crate::ports::outbound::MockRawApiPort;
    use serde_json::json;

    fn api(mock: MockRawApiPort) -> Api {
        Api::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn run_posts_duration_and_parses_payload() {
        let mut mock = MockRawApiPort::new();
        mock.expect_post_json()
            .withf(|path, body| {
                path == routes::SIMULATION_RUN && *body == json!({"duration_minutes": 10})
            })
            .times(1)
            .returning(|_, _| {
                Ok(success(json!({
                    "interactions": [],
                    "interactions_count": 0,
                    "message": "Ran 10 minutes"
                })))
            });

        let response = api(mock).run_simulation(10).await.unwrap();
        assert_eq!(response.interactions_count, 0);
        assert!(response.interactions.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_rejection_with_server_message() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json()
            .returning(|_| Ok(rejected("No simulation to report on")));

        let err = api(mock).emergence_report().await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Rejected {
                message: "No simulation to report on".to_string()
            }
        );
    }

    #[tokio::test]
    async fn status_sentinel_is_not_an_error() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json()
            .withf(|path| path == routes::SIMULATION_STATUS)
            .returning(|_| Ok(json!({"status": "no_simulation"})));

        assert_eq!(
            api(mock).status().await.unwrap(),
            SimulationStatus::NoSimulation
        );
    }

    #[tokio::test]
    async fn malformed_payload_is_transport_error() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json()
            .returning(|_| Ok(json!({"status": "success", "locations": "not a list"})));

        let err = api(mock).map_view().await.unwrap_err();
        assert!(matches!(err, ServiceError::Transport(ApiError::InvalidBody(_))));
    }

    #[tokio::test]
    async fn network_failure_propagates_as_transport() {
        let mut mock = MockRawApiPort::new();
        mock.expect_post_empty()
            .withf(|path| path == routes::RESET)
            .returning(|_| Err(ApiError::Network("connection refused".to_string())));

        let err = api(mock).reset().await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Transport(ApiError::Network("connection refused".to_string()))
        );
    }

    #[tokio::test]
    async fn recent_interactions_carry_count_in_query() {
        let mut mock = MockRawApiPort::new();
        mock.expect_get_json()
            .withf(|path| path == "/api/interactions/recent?count=3")
            .returning(|_| Ok(json!([])));

        assert!(api(mock).recent_interactions(3).await.unwrap().is_empty());
    }
}
