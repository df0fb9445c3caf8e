//! End-to-end contract tests against a fake backend served on an ephemeral port.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

use autoworld_player::infrastructure::platform::mock::MockPlatform;
use autoworld_player::infrastructure::HttpApiAdapter;
use autoworld_player::presentation::{Notice, ViewUpdate};
use autoworld_player::{ActionOutcome, Api, UiController};
use autoworld_shared::ScenarioConfig;

#[derive(Default)]
struct World {
    placements: Option<Value>,
    interactions: Vec<Value>,
}

type SharedWorld = Arc<Mutex<World>>;

type Reply = (StatusCode, Json<Value>);

fn fail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({"status": "error", "message": message})))
}

async fn characters() -> Json<Value> {
    Json(json!([
        {"id": "charA", "name": "Ana Reyes", "emotional_state": "curious", "current_location": ""}
    ]))
}

async fn locations() -> Json<Value> {
    Json(json!([
        {"id": "locX", "name": "Courtyard", "current_time": "dusk", "current_weather": "clear"}
    ]))
}

async fn seed(State(world): State<SharedWorld>, Json(body): Json<Value>) -> Reply {
    let placements = body["placements"].clone();
    if placements.as_object().map_or(true, |p| p.is_empty()) {
        return fail(StatusCode::BAD_REQUEST, "No placements given");
    }
    if body["config"]["time_compression"] != json!(60) {
        return fail(StatusCode::BAD_REQUEST, "Unexpected time compression");
    }
    let mut world = world.lock().unwrap();
    world.placements = Some(placements);
    world.interactions.clear();
    (
        StatusCode::OK,
        Json(json!({"status": "success", "message": "Scenario seeded with 1 characters"})),
    )
}

async fn run(State(world): State<SharedWorld>, Json(body): Json<Value>) -> Reply {
    let mut world = world.lock().unwrap();
    if world.placements.is_none() {
        return fail(StatusCode::BAD_REQUEST, "No simulation initialized");
    }
    let minutes = body["duration_minutes"].as_u64().unwrap_or(60);
    let new: Vec<Value> = (0..minutes / 5)
        .map(|n| {
            json!({
                "timestamp": format!("2024-05-01T18:{:02}:00", n * 5),
                "location_name": "Courtyard",
                "time_of_day": "dusk",
                "action_description": "Ana traces the fountain rim",
                "material_details": "Moss under a fingernail",
                "emotional_temperature": "tender",
                "is_unexpected": n == 0
            })
        })
        .collect();
    world.interactions.extend(new.iter().cloned());
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "interactions": new,
            "interactions_count": world.interactions.len()
        })),
    )
}

async fn status(State(world): State<SharedWorld>) -> Json<Value> {
    let world = world.lock().unwrap();
    match &world.placements {
        None => Json(json!({"status": "no_simulation"})),
        Some(_) => Json(json!({
            "status": "paused",
            "interactions_count": world.interactions.len(),
            "characters": {"charA": {"emotional_state": "curious", "location": "locX"}}
        })),
    }
}

async fn extract(State(world): State<SharedWorld>, Json(body): Json<Value>) -> Reply {
    let world = world.lock().unwrap();
    let top_n = body["top_n"].as_u64().unwrap_or(5) as usize;
    let moments: Vec<Value> = world
        .interactions
        .iter()
        .take(top_n)
        .map(|interaction| {
            json!({
                "timestamp": interaction["timestamp"],
                "location": "Courtyard",
                "painting_prompt": "Paint the hand on stone"
            })
        })
        .collect();
    (
        StatusCode::OK,
        Json(json!({"status": "success", "moments": moments, "count": moments.len()})),
    )
}

async fn broken_report() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn spawn_backend() -> Url {
    let world = SharedWorld::default();
    let app = Router::new()
        .route("/api/characters", get(characters))
        .route("/api/locations", get(locations))
        .route("/api/scenario/seed", post(seed))
        .route("/api/simulation/run", post(run))
        .route("/api/simulation/status", get(status))
        .route("/api/paintable/extract", post(extract))
        .route("/api/emergence/report", get(broken_report))
        .with_state(world);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn connect() -> (UiController, UnboundedReceiver<ViewUpdate>, MockPlatform) {
    let base = spawn_backend().await;
    let adapter = HttpApiAdapter::new(base, Duration::from_secs(5));
    let platform = MockPlatform::new(1_714_586_700_000);
    let (controller, receiver) =
        UiController::create(Api::new(Arc::new(adapter)), platform.platform());
    (controller, receiver, platform)
}

fn notices(receiver: &mut UnboundedReceiver<ViewUpdate>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(update) = receiver.try_recv() {
        if let ViewUpdate::Notice(notice) = update {
            notices.push(notice);
        }
    }
    notices
}

#[tokio::test]
async fn seed_run_extract_round_trip() {
    let (controller, mut receiver, _) = connect().await;

    assert_eq!(controller.bootstrap().await, ActionOutcome::Completed);
    assert_eq!(controller.view_state().await.characters.len(), 1);
    assert_eq!(
        controller.select_placement("charA", Some("locX")).await,
        ActionOutcome::Completed
    );

    assert_eq!(
        controller
            .seed_scenario(ScenarioConfig::default(), false)
            .await,
        ActionOutcome::Completed
    );
    assert_eq!(controller.run_simulation(10).await, ActionOutcome::Completed);
    assert!(controller.is_run_enabled());
    assert!(notices(&mut receiver)
        .contains(&Notice::info("Simulation complete. 2 interactions generated.")));

    assert_eq!(
        controller.extract_paintable_moments(false, false).await,
        ActionOutcome::Completed
    );
    let moments = controller.view_state().await.last_moments;
    assert!(moments.len() <= 5);
    assert_eq!(moments.len(), 2);
}

#[tokio::test]
async fn run_before_seed_surfaces_backend_message() {
    let (controller, mut receiver, _) = connect().await;

    assert_eq!(controller.run_simulation(10).await, ActionOutcome::Rejected);
    assert!(controller.is_run_enabled());
    assert_eq!(
        notices(&mut receiver),
        vec![Notice::error(
            "Error running simulation: No simulation initialized"
        )]
    );
}

#[tokio::test]
async fn non_json_failure_is_a_transport_error() {
    let (controller, mut receiver, _) = connect().await;

    assert_eq!(
        controller.load_emergence_report().await,
        ActionOutcome::Failed
    );
    assert_eq!(
        notices(&mut receiver),
        vec![Notice::error(
            "Error loading emergence report. Make sure a simulation has been run."
        )]
    );
}
