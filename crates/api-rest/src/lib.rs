//! # API REST
//!
//! REST API implementation for the referral guide.
//!
//! Handles:
//! - HTTP endpoints with axum (`/api/conditions`, `/api/body-areas`, `/health`)
//! - OpenAPI/Swagger documentation, mounted only when developer tools are enabled
//! - REST-specific concerns (JSON envelopes, CORS, request tracing)
//!
//! Query logic lives in `referral-core`; this crate only adapts it to HTTP.

#![warn(rust_2018_idioms)]

pub mod error;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ApiResponse, ConditionItem, ConditionsParams, ConditionsResponse, HealthRes, HealthService,
    PanelsResponse, ProcedureItem, ResultsResponse, ScenarioItem, ScenariosResponse,
};
use referral_core::{ConditionsQuery, ConditionsService, CoreConfig, QueryOutput, RecordStore};

pub use error::ApiError;

/// Application state shared across REST API handlers.
///
/// Holds only the query service; the service itself shares one store across requests, so
/// handlers never touch mutable state.
#[derive(Clone)]
pub struct AppState {
    conditions: Arc<ConditionsService>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            conditions: Arc::new(ConditionsService::new(store)),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, conditions, body_areas),
    components(schemas(
        HealthRes,
        ConditionItem,
        ScenarioItem,
        ProcedureItem,
        PanelsResponse,
        ConditionsResponse,
        ScenariosResponse,
        ResultsResponse,
    ))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// `dev_tools` mounts the Swagger UI at `/swagger-ui` and the OpenAPI document at
/// `/api-docs/openapi.json`.
pub fn router(state: AppState, dev_tools: bool) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api/conditions", get(conditions))
        .route("/api/body-areas", get(body_areas));

    if dev_tools {
        tracing::info!("-- developer tools enabled: /swagger-ui");
        app = app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the router on `addr` until Ctrl-C or SIGTERM, then shut the store down.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the address cannot be bound, or the HTTP
/// server fails while running.
pub async fn serve(cfg: CoreConfig, addr: &str) -> anyhow::Result<()> {
    tracing::info!("-- Using {}", cfg.store_label());
    let store = referral_core::open_store(&cfg).await?;
    let app = router(AppState::new(store.clone()), cfg.dev_tools());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await;
    tracing::info!("-- Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the service. Does not touch the database.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/conditions",
    params(ConditionsParams),
    responses(
        (status = 200, description = "Panels (strings), conditions, scenarios or scored procedures, depending on `type`", body = ResultsResponse),
        (status = 400, description = "Missing or invalid parameter, or database error")
    )
)]
/// Query the clinical collection.
///
/// The shape of `data` depends on `type`:
/// - `panels`: sorted distinct panel names
/// - `conditions`: `{condition, severity}` deduplicated by name
/// - `scenarios`: `{scenario_id, scenario_description, _id}` deduplicated by scenario
/// - `results`: `{name, appropriate, score, radiationString}` for one scenario
/// - absent: every record matching the body area and age group
///
/// # Errors
/// Returns `400 Bad Request` with the error envelope if:
/// - the query string cannot be decoded (for example a repeated parameter),
/// - `type` or `ageGroup` holds an unsupported value,
/// - `type=results` has no `scenarioId`,
/// - the database query fails.
#[axum::debug_handler]
async fn conditions(
    State(state): State<AppState>,
    params: Result<Query<ConditionsParams>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryOutput>>, ApiError> {
    let Query(params) = params?;
    tracing::info!(
        kind = params.kind.as_deref().unwrap_or(""),
        age_group = params.age_group.as_deref().unwrap_or(""),
        body_area = params.body_area.as_deref().unwrap_or(""),
        panel = params.panel.as_deref().unwrap_or(""),
        condition = params.condition.as_deref().unwrap_or(""),
        scenario_id = params.scenario_id.as_deref().unwrap_or(""),
        "conditions request"
    );

    let query = ConditionsQuery::try_from(params)?;
    let output = state.conditions.run(&query).await?;
    Ok(Json(ApiResponse::ok(output)))
}

#[utoipa::path(
    get,
    path = "/api/body-areas",
    responses(
        (status = 200, description = "Distinct body areas", body = PanelsResponse),
        (status = 400, description = "Database error")
    )
)]
/// List the distinct body areas present in the collection.
#[axum::debug_handler]
async fn body_areas(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let areas = state.conditions.body_areas().await?;
    Ok(Json(ApiResponse::ok(areas)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use failing::FailingStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use referral_core::MemoryRecordStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    mod failing {
        use referral_core::{ClinicalRecord, RecordStore, StoreError, StoreResult};

        /// Store whose every read fails, standing in for an unreachable database.
        pub struct FailingStore;

        fn fail<T>() -> StoreResult<T> {
            Err(StoreError::FixtureShape)
        }

        #[async_trait::async_trait]
        impl RecordStore for FailingStore {
            async fn find_by_body_area(&self, _: Option<&str>) -> StoreResult<Vec<ClinicalRecord>> {
                fail()
            }

            async fn find_by_scenario_id(&self, _: &str) -> StoreResult<Vec<ClinicalRecord>> {
                fail()
            }

            async fn body_areas(&self) -> StoreResult<Vec<String>> {
                fail()
            }
        }
    }

    fn fixture() -> Vec<Value> {
        vec![
            json!({
                "_id": "r1",
                "body_area": "Abdomen",
                "age": "18 - 150",
                "panel": "Gastrointestinal",
                "condition": "Acute pancreatitis",
                "severity": "emergent",
                "scenario_id": "S1",
                "scenario_description": "Suspected acute pancreatitis",
                "procedures": [{
                    "procedure_name": "CT Abdomen",
                    "appropriateness_category": "Usually Appropriate",
                    "adult_rrl": "10-30 mSv"
                }]
            }),
            json!({
                "_id": "r2",
                "Body Area": "Abdomen-Pelvis",
                "Age": "18 - 150",
                "Panel": "Urologic",
                "Condition": "Hematuria",
                "scenario_id": "S7"
            }),
        ]
    }

    fn app() -> Router {
        let store = MemoryRecordStore::from_documents(&fixture());
        router(AppState::new(Arc::new(store)), false)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
    }

    #[tokio::test]
    async fn test_panels_for_adult_abdomen() {
        let (status, body) = get(
            app(),
            "/api/conditions?type=panels&ageGroup=adult&bodyArea=abdomen",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": ["Gastrointestinal"] }));
    }

    #[tokio::test]
    async fn test_conditions_for_panel() {
        let (status, body) = get(
            app(),
            "/api/conditions?type=conditions&ageGroup=adult&bodyArea=ABDOMEN&panel=gastrointestinal",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!([{ "condition": "Acute pancreatitis", "severity": "emergent" }])
        );
    }

    #[tokio::test]
    async fn test_scenarios_for_condition() {
        let (status, body) = get(
            app(),
            "/api/conditions?type=scenarios&ageGroup=adult&bodyArea=abdomen&panel=Gastrointestinal&condition=Acute%20pancreatitis",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!([{
                "scenario_id": "S1",
                "scenario_description": "Suspected acute pancreatitis",
                "_id": "r1"
            }])
        );
    }

    #[tokio::test]
    async fn test_results_for_scenario() {
        let (status, body) = get(
            app(),
            "/api/conditions?type=results&scenarioId=S1&ageGroup=adult",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": [{
                    "name": "CT Abdomen",
                    "appropriate": "usually",
                    "score": 30,
                    "radiationString": "10-30 mSv"
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_results_require_scenario_id() {
        let (status, body) = get(app(), "/api/conditions?type=results&ageGroup=adult").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "error": "scenarioId is required for results" })
        );
    }

    #[tokio::test]
    async fn test_unknown_type_is_bad_request() {
        let (status, body) = get(app(), "/api/conditions?type=everything").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_malformed_query_string_uses_envelope() {
        let (status, body) = get(app(), "/api/conditions?type=panels&type=results").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    }

    #[tokio::test]
    async fn test_untyped_query_returns_records() {
        let (status, body) = get(app(), "/api/conditions?bodyArea=abdomen-pelvis").await;

        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["_id"], json!("r2"));
        assert_eq!(data[0]["panel"], json!("Urologic"));
    }

    #[tokio::test]
    async fn test_body_areas() {
        let (status, body) = get(app(), "/api/body-areas").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(["Abdomen", "Abdomen-Pelvis"]));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_as_bad_request() {
        let app = router(AppState::new(Arc::new(FailingStore)), false);
        let (status, body) = get(app, "/api/conditions?type=panels&bodyArea=abdomen").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("fixture"));
    }

    #[tokio::test]
    async fn test_swagger_only_with_dev_tools() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::default());

        let request = || {
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap()
        };

        let without = router(AppState::new(store.clone()), false)
            .oneshot(request())
            .await
            .unwrap();
        assert_eq!(without.status(), StatusCode::NOT_FOUND);

        let with = router(AppState::new(store), true)
            .oneshot(request())
            .await
            .unwrap();
        assert_eq!(with.status(), StatusCode::OK);
    }
}
