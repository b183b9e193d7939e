//! HTTP API for the battle server.
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                                          - Health check
//! GET  /api/v1/tournaments[?state=live]                 - List tournaments
//! POST /api/v1/tournaments                              - Create tournament
//! GET  /api/v1/tournaments/{id}                         - Tournament info
//! GET  /api/v1/tournaments/{id}/standings               - Latest leaderboard
//! POST /api/v1/tournaments/{id}/join                    - Enter a position
//! GET  /api/v1/tournaments/{id}/settlement              - Settlement report
//! POST /api/v1/ticks                                    - Performance tick
//! GET  /api/v1/activity[?n=10]                          - Recent activity
//! POST /api/v1/positions                                - Register position
//! PUT  /api/v1/positions/{id}/range                     - Range rebalance
//! GET  /api/v1/positions/{id}/eligibility/{tournament}  - Eligibility check
//! GET  /api/v1/participants/{id}                        - Participant profile
//! ```
//!
//! Errors come back as `{"error": "..."}` with a 4xx or 503 status.
//!
//! # CORS
//!
//! CORS is configured permissively; put a proxy in front for production.

pub mod activity;
pub mod error;
pub mod positions;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
};
use pool_arena::TournamentManager;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<TournamentManager>,
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// use pa_server::api::{AppState, create_router};
/// use pool_arena::{ArenaConfig, TournamentManager};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let state = AppState {
///     manager: Arc::new(TournamentManager::new(ArenaConfig::default())),
/// };
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, create_router(state)).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", create_v1_router())
        .route_layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            "/tournaments",
            get(tournaments::list_tournaments).post(tournaments::create_tournament),
        )
        .route("/tournaments/{id}", get(tournaments::get_tournament))
        .route("/tournaments/{id}/standings", get(tournaments::get_standings))
        .route("/tournaments/{id}/join", post(tournaments::join_tournament))
        .route("/tournaments/{id}/settlement", get(tournaments::get_settlement))
        .route("/ticks", post(activity::submit_tick))
        .route("/activity", get(activity::recent_activity))
        .route("/positions", post(positions::create_position))
        .route("/positions/{id}/range", put(positions::update_range))
        .route(
            "/positions/{id}/eligibility/{tournament_id}",
            get(positions::get_eligibility),
        )
        .route("/participants/{id}", get(positions::get_participant))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "tournaments": state.manager.tournament_count().await,
    }))
}
