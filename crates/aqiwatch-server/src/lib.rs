//! HTTP dashboard server: one rolling AQI window per session.
//!
//! A browser or script opens a session with `POST /sessions`, then asks for a
//! new reading with `POST /sessions/{id}/refresh` on whatever schedule it
//! likes. The server never runs a timer itself. Sessions nobody has touched
//! for the session TTL are dropped the next time the registry is used.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use aqiwatch_core::{
    AqiError, BANDS, DashboardConfig, DashboardSession, DashboardView, RngSource, StdRngSource,
};

type Session = DashboardSession<StdRngSource>;

/// Idle time after which a session is discarded.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

// ---------------------------------------------------------------------------
// SessionRegistry
// ---------------------------------------------------------------------------

struct Entry {
    session: Session,
    last_seen: Instant,
}

/// Live sessions keyed by id. Each entry owns its own window.
pub struct SessionRegistry {
    defaults: DashboardConfig,
    ttl: Duration,
    sessions: HashMap<Uuid, Entry>,
}

impl SessionRegistry {
    pub fn new(defaults: DashboardConfig) -> Self {
        Self::with_ttl(defaults, DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(defaults: DashboardConfig, ttl: Duration) -> Self {
        Self {
            defaults,
            ttl,
            sessions: HashMap::new(),
        }
    }

    /// Drop sessions idle for longer than the TTL as of `now`. Returns how
    /// many were dropped.
    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, e| now.saturating_duration_since(e.last_seen) <= ttl);
        let evicted = before - self.sessions.len();
        if evicted > 0 {
            log::info!(
                "expired {evicted} idle session(s) ({} live)",
                self.sessions.len()
            );
        }
        evicted
    }

    fn touch(&mut self, id: &Uuid) -> Option<&mut Session> {
        let now = Instant::now();
        self.evict_idle(now);
        let entry = self.sessions.get_mut(id)?;
        entry.last_seen = now;
        Some(&mut entry.session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start a session from the server defaults, optionally overriding the
    /// location and the RNG seed.
    pub fn create(
        &mut self,
        location: Option<String>,
        rng_seed: Option<u64>,
    ) -> Result<(Uuid, DashboardView), AqiError> {
        let mut config = self.defaults.clone();
        if let Some(location) = location {
            config.location = location;
        }
        let rng = match rng_seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_os(),
        };
        let session = DashboardSession::start(config, rng)?;
        let view = session.view()?;
        let id = Uuid::new_v4();
        let now = Instant::now();
        self.evict_idle(now);
        self.sessions.insert(
            id,
            Entry {
                session,
                last_seen: now,
            },
        );
        log::info!("opened session {id} ({} live)", self.sessions.len());
        Ok((id, view))
    }

    pub fn view(&mut self, id: &Uuid) -> Option<Result<DashboardView, AqiError>> {
        self.touch(id).map(|s| s.view())
    }

    pub fn refresh(&mut self, id: &Uuid) -> Option<Result<DashboardView, AqiError>> {
        let session = self.touch(id)?;
        if let Err(e) = session.refresh() {
            return Some(Err(e));
        }
        Some(session.view())
    }

    pub fn remove(&mut self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            log::info!("closed session {id} ({} live)", self.sessions.len());
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// HTTP types
// ---------------------------------------------------------------------------

/// Shared server state.
struct AppState {
    registry: Mutex<SessionRegistry>,
}

#[derive(Deserialize)]
struct CreateParams {
    location: Option<String>,
    /// Deterministic walk for demos and tests.
    seed: Option<u64>,
}

#[derive(Serialize)]
struct SessionResponse {
    id: Uuid,
    view: DashboardView,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
}

#[derive(Serialize)]
struct BandEntry {
    band: String,
    range: String,
    color: String,
    emoji: String,
    advisory: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: msg.into(),
        }),
    )
}

fn not_found(id: &Uuid) -> (StatusCode, Json<ErrorResponse>) {
    error(
        StatusCode::NOT_FOUND,
        format!("Unknown session: {id}. Create one with POST /sessions."),
    )
}

fn internal(e: AqiError) -> (StatusCode, Json<ErrorResponse>) {
    error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn handle_create(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreateParams>,
) -> Result<(StatusCode, Json<SessionResponse>), (StatusCode, Json<ErrorResponse>)> {
    let mut registry = state.registry.lock().await;
    let (id, view) = registry
        .create(params.location, params.seed)
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(SessionResponse { id, view })))
}

async fn handle_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionResponse> {
    let mut registry = state.registry.lock().await;
    let view = registry
        .view(&id)
        .ok_or_else(|| not_found(&id))?
        .map_err(internal)?;
    Ok(Json(SessionResponse { id, view }))
}

async fn handle_refresh(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<SessionResponse> {
    let mut registry = state.registry.lock().await;
    let view = registry
        .refresh(&id)
        .ok_or_else(|| not_found(&id))?
        .map_err(internal)?;
    Ok(Json(SessionResponse { id, view }))
}

async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let mut registry = state.registry.lock().await;
    if registry.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let mut registry = state.registry.lock().await;
    registry.evict_idle(Instant::now());
    Json(HealthResponse {
        status: "healthy".to_string(),
        sessions: registry.len(),
    })
}

async fn handle_bands() -> Json<Vec<BandEntry>> {
    Json(
        BANDS
            .iter()
            .map(|b| BandEntry {
                band: b.label.to_string(),
                range: b.band.range_label(),
                color: b.color.to_string(),
                emoji: b.emoji.to_string(),
                advisory: b.advisory.to_string(),
            })
            .collect(),
    )
}

async fn handle_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "aqiwatch server",
        "version": aqiwatch_core::VERSION,
        "note": "All AQI data is simulated for demonstration purposes only.",
        "endpoints": {
            "/": "This API index",
            "/health": "Health check",
            "/bands": "AQI severity bands with colors and advisories",
            "POST /sessions": {
                "description": "Open a dashboard session with a freshly seeded window",
                "params": {
                    "location": "Display label (default from server config)",
                    "seed": "Optional RNG seed for a reproducible walk",
                }
            },
            "GET /sessions/{id}": "Current dashboard view",
            "POST /sessions/{id}/refresh": "Take one new reading and return the view",
            "DELETE /sessions/{id}": "Close the session",
        },
    }))
}

/// Build the axum router.
fn build_router(defaults: DashboardConfig, session_ttl: Duration) -> Router {
    let state = Arc::new(AppState {
        registry: Mutex::new(SessionRegistry::with_ttl(defaults, session_ttl)),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/bands", get(handle_bands))
        .route("/sessions", post(handle_create))
        .route("/sessions/{id}", get(handle_view).delete(handle_delete))
        .route("/sessions/{id}/refresh", post(handle_refresh))
        .with_state(state)
}

/// Run the HTTP dashboard server until it fails.
pub async fn run_server(
    defaults: DashboardConfig,
    session_ttl: Duration,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    defaults
        .validate()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    let app = build_router(defaults, session_ttl);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(DashboardConfig::default())
    }

    #[test]
    fn create_seeds_full_window() {
        let mut reg = registry();
        let (id, view) = reg.create(None, Some(1)).unwrap();
        assert_eq!(view.samples.len(), 8);
        assert_eq!(view.location, "Delhi");
        assert_eq!(reg.len(), 1);
        assert!(reg.view(&id).is_some());
    }

    #[test]
    fn location_override_is_display_only() {
        let mut reg = registry();
        let (_, a) = reg.create(Some("Lahore".into()), Some(4)).unwrap();
        let (_, b) = reg.create(None, Some(4)).unwrap();
        assert_eq!(a.location, "Lahore");
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn refresh_only_touches_one_session() {
        let mut reg = registry();
        let (a, _) = reg.create(None, Some(1)).unwrap();
        let (b, before) = reg.create(None, Some(2)).unwrap();

        let after_a = reg.refresh(&a).unwrap().unwrap();
        assert_eq!(after_a.current.time, 21);

        let still_b = reg.view(&b).unwrap().unwrap();
        assert_eq!(still_b.samples, before.samples);
    }

    #[test]
    fn unknown_and_removed_sessions() {
        let mut reg = registry();
        let ghost = Uuid::new_v4();
        assert!(reg.view(&ghost).is_none());
        assert!(reg.refresh(&ghost).is_none());
        assert!(!reg.remove(&ghost));

        let (id, _) = reg.create(None, None).unwrap();
        assert!(reg.remove(&id));
        assert!(reg.is_empty());
        assert!(reg.view(&id).is_none());
    }

    #[test]
    fn invalid_defaults_fail_on_create() {
        let mut reg = SessionRegistry::new(DashboardConfig {
            seed_len: 0,
            ..Default::default()
        });
        assert!(matches!(
            reg.create(None, None),
            Err(AqiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn idle_sessions_expire() {
        let ttl = Duration::from_secs(60);
        let mut reg = SessionRegistry::with_ttl(DashboardConfig::default(), ttl);
        reg.create(None, Some(1)).unwrap();
        reg.create(None, Some(2)).unwrap();

        assert_eq!(reg.evict_idle(Instant::now()), 0);
        assert_eq!(reg.evict_idle(Instant::now() + ttl / 2), 0);
        assert_eq!(reg.len(), 2);

        assert_eq!(reg.evict_idle(Instant::now() + ttl * 2), 2);
        assert!(reg.is_empty());
    }

    #[test]
    fn stale_session_dropped_on_next_use() {
        let ttl = Duration::from_secs(60);
        let mut reg = SessionRegistry::with_ttl(DashboardConfig::default(), ttl);
        let (stale, _) = reg.create(None, Some(1)).unwrap();
        let (fresh, _) = reg.create(None, Some(2)).unwrap();

        let long_ago = Instant::now().checked_sub(ttl * 2).unwrap();
        reg.sessions.get_mut(&stale).unwrap().last_seen = long_ago;

        assert!(reg.refresh(&stale).is_none());
        assert_eq!(reg.len(), 1);
        assert!(reg.view(&fresh).is_some());
    }

    // --- HTTP routes ---

    fn app() -> Router {
        build_router(DashboardConfig::default(), DEFAULT_SESSION_TTL)
    }

    async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn session_lifecycle_over_http() {
        let app = app();

        let (status, created) = send(&app, "POST", "/sessions?location=Lahore&seed=3").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["view"]["location"], "Lahore");
        assert_eq!(created["view"]["samples"].as_array().unwrap().len(), 8);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, viewed) = send(&app, "GET", &format!("/sessions/{id}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(viewed["view"]["samples"], created["view"]["samples"]);

        let (status, refreshed) = send(&app, "POST", &format!("/sessions/{id}/refresh")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refreshed["view"]["current"]["time"], 21);
        assert_eq!(refreshed["view"]["tick"], 2);

        let (status, body) = send(&app, "DELETE", &format!("/sessions/{id}")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", &format!("/sessions/{id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unknown_session_is_json_404() {
        let app = app();
        let ghost = Uuid::new_v4();
        for (method, uri) in [
            ("GET", format!("/sessions/{ghost}")),
            ("POST", format!("/sessions/{ghost}/refresh")),
            ("DELETE", format!("/sessions/{ghost}")),
        ] {
            let (status, body) = send(&app, method, &uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body["success"], false);
            assert!(body["error"].as_str().unwrap().contains("Unknown session"));
        }
    }

    #[tokio::test]
    async fn health_counts_sessions() {
        let app = app();
        let (_, before) = send(&app, "GET", "/health").await;
        assert_eq!(before["status"], "healthy");
        assert_eq!(before["sessions"], 0);

        send(&app, "POST", "/sessions").await;
        let (status, after) = send(&app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(after["sessions"], 1);
    }

    #[tokio::test]
    async fn bands_and_index() {
        let app = app();
        let (status, bands) = send(&app, "GET", "/bands").await;
        assert_eq!(status, StatusCode::OK);
        let bands = bands.as_array().unwrap();
        assert_eq!(bands.len(), 6);
        assert_eq!(bands[0]["band"], "Good");
        assert_eq!(bands[0]["range"], "0-50");
        assert_eq!(bands[5]["color"], "maroon");

        let (status, index) = send(&app, "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(index["version"], aqiwatch_core::VERSION);
    }
}
