//! Purpose: Provide the HTTP/JSON transport for the movie catalog.
//! Exports: `ServeConfig`, `serve`.
//! Role: Axum-based server; parses requests, calls the core, maps outcomes to
//! status codes. No decision logic of its own beyond that mapping.
//! Invariants: Response bodies for not-found and validation outcomes are stable.
//! Invariants: Loopback-only unless explicitly allowed.
//! Invariants: All catalog access is serialized through one lock.

use axum::extract::{DefaultBodyLimit, Path as AxumPath, Query, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use marquee::api::{
    Catalog, Error, ErrorKind, FieldErrors, Listing, MovieId, OriginPolicy, validate_movie,
    validate_partial_movie,
};
use marquee::seed;

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub seed_path: Option<PathBuf>,
    pub cors_origins: Vec<String>,
    pub allow_non_loopback: bool,
    pub max_body_bytes: u64,
}

struct AppState {
    catalog: Mutex<Catalog>,
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let max_body_bytes: usize = config
        .max_body_bytes
        .try_into()
        .map_err(|_| Error::new(ErrorKind::Usage).with_message("--max-body-bytes is too large"))?;

    let movies = match &config.seed_path {
        Some(path) => seed::load_seed(path)?,
        None => Vec::new(),
    };
    tracing::info!(movies = movies.len(), "catalog seeded");

    let origins = OriginPolicy::with_extra_origins(config.cors_origins.clone());
    let state = Arc::new(AppState {
        catalog: Mutex::new(Catalog::from_movies(movies)),
    });

    let app = router(state, origins).layer(DefaultBodyLimit::max(max_body_bytes));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;
    tracing::info!(bind = %config.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("server failed")
                .with_source(err)
        })?;
    Ok(())
}

fn router(state: Arc<AppState>, origins: OriginPolicy) -> Router {
    // The gate decides; the layer only sets headers and answers preflights.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .is_ok_and(|value| origins.is_allowed(Some(value)))
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/:id",
            get(get_movie).patch(update_movie).delete(delete_movie),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

pub fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }

    if config.max_body_bytes == 0 {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("--max-body-bytes must be greater than zero")
            .with_hint("Use a positive value like 1048576."));
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        let mut signal = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("install SIGTERM handler");
        signal.recv().await;
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    genre: Option<String>,
}

async fn healthz() -> Response {
    json_response(StatusCode::OK, json!({ "ok": true }))
}

async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let catalog = state.catalog.lock().await;
    match catalog.list(query.genre.as_deref()) {
        Listing::Found(movies) => json_response(StatusCode::OK, json!(movies)),
        Listing::NotFound => json_response(
            StatusCode::NOT_FOUND,
            json!({ "message": "no movies matched the requested genre" }),
        ),
    }
}

async fn get_movie(State(state): State<Arc<AppState>>, AxumPath(id): AxumPath<String>) -> Response {
    let catalog = state.catalog.lock().await;
    match catalog.get(&MovieId::from(id)) {
        Some(movie) => json_response(StatusCode::OK, json!(movie)),
        None => movie_not_found(),
    }
}

async fn create_movie(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let draft = match validate_movie(&body) {
        Ok(draft) => draft,
        Err(errors) => return field_errors_response(&errors),
    };
    let mut catalog = state.catalog.lock().await;
    let movie = catalog.create(draft);
    json_response(StatusCode::CREATED, json!(movie))
}

async fn update_movie(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
    Json(body): Json<Value>,
) -> Response {
    let patch = match validate_partial_movie(&body) {
        Ok(patch) => patch,
        Err(errors) => return field_errors_response(&errors),
    };
    let mut catalog = state.catalog.lock().await;
    match catalog.update(&MovieId::from(id), patch) {
        Some(movie) => json_response(StatusCode::OK, json!(movie)),
        None => movie_not_found(),
    }
}

async fn delete_movie(
    State(state): State<Arc<AppState>>,
    AxumPath(id): AxumPath<String>,
) -> Response {
    let mut catalog = state.catalog.lock().await;
    if catalog.delete(&MovieId::from(id)) {
        json_response(StatusCode::OK, json!({ "message": "Movie deleted" }))
    } else {
        json_response(StatusCode::NOT_FOUND, json!({ "error": "Movie Not Found" }))
    }
}

fn movie_not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, json!({ "message": "Movie not found" }))
}

fn field_errors_response(errors: &FieldErrors) -> Response {
    json_response(StatusCode::BAD_REQUEST, json!({ "error": errors }))
}

fn json_response(status: StatusCode, payload: Value) -> Response {
    (status, Json(payload)).into_response()
}
