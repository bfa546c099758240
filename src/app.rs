use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::{AdminPolicy, IdentityClient, IdentityError, IdentityProvider, SessionDecoder};
use crate::config::{AppConfig, ConfigError, SecurityConfig};
use crate::database::{ContactDirectory, RestStore, StoreError, TechnicianStore};
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::{
    require_admin_middleware, require_user_middleware, resolve_principal_middleware,
    session_gate_middleware,
};

/// Startup failures; any of these aborts the process before it binds a port
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build datastore client: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to build identity client: {0}")]
    Identity(#[from] IdentityError),
}

/// Everything a handler needs, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Public-credential store: contact search and health
    pub directory: Arc<dyn ContactDirectory>,
    /// Service-credential store: admin CRUD only
    pub technicians: Arc<dyn TechnicianStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<SessionDecoder>,
    pub admins: Arc<AdminPolicy>,
}

impl AppState {
    /// Build the REST clients for both credential tiers and the identity client
    pub fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let directory = RestStore::new(&config.datastore, config.datastore.public_key.clone())?;
        let technicians = RestStore::new(&config.datastore, config.datastore.service_key.clone())?;
        let identity = IdentityClient::new(&config.datastore)?;

        tracing::info!(
            "Datastore clients ready for {} (table '{}')",
            config.datastore.url,
            config.datastore.table
        );

        Ok(Self::new(
            config,
            Arc::new(directory),
            Arc::new(technicians),
            Arc::new(identity),
        ))
    }

    pub fn new(
        config: AppConfig,
        directory: Arc<dyn ContactDirectory>,
        technicians: Arc<dyn TechnicianStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let admins = AdminPolicy::from_csv(&config.auth.admin_emails);
        if admins.is_empty() {
            tracing::warn!("ADMIN_EMAILS is empty; only the admin role claim grants admin access");
        }
        if config.auth.jwt_secret.is_none() {
            tracing::warn!("SESSION_JWT_SECRET not set; page gate decodes session tokens without verifying them");
        }

        Self {
            sessions: Arc::new(SessionDecoder::new(&config.auth)),
            admins: Arc::new(admins),
            config: Arc::new(config),
            directory,
            technicians,
            identity,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();
    let level = if config.api.enable_request_logging {
        Level::INFO
    } else {
        Level::DEBUG
    };

    Router::new()
        // Public
        .merge(public_routes())
        // Session required
        .merge(protected_routes(state.clone()))
        // Administrator required
        .merge(elevated_routes(state.clone()))
        // Static pages, admitted by the session gate
        .merge(page_routes(&config))
        .fallback(not_found)
        // Global middleware
        .layer(middleware::from_fn_with_state(state.clone(), session_gate_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(level))
                .on_response(DefaultOnResponse::new().level(level)),
        )
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/health", get(public::health))
        .route("/api/auth/login", post(public::auth::login))
        .route("/api/auth/logout", post(public::auth::logout))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/api/search", get(protected::search))
        .route("/api/auth/whoami", get(protected::auth::whoami))
        // Layers run bottom-up: resolve the principal, then require one
        .route_layer(middleware::from_fn(require_user_middleware))
        .route_layer(middleware::from_fn_with_state(state, resolve_principal_middleware))
}

fn elevated_routes(state: AppState) -> Router<AppState> {
    use handlers::elevated::technicians;

    Router::new()
        .route(
            "/api/admin/techniciens",
            get(technicians::technician_list).post(technicians::technician_create),
        )
        .route(
            "/api/admin/techniciens/:id",
            put(technicians::technician_update).delete(technicians::technician_delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, resolve_principal_middleware))
}

fn page_routes(config: &AppConfig) -> Router<AppState> {
    let dir = &config.api.static_dir;

    Router::new()
        .route_service("/", ServeFile::new(dir.join("index.html")))
        .route_service(&config.gate.login_path, ServeFile::new(dir.join("login.html")))
        .route_service("/admin", ServeFile::new(dir.join("admin.html")))
        .route_service("/favicon.ico", ServeFile::new(dir.join("favicon.ico")))
        .nest_service("/assets", ServeDir::new(dir.join("assets")))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
