use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::app::AppState;
use crate::config::GateConfig;

/// What the gate does with a page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Asset or API path; not the gate's business
    Bypass,
    Allow,
    Redirect(String),
}

pub fn bypasses(gate: &GateConfig, path: &str) -> bool {
    path.starts_with(gate.api_prefix.as_str())
        || gate.asset_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Page admission: anonymous users go to the login page, signed-in users are kept off it.
pub fn decide(gate: &GateConfig, has_session: bool, path: &str) -> GateDecision {
    if bypasses(gate, path) {
        return GateDecision::Bypass;
    }

    let is_login_path = path == gate.login_path;
    match (has_session, is_login_path) {
        (false, false) => GateDecision::Redirect(gate.login_path.clone()),
        (true, true) => GateDecision::Redirect(gate.home_path.clone()),
        _ => GateDecision::Allow,
    }
}

/// Applied to every request. Only page navigation is gated; API routes authorize themselves.
pub async fn session_gate_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let gate = &state.config.gate;
    let path = request.uri().path();

    let has_session = !bypasses(gate, path)
        && state
            .sessions
            .has_session(jar.get(&state.config.auth.session_cookie).map(|c| c.value()));

    match decide(gate, has_session, path) {
        GateDecision::Bypass | GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(target) => {
            let location = match request.uri().query() {
                Some(query) => format!("{}?{}", target, query),
                None => target,
            };
            tracing::debug!("Session gate redirecting {} -> {}", path, location);
            Redirect::temporary(&location).into_response()
        }
    }
}
