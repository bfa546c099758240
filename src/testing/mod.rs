//! In-memory doubles for the datastore and identity provider, plus request helpers
//! for driving the full router with `oneshot`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    response::Response,
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::app::{router, AppState};
use crate::auth::session::Claims;
use crate::auth::{IdentityError, IdentityProvider, Principal, SignedIn};
use crate::config::AppConfig;
use crate::database::{
    ContactDirectory, NewTechnician, StoreError, Technician, TechnicianContact, TechnicianPatch,
    TechnicianStore,
};

pub const JWT_SECRET: &str = "test-session-secret";
pub const ADMIN_EMAIL: &str = "boss@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse";
/// Allow-listed administrator
pub const ADMIN_TOKEN: &str = "admin-token";
/// Administrator through the role claim, not on the allow-list
pub const ROLE_ADMIN_TOKEN: &str = "role-admin-token";
/// Ordinary signed-in technician
pub const USER_TOKEN: &str = "user-token";

pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = [
        ("DATASTORE_URL", "http://datastore.invalid"),
        ("DATASTORE_PUBLIC_KEY", "public-key"),
        ("DATASTORE_SERVICE_KEY", "service-key"),
        // mixed case on purpose; matching is case-insensitive
        ("ADMIN_EMAILS", "Boss@Example.com, other-admin@example.com"),
        ("SESSION_JWT_SECRET", JWT_SECRET),
        ("STATIC_DIR", "target/test-static-missing"),
    ]
    .into_iter()
    .collect();

    AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
        .expect("test configuration is complete")
}

/// Router wired to in-memory doubles, with handles to inspect them
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<StaticIdentity>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let identity = Arc::new(
            StaticIdentity::default()
                .with_user(ADMIN_TOKEN, principal("admin-1", ADMIN_EMAIL, None))
                .with_user(ROLE_ADMIN_TOKEN, principal("admin-2", "ops@example.com", Some("admin")))
                .with_user(USER_TOKEN, principal("user-1", "tech@example.com", None))
                .with_login(ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_TOKEN),
        );

        let state = AppState::new(test_config(), store.clone(), store.clone(), identity.clone());
        Self {
            router: router(state),
            store,
            identity,
        }
    }
}

pub fn principal(id: &str, email: &str, role: Option<&str>) -> Principal {
    Principal {
        id: id.to_string(),
        email: Some(email.to_string()),
        role: role.map(str::to_string),
    }
}

/// Session cookie value accepted by the page gate for `ttl_secs` more seconds
pub fn session_jwt(ttl_secs: i64) -> String {
    let claims = Claims {
        sub: "user-1".to_string(),
        email: Some("tech@example.com".to_string()),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes()))
        .expect("encode test token")
}

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    builder(method, uri, token).body(Body::empty()).expect("request")
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    raw_request(method, uri, token, body.to_string())
}

pub fn raw_request(method: Method, uri: &str, token: Option<&str>, body: impl Into<String>) -> Request<Body> {
    builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .expect("request")
}

/// Browser-style navigation, optionally carrying a session cookie
pub async fn get_page(router: &Router, uri: &str, session: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("sb-access-token={}", token));
    }
    let request = builder.body(Body::empty()).expect("request");
    router.clone().oneshot(request).await.expect("router is infallible")
}

/// Send a request through the router; an empty body decodes to `Value::Null`
pub async fn call(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, headers, body)
}

// ----------------------------------------------------------------------------
// Datastore double
// ----------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    rows: Vec<Technician>,
    last_id: i64,
    writes: usize,
    failing: bool,
}

/// Both store traits over one in-memory table
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Insert a row directly, bypassing the write counter
    pub async fn seed(&self, code: &str, name: &str) -> Technician {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let row = Technician {
            id: state.last_id,
            code: code.to_string(),
            name: name.to_string(),
            region: None,
            email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
            phone: Some("0600000000".to_string()),
            tech_manager_email: None,
            tech_manager_phone: Some("NA".to_string()),
            ops_manager_email: None,
            ops_manager_phone: None,
        };
        state.rows.push(row.clone());
        row
    }

    pub async fn rows(&self) -> Vec<Technician> {
        self.state.read().await.rows.clone()
    }

    /// Number of insert/update/delete calls that reached the store
    pub async fn writes(&self) -> usize {
        self.state.read().await.writes
    }

    pub async fn set_failing(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }

    fn check(state: &MemoryState) -> Result<(), StoreError> {
        if state.failing {
            return Err(StoreError::Rejected {
                status: 500,
                code: Some("XX000".to_string()),
                message: "boom: connection reset by peer".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContactDirectory for MemoryStore {
    async fn find_contacts(&self, code: &str, limit: usize) -> Result<Vec<TechnicianContact>, StoreError> {
        let state = self.state.read().await;
        Self::check(&state)?;
        Ok(state
            .rows
            .iter()
            .filter(|row| row.code == code)
            .take(limit)
            .map(TechnicianContact::from)
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Self::check(&*self.state.read().await)
    }
}

#[async_trait]
impl TechnicianStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Technician>, StoreError> {
        let state = self.state.read().await;
        Self::check(&state)?;
        let mut rows = state.rows.clone();
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(rows)
    }

    async fn insert(&self, record: &NewTechnician) -> Result<Technician, StoreError> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.writes += 1;
        state.last_id += 1;
        let row = Technician {
            id: state.last_id,
            code: record.code.clone(),
            name: record.name.clone(),
            region: record.region.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            tech_manager_email: record.tech_manager_email.clone(),
            tech_manager_phone: record.tech_manager_phone.clone(),
            ops_manager_email: record.ops_manager_email.clone(),
            ops_manager_phone: record.ops_manager_phone.clone(),
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, patch: &TechnicianPatch) -> Result<Technician, StoreError> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.writes += 1;
        let row = state
            .rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StoreError::NotFound)?;
        apply_patch(patch, row);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        Self::check(&state)?;
        state.writes += 1;
        let index = state
            .rows
            .iter()
            .position(|row| row.id == id)
            .ok_or(StoreError::NotFound)?;
        state.rows.remove(index);
        Ok(())
    }
}

/// Row-level effect of a PATCH: present fields overwrite, `Some(None)` clears
fn apply_patch(patch: &TechnicianPatch, target: &mut Technician) {
    if let Some(code) = &patch.code {
        target.code = code.clone();
    }
    if let Some(name) = &patch.name {
        target.name = name.clone();
    }
    let optional = [
        (&patch.region, &mut target.region),
        (&patch.email, &mut target.email),
        (&patch.phone, &mut target.phone),
        (&patch.tech_manager_email, &mut target.tech_manager_email),
        (&patch.tech_manager_phone, &mut target.tech_manager_phone),
        (&patch.ops_manager_email, &mut target.ops_manager_email),
        (&patch.ops_manager_phone, &mut target.ops_manager_phone),
    ];
    for (change, slot) in optional {
        if let Some(value) = change {
            *slot = value.clone();
        }
    }
}

// ----------------------------------------------------------------------------
// Identity provider double
// ----------------------------------------------------------------------------

/// Fixed token table; unknown tokens are treated as rejected by the provider
#[derive(Default)]
pub struct StaticIdentity {
    users: HashMap<String, Principal>,
    logins: HashMap<String, (String, String)>,
    signed_out: RwLock<Vec<String>>,
}

impl StaticIdentity {
    pub fn with_user(mut self, token: &str, principal: Principal) -> Self {
        self.users.insert(token.to_string(), principal);
        self
    }

    /// `email` + `password` sign in as the user registered under `token`
    pub fn with_login(mut self, email: &str, password: &str, token: &str) -> Self {
        self.logins
            .insert(email.to_string(), (password.to_string(), token.to_string()));
        self
    }

    pub async fn signed_out(&self) -> Vec<String> {
        self.signed_out.read().await.clone()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>, IdentityError> {
        Ok(self.users.get(access_token).cloned())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let (expected, token) = self
            .logins
            .get(email)
            .ok_or(IdentityError::InvalidCredentials)?;
        if expected != password {
            return Err(IdentityError::InvalidCredentials);
        }
        let principal = self
            .users
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;

        Ok(SignedIn {
            access_token: token.clone(),
            expires_in: 3600,
            principal,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.signed_out.write().await.push(access_token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_overwrites_present_fields_and_clears_nulls() {
        let store = MemoryStore::default();
        let row = store.seed("AB12", "Jane Doe").await;

        let patch = TechnicianPatch {
            name: Some("Jane Smith".to_string()),
            region: Some(Some("South".to_string())),
            phone: Some(None),
            ..Default::default()
        };
        let updated = store.update(row.id, &patch).await.unwrap();

        assert_eq!(updated.code, "AB12");
        assert_eq!(updated.name, "Jane Smith");
        assert_eq!(updated.region.as_deref(), Some("South"));
        assert_eq!(updated.phone, None);
        assert_eq!(updated.email, row.email);
        assert_eq!(store.rows().await, vec![updated]);
    }
}
