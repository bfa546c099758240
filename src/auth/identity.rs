use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::Principal;
use crate::config::{Credential, DatastoreConfig};
use crate::database::rest::service_url;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Identity provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected identity provider response: {0}")]
    Decode(String),
}

/// Result of a successful password sign-in
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub access_token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub principal: Principal,
}

/// The external identity provider. This service never issues or verifies tokens itself;
/// it only asks the provider who the current user is.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the provider does not accept the token.
    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

/// REST client for the provider's auth endpoints (`/auth/v1/*`).
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base: Url,
    api_key: Credential,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: AppMetadata,
}

/// Server-controlled metadata; users cannot edit it, so its role claim is trusted.
#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: UserResponse,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl From<UserResponse> for Principal {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.app_metadata.role,
        }
    }
}

impl IdentityClient {
    pub fn new(config: &DatastoreConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base: config.url.clone(),
            api_key: config.public_key.clone(),
        })
    }

    fn endpoint(&self, name: &str) -> Url {
        service_url(&self.base, &["auth", "v1", name])
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn get_user(&self, access_token: &str) -> Result<Option<Principal>, IdentityError> {
        let response = self
            .http
            .get(self.endpoint("user"))
            .header("apikey", self.api_key.expose())
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user = response
                    .json::<UserResponse>()
                    .await
                    .map_err(|e| IdentityError::Decode(e.to_string()))?;
                Ok(Some(user.into()))
            }
            _ => Err(rejected(response).await),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError> {
        let response = self
            .http
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", self.api_key.expose())
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(IdentityError::InvalidCredentials)
            }
            status if status.is_success() => {
                let token = response
                    .json::<TokenResponse>()
                    .await
                    .map_err(|e| IdentityError::Decode(e.to_string()))?;
                Ok(SignedIn {
                    access_token: token.access_token,
                    expires_in: token.expires_in,
                    principal: token.user.into(),
                })
            }
            _ => Err(rejected(response).await),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", self.api_key.expose())
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        // An already-revoked token is as signed out as it gets
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(rejected(response).await)
        }
    }
}

async fn rejected(response: Response) -> IdentityError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    IdentityError::Rejected { status, message }
}
