use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::models::technician::{CONTACT_COLUMNS, TECHNICIAN_COLUMNS};
use super::{
    ContactDirectory, NewTechnician, StoreError, Technician, TechnicianContact, TechnicianPatch,
    TechnicianStore,
};
use crate::config::{Credential, DatastoreConfig};

/// Error code the REST layer returns when a single-row request matched nothing.
const NO_ROWS_CODE: &str = "PGRST116";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Client for the datastore's REST interface, bound to one credential.
///
/// One instance is built with the public credential (search, health) and one
/// with the service credential (admin CRUD); row-level security on the store
/// side is what tells them apart.
#[derive(Clone)]
pub struct RestStore {
    http: reqwest::Client,
    table_url: Url,
    key: Credential,
}

#[derive(Debug, Deserialize)]
struct RestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

impl RestStore {
    pub fn new(config: &DatastoreConfig, key: Credential) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            table_url: service_url(&config.url, &["rest", "v1", &config.table]),
            key,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url.clone())
            .header("apikey", self.key.expose())
            .bearer_auth(self.key.expose())
    }

    /// Ask for exactly one row back; zero rows surfaces as `NO_ROWS_CODE`.
    fn single(builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(header::ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
    }
}

#[async_trait]
impl ContactDirectory for RestStore {
    async fn find_contacts(&self, code: &str, limit: usize) -> Result<Vec<TechnicianContact>, StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", CONTACT_COLUMNS.join(",")),
                ("code", format!("eq.{}", code)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        read_json(response).await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;
        read_json::<Value>(response).await.map(|_| ())
    }
}

#[async_trait]
impl TechnicianStore for RestStore {
    async fn list(&self) -> Result<Vec<Technician>, StoreError> {
        let response = self
            .request(Method::GET)
            .query(&[
                ("select", TECHNICIAN_COLUMNS.join(",")),
                ("order", "code.asc".to_string()),
            ])
            .send()
            .await?;
        read_json(response).await
    }

    async fn insert(&self, record: &NewTechnician) -> Result<Technician, StoreError> {
        let response = Self::single(self.request(Method::POST))
            .query(&[("select", TECHNICIAN_COLUMNS.join(","))])
            .json(record)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update(&self, id: i64, patch: &TechnicianPatch) -> Result<Technician, StoreError> {
        let response = Self::single(self.request(Method::PATCH))
            .query(&[
                ("id", format!("eq.{}", id)),
                ("select", TECHNICIAN_COLUMNS.join(",")),
            ])
            .json(patch)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let response = Self::single(self.request(Method::DELETE))
            .query(&[("id", format!("eq.{}", id)), ("select", "id".to_string())])
            .send()
            .await?;
        read_json::<Value>(response).await.map(|_| ())
    }
}

/// Decode a successful body, or translate the store's error body.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(rejection(status.as_u16(), &body))
}

fn rejection(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<RestErrorBody>(body) {
        Ok(err) if err.code.as_deref() == Some(NO_ROWS_CODE) => StoreError::NotFound,
        Ok(err) => StoreError::Rejected {
            status,
            code: err.code,
            message: err.message.unwrap_or_else(|| body.to_string()),
        },
        Err(_) => StoreError::Rejected {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

/// Append path segments to the provider base URL, keeping any existing path prefix.
pub(crate) fn service_url(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
