//! HTTP implementation of [`ConsoleApi`] against the proxy origin.
//!
//! Every call carries the session cookie; the proxy turns it into the
//! backend bearer token. Non-success statuses are mapped onto
//! [`ConsoleError`] using the proxy's `{ "message": ... }` body.

use medinv_core::models::{CreateEquipmentBatch, Equipment, PermissionGroup, ReorderStages};
use medinv_core::pagination::{EquipmentListBody, EquipmentPage, EquipmentQuery};
use medinv_core::resource::Resource;
use medinv_core::upload::ImageFile;
use reqwest::header::COOKIE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::ConsoleApi;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};

/// Shapes the batch-create endpoint is known to answer with.
#[derive(Deserialize)]
#[serde(untagged)]
enum BatchBody {
    Records(Vec<Equipment>),
    Envelope { data: Vec<Equipment> },
    Single(Equipment),
}

impl BatchBody {
    fn into_records(self) -> Vec<Equipment> {
        match self {
            BatchBody::Records(records) | BatchBody::Envelope { data: records } => records,
            BatchBody::Single(record) => vec![record],
        }
    }
}

/// Typed client for the `/api` proxy routes.
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
    cookie_name: String,
    cookie: Option<String>,
}

impl ProxyClient {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(client: reqwest::Client, config: &ConsoleConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cookie_name: config.session_cookie.clone(),
            cookie: None,
        }
    }

    /// Send `token` under the configured session cookie name.
    pub fn with_session(mut self, token: &str) -> Self {
        self.cookie = Some(format!("{}={token}", self.cookie_name));
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/api/{}", self.base_url, path));
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    // ---- private helpers ----

    /// Return the response on success, otherwise the mapped error.
    async fn ensure_success(response: reqwest::Response) -> ConsoleResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Error en la solicitud")
                .to_string()
        });
        tracing::warn!(status = status.as_u16(), message = %message, "Proxy call failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => ConsoleError::Unauthorized,
            StatusCode::BAD_REQUEST => ConsoleError::Validation(message),
            _ => ConsoleError::Upstream { status, message },
        })
    }

    async fn parse_response<T: DeserializeOwned>(builder: RequestBuilder) -> ConsoleResult<T> {
        let response = Self::ensure_success(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(builder: RequestBuilder) -> ConsoleResult<()> {
        Self::ensure_success(builder.send().await?).await?;
        Ok(())
    }
}

/// `message` (or `error`) from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}

impl ConsoleApi for ProxyClient {
    async fn list<R: Resource>(&self) -> ConsoleResult<Vec<R>> {
        Self::parse_response(self.request(Method::GET, R::COLLECTION)).await
    }

    async fn create<R: Resource>(&self, input: &R::Create) -> ConsoleResult<R> {
        Self::parse_response(self.request(Method::POST, R::COLLECTION).json(input)).await
    }

    async fn update<R: Resource>(&self, id: &str, input: &R::Update) -> ConsoleResult<R> {
        let path = format!("{}/{id}", R::COLLECTION);
        Self::parse_response(self.request(Method::PATCH, &path).json(input)).await
    }

    async fn delete<R: Resource>(&self, id: &str) -> ConsoleResult<()> {
        let path = format!("{}/{id}", R::COLLECTION);
        Self::check_status(self.request(Method::DELETE, &path)).await
    }

    async fn search_equipments(&self, query: &EquipmentQuery) -> ConsoleResult<EquipmentPage> {
        let query = query.normalized();
        let body: EquipmentListBody =
            Self::parse_response(self.request(Method::GET, "equipments").query(&query)).await?;
        Ok(body.into_page(&query))
    }

    async fn create_equipment_batch(
        &self,
        input: &CreateEquipmentBatch,
    ) -> ConsoleResult<Vec<Equipment>> {
        let body: BatchBody =
            Self::parse_response(self.request(Method::POST, "equipments").json(input)).await?;
        Ok(body.into_records())
    }

    async fn upload_equipment_image(&self, id: &str, image: &ImageFile) -> ConsoleResult<Equipment> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("image", part);
        let path = format!("equipments/{id}/image");
        Self::parse_response(self.request(Method::POST, &path).multipart(form)).await
    }

    async fn reorder_stages(&self, payload: &ReorderStages) -> ConsoleResult<()> {
        Self::check_status(self.request(Method::PUT, "stages/reorder").json(payload)).await
    }

    async fn list_permissions(&self) -> ConsoleResult<Vec<PermissionGroup>> {
        Self::parse_response(self.request(Method::GET, "permissions")).await
    }
}
