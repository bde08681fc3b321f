//! HTTP transport for the ScholarHub API
//!
//! Two cross-cutting contracts live here: the bearer token from the current
//! session is attached to every request when present, and multipart bodies
//! never carry an explicit content-type so reqwest can set the boundary
//! itself. Non-2xx responses are decoded into the backend's error payload
//! and carried verbatim.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{BackendErrorBody, Error, Result};
use crate::session::SessionStore;

/// The typed request core every endpoint wrapper goes through
#[derive(Clone)]
pub struct HttpClient {
    /// API root: `<host>/api`
    base: String,
    /// Bare host, used to resolve relative `/uploads/...` refs
    host: String,
    inner: reqwest::Client,
    session: Arc<SessionStore>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let host = config.api.url.trim_end_matches('/').to_string();
        let inner = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;
        Ok(Self {
            base: format!("{}/api", host),
            host,
            inner,
            session,
        })
    }

    /// Resolve a relative `/uploads/...` ref against the API host
    pub fn file_url(&self, file_ref: &str) -> String {
        if file_ref.starts_with("http://") || file_ref.starts_with("https://") {
            return file_ref.to_string();
        }
        format!("{}/{}", self.host, file_ref.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));
        tracing::debug!(%method, %url, "api request");
        let builder = self.inner.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.request(Method::GET, path).send().await?;
        Self::decode(resp).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resp = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(resp).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(resp).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let resp = self.request(Method::PUT, path).json(body).send().await?;
        Self::decode(resp).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.request(Method::PATCH, path).send().await?;
        Self::decode(resp).await
    }

    /// POST a multipart form. No content-type is set here; the transport
    /// derives it, boundary included, from the form itself.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let resp = self.request(Method::POST, path).multipart(form).send().await?;
        Self::decode(resp).await
    }

    /// PUT a multipart form, same content-type rule as `post_multipart`
    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let resp = self.request(Method::PUT, path).multipart(form).send().await?;
        Self::decode(resp).await
    }

    // Variants for endpoints whose response body carries nothing the
    // client uses; the caller re-fetches instead of trusting it.

    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self.request(Method::POST, path).json(body).send().await?;
        Self::check(resp).await.map(drop)
    }

    pub async fn post_empty_unit(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::POST, path).send().await?;
        Self::check(resp).await.map(drop)
    }

    pub async fn put_empty_unit(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::PUT, path).send().await?;
        Self::check(resp).await.map(drop)
    }

    pub async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let resp = self.request(Method::PATCH, path).json(body).send().await?;
        Self::check(resp).await.map(drop)
    }

    pub async fn delete_unit(&self, path: &str) -> Result<()> {
        let resp = self.request(Method::DELETE, path).send().await?;
        Self::check(resp).await.map(drop)
    }

    /// Turn a non-success response into the backend's verbatim error
    async fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_default();
        let body: BackendErrorBody = serde_json::from_str(&text).unwrap_or_default();
        tracing::warn!(status = %status, message = body.display_message().unwrap_or(""), "backend rejected request");
        Err(Self::map_error(status, body))
    }

    /// A body carrying a blocking-loan list keeps its structure whatever
    /// the status class, so `Error::blocking_loans` always sees it.
    fn map_error(status: StatusCode, body: BackendErrorBody) -> Error {
        let message = body
            .display_message()
            .unwrap_or("request failed")
            .to_string();
        if !body.prestamos_blocking.is_empty() {
            return Error::Backend {
                status: status.as_u16(),
                message,
                body,
            };
        }
        match status {
            StatusCode::UNAUTHORIZED => Error::Authentication(message),
            StatusCode::FORBIDDEN => Error::Forbidden(message),
            StatusCode::NOT_FOUND => Error::NotFound(message),
            _ => Error::Backend {
                status: status.as_u16(),
                message,
                body,
            },
        }
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let resp = Self::check(resp).await?;
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> HttpClient {
        HttpClient::new(
            &ClientConfig::for_host(host),
            Arc::new(SessionStore::in_memory()),
        )
        .unwrap()
    }

    #[test]
    fn api_root_has_no_double_slash() {
        let c = client("http://localhost:4000///");
        assert_eq!(c.base, "http://localhost:4000/api");
    }

    #[test]
    fn upload_refs_resolve_against_host_not_api_root() {
        let c = client("http://uni.example");
        assert_eq!(
            c.file_url("/uploads/tesis.pdf"),
            "http://uni.example/uploads/tesis.pdf"
        );
        assert_eq!(
            c.file_url("uploads/tesis.pdf"),
            "http://uni.example/uploads/tesis.pdf"
        );
        // Absolute refs pass through
        assert_eq!(
            c.file_url("https://cdn.example/x.pdf"),
            "https://cdn.example/x.pdf"
        );
    }

    #[test]
    fn statuses_map_to_the_error_taxonomy() {
        let plain = |msg: &str| BackendErrorBody {
            error: Some(msg.to_string()),
            ..BackendErrorBody::default()
        };
        assert!(matches!(
            HttpClient::map_error(StatusCode::UNAUTHORIZED, plain("expired")),
            Error::Authentication(_)
        ));
        assert!(matches!(
            HttpClient::map_error(StatusCode::FORBIDDEN, plain("no")),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            HttpClient::map_error(StatusCode::NOT_FOUND, plain("gone")),
            Error::NotFound(_)
        ));
        assert!(matches!(
            HttpClient::map_error(StatusCode::CONFLICT, plain("busy")),
            Error::Backend { status: 409, .. }
        ));
    }

    #[test]
    fn blocking_loans_survive_any_status_class() {
        let body: BackendErrorBody = serde_json::from_str(
            r#"{"error": "préstamos activos",
                "prestamos_blocking": [{"id_prestamo": 3, "id_usuario": 8}]}"#,
        )
        .unwrap();
        let err = HttpClient::map_error(StatusCode::FORBIDDEN, body);
        assert_eq!(err.blocking_loans().len(), 1);
        assert_eq!(err.blocking_loans()[0].id_prestamo, Some(3));
    }
}
