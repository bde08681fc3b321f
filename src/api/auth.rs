//! Authentication endpoints

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::user::{RawLoginResponse, RawUser};
use crate::models::{RegisterUser, User};

/// Login credentials
#[derive(Debug, Serialize)]
pub struct Credentials {
    #[serde(rename = "correo")]
    pub email: String,
    pub password: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthEndpoints: Send + Sync {
    /// Exchange credentials for a bearer token and, when the backend
    /// includes it, the profile
    async fn login(&self, credentials: Credentials) -> Result<(String, Option<User>)>;
    async fn register(&self, payload: RegisterUser) -> Result<User>;
    async fn logout(&self) -> Result<()>;
    /// Fetch the profile for the given user id
    async fn profile(&self, user_id: i64) -> Result<User>;
}

#[derive(Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthEndpoints for AuthApi {
    async fn login(&self, credentials: Credentials) -> Result<(String, Option<User>)> {
        let raw: RawLoginResponse = self.http.post("/auth/login", &credentials).await?;
        raw.into_session()
    }

    async fn register(&self, payload: RegisterUser) -> Result<User> {
        let raw: RawUser = self.http.post("/auth/register", &payload).await?;
        User::try_from(raw)
    }

    async fn logout(&self) -> Result<()> {
        self.http.post_empty_unit("/auth/logout").await
    }

    async fn profile(&self, user_id: i64) -> Result<User> {
        let raw: RawUser = self.http.get(&format!("/usuarios/{}", user_id)).await?;
        User::try_from(raw)
    }
}
