//! ScholarHub client
//!
//! Typed async client for the ScholarHub university resource backend:
//! authentication and session handling, the resource catalog, the loan
//! workflow, the two-stage research approval chain, and role-scoped view
//! composition. Backend payloads are normalized at the API boundary, so
//! everything past [`api`] works with canonical types only.
//!
//! ```no_run
//! use scholarhub_client::{Client, ClientConfig};
//!
//! # async fn run() -> scholarhub_client::Result<()> {
//! let client = Client::new(ClientConfig::load()?)?;
//! client.services.auth.login("ana@uni.edu", "secret").await?;
//! let loans = client.services.loans.visible().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::ClientConfig;
pub use error::{Error, Result};

use std::sync::Arc;

use api::Api;
use http::HttpClient;
use services::Services;
use session::{SessionStore, SessionStorage};

/// Entry point bundling transport, endpoint groups, and services around
/// one shared session
pub struct Client {
    pub config: Arc<ClientConfig>,
    pub session: Arc<SessionStore>,
    pub api: Api,
    pub services: Services,
    http: HttpClient,
}

impl Client {
    /// Client with an in-memory session
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_storage(config, Box::new(session::MemoryStorage::default()))
    }

    /// Client persisting its session through the given backend
    pub fn with_storage(config: ClientConfig, storage: Box<dyn SessionStorage>) -> Result<Self> {
        let session = Arc::new(SessionStore::new(storage));
        let http = HttpClient::new(&config, session.clone())?;
        let api = Api::new(http.clone());
        let services = Services::new(&api, session.clone());
        Ok(Self {
            config: Arc::new(config),
            session,
            api,
            services,
            http,
        })
    }

    /// Resolve a relative `/uploads/...` ref into an absolute URL
    pub fn file_url(&self, file_ref: &str) -> String {
        self.http.file_url(file_ref)
    }
}
