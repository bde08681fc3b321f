//! Typed endpoint-group clients
//!
//! Thin wrappers over [`HttpClient`](crate::http::HttpClient): one module
//! per backend endpoint group, each normalizing wire payloads into the
//! canonical models before returning. Groups that the workflow services
//! build on are seamed with a trait so tests can mock the backend.

pub mod auth;
pub mod dashboard;
pub mod loans;
pub mod research;
pub mod resources;
pub mod users;

pub use auth::{AuthApi, AuthEndpoints};
pub use dashboard::DashboardApi;
pub use loans::{LoanEndpoints, LoansApi};
pub use research::{ResearchApi, ResearchEndpoints};
pub use resources::{ResourceEndpoints, ResourcesApi};
pub use users::UsersApi;

use crate::http::HttpClient;

/// Container for all endpoint groups
#[derive(Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub users: UsersApi,
    pub resources: ResourcesApi,
    pub loans: LoansApi,
    pub research: ResearchApi,
    pub dashboard: DashboardApi,
}

impl Api {
    pub fn new(http: HttpClient) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            users: UsersApi::new(http.clone()),
            resources: ResourcesApi::new(http.clone()),
            loans: LoansApi::new(http.clone()),
            research: ResearchApi::new(http.clone()),
            dashboard: DashboardApi::new(http),
        }
    }
}
