//! Workflow services
//!
//! One service per workflow, each owning the role gates and transition
//! checks for its domain, plus pure helpers for capabilities and view
//! composition. Services talk to the backend through the endpoint traits
//! in [`crate::api`], so tests swap in mocks.

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod permissions;
pub mod research;
pub mod views;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use loans::LoanService;
pub use permissions::{
    loan_capabilities, research_capabilities, resource_capabilities, user_capabilities,
    Capabilities,
};
pub use research::ResearchService;
pub use views::{
    loan_list, research_list, resource_catalog, tutor_request_inbox, user_directory, LoanRow, Row,
};

use std::sync::Arc;

use crate::api::Api;
use crate::session::SessionStore;

/// Container for all workflow services
pub struct Services {
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub loans: LoanService,
    pub research: ResearchService,
}

impl Services {
    pub fn new(api: &Api, session: Arc<SessionStore>) -> Self {
        Self {
            auth: AuthService::new(api.auth.clone(), session.clone()),
            catalog: CatalogService::new(api.resources.clone(), session.clone()),
            loans: LoanService::new(api.loans.clone(), session.clone()),
            research: ResearchService::new(api.research.clone(), session),
        }
    }
}
