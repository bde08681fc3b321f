//! Loan workflow service
//!
//! Every transition is checked against the allowed edges and the viewer's
//! capabilities before any request leaves the client; illegal ones fail
//! locally without touching the network. Nothing is applied optimistically:
//! each mutation returns the server's stored entity and the caller re-syncs
//! from it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::api::loans::LoanEndpoints;
use crate::api::LoansApi;
use crate::error::{Error, Result};
use crate::models::{CreateLoanRequest, Loan, LoanStatus, LoanStatusUpdate, Role, User};
use crate::session::SessionStore;

use super::permissions::loan_capabilities;

pub struct LoanService<A: LoanEndpoints = LoansApi> {
    api: A,
    session: Arc<SessionStore>,
}

impl<A: LoanEndpoints> LoanService<A> {
    pub fn new(api: A, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    fn viewer(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| Error::Authentication("no signed-in user".into()))
    }

    fn ensure_edge(loan: &Loan, target: LoanStatus) -> Result<()> {
        if !loan.status.can_transition_to(target) {
            return Err(Error::InvalidTransition {
                from: loan.status.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    /// Loans the viewer is allowed to see
    pub async fn visible(&self) -> Result<Vec<Loan>> {
        let viewer = self.viewer()?;
        match viewer.role {
            Role::Admin => self.api.list().await,
            _ => self.api.for_user(viewer.id).await,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Loan> {
        self.api.get(id).await
    }

    /// Request a resource: creates a pending loan for the viewer
    pub async fn request(
        &self,
        resource_id: i64,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Loan> {
        let viewer = self.viewer()?;
        if viewer.role == Role::Admin {
            return Err(Error::Forbidden(
                "loan requests are created by students and teachers".into(),
            ));
        }
        let payload = CreateLoanRequest {
            user_id: viewer.id,
            resource_id,
            start_date,
            end_date,
        };
        payload.validate()?;
        payload.check_dates()?;
        self.api.create(payload).await
    }

    /// Approve a pending request; the start date becomes now
    pub async fn approve(&self, loan: &Loan) -> Result<Loan> {
        let viewer = self.viewer()?;
        let now = Utc::now();
        Self::ensure_edge(loan, LoanStatus::Active)?;
        if !loan_capabilities(&viewer, loan, now).can_approve {
            return Err(Error::Forbidden("only an admin may approve loans".into()));
        }
        let update = LoanStatusUpdate {
            status: LoanStatus::Active,
            loan_date: Some(now),
            return_date: None,
        };
        self.api.update_status(loan.id, update).await
    }

    /// Cancel a pending request (admin or the requester)
    pub async fn cancel(&self, loan: &Loan) -> Result<Loan> {
        let viewer = self.viewer()?;
        Self::ensure_edge(loan, LoanStatus::Cancelled)?;
        if !loan_capabilities(&viewer, loan, Utc::now()).can_cancel {
            return Err(Error::Forbidden(
                "only an admin or the requester may cancel this loan".into(),
            ));
        }
        self.api
            .update_status(loan.id, LoanStatusUpdate::status_only(LoanStatus::Cancelled))
            .await
    }

    /// Mark an active loan returned; the completion date becomes now
    pub async fn complete(&self, loan: &Loan) -> Result<Loan> {
        let viewer = self.viewer()?;
        let now = Utc::now();
        Self::ensure_edge(loan, LoanStatus::Completed)?;
        if !loan_capabilities(&viewer, loan, now).can_complete {
            return Err(Error::Forbidden("only an admin may complete loans".into()));
        }
        let update = LoanStatusUpdate {
            status: LoanStatus::Completed,
            loan_date: None,
            return_date: Some(now),
        };
        self.api.update_status(loan.id, update).await
    }

    /// Re-attempt the approval path for a loan shown as overdue
    pub async fn regularize(&self, loan: &Loan) -> Result<Loan> {
        let viewer = self.viewer()?;
        if !loan_capabilities(&viewer, loan, Utc::now()).can_regularize {
            return Err(Error::Forbidden(
                "only an admin or the requester may regularize this loan".into(),
            ));
        }
        self.api
            .update_status(loan.id, LoanStatusUpdate::status_only(LoanStatus::Active))
            .await
    }
}
