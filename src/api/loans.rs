//! Loan endpoints
//!
//! Loans expose no delete; the only mutations are creation and the
//! status-only update.

use async_trait::async_trait;

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::loan::RawLoan;
use crate::models::{CreateLoanRequest, Loan, LoanStatusUpdate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanEndpoints: Send + Sync {
    async fn list(&self) -> Result<Vec<Loan>>;
    async fn get(&self, id: i64) -> Result<Loan>;
    async fn for_user(&self, user_id: i64) -> Result<Vec<Loan>>;
    async fn create(&self, payload: CreateLoanRequest) -> Result<Loan>;
    /// The server's stored entity comes back and is the only truth the
    /// caller may apply
    async fn update_status(&self, id: i64, update: LoanStatusUpdate) -> Result<Loan>;
}

#[derive(Clone)]
pub struct LoansApi {
    http: HttpClient,
}

impl LoansApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl LoanEndpoints for LoansApi {
    async fn list(&self) -> Result<Vec<Loan>> {
        let raw: Vec<RawLoan> = self.http.get("/prestamos").await?;
        raw.into_iter().map(Loan::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<Loan> {
        let raw: RawLoan = self.http.get(&format!("/prestamos/{}", id)).await?;
        Loan::try_from(raw)
    }

    async fn for_user(&self, user_id: i64) -> Result<Vec<Loan>> {
        let raw: Vec<RawLoan> = self
            .http
            .get(&format!("/prestamos/usuario/{}", user_id))
            .await?;
        raw.into_iter().map(Loan::try_from).collect()
    }

    async fn create(&self, payload: CreateLoanRequest) -> Result<Loan> {
        let raw: RawLoan = self.http.post("/prestamos", &payload).await?;
        Loan::try_from(raw)
    }

    async fn update_status(&self, id: i64, update: LoanStatusUpdate) -> Result<Loan> {
        let raw: RawLoan = self.http.put(&format!("/prestamos/{}", id), &update).await?;
        Loan::try_from(raw)
    }
}
