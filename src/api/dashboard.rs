//! Dashboard endpoints (read-only aggregates, rendered as-is)

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::dashboard::{AdminMetrics, RawTeacherMetrics, StudentMetrics, TeacherMetrics};

#[derive(Clone)]
pub struct DashboardApi {
    http: HttpClient,
}

impl DashboardApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn admin(&self) -> Result<AdminMetrics> {
        self.http.get("/dashboard/admin").await
    }

    pub async fn teacher(&self, teacher_id: i64) -> Result<TeacherMetrics> {
        let raw: RawTeacherMetrics = self
            .http
            .get(&format!("/dashboard/teacher/{}", teacher_id))
            .await?;
        Ok(raw.into())
    }

    pub async fn student(&self, student_id: i64) -> Result<StudentMetrics> {
        self.http
            .get(&format!("/dashboard/student/{}", student_id))
            .await
    }
}
