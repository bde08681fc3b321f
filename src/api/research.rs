//! Research/thesis endpoints
//!
//! Create and update are multipart (optional PDF attached); status
//! transitions are bare PUTs against action sub-routes and the caller
//! re-fetches afterwards.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::research::{PendingTutorRequest, RawResearch, RawTutorRequest};
use crate::models::{CreateResearch, FileAttachment, Research, TutorRequest, UpdateResearch};

#[derive(Debug, serde::Serialize)]
struct AssignTutorBody {
    /// `None` declines the request and clears it server-side
    tutor_id: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResearchEndpoints: Send + Sync {
    async fn list(&self) -> Result<Vec<Research>>;
    /// Entries authored by the current token's bearer
    async fn mine(&self) -> Result<Vec<Research>>;
    async fn get(&self, id: i64) -> Result<Research>;
    async fn create(
        &self,
        payload: CreateResearch,
        file: Option<FileAttachment>,
    ) -> Result<Research>;
    async fn update(
        &self,
        id: i64,
        payload: UpdateResearch,
        file: Option<FileAttachment>,
    ) -> Result<Research>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn approve_by_teacher(&self, id: i64) -> Result<()>;
    async fn approve_by_admin(&self, id: i64) -> Result<()>;
    async fn reject(&self, id: i64) -> Result<()>;
    async fn request_tutor(&self, id: i64, request: TutorRequest) -> Result<()>;
    async fn assign_tutor(&self, id: i64, tutor_id: Option<i64>) -> Result<()>;
    /// Tutor requests addressed to the current teacher
    async fn tutor_requests(&self) -> Result<Vec<PendingTutorRequest>>;
}

#[derive(Clone)]
pub struct ResearchApi {
    http: HttpClient,
}

impl ResearchApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn build_form(fields: Vec<(&'static str, String)>, file: Option<FileAttachment>) -> Form {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(file) = file {
            form = form.part(
                "archivo",
                Part::bytes(file.content).file_name(file.file_name),
            );
        }
        form
    }
}

#[async_trait]
impl ResearchEndpoints for ResearchApi {
    async fn list(&self) -> Result<Vec<Research>> {
        let raw: Vec<RawResearch> = self.http.get("/investigaciones").await?;
        raw.into_iter().map(Research::try_from).collect()
    }

    async fn mine(&self) -> Result<Vec<Research>> {
        let raw: Vec<RawResearch> = self
            .http
            .get("/investigaciones/misinvestigaciones")
            .await?;
        raw.into_iter().map(Research::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<Research> {
        let raw: RawResearch = self.http.get(&format!("/investigaciones/{}", id)).await?;
        Research::try_from(raw)
    }

    async fn create(
        &self,
        payload: CreateResearch,
        file: Option<FileAttachment>,
    ) -> Result<Research> {
        let form = Self::build_form(payload.form_fields(), file);
        let raw: RawResearch = self.http.post_multipart("/investigaciones", form).await?;
        Research::try_from(raw)
    }

    async fn update(
        &self,
        id: i64,
        payload: UpdateResearch,
        file: Option<FileAttachment>,
    ) -> Result<Research> {
        let form = Self::build_form(payload.form_fields(), file);
        let raw: RawResearch = self
            .http
            .put_multipart(&format!("/investigaciones/{}", id), form)
            .await?;
        Research::try_from(raw)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.http
            .delete_unit(&format!("/investigaciones/{}", id))
            .await
    }

    async fn approve_by_teacher(&self, id: i64) -> Result<()> {
        self.http
            .put_empty_unit(&format!("/investigaciones/{}/aprobar-docente", id))
            .await
    }

    async fn approve_by_admin(&self, id: i64) -> Result<()> {
        self.http
            .put_empty_unit(&format!("/investigaciones/{}/aprobar-admin", id))
            .await
    }

    async fn reject(&self, id: i64) -> Result<()> {
        self.http
            .put_empty_unit(&format!("/investigaciones/{}/rechazar", id))
            .await
    }

    async fn request_tutor(&self, id: i64, request: TutorRequest) -> Result<()> {
        self.http
            .post_unit(&format!("/investigaciones/{}/request-tutor", id), &request)
            .await
    }

    async fn assign_tutor(&self, id: i64, tutor_id: Option<i64>) -> Result<()> {
        self.http
            .patch_unit(
                &format!("/investigaciones/{}/assign-tutor", id),
                &AssignTutorBody { tutor_id },
            )
            .await
    }

    async fn tutor_requests(&self) -> Result<Vec<PendingTutorRequest>> {
        let raw: Vec<RawTutorRequest> = self
            .http
            .get("/investigaciones/solicitudes/tutor")
            .await?;
        raw.into_iter().map(PendingTutorRequest::try_from).collect()
    }
}
