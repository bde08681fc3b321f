//! Research/thesis model and normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{Error, Result};

use super::enums::ResearchStatus;
use super::parse_wire_datetime;

/// Canonical research/thesis entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Research {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub year: Option<i32>,
    pub area: Option<String>,
    pub career: Option<String>,
    pub author_id: i64,
    pub author_name: Option<String>,
    /// Assigned tutor (display name); `None` until a teacher accepts
    pub tutor: Option<String>,
    pub status: ResearchStatus,
    /// Relative `/uploads/...` path; resolve with `Client::file_url`
    pub file_ref: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub comments: Option<String>,
}

/// Research payload as the backend sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResearch {
    #[serde(alias = "id")]
    pub id_investigacion: Option<i64>,
    pub titulo: Option<String>,
    pub resumen: Option<String>,
    pub anio: Option<i32>,
    pub area: Option<String>,
    pub carrera: Option<String>,
    pub id_usuario: Option<i64>,
    pub autor: Option<String>,
    pub tutor: Option<String>,
    pub estado: Option<String>,
    #[serde(alias = "archivo_pdf")]
    pub archivo: Option<String>,
    pub fecha_creacion: Option<String>,
    pub fecha_aprobacion: Option<String>,
    pub comentarios: Option<String>,
}

impl TryFrom<RawResearch> for Research {
    type Error = Error;

    fn try_from(raw: RawResearch) -> Result<Self> {
        let id = raw
            .id_investigacion
            .ok_or_else(|| Error::Shape("research payload without id".into()))?;
        let author_id = raw
            .id_usuario
            .ok_or_else(|| Error::Shape(format!("research {} without author id", id)))?;
        // New submissions default to pending review
        let status = match raw.estado.as_deref() {
            None => ResearchStatus::Pending,
            Some(s) => ResearchStatus::parse(s).ok_or_else(|| {
                Error::Shape(format!("research {} has unknown status {:?}", id, s))
            })?,
        };
        Ok(Research {
            id,
            title: raw.titulo.unwrap_or_default(),
            summary: raw.resumen.unwrap_or_default(),
            year: raw.anio,
            area: raw.area,
            career: raw.carrera,
            author_id,
            author_name: raw.autor,
            tutor: raw.tutor,
            status,
            file_ref: raw.archivo,
            created_at: raw.fecha_creacion.as_deref().and_then(parse_wire_datetime),
            approved_at: raw.fecha_aprobacion.as_deref().and_then(parse_wire_datetime),
            comments: raw.comentarios,
        })
    }
}

/// Submission payload; sent as multipart form fields with an optional file
#[derive(Debug, Clone, Validate)]
pub struct CreateResearch {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "summary is required"))]
    pub summary: String,
    #[validate(range(min = 1000, max = 2100, message = "year out of range"))]
    pub year: i32,
    #[validate(length(min = 1, message = "area is required"))]
    pub area: String,
    pub career: Option<String>,
    pub tutor: Option<String>,
}

impl CreateResearch {
    /// Flatten into multipart text fields (wire names)
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("titulo", self.title.clone()),
            ("resumen", self.summary.clone()),
            ("anio", self.year.to_string()),
            ("area", self.area.clone()),
        ];
        if let Some(career) = &self.career {
            fields.push(("carrera", career.clone()));
        }
        if let Some(tutor) = &self.tutor {
            fields.push(("tutor", tutor.clone()));
        }
        fields
    }
}

/// Partial update payload; same multipart encoding as creation
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateResearch {
    pub title: Option<String>,
    pub summary: Option<String>,
    #[validate(range(min = 1000, max = 2100, message = "year out of range"))]
    pub year: Option<i32>,
    pub area: Option<String>,
    pub career: Option<String>,
    pub tutor: Option<String>,
}

impl UpdateResearch {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(("titulo", title.clone()));
        }
        if let Some(summary) = &self.summary {
            fields.push(("resumen", summary.clone()));
        }
        if let Some(year) = self.year {
            fields.push(("anio", year.to_string()));
        }
        if let Some(area) = &self.area {
            fields.push(("area", area.clone()));
        }
        if let Some(career) = &self.career {
            fields.push(("carrera", career.clone()));
        }
        if let Some(tutor) = &self.tutor {
            fields.push(("tutor", tutor.clone()));
        }
        fields
    }
}

/// Uploaded PDF attached to a submission
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Ephemeral tutor request: fire-and-refresh, never stored client-side
#[derive(Debug, Clone, Serialize)]
pub struct TutorRequest {
    pub requested_tutor_id: i64,
}

/// Incoming tutor request listed for a teacher
#[derive(Debug, Clone, Deserialize)]
pub struct RawTutorRequest {
    #[serde(alias = "id")]
    pub id_investigacion: Option<i64>,
    pub titulo: Option<String>,
    pub id_usuario: Option<i64>,
    pub autor: Option<String>,
    pub requested_tutor_id: Option<i64>,
}

/// Canonical incoming tutor request
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTutorRequest {
    pub research_id: i64,
    pub title: String,
    pub author_id: Option<i64>,
    pub author_name: Option<String>,
}

impl TryFrom<RawTutorRequest> for PendingTutorRequest {
    type Error = Error;

    fn try_from(raw: RawTutorRequest) -> Result<Self> {
        Ok(PendingTutorRequest {
            research_id: raw
                .id_investigacion
                .ok_or_else(|| Error::Shape("tutor request without research id".into()))?,
            title: raw.titulo.unwrap_or_default(),
            author_id: raw.id_usuario,
            author_name: raw.autor,
        })
    }
}
