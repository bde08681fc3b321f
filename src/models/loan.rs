//! Loan model and normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::error::{Error, Result};

use super::enums::{LoanStatus, ResourceKind, Role};
use super::parse_wire_datetime;

/// Canonical loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub user_id: i64,
    pub resource_id: i64,
    pub status: LoanStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Embedded requester summary when the backend expands it
    pub user: Option<LoanUser>,
    /// Embedded resource summary when the backend expands it
    pub resource: Option<LoanResource>,
}

impl Loan {
    /// Display-only overdue warning. The stored status is never changed by
    /// the client; `vencido` is the backend's business.
    pub fn is_displayed_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Active
            && self.end_date.map(|end| end < now).unwrap_or(false)
    }
}

/// Requester summary embedded in loan payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanUser {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub career: Option<String>,
    pub role: Option<Role>,
}

/// Resource summary embedded in loan payloads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanResource {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub kind: Option<ResourceKind>,
    pub author: Option<String>,
    pub available: Option<bool>,
}

/// Loan payload as the backend sends it.
///
/// The start date arrives as either `fecha_inicio` or the legacy
/// `fecha_prestamo`, the end date as either `fecha_fin` or the legacy
/// `fecha_devolucion`. The explicit field wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLoan {
    #[serde(alias = "id")]
    pub id_prestamo: Option<i64>,
    pub id_usuario: Option<i64>,
    pub id_recurso: Option<i64>,
    pub estado: Option<String>,
    pub fecha_inicio: Option<String>,
    pub fecha_prestamo: Option<String>,
    pub fecha_fin: Option<String>,
    pub fecha_devolucion: Option<String>,
    pub usuario: Option<RawLoanUser>,
    pub recurso: Option<RawLoanResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLoanUser {
    pub id_usuario: Option<i64>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
    pub carrera: Option<String>,
    pub rol: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLoanResource {
    pub id_recurso: Option<i64>,
    pub nombre: Option<String>,
    pub tipo: Option<String>,
    pub autor: Option<String>,
    pub disponibilidad: Option<bool>,
}

impl TryFrom<RawLoan> for Loan {
    type Error = Error;

    fn try_from(raw: RawLoan) -> Result<Self> {
        let id = raw
            .id_prestamo
            .ok_or_else(|| Error::Shape("loan payload without id".into()))?;
        let user_id = raw
            .id_usuario
            .or(raw.usuario.as_ref().and_then(|u| u.id_usuario))
            .ok_or_else(|| Error::Shape(format!("loan {} without user id", id)))?;
        let resource_id = raw
            .id_recurso
            .or(raw.recurso.as_ref().and_then(|r| r.id_recurso))
            .ok_or_else(|| Error::Shape(format!("loan {} without resource id", id)))?;
        // A missing status is treated as a freshly created request
        let status = match raw.estado.as_deref() {
            None => LoanStatus::Pending,
            Some(s) => LoanStatus::parse(s)
                .ok_or_else(|| Error::Shape(format!("loan {} has unknown status {:?}", id, s)))?,
        };

        let start_date = raw
            .fecha_inicio
            .as_deref()
            .or(raw.fecha_prestamo.as_deref())
            .and_then(parse_wire_datetime);
        let end_date = raw
            .fecha_fin
            .as_deref()
            .or(raw.fecha_devolucion.as_deref())
            .and_then(parse_wire_datetime);

        Ok(Loan {
            id,
            user_id,
            resource_id,
            status,
            start_date,
            end_date,
            user: raw.usuario.map(|u| LoanUser {
                id: u.id_usuario,
                name: u.nombre,
                surname: u.apellido,
                email: u.correo,
                career: u.carrera,
                role: u.rol.as_deref().and_then(Role::parse),
            }),
            resource: raw.recurso.map(|r| LoanResource {
                id: r.id_recurso,
                name: r.nombre,
                kind: r.tipo.as_deref().and_then(ResourceKind::parse),
                author: r.autor,
                available: r.disponibilidad,
            }),
        })
    }
}

/// Create payload: a student/teacher requesting a resource
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateLoanRequest {
    #[serde(rename = "id_usuario")]
    pub user_id: i64,
    #[serde(rename = "id_recurso")]
    pub resource_id: i64,
    #[serde(rename = "fecha_inicio")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "fecha_fin")]
    pub end_date: Option<DateTime<Utc>>,
}

impl CreateLoanRequest {
    /// The requested range must not be inverted
    pub fn check_dates(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(Error::Validation(
                    "loan end date precedes start date".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Status-only update, the single mutation the backend accepts for loans
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct LoanStatusUpdate {
    #[serde(rename = "estado", serialize_with = "serialize_status")]
    pub status: LoanStatus,
    #[serde(rename = "fecha_prestamo")]
    pub loan_date: Option<DateTime<Utc>>,
    #[serde(rename = "fecha_devolucion")]
    pub return_date: Option<DateTime<Utc>>,
}

fn serialize_status<S: serde::Serializer>(
    status: &LoanStatus,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(status.as_wire())
}

impl LoanStatusUpdate {
    pub fn status_only(status: LoanStatus) -> Self {
        Self {
            status,
            loan_date: None,
            return_date: None,
        }
    }
}
