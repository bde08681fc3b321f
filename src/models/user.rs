//! User model and normalization

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::error::{Error, Result};

use super::enums::Role;
use super::parse_wire_datetime;

/// Canonical user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub career: Option<String>,
    pub registered_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// User payload as the backend sends it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(alias = "id", alias = "idUsuario")]
    pub id_usuario: Option<i64>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
    #[serde(alias = "role")]
    pub rol: Option<String>,
    pub telefono: Option<String>,
    pub carrera: Option<String>,
    pub fecha_registro: Option<String>,
}

impl TryFrom<RawUser> for User {
    type Error = Error;

    fn try_from(raw: RawUser) -> Result<Self> {
        let id = raw
            .id_usuario
            .ok_or_else(|| Error::Shape("user payload without id".into()))?;
        let role = raw
            .rol
            .as_deref()
            .and_then(Role::parse)
            .ok_or_else(|| {
                Error::Shape(format!(
                    "user {} has unknown role {:?}",
                    id,
                    raw.rol.as_deref().unwrap_or("<missing>")
                ))
            })?;
        Ok(User {
            id,
            name: raw.nombre.unwrap_or_default(),
            surname: raw.apellido.unwrap_or_default(),
            email: raw.correo.unwrap_or_default(),
            role,
            phone: raw.telefono,
            career: raw.carrera,
            registered_at: raw.fecha_registro.as_deref().and_then(parse_wire_datetime),
        })
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterUser {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(rename = "apellido")]
    #[validate(length(min = 1, message = "surname is required"))]
    pub surname: String,
    #[serde(rename = "correo")]
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(rename = "rol", serialize_with = "serialize_role")]
    pub role: Role,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

fn serialize_role<S: serde::Serializer>(role: &Role, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(role.as_wire())
}

/// Partial update payload (admin edits)
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateUser {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "apellido")]
    pub surname: Option<String>,
    #[serde(rename = "correo")]
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "carrera")]
    pub career: Option<String>,
}

/// Login response in any of the shapes the backend has shipped
#[derive(Debug, Default, Deserialize)]
pub struct RawLoginResponse {
    pub token: Option<String>,
    #[serde(rename = "accessToken")]
    pub access_token: Option<String>,
    pub user: Option<RawUser>,
    #[serde(rename = "userData")]
    pub user_data: Option<RawUser>,
    pub data: Option<RawLoginData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawLoginData {
    pub token: Option<String>,
    pub user: Option<RawUser>,
}

impl RawLoginResponse {
    /// Extract the bearer token and profile, wherever they landed.
    /// A response without a token is an authentication failure.
    pub fn into_session(self) -> Result<(String, Option<User>)> {
        let nested = self.data.unwrap_or_default();
        let token = self
            .token
            .or(self.access_token)
            .or(nested.token)
            .ok_or_else(|| Error::Authentication("login response carried no token".into()))?;
        let user = self
            .user
            .or(nested.user)
            .or(self.user_data)
            .map(User::try_from)
            .transpose()?;
        Ok((token, user))
    }
}
