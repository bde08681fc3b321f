//! Resource catalog model and normalization

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use crate::error::{Error, Result};

use super::enums::{ResearchStatus, ResourceKind};

/// Canonical loanable resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    pub kind: ResourceKind,
    pub available: bool,
    /// Populated when `kind == Book`
    pub book: Option<BookDetails>,
    /// Populated when `kind == Equipment`
    pub equipment: Option<EquipmentDetails>,
    /// Populated when `kind == Research`
    pub research: Option<ResearchDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    pub author: Option<String>,
    pub area: Option<String>,
    pub year: Option<i32>,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentDetails {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub specs: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchDetails {
    pub tutor: Option<String>,
    pub career: Option<String>,
    /// Relative `/uploads/...` path; resolve with `Client::file_url`
    pub pdf_path: Option<String>,
    pub approval_status: Option<ResearchStatus>,
}

/// Resource payload as the backend sends it (flat, Spanish field names)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResource {
    #[serde(alias = "id")]
    pub id_recurso: Option<i64>,
    pub nombre: Option<String>,
    pub tipo: Option<String>,
    pub disponibilidad: Option<bool>,
    pub autor: Option<String>,
    pub area: Option<String>,
    pub anio: Option<i32>,
    pub editorial: Option<String>,
    pub isbn: Option<String>,
    pub paginas: Option<i32>,
    pub ubicacion_fisica: Option<String>,
    pub modelo: Option<String>,
    pub numero_serie: Option<String>,
    pub especificaciones: Option<String>,
    pub tutor: Option<String>,
    pub carrera: Option<String>,
    pub archivo_pdf: Option<String>,
    pub estado_investigacion: Option<String>,
}

impl TryFrom<RawResource> for Resource {
    type Error = Error;

    fn try_from(raw: RawResource) -> Result<Self> {
        let id = raw
            .id_recurso
            .ok_or_else(|| Error::Shape("resource payload without id".into()))?;
        let kind = raw
            .tipo
            .as_deref()
            .and_then(ResourceKind::parse)
            .ok_or_else(|| {
                Error::Shape(format!(
                    "resource {} has unknown kind {:?}",
                    id,
                    raw.tipo.as_deref().unwrap_or("<missing>")
                ))
            })?;

        let mut resource = Resource {
            id,
            name: raw.nombre.unwrap_or_default(),
            kind,
            available: raw.disponibilidad.unwrap_or(false),
            book: None,
            equipment: None,
            research: None,
        };
        match kind {
            ResourceKind::Book => {
                resource.book = Some(BookDetails {
                    author: raw.autor,
                    area: raw.area,
                    year: raw.anio,
                    publisher: raw.editorial,
                    isbn: raw.isbn,
                    pages: raw.paginas,
                    location: raw.ubicacion_fisica,
                });
            }
            ResourceKind::Equipment => {
                resource.equipment = Some(EquipmentDetails {
                    model: raw.modelo,
                    serial_number: raw.numero_serie,
                    specs: raw.especificaciones,
                });
            }
            ResourceKind::Research => {
                resource.research = Some(ResearchDetails {
                    tutor: raw.tutor,
                    career: raw.carrera,
                    pdf_path: raw.archivo_pdf,
                    approval_status: raw
                        .estado_investigacion
                        .as_deref()
                        .and_then(ResearchStatus::parse),
                });
            }
        }
        Ok(resource)
    }
}

/// Create payload for catalog entries
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateResource {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(rename = "tipo", serialize_with = "serialize_kind")]
    pub kind: ResourceKind,
    #[serde(rename = "disponibilidad")]
    pub available: Option<bool>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "anio")]
    #[validate(range(min = 1000, max = 2100, message = "year out of range"))]
    pub year: Option<i32>,
    #[serde(rename = "editorial")]
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    #[serde(rename = "paginas")]
    pub pages: Option<i32>,
    #[serde(rename = "ubicacion_fisica")]
    pub location: Option<String>,
    #[serde(rename = "modelo")]
    pub model: Option<String>,
    #[serde(rename = "numero_serie")]
    pub serial_number: Option<String>,
    #[serde(rename = "especificaciones")]
    pub specs: Option<String>,
}

fn serialize_kind<S: serde::Serializer>(
    kind: &ResourceKind,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(kind.as_wire())
}

/// Partial update payload for catalog entries
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateResource {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "disponibilidad")]
    pub available: Option<bool>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
    pub area: Option<String>,
    #[serde(rename = "anio")]
    #[validate(range(min = 1000, max = 2100, message = "year out of range"))]
    pub year: Option<i32>,
    #[serde(rename = "editorial")]
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    #[serde(rename = "paginas")]
    pub pages: Option<i32>,
    #[serde(rename = "ubicacion_fisica")]
    pub location: Option<String>,
    #[serde(rename = "modelo")]
    pub model: Option<String>,
    #[serde(rename = "numero_serie")]
    pub serial_number: Option<String>,
    #[serde(rename = "especificaciones")]
    pub specs: Option<String>,
}

/// Catalog list filters, serialized as query parameters
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub kind: Option<ResourceKind>,
    pub available: Option<bool>,
    pub search: Option<String>,
}

impl ResourceFilter {
    pub fn to_query(&self) -> IndexMap<String, String> {
        let mut query = IndexMap::new();
        if let Some(kind) = self.kind {
            query.insert("tipo".to_string(), kind.as_wire().to_string());
        }
        if let Some(available) = self.available {
            query.insert("disponibilidad".to_string(), available.to_string());
        }
        if let Some(search) = &self.search {
            query.insert("q".to_string(), search.clone());
        }
        query
    }
}
