//! Shared domain enums and status state machines
//!
//! The wire protocol speaks Spanish labels; canonical variants are English.
//! Conversions to and from wire labels live here so nothing outside the
//! normalization boundary touches raw strings.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User roles. Assigned server-side; immutable from the client's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "estudiante")]
    Student,
    #[serde(rename = "docente", alias = "profesor")]
    Teacher,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::Student => "estudiante",
            Role::Teacher => "docente",
            Role::Admin => "admin",
        }
    }

    /// Parse a wire label, tolerating case variance
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "estudiante" => Some(Role::Student),
            "docente" | "profesor" => Some(Role::Teacher),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Admin => "Admin",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// Loanable resource categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "libro")]
    Book,
    #[serde(rename = "equipo")]
    Equipment,
    #[serde(rename = "investigacion")]
    Research,
}

impl ResourceKind {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ResourceKind::Book => "libro",
            ResourceKind::Equipment => "equipo",
            ResourceKind::Research => "investigacion",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "libro" => Some(ResourceKind::Book),
            "equipo" => Some(ResourceKind::Equipment),
            "investigacion" => Some(ResourceKind::Research),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResourceKind::Book => "Book",
            ResourceKind::Equipment => "Equipment",
            ResourceKind::Research => "Research",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

/// Loan status labels.
///
/// `Overdue` can arrive from the backend but is never written by the client;
/// the overdue warning is derived from `end_date` at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "vencido")]
    Overdue,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl LoanStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "pendiente",
            LoanStatus::Active => "activo",
            LoanStatus::Completed => "completado",
            LoanStatus::Overdue => "vencido",
            LoanStatus::Cancelled => "cancelado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pendiente" => Some(LoanStatus::Pending),
            "activo" => Some(LoanStatus::Active),
            "completado" => Some(LoanStatus::Completed),
            "vencido" => Some(LoanStatus::Overdue),
            "cancelado" => Some(LoanStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses the client may request from this one.
    ///
    /// `Overdue` is informational; its only outgoing edge re-attempts the
    /// approval path (the backend still stores `activo`).
    pub fn allowed_transitions(&self) -> &'static [LoanStatus] {
        match self {
            LoanStatus::Pending => &[LoanStatus::Active, LoanStatus::Cancelled],
            LoanStatus::Active => &[LoanStatus::Completed],
            LoanStatus::Overdue => &[LoanStatus::Active, LoanStatus::Completed],
            LoanStatus::Completed | LoanStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: LoanStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Active => "Active",
            LoanStatus::Completed => "Completed",
            LoanStatus::Overdue => "Overdue",
            LoanStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ResearchStatus
// ---------------------------------------------------------------------------

/// Research/thesis approval-chain status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResearchStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aprobado_docente")]
    ApprovedByTeacher,
    #[serde(rename = "aprobado_admin")]
    ApprovedByAdmin,
    #[serde(rename = "rechazado")]
    Rejected,
}

impl ResearchStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            ResearchStatus::Pending => "pendiente",
            ResearchStatus::ApprovedByTeacher => "aprobado_docente",
            ResearchStatus::ApprovedByAdmin => "aprobado_admin",
            ResearchStatus::Rejected => "rechazado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pendiente" => Some(ResearchStatus::Pending),
            "aprobado_docente" => Some(ResearchStatus::ApprovedByTeacher),
            "aprobado_admin" => Some(ResearchStatus::ApprovedByAdmin),
            "rechazado" => Some(ResearchStatus::Rejected),
            _ => None,
        }
    }

    /// The approval chain never skips a stage and never moves backward.
    pub fn allowed_transitions(&self) -> &'static [ResearchStatus] {
        match self {
            ResearchStatus::Pending => {
                &[ResearchStatus::ApprovedByTeacher, ResearchStatus::Rejected]
            }
            ResearchStatus::ApprovedByTeacher => {
                &[ResearchStatus::ApprovedByAdmin, ResearchStatus::Rejected]
            }
            ResearchStatus::ApprovedByAdmin | ResearchStatus::Rejected => &[],
        }
    }

    pub fn can_transition_to(&self, target: ResearchStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl std::fmt::Display for ResearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ResearchStatus::Pending => "Pending",
            ResearchStatus::ApprovedByTeacher => "Approved by teacher",
            ResearchStatus::ApprovedByAdmin => "Approved by admin",
            ResearchStatus::Rejected => "Rejected",
        };
        write!(f, "{}", label)
    }
}
