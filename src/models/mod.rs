//! Canonical entity types and the normalization boundary
//!
//! Backend payloads arrive with Spanish field names and, for some fields,
//! more than one historical spelling. Each entity module owns a `Raw*` wire
//! shape and a conversion into the canonical type; no raw payload flows past
//! this boundary.

pub mod dashboard;
pub mod enums;
pub mod loan;
pub mod research;
pub mod resource;
pub mod user;

pub use dashboard::{AdminMetrics, Project, StudentMetrics, TeacherMetrics};
pub use enums::{LoanStatus, ResearchStatus, ResourceKind, Role};
pub use loan::{CreateLoanRequest, Loan, LoanStatusUpdate};
pub use research::{
    CreateResearch, FileAttachment, PendingTutorRequest, Research, TutorRequest, UpdateResearch,
};
pub use resource::{CreateResource, Resource, ResourceFilter, UpdateResource};
pub use user::{RegisterUser, UpdateUser, User};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parse a wire date that may be a full RFC 3339 timestamp or a bare
/// `YYYY-MM-DD` day
pub(crate) fn parse_wire_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_wire_date_layouts() {
        let day = parse_wire_datetime("2024-01-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let stamp = parse_wire_datetime("2024-06-15T10:30:00.000Z").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2024-06-15T10:30:00+00:00");

        assert!(parse_wire_datetime("not a date").is_none());
    }
}
