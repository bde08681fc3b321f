//! Role-filtered view composition
//!
//! Pure functions: (viewer, dataset) in, visible rows with capability sets
//! out. Nothing here is cached; callers recompute on every render, so two
//! calls with identical inputs always produce identical rows.

use chrono::{DateTime, Utc};

use crate::models::research::PendingTutorRequest;
use crate::models::{Loan, Research, Resource, Role, User};

use super::permissions::{
    loan_capabilities, research_capabilities, resource_capabilities, user_capabilities,
    Capabilities,
};

/// One visible row: the entity plus what the viewer may do with it
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    pub entity: T,
    pub capabilities: Capabilities,
}

/// Loan row with the derived overdue warning
#[derive(Debug, Clone, PartialEq)]
pub struct LoanRow {
    pub loan: Loan,
    pub capabilities: Capabilities,
    /// Presentational only; the stored status is untouched
    pub displayed_overdue: bool,
}

/// Students see their own loans; admins see everything
pub fn loan_list(viewer: &User, loans: &[Loan], now: DateTime<Utc>) -> Vec<LoanRow> {
    loans
        .iter()
        .filter(|loan| viewer.role == Role::Admin || loan.user_id == viewer.id)
        .map(|loan| LoanRow {
            loan: loan.clone(),
            capabilities: loan_capabilities(viewer, loan, now),
            displayed_overdue: loan.is_displayed_overdue(now),
        })
        .collect()
}

/// Students see their own entries; teachers and admins review everything
pub fn research_list(viewer: &User, entries: &[Research]) -> Vec<Row<Research>> {
    entries
        .iter()
        .filter(|entry| research_capabilities(viewer, entry).can_view)
        .map(|entry| Row {
            entity: entry.clone(),
            capabilities: research_capabilities(viewer, entry),
        })
        .collect()
}

/// The catalog is visible to everyone; actions vary by role
pub fn resource_catalog(viewer: &User, resources: &[Resource]) -> Vec<Row<Resource>> {
    resources
        .iter()
        .map(|resource| Row {
            entity: resource.clone(),
            capabilities: resource_capabilities(viewer, resource),
        })
        .collect()
}

/// Admins see the whole directory; teachers themselves plus the students
/// in the dataset (callers feed them their assigned students); everyone
/// else only themselves
pub fn user_directory(viewer: &User, users: &[User]) -> Vec<Row<User>> {
    users
        .iter()
        .filter(|subject| user_capabilities(viewer, subject).can_view)
        .map(|subject| Row {
            entity: subject.clone(),
            capabilities: user_capabilities(viewer, subject),
        })
        .collect()
}

/// Tutor requests are a teacher-only inbox
pub fn tutor_request_inbox(
    viewer: &User,
    requests: &[PendingTutorRequest],
) -> Vec<PendingTutorRequest> {
    if viewer.role != Role::Teacher {
        return Vec::new();
    }
    requests.to_vec()
}
