//! Dashboard read models
//!
//! Dashboards are computed by the backend and rendered as-is; the client
//! only flattens the layout variance the backend has shipped over time.

use serde::Deserialize;

/// Admin dashboard metrics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminMetrics {
    pub total_users: u64,
    #[serde(rename = "roles")]
    pub users_by_role: std::collections::HashMap<String, u64>,
    pub total_resources: u64,
    pub available_resources: u64,
    pub resources_by_status: ResourcesByStatus,
    pub active_loans: u64,
    pub loans_due_soon: u64,
    pub pending_requests: u64,
    pub urgent_requests: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcesByStatus {
    pub available: u64,
    pub on_loan: u64,
    pub maintenance: u64,
}

/// Teacher dashboard metrics, normalized from either the flat or the
/// nested wire layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeacherMetrics {
    pub theses_supervised: u64,
    pub theses_completed: u64,
    pub students: u64,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTeacherMetrics {
    #[serde(rename = "tesisACargo")]
    tesis_a_cargo: Option<u64>,
    #[serde(rename = "tesisCompletadas")]
    tesis_completadas: Option<u64>,
    students: Option<CountOrGroup>,
    theses: Option<ThesesGroup>,
    projects: Vec<Project>,
}

/// `students` arrives as a bare count or as `{count}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CountOrGroup {
    Count(u64),
    Group { count: Option<u64> },
}

impl CountOrGroup {
    fn count(&self) -> u64 {
        match self {
            CountOrGroup::Count(n) => *n,
            CountOrGroup::Group { count } => count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ThesesGroup {
    count: Option<u64>,
    completed: Option<u64>,
}

impl From<RawTeacherMetrics> for TeacherMetrics {
    fn from(raw: RawTeacherMetrics) -> Self {
        let theses = raw.theses.unwrap_or_default();
        TeacherMetrics {
            theses_supervised: raw.tesis_a_cargo.or(theses.count).unwrap_or(0),
            theses_completed: raw.tesis_completadas.or(theses.completed).unwrap_or(0),
            students: raw.students.map(|s| s.count()).unwrap_or(0),
            projects: raw.projects,
        }
    }
}

/// Student dashboard metrics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentMetrics {
    pub active_loans: u64,
    pub projects_in_course: u64,
    pub next_due: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_teacher_layout_normalizes() {
        let raw: RawTeacherMetrics = serde_json::from_str(
            r#"{"tesisACargo": 4, "tesisCompletadas": 2, "students": 9,
                "projects": [{"id": 1, "name": "P", "estado": "activo"}]}"#,
        )
        .unwrap();
        let metrics = TeacherMetrics::from(raw);
        assert_eq!(metrics.theses_supervised, 4);
        assert_eq!(metrics.theses_completed, 2);
        assert_eq!(metrics.students, 9);
        assert_eq!(metrics.projects.len(), 1);
    }

    #[test]
    fn nested_teacher_layout_normalizes() {
        let raw: RawTeacherMetrics = serde_json::from_str(
            r#"{"theses": {"count": 7, "completed": 3}, "students": {"count": 12}}"#,
        )
        .unwrap();
        let metrics = TeacherMetrics::from(raw);
        assert_eq!(metrics.theses_supervised, 7);
        assert_eq!(metrics.theses_completed, 3);
        assert_eq!(metrics.students, 12);
        assert!(metrics.projects.is_empty());
    }

    #[test]
    fn admin_metrics_tolerate_missing_fields() {
        let metrics: AdminMetrics = serde_json::from_str(
            r#"{"totalUsers": 40, "resourcesByStatus": {"onLoan": 5}}"#,
        )
        .unwrap();
        assert_eq!(metrics.total_users, 40);
        assert_eq!(metrics.resources_by_status.on_loan, 5);
        assert_eq!(metrics.active_loans, 0);
    }

    #[test]
    fn student_metrics_decode() {
        let metrics: StudentMetrics = serde_json::from_str(
            r#"{"activeLoans": 2, "projectsInCourse": 1, "nextDue": "2024-09-01"}"#,
        )
        .unwrap();
        assert_eq!(metrics.active_loans, 2);
        assert_eq!(metrics.next_due.as_deref(), Some("2024-09-01"));
    }
}
