//! Capability computation
//!
//! One pure function per (viewer, entity) pair. Views and services branch
//! on the resulting capability set, never on raw role strings; recomputing
//! on every render keeps permissions from going stale after a role change
//! or re-login.

use chrono::{DateTime, Utc};

use crate::models::{Loan, LoanStatus, Research, ResearchStatus, Resource, Role, User};

/// Actions the viewer may take on one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_approve: bool,
    pub can_reject: bool,
    pub can_cancel: bool,
    pub can_complete: bool,
    pub can_regularize: bool,
    pub can_request_loan: bool,
    pub can_toggle_availability: bool,
    pub can_request_tutor: bool,
}

pub fn loan_capabilities(viewer: &User, loan: &Loan, now: DateTime<Utc>) -> Capabilities {
    let is_admin = viewer.role == Role::Admin;
    let is_requester = loan.user_id == viewer.id;
    let overdue = loan.is_displayed_overdue(now) || loan.status == LoanStatus::Overdue;

    Capabilities {
        can_view: is_admin || is_requester,
        can_approve: is_admin && loan.status.can_transition_to(LoanStatus::Active),
        can_cancel: (is_admin || is_requester)
            && loan.status.can_transition_to(LoanStatus::Cancelled),
        can_complete: is_admin && loan.status.can_transition_to(LoanStatus::Completed),
        can_regularize: (is_admin || is_requester) && overdue,
        ..Capabilities::default()
    }
}

pub fn research_capabilities(viewer: &User, research: &Research) -> Capabilities {
    let is_admin = viewer.role == Role::Admin;
    let is_teacher = viewer.role == Role::Teacher;
    let is_author = research.author_id == viewer.id;
    let pending = research.status == ResearchStatus::Pending;
    // A student may mutate an entry iff they authored it and it is still
    // pending; the same predicate gates the service pre-checks.
    let owner_may_mutate = viewer.role == Role::Student && is_author && pending;

    Capabilities {
        can_view: is_admin || is_teacher || is_author,
        can_edit: is_admin || owner_may_mutate,
        can_delete: is_admin || owner_may_mutate,
        can_approve: (is_teacher && pending)
            || (is_admin && research.status == ResearchStatus::ApprovedByTeacher),
        can_reject: (is_teacher && pending)
            || (is_admin && research.status == ResearchStatus::ApprovedByTeacher),
        can_request_tutor: viewer.role == Role::Student
            && is_author
            && pending
            && research.tutor.is_none(),
        ..Capabilities::default()
    }
}

pub fn resource_capabilities(viewer: &User, resource: &Resource) -> Capabilities {
    let is_admin = viewer.role == Role::Admin;
    let is_teacher = viewer.role == Role::Teacher;

    Capabilities {
        can_view: true,
        can_edit: is_admin,
        can_delete: is_admin,
        can_toggle_availability: is_admin || is_teacher,
        can_request_loan: !is_admin && resource.available,
        ..Capabilities::default()
    }
}

pub fn user_capabilities(viewer: &User, subject: &User) -> Capabilities {
    let is_admin = viewer.role == Role::Admin;
    let is_self = viewer.id == subject.id;
    // Teachers review the records of students assigned to them; the
    // dataset handed to the view is already scoped to those students.
    let teacher_over_student = viewer.role == Role::Teacher && subject.role == Role::Student;

    Capabilities {
        can_view: is_admin || is_self || teacher_over_student,
        can_edit: is_admin || is_self,
        can_delete: is_admin && !is_self,
        ..Capabilities::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(id: i64, role: Role) -> User {
        User {
            id,
            name: "U".into(),
            surname: String::new(),
            email: String::new(),
            role,
            phone: None,
            career: None,
            registered_at: None,
        }
    }

    fn loan(user_id: i64, status: LoanStatus) -> Loan {
        Loan {
            id: 1,
            user_id,
            resource_id: 2,
            status,
            start_date: None,
            end_date: None,
            user: None,
            resource: None,
        }
    }

    fn research(author_id: i64, status: ResearchStatus) -> Research {
        Research {
            id: 1,
            title: "T".into(),
            summary: String::new(),
            year: None,
            area: None,
            career: None,
            author_id,
            author_name: None,
            tutor: None,
            status,
            file_ref: None,
            created_at: None,
            approved_at: None,
            comments: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn only_admin_approves_pending_loans() {
        let pending = loan(5, LoanStatus::Pending);
        assert!(loan_capabilities(&user(1, Role::Admin), &pending, now()).can_approve);
        assert!(!loan_capabilities(&user(5, Role::Student), &pending, now()).can_approve);
        // Requester may still cancel their own pending request
        assert!(loan_capabilities(&user(5, Role::Student), &pending, now()).can_cancel);
        assert!(!loan_capabilities(&user(6, Role::Student), &pending, now()).can_cancel);
    }

    #[test]
    fn terminal_loans_offer_no_actions() {
        for status in [LoanStatus::Completed, LoanStatus::Cancelled] {
            let caps = loan_capabilities(&user(1, Role::Admin), &loan(5, status), now());
            assert!(!caps.can_approve && !caps.can_cancel && !caps.can_complete);
        }
    }

    #[test]
    fn overdue_display_enables_regularize_for_requester() {
        let mut l = loan(5, LoanStatus::Active);
        l.end_date = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert!(loan_capabilities(&user(5, Role::Student), &l, now()).can_regularize);
        assert!(!loan_capabilities(&user(6, Role::Student), &l, now()).can_regularize);
    }

    #[test]
    fn student_mutates_own_research_iff_pending() {
        let author = user(5, Role::Student);
        let own_pending = research(5, ResearchStatus::Pending);
        let caps = research_capabilities(&author, &own_pending);
        assert!(caps.can_edit && caps.can_delete);

        // Same author, advanced status: immutable
        let own_approved = research(5, ResearchStatus::ApprovedByTeacher);
        let caps = research_capabilities(&author, &own_approved);
        assert!(!caps.can_edit && !caps.can_delete);

        // Other author, pending: immutable
        let foreign = research(6, ResearchStatus::Pending);
        let caps = research_capabilities(&author, &foreign);
        assert!(!caps.can_edit && !caps.can_delete && !caps.can_view);
    }

    #[test]
    fn approval_stages_are_role_gated() {
        let teacher = user(2, Role::Teacher);
        let admin = user(3, Role::Admin);

        let pending = research(5, ResearchStatus::Pending);
        assert!(research_capabilities(&teacher, &pending).can_approve);
        assert!(!research_capabilities(&admin, &pending).can_approve);

        let teacher_approved = research(5, ResearchStatus::ApprovedByTeacher);
        assert!(!research_capabilities(&teacher, &teacher_approved).can_approve);
        assert!(research_capabilities(&admin, &teacher_approved).can_approve);

        let done = research(5, ResearchStatus::ApprovedByAdmin);
        assert!(!research_capabilities(&admin, &done).can_approve);
        assert!(!research_capabilities(&admin, &done).can_reject);
    }

    #[test]
    fn tutor_request_only_for_pending_untutored_own_entry() {
        let author = user(5, Role::Student);
        let mut r = research(5, ResearchStatus::Pending);
        assert!(research_capabilities(&author, &r).can_request_tutor);

        r.tutor = Some("Dr. X".into());
        assert!(!research_capabilities(&author, &r).can_request_tutor);
    }

    #[test]
    fn teacher_views_students_but_does_not_manage_them() {
        let teacher = user(2, Role::Teacher);
        let student = user(5, Role::Student);
        let caps = user_capabilities(&teacher, &student);
        assert!(caps.can_view);
        assert!(!caps.can_edit && !caps.can_delete);

        // Other roles stay invisible to a teacher
        assert!(!user_capabilities(&teacher, &user(1, Role::Admin)).can_view);
        assert!(!user_capabilities(&teacher, &user(3, Role::Teacher)).can_view);
    }

    #[test]
    fn availability_toggle_is_staff_only() {
        let resource = Resource {
            id: 1,
            name: "R".into(),
            kind: crate::models::ResourceKind::Book,
            available: true,
            book: None,
            equipment: None,
            research: None,
        };
        assert!(resource_capabilities(&user(1, Role::Admin), &resource).can_toggle_availability);
        assert!(resource_capabilities(&user(2, Role::Teacher), &resource).can_toggle_availability);
        let student = resource_capabilities(&user(3, Role::Student), &resource);
        assert!(!student.can_toggle_availability);
        assert!(student.can_request_loan);
    }
}
