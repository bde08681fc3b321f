//! Research approval workflow
//!
//! Two-stage chain: a teacher reviews first, then an admin. Transition
//! endpoints return no body, so after each one the service re-fetches the
//! entry and returns the server's stored state. The tutor sub-flow
//! (request, accept, decline) never touches the approval status.

use std::sync::Arc;

use validator::Validate;

use crate::api::research::ResearchEndpoints;
use crate::api::ResearchApi;
use crate::error::{Error, Result};
use crate::models::research::PendingTutorRequest;
use crate::models::{
    CreateResearch, FileAttachment, Research, ResearchStatus, Role, TutorRequest, UpdateResearch,
    User,
};
use crate::session::SessionStore;

use super::permissions::research_capabilities;

pub struct ResearchService<A: ResearchEndpoints = ResearchApi> {
    api: A,
    session: Arc<SessionStore>,
}

impl<A: ResearchEndpoints> ResearchService<A> {
    pub fn new(api: A, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    fn viewer(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| Error::Authentication("no signed-in user".into()))
    }

    /// Entries the viewer may see: authors their own, reviewers everything
    pub async fn visible(&self) -> Result<Vec<Research>> {
        let viewer = self.viewer()?;
        match viewer.role {
            Role::Student => self.api.mine().await,
            _ => self.api.list().await,
        }
    }

    pub async fn get(&self, id: i64) -> Result<Research> {
        self.api.get(id).await
    }

    /// Submit a new entry, optionally attaching a PDF and requesting a
    /// tutor in the same step. The tutor request is best-effort: a failure
    /// there does not undo the submission.
    pub async fn submit(
        &self,
        payload: CreateResearch,
        file: Option<FileAttachment>,
        requested_tutor_id: Option<i64>,
    ) -> Result<Research> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Student {
            return Err(Error::Forbidden(
                "research entries are submitted by students".into(),
            ));
        }
        payload.validate()?;
        let created = self.api.create(payload, file).await?;
        if let Some(tutor_id) = requested_tutor_id {
            if let Err(e) = self
                .api
                .request_tutor(
                    created.id,
                    TutorRequest {
                        requested_tutor_id: tutor_id,
                    },
                )
                .await
            {
                tracing::warn!(research = created.id, "tutor request failed: {}", e);
            }
        }
        Ok(created)
    }

    pub async fn edit(
        &self,
        research: &Research,
        payload: UpdateResearch,
        file: Option<FileAttachment>,
    ) -> Result<Research> {
        let viewer = self.viewer()?;
        if !research_capabilities(&viewer, research).can_edit {
            return Err(Error::Forbidden("entry is not editable by you".into()));
        }
        payload.validate()?;
        self.api.update(research.id, payload, file).await
    }

    /// Delete an entry. A backend refusal over linked loans is passed
    /// through untouched so callers can list the blocking loans.
    pub async fn remove(&self, research: &Research) -> Result<()> {
        let viewer = self.viewer()?;
        if !research_capabilities(&viewer, research).can_delete {
            return Err(Error::Forbidden("entry is not deletable by you".into()));
        }
        self.api.delete(research.id).await
    }

    /// Advance the entry one stage along the approval chain
    pub async fn approve(&self, research: &Research) -> Result<Research> {
        let viewer = self.viewer()?;
        let can_approve = research_capabilities(&viewer, research).can_approve;
        match research.status {
            ResearchStatus::Pending | ResearchStatus::ApprovedByTeacher if !can_approve => {
                return Err(Error::Forbidden(
                    "this approval stage belongs to another role".into(),
                ));
            }
            ResearchStatus::Pending => self.api.approve_by_teacher(research.id).await?,
            ResearchStatus::ApprovedByTeacher => self.api.approve_by_admin(research.id).await?,
            _ => {
                return Err(Error::InvalidTransition {
                    from: research.status.to_string(),
                    to: "next approval stage".into(),
                });
            }
        }
        self.api.get(research.id).await
    }

    /// Reject the entry at its current stage
    pub async fn reject(&self, research: &Research) -> Result<Research> {
        let viewer = self.viewer()?;
        if !research_capabilities(&viewer, research).can_reject {
            return Err(Error::Forbidden(
                "this entry cannot be rejected by you at its current stage".into(),
            ));
        }
        self.api.reject(research.id).await?;
        self.api.get(research.id).await
    }

    /// Ask a teacher to tutor the entry
    pub async fn request_tutor(&self, research: &Research, tutor_id: i64) -> Result<()> {
        let viewer = self.viewer()?;
        if !research_capabilities(&viewer, research).can_request_tutor {
            return Err(Error::Forbidden(
                "tutor requests are for your own pending, untutored entries".into(),
            ));
        }
        self.api
            .request_tutor(
                research.id,
                TutorRequest {
                    requested_tutor_id: tutor_id,
                },
            )
            .await
    }

    /// Accept a pending tutor request addressed to the viewer
    pub async fn accept_tutor_request(&self, research_id: i64) -> Result<()> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Teacher {
            return Err(Error::Forbidden("only teachers accept tutor requests".into()));
        }
        self.api.assign_tutor(research_id, Some(viewer.id)).await
    }

    /// Decline a pending tutor request; the entry's status is unaffected
    pub async fn decline_tutor_request(&self, research_id: i64) -> Result<()> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Teacher {
            return Err(Error::Forbidden("only teachers decline tutor requests".into()));
        }
        self.api.assign_tutor(research_id, None).await
    }

    pub async fn tutor_inbox(&self) -> Result<Vec<PendingTutorRequest>> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Teacher {
            return Err(Error::Forbidden("the tutor inbox is teacher-only".into()));
        }
        self.api.tutor_requests().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::research::MockResearchEndpoints;
    use crate::error::BackendErrorBody;
    use mockall::predicate::eq;
    use mockall::Sequence;

    fn session_for(user: User) -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::in_memory());
        session.establish("tok".into(), Some(user));
        session
    }

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

    fn research(id: i64, author_id: i64, status: ResearchStatus) -> Research {
        Research {
            id,
            title: "Thesis".into(),
            summary: "S".into(),
            year: Some(2024),
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

    #[tokio::test]
    async fn teacher_approval_advances_then_refetches() {
        let mut api = MockResearchEndpoints::new();
        let mut seq = Sequence::new();
        api.expect_approve_by_teacher()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_get()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(research(id, 5, ResearchStatus::ApprovedByTeacher)));

        let service = ResearchService::new(api, session_for(user(2, Role::Teacher)));
        let updated = service
            .approve(&research(1, 5, ResearchStatus::Pending))
            .await
            .unwrap();
        assert_eq!(updated.status, ResearchStatus::ApprovedByTeacher);
    }

    #[tokio::test]
    async fn admin_approval_requires_teacher_stage_first() {
        let mut api = MockResearchEndpoints::new();
        api.expect_approve_by_admin().times(0);
        api.expect_approve_by_teacher().times(0);

        // Admin cannot act on a still-pending entry
        let service = ResearchService::new(api, session_for(user(3, Role::Admin)));
        let result = service.approve(&research(1, 5, ResearchStatus::Pending)).await;
        assert!(matches!(result, Err(Error::Forbidden(_))));

        // And the admin stage itself works once the teacher has signed off
        let mut api = MockResearchEndpoints::new();
        api.expect_approve_by_admin()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));
        api.expect_get()
            .times(1)
            .returning(|id| Ok(research(id, 5, ResearchStatus::ApprovedByAdmin)));
        let service = ResearchService::new(api, session_for(user(3, Role::Admin)));
        let updated = service
            .approve(&research(1, 5, ResearchStatus::ApprovedByTeacher))
            .await
            .unwrap();
        assert_eq!(updated.status, ResearchStatus::ApprovedByAdmin);
    }

    #[tokio::test]
    async fn terminal_statuses_cannot_advance() {
        for status in [ResearchStatus::ApprovedByAdmin, ResearchStatus::Rejected] {
            let mut api = MockResearchEndpoints::new();
            api.expect_approve_by_teacher().times(0);
            api.expect_approve_by_admin().times(0);
            let service = ResearchService::new(api, session_for(user(3, Role::Admin)));
            let result = service.approve(&research(1, 5, status)).await;
            assert!(matches!(result, Err(Error::InvalidTransition { .. })));
        }
    }

    #[tokio::test]
    async fn blocked_delete_passes_blocking_loans_through() {
        let mut api = MockResearchEndpoints::new();
        api.expect_delete().with(eq(1)).times(1).returning(|_| {
            Err(Error::Backend {
                status: 409,
                message: "recurso con prestamos activos".into(),
                body: BackendErrorBody {
                    error: None,
                    message: Some("recurso con prestamos activos".into()),
                    prestamos_blocking: vec![crate::error::BlockingLoan {
                        id_prestamo: Some(44),
                        id_usuario: Some(5),
                    }],
                },
            })
        });

        let service = ResearchService::new(api, session_for(user(3, Role::Admin)));
        let err = service
            .remove(&research(1, 5, ResearchStatus::Pending))
            .await
            .unwrap_err();
        let blocking = err.blocking_loans();
        assert_eq!(blocking[0].id_prestamo, Some(44));
    }

    #[tokio::test]
    async fn student_cannot_edit_after_teacher_approval() {
        let mut api = MockResearchEndpoints::new();
        api.expect_update().times(0);

        let service = ResearchService::new(api, session_for(user(5, Role::Student)));
        let result = service
            .edit(
                &research(1, 5, ResearchStatus::ApprovedByTeacher),
                UpdateResearch::default(),
                None,
            )
            .await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn submit_requests_tutor_best_effort() {
        let mut api = MockResearchEndpoints::new();
        api.expect_create()
            .times(1)
            .returning(|_, _| Ok(research(9, 5, ResearchStatus::Pending)));
        api.expect_request_tutor()
            .withf(|id, req| *id == 9 && req.requested_tutor_id == 2)
            .times(1)
            .returning(|_, _| Err(Error::NotFound("no such teacher".into())));

        let payload = CreateResearch {
            title: "T".into(),
            summary: "S".into(),
            year: 2024,
            area: "AI".into(),
            career: None,
            tutor: None,
        };
        let service = ResearchService::new(api, session_for(user(5, Role::Student)));
        // Submission still succeeds when the tutor request fails
        let created = service.submit(payload, None, Some(2)).await.unwrap();
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn decline_clears_tutor_without_touching_status() {
        let mut api = MockResearchEndpoints::new();
        api.expect_assign_tutor()
            .with(eq(7), eq(None))
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_reject().times(0);

        let service = ResearchService::new(api, session_for(user(2, Role::Teacher)));
        service.decline_tutor_request(7).await.unwrap();
    }

    #[tokio::test]
    async fn accept_assigns_the_viewer_as_tutor() {
        let mut api = MockResearchEndpoints::new();
        api.expect_assign_tutor()
            .with(eq(7), eq(Some(2)))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ResearchService::new(api, session_for(user(2, Role::Teacher)));
        service.accept_tutor_request(7).await.unwrap();
    }

    #[tokio::test]
    async fn visible_entries_are_scoped_by_role() {
        let mut api = MockResearchEndpoints::new();
        api.expect_mine()
            .times(1)
            .returning(|| Ok(vec![research(1, 5, ResearchStatus::Pending)]));
        let service = ResearchService::new(api, session_for(user(5, Role::Student)));
        assert_eq!(service.visible().await.unwrap().len(), 1);

        let mut api = MockResearchEndpoints::new();
        api.expect_list().times(1).returning(|| Ok(Vec::new()));
        let service = ResearchService::new(api, session_for(user(2, Role::Teacher)));
        service.visible().await.unwrap();
    }
}
