//! Resource catalog service
//!
//! Holds the last fetched resource list behind an async RwLock. The
//! availability toggle is the one mutation applied locally before the
//! backend confirms; on failure the previous flag is restored. Every
//! other mutation waits for the server and syncs from its response.

use std::sync::Arc;

use validator::Validate;

use crate::api::resources::ResourceEndpoints;
use crate::api::ResourcesApi;
use crate::error::{Error, Result};
use crate::models::{CreateResource, Resource, ResourceFilter, Role, UpdateResource, User};
use crate::session::SessionStore;

pub struct CatalogService<A: ResourceEndpoints = ResourcesApi> {
    api: A,
    session: Arc<SessionStore>,
    resources: tokio::sync::RwLock<Vec<Resource>>,
}

impl<A: ResourceEndpoints> CatalogService<A> {
    pub fn new(api: A, session: Arc<SessionStore>) -> Self {
        Self {
            api,
            session,
            resources: tokio::sync::RwLock::new(Vec::new()),
        }
    }

    fn viewer(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| Error::Authentication("no signed-in user".into()))
    }

    /// Re-fetch the catalog with the given filter and replace the cache
    pub async fn refresh(&self, filter: ResourceFilter) -> Result<Vec<Resource>> {
        let fetched = self.api.list(filter).await?;
        *self.resources.write().await = fetched.clone();
        Ok(fetched)
    }

    /// Current cached catalog (empty until the first refresh)
    pub async fn snapshot(&self) -> Vec<Resource> {
        self.resources.read().await.clone()
    }

    pub async fn get(&self, id: i64) -> Result<Resource> {
        self.api.get(id).await
    }

    pub async fn create(&self, payload: CreateResource) -> Result<Resource> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Admin {
            return Err(Error::Forbidden("only admins manage the catalog".into()));
        }
        payload.validate()?;
        let created = self.api.create(payload).await?;
        self.resources.write().await.push(created.clone());
        Ok(created)
    }

    pub async fn update(&self, id: i64, payload: UpdateResource) -> Result<Resource> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Admin {
            return Err(Error::Forbidden("only admins manage the catalog".into()));
        }
        payload.validate()?;
        let updated = self.api.update(id, payload).await?;
        let mut resources = self.resources.write().await;
        if let Some(slot) = resources.iter_mut().find(|r| r.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a resource. The cached list is only touched once the server
    /// confirms; a blocked delete leaves it intact.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let viewer = self.viewer()?;
        if viewer.role != Role::Admin {
            return Err(Error::Forbidden("only admins manage the catalog".into()));
        }
        self.api.delete(id).await?;
        self.resources.write().await.retain(|r| r.id != id);
        Ok(())
    }

    /// Flip availability, showing the flip immediately. The server's
    /// stored entity replaces the guess on success; on failure the prior
    /// flag comes back and the error is returned.
    pub async fn toggle_availability(&self, id: i64) -> Result<Resource> {
        let viewer = self.viewer()?;
        if viewer.role == Role::Student {
            return Err(Error::Forbidden(
                "availability is managed by staff".into(),
            ));
        }

        let prior_available = {
            let mut resources = self.resources.write().await;
            match resources.iter_mut().find(|r| r.id == id) {
                Some(resource) => {
                    let prior = resource.available;
                    resource.available = !prior;
                    Some(prior)
                }
                None => None,
            }
        };

        match self.api.toggle_availability(id).await {
            Ok(stored) => {
                let mut resources = self.resources.write().await;
                if let Some(slot) = resources.iter_mut().find(|r| r.id == id) {
                    *slot = stored.clone();
                }
                Ok(stored)
            }
            Err(e) => {
                if let Some(prior) = prior_available {
                    let mut resources = self.resources.write().await;
                    if let Some(resource) = resources.iter_mut().find(|r| r.id == id) {
                        resource.available = prior;
                    }
                }
                tracing::warn!(resource = id, "availability toggle rolled back: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::MockResourceEndpoints;
    use crate::error::BackendErrorBody;
    use crate::models::ResourceKind;
    use mockall::predicate::eq;

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

    fn resource(id: i64, available: bool) -> Resource {
        Resource {
            id,
            name: format!("r{}", id),
            kind: ResourceKind::Book,
            available,
            book: None,
            equipment: None,
            research: None,
        }
    }

    async fn seeded_service<A: ResourceEndpoints>(
        api: A,
        viewer: User,
        seed: Vec<Resource>,
    ) -> CatalogService<A> {
        let service = CatalogService::new(api, session_for(viewer));
        *service.resources.write().await = seed;
        service
    }

    #[tokio::test]
    async fn toggle_replaces_guess_with_server_entity() {
        let mut api = MockResourceEndpoints::new();
        api.expect_toggle_availability()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(resource(id, false)));

        let service =
            seeded_service(api, user(1, Role::Admin), vec![resource(1, true)]).await;
        let stored = service.toggle_availability(1).await.unwrap();
        assert!(!stored.available);
        assert!(!service.snapshot().await[0].available);
    }

    #[tokio::test]
    async fn toggle_rolls_back_on_failure() {
        let mut api = MockResourceEndpoints::new();
        api.expect_toggle_availability()
            .with(eq(1))
            .times(1)
            .returning(|_| {
                Err(Error::Backend {
                    status: 500,
                    message: "boom".into(),
                    body: BackendErrorBody::default(),
                })
            });

        let service =
            seeded_service(api, user(1, Role::Admin), vec![resource(1, true)]).await;
        let result = service.toggle_availability(1).await;
        assert!(result.is_err());
        // The optimistic flip was undone
        assert!(service.snapshot().await[0].available);
    }

    #[tokio::test]
    async fn students_cannot_toggle() {
        let mut api = MockResourceEndpoints::new();
        api.expect_toggle_availability().times(0);

        let service =
            seeded_service(api, user(3, Role::Student), vec![resource(1, true)]).await;
        assert!(matches!(
            service.toggle_availability(1).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn blocked_delete_leaves_cache_intact() {
        let mut api = MockResourceEndpoints::new();
        api.expect_delete().with(eq(1)).times(1).returning(|_| {
            Err(Error::Backend {
                status: 409,
                message: "préstamos activos".into(),
                body: BackendErrorBody::default(),
            })
        });

        let service =
            seeded_service(api, user(1, Role::Admin), vec![resource(1, true)]).await;
        assert!(service.delete(1).await.is_err());
        assert_eq!(service.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_prunes_cache_on_success() {
        let mut api = MockResourceEndpoints::new();
        api.expect_delete().with(eq(1)).times(1).returning(|_| Ok(()));

        let service = seeded_service(
            api,
            user(1, Role::Admin),
            vec![resource(1, true), resource(2, false)],
        )
        .await;
        service.delete(1).await.unwrap();
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 2);
    }

    #[tokio::test]
    async fn refresh_replaces_the_cache() {
        let mut api = MockResourceEndpoints::new();
        api.expect_list()
            .times(1)
            .returning(|_| Ok(vec![resource(7, true)]));

        let service = seeded_service(api, user(3, Role::Student), vec![resource(1, true)]).await;
        service.refresh(ResourceFilter::default()).await.unwrap();
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, 7);
    }

    #[tokio::test]
    async fn non_admin_cannot_create() {
        let mut api = MockResourceEndpoints::new();
        api.expect_create().times(0);

        let service = seeded_service(api, user(2, Role::Teacher), Vec::new()).await;
        let payload = CreateResource {
            name: "Libro".into(),
            kind: ResourceKind::Book,
            available: Some(true),
            author: None,
            area: None,
            year: None,
            publisher: None,
            isbn: None,
            pages: None,
            location: None,
            model: None,
            serial_number: None,
            specs: None,
        };
        assert!(matches!(
            service.create(payload).await,
            Err(Error::Forbidden(_))
        ));
    }
}
