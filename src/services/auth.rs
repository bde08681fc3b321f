//! Authentication service
//!
//! The only writer of the session store.

use std::sync::Arc;

use validator::Validate;

use crate::api::auth::{AuthEndpoints, Credentials};
use crate::api::AuthApi;
use crate::error::{Error, Result};
use crate::models::{RegisterUser, User};
use crate::session::SessionStore;

pub struct AuthService<A: AuthEndpoints = AuthApi> {
    api: A,
    session: Arc<SessionStore>,
}

impl<A: AuthEndpoints> AuthService<A> {
    pub fn new(api: A, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Sign in and install the session
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation("email and password are required".into()));
        }
        let (token, user) = self
            .api
            .login(Credentials {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;
        self.session.establish(token, user.clone());
        tracing::info!(user = ?user.as_ref().map(|u| u.id), "signed in");
        Ok(user)
    }

    pub async fn register(&self, payload: RegisterUser) -> Result<User> {
        payload.validate()?;
        self.api.register(payload).await
    }

    /// Sign out. The backend call is best-effort: local state is cleared
    /// whether or not it succeeds.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            tracing::warn!("logout call failed, clearing session anyway: {}", e);
        }
        self.session.clear();
    }

    /// Re-fetch the profile for the current session and refresh the cache
    pub async fn refresh_profile(&self) -> Result<User> {
        let current = self
            .session
            .current_user()
            .ok_or_else(|| Error::Authentication("no signed-in user".into()))?;
        let user = self.api.profile(current.id).await?;
        self.session.update_user(user.clone());
        Ok(user)
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::MockAuthEndpoints;
    use crate::models::Role;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Ana".into(),
            surname: "Ruiz".into(),
            email: "ana@uni.edu".into(),
            role: Role::Student,
            phone: None,
            career: None,
            registered_at: None,
        }
    }

    #[tokio::test]
    async fn login_installs_session() {
        let mut api = MockAuthEndpoints::new();
        api.expect_login()
            .times(1)
            .returning(|_| Ok(("tok".to_string(), Some(sample_user()))));

        let session = Arc::new(SessionStore::in_memory());
        let service = AuthService::new(api, session.clone());

        let user = service.login("ana@uni.edu", "secret").await.unwrap();
        assert_eq!(user.unwrap().id, 7);
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.current_user().unwrap().id, 7);
    }

    #[tokio::test]
    async fn empty_credentials_never_reach_the_network() {
        let mut api = MockAuthEndpoints::new();
        api.expect_login().times(0);

        let service = AuthService::new(api, Arc::new(SessionStore::in_memory()));
        assert!(matches!(
            service.login("", "x").await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn refresh_profile_updates_the_cached_user() {
        let mut api = MockAuthEndpoints::new();
        api.expect_profile().times(1).returning(|id| {
            let mut user = sample_user();
            user.id = id;
            user.career = Some("Sistemas".into());
            Ok(user)
        });

        let session = Arc::new(SessionStore::in_memory());
        session.establish("tok".into(), Some(sample_user()));

        let service = AuthService::new(api, session.clone());
        let refreshed = service.refresh_profile().await.unwrap();
        assert_eq!(refreshed.career.as_deref(), Some("Sistemas"));
        assert_eq!(
            session.current_user().unwrap().career.as_deref(),
            Some("Sistemas")
        );
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_backend_fails() {
        let mut api = MockAuthEndpoints::new();
        api.expect_logout()
            .times(1)
            .returning(|| Err(Error::Authentication("expired".into())));

        let session = Arc::new(SessionStore::in_memory());
        session.establish("tok".into(), Some(sample_user()));

        let service = AuthService::new(api, session.clone());
        service.logout().await;

        assert!(!session.is_authenticated());
        assert!(session.current_user().is_none());
    }
}
