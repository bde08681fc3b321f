//! User management endpoints

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::user::RawUser;
use crate::models::{RegisterUser, UpdateUser, User};

#[derive(Clone)]
pub struct UsersApi {
    http: HttpClient,
}

impl UsersApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let raw: Vec<RawUser> = self.http.get("/usuarios").await?;
        raw.into_iter().map(User::try_from).collect()
    }

    /// All users with the teacher role
    pub async fn teachers(&self) -> Result<Vec<User>> {
        let raw: Vec<RawUser> = self.http.get("/usuarios/docentes").await?;
        raw.into_iter().map(User::try_from).collect()
    }

    /// Students whose theses the given teacher tutors
    pub async fn students_of_teacher(&self, teacher_id: i64) -> Result<Vec<User>> {
        let raw: Vec<RawUser> = self
            .http
            .get(&format!("/usuarios/estudiantes-docente/{}", teacher_id))
            .await?;
        raw.into_iter().map(User::try_from).collect()
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        let raw: RawUser = self.http.get(&format!("/usuarios/{}", id)).await?;
        User::try_from(raw)
    }

    pub async fn create(&self, payload: RegisterUser) -> Result<User> {
        let raw: RawUser = self.http.post("/usuarios", &payload).await?;
        User::try_from(raw)
    }

    pub async fn update(&self, id: i64, payload: UpdateUser) -> Result<User> {
        let raw: RawUser = self.http.put(&format!("/usuarios/{}", id), &payload).await?;
        User::try_from(raw)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.http.delete_unit(&format!("/usuarios/{}", id)).await
    }
}
