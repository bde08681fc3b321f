//! Resource catalog endpoints

use async_trait::async_trait;

use crate::error::Result;
use crate::http::HttpClient;
use crate::models::resource::RawResource;
use crate::models::{CreateResource, Resource, ResourceFilter, UpdateResource};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceEndpoints: Send + Sync {
    async fn list(&self, filter: ResourceFilter) -> Result<Vec<Resource>>;
    async fn get(&self, id: i64) -> Result<Resource>;
    async fn create(&self, payload: CreateResource) -> Result<Resource>;
    async fn update(&self, id: i64, payload: UpdateResource) -> Result<Resource>;
    async fn delete(&self, id: i64) -> Result<()>;
    /// Flip the availability flag; returns the resource as stored
    async fn toggle_availability(&self, id: i64) -> Result<Resource>;
}

#[derive(Clone)]
pub struct ResourcesApi {
    http: HttpClient,
}

impl ResourcesApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ResourceEndpoints for ResourcesApi {
    async fn list(&self, filter: ResourceFilter) -> Result<Vec<Resource>> {
        let query = filter.to_query();
        let raw: Vec<RawResource> = if query.is_empty() {
            self.http.get("/recursos").await?
        } else {
            self.http.get_with_query("/recursos", &query).await?
        };
        raw.into_iter().map(Resource::try_from).collect()
    }

    async fn get(&self, id: i64) -> Result<Resource> {
        let raw: RawResource = self.http.get(&format!("/recursos/{}", id)).await?;
        Resource::try_from(raw)
    }

    async fn create(&self, payload: CreateResource) -> Result<Resource> {
        let raw: RawResource = self.http.post("/recursos", &payload).await?;
        Resource::try_from(raw)
    }

    async fn update(&self, id: i64, payload: UpdateResource) -> Result<Resource> {
        let raw: RawResource = self.http.put(&format!("/recursos/{}", id), &payload).await?;
        Resource::try_from(raw)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.http.delete_unit(&format!("/recursos/{}", id)).await
    }

    async fn toggle_availability(&self, id: i64) -> Result<Resource> {
        let raw: RawResource = self
            .http
            .patch_empty(&format!("/recursos/{}/toggle", id))
            .await?;
        Resource::try_from(raw)
    }
}
