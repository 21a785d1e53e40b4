pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use catalog_kernel::{InitCtx, Module};

use crate::collection::{
    routes::{collection_openapi, collection_router},
    CollectionService,
};
use models::Author;

/// Authors collection mounted at `/api/authors`
pub struct AuthorsModule {
    service: Arc<CollectionService<Author>>,
}

impl AuthorsModule {
    pub fn new(service: Arc<CollectionService<Author>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        collection_router(self.service.clone()).route("/health", get(health_check))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(collection_openapi(
            "Authors",
            "Author",
            models::author_schema(),
            models::author_payload_schema(),
        ))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.service.list().await?.len();
        tracing::info!(
            module = self.name(),
            authors = count,
            "authors module started"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "authors module is healthy"
}
