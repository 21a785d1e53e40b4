use anyhow::Context;
use async_trait::async_trait;
use catalog_kernel::{InitCtx, Module};

use crate::catalog::Catalog;
use crate::fixtures;

/// Core module owning the storage collaborators; seeds fixtures on init.
pub struct StorageModule {
    catalog: Catalog,
}

impl StorageModule {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl Module for StorageModule {
    fn name(&self) -> &'static str {
        "storage"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if !ctx.settings.fixtures.load_on_start {
            tracing::info!(module = self.name(), "fixture loading disabled");
            return Ok(());
        }

        let summary = fixtures::load(&self.catalog)
            .await
            .context("failed to load fixtures")?;
        tracing::info!(
            module = self.name(),
            authors = summary.authors,
            books = summary.books,
            "fixtures loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::Store;
    use catalog_kernel::settings::Settings;

    #[tokio::test]
    async fn init_seeds_fixtures_when_enabled() {
        let catalog = Catalog::in_memory();
        let settings = Settings::default();

        StorageModule::new(catalog.clone())
            .init(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap();

        assert_eq!(catalog.authors.find_all().await.unwrap().len(), 3);
        assert_eq!(catalog.books.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn init_leaves_storage_empty_when_disabled() {
        let catalog = Catalog::in_memory();
        let mut settings = Settings::default();
        settings.fixtures.load_on_start = false;

        StorageModule::new(catalog.clone())
            .init(&InitCtx {
                settings: &settings,
            })
            .await
            .unwrap();

        assert!(catalog.books.find_all().await.unwrap().is_empty());
    }
}
