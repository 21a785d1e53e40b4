//! Book and author catalog served over a JSON CRUD API.
//!
//! Each collection is a [`collection::CollectionService`] over a storage
//! collaborator, exposed by a kernel [`catalog_kernel::Module`] and mounted
//! by the HTTP layer under `/api/{module}`.

pub mod catalog;
pub mod collection;
pub mod fixtures;
pub mod modules;
pub mod utils;

use anyhow::Context;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use catalog::Catalog;

/// Registry with every catalog module registered against `catalog`
pub fn build_registry(catalog: &Catalog) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog);
    registry
}

/// Run the module lifecycle around the HTTP server until shutdown
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let catalog = Catalog::in_memory();
    let registry = build_registry(&catalog);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module startup failed")?;

    let served = catalog_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .context("module shutdown failed")?;
    served
}
