pub mod authors;
pub mod books;
pub mod storage;

use std::sync::Arc;

use catalog_kernel::ModuleRegistry;

use crate::catalog::Catalog;

/// Register the storage core module and the collection modules
pub fn register_all(registry: &mut ModuleRegistry, catalog: &Catalog) {
    registry.register_core(Arc::new(storage::StorageModule::new(catalog.clone())));
    registry.register_custom(Arc::new(authors::AuthorsModule::new(Arc::new(
        catalog.author_service(),
    ))));
    registry.register_custom(Arc::new(books::BooksModule::new(Arc::new(
        catalog.book_service(),
    ))));
}
