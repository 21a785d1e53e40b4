use std::sync::Arc;

use catalog_db::{MemoryStore, Store};

use crate::collection::{CollectionService, WriteLock};
use crate::modules::authors::models::Author;
use crate::modules::books::{models::Book, AuthorExists, DetachAuthor};

/// The storage collaborators for every collection, plus the services built
/// on top of them.
#[derive(Clone)]
pub struct Catalog {
    pub authors: Arc<dyn Store<Author>>,
    pub books: Arc<dyn Store<Book>>,
    /// Book writes and author writes take this in turn, so a book is never
    /// saved against an author deleted after its reference check.
    associations: WriteLock,
}

impl Catalog {
    pub fn new(authors: Arc<dyn Store<Author>>, books: Arc<dyn Store<Book>>) -> Self {
        Self {
            authors,
            books,
            associations: WriteLock::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<Author>::new()),
            Arc::new(MemoryStore::<Book>::new()),
        )
    }

    /// Deleting an author detaches it from its books.
    pub fn author_service(&self) -> CollectionService<Author> {
        CollectionService::new(self.authors.clone())
            .with_delete_hook(Arc::new(DetachAuthor::new(self.books.clone())))
            .with_write_lock(self.associations.clone())
    }

    /// Writing a book requires its author to exist.
    pub fn book_service(&self) -> CollectionService<Book> {
        CollectionService::new(self.books.clone())
            .with_constraint(Arc::new(AuthorExists::new(self.authors.clone())))
            .with_write_lock(self.associations.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use catalog_db::{StorageResult, Store};
    use tokio::task::JoinHandle;

    use super::*;
    use crate::collection::{CollectionResult, Constraint, Violation};
    use crate::modules::authors::models::AuthorPayload;
    use crate::modules::books::models::{AuthorRef, BookPayload};

    /// Starts an author delete once the reference check has passed, then
    /// gives it time to run before the book is saved.
    struct DeleteAuthorAfterCheck {
        catalog: Catalog,
        delete: Mutex<Option<JoinHandle<CollectionResult<()>>>>,
    }

    #[async_trait]
    impl Constraint<Book> for DeleteAuthorAfterCheck {
        async fn check(&self, book: &Book) -> StorageResult<Vec<Violation>> {
            if let Some(author_id) = book.author() {
                let catalog = self.catalog.clone();
                let handle =
                    tokio::spawn(async move { catalog.author_service().delete(author_id).await });
                *self.delete.lock().unwrap() = Some(handle);
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn author_delete_waits_for_in_flight_book_write() {
        let catalog = Catalog::in_memory();
        let author = catalog
            .author_service()
            .create(AuthorPayload {
                first_name: Some("Frank".to_string()),
                last_name: Some("Herbert".to_string()),
                country: None,
            })
            .await
            .unwrap();

        let racer = Arc::new(DeleteAuthorAfterCheck {
            catalog: catalog.clone(),
            delete: Mutex::new(None),
        });
        let book = catalog
            .book_service()
            .with_constraint(racer.clone())
            .create(BookPayload {
                title: Some("Dune".to_string()),
                author: Some(author.id().map(AuthorRef::Id)),
                ..Default::default()
            })
            .await
            .unwrap();

        let handle = racer.delete.lock().unwrap().take().unwrap();
        handle.await.unwrap().unwrap();

        assert!(catalog.authors.find_by_id(1).await.unwrap().is_none());
        let stored = catalog.books.find_by_id(book.id().unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.author(), None);
    }
}
