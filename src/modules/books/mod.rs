pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use catalog_db::{EntityId, StorageResult, Store};
use catalog_kernel::{InitCtx, Module};

use crate::collection::{
    routes::{collection_openapi, collection_router},
    CollectionService, Constraint, DeleteHook, Violation,
};
use crate::modules::authors::models::Author;
use models::Book;

/// Books collection mounted at `/api/books`
pub struct BooksModule {
    service: Arc<CollectionService<Book>>,
}

impl BooksModule {
    pub fn new(service: Arc<CollectionService<Book>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        collection_router(self.service.clone()).route("/health", get(health_check))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(collection_openapi(
            "Books",
            "Book",
            models::book_schema(),
            models::book_payload_schema(),
        ))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let count = self.service.list().await?.len();
        tracing::info!(module = self.name(), books = count, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// A book's author must exist when the book is written.
pub struct AuthorExists {
    authors: Arc<dyn Store<Author>>,
}

impl AuthorExists {
    pub fn new(authors: Arc<dyn Store<Author>>) -> Self {
        Self { authors }
    }
}

#[async_trait]
impl Constraint<Book> for AuthorExists {
    async fn check(&self, book: &Book) -> StorageResult<Vec<Violation>> {
        let Some(author_id) = book.author() else {
            return Ok(Vec::new());
        };

        if self.authors.find_by_id(author_id).await?.is_some() {
            Ok(Vec::new())
        } else {
            Ok(vec![Violation::new("author", "not_found")])
        }
    }
}

/// Clears the author of every book that pointed at a deleted author.
pub struct DetachAuthor {
    books: Arc<dyn Store<Book>>,
}

impl DetachAuthor {
    pub fn new(books: Arc<dyn Store<Book>>) -> Self {
        Self { books }
    }
}

#[async_trait]
impl DeleteHook for DetachAuthor {
    async fn after_delete(&self, author_id: EntityId) -> StorageResult<()> {
        let detached = self
            .books
            .update_where(
                &|book: &Book| book.author() == Some(author_id),
                &|book: &mut Book| {
                    book.set_author(None);
                },
            )
            .await?;

        tracing::debug!(author = author_id, books = detached, "detached deleted author");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::MemoryStore;

    fn stores() -> (Arc<MemoryStore<Author>>, Arc<MemoryStore<Book>>) {
        (Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn author_exists_accepts_missing_or_known_author() {
        let (authors, _) = stores();
        let mut author = Author::new();
        author.set_first_name("Isaac").set_last_name("Asimov");
        let author = authors.save(author).await.unwrap();
        let constraint = AuthorExists::new(authors);

        let mut book = Book::new();
        assert!(constraint.check(&book).await.unwrap().is_empty());

        book.set_author(author.id());
        assert!(constraint.check(&book).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn author_exists_rejects_unknown_author() {
        let (authors, _) = stores();
        let constraint = AuthorExists::new(authors);

        let mut book = Book::new();
        book.set_author(Some(42));
        assert_eq!(
            constraint.check(&book).await.unwrap(),
            vec![Violation::new("author", "not_found")]
        );
    }

    #[tokio::test]
    async fn detach_author_clears_only_matching_books() {
        let (_, books) = stores();
        let mut first = Book::new();
        first.set_title("Foundation").set_author(Some(1));
        let mut second = Book::new();
        second.set_title("Dune").set_author(Some(2));
        let mut third = Book::new();
        third.set_title("I, Robot").set_author(Some(1));
        books.save(first).await.unwrap();
        books.save(second).await.unwrap();
        books.save(third).await.unwrap();
        books.delete(3).await.unwrap();

        DetachAuthor::new(books.clone())
            .after_delete(1)
            .await
            .unwrap();

        let authors: Vec<_> = books
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(Book::author)
            .collect();
        assert_eq!(authors, vec![None, Some(2)]);
        assert!(books.find_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn detach_author_keeps_newer_book_fields() {
        let (_, books) = stores();
        let mut book = Book::new();
        book.set_title("Foundation").set_author(Some(1));
        let mut renamed = books.save(book).await.unwrap();
        renamed.set_title("Foundation and Empire");
        books.save(renamed).await.unwrap();

        DetachAuthor::new(books.clone())
            .after_delete(1)
            .await
            .unwrap();

        let stored = books.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(stored.title(), Some("Foundation and Empire"));
        assert_eq!(stored.author(), None);
    }
}
