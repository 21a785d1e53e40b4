//! Demo authors and books seeded into an empty catalog.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::collection::CollectionResult;
use crate::modules::authors::models::AuthorPayload;
use crate::modules::books::models::{AuthorRef, BookPayload};

const COVER_IMAGE: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSfLtRjalUT26tXdZ3RHH8VRMzD0S0pT-tFDg&s";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFixture {
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub country: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookFixture {
    pub title: &'static str,
    pub description: &'static str,
    pub pages: u64,
    pub image: &'static str,
    /// Index into [`AUTHORS`]
    pub author: usize,
}

pub const AUTHORS: &[AuthorFixture] = &[
    AuthorFixture {
        first_name: "Antoine",
        last_name: "de Saint Exupéry",
        country: "France",
    },
    AuthorFixture {
        first_name: "George",
        last_name: "Orwell",
        country: "Royaume-Uni",
    },
    AuthorFixture {
        first_name: "Joanne",
        last_name: "Rowling",
        country: "Royaume-Uni",
    },
];

pub const BOOKS: &[BookFixture] = &[
    BookFixture {
        title: "Le Petit Prince",
        description: "L'histoire d'un petit prince qui voyage de planète en planète.",
        pages: 96,
        image: COVER_IMAGE,
        author: 0,
    },
    BookFixture {
        title: "1984",
        description: "Un roman dystopique sur la surveillance de masse.",
        pages: 368,
        image: COVER_IMAGE,
        author: 1,
    },
    BookFixture {
        title: "Harry Potter à l'école des sorciers",
        description: "Le début des aventures du célèbre sorcier.",
        pages: 320,
        image: COVER_IMAGE,
        author: 2,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixtureSummary {
    pub authors: usize,
    pub books: usize,
}

/// Persist every fixture through the collection services, authors first so
/// the books can reference them. Meant for an empty catalog.
pub async fn load(catalog: &Catalog) -> CollectionResult<FixtureSummary> {
    let author_service = catalog.author_service();
    let book_service = catalog.book_service();

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for fixture in AUTHORS {
        let author = author_service
            .create(AuthorPayload {
                first_name: Some(fixture.first_name.to_string()),
                last_name: Some(fixture.last_name.to_string()),
                country: Some(Some(fixture.country.to_string())),
            })
            .await?;
        author_ids.push(author.id());
    }

    for fixture in BOOKS {
        book_service
            .create(BookPayload {
                title: Some(fixture.title.to_string()),
                description: Some(Some(fixture.description.to_string())),
                pages: Some(fixture.pages),
                image: Some(Some(fixture.image.to_string())),
                author: Some(author_ids[fixture.author].map(AuthorRef::Id)),
            })
            .await?;
    }

    Ok(FixtureSummary {
        authors: AUTHORS.len(),
        books: BOOKS.len(),
    })
}
