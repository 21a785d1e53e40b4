use catalog_db::{Entity, EntityId};
use serde::{Deserialize, Serialize};

use crate::collection::{require_text, Resource, Violation};
use crate::modules::authors::models::{author_iri, parse_author_iri};
use crate::utils::{merge_nullable, nullable};

/// A catalogued book. The author is held by id and resolved against storage
/// when the book is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Book {
    id: Option<EntityId>,
    title: Option<String>,
    description: Option<String>,
    pages: Option<u64>,
    image: Option<String>,
    author: Option<EntityId>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn pages(&self) -> Option<u64> {
        self.pages
    }

    pub fn set_pages(&mut self, pages: u64) -> &mut Self {
        self.pages = Some(pages);
        self
    }

    /// Cover image, a URL or a file name
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn set_image(&mut self, image: impl Into<String>) -> &mut Self {
        self.image = Some(image.into());
        self
    }

    pub fn author(&self) -> Option<EntityId> {
        self.author
    }

    /// Point the book at an author, or detach it with `None`.
    pub fn set_author(&mut self, author: Option<EntityId>) -> &mut Self {
        self.author = author;
        self
    }
}

impl Entity for Book {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        debug_assert!(self.id.is_none(), "book id is assigned once");
        self.id = Some(id);
    }
}

/// How clients name an author: the IRI `/api/authors/{id}` or the bare id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(EntityId),
    Iri(String),
}

impl AuthorRef {
    pub fn resolve(&self) -> Option<EntityId> {
        match self {
            AuthorRef::Id(id) => Some(*id),
            AuthorRef::Iri(iri) => parse_author_iri(iri),
        }
    }
}

/// Field values accepted on create, replace and patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub pages: Option<u64>,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub author: Option<Option<AuthorRef>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRepresentation {
    pub id: Option<EntityId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub pages: Option<u64>,
    pub image: Option<String>,
    /// Author IRI
    pub author: Option<String>,
}

impl Resource for Book {
    const NAME: &'static str = "book";
    type Payload = BookPayload;
    type Representation = BookRepresentation;

    fn apply(&mut self, payload: BookPayload) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Some(title) = payload.title {
            self.set_title(title);
        }
        merge_nullable(&mut self.description, payload.description);
        if let Some(pages) = payload.pages {
            self.set_pages(pages);
        }
        merge_nullable(&mut self.image, payload.image);

        match payload.author {
            None => {}
            Some(None) => {
                self.set_author(None);
            }
            Some(Some(reference)) => match reference.resolve() {
                Some(id) => {
                    self.set_author(Some(id));
                }
                None => violations.push(Violation::new("author", "invalid_reference")),
            },
        }

        violations
    }

    fn validate(&self) -> Vec<Violation> {
        let mut violations: Vec<_> = require_text("title", self.title()).into_iter().collect();
        if self.pages == Some(0) {
            violations.push(Violation::new("pages", "out_of_range"));
        }
        violations
    }

    fn represent(&self) -> BookRepresentation {
        BookRepresentation {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            pages: self.pages,
            image: self.image.clone(),
            author: self.author.map(author_iri),
        }
    }
}

pub fn book_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "Identifier assigned on creation" },
            "title": { "type": ["string", "null"] },
            "description": { "type": ["string", "null"] },
            "pages": { "type": ["integer", "null"], "minimum": 1 },
            "image": { "type": ["string", "null"], "description": "Cover URL or file name" },
            "author": {
                "type": ["string", "null"],
                "description": "Author IRI, e.g. /api/authors/1"
            }
        },
        "required": ["id"]
    })
}

pub fn book_payload_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": ["string", "null"] },
            "pages": { "type": "integer", "minimum": 1 },
            "image": { "type": ["string", "null"] },
            "author": {
                "oneOf": [
                    { "type": "string", "description": "Author IRI" },
                    { "type": "integer", "description": "Author id" },
                    { "type": "null" }
                ]
            }
        },
        "required": ["title"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_book_has_no_fields() {
        let book = Book::new();
        assert_eq!(book.id(), None);
        assert_eq!(book.title(), None);
        assert_eq!(book.image(), None);
        assert_eq!(book.description(), None);
        assert_eq!(book.pages(), None);
        assert_eq!(book.author(), None);
    }

    #[test]
    fn set_and_get_title() {
        let mut book = Book::new();
        book.set_title("Le Seigneur des Anneaux");
        assert_eq!(book.title(), Some("Le Seigneur des Anneaux"));
    }

    #[test]
    fn set_and_get_image() {
        let mut book = Book::new();
        book.set_image("tolkien-seigneur-anneaux.jpg");
        assert_eq!(book.image(), Some("tolkien-seigneur-anneaux.jpg"));
    }

    #[test]
    fn set_and_get_description() {
        let mut book = Book::new();
        book.set_description("Un hobbit part à l'aventure pour détruire un anneau maléfique...");
        assert_eq!(
            book.description(),
            Some("Un hobbit part à l'aventure pour détruire un anneau maléfique...")
        );
    }

    #[test]
    fn set_and_get_pages() {
        let mut book = Book::new();
        book.set_pages(423);
        assert_eq!(book.pages(), Some(423));
    }

    #[test]
    fn pages_edge_values() {
        let mut book = Book::new();
        book.set_pages(1);
        assert_eq!(book.pages(), Some(1));
        book.set_pages(9999);
        assert_eq!(book.pages(), Some(9999));
        book.set_pages(u64::MAX);
        assert_eq!(book.pages(), Some(u64::MAX));
    }

    #[test]
    fn author_can_be_set_then_cleared() {
        let mut book = Book::new();
        book.set_author(Some(4));
        assert_eq!(book.author(), Some(4));

        book.set_author(None);
        assert_eq!(book.author(), None);
    }

    #[test]
    fn fluent_setters_chain_on_the_same_book() {
        let mut book = Book::new();
        book.set_title("Game of Thrones")
            .set_image("got-cover.jpg")
            .set_description("Winter is coming...")
            .set_pages(694)
            .set_author(Some(1));

        assert_eq!(book.title(), Some("Game of Thrones"));
        assert_eq!(book.image(), Some("got-cover.jpg"));
        assert_eq!(book.description(), Some("Winter is coming..."));
        assert_eq!(book.pages(), Some(694));
        assert_eq!(book.author(), Some(1));
    }

    #[test]
    fn title_with_special_characters() {
        let title = "L'Être & l'Néant: Essai d'ontologie phénoménologique";
        let mut book = Book::new();
        book.set_title(title);
        assert_eq!(book.title(), Some(title));
    }

    #[test]
    fn long_description_is_kept_whole() {
        let description = "Lorem ipsum dolor sit amet. ".repeat(100);
        let mut book = Book::new();
        book.set_description(description.clone());

        assert_eq!(book.description(), Some(description.as_str()));
        assert!(book.description().unwrap().len() > 1000);
    }

    #[test]
    fn author_reference_accepts_iri_and_id() {
        let iri: AuthorRef = serde_json::from_str(r#""/api/authors/3""#).unwrap();
        let id: AuthorRef = serde_json::from_str("3").unwrap();
        let other: AuthorRef = serde_json::from_str(r#""/api/books/3""#).unwrap();

        assert_eq!(iri.resolve(), Some(3));
        assert_eq!(id.resolve(), Some(3));
        assert_eq!(other.resolve(), None);
    }

    #[test]
    fn apply_reports_unparseable_author() {
        let mut book = Book::new();
        let payload: BookPayload =
            serde_json::from_str(r#"{"title": "Dune", "author": "frank herbert"}"#).unwrap();

        let violations = book.apply(payload);
        assert_eq!(violations, vec![Violation::new("author", "invalid_reference")]);
        assert_eq!(book.author(), None);
    }

    #[test]
    fn apply_distinguishes_absent_and_null_fields() {
        let mut book = Book::new();
        book.set_title("Foundation")
            .set_image("asimov.jpg")
            .set_author(Some(2));

        let payload: BookPayload =
            serde_json::from_str(r#"{"pages": 244, "author": null}"#).unwrap();
        assert!(book.apply(payload).is_empty());

        assert_eq!(book.title(), Some("Foundation"));
        assert_eq!(book.image(), Some("asimov.jpg"));
        assert_eq!(book.pages(), Some(244));
        assert_eq!(book.author(), None);
    }

    #[test]
    fn validation_rules() {
        let mut book = Book::new();
        assert_eq!(book.validate(), vec![Violation::required("title")]);

        book.set_title("").set_pages(0);
        assert_eq!(
            book.validate(),
            vec![
                Violation::blank("title"),
                Violation::new("pages", "out_of_range")
            ]
        );

        book.set_title("1984").set_pages(368);
        assert!(book.validate().is_empty());
    }

    #[test]
    fn representation_renders_author_iri() {
        let mut book = Book::new();
        book.set_title("1984").set_author(Some(2));

        let json = serde_json::to_value(book.represent()).unwrap();
        assert_eq!(json["author"], "/api/authors/2");
        assert!(json["id"].is_null());
    }
}
