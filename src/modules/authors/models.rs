use catalog_db::{Entity, EntityId};
use serde::{Deserialize, Serialize};

use crate::collection::{require_text, Resource, Violation};
use crate::utils::{merge_nullable, nullable};

/// Path prefix of author IRIs, e.g. `/api/authors/3`.
pub const AUTHOR_IRI_PREFIX: &str = "/api/authors/";

pub fn author_iri(id: EntityId) -> String {
    format!("{AUTHOR_IRI_PREFIX}{id}")
}

/// Extract the id from an author IRI. `None` for anything else.
pub fn parse_author_iri(iri: &str) -> Option<EntityId> {
    iri.strip_prefix(AUTHOR_IRI_PREFIX)?.parse().ok()
}

/// A person credited with books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    id: Option<EntityId>,
    first_name: Option<String>,
    last_name: Option<String>,
    country: Option<String>,
}

impl Author {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) -> &mut Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) -> &mut Self {
        self.last_name = Some(last_name.into());
        self
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn set_country(&mut self, country: impl Into<String>) -> &mut Self {
        self.country = Some(country.into());
        self
    }

    /// First and last name joined by a single space; unset parts read as empty.
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name().unwrap_or_default(),
            self.last_name().unwrap_or_default()
        )
    }
}

impl Entity for Author {
    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        debug_assert!(self.id.is_none(), "author id is assigned once");
        self.id = Some(id);
    }
}

/// Field values accepted on create, replace and patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub country: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRepresentation {
    pub id: Option<EntityId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub full_name: String,
}

impl Resource for Author {
    const NAME: &'static str = "author";
    type Payload = AuthorPayload;
    type Representation = AuthorRepresentation;

    fn apply(&mut self, payload: AuthorPayload) -> Vec<Violation> {
        if let Some(first_name) = payload.first_name {
            self.set_first_name(first_name);
        }
        if let Some(last_name) = payload.last_name {
            self.set_last_name(last_name);
        }
        merge_nullable(&mut self.country, payload.country);
        Vec::new()
    }

    fn validate(&self) -> Vec<Violation> {
        [
            require_text("firstName", self.first_name()),
            require_text("lastName", self.last_name()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn represent(&self) -> AuthorRepresentation {
        AuthorRepresentation {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country: self.country.clone(),
            full_name: self.full_name(),
        }
    }
}

pub fn author_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": "Identifier assigned on creation" },
            "firstName": { "type": ["string", "null"] },
            "lastName": { "type": ["string", "null"] },
            "country": { "type": ["string", "null"] },
            "fullName": { "type": "string", "description": "First and last name" }
        },
        "required": ["id", "fullName"]
    })
}

pub fn author_payload_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "country": { "type": ["string", "null"] }
        },
        "required": ["firstName", "lastName"]
    })
}
