//! HTTP surface for a [`CollectionService`]: `/` for the collection, `/{id}` for items.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_db::EntityId;
use catalog_http::AppError;
use serde_json::json;

use super::{CollectionService, Resource};

type Service<R> = State<Arc<CollectionService<R>>>;

/// Router exposing list, get, create, replace/patch and delete for `R`.
pub fn collection_router<R: Resource>(service: Arc<CollectionService<R>>) -> Router {
    Router::new()
        .route("/", get(list::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(show::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(destroy::<R>),
        )
        .with_state(service)
}

async fn list<R: Resource>(
    State(service): Service<R>,
) -> Result<Json<Vec<R::Representation>>, AppError> {
    let items = service.list().await?;
    Ok(Json(items.iter().map(R::represent).collect()))
}

async fn show<R: Resource>(
    State(service): Service<R>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<R::Representation>, AppError> {
    let Path(id) = id?;
    let entity = service.get(id).await?;
    Ok(Json(entity.represent()))
}

async fn create<R: Resource>(
    State(service): Service<R>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Representation>), AppError> {
    let Json(payload) = payload?;
    let entity = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(entity.represent())))
}

async fn update<R: Resource>(
    State(service): Service<R>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> Result<Json<R::Representation>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let entity = service.update(id, payload).await?;
    Ok(Json(entity.represent()))
}

async fn destroy<R: Resource>(
    State(service): Service<R>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// OpenAPI fragment describing the routes of [`collection_router`] plus `/health`.
pub fn collection_openapi(
    tag: &str,
    schema_name: &str,
    schema: serde_json::Value,
    payload_schema: serde_json::Value,
) -> serde_json::Value {
    let entity_ref = json!({ "$ref": format!("#/components/schemas/{schema_name}") });
    let payload_name = format!("{schema_name}Payload");
    let payload_body = json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": format!("#/components/schemas/{payload_name}") }
            }
        }
    });
    let error = |description: &str| {
        json!({
            "description": description,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        })
    };
    let entity = |description: &str| {
        json!({
            "description": description,
            "content": { "application/json": { "schema": entity_ref.clone() } }
        })
    };
    let id_param = json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "minimum": 1 }
    }]);

    let mut components = serde_json::Map::new();
    components.insert(schema_name.to_string(), schema);
    components.insert(payload_name, payload_schema);

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": format!("List {tag}"),
                    "tags": [tag],
                    "responses": {
                        "200": {
                            "description": format!("All {tag}"),
                            "content": {
                                "application/json": {
                                    "schema": { "type": "array", "items": entity_ref.clone() }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "summary": format!("Create one of {tag}"),
                    "tags": [tag],
                    "requestBody": payload_body.clone(),
                    "responses": {
                        "201": entity("Created"),
                        "400": error("Malformed body"),
                        "422": error("Validation error")
                    }
                }
            },
            "/{id}": {
                "parameters": id_param,
                "get": {
                    "summary": format!("Get one of {tag}"),
                    "tags": [tag],
                    "responses": { "200": entity("Found"), "404": error("Not found") }
                },
                "put": {
                    "summary": format!("Update one of {tag}"),
                    "tags": [tag],
                    "requestBody": payload_body.clone(),
                    "responses": {
                        "200": entity("Updated"),
                        "404": error("Not found"),
                        "422": error("Validation error")
                    }
                },
                "patch": {
                    "summary": format!("Partially update one of {tag}"),
                    "tags": [tag],
                    "requestBody": payload_body,
                    "responses": {
                        "200": entity("Updated"),
                        "404": error("Not found"),
                        "422": error("Validation error")
                    }
                },
                "delete": {
                    "summary": format!("Delete one of {tag}"),
                    "tags": [tag],
                    "responses": { "204": { "description": "Deleted" }, "404": error("Not found") }
                }
            },
            "/health": {
                "get": {
                    "summary": format!("{tag} health check"),
                    "tags": [tag],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": { "schemas": components }
    })
}
