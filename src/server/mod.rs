//! HTTP API serving the built visualization models.
//!
//! The three pipelines are independent: a failed document load leaves that
//! pipeline empty (its endpoints answer 503) while the others serve normally.
//! Filters are applied per request from query parameters, so the underlying
//! models are never mutated after the build.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{RelvisError, Result};
use crate::graph::relation::RelationGraph;
use crate::graph::view::{FilterState, GraphView, ViewEvent};
use crate::graph::{EntityGraph, RelationGraphBuilder};
use crate::load::{load_document, DocumentSource};
use crate::map::RouteMap;
use crate::model::{GraphEntry, RelationRecord, RouteEntry};

/// The built models of all three pipelines. `None` marks a pipeline whose
/// document failed to load; the failure was already logged.
#[derive(Debug, Default)]
pub struct Pipelines {
    pub graph: Option<RelationGraph>,
    pub entities: Option<EntityGraph>,
    pub routes: Option<RouteMap>,
}

pub type SharedPipelines = Arc<RwLock<Pipelines>>;

/// Load all three documents and build their models. Each pipeline fails
/// independently; partial state is discarded, nothing is rolled back.
pub async fn build_pipelines(config: &Config) -> Pipelines {
    Pipelines {
        graph: build_relation_graph(&config.graph_source()).await,
        entities: build_entities(&config.entities_source()).await,
        routes: build_routes(&config.routes_source()).await,
    }
}

pub async fn build_relation_graph(source: &DocumentSource) -> Option<RelationGraph> {
    match load_document::<Vec<GraphEntry>>(source).await {
        Ok(entries) => {
            let graph = RelationGraphBuilder::build(&entries);
            log::info!(
                "Relation graph built from {}: {} nodes, {} edges",
                source,
                graph.nodes.len(),
                graph.edges.len()
            );
            Some(graph)
        }
        Err(e) => {
            log::error!("Failed to load relation graph from {}: {}", source, e);
            None
        }
    }
}

pub async fn build_entities(source: &DocumentSource) -> Option<EntityGraph> {
    match load_document::<Vec<RelationRecord>>(source).await {
        Ok(records) => {
            let graph = crate::graph::build_entity_graph(records);
            log::info!(
                "Entity graph built from {}: {} nodes, {} edges",
                source,
                graph.nodes.len(),
                graph.edges.len()
            );
            Some(graph)
        }
        Err(e) => {
            log::error!("Failed to load entity records from {}: {}", source, e);
            None
        }
    }
}

pub async fn build_routes(source: &DocumentSource) -> Option<RouteMap> {
    match load_document::<Vec<RouteEntry>>(source).await {
        Ok(entries) => {
            log::info!("Route map built from {}: {} entries", source, entries.len());
            Some(RouteMap::new(entries))
        }
        Err(e) => {
            log::error!("Failed to load routes from {}: {}", source, e);
            None
        }
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(config: &Config, state: SharedPipelines) -> Result<()> {
    let app = create_router(config, state);

    let addr: SocketAddr = ([127, 0, 0, 1], config.server.port).into();
    log::info!("Starting visualization server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RelvisError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| {
            RelvisError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("HTTP server error: {}", e),
            ))
        })?;

    Ok(())
}

/// Create the axum router
pub fn create_router(config: &Config, state: SharedPipelines) -> Router {
    // Explicit origins when configured, otherwise open for local dev.
    let cors = if config.server.allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/graph", get(relation_graph))
        .route("/api/entities", get(entities))
        .route("/api/entities/filters", get(entity_filters))
        .route("/api/entities/details", get(entity_details))
        .route("/api/routes", get(routes))
        .route("/api/routes/persons", get(route_persons))
        .with_state(state);

    if let Some(static_dir) = &config.server.static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

fn unavailable(pipeline: &str) -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": format!("{} data failed to load", pipeline) })),
    )
        .into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn relation_graph(State(state): State<SharedPipelines>) -> Response {
    let pipelines = state.read().await;
    match &pipelines.graph {
        Some(graph) => Json(graph).into_response(),
        None => unavailable("graph"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntityQuery {
    #[serde(default)]
    pub relation: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
}

async fn entities(
    State(state): State<SharedPipelines>,
    Query(query): Query<EntityQuery>,
) -> Response {
    let pipelines = state.read().await;
    match &pipelines.entities {
        Some(graph) => {
            let filter = FilterState {
                relation: query.relation,
                node_type: query.node_type,
            };
            Json(graph.filtered(&filter)).into_response()
        }
        None => unavailable("entity"),
    }
}

/// Dropdown option lists: distinct relation labels and node types, in
/// first-seen order.
async fn entity_filters(State(state): State<SharedPipelines>) -> Response {
    let pipelines = state.read().await;
    match &pipelines.entities {
        Some(graph) => {
            let mut relations: Vec<&str> = Vec::new();
            for edge in &graph.edges {
                if !relations.contains(&edge.relation.as_str()) {
                    relations.push(&edge.relation);
                }
            }
            let mut types: Vec<&str> = Vec::new();
            for node in &graph.nodes {
                if !node.node_type.is_empty() && !types.contains(&node.node_type.as_str()) {
                    types.push(&node.node_type);
                }
            }
            Json(json!({ "relations": relations, "types": types })).into_response()
        }
        None => unavailable("entity"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsQuery {
    #[serde(default)]
    pub node: String,
}

/// Detail-panel payload for a selected node; `null` means the panel stays
/// hidden.
async fn entity_details(
    State(state): State<SharedPipelines>,
    Query(query): Query<DetailsQuery>,
) -> Response {
    let pipelines = state.read().await;
    match &pipelines.entities {
        Some(graph) => {
            let mut view = GraphView::default();
            view.apply(ViewEvent::NodeSelected(query.node));
            Json(view.details(graph)).into_response()
        }
        None => unavailable("entity"),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub person: String,
}

async fn routes(
    State(state): State<SharedPipelines>,
    Query(query): Query<RouteQuery>,
) -> Response {
    let pipelines = state.read().await;
    match &pipelines.routes {
        Some(map) => Json(map.render(&query.person)).into_response(),
        None => unavailable("routes"),
    }
}

async fn route_persons(State(state): State<SharedPipelines>) -> Response {
    let pipelines = state.read().await;
    match &pipelines.routes {
        Some(map) => Json(map.person_options()).into_response(),
        None => unavailable("routes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_entity_graph;
    use std::fs;
    use tempfile::TempDir;

    fn shared(pipelines: Pipelines) -> SharedPipelines {
        Arc::new(RwLock::new(pipelines))
    }

    fn entity_state() -> SharedPipelines {
        let records: Vec<RelationRecord> = serde_json::from_str(
            r#"[
                {"subjekt": "A", "subjekt_type": "person",
                 "objekt": "Weimar", "objekt_type": "location",
                 "prädikat": "besuchte", "text": "t"},
                {"subjekt": "A", "subjekt_type": "person",
                 "objekt": "B", "objekt_type": "person",
                 "prädikat": "kannte", "text": "u"}
            ]"#,
        )
        .unwrap();
        shared(Pipelines {
            entities: Some(build_entity_graph(records)),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_build_pipelines_independent_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("routes.json"), r#"[{"person": "G", "route": []}]"#).unwrap();

        let graph = build_relation_graph(&DocumentSource::File(dir.path().join("missing.json")))
            .await;
        assert!(graph.is_none());

        let routes = build_routes(&DocumentSource::File(dir.path().join("routes.json"))).await;
        assert!(routes.is_some());
        assert_eq!(routes.unwrap().entries().len(), 1);
    }

    #[tokio::test]
    async fn test_entities_endpoint_applies_filters() {
        let state = entity_state();
        let response = entities(
            State(state),
            Query(EntityQuery {
                relation: "besuchte".to_string(),
                node_type: String::new(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let view: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(view["edges"].as_array().unwrap().len(), 1);
        assert_eq!(view["edges"][0]["relation"], "besuchte");
    }

    #[tokio::test]
    async fn test_entity_filters_lists_distinct_values() {
        let state = entity_state();
        let response = entity_filters(State(state)).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["relations"], json!(["besuchte", "kannte"]));
        assert_eq!(value["types"], json!(["person", "location"]));
    }

    #[tokio::test]
    async fn test_entity_details_null_for_unknown_node() {
        let state = entity_state();
        let response = entity_details(
            State(state),
            Query(DetailsQuery {
                node: "obj:Paris".to_string(),
            }),
        )
        .await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"null");
    }

    #[tokio::test]
    async fn test_unavailable_pipeline_returns_503() {
        let state = shared(Pipelines::default());
        let response = relation_graph(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
