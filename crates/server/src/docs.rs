//! OpenAPI description of the HTTP surface.
//!
//! Expense paths are declared relative to the collection and nested under the
//! configured prefix at runtime, so the document always matches the router.

use axum::{Json, extract::State};
use utoipa::OpenApi;

use crate::{
    expenses, health,
    server::{ServerConfig, ServerState},
};

/// Machine readable document.
pub const OPENAPI_PATH: &str = "/openapi.json";
/// Human readable reference rendered from the same document.
pub const DOCS_PATH: &str = "/docs";

#[derive(OpenApi)]
#[openapi(
    paths(
        expenses::create,
        expenses::list,
        expenses::get,
        expenses::update,
        expenses::delete,
        expenses::by_category,
    ),
    tags((name = "expenses", description = "Create, read, update and delete expenses"))
)]
struct ExpenseApi;

#[derive(OpenApi)]
#[openapi(
    paths(health::root, health::health),
    tags((name = "service", description = "Service information and health"))
)]
struct ServiceApi;

pub fn openapi(config: &ServerConfig) -> utoipa::openapi::OpenApi {
    let prefix = config.api_prefix();
    let mut doc = if prefix.is_empty() {
        let mut doc = ServiceApi::openapi();
        doc.merge(ExpenseApi::openapi());
        doc
    } else {
        ServiceApi::openapi().nest(prefix, ExpenseApi::openapi())
    };
    doc.info.title = config.app_name.clone();
    doc.info.version = config.app_version.clone();
    doc
}

pub async fn openapi_json(State(state): State<ServerState>) -> Json<utoipa::openapi::OpenApi> {
    Json(openapi(&state.config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix: &str) -> ServerConfig {
        ServerConfig {
            app_name: "Household".to_string(),
            app_version: "2.3.4".to_string(),
            api_prefix: prefix.to_string(),
            ..Default::default()
        }
    }

    fn paths(doc: &utoipa::openapi::OpenApi) -> Vec<String> {
        doc.paths.paths.keys().cloned().collect()
    }

    #[test]
    fn expense_paths_follow_the_prefix() {
        let doc = openapi(&config("/money/"));
        let paths = paths(&doc);
        assert!(paths.contains(&"/money/expenses".to_string()));
        assert!(paths.contains(&"/money/expenses/{id}".to_string()));
        assert!(paths.contains(&"/money/expenses/category/{category}".to_string()));
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/".to_string()));
    }

    #[test]
    fn empty_prefix_mounts_at_root() {
        let paths = paths(&openapi(&config("")));
        assert!(paths.contains(&"/expenses".to_string()));
        assert!(paths.contains(&"/expenses/{id}".to_string()));
    }

    #[test]
    fn info_comes_from_config() {
        let doc = openapi(&config("/api/v1"));
        assert_eq!(doc.info.title, "Household");
        assert_eq!(doc.info.version, "2.3.4");
    }

    #[test]
    fn wire_schemas_are_registered() {
        let doc = openapi(&config("/api/v1"));
        let schemas = &doc.components.as_ref().unwrap().schemas;
        for name in ["ExpenseNew", "ExpenseUpdate", "ExpenseView", "ValidationErrors"] {
            assert!(schemas.contains_key(name), "{name}");
        }
    }
}
