use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::ping),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Task list service: create, read, update, delete and list to-do tasks"
    ),
    tags((name = "health", description = "Liveness"))
)]
struct AppApiDoc;

/// Application document with the tasks domain merged in.
///
/// Task paths are already absolute, so the domain document is merged at the
/// root rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = AppApiDoc::openapi();
        doc.merge(domain_tasks::ApiDoc::openapi());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/ping", "/task", "/task/done", "/tasks"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
