//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Category and product catalog with paged product listings",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/categories", api = domain_catalog::handlers::categories::ApiDoc),
        (path = "/api/products", api = domain_catalog::handlers::products::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_nested_under_api() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().map(String::as_str).collect();

        assert!(paths.contains(&"/api/categories"));
        assert!(paths.contains(&"/api/categories/{id}"));
        assert!(paths.contains(&"/api/products"));
        assert!(paths.contains(&"/api/products/{id}"));
    }
}
