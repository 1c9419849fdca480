use axum::Router;
use domain_catalog::{PgCategoryRepository, PgProductRepository, ProductService, handlers};

/// Products resolve their category references through the category repository.
pub fn router(state: &crate::state::AppState) -> Router {
    let service = ProductService::new(
        PgProductRepository::new(state.db.clone()),
        PgCategoryRepository::new(state.db.clone()),
    );
    handlers::products::router(service)
}
