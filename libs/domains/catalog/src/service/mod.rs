//! Service layer: copies DTO fields onto entities, delegates to the
//! repositories and translates their failures into [`CatalogError`](crate::CatalogError).

mod category;
mod product;

pub use category::CategoryService;
pub use product::ProductService;

use crate::error::CatalogError;
use crate::repository::RepositoryError;

/// Maps a failed reference resolution for `id` before anything is written.
fn unresolved(err: RepositoryError, id: i64) -> CatalogError {
    match err {
        RepositoryError::EntityNotFound(_) => CatalogError::ResourceNotFound(id),
        e => CatalogError::store(e),
    }
}
