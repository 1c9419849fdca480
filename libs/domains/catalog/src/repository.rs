use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::models::{Category, Page, PageRequest, Product};

/// Store failures, reduced to what the services need to tell apart
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The row (or a row it references) does not exist
    #[error("Entity {0} not found")]
    EntityNotFound(i64),

    /// A foreign key or similar constraint rejected the write
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("Store error: {0}")]
    Store(#[from] DbErr),
}

impl RepositoryError {
    /// Sorts a write failure into `IntegrityViolation` or `Store`.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                RepositoryError::IntegrityViolation(detail)
            }
            _ => RepositoryError::Store(err),
        }
    }

    /// Like [`from_db`](Self::from_db), but an `UPDATE` that matched no row is `EntityNotFound(id)`.
    pub fn from_update(err: DbErr, id: i64) -> Self {
        match err {
            DbErr::RecordNotUpdated => RepositoryError::EntityNotFound(id),
            other => Self::from_db(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository trait for Category persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// All categories ordered by id
    async fn find_all(&self) -> RepositoryResult<Vec<Category>>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>>;

    /// Resolves a lazy handle to a category without reading the row.
    /// `EntityNotFound` here means the row is known to be missing; otherwise
    /// a missing row is reported by the `save` that uses the handle.
    fn get_reference(&self, id: i64) -> RepositoryResult<Category>;

    /// Insert when `id` is `None`, update otherwise.
    /// Updating a missing row fails with `EntityNotFound(id)`.
    async fn save(&self, category: Category) -> RepositoryResult<Category>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    /// Fails with `IntegrityViolation` while a product references the
    /// category, and with `EntityNotFound` when no row was deleted.
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
}

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all_paged(&self, request: PageRequest) -> RepositoryResult<Page<Product>>;

    /// Product with its categories
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// Lazy handle to a product, see [`CategoryRepository::get_reference`].
    fn get_reference(&self, id: i64) -> RepositoryResult<Product>;

    /// Writes the product row and replaces its category links atomically.
    /// An unknown product id or category id fails with `EntityNotFound` for that id.
    async fn save(&self, product: Product) -> RepositoryResult<Product>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_updated_becomes_entity_not_found() {
        let err = RepositoryError::from_update(DbErr::RecordNotUpdated, 1000);
        assert!(matches!(err, RepositoryError::EntityNotFound(1000)));
    }

    #[test]
    fn test_other_errors_pass_through_as_store() {
        let err = RepositoryError::from_update(DbErr::Custom("connection reset".into()), 1);
        assert!(matches!(err, RepositoryError::Store(DbErr::Custom(_))));

        let err = RepositoryError::from_db(DbErr::RecordNotUpdated);
        assert!(matches!(err, RepositoryError::Store(DbErr::RecordNotUpdated)));
    }
}
