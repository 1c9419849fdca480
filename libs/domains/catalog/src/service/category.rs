use std::sync::Arc;
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult, INTEGRITY_VIOLATION_MESSAGE};
use crate::models::{Category, CategoryDto};
use super::unresolved;
use crate::repository::{CategoryRepository, RepositoryError};

/// Service layer for Category operations
pub struct CategoryService<R: CategoryRepository> {
    repository: Arc<R>,
}

impl<R: CategoryRepository> Clone for CategoryService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All categories, ordered by id
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> CatalogResult<Vec<CategoryDto>> {
        let categories = self
            .repository
            .find_all()
            .await
            .map_err(CatalogError::store)?;

        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> CatalogResult<CategoryDto> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(CatalogError::store)?
            .map(CategoryDto::from)
            .ok_or(CatalogError::ResourceNotFound(id))
    }

    /// Creates a category from `dto.name`; any id in the DTO is ignored.
    #[instrument(skip(self, dto))]
    pub async fn insert(&self, dto: &CategoryDto) -> CatalogResult<CategoryDto> {
        let entity = Category {
            id: None,
            ..Category::from(dto)
        };

        let category = self
            .repository
            .save(entity)
            .await
            .map_err(CatalogError::store)?;

        Ok(category.into())
    }

    /// Renames category `id` without reading it first.
    ///
    /// A reference that fails to resolve ends the update before `save`;
    /// otherwise a missing row surfaces from `save` itself.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: &CategoryDto) -> CatalogResult<CategoryDto> {
        let mut entity = self
            .repository
            .get_reference(id)
            .map_err(|e| unresolved(e, id))?;
        entity.name = dto.name.clone();

        match self.repository.save(entity).await {
            Ok(saved) => Ok(saved.into()),
            Err(RepositoryError::EntityNotFound(_)) => Err(CatalogError::ResourceNotFound(id)),
            Err(e) => Err(CatalogError::store(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let exists = self
            .repository
            .exists_by_id(id)
            .await
            .map_err(CatalogError::store)?;

        if !exists {
            return Err(CatalogError::ResourceNotFound(id));
        }

        match self.repository.delete_by_id(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::IntegrityViolation(detail)) => {
                tracing::warn!(category_id = id, %detail, "Category still referenced");
                Err(CatalogError::DatabaseException(
                    INTEGRITY_VIOLATION_MESSAGE.to_string(),
                ))
            }
            // Removed between the existence check and the delete
            Err(RepositoryError::EntityNotFound(_)) => Err(CatalogError::ResourceNotFound(id)),
            Err(e) => Err(CatalogError::store(e)),
        }
    }
}
