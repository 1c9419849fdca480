use std::sync::Arc;
use tracing::instrument;

use super::unresolved;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Page, PageRequest, Product, ProductDto};
use crate::repository::{CategoryRepository, ProductRepository, RepositoryError};

/// Service layer for Product operations.
///
/// Holds the category repository only to turn category DTOs into lazy
/// references; an unknown category surfaces when the reference is resolved
/// or, at the latest, when the product is saved.
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all_paged(&self, request: PageRequest) -> CatalogResult<Page<ProductDto>> {
        let page = self
            .products
            .find_all_paged(request)
            .await
            .map_err(CatalogError::store)?;

        Ok(page.map(ProductDto::from))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> CatalogResult<ProductDto> {
        self.products
            .find_by_id(id)
            .await
            .map_err(CatalogError::store)?
            .map(ProductDto::from)
            .ok_or(CatalogError::ResourceNotFound(id))
    }

    #[instrument(skip(self, dto))]
    pub async fn insert(&self, dto: &ProductDto) -> CatalogResult<ProductDto> {
        let mut entity = Product::default();
        self.copy_dto_to_entity(dto, &mut entity)?;

        self.save(entity).await
    }

    /// Overwrites product `id` without reading it first.
    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i64, dto: &ProductDto) -> CatalogResult<ProductDto> {
        let mut entity = self
            .products
            .get_reference(id)
            .map_err(|e| unresolved(e, id))?;
        self.copy_dto_to_entity(dto, &mut entity)?;

        self.save(entity).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        let exists = self
            .products
            .exists_by_id(id)
            .await
            .map_err(CatalogError::store)?;

        if !exists {
            return Err(CatalogError::ResourceNotFound(id));
        }

        // Category links cascade, so nothing can block the delete
        match self.products.delete_by_id(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::EntityNotFound(_)) => Err(CatalogError::ResourceNotFound(id)),
            Err(e) => Err(CatalogError::store(e)),
        }
    }

    /// `EntityNotFound` names either the product or one of its categories.
    async fn save(&self, entity: Product) -> CatalogResult<ProductDto> {
        match self.products.save(entity).await {
            Ok(saved) => Ok(saved.into()),
            Err(RepositoryError::EntityNotFound(missing)) => {
                Err(CatalogError::ResourceNotFound(missing))
            }
            Err(e) => Err(CatalogError::store(e)),
        }
    }

    fn copy_dto_to_entity(&self, dto: &ProductDto, entity: &mut Product) -> CatalogResult<()> {
        entity.name = dto.name.clone();
        entity.description = dto.description.clone();
        entity.price = dto.price;
        entity.img_url = dto.img_url.clone();
        entity.date = dto.date;

        entity.categories = dto
            .categories
            .iter()
            .filter_map(|category| category.id)
            .map(|category_id| {
                self.categories
                    .get_reference(category_id)
                    .map_err(|e| unresolved(e, category_id))
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(())
    }
}
