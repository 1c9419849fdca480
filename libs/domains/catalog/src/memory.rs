//! In-memory catalog store for development and handler tests.
//!
//! One [`InMemoryCatalog`] backs both repository traits so that product
//! links and category deletes see the same data, the way the two tables do
//! in Postgres.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Category, Page, PageRequest, Product, ProductSortField, SortDirection};
use crate::repository::{
    CategoryRepository, ProductRepository, RepositoryError, RepositoryResult,
};

#[derive(Debug, Default)]
struct Store {
    categories: BTreeMap<i64, String>,
    /// Products without their categories; links live in `links`
    products: BTreeMap<i64, Product>,
    /// (product_id, category_id)
    links: BTreeSet<(i64, i64)>,
    last_category_id: i64,
    last_product_id: i64,
}

impl Store {
    fn category(&self, id: i64) -> Option<Category> {
        self.categories.get(&id).map(|name| Category {
            id: Some(id),
            name: name.clone(),
        })
    }

    fn product(&self, id: i64) -> Option<Product> {
        let mut product = self.products.get(&id)?.clone();
        product.categories = self
            .links
            .range((id, i64::MIN)..=(id, i64::MAX))
            .filter_map(|(_, category_id)| self.category(*category_id))
            .collect();
        Some(product)
    }
}

/// Shared in-memory implementation of [`CategoryRepository`] and [`ProductRepository`]
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    store: Arc<RwLock<Store>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Product, b: &Product, field: ProductSortField) -> Ordering {
    let by_field = match field {
        ProductSortField::Id => Ordering::Equal,
        ProductSortField::Name => a.name.cmp(&b.name),
        ProductSortField::Price => a.price.total_cmp(&b.price),
        ProductSortField::Date => a.date.cmp(&b.date),
    };
    by_field.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl CategoryRepository for InMemoryCatalog {
    async fn find_all(&self) -> RepositoryResult<Vec<Category>> {
        let store = self.store.read().await;
        Ok(store
            .categories
            .keys()
            .filter_map(|id| store.category(*id))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        Ok(self.store.read().await.category(id))
    }

    fn get_reference(&self, id: i64) -> RepositoryResult<Category> {
        Ok(Category::reference(id))
    }

    async fn save(&self, category: Category) -> RepositoryResult<Category> {
        let mut store = self.store.write().await;

        let id = match category.id {
            Some(id) if !store.categories.contains_key(&id) => {
                return Err(RepositoryError::EntityNotFound(id));
            }
            Some(id) => id,
            None => {
                store.last_category_id += 1;
                store.last_category_id
            }
        };

        store.categories.insert(id, category.name.clone());

        tracing::info!(category_id = id, "Saved category");
        Ok(Category {
            id: Some(id),
            name: category.name,
        })
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.store.read().await.categories.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let mut store = self.store.write().await;

        if store.links.iter().any(|(_, category_id)| *category_id == id) {
            return Err(RepositoryError::IntegrityViolation(format!(
                "category {} is still referenced from product_category",
                id
            )));
        }

        if store.categories.remove(&id).is_none() {
            return Err(RepositoryError::EntityNotFound(id));
        }

        tracing::info!(category_id = id, "Deleted category");
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn find_all_paged(&self, request: PageRequest) -> RepositoryResult<Page<Product>> {
        let store = self.store.read().await;

        let mut products: Vec<Product> = store
            .products
            .keys()
            .filter_map(|id| store.product(*id))
            .collect();

        products.sort_by(|a, b| {
            let ordering = compare(a, b, request.sort.field);
            match request.sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total_elements = products.len() as u64;
        let content = products
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(content, total_elements, &request))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        Ok(self.store.read().await.product(id))
    }

    fn get_reference(&self, id: i64) -> RepositoryResult<Product> {
        Ok(Product::reference(id))
    }

    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        let mut store = self.store.write().await;

        if let Some(id) = product.id {
            if !store.products.contains_key(&id) {
                return Err(RepositoryError::EntityNotFound(id));
            }
        }

        let category_ids: BTreeSet<i64> = product
            .categories
            .iter()
            .filter_map(|category| category.id)
            .collect();

        if let Some(missing) = category_ids
            .iter()
            .find(|id| !store.categories.contains_key(*id))
        {
            return Err(RepositoryError::EntityNotFound(*missing));
        }

        let id = match product.id {
            Some(id) => id,
            None => {
                store.last_product_id += 1;
                store.last_product_id
            }
        };

        store.links.retain(|(product_id, _)| *product_id != id);
        store
            .links
            .extend(category_ids.iter().map(|category_id| (id, *category_id)));

        store.products.insert(
            id,
            Product {
                id: Some(id),
                categories: Vec::new(),
                ..product
            },
        );

        tracing::info!(product_id = id, categories = category_ids.len(), "Saved product");
        Ok(store.product(id).unwrap_or_default())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.store.read().await.products.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let mut store = self.store.write().await;

        if store.products.remove(&id).is_none() {
            return Err(RepositoryError::EntityNotFound(id));
        }
        store.links.retain(|(product_id, _)| *product_id != id);

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sort;

    async fn category(catalog: &InMemoryCatalog, name: &str) -> i64 {
        CategoryRepository::save(catalog, Category::new(name))
            .await
            .unwrap()
            .id
            .unwrap()
    }

    async fn product(catalog: &InMemoryCatalog, name: &str, price: f64, categories: &[i64]) -> i64 {
        let product = Product {
            name: name.to_string(),
            price,
            categories: categories.iter().map(|id| Category::reference(*id)).collect(),
            ..Default::default()
        };
        ProductRepository::save(catalog, product)
            .await
            .unwrap()
            .id
            .unwrap()
    }

    #[tokio::test]
    async fn test_ids_come_from_separate_sequences() {
        let catalog = InMemoryCatalog::new();

        assert_eq!(category(&catalog, "Books").await, 1);
        assert_eq!(category(&catalog, "Electronics").await, 2);
        assert_eq!(product(&catalog, "Smart TV", 2190.0, &[2]).await, 1);
    }

    #[tokio::test]
    async fn test_saved_product_resolves_category_names() {
        let catalog = InMemoryCatalog::new();
        let books = category(&catalog, "Books").await;
        let id = product(&catalog, "The Lord of the Rings", 90.5, &[books]).await;

        let found = ProductRepository::find_by_id(&catalog, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.categories, vec![Category {
            id: Some(books),
            name: "Books".to_string()
        }]);
    }

    #[tokio::test]
    async fn test_unknown_category_reference_fails_on_save() {
        let catalog = InMemoryCatalog::new();
        let product = Product {
            name: "Orphan".to_string(),
            categories: vec![catalog_reference(&catalog, 99)],
            ..Default::default()
        };

        let err = ProductRepository::save(&catalog, product).await.unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(99)));
        assert!(!ProductRepository::exists_by_id(&catalog, 1).await.unwrap());
    }

    fn catalog_reference(catalog: &InMemoryCatalog, id: i64) -> Category {
        CategoryRepository::get_reference(catalog, id).unwrap()
    }

    #[tokio::test]
    async fn test_referenced_category_cannot_be_deleted() {
        let catalog = InMemoryCatalog::new();
        let books = category(&catalog, "Books").await;
        let id = product(&catalog, "Dune", 40.0, &[books]).await;

        let err = CategoryRepository::delete_by_id(&catalog, books)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::IntegrityViolation(_)));

        // Deleting the product drops its links
        ProductRepository::delete_by_id(&catalog, id).await.unwrap();
        CategoryRepository::delete_by_id(&catalog, books)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_of_missing_category_is_entity_not_found() {
        let catalog = InMemoryCatalog::new();
        let mut reference = catalog_reference(&catalog, 1000);
        reference.name = "X".to_string();

        let err = CategoryRepository::save(&catalog, reference)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(1000)));
    }

    #[tokio::test]
    async fn test_paging_sorts_and_slices() {
        let catalog = InMemoryCatalog::new();
        for (name, price) in [("A", 30.0), ("B", 10.0), ("C", 20.0)] {
            product(&catalog, name, price, &[]).await;
        }

        let request = PageRequest::new(0, 2, Sort::desc(ProductSortField::Id));
        let page = catalog.find_all_paged(request).await.unwrap();
        let ids: Vec<_> = page.content.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);

        let request = PageRequest::new(0, 12, Sort::new(ProductSortField::Price, SortDirection::Asc));
        let page = catalog.find_all_paged(request).await.unwrap();
        let names: Vec<_> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }
}
