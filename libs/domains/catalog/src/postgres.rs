use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::{BTreeSet, HashMap};

use crate::{
    entity::{category, product, product_category},
    models::{Category, Page, PageRequest, Product, SortDirection},
    repository::{CategoryRepository, ProductRepository, RepositoryError, RepositoryResult},
};

// ============================================================================
// Categories
// ============================================================================

pub struct PgCategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Category>> {
        let txn = self.base.begin_read_only().await?;

        let models = category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        let txn = self.base.begin_read_only().await?;
        let model = self.base.find_by_id(&txn, id).await?;
        txn.commit().await?;

        Ok(model.map(Category::from))
    }

    fn get_reference(&self, id: i64) -> RepositoryResult<Category> {
        Ok(Category::reference(id))
    }

    async fn save(&self, category: Category) -> RepositoryResult<Category> {
        let txn = self.base.begin().await?;

        let model = match category.id {
            None => self
                .base
                .insert(
                    &txn,
                    category::ActiveModel {
                        name: Set(category.name),
                        ..Default::default()
                    },
                )
                .await
                .map_err(RepositoryError::from_db)?,
            Some(id) => self
                .base
                .update(
                    &txn,
                    category::ActiveModel {
                        id: Set(id),
                        name: Set(category.name),
                    },
                )
                .await
                .map_err(|e| RepositoryError::from_update(e, id))?,
        };

        txn.commit().await?;

        tracing::info!(category_id = model.id, "Saved category");
        Ok(model.into())
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.base.exists_by_id(self.base.db(), id).await?)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let txn = self.base.begin().await?;

        let rows_affected = self
            .base
            .delete_by_id(&txn, id)
            .await
            .map_err(RepositoryError::from_db)?;

        if rows_affected == 0 {
            return Err(RepositoryError::EntityNotFound(id));
        }

        txn.commit().await?;

        tracing::info!(category_id = id, "Deleted category");
        Ok(())
    }
}

// ============================================================================
// Products
// ============================================================================

pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

/// Categories of each product in `product_ids`, ordered by category id.
async fn load_categories<C: ConnectionTrait>(
    conn: &C,
    product_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<Category>>, sea_orm::DbErr> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_category::Entity::find()
        .filter(product_category::Column::ProductId.is_in(product_ids))
        .order_by_asc(product_category::Column::CategoryId)
        .find_also_related(category::Entity)
        .all(conn)
        .await?;

    let mut by_product: HashMap<i64, Vec<Category>> = HashMap::new();
    for (link, category) in rows {
        if let Some(category) = category {
            by_product
                .entry(link.product_id)
                .or_default()
                .push(category.into());
        }
    }

    Ok(by_product)
}

/// Checks that every referenced category exists, returning them ordered by id.
async fn resolve_categories<C: ConnectionTrait>(
    conn: &C,
    category_ids: &BTreeSet<i64>,
) -> RepositoryResult<Vec<Category>> {
    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let found = category::Entity::find()
        .filter(category::Column::Id.is_in(category_ids.iter().copied()))
        .order_by_asc(category::Column::Id)
        .all(conn)
        .await?;

    if let Some(missing) = category_ids
        .iter()
        .find(|id| !found.iter().any(|model| model.id == **id))
    {
        return Err(RepositoryError::EntityNotFound(*missing));
    }

    Ok(found.into_iter().map(Category::from).collect())
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all_paged(&self, request: PageRequest) -> RepositoryResult<Page<Product>> {
        let txn = self.base.begin_read_only().await?;

        let order = match request.sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator = product::Entity::find()
            .order_by(product::Column::from(request.sort.field), order.clone())
            // Ties broken by id so pages never overlap
            .order_by(product::Column::Id, order)
            .paginate(&txn, request.size);

        let total_elements = paginator.num_items().await?;
        let models = paginator.fetch_page(request.page).await?;

        let mut categories =
            load_categories(&txn, models.iter().map(|model| model.id).collect()).await?;

        txn.commit().await?;

        let content = models
            .into_iter()
            .map(|model| {
                let linked = categories.remove(&model.id).unwrap_or_default();
                model.into_product(linked)
            })
            .collect();

        Ok(Page::new(content, total_elements, &request))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let txn = self.base.begin_read_only().await?;

        let Some(model) = self.base.find_by_id(&txn, id).await? else {
            txn.commit().await?;
            return Ok(None);
        };

        let categories = model
            .find_linked(product_category::ProductToCategories)
            .order_by_asc(category::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        Ok(Some(model.into_product(
            categories.into_iter().map(Category::from).collect(),
        )))
    }

    fn get_reference(&self, id: i64) -> RepositoryResult<Product> {
        Ok(Product::reference(id))
    }

    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        let txn = self.base.begin().await?;
        let active_model = product::ActiveModel::from(&product);

        let model = match product.id {
            None => self
                .base
                .insert(&txn, active_model)
                .await
                .map_err(RepositoryError::from_db)?,
            Some(id) => {
                let model = self
                    .base
                    .update(&txn, active_model)
                    .await
                    .map_err(|e| RepositoryError::from_update(e, id))?;

                product_category::Entity::delete_many()
                    .filter(product_category::Column::ProductId.eq(id))
                    .exec(&txn)
                    .await?;

                model
            }
        };

        let category_ids: BTreeSet<i64> = product
            .categories
            .iter()
            .filter_map(|category| category.id)
            .collect();

        let categories = resolve_categories(&txn, &category_ids).await?;

        if !category_ids.is_empty() {
            let links = category_ids
                .iter()
                .map(|category_id| product_category::ActiveModel {
                    product_id: Set(model.id),
                    category_id: Set(*category_id),
                });

            product_category::Entity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(RepositoryError::from_db)?;
        }

        txn.commit().await?;

        tracing::info!(product_id = model.id, categories = categories.len(), "Saved product");
        Ok(model.into_product(categories))
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.base.exists_by_id(self.base.db(), id).await?)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let txn = self.base.begin().await?;

        let rows_affected = self
            .base
            .delete_by_id(&txn, id)
            .await
            .map_err(RepositoryError::from_db)?;

        if rows_affected == 0 {
            return Err(RepositoryError::EntityNotFound(id));
        }

        txn.commit().await?;

        tracing::info!(product_id = id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn category_model(id: i64, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_all_maps_models() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                category_model(1, "Books"),
                category_model(2, "Electronics"),
            ]])
            .into_connection();
        let repo = PgCategoryRepository::new(db);

        let categories = repo.find_all().await.unwrap();
        assert_eq!(
            categories,
            vec![
                Category {
                    id: Some(1),
                    name: "Books".to_string()
                },
                Category {
                    id: Some(2),
                    name: "Electronics".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_get_reference_issues_no_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db.clone());

        let reference = repo.get_reference(7).unwrap();
        assert_eq!(reference.id, Some(7));

        drop(repo);
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_of_missing_category_is_entity_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let repo = PgCategoryRepository::new(db);

        let err = repo
            .save(Category {
                id: Some(1000),
                name: "X".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::EntityNotFound(1000)));
    }

    #[tokio::test]
    async fn test_delete_of_missing_category_is_entity_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgCategoryRepository::new(db);

        let err = repo.delete_by_id(42).await.unwrap_err();
        assert!(matches!(err, RepositoryError::EntityNotFound(42)));
    }
}
