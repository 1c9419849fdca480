//! Generic CRUD building blocks over a SeaORM entity.
//!
//! Domain repositories hold a `BaseRepository<Entity>` and compose its
//! helpers inside their own transactions. Every helper takes the connection
//! explicitly, so it works the same on a `DatabaseConnection` and on a
//! `DatabaseTransaction`.

use sea_orm::{
    AccessMode, ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait, PrimaryKeyTrait,
    TransactionTrait,
};
use std::marker::PhantomData;

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Read-write transaction with the server's default isolation.
    pub async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.db.begin().await
    }

    /// Transaction in `READ ONLY` access mode, for queries.
    pub async fn begin_read_only(&self) -> Result<DatabaseTransaction, DbErr> {
        self.db
            .begin_with_config(None, Some(AccessMode::ReadOnly))
            .await
    }

    pub async fn find_by_id<C, K>(&self, conn: &C, id: K) -> Result<Option<E::Model>, DbErr>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        E::find_by_id(id).one(conn).await
    }

    /// `SELECT COUNT(*)` over the primary key lookup; the row itself is never fetched.
    pub async fn exists_by_id<C, K>(&self, conn: &C, id: K) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        Ok(E::find_by_id(id).count(conn).await? > 0)
    }

    /// `INSERT ... RETURNING *`.
    pub async fn insert<C>(&self, conn: &C, model: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        model.insert(conn).await
    }

    /// `UPDATE ... RETURNING *`. A missing row yields `DbErr::RecordNotUpdated`.
    pub async fn update<C>(&self, conn: &C, model: E::ActiveModel) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        model.update(conn).await
    }

    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete_by_id<C, K>(&self, conn: &C, id: K) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
        K: Into<PrimaryKeyOf<E>>,
    {
        let result = E::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::{NotSet, Set};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;

    mod widget {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
        #[sea_orm(table_name = "widget")]
        pub struct Model {
            #[sea_orm(primary_key)]
            pub id: i64,
            pub name: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn model(id: i64, name: &str) -> widget::Model {
        widget::Model {
            id,
            name: name.to_string(),
        }
    }

    fn count_row(n: i64) -> Vec<BTreeMap<&'static str, Value>> {
        vec![BTreeMap::from([("num_items", Value::BigInt(Some(n)))])]
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(1, "bolt")]])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        let found = repo.find_by_id(repo.db(), 1i64).await.unwrap();
        assert_eq!(found, Some(model(1, "bolt")));
    }

    #[tokio::test]
    async fn test_exists_by_id_counts_instead_of_fetching() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_row(1), count_row(0)])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db.clone());

        assert!(repo.exists_by_id(repo.db(), 1i64).await.unwrap());
        assert!(!repo.exists_by_id(repo.db(), 2i64).await.unwrap());

        drop(repo);
        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        for entry in log {
            let sql = format!("{:?}", entry);
            assert!(sql.contains("COUNT(*)"), "expected a count query, got {}", sql);
        }
    }

    #[tokio::test]
    async fn test_insert_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(26, "nut")]])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        let inserted = repo
            .insert(
                repo.db(),
                widget::ActiveModel {
                    id: NotSet,
                    name: Set("nut".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(inserted.id, 26);
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_record_not_updated() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<widget::Model>::new()])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        let err = repo
            .update(
                repo.db(),
                widget::ActiveModel {
                    id: Set(1000),
                    name: Set("gone".to_string()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbErr::RecordNotUpdated));
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        assert_eq!(repo.delete_by_id(repo.db(), 3i64).await.unwrap(), 1);
    }
}
