use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{Category, Product, ProductSortField};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub img_url: String,
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_category::Entity")]
    ProductCategory,
}

impl Related<super::product_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCategory.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::product_category::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_product(self, categories: Vec<Category>) -> Product {
        Product {
            id: Some(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            img_url: self.img_url,
            date: self.date,
            categories,
        }
    }
}

/// Scalar columns only; associations are written separately.
impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.map_or(NotSet, Set),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            img_url: Set(product.img_url.clone()),
            date: Set(product.date),
        }
    }
}

impl From<ProductSortField> for Column {
    fn from(field: ProductSortField) -> Self {
        match field {
            ProductSortField::Id => Column::Id,
            ProductSortField::Name => Column::Name,
            ProductSortField::Price => Column::Price,
            ProductSortField::Date => Column::Date,
        }
    }
}
