use chrono::{DateTime, Utc};
use sea_orm_migration::prelude::*;

use crate::m20250301_000000_create_category::Category;
use crate::m20250301_000001_create_product::Product;
use crate::m20250301_000002_create_product_category::ProductCategory;

const CATEGORIES: [(i64, &str); 3] = [(1, "Books"), (2, "Electronics"), (3, "Computers")];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    img_url: &'static str,
    date: &'static str,
    categories: &'static [i64],
}

const IMG_BASE: &str = "https://raw.githubusercontent.com/devsuperior/dscatalog-resources/master/backend/img";

const PRODUCTS: [SeedProduct; 25] = [
    SeedProduct { name: "The Lord of the Rings", description: "Boxed hardcover edition of the complete trilogy.", price: 90.5, img_url: "1-big.jpg", date: "2020-07-13T20:50:07Z", categories: &[1] },
    SeedProduct { name: "Smart TV", description: "55 inch 4K smart TV with HDR.", price: 2190.0, img_url: "2-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[2, 3] },
    SeedProduct { name: "Macbook Pro", description: "14 inch laptop, 16GB RAM, 512GB SSD.", price: 1250.0, img_url: "3-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer", description: "Ryzen 5 desktop with a mid-range graphics card.", price: 1200.0, img_url: "4-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "Rails for Dummies", description: "Introductory guide to Ruby on Rails.", price: 100.99, img_url: "5-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[1] },
    SeedProduct { name: "PC Gamer Ex", description: "Desktop with liquid cooling and RGB case.", price: 1350.0, img_url: "6-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer X", description: "Compact gaming desktop.", price: 1350.0, img_url: "7-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Alfa", description: "Entry-level gaming desktop.", price: 1850.0, img_url: "8-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Tera", description: "Desktop with 2TB NVMe storage.", price: 1950.0, img_url: "9-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Y", description: "Desktop tuned for streaming.", price: 1700.0, img_url: "10-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Nitro", description: "Overclocked CPU, 32GB RAM.", price: 1450.0, img_url: "11-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Card", description: "Desktop bundled with a high-end graphics card.", price: 1850.0, img_url: "12-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Plus", description: "Desktop with extra cooling.", price: 1350.0, img_url: "13-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Hera", description: "Silent gaming desktop.", price: 2250.0, img_url: "14-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Weed", description: "Mini-ITX gaming desktop.", price: 2200.0, img_url: "15-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Max", description: "Flagship desktop with 64GB RAM.", price: 2340.0, img_url: "16-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Turbo", description: "Desktop with a 1000W power supply.", price: 1280.0, img_url: "17-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Hot", description: "Desktop with an open-air case.", price: 1450.0, img_url: "18-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Ez", description: "Pre-built desktop, ready to play.", price: 1750.0, img_url: "19-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Tr", description: "Desktop with a Threadripper CPU.", price: 1650.0, img_url: "20-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Tx", description: "Desktop with Wi-Fi 6 and Bluetooth.", price: 1680.0, img_url: "21-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Er", description: "Desktop with ECC memory.", price: 1850.0, img_url: "22-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Min", description: "Budget gaming desktop.", price: 2250.0, img_url: "23-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Boo", description: "Desktop with a glass side panel.", price: 2350.0, img_url: "24-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
    SeedProduct { name: "PC Gamer Foo", description: "Desktop with dual monitors included.", price: 4170.0, img_url: "25-big.jpg", date: "2020-07-14T10:00:00Z", categories: &[3] },
];

fn parse_date(raw: &str) -> Result<DateTime<Utc>, DbErr> {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| DbErr::Migration(format!("invalid seed date '{}': {}", raw, e)))
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut categories = Query::insert();
        categories
            .into_table(Category::Table)
            .columns([Category::Id, Category::Name]);
        for (id, name) in CATEGORIES {
            categories.values_panic([id.into(), name.into()]);
        }
        manager.exec_stmt(categories).await?;

        let mut products = Query::insert();
        products.into_table(Product::Table).columns([
            Product::Id,
            Product::Name,
            Product::Description,
            Product::Price,
            Product::ImgUrl,
            Product::Date,
        ]);
        for (id, product) in (1i64..).zip(PRODUCTS.iter()) {
            products.values_panic([
                id.into(),
                product.name.into(),
                product.description.into(),
                product.price.into(),
                format!("{}/{}", IMG_BASE, product.img_url).into(),
                parse_date(product.date)?.into(),
            ]);
        }
        manager.exec_stmt(products).await?;

        let mut links = Query::insert();
        links
            .into_table(ProductCategory::Table)
            .columns([ProductCategory::ProductId, ProductCategory::CategoryId]);
        for (id, product) in (1i64..).zip(PRODUCTS.iter()) {
            for category_id in product.categories {
                links.values_panic([id.into(), (*category_id).into()]);
            }
        }
        manager.exec_stmt(links).await?;

        // Explicit ids leave the sequences behind; the next insert must get MAX(id) + 1
        let db = manager.get_connection();
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('category', 'id'), (SELECT MAX(id) FROM category))",
        )
        .await?;
        db.execute_unprepared(
            "SELECT setval(pg_get_serial_sequence('product', 'id'), (SELECT MAX(id) FROM product))",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(ProductCategory::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Product::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Category::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_has_twenty_five_products() {
        assert_eq!(PRODUCTS.len(), 25);
    }

    #[test]
    fn test_seed_dates_parse() {
        for product in &PRODUCTS {
            assert!(parse_date(product.date).is_ok(), "{}", product.date);
        }
    }

    #[test]
    fn test_seed_products_reference_known_categories() {
        let known: Vec<i64> = CATEGORIES.iter().map(|(id, _)| *id).collect();

        for product in &PRODUCTS {
            assert!(!product.categories.is_empty(), "{} has no category", product.name);
            assert!(product.categories.iter().all(|id| known.contains(id)));
        }
    }
}
