//! SeaORM entities for the `category`, `product` and `product_category` tables.
//!
//! The schema itself lives in the `migration` crate.

pub mod category;
pub mod product;
pub mod product_category;
