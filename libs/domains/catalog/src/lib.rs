//! Catalog Domain
//!
//! Categories and products: persistence, services and the REST handlers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /categories, /products (axum + utoipa)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← DTO <-> entity copying, error translation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← traits + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Category, Product, DTOs, paging
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{handlers, CategoryService, InMemoryCatalog, ProductService};
//!
//! let catalog = InMemoryCatalog::new();
//!
//! let categories = handlers::categories::router(CategoryService::new(catalog.clone()));
//! let products = handlers::products::router(ProductService::new(catalog.clone(), catalog));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
pub use models::{
    Category, CategoryDto, Page, PageParams, PageRequest, Product, ProductDto, ProductSortField,
    Sort, SortDirection,
};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{CategoryRepository, ProductRepository, RepositoryError, RepositoryResult};
pub use service::{CategoryService, ProductService};
