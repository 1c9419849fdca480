//! Custom extractors for Axum handlers.
//!
//! Each extractor rejects with the crate's standard [`ErrorResponse`](crate::ErrorResponse)
//! body instead of axum's plain-text rejections.

pub mod id_path;
pub mod json_body;
pub mod query_params;

pub use id_path::IdPath;
pub use json_body::JsonBody;
pub use query_params::QueryParams;
