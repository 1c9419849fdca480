//! REST handlers, one router and one OpenAPI document per resource.
//!
//! The binary nests them under `/api/categories` and `/api/products`.

pub mod categories;
pub mod products;

use axum::http::{HeaderName, HeaderValue, Uri, header::LOCATION};

/// `Location` of a resource created by a POST to `collection`
fn location(collection: &Uri, id: Option<i64>) -> [(HeaderName, HeaderValue); 1] {
    let base = collection.path().trim_end_matches('/');
    let path = match id {
        Some(id) => format!("{}/{}", base, id),
        None => base.to_string(),
    };

    let value = HeaderValue::from_str(&path).unwrap_or_else(|_| HeaderValue::from_static("/"));
    [(LOCATION, value)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_appends_id_to_collection_path() {
        let uri: Uri = "/api/categories".parse().unwrap();
        let [(name, value)] = location(&uri, Some(4));

        assert_eq!(name, LOCATION);
        assert_eq!(value, "/api/categories/4");

        let uri: Uri = "/api/products/?page=1".parse().unwrap();
        let [(_, value)] = location(&uri, Some(26));
        assert_eq!(value, "/api/products/26");
    }
}
