use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

// ============================================================================
// Entities
// ============================================================================

/// A product category. `id` is `None` until the store assigns one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Unresolved handle carrying only the id. Whether the row exists is
    /// only known once the handle is saved.
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: String,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

impl Product {
    /// Unresolved handle carrying only the id, see [`Category::reference`].
    pub fn reference(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryDto {
    /// Assigned by the store; ignored on insert and update
    #[serde(default)]
    #[schema(example = 1)]
    pub id: Option<i64>,
    /// Not needed when the DTO only references a category from a product
    #[serde(default)]
    #[schema(example = "Books")]
    pub name: String,
}

impl CategoryDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

impl From<&CategoryDto> for Category {
    fn from(dto: &CategoryDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDto {
    #[serde(default)]
    #[schema(example = 1)]
    pub id: Option<i64>,
    #[schema(example = "The Lord of the Rings")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = 90.5)]
    pub price: f64,
    #[serde(default)]
    pub img_url: String,
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    /// Only the ids are used on insert and update
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            categories: product
                .categories
                .into_iter()
                .map(CategoryDto::from)
                .collect(),
        }
    }
}

// ============================================================================
// Paging
// ============================================================================

/// Sortable product columns
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProductSortField {
    #[default]
    Id,
    Name,
    Price,
    Date,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: ProductSortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn desc(field: ProductSortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Parses `field` or `field,direction`, e.g. `price,desc`.
impl FromStr for Sort {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match raw.split_once(',') {
            Some((field, direction)) => (field.trim(), Some(direction.trim())),
            None => (raw.trim(), None),
        };

        let field = field
            .parse::<ProductSortField>()
            .map_err(|_| format!("Invalid sort field: {}", field))?;

        let direction = match direction {
            Some(direction) => direction
                .parse::<SortDirection>()
                .map_err(|_| format!("Invalid sort direction: {}", direction))?,
            None => SortDirection::default(),
        };

        Ok(Self { field, direction })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index
    pub page: u64,
    pub size: u64,
    pub sort: Sort,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 12;
    pub const MAX_SIZE: u64 = 100;

    /// `size` is clamped to `1..=MAX_SIZE`.
    pub fn new(page: u64, size: u64, sort: Sort) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
            sort,
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_SIZE, Sort::default())
    }
}

/// Query string for paged listings: `?page=0&size=12&sort=id,desc`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Zero-based page index (default 0)
    pub page: Option<u64>,
    /// Page size, 1 to 100 (default 12)
    pub size: Option<u64>,
    /// `field[,asc|desc]` where field is one of id, name, price, date (default `id,asc`)
    pub sort: Option<String>,
}

impl TryFrom<PageParams> for PageRequest {
    type Error = String;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        let sort = match params.sort.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Sort::default(),
        };

        Ok(PageRequest::new(
            params.page.unwrap_or(0),
            params.size.unwrap_or(Self::DEFAULT_SIZE),
            sort,
        ))
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based index of this page
    pub number: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: &PageRequest) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
            number: request.page,
            size: request.size,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parses_field_and_direction() {
        assert_eq!(
            "price,desc".parse::<Sort>().unwrap(),
            Sort::new(ProductSortField::Price, SortDirection::Desc)
        );
        assert_eq!(
            "NAME".parse::<Sort>().unwrap(),
            Sort::new(ProductSortField::Name, SortDirection::Asc)
        );
    }

    #[test]
    fn test_sort_rejects_unknown_field() {
        let err = "colour,asc".parse::<Sort>().unwrap_err();
        assert_eq!(err, "Invalid sort field: colour");

        let err = "id,sideways".parse::<Sort>().unwrap_err();
        assert_eq!(err, "Invalid sort direction: sideways");
    }

    #[test]
    fn test_page_params_defaults() {
        let request = PageRequest::try_from(PageParams::default()).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.size, 12);
        assert_eq!(request.sort, Sort::new(ProductSortField::Id, SortDirection::Asc));
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(PageRequest::new(0, 0, Sort::default()).size, 1);
        assert_eq!(PageRequest::new(0, 5000, Sort::default()).size, 100);
    }

    #[test]
    fn test_page_counts_pages_and_maps_content() {
        let request = PageRequest::new(2, 12, Sort::default());
        let page = Page::new(vec![1, 2], 26, &request);

        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 2);

        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.content, vec![10, 20]);
        assert_eq!(mapped.total_elements, 26);
    }

    #[test]
    fn test_product_dto_keeps_categories() {
        let product = Product {
            id: Some(1),
            name: "The Lord of the Rings".to_string(),
            price: 90.5,
            categories: vec![Category {
                id: Some(1),
                name: "Books".to_string(),
            }],
            ..Default::default()
        };

        let dto = ProductDto::from(product);
        assert_eq!(dto.categories, vec![CategoryDto {
            id: Some(1),
            name: "Books".to_string()
        }]);
    }
}
