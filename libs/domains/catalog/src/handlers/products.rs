use axum::{
    Json, Router,
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, JsonBody, QueryParams,
    errors::responses::{
        BadRequestIdResponse, BadRequestQueryResponse, BadRequestResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use super::location;
use crate::error::CatalogResult;
use crate::models::{
    CategoryDto, Page, PageParams, PageRequest, ProductDto, ProductSortField, SortDirection,
};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::ProductService;

const TAG: &str = "Products";

type SharedService<P, C> = Arc<ProductService<P, C>>;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductDto, CategoryDto, Page<ProductDto>, ProductSortField, SortDirection),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestIdResponse,
            BadRequestQueryResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the product router with all HTTP endpoints
pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PageParams),
    responses(
        (status = 200, description = "Requested page of products", body = Page<ProductDto>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Page<ProductDto>>, AppError> {
    let request = PageRequest::try_from(params).map_err(AppError::InvalidQuery)?;

    let page = service.find_all_paged(request).await?;
    Ok(Json(page))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = ProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto,
            headers(("Location" = String, description = "URI of the new product"))),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    OriginalUri(uri): OriginalUri,
    JsonBody(dto): JsonBody<ProductDto>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.insert(&dto).await?;

    Ok((StatusCode::CREATED, location(&uri, product.id), Json(product)))
}

/// Get a product with its categories
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ProductDto>> {
    let product = service.find_by_id(id).await?;
    Ok(Json(product))
}

/// Replace a product's fields and categories
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    IdPath(id): IdPath,
    JsonBody(dto): JsonBody<ProductDto>,
) -> CatalogResult<Json<ProductDto>> {
    let product = service.update(id, &dto).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, C: CategoryRepository>(
    State(service): State<SharedService<P, C>>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
