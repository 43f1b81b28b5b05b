//! Public catalog endpoints.

use super::{ProductView, views};
use crate::{
    core::{
        catalog::{ProductQuery, SearchQuery},
        query::{Page, PageRequest, ProductFilter, SortOrder},
    },
    errors::{Error, Result},
    web::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

const DEFAULT_RECOMMENDATIONS: usize = 4;

/// Query string of `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<u64>,
    limit: Option<u64>,
    category: Option<String>,
    sub_category: Option<String>,
    brand: Option<String>,
    sort: Option<String>,
}

/// Query string of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<u64>,
    limit: Option<u64>,
    brand: Option<String>,
    sort: Option<String>,
}

/// Query string of the recommendations endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendParams {
    limit: Option<usize>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_sort(raw: Option<&str>) -> Result<SortOrder> {
    match raw.map(str::trim) {
        None | Some("") => Ok(SortOrder::default()),
        Some(value) => value.parse(),
    }
}

fn page_request(state: &AppState, page: Option<u64>, limit: Option<u64>) -> Result<PageRequest> {
    PageRequest::new(page.unwrap_or(1), limit.unwrap_or(state.default_page_size))
}

/// `GET /api/products`
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<ProductView>>> {
    let query = ProductQuery {
        filter: ProductFilter {
            category: non_blank(params.category),
            sub_category: non_blank(params.sub_category),
            brand: non_blank(params.brand),
            search: None,
        },
        sort: parse_sort(params.sort.as_deref())?,
        page: page_request(&state, params.page, params.limit)?,
    };

    let page = state.catalog.products(&query).await?;
    Ok(Json(page.map(ProductView::from)))
}

/// `GET /api/products/:id`
pub async fn product_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>> {
    let product = state
        .catalog
        .product_by_id(id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;
    Ok(Json(product.into()))
}

/// `GET /api/products/:id/recommendations`
pub async fn recommendations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RecommendParams>,
) -> Result<Json<Vec<ProductView>>> {
    let reference = state
        .catalog
        .product_by_id(id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;

    let limit = params.limit.unwrap_or(DEFAULT_RECOMMENDATIONS);
    let products = state.catalog.recommendations(&reference, limit).await?;
    Ok(Json(views(products)))
}

/// `GET /api/products/featured`
pub async fn featured_products(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    Ok(Json(views(state.catalog.featured_products().await?)))
}

/// `GET /api/products/carousel`
pub async fn carousel_products(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    Ok(Json(views(state.catalog.carousel_products().await?)))
}

/// `GET /api/products/best-sellers`
pub async fn best_seller_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductView>>> {
    Ok(Json(views(state.catalog.best_seller_products().await?)))
}

/// `GET /api/search`
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<ProductView>>> {
    let query = SearchQuery {
        text: params.q.unwrap_or_default(),
        brand: non_blank(params.brand),
        sort: parse_sort(params.sort.as_deref())?,
        page: page_request(&state, params.page, params.limit)?,
    };

    let page = state.catalog.search_products(&query).await?;
    Ok(Json(page.map(ProductView::from)))
}
