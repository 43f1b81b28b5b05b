//! Admin endpoints.
//!
//! `login` exchanges an email and access key for a bearer token. Every other
//! handler resolves that token to an email and re-checks the `admins` table before
//! touching the `products` table.

use super::{ProductView, views};
use crate::{
    core::{
        admin::{ensure_admin, verify_credentials},
        product::{self as product_ops, ProductDraft},
    },
    errors::{Error, Result},
    web::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    email: String,
    access_key: String,
}

/// Issued session.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for later admin requests
    pub token: String,
    /// The admin it belongs to
    pub email: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn database(state: &AppState) -> Result<&DatabaseConnection> {
    state.database.as_deref().ok_or_else(|| Error::Config {
        message: "Admin operations need a live database".to_string(),
    })
}

/// Resolves the caller to an admin email, or fails with 401/403.
async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<String> {
    let token = bearer_token(headers).ok_or(Error::Unauthorized)?;
    let email = state
        .sessions
        .resolve(token)
        .await
        .ok_or(Error::Unauthorized)?;
    let admin = ensure_admin(database(state)?, &email).await?;
    Ok(admin.email)
}

/// `POST /api/admin/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let admin = verify_credentials(database(&state)?, &request.email, &request.access_key).await?;
    let token = state.sessions.open(&admin.email).await;
    info!("Admin {} logged in", admin.email);

    Ok(Json(LoginResponse {
        token,
        email: admin.email,
    }))
}

/// `POST /api/admin/logout`
pub async fn logout(headers: HeaderMap, State(state): State<AppState>) -> Result<StatusCode> {
    let token = bearer_token(&headers).ok_or(Error::Unauthorized)?;
    if state.sessions.close(token).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::Unauthorized)
    }
}

/// `GET /api/admin/products`
pub async fn list_products(
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductView>>> {
    require_admin(&state, &headers).await?;
    let products = product_ops::get_all_products(database(&state)?).await?;
    Ok(Json(views(products)))
}

/// `GET /api/admin/products/:id`
pub async fn get_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>> {
    require_admin(&state, &headers).await?;
    let product = product_ops::get_product_by_id(database(&state)?, id)
        .await?
        .ok_or(Error::ProductNotFound { id })?;
    Ok(Json(product.into()))
}

/// `POST /api/admin/products`
pub async fn create_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<ProductView>)> {
    let email = require_admin(&state, &headers).await?;
    let product = product_ops::create_product(database(&state)?, draft).await?;
    info!("{} created product {} ({})", email, product.id, product.title);
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `PUT /api/admin/products/:id`
pub async fn update_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<ProductView>> {
    let email = require_admin(&state, &headers).await?;
    let product = product_ops::update_product(database(&state)?, id, draft).await?;
    info!("{} updated product {}", email, id);
    Ok(Json(product.into()))
}

/// `DELETE /api/admin/products/:id`
pub async fn delete_product(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>> {
    let email = require_admin(&state, &headers).await?;
    let removed = product_ops::delete_product(database(&state)?, id).await?;
    info!("{} deleted product {} ({})", email, removed.id, removed.title);
    Ok(Json(removed.into()))
}
