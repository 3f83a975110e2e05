//! Cart handlers. All routes sit behind the session middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CartEntry, CartItem};
use crate::errors::AppResult;
use crate::types::ApiResponse;

/// Add-to-cart request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    /// Product to add
    pub prod_id: Uuid,
    /// Cart owner; defaults to the session user
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Create cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_to_cart))
        .route("/items/:user_id", get(list_items))
        .route("/check/:user_id/:prod_id", get(check_item))
        .route("/remove/:cart_id", delete(remove_item))
        .route("/clear/:user_id", delete(clear_cart))
}

/// Add a product to a cart
#[utoipa::path(
    post,
    path = "/cart/add",
    tag = "Cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added to cart", body = CartItem),
        (status = 400, description = "Validation error or already in cart"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    let user_id = payload.user_id.unwrap_or(actor.id);
    let item = state
        .cart_service
        .add(&actor, user_id, payload.prod_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(item, "Item added to cart successfully")),
    ))
}

/// List a user's cart
#[utoipa::path(
    get,
    path = "/cart/items/{user_id}",
    tag = "Cart",
    params(("user_id" = Uuid, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Cart items", body = Vec<CartEntry>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the cart owner")
    )
)]
pub async fn list_items(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CartEntry>>>> {
    let items = state.cart_service.items(&actor, user_id).await?;
    Ok(Json(ApiResponse::with_message(
        items,
        "Cart items retrieved successfully",
    )))
}

/// Check whether a product is in a user's cart
#[utoipa::path(
    get,
    path = "/cart/check/{user_id}/{prod_id}",
    tag = "Cart",
    params(
        ("user_id" = Uuid, Path, description = "Cart owner"),
        ("prod_id" = Uuid, Path, description = "Product")
    ),
    responses(
        (status = 200, description = "Product is in the cart", body = CartItem),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "Product not in the cart")
    )
)]
pub async fn check_item(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path((user_id, prod_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let item = state.cart_service.check(&actor, user_id, prod_id).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Product is already in the cart",
    )))
}

/// Remove one cart row
#[utoipa::path(
    delete,
    path = "/cart/remove/{cart_id}",
    tag = "Cart",
    params(("cart_id" = Uuid, Path, description = "Cart row")),
    responses(
        (status = 200, description = "Item removed", body = CartItem),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the cart owner"),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let item = state.cart_service.remove(&actor, cart_id).await?;
    Ok(Json(ApiResponse::with_message(
        item,
        "Item removed from cart successfully",
    )))
}

/// Empty a user's cart
#[utoipa::path(
    delete,
    path = "/cart/clear/{user_id}",
    tag = "Cart",
    params(("user_id" = Uuid, Path, description = "Cart owner")),
    responses(
        (status = 200, description = "Cart cleared", body = Vec<CartItem>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the cart owner")
    )
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CartItem>>>> {
    let removed = state.cart_service.clear(&actor, user_id).await?;
    Ok(Json(ApiResponse::with_message(
        removed,
        "Cart cleared successfully",
    )))
}
