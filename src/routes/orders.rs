use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderResponse, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order)
                .patch(update_order)
                .put(update_order)
                .delete(delete_order),
        )
}

// An id that is not a UUID cannot name an existing order.
fn parse_order_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("status" = Option<String>, Query, description = "Filter by order status", example = "shipped"),
        ("amount_min" = Option<f64>, Query, description = "Filter by minimum order amount", example = 50.00),
        ("amount_max" = Option<f64>, Query, description = "Filter by maximum order amount", example = 200.00),
        ("created_from" = Option<String>, Query, description = "Orders created on or after this date (YYYY-MM-DD)", example = "2024-01-01"),
        ("created_to" = Option<String>, Query, description = "Orders created on or before this date (YYYY-MM-DD)", example = "2024-12-31"),
        ("page" = Option<u64>, Query, description = "Page number, default 1; 10 orders per page"),
    ),
    responses(
        (status = 200, description = "Orders of the current user", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Malformed filter value"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, &params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "The order has been created", body = ApiResponse<OrderResponse>),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Invalid order data"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderResponse>>)> {
    let Json(payload) = payload?;
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderResponse>>> {
    let id = parse_order_id(&id)?;
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

/// Served for both PATCH and PUT.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Invalid status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<OrderResponse>>> {
    let id = parse_order_id(&id)?;
    let Json(payload) = payload?;
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "The order has been deleted"),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_order_id(&id)?;
    order_service::delete_order(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
