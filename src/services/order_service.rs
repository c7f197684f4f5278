use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderResponse, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    filters::FILTER_KEYS,
    middleware::auth::AuthUser,
    models::Order,
    notify::OrderStatusChanged,
    policy::{OrderAction, OrderPolicy},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    params: &HashMap<String, String>,
) -> AppResult<ApiResponse<OrderList>> {
    let query = OrderListQuery::parse(params)?;
    if !query.filter.is_empty() {
        let keys: Vec<&str> = FILTER_KEYS
            .into_iter()
            .filter(|key| params.contains_key(*key))
            .collect();
        tracing::debug!(user_id = %user.user_id, filters = ?keys, "filtered order listing");
    }

    let page = state
        .orders
        .list_by_owner(user.user_id, &query.filter, query.page)
        .await?
        .map(OrderResponse::from);

    let meta = page.meta();
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: page.items },
        Some(meta),
    ))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    let new_order = payload.validate(user.user_id)?;
    let order = state.orders.create(new_order).await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        amount = %order.amount,
        "order created"
    );

    Ok(ApiResponse::success(
        "Order created",
        OrderResponse::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = find_authorized(state, user, id, OrderAction::View).await?;

    Ok(ApiResponse::success(
        "OK",
        OrderResponse::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    let mut order = find_authorized(state, user, id, OrderAction::Update).await?;
    let status = payload.validate()?;

    let previous_status = std::mem::replace(&mut order.status, status);
    let order = state.orders.save(&order).await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        previous_status = %previous_status,
        status = %order.status,
        "order status updated"
    );

    notify_status_changed(state, &order, previous_status).await;

    Ok(ApiResponse::success(
        "Order updated",
        OrderResponse::from(order),
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let order = find_authorized(state, user, id, OrderAction::Delete).await?;

    if !state.orders.delete(order.id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(order_id = %order.id, user_id = %user.user_id, "order deleted");
    Ok(())
}

async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: OrderAction,
) -> AppResult<Order> {
    let order = match state.orders.find_by_id(id).await? {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    OrderPolicy::authorize(user, action, &order)?;
    Ok(order)
}

/// The update is already persisted here, so failures are only logged.
async fn notify_status_changed(state: &AppState, order: &Order, previous_status: String) {
    let owner_email = match state.users.find_by_id(order.user_id).await {
        Ok(Some(owner)) => Some(owner.email),
        Ok(None) => {
            tracing::warn!(order_id = %order.id, owner_id = %order.user_id, "order owner not found");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, owner_id = %order.user_id, "owner lookup failed");
            None
        }
    };

    let event = OrderStatusChanged {
        order_id: order.id,
        owner_id: order.user_id,
        owner_email,
        previous_status,
        status: order.status.clone(),
        changed_at: order.updated_at,
    };

    if let Err(err) = state.notifier.order_status_changed(&event).await {
        tracing::warn!(error = %err, order_id = %order.id, "notification failed");
    }
}
