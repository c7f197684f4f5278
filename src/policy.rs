use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Order,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    View,
    Update,
    Delete,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::View => "view",
            OrderAction::Update => "update",
            OrderAction::Delete => "delete",
        }
    }
}

/// Orders are visible to, and mutable by, their owner only.
pub struct OrderPolicy;

impl OrderPolicy {
    pub fn allows(actor: Option<&AuthUser>, action: OrderAction, order: &Order) -> bool {
        let Some(actor) = actor else {
            return false;
        };
        match action {
            OrderAction::View | OrderAction::Update | OrderAction::Delete => {
                actor.user_id == order.user_id
            }
        }
    }

    pub fn authorize(actor: &AuthUser, action: OrderAction, order: &Order) -> AppResult<()> {
        if Self::allows(Some(actor), action, order) {
            return Ok(());
        }
        tracing::debug!(
            user_id = %actor.user_id,
            order_id = %order.id,
            action = action.as_str(),
            "order access denied"
        );
        Err(AppError::Forbidden)
    }
}
