use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{NewOrder, Order},
    validation::{ValidationErrors, required_string},
};

pub const PRODUCT_NAME_MAX_CHARS: usize = 255;
pub const STATUS_MAX_CHARS: usize = 255;

/// Largest value a `NUMERIC(12, 2)` column can hold.
const AMOUNT_MAX: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Body of `POST /api/orders`. Any other field the caller sends is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[schema(example = "Test Product")]
    pub product_name: Option<String>,
    #[schema(value_type = Option<f64>, example = 99.99)]
    pub amount: Option<Decimal>,
}

impl CreateOrderRequest {
    pub fn validate(self, owner: Uuid) -> Result<NewOrder, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let product_name = required_string(
            &mut errors,
            "product_name",
            self.product_name.as_deref(),
            PRODUCT_NAME_MAX_CHARS,
        );

        let amount = match self.amount {
            None => {
                errors.add("amount", "The amount field is required.");
                None
            }
            Some(amount) if amount < Decimal::ZERO => {
                errors.add("amount", "The amount field must be at least 0.");
                None
            }
            Some(amount) if amount.round_dp(2) > AMOUNT_MAX => {
                errors.add("amount", "The amount field is too large.");
                None
            }
            Some(amount) => Some(amount.round_dp(2)),
        };

        match (product_name, amount) {
            (Some(product_name), Some(amount)) => errors.into_result(NewOrder {
                user_id: owner,
                product_name,
                amount,
            }),
            _ => Err(errors),
        }
    }
}

/// Body of `PATCH /api/orders/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[schema(example = "shipped")]
    pub status: Option<String>,
}

impl UpdateOrderStatusRequest {
    pub fn validate(self) -> Result<String, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match required_string(&mut errors, "status", self.status.as_deref(), STATUS_MAX_CHARS) {
            Some(status) => Ok(status),
            None => Err(errors),
        }
    }
}

/// Public shape of an order. The owner id is not exposed.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct OrderResponse {
    pub id: Uuid,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 99.99)]
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            product_name: order.product_name,
            amount: order.amount,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderResponse>)]
    pub items: Vec<OrderResponse>,
}
