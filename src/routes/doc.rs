use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, UserResponse},
        orders::{CreateOrderRequest, OrderList, OrderResponse, UpdateOrderStatusRequest},
    },
    response::{ApiResponse, Meta},
    routes::{auth, health, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token returned by /api/auth/login"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Order Tracking API",
        description = "API for managing orders, including creating, updating, and deleting orders."
    ),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
    ),
    components(
        schemas(
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderResponse,
            OrderList,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            UserResponse,
            health::HealthData,
            Meta,
            ApiResponse<OrderResponse>,
            ApiResponse<OrderList>,
            ApiResponse<UserResponse>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
