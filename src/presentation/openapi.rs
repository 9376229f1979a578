use crate::application::auth::login::LoginRequest;
use crate::application::auth::password_reset::{
    RequestPasswordResetRequest, ResetPasswordRequest, VerifyResetCodeRequest,
};
use crate::application::auth::register::RegisterRequest;
use crate::application::orders::place::{OrderLineRequest, PlaceOrderRequest};
use crate::application::orders::update_item::UpdateItemQuantityRequest;
use crate::application::orders::update_status::UpdateOrderStatusRequest;
use crate::application::users::update::UpdateUserRequest;
use crate::presentation::dtos::{
    AuthTokenResource, ItemQuantityResource, OrderDetailResource, OrderItemResource,
    OrderResource, UserResource,
};
use crate::shared::error::{ErrorResponse, JsonApiError, JsonApiErrorSource};
use crate::shared::pagination::PageParams;
use crate::shared::response::{JsonApiLinks, JsonApiMeta, JsonApiResource, JsonApiResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Grocer API",
        version = "0.1.0",
        description = "Grocery storefront backend: accounts, sessions and orders\n\nThis API follows the JSON:API v1.1 specification for all responses.",
        contact(
            name = "API Support",
            email = "support@example.com"
        )
    ),
    paths(
        crate::presentation::handlers::health::health_check,
        crate::presentation::client::handlers::auth::register,
        crate::presentation::client::handlers::auth::authenticate,
        crate::presentation::client::handlers::auth::refresh_token,
        crate::presentation::client::handlers::auth::logout,
        crate::presentation::client::handlers::auth::activate,
        crate::presentation::client::handlers::auth::request_password_reset,
        crate::presentation::client::handlers::auth::verify_reset_code,
        crate::presentation::client::handlers::auth::reset_password,
        crate::presentation::client::handlers::profile::me,
        crate::presentation::client::handlers::profile::orders,
        crate::presentation::client::handlers::users::update_user,
        crate::presentation::client::handlers::orders::place_order,
        crate::presentation::client::handlers::orders::get_order,
        crate::presentation::client::handlers::orders::update_item_quantity,
        crate::presentation::admin::handlers::orders::list_orders,
        crate::presentation::admin::handlers::orders::update_order,
        crate::presentation::admin::handlers::orders::delete_order,
        crate::presentation::admin::handlers::users::delete_user,
    ),
    components(
        schemas(
            // Request DTOs
            RegisterRequest,
            LoginRequest,
            RequestPasswordResetRequest,
            VerifyResetCodeRequest,
            ResetPasswordRequest,
            UpdateUserRequest,
            PlaceOrderRequest,
            OrderLineRequest,
            UpdateItemQuantityRequest,
            UpdateOrderStatusRequest,
            PageParams,

            // JSON:API Resource types
            UserResource,
            AuthTokenResource,
            OrderResource,
            OrderItemResource,
            OrderDetailResource,
            ItemQuantityResource,
            JsonApiResource<UserResource>,
            JsonApiResource<AuthTokenResource>,
            JsonApiResource<OrderResource>,
            JsonApiResource<OrderDetailResource>,
            JsonApiResource<ItemQuantityResource>,

            // JSON:API Response types
            JsonApiResponse<JsonApiResource<UserResource>>,
            JsonApiResponse<JsonApiResource<AuthTokenResource>>,
            JsonApiResponse<JsonApiResource<OrderDetailResource>>,
            JsonApiResponse<JsonApiResource<ItemQuantityResource>>,
            JsonApiResponse<JsonApiResource<OrderResource>>,
            JsonApiResponse<Vec<JsonApiResource<OrderResource>>>,
            JsonApiResponse<serde_json::Value>,

            // JSON:API Metadata and Links
            JsonApiMeta,
            JsonApiLinks,

            // JSON:API Error types
            ErrorResponse,
            JsonApiError,
            JsonApiErrorSource,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity"),
        (name = "Client / Auth", description = "Registration, sessions and password recovery"),
        (name = "Client / Profile", description = "The authenticated user's own data"),
        (name = "Client / Users", description = "Account maintenance"),
        (name = "Client / Orders", description = "Placing and adjusting orders"),
        (name = "Admin / Orders", description = "Order oversight"),
        (name = "Admin / User Management", description = "Account administration")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
