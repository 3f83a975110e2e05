//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, cart_handler};
use crate::config::SESSION_COOKIE_NAME;
use crate::domain::{CartEntry, CartItem, Product, SessionUser, UserInfo};
use crate::types::MessageResponse;

/// OpenAPI documentation for the storefront API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Session-authenticated storefront backend: accounts, sessions and carts"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::login,
        auth_handler::check_auth,
        auth_handler::check_admin,
        auth_handler::user_info,
        auth_handler::current_user,
        auth_handler::logout,
        // Cart endpoints
        cart_handler::add_to_cart,
        cart_handler::list_items,
        cart_handler::check_item,
        cart_handler::remove_item,
        cart_handler::clear_cart,
    ),
    components(
        schemas(
            SessionUser,
            UserInfo,
            Product,
            CartItem,
            CartEntry,
            MessageResponse,
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::CheckAuthResponse,
            auth_handler::CheckAdminResponse,
            auth_handler::UserInfoResponse,
            auth_handler::CurrentUserResponse,
            cart_handler::AddToCartRequest,
        )
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "Authentication", description = "Signup, login and session state"),
        (name = "Cart", description = "Cart of the logged-in user")
    )
)]
pub struct ApiDoc;

/// Documents the session cookie as the API's credential
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE_NAME,
                    "Session id set by POST /login",
                ))),
            );
        }
    }
}
