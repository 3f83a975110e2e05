//! Shared fixtures: in-memory repositories and a fully wired router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use storefront_api::api::{create_router, AppState};
use storefront_api::domain::{CartEntry, CartItem, NewUser, Product, User};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::infra::{CartRepository, MemorySessionStore, SessionStore, UserRepository};
use storefront_api::services::{Authenticator, CartManager};

/// Users table with the email unique constraint.
#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUsers {
    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.remove(&id);
    }

    pub async fn set_admin(&self, id: Uuid, is_admin: bool) {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.is_admin = is_admin;
        }
    }

    pub async fn id_of(&self, email: &str) -> Option<Uuid> {
        self.find_by_email(email).await.ok().flatten().map(|u| u.id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict("User"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            contact_no: new_user.contact_no,
            is_admin: new_user.is_admin,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

/// Products and cart rows with the (user, product) unique constraint.
#[derive(Default)]
pub struct InMemoryCarts {
    products: RwLock<HashMap<Uuid, Product>>,
    items: RwLock<Vec<CartItem>>,
}

impl InMemoryCarts {
    pub async fn add_product(&self, name: &str, price_cents: i64) -> Uuid {
        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price_cents,
        };
        let id = product.id;
        self.products.write().await.insert(id, product);
        id
    }
}

#[async_trait]
impl CartRepository for InMemoryCarts {
    async fn find_product(&self, prod_id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.products.read().await.get(&prod_id).cloned())
    }

    async fn insert(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem> {
        let mut items = self.items.write().await;
        if items
            .iter()
            .any(|i| i.user_id == user_id && i.prod_id == prod_id)
        {
            return Err(AppError::conflict("Cart item"));
        }
        let item = CartItem {
            id: Uuid::new_v4(),
            user_id,
            prod_id,
            created_at: Utc::now(),
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn find(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<Option<CartItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|i| i.user_id == user_id && i.prod_id == prod_id)
            .cloned())
    }

    async fn find_by_id(&self, cart_id: Uuid) -> AppResult<Option<CartItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|i| i.id == cart_id)
            .cloned())
    }

    async fn list(&self, user_id: Uuid) -> AppResult<Vec<CartEntry>> {
        let products = self.products.read().await;
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter_map(|i| {
                products.get(&i.prod_id).map(|p| CartEntry {
                    cart_id: i.id,
                    product: p.clone(),
                })
            })
            .collect())
    }

    async fn delete(&self, cart_id: Uuid) -> AppResult<Option<CartItem>> {
        let mut items = self.items.write().await;
        let position = items.iter().position(|i| i.id == cart_id);
        Ok(position.map(|idx| items.remove(idx)))
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<Vec<CartItem>> {
        let mut items = self.items.write().await;
        let (removed, kept): (Vec<CartItem>, Vec<CartItem>) =
            items.drain(..).partition(|i| i.user_id == user_id);
        *items = kept;
        Ok(removed)
    }
}

/// Router over in-memory stores, with handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUsers>,
    pub carts: Arc<InMemoryCarts>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let users = Arc::new(InMemoryUsers::default());
        let carts = Arc::new(InMemoryCarts::default());
        let store: Arc<dyn SessionStore> = sessions.clone();

        let state = AppState::new(
            Arc::new(Authenticator::new(users.clone(), store, 3600)),
            Arc::new(CartManager::new(carts.clone())),
        );

        Self {
            router: create_router(state),
            users,
            carts,
            sessions,
        }
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// `name=value` of the session cookie set by a response, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sessionId="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
