//! Cart service - session-scoped cart operations.
//!
//! Every call takes the acting [`SessionUser`]; a user may only touch their
//! own cart unless they are an admin.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CartEntry, CartItem, SessionUser};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::CartRepository;

/// Cart service trait for dependency injection.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Put a product into `user_id`'s cart
    async fn add(&self, actor: &SessionUser, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem>;

    /// List `user_id`'s cart with product details
    async fn items(&self, actor: &SessionUser, user_id: Uuid) -> AppResult<Vec<CartEntry>>;

    /// The cart row for a product, if it is in the cart
    async fn check(&self, actor: &SessionUser, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem>;

    /// Remove a single cart row
    async fn remove(&self, actor: &SessionUser, cart_id: Uuid) -> AppResult<CartItem>;

    /// Empty `user_id`'s cart
    async fn clear(&self, actor: &SessionUser, user_id: Uuid) -> AppResult<Vec<CartItem>>;
}

/// Owner-or-admin rule shared by all cart operations.
fn authorize(actor: &SessionUser, owner: Uuid) -> AppResult<()> {
    if actor.id == owner || actor.is_admin {
        Ok(())
    } else {
        tracing::warn!(actor = %actor.id, owner = %owner, "Cart access denied");
        Err(AppError::Forbidden)
    }
}

/// Concrete implementation of CartService.
pub struct CartManager {
    carts: Arc<dyn CartRepository>,
}

impl CartManager {
    pub fn new(carts: Arc<dyn CartRepository>) -> Self {
        Self { carts }
    }
}

#[async_trait]
impl CartService for CartManager {
    async fn add(&self, actor: &SessionUser, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem> {
        authorize(actor, user_id)?;

        self.carts
            .find_product(prod_id)
            .await?
            .ok_or_not_found("Product")?;

        let item = self.carts.insert(user_id, prod_id).await?;
        tracing::debug!(user_id = %user_id, prod_id = %prod_id, "Added to cart");
        Ok(item)
    }

    async fn items(&self, actor: &SessionUser, user_id: Uuid) -> AppResult<Vec<CartEntry>> {
        authorize(actor, user_id)?;
        self.carts.list(user_id).await
    }

    async fn check(&self, actor: &SessionUser, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem> {
        authorize(actor, user_id)?;
        self.carts
            .find(user_id, prod_id)
            .await?
            .ok_or_not_found("Cart item")
    }

    async fn remove(&self, actor: &SessionUser, cart_id: Uuid) -> AppResult<CartItem> {
        let item = self
            .carts
            .find_by_id(cart_id)
            .await?
            .ok_or_not_found("Cart item")?;
        authorize(actor, item.user_id)?;

        // A concurrent remove may have won the race
        self.carts
            .delete(cart_id)
            .await?
            .ok_or_not_found("Cart item")
    }

    async fn clear(&self, actor: &SessionUser, user_id: Uuid) -> AppResult<Vec<CartItem>> {
        authorize(actor, user_id)?;

        let removed = self.carts.clear(user_id).await?;
        tracing::debug!(user_id = %user_id, count = removed.len(), "Cart cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(is_admin: bool) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            name: "A".into(),
            is_admin,
        }
    }

    #[test]
    fn test_owner_is_authorized() {
        let user = actor(false);
        assert!(authorize(&user, user.id).is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let user = actor(false);
        assert!(matches!(
            authorize(&user, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_admin_may_act_for_anyone() {
        assert!(authorize(&actor(true), Uuid::new_v4()).is_ok());
    }
}
