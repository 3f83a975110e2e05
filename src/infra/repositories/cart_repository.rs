//! Cart repository - cart rows and the product lookups they need.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::cart_item::{self, ActiveModel, Entity as CartItemEntity};
use super::entities::product::Entity as ProductEntity;
use crate::domain::{CartEntry, CartItem, Product};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cart repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find product by ID
    async fn find_product(&self, prod_id: Uuid) -> AppResult<Option<Product>>;

    /// Insert a cart row; `Conflict("Cart item")` if the product is already in the cart.
    async fn insert(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem>;

    /// Find the cart row for a (user, product) pair
    async fn find(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<Option<CartItem>>;

    /// Find cart row by ID
    async fn find_by_id(&self, cart_id: Uuid) -> AppResult<Option<CartItem>>;

    /// A user's cart joined with products, oldest first
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<CartEntry>>;

    /// Delete a cart row, returning it if it existed
    async fn delete(&self, cart_id: Uuid) -> AppResult<Option<CartItem>>;

    /// Delete all of a user's cart rows, returning them
    async fn clear(&self, user_id: Uuid) -> AppResult<Vec<CartItem>>;
}

/// SeaORM implementation of CartRepository
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_product(&self, prod_id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(prod_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn insert(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<CartItem> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            prod_id: Set(prod_id),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, "Cart item"))?;

        Ok(CartItem::from(model))
    }

    async fn find(&self, user_id: Uuid, prod_id: Uuid) -> AppResult<Option<CartItem>> {
        let result = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProdId.eq(prod_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(CartItem::from))
    }

    async fn find_by_id(&self, cart_id: Uuid) -> AppResult<Option<CartItem>> {
        let result = CartItemEntity::find_by_id(cart_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(CartItem::from))
    }

    async fn list(&self, user_id: Uuid) -> AppResult<Vec<CartEntry>> {
        let rows = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        // Inner-join semantics: rows whose product vanished are skipped
        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| {
                product.map(|p| CartEntry {
                    cart_id: item.id,
                    product: Product::from(p),
                })
            })
            .collect())
    }

    async fn delete(&self, cart_id: Uuid) -> AppResult<Option<CartItem>> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let Some(model) = CartItemEntity::find_by_id(cart_id)
            .one(&txn)
            .await
            .map_err(AppError::from)?
        else {
            txn.rollback().await.map_err(AppError::from)?;
            return Ok(None);
        };

        CartItemEntity::delete_by_id(cart_id)
            .exec(&txn)
            .await
            .map_err(AppError::from)?;
        txn.commit().await.map_err(AppError::from)?;

        Ok(Some(CartItem::from(model)))
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<Vec<CartItem>> {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let models = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .all(&txn)
            .await
            .map_err(AppError::from)?;

        CartItemEntity::delete_many()
            .filter(cart_item::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_err(AppError::from)?;
        txn.commit().await.map_err(AppError::from)?;

        Ok(models.into_iter().map(CartItem::from).collect())
    }
}
