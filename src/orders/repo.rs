use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::db::{PgStore, StoreResult};
use crate::orders::repo_types::{Order, OrderStatus};

#[async_trait]
pub trait OrderRepo: Send + Sync {
    /// New orders start as `pendente`.
    async fn create(
        &self,
        user_id: Uuid,
        items: serde_json::Value,
        total: Decimal,
    ) -> StoreResult<Order>;

    /// Newest first.
    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<Order>>;

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>>;
}

#[async_trait]
impl OrderRepo for PgStore {
    async fn create(
        &self,
        user_id: Uuid,
        items: serde_json::Value,
        total: Decimal,
    ) -> StoreResult<Order> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, user_id, items, total, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, items, total, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(items)
        .bind(total)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, items, total, status, created_at, updated_at
              FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, items, total, status, created_at, updated_at
              FROM orders
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
               SET status = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, items, total, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
