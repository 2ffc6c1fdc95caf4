use async_trait::async_trait;
use uuid::Uuid;

use crate::db::{PgStore, StoreResult};
use crate::products::repo_types::{NewProduct, Product, ProductChanges, ProductFilter};

#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Newest first, optionally restricted to one category.
    async fn list(&self, filter: ProductFilter) -> StoreResult<Vec<Product>>;

    async fn find(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn create(&self, new: NewProduct) -> StoreResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductChanges) -> StoreResult<Option<Product>>;

    /// Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
impl ProductRepo for PgStore {
    async fn list(&self, filter: ProductFilter) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, stock, image, created_at, updated_at
              FROM products
             WHERE ($1::text IS NULL OR category = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(filter.category)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, stock, image, created_at, updated_at
              FROM products
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, description, price, category, stock, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, price, category, stock, image, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.description)
        .bind(new.price)
        .bind(new.category)
        .bind(new.stock)
        .bind(new.image)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   price = COALESCE($4, price),
                   category = COALESCE($5, category),
                   stock = COALESCE($6, stock),
                   image = COALESCE($7, image),
                   updated_at = now()
             WHERE id = $1
            RETURNING id, name, description, price, category, stock, image, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.price)
        .bind(changes.category)
        .bind(changes.stock)
        .bind(changes.image)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
