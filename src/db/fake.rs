//! In-memory store used by handler tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, User};
use crate::db::{StoreError, StoreResult};
use crate::orders::repo::OrderRepo;
use crate::orders::repo_types::{Order, OrderStatus};
use crate::products::repo::ProductRepo;
use crate::products::repo_types::{NewProduct, Product, ProductChanges, ProductFilter};

/// Rows are kept in insertion order; "newest first" reads iterate in reverse.
#[derive(Default)]
pub struct FakeStore {
    users: Mutex<Vec<User>>,
    products: Mutex<Vec<Product>>,
    orders: Mutex<Vec<Order>>,
    unavailable: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, user lookups and writes fail like a lost connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn reset_token_matches(user: &User, token_hash: &str, now: OffsetDateTime) -> bool {
    user.reset_token_hash.as_deref() == Some(token_hash)
        && user.reset_token_expires_at.is_some_and(|exp| exp > now)
}

#[async_trait]
impl UserRepo for FakeStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new: NewUser) -> StoreResult<User> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            phone: new.phone,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<String>,
        phone: Option<String>,
    ) -> StoreResult<Option<User>> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(phone) = phone {
            user.phone = Some(phone);
        }
        user.updated_at = Some(OffsetDateTime::now_utc());
        Ok(Some(user.clone()))
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> StoreResult<()> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.reset_token_hash = Some(token_hash.to_string());
            user.reset_token_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
    ) -> StoreResult<Option<Uuid>> {
        self.check_available()?;
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| reset_token_matches(u, token_hash, now))
            .map(|u| u.id))
    }

    async fn reset_password(
        &self,
        token_hash: &str,
        now: OffsetDateTime,
        password_hash: &str,
    ) -> StoreResult<Option<Uuid>> {
        self.check_available()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| reset_token_matches(u, token_hash, now))
        else {
            return Ok(None);
        };
        user.password_hash = password_hash.to_string();
        user.reset_token_hash = None;
        user.reset_token_expires_at = None;
        user.updated_at = Some(now);
        Ok(Some(user.id))
    }
}

#[async_trait]
impl ProductRepo for FakeStore {
    async fn list(&self, filter: ProductFilter) -> StoreResult<Vec<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products
            .iter()
            .rev()
            .filter(|p| filter.category.as_deref().map_or(true, |c| p.category == c))
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            stock: new.stock,
            image: new.image,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> StoreResult<Option<Product>> {
        let mut products = self.products.lock().unwrap();
        let Some(p) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = changes.name {
            p.name = v;
        }
        if let Some(v) = changes.description {
            p.description = v;
        }
        if let Some(v) = changes.price {
            p.price = v;
        }
        if let Some(v) = changes.category {
            p.category = v;
        }
        if let Some(v) = changes.stock {
            p.stock = v;
        }
        if let Some(v) = changes.image {
            p.image = Some(v);
        }
        p.updated_at = Some(OffsetDateTime::now_utc());
        Ok(Some(p.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait]
impl OrderRepo for FakeStore {
    async fn create(
        &self,
        user_id: Uuid,
        items: serde_json::Value,
        total: Decimal,
    ) -> StoreResult<Order> {
        let order = Order {
            id: Uuid::new_v4(),
            user_id,
            items,
            total,
            status: OrderStatus::Pending.as_str().to_string(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn list_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid) -> StoreResult<Option<Order>> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_status(&self, id: Uuid, status: OrderStatus) -> StoreResult<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status.as_str().to_string();
        order.updated_at = Some(OffsetDateTime::now_utc());
        Ok(Some(order.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".into(),
            email: email.into(),
            password_hash: "hash".into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = FakeStore::new();
        UserRepo::create(&store, new_user("a@x.com")).await.unwrap();
        let err = UserRepo::create(&store, new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[tokio::test]
    async fn reset_token_is_valid_strictly_before_expiry() {
        let store = FakeStore::new();
        let user = UserRepo::create(&store, new_user("a@x.com")).await.unwrap();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(30);
        store.set_reset_token(user.id, "h", expires_at).await.unwrap();

        let before = expires_at - Duration::seconds(1);
        assert_eq!(store.find_by_reset_token("h", before).await.unwrap(), Some(user.id));
        assert_eq!(store.find_by_reset_token("h", expires_at).await.unwrap(), None);
        assert_eq!(store.reset_password("h", expires_at, "new").await.unwrap(), None);

        assert_eq!(store.reset_password("h", before, "new").await.unwrap(), Some(user.id));
        assert_eq!(store.find_by_reset_token("h", before).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_store_fails_user_calls() {
        let store = FakeStore::new();
        store.set_unavailable(true);
        let err = store
            .find_by_reset_token("h", OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));

        store.set_unavailable(false);
        assert!(store.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_reset_token_replaces_the_previous_one() {
        let store = FakeStore::new();
        let user = UserRepo::create(&store, new_user("a@x.com")).await.unwrap();
        let expires_at = OffsetDateTime::now_utc() + Duration::minutes(30);
        store.set_reset_token(user.id, "first", expires_at).await.unwrap();
        store.set_reset_token(user.id, "second", expires_at).await.unwrap();

        let now = OffsetDateTime::now_utc();
        assert_eq!(store.find_by_reset_token("first", now).await.unwrap(), None);
        assert_eq!(store.find_by_reset_token("second", now).await.unwrap(), Some(user.id));
    }
}
