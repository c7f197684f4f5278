use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{OrderRepository, Page, PageRequest, UserRepository};
use crate::{
    error::{AppError, AppResult},
    filters::OrderFilter,
    models::{INITIAL_ORDER_STATUS, NewOrder, NewUser, Order, User},
    validation::ValidationErrors,
};

#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a fully built order as-is, timestamps included.
    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> AppResult<Page<Order>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<&Order> = orders
            .values()
            .filter(|o| o.user_id == owner_id)
            .filter(|o| filter.matches(o))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.per_page).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page {
            items,
            total,
            request: page,
        })
    }

    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            product_name: order.product_name,
            amount: order.amount,
            status: INITIAL_ORDER_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.orders.write().await.insert(order.id, order.clone());
        Ok(order)
    }

    async fn save(&self, order: &Order) -> AppResult<Order> {
        let mut orders = self.orders.write().await;
        let stored = orders.get_mut(&order.id).ok_or(AppError::NotFound)?;
        stored.status = order.status.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
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

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Validation(ValidationErrors::single(
                "email",
                "The email has already been taken.",
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}
