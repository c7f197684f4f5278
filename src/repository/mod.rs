//! Storage seams for orders and users.
//!
//! Services only see these traits; `postgres` backs them with the database
//! and `memory` keeps everything in-process.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    filters::OrderFilter,
    models::{NewOrder, NewUser, Order, User},
    response::Meta,
};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryOrderRepository, MemoryUserRepository};
pub use postgres::{PgOrderRepository, PgUserRepository};

/// Postgres binds LIMIT and OFFSET as `BIGINT`.
const MAX_ROWS: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Clamps both values so that `offset()` and `per_page` fit in a `BIGINT`.
    /// A page past that bound is simply an empty page.
    pub fn new(page: u64, per_page: u64) -> Self {
        let per_page = per_page.clamp(1, MAX_ROWS);
        Self {
            page: page.clamp(1, MAX_ROWS / per_page + 1),
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    pub fn meta(&self) -> Meta {
        Meta::new(self.request.page, self.request.per_page, self.total)
    }
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>>;

    /// Orders owned by `owner_id` that pass `filter`, newest first.
    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> AppResult<Page<Order>>;

    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    /// Writes back the order's status and refreshes `updated_at`. Other
    /// fields, the owner in particular, are never touched.
    async fn save(&self, order: &Order) -> AppResult<Order>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fails with a validation error if the email is already taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_clamps_and_offsets() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, per_page: 1 });
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn huge_pages_stay_within_bigint() {
        for (page, per_page) in [(u64::MAX, 10), (922_337_203_685_477_582, 10), (2, u64::MAX)] {
            let request = PageRequest::new(page, per_page);
            assert!(request.offset() <= MAX_ROWS, "page {page} x {per_page}");
            assert!(request.per_page <= MAX_ROWS);
        }
        assert_eq!(PageRequest::new(u64::MAX, 1).offset(), MAX_ROWS);
    }

    #[test]
    fn page_meta_reports_totals() {
        let page = Page {
            items: vec![1, 2, 3],
            total: 23,
            request: PageRequest::new(1, 10),
        }
        .map(|n| n * 2);

        assert_eq!(page.items, vec![2, 4, 6]);
        let meta = page.meta();
        assert_eq!(meta.total, Some(23));
        assert_eq!(meta.last_page, Some(3));
    }
}
