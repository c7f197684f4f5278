use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::{OrderRepository, Page, PageRequest, UserRepository};
use crate::{
    db::{DbPool, OrmConn},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    filters::OrderFilter,
    models::{INITIAL_ORDER_STATUS, NewOrder, NewUser, Order, User},
    validation::ValidationErrors,
};

/// Orders stored through SeaORM.
#[derive(Clone)]
pub struct PgOrderRepository {
    orm: OrmConn,
}

impl PgOrderRepository {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let order = Orders::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(order_from_entity);
        Ok(order)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> AppResult<Page<Order>> {
        let finder = filter
            .apply(Orders::find().filter(OrderCol::UserId.eq(owner_id)))
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id);

        let total = finder.clone().count(&self.orm).await?;

        let items = finder
            .limit(page.per_page)
            .offset(page.offset())
            .all(&self.orm)
            .await?
            .into_iter()
            .map(order_from_entity)
            .collect();

        Ok(Page {
            items,
            total,
            request: page,
        })
    }

    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(order.user_id),
            product_name: Set(order.product_name),
            amount: Set(order.amount),
            status: Set(INITIAL_ORDER_STATUS.to_string()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&self.orm)
        .await?;

        Ok(order_from_entity(order))
    }

    async fn save(&self, order: &Order) -> AppResult<Order> {
        let existing = Orders::find_by_id(order.id).one(&self.orm).await?;
        let existing = match existing {
            Some(o) => o,
            None => return Err(AppError::NotFound),
        };

        let mut active: OrderActive = existing.into();
        active.status = Set(order.status.clone());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.orm).await?;

        Ok(order_from_entity(updated))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Orders::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        product_name: model.product_name,
        amount: model.amount,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

/// Users stored through plain sqlx queries.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.email.as_str())
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(AppError::Validation(ValidationErrors::single(
                    "email",
                    "The email has already been taken.",
                )))
            }
            Err(err) => Err(err.into()),
        }
    }
}
