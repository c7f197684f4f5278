use order_tracking_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    filters::OrderFilter,
    models::{NewOrder, NewUser},
    repository::{
        OrderRepository, PageRequest, PgOrderRepository, PgUserRepository, UserRepository,
    },
    services::auth_service::hash_password,
};
use rust_decimal::Decimal;
use uuid::Uuid;

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let users = PgUserRepository::new(pool.clone());
    let orders = PgOrderRepository::new(orm_from_pool(pool));

    let user_id = ensure_user(&users, DEMO_EMAIL, DEMO_PASSWORD).await?;
    seed_orders(&orders, user_id).await?;

    println!("Seed completed. Demo user: {DEMO_EMAIL} / {DEMO_PASSWORD} (id {user_id})");
    Ok(())
}

async fn ensure_user(users: &PgUserRepository, email: &str, password: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = users.find_by_email(email).await? {
        println!("User {email} already present");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let user = users
        .create(NewUser {
            email: email.to_string(),
            password_hash,
        })
        .await?;

    println!("Created user {email}");
    Ok(user.id)
}

async fn seed_orders(orders: &dyn OrderRepository, user_id: Uuid) -> anyhow::Result<()> {
    let existing = orders
        .list_by_owner(user_id, &OrderFilter::default(), PageRequest::new(1, 1))
        .await?;
    if existing.total > 0 {
        println!("User already has {} orders, skipping", existing.total);
        return Ok(());
    }

    let samples = [
        ("Ferris Mug", Decimal::new(1250, 2)),
        ("Axum Hoodie", Decimal::new(5500, 2)),
        ("Rust Sticker Pack", Decimal::new(499, 2)),
        ("E-book: Async Rust", Decimal::new(2500, 2)),
        ("Mechanical Keyboard", Decimal::new(14999, 2)),
    ];

    for (product_name, amount) in samples {
        orders
            .create(NewOrder {
                user_id,
                product_name: product_name.to_string(),
                amount,
            })
            .await?;
    }

    println!("Seeded {} orders", samples.len());
    Ok(())
}
