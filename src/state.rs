use std::sync::Arc;

use crate::{
    middleware::auth::JwtKeys,
    notify::Notifier,
    repository::{OrderRepository, UserRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub jwt: JwtKeys,
}
