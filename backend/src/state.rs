use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repositories::{UserRepository, UserRepositoryTrait};
use crate::services::{NotificationService, TicketService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub users: Arc<dyn UserRepositoryTrait>,
    pub tickets: TicketService,
    pub notifications: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let users: Arc<dyn UserRepositoryTrait> = Arc::new(UserRepository::new());
        Self {
            tickets: TicketService::with_user_repository(pool.clone(), &config, users.clone()),
            notifications: NotificationService::new(pool.clone(), &config),
            users,
            pool,
            config,
        }
    }
}

impl From<(PgPool, Config)> for AppState {
    fn from((pool, config): (PgPool, Config)) -> Self {
        Self::new(pool, config)
    }
}
