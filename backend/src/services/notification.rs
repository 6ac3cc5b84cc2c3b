use chrono::Utc;
use chrono_tz::Tz;
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::{notification::NotificationResponse, user::User},
    repositories::NotificationRepository,
    types::NotificationId,
};

const NOTIFICATION_NOT_FOUND: &str = "Notification not found.";

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    notifications: NotificationRepository,
    time_zone: Tz,
}

impl NotificationService {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            notifications: NotificationRepository::new(),
            time_zone: config.time_zone,
        }
    }

    /// Active notifications addressed to `actor`, newest first.
    pub async fn list(&self, actor: &User) -> Result<Vec<NotificationResponse>, AppError> {
        let rows = self
            .notifications
            .list_active_for_recipient(&self.pool, &actor.email)
            .await?;
        Ok(rows
            .iter()
            .map(|n| NotificationResponse::from_notification(n, &self.time_zone))
            .collect())
    }

    /// Returns the notification as it was before this view, then marks it read.
    ///
    /// Every view refreshes `read_on`.
    pub async fn view(&self, id: &str, actor: &User) -> Result<NotificationResponse, AppError> {
        let id: NotificationId = id
            .trim()
            .parse()
            .map_err(|_| AppError::NotFound(NOTIFICATION_NOT_FOUND.into()))?;

        let notification = self
            .notifications
            .find_active_by_id(&self.pool, id)
            .await?
            .filter(|n| n.recipient == actor.email)
            .ok_or_else(|| AppError::NotFound(NOTIFICATION_NOT_FOUND.into()))?;

        let snapshot = NotificationResponse::from_notification(&notification, &self.time_zone);
        let marked = self
            .notifications
            .mark_read(&self.pool, notification.id, Utc::now())
            .await?;
        if marked == 0 {
            return Err(AppError::NotFound(NOTIFICATION_NOT_FOUND.into()));
        }

        tracing::debug!(notification_id = %notification.id, actor = %actor.email, "notification read");
        Ok(snapshot)
    }
}
