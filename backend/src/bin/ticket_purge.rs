use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketdesk_backend::{
    config::Config, db::connection::create_pool, repositories::TicketRepository,
};

/// Hard-deletes tickets soft-deleted longer ago than the retention window.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketdesk_backend=info,ticket_purge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;

    let cutoff = Utc::now() - Duration::days(config.purge_retention_days);
    let purged = TicketRepository::new()
        .purge_deleted_before(&pool, cutoff)
        .await
        .map_err(|err| anyhow::anyhow!("purge soft-deleted tickets: {}", err))?;

    if purged > 0 {
        tracing::info!(purged, cutoff = %cutoff, "Purged soft-deleted tickets");
    } else {
        tracing::debug!(cutoff = %cutoff, "No soft-deleted tickets past retention");
    }

    sqlx::query("VACUUM (ANALYZE) tickets").execute(&pool).await?;

    Ok(())
}
