//! Ticket lifecycle orchestration.
//!
//! Each mutating operation runs in one transaction: the ticket row is locked,
//! the authorization and workflow checks run against the locked copy, and the
//! ticket write plus its notification and log rows commit together.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        notification::Notification,
        ticket::{
            AssignTicketRequest, CreateTicketRequest, Ticket, TicketStatus, UpdateStatusRequest,
            UpdateTicketRequest,
        },
        ticket_log::{TicketLog, TicketLogAction},
        user::User,
    },
    repositories::{
        begin_transaction, commit_transaction, ticket_log, NotificationRepository,
        TicketRepository, UserRepository, UserRepositoryTrait,
    },
    services::{
        status_transition::validate_transition,
        ticket_policy::{can_view, ensure_permitted, TicketAction},
    },
    types::TicketId,
    utils::time::{default_due_date, parse_calendar_date},
};

const TICKET_NOT_FOUND: &str = "Ticket not found.";

#[derive(Clone)]
pub struct TicketService {
    pool: PgPool,
    tickets: TicketRepository,
    notifications: NotificationRepository,
    users: Arc<dyn UserRepositoryTrait>,
    time_zone: Tz,
    default_due_days: i64,
}

impl TicketService {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self::with_user_repository(pool, config, Arc::new(UserRepository::new()))
    }

    pub fn with_user_repository(
        pool: PgPool,
        config: &Config,
        users: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            pool,
            tickets: TicketRepository::new(),
            notifications: NotificationRepository::new(),
            users,
            time_zone: config.time_zone,
            default_due_days: config.default_due_days,
        }
    }

    pub fn time_zone(&self) -> &Tz {
        &self.time_zone
    }

    /// Active tickets created by `actor`, newest first.
    pub async fn list(&self, actor: &User) -> Result<Vec<Ticket>, AppError> {
        self.tickets
            .list_active_by_creator(&self.pool, &actor.email)
            .await
    }

    /// A single active ticket visible to `actor` (creator or assignee).
    pub async fn show(&self, id: &str, actor: &User) -> Result<Ticket, AppError> {
        let id = parse_ticket_id(id)?;
        let ticket = self
            .tickets
            .find_active_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(TICKET_NOT_FOUND.into()))?;

        if !can_view(&ticket, actor) {
            return Err(AppError::NotFound(TICKET_NOT_FOUND.into()));
        }
        Ok(ticket)
    }

    /// Audit trail of a visible ticket, oldest entry first.
    pub async fn history(&self, id: &str, actor: &User) -> Result<Vec<TicketLog>, AppError> {
        let ticket = self.show(id, actor).await?;
        let logs = ticket_log::list_ticket_logs(&self.pool, ticket.id).await?;
        Ok(logs)
    }

    pub async fn create(
        &self,
        payload: CreateTicketRequest,
        actor: &User,
    ) -> Result<Ticket, AppError> {
        payload.validate()?;

        let due_date = self
            .resolve_due_date(payload.due_date.as_deref())?
            .unwrap_or_else(|| default_due_date(&self.time_zone, self.default_due_days));
        let assignee = normalize_email(payload.assignee);
        if let Some(email) = assignee.as_deref() {
            self.ensure_user_exists(email).await?;
        }

        let ticket = Ticket::new(
            payload.title.trim().to_string(),
            payload.description,
            assignee,
            due_date,
            actor.email.clone(),
        );

        let mut tx = begin_transaction(&self.pool).await?;
        let created = self.tickets.create(&mut *tx, &ticket).await?;
        append_log(
            &mut *tx,
            created.id,
            TicketLogAction::AddTicket,
            format!("{} created new ticket: {}", actor.name, created.title),
            actor,
        )
        .await?;
        commit_transaction(tx).await?;

        tracing::info!(
            ticket_id = %created.id,
            actor = %actor.email,
            action = TicketLogAction::AddTicket.as_str(),
            due_date = %due_date,
            "ticket created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        payload: UpdateTicketRequest,
        actor: &User,
    ) -> Result<Ticket, AppError> {
        payload.validate()?;
        let id = parse_ticket_id(&payload.id)?;
        let due_date = self.resolve_due_date(payload.due_date.as_deref())?;
        let assignee = normalize_email(payload.assignee);

        let mut tx = begin_transaction(&self.pool).await?;
        let current = self.lock_ticket(&mut *tx, id).await?;
        ensure_permitted(&current, actor, TicketAction::Edit)?;

        if let Some(email) = assignee.as_deref() {
            self.ensure_user_exists(email).await?;
        }

        let updated = self
            .tickets
            .update_details(
                &mut *tx,
                id,
                payload.title.trim(),
                &payload.description,
                assignee.as_deref(),
                due_date.or(current.due_date),
                Utc::now(),
            )
            .await?;
        append_log(
            &mut *tx,
            updated.id,
            TicketLogAction::UpdateTicket,
            format!("{} updated ticket: {}", actor.name, updated.title),
            actor,
        )
        .await?;
        commit_transaction(tx).await?;

        tracing::info!(
            ticket_id = %updated.id,
            actor = %actor.email,
            action = TicketLogAction::UpdateTicket.as_str(),
            "ticket updated"
        );
        Ok(updated)
    }

    /// Soft-deletes the ticket; the log entry still references its id.
    pub async fn delete(&self, id: &str, actor: &User) -> Result<Ticket, AppError> {
        let id = parse_ticket_id(id)?;

        let mut tx = begin_transaction(&self.pool).await?;
        let current = self.lock_ticket(&mut *tx, id).await?;
        ensure_permitted(&current, actor, TicketAction::Delete)?;

        let deleted = self.tickets.soft_delete(&mut *tx, id, Utc::now()).await?;
        append_log(
            &mut *tx,
            deleted.id,
            TicketLogAction::DeleteTicket,
            format!("{} deleted ticket: {}", actor.name, deleted.title),
            actor,
        )
        .await?;
        commit_transaction(tx).await?;

        tracing::info!(
            ticket_id = %deleted.id,
            actor = %actor.email,
            action = TicketLogAction::DeleteTicket.as_str(),
            "ticket deleted"
        );
        Ok(deleted)
    }

    /// Assigns the ticket and notifies the new assignee.
    pub async fn assign(
        &self,
        payload: AssignTicketRequest,
        actor: &User,
    ) -> Result<Ticket, AppError> {
        payload.validate()?;
        let id = parse_ticket_id(&payload.id)?;
        let due_date = self.resolve_due_date(payload.due_date.as_deref())?;
        let assignee_email = payload.assignee.trim().to_string();

        let mut tx = begin_transaction(&self.pool).await?;
        let current = self.lock_ticket(&mut *tx, id).await?;
        ensure_permitted(&current, actor, TicketAction::Assign)?;

        let assignee = self
            .users
            .find_by_email(&self.pool, &assignee_email)
            .await?
            .ok_or_else(unknown_assignee)?;

        let updated = self
            .tickets
            .update_assignment(
                &mut *tx,
                id,
                &assignee.email,
                due_date.or(current.due_date),
                Utc::now(),
            )
            .await?;

        let notification = Notification::assignment(
            updated.id,
            &updated.title,
            assignee.email.clone(),
            &actor.name,
            actor.email.clone(),
        );
        let notification = self.notifications.create(&mut *tx, &notification).await?;

        append_log(
            &mut *tx,
            updated.id,
            TicketLogAction::AsignTicket,
            format!("{} assigned ticket to {}", actor.name, assignee.name),
            actor,
        )
        .await?;
        commit_transaction(tx).await?;

        tracing::info!(
            ticket_id = %updated.id,
            actor = %actor.email,
            assignee = %assignee.email,
            notification_id = %notification.id,
            action = TicketLogAction::AsignTicket.as_str(),
            "ticket assigned"
        );
        Ok(updated)
    }

    pub async fn change_status(
        &self,
        payload: UpdateStatusRequest,
        actor: &User,
    ) -> Result<Ticket, AppError> {
        payload.validate()?;
        let next = TicketStatus::try_from(payload.status)
            .map_err(|_| AppError::field("status", "The selected status is invalid."))?;
        let id = parse_ticket_id(&payload.id)?;

        let mut tx = begin_transaction(&self.pool).await?;
        let current = self.lock_ticket(&mut *tx, id).await?;
        ensure_permitted(&current, actor, TicketAction::ChangeStatus)?;
        validate_transition(current.status, next)?;

        let updated = self
            .tickets
            .update_status(&mut *tx, id, current.status, next, &actor.email, Utc::now())
            .await?
            .ok_or(AppError::InvalidTransition {
                from: current.status,
                to: next,
            })?;
        append_log(
            &mut *tx,
            updated.id,
            TicketLogAction::StatusUpdated,
            format!(
                "Status changed from {} to {}",
                current.status.label(),
                next.label()
            ),
            actor,
        )
        .await?;
        commit_transaction(tx).await?;

        tracing::info!(
            ticket_id = %updated.id,
            actor = %actor.email,
            from = current.status.label(),
            to = next.label(),
            action = TicketLogAction::StatusUpdated.as_str(),
            "ticket status changed"
        );
        Ok(updated)
    }
}

impl TicketService {
    async fn lock_ticket(&self, conn: &mut PgConnection, id: TicketId) -> Result<Ticket, AppError> {
        self.tickets
            .lock_active_by_id(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(TICKET_NOT_FOUND.into()))
    }

    async fn ensure_user_exists(&self, email: &str) -> Result<(), AppError> {
        if self.users.exists_by_email(&self.pool, email).await? {
            Ok(())
        } else {
            Err(unknown_assignee())
        }
    }

    fn resolve_due_date(&self, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
        match raw.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(None),
            Some(value) => parse_calendar_date(value, &self.time_zone)
                .map(Some)
                .ok_or_else(|| AppError::field("due_date", "The due date is not a valid date.")),
        }
    }
}

async fn append_log(
    conn: &mut PgConnection,
    ticket_id: TicketId,
    action: TicketLogAction,
    description: String,
    actor: &User,
) -> Result<(), AppError> {
    let log = TicketLog::new(ticket_id, action, description, actor.email.clone());
    ticket_log::insert_ticket_log(conn, &log).await?;
    Ok(())
}

/// Ids arrive as strings; anything that is not a UUID cannot name a ticket.
fn parse_ticket_id(raw: &str) -> Result<TicketId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(TICKET_NOT_FOUND.into()))
}

fn normalize_email(value: Option<String>) -> Option<String> {
    value
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
}

fn unknown_assignee() -> AppError {
    AppError::field("assignee", "The selected assignee is invalid.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepositoryTrait;

    fn config() -> Config {
        Config {
            database_url: "postgres://localhost/ticketdesk_unit".into(),
            jwt_secret: "secret".into(),
            time_zone: chrono_tz::UTC,
            default_due_days: 3,
            server_port: 3000,
            cors_allow_origins: Vec::new(),
            purge_retention_days: 30,
        }
    }

    fn lazy_pool() -> PgPool {
        PgPool::connect_lazy("postgres://localhost/ticketdesk_unit").expect("lazy pool")
    }

    fn service(users: MockUserRepositoryTrait) -> TicketService {
        TicketService::with_user_repository(lazy_pool(), &config(), Arc::new(users))
    }

    fn actor() -> User {
        User::new("a@x.com".into(), "Ada".into())
    }

    fn expect_field_error(err: AppError, field: &str) {
        match err {
            AppError::Validation(errors) => {
                assert!(errors.contains_key(field), "missing {} in {:?}", field, errors)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_rejects_short_description_before_touching_storage() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_exists_by_email().never();
        let service = service(users);

        let err = service
            .create(
                CreateTicketRequest {
                    title: "Bug Report".into(),
                    description: "Ada".into(),
                    assignee: None,
                    due_date: None,
                },
                &actor(),
            )
            .await
            .expect_err("short description");
        expect_field_error(err, "description");
    }

    #[tokio::test]
    async fn create_rejects_unknown_assignee() {
        let mut users = MockUserRepositoryTrait::new();
        users
            .expect_exists_by_email()
            .withf(|_, email| email == "ghost@x.com")
            .times(1)
            .returning(|_, _| Ok(false));
        let service = service(users);

        let err = service
            .create(
                CreateTicketRequest {
                    title: "Bug Report".into(),
                    description: "Ada bug di halaman login".into(),
                    assignee: Some(" ghost@x.com ".into()),
                    due_date: None,
                },
                &actor(),
            )
            .await
            .expect_err("unknown assignee");
        expect_field_error(err, "assignee");
    }

    #[tokio::test]
    async fn create_rejects_unparseable_due_date() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_exists_by_email().never();
        let service = service(users);

        let err = service
            .create(
                CreateTicketRequest {
                    title: "Bug Report".into(),
                    description: "Ada bug di halaman login".into(),
                    assignee: None,
                    due_date: Some("someday".into()),
                },
                &actor(),
            )
            .await
            .expect_err("bad due date");
        expect_field_error(err, "due_date");
    }

    #[tokio::test]
    async fn change_status_rejects_unknown_code_first() {
        let service = service(MockUserRepositoryTrait::new());
        let err = service
            .change_status(
                UpdateStatusRequest {
                    id: TicketId::new().to_string(),
                    status: 9,
                },
                &actor(),
            )
            .await
            .expect_err("bad status");
        expect_field_error(err, "status");
    }

    #[tokio::test]
    async fn malformed_ids_resolve_to_not_found() {
        let service = service(MockUserRepositoryTrait::new());
        let err = service.show("42", &actor()).await.expect_err("not found");
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete("not-a-ticket", &actor()).await.expect_err("not found");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolve_due_date_treats_blank_as_absent() {
        let service = service(MockUserRepositoryTrait::new());
        assert_eq!(service.resolve_due_date(None).unwrap(), None);
        assert_eq!(service.resolve_due_date(Some("  ")).unwrap(), None);
        assert_eq!(
            service.resolve_due_date(Some("2025-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 1)
        );
    }

    #[test]
    fn normalize_email_trims_and_drops_blank() {
        assert_eq!(normalize_email(Some("  b@x.com ".into())), Some("b@x.com".into()));
        assert_eq!(normalize_email(Some("   ".into())), None);
        assert_eq!(normalize_email(None), None);
    }
}
