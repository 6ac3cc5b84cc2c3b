use axum::{
    extract::{Extension, Path, State},
    response::Response,
    Json,
};

use crate::{
    error::AppError,
    handlers::{extract::JsonBody, response::ApiResponse},
    models::{
        ticket::{
            AssignTicketRequest, CreateTicketRequest, TicketResponse, UpdateStatusRequest,
            UpdateTicketRequest,
        },
        ticket_log::TicketLog,
        user::User,
    },
    state::AppState,
};

type TicketJson = Json<ApiResponse<TicketResponse>>;

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<TicketResponse>>>, AppError> {
    let tz = *state.tickets.time_zone();
    let tickets = state.tickets.list(&user).await?;
    let data = tickets
        .into_iter()
        .map(|ticket| TicketResponse::from_ticket(ticket, &tz))
        .collect::<Vec<_>>();
    Ok(ApiResponse::ok(data, "Ticket retrieved successfully."))
}

pub async fn show_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<TicketJson, AppError> {
    let ticket = state.tickets.show(&id, &user).await?;
    Ok(ApiResponse::ok(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "Ticket retrieved successfully.",
    ))
}

pub async fn ticket_history(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<TicketLog>>>, AppError> {
    let logs = state.tickets.history(&id, &user).await?;
    Ok(ApiResponse::ok(logs, "Ticket history retrieved successfully."))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<CreateTicketRequest>,
) -> Result<Response, AppError> {
    let ticket = state.tickets.create(payload, &user).await?;
    Ok(ApiResponse::created(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "New Ticket created successfully.",
    ))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<UpdateTicketRequest>,
) -> Result<TicketJson, AppError> {
    let ticket = state.tickets.update(payload, &user).await?;
    Ok(ApiResponse::ok(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "Ticket updated successfully.",
    ))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<TicketJson, AppError> {
    let ticket = state.tickets.delete(&id, &user).await?;
    Ok(ApiResponse::ok(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "Ticket deleted successfully.",
    ))
}

/// Field errors on assignment are reported as 422.
pub async fn assign_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    payload: Result<JsonBody<AssignTicketRequest>, AppError>,
) -> Result<TicketJson, AppError> {
    let JsonBody(payload) = payload.map_err(AppError::into_unprocessable)?;
    let ticket = state
        .tickets
        .assign(payload, &user)
        .await
        .map_err(AppError::into_unprocessable)?;
    Ok(ApiResponse::ok(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "Ticket asigned successfully.",
    ))
}

pub async fn update_ticket_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<UpdateStatusRequest>,
) -> Result<TicketJson, AppError> {
    let ticket = state.tickets.change_status(payload, &user).await?;
    Ok(ApiResponse::ok(
        TicketResponse::from_ticket(ticket, state.tickets.time_zone()),
        "Ticket status updated successfully.",
    ))
}
