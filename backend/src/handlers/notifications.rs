use axum::{
    extract::{Extension, Path, State},
    Json,
};

use crate::{
    error::AppError,
    handlers::response::ApiResponse,
    models::{notification::NotificationResponse, user::User},
    state::AppState,
};

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, AppError> {
    let notifications = state.notifications.list(&user).await?;
    Ok(ApiResponse::ok(
        notifications,
        "Notification retrieved successfully.",
    ))
}

/// Returns the notification as it was before this view and marks it read.
pub async fn view_notification(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NotificationResponse>>, AppError> {
    let notification = state.notifications.view(&id, &user).await?;
    Ok(ApiResponse::ok(notification, "Notification read successfully."))
}
