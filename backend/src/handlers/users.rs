use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::{error::AppError, handlers::response::ApiResponse, models::user::User, types::UserId};

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

pub async fn current_user(
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    Ok(ApiResponse::ok(
        UserResponse::from(user),
        "User retrieved successfully.",
    ))
}
