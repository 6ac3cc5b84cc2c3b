use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections render through [`AppError`] instead of plain text.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
