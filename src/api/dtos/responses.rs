use axum::Json;
use serde::Serialize;

/// Success envelope shared by every JSON endpoint. Failures are rendered by
/// `AppError` with the same shape plus a `kind`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

pub fn done(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
