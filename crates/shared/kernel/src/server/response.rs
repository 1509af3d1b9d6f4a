use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Success envelope: `{ success, status, message, data? }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, status: status.as_u16(), message: message.into(), data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Payload of delete endpoints.
#[thesis_derive::api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct DeletedResource {
    pub id: String,
}

impl DeletedResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_shape() {
        let body = serde_json::to_value(ApiResponse::created("Tạo thành công", 7)).unwrap();
        assert_eq!(body, json!({ "success": true, "status": 201, "message": "Tạo thành công", "data": 7 }));

        let empty = ApiResponse::<u8>::with_status(StatusCode::OK, "ok", None);
        assert!(serde_json::to_value(empty).unwrap().get("data").is_none());
    }
}
