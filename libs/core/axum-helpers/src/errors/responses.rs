//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "error": "Database error occurred",
        "code": "DATABASE_ERROR"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - validation failure, malformed id or JSON, unknown task",
    content_type = "application/json",
    example = json!({
        "error": "require task title",
        "code": "VALIDATION_ERROR"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);
