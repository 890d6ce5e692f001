//! Uniform response shapes shared by every handler: JSON payloads, `{"error": ..}`
//! bodies and CORS preflight answers.

use actix_web::{
    http::{header, StatusCode},
    HttpResponse,
};
use serde::Serialize;
use serde_json::json;

pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Allowed methods advertised by the auth endpoint.
pub const AUTH_METHODS: &str = "POST, OPTIONS";
/// Allowed methods advertised by the users and materials scopes.
pub const READ_WRITE_METHODS: &str = "GET, POST, OPTIONS";
/// Allowed methods advertised by the read-only users list.
pub const READ_ONLY_METHODS: &str = "GET, OPTIONS";

pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .json(payload)
}

pub fn ok<T: Serialize>(payload: &T) -> HttpResponse {
    json(StatusCode::OK, payload)
}

pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    json(status, &json!({ "error": message }))
}

pub fn preflight(allowed_methods: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, allowed_methods))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE))
        .finish()
}
