//! Success bodies shared by every handler.

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use service::WriteResult;

/// `{status: "200 OK", data}` for reads.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { status: "200 OK", data })
    }
}

/// `{message, result?, data?}` for writes.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<WriteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Mutation<T> {
    /// 201 carrying the written entity.
    pub fn created(message: impl Into<String>, result: WriteResult, data: T) -> (StatusCode, Json<Self>) {
        let body = Self { message: message.into(), result: Some(result), data: Some(data) };
        (StatusCode::CREATED, Json(body))
    }
}

impl Mutation<()> {
    pub fn deleted(message: impl Into<String>, result: WriteResult) -> (StatusCode, Json<Self>) {
        (StatusCode::OK, Json(Self { message: message.into(), result: Some(result), data: None }))
    }
}
