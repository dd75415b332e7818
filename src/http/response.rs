//! Response mapping.
//!
//! Every failure on `/api/generate` leaves as a [`GenerationResponse`] with
//! `success: false`, the error's message, and the error's status code.

use axum::{
    response::{IntoResponse, Response},
    Json,
};

use crate::generate::{GenerateError, GenerationResponse};

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(GenerationResponse::failure(self.to_string()))).into_response()
    }
}
