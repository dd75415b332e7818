//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned or kept)
//!     → handlers.rs (POST /api/generate, GET /health)
//!     → response.rs (GenerateError → status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
