//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (registry lookup, eligibility, delegated signing)
//!     → response.rs (JSON body)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{BadgeClaimResponse, CheckResponse, ClaimResponse, HealthStatus};
pub use server::{AppState, HttpServer};
