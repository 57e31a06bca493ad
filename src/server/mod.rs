//! # HTTP Server
//!
//! Thin axum boundary around the stego engine.
//!
//! - [`requests`]: multipart forms → typed request structs
//! - [`service`]: engine on the blocking pool + artifact slot
//! - [`routes`]: router, handlers and error → status mapping
//! - [`metrics`]: request counters for `/health`

pub mod metrics;
pub mod requests;
pub mod routes;
pub mod service;

pub use metrics::ServiceMetrics;
pub use routes::{router, AppState};
pub use service::StegoService;
