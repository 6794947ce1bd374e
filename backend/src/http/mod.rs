//! HTTP server module.
//!
//! An axum JSON API over a loaded [`Session`](crate::services::Session). It
//! is the boundary to the presentation layer, which renders whatever these
//! endpoints return.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query parsing, selection snapshot                      │
//! │  - JSON serialization, CORS, compression, tracing         │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Routes / services                                        │
//! │  - Means, differences, classification, geometry join      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Session (built once at startup)                          │
//! │  - Loaded tables, cached aligned matrices                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
