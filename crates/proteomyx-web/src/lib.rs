//! proteomyx-web: HTTP surface for Proteomyx
//! Provides:
//!   - `/network` proxy to the expansion service
//!   - Exploration session API
//!   - SSE stream of session events
//!   - Health endpoint

pub mod router;
pub mod handlers;
pub mod extract;
pub mod state;
pub mod sse;
