//! HTTP handlers for all web routes.

pub mod network;
pub mod sessions;
pub mod system;
