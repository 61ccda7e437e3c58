//! proteomyx-common: Shared errors and the capped HTTP client used across all Proteomyx crates.

pub mod error;
pub mod sandbox;

pub use error::{ApiError, ProteomyxError, Result};
pub use sandbox::SandboxClient;
