//! proteomyx-session: Exploration sessions over protein networks.
//!
//! A session owns the recipe a user is editing, the last network snapshot
//! received for it, the score threshold and the node selection. Recipe
//! changes start fetches; each fetch is stamped with a generation number so
//! results that arrive after a newer fetch started are dropped.

pub mod events;
pub mod session;
pub mod manager;

pub use events::{Notification, SessionEvent, FETCH_FAILED_NOTICE};
pub use session::{
    ExplorationSession, FetchOutcome, FetchTicket, Phase, RecipeUpdate, SessionSnapshot,
};
pub use manager::{SessionManager, SessionSettings};
