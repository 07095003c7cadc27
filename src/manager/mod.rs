//! The single state-owning component: an actor wrapped around a pure state
//! container.

pub mod actor;
pub mod state;

pub use actor::UserManager;
pub use state::*;
