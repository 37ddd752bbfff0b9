//! Accounts and catalog core of the Jungle store: record validation,
//! password digests and credential authentication over a pluggable store.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod store;
pub mod validation;

pub use error::SaveError;
pub use state::AppState;
