pub mod password;
pub mod repo_types;
pub mod services;

pub use repo_types::{User, UserForm};
pub use services::{normalize_email, Accounts, Authenticator};
