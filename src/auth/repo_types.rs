use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String, // stored as submitted
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, not exposed in JSON
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Raw account input, either for a new user or an edit of an existing one.
///
/// `password` and `password_confirmation` are write-only: they are checked
/// by validation, the password is digested on save and both are dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(skip)]
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl UserForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            password_confirmation: Some(password_confirmation.into()),
        }
    }

    /// Form pre-filled from a persisted user, with no password change.
    pub fn edit(user: &User) -> Self {
        Self {
            id: Some(user.id),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            password: None,
            password_confirmation: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// New records always set a password; edits only when one is supplied.
    pub fn sets_password(&self) -> bool {
        self.is_new() || self.password.is_some() || self.password_confirmation.is_some()
    }
}

/// Row written when a user is created.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Columns written when a user is updated; `None` keeps the stored digest.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
}
