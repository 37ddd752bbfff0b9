use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::auth::password::Hasher;
use crate::auth::repo_types::{NewUser, User, UserChanges, UserForm};
use crate::error::SaveError;
use crate::store::Store;
use crate::validation::Validator;

/// Lookup form of an email: surrounding whitespace removed, lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Resolves an (email, password) pair to a user.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn Store>,
    hasher: Hasher,
}

impl Authenticator {
    pub fn new(store: Arc<dyn Store>, hasher: Hasher) -> Self {
        Self { store, hasher }
    }

    /// `Ok(None)` for an unknown email and for a wrong password alike.
    #[instrument(skip(self, raw_password))]
    pub async fn authenticate(
        &self,
        raw_email: &str,
        raw_password: &str,
    ) -> anyhow::Result<Option<User>> {
        let email = normalize_email(raw_email);
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            warn!(email = %email, "authentication failed");
            return Ok(None);
        };

        let ok = self
            .hasher
            .verify(raw_password, &user.password_hash)
            .with_context(|| format!("verify password digest of user {}", user.id))?;
        if !ok {
            warn!(email = %email, "authentication failed");
            return Ok(None);
        }

        info!(user_id = %user.id, "user authenticated");
        Ok(Some(user))
    }
}

/// Account creation and edits: validate, digest the password, persist.
#[derive(Clone)]
pub struct Accounts {
    store: Arc<dyn Store>,
    hasher: Hasher,
    validator: Validator,
}

impl Accounts {
    pub fn new(store: Arc<dyn Store>, hasher: Hasher) -> Self {
        let validator = Validator::new(store.clone());
        Self {
            store,
            hasher,
            validator,
        }
    }

    pub async fn find(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.store.find_user_by_id(id).await
    }

    #[instrument(skip(self, form))]
    pub async fn register(&self, form: UserForm) -> Result<User, SaveError> {
        if !form.is_new() {
            return Err(anyhow::anyhow!("register called with a persisted user").into());
        }
        let errors = self.validator.validate(&form).await?;
        if !errors.is_empty() {
            debug!(%errors, "registration rejected");
            return Err(SaveError::Invalid(errors));
        }

        let (Some(name), Some(email), Some(password)) = (form.name, form.email, form.password) else {
            return Err(anyhow::anyhow!("validated user is missing fields").into());
        };
        let password_hash = self.hasher.hash(&password)?;
        let user = self
            .store
            .insert_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    #[instrument(skip(self, form), fields(user_id = ?form.id))]
    pub async fn update(&self, form: UserForm) -> Result<User, SaveError> {
        let Some(id) = form.id else {
            return Err(anyhow::anyhow!("update called with an unsaved user").into());
        };
        let errors = self.validator.validate(&form).await?;
        if !errors.is_empty() {
            debug!(%errors, "update rejected");
            return Err(SaveError::Invalid(errors));
        }

        let password_hash = match form.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };
        let (Some(name), Some(email)) = (form.name, form.email) else {
            return Err(anyhow::anyhow!("validated user is missing fields").into());
        };
        let user = self
            .store
            .update_user(
                id,
                UserChanges {
                    name,
                    email,
                    password_hash,
                },
            )
            .await?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }
}
