use async_trait::async_trait;

use super::{is_blank, validate_presence, ErrorKind, Validatable, ValidationErrors, MIN_PASSWORD_LENGTH};
use crate::auth::repo_types::UserForm;
use crate::store::Store;

#[async_trait]
impl Validatable for UserForm {
    async fn validate(&self, store: &dyn Store) -> anyhow::Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_presence(&mut errors, "name", self.name.as_deref());
        validate_presence(&mut errors, "email", self.email.as_deref());

        // Compared ignoring case, but the value itself is not trimmed.
        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if store.count_users_with_email(email, self.id).await? > 0 {
                errors.add("email", ErrorKind::Taken);
            }
        }

        if self.sets_password() {
            let password = self.password.as_deref();
            validate_presence(&mut errors, "password", password);
            if password.map_or(0, |p| p.chars().count()) < MIN_PASSWORD_LENGTH {
                errors.add("password", ErrorKind::TooShort { minimum: MIN_PASSWORD_LENGTH });
            }

            let confirmation = self.password_confirmation.as_deref();
            validate_presence(&mut errors, "password_confirmation", confirmation);
            if let (Some(confirmation), Some(password)) = (confirmation, password) {
                if !is_blank(Some(password)) && confirmation != password {
                    errors.add(
                        "password_confirmation",
                        ErrorKind::Confirmation { attribute: "password" },
                    );
                }
            }
        }

        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::NewUser;
    use crate::store::MemoryStore;

    fn carter() -> UserForm {
        UserForm::new("Carter Lopez", "carter_lopez@hotmail.com", "jubilee", "jubilee")
    }

    async fn messages(form: &UserForm, store: &MemoryStore) -> Vec<String> {
        form.validate(store).await.unwrap().full_messages()
    }

    #[tokio::test]
    async fn valid_user_has_no_errors() {
        let store = MemoryStore::new();
        assert!(messages(&carter(), &store).await.is_empty());
    }

    #[tokio::test]
    async fn requires_name_and_email() {
        let store = MemoryStore::new();
        let mut form = carter();
        form.name = None;
        form.email = Some("  ".into());

        let messages = messages(&form, &store).await;
        assert!(messages.contains(&"Name can't be blank".to_string()));
        assert!(messages.contains(&"Email can't be blank".to_string()));
    }

    #[tokio::test]
    async fn requires_password_and_confirmation() {
        let store = MemoryStore::new();
        let mut form = carter();
        form.password = None;
        assert!(messages(&form, &store).await.contains(&"Password can't be blank".to_string()));

        let mut form = carter();
        form.password_confirmation = None;
        let messages = messages(&form, &store).await;
        assert_eq!(messages, vec!["Password confirmation can't be blank"]);
    }

    #[tokio::test]
    async fn confirmation_must_match() {
        let store = MemoryStore::new();
        let mut form = carter();
        form.password_confirmation = Some("instruction".into());
        assert_eq!(
            messages(&form, &store).await,
            vec!["Password confirmation doesn't match Password"]
        );
    }

    #[tokio::test]
    async fn password_needs_five_characters() {
        let store = MemoryStore::new();
        for short in ["p", "pa", "pas", "pass"] {
            let form = UserForm::new("Carter Lopez", "carter_lopez@hotmail.com", short, short);
            assert_eq!(
                messages(&form, &store).await,
                vec!["Password is too short (minimum is 5 characters)"],
                "password {short:?}"
            );
        }

        let form = UserForm::new("Carter Lopez", "carter_lopez@hotmail.com", "passa", "passa");
        assert!(messages(&form, &store).await.is_empty());
    }

    #[tokio::test]
    async fn length_counts_characters_not_bytes() {
        let store = MemoryStore::new();
        let form = UserForm::new("Carter Lopez", "carter_lopez@hotmail.com", "ñañá", "ñañá");
        assert!(messages(&form, &store)
            .await
            .contains(&"Password is too short (minimum is 5 characters)".to_string()));
    }

    #[tokio::test]
    async fn email_must_be_unique_ignoring_case() {
        let store = MemoryStore::new();
        store
            .insert_user(NewUser {
                name: "Cartiera Lopez".into(),
                email: "carter_lopez@hotmail.com".into(),
                password_hash: "digest".into(),
            })
            .await
            .unwrap();

        let form = UserForm::new("Carter Lopez", "CARTER_Lopez@Hotmail.com", "jubilee", "jubilee");
        assert_eq!(messages(&form, &store).await, vec!["Email has already been taken"]);
    }

    #[tokio::test]
    async fn uniqueness_does_not_trim_whitespace() {
        let store = MemoryStore::new();
        store
            .insert_user(NewUser {
                name: "Cartiera Lopez".into(),
                email: "carter_lopez@hotmail.com".into(),
                password_hash: "digest".into(),
            })
            .await
            .unwrap();

        let form = UserForm::new("Carter Lopez", " carter_lopez@hotmail.com", "jubilee", "jubilee");
        assert!(messages(&form, &store).await.is_empty());
    }

    #[tokio::test]
    async fn edit_without_password_skips_password_rules() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                name: "Carter Lopez".into(),
                email: "carter_lopez@hotmail.com".into(),
                password_hash: "digest".into(),
            })
            .await
            .unwrap();

        let form = UserForm::edit(&user);
        assert!(messages(&form, &store).await.is_empty());

        let mut form = UserForm::edit(&user);
        form.password = Some("abc".into());
        let messages = messages(&form, &store).await;
        assert!(messages.contains(&"Password is too short (minimum is 5 characters)".to_string()));
        assert!(messages.contains(&"Password confirmation can't be blank".to_string()));
    }
}
