use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::catalog::repo_types::{Category, NewProduct, Product};

/// Persistence used by validation, authentication and the save flows.
#[async_trait]
pub trait Store: Send + Sync {
    /// Exact, case-sensitive match on the stored email.
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Case-insensitive count, optionally ignoring one user (the one being edited).
    async fn count_users_with_email(&self, email: &str, excluding: Option<Uuid>)
        -> anyhow::Result<i64>;
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User>;
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<User>;

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>>;
    async fn insert_category(&self, name: &str) -> anyhow::Result<Category>;
    async fn update_category(&self, id: Uuid, name: &str) -> anyhow::Result<Category>;

    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>>;
    async fn insert_product(&self, product: NewProduct) -> anyhow::Result<Product>;
    async fn update_product(&self, id: Uuid, product: NewProduct) -> anyhow::Result<Product>;
    async fn list_products_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>>;
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Process-local store, used by tests and `AppState::fake`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn count_users_with_email(
        &self,
        email: &str,
        excluding: Option<Uuid>,
    ) -> anyhow::Result<i64> {
        let wanted = email.to_lowercase();
        let tables = self.tables.read().await;
        let count = tables
            .users
            .iter()
            .filter(|u| Some(u.id) != excluding && u.email.to_lowercase() == wanted)
            .count();
        Ok(count as i64)
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<User> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow::anyhow!("user {id} not found"))?;
        user.name = changes.name;
        user.email = changes.email;
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert_category(&self, name: &str) -> anyhow::Result<Category> {
        let now = OffsetDateTime::now_utc();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, name: &str) -> anyhow::Result<Category> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("category {id} not found"))?;
        category.name = name.to_string();
        category.updated_at = OffsetDateTime::now_utc();
        Ok(category.clone())
    }

    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> anyhow::Result<Product> {
        let now = OffsetDateTime::now_utc();
        let product = Product {
            id: Uuid::new_v4(),
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            quantity: product.quantity,
            price_cents: product.price_cents,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, changes: NewProduct) -> anyhow::Result<Product> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow::anyhow!("product {id} not found"))?;
        product.category_id = changes.category_id;
        product.name = changes.name;
        product.description = changes.description;
        product.quantity = changes.quantity;
        product.price_cents = changes.price_cents;
        product.updated_at = OffsetDateTime::now_utc();
        Ok(product.clone())
    }

    async fn list_products_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Carter Lopez".into(),
            email: email.into(),
            password_hash: "digest".into(),
        }
    }

    #[tokio::test]
    async fn email_lookup_is_exact() {
        let store = MemoryStore::new();
        store.insert_user(new_user("Carter@Example.com")).await.unwrap();

        assert!(store.find_user_by_email("Carter@Example.com").await.unwrap().is_some());
        assert!(store.find_user_by_email("carter@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_count_ignores_case_and_excluded_user() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("carter@example.com")).await.unwrap();

        assert_eq!(store.count_users_with_email("CARTER@example.com", None).await.unwrap(), 1);
        assert_eq!(
            store
                .count_users_with_email("carter@example.com", Some(user.id))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn update_missing_user_errors() {
        let store = MemoryStore::new();
        let changes = UserChanges {
            name: "x".into(),
            email: "x@example.com".into(),
            password_hash: None,
        };
        let err = store.update_user(Uuid::new_v4(), changes).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn products_are_listed_per_category() {
        let store = MemoryStore::new();
        let apparel = store.insert_category("Apparel").await.unwrap();
        let other = store.insert_category("Electronics").await.unwrap();
        for name in ["Hipster Hat", "Hipster Socks"] {
            store
                .insert_product(NewProduct {
                    category_id: apparel.id,
                    name: name.into(),
                    description: None,
                    quantity: 10,
                    price_cents: 6499,
                })
                .await
                .unwrap();
        }

        let listed = store.list_products_by_category(apparel.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Hipster Hat");
        assert!(store.list_products_by_category(other.id).await.unwrap().is_empty());
    }
}
