use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::catalog::repo_types::{Category, NewProduct, Product};
use crate::config::AppConfig;
use crate::store::Store;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")
}

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, name, created_at, updated_at";
const PRODUCT_COLUMNS: &str =
    "id, category_id, name, description, quantity, price_cents, created_at, updated_at";

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn count_users_with_email(
        &self,
        email: &str,
        excluding: Option<Uuid>,
    ) -> anyhow::Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
              FROM users
             WHERE LOWER(email) = LOWER($1)
               AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(email)
        .bind(excluding) // Option<Uuid> → NULL allowed
        .fetch_one(&self.db)
        .await
        .context("count users by email")?;
        Ok(count)
    }

    async fn insert_user(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2,
                   email = $3,
                   password_hash = COALESCE($4, password_hash),
                   updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .context("update user")?;
        user.ok_or_else(|| anyhow::anyhow!("user {id} not found"))
    }

    async fn find_category(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find category")?;
        Ok(category)
    }

    async fn insert_category(&self, name: &str) -> anyhow::Result<Category> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.db)
        .await
        .context("insert category")?;
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, name: &str) -> anyhow::Result<Category> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories SET name = $2, updated_at = now()
             WHERE id = $1
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("update category")?;
        category.ok_or_else(|| anyhow::anyhow!("category {id} not found"))
    }

    async fn find_product(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find product")?;
        Ok(product)
    }

    async fn insert_product(&self, product: NewProduct) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, category_id, name, description, quantity, price_cents)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .fetch_one(&self.db)
        .await
        .context("insert product")?;
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, product: NewProduct) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
               SET category_id = $2,
                   name = $3,
                   description = $4,
                   quantity = $5,
                   price_cents = $6,
                   updated_at = now()
             WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .fetch_optional(&self.db)
        .await
        .context("update product")?;
        product.ok_or_else(|| anyhow::anyhow!("product {id} not found"))
    }

    async fn list_products_by_category(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
              FROM products
             WHERE category_id = $1
             ORDER BY created_at ASC
            "#
        ))
        .bind(category_id)
        .fetch_all(&self.db)
        .await
        .context("list products by category")?;
        Ok(rows)
    }
}
