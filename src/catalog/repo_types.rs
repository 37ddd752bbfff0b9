use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price_cents: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(skip)]
    pub id: Option<Uuid>,
    pub name: Option<String>,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn edit(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: Some(category.name.clone()),
        }
    }
}

/// Raw product input. Every field is optional so that absence can be
/// reported by validation instead of failing at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(skip)]
    pub id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub price_cents: Option<i64>,
}

impl ProductForm {
    pub fn new(category_id: Uuid, name: impl Into<String>, quantity: i32, price_cents: i64) -> Self {
        Self {
            id: None,
            category_id: Some(category_id),
            name: Some(name.into()),
            description: None,
            quantity: Some(quantity),
            price_cents: Some(price_cents),
        }
    }

    pub fn edit(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            category_id: Some(product.category_id),
            name: Some(product.name.clone()),
            description: product.description.clone(),
            quantity: Some(product.quantity),
            price_cents: Some(product.price_cents),
        }
    }
}

/// Validated product columns, written on insert and update.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub price_cents: i64,
}
