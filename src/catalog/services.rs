use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::repo_types::{Category, CategoryForm, NewProduct, Product, ProductForm};
use crate::error::SaveError;
use crate::store::Store;
use crate::validation::{Validatable, Validator};

/// Categories and their products.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
    validator: Validator,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        let validator = Validator::new(store.clone());
        Self { store, validator }
    }

    async fn check<V: Validatable>(&self, record: &V, what: &str) -> Result<(), SaveError> {
        let errors = self.validator.validate(record).await?;
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(%errors, "{what} rejected");
            Err(SaveError::Invalid(errors))
        }
    }

    #[instrument(skip(self, form))]
    pub async fn create_category(&self, form: CategoryForm) -> Result<Category, SaveError> {
        self.check(&form, "category").await?;
        let name = form.name.unwrap_or_default();
        let category = self.store.insert_category(&name).await?;
        info!(category_id = %category.id, "category created");
        Ok(category)
    }

    #[instrument(skip(self, form), fields(category_id = ?form.id))]
    pub async fn update_category(&self, form: CategoryForm) -> Result<Category, SaveError> {
        let Some(id) = form.id else {
            return Err(anyhow::anyhow!("update called with an unsaved category").into());
        };
        self.check(&form, "category").await?;
        let name = form.name.unwrap_or_default();
        let category = self.store.update_category(id, &name).await?;
        info!(category_id = %category.id, "category updated");
        Ok(category)
    }

    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: ProductForm) -> Result<Product, SaveError> {
        self.check(&form, "product").await?;
        let product = self.store.insert_product(into_columns(form)?).await?;
        info!(product_id = %product.id, category_id = %product.category_id, "product created");
        Ok(product)
    }

    #[instrument(skip(self, form), fields(product_id = ?form.id))]
    pub async fn update_product(&self, form: ProductForm) -> Result<Product, SaveError> {
        let Some(id) = form.id else {
            return Err(anyhow::anyhow!("update called with an unsaved product").into());
        };
        self.check(&form, "product").await?;
        let product = self.store.update_product(id, into_columns(form)?).await?;
        info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    pub async fn products_in(&self, category_id: Uuid) -> anyhow::Result<Vec<Product>> {
        self.store.list_products_by_category(category_id).await
    }
}

fn into_columns(form: ProductForm) -> anyhow::Result<NewProduct> {
    match (form.category_id, form.name, form.quantity, form.price_cents) {
        (Some(category_id), Some(name), Some(quantity), Some(price_cents)) => Ok(NewProduct {
            category_id,
            name,
            description: form.description,
            quantity,
            price_cents,
        }),
        _ => anyhow::bail!("validated product is missing fields"),
    }
}
