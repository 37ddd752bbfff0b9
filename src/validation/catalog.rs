use async_trait::async_trait;

use super::{validate_presence, validate_present, ErrorKind, Validatable, ValidationErrors};
use crate::catalog::repo_types::{CategoryForm, ProductForm};
use crate::store::Store;

#[async_trait]
impl Validatable for ProductForm {
    async fn validate(&self, store: &dyn Store) -> anyhow::Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        validate_presence(&mut errors, "name", self.name.as_deref());
        validate_present(&mut errors, "quantity", self.quantity);
        validate_present(&mut errors, "price_cents", self.price_cents);

        // A dangling reference is as absent as a missing one.
        let category = match self.category_id {
            Some(id) => store.find_category(id).await?,
            None => None,
        };
        if category.is_none() {
            errors.add("category", ErrorKind::Blank);
        }

        Ok(errors)
    }
}

#[async_trait]
impl Validatable for CategoryForm {
    async fn validate(&self, _store: &dyn Store) -> anyhow::Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_presence(&mut errors, "name", self.name.as_deref());
        Ok(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::validation::Record;
    use uuid::Uuid;

    async fn apparel(store: &MemoryStore) -> Uuid {
        store.insert_category("category_test").await.unwrap().id
    }

    #[tokio::test]
    async fn valid_product_has_no_errors() {
        let store = MemoryStore::new();
        let form = ProductForm::new(apparel(&store).await, "product1", 4, 321);
        assert!(form.validate(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_quantity_is_present() {
        let store = MemoryStore::new();
        let form = ProductForm::new(apparel(&store).await, "product1", 0, 321);
        assert!(form.validate(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reports_each_missing_field() {
        let store = MemoryStore::new();
        let category_id = apparel(&store).await;

        let cases: [(fn(&mut ProductForm), &str); 3] = [
            (|f: &mut ProductForm| f.name = None, "Name can't be blank"),
            (|f: &mut ProductForm| f.quantity = None, "Quantity can't be blank"),
            (|f: &mut ProductForm| f.price_cents = None, "Price can't be blank"),
        ];
        for (clear, expected) in cases {
            let mut form = ProductForm::new(category_id, "product1", 4, 321);
            clear(&mut form);
            let messages = form.validate(&store).await.unwrap().full_messages();
            assert_eq!(messages, vec![expected.to_string()]);
        }
    }

    #[tokio::test]
    async fn requires_an_existing_category() {
        let store = MemoryStore::new();
        let form = ProductForm {
            category_id: None,
            name: Some("product_test".into()),
            price_cents: Some(123),
            quantity: Some(1),
            ..Default::default()
        };
        let messages = form.validate(&store).await.unwrap().full_messages();
        assert_eq!(messages, vec!["Category can't be blank"]);

        let dangling = ProductForm::new(Uuid::new_v4(), "product_test", 1, 123);
        let messages = dangling.validate(&store).await.unwrap().full_messages();
        assert_eq!(messages, vec!["Category can't be blank"]);
    }

    #[tokio::test]
    async fn category_requires_name() {
        let store = MemoryStore::new();
        let messages = Record::Category(&CategoryForm::default())
            .validate(&store)
            .await
            .unwrap()
            .full_messages();
        assert_eq!(messages, vec!["Name can't be blank"]);
        assert!(CategoryForm::new("Apparel").validate(&store).await.unwrap().is_empty());
    }
}
