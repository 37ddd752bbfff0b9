pub mod repo_types;
pub mod services;

pub use repo_types::{Category, CategoryForm, Product, ProductForm};
pub use services::Catalog;
