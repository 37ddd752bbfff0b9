//! Field-level validation of candidate records before they are persisted.
//!
//! Each record kind implements [`Validatable`]; the result is an ordered
//! [`ValidationErrors`] set which is empty iff the record may be saved.
//! Messages follow the `"<Field> <message>"` format, e.g.
//! `"Password is too short (minimum is 5 characters)"`.

mod catalog;
mod user;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::repo_types::UserForm;
use crate::catalog::repo_types::{CategoryForm, ProductForm};
use crate::store::Store;

pub const MIN_PASSWORD_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Blank,
    TooShort { minimum: usize },
    Taken,
    /// Confirmation field differs from the attribute it confirms.
    Confirmation { attribute: &'static str },
}

impl ErrorKind {
    pub fn message(&self) -> String {
        match self {
            ErrorKind::Blank => "can't be blank".to_string(),
            ErrorKind::TooShort { minimum } => {
                format!("is too short (minimum is {minimum} characters)")
            }
            ErrorKind::Taken => "has already been taken".to_string(),
            ErrorKind::Confirmation { attribute } => {
                format!("doesn't match {}", human_attribute_name(attribute))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn full_message(&self) -> String {
        format!("{} {}", human_attribute_name(self.field), self.kind.message())
    }
}

/// Errors in the order the rules were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, kind: ErrorKind) {
        self.errors.push(FieldError { field, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Errors recorded against one field.
    pub fn on(&self, field: &str) -> Vec<ErrorKind> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.kind)
            .collect()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(FieldError::full_message).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

/// `price_cents` → "Price", `password_confirmation` → "Password confirmation".
pub fn human_attribute_name(field: &str) -> String {
    let base = field
        .strip_suffix("_id")
        .or_else(|| field.strip_suffix("_cents"))
        .unwrap_or(field);
    let spaced = base.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Absent or whitespace-only.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

pub(crate) fn validate_presence(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if is_blank(value) {
        errors.add(field, ErrorKind::Blank);
    }
}

pub(crate) fn validate_present<T>(errors: &mut ValidationErrors, field: &'static str, value: Option<T>) {
    if value.is_none() {
        errors.add(field, ErrorKind::Blank);
    }
}

#[async_trait]
pub trait Validatable: Send + Sync {
    /// Store failures are returned as `Err`; rule violations never are.
    async fn validate(&self, store: &dyn Store) -> anyhow::Result<ValidationErrors>;
}

/// A candidate of any record kind.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    User(&'a UserForm),
    Product(&'a ProductForm),
    Category(&'a CategoryForm),
}

#[async_trait]
impl<'a> Validatable for Record<'a> {
    async fn validate(&self, store: &dyn Store) -> anyhow::Result<ValidationErrors> {
        match self {
            Record::User(form) => form.validate(store).await,
            Record::Product(form) => form.validate(store).await,
            Record::Category(form) => form.validate(store).await,
        }
    }
}

/// Validation bound to a store handle.
#[derive(Clone)]
pub struct Validator {
    store: Arc<dyn Store>,
}

impl Validator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn validate<V: Validatable + ?Sized>(&self, record: &V) -> anyhow::Result<ValidationErrors> {
        record.validate(self.store.as_ref()).await
    }
}
