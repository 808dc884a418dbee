//! Product domain model and indexing payload validation

use crate::backend::BulkDocument;
use crate::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product document as stored in the search engine
///
/// `price` is carried as a decimal string, both for caller-supplied and
/// generated products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
}

impl Product {
    /// Convert into a bulk indexing entry keyed by the product id
    pub fn to_bulk_document(&self) -> Result<BulkDocument> {
        Ok(BulkDocument {
            id: Some(self.id.clone()),
            document: serde_json::to_value(self)?,
        })
    }
}

/// Validate an indexing payload and return the accepted batch
///
/// The payload must be a JSON array whose every element is a valid product
/// (see [`validate_product`]). One bad element rejects the whole batch.
pub fn validate_products(payload: &Value) -> Result<Vec<Product>> {
    let items = payload
        .as_array()
        .ok_or_else(|| ShelfError::bad_request("request body must be a JSON array of products"))?;

    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            validate_product(item).map_err(|e| match e {
                ShelfError::BadRequest { message } => {
                    ShelfError::bad_request(format!("product at index {position}: {message}"))
                }
                other => other,
            })
        })
        .collect()
}

/// Validate a single product-like value
///
/// `id`, `title`, `description` and `category` must be strings that are not
/// blank after trimming. `price` must be a string; it may be empty.
/// Field values are returned untrimmed.
pub fn validate_product(item: &Value) -> Result<Product> {
    let object = item
        .as_object()
        .ok_or_else(|| ShelfError::bad_request("must be an object"))?;

    let id = non_blank_string(object, "id")?;
    let title = non_blank_string(object, "title")?;
    let description = non_blank_string(object, "description")?;
    let price = string_field(object, "price")?;
    let category = non_blank_string(object, "category")?;

    Ok(Product {
        id,
        title,
        description,
        price,
        category,
    })
}

fn string_field(object: &Map<String, Value>, field: &str) -> Result<String> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ShelfError::bad_request(format!("`{field}` must be a string"))),
        None => Err(ShelfError::bad_request(format!("`{field}` is required"))),
    }
}

fn non_blank_string(object: &Map<String, Value>, field: &str) -> Result<String> {
    let value = string_field(object, field)?;
    if value.trim().is_empty() {
        return Err(ShelfError::bad_request(format!("`{field}` cannot be empty")));
    }
    Ok(value)
}
