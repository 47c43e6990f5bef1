use serde::{Deserialize, Serialize};

/// A product listed by a farmer.
///
/// `images` holds upload file names, not URLs; see [`crate::utils::upload_url`].
/// `id` is the seller-entered id; records without one use the backend's `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ProductRecord")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub images: Vec<String>,
    /// Seller's account email; the backend calls this field `email`.
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Product as stored by the backend.
#[derive(Deserialize)]
struct ProductRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    record_id: Option<String>,
    name: String,
    price: f64,
    quantity: u32,
    #[serde(default)]
    images: Vec<String>,
    #[serde(rename = "email")]
    owner_email: String,
    #[serde(default)]
    description: Option<String>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let id = record
            .id
            .filter(|id| !id.trim().is_empty())
            .or(record.record_id)
            .unwrap_or_default();
        Self {
            id,
            name: record.name,
            price: record.price,
            quantity: record.quantity,
            images: record.images,
            owner_email: record.owner_email,
            description: record.description,
        }
    }
}

impl Product {
    /// File name of the cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}
