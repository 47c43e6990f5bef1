//! # Product Upload
//!
//! Multipart `POST /upload/create`. The backend reads parts in order and needs
//! the text fields before any file part, so the form is always written as
//! `id, name, price, quantity, email` followed by one `images` part per image.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use shared::Product;

use super::client::ApiClient;
use crate::core::error::{AppError, Result};
use crate::utils::validation::validate_email;

pub const IMAGE_FIELD: &str = "images";
pub const INCOMPLETE_PRODUCT: &str =
    "Please fill in all fields, add at least one image, and ensure email is present.";

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Extension used in the generated part file name (`jpg`, `png`).
    pub extension: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            extension: "jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes,
        }
    }

    /// Read an image from disk. The content type follows the file extension;
    /// anything unrecognised is sent as JPEG.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let (extension, content_type) = match extension.as_str() {
            "png" => ("png", "image/png"),
            "webp" => ("webp", "image/webp"),
            _ => ("jpg", "image/jpeg"),
        };
        Ok(Self {
            extension: extension.to_string(),
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

/// A product listing about to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub owner_email: String,
    pub images: Vec<ImageUpload>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty()
            || self.name.trim().is_empty()
            || self.owner_email.trim().is_empty()
            || self.images.is_empty()
        {
            return Err(AppError::Validation(INCOMPLETE_PRODUCT.to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("Price cannot be negative".to_string()));
        }
        validate_email(&self.owner_email).into_result()
    }

    /// Text fields in wire order.
    pub fn text_fields(&self) -> [(&'static str, String); 5] {
        [
            ("id", self.id.trim().to_string()),
            ("name", self.name.trim().to_string()),
            ("price", self.price.to_string()),
            ("quantity", self.quantity.to_string()),
            ("email", self.owner_email.trim().to_string()),
        ]
    }

    /// File name of the `index`th image part.
    pub fn image_file_name(index: usize, image: &ImageUpload) -> String {
        format!("product_image_{}.{}", index, image.extension)
    }

    fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        for (index, image) in self.images.into_iter().enumerate() {
            let file_name = Self::image_file_name(index, &image);
            let part = Part::bytes(image.bytes)
                .file_name(file_name)
                .mime_str(&image.content_type)?;
            form = form.part(IMAGE_FIELD, part);
        }
        Ok(form)
    }
}

/// Upload a new product. Returns the product as stored by the backend.
#[tracing::instrument(
    skip(client, product),
    fields(id = %product.id, images = product.images.len())
)]
pub async fn upload_product(client: &ApiClient, product: NewProduct) -> Result<Product> {
    product.validate()?;

    let form = product.into_form()?;
    let request = client.request(Method::POST, &["upload", "create"])?.multipart(form);
    let created: Product = client.send_json(request).await?;
    tracing::info!(product_id = %created.id, "Product uploaded");
    Ok(created)
}
