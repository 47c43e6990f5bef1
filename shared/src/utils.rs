//! # Shared Utility Functions
//!
//! Wire-format helpers used by the storefront client.
//!
//! ## Image URLs
//!
//! Uploaded product images are served by the backend under `/uploads/`. The
//! client must build the URL by plain concatenation, exactly as the backend
//! expects:
//!
//! ```rust
//! use shared::utils::upload_url;
//!
//! let url = upload_url("http://10.0.0.5:5000", "tomato.jpg");
//! assert_eq!(url.as_deref(), Some("http://10.0.0.5:5000/uploads/tomato.jpg"));
//! assert_eq!(upload_url("http://10.0.0.5:5000", ""), None);
//! ```

/// Build the image URL for an uploaded file: `<base>/uploads/<file_name>`.
///
/// A trailing `/` on `base` is ignored. Returns `None` for an empty file name.
pub fn upload_url(base: &str, file_name: &str) -> Option<String> {
    if file_name.is_empty() {
        return None;
    }
    Some(format!("{}/uploads/{}", base.trim_end_matches('/'), file_name))
}

/// Format a rupee amount with two decimals, e.g. `₹40.00`.
///
/// ```rust
/// use shared::utils::format_price;
///
/// assert_eq!(format_price(40.0), "₹40.00");
/// assert_eq!(format_price(12.5), "₹12.50");
/// ```
pub fn format_price(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_trims_trailing_slash() {
        assert_eq!(
            upload_url("http://host:5000/", "a.jpg").as_deref(),
            Some("http://host:5000/uploads/a.jpg")
        );
    }

    #[test]
    fn test_upload_url_keeps_file_name_verbatim() {
        assert_eq!(
            upload_url("http://host:5000", "1712345678-product image.jpg").as_deref(),
            Some("http://host:5000/uploads/1712345678-product image.jpg")
        );
    }
}
