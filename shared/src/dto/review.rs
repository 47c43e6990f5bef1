use serde::{Deserialize, Serialize};

/// Review posted against a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewRequest {
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub comment: String,
    #[serde(rename = "email")]
    pub author_email: String,
}
