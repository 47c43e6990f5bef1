use serde::{Deserialize, Serialize};

/// Bid placed on a product listed for bidding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BidRequest {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "email")]
    pub bidder_email: String,
    pub amount: f64,
}

/// Bid as recorded by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bid {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "email")]
    pub bidder_email: String,
    pub amount: f64,
}
