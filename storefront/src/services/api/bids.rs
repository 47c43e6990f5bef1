//! # Bid Endpoints
//!
//! Records a bid. Auction rules live on the backend.

use reqwest::Method;
use shared::{Bid, BidRequest};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};
use crate::utils::validation::validate_email;

#[tracing::instrument(skip(client, bid), fields(product_id = %bid.product_id, amount = bid.amount))]
pub async fn create_bid(client: &ApiClient, bid: &BidRequest) -> Result<Bid> {
    if bid.product_id.trim().is_empty() {
        return Err(AppError::Validation("Product id is required".to_string()));
    }
    validate_email(&bid.bidder_email).into_result()?;
    if !bid.amount.is_finite() || bid.amount <= 0.0 {
        return Err(AppError::Validation("Bid amount must be greater than zero".to_string()));
    }

    let request = client.request(Method::POST, &["bids"])?.json(bid);
    client.send_json(request).await
}
