//! # Review Endpoints

use reqwest::Method;
use shared::ReviewRequest;

use super::client::ApiClient;
use crate::core::error::{AppError, Result};
use crate::utils::validation::{validate_email, validate_rating};

/// Post a review for a product.
#[tracing::instrument(skip(client, review), fields(rating = review.rating))]
pub async fn submit_review(
    client: &ApiClient,
    product_id: &str,
    review: &ReviewRequest,
) -> Result<()> {
    if product_id.trim().is_empty() {
        return Err(AppError::Validation("Product id is required".to_string()));
    }
    validate_rating(review.rating).into_result()?;
    if review.comment.trim().is_empty() {
        return Err(AppError::Validation("Please write your review".to_string()));
    }
    validate_email(&review.author_email).into_result()?;

    let request = client
        .request(Method::POST, &["products", product_id.trim(), "reviews"])?
        .json(review);
    client.send_empty(request).await?;
    tracing::info!("Review submitted");
    Ok(())
}
