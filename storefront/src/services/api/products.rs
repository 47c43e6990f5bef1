//! # Product Endpoints

use reqwest::Method;
use shared::Product;

use super::client::ApiClient;
use crate::core::error::Result;
use crate::utils::validation::validate_email;

/// Every listed product.
#[tracing::instrument(skip(client))]
pub async fn fetch_products(client: &ApiClient) -> Result<Vec<Product>> {
    let request = client.request(Method::GET, &["products"])?;
    let products: Vec<Product> = client.send_json(request).await?;
    tracing::debug!(count = products.len(), "Products fetched");
    Ok(products)
}

/// Products listed by the farmer with `email`.
#[tracing::instrument(skip(client))]
pub async fn fetch_products_by_owner(client: &ApiClient, email: &str) -> Result<Vec<Product>> {
    let email = email.trim();
    validate_email(email).into_result()?;

    let request = client.request(Method::GET, &["products", email])?;
    let products: Vec<Product> = client.send_json(request).await?;
    tracing::debug!(count = products.len(), "Owner products fetched");
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::core::error::AppError;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_products_by_owner_hits_owner_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/farmer@farm.in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"_id": "x", "id": "p1", "name": "Tomatoes", "price": 40, "quantity": 12,
                 "images": ["tomato.jpg"], "email": "farmer@farm.in"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&ClientConfig::with_base_url(server.uri())).unwrap();
        let products = fetch_products_by_owner(&client, "farmer@farm.in").await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].owner_email, "farmer@farm.in");
    }

    #[tokio::test]
    async fn test_fetch_products_by_owner_rejects_blank_email() {
        let client = ApiClient::new(&ClientConfig::default()).unwrap();
        let err = fetch_products_by_owner(&client, " ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fetch_products_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = ClientConfig::with_base_url(server.uri());
        config.request_timeout = Duration::from_millis(50);
        let client = ApiClient::new(&config).unwrap();

        let err = fetch_products(&client).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)), "got {:?}", err);
    }
}
