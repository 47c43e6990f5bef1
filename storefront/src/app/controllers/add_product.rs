//! # Add Product
//!
//! Upload form for farmers. The listing's owner email comes from the session;
//! without one the screen shows `no-session` and nothing is sent.

use std::sync::Arc;

use async_trait::async_trait;
use shared::Product;

use crate::app::controller::{ScreenController, ScreenLifecycle, ScreenState};
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::api::upload::{ImageUpload, NewProduct, INCOMPLETE_PRODUCT};
use crate::services::session::SessionManager;
use crate::utils::validation::{parse_price, parse_quantity};

pub const MISSING_EMAIL: &str = "Email not found. Please log in again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddProductForm {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub images: Vec<ImageUpload>,
    /// Products uploaded during this visit, newest last
    pub added: Vec<Product>,
    pub error: Option<String>,
}

impl AddProductForm {
    fn clear_draft(&mut self) {
        self.id.clear();
        self.name.clear();
        self.price.clear();
        self.quantity.clear();
        self.images.clear();
        self.error = None;
    }

    fn to_new_product(&self, owner_email: String) -> Result<NewProduct> {
        if [&self.id, &self.name, &self.price, &self.quantity]
            .iter()
            .any(|v| v.trim().is_empty())
            || self.images.is_empty()
        {
            return Err(AppError::Validation(INCOMPLETE_PRODUCT.to_string()));
        }
        let product = NewProduct {
            id: self.id.trim().to_string(),
            name: self.name.trim().to_string(),
            price: parse_price(&self.price)?,
            quantity: parse_quantity(&self.quantity)?,
            owner_email,
            images: self.images.clone(),
        };
        product.validate()?;
        Ok(product)
    }
}

pub struct AddProductController {
    api: Arc<dyn ApiService>,
    session: Arc<SessionManager>,
    screen: ScreenController<AddProductForm>,
}

impl AddProductController {
    pub fn new(api: Arc<dyn ApiService>, session: Arc<SessionManager>) -> Self {
        Self {
            api,
            session,
            screen: ScreenController::new("add_product"),
        }
    }

    pub fn state(&self) -> ScreenState<AddProductForm> {
        self.screen.state()
    }

    pub fn edit<F: FnOnce(&mut AddProductForm)>(&self, edit: F) -> bool {
        self.screen.update(edit)
    }

    pub fn add_image(&self, image: ImageUpload) -> bool {
        self.screen.update(|form| form.images.push(image))
    }

    /// Upload the draft. On success the created product is appended to
    /// `added` and the draft is reset.
    pub async fn submit(&self) -> Result<Product> {
        let api = self.api.clone();
        let owner_email = self.session.current().map(|s| s.email);
        self.screen
            .submit_recoverable(
                |mut form| async move {
                    let owner_email = owner_email
                        .ok_or_else(|| AppError::Validation(MISSING_EMAIL.to_string()))?;
                    let new_product = form.to_new_product(owner_email)?;
                    let created = api.upload_product(new_product).await?;
                    form.clear_draft();
                    form.added.push(created.clone());
                    Ok::<_, AppError>((form, created))
                },
                |form, err| {
                    form.error = Some(match err {
                        AppError::Validation(msg) => msg.clone(),
                        other => format!("Error adding product: {}", other.user_message()),
                    })
                },
            )
            .await
    }
}

#[async_trait]
impl ScreenLifecycle for AddProductController {
    fn mount(&self) {
        self.screen.mount();
    }

    fn unmount(&self) {
        self.screen.unmount();
    }

    async fn load(&self) -> Result<()> {
        self.screen
            .load_for_session(self.session.current(), |_| async { Ok(AddProductForm::default()) })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::controllers::mock::{product, session_with, MockApiService};
    use shared::Role;

    fn fill(form: &mut AddProductForm) {
        form.id = "p9".into();
        form.name = "Onions".into();
        form.price = "30".into();
        form.quantity = "50".into();
        form.images.push(ImageUpload::jpeg(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_upload_appends_product_and_resets_draft() {
        let api = MockApiService::new();
        *api.upload.lock() = Some(Ok(product("p9", 30.0)));
        let (_, session) = session_with(Some(Role::Farmer)).await;

        let controller = AddProductController::new(api.clone(), session);
        controller.mount();
        controller.load().await.unwrap();
        controller.edit(fill);

        let created = controller.submit().await.unwrap();
        assert_eq!(created.id, "p9");

        let form = controller.state().data().cloned().unwrap();
        assert!(form.id.is_empty() && form.images.is_empty());
        assert_eq!(form.added.len(), 1);
        assert_eq!(api.calls(), vec!["upload_product:p9".to_string()]);
    }

    #[tokio::test]
    async fn test_incomplete_form_is_rejected_locally() {
        let api = MockApiService::new();
        let (_, session) = session_with(Some(Role::Farmer)).await;

        let controller = AddProductController::new(api.clone(), session);
        controller.mount();
        controller.load().await.unwrap();
        controller.edit(|form| {
            fill(form);
            form.images.clear();
        });

        assert!(controller.submit().await.is_err());
        assert_eq!(api.call_count(), 0);
        let form = controller.state().data().cloned().unwrap();
        assert_eq!(form.error.as_deref(), Some(INCOMPLETE_PRODUCT));
        assert_eq!(form.id, "p9");
    }

    #[tokio::test]
    async fn test_no_session_blocks_the_form() {
        let api = MockApiService::new();
        let (_, session) = session_with(None).await;

        let controller = AddProductController::new(api, session);
        controller.mount();
        assert_eq!(controller.load().await.unwrap_err(), AppError::Unauthenticated);
        assert!(controller.submit().await.is_err());
    }
}
