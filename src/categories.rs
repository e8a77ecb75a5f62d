//! Category management
//!
//! Admin flow for listing course categories and creating new ones. Creation
//! validates the form locally, posts it, then reloads the list so the screen
//! reflects the server's view.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::data::{Category, NewCategory};
use crate::notify::{Notifier, Toast};

/// A required form field left blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Category name is required")]
    NameRequired,
    #[error("Category description is required")]
    DescriptionRequired,
}

/// Errors from the category flows
#[derive(Debug, Error)]
pub enum CategoryError {
    /// The form failed local validation
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<FieldError>),

    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Editable category form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub description: String,
}

impl CategoryForm {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Checks required fields and returns the trimmed payload
    pub fn validate(&self) -> Result<NewCategory, Vec<FieldError>> {
        let name = self.name.trim();
        let description = self.description.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::NameRequired);
        }
        if description.is_empty() {
            errors.push(FieldError::DescriptionRequired);
        }

        if errors.is_empty() {
            Ok(NewCategory {
                name: name.to_string(),
                description: description.to_string(),
            })
        } else {
            Err(errors)
        }
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
    }
}

/// Lists and creates categories, reporting through a notifier
pub struct CategoryManager<'a, N> {
    api: &'a ApiClient,
    notifier: N,
}

impl<'a, N: Notifier> CategoryManager<'a, N> {
    pub fn new(api: &'a ApiClient, notifier: N) -> Self {
        Self { api, notifier }
    }

    /// Fetches all categories; on failure shows a toast and returns none
    pub async fn load(&self) -> Vec<Category> {
        match self.api.fetch_categories().await {
            Ok(categories) => categories,
            Err(err) => {
                warn!(error = %err, "error fetching categories");
                self.notifier.notify(Toast::error("Failed to fetch categories"));
                Vec::new()
            }
        }
    }

    /// Validates and submits the form, then reloads the list
    ///
    /// On success the form is cleared and the refreshed list returned. On
    /// failure the form keeps its contents so the user can correct it.
    pub async fn create(&self, form: &mut CategoryForm) -> Result<Vec<Category>, CategoryError> {
        let category = match form.validate() {
            Ok(category) => category,
            Err(errors) => {
                for error in &errors {
                    self.notifier.notify(Toast::error(error.to_string()));
                }
                return Err(CategoryError::Invalid(errors));
            }
        };

        self.notifier.notify(Toast::loading("Creating category..."));
        let result = self.api.create_category(&category).await;
        self.notifier.dismiss_loading();

        if let Err(err) = result {
            warn!(error = %err, "error creating category");
            let message = err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Could not create category: {}", err));
            self.notifier.notify(Toast::error(message));
            return Err(err.into());
        }

        info!(name = %category.name, "category created");
        self.notifier.notify(Toast::success("Category created successfully"));
        form.reset();
        Ok(self.load().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::endpoints;
    use crate::notify::{ToastLevel, ToastLog};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_validate_requires_both_fields() {
        assert_eq!(
            CategoryForm::default().validate(),
            Err(vec![FieldError::NameRequired, FieldError::DescriptionRequired])
        );
        assert_eq!(
            CategoryForm::new("  ", "desc").validate(),
            Err(vec![FieldError::NameRequired])
        );
        assert_eq!(
            CategoryForm::new("AI", "").validate(),
            Err(vec![FieldError::DescriptionRequired])
        );
    }

    #[test]
    fn test_validate_trims_values() {
        let category = CategoryForm::new("  AI ", " Machine learning ").validate().unwrap();
        assert_eq!(category.name, "AI");
        assert_eq!(category.description, "Machine learning");
    }

    #[test]
    fn test_invalid_error_lists_every_field() {
        let err = CategoryError::Invalid(vec![
            FieldError::NameRequired,
            FieldError::DescriptionRequired,
        ]);
        assert_eq!(
            err.to_string(),
            "Category name is required; Category description is required"
        );
    }

    async fn mount_categories(server: &MockServer, data: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(endpoints::SHOW_ALL_CATEGORIES))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_load_returns_categories() {
        let server = MockServer::start().await;
        mount_categories(&server, json!([{ "_id": "1", "name": "Web", "description": "HTML" }]))
            .await;
        let api = ApiClient::new(server.uri());
        let toasts = ToastLog::new();

        let categories = CategoryManager::new(&api, &toasts).load().await;

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Web");
        assert!(toasts.all().is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_toasts_and_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(endpoints::SHOW_ALL_CATEGORIES))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri());
        let toasts = ToastLog::new();

        let categories = CategoryManager::new(&api, &toasts).load().await;

        assert!(categories.is_empty());
        assert_eq!(toasts.latest(), Some(Toast::error("Failed to fetch categories")));
    }

    #[tokio::test]
    async fn test_create_posts_then_refreshes_and_resets_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(endpoints::CREATE_CATEGORY))
            .and(header("authorization", "Bearer admin"))
            .and(body_json(json!({ "name": "AI", "description": "ML" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        mount_categories(&server, json!([{ "_id": "9", "name": "AI", "description": "ML" }]))
            .await;
        let api = ApiClient::new(server.uri()).with_token(Some("admin".to_string()));
        let toasts = ToastLog::new();
        let mut form = CategoryForm::new("AI", "ML");

        let categories = CategoryManager::new(&api, &toasts)
            .create(&mut form)
            .await
            .expect("create should succeed");

        assert_eq!(categories[0].id, "9");
        assert_eq!(form, CategoryForm::default());
        assert_eq!(toasts.latest(), Some(Toast::success("Category created successfully")));
        assert!(toasts.all().iter().all(|t| t.level != ToastLevel::Loading));
    }

    #[tokio::test]
    async fn test_create_invalid_form_never_calls_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri()).with_token(Some("admin".to_string()));
        let toasts = ToastLog::new();
        let mut form = CategoryForm::new("AI", " ");

        let err = CategoryManager::new(&api, &toasts).create(&mut form).await.unwrap_err();

        assert!(matches!(err, CategoryError::Invalid(ref e) if e == &[FieldError::DescriptionRequired]));
        assert_eq!(form.name, "AI");
        assert_eq!(toasts.latest(), Some(Toast::error("Category description is required")));
    }

    #[tokio::test]
    async fn test_create_rejected_keeps_form_and_shows_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(endpoints::CREATE_CATEGORY))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "message": "Category already exists"
            })))
            .mount(&server)
            .await;
        let api = ApiClient::new(server.uri()).with_token(Some("admin".to_string()));
        let toasts = ToastLog::new();
        let mut form = CategoryForm::new("AI", "ML");

        let err = CategoryManager::new(&api, &toasts).create(&mut form).await.unwrap_err();

        assert!(matches!(err, CategoryError::Api(ApiError::Rejected(_))));
        assert_eq!(form, CategoryForm::new("AI", "ML"));
        assert_eq!(toasts.latest(), Some(Toast::error("Category already exists")));
    }
}
