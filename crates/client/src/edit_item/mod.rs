//! The item edit workflow.
//!
//! [`EditItemPage`] owns the form for one item and drives it through
//!
//! - page: `idle → loading → ready | errored`
//! - submit: `idle → submitting → done | errored`
//!
//! Neither machine retries. A [`PageHandle`] lets the presentation layer
//! close the page; results that arrive afterwards are dropped.

mod loader;
mod submitter;

pub use loader::load_item;
pub use submitter::submit_update;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use stockroom_core::{Catalog, Color, FormAction, FormState, FuzzyMatcher, ItemId, validate};
use tracing::instrument;

use crate::api::{InventoryApi, InventoryClient};
use crate::config::ClientConfig;
use crate::error::{EditError, Route, Toast};
use crate::session::Session;

/// Toast shown after a successful update.
pub const UPDATE_SUCCEEDED: &str = "Item updated successfully";

/// Loading state of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Loading,
    Ready,
    Errored,
}

/// Submission state of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Done,
    Errored,
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub toast: Toast,
    pub route: Route,
}

/// Closes a page from outside; shared by every clone.
#[derive(Debug, Clone, Default)]
pub struct PageHandle(Arc<AtomicBool>);

impl PageHandle {
    /// Mark the page as navigated away from.
    pub fn close(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Build an API client for the signed-in operator.
///
/// # Errors
///
/// Returns `EditError::SignInRequired` when there is no session, so the
/// workflow never runs unauthenticated.
pub fn connect(config: &ClientConfig, session: Option<&Session>) -> Result<InventoryClient, EditError> {
    let session = session.ok_or(EditError::SignInRequired)?;
    InventoryClient::new(config, session).map_err(EditError::load)
}

/// Edit form for a single inventory item.
pub struct EditItemPage<A> {
    api: A,
    item_id: ItemId,
    catalog: Catalog,
    form: FormState,
    page: PageState,
    submit: SubmitState,
    matcher: FuzzyMatcher,
    handle: PageHandle,
}

impl EditItemPage<InventoryClient> {
    /// Open the page for `item_id` against the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `EditError::SignInRequired` without a session.
    pub fn open(
        config: &ClientConfig,
        session: Option<&Session>,
        item_id: ItemId,
    ) -> Result<Self, EditError> {
        let api = connect(config, session)?;
        Ok(Self::new(api, item_id).with_matcher(FuzzyMatcher::new(config.color_threshold)))
    }
}

impl<A: InventoryApi> EditItemPage<A> {
    /// Create an idle page; call [`Self::load`] next.
    #[must_use]
    pub fn new(api: A, item_id: ItemId) -> Self {
        let form = FormState {
            item_id: item_id.clone(),
            ..FormState::default()
        };
        Self {
            api,
            item_id,
            catalog: Catalog::default(),
            form,
            page: PageState::Idle,
            submit: SubmitState::Idle,
            matcher: FuzzyMatcher::default(),
            handle: PageHandle::default(),
        }
    }

    /// Use a different search matcher for colors and product names.
    #[must_use]
    pub fn with_matcher(mut self, matcher: FuzzyMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub fn handle(&self) -> PageHandle {
        self.handle.clone()
    }

    #[must_use]
    pub const fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    #[must_use]
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn page_state(&self) -> PageState {
        self.page
    }

    #[must_use]
    pub const fn submit_state(&self) -> SubmitState {
        self.submit
    }

    /// Derived sale price for display.
    #[must_use]
    pub fn sale_price(&self) -> String {
        self.form.sale_price()
    }

    /// Colors matching the current search text while the list is open.
    #[must_use]
    pub fn color_options(&self) -> Vec<&Color> {
        self.form.color_options(&self.catalog, &self.matcher)
    }

    /// Product names matching `query`.
    #[must_use]
    pub fn product_name_options(&self, query: &str) -> Vec<&String> {
        FormState::product_name_options(&self.catalog, &self.matcher, query)
    }

    /// Apply a user edit to the form.
    pub fn dispatch(&mut self, action: FormAction) {
        let form = std::mem::take(&mut self.form);
        self.form = form.apply(action, &self.catalog);
    }

    /// Load catalogs and the item into the form.
    ///
    /// On failure the form keeps its defaults and the page is `Errored`.
    ///
    /// # Errors
    ///
    /// Returns `EditError::Load` with the message to show, or
    /// `EditError::Closed` if the page was closed meanwhile.
    #[instrument(skip(self), fields(item_id = %self.item_id))]
    pub async fn load(&mut self) -> Result<(), EditError> {
        if self.handle.is_closed() {
            return Err(EditError::Closed);
        }

        self.page = PageState::Loading;
        let result = load_item(&self.api, &self.item_id).await;

        if self.handle.is_closed() {
            tracing::debug!("Discarding load result for closed page");
            self.page = PageState::Idle;
            return Err(EditError::Closed);
        }

        match result {
            Ok((catalog, form)) => {
                self.catalog = catalog;
                self.form = form;
                self.page = PageState::Ready;
                Ok(())
            }
            Err(source) => {
                let err = EditError::load(source);
                tracing::warn!(error = %err, "Failed to load item");
                self.page = PageState::Errored;
                Err(err)
            }
        }
    }

    /// Validate the form, run the duplicate precheck, and save.
    ///
    /// A validation failure changes nothing and sends nothing. Any other
    /// failure leaves the form editable for another attempt.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotReady`, `Invalid`, `Conflict`, `Save` or `Closed`.
    #[instrument(skip(self), fields(item_id = %self.item_id))]
    pub async fn submit(&mut self) -> Result<Submitted, EditError> {
        if self.page != PageState::Ready {
            return Err(EditError::NotReady);
        }
        if self.handle.is_closed() {
            return Err(EditError::Closed);
        }

        let update = validate(&self.form)?;

        self.submit = SubmitState::Submitting;
        let result = submit_update(&self.api, &self.item_id, &update).await;

        if self.handle.is_closed() {
            tracing::debug!("Discarding submit result for closed page");
            self.submit = SubmitState::Idle;
            return Err(EditError::Closed);
        }

        match result {
            Ok(()) => {
                self.submit = SubmitState::Done;
                Ok(Submitted {
                    toast: Toast::Success(UPDATE_SUCCEEDED.to_string()),
                    route: Route::ItemList,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to update item");
                self.submit = SubmitState::Errored;
                Err(err)
            }
        }
    }
}

impl<A> std::fmt::Debug for EditItemPage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditItemPage")
            .field("item_id", &self.item_id)
            .field("page", &self.page)
            .field("submit", &self.submit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;
    use stockroom_core::{
        ColorId, InventoryItem, ItemUpdate, Product, ProductId, ProductRef, ValidationError,
    };

    use super::*;
    use crate::api::ApiError;

    /// In-memory backend that records every call.
    #[derive(Default)]
    struct FakeApi {
        products: Vec<Product>,
        colors: Vec<Color>,
        item: Option<InventoryItem>,
        exists: bool,
        fail_products: Option<String>,
        fail_updates: Mutex<u32>,
        close_during_item: Option<PageHandle>,
        /// When set, the catalog requests only finish once both are in flight.
        catalog_barrier: Option<tokio::sync::Barrier>,
        calls: Mutex<Vec<String>>,
        updates: Mutex<Vec<ItemUpdate>>,
    }

    impl FakeApi {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InventoryApi for &FakeApi {
        async fn products(&self) -> Result<Vec<Product>, ApiError> {
            self.record("products");
            if let Some(barrier) = &self.catalog_barrier {
                barrier.wait().await;
            }
            if let Some(message) = &self.fail_products {
                return Err(ApiError::Api {
                    status: 500,
                    message: (!message.is_empty()).then(|| message.clone()),
                });
            }
            Ok(self.products.clone())
        }

        async fn colors(&self) -> Result<Vec<Color>, ApiError> {
            self.record("colors");
            if let Some(barrier) = &self.catalog_barrier {
                barrier.wait().await;
            }
            Ok(self.colors.clone())
        }

        async fn item(&self, id: &ItemId) -> Result<InventoryItem, ApiError> {
            self.record(format!("item:{id}"));
            if let Some(handle) = &self.close_during_item {
                handle.close();
            }
            self.item.clone().ok_or_else(|| ApiError::NotFound {
                path: format!("/items/{id}"),
                message: Some("Item not found".to_string()),
            })
        }

        async fn item_exists(
            &self,
            product_id: &ProductId,
            category: &str,
            exclude: &ItemId,
        ) -> Result<bool, ApiError> {
            self.record(format!("check:{product_id}:{category}:{exclude}"));
            Ok(self.exists)
        }

        async fn update_item(&self, id: &ItemId, update: &ItemUpdate) -> Result<(), ApiError> {
            self.record(format!("update:{id}"));
            let mut failures = self.fail_updates.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(ApiError::Api {
                    status: 503,
                    message: Some("Inventory service unavailable".to_string()),
                });
            }
            self.updates.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    fn table() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Table".to_string(),
            category: "Wood".to_string(),
            retail_price: Some(Decimal::from(1000)),
        }
    }

    fn fake() -> FakeApi {
        FakeApi {
            products: vec![table()],
            colors: vec![Color {
                id: ColorId::new("c1"),
                color_name: "Crimson Red".to_string(),
                color_code: "#DC143C".to_string(),
            }],
            item: Some(InventoryItem {
                id: ItemId::new("42"),
                product: Some(ProductRef::Populated(table())),
                quantity: Some(3),
                barcode: None,
                shelf: Some("A1".to_string()),
                min_stock: None,
                max_stock: None,
                color: Some("Crimson Red".to_string()),
                color_code: Some("#DC143C".to_string()),
                category: Some("Wood".to_string()),
                discount_percentage: Some(Decimal::TEN),
            }),
            ..FakeApi::default()
        }
    }

    #[tokio::test]
    async fn test_load_populates_form_and_sale_price() {
        let api = fake();
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        assert_eq!(page.page_state(), PageState::Idle);

        page.load().await.unwrap();

        assert_eq!(page.page_state(), PageState::Ready);
        assert_eq!(page.sale_price(), "900.00");
        assert_eq!(page.form().quantity, "3");
        assert_eq!(page.form().min_stock, "5");
        assert_eq!(page.form().max_stock, "50");
        assert_eq!(page.form().categories, vec!["Wood"]);
        assert_eq!(api.calls().last().map(String::as_str), Some("item:42"));
    }

    #[tokio::test]
    async fn test_catalogs_are_fetched_concurrently_before_item() {
        let api = FakeApi {
            catalog_barrier: Some(tokio::sync::Barrier::new(2)),
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));

        tokio::time::timeout(std::time::Duration::from_secs(5), page.load())
            .await
            .expect("products and colors must be requested together")
            .unwrap();

        assert_eq!(page.page_state(), PageState::Ready);
        let calls = api.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls.last().map(String::as_str), Some("item:42"));
    }

    #[tokio::test]
    async fn test_catalog_failure_aborts_load_with_server_message() {
        let api = FakeApi {
            fail_products: Some("Products unavailable".to_string()),
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));

        let err = page.load().await.unwrap_err();

        assert_eq!(err.toast(), Some(Toast::Error("Products unavailable".to_string())));
        assert_eq!(page.page_state(), PageState::Errored);
        assert_eq!(page.form().quantity, "0");
        assert!(page.form().product_id.is_empty());
        assert!(!api.calls().iter().any(|c| c.starts_with("item:")));
    }

    #[tokio::test]
    async fn test_load_failure_without_message_uses_generic_text() {
        let api = FakeApi {
            fail_products: Some(String::new()),
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        let err = page.load().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load item data");
    }

    #[tokio::test]
    async fn test_submit_before_load_is_refused() {
        let api = fake();
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        assert!(matches!(page.submit().await, Err(EditError::NotReady)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_checks_then_writes() {
        let api = fake();
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.load().await.unwrap();
        page.dispatch(FormAction::SetQuantity("8".to_string()));

        let submitted = page.submit().await.unwrap();

        assert_eq!(submitted.route, Route::ItemList);
        assert_eq!(submitted.toast, Toast::Success(UPDATE_SUCCEEDED.to_string()));
        assert_eq!(page.submit_state(), SubmitState::Done);

        let calls = api.calls();
        let tail: Vec<&str> = calls.iter().rev().take(2).rev().map(String::as_str).collect();
        assert_eq!(tail, vec!["check:p1:Wood:42", "update:42"]);

        let updates = api.updates.lock().unwrap();
        assert_eq!(updates.first().map(|u| u.quantity), Some(8));
        assert_eq!(updates.first().and_then(|u| u.shelf.clone()), Some("A1".to_string()));
    }

    #[tokio::test]
    async fn test_existing_duplicate_blocks_write() {
        let api = FakeApi {
            exists: true,
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.load().await.unwrap();

        let err = page.submit().await.unwrap_err();

        assert!(matches!(err, EditError::Conflict));
        assert!(!api.calls().iter().any(|c| c.starts_with("update:")));
        assert!(api.updates.lock().unwrap().is_empty());
        assert_eq!(page.submit_state(), SubmitState::Errored);
    }

    #[tokio::test]
    async fn test_validation_failure_sends_nothing() {
        let api = fake();
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.load().await.unwrap();
        let calls_after_load = api.calls().len();

        page.dispatch(FormAction::SetQuantity("-1".to_string()));
        let err = page.submit().await.unwrap_err();

        assert!(matches!(err, EditError::Invalid(ValidationError::NegativeStock)));
        assert_eq!(api.calls().len(), calls_after_load);
        assert_eq!(page.submit_state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_form_editable() {
        let api = FakeApi {
            fail_updates: Mutex::new(1),
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.load().await.unwrap();

        let err = page.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Inventory service unavailable");
        assert_eq!(page.submit_state(), SubmitState::Errored);

        page.dispatch(FormAction::SetShelf("B2".to_string()));
        assert_eq!(page.form().shelf, "B2");
        page.submit().await.unwrap();
        assert_eq!(page.submit_state(), SubmitState::Done);
    }

    #[tokio::test]
    async fn test_closed_page_discards_late_load() {
        let handle = PageHandle::default();
        let api = FakeApi {
            close_during_item: Some(handle.clone()),
            ..fake()
        };
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.handle = handle;

        let err = page.load().await.unwrap_err();

        assert!(matches!(err, EditError::Closed));
        assert!(err.toast().is_none());
        assert!(page.form().product_id.is_empty());
        assert_ne!(page.page_state(), PageState::Ready);
    }

    #[tokio::test]
    async fn test_color_search_and_select() {
        let api = fake();
        let mut page = EditItemPage::new(&api, ItemId::new("42"));
        page.load().await.unwrap();

        page.dispatch(FormAction::SearchColors("crimsn".to_string()));
        let picked = page.color_options().first().map(|c| (*c).clone()).unwrap();
        page.dispatch(FormAction::SelectColor(picked));

        assert_eq!(page.form().color_code, "#DC143C");
        assert!(page.color_options().is_empty());
    }

    #[test]
    fn test_connect_without_session_redirects_to_sign_in() {
        let config = ClientConfig {
            api_url: url::Url::parse("http://localhost").unwrap(),
            token: None,
            session_file: ".stockroom-session".into(),
            timeout: std::time::Duration::from_secs(5),
            color_threshold: 0.3,
        };
        let err = EditItemPage::open(&config, None, ItemId::new("42")).unwrap_err();
        assert!(matches!(err, EditError::SignInRequired));
        assert_eq!(err.route(), Some(Route::SignIn));
    }
}
