//! Checkout orchestration
//!
//! Buying a cart goes: create the order on the backend, hand the order to the
//! payment widget, wait for its single outcome, then verify the payment and
//! request the confirmation email. Free carts skip the widget because the
//! backend enrolls the user while creating the order.
//!
//! Every failure is reported through the notifier at the point it happens and
//! then returned, so callers only need to look at the result for control flow.
//! A failed or cancelled payment leaves the cart intact for a retry.

mod terminal;
mod widget;

pub use terminal::TerminalWidget;
pub use widget::{PaymentFailure, PaymentOutcome, PaymentSession, PaymentWidget, WidgetError};

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::data::{Customer, PaymentReceipt};
use crate::notify::{Notifier, Toast};

/// Merchant name shown in the payment widget
pub const DEFAULT_MERCHANT_NAME: &str = "SkillPort";

/// Line shown under the merchant name in the payment widget
pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Thank you for Purchasing the Course.";

/// Courses selected for purchase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    courses: Vec<String>,
    /// True while a checkout for this cart is in flight
    pub payment_loading: bool,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from course ids, dropping duplicates
    pub fn with_courses<I, S>(courses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cart = Self::new();
        for course in courses {
            cart.add(course);
        }
        cart
    }

    /// Adds a course; returns false if it was already in the cart
    pub fn add(&mut self, course: impl Into<String>) -> bool {
        let course = course.into();
        if self.courses.contains(&course) {
            return false;
        }
        self.courses.push(course);
        true
    }

    pub fn remove(&mut self, course: &str) -> bool {
        let before = self.courses.len();
        self.courses.retain(|c| c != course);
        self.courses.len() != before
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Empties the cart after a completed purchase
    pub fn reset(&mut self) {
        self.courses.clear();
    }
}

/// How a checkout completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Enrolled without payment
    Enrolled,
    /// Paid and verified
    Paid(PaymentReceipt),
}

/// Why a checkout did not complete
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    /// Creating the order or enrolling failed
    #[error("could not start checkout: {0}")]
    Fetch(#[source] ApiError),

    #[error(transparent)]
    WidgetUnavailable(#[from] WidgetError),

    /// The gateway reported a failed or abandoned payment
    #[error("payment failed: {0}")]
    Payment(PaymentFailure),

    /// The backend refused to verify a completed payment
    #[error("payment verification failed: {0}")]
    Verification(#[source] ApiError),
}

/// Static details passed to the payment widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub payment_key: Option<String>,
    pub merchant_name: String,
    pub description: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_key: None,
            merchant_name: DEFAULT_MERCHANT_NAME.to_string(),
            description: DEFAULT_PAYMENT_DESCRIPTION.to_string(),
        }
    }
}

/// Runs purchases against the backend and a payment widget
pub struct Checkout<'a, W, N> {
    api: &'a ApiClient,
    widget: W,
    notifier: N,
    config: CheckoutConfig,
}

impl<'a, W: PaymentWidget, N: Notifier> Checkout<'a, W, N> {
    pub fn new(api: &'a ApiClient, widget: W, notifier: N) -> Self {
        Self {
            api,
            widget,
            notifier,
            config: CheckoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CheckoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Buys every course in `cart`
    ///
    /// `cart.payment_loading` is set for the duration of the call and is
    /// always false again when it returns.
    pub async fn buy(
        &mut self,
        cart: &mut Cart,
        customer: &Customer,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        if cart.is_empty() {
            self.notifier.notify(Toast::error("Your cart is empty"));
            return Err(CheckoutError::EmptyCart);
        }

        self.notifier.notify(Toast::loading("Processing..."));
        cart.payment_loading = true;

        let result = self.purchase(cart, customer).await;

        cart.payment_loading = false;
        self.notifier.dismiss_loading();
        match &result {
            Ok(outcome) => info!(?outcome, "checkout completed"),
            Err(err) => warn!(error = %err, "checkout did not complete"),
        }
        result
    }

    async fn purchase(
        &mut self,
        cart: &mut Cart,
        customer: &Customer,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let courses = cart.courses().to_vec();

        let order = match self.api.capture_payment(&courses).await {
            Ok(order) => order,
            Err(err) => {
                let message = err.server_message().unwrap_or("Could not make payment");
                self.notifier.notify(Toast::error(message));
                return Err(CheckoutError::Fetch(err));
            }
        };

        let Some(order) = order else {
            self.notifier
                .notify(Toast::success("Successfully enrolled in the free course"));
            cart.reset();
            return Ok(CheckoutOutcome::Enrolled);
        };
        info!(order_id = %order.id, amount = order.amount, "order created");

        let amount = order.amount;
        let session = PaymentSession {
            key: self.config.payment_key.clone(),
            merchant_name: self.config.merchant_name.clone(),
            description: self.config.description.clone(),
            order,
            prefill: customer.clone(),
        };

        let receiver = match self.widget.open(session) {
            Ok(receiver) => receiver,
            Err(err) => {
                self.notifier.notify(Toast::error(
                    "Payment widget failed to load. Check your Internet Connection.",
                ));
                return Err(err.into());
            }
        };

        let receipt = match receiver.await {
            Ok(PaymentOutcome::Succeeded(receipt)) => receipt,
            Ok(PaymentOutcome::Failed(failure)) => {
                self.notifier.notify(Toast::error("Oops! Payment Failed."));
                return Err(CheckoutError::Payment(failure));
            }
            Err(_) => {
                self.notifier.notify(Toast::error("Oops! Payment Failed."));
                return Err(CheckoutError::Payment(PaymentFailure::closed()));
            }
        };

        self.notifier.notify(Toast::loading("Verifying Payment..."));
        let (email, verification) = futures::future::join(
            self.api.send_payment_success_email(&receipt, amount),
            self.api.verify_payment(&receipt, &courses),
        )
        .await;

        if let Err(err) = email {
            warn!(error = %err, "payment success email failed");
        }

        match verification {
            Ok(()) => {
                self.notifier
                    .notify(Toast::success("Payment Successful. You are Added to the course"));
                cart.reset();
                Ok(CheckoutOutcome::Paid(receipt))
            }
            Err(err) => {
                self.notifier.notify(Toast::error("Could Not Verify Payment."));
                Err(CheckoutError::Verification(err))
            }
        }
    }

    /// Enrolls in a single free course without going through payment
    pub async fn enroll_free(
        &mut self,
        course_id: &str,
        cart: &mut Cart,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        self.notifier.notify(Toast::loading("Enrolling in the course..."));
        cart.payment_loading = true;

        let result = match self.api.enroll_free_course(course_id).await {
            Ok(()) => {
                self.notifier
                    .notify(Toast::success("Successfully enrolled in the free course"));
                cart.reset();
                Ok(CheckoutOutcome::Enrolled)
            }
            Err(err) => {
                warn!(error = %err, %course_id, "free course enrollment failed");
                let message = err
                    .server_message()
                    .unwrap_or("Failed to enroll in the free course");
                self.notifier.notify(Toast::error(message));
                Err(CheckoutError::Fetch(err))
            }
        };

        cart.payment_loading = false;
        self.notifier.dismiss_loading();
        result
    }
}
