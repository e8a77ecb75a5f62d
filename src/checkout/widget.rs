//! Payment widget seam
//!
//! The gateway's checkout widget is opaque: it is opened for an order and
//! eventually reports exactly one outcome. Implementations hand back the
//! receiving half of a oneshot channel and send the outcome on it when the
//! user finishes. A sender dropped without a result counts as a failure.

use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::data::{Customer, Order, PaymentReceipt};

/// Everything the widget needs to collect a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    /// Gateway publishable key
    pub key: Option<String>,
    pub merchant_name: String,
    pub description: String,
    pub order: Order,
    pub prefill: Customer,
}

/// Failure reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFailure {
    pub code: Option<String>,
    pub description: String,
}

impl PaymentFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            code: None,
            description: description.into(),
        }
    }

    /// The widget went away without reporting anything
    pub fn closed() -> Self {
        Self::new("payment window closed before completing")
    }
}

impl fmt::Display for PaymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.description, code),
            None => f.write_str(&self.description),
        }
    }
}

/// The single result of a widget session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Succeeded(PaymentReceipt),
    Failed(PaymentFailure),
}

/// The widget could not be opened at all
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("payment widget unavailable: {0}")]
    Unavailable(String),
}

/// A payment UI that reports one outcome per session
pub trait PaymentWidget {
    fn open(
        &mut self,
        session: PaymentSession,
    ) -> Result<oneshot::Receiver<PaymentOutcome>, WidgetError>;
}
