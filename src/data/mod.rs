//! Core data models for the SkillPort client
//!
//! Shapes of the records exchanged with the marketplace backend: reviews,
//! categories, payment orders and receipts. Field names follow the backend's
//! camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Author of a review
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Avatar URL, when the user uploaded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The course a review was left on
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_name: String,
}

/// A single course review as served by the ratings API
///
/// Every field is optional on the wire; missing or null values fall back
/// to empty text and a zero rating.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Star rating, observed in 0..=5
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    /// Free-text review body
    #[serde(default, deserialize_with = "null_as_default")]
    pub review: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<CourseSummary>,
}

/// A course category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Description for display, with a placeholder when none was given
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description",
        }
    }
}

/// Payload for creating a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

/// Order created server-side for a paid checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Gateway order identifier
    pub id: String,
    /// ISO currency code, e.g. "INR"
    pub currency: String,
    /// Amount in the currency's minor unit
    pub amount: u64,
}

impl Order {
    /// Amount formatted in major units, e.g. `INR 499.00`
    pub fn display_amount(&self) -> String {
        format!("{} {}.{:02}", self.currency, self.amount / 100, self.amount % 100)
    }
}

/// Identifiers the payment gateway returns for a completed payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// The buyer, used to prefill the payment widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}
