use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest rating a customer can give.
pub const MAX_RATING: u8 = 5;

/// A customer rating shown on the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_name: String,
    pub rating: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub treatment: String,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialDraft {
    pub customer_name: String,
    pub rating: u8,
    pub description: String,
    pub treatment: String,
    pub links: Vec<String>,
    pub image_urls: Vec<String>,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl TestimonialDraft {
    pub fn new(customer_name: impl Into<String>, rating: u8) -> Self {
        Self {
            customer_name: customer_name.into(),
            rating,
            ..Self::default()
        }
    }
}

/// Drops blank entries left behind by empty form rows, keeping order.
pub fn drop_blank(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}
