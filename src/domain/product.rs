use serde::{Deserialize, Serialize};
use crate::pricing::discounted_price;

/// A catalogue product.
///
/// `discounted_price` is derived from `price` and `offer`; the API stores the
/// value the dashboard computed, so both sides must use [`discounted_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub offer: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub bought_quantity: u32,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub discounted_price: f64,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub offer: f64,
    pub category: String,
    pub bought_quantity: u32,
    pub image_urls: Vec<String>,
    pub discounted_price: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            discounted_price: discounted_price(price, 0.0),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self.refresh_discount();
        self
    }

    pub fn with_offer(mut self, offer: f64) -> Self {
        self.offer = offer;
        self.refresh_discount();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn refresh_discount(&mut self) {
        self.discounted_price = discounted_price(self.price, self.offer);
    }
}

impl Product {
    pub fn has_offer(&self) -> bool {
        self.offer > 0.0
    }

    /// Editable copy of this product, used to build an update.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            offer: self.offer,
            category: self.category.clone(),
            bought_quantity: self.bought_quantity,
            image_urls: self.image_urls.clone(),
            discounted_price: self.discounted_price,
        }
    }
}
