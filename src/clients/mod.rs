//! Named, per-resource handles over the generic store client.

#[macro_use]
mod macros;
mod blog_client;
mod order_client;
mod product_client;
mod testimonial_client;

pub use blog_client::BlogClient;
pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use testimonial_client::TestimonialClient;
