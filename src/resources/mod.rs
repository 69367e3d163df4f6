//! Binds each domain type to its API collection and payload hooks.

pub mod blog;
pub mod order;
pub mod product;
pub mod testimonial;
