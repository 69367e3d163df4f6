//! Client-side data layer for the storefront admin dashboard.
//!
//! One [`actor_framework::ResourceStore`] per API collection keeps a cached
//! copy of products, blogs, testimonials and orders. Stores talk to the API
//! through [`services::ResourceService`] over a shared [`transport::Transport`],
//! and [`app_system::AdminSystem`] starts and stops them together.

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod patch;
pub mod pricing;
pub mod resources;
pub mod services;
pub mod transport;

#[cfg(test)]
mod mock_framework;
