//! Client for the blog posts API.
//!
//! The [`Controller`] drives a headless [`Page`](page::Page): it turns user
//! actions into requests through [`ApiClient`], renders post lists with
//! [`templates`], keeps the category dropdowns in sync and persists the
//! session in a [`KeyValueStore`].

pub mod core {
    pub mod errors;
    pub mod helpers;
    pub mod query_params;
    pub mod store;
}

pub mod models {
    #[allow(clippy::module_inception)]
    pub mod models;
}

mod auth;
pub mod categories;
pub mod client;
pub mod config;
pub mod controller;
pub mod page;
mod posts;
pub mod session;
pub mod templates;

pub use crate::client::ApiClient;
pub use crate::controller::Controller;
pub use crate::core::errors::{ClientError, StoreError};
pub use crate::core::store::{FileStore, KeyValueStore, MemoryStore};
pub use crate::models::models::{Post, PostDraft, PostId};
