//! Services module

pub mod api_client;
pub mod result_transformer;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use api_client::{ApiClient, RetrievalService};
pub use session_store::SessionStore;
