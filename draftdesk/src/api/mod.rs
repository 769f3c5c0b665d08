//! Backend API client.
//!
//! Implements the draft generation and copy notification collaborators over
//! the assistant's JSON HTTP API.

mod client;
mod types;

pub use client::ApiClient;
pub use types::ModelInfo;
