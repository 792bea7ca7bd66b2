//! Backend REST adapter for e-dream upload sessions.
//!
//! Implements [`edream_core::UploadBackendPort`] over the backend's JSON API:
//!
//! - `config` - public client configuration (base URL, API key, timeout)
//! - `http` - HTTP backend abstraction with the reqwest implementation
//! - `envelope` - `{ success, message, data }` response unwrapping
//! - `payload` - request bodies shaped by each resource type's profile
//! - `port` - port implementation and error mapping
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]
// Allow private types in public type alias - DefaultApiClient is meant to be used
// through the UploadBackendPort trait, not its internal generic structure
#![allow(private_interfaces)]

mod client;
mod config;
mod envelope;
mod error;
mod http;
mod models;
mod payload;
mod port;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::DefaultApiClient;

// Configuration
pub use config::{API_KEY_ENV, ApiClientConfig, BACKEND_URL_ENV, ConfigError};
