//! Backend services.

pub mod accessors;
pub mod client;
pub mod sanitize;

pub use client::{ApiClient, LoginError};
