//! Core types for catalog-import
//!
//! Domain types, defaults and configuration helpers shared by the storage,
//! service and CLI crates.

pub mod constants;
pub mod env_config;
mod error;
mod record;

pub use constants::*;
pub use error::*;
pub use record::*;
