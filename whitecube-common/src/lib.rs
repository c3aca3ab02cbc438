//! # Whitecube Common Library
//!
//! Shared code for the whitecube gallery CMS services including:
//! - Error types
//! - Configuration resolution
//! - Database pool and schema initialization
//! - Domain types (image taxonomy, exhibition status, record models)
//! - The grouping/stats projector for exhibition images

pub mod config;
pub mod db;
pub mod error;
pub mod grouping;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use types::{Bucket, ExhibitionStatus, ImageType};
