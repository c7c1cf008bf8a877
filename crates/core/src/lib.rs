//! Core types and shared functionality for showcase.
//!
//! This crate provides:
//! - In-memory content and link-preview caches
//! - The content source seam used by the refresh protocol
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod source;

pub use cache::{ContentCache, ContentEntry, PreviewCache};
pub use config::AppConfig;
pub use error::Error;
pub use source::{ContentSource, SourcePayload};
