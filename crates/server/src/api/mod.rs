//! HTTP endpoint implementations.

pub mod content;
pub mod link_preview;
