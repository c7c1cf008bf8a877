//! Client code for showcase.
//!
//! This crate provides the outbound page fetcher, link preview extraction,
//! the content sources behind the content cache, and the preview service
//! that ties the fetcher to the preview cache.

pub mod extract;
pub mod fetch;
pub mod preview;
pub mod source;

pub use extract::{LinkPreview, extract_preview};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageFetcher};
pub use preview::PreviewService;
pub use source::{FileSource, SourceChain, StorageSource};
