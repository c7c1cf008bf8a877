//! In-memory caches for served content and link previews.
//!
//! Two independent policies live here:
//!
//! - `ContentCache`: one process-wide slot with a configurable TTL, swapped
//!   wholesale on refresh.
//! - `PreviewCache`: one entry per requested URL with a fixed TTL, never
//!   evicted for the life of the process.
//!
//! Neither cache persists across restarts.

pub mod content;
pub mod preview;

pub use content::{ContentCache, ContentEntry};
pub use preview::{PREVIEW_TTL, PreviewCache};
