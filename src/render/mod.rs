//! Rendering module for assembling processed pages into output formats.

mod cleanup;
mod json;
mod options;
mod result;
mod text;

pub use cleanup::CleanupOptions;
pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, PageSeparator, RenderOptions};
pub use result::ExtractionStats;
pub use text::to_text;
