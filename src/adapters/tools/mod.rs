//! Tool adapters for external augmentation sources.

mod http;

pub mod content_extract;
pub mod image_search;
pub mod patent_search;
pub mod web_search;

pub use content_extract::ContentExtractTool;
pub use image_search::ImageSearchTool;
pub use patent_search::PatentSearchTool;
pub use web_search::WebSearchTool;
