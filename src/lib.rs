//! Renders the client credentials & access request PDF.

pub mod builder;
pub mod canvas;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod model;
pub mod palette;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{RenderedReport, ReportBuilder, DEFAULT_OUTPUT_PATH};
pub use error::ReportError;
