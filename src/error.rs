//! Error type returned by [`crate::builder::ReportBuilder`].

use std::fmt;
use std::io;

#[cfg(feature = "bookmarks")]
use crate::bookmarks::BookmarkError;

/// Everything that can go wrong while producing the report.
#[derive(Debug)]
pub enum ReportError {
    /// No usable font family could be located or read.
    FontLoad(genpdf::error::Error),
    /// Drawing or serializing the document failed.
    Render(genpdf::error::Error),
    /// The output file could not be written.
    Io(io::Error),
    /// The outline could not be embedded into the rendered bytes.
    #[cfg(feature = "bookmarks")]
    Bookmarks(BookmarkError),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontLoad(err) => write!(f, "Failed to load report fonts: {err}"),
            Self::Render(err) => write!(f, "Failed to render the report: {err}"),
            Self::Io(err) => write!(f, "Failed to write the report: {err}"),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => write!(f, "Failed to add bookmarks: {err}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad(err) | Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
            #[cfg(feature = "bookmarks")]
            Self::Bookmarks(err) => Some(err),
        }
    }
}

impl From<io::Error> for ReportError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(feature = "bookmarks")]
impl From<BookmarkError> for ReportError {
    fn from(err: BookmarkError) -> Self {
        Self::Bookmarks(err)
    }
}
