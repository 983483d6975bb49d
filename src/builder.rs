//! Report construction entry point.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::canvas::Canvas;
use crate::error::ReportError;
use crate::fonts;
use crate::layout::{self, SectionMark};
use crate::model::CredentialsRequest;

/// Path the report is written to unless configured otherwise.
pub const DEFAULT_OUTPUT_PATH: &str = "docs/client-credentials-request.pdf";

/// Builder rendering a [`CredentialsRequest`] into PDF bytes.
#[derive(Default)]
pub struct ReportBuilder {
    content: CredentialsRequest,
    font_directory: Option<PathBuf>,
}

impl ReportBuilder {
    /// Creates a builder for the default request content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rendered content.
    pub fn with_content(mut self, content: CredentialsRequest) -> Self {
        self.content = content;
        self
    }

    /// Overrides the date printed in the page header.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.content = self.content.with_date(date);
        self
    }

    /// Searches `directory` for the font files before any other location.
    pub fn with_font_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.font_directory = Some(directory.into());
        self
    }

    /// Returns the content that will be rendered.
    pub fn content(&self) -> &CredentialsRequest {
        &self.content
    }

    /// Renders the report.
    pub fn render(&self) -> Result<RenderedReport, ReportError> {
        let font_pair =
            fonts::load_font_pair(self.font_directory.as_deref()).map_err(ReportError::FontLoad)?;
        info!("Rendering with font family '{}'", font_pair.family_name());

        let mut canvas =
            Canvas::new(self.content.title(), &font_pair).map_err(ReportError::Render)?;
        let sections =
            layout::render_request(&mut canvas, &self.content).map_err(ReportError::Render)?;
        let finished = canvas.finish().map_err(ReportError::Render)?;

        info!(
            "Rendered {} pages ({} bytes)",
            finished.page_count,
            finished.bytes.len()
        );

        Ok(RenderedReport {
            bytes: finished.bytes,
            page_count: finished.page_count,
            sections,
        })
    }

    /// Renders the report and adds an outline entry for every section.
    #[cfg(feature = "bookmarks")]
    pub fn render_with_bookmarks(&self) -> Result<RenderedReport, ReportError> {
        let mut report = self.render()?;
        report.bytes = crate::bookmarks::apply_section_bookmarks(&report.bytes, &report.sections)?;
        Ok(report)
    }
}

/// A rendered report together with layout facts about it.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    /// Serialized PDF document.
    pub bytes: Vec<u8>,
    /// Number of pages.
    pub page_count: usize,
    /// Major sections in document order.
    pub sections: Vec<SectionMark>,
}

impl RenderedReport {
    /// Writes the document to `path`, creating missing parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, &self.bytes)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}
