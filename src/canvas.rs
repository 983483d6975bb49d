//! A cursor-based drawing surface on top of `printpdf`.
//!
//! The canvas works in millimetres with the origin in the top-left corner of an A4 page, keeps a
//! current position that advances as cells are drawn, and breaks pages automatically when a cell
//! would run into the bottom margin.  Text is measured with `genpdf`'s font cache so that
//! alignment and wrapping use the same faces that get embedded into the document.

use std::io::BufWriter;

use genpdf::error::{Context as _, Error, ErrorKind};
use genpdf::fonts::FontCache;
use genpdf::style::{Color, Style, StyledString};
use genpdf::Alignment;
use log::debug;
use printpdf::indices::{PdfLayerIndex, PdfPageIndex};
use printpdf::{IndirectFontRef, Line, PdfDocument, PdfDocumentReference, PdfLayerReference, Point};

use crate::fonts::FontPair;

/// Width of an A4 page.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// Height of an A4 page.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Left, top and right page margin.
pub const MARGIN_MM: f64 = 10.0;
/// Distance from the bottom edge at which cells trigger a page break.
pub const BOTTOM_MARGIN_MM: f64 = 20.0;

const CELL_MARGIN_MM: f64 = 1.0;
const LINE_WIDTH_PT: f64 = 0.567;
const MM_PER_PT: f64 = 25.4 / 72.0;
const BEZIER_KAPPA: f64 = 0.552_284_749_8;
const LAYER_NAME: &str = "Content";

/// Font weights available on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// How a closed shape is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    /// Fill with the current fill color.
    Fill,
    /// Outline with the current draw color.
    Stroke,
    /// Fill and outline.
    FillStroke,
}

impl Paint {
    fn fills(self) -> bool {
        matches!(self, Paint::Fill | Paint::FillStroke)
    }

    fn strokes(self) -> bool {
        matches!(self, Paint::Stroke | Paint::FillStroke)
    }
}

/// A single-line text box drawn at the current position.
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    width: f64,
    height: f64,
    text: &'a str,
    alignment: Alignment,
    fill: bool,
    newline: bool,
}

impl<'a> Cell<'a> {
    /// Creates a left-aligned, unfilled cell.
    ///
    /// A width of zero or less extends the cell to the right margin.
    pub fn new(width: f64, height: f64, text: &'a str) -> Self {
        Self {
            width,
            height,
            text,
            alignment: Alignment::Left,
            fill: false,
            newline: false,
        }
    }

    /// Sets the text alignment inside the cell.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Paints the cell background with the current fill color.
    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }

    /// Moves the cursor to the start of the next line after drawing.
    pub fn newline(mut self) -> Self {
        self.newline = true;
        self
    }
}

/// Callbacks drawing the repeated parts of every page.
pub trait PageTemplate {
    /// Draws the page header; invoked right after a page is started.
    fn header(&self, canvas: &mut Canvas) -> Result<(), Error>;

    /// Draws the page footer; invoked before the page is closed.
    fn footer(&self, canvas: &mut Canvas) -> Result<(), Error>;
}

#[derive(Clone, Copy)]
enum TemplatePart {
    Header,
    Footer,
}

#[derive(Clone, Copy)]
struct GraphicsState {
    fill_color: Color,
    draw_color: Color,
    text_color: Color,
    weight: FontWeight,
    font_size: u8,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::Greyscale(0),
            draw_color: Color::Greyscale(0),
            text_color: Color::Greyscale(0),
            weight: FontWeight::Regular,
            font_size: 12,
        }
    }
}

struct EmbeddedFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// The rendered document produced by [`Canvas::finish`].
pub struct FinishedDocument {
    /// Serialized PDF bytes.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
}

/// A page canvas with a moving cursor.
pub struct Canvas {
    document: PdfDocumentReference,
    initial_page: Option<(PdfPageIndex, PdfLayerIndex)>,
    layer: Option<PdfLayerReference>,
    fonts: EmbeddedFonts,
    font_cache: FontCache,
    template: Option<Box<dyn PageTemplate>>,
    state: GraphicsState,
    page: usize,
    x: f64,
    y: f64,
    in_template: bool,
}

impl Canvas {
    /// Creates an empty document titled `title` with both faces of `fonts` embedded.
    ///
    /// No page exists until [`Canvas::add_page`] is called.
    pub fn new(title: &str, fonts: &FontPair) -> Result<Self, Error> {
        let (document, page, layer) = PdfDocument::new(
            title,
            printpdf::Mm(PAGE_WIDTH_MM),
            printpdf::Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );

        let regular = document
            .add_external_font(fonts.regular().bytes())
            .with_context(|| format!("Failed to embed {}", fonts.regular().path().display()))?;
        let bold = document
            .add_external_font(fonts.bold().bytes())
            .with_context(|| format!("Failed to embed {}", fonts.bold().path().display()))?;
        let font_cache = FontCache::new(fonts.metrics_family()?);

        Ok(Self {
            document,
            initial_page: Some((page, layer)),
            layer: None,
            fonts: EmbeddedFonts { regular, bold },
            font_cache,
            template: None,
            state: GraphicsState::default(),
            page: 0,
            x: MARGIN_MM,
            y: MARGIN_MM,
            in_template: false,
        })
    }

    /// Installs the header/footer callbacks used for every subsequent page.
    pub fn set_template(&mut self, template: Box<dyn PageTemplate>) {
        self.template = Some(template);
    }

    /// Returns the 1-based number of the current page, or `0` before the first page.
    pub fn page_no(&self) -> usize {
        self.page
    }

    /// Closes the current page (drawing its footer) and starts a new one.
    pub fn add_page(&mut self) -> Result<(), Error> {
        if self.page > 0 {
            self.render_template(TemplatePart::Footer)?;
        }

        let (page, layer) = match self.initial_page.take() {
            Some(ids) => ids,
            None => self.document.add_page(
                printpdf::Mm(PAGE_WIDTH_MM),
                printpdf::Mm(PAGE_HEIGHT_MM),
                LAYER_NAME,
            ),
        };
        let layer = self.document.get_page(page).get_layer(layer);
        layer.set_outline_thickness(LINE_WIDTH_PT);
        self.layer = Some(layer);

        self.page += 1;
        self.x = MARGIN_MM;
        self.y = MARGIN_MM;
        debug!("Started page {}", self.page);

        self.render_template(TemplatePart::Header)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Moves the cursor vertically and back to the left margin.
    pub fn set_y(&mut self, y: f64) {
        self.x = MARGIN_MM;
        self.y = y;
    }

    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Moves to the left margin of the line `height` millimetres below.
    pub fn ln(&mut self, height: f64) {
        self.x = MARGIN_MM;
        self.y += height;
    }

    /// Vertical space left before the automatic page break.
    pub fn remaining_height(&self) -> f64 {
        page_break_trigger() - self.y
    }

    /// Starts a new page unless `height` millimetres still fit on the current one.
    ///
    /// Returns whether a page break happened.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool, Error> {
        if self.in_template || height <= self.remaining_height() {
            return Ok(false);
        }
        self.add_page()?;
        Ok(true)
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    pub fn set_draw_color(&mut self, color: Color) {
        self.state.draw_color = color;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.state.text_color = color;
    }

    /// Selects the face and size (in points) for subsequent text.
    pub fn set_font(&mut self, weight: FontWeight, size: u8) {
        self.state.weight = weight;
        self.state.font_size = size;
    }

    /// Width of `text` in the current font, in millimetres.
    pub fn string_width(&self, text: &str) -> f64 {
        let mut style = Style::new().with_font_size(self.state.font_size);
        if self.state.weight == FontWeight::Bold {
            style.set_bold();
        }
        let width = StyledString::new(text.to_owned(), style).width(&self.font_cache);
        mm_to_f64(width)
    }

    /// Draws a single-line cell at the cursor and advances it.
    pub fn cell(&mut self, cell: Cell<'_>) -> Result<(), Error> {
        if !self.in_template && cell.height > self.remaining_height() {
            let x = self.x;
            self.add_page()?;
            self.x = x;
        }

        let width = if cell.width > 0.0 {
            cell.width
        } else {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        };

        if cell.fill {
            self.rect(self.x, self.y, width, cell.height, Paint::Fill)?;
        }

        if !cell.text.is_empty() {
            let text_width = self.string_width(cell.text);
            let text_x = aligned_text_x(self.x, width, text_width, cell.alignment);
            let baseline = baseline_y(self.y, cell.height, self.state.font_size);
            self.draw_text(text_x, baseline, cell.text)?;
        }

        if cell.newline {
            self.ln(cell.height);
        } else {
            self.x += width;
        }
        Ok(())
    }

    /// Draws `text` wrapped into lines of `line_height`, all starting at the current x.
    ///
    /// Afterwards the cursor sits at the left margin below the last line.
    pub fn multi_cell(&mut self, width: f64, line_height: f64, text: &str) -> Result<(), Error> {
        let start_x = self.x;
        let width = if width > 0.0 {
            width
        } else {
            PAGE_WIDTH_MM - MARGIN_MM - start_x
        };

        let lines = wrap_text(text, width - 2.0 * CELL_MARGIN_MM, |line| {
            self.string_width(line)
        });
        for line in &lines {
            self.x = start_x;
            self.cell(Cell::new(width, line_height, line))?;
            self.y += line_height;
        }

        self.x = MARGIN_MM;
        Ok(())
    }

    /// Draws a rectangle whose top-left corner is at (`x`, `y`).
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: Paint,
    ) -> Result<(), Error> {
        let points = [
            (x, y),
            (x + width, y),
            (x + width, y + height),
            (x, y + height),
        ]
        .iter()
        .map(|&(px, py)| (pdf_point(px, py), false))
        .collect();

        self.paint_path(points, true, paint)
    }

    /// Fills the ellipse inscribed in the given bounding box.
    pub fn ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), Error> {
        let points = ellipse_points(x + width / 2.0, y + height / 2.0, width / 2.0, height / 2.0)
            .into_iter()
            .map(|(px, py, handle)| (pdf_point(px, py), handle))
            .collect();

        self.paint_path(points, true, Paint::Fill)
    }

    /// Strokes a straight line with the current draw color.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<(), Error> {
        let points = vec![(pdf_point(x1, y1), false), (pdf_point(x2, y2), false)];
        self.paint_path(points, false, Paint::Stroke)
    }

    /// Closes the last page and serializes the document.
    pub fn finish(mut self) -> Result<FinishedDocument, Error> {
        if self.page == 0 {
            return Err(Error::new(
                "Cannot serialize a document without pages",
                ErrorKind::InvalidData,
            ));
        }
        self.render_template(TemplatePart::Footer)?;

        let page_count = self.page;
        let mut writer = BufWriter::new(Vec::new());
        self.document
            .save(&mut writer)
            .context("Failed to serialize the PDF document")?;
        let bytes = writer
            .into_inner()
            .map_err(|err| Error::new("Failed to flush the PDF buffer", err.into_error()))?;

        Ok(FinishedDocument { bytes, page_count })
    }

    fn layer(&self) -> Result<&PdfLayerReference, Error> {
        self.layer.as_ref().ok_or_else(|| {
            Error::new(
                "Drawing requires a page; call add_page first",
                ErrorKind::InvalidData,
            )
        })
    }

    fn paint_path(
        &self,
        points: Vec<(Point, bool)>,
        closed: bool,
        paint: Paint,
    ) -> Result<(), Error> {
        let layer = self.layer()?;
        if paint.fills() {
            layer.set_fill_color(pdf_color(self.state.fill_color));
        }
        if paint.strokes() {
            layer.set_outline_color(pdf_color(self.state.draw_color));
        }
        layer.add_shape(Line {
            points,
            is_closed: closed,
            has_fill: paint.fills(),
            has_stroke: paint.strokes(),
            is_clipping_path: false,
        });
        Ok(())
    }

    fn draw_text(&self, x: f64, baseline: f64, text: &str) -> Result<(), Error> {
        let layer = self.layer()?;
        let font = match self.state.weight {
            FontWeight::Regular => &self.fonts.regular,
            FontWeight::Bold => &self.fonts.bold,
        };
        // PDF text is painted with the fill color.
        layer.set_fill_color(pdf_color(self.state.text_color));
        layer.use_text(
            text,
            f64::from(self.state.font_size),
            printpdf::Mm(x),
            printpdf::Mm(pdf_y(baseline)),
            font,
        );
        Ok(())
    }

    fn render_template(&mut self, part: TemplatePart) -> Result<(), Error> {
        let Some(template) = self.template.take() else {
            return Ok(());
        };

        let saved = self.state;
        self.in_template = true;
        let result = match part {
            TemplatePart::Header => template.header(self),
            TemplatePart::Footer => template.footer(self),
        };
        self.in_template = false;
        self.state = saved;
        self.template = Some(template);
        result
    }
}

fn page_break_trigger() -> f64 {
    PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM
}

fn mm_to_f64(value: genpdf::Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts a top-left based y coordinate into PDF user space.
fn pdf_y(y: f64) -> f64 {
    PAGE_HEIGHT_MM - y
}

fn pdf_point(x: f64, y: f64) -> Point {
    Point::new(printpdf::Mm(x), printpdf::Mm(pdf_y(y)))
}

fn pdf_color(color: Color) -> printpdf::Color {
    fn unit(value: u8) -> f64 {
        f64::from(value) / 255.0
    }

    match color {
        Color::Rgb(r, g, b) => {
            printpdf::Color::Rgb(printpdf::Rgb::new(unit(r), unit(g), unit(b), None))
        }
        Color::Cmyk(c, m, y, k) => printpdf::Color::Cmyk(printpdf::Cmyk::new(
            unit(c),
            unit(m),
            unit(y),
            unit(k),
            None,
        )),
        Color::Greyscale(value) => {
            printpdf::Color::Greyscale(printpdf::Greyscale::new(unit(value), None))
        }
    }
}

/// Horizontal start of `text_width` wide text inside a cell.
fn aligned_text_x(x: f64, width: f64, text_width: f64, alignment: Alignment) -> f64 {
    match alignment {
        Alignment::Left => x + CELL_MARGIN_MM,
        Alignment::Center => x + (width - text_width) / 2.0,
        Alignment::Right => x + width - CELL_MARGIN_MM - text_width,
    }
}

/// Baseline for text vertically centred in a cell starting at `y`.
fn baseline_y(y: f64, height: f64, font_size: u8) -> f64 {
    y + height / 2.0 + 0.3 * f64::from(font_size) * MM_PER_PT
}

/// Path points of an ellipse made of four cubic Bézier segments.
///
/// The flag marks points that are followed by a control handle, the convention `printpdf`
/// uses to tell curves from straight segments.
fn ellipse_points(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<(f64, f64, bool)> {
    let (kx, ky) = (rx * BEZIER_KAPPA, ry * BEZIER_KAPPA);
    vec![
        (cx + rx, cy, true),
        (cx + rx, cy + ky, true),
        (cx + kx, cy + ry, false),
        (cx, cy + ry, true),
        (cx - kx, cy + ry, true),
        (cx - rx, cy + ky, false),
        (cx - rx, cy, true),
        (cx - rx, cy - ky, true),
        (cx - kx, cy - ry, false),
        (cx, cy - ry, true),
        (cx + kx, cy - ry, true),
        (cx + rx, cy - ky, false),
        (cx + rx, cy, false),
    ]
}

/// Greedily wraps `text` so that every line measures at most `max_width`.
///
/// Explicit newlines start a new line; words wider than `max_width` are broken between
/// characters.
pub fn wrap_text<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{} {}", current, word)
            };
            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_owned();
                continue;
            }

            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if measure(&next) > max_width && !current.is_empty() {
                    lines.push(std::mem::replace(&mut current, ch.to_string()));
                } else {
                    current = next;
                }
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_count(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10.0, char_count);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn breaks_words_longer_than_a_line() {
        let lines = wrap_text("ab SIGNALWIRE_PROJECT_ID", 8.0, char_count);
        assert_eq!(lines, vec!["ab", "SIGNALWI", "RE_PROJE", "CT_ID"]);
    }

    #[test]
    fn explicit_newlines_start_new_lines() {
        let lines = wrap_text("first\nsecond line", 40.0, char_count);
        assert_eq!(lines, vec!["first", "second line"]);
    }

    #[test]
    fn empty_text_yields_no_lines() {
        assert!(wrap_text("   ", 10.0, char_count).is_empty());
    }

    #[test]
    fn alignment_respects_cell_margin() {
        assert_eq!(aligned_text_x(10.0, 40.0, 20.0, Alignment::Left), 11.0);
        assert_eq!(aligned_text_x(10.0, 40.0, 20.0, Alignment::Center), 20.0);
        assert_eq!(aligned_text_x(10.0, 40.0, 20.0, Alignment::Right), 29.0);
    }

    #[test]
    fn baseline_sits_below_cell_centre() {
        let baseline = baseline_y(20.0, 10.0, 10);
        assert!(baseline > 25.0);
        assert!((baseline - (25.0 + 3.0 * MM_PER_PT)).abs() < 1e-9);
    }

    #[test]
    fn y_axis_is_flipped() {
        assert_eq!(pdf_y(0.0), PAGE_HEIGHT_MM);
        assert_eq!(pdf_y(PAGE_HEIGHT_MM), 0.0);
    }

    #[test]
    fn ellipse_path_is_closed_and_bounded() {
        let points = ellipse_points(50.0, 40.0, 3.5, 2.0);
        assert_eq!(points.len(), 13);
        let first = points[0];
        let last = points[points.len() - 1];
        assert_eq!((first.0, first.1), (last.0, last.1));
        assert!(points.iter().all(|p| (46.5..=53.5).contains(&p.0)));
        assert!(points.iter().all(|p| (38.0..=42.0).contains(&p.1)));
    }

    #[test]
    fn rgb_colors_are_normalised() {
        match pdf_color(Color::Rgb(255, 0, 51)) {
            printpdf::Color::Rgb(rgb) => {
                assert_eq!(rgb.r, 1.0);
                assert_eq!(rgb.g, 0.0);
                assert!((rgb.b - 0.2).abs() < 1e-9);
            }
            _ => panic!("expected an RGB color"),
        }
    }

    fn test_canvas() -> Option<Canvas> {
        if !crate::fonts::default_fonts_available() {
            eprintln!("Skipping canvas test: no report fonts found.");
            return None;
        }
        let fonts = crate::fonts::load_font_pair(None).expect("load fonts");
        Some(Canvas::new("Canvas test", &fonts).expect("create canvas"))
    }

    #[test]
    fn drawing_before_the_first_page_is_an_error() {
        let Some(mut canvas) = test_canvas() else {
            return;
        };
        assert!(canvas.cell(Cell::new(20.0, 7.0, "early")).is_err());
        assert!(canvas.finish().is_err());
    }

    #[test]
    fn cells_break_pages_at_the_bottom_margin() {
        let Some(mut canvas) = test_canvas() else {
            return;
        };
        canvas.add_page().expect("first page");

        for _ in 0..100 {
            canvas
                .cell(Cell::new(0.0, 7.0, "row").newline())
                .expect("draw row");
        }

        // 38 rows of 7 mm fit between the top margin and the break trigger.
        assert_eq!(canvas.page_no(), 3);
        assert!((canvas.y() - (MARGIN_MM + 24.0 * 7.0)).abs() < 1e-6);

        let finished = canvas.finish().expect("serialize");
        assert_eq!(finished.page_count, 3);
        assert!(finished.bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn page_break_keeps_the_horizontal_position() {
        let Some(mut canvas) = test_canvas() else {
            return;
        };
        canvas.add_page().expect("first page");

        canvas.set_xy(50.0, page_break_trigger() - 3.0);
        canvas.cell(Cell::new(30.0, 7.0, "moved")).expect("draw cell");

        assert_eq!(canvas.page_no(), 2);
        assert!((canvas.x() - 80.0).abs() < 1e-6);
        assert!((canvas.y() - MARGIN_MM).abs() < 1e-6);
    }

    #[test]
    fn ensure_space_only_breaks_when_needed() {
        let Some(mut canvas) = test_canvas() else {
            return;
        };
        canvas.add_page().expect("first page");

        canvas.set_y(page_break_trigger() - 40.0);
        assert!(!canvas.ensure_space(40.0).expect("fits"));
        assert_eq!(canvas.page_no(), 1);
        assert!(canvas.ensure_space(40.5).expect("breaks"));
        assert_eq!(canvas.page_no(), 2);
    }

    #[test]
    fn paint_modes() {
        assert!(Paint::Fill.fills() && !Paint::Fill.strokes());
        assert!(!Paint::Stroke.fills() && Paint::Stroke.strokes());
        assert!(Paint::FillStroke.fills() && Paint::FillStroke.strokes());
    }
}
