//! Page layout of the credentials request.
//!
//! [`render_request`] draws every section of a [`CredentialsRequest`] in order.  Geometry is
//! fixed: positions and sizes are millimetres on an A4 page, font sizes are points.

use genpdf::error::Error;
use genpdf::style::Color;
use genpdf::Alignment;
use log::debug;

use crate::canvas::{
    Canvas, Cell, FontWeight, Paint, PageTemplate, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::model::{
    looks_technical, Brand, CredentialCard, CredentialsRequest, Phase, SecurityNotice, ServiceTable,
};
use crate::palette::{self, zebra};

const CONTENT_WIDTH_MM: f64 = 190.0;
const CARD_HEADER_HEIGHT_MM: f64 = 12.0;
const CARD_ROW_HEIGHT_MM: f64 = 7.0;
const CARD_GAP_MM: f64 = 5.0;
const CARD_LABEL_WIDTH_MM: f64 = 40.0;
const CARD_TAG_RIGHT_EDGE_MM: f64 = 190.0;
const TABLE_ROW_HEIGHT_MM: f64 = 7.0;
const TABLE_SERVICE_WIDTH_MM: f64 = 50.0;
const TABLE_CREDENTIALS_WIDTH_MM: f64 = 80.0;
const PHASE_START_X_MM: f64 = 15.0;
const PHASE_STEP_MM: f64 = 63.0;
const PHASE_PANEL_WIDTH_MM: f64 = 58.0;
const PHASE_PANEL_HEIGHT_MM: f64 = 30.0;

/// A major section and the page it starts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMark {
    pub title: String,
    /// 1-based page number.
    pub page: usize,
}

/// Header band and footer line repeated on each page.
struct PageChrome {
    brand: Brand,
    date: String,
    contact_line: String,
}

impl PageChrome {
    fn new(request: &CredentialsRequest) -> Self {
        Self {
            brand: request.brand().clone(),
            date: request.date().to_owned(),
            contact_line: request.contact_line().to_owned(),
        }
    }
}

impl PageTemplate for PageChrome {
    fn header(&self, canvas: &mut Canvas) -> Result<(), Error> {
        canvas.set_fill_color(palette::CHARCOAL);
        canvas.rect(0.0, 0.0, PAGE_WIDTH_MM, 20.0, Paint::Fill)?;

        canvas.set_fill_color(palette::BRAND_BLUE);
        canvas.rect(10.0, 5.0, 10.0, 10.0, Paint::Fill)?;
        canvas.set_text_color(palette::WHITE);
        canvas.set_font(FontWeight::Bold, 8);
        canvas.set_xy(12.0, 8.0);
        canvas.cell(Cell::new(6.0, 5.0, &self.brand.initials).align(Alignment::Center))?;

        canvas.set_xy(22.0, 7.0);
        canvas.set_font(FontWeight::Bold, 10);
        canvas.cell(Cell::new(50.0, 6.0, &self.brand.name))?;

        canvas.set_xy(160.0, 7.0);
        canvas.set_text_color(palette::SLATE);
        canvas.set_font(FontWeight::Regular, 8);
        canvas.cell(Cell::new(40.0, 6.0, &self.date).align(Alignment::Right))?;

        canvas.ln(20.0);
        Ok(())
    }

    fn footer(&self, canvas: &mut Canvas) -> Result<(), Error> {
        let y = PAGE_HEIGHT_MM - 15.0;
        canvas.set_font(FontWeight::Regular, 8);
        canvas.set_text_color(palette::SLATE);

        canvas.set_y(y);
        canvas.cell(Cell::new(0.0, 10.0, &self.contact_line))?;
        canvas.set_y(y);
        let page_label = format!("Page {}", canvas.page_no());
        canvas.cell(Cell::new(0.0, 10.0, &page_label).align(Alignment::Right))
    }
}

struct Renderer<'a> {
    canvas: &'a mut Canvas,
    sections: Vec<SectionMark>,
}

impl<'a> Renderer<'a> {
    fn mark(&mut self, title: &str) {
        let page = self.canvas.page_no();
        debug!("Section '{}' starts on page {}", title, page);
        self.sections.push(SectionMark {
            title: title.to_owned(),
            page,
        });
    }

    fn title_block(&mut self, request: &CredentialsRequest) -> Result<(), Error> {
        let canvas = &mut *self.canvas;
        canvas.set_font(FontWeight::Bold, 18);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.cell(Cell::new(0.0, 10.0, request.title()).newline())?;
        canvas.set_font(FontWeight::Regular, 10);
        canvas.set_text_color(palette::SLATE);
        canvas.cell(Cell::new(0.0, 6.0, request.subtitle()).newline())?;
        canvas.ln(5.0);

        canvas.set_draw_color(palette::BORDER);
        let y = canvas.y();
        canvas.line(MARGIN_MM, y, MARGIN_MM + CONTENT_WIDTH_MM, y)?;
        canvas.ln(5.0);
        Ok(())
    }

    fn overview(&mut self, text: &str) -> Result<(), Error> {
        self.mark("Overview");
        let canvas = &mut *self.canvas;
        canvas.set_fill_color(palette::INFO_BACKGROUND);
        canvas.set_draw_color(palette::BRAND_BLUE);
        let y = canvas.y();
        canvas.rect(MARGIN_MM, y, CONTENT_WIDTH_MM, 25.0, Paint::FillStroke)?;

        canvas.set_xy(15.0, y + 3.0);
        canvas.set_font(FontWeight::Bold, 10);
        canvas.set_text_color(palette::BRAND_BLUE);
        canvas.cell(Cell::new(0.0, 5.0, "Overview").newline())?;

        canvas.set_xy(15.0, y + 9.0);
        canvas.set_font(FontWeight::Regular, 8);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.multi_cell(180.0, 4.0, text)?;
        canvas.ln(8.0);
        Ok(())
    }

    /// Colored bullet followed by a bold heading on the same line.
    fn bulleted_heading(&mut self, bullet: Color, title: &str, height: f64) -> Result<(), Error> {
        let canvas = &mut *self.canvas;
        let y = canvas.y();
        canvas.set_fill_color(bullet);
        canvas.ellipse(MARGIN_MM, y + 1.0, 3.0, 3.0)?;
        canvas.set_xy(15.0, y);
        canvas.set_font(FontWeight::Bold, 12);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.cell(Cell::new(0.0, height, title).newline())
    }

    fn critical(&mut self, request: &CredentialsRequest) -> Result<(), Error> {
        let critical = request.critical();
        self.canvas.ensure_space(16.0)?;
        self.mark(&critical.title);
        self.bulleted_heading(palette::CRITICAL_RED, &critical.title, 6.0)?;

        let canvas = &mut *self.canvas;
        canvas.set_font(FontWeight::Regular, 9);
        canvas.set_text_color(palette::SLATE);
        canvas.cell(Cell::new(0.0, 5.0, &critical.lead).newline())?;
        canvas.ln(5.0);

        for card in &critical.cards {
            self.credential_card(card)?;
        }
        Ok(())
    }

    fn credential_card(&mut self, card: &CredentialCard) -> Result<(), Error> {
        let canvas = &mut *self.canvas;
        let height = CARD_HEADER_HEIGHT_MM + CARD_ROW_HEIGHT_MM * card.rows.len() as f64;
        canvas.ensure_space(height)?;

        let y = canvas.y();
        canvas.set_fill_color(palette::BRAND_BLUE);
        canvas.set_text_color(palette::WHITE);
        canvas.set_font(FontWeight::Bold, 9);
        canvas.ellipse(12.0, y + 2.0, 7.0, 7.0)?;
        canvas.set_xy(12.0, y + 3.0);
        let number = card.number.to_string();
        canvas.cell(Cell::new(7.0, 5.0, &number).align(Alignment::Center))?;

        canvas.set_xy(22.0, y + 2.0);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.set_font(FontWeight::Bold, 11);
        canvas.cell(Cell::new(60.0, 7.0, &card.name))?;

        canvas.set_fill_color(palette::CRITICAL_BACKGROUND);
        canvas.set_text_color(palette::CRITICAL_RED);
        canvas.set_font(FontWeight::Regular, 8);
        let tag_width = canvas.string_width(&card.tag) + 6.0;
        canvas.set_xy(CARD_TAG_RIGHT_EDGE_MM - tag_width, y + 3.0);
        canvas.cell(Cell::new(tag_width, 5.0, &card.tag).filled())?;

        canvas.ln(CARD_HEADER_HEIGHT_MM);

        for (index, row) in card.rows.iter().enumerate() {
            canvas.set_fill_color(zebra(index, palette::TINT, palette::WHITE));
            canvas.set_text_color(palette::SLATE);
            canvas.set_font(FontWeight::Regular, 8);
            canvas.cell(Cell::new(CARD_LABEL_WIDTH_MM, CARD_ROW_HEIGHT_MM, &row.label).filled())?;

            let value_color = if looks_technical(&row.value) {
                palette::BRAND_BLUE
            } else {
                palette::CHARCOAL
            };
            canvas.set_text_color(value_color);
            canvas.cell(
                Cell::new(0.0, CARD_ROW_HEIGHT_MM, &row.value)
                    .filled()
                    .newline(),
            )?;
        }

        canvas.ln(CARD_GAP_MM);
        Ok(())
    }

    fn service_table(&mut self, table: &ServiceTable) -> Result<(), Error> {
        let height = 10.0 + TABLE_ROW_HEIGHT_MM * (table.rows.len() + 1) as f64;
        self.canvas.ensure_space(height)?;
        self.mark(&table.title);
        self.bulleted_heading(table.accent, &table.title, 8.0)?;

        let canvas = &mut *self.canvas;
        canvas.ln(2.0);

        canvas.set_fill_color(palette::TINT);
        canvas.set_font(FontWeight::Bold, 8);
        canvas.set_text_color(palette::SLATE);
        canvas.cell(Cell::new(TABLE_SERVICE_WIDTH_MM, TABLE_ROW_HEIGHT_MM, "Service").filled())?;
        canvas.cell(
            Cell::new(
                TABLE_CREDENTIALS_WIDTH_MM,
                TABLE_ROW_HEIGHT_MM,
                "Credentials Needed",
            )
            .filled(),
        )?;
        canvas.cell(
            Cell::new(0.0, TABLE_ROW_HEIGHT_MM, "Purpose")
                .filled()
                .newline(),
        )?;

        for (index, row) in table.rows.iter().enumerate() {
            canvas.set_fill_color(zebra(index, palette::WHITE, palette::TINT));
            canvas.set_font(FontWeight::Bold, 8);
            canvas.set_text_color(palette::CHARCOAL);
            canvas.cell(
                Cell::new(TABLE_SERVICE_WIDTH_MM, TABLE_ROW_HEIGHT_MM, &row.service).filled(),
            )?;
            canvas.set_font(FontWeight::Regular, 8);
            canvas.set_text_color(palette::BRAND_BLUE);
            canvas.cell(
                Cell::new(TABLE_CREDENTIALS_WIDTH_MM, TABLE_ROW_HEIGHT_MM, &row.credentials)
                    .filled(),
            )?;
            canvas.set_text_color(palette::SLATE);
            canvas.cell(
                Cell::new(0.0, TABLE_ROW_HEIGHT_MM, &row.purpose)
                    .filled()
                    .newline(),
            )?;
        }

        canvas.ln(8.0);
        Ok(())
    }

    fn security_notice(&mut self, notice: &SecurityNotice) -> Result<(), Error> {
        let height = 16.0 + 4.0 * notice.channels.len() as f64;
        self.canvas.ensure_space(height)?;
        self.mark(&notice.title);

        let canvas = &mut *self.canvas;
        canvas.set_fill_color(palette::CRITICAL_BACKGROUND);
        canvas.set_draw_color(palette::CRITICAL_BORDER);
        let y = canvas.y();
        canvas.rect(MARGIN_MM, y, CONTENT_WIDTH_MM, height, Paint::FillStroke)?;

        canvas.set_xy(15.0, y + 3.0);
        canvas.set_font(FontWeight::Bold, 10);
        canvas.set_text_color(palette::CRITICAL_RED);
        canvas.cell(Cell::new(0.0, 5.0, &notice.title).newline())?;

        canvas.set_xy(15.0, y + 9.0);
        canvas.set_font(FontWeight::Regular, 8);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.cell(Cell::new(0.0, 4.0, &notice.intro).newline())?;

        canvas.set_text_color(palette::SLATE);
        for (index, channel) in notice.channels.iter().enumerate() {
            canvas.set_xy(20.0, y + 14.0 + 4.0 * index as f64);
            canvas.cell(Cell::new(0.0, 4.0, channel).newline())?;
        }

        canvas.ln(15.0);
        Ok(())
    }

    fn priority_plan(&mut self, request: &CredentialsRequest) -> Result<(), Error> {
        let plan = request.priority();
        self.canvas.ensure_space(16.0 + PHASE_PANEL_HEIGHT_MM)?;
        self.mark(&plan.title);

        let canvas = &mut *self.canvas;
        canvas.set_font(FontWeight::Bold, 12);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.cell(Cell::new(0.0, 8.0, &plan.title).newline())?;
        canvas.ln(2.0);
        canvas.set_font(FontWeight::Regular, 9);
        canvas.set_text_color(palette::SLATE);
        canvas.cell(Cell::new(0.0, 5.0, &plan.lead).newline())?;
        canvas.ln(3.0);

        let top = canvas.y();
        for (index, phase) in plan.phases.iter().enumerate() {
            let x = PHASE_START_X_MM + PHASE_STEP_MM * index as f64;
            self.phase_panel(phase, x, top)?;
        }

        self.canvas.set_y(top + PHASE_PANEL_HEIGHT_MM);
        Ok(())
    }

    fn phase_panel(&mut self, phase: &Phase, x: f64, top: f64) -> Result<(), Error> {
        let canvas = &mut *self.canvas;
        canvas.set_fill_color(palette::TINT);
        canvas.rect(
            x - 5.0,
            top,
            PHASE_PANEL_WIDTH_MM,
            PHASE_PANEL_HEIGHT_MM,
            Paint::Fill,
        )?;

        canvas.set_fill_color(palette::BRAND_BLUE);
        canvas.set_text_color(palette::WHITE);
        canvas.set_font(FontWeight::Bold, 7);
        canvas.set_xy(x, top + 3.0);
        canvas.cell(Cell::new(20.0, 4.0, &phase.label).filled())?;

        canvas.set_xy(x + 22.0, top + 2.0);
        canvas.set_text_color(palette::CHARCOAL);
        canvas.set_font(FontWeight::Bold, 8);
        canvas.cell(Cell::new(30.0, 5.0, &phase.name))?;

        canvas.set_font(FontWeight::Regular, 7);
        canvas.set_text_color(palette::SLATE);
        for (index, item) in phase.items.iter().enumerate() {
            canvas.set_xy(x, top + 8.0 + 4.0 * index as f64);
            canvas.cell(Cell::new(50.0, 4.0, item))?;
        }
        Ok(())
    }
}

/// Draws the whole request onto `canvas` and returns where each major section begins.
///
/// The canvas must not have any pages yet; the page header and footer are installed here.
pub fn render_request(
    canvas: &mut Canvas,
    request: &CredentialsRequest,
) -> Result<Vec<SectionMark>, Error> {
    canvas.set_template(Box::new(PageChrome::new(request)));
    canvas.add_page()?;

    let mut renderer = Renderer {
        canvas,
        sections: Vec::new(),
    };

    renderer.title_block(request)?;
    renderer.overview(request.overview())?;
    renderer.critical(request)?;

    renderer.canvas.add_page()?;
    renderer.service_table(request.analytics())?;
    renderer.service_table(request.communications())?;
    renderer.security_notice(request.security())?;
    renderer.priority_plan(request)?;

    Ok(renderer.sections)
}
