use credentials_request::fonts;
use credentials_request::model::CredentialsRequest;
use credentials_request::{RenderedReport, ReportBuilder};
use sha2::{Digest, Sha256};

fn render_default_report() -> Option<RenderedReport> {
    if !fonts::default_fonts_available() {
        return None;
    }

    Some(ReportBuilder::new().render().expect("render credentials report"))
}

fn skip(test: &str) {
    eprintln!(
        "Skipping {}: no report fonts found. Set CREDENTIALS_PDF_FONTS_DIR or copy assets/fonts next to the binary.",
        test
    );
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    Sha256::digest(&normalized).into()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[test]
fn renders_well_formed_pdf() {
    let Some(report) = render_default_report() else {
        skip("renders_well_formed_pdf");
        return;
    };

    assert!(report.bytes.starts_with(b"%PDF-"), "missing PDF header");
    assert!(contains(&report.bytes, b"%%EOF"), "missing PDF trailer");
}

#[test]
fn remaining_sections_start_on_a_new_page() {
    let Some(report) = render_default_report() else {
        skip("remaining_sections_start_on_a_new_page");
        return;
    };

    assert!(report.page_count >= 2, "expected at least two pages");

    let titles: Vec<_> = report
        .sections
        .iter()
        .map(|section| section.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Overview",
            "Critical - Required for MVP Launch",
            "Analytics & Tracking",
            "Communications",
            "How to Send Credentials Securely",
            "Recommended Priority Order",
        ]
    );

    assert_eq!(report.sections[0].page, 1);
    assert!(report.sections[2].page > report.sections[1].page);
    assert!(report
        .sections
        .windows(2)
        .all(|pair| pair[0].page <= pair[1].page));
    assert!(report
        .sections
        .iter()
        .all(|section| section.page <= report.page_count));
}

#[test]
fn header_date_reaches_the_rendered_document() {
    let Some(default_report) = render_default_report() else {
        skip("header_date_reaches_the_rendered_document");
        return;
    };

    let builder = ReportBuilder::new().with_date("March 3, 2026");
    assert_eq!(builder.content().date(), "March 3, 2026");
    assert_eq!(
        builder.content().critical(),
        CredentialsRequest::default().critical()
    );

    let dated_report = builder.render().expect("render with custom date");
    assert_eq!(dated_report.page_count, default_report.page_count);
    assert_ne!(
        normalized_hash(&dated_report.bytes),
        normalized_hash(&default_report.bytes),
        "the header date must change the rendered pages"
    );
}

#[test]
fn custom_content_is_rendered() {
    if !fonts::default_fonts_available() {
        skip("custom_content_is_rendered");
        return;
    }

    let default_content = CredentialsRequest::default();
    let mut critical = default_content.critical().clone();
    critical.cards.truncate(1);
    let content = default_content
        .with_subtitle("Phase 2 follow-up")
        .with_critical(critical);

    let report = ReportBuilder::new()
        .with_content(content)
        .render()
        .expect("render custom content");
    let default_report = ReportBuilder::new().render().expect("render default content");

    assert_eq!(report.sections.len(), default_report.sections.len());
    assert_ne!(
        normalized_hash(&report.bytes),
        normalized_hash(&default_report.bytes)
    );
}

#[test]
fn write_to_creates_parent_directories() {
    let Some(report) = render_default_report() else {
        skip("write_to_creates_parent_directories");
        return;
    };

    let root = std::env::temp_dir().join(format!("credentials-pdf-test-{}", std::process::id()));
    let path = root.join("docs/client-credentials-request.pdf");
    report.write_to(&path).expect("write report");

    let written = std::fs::read(&path).expect("read written report");
    assert_eq!(written, report.bytes);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn rendering_is_deterministic() {
    let (Some(report_a), Some(report_b)) = (render_default_report(), render_default_report())
    else {
        skip("rendering_is_deterministic");
        return;
    };

    assert_eq!(report_a.page_count, report_b.page_count);
    assert_eq!(
        report_a.bytes.len(),
        report_b.bytes.len(),
        "PDF sizes should match"
    );
    assert_eq!(
        normalized_hash(&report_a.bytes),
        normalized_hash(&report_b.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn missing_font_directory_falls_back_or_reports_font_error() {
    let result = ReportBuilder::new()
        .with_font_directory("/__credentials_pdf_missing_fonts__")
        .render();

    match result {
        Ok(report) => assert!(!report.bytes.is_empty()),
        Err(credentials_request::ReportError::FontLoad(err)) => {
            assert!(err.to_string().contains("fallback"), "unexpected message: {err}");
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[cfg(feature = "bookmarks")]
#[test]
fn bookmarks_add_an_outline_to_the_catalog() {
    if !fonts::default_fonts_available() {
        skip("bookmarks_add_an_outline_to_the_catalog");
        return;
    }

    let report = ReportBuilder::new()
        .render_with_bookmarks()
        .expect("render with bookmarks");
    let document = lopdf::Document::load_mem(&report.bytes).expect("parse bookmarked output");
    let catalog = document.catalog().expect("catalog present");
    assert!(catalog.has(b"Outlines"), "catalog should reference an outline");
}
