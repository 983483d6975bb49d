use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use credentials_request::{ReportBuilder, DEFAULT_OUTPUT_PATH};

/// Renders the client credentials & access request PDF.
///
/// Fonts are looked up in `--fonts-dir`, then `CREDENTIALS_PDF_FONTS_DIR`, then
/// `assets/fonts` next to the binary or in the library crate, and finally in
/// the Windows and common Linux system font directories.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Where to write the PDF.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Date printed in the page header.
    #[arg(long)]
    date: Option<String>,

    /// Directory containing `Inter-Regular.ttf` and `Inter-Bold.ttf`.
    #[arg(long, value_name = "DIR")]
    fonts_dir: Option<PathBuf>,

    /// Add a PDF outline with one entry per section.
    #[arg(long)]
    bookmarks: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut builder = ReportBuilder::new();
    if let Some(date) = cli.date {
        builder = builder.with_date(date);
    }
    if let Some(directory) = cli.fonts_dir {
        builder = builder.with_font_directory(directory);
    }

    let report = if cli.bookmarks {
        render_with_bookmarks(&builder)?
    } else {
        builder.render()?
    };
    report.write_to(&cli.output)?;

    println!(
        "PDF created: {} ({} bytes, {} pages)",
        cli.output.display(),
        report.bytes.len(),
        report.page_count
    );
    Ok(())
}

#[cfg(feature = "bookmarks")]
fn render_with_bookmarks(
    builder: &ReportBuilder,
) -> Result<credentials_request::RenderedReport, Box<dyn Error>> {
    Ok(builder.render_with_bookmarks()?)
}

#[cfg(not(feature = "bookmarks"))]
fn render_with_bookmarks(
    _builder: &ReportBuilder,
) -> Result<credentials_request::RenderedReport, Box<dyn Error>> {
    Err(
        "Enable the `bookmarks` feature to render bookmarked output:\n    \
         cargo run -p credentials-pdf --features bookmarks -- --bookmarks"
            .into(),
    )
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
