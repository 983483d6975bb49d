//! Font discovery and loading for the credentials report.
//!
//! The report only needs two faces, a regular and a bold one. They are searched for in a fixed
//! order: an explicit directory, the `CREDENTIALS_PDF_FONTS_DIR` environment variable, the
//! bundled `assets/fonts` directories, the Windows Arial family and finally a couple of common
//! Linux system families.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Inter";

/// Environment variable pointing at a directory with the bundled font files.
pub const FONTS_DIR_ENV: &str = "CREDENTIALS_PDF_FONTS_DIR";

/// Environment variable overriding the Windows font directory used for the Arial fallback.
pub const WINDOWS_FONTS_DIR_ENV: &str = "CREDENTIALS_PDF_WINDOWS_FONTS_DIR";

#[derive(Clone, Copy, Debug)]
struct FaceFiles {
    regular: &'static str,
    bold: &'static str,
}

const BUNDLED_FILES: FaceFiles = FaceFiles {
    regular: "Inter-Regular.ttf",
    bold: "Inter-Bold.ttf",
};

const WINDOWS_FALLBACK_FAMILY_NAME: &str = "Arial";

const WINDOWS_FILES: FaceFiles = FaceFiles {
    regular: "arial.ttf",
    bold: "arialbd.ttf",
};

struct SystemFamily {
    name: &'static str,
    directory: &'static str,
    files: FaceFiles,
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "DejaVu Sans",
        directory: "/usr/share/fonts/truetype/dejavu",
        files: FaceFiles {
            regular: "DejaVuSans.ttf",
            bold: "DejaVuSans-Bold.ttf",
        },
    },
    SystemFamily {
        name: "Liberation Sans",
        directory: "/usr/share/fonts/truetype/liberation",
        files: FaceFiles {
            regular: "LiberationSans-Regular.ttf",
            bold: "LiberationSans-Bold.ttf",
        },
    },
];

/// A single font face read from disk.
#[derive(Clone, Debug)]
pub struct FontFace {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FontFace {
    /// Returns the file the face was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw TrueType data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// The regular and bold faces used by the report.
#[derive(Clone, Debug)]
pub struct FontPair {
    family_name: String,
    regular: FontFace,
    bold: FontFace,
}

impl FontPair {
    /// Returns the name of the family that was resolved.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Returns the regular face.
    pub fn regular(&self) -> &FontFace {
        &self.regular
    }

    /// Returns the bold face.
    pub fn bold(&self) -> &FontFace {
        &self.bold
    }

    /// Builds a `genpdf` font family for text measurement.
    ///
    /// Italic styles are never used by the report, so they reuse the upright faces.
    pub fn metrics_family(&self) -> Result<FontFamily<FontData>, Error> {
        let regular = FontData::new(self.regular.bytes.clone(), None)?;
        let bold = FontData::new(self.bold.bytes.clone(), None)?;
        Ok(FontFamily {
            italic: regular.clone(),
            bold_italic: bold.clone(),
            regular,
            bold,
        })
    }
}

#[derive(Debug)]
struct FontLocation {
    family: String,
    directory: PathBuf,
    files: FaceFiles,
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        push_unique(&mut candidates, path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(&mut candidates, bundled_fonts_source_dir());
    candidates
}

/// Directory holding the bundled fonts inside the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn missing_font_files(path: &Path, files: FaceFiles) -> Vec<PathBuf> {
    [files.regular, files.bold]
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn not_found(message: String, detail: &str) -> Error {
    Error::new(message, io::Error::new(io::ErrorKind::NotFound, detail.to_owned()))
}

fn resolve_bundled_location(explicit: Option<&Path>) -> Result<FontLocation, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates(explicit) {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate, BUNDLED_FILES);

        if exists && missing.is_empty() {
            return Ok(FontLocation {
                family: DEFAULT_FONT_FAMILY_NAME.to_owned(),
                directory: candidate,
                files: BUNDLED_FILES,
            });
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(not_found(
        format!(
            "Unable to locate bundled font directory. Checked: {}. See assets/fonts/README.md or set {}.",
            summary, FONTS_DIR_ENV
        ),
        "bundled fonts directory not found",
    ))
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path(WINDOWS_FONTS_DIR_ENV) {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn resolve_fallback_location() -> Result<FontLocation, Error> {
    let mut attempts = Vec::new();

    match windows_font_directory() {
        Some(directory) if missing_font_files(&directory, WINDOWS_FILES).is_empty() => {
            return Ok(FontLocation {
                family: WINDOWS_FALLBACK_FAMILY_NAME.to_owned(),
                directory,
                files: WINDOWS_FILES,
            });
        }
        Some(directory) => attempts.push(format!(
            "{} ({} files missing)",
            directory.display(),
            WINDOWS_FALLBACK_FAMILY_NAME
        )),
        None => attempts.push("Windows font directory not found".to_owned()),
    }

    for family in SYSTEM_FAMILIES {
        let directory = PathBuf::from(family.directory);
        if missing_font_files(&directory, family.files).is_empty() {
            return Ok(FontLocation {
                family: family.name.to_owned(),
                directory,
                files: family.files,
            });
        }
        attempts.push(format!("{} ({})", directory.display(), family.name));
    }

    Err(not_found(
        format!("No fallback font family available. Checked: {}", attempts.join(", ")),
        "fallback fonts not found",
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

fn locate_fonts(explicit: Option<&Path>) -> Result<FontLocation, Error> {
    match resolve_bundled_location(explicit) {
        Ok(location) => Ok(location),
        Err(err) if fonts_missing(&err) => match resolve_fallback_location() {
            Ok(fallback) => {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to '{}' from {}.",
                    err,
                    fallback.family,
                    fallback.directory.display()
                );
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); fallback failed: {}",
                    err, fallback_err
                );
                Err(not_found(
                    format!(
                        "Bundled fonts unavailable and fallback failed: {}",
                        fallback_err
                    ),
                    "report fonts are not available",
                ))
            }
        },
        Err(err) => Err(err),
    }
}

fn load_face(directory: &Path, file: &str, style: &str) -> Result<FontFace, Error> {
    let path = directory.join(file);
    let bytes = fs::read(&path).map_err(|err| {
        Error::new(
            format!("Failed to read {} font at {}", style, path.display()),
            err,
        )
    })?;
    Ok(FontFace { path, bytes })
}

/// Locates and reads the regular and bold faces.
///
/// `explicit` takes precedence over every other search location.
pub fn load_font_pair(explicit: Option<&Path>) -> Result<FontPair, Error> {
    let location = locate_fonts(explicit)?;
    debug!(
        "Loading font family '{}' from {}",
        location.family,
        location.directory.display()
    );

    Ok(FontPair {
        regular: load_face(&location.directory, location.files.regular, "regular")?,
        bold: load_face(&location.directory, location.files.bold, "bold")?,
        family_name: location.family,
    })
}

/// Indicates whether any usable font family can be found without an explicit directory.
pub fn default_fonts_available() -> bool {
    locate_fonts(None).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_reports_every_face() {
        let directory = Path::new("/__credentials_pdf_missing_fonts__");
        let missing = missing_font_files(directory, BUNDLED_FILES);
        assert_eq!(missing.len(), 2);
        assert!(missing[0].ends_with("Inter-Regular.ttf"));
        assert!(missing[1].ends_with("Inter-Bold.ttf"));
    }

    #[test]
    fn explicit_directory_is_searched_first() {
        let explicit = Path::new("/opt/report-fonts");
        let candidates = font_directory_candidates(Some(explicit));
        assert_eq!(candidates.first().map(PathBuf::as_path), Some(explicit));
        assert!(candidates.contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn candidates_are_unique() {
        let bundled = bundled_fonts_source_dir();
        let candidates = font_directory_candidates(Some(&bundled));
        let occurrences = candidates.iter().filter(|path| **path == bundled).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn missing_font_error_is_recognised() {
        let err = not_found("fonts missing".to_owned(), "not found");
        assert!(fonts_missing(&err));

        let other = Error::new("bad data", ErrorKind::InvalidData);
        assert!(!fonts_missing(&other));
    }
}
