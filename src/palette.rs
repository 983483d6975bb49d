//! Brand colors used throughout the report.

use genpdf::style::Color;

/// Header band, headings and body text.
pub const CHARCOAL: Color = Color::Rgb(30, 35, 41);
/// Logo, badges, links and technical values.
pub const BRAND_BLUE: Color = Color::Rgb(30, 108, 255);
/// Secondary text.
pub const SLATE: Color = Color::Rgb(107, 122, 148);
pub const WHITE: Color = Color::Rgb(255, 255, 255);
/// Dividers and card borders.
pub const BORDER: Color = Color::Rgb(232, 237, 245);
/// Zebra rows and phase panels.
pub const TINT: Color = Color::Rgb(247, 249, 252);
/// Overview box background.
pub const INFO_BACKGROUND: Color = Color::Rgb(239, 246, 255);
pub const CRITICAL_RED: Color = Color::Rgb(239, 68, 68);
/// Tag pills and the security box.
pub const CRITICAL_BACKGROUND: Color = Color::Rgb(254, 242, 242);
pub const CRITICAL_BORDER: Color = Color::Rgb(254, 202, 202);
pub const AMBER: Color = Color::Rgb(245, 158, 11);
pub const GREEN: Color = Color::Rgb(16, 185, 129);

/// Picks the background of a zebra-striped row.
///
/// Row `0` uses `first`, row `1` uses `second`, and so on.
pub fn zebra(index: usize, first: Color, second: Color) -> Color {
    if index % 2 == 0 {
        first
    } else {
        second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zebra_alternates_starting_with_first() {
        let fills: Vec<_> = (0..4).map(|index| zebra(index, TINT, WHITE)).collect();
        assert_eq!(fills, vec![TINT, WHITE, TINT, WHITE]);
    }
}
