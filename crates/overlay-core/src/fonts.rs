//! Mapping extracted font names onto the PDF standard 14 fonts
//!
//! Extractors report embedded names such as "BCDEEE+ArialMT" or
//! "TimesNewRomanPS-BoldMT". Those fonts are usually subset and cannot be
//! reused for new text, so replacement values are drawn with the closest
//! standard face, which every viewer provides without embedding.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StandardFont {
    #[default]
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Helvetica-Bold")]
    HelveticaBold,
    #[serde(rename = "Helvetica-Oblique")]
    HelveticaOblique,
    #[serde(rename = "Helvetica-BoldOblique")]
    HelveticaBoldOblique,
    #[serde(rename = "Times-Roman")]
    TimesRoman,
    #[serde(rename = "Times-Bold")]
    TimesBold,
    #[serde(rename = "Times-Italic")]
    TimesItalic,
    #[serde(rename = "Times-BoldItalic")]
    TimesBoldItalic,
    #[serde(rename = "Courier")]
    Courier,
    #[serde(rename = "Courier-Bold")]
    CourierBold,
    #[serde(rename = "Courier-Oblique")]
    CourierOblique,
    #[serde(rename = "Courier-BoldOblique")]
    CourierBoldOblique,
    #[serde(rename = "Symbol")]
    Symbol,
    #[serde(rename = "ZapfDingbats")]
    ZapfDingbats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Helvetica,
    Times,
    Courier,
}

impl StandardFont {
    /// PostScript name written as /BaseFont
    pub fn base_name(self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::TimesBold => "Times-Bold",
            StandardFont::TimesItalic => "Times-Italic",
            StandardFont::TimesBoldItalic => "Times-BoldItalic",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
            StandardFont::Symbol => "Symbol",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Name under which the font is registered in a page's /Font resources
    pub fn resource_name(self) -> String {
        format!("F{}", self as u8 + 1)
    }

    /// Symbolic fonts carry their own encoding
    pub fn uses_win_ansi(self) -> bool {
        !matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// Average advance width as a fraction of the font size.
    ///
    /// Rough values taken from the standard AFM metrics over mixed-case
    /// Latin text; good enough to flag overflow, not to lay out text.
    pub fn average_advance(self) -> f64 {
        match self {
            StandardFont::Helvetica | StandardFont::HelveticaOblique => 0.52,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => 0.57,
            StandardFont::TimesRoman | StandardFont::TimesItalic => 0.45,
            StandardFont::TimesBold | StandardFont::TimesBoldItalic => 0.49,
            StandardFont::Courier
            | StandardFont::CourierBold
            | StandardFont::CourierOblique
            | StandardFont::CourierBoldOblique => 0.6,
            StandardFont::Symbol => 0.55,
            StandardFont::ZapfDingbats => 0.75,
        }
    }

    /// Estimated rendered width of `text` at `size` points
    pub fn estimate_width(self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * self.average_advance() * size
    }

    /// Map an extracted font name to the closest standard font.
    ///
    /// Handles subset prefixes ("ABCDEF+"), PostScript style suffixes and
    /// CSS generic families. Unknown names fall back to Helvetica.
    pub fn from_font_name(name: &str) -> StandardFont {
        let base = strip_subset_prefix(name);
        let lower = base.to_lowercase();

        match lower.as_str() {
            "serif" => return StandardFont::TimesRoman,
            "sans-serif" | "cursive" | "fantasy" => return StandardFont::Helvetica,
            "monospace" => return StandardFont::Courier,
            _ => {}
        }

        if lower.contains("symbol") {
            return StandardFont::Symbol;
        }
        if lower.contains("zapf") || lower.contains("dingbat") {
            return StandardFont::ZapfDingbats;
        }

        let bold = lower.contains("bold")
            || lower.contains("black")
            || lower.contains("heavy")
            || lower.contains("semibold");
        let italic = lower.contains("italic") || lower.contains("oblique");

        Self::styled(family_of(&lower), bold, italic)
    }

    fn styled(family: Family, bold: bool, italic: bool) -> StandardFont {
        match family {
            Family::Times => match (bold, italic) {
                (true, true) => StandardFont::TimesBoldItalic,
                (true, false) => StandardFont::TimesBold,
                (false, true) => StandardFont::TimesItalic,
                (false, false) => StandardFont::TimesRoman,
            },
            Family::Helvetica => match (bold, italic) {
                (true, true) => StandardFont::HelveticaBoldOblique,
                (true, false) => StandardFont::HelveticaBold,
                (false, true) => StandardFont::HelveticaOblique,
                (false, false) => StandardFont::Helvetica,
            },
            Family::Courier => match (bold, italic) {
                (true, true) => StandardFont::CourierBoldOblique,
                (true, false) => StandardFont::CourierBold,
                (false, true) => StandardFont::CourierOblique,
                (false, false) => StandardFont::Courier,
            },
        }
    }
}

/// "BCDEEE+ArialMT" -> "ArialMT"
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => {
            rest
        }
        _ => name,
    }
}

fn family_of(lower: &str) -> Family {
    if lower.contains("times")
        || lower.contains("georgia")
        || lower.contains("garamond")
        || lower.contains("cambria")
        || (lower.contains("serif") && !lower.contains("sans"))
    {
        return Family::Times;
    }

    if lower.contains("courier")
        || lower.contains("mono")
        || lower.contains("consolas")
        || lower.contains("monaco")
    {
        return Family::Courier;
    }

    Family::Helvetica
}
