use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags::bitflags! {
    /// Font style flags. Bold and italic combine independently; the empty set
    /// is Regular.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct FontStyle: u8 {
        const REGULAR = 0;
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const BOLD_ITALIC = Self::BOLD.bits() | Self::ITALIC.bits();
    }
}

impl FontStyle {
    pub const fn is_bold(self) -> bool {
        self.contains(Self::BOLD)
    }

    pub const fn is_italic(self) -> bool {
        self.contains(Self::ITALIC)
    }

    pub const fn is_regular(self) -> bool {
        self.is_empty()
    }

    /// The canonical name: `Regular`, `Bold`, `Italic` or `BoldItalic`.
    pub const fn name(self) -> &'static str {
        match (self.is_bold(), self.is_italic()) {
            (false, false) => "Regular",
            (true, false) => "Bold",
            (false, true) => "Italic",
            (true, true) => "BoldItalic",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_lowercase().replace([' ', '-', '_'], "").as_str() {
            "regular" | "normal" => Ok(Self::REGULAR),
            "bold" => Ok(Self::BOLD),
            "italic" | "oblique" => Ok(Self::ITALIC),
            "bolditalic" | "italicbold" | "boldoblique" => Ok(Self::BOLD_ITALIC),
            _ => Err(format!("Invalid font style: '{}'", s)),
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for FontStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FontStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

/// A named font family, e.g. "Arial".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontFamily {
    pub name: String,
}

impl FontFamily {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A font as a page refers to it: family, point size and style.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalFont {
    pub family: FontFamily,
    pub size: f32,
    pub style: FontStyle,
}

impl LogicalFont {
    pub fn new(family: impl Into<String>, size: f32, style: FontStyle) -> Self {
        Self {
            family: FontFamily::new(family),
            size,
            style,
        }
    }

    pub fn name(&self) -> &str {
        &self.family.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_combine_independently() {
        let style = FontStyle::BOLD | FontStyle::ITALIC;
        assert_eq!(style, FontStyle::BOLD_ITALIC);
        assert!(style.is_bold() && style.is_italic());
        assert!(style.contains(FontStyle::ITALIC));
        assert!(!FontStyle::BOLD.contains(FontStyle::ITALIC));
        assert!(FontStyle::default().is_regular());
    }

    #[test]
    fn names_cover_every_combination() {
        assert_eq!(FontStyle::REGULAR.name(), "Regular");
        assert_eq!(FontStyle::BOLD.name(), "Bold");
        assert_eq!(FontStyle::ITALIC.name(), "Italic");
        assert_eq!(FontStyle::BOLD_ITALIC.name(), "BoldItalic");
    }

    #[test]
    fn raw_style_bits_keep_only_bold_and_italic() {
        assert_eq!(FontStyle::from_bits_truncate(0xFF), FontStyle::BOLD_ITALIC);
        assert_eq!(FontStyle::from_bits_truncate(4), FontStyle::REGULAR);
        assert_eq!(FontStyle::BOLD_ITALIC.bits(), 3);
    }

    #[test]
    fn parses_style_names() {
        assert_eq!(FontStyle::parse("bold").unwrap(), FontStyle::BOLD);
        assert_eq!(FontStyle::parse("Bold Italic").unwrap(), FontStyle::BOLD_ITALIC);
        assert_eq!(FontStyle::parse("normal").unwrap(), FontStyle::REGULAR);
        assert!(FontStyle::parse("heavy").is_err());
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&FontStyle::BOLD_ITALIC).unwrap();
        assert_eq!(json, "\"BoldItalic\"");
        let back: FontStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FontStyle::BOLD_ITALIC);
    }
}
