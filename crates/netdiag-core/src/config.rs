use crate::palette::{LinkPalette, Rgb};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
}

impl FontStyle {
    /// AWT-style bit value: plain `0`, bold `1`, italic `2`. Anything else is plain.
    pub fn from_bits(bits: i64) -> Self {
        match bits {
            1 => Self::Bold,
            2 => Self::Italic,
            _ => Self::Plain,
        }
    }

    /// Case-insensitive name; unknown names are plain.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            _ => Self::Plain,
        }
    }

    pub fn is_bold(self) -> bool {
        self == Self::Bold
    }

    /// SVG `font-weight` attribute value, if not the default.
    pub fn svg_weight(self) -> Option<&'static str> {
        self.is_bold().then_some("bold")
    }

    /// SVG `font-style` attribute value, if not the default.
    pub fn svg_style(self) -> Option<&'static str> {
        (self == Self::Italic).then_some("italic")
    }
}

impl<'de> Deserialize<'de> for FontStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Bits(i64),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(name) => Self::from_name(&name),
            Repr::Bits(bits) => Self::from_bits(bits),
        })
    }
}

/// Immutable style snapshot used for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    pub font_family: String,
    pub font_size: f64,
    pub font_color: String,
    pub font_style: FontStyle,
    pub background_color: String,
    pub border_color: String,
    pub node_color: String,
    pub link_palette: LinkPalette,
    pub title: Option<String>,
    pub show_title: bool,
    pub show_legend: bool,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 12.0,
            font_color: "#000000".to_string(),
            font_style: FontStyle::Plain,
            background_color: "#ffffff".to_string(),
            border_color: "#000000".to_string(),
            node_color: "#ffffff".to_string(),
            link_palette: LinkPalette::RedGreen,
            title: None,
            show_title: false,
            show_legend: true,
        }
    }
}

impl DocumentStyle {
    /// Style used for script input, which carries no config of its own.
    pub fn script_defaults() -> Self {
        Self {
            show_title: true,
            ..Self::default()
        }
    }

    /// The title to draw, if any.
    pub fn visible_title(&self) -> Option<&str> {
        if !self.show_title {
            return None;
        }
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("fontColor", &self.font_color),
            ("backgroundColor", &self.background_color),
            ("borderColor", &self.border_color),
            ("nodeColor", &self.node_color),
        ] {
            if Rgb::from_hex(value).is_none() {
                return Err(Error::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The `config` section of a diagram command. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_type: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_strategy: Option<LinkPalette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_legend: Option<bool>,
}

impl DiagramConfig {
    /// Resolves against [`DocumentStyle::default`] and validates the colors.
    pub fn into_style(self) -> Result<DocumentStyle> {
        let d = DocumentStyle::default();
        let style = DocumentStyle {
            font_family: self.font_name.unwrap_or(d.font_family),
            font_size: self
                .font_size
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(d.font_size),
            font_color: self.font_color.unwrap_or(d.font_color),
            font_style: self.font_type.unwrap_or(d.font_style),
            background_color: self.background_color.unwrap_or(d.background_color),
            border_color: self.border_color.unwrap_or(d.border_color),
            node_color: self.node_color.unwrap_or(d.node_color),
            link_palette: self.color_strategy.unwrap_or(d.link_palette),
            title: self.title.or(d.title),
            show_title: self.show_title.unwrap_or(d.show_title),
            show_legend: self.show_legend.unwrap_or(d.show_legend),
        };
        style.validate()?;
        Ok(style)
    }
}
