//! Link color ramps.
//!
//! A ramp maps a traffic percentage to a display color. Every ramp clamps its input to
//! `[0, 100]` first, so all of them are total over `f64` (NaN is treated as `0`).

use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Rainbow ramp value for exactly 0%.
    pub const GRAY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
                Some(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkPalette {
    #[default]
    RedGreen,
    BlueYellow,
    Grayscale,
    Cold,
    Warm,
    Rainbow,
    PurpleYellow,
}

impl LinkPalette {
    pub const ALL: [LinkPalette; 7] = [
        Self::RedGreen,
        Self::BlueYellow,
        Self::Grayscale,
        Self::Cold,
        Self::Warm,
        Self::Rainbow,
        Self::PurpleYellow,
    ];

    /// Human readable name, e.g. `Red-Green`.
    pub fn name(self) -> &'static str {
        match self {
            Self::RedGreen => "Red-Green",
            Self::BlueYellow => "Blue-Yellow",
            Self::Grayscale => "Grayscale",
            Self::Cold => "Cold",
            Self::Warm => "Warm",
            Self::Rainbow => "Rainbow",
            Self::PurpleYellow => "Purple-Yellow",
        }
    }

    /// Wire identifier, e.g. `RED_GREEN`.
    pub fn id(self) -> &'static str {
        match self {
            Self::RedGreen => "RED_GREEN",
            Self::BlueYellow => "BLUE_YELLOW",
            Self::Grayscale => "GRAYSCALE",
            Self::Cold => "COLD",
            Self::Warm => "WARM",
            Self::Rainbow => "RAINBOW",
            Self::PurpleYellow => "PURPLE_YELLOW",
        }
    }

    pub fn color_for(self, percentage: f64) -> Rgb {
        let p = clamp_percentage(percentage);
        let ratio = p / 100.0;
        let up = (255.0 * ratio) as u8;
        let down = 255 - up;
        match self {
            Self::RedGreen => Rgb::new(up, down, 0),
            Self::BlueYellow => Rgb::new(down, down, up),
            Self::Grayscale => Rgb::new(up, up, up),
            Self::Cold => Rgb::new(0, up, 255),
            Self::Warm => Rgb::new(255, up, 0),
            Self::PurpleYellow => Rgb::new(up, down, up),
            Self::Rainbow => {
                if p == 0.0 {
                    return Rgb::GRAY;
                }
                // 100% must stay short of wrapping back to red.
                hsb_to_rgb(p / 101.0, 1.0, 1.0)
            }
        }
    }
}

impl fmt::Display for LinkPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LinkPalette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let palette = match key.as_str() {
            "redgreen" => Self::RedGreen,
            "blueyellow" => Self::BlueYellow,
            "grayscale" | "greyscale" => Self::Grayscale,
            "cold" => Self::Cold,
            "warm" => Self::Warm,
            "rainbow" => Self::Rainbow,
            "purpleyellow" => Self::PurpleYellow,
            _ => {
                return Err(Error::UnknownPalette {
                    value: s.to_string(),
                });
            }
        };
        Ok(palette)
    }
}

impl Serialize for LinkPalette {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for LinkPalette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        return 0.0;
    }
    percentage.clamp(0.0, 100.0)
}

/// HSB (a.k.a. HSV) to RGB using the usual six-sextant formula; channels round half-up.
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> Rgb {
    let channel = |v: f64| (v * 255.0 + 0.5) as u8;
    if saturation == 0.0 {
        let v = channel(brightness);
        return Rgb::new(v, v, v);
    }
    let h = (hue - hue.floor()) * 6.0;
    let f = h - h.floor();
    let p = brightness * (1.0 - saturation);
    let q = brightness * (1.0 - saturation * f);
    let t = brightness * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match h as u8 {
        0 => (brightness, t, p),
        1 => (q, brightness, p),
        2 => (p, brightness, t),
        3 => (p, q, brightness),
        4 => (t, p, brightness),
        _ => (brightness, p, q),
    };
    Rgb::new(channel(r), channel(g), channel(b))
}
