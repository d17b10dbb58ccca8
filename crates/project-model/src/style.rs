//! Tracer stroke style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use swingtrace_common::config::StyleDefaults;
use swingtrace_common::error::{TracerError, TracerResult};

pub const MIN_WIDTH: f64 = 1.0;
pub const MAX_WIDTH: f64 = 10.0;
pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

/// An sRGB colour, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form (the `#` is optional).
    pub fn parse(input: &str) -> TracerResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = || TracerError::validation(format!("Invalid colour: {input}"));

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                Ok(Self {
                    r: channel(0).map_err(|_| invalid())?,
                    g: channel(2).map_err(|_| invalid())?,
                    b: channel(4).map_err(|_| invalid())?,
                })
            }
            3 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
                Ok(Self {
                    r: channel(0).map_err(|_| invalid())?,
                    g: channel(1).map_err(|_| invalid())?,
                    b: channel(2).map_err(|_| invalid())?,
                })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Stroke pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Dash pattern in user-space units; empty for a continuous stroke.
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[5.0, 3.0],
            LineStyle::Dotted => &[2.0, 2.0],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }
}

impl FromStr for LineStyle {
    type Err = TracerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(LineStyle::Solid),
            "dashed" => Ok(LineStyle::Dashed),
            "dotted" => Ok(LineStyle::Dotted),
            other => Err(TracerError::validation(format!(
                "Unknown line style: {other}. Use: solid, dashed, dotted"
            ))),
        }
    }
}

/// How the tracer path is stroked. Pure value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracerStyle {
    pub color: HexColor,
    /// Stroke width in pixels, `[1, 10]`.
    pub width: f64,
    /// Stroke opacity, `[0.1, 1]`.
    pub opacity: f64,
    #[serde(rename = "lineStyle", alias = "line_style")]
    pub line_style: LineStyle,
}

impl TracerStyle {
    /// Build a style, rejecting out-of-range width or opacity.
    pub fn new(
        color: HexColor,
        width: f64,
        opacity: f64,
        line_style: LineStyle,
    ) -> TracerResult<Self> {
        let style = Self {
            color,
            width,
            opacity,
            line_style,
        };
        style.validate()?;
        Ok(style)
    }

    /// Build a style from configured defaults.
    pub fn from_defaults(defaults: &StyleDefaults) -> TracerResult<Self> {
        Self::new(
            HexColor::parse(&defaults.color)?,
            defaults.width,
            defaults.opacity,
            defaults.line_style.parse()?,
        )
    }

    pub fn validate(&self) -> TracerResult<()> {
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(TracerError::validation(format!(
                "Line width must be between {MIN_WIDTH} and {MAX_WIDTH}, got {}",
                self.width
            )));
        }
        if !(MIN_OPACITY..=MAX_OPACITY).contains(&self.opacity) {
            return Err(TracerError::validation(format!(
                "Opacity must be between {MIN_OPACITY} and {MAX_OPACITY}, got {}",
                self.opacity
            )));
        }
        Ok(())
    }

    /// Copy with width and opacity clamped into range (slider semantics).
    pub fn clamped(mut self) -> Self {
        self.width = clamp_or(self.width, MIN_WIDTH, MAX_WIDTH);
        self.opacity = clamp_or(self.opacity, MIN_OPACITY, MAX_OPACITY);
        self
    }

    /// Radius of the per-point marker dots.
    pub fn marker_radius(&self) -> f64 {
        self.width + 1.0
    }
}

impl Default for TracerStyle {
    fn default() -> Self {
        Self {
            color: HexColor::rgb(0xff, 0x00, 0x00),
            width: 3.0,
            opacity: 0.8,
            line_style: LineStyle::Solid,
        }
    }
}

fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
