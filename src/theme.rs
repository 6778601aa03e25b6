//! Semantic color tokens and per-type colors.
//!
//! A [`Theme`] is built once at startup and handed to components by
//! reference; nothing here is global or mutable.

use ratatui::style::Color;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named colors components ask for instead of raw RGB values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorToken {
    Tint,
    GrayDark,
    GrayMedium,
    GrayLight,
    GrayBackground,
    GrayWhite,
    White,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub tint: Color,
    pub gray_dark: Color,
    pub gray_medium: Color,
    pub gray_light: Color,
    pub gray_background: Color,
    pub gray_white: Color,
    pub white: Color,
}

const LIGHT: Palette = Palette {
    tint: Color::Rgb(220, 10, 45),
    gray_dark: Color::Rgb(33, 33, 33),
    gray_medium: Color::Rgb(102, 102, 102),
    gray_light: Color::Rgb(224, 224, 224),
    gray_background: Color::Rgb(239, 239, 239),
    gray_white: Color::Rgb(255, 255, 255),
    white: Color::Rgb(255, 255, 255),
};

const DARK: Palette = Palette {
    tint: Color::Rgb(220, 10, 45),
    gray_dark: Color::Rgb(232, 242, 244),
    gray_medium: Color::Rgb(176, 195, 207),
    gray_light: Color::Rgb(58, 72, 88),
    gray_background: Color::Rgb(12, 18, 28),
    gray_white: Color::Rgb(20, 32, 46),
    white: Color::Rgb(255, 255, 255),
};

const TYPE_COLORS: [(&str, Color); 18] = [
    ("bug", Color::Rgb(167, 183, 35)),
    ("dark", Color::Rgb(117, 87, 76)),
    ("dragon", Color::Rgb(112, 55, 255)),
    ("electric", Color::Rgb(249, 207, 48)),
    ("fairy", Color::Rgb(230, 158, 172)),
    ("fighting", Color::Rgb(193, 34, 57)),
    ("fire", Color::Rgb(245, 125, 49)),
    ("flying", Color::Rgb(168, 145, 236)),
    ("ghost", Color::Rgb(112, 85, 155)),
    ("normal", Color::Rgb(170, 166, 127)),
    ("grass", Color::Rgb(116, 203, 72)),
    ("ground", Color::Rgb(222, 193, 107)),
    ("ice", Color::Rgb(154, 214, 223)),
    ("poison", Color::Rgb(164, 62, 158)),
    ("psychic", Color::Rgb(251, 85, 132)),
    ("rock", Color::Rgb(182, 158, 49)),
    ("steel", Color::Rgb(183, 185, 208)),
    ("water", Color::Rgb(100, 147, 235)),
];

/// Opacity of the unfilled stat bar segment.
pub const FADED_ALPHA: f32 = 0.24;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub variant: ThemeVariant,
    pub palette: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let palette = match variant {
            ThemeVariant::Light => LIGHT,
            ThemeVariant::Dark => DARK,
        };
        Self { variant, palette }
    }

    pub fn light() -> Self {
        Self::new(ThemeVariant::Light)
    }

    pub fn dark() -> Self {
        Self::new(ThemeVariant::Dark)
    }

    pub fn color(&self, token: ColorToken) -> Color {
        let p = &self.palette;
        match token {
            ColorToken::Tint => p.tint,
            ColorToken::GrayDark => p.gray_dark,
            ColorToken::GrayMedium => p.gray_medium,
            ColorToken::GrayLight => p.gray_light,
            ColorToken::GrayBackground => p.gray_background,
            ColorToken::GrayWhite => p.gray_white,
            ColorToken::White => p.white,
        }
    }

    /// Color for a Pokemon type name such as `"grass"`.
    pub fn type_color(&self, type_name: &str) -> Option<Color> {
        TYPE_COLORS
            .iter()
            .find(|(name, _)| *name == type_name)
            .map(|(_, color)| *color)
    }

    /// Accent for a detail screen: the primary type's color, else the tint.
    pub fn accent<'a>(&self, mut types: impl Iterator<Item = &'a str>) -> Color {
        types
            .next()
            .and_then(|name| self.type_color(name))
            .unwrap_or(self.palette.tint)
    }

    /// `color` at `alpha` opacity over the card background.
    pub fn faded(&self, color: Color, alpha: f32) -> Color {
        blend(self.palette.gray_white, color, alpha)
    }
}

/// Alpha-blend `fg` over `bg`. Non-RGB colors fall back to `fg`.
pub fn blend(bg: Color, fg: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    match (bg, fg) {
        (Color::Rgb(br, bg_, bb), Color::Rgb(fr, fg_, fb)) => {
            let mix = |b: u8, f: u8| -> u8 {
                (b as f32 + (f as f32 - b as f32) * alpha).round() as u8
            };
            Color::Rgb(mix(br, fr), mix(bg_, fg_), mix(bb, fb))
        }
        _ => fg,
    }
}
