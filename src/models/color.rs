//! RGBA and HSV color values with hex parsing and serialization.
//!
//! `Rgba` is the storage and host-interop representation, `Hsv` is what the
//! picker edits. All channels are normalized floats in `[0, 1]`.

// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid length (must be 6 or 8 hex digits)
    #[error("invalid color length {0}, expected 6 (RRGGBB) or 8 (RRGGBBAA) hex digits")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
}

/// Color with red, green, blue and alpha channels in `[0, 1]`.
///
/// Serializes as `{"r": .., "g": .., "b": .., "a": ..}`, which is the
/// on-disk shape of every override entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0.0-1.0)
    pub r: f32,
    /// Green channel (0.0-1.0)
    pub g: f32,
    /// Blue channel (0.0-1.0)
    pub b: f32,
    /// Alpha channel (0.0-1.0)
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a color from individual channel values.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Returns the color with every channel clamped to `[0, 1]`.
    ///
    /// NaN channels collapse to 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |c: f32| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        Self::new(clamp(self.r), clamp(self.g), clamp(self.b), clamp(self.a))
    }

    /// Returns true if every channel is within `epsilon` of `other`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.a - other.a).abs() <= epsilon
    }

    /// Converts the RGB part of the color to HSV. Alpha is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use beacon_colors::models::Rgba;
    ///
    /// let hsv = Rgba::opaque(0.0, 0.0, 1.0).to_hsv();
    /// assert!((hsv.h - 2.0 / 3.0).abs() < 1e-6);
    /// assert!((hsv.s - 1.0).abs() < 1e-6);
    /// assert!((hsv.v - 1.0).abs() < 1e-6);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSV color model uses single-char names
    pub fn to_hsv(&self) -> Hsv {
        let Self { r, g, b, .. } = *self;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let v = max;
        let s = if max <= 0.0 { 0.0 } else { delta / max };

        let h = if delta <= 0.0 {
            0.0 // Grayscale, hue is undefined
        } else if max == r {
            ((g - b) / delta).rem_euclid(6.0) / 6.0
        } else if max == g {
            ((b - r) / delta + 2.0) / 6.0
        } else {
            ((r - g) / delta + 4.0) / 6.0
        };

        // rem_euclid of a tiny negative can land exactly on 6.0
        let h = if h >= 1.0 { h - 1.0 } else { h };

        Hsv::new(h, s, v)
    }

    /// Creates an opaque color from HSV.
    #[must_use]
    pub fn from_hsv(hsv: Hsv) -> Self {
        hsv.to_rgba(1.0)
    }

    /// Formats the RGB channels as "#RRGGBB" (uppercase).
    ///
    /// ```
    /// use beacon_colors::models::Rgba;
    ///
    /// assert_eq!(Rgba::opaque(1.0, 0.0, 0.0).to_hex(), "#FF0000");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_bytes();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Formats all four channels as "#RRGGBBAA" (uppercase).
    #[must_use]
    pub fn to_hex_rgba(&self) -> String {
        let [r, g, b, a] = self.to_bytes();
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }

    /// Parses "#RRGGBB" or "#RRGGBBAA" (the '#' is optional).
    ///
    /// Six-digit input yields an opaque color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidHex(bad));
        }
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength(hex.len()));
        }

        // Every char is an ASCII hex digit, so byte slicing and parsing cannot fail.
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        let alpha = if hex.len() == 8 { channel(6) } else { 255 };

        Ok(Self::from_bytes([channel(0), channel(2), channel(4), alpha]))
    }

    /// Quantizes the channels to 8 bits each.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 4] {
        let c = self.clamped();
        let q = |v: f32| (v * 255.0).round() as u8;
        [q(c.r), q(c.g), q(c.b), q(c.a)]
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub fn from_bytes([r, g, b, a]: [u8; 4]) -> Self {
        let n = |v: u8| f32::from(v) / 255.0;
        Self::new(n(r), n(g), n(b), n(a))
    }

    /// Converts the color to a Ratatui Color for terminal rendering.
    ///
    /// Terminals have no alpha, so the color is drawn as if opaque.
    #[cfg(feature = "ratatui")]
    #[must_use]
    pub fn to_ratatui_color(&self) -> ratatui::style::Color {
        let [r, g, b, _] = self.to_bytes();
        ratatui::style::Color::Rgb(r, g, b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_rgba())
    }
}

impl Default for Rgba {
    /// Default color is opaque white.
    fn default() -> Self {
        Self::WHITE
    }
}

/// Hue, saturation and value, each normalized to `[0, 1]`.
///
/// A hue of 1.0 is the same angle as 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue (0.0-1.0, fraction of a full turn)
    pub h: f32,
    /// Saturation (0.0-1.0)
    pub s: f32,
    /// Value/brightness (0.0-1.0)
    pub v: f32,
}

impl Hsv {
    /// Creates an HSV value.
    #[must_use]
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// Converts to RGBA with the given alpha. Inputs are clamped to `[0, 1]`.
    ///
    /// ```
    /// use beacon_colors::models::{Hsv, Rgba};
    ///
    /// let green = Hsv::new(1.0 / 3.0, 1.0, 1.0).to_rgba(1.0);
    /// assert!(green.approx_eq(&Rgba::opaque(0.0, 1.0, 0.0), 1e-6));
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSV color model uses single-char names
    pub fn to_rgba(&self, alpha: f32) -> Rgba {
        let h = self.h.clamp(0.0, 1.0);
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);

        if s <= 0.0 {
            return Rgba::new(v, v, v, alpha);
        }

        let h6 = h.rem_euclid(1.0) * 6.0;
        let sector = h6.floor();
        let f = h6 - sector;

        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Rgba::new(r, g, b, alpha).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn assert_hsv_close(actual: Hsv, expected: Hsv) {
        assert!(
            (actual.h - expected.h).abs() < EPS
                && (actual.s - expected.s).abs() < EPS
                && (actual.v - expected.v).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_rgb_to_hsv_primary_colors() {
        assert_hsv_close(Rgba::opaque(1.0, 0.0, 0.0).to_hsv(), Hsv::new(0.0, 1.0, 1.0));
        assert_hsv_close(Rgba::opaque(0.0, 1.0, 0.0).to_hsv(), Hsv::new(1.0 / 3.0, 1.0, 1.0));
        assert_hsv_close(Rgba::opaque(0.0, 0.0, 1.0).to_hsv(), Hsv::new(2.0 / 3.0, 1.0, 1.0));
    }

    #[test]
    fn test_rgb_to_hsv_grayscale() {
        assert_hsv_close(Rgba::BLACK.to_hsv(), Hsv::new(0.0, 0.0, 0.0));
        assert_hsv_close(Rgba::WHITE.to_hsv(), Hsv::new(0.0, 0.0, 1.0));
        assert_hsv_close(Rgba::opaque(0.5, 0.5, 0.5).to_hsv(), Hsv::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn test_rgb_hsv_rgb_roundtrip() {
        let colors = [
            Rgba::opaque(1.0, 0.0, 0.0),
            Rgba::opaque(1.0, 1.0, 0.0),
            Rgba::opaque(1.0, 0.0, 1.0),
            Rgba::opaque(0.0, 1.0, 1.0),
            Rgba::opaque(0.5, 0.25, 0.75),
            Rgba::opaque(0.8, 0.4, 0.2),
            Rgba::opaque(0.1, 0.9, 0.35),
            Rgba::opaque(0.999, 0.001, 0.5),
            Rgba::BLACK,
            Rgba::WHITE,
        ];

        for color in colors {
            let back = color.to_hsv().to_rgba(color.a);
            assert!(color.approx_eq(&back, EPS), "{color:?} came back as {back:?}");
        }
    }

    #[test]
    fn test_hsv_rgb_hsv_roundtrip() {
        let values = [
            Hsv::new(0.0, 1.0, 1.0),
            Hsv::new(0.1, 0.5, 0.5),
            Hsv::new(0.25, 0.75, 0.9),
            Hsv::new(0.5, 1.0, 0.3),
            Hsv::new(0.66, 0.2, 1.0),
            Hsv::new(0.95, 0.8, 0.6),
        ];

        for hsv in values {
            assert_hsv_close(hsv.to_rgba(1.0).to_hsv(), hsv);
        }
    }

    #[test]
    fn test_hsv_boundaries() {
        // h=1 is the same angle as h=0
        let red = Hsv::new(1.0, 1.0, 1.0).to_rgba(1.0);
        assert!(red.approx_eq(&Rgba::opaque(1.0, 0.0, 0.0), EPS));
        assert_hsv_close(red.to_hsv(), Hsv::new(0.0, 1.0, 1.0));

        // s=0 is gray regardless of hue
        let gray = Hsv::new(0.4, 0.0, 0.6).to_rgba(1.0);
        assert!(gray.approx_eq(&Rgba::opaque(0.6, 0.6, 0.6), EPS));

        // v=0 is black regardless of hue and saturation
        let black = Hsv::new(0.7, 1.0, 0.0).to_rgba(1.0);
        assert!(black.approx_eq(&Rgba::BLACK, EPS));

        // v=1, s=1 at every sector boundary stays in range
        for sector in 0..=6 {
            let c = Hsv::new(sector as f32 / 6.0, 1.0, 1.0).to_rgba(1.0);
            assert!(c.r.max(c.g).max(c.b) > 1.0 - EPS);
            assert!(c.r.min(c.g).min(c.b) < EPS);
        }
    }

    #[test]
    fn test_hsv_clamping() {
        let c = Hsv::new(1.5, 2.0, 2.0).to_rgba(1.0);
        assert!(c.approx_eq(&Rgba::opaque(1.0, 0.0, 0.0), EPS));

        let c = Hsv::new(-0.5, -1.0, -1.0).to_rgba(1.0);
        assert!(c.approx_eq(&Rgba::BLACK, EPS));
    }

    #[test]
    fn test_alpha_passes_through() {
        let c = Hsv::new(0.3, 0.5, 0.5).to_rgba(0.25);
        assert_eq!(c.a, 0.25);
    }

    #[test]
    fn test_hex_roundtrip_and_formats() {
        assert_eq!(Rgba::opaque(0.0, 0.5, 1.0).to_hex(), "#0080FF");
        assert_eq!(Rgba::new(1.0, 0.0, 0.0, 0.0).to_hex_rgba(), "#FF000000");

        let parsed = Rgba::from_hex("#FF8000").unwrap();
        assert_eq!(parsed.to_bytes(), [255, 128, 0, 255]);

        let parsed = Rgba::from_hex("  11223344 ").unwrap();
        assert_eq!(parsed.to_bytes(), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_from_hex_invalid() {
        assert_eq!(Rgba::from_hex("#FFF"), Err(ColorParseError::InvalidLength(3)));
        assert_eq!(Rgba::from_hex("#GG0000"), Err(ColorParseError::InvalidHex('G')));
        assert_eq!(Rgba::from_hex(""), Err(ColorParseError::InvalidLength(0)));
        assert!(Rgba::from_hex("#FFFFFFF").is_err());
    }

    #[test]
    fn test_clamped() {
        let c = Rgba::new(1.5, -0.5, f32::NAN, 0.5).clamped();
        assert_eq!(c, Rgba::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Rgba::new(1.0, 0.0, 0.5, 1.0)).unwrap();
        assert_eq!(json, serde_json::json!({"r": 1.0, "g": 0.0, "b": 0.5, "a": 1.0}));
    }
}
