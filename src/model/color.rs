use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^hsl\(\s*(-?[0-9.]+)\s*,\s*([0-9.]+)%\s*,\s*([0-9.]+)%\s*\)$")
        .unwrap_or_else(|e| panic!("invalid hsl pattern: {e}"))
});

/// Display color of an activity, stored verbatim (e.g. `hsl(212.4,61.0%,90.2%)`).
///
/// Generated once when the activity is created and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSpec(String);

impl ColorSpec {
    pub fn new(spec: impl Into<String>) -> Self {
        ColorSpec(spec.into())
    }

    /// A light, low-contrast color suitable as a background behind text.
    /// Hue is uniform, saturation 25..95%, lightness 85..95%.
    pub fn random_pastel<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let hue: f64 = rng.random_range(0.0..360.0);
        let saturation: f64 = rng.random_range(25.0..95.0);
        let lightness: f64 = rng.random_range(85.0..95.0);
        ColorSpec(format!("hsl({hue:.1},{saturation:.1}%,{lightness:.1}%)"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to RGB. Understands `hsl(h,s%,l%)` and `#RRGGBB`.
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        let spec = self.0.trim();
        if spec.starts_with('#') {
            return parse_hex(spec);
        }
        let caps = HSL_RE.captures(spec)?;
        let h: f64 = caps[1].parse().ok()?;
        let s: f64 = caps[2].parse().ok()?;
        let l: f64 = caps[3].parse().ok()?;
        Some(hsl_to_rgb(h, s / 100.0, l / 100.0))
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a hex color string like "#FF4444"
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r1), channel(g1), channel(b1))
}
