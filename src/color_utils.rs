// File: src/color_utils.rs
use crate::model::User;
use std::hash::{Hash, Hasher};

/// Parses `#RRGGBB` into an (r, g, b) tuple in [0.0, 1.0].
pub fn parse_hex(value: &str) -> Option<(f32, f32, f32)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Stable per-key color in [0.0, 1.0]. Saturation stays in 40-90% and
/// lightness in 45-70% so badges read on dark terminals.
pub fn generate_color(key: &str) -> (f32, f32, f32) {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    let bits = hasher.finish();

    let hue = (bits % 360) as f32;
    let saturation = 0.40 + ((bits >> 16) % 51) as f32 / 100.0;
    let lightness = 0.45 + ((bits >> 32) % 26) as f32 / 100.0;
    from_hsl(hue, saturation, lightness)
}

/// The user's own color when it parses, otherwise one derived from their id.
pub fn user_color(user: &User) -> (f32, f32, f32) {
    user.color
        .as_deref()
        .and_then(parse_hex)
        .unwrap_or_else(|| generate_color(&format!("user-{}", user.id)))
}

fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let second = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let base = lightness - chroma / 2.0;

    let (r, g, b) = match sector as u8 {
        0 => (chroma, second, 0.0),
        1 => (second, chroma, 0.0),
        2 => (0.0, chroma, second),
        3 => (0.0, second, chroma),
        4 => (second, 0.0, chroma),
        _ => (chroma, 0.0, second),
    };
    (r + base, g + base, b + base)
}

pub fn to_rgb8((r, g, b): (f32, f32, f32)) -> (u8, u8, u8) {
    let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    (q(r), q(g), q(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#FFFFFF"), Some((1.0, 1.0, 1.0)));
        assert_eq!(to_rgb8(parse_hex("#4ECDC4").unwrap()), (0x4E, 0xCD, 0xC4));
        assert_eq!(parse_hex("4ECDC4"), None);
        assert_eq!(parse_hex("#4ECDC"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn generated_colors_are_stable() {
        assert_eq!(generate_color("user-7"), generate_color("user-7"));
        let (r, g, b) = generate_color("user-7");
        for c in [r, g, b] {
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn user_without_color_gets_generated_one() {
        let mut user = crate::model::demo::users().remove(0);
        assert_eq!(to_rgb8(user_color(&user)), (0xFF, 0x6B, 0x6B));
        user.color = None;
        assert_eq!(user_color(&user), generate_color("user-1"));
    }

    #[test]
    fn hue_sectors_map_to_primaries() {
        assert_eq!(to_rgb8(from_hsl(0.0, 1.0, 0.5)), (255, 0, 0));
        assert_eq!(to_rgb8(from_hsl(120.0, 1.0, 0.5)), (0, 255, 0));
        assert_eq!(to_rgb8(from_hsl(240.0, 1.0, 0.5)), (0, 0, 255));
        assert_eq!(to_rgb8(from_hsl(300.0, 1.0, 0.5)), (255, 0, 255));
    }
}
