//! CSS color values.

use meridian_core::Color;

use super::numbers::lenient_float;

const NAMED_COLORS: &[(&str, u32)] = &[
    ("aqua", 0x00ffff),
    ("black", 0x000000),
    ("blue", 0x0000ff),
    ("brown", 0xa52a2a),
    ("coral", 0xff7f50),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkred", 0x8b0000),
    ("fuchsia", 0xff00ff),
    ("gold", 0xffd700),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("grey", 0x808080),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("lightblue", 0xadd8e6),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lime", 0x00ff00),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("navy", 0x000080),
    ("olive", 0x808000),
    ("orange", 0xffa500),
    ("pink", 0xffc0cb),
    ("purple", 0x800080),
    ("red", 0xff0000),
    ("salmon", 0xfa8072),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("white", 0xffffff),
    ("yellow", 0xffff00),
];

/// One `rgb()` channel: a plain number in 0..255 or a percentage.
fn channel(value: &str) -> f32 {
    let value = value.trim();
    let scaled = match value.strip_suffix('%') {
        Some(percent) => lenient_float(percent) / 100.0,
        None => lenient_float(value) / 255.0,
    };
    scaled.clamp(0.0, 1.0)
}

fn alpha(value: &str) -> f32 {
    let value = value.trim();
    let a = match value.strip_suffix('%') {
        Some(percent) => lenient_float(percent) / 100.0,
        None => lenient_float(value),
    };
    a.clamp(0.0, 1.0)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

fn hsl(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s <= 0.0 {
        return (l, l, l);
    }
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

/// Parse a CSS color: `#rgb`, `#rrggbb`, `rgb()`, `rgba()`, `hsl()`, `hsla()`
/// or a named color.
///
/// Returns `None` for `none`, paint servers like `url(#g)` and anything unrecognized.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.is_empty() || value == "none" || value.starts_with("url") {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        let digits = u32::from_str_radix(hex, 16).ok()?;
        return match hex.len() {
            3 => {
                let expand = |nibble: u32| (nibble & 0xf) * 0x11;
                Some(Color::from_hex(
                    (expand(digits >> 8) << 16) | (expand(digits >> 4) << 8) | expand(digits),
                ))
            }
            6 => Some(Color::from_hex(digits)),
            _ => None,
        };
    }

    if let Some(open) = value.find('(') {
        let name = value[..open].trim().to_ascii_lowercase();
        let args = value[open + 1..].trim_end().strip_suffix(')')?;
        let parts: Vec<&str> = args
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.len() < 3 {
            return None;
        }
        let a = parts.get(3).map_or(1.0, |v| alpha(v));

        return match name.as_str() {
            "rgb" | "rgba" => Some(Color::rgba(
                channel(parts[0]),
                channel(parts[1]),
                channel(parts[2]),
                a,
            )),
            "hsl" | "hsla" => {
                let h = lenient_float(parts[0]).rem_euclid(360.0) / 360.0;
                let s = (lenient_float(parts[1].trim_end_matches('%')) / 100.0).clamp(0.0, 1.0);
                let l = (lenient_float(parts[2].trim_end_matches('%')) / 100.0).clamp(0.0, 1.0);
                let (r, g, b) = hsl(h, s, l);
                Some(Color::rgba(r, g, b, a))
            }
            _ => None,
        };
    }

    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| Color::from_hex(*rgb))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba8(color: Color) -> [u8; 4] {
        color.to_rgba_u8()
    }

    #[test]
    fn test_hex() {
        assert_eq!(rgba8(parse_color("#ff8000").unwrap()), [255, 128, 0, 255]);
        assert_eq!(rgba8(parse_color("#f80").unwrap()), [255, 136, 0, 255]);
        assert!(parse_color("#ff80").is_none());
        assert!(parse_color("#zzz").is_none());
    }

    #[test]
    fn test_functional() {
        assert_eq!(rgba8(parse_color("rgb(255, 0, 0)").unwrap()), [255, 0, 0, 255]);
        assert_eq!(rgba8(parse_color("rgb(100%, 50%, 0%)").unwrap()), [255, 128, 0, 255]);
        assert_eq!(rgba8(parse_color("rgba(0,0,255,0.5)").unwrap())[3], 128);
        assert_eq!(rgba8(parse_color("hsl(120, 100%, 50%)").unwrap()), [0, 255, 0, 255]);
    }

    #[test]
    fn test_named() {
        assert_eq!(rgba8(parse_color("Red").unwrap()), [255, 0, 0, 255]);
        assert_eq!(rgba8(parse_color("teal").unwrap()), [0, 128, 128, 255]);
        assert!(parse_color("notacolor").is_none());
    }

    #[test]
    fn test_not_a_paint() {
        assert!(parse_color("none").is_none());
        assert!(parse_color("url(#gradient)").is_none());
        assert!(parse_color("").is_none());
    }
}
