//! Parsing of textual colors used for knobs, borders and shadows
use rgb::Rgba;
use thiserror::Error;

/// Errors from [parse_color]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Nothing but whitespace was given
    #[error("empty color string")]
    Empty,
    /// A `#` color with a digit count other than 3, 4, 6 or 8
    #[error("invalid hex color length {0}")]
    InvalidLength(usize),
    /// A `#` color containing something other than hex digits
    #[error("invalid hex digits in {0:?}")]
    InvalidHex(String),
    /// A malformed `rgb()` or `rgba()` function
    #[error("invalid color function {0:?}")]
    InvalidFunction(String),
    /// A component outside of its allowed range
    #[error("color component {0:?} out of range")]
    OutOfRange(String),
    /// Anything else
    #[error("unknown color {0:?}")]
    Unknown(String)
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorParseError> {
    let digits = hex
        .bytes()
        .map(nibble)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| ColorParseError::InvalidHex(hex.into()))?;

    match digits.as_slice() {
        [r, g, b] => Ok(Rgba::new(r * 17, g * 17, b * 17, 255)),
        [r, g, b, a] => Ok(Rgba::new(r * 17, g * 17, b * 17, a * 17)),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba::new(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, 255)),
        [r1, r0, g1, g0, b1, b0, a1, a0] => Ok(Rgba::new(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, a1 << 4 | a0)),
        other => Err(ColorParseError::InvalidLength(other.len()))
    }
}

fn parse_component(token: &str) -> Result<u8, ColorParseError> {
    token
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|&v| v <= 255)
        .map(|v| v as u8)
        .ok_or_else(|| ColorParseError::OutOfRange(token.trim().into()))
}

fn parse_alpha(token: &str) -> Result<u8, ColorParseError> {
    match token.trim().parse::<f32>() {
        Ok(a) if (0.0..=1.0).contains(&a) => Ok((a * 255.0 + 0.5).floor() as u8),
        _ => Err(ColorParseError::OutOfRange(token.trim().into()))
    }
}

fn parse_function(args: &str, with_alpha: bool) -> Result<Rgba<u8>, ColorParseError> {
    let parts: Vec<&str> = args.split(',').collect();
    match (parts.as_slice(), with_alpha) {
        ([r, g, b], false) => Ok(Rgba::new(parse_component(r)?, parse_component(g)?, parse_component(b)?, 255)),
        ([r, g, b, a], true) => Ok(Rgba::new(parse_component(r)?, parse_component(g)?, parse_component(b)?, parse_alpha(a)?)),
        _ => Err(ColorParseError::InvalidFunction(args.into()))
    }
}

/// Parses a CSS-like color
///
/// The accepted forms are `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` with alpha in `[0, 1]`, and the names `black`, `white`, `gray`/`grey`
/// and `transparent`.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex.trim());
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower.strip_prefix("rgba(").and_then(|x| x.strip_suffix(')')) {
        return parse_function(args, true);
    }
    if let Some(args) = lower.strip_prefix("rgb(").and_then(|x| x.strip_suffix(')')) {
        return parse_function(args, false);
    }

    match lower.as_str() {
        "black" => Ok(Rgba::new(0, 0, 0, 255)),
        "white" => Ok(Rgba::new(255, 255, 255, 255)),
        "gray" | "grey" => Ok(Rgba::new(128, 128, 128, 255)),
        "transparent" => Ok(Rgba::new(0, 0, 0, 0)),
        _ => Err(ColorParseError::Unknown(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#777"), Ok(Rgba::new(0x77, 0x77, 0x77, 255)));
        assert_eq!(parse_color("#f008"), Ok(Rgba::new(255, 0, 0, 0x88)));
        assert_eq!(parse_color(" #1E90ff "), Ok(Rgba::new(0x1e, 0x90, 0xff, 255)));
        assert_eq!(parse_color("#00000080"), Ok(Rgba::new(0, 0, 0, 0x80)));
        assert_eq!(parse_color("#12345"), Err(ColorParseError::InvalidLength(5)));
        assert!(matches!(parse_color("#ggg"), Err(ColorParseError::InvalidHex(_))));
    }

    #[test]
    fn function_forms() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Ok(Rgba::new(10, 20, 30, 255)));
        assert_eq!(parse_color("RGBA(0,0,0,0.5)"), Ok(Rgba::new(0, 0, 0, 128)));
        assert!(matches!(parse_color("rgb(256,0,0)"), Err(ColorParseError::OutOfRange(_))));
        assert!(matches!(parse_color("rgb(1,2)"), Err(ColorParseError::InvalidFunction(_))));
        assert!(matches!(parse_color("rgba(1,2,3,4)"), Err(ColorParseError::OutOfRange(_))));
    }

    #[test]
    fn names_and_garbage() {
        assert_eq!(parse_color("White"), Ok(Rgba::new(255, 255, 255, 255)));
        assert_eq!(parse_color("transparent"), Ok(Rgba::new(0, 0, 0, 0)));
        assert_eq!(parse_color("   "), Err(ColorParseError::Empty));
        assert!(matches!(parse_color("chartreuse"), Err(ColorParseError::Unknown(_))));
    }
}
