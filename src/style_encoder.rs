/*!
 * Encoding of style values into ASS field syntax.
 */

use crate::errors::TranscodeError;

/// Prefix of an ASS color literal
pub const COLOR_LITERAL_PREFIX: &str = "&H";

/// Alpha byte for a fully opaque color
const OPAQUE_ALPHA: &str = "00";

/// Convert a `#RRGGBB` (or `#RGB`) color into an ASS `&HAABBGGRR` literal.
///
/// The leading `#` is optional. Shorthand colors are expanded by doubling each
/// digit (`f0a` becomes `ff00aa`).
pub fn encode_color(hex: &str) -> Result<String, TranscodeError> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);

    let expanded: String = if digits.chars().count() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    if expanded.len() != 6 || !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TranscodeError::InvalidColor(hex.to_string()));
    }

    let (r, g, b) = (&expanded[0..2], &expanded[2..4], &expanded[4..6]);
    Ok(format!("{}{}{}{}{}", COLOR_LITERAL_PREFIX, OPAQUE_ALPHA, b, g, r).to_uppercase())
}

/// Map a placement name to an ASS numpad alignment code.
///
/// Unknown placements fall back to bottom-center (2) instead of failing.
pub fn encode_alignment(placement: &str) -> u8 {
    match placement.trim().to_lowercase().as_str() {
        "top" | "top-center" => 8,
        "center" | "middle" | "middle-center" => 5,
        "bottom" | "bottom-center" => 2,
        _ => 2,
    }
}

/// ASS boolean style flag: -1 is on, 0 is off
pub fn encode_flag(enabled: bool) -> i8 {
    if enabled { -1 } else { 0 }
}
