//! Text rendering for archive scalars.
//!
//! Everything here is pure: the same input always renders to the same text, and
//! nothing touches a sink. The archive calls these before it emits an envelope, so a
//! value that cannot be rendered never produces partial output.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Character {ch:?} at byte offset {offset} has no XML representation")]
    UnrepresentableChar { ch: char, offset: usize },
}

/// Escape a string so it can sit between two envelope markers.
///
/// The five markup characters become their named entities. Tab, line feed and
/// carriage return pass through; every other C0 control becomes a numeric
/// reference (`&#x1F;`). U+0000, U+FFFE and U+FFFF cannot be expressed at all.
///
/// Returns the input unchanged (borrowed) when nothing needed escaping.
pub fn escape_xml(s: &str) -> Result<Cow<'_, str>, EncodeError> {
    let first = match s.char_indices().find(|(_, c)| needs_escape(*c)) {
        Some((idx, _)) => idx,
        None => return Ok(Cow::Borrowed(s)),
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);

    for (offset, ch) in s[first..].char_indices() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\0' | '\u{FFFE}' | '\u{FFFF}' => {
                return Err(EncodeError::UnrepresentableChar {
                    ch,
                    offset: first + offset,
                })
            }
            c if (c as u32) < 0x20 => out.push_str(&format!("&#x{:X};", c as u32)),
            c => out.push(c),
        }
    }

    Ok(Cow::Owned(out))
}

#[inline(always)]
fn needs_escape(c: char) -> bool {
    matches!(c, '&' | '<' | '>' | '\'' | '"' | '\u{FFFE}' | '\u{FFFF}')
        || ((c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'))
}

/// Render a byte buffer as one token of lowercase hex, two digits per byte.
pub fn encode_buffer(buf: &[u8]) -> String {
    hex::encode(buf)
}

/// Shortest text that parses back to the same `f32`.
pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value.is_infinite() {
        infinity(value.is_sign_positive()).into()
    } else {
        format!("{:?}", value)
    }
}

/// Shortest text that parses back to the same `f64`.
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".into()
    } else if value.is_infinite() {
        infinity(value.is_sign_positive()).into()
    } else {
        format!("{:?}", value)
    }
}

#[inline(always)]
fn infinity(positive: bool) -> &'static str {
    if positive {
        "INF"
    } else {
        "-INF"
    }
}
