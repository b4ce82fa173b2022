//! # Cell Value Decoding
//!
//! Cell values are raw bytes. Applications commonly store counters and
//! measurements as 8-byte big-endian integers or doubles, which read as noise
//! when printed as text. Decoding turns them back into numbers.
//!
//! ## Decode Resolution
//!
//! ```text
//! value.len() != 8 ──────────────────────────────> quoted literal
//!        │
//!        ▼
//! qualifier "d:score" ──> local name "score"
//!        │
//!        ▼
//! per-column override for "score"? ── yes ──> that type
//!        │ no
//!        ▼
//! default type (decode=, or the session default)
//! ```
//!
//! ## Types
//!
//! | Type     | 8-byte rendering                                   |
//! |----------|----------------------------------------------------|
//! | `string` | quoted literal                                     |
//! | `int`    | big-endian `i64`, plain decimal                    |
//! | `float`  | big-endian IEEE-754 `f64`, 6 decimal places        |
//! | `auto`   | `int` if the high byte is `0x00`/`0xff`, else `float` |
//! | unset    | quoted literal                                     |
//!
//! `auto` is a guess. Small integers sign-extend into a `0x00` or `0xff` high
//! byte, while doubles of ordinary magnitude carry exponent bits there. It is
//! never applied unless asked for.

use crate::error::{Error, Result};
use crate::read::{OptionKey, ParsedOptions};
use crate::row::local_name;
use std::collections::HashMap;
use std::fmt::Write;
use std::str::FromStr;

const DECODABLE_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeType {
    String,
    Int,
    Float,
    Auto,
}

impl FromStr for DecodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(DecodeType::String),
            "int" => Ok(DecodeType::Int),
            "float" => Ok(DecodeType::Float),
            "auto" => Ok(DecodeType::Auto),
            other => Err(Error::InvalidDecodeType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeConfig {
    pub default: Option<DecodeType>,
    pub columns: HashMap<String, DecodeType>,
}

impl DecodeConfig {
    /// Reads `decode` and `decode_columns` from `opts`. `decode=` replaces
    /// `session_default`; without it the session default applies.
    pub fn from_options(opts: &ParsedOptions, session_default: Option<DecodeType>) -> Result<Self> {
        let default = match opts.get(OptionKey::Decode) {
            Some(raw) => Some(raw.parse()?),
            None => session_default,
        };
        let columns = match opts.get(OptionKey::DecodeColumns) {
            Some(raw) => parse_decode_columns(raw)?,
            None => HashMap::new(),
        };
        Ok(Self { default, columns })
    }

    pub fn with_default(default: DecodeType) -> Self {
        Self {
            default: Some(default),
            columns: HashMap::new(),
        }
    }

    pub fn decode_type_for(&self, qualifier: &str) -> Option<DecodeType> {
        self.columns
            .get(local_name(qualifier))
            .copied()
            .or(self.default)
    }

    /// Renders `value` as it appears under a column heading.
    pub fn render(&self, qualifier: &str, value: &[u8]) -> String {
        let Ok(bytes) = <[u8; DECODABLE_LEN]>::try_from(value) else {
            return quote_bytes(value);
        };

        match self.decode_type_for(qualifier) {
            Some(DecodeType::Int) => render_int(bytes),
            Some(DecodeType::Float) => render_float(bytes),
            Some(DecodeType::Auto) => {
                if matches!(bytes[0], 0x00 | 0xff) {
                    render_int(bytes)
                } else {
                    render_float(bytes)
                }
            }
            Some(DecodeType::String) | None => quote_bytes(value),
        }
    }
}

/// Parses `name:type[,name:type...]`.
pub fn parse_decode_columns(raw: &str) -> Result<HashMap<String, DecodeType>> {
    raw.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| -> Result<(String, DecodeType)> {
            let (name, ty) = entry
                .split_once(':')
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| Error::InvalidDecodeColumn(entry.to_string()))?;
            Ok((name.to_string(), ty.parse()?))
        })
        .collect()
}

fn render_int(bytes: [u8; DECODABLE_LEN]) -> String {
    i64::from_be_bytes(bytes).to_string()
}

fn render_float(bytes: [u8; DECODABLE_LEN]) -> String {
    format!("{:.6}", f64::from_be_bytes(bytes))
}

/// Double-quoted, escaped rendering of arbitrary bytes.
///
/// Printable characters pass through, including non-ASCII ones. Control
/// characters and bytes that are not valid UTF-8 become escapes.
pub fn quote_bytes(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');

    for chunk in value.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_ascii_control() => {
                    let _ = write!(out, "\\x{:02x}", c as u32);
                }
                c if c.is_control() => {
                    let _ = write!(out, "\\u{{{:04x}}}", c as u32);
                }
                c => out.push(c),
            }
        }
        for byte in chunk.invalid() {
            let _ = write!(out, "\\x{:02x}", byte);
        }
    }

    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(default: Option<DecodeType>, columns: &[(&str, DecodeType)]) -> DecodeConfig {
        DecodeConfig {
            default,
            columns: columns
                .iter()
                .map(|(name, ty)| (name.to_string(), *ty))
                .collect(),
        }
    }

    const TWO: [u8; 8] = [0x40, 0, 0, 0, 0, 0, 0, 0];
    const ONE: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

    #[test]
    fn string_value_stays_quoted() {
        let cfg = config(
            Some(DecodeType::String),
            &[("r", DecodeType::Int), ("ro", DecodeType::Float)],
        );
        assert_eq!(cfg.render("d:row", b"a"), "\"a\"");
    }

    #[test]
    fn column_override_decodes_float() {
        let cfg = config(
            Some(DecodeType::String),
            &[("r", DecodeType::Int), ("ro", DecodeType::Float)],
        );
        assert_eq!(cfg.render("d:ro", &TWO), "2.000000");
    }

    #[test]
    fn column_override_decodes_int() {
        let cfg = config(
            Some(DecodeType::String),
            &[("r", DecodeType::Int), ("ro", DecodeType::Float)],
        );
        assert_eq!(cfg.render("d:r", &ONE), "1");
    }

    #[test]
    fn unset_decode_quotes_eight_bytes() {
        let cfg = DecodeConfig::default();
        assert_eq!(cfg.render("d:row", &TWO), "\"@\\x00\\x00\\x00\\x00\\x00\\x00\\x00\"");
    }

    #[test]
    fn override_beats_default() {
        let cfg = config(Some(DecodeType::Int), &[("row", DecodeType::Float)]);
        assert_eq!(cfg.render("d:row", &TWO), "2.000000");
        assert_eq!(cfg.render("d:other", &ONE), "1");
    }

    #[test]
    fn wrong_length_is_always_quoted() {
        for ty in [DecodeType::Int, DecodeType::Float, DecodeType::Auto] {
            let cfg = DecodeConfig::with_default(ty);
            assert_eq!(cfg.render("d:c", b"1234567"), "\"1234567\"");
            assert_eq!(cfg.render("d:c", b"123456789"), "\"123456789\"");
            assert_eq!(cfg.render("d:c", b""), "\"\"");
        }
    }

    #[test]
    fn int_decoding_recovers_non_negative_values() {
        let cfg = DecodeConfig::with_default(DecodeType::Int);
        for n in [0i64, 1, 255, 1 << 40, i64::MAX] {
            assert_eq!(cfg.render("d:n", &n.to_be_bytes()), n.to_string());
        }
    }

    #[test]
    fn int_decoding_is_signed() {
        let cfg = DecodeConfig::with_default(DecodeType::Int);
        assert_eq!(cfg.render("d:n", &(-2i64).to_be_bytes()), "-2");
    }

    #[test]
    fn float_decoding_reinterprets_bits() {
        let cfg = DecodeConfig::with_default(DecodeType::Float);
        assert_eq!(cfg.render("d:f", &(-0.5f64).to_be_bytes()), "-0.500000");
        assert_eq!(cfg.render("d:f", &ONE), "0.000000");
    }

    #[test]
    fn auto_guesses_between_int_and_float() {
        let cfg = DecodeConfig::with_default(DecodeType::Auto);
        assert_eq!(cfg.render("d:x", &ONE), "1");
        assert_eq!(cfg.render("d:x", &(-7i64).to_be_bytes()), "-7");
        assert_eq!(cfg.render("d:x", &TWO), "2.000000");
    }

    #[test]
    fn qualifier_without_family_uses_whole_name() {
        let cfg = config(None, &[("plain", DecodeType::Int)]);
        assert_eq!(cfg.render("plain", &ONE), "1");
    }

    #[test]
    fn parses_decode_columns() {
        let columns = parse_decode_columns("row:string,404:float").unwrap();
        assert_eq!(columns.get("row"), Some(&DecodeType::String));
        assert_eq!(columns.get("404"), Some(&DecodeType::Float));
    }

    #[test]
    fn malformed_decode_columns_are_rejected() {
        assert!(matches!(
            parse_decode_columns("row"),
            Err(Error::InvalidDecodeColumn(_))
        ));
        assert!(matches!(
            parse_decode_columns(":int"),
            Err(Error::InvalidDecodeColumn(_))
        ));
        assert!(matches!(
            parse_decode_columns("row:hex"),
            Err(Error::InvalidDecodeType(ref t)) if t == "hex"
        ));
    }

    #[test]
    fn decode_option_replaces_session_default() {
        let opts = ParsedOptions::parse(["decode=int"], OptionKey::ALL).unwrap();
        let cfg = DecodeConfig::from_options(&opts, Some(DecodeType::String)).unwrap();
        assert_eq!(cfg.default, Some(DecodeType::Int));

        let none = ParsedOptions::default();
        let cfg = DecodeConfig::from_options(&none, Some(DecodeType::Float)).unwrap();
        assert_eq!(cfg.default, Some(DecodeType::Float));
    }

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote_bytes(b"a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(quote_bytes(b"line\nnext\t"), r#""line\nnext\t""#);
        assert_eq!(quote_bytes(&[0x7f]), r#""\x7f""#);
        assert_eq!(quote_bytes(&[b'a', 0xff, b'b']), r#""a\xffb""#);
        assert_eq!(quote_bytes("héllo".as_bytes()), "\"héllo\"");
        assert_eq!(quote_bytes("\u{85}".as_bytes()), r#""\u{0085}""#);
    }
}
