//! # Option Token Parsing
//!
//! Commands take trailing `key=value` tokens:
//!
//! ```text
//! read users prefix=user# family=d version=1 decode=int
//!            └─────┬────┘ └───┬──┘ └───┬───┘ └───┬────┘
//!               Prefix     Family   Version    Decode
//! ```
//!
//! Tokens split on the first `=`, so values may themselves contain `=`.
//! A token without `=` and a key the command does not accept are both hard
//! errors. Values stay strings here; numeric conversion happens where each
//! option is turned into part of a request, so the error can name the option.

use crate::error::{Error, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    Start,
    End,
    Prefix,
    Family,
    Value,
    Version,
    From,
    To,
    Count,
    Regex,
    Decode,
    DecodeColumns,
}

impl OptionKey {
    pub const ALL: &'static [OptionKey] = &[
        OptionKey::Start,
        OptionKey::End,
        OptionKey::Prefix,
        OptionKey::Family,
        OptionKey::Value,
        OptionKey::Version,
        OptionKey::From,
        OptionKey::To,
        OptionKey::Count,
        OptionKey::Regex,
        OptionKey::Decode,
        OptionKey::DecodeColumns,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OptionKey::Start => "start",
            OptionKey::End => "end",
            OptionKey::Prefix => "prefix",
            OptionKey::Family => "family",
            OptionKey::Value => "value",
            OptionKey::Version => "version",
            OptionKey::From => "from",
            OptionKey::To => "to",
            OptionKey::Count => "count",
            OptionKey::Regex => "regex",
            OptionKey::Decode => "decode",
            OptionKey::DecodeColumns => "decode_columns",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOptions {
    values: BTreeMap<OptionKey, String>,
}

impl ParsedOptions {
    /// Parses `tokens`, accepting only keys listed in `allowed`.
    pub fn parse<'a, I>(tokens: I, allowed: &[OptionKey]) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = BTreeMap::new();

        for token in tokens {
            let (name, value) = token
                .split_once('=')
                .ok_or_else(|| Error::InvalidToken(token.to_string()))?;

            let key = OptionKey::parse(name)
                .filter(|key| allowed.contains(key))
                .ok_or_else(|| Error::UnknownOption(token.to_string()))?;

            values.insert(key, value.to_string());
        }

        Ok(Self { values })
    }

    /// Value for `key`. Empty values count as absent.
    pub fn get(&self, key: OptionKey) -> Option<&str> {
        self.values
            .get(&key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.get(key).is_some()
    }

    pub fn get_u64(&self, key: OptionKey) -> Result<Option<u64>> {
        self.get(key)
            .map(|value| {
                value.parse::<u64>().map_err(|_| Error::InvalidNumber {
                    option: key.as_str(),
                    value: value.to_string(),
                    expected: "non-negative integer",
                })
            })
            .transpose()
    }

    pub fn get_i64(&self, key: OptionKey) -> Result<Option<i64>> {
        self.get(key)
            .map(|value| {
                value.parse::<i64>().map_err(|_| Error::InvalidNumber {
                    option: key.as_str(),
                    value: value.to_string(),
                    expected: "integer",
                })
            })
            .transpose()
    }

    /// Number of distinct keys given, including ones with empty values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_keys() {
        let opts = ParsedOptions::parse(["prefix=a", "count=10"], OptionKey::ALL).unwrap();
        assert_eq!(opts.get(OptionKey::Prefix), Some("a"));
        assert_eq!(opts.get_u64(OptionKey::Count).unwrap(), Some(10));
        assert_eq!(opts.len(), 2);
    }

    #[test]
    fn no_tokens_is_empty() {
        let opts = ParsedOptions::parse(std::iter::empty(), OptionKey::ALL).unwrap();
        assert!(opts.is_empty());
        assert_eq!(opts.len(), 0);
    }

    #[test]
    fn splits_on_first_equals() {
        let opts = ParsedOptions::parse(["value=a=b"], OptionKey::ALL).unwrap();
        assert_eq!(opts.get(OptionKey::Value), Some("a=b"));
    }

    #[test]
    fn token_without_equals_is_rejected() {
        let err = ParsedOptions::parse(["prefix"], OptionKey::ALL).unwrap_err();
        assert!(matches!(err, Error::InvalidToken(ref t) if t == "prefix"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ParsedOptions::parse(["limit=3"], OptionKey::ALL).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(ref t) if t == "limit=3"));
        assert!(err.is_argument_error());
    }

    #[test]
    fn key_outside_allowed_set_is_rejected() {
        let err = ParsedOptions::parse(["prefix=a"], &[OptionKey::Family]).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(_)));
    }

    #[test]
    fn hyphenated_decode_columns_is_not_an_alias() {
        let err = ParsedOptions::parse(["decode-columns=a:int"], OptionKey::ALL).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(_)));
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let opts = ParsedOptions::parse(["prefix="], OptionKey::ALL).unwrap();
        assert_eq!(opts.get(OptionKey::Prefix), None);
        assert!(!opts.contains(OptionKey::Prefix));
    }

    #[test]
    fn last_value_wins() {
        let opts = ParsedOptions::parse(["count=1", "count=2"], OptionKey::ALL).unwrap();
        assert_eq!(opts.get_u64(OptionKey::Count).unwrap(), Some(2));
    }

    #[test]
    fn non_numeric_value_names_the_option() {
        let opts = ParsedOptions::parse(["count=ten"], OptionKey::ALL).unwrap();
        let err = opts.get_u64(OptionKey::Count).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("count"), "{}", msg);
        assert!(msg.contains("ten"), "{}", msg);
    }

    #[test]
    fn negative_count_is_rejected() {
        let opts = ParsedOptions::parse(["count=-1"], OptionKey::ALL).unwrap();
        assert!(opts.get_u64(OptionKey::Count).is_err());
        assert_eq!(opts.get_i64(OptionKey::Count).unwrap(), Some(-1));
    }

    #[test]
    fn option_names_round_trip() {
        for key in OptionKey::ALL {
            assert_eq!(OptionKey::parse(key.as_str()), Some(*key));
        }
    }
}
