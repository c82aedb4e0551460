//! Textual operation scripts.
//!
//! A token is `insert:KEY`, `i:KEY`, `delete:KEY`, `d:KEY`, or a bare `KEY`
//! (insert). Scripts separate tokens with whitespace or commas; `#` starts a
//! comment running to the end of the line.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One mutation of an [`AvlTree`](crate::AvlTree).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Op<K> {
    Insert(K),
    Delete(K),
}

impl<K> Op<K> {
    pub fn key(&self) -> &K {
        match self {
            Op::Insert(k) | Op::Delete(k) => k,
        }
    }
}

impl<K: fmt::Display> fmt::Display for Op<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Insert(k) => write!(f, "insert {k}"),
            Op::Delete(k) => write!(f, "delete {k}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseOpError {
    #[error("empty operation")]
    Empty,
    #[error("unknown operation `{0}` (expected insert, i, delete or d)")]
    UnknownVerb(String),
    #[error("invalid key `{token}`: {reason}")]
    InvalidKey { token: String, reason: String },
}

impl<K> FromStr for Op<K>
where
    K: FromStr,
    K::Err: fmt::Display,
{
    type Err = ParseOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseOpError::Empty);
        }

        let (verb, key) = match s.split_once(':') {
            Some((verb, key)) => (Some(verb.trim()), key.trim()),
            None => (None, s),
        };
        let key = key.parse::<K>().map_err(|e| ParseOpError::InvalidKey {
            token: key.to_string(),
            reason: e.to_string(),
        })?;

        match verb.map(str::to_ascii_lowercase).as_deref() {
            None | Some("insert") | Some("i") => Ok(Op::Insert(key)),
            Some("delete") | Some("d") => Ok(Op::Delete(key)),
            Some(other) => Err(ParseOpError::UnknownVerb(other.to_string())),
        }
    }
}

/// Parse every token in `text`, stopping at the first bad one.
pub fn parse_script<K>(text: &str) -> Result<Vec<Op<K>>, ParseOpError>
where
    K: FromStr,
    K::Err: fmt::Display,
{
    text.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == ','))
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
