//! Character sets and their concentric rings.
//!
//! A layout has two sets (default and alternate), each with an inner and an
//! outer ring. Rings are fixed for the lifetime of a [`Layout`]; the only way to
//! change them is to build a new layout from config.

use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::Display as StrumDisplay;
use thiserror::Error;

pub const DELETE_GLYPH: &str = "⌫";
pub const COMMIT_GLYPH: &str = "↵";

/// One selectable unit on a ring.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum Token {
    /// Literal text: a letter, digit or multi-character operator like `!=`.
    Text(String),
    Delete,
    Commit,
}

impl Token {
    /// Text to emit for this token under the given case mode. Letters are
    /// stored upper-case and lowered unless upper case is active.
    pub fn render(&self, case: CaseMode) -> Option<String> {
        match self {
            Token::Text(s) => {
                let is_letter = s.len() == 1 && s.bytes().all(|b| b.is_ascii_uppercase());
                if is_letter && case == CaseMode::Lower {
                    Some(s.to_ascii_lowercase())
                } else {
                    Some(s.clone())
                }
            }
            Token::Delete | Token::Commit => None,
        }
    }
}

impl FromStr for Token {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(LayoutError::EmptyToken),
            DELETE_GLYPH => Ok(Token::Delete),
            COMMIT_GLYPH => Ok(Token::Commit),
            other => Ok(Token::Text(other.to_string())),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(s) => f.write_str(s),
            Token::Delete => f.write_str(DELETE_GLYPH),
            Token::Commit => f.write_str(COMMIT_GLYPH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
pub enum CharSet {
    #[default]
    Default,
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
pub enum RingLevel {
    #[default]
    Inner,
    Outer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay)]
pub enum CaseMode {
    #[default]
    Lower,
    Upper,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Ring tokens must not be empty strings")]
    EmptyToken,
    #[error("{set} {ring} ring has no tokens")]
    EmptyRing { set: CharSet, ring: RingLevel },
}

type RingPair = [Vec<Token>; 2];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    sets: [RingPair; 2],
}

impl Layout {
    /// Builds a layout, rejecting any empty ring.
    pub fn new(default: RingPair, alternate: RingPair) -> Result<Self, LayoutError> {
        let layout = Self {
            sets: [default, alternate],
        };
        for (set, pair) in [CharSet::Default, CharSet::Alternate].iter().zip(&layout.sets) {
            for (ring, tokens) in [RingLevel::Inner, RingLevel::Outer].iter().zip(pair) {
                if tokens.is_empty() {
                    return Err(LayoutError::EmptyRing {
                        set: *set,
                        ring: *ring,
                    });
                }
            }
        }
        Ok(layout)
    }

    pub fn ring(&self, set: CharSet, ring: RingLevel) -> &[Token] {
        &self.sets[set as usize][ring as usize]
    }
}

fn tokens(glyphs: &[&str]) -> Vec<Token> {
    glyphs
        .iter()
        .filter_map(|g| Token::from_str(g).ok())
        .collect()
}

impl Default for Layout {
    fn default() -> Self {
        let default = [
            tokens(&[
                "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", ".", ",", "-", "_",
                DELETE_GLYPH, COMMIT_GLYPH,
            ]),
            tokens(&[
                "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P",
                "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z",
            ]),
        ];
        let alternate = [
            tokens(&[
                "(", ")", "[", "]", "{", "}", "<", ">", "'", "\"", "`", "~", "!", "?",
                DELETE_GLYPH, COMMIT_GLYPH,
            ]),
            tokens(&[
                "+", "-", "*", "/", "=", "!=", "==", "&&", "||", "%", "&", "|", "^", "<<", ">>",
                "@", "#", "$", ":", ";", "\\", ".", ",", "_", "->", "=>",
            ]),
        ];
        Self {
            sets: [default, alternate],
        }
    }
}
