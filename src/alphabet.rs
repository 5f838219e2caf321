//! Alphabet validation and the positional codec built on it.
//!
//! An [`Alphabet`] is an ordered set of characters. The position of a
//! character is its digit value, so the alphabet doubles as a numeral system
//! of base `len(charset)`: `charset[0]` is zero and the pad symbol.
//!
//! Characters are stored lowercase. Everything the codec emits is uppercase
//! and everything it reads is matched case-insensitively.

use std::fmt;

use crate::error::{Error, Result};

/// Width of the sequence segment, and the number of trailing characters
/// [`Alphabet::decode`] considers.
pub const SEQUENCE_LEN: usize = 7;

/// Default characters used for randomness and sequence digits.
pub const DEFAULT_CHARACTERS: &str = "asdfghjwer";

/// Characters that are either ambiguous in ULIDs or meaningful to a shell.
pub const DEFAULT_FORBIDDEN_CHARACTERS: &str = "ilou|&:;()<>~*@?!$#[]{}\\/'\"`";

/// Ordered charset, validated against a set of forbidden characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    charset: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet, rejecting overlaps with `forbidden_characters`.
    ///
    /// The charset must hold at least two printable ASCII characters that are
    /// unique ignoring case.
    pub fn new(characters: &str, forbidden_characters: &str) -> Result<Self> {
        let charset: Vec<char> = characters.chars().map(|ch| ch.to_ascii_lowercase()).collect();
        let forbidden: Vec<char> = forbidden_characters
            .chars()
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        if let Some(ch) = charset.iter().find(|ch| forbidden.contains(ch)) {
            return Err(Error::InvalidConfig(format!(
                "fulid.characters contains forbidden character '{ch}'"
            )));
        }
        if charset.len() < 2 {
            return Err(Error::InvalidConfig(
                "fulid.characters needs at least 2 characters".to_string(),
            ));
        }
        if let Some(ch) = charset.iter().find(|ch| !ch.is_ascii_graphic()) {
            return Err(Error::InvalidConfig(format!(
                "fulid.characters must be printable ASCII, got {ch:?}"
            )));
        }
        for (idx, ch) in charset.iter().enumerate() {
            if charset[..idx].contains(ch) {
                return Err(Error::InvalidConfig(format!(
                    "fulid.characters has duplicate character '{ch}'"
                )));
            }
        }

        Ok(Self { charset })
    }

    /// Numeral base of the alphabet.
    pub fn base(&self) -> usize {
        self.charset.len()
    }

    /// The charset in digit order, lowercase.
    pub fn charset(&self) -> &[char] {
        &self.charset
    }

    /// Digit value of `ch`, ignoring case.
    pub fn index_of(&self, ch: char) -> std::result::Result<usize, InvalidCharacter> {
        let needle = ch.to_ascii_lowercase();
        self.charset
            .iter()
            .position(|candidate| *candidate == needle)
            .ok_or(InvalidCharacter {
                character: ch,
                input: ch.to_string(),
            })
    }

    /// Uppercase symbol for digit `index`.
    ///
    /// Panics when `index >= base()`; callers only pass remainders of the base.
    pub fn symbol_at(&self, index: usize) -> char {
        self.charset[index].to_ascii_uppercase()
    }

    /// Whether `ch` belongs to the charset, ignoring case.
    pub fn contains(&self, ch: char) -> bool {
        self.index_of(ch).is_ok()
    }

    /// Encode `number` most-significant digit first, left-padded with the
    /// zero symbol up to `pad` characters.
    pub fn encode(&self, number: u64, pad: Option<usize>) -> String {
        let base = self.base() as u64;
        let mut digits = Vec::new();
        let mut rest = number;
        loop {
            digits.push(self.symbol_at((rest % base) as usize));
            rest /= base;
            if rest == 0 {
                break;
            }
        }

        let zero = self.symbol_at(0);
        let width = pad.unwrap_or(0);
        while digits.len() < width {
            digits.push(zero);
        }

        digits.iter().rev().collect()
    }

    /// Decode the trailing [`SEQUENCE_LEN`] characters of `text`.
    ///
    /// Accepts either a bare sequence string or a full identifier.
    pub fn decode(&self, text: &str) -> Result<u64> {
        let chars: Vec<char> = text.chars().collect();
        let start = chars.len().saturating_sub(SEQUENCE_LEN);
        let base = self.base() as u64;

        let mut value: u64 = 0;
        for ch in &chars[start..] {
            let digit = self.index_of(*ch).map_err(|_| Error::InvalidCharacter {
                character: *ch,
                input: text.to_string(),
            })?;
            value = value * base + digit as u64;
        }
        Ok(value)
    }

    /// Number of distinct values a [`SEQUENCE_LEN`]-wide segment can hold.
    pub fn sequence_capacity(&self) -> u64 {
        (self.base() as u64).pow(SEQUENCE_LEN as u32)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARACTERS.chars().collect(),
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let charset: String = self.charset.iter().collect();
        write!(f, "{charset}")
    }
}

/// A character that is not part of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCharacter {
    pub character: char,
    pub input: String,
}

impl From<InvalidCharacter> for Error {
    fn from(err: InvalidCharacter) -> Self {
        Error::InvalidCharacter {
            character: err.character,
            input: err.input,
        }
    }
}
